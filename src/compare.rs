//! Tolerance-based comparison of scalars, angles and ellipses.

use simba::scalar::RealField;

use crate::geom::ellipse::GeometricEllipse;

/// Relative tolerance used when checking fitted ellipses against known parameters.
pub const DEFAULT_TOLERANCE: f64 = 1e-5;

/// `|(expected - actual) / expected|`, or `|actual|` when `expected` is zero.
pub fn relative_difference<F: RealField + Copy>(expected: F, actual: F) -> F {
    if expected == F::zero() {
        actual.abs()
    } else {
        ((expected - actual) / expected).abs()
    }
}

/// Maps an angle into `[0, π)`.
pub fn normalize_angle<F: RealField + Copy>(theta: F) -> F {
    let pi = F::pi();
    let wrapped = theta - (theta / pi).floor() * pi;
    if wrapped >= pi {
        wrapped - pi
    } else if wrapped < F::zero() {
        wrapped + pi
    } else {
        wrapped
    }
}

/// Whether two orientations agree modulo π.
///
/// The distance is measured on the circle of angles modulo π and compared with `tolerance`
/// relative to `max(|expected|, 1)`.
pub fn angles_match_mod_pi<F: RealField + Copy>(actual: F, expected: F, tolerance: F) -> bool {
    let difference = angle_distance_mod_pi(actual, expected);
    difference <= tolerance * expected.abs().max(F::one())
}

pub fn rad_to_degree<F: RealField + Copy>(theta: F) -> F {
    let half_turn: F = nalgebra::convert(180.0);
    theta * half_turn / F::pi()
}

fn angle_distance_mod_pi<F: RealField + Copy>(lhs: F, rhs: F) -> F {
    let difference = (normalize_angle(lhs) - normalize_angle(rhs)).abs();
    difference.min(F::pi() - difference)
}

/// Per-parameter differences between a computed and a reference ellipse.
///
/// Axis lengths are relative differences, matched by length rather than by the order they were
/// returned in. Center coordinates are relative to the larger of the coordinate and the reference
/// semi-major axis, so a center near the origin is judged against the ellipse size. The rotation
/// entry is the distance of the major axis directions modulo π, and is zero when the reference is
/// a circle at `tolerance`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EllipseComparison<F> {
    pub x0: F,
    pub y0: F,
    pub semi_major: F,
    pub semi_minor: F,
    pub rotation: F,
}

impl<F: RealField + Copy> EllipseComparison<F> {
    /// Largest of the differences. NaN when either ellipse is the invalid sentinel.
    pub fn max_difference(&self) -> F {
        [self.x0, self.y0, self.semi_major, self.semi_minor, self.rotation]
            .into_iter()
            .fold(F::zero(), |acc, d| match acc.partial_cmp(&d) {
                Some(std::cmp::Ordering::Less) => d,
                Some(_) => acc,
                // NaN on either side
                None if acc.partial_cmp(&acc).is_none() => acc,
                None => d,
            })
    }

    pub fn is_within(&self, tolerance: F) -> bool {
        self.max_difference() <= tolerance
    }
}

pub fn compare_ellipses<F: RealField + Copy>(
    actual: &GeometricEllipse<F>,
    expected: &GeometricEllipse<F>,
    tolerance: F,
) -> EllipseComparison<F> {
    let semi_major = relative_difference(expected.semi_major(), actual.semi_major());
    let semi_minor = relative_difference(expected.semi_minor(), actual.semi_minor());

    let is_circle =
        relative_difference(expected.semi_major(), expected.semi_minor()) <= tolerance;
    let rotation = if is_circle && actual.is_valid() {
        F::zero()
    } else {
        angle_distance_mod_pi(actual.rotation(), expected.rotation())
    };

    let size = expected.semi_major().abs();
    let center_difference = |expected: F, actual: F| {
        let scale = expected.abs().max(size);
        if scale > F::zero() {
            (expected - actual).abs() / scale
        } else {
            (expected - actual).abs()
        }
    };

    EllipseComparison {
        x0: center_difference(expected.x0(), actual.x0()),
        y0: center_difference(expected.y0(), actual.y0()),
        semi_major,
        semi_minor,
        rotation,
    }
}

/// Whether `actual` reproduces `expected` within `tolerance`, see [compare_ellipses].
pub fn ellipse_matches<F: RealField + Copy>(
    actual: &GeometricEllipse<F>,
    expected: &GeometricEllipse<F>,
    tolerance: F,
) -> bool {
    compare_ellipses(actual, expected, tolerance).is_within(tolerance)
}
