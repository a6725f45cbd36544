//! Direct least-squares conic fitting (Fitzgibbon et al. 1999, with the block reduction of
//! Halíř and Flusser 1998).
//!
//! The ellipse constraint `4ac - b² = 1` turns the algebraic least-squares problem into a 3x3
//! eigenproblem on the quadratic coefficients. The linear coefficients follow from the
//! quadratic ones in closed form.

use std::cmp::Ordering;
use std::fmt::Debug;

use itertools::{Itertools, MinMaxResult};
use nalgebra as na;
use thiserror::Error;

use super::AlgebraicConic;
use crate::geom::ellipse::GeometricEllipse;
use crate::geom::points::PointSet;
use crate::math::eigen::real_eigenpairs;
use crate::Error;

/// Minimum number of points that determines a conic.
pub const MIN_POINTS: usize = 5;

/// Reasons a point set cannot be fitted.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FitError {
    #[error("At least {needed} points are required, got {got}")]
    TooFewPoints { needed: usize, got: usize },

    #[error("All points share the same {axis}-coordinate")]
    DegenerateSpread { axis: char },

    #[error("Linear block of the scatter matrix is singular, points are collinear")]
    SingularLinearBlock,

    #[error("Constrained scatter matrix has no negative eigenvalue")]
    NoNegativeEigenvalue,

    #[error("Non-finite value encountered")]
    NonFinite,
}

/// Affine map that centers the points on their mean and scales each axis by its half range.
#[derive(Debug, Clone, Copy)]
struct Normalization<F> {
    mean_x: F,
    mean_y: F,
    scale_x: F,
    scale_y: F,
}

impl<F: na::RealField + Copy> Normalization<F> {
    fn of<P: PointSet<F> + ?Sized>(points: &P) -> Result<Self, FitError> {
        let n = points.len();
        let count: F = na::convert(n as f64);
        let two: F = na::convert(2.0);

        let mean_x = (0..n).fold(F::zero(), |acc, i| acc + points.x(i)) / count;
        let mean_y = (0..n).fold(F::zero(), |acc, i| acc + points.y(i)) / count;

        let half_range = |values: MinMaxResult<F>, axis: char| match values {
            MinMaxResult::MinMax(min, max) if max > min => Ok((max - min) / two),
            _ => Err(FitError::DegenerateSpread { axis }),
        };
        let scale_x = half_range((0..n).map(|i| points.x(i)).minmax(), 'x')?;
        let scale_y = half_range((0..n).map(|i| points.y(i)).minmax(), 'y')?;

        Ok(Self {
            mean_x,
            mean_y,
            scale_x,
            scale_y,
        })
    }

    fn apply(&self, x: F, y: F) -> (F, F) {
        (
            (x - self.mean_x) / self.scale_x,
            (y - self.mean_y) / self.scale_y,
        )
    }

    /// Substitutes the normalization into a conic fitted in normalized coordinates. The result is
    /// scaled by `sx²·sy²` to keep the expressions polynomial.
    fn restore(&self, [a0, a1, a2, a3, a4, a5]: [F; 6]) -> AlgebraicConic<F> {
        let two: F = na::convert(2.0);
        let (mx, my) = (self.mean_x, self.mean_y);
        let (sx, sy) = (self.scale_x, self.scale_y);
        let (sx2, sy2, sxy) = (sx * sx, sy * sy, sx * sy);

        let a = a0 * sy2;
        let b = a1 * sxy;
        let c = a2 * sx2;
        let d = -two * a0 * sy2 * mx - a1 * sxy * my + a3 * sxy * sy;
        let e = -a1 * sxy * mx - two * a2 * sx2 * my + a4 * sx2 * sy;
        let f = a0 * sy2 * mx * mx + a1 * sxy * mx * my + a2 * sx2 * my * my
            - a3 * sxy * sy * mx
            - a4 * sx2 * sy * my
            + a5 * sx2 * sy2;

        AlgebraicConic::new(a, b, c, d, e, f)
    }
}

/// Fits a conic to at least five points by direct least squares under the ellipse constraint.
///
/// The returned conic minimizes the algebraic distance. For noise-free points on an ellipse it is
/// that ellipse; the fit is invariant to translating and scaling the input.
///
/// # Errors
/// * [FitError::TooFewPoints] - fewer than [MIN_POINTS] points
/// * [FitError::NonFinite] - a coordinate or the result is NaN or infinite
/// * [FitError::DegenerateSpread] - all points share an x- or a y-coordinate
/// * [FitError::SingularLinearBlock] - the points are (numerically) collinear
/// * [FitError::NoNegativeEigenvalue] - no conic satisfies the ellipse constraint
pub fn fit_conic<F, P>(points: &P) -> Result<AlgebraicConic<F>, FitError>
where
    F: na::RealField + Copy + Debug,
    P: PointSet<F> + ?Sized,
{
    let n = points.len();
    if n < MIN_POINTS {
        return Err(FitError::TooFewPoints {
            needed: MIN_POINTS,
            got: n,
        });
    }
    if (0..n).any(|i| !points.x(i).is_finite() || !points.y(i).is_finite()) {
        return Err(FitError::NonFinite);
    }

    let normalization = Normalization::<F>::of(points)?;
    tracing::debug!(
        "Normalizing {} points: mean=({:?}, {:?}) half range=({:?}, {:?})",
        n,
        normalization.mean_x,
        normalization.mean_y,
        normalization.scale_x,
        normalization.scale_y
    );

    let design = na::DMatrix::from_fn(n, 6, |row, col| {
        let (x, y) = normalization.apply(points.x(row), points.y(row));
        match col {
            0 => x * x,
            1 => x * y,
            2 => y * y,
            3 => x,
            4 => y,
            _ => F::one(),
        }
    });

    let scatter = design.transpose() * &design;
    let s11 = scatter.fixed_view::<3, 3>(0, 0).into_owned();
    let s12 = scatter.fixed_view::<3, 3>(0, 3).into_owned();
    let s22 = scatter.fixed_view::<3, 3>(3, 3).into_owned();

    let s22_inv = invert_linear_block(&s22)?;
    let linear = -s22_inv * s12.transpose();
    let reduced = s11 + s12 * linear;

    // Negated inverse of the constraint matrix [[0, 0, 2], [0, -1, 0], [2, 0, 0]]; the ellipse
    // solution is the eigenvector of the single negative eigenvalue
    let half: F = na::convert(0.5);
    let constraint_inv = na::Matrix3::new(
        F::zero(),
        F::zero(),
        -half,
        F::zero(),
        F::one(),
        F::zero(),
        -half,
        F::zero(),
        F::zero(),
    );
    let system = constraint_inv * reduced;

    let quadratic = select_negative_eigenvector(&system)?;
    let linear_part = linear * quadratic;

    let conic = normalization.restore([
        quadratic[0],
        quadratic[1],
        quadratic[2],
        linear_part[0],
        linear_part[1],
        linear_part[2],
    ]);
    if !conic.is_finite() {
        return Err(FitError::NonFinite);
    }

    tracing::trace!("Fitted conic: {:?}", conic.coefficients());
    Ok(conic)
}

/// Fits a conic with [fit_conic] and converts it into geometric form.
///
/// # Errors
/// [Error::Fit] when fitting fails and [Error::NotAnEllipse] when the fitted conic is not an
/// ellipse.
pub fn fit_ellipse<F, P>(points: &P) -> Result<GeometricEllipse<F>, Error>
where
    F: na::RealField + Copy + Debug,
    P: PointSet<F> + ?Sized,
{
    let conic = fit_conic(points)?;
    ellipse_of(&conic)
}

/// Geometric form of a fitted conic. An eigenvalue accepted within the slack can leave the
/// discriminant at or just above zero.
fn ellipse_of<F: na::RealField + Copy>(
    conic: &AlgebraicConic<F>,
) -> Result<GeometricEllipse<F>, Error> {
    if !conic.is_ellipse() {
        return Err(Error::NotAnEllipse(conic.discriminant().to_subset_unchecked()));
    }
    Ok(GeometricEllipse::from_algebraic(conic))
}

/// Root mean square of the algebraic residuals of the points against the unit-norm conic.
pub fn algebraic_residual_rms<F, P>(conic: &AlgebraicConic<F>, points: &P) -> F
where
    F: na::RealField + Copy,
    P: PointSet<F> + ?Sized,
{
    if points.is_empty() {
        return F::zero();
    }

    let unit = conic.normalized();
    let sum_sq = (0..points.len())
        .map(|i| unit.evaluate(points.x(i), points.y(i)))
        .fold(F::zero(), |acc, r| acc + r * r);
    let count: F = na::convert(points.len() as f64);
    (sum_sq / count).sqrt()
}

/// Inverse of the Gram matrix of `[x, y, 1]`.
///
/// Its determinant relative to the product of its diagonal is `1 - r²` for the correlation `r` of
/// the normalized coordinates, so a tiny ratio means the points lie on a line.
fn invert_linear_block<F: na::RealField + Copy>(
    s22: &na::Matrix3<F>,
) -> Result<na::Matrix3<F>, FitError> {
    let diagonal = s22[(0, 0)] * s22[(1, 1)] * s22[(2, 2)];
    let ratio = s22.determinant() / diagonal;
    if !(ratio > F::default_epsilon().sqrt()) {
        return Err(FitError::SingularLinearBlock);
    }
    s22.try_inverse().ok_or(FitError::SingularLinearBlock)
}

/// Eigenvector of the smallest eigenvalue, accepted when that eigenvalue is negative.
///
/// With noise-free input the wanted eigenvalue is zero up to rounding, so "negative" is tested
/// with a slack of `sqrt(eps)` relative to the largest eigenvalue magnitude.
fn select_negative_eigenvector<F: na::RealField + Copy + Debug>(
    system: &na::Matrix3<F>,
) -> Result<na::Vector3<F>, FitError> {
    let pairs = real_eigenpairs(system);

    let scale = pairs
        .iter()
        .fold(F::zero(), |acc, pair| acc.max(pair.value.abs()));
    let slack = F::default_epsilon().sqrt() * scale;

    let selected = pairs
        .into_iter()
        .min_by(|l, r| l.value.partial_cmp(&r.value).unwrap_or(Ordering::Equal))
        .filter(|pair| pair.value < slack)
        .ok_or(FitError::NoNegativeEigenvalue)?;

    tracing::debug!("Selected eigenvalue {:?}", selected.value);
    Ok(selected.vector)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compare::{ellipse_matches, DEFAULT_TOLERANCE};
    use crate::geom::conic::five_point::conic_through;
    use crate::geom::points::{SlicePoints, VecPoints};
    use approx::assert_relative_eq;
    use std::f64::consts::PI;

    fn sample(ellipse: &GeometricEllipse<f64>, n: usize) -> Vec<na::Point2<f64>> {
        (0..n)
            .map(|i| ellipse.point_at(2.0 * PI * i as f64 / n as f64))
            .collect()
    }

    #[test]
    fn test_noise_free_points() {
        let expected = GeometricEllipse::new(1150.0, 700.0, 300.0, 150.0, 0.3);
        let points = sample(&expected, 29);

        let fitted = fit_ellipse(&points[..]).unwrap();
        assert!(ellipse_matches(&fitted, &expected, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_various_ellipses() {
        let cases = [
            GeometricEllipse::new(50.0, 50.0, 40.0, 10.0, 0.0),
            GeometricEllipse::new(200.0, 150.0, 25.0, 24.0, 1.0),
            GeometricEllipse::new(300.0, 100.0, 50.0, 20.0, -0.7),
            GeometricEllipse::new(10.0, 10.0, 8.0, 5.0, PI / 4.0),
            GeometricEllipse::new(-5.0, 3.0, 0.02, 0.01, 2.5),
        ];

        for (i, expected) in cases.iter().enumerate() {
            let points: VecPoints<f64> = sample(expected, 64).into_iter().collect();
            let fitted = fit_ellipse(&points).unwrap_or_else(|e| panic!("case {}: {}", i, e));
            assert!(
                ellipse_matches(&fitted, expected, 1e-6),
                "case {}: expected {} got {}",
                i,
                expected,
                fitted
            );
        }
    }

    #[test]
    fn test_circle() {
        let expected = GeometricEllipse::new(50.0, 50.0, 20.0, 20.0, 0.0);
        let fitted = fit_ellipse(&sample(&expected, 100)[..]).unwrap();

        assert_relative_eq!(fitted.x0(), 50.0, epsilon = 1e-8);
        assert_relative_eq!(fitted.y0(), 50.0, epsilon = 1e-8);
        assert_relative_eq!(fitted.a(), 20.0, epsilon = 1e-8);
        assert_relative_eq!(fitted.b(), 20.0, epsilon = 1e-8);
    }

    #[test]
    fn test_noisy_points() {
        let expected = GeometricEllipse::new(100.0, 80.0, 30.0, 15.0, 0.3);
        let points: Vec<_> = sample(&expected, 200)
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                let i = i as f64;
                na::Point2::new(p.x + 0.5 * (12.9898 * i).sin(), p.y + 0.5 * (78.233 * i).cos())
            })
            .collect();

        let conic = fit_conic(&points[..]).unwrap();
        let fitted = GeometricEllipse::from_algebraic(&conic);

        assert!(fitted.is_valid());
        assert_relative_eq!(fitted.x0(), expected.x0(), epsilon = 1.0);
        assert_relative_eq!(fitted.y0(), expected.y0(), epsilon = 1.0);
        assert_relative_eq!(fitted.semi_major(), 30.0, epsilon = 2.0);
        assert_relative_eq!(fitted.semi_minor(), 15.0, epsilon = 2.0);
        assert!(algebraic_residual_rms(&conic, &points[..]) > 0.0);
    }

    #[test]
    fn test_partial_arc() {
        let expected = GeometricEllipse::new(100.0, 80.0, 30.0, 15.0, 0.3);
        let points: Vec<_> = (0..40)
            .map(|i| expected.point_at(PI / 2.0 * i as f64 / 39.0))
            .collect();

        let fitted = fit_ellipse(&points[..]).unwrap();
        assert!(ellipse_matches(&fitted, &expected, 1e-5));
    }

    #[test]
    fn test_invariant_under_affine_scaling() {
        let expected = GeometricEllipse::new(12.0, -4.0, 6.0, 2.5, 0.8);
        let points = sample(&expected, 31);
        let (xs, ys): (Vec<f64>, Vec<f64>) = points.iter().map(|p| (p.x, p.y)).unzip();
        let scaled_xs: Vec<f64> = xs.iter().map(|x| 2.5 * x - 40.0).collect();
        let scaled_ys: Vec<f64> = ys.iter().map(|y| 2.5 * y + 13.0).collect();

        let original = fit_ellipse(&SlicePoints::try_new(&xs, &ys).unwrap()).unwrap();
        let scaled = fit_ellipse(&SlicePoints::try_new(&scaled_xs, &scaled_ys).unwrap()).unwrap();
        let mapped_back = GeometricEllipse::new(
            (scaled.x0() + 40.0) / 2.5,
            (scaled.y0() - 13.0) / 2.5,
            scaled.a() / 2.5,
            scaled.b() / 2.5,
            scaled.theta(),
        );

        assert!(ellipse_matches(&mapped_back, &original, 1e-8));
    }

    #[test]
    fn test_five_points_agree_with_exact_conic() {
        let expected = GeometricEllipse::new(5.0, -3.0, 4.0, 3.5, 1.2);
        let points = [0.1, 1.3, 2.2, 3.9, 5.1].map(|t| expected.point_at(t));

        let fitted = fit_ellipse(&points[..]).unwrap();
        let exact = GeometricEllipse::from_algebraic(&conic_through(&points));

        assert!(ellipse_matches(&fitted, &exact, DEFAULT_TOLERANCE));
        assert!(ellipse_matches(&fitted, &expected, DEFAULT_TOLERANCE));
    }

    #[test]
    fn test_residual_of_exact_fit() {
        let expected = GeometricEllipse::new(1.0, 2.0, 3.0, 2.0, 0.4);
        let points = sample(&expected, 16);
        let conic = fit_conic(&points[..]).unwrap();
        assert!(algebraic_residual_rms(&conic, &points[..]) < 1e-10);

        let empty: Vec<na::Point2<f64>> = Vec::new();
        assert_eq!(algebraic_residual_rms(&conic, &empty[..]), 0.0);
    }

    #[test]
    fn test_too_few_points() {
        let points = [
            na::Point2::new(1.0, 2.0),
            na::Point2::new(3.0, 4.0),
            na::Point2::new(5.0, 7.0),
            na::Point2::new(0.0, 1.0),
        ];
        assert_eq!(
            fit_conic(&points[..]),
            Err(FitError::TooFewPoints { needed: 5, got: 4 })
        );
    }

    #[test]
    fn test_collinear_points() {
        let points: Vec<_> = (0..8)
            .map(|i| na::Point2::new(i as f64, 2.0 * i as f64 + 1.0))
            .collect();
        assert_eq!(fit_conic(&points[..]), Err(FitError::SingularLinearBlock));
        assert!(matches!(
            fit_ellipse(&points[..]),
            Err(Error::Fit(FitError::SingularLinearBlock))
        ));
    }

    #[test]
    fn test_zero_spread() {
        let horizontal: Vec<_> = (0..6).map(|i| na::Point2::new(i as f64, 3.0)).collect();
        assert_eq!(
            fit_conic(&horizontal[..]),
            Err(FitError::DegenerateSpread { axis: 'y' })
        );

        let vertical: Vec<_> = (0..6).map(|i| na::Point2::new(-1.0, i as f64)).collect();
        assert_eq!(
            fit_conic(&vertical[..]),
            Err(FitError::DegenerateSpread { axis: 'x' })
        );
    }

    #[test]
    fn test_no_negative_eigenvalue() {
        let positive = na::Matrix3::from_diagonal(&na::Vector3::new(1.0, 2.0, 3.0));
        assert_eq!(
            select_negative_eigenvector(&positive),
            Err(FitError::NoNegativeEigenvalue)
        );

        let mixed: na::Matrix3<f64> = na::Matrix3::from_diagonal(&na::Vector3::new(1.0, -2.0, 3.0));
        let vector = select_negative_eigenvector(&mixed).unwrap();
        assert_relative_eq!(vector[1].abs(), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_non_ellipse_is_rejected() {
        // x² - y² = 1
        let hyperbola = AlgebraicConic::<f64>::new(1.0, 0.0, -1.0, 0.0, 0.0, -1.0);
        match ellipse_of(&hyperbola) {
            Err(Error::NotAnEllipse(discriminant)) => assert_relative_eq!(discriminant, 4.0),
            other => panic!("unexpected {:?}", other),
        }

        // y = x², the boundary case
        let parabola = AlgebraicConic::<f64>::new(1.0, 0.0, 0.0, 0.0, -1.0, 0.0);
        assert!(matches!(ellipse_of(&parabola), Err(Error::NotAnEllipse(d)) if d == 0.0));

        let ellipse = GeometricEllipse::new(1.0, 2.0, 3.0, 1.0, 0.4);
        let conic = AlgebraicConic::from_geometric(&ellipse);
        assert!(ellipse_of(&conic).unwrap().is_valid());
    }

    #[test]
    fn test_non_finite_points() {
        let mut points = sample(&GeometricEllipse::new(0.0, 0.0, 2.0, 1.0, 0.0), 10);
        points[3].y = f64::NAN;
        assert_eq!(fit_conic(&points[..]), Err(FitError::NonFinite));

        points[3].y = f64::INFINITY;
        assert_eq!(fit_conic(&points[..]), Err(FitError::NonFinite));
    }
}
