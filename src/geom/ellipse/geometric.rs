use std::fmt::{self, Debug, Display, Formatter};

use nalgebra as na;

use crate::compare::rad_to_degree;
use crate::geom::conic::AlgebraicConic;
use crate::Error;

/// Canonical parameters of an ellipse in a 2D plane.
///
/// `a` is the semi-axis obtained from the `+sqrt` branch of the conversion (the larger one for a
/// proper ellipse) and `theta` the angle between the x-axis and the axis of length `a`, defined
/// modulo π. An ellipse whose fields are all NaN is the invalid sentinel, see
/// [GeometricEllipse::invalid].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeometricEllipse<F: na::RealField + Copy> {
    /// Center x-coordinate
    x0: F,
    /// Center y-coordinate
    y0: F,
    /// Semi-axis along `theta`
    a: F,
    /// Semi-axis perpendicular to `theta`
    b: F,
    /// Rotation in radians
    theta: F,
}

impl<F: na::RealField + Copy> GeometricEllipse<F> {
    pub fn new(x0: F, y0: F, a: F, b: F, theta: F) -> Self {
        Self {
            x0,
            y0,
            a,
            b,
            theta,
        }
    }

    /// The result of converting a conic that is not an ellipse.
    pub fn invalid() -> Self {
        let nan: F = na::convert(f64::NAN);
        Self::new(nan, nan, nan, nan, nan)
    }

    pub fn is_valid(&self) -> bool {
        // NaN is the only value unordered with itself
        self.x0.partial_cmp(&self.x0).is_some()
    }

    /// Converts the invalid sentinel into [Error::InvalidEllipse].
    pub fn validated(self) -> Result<Self, Error> {
        if self.is_valid() {
            Ok(self)
        } else {
            Err(Error::InvalidEllipse)
        }
    }

    /// Geometric parameters of an algebraic conic, or [GeometricEllipse::invalid] when the conic
    /// is not an ellipse.
    ///
    /// The conversion is invariant under scaling of the coefficients, including by a negative
    /// factor; `theta` is then only stable modulo π.
    pub fn from_algebraic(conic: &AlgebraicConic<F>) -> Self {
        if !conic.is_ellipse() {
            return Self::invalid();
        }

        let two: F = na::convert(2.0);
        let four: F = na::convert(4.0);
        let [a, b, c, d, e, f] = conic.coefficients();

        // Negative of the discriminant, non-zero after the ellipse check
        let num = four * a * c - b * b;

        let x0 = (b * e - two * c * d) / num;
        let y0 = (b * d - two * a * e) / num;

        // Sign follows the sign of the coefficient scale
        let sigma = four * (c * d * d + a * e * e - b * d * e - f * num) / (num * num);

        let s = (sigma * a - sigma * c).powi(2);
        let sigma_b_squared = (sigma * b).powi(2);
        let root = (s + sigma_b_squared).sqrt();
        let v1 = sigma * a + sigma * c + root;
        let v2 = sigma * a + sigma * c - root;

        let semi_a = (v1 / two).abs().sqrt();
        let semi_b = (v2 / two).abs().sqrt();

        let mut theta = b.atan2(a - c) / two;
        if sigma > F::zero() {
            theta = theta + F::frac_pi_2();
        }

        Self::new(x0, y0, semi_a, semi_b, theta)
    }

    pub fn x0(&self) -> F {
        self.x0
    }

    pub fn y0(&self) -> F {
        self.y0
    }

    pub fn a(&self) -> F {
        self.a
    }

    pub fn b(&self) -> F {
        self.b
    }

    pub fn theta(&self) -> F {
        self.theta
    }

    pub fn center(&self) -> na::Point2<F> {
        na::Point2::new(self.x0, self.y0)
    }

    /// Returns the semi-major axis length
    pub fn semi_major(&self) -> F {
        self.a.max(self.b)
    }

    /// Returns the semi-minor axis length
    pub fn semi_minor(&self) -> F {
        self.a.min(self.b)
    }

    /// Angle of the major axis, in `[0, π)`
    pub fn rotation(&self) -> F {
        let theta = if self.a >= self.b {
            self.theta
        } else {
            self.theta + F::frac_pi_2()
        };
        crate::compare::normalize_angle(theta)
    }

    /// Point at parametric angle `t`; `t = 0` lies on the end of the `a` axis.
    pub fn point_at(&self, t: F) -> na::Point2<F> {
        let (sin_t, cos_t) = t.sin_cos();
        let (sin_theta, cos_theta) = self.theta.sin_cos();
        na::Point2::new(
            self.x0 + self.a * cos_theta * cos_t - self.b * sin_theta * sin_t,
            self.y0 + self.a * sin_theta * cos_t + self.b * cos_theta * sin_t,
        )
    }
}

impl<F: na::RealField + Copy> From<&AlgebraicConic<F>> for GeometricEllipse<F> {
    fn from(conic: &AlgebraicConic<F>) -> Self {
        Self::from_algebraic(conic)
    }
}

impl<F: na::RealField + Copy> From<AlgebraicConic<F>> for GeometricEllipse<F> {
    fn from(conic: AlgebraicConic<F>) -> Self {
        Self::from_algebraic(&conic)
    }
}

impl<F: na::RealField + Copy + Display> Display for GeometricEllipse<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "x0={:.6} y0={:.6} a={:.6} b={:.6} angle={:.6}",
            self.x0,
            self.y0,
            self.a,
            self.b,
            rad_to_degree(self.theta)
        )
    }
}
