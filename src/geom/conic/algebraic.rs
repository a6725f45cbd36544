use std::fmt::{self, Debug, Display, Formatter};

use nalgebra as na;

use crate::geom::ellipse::GeometricEllipse;
use crate::math::conic;

/// A conic section in implicit form `a·x² + b·xy + c·y² + d·x + e·y + f = 0`.
///
/// The coefficients are homogeneous: any non-zero multiple describes the same curve.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AlgebraicConic<F: na::RealField + Copy> {
    a: F,
    b: F,
    c: F,
    d: F,
    e: F,
    f: F,
}

impl<F: na::RealField + Copy> AlgebraicConic<F> {
    pub fn new(a: F, b: F, c: F, d: F, e: F, f: F) -> Self {
        Self { a, b, c, d, e, f }
    }

    pub fn from_coefficients([a, b, c, d, e, f]: [F; 6]) -> Self {
        Self::new(a, b, c, d, e, f)
    }

    /// Reads the conic from its symmetric 3x3 matrix representation.
    pub fn from_matrix(matrix: &na::Matrix3<F>) -> Self {
        Self::from_coefficients(conic::matrix_coefficients(matrix))
    }

    /// Implicit form of a geometric ellipse. `a` is measured along the direction `theta`.
    pub fn from_geometric(ellipse: &GeometricEllipse<F>) -> Self {
        Self::from_coefficients(conic::compute_coefficients(
            ellipse.a(),
            ellipse.b(),
            ellipse.theta(),
            ellipse.x0(),
            ellipse.y0(),
        ))
    }

    pub fn coefficients(&self) -> [F; 6] {
        [self.a, self.b, self.c, self.d, self.e, self.f]
    }

    pub fn to_matrix(&self) -> na::Matrix3<F> {
        conic::compute_matrix(&self.coefficients())
    }

    pub fn a(&self) -> F {
        self.a
    }

    pub fn b(&self) -> F {
        self.b
    }

    pub fn c(&self) -> F {
        self.c
    }

    pub fn d(&self) -> F {
        self.d
    }

    pub fn e(&self) -> F {
        self.e
    }

    pub fn f(&self) -> F {
        self.f
    }

    /// `b² - 4ac`
    pub fn discriminant(&self) -> F {
        let four: F = na::convert(4.0);
        self.b * self.b - four * self.a * self.c
    }

    /// Whether the discriminant is strictly negative. NaN coefficients yield `false`.
    pub fn is_ellipse(&self) -> bool {
        self.discriminant() < F::zero()
    }

    /// Algebraic residual of the point `(x, y)`.
    pub fn evaluate(&self, x: F, y: F) -> F {
        self.a * x * x + self.b * x * y + self.c * y * y + self.d * x + self.e * y + self.f
    }

    pub fn is_finite(&self) -> bool {
        self.coefficients().iter().all(|v| v.is_finite())
    }

    /// Same conic scaled so that the coefficient vector has unit norm.
    pub fn normalized(&self) -> Self {
        let norm = na::SVector::<F, 6>::from(self.coefficients()).norm();
        if norm > F::zero() {
            Self::from_coefficients(self.coefficients().map(|v| v / norm))
        } else {
            *self
        }
    }
}

impl<F: na::RealField + Copy + Display> Display for AlgebraicConic<F> {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}x² + {}xy + {}y² + {}x + {}y + {} = 0",
            self.a, self.b, self.c, self.d, self.e, self.f
        )
    }
}
