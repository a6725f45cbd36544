use nalgebra as na;

/// Implicit coefficients `[a, b, c, d, e, f]` of the ellipse with semi-axes `a`, `b`, rotated by
/// `theta` and centered at `(x, y)`.
///
/// With `u` the major and `v` the minor axis direction the ellipse is
/// `b²(u·p)² + a²(v·p)² = a²b²` for `p` relative to the center, so `f` carries the `-a²b²` term.
pub fn compute_coefficients<F: na::RealField + Copy>(a: F, b: F, theta: F, x: F, y: F) -> [F; 6] {
    let two: F = na::convert(2.0);
    let (sin, cos) = theta.sin_cos();
    let u = na::Vector2::new(cos, sin);
    let v = na::Vector2::new(-sin, cos);

    let quadratic = u * u.transpose() * (b * b) + v * v.transpose() * (a * a);
    let center = na::Vector2::new(x, y);
    let linear = quadratic * center * -two;
    let constant = center.dot(&(quadratic * center)) - a * a * b * b;

    [
        quadratic[(0, 0)],
        quadratic[(0, 1)] * two,
        quadratic[(1, 1)],
        linear.x,
        linear.y,
        constant,
    ]
}

/// Symmetric matrix of a conic given by its implicit coefficients, see
/// https://en.wikipedia.org/wiki/Matrix_representation_of_conic_sections
pub fn compute_matrix<F: na::RealField + Copy>(coefficients: &[F; 6]) -> na::Matrix3<F> {
    let half: F = na::convert(0.5);
    let [a, b, c, d, e, f] = *coefficients;

    na::Matrix3::from_rows(&[
        [a, b * half, d * half].into(),
        [b * half, c, e * half].into(),
        [d * half, e * half, f].into(),
    ])
}

/// Inverse of [compute_matrix]. Off-diagonal pairs are summed, so a slightly asymmetric
/// matrix is read as its symmetric part.
pub fn matrix_coefficients<F: na::RealField + Copy>(matrix: &na::Matrix3<F>) -> [F; 6] {
    [
        matrix[(0, 0)],
        matrix[(0, 1)] + matrix[(1, 0)],
        matrix[(1, 1)],
        matrix[(0, 2)] + matrix[(2, 0)],
        matrix[(1, 2)] + matrix[(2, 1)],
        matrix[(2, 2)],
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn assert_matrix_eq(a: &na::Matrix3<f64>, b: &na::Matrix3<f64>) {
        for i in 0..3 {
            for j in 0..3 {
                assert_relative_eq!(a[(i, j)], b[(i, j)], epsilon = 1e-10);
            }
        }
    }

    #[test]
    fn test_circle_at_origin() {
        let m = compute_matrix(&compute_coefficients(1.0, 1.0, 0.0, 0.0, 0.0));
        let expected = na::Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0);
        assert_matrix_eq(&m, &expected);

        let m = compute_matrix(&compute_coefficients(2.0, 1.0, 0.0, 0.0, 0.0));
        let expected = na::Matrix3::new(1.0, 0.0, 0.0, 0.0, 4.0, 0.0, 0.0, 0.0, -4.0);
        assert_matrix_eq(&m, &expected);
    }

    #[test]
    fn test_circle_rotation_invariance() {
        // A circle should produce the same coefficients regardless of rotation
        let c1 = compute_coefficients(1.0, 1.0, 0.0, 0.0, 0.0);
        let c2 = compute_coefficients(1.0, 1.0, std::f64::consts::PI / 4.0, 0.0, 0.0);
        for (l, r) in c1.iter().zip(c2.iter()) {
            assert_relative_eq!(l, r, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_translated_circle() {
        // (x-1)² + (y-1)² = 1  =>  x² + y² - 2x - 2y + 1 = 0
        let c = compute_coefficients(1.0, 1.0, 0.0, 1.0, 1.0);
        let expected = [1.0, 0.0, 1.0, -2.0, -2.0, 1.0];
        for (l, r) in c.iter().zip(expected.iter()) {
            assert_relative_eq!(l, r, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_rotated_ellipse_has_cross_term() {
        let c = compute_coefficients(2.0, 1.0, std::f64::consts::PI / 4.0, 0.0, 0.0);
        assert!(c[1].abs() > 1e-10);
        assert!(c[1] * c[1] - 4.0 * c[0] * c[2] < 0.0);
    }

    #[test]
    fn test_matrix_roundtrip() {
        let c = compute_coefficients(3.0, 1.5, 0.4, -2.0, 5.0);
        let m = compute_matrix(&c);
        assert_relative_eq!(m[(0, 1)], m[(1, 0)]);
        let back = matrix_coefficients(&m);
        for (l, r) in c.iter().zip(back.iter()) {
            assert_relative_eq!(l, r, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_hyperbola_matrix_block() {
        // x²/4 - y² = 1: the upper-left block has a negative determinant
        let m = compute_matrix(&[0.25, 0.0, -1.0, 0.0, 0.0, -1.0]);
        let a33 = m.fixed_view::<2, 2>(0, 0);
        assert!(a33.determinant() < 0.0);
    }
}
