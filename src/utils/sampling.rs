use nalgebra as na;

use crate::geom::ellipse::GeometricEllipse;

/// Points on a full turn of the ellipse, evenly spaced in the parametric angle.
///
/// The first point is `t = 0` and the last one stops short of `2π`, so the points are distinct.
pub fn sample_ellipse_points<F: na::RealField + Copy>(
    ellipse: &GeometricEllipse<F>,
    num_points: usize,
) -> Vec<na::Point2<F>> {
    let count: F = na::convert(num_points as f64);
    (0..num_points)
        .map(|i| {
            let index: F = na::convert(i as f64);
            ellipse.point_at(F::two_pi() * index / count)
        })
        .collect()
}

/// Points on the arc `t_start..=t_end` of the ellipse, both ends included.
pub fn sample_ellipse_arc<F: na::RealField + Copy>(
    ellipse: &GeometricEllipse<F>,
    num_points: usize,
    t_start: F,
    t_end: F,
) -> Vec<na::Point2<F>> {
    match num_points {
        0 => Vec::new(),
        1 => vec![ellipse.point_at(t_start)],
        _ => {
            let intervals: F = na::convert((num_points - 1) as f64);
            let step = (t_end - t_start) / intervals;
            (0..num_points)
                .map(|i| {
                    let index: F = na::convert(i as f64);
                    ellipse.point_at(t_start + step * index)
                })
                .collect()
        }
    }
}
