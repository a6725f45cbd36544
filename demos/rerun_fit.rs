use anyhow::Result;
use conicfit::utils::{sample_ellipse_arc, sample_ellipse_points};
use conicfit::{fit_ellipse, GeometricEllipse};
use nalgebra as na;
use rerun as rr;
use std::f64::consts::PI;

/// Convert nalgebra point to rerun vec2
fn point_to_vec2(point: &na::Point2<f64>) -> rr::datatypes::Vec2D {
    rr::datatypes::Vec2D::new(point.x as f32, point.y as f32)
}

/// Closed outline of an ellipse as a single line strip
fn outline(ellipse: &GeometricEllipse<f64>) -> Vec<rr::datatypes::Vec2D> {
    let mut strip: Vec<_> = sample_ellipse_points(ellipse, 100)
        .iter()
        .map(point_to_vec2)
        .collect();
    strip.push(strip[0]);
    strip
}

fn main() -> Result<()> {
    let rec = rr::RecordingStreamBuilder::new("conic_fit").spawn()?;

    let reference = GeometricEllipse::new(1150.0, 700.0, 300.0, 150.0, 0.3);

    // Fit from progressively longer arcs of the reference ellipse
    let arcs = [("quarter", PI / 2.0), ("half", PI), ("full", 2.0 * PI)];

    for (name, span) in arcs {
        let points: Vec<_> = sample_ellipse_arc(&reference, 29, 0.0, span)
            .into_iter()
            .enumerate()
            .map(|(i, p)| {
                // Deterministic jitter of a few pixels
                let i = i as f64;
                na::Point2::new(p.x + 3.0 * (12.9898 * i).sin(), p.y + 3.0 * (78.233 * i).cos())
            })
            .collect();
        let fitted = fit_ellipse(&points[..])?;

        rec.log(
            format!("{}/points", name),
            &rr::Points2D::new(points.iter().map(point_to_vec2).collect::<Vec<_>>())
                .with_colors([rr::Color::from_rgb(0, 0, 0)])
                .with_radii([4.0]),
        )?;

        rec.log(
            format!("{}/fitted", name),
            &rr::LineStrips2D::new([outline(&fitted)])
                .with_colors([rr::Color::from_rgb(128, 0, 128)]) // Purple
                .with_labels([format!("{} arc: {}", name, fitted)]),
        )?;
    }

    rec.log_static(
        "reference",
        &rr::LineStrips2D::new([outline(&reference)])
            .with_colors([rr::Color::from_rgb(0, 255, 0)]) // Green
            .with_labels(["Reference"]),
    )?;

    Ok(())
}
