use anyhow::Result;
use conicfit::render::{write_svg_file, RenderPoint, SvgCanvas};
use conicfit::{geom::conic::five_point::conic_through_flat, GeometricEllipse};
use nalgebra as na;
use tracing_subscriber::EnvFilter;

/// Five measured points, packed as `[x0, y0, ..., x4, y4]`
const POINTS: [f64; 10] = [
    1408.2722735486361,
    490.64057378265801,
    1251.1773322832571,
    97.576251945392670,
    1135.6035395146628,
    921.82905982385944,
    1399.5187486964699,
    559.41979612991645,
    1373.2789494361668,
    266.81596353596143,
];

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let conic = conic_through_flat(&POINTS);
    let ellipse = GeometricEllipse::from_algebraic(&conic).validated()?;
    println!("{}", ellipse);

    let points = POINTS
        .chunks_exact(2)
        .map(|xy| na::Point2::new(xy[0], xy[1]));
    let canvas = SvgCanvas::fit_to(&ellipse)?;
    write_svg_file(
        "five_points.svg",
        &canvas,
        RenderPoint::mark_first(points, POINTS.len() / 2),
        &ellipse,
    )?;

    Ok(())
}
