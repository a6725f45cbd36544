use anyhow::Result;
use conicfit::render::{write_svg_file, RenderPoint, SvgCanvas};
use conicfit::utils::sample_ellipse_points;
use conicfit::{fit_ellipse, GeometricEllipse, VecPoints};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let reference = GeometricEllipse::new(1150.0, 700.0, 300.0, 150.0, 0.3);
    let samples = sample_ellipse_points(&reference, 29);
    let points: VecPoints<f64> = samples.iter().copied().collect();

    let ellipse = fit_ellipse(&points)?;
    println!("reference: {}", reference);
    println!("fitted:    {}", ellipse);

    let canvas = SvgCanvas::fit_to(&ellipse)?;
    write_svg_file(
        "least_squares.svg",
        &canvas,
        RenderPoint::mark_first(samples, 5),
        &ellipse,
    )?;

    Ok(())
}
