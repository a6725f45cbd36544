use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use nalgebra as na;
use thiserror::Error;

use crate::compare::rad_to_degree;
use crate::geom::ellipse::GeometricEllipse;

const POINT_RADIUS: f64 = 2.0;
const SPECIAL_POINT_RADIUS: f64 = 2.0 * POINT_RADIUS;
const ELLIPSE_STROKE: &str = "purple";
const ELLIPSE_STROKE_WIDTH: u32 = 3;

#[derive(Error, Debug)]
pub enum SvgError {
    #[error("Unable to write SVG output: {0}")]
    Io(#[from] io::Error),

    #[error("Invalid image size {width}x{height}")]
    InvalidSize { width: i64, height: i64 },

    #[error("Cannot render the invalid ellipse")]
    InvalidEllipse,
}

/// A point to draw. Special points are drawn larger and in red.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderPoint<F> {
    pub x: F,
    pub y: F,
    pub special: bool,
}

impl<F: na::RealField + Copy> RenderPoint<F> {
    pub fn new(x: F, y: F, special: bool) -> Self {
        Self { x, y, special }
    }

    /// Render points for `points`, the first `special` of them marked.
    pub fn mark_first<I>(points: I, special: usize) -> impl Iterator<Item = Self>
    where
        I: IntoIterator<Item = na::Point2<F>>,
    {
        points
            .into_iter()
            .enumerate()
            .map(move |(i, p)| Self::new(p.x, p.y, i < special))
    }
}

/// Size of the SVG image in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SvgCanvas {
    width: i64,
    height: i64,
}

impl SvgCanvas {
    pub fn new(width: i64, height: i64) -> Result<Self, SvgError> {
        if width <= 0 || height <= 0 {
            return Err(SvgError::InvalidSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// Smallest canvas anchored at the origin that holds the ellipse's bounding circle.
    pub fn fit_to<F: na::RealField + Copy>(ellipse: &GeometricEllipse<F>) -> Result<Self, SvgError> {
        if !ellipse.is_valid() {
            return Err(SvgError::InvalidEllipse);
        }

        let radius = ellipse.a().abs().max(ellipse.b().abs());
        let extent = |center: F| -> i64 {
            let size: f64 = (center.abs() + radius).to_subset_unchecked();
            (size + 0.5) as i64
        };
        Self::new(extent(ellipse.x0()), extent(ellipse.y0()))
    }

    pub fn width(&self) -> i64 {
        self.width
    }

    pub fn height(&self) -> i64 {
        self.height
    }
}

/// Writes an SVG document showing `points` and the outline of `ellipse`.
///
/// The ellipse is checked before anything is written.
pub fn write_svg<W, F, I>(
    writer: &mut W,
    canvas: &SvgCanvas,
    points: I,
    ellipse: &GeometricEllipse<F>,
) -> Result<(), SvgError>
where
    W: Write,
    F: na::RealField + Copy + Display,
    I: IntoIterator<Item = RenderPoint<F>>,
{
    if !ellipse.is_valid() {
        return Err(SvgError::InvalidEllipse);
    }

    writeln!(writer, "<?xml version=\"1.0\" standalone=\"no\"?>")?;
    writeln!(writer, "<!DOCTYPE svg PUBLIC \"-//W3C//DTD SVG 1.1//EN\"")?;
    writeln!(
        writer,
        " \"http://www.w3.org/Graphics/SVG/1.1/DTD/svg11.dtd\">"
    )?;
    writeln!(
        writer,
        "<svg width=\"{}px\" height=\"{}px\" version=\"1.1\"",
        canvas.width, canvas.height
    )?;
    writeln!(
        writer,
        " xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\">"
    )?;

    let mut count = 0usize;
    for point in points {
        let (radius, fill) = if point.special {
            (SPECIAL_POINT_RADIUS, "red")
        } else {
            (POINT_RADIUS, "black")
        };
        writeln!(
            writer,
            "<circle cx=\"{:.6}\" cy=\"{:.6}\" r=\"{:.6}\" fill=\"{}\" />",
            point.x, point.y, radius, fill
        )?;
        count += 1;
    }

    writeln!(
        writer,
        "<g transform=\"translate({:.6} {:.6}) rotate({:.6})\">",
        ellipse.x0(),
        ellipse.y0(),
        rad_to_degree(ellipse.theta())
    )?;
    writeln!(
        writer,
        "<ellipse cx=\"0\" cy=\"0\" rx=\"{:.6}\" ry=\"{:.6}\" fill=\"none\" stroke=\"{}\" stroke-width=\"{}\" />",
        ellipse.a(),
        ellipse.b(),
        ELLIPSE_STROKE,
        ELLIPSE_STROKE_WIDTH
    )?;
    writeln!(writer, "</g>")?;
    writeln!(writer, "</svg>")?;

    tracing::trace!("Rendered {} points and the ellipse {}", count, ellipse);
    Ok(())
}

/// [write_svg] into a newly created (or truncated) file.
pub fn write_svg_file<P, F, I>(
    path: P,
    canvas: &SvgCanvas,
    points: I,
    ellipse: &GeometricEllipse<F>,
) -> Result<(), SvgError>
where
    P: AsRef<Path>,
    F: na::RealField + Copy + Display,
    I: IntoIterator<Item = RenderPoint<F>>,
{
    if !ellipse.is_valid() {
        return Err(SvgError::InvalidEllipse);
    }

    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path)?);
    write_svg(&mut writer, canvas, points, ellipse)?;
    writer.flush()?;

    tracing::debug!("Wrote {}", path.display());
    Ok(())
}
