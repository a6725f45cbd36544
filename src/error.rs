use crate::geom::conic::FitError;
use crate::render::svg::SvgError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Fit(#[from] FitError),

    #[error(transparent)]
    Svg(#[from] SvgError),

    #[error("Conic does not define an ellipse, discriminant b^2 - 4ac = {0}")]
    NotAnEllipse(f64),

    #[error("Ellipse parameters are the invalid (NaN) sentinel")]
    InvalidEllipse,

    #[error("Coordinate arrays differ in length: {x} x-values, {y} y-values")]
    MismatchedLengths { x: usize, y: usize },

    #[error("Unknown error: {0}")]
    Unknown(#[from] anyhow::Error),
}
