pub mod compare;
mod error;
pub mod geom;
pub mod math;
pub mod render;
pub mod utils;

pub use error::Error;
pub use geom::conic::fit::{fit_conic, fit_ellipse};
pub use geom::conic::five_point::conic_through;
pub use geom::conic::{AlgebraicConic, FitError};
pub use geom::ellipse::GeometricEllipse;
pub use geom::points::{ArrayPoints, PointSet, SlicePoints, VecPoints};
