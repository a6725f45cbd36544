pub mod svg;

pub use svg::{write_svg, write_svg_file, RenderPoint, SvgCanvas, SvgError};
