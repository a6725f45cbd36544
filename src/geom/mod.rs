pub mod conic;
pub mod ellipse;
pub mod points;
