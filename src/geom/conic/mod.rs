mod algebraic;
pub mod fit;
pub mod five_point;

pub use algebraic::AlgebraicConic;
pub use fit::FitError;
