pub mod adjugate;
pub mod conic;
pub mod eigen;

pub use adjugate::{matrix_adjugate, null_vector};
pub use eigen::{real_eigenpairs, EigenPair};
