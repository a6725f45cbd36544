use std::fmt::Debug;

use nalgebra::{self as na, Matrix3, MatrixView3};
use thiserror::Error;

#[derive(Error, Debug, PartialEq)]
pub enum AdjugateError {
    #[error("Matrix has a non-finite entry")]
    NonFinite,
    #[error("Cofactors overflow for {0}")]
    Overflow(String),
    #[error("Matrix has rank below two, its null space is not a line")]
    RankDeficient,
}

/// Adjugate of a 3x3 matrix, with each column the cross product of two rows.
///
/// `M · adj(M) = det(M) · I`, so for a singular `M` the columns lie in its kernel.
pub fn matrix_adjugate<F: na::RealField + Copy + Debug>(
    matrix: &MatrixView3<F>,
) -> Result<Matrix3<F>, AdjugateError> {
    if matrix.iter().any(|x| !x.is_finite()) {
        return Err(AdjugateError::NonFinite);
    }

    let rows = [matrix.row(0), matrix.row(1), matrix.row(2)];
    let adjugate = Matrix3::from_columns(&[
        rows[1].cross(&rows[2]).transpose(),
        rows[2].cross(&rows[0]).transpose(),
        rows[0].cross(&rows[1]).transpose(),
    ]);
    if adjugate.iter().any(|x| !x.is_finite()) {
        return Err(AdjugateError::Overflow(format!("{:?}", matrix)));
    }

    Ok(adjugate)
}

/// Unit vector spanning the null space of a rank-2 matrix.
///
/// Every column of `adj(M)` lies in the kernel of `M` when `rank(M) = 2`; the column with the
/// largest norm is the best conditioned one.
pub fn null_vector<F: na::RealField + Copy + Debug>(
    matrix: &MatrixView3<F>,
) -> Result<na::Vector3<F>, AdjugateError> {
    let adjugate = matrix_adjugate(matrix)?;

    let best = adjugate
        .column_iter()
        .map(|c| c.into_owned())
        .max_by(|l, r| {
            l.norm_squared()
                .partial_cmp(&r.norm_squared())
                .unwrap_or(std::cmp::Ordering::Equal)
        })
        .unwrap_or_else(na::Vector3::zeros);

    let norm = best.norm();
    if norm <= F::zero() {
        return Err(AdjugateError::RankDeficient);
    }

    Ok(best / norm)
}
