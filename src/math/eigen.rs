use std::fmt::Debug;

use nalgebra as na;

use super::adjugate::null_vector;

/// A real eigenvalue together with a unit eigenvector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EigenPair<F: na::RealField + Copy> {
    pub value: F,
    pub vector: na::Vector3<F>,
}

/// Real eigenpairs of a general (not necessarily symmetric) 3x3 matrix.
///
/// Eigenvalues come from the real Schur form; those whose imaginary part is above
/// `sqrt(eps)` times the largest eigenvalue magnitude are complex and skipped. Each eigenvector is the
/// null vector of `M - λI`. Eigenvalues whose shifted matrix has rank below two (repeated roots)
/// carry no unique eigenvector and are skipped as well.
pub fn real_eigenpairs<F: na::RealField + Copy + Debug>(matrix: &na::Matrix3<F>) -> Vec<EigenPair<F>> {
    if matrix.iter().any(|x| !x.is_finite()) {
        return Vec::new();
    }

    let eigenvalues = matrix.complex_eigenvalues();
    let scale = eigenvalues
        .iter()
        .fold(F::zero(), |acc, l| acc.max(l.re.abs()).max(l.im.abs()));
    let slack = F::default_epsilon().sqrt() * scale;

    eigenvalues
        .iter()
        .filter(|l| l.im.abs() <= slack)
        .filter_map(|l| {
            let shifted = matrix - na::Matrix3::identity() * l.re;
            match null_vector(&shifted.as_view()) {
                Ok(vector) => Some(EigenPair {
                    value: l.re,
                    vector,
                }),
                Err(err) => {
                    tracing::trace!("Skipping eigenvalue {:?}: {}", l.re, err);
                    None
                }
            }
        })
        .collect()
}
