//! Exact conic through five points.
//!
//! The points `p0..p4` are lifted to homogeneous coordinates and joined pairwise into the lines
//! `L0 = p0×p1`, `L1 = p1×p2`, `L2 = p2×p3` and `L3 = p3×p4`. The line pairs `L0·L3` and `L1·L2`
//! are two degenerate conics through `p0..p3`; the member of their pencil that also passes through
//! `p4` is the unique conic through all five points. `Q = L0×L3` is the intersection of the first
//! pair and, together with `L1`, `L2`, `p0` and `p4`, fixes the coefficients in closed form.
//!
//! The points must be in general position (no three collinear). This is not checked: degenerate
//! configurations produce meaningless coefficients rather than an error.

use itertools::Itertools;
use nalgebra as na;

use super::AlgebraicConic;

/// Unique conic `a·x² + b·xy + c·y² + d·x + e·y + f = 0` through five points.
pub fn conic_through<F: na::RealField + Copy>(points: &[na::Point2<F>; 5]) -> AlgebraicConic<F> {
    let homogeneous = points.map(|p| p.to_homogeneous());

    let lines: Vec<na::Vector3<F>> = homogeneous
        .iter()
        .tuple_windows()
        .map(|(p, q)| p.cross(q))
        .collect();
    let q = lines[0].cross(&lines[3]);

    let conic = pencil_member(&q, &lines[1], &lines[2], &homogeneous[0], &homogeneous[4]);
    tracing::trace!("Conic through five points: {:?}", conic.coefficients());
    conic
}

/// [conic_through] for points packed as `[x0, y0, x1, y1, ..., x4, y4]`.
pub fn conic_through_flat<F: na::RealField + Copy>(coordinates: &[F; 10]) -> AlgebraicConic<F> {
    let points = [0, 1, 2, 3, 4].map(|i| na::Point2::new(coordinates[2 * i], coordinates[2 * i + 1]));
    conic_through(&points)
}

/// Expansion of the pencil member through `p4`, written in the bilinear products of the middle
/// lines `l = L1·L2ᵀ` and of the outer points `p = p4·p0ᵀ`.
fn pencil_member<F: na::RealField + Copy>(
    q: &na::Vector3<F>,
    l1: &na::Vector3<F>,
    l2: &na::Vector3<F>,
    p0: &na::Vector3<F>,
    p4: &na::Vector3<F>,
) -> AlgebraicConic<F> {
    let (qx, qy, qz) = (q.x, q.y, q.z);

    let l = l1 * l2.transpose();
    let (l_xx, l_xy, l_xz) = (l[(0, 0)], l[(0, 1)], l[(0, 2)]);
    let (l_yx, l_yy, l_yz) = (l[(1, 0)], l[(1, 1)], l[(1, 2)]);
    let (l_zx, l_zy, l_zz) = (l[(2, 0)], l[(2, 1)], l[(2, 2)]);

    let p = p4 * p0.transpose();
    let (p_xx, p_xy, p_xz) = (p[(0, 0)], p[(0, 1)], p[(0, 2)]);
    let (p_yx, p_yy, p_yz) = (p[(1, 0)], p[(1, 1)], p[(1, 2)]);
    let (p_zx, p_zy, p_zz) = (p[(2, 0)], p[(2, 1)], p[(2, 2)]);

    let a = qx * (l_xx * p_zy - l_xx * p_yz)
        + qy * (l_xy * p_zy + l_xz * p_zz - l_yx * p_yz - l_zx * p_zz)
        + qz * (l_yx * p_yy + l_zx * p_zy - l_xy * p_yy - l_xz * p_yz);

    let b = qx
        * (l_zx * p_zz + l_xx * p_xz - l_xy * p_yz - l_xz * p_zz - l_xx * p_zx + l_yx * p_zy)
        + qy * (l_yx * p_xz - l_yy * p_yz - l_zy * p_zz - l_xy * p_zx + l_yy * p_zy + l_yz * p_zz)
        + qz * (l_zy * p_zy + l_xy * p_xy + l_xy * p_yx + l_xz * p_xz
            - l_yz * p_yz
            - l_yx * p_xy
            - l_yx * p_yx
            - l_zx * p_zx);

    let c = qx * (l_zy * p_zz + l_xy * p_xz - l_yz * p_zz - l_yx * p_zx)
        + qy * (l_yy * p_xz - l_yy * p_zx)
        + qz * (l_yz * p_xz + l_yx * p_xx - l_zy * p_zx - l_xy * p_xx);

    let d = qx
        * (l_xx * p_yx + l_xy * p_yy + l_xz * p_zy - l_zx * p_yz - l_xx * p_xy - l_yx * p_yy)
        + qy * (l_yx * p_yx + l_zx * p_zx + l_zx * p_xz + l_zy * p_zy
            - l_xy * p_xy
            - l_xz * p_zx
            - l_xz * p_xz
            - l_yz * p_yz)
        + qz * (l_yz * p_yy + l_zz * p_zy + l_xz * p_yx - l_zx * p_xy - l_zy * p_yy - l_zz * p_yz);

    let e = qx
        * (l_xz * p_xz + l_yz * p_yz + l_yz * p_zy + l_yx * p_yx
            - l_zx * p_zx
            - l_zy * p_yz
            - l_zy * p_zy
            - l_xy * p_xy)
        + qy * (l_zy * p_xz + l_xy * p_xx + l_yy * p_yx - l_yx * p_xx - l_yy * p_xy - l_yz * p_zx)
        + qz * (l_zz * p_xz + l_zx * p_xx + l_zy * p_yx - l_yz * p_xy - l_zz * p_zx - l_xz * p_xx);

    let f = qx * (l_zx * p_yx + l_zy * p_yy - l_xz * p_xy - l_yz * p_yy)
        + qy * (l_xz * p_xx + l_yz * p_yx - l_zx * p_xx - l_zy * p_xy)
        + qz * (l_zz * p_yx - l_zz * p_xy);

    AlgebraicConic::new(a, b, c, d, e, f)
}
