//! Projection of near-rotation matrices back onto SO(n).
//!
//! Repeated products of rotation matrices drift away from orthogonality. The functions in
//! this module return the closest proper rotation in the Frobenius norm, i.e. the
//! orthogonal polar factor of the input with the determinant forced to `+1`:
//!
//! ```text
//! M = U Σ Vᵀ   ⟶   R = U · diag(1, …, 1, det(U Vᵀ)) · Vᵀ
//! ```
//!
//! Since singular values are sorted, the sign correction always lands on the weakest axis.
use glam::{DMat2, DMat3, DVec2, DVec3};

use crate::svd::{svd2, svd3};

/// Closest 2×2 rotation matrix to `m`.
///
/// Never fails: matrices far from orthogonal get their best-fit rotation, and the zero
/// matrix maps to the identity.
pub fn to_orthogonal2(m: &DMat2) -> DMat2 {
    let svd = svd2(m);
    let (u, v) = (*svd.u(), *svd.v());

    let r = u * v.transpose();
    if r.determinant() < 0.0 {
        log::debug!("to_orthogonal2: input is closer to a reflection, flipping the weakest axis");
        return u * DMat2::from_diagonal(DVec2::new(1.0, -1.0)) * v.transpose();
    }
    r
}

/// Closest 3×3 rotation matrix to `m`.
///
/// Never fails: matrices far from orthogonal get their best-fit rotation, and the zero
/// matrix maps to the identity.
///
/// # Example
///
/// ```
/// use glam::DMat3;
/// use rigid_linalg::to_orthogonal3;
///
/// let mut m = DMat3::IDENTITY;
/// m.y_axis.x = 1e-3;
/// let r = to_orthogonal3(&m);
/// assert!((r.transpose() * r).abs_diff_eq(DMat3::IDENTITY, 1e-12));
/// ```
pub fn to_orthogonal3(m: &DMat3) -> DMat3 {
    let svd = svd3(m);
    let (u, v) = (*svd.u(), *svd.v());

    let r = u * v.transpose();
    if r.determinant() < 0.0 {
        log::debug!("to_orthogonal3: input is closer to a reflection, flipping the weakest axis");
        return u * DMat3::from_diagonal(DVec3::new(1.0, 1.0, -1.0)) * v.transpose();
    }
    r
}

/// Alias of [`to_orthogonal3`].
#[inline]
pub fn to_orthogonal(m: &DMat3) -> DMat3 {
    to_orthogonal3(m)
}
