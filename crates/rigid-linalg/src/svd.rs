//! Singular Value Decomposition (SVD) of 2×2 and 3×3 matrices in double precision.
//!
//! For any matrix A ∈ ℝⁿˣⁿ the SVD decomposes it into three matrices:
//!
//! ```text
//! A = U Σ Vᵀ
//! ```
//!
//! where:
//! * U ∈ ℝⁿˣⁿ is an orthogonal matrix (left singular vectors)
//! * Σ ∈ ℝⁿˣⁿ is a diagonal matrix of singular values (σ₁ ≥ … ≥ σₙ ≥ 0)
//! * V ∈ ℝⁿˣⁿ is an orthogonal matrix (right singular vectors)
//!
//! # Implementation Details
//!
//! * 2×2: closed form, the matrix is split into a similarity and an anti-similarity part.
//! * 3×3: cyclic Jacobi eigenanalysis of AᵀA gives V, then a Givens QR of B = A V
//!   gives U and Σ. Singular values are sorted before the QR step so that Σ comes
//!   out ordered.
//!
//! # Example
//!
//! ```
//! use glam::DMat3;
//! use rigid_linalg::svd::svd3;
//!
//! let matrix = DMat3::from_cols_array(&[
//!     1.0, 0.0, 0.0,
//!     0.0, 2.0, 0.0,
//!     0.0, 0.0, 3.0,
//! ]);
//!
//! let svd_result = svd3(&matrix);
//! let reconstructed = *svd_result.u() * *svd_result.s() * svd_result.v().transpose();
//! assert!(reconstructed.abs_diff_eq(matrix, 1e-12));
//! ```
//!
//! # References
//!
//! * McAdams, Selle, Tamstorf, Teran, and Sifakis (2011).
//!   "Computing the Singular Value Decomposition of 3x3 matrices with minimal
//!   branching and elementary floating point operations."
//!   University of Wisconsin-Madison Technical Report TR1690.
//! * J. Blinn (1996). "Consider the lowly 2×2 matrix." IEEE CG&A.
use glam::{DMat2, DMat3, DVec2, DVec3};

const MAX_SWEEPS: usize = 16;
const QR_EPSILON: f64 = 1e-15;

#[derive(Debug, Clone, Copy)]
/// Helper struct to store 2 floats to avoid OUT parameters on functions
struct Givens {
    /// The cosine of the angle in the Givens rotation.
    cos_theta: f64,

    /// The sine of the angle in the Givens rotation.
    sin_theta: f64,
}

#[derive(Debug)]
/// Helper struct to store 2 Matrices to avoid OUT parameters on functions
struct QR3 {
    /// The orthogonal matrix Q from the QR decomposition.
    q: DMat3,

    /// The upper triangular matrix R from the QR decomposition.
    r: DMat3,
}

/// Result of a 3×3 singular value decomposition.
#[derive(Debug, Clone, Copy)]
pub struct Svd3 {
    u: DMat3,
    s: DMat3,
    v: DMat3,
}

impl Svd3 {
    /// Get the left singular vectors matrix.
    #[inline]
    pub fn u(&self) -> &DMat3 {
        &self.u
    }

    /// Get the diagonal matrix of singular values.
    #[inline]
    pub fn s(&self) -> &DMat3 {
        &self.s
    }

    /// Get the right singular vectors matrix.
    #[inline]
    pub fn v(&self) -> &DMat3 {
        &self.v
    }

    /// Singular values in descending order.
    #[inline]
    pub fn singular_values(&self) -> DVec3 {
        DVec3::new(self.s.x_axis.x, self.s.y_axis.y, self.s.z_axis.z)
    }
}

/// Result of a 2×2 singular value decomposition.
#[derive(Debug, Clone, Copy)]
pub struct Svd2 {
    u: DMat2,
    s: DMat2,
    v: DMat2,
}

impl Svd2 {
    /// Get the left singular vectors matrix.
    #[inline]
    pub fn u(&self) -> &DMat2 {
        &self.u
    }

    /// Get the diagonal matrix of singular values.
    #[inline]
    pub fn s(&self) -> &DMat2 {
        &self.s
    }

    /// Get the right singular vectors matrix.
    #[inline]
    pub fn v(&self) -> &DMat2 {
        &self.v
    }

    /// Singular values in descending order.
    #[inline]
    pub fn singular_values(&self) -> DVec2 {
        DVec2::new(self.s.x_axis.x, self.s.y_axis.y)
    }
}

#[inline]
fn rotation2(angle: f64) -> DMat2 {
    let (sin, cos) = angle.sin_cos();
    DMat2::from_cols(DVec2::new(cos, sin), DVec2::new(-sin, cos))
}

/// Closed form SVD of a 2×2 matrix.
///
/// Any 2×2 matrix can be written as `Rot(φ) · diag(σ₁, σ₂) · Rot(θ)`; the angles come
/// from the similarity part `(e, h)` and the anti-similarity part `(f, g)` of the input.
pub fn svd2(a: &DMat2) -> Svd2 {
    let (m00, m10) = (a.x_axis.x, a.x_axis.y);
    let (m01, m11) = (a.y_axis.x, a.y_axis.y);

    let e = 0.5 * (m00 + m11);
    let f = 0.5 * (m00 - m11);
    let g = 0.5 * (m10 + m01);
    let h = 0.5 * (m10 - m01);

    let q = (e * e + h * h).sqrt();
    let r = (f * f + g * g).sqrt();
    let a1 = g.atan2(f);
    let a2 = h.atan2(e);

    let theta = 0.5 * (a2 - a1);
    let phi = 0.5 * (a2 + a1);

    let mut u = rotation2(phi);
    let v = rotation2(theta).transpose();

    let s1 = q + r;
    let mut s2 = q - r;
    if s2 < 0.0 {
        // move the sign into U so that the singular values stay non-negative
        s2 = -s2;
        u.y_axis = -u.y_axis;
    }

    Svd2 {
        u,
        s: DMat2::from_diagonal(DVec2::new(s1, s2)),
        v,
    }
}

/// Rotation annihilating the off-diagonal entry `s_pq` of a symmetric matrix.
#[inline(always)]
fn jacobi_rotation(s_pp: f64, s_qq: f64, s_pq: f64) -> Givens {
    let theta = (s_qq - s_pp) / (2.0 * s_pq);
    let t = theta.signum() / (theta.abs() + (theta * theta + 1.0).sqrt());
    let cos_theta = (t * t + 1.0).sqrt().recip();
    Givens {
        cos_theta,
        sin_theta: t * cos_theta,
    }
}

/// Conjugate the symmetric matrix `a` by the Jacobi rotation of the `(p, q)` plane and
/// accumulate the rotation into `v`. Both are stored column-major.
#[inline(always)]
fn conjugate(a: &mut [[f64; 3]; 3], v: &mut [[f64; 3]; 3], p: usize, q: usize) {
    let a_pq = a[q][p];
    if a_pq == 0.0 {
        return;
    }
    let r = 3 - p - q;

    let g = jacobi_rotation(a[p][p], a[q][q], a_pq);
    let (c, s) = (g.cos_theta, g.sin_theta);
    let t = s / c;

    let a_rp = a[p][r];
    let a_rq = a[q][r];

    a[p][p] -= t * a_pq;
    a[q][q] += t * a_pq;
    a[p][q] = 0.0;
    a[q][p] = 0.0;

    a[p][r] = c * a_rp - s * a_rq;
    a[r][p] = a[p][r];
    a[q][r] = s * a_rp + c * a_rq;
    a[r][q] = a[q][r];

    for k in 0..3 {
        let v_p = v[p][k];
        let v_q = v[q][k];
        v[p][k] = c * v_p - s * v_q;
        v[q][k] = s * v_p + c * v_q;
    }
}

/// Eigenvectors of a symmetric matrix, as the columns of the returned matrix.
fn jacobi_eigenanalysis(s: &DMat3) -> DMat3 {
    let mut a = s.to_cols_array_2d();
    let mut v = DMat3::IDENTITY.to_cols_array_2d();

    for _ in 0..MAX_SWEEPS {
        let off_diag_norm_sq = a[0][1] * a[0][1] + a[0][2] * a[0][2] + a[1][2] * a[1][2];
        let diag_norm_sq = a[0][0] * a[0][0] + a[1][1] * a[1][1] + a[2][2] * a[2][2];
        if off_diag_norm_sq <= f64::EPSILON * f64::EPSILON * diag_norm_sq {
            break;
        }

        conjugate(&mut a, &mut v, 0, 1);
        conjugate(&mut a, &mut v, 1, 2);
        conjugate(&mut a, &mut v, 0, 2);
    }

    DMat3::from_cols_array_2d(&v)
}

/// Sorts the singular values in descending order and adjusts the corresponding singular
/// vectors accordingly. Every swap negates one column to keep `det(V)` unchanged.
pub(crate) fn sort_singular_values(b: &mut DMat3, v: &mut DMat3) {
    let mut b_cols = [b.x_axis, b.y_axis, b.z_axis];
    let mut v_cols = [v.x_axis, v.y_axis, v.z_axis];
    let mut rho = b_cols.map(|c| c.length_squared());

    for (i, j) in [(0, 1), (0, 2), (1, 2)] {
        if rho[i] < rho[j] {
            rho.swap(i, j);
            b_cols.swap(i, j);
            v_cols.swap(i, j);
            b_cols[j] = -b_cols[j];
            v_cols[j] = -v_cols[j];
        }
    }

    *b = DMat3::from_cols(b_cols[0], b_cols[1], b_cols[2]);
    *v = DMat3::from_cols(v_cols[0], v_cols[1], v_cols[2]);
}

/// Givens rotation zeroing `a2` against `a1`, built from its half-angle quaternion
/// (Algorithm 4 in the reference).
#[inline(always)]
fn qr_givens_quaternion(a1: f64, a2: f64) -> Givens {
    let rho = (a1 * a1 + a2 * a2).sqrt();

    let mut ch = a1.abs() + rho.max(QR_EPSILON);
    let mut sh = if rho > QR_EPSILON { a2 } else { 0.0 };
    if a1 < 0.0 {
        std::mem::swap(&mut ch, &mut sh);
    }

    let w = (ch * ch + sh * sh).sqrt().recip();
    ch *= w;
    sh *= w;

    Givens {
        cos_theta: 1.0 - 2.0 * sh * sh,
        sin_theta: 2.0 * ch * sh,
    }
}

/// Rotate rows `i` and `j` of every column by `gᵀ`.
#[inline(always)]
fn apply_givens_transpose(cols: &mut [DVec3; 3], i: usize, j: usize, g: Givens) {
    for col in cols.iter_mut() {
        let c_i = col[i];
        let c_j = col[j];
        col[i] = g.cos_theta * c_i + g.sin_theta * c_j;
        col[j] = -g.sin_theta * c_i + g.cos_theta * c_j;
    }
}

/// The rotation matrix of `g` acting on the `(i, j)` plane.
#[inline(always)]
fn givens_matrix(i: usize, j: usize, g: Givens) -> DMat3 {
    let mut m = DMat3::IDENTITY.to_cols_array_2d();
    m[i][i] = g.cos_theta;
    m[j][j] = g.cos_theta;
    m[i][j] = g.sin_theta;
    m[j][i] = -g.sin_theta;
    DMat3::from_cols_array_2d(&m)
}

/// Implements a QR decomposition of a Matrix using Givens rotations
fn qr_decomposition(b: &DMat3) -> QR3 {
    let mut cols = [b.x_axis, b.y_axis, b.z_axis];

    // zero b[1][0], then b[2][0], then b[2][1]
    let g1 = qr_givens_quaternion(cols[0].x, cols[0].y);
    apply_givens_transpose(&mut cols, 0, 1, g1);

    let g2 = qr_givens_quaternion(cols[0].x, cols[0].z);
    apply_givens_transpose(&mut cols, 0, 2, g2);

    let g3 = qr_givens_quaternion(cols[1].y, cols[1].z);
    apply_givens_transpose(&mut cols, 1, 2, g3);

    let q = givens_matrix(0, 1, g1) * givens_matrix(0, 2, g2) * givens_matrix(1, 2, g3);
    let r = DMat3::from_cols(cols[0], cols[1], cols[2]);

    QR3 { q, r }
}

/// Singular value decomposition of a 3×3 matrix.
pub fn svd3(a: &DMat3) -> Svd3 {
    // eigenvectors of AᵀA are the right singular vectors
    let at_a = a.transpose() * *a;
    let mut v = jacobi_eigenanalysis(&at_a);
    let mut b = *a * v;

    sort_singular_values(&mut b, &mut v);

    let qr = qr_decomposition(&b);
    let mut u = qr.q;
    let mut sigma = DVec3::new(qr.r.x_axis.x, qr.r.y_axis.y, qr.r.z_axis.z);

    if sigma.x < 0.0 {
        sigma.x = -sigma.x;
        u.x_axis = -u.x_axis;
    }
    if sigma.y < 0.0 {
        sigma.y = -sigma.y;
        u.y_axis = -u.y_axis;
    }
    if sigma.z < 0.0 {
        sigma.z = -sigma.z;
        u.z_axis = -u.z_axis;
    }

    Svd3 {
        u,
        s: DMat3::from_diagonal(sigma),
        v,
    }
}
