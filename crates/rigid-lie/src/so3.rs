use std::fmt;

use glam::{DMat3, DQuat, DVec3};
use rand::Rng;
use rigid_linalg::to_orthogonal3;

use crate::{matrix, LieError, LieGroup};

/// Below this angle exp, log and the Jacobians switch to their Taylor expansions.
const SMALL_ANGLE: f64 = 1e-6;
/// Series threshold for the `(θ - sin θ)/θ³` and cotangent terms, which cancel badly earlier.
const JACOBIAN_SMALL_ANGLE: f64 = 1e-4;

/// Rotation in 3D space, stored as a 3×3 rotation matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SO3 {
    rotation: DMat3,
}

impl SO3 {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        rotation: DMat3::IDENTITY,
    };

    /// Wraps a rotation matrix after checking it is orthogonal with determinant `+1`.
    ///
    /// # Errors
    ///
    /// [`LieError::NotOrthogonal`] when `‖RᵀR - I‖_F` exceeds
    /// [`ORTHOGONALITY_TOLERANCE`](crate::ORTHOGONALITY_TOLERANCE), and
    /// [`LieError::NotProperRotation`] for reflections.
    pub fn from_matrix(mat: &DMat3) -> Result<Self, LieError> {
        matrix::check_rotation3(mat)?;
        Ok(Self { rotation: *mat })
    }

    /// Wraps a matrix without any check.
    pub fn from_matrix_unchecked(mat: &DMat3) -> Self {
        Self { rotation: *mat }
    }

    /// Projects `mat` onto the closest rotation (in the Frobenius norm) and wraps the result.
    ///
    /// Use this to recover from accumulated floating point drift.
    pub fn from_matrix_orthogonalized(mat: &DMat3) -> Self {
        if let Err(err) = matrix::check_rotation3(mat) {
            log::debug!("SO3: orthogonalizing input matrix ({err})");
        }
        Self {
            rotation: to_orthogonal3(mat),
        }
    }

    /// Builds a rotation from 9 row-major values.
    pub fn from_row_slice(data: &[f64]) -> Result<Self, LieError> {
        Self::from_matrix(&matrix::dmat3_from_row_slice(data)?)
    }

    /// Builds a rotation from a unit quaternion.
    pub fn from_quaternion(quat: &DQuat) -> Self {
        Self {
            rotation: DMat3::from_quat(quat.normalize()),
        }
    }

    /// Uniformly distributed random rotation.
    pub fn from_random() -> Self {
        let mut rng = rand::rng();

        let r1: f64 = rng.random();
        let r2: f64 = rng.random();
        let r3: f64 = rng.random();

        let tau = std::f64::consts::TAU;
        let w = (1.0 - r1).sqrt() * (tau * r2).sin();
        let x = (1.0 - r1).sqrt() * (tau * r2).cos();
        let y = r1.sqrt() * (tau * r3).sin();
        let z = r1.sqrt() * (tau * r3).cos();

        Self::from_quaternion(&DQuat::from_xyzw(x, y, z, w))
    }

    /// The 3×3 rotation matrix.
    pub fn matrix(&self) -> DMat3 {
        self.rotation
    }

    /// Replaces the rotation, leaving `self` untouched when `mat` is not a rotation.
    pub fn set_matrix(&mut self, mat: &DMat3) -> Result<(), LieError> {
        *self = Self::from_matrix(mat)?;
        Ok(())
    }

    /// Inverse rotation, i.e. the transpose.
    pub fn inverse(&self) -> Self {
        Self {
            rotation: self.rotation.transpose(),
        }
    }

    /// Product `self ∘ other`.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            rotation: self.rotation * other.rotation,
        }
    }

    /// Rotates a single point.
    pub fn transform(&self, point: DVec3) -> DVec3 {
        self.rotation * point
    }

    /// Rotates every point of a `N×3` batch.
    pub fn transform_points(&self, points: &[[f64; 3]]) -> Vec<[f64; 3]> {
        points
            .iter()
            .map(|p| self.transform(DVec3::from_array(*p)).to_array())
            .collect()
    }

    /// The adjoint of SO(3) is the rotation matrix itself.
    pub fn adjoint(&self) -> DMat3 {
        self.rotation
    }

    /// Lie algebra -> Lie group (Rodrigues formula).
    pub fn exp(v: DVec3) -> Self {
        let theta_sq = v.length_squared();
        let theta = theta_sq.sqrt();

        let (a, b) = if theta < SMALL_ANGLE {
            (1.0 - theta_sq / 6.0, 0.5 - theta_sq / 24.0)
        } else {
            let half_sin = (0.5 * theta).sin();
            (theta.sin() / theta, 2.0 * half_sin * half_sin / theta_sq)
        };

        let skew = Self::hat(v);
        Self {
            rotation: DMat3::IDENTITY + skew * a + skew * skew * b,
        }
    }

    /// Lie group -> Lie algebra.
    ///
    /// Returns the rotation vector `θ·a` with `θ ∈ [0, π]`. At exactly `π` both `±a`
    /// describe the same rotation and either may be returned.
    pub fn log(&self) -> DVec3 {
        let r = self.rotation;
        let axis_sin = Self::vee(&((r - r.transpose()) * 0.5));
        let sin_theta = axis_sin.length();
        let cos_theta = 0.5 * (r.x_axis.x + r.y_axis.y + r.z_axis.z - 1.0);
        let theta = sin_theta.atan2(cos_theta);

        if theta < SMALL_ANGLE {
            return axis_sin * (1.0 + theta * theta / 6.0);
        }

        // past a quarter turn: axis from the symmetric part, sign from the skew part
        if cos_theta < 0.0 {
            // (R + Rᵀ)/2 - cos θ·I = (1 - cos θ)·a·aᵀ
            let outer = ((r + r.transpose()) * 0.5 - DMat3::IDENTITY * cos_theta)
                * (1.0 / (1.0 - cos_theta));
            let diagonal = DVec3::new(outer.x_axis.x, outer.y_axis.y, outer.z_axis.z);
            let i = if diagonal.x >= diagonal.y && diagonal.x >= diagonal.z {
                0
            } else if diagonal.y >= diagonal.z {
                1
            } else {
                2
            };
            let mut axis = (outer.col(i) / diagonal[i].sqrt()).normalize();
            if axis.dot(axis_sin) < 0.0 {
                axis = -axis;
            }
            return axis * theta;
        }

        axis_sin * (theta / sin_theta)
    }

    /// Vector space -> Lie algebra.
    pub fn hat(v: DVec3) -> DMat3 {
        DMat3::from_cols_array(&[
            0.0, v.z, -v.y, //
            -v.z, 0.0, v.x, //
            v.y, -v.x, 0.0, //
        ])
    }

    /// Lie algebra -> vector space.
    pub fn vee(omega: &DMat3) -> DVec3 {
        DVec3::new(omega.y_axis.z, omega.z_axis.x, omega.x_axis.y)
    }

    /// Left Jacobian `I + (1 - cos θ)/θ²·[v]× + (θ - sin θ)/θ³·[v]×²`.
    ///
    /// Maps tangent increments at the identity to increments of `exp(v)`, and is the
    /// `V` matrix of the SE(3) exponential.
    pub fn left_jacobian(v: DVec3) -> DMat3 {
        let theta_sq = v.length_squared();
        let theta = theta_sq.sqrt();

        let (b, c) = if theta < JACOBIAN_SMALL_ANGLE {
            (0.5 - theta_sq / 24.0, 1.0 / 6.0 - theta_sq / 120.0)
        } else {
            let half_sin = (0.5 * theta).sin();
            (
                2.0 * half_sin * half_sin / theta_sq,
                (theta - theta.sin()) / (theta_sq * theta),
            )
        };

        let skew = Self::hat(v);
        DMat3::IDENTITY + skew * b + skew * skew * c
    }

    /// Inverse of [`SO3::left_jacobian`], in closed form.
    pub fn left_jacobian_inverse(v: DVec3) -> DMat3 {
        let theta_sq = v.length_squared();
        let theta = theta_sq.sqrt();

        let d = if theta < JACOBIAN_SMALL_ANGLE {
            1.0 / 12.0 + theta_sq / 720.0
        } else {
            let half = 0.5 * theta;
            (1.0 - half / half.tan()) / theta_sq
        };

        let skew = Self::hat(v);
        DMat3::IDENTITY - skew * 0.5 + skew * skew * d
    }

    /// Right Jacobian, `J_r(v) = J_l(-v)`.
    pub fn right_jacobian(v: DVec3) -> DMat3 {
        Self::left_jacobian(-v)
    }

    /// Inverse of [`SO3::right_jacobian`].
    pub fn right_jacobian_inverse(v: DVec3) -> DMat3 {
        Self::left_jacobian_inverse(-v)
    }
}

impl Default for SO3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul<SO3> for SO3 {
    type Output = SO3;

    fn mul(self, rhs: SO3) -> SO3 {
        self.compose(&rhs)
    }
}

impl std::ops::MulAssign<SO3> for SO3 {
    fn mul_assign(&mut self, rhs: SO3) {
        *self = self.compose(&rhs);
    }
}

impl std::ops::Mul<DVec3> for SO3 {
    type Output = DVec3;

    fn mul(self, rhs: DVec3) -> DVec3 {
        self.transform(rhs)
    }
}

impl std::ops::Mul<&[[f64; 3]]> for SO3 {
    type Output = Vec<[f64; 3]>;

    fn mul(self, rhs: &[[f64; 3]]) -> Self::Output {
        self.transform_points(rhs)
    }
}

impl fmt::Display for SO3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&matrix::matrix_to_string("SO3", &matrix::rows3(&self.rotation)))
    }
}

#[cfg(feature = "approx")]
impl approx::AbsDiffEq for SO3 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        <f64 as approx::AbsDiffEq>::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.rotation.abs_diff_eq(other.rotation, epsilon)
    }
}

#[cfg(feature = "approx")]
impl approx::RelativeEq for SO3 {
    fn default_max_relative() -> f64 {
        <f64 as approx::RelativeEq>::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        let (lhs, rhs) = (self.rotation.to_cols_array(), other.rotation.to_cols_array());
        lhs.iter()
            .zip(rhs.iter())
            .all(|(a, b)| approx::RelativeEq::relative_eq(a, b, epsilon, max_relative))
    }
}

impl LieGroup for SO3 {
    const NAME: &'static str = "SO3";
    const DOF: usize = 3;
    const DIM: usize = 3;

    type Tangent = DVec3;
    type Point = DVec3;
    type Matrix = DMat3;

    fn from_matrix(mat: &DMat3) -> Result<Self, LieError> {
        SO3::from_matrix(mat)
    }

    fn matrix(&self) -> DMat3 {
        self.rotation
    }

    fn inverse(&self) -> Self {
        SO3::inverse(self)
    }

    fn compose(&self, other: &Self) -> Self {
        SO3::compose(self, other)
    }

    fn transform(&self, point: DVec3) -> DVec3 {
        SO3::transform(self, point)
    }

    fn exp(v: DVec3) -> Self {
        SO3::exp(v)
    }

    fn log(&self) -> DVec3 {
        SO3::log(self)
    }

    fn hat(v: DVec3) -> DMat3 {
        SO3::hat(v)
    }

    fn vee(omega: &DMat3) -> DVec3 {
        SO3::vee(omega)
    }

    fn tangent_from_slice(data: &[f64]) -> Result<DVec3, LieError> {
        Ok(DVec3::from_array(matrix::array_from_slice::<3>(data)?))
    }
}
