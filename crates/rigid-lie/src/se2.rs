use std::fmt;

use glam::{DMat2, DMat3, DVec2, DVec3};
use rand::Rng;

use crate::{matrix, LieError, LieGroup, SO2};

const SMALL_ANGLE: f64 = 1e-6;

/// Rigid transformation of the plane: a rotation followed by a translation.
///
/// Tangent vectors are ordered `[υx, υy, θ]`, translation part first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SE2 {
    rotation: SO2,
    translation: DVec2,
}

impl SE2 {
    /// The identity transformation.
    pub const IDENTITY: Self = Self {
        rotation: SO2::IDENTITY,
        translation: DVec2::ZERO,
    };

    /// Combines an already validated rotation with a translation.
    pub fn new(rotation: SO2, translation: DVec2) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Builds a transformation from a rotation matrix and a translation.
    pub fn from_rt(rotation: &DMat2, translation: DVec2) -> Result<Self, LieError> {
        Ok(Self::new(SO2::from_matrix(rotation)?, translation))
    }

    /// Validates a 3×3 homogeneous matrix.
    ///
    /// The bottom row must be `[0, 0, 1]` and the top-left block a rotation.
    pub fn from_matrix(mat: &DMat3) -> Result<Self, LieError> {
        matrix::check_bottom_row(&[mat.x_axis.z, mat.y_axis.z, mat.z_axis.z])?;
        let rotation = DMat2::from_cols(mat.x_axis.truncate(), mat.y_axis.truncate());
        Self::from_rt(&rotation, mat.z_axis.truncate())
    }

    /// Builds a transformation from 9 row-major values.
    pub fn from_row_slice(data: &[f64]) -> Result<Self, LieError> {
        Self::from_matrix(&matrix::dmat3_from_row_slice(data)?)
    }

    /// Builds a transformation from a flattened `2×3` row `[r00, r01, tx, r10, r11, ty]`.
    pub fn from_pose_row(row: &[f64; 6]) -> Result<Self, LieError> {
        let pose = Self::from_pose_row_unchecked(row);
        matrix::check_rotation2(&pose.rotation.matrix())?;
        Ok(pose)
    }

    pub(crate) fn from_pose_row_unchecked(row: &[f64; 6]) -> Self {
        let [r00, r01, tx, r10, r11, ty] = *row;
        Self {
            rotation: SO2::from_matrix_unchecked(&DMat2::from_cols(
                DVec2::new(r00, r10),
                DVec2::new(r01, r11),
            )),
            translation: DVec2::new(tx, ty),
        }
    }

    /// Flattened top `2×3` block of the homogeneous matrix.
    pub fn to_pose_row(&self) -> [f64; 6] {
        let [[r00, r01, tx], [r10, r11, ty]] = self.matrix2x3();
        [r00, r01, tx, r10, r11, ty]
    }

    /// Random rotation with a translation in `[0, 1)²`.
    pub fn from_random() -> Self {
        let mut rng = rand::rng();

        let x: f64 = rng.random();
        let y: f64 = rng.random();

        Self::new(SO2::from_random(), DVec2::new(x, y))
    }

    /// The 3×3 homogeneous matrix.
    pub fn matrix(&self) -> DMat3 {
        let r = self.rotation.matrix();
        DMat3::from_cols(
            r.x_axis.extend(0.0),
            r.y_axis.extend(0.0),
            self.translation.extend(1.0),
        )
    }

    /// Top two rows of the homogeneous matrix, `[R | t]`.
    pub fn matrix2x3(&self) -> [[f64; 3]; 2] {
        let r = self.rotation.matrix();
        let t = self.translation;
        [[r.x_axis.x, r.y_axis.x, t.x], [r.x_axis.y, r.y_axis.y, t.y]]
    }

    /// The 2×2 rotation block.
    pub fn rotation_matrix(&self) -> DMat2 {
        self.rotation.matrix()
    }

    /// The translation vector.
    pub fn translation(&self) -> DVec2 {
        self.translation
    }

    /// The rotation part as a group element.
    pub fn so2(&self) -> SO2 {
        self.rotation
    }

    /// Replaces the rotation. On error `self` is left unchanged.
    pub fn set_rotation_matrix(&mut self, rotation: &DMat2) -> Result<(), LieError> {
        self.rotation = SO2::from_matrix(rotation)?;
        Ok(())
    }

    /// Replaces the translation.
    pub fn set_translation(&mut self, translation: DVec2) {
        self.translation = translation;
    }

    /// Replaces the translation from a slice of exactly 2 values.
    pub fn set_translation_slice(&mut self, data: &[f64]) -> Result<(), LieError> {
        self.translation = DVec2::from_array(matrix::array_from_slice::<2>(data)?);
        Ok(())
    }

    /// `(R, t)⁻¹ = (Rᵀ, -Rᵀt)`.
    pub fn inverse(&self) -> Self {
        let r_inv = self.rotation.inverse();
        Self {
            rotation: r_inv,
            translation: r_inv * (-self.translation),
        }
    }

    /// Product `self ∘ other`.
    pub fn compose(&self, other: &Self) -> Self {
        Self {
            rotation: self.rotation * other.rotation,
            translation: self.rotation * other.translation + self.translation,
        }
    }

    /// Applies the transformation to a single point.
    pub fn transform(&self, point: DVec2) -> DVec2 {
        self.rotation * point + self.translation
    }

    /// Applies the transformation to every point of a `N×2` batch.
    pub fn transform_points(&self, points: &[[f64; 2]]) -> Vec<[f64; 2]> {
        points
            .iter()
            .map(|p| self.transform(DVec2::from_array(*p)).to_array())
            .collect()
    }

    /// Adjoint matrix acting on `[υx, υy, θ]`.
    pub fn adjoint(&self) -> DMat3 {
        let mut mat = self.matrix();
        mat.z_axis.x = self.translation.y; // matrix[0, 2] = t.y
        mat.z_axis.y = -self.translation.x; // matrix[1, 2] = -t.x
        mat
    }

    /// Lie algebra -> Lie group.
    pub fn exp(v: [f64; 3]) -> Self {
        let [ux, uy, theta] = v;
        let rotation = SO2::exp(theta);

        let (a, b) = if theta.abs() < SMALL_ANGLE {
            let theta_sq = theta * theta;
            (1.0 - theta_sq / 6.0, theta / 2.0 - theta * theta_sq / 24.0)
        } else {
            let half_sin = (0.5 * theta).sin();
            (theta.sin() / theta, 2.0 * half_sin * half_sin / theta)
        };

        Self {
            rotation,
            translation: DVec2::new(a * ux - b * uy, b * ux + a * uy),
        }
    }

    /// Lie group -> Lie algebra, `[υx, υy, θ]` with `θ ∈ (-π, π]`.
    pub fn log(&self) -> [f64; 3] {
        let theta = self.rotation.log();
        let half_theta = 0.5 * theta;

        let a = if theta.abs() < SMALL_ANGLE {
            1.0 - theta * theta / 12.0
        } else {
            half_theta / half_theta.tan()
        };

        let t = self.translation;
        [a * t.x + half_theta * t.y, a * t.y - half_theta * t.x, theta]
    }

    /// `[υx, υy, θ]` to `[[0, -θ, υx], [θ, 0, υy], [0, 0, 0]]`.
    pub fn hat(v: [f64; 3]) -> DMat3 {
        let [ux, uy, theta] = v;
        let hat_theta = SO2::hat(theta);
        DMat3::from_cols(
            hat_theta.x_axis.extend(0.0),
            hat_theta.y_axis.extend(0.0),
            DVec3::new(ux, uy, 0.0),
        )
    }

    /// Inverse of [`SE2::hat`].
    pub fn vee(omega: &DMat3) -> [f64; 3] {
        [omega.z_axis.x, omega.z_axis.y, omega.x_axis.y]
    }
}

impl Default for SE2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul<SE2> for SE2 {
    type Output = SE2;

    fn mul(self, rhs: SE2) -> SE2 {
        self.compose(&rhs)
    }
}

impl std::ops::MulAssign<SE2> for SE2 {
    fn mul_assign(&mut self, rhs: SE2) {
        *self = self.compose(&rhs);
    }
}

impl std::ops::Mul<DVec2> for SE2 {
    type Output = DVec2;

    fn mul(self, rhs: DVec2) -> DVec2 {
        self.transform(rhs)
    }
}

impl std::ops::Mul<&[[f64; 2]]> for SE2 {
    type Output = Vec<[f64; 2]>;

    fn mul(self, rhs: &[[f64; 2]]) -> Self::Output {
        self.transform_points(rhs)
    }
}

impl fmt::Display for SE2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&matrix::matrix_to_string("SE2", &matrix::rows3(&self.matrix())))
    }
}

#[cfg(feature = "approx")]
impl approx::AbsDiffEq for SE2 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        <f64 as approx::AbsDiffEq>::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.matrix().abs_diff_eq(other.matrix(), epsilon)
    }
}

#[cfg(feature = "approx")]
impl approx::RelativeEq for SE2 {
    fn default_max_relative() -> f64 {
        <f64 as approx::RelativeEq>::default_max_relative()
    }

    fn relative_eq(&self, other: &Self, epsilon: f64, max_relative: f64) -> bool {
        approx::RelativeEq::relative_eq(&self.rotation, &other.rotation, epsilon, max_relative)
            && self
                .translation
                .to_array()
                .iter()
                .zip(other.translation.to_array().iter())
                .all(|(a, b)| approx::RelativeEq::relative_eq(a, b, epsilon, max_relative))
    }
}

impl LieGroup for SE2 {
    const NAME: &'static str = "SE2";
    const DOF: usize = 3;
    const DIM: usize = 3;

    type Tangent = [f64; 3];
    type Point = DVec2;
    type Matrix = DMat3;

    fn from_matrix(mat: &DMat3) -> Result<Self, LieError> {
        SE2::from_matrix(mat)
    }

    fn matrix(&self) -> DMat3 {
        SE2::matrix(self)
    }

    fn inverse(&self) -> Self {
        SE2::inverse(self)
    }

    fn compose(&self, other: &Self) -> Self {
        SE2::compose(self, other)
    }

    fn transform(&self, point: DVec2) -> DVec2 {
        SE2::transform(self, point)
    }

    fn exp(v: [f64; 3]) -> Self {
        SE2::exp(v)
    }

    fn log(&self) -> [f64; 3] {
        SE2::log(self)
    }

    fn hat(v: [f64; 3]) -> DMat3 {
        SE2::hat(v)
    }

    fn vee(omega: &DMat3) -> [f64; 3] {
        SE2::vee(omega)
    }

    fn tangent_from_slice(data: &[f64]) -> Result<[f64; 3], LieError> {
        matrix::array_from_slice::<3>(data)
    }
}
