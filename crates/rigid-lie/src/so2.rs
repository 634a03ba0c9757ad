use std::fmt;

use glam::{DMat2, DVec2};
use rand::Rng;
use rigid_linalg::to_orthogonal2;

use crate::{matrix, LieError, LieGroup};

/// Rotation in the plane, stored as a 2×2 rotation matrix.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SO2 {
    rotation: DMat2,
}

impl SO2 {
    /// The identity rotation.
    pub const IDENTITY: Self = Self {
        rotation: DMat2::IDENTITY,
    };

    /// Wraps a rotation matrix after checking it is orthogonal with determinant `+1`.
    pub fn from_matrix(mat: &DMat2) -> Result<Self, LieError> {
        matrix::check_rotation2(mat)?;
        Ok(Self { rotation: *mat })
    }

    /// Wraps a matrix without any check.
    ///
    /// The caller guarantees `mat` is a rotation; nothing downstream re-validates it.
    pub fn from_matrix_unchecked(mat: &DMat2) -> Self {
        Self { rotation: *mat }
    }

    /// Projects `mat` onto the closest rotation and wraps the result.
    pub fn from_matrix_orthogonalized(mat: &DMat2) -> Self {
        if let Err(err) = matrix::check_rotation2(mat) {
            log::debug!("SO2: orthogonalizing input matrix ({err})");
        }
        Self {
            rotation: to_orthogonal2(mat),
        }
    }

    /// Builds a rotation from 4 row-major values.
    pub fn from_row_slice(data: &[f64]) -> Result<Self, LieError> {
        Self::from_matrix(&matrix::dmat2_from_row_slice(data)?)
    }

    /// Uniformly distributed random rotation.
    pub fn from_random() -> Self {
        let mut rng = rand::rng();
        let theta: f64 = rng.random_range(-std::f64::consts::PI..std::f64::consts::PI);
        Self::exp(theta)
    }

    /// The 2×2 rotation matrix.
    pub fn matrix(&self) -> DMat2 {
        self.rotation
    }

    /// Replaces the rotation, leaving `self` untouched when `mat` is not a rotation.
    pub fn set_matrix(&mut self, mat: &DMat2) -> Result<(), LieError> {
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
    pub fn transform(&self, point: DVec2) -> DVec2 {
        self.rotation * point
    }

    /// Rotates every point of a `N×2` batch.
    pub fn transform_points(&self, points: &[[f64; 2]]) -> Vec<[f64; 2]> {
        points
            .iter()
            .map(|p| self.transform(DVec2::from_array(*p)).to_array())
            .collect()
    }

    /// Rotation by `theta` radians.
    pub fn exp(theta: f64) -> Self {
        let (sin_theta, cos_theta) = theta.sin_cos();
        Self {
            rotation: DMat2::from_cols(
                DVec2::new(cos_theta, sin_theta),
                DVec2::new(-sin_theta, cos_theta),
            ),
        }
    }

    /// Rotation angle in `(-π, π]`.
    pub fn log(&self) -> f64 {
        self.rotation.x_axis.y.atan2(self.rotation.x_axis.x)
    }

    /// Skew-symmetric matrix `[[0, -θ], [θ, 0]]`.
    pub fn hat(theta: f64) -> DMat2 {
        DMat2::from_cols(DVec2::new(0.0, theta), DVec2::new(-theta, 0.0))
    }

    /// Inverse of [`SO2::hat`].
    pub fn vee(omega: &DMat2) -> f64 {
        omega.x_axis.y
    }

    /// The adjoint of a planar rotation is the scalar `1`.
    pub fn adjoint(&self) -> f64 {
        1.0
    }
}

impl Default for SO2 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul<SO2> for SO2 {
    type Output = SO2;

    fn mul(self, rhs: SO2) -> SO2 {
        self.compose(&rhs)
    }
}

impl std::ops::MulAssign<SO2> for SO2 {
    fn mul_assign(&mut self, rhs: SO2) {
        *self = self.compose(&rhs);
    }
}

impl std::ops::Mul<DVec2> for SO2 {
    type Output = DVec2;

    fn mul(self, rhs: DVec2) -> DVec2 {
        self.transform(rhs)
    }
}

impl std::ops::Mul<&[[f64; 2]]> for SO2 {
    type Output = Vec<[f64; 2]>;

    fn mul(self, rhs: &[[f64; 2]]) -> Self::Output {
        self.transform_points(rhs)
    }
}

impl fmt::Display for SO2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&matrix::matrix_to_string("SO2", &matrix::rows2(&self.rotation)))
    }
}

#[cfg(feature = "approx")]
impl approx::AbsDiffEq for SO2 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        <f64 as approx::AbsDiffEq>::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.rotation.abs_diff_eq(other.rotation, epsilon)
    }
}

#[cfg(feature = "approx")]
impl approx::RelativeEq for SO2 {
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

impl LieGroup for SO2 {
    const NAME: &'static str = "SO2";
    const DOF: usize = 1;
    const DIM: usize = 2;

    type Tangent = f64;
    type Point = DVec2;
    type Matrix = DMat2;

    fn from_matrix(mat: &DMat2) -> Result<Self, LieError> {
        SO2::from_matrix(mat)
    }

    fn matrix(&self) -> DMat2 {
        self.rotation
    }

    fn inverse(&self) -> Self {
        SO2::inverse(self)
    }

    fn compose(&self, other: &Self) -> Self {
        SO2::compose(self, other)
    }

    fn transform(&self, point: DVec2) -> DVec2 {
        SO2::transform(self, point)
    }

    fn exp(theta: f64) -> Self {
        SO2::exp(theta)
    }

    fn log(&self) -> f64 {
        SO2::log(self)
    }

    fn hat(theta: f64) -> DMat2 {
        SO2::hat(theta)
    }

    fn vee(omega: &DMat2) -> f64 {
        SO2::vee(omega)
    }

    fn tangent_from_slice(data: &[f64]) -> Result<f64, LieError> {
        let [theta] = matrix::array_from_slice::<1>(data)?;
        Ok(theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use std::f64::consts::{FRAC_PI_2, PI};

    const EPSILON: f64 = 1e-12;

    #[test]
    fn test_identity() {
        let r = SO2::default();
        assert_eq!(r.matrix(), DMat2::IDENTITY);
        assert_eq!(r.log(), 0.0);
        assert_eq!(r.to_string(), "SO2([[1, 0],\n     [0, 1]])");
    }

    #[test]
    fn test_exp_log() {
        for theta in [0.0, 0.3, -1.2, FRAC_PI_2, 3.0, -3.0] {
            assert_relative_eq!(SO2::exp(theta).log(), theta, epsilon = EPSILON);
        }
        assert_relative_eq!(SO2::exp(PI).log(), PI, epsilon = EPSILON);
        // wraps into (-π, π]
        assert_relative_eq!(SO2::exp(1.5 * PI).log(), -0.5 * PI, epsilon = EPSILON);
    }

    #[test]
    fn test_inverse() {
        let r = SO2::exp(0.7);
        assert_eq!(r.inverse().matrix(), r.matrix().transpose());
        assert!((r * r.inverse()).matrix().abs_diff_eq(DMat2::IDENTITY, EPSILON));
    }

    #[test]
    fn test_compose_adds_angles() {
        let mut r = SO2::exp(0.2);
        r *= SO2::exp(0.5);
        assert_relative_eq!(r.log(), 0.7, epsilon = EPSILON);
    }

    #[test]
    fn test_transform() {
        let r = SO2::exp(FRAC_PI_2);
        let p = r * DVec2::new(1.0, 0.0);
        assert_relative_eq!(p.x, 0.0, epsilon = EPSILON);
        assert_relative_eq!(p.y, 1.0, epsilon = EPSILON);

        let points = [[1.0, 0.0], [0.0, 2.0]];
        let out = r * &points[..];
        assert_eq!(out.len(), 2);
        assert_relative_eq!(out[1][0], -2.0, epsilon = EPSILON);
        assert_relative_eq!(out[1][1], 0.0, epsilon = EPSILON);
    }

    #[test]
    fn test_hat_vee() {
        let omega = SO2::hat(0.4);
        assert_eq!(omega, DMat2::from_cols(DVec2::new(0.0, 0.4), DVec2::new(-0.4, 0.0)));
        assert_eq!(SO2::vee(&omega), 0.4);
        assert_eq!(SO2::exp(0.4).adjoint(), 1.0);
    }

    #[test]
    fn test_from_matrix_validation() {
        assert!(SO2::from_row_slice(&[0.0, -1.0, 1.0, 0.0]).is_ok());
        assert!(matches!(
            SO2::from_row_slice(&[1.0, 0.1, 0.0, 1.0]),
            Err(LieError::NotOrthogonal { .. })
        ));
        assert!(matches!(
            SO2::from_row_slice(&[1.0, 0.0, 0.0, -1.0]),
            Err(LieError::NotProperRotation { .. })
        ));
        assert!(matches!(
            SO2::from_row_slice(&[1.0, 0.0, 0.0]),
            Err(LieError::InvalidShape { .. })
        ));
    }

    #[test]
    fn test_from_matrix_orthogonalized() {
        let m = DMat2::from_cols(DVec2::new(1.0, 0.0), DVec2::new(1e-3, 1.0));
        let r = SO2::from_matrix_orthogonalized(&m);
        assert!(SO2::from_matrix(&r.matrix()).is_ok());
    }

    #[test]
    fn test_set_matrix_keeps_state_on_error() {
        let mut r = SO2::exp(0.3);
        let before = r;
        let shear = DMat2::from_cols(DVec2::new(1.0, 0.0), DVec2::new(0.5, 1.0));
        assert!(r.set_matrix(&shear).is_err());
        assert_eq!(r, before);
        assert!(r.set_matrix(&SO2::exp(1.0).matrix()).is_ok());
        assert_relative_eq!(r.log(), 1.0, epsilon = EPSILON);
    }

    #[test]
    fn test_random_is_rotation() {
        for _ in 0..20 {
            assert!(SO2::from_matrix(&SO2::from_random().matrix()).is_ok());
        }
    }

    #[cfg(feature = "approx")]
    #[test]
    fn test_approx() {
        let r = SO2::exp(0.4);
        approx::assert_abs_diff_eq!(r * SO2::IDENTITY, r, epsilon = EPSILON);
        approx::assert_relative_eq!(r * r.inverse(), SO2::IDENTITY, epsilon = EPSILON);
        assert!(approx::AbsDiffEq::abs_diff_ne(&r, &SO2::IDENTITY, EPSILON));
    }
}
