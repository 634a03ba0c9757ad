use std::fmt;

use glam::{DMat3, DMat4, DVec3, DVec4};
use rand::Rng;

use crate::{matrix, LieError, LieGroup, SO3};

/// Rigid transformation in 3D space: a rotation followed by a translation.
///
/// Tangent vectors are ordered `[υx, υy, υz, ωx, ωy, ωz]`, translation part first.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SE3 {
    rotation: SO3,
    translation: DVec3,
}

impl SE3 {
    /// The identity transformation.
    pub const IDENTITY: Self = Self {
        rotation: SO3::IDENTITY,
        translation: DVec3::ZERO,
    };

    /// Combines an already validated rotation with a translation.
    pub fn new(rotation: SO3, translation: DVec3) -> Self {
        Self {
            rotation,
            translation,
        }
    }

    /// Builds a transformation from a rotation matrix and a translation.
    pub fn from_rt(rotation: &DMat3, translation: DVec3) -> Result<Self, LieError> {
        Ok(Self::new(SO3::from_matrix(rotation)?, translation))
    }

    /// Validates a 4×4 homogeneous matrix.
    ///
    /// # Errors
    ///
    /// [`LieError::NotAffine`] when the bottom row is not `[0, 0, 0, 1]`, then the
    /// rotation errors of [`SO3::from_matrix`] for the top-left block.
    pub fn from_matrix(mat: &DMat4) -> Result<Self, LieError> {
        matrix::check_bottom_row(&[mat.x_axis.w, mat.y_axis.w, mat.z_axis.w, mat.w_axis.w])?;
        Self::from_rt(&DMat3::from_mat4(*mat), mat.w_axis.truncate())
    }

    /// Builds a transformation from 16 row-major values.
    pub fn from_row_slice(data: &[f64]) -> Result<Self, LieError> {
        Self::from_matrix(&matrix::dmat4_from_row_slice(data)?)
    }

    /// Builds a transformation from a flattened `3×4` row
    /// `[r00, r01, r02, tx, r10, r11, r12, ty, r20, r21, r22, tz]`.
    pub fn from_pose_row(row: &[f64; 12]) -> Result<Self, LieError> {
        let pose = Self::from_pose_row_unchecked(row);
        matrix::check_rotation3(&pose.rotation.matrix())?;
        Ok(pose)
    }

    pub(crate) fn from_pose_row_unchecked(row: &[f64; 12]) -> Self {
        let [r00, r01, r02, tx, r10, r11, r12, ty, r20, r21, r22, tz] = *row;
        let rotation = DMat3::from_cols(
            DVec3::new(r00, r10, r20),
            DVec3::new(r01, r11, r21),
            DVec3::new(r02, r12, r22),
        );
        Self {
            rotation: SO3::from_matrix_unchecked(&rotation),
            translation: DVec3::new(tx, ty, tz),
        }
    }

    /// Flattened top `3×4` block of the homogeneous matrix.
    pub fn to_pose_row(&self) -> [f64; 12] {
        let [r0, r1, r2] = self.matrix3x4();
        [
            r0[0], r0[1], r0[2], r0[3], //
            r1[0], r1[1], r1[2], r1[3], //
            r2[0], r2[1], r2[2], r2[3], //
        ]
    }

    /// Random rotation with a translation in `[0, 1)³`.
    pub fn from_random() -> Self {
        let mut rng = rand::rng();

        let x: f64 = rng.random();
        let y: f64 = rng.random();
        let z: f64 = rng.random();

        Self::new(SO3::from_random(), DVec3::new(x, y, z))
    }

    /// The 4×4 homogeneous matrix.
    pub fn matrix(&self) -> DMat4 {
        let r = self.rotation.matrix();
        DMat4::from_cols(
            r.x_axis.extend(0.0),
            r.y_axis.extend(0.0),
            r.z_axis.extend(0.0),
            self.translation.extend(1.0),
        )
    }

    /// Top three rows of the homogeneous matrix, `[R | t]`.
    pub fn matrix3x4(&self) -> [[f64; 4]; 3] {
        let [r0, r1, r2] = matrix::rows3(&self.rotation.matrix());
        let t = self.translation;
        [
            [r0[0], r0[1], r0[2], t.x],
            [r1[0], r1[1], r1[2], t.y],
            [r2[0], r2[1], r2[2], t.z],
        ]
    }

    /// The 3×3 rotation block.
    pub fn rotation_matrix(&self) -> DMat3 {
        self.rotation.matrix()
    }

    /// The translation vector.
    pub fn translation(&self) -> DVec3 {
        self.translation
    }

    /// The rotation part as a group element.
    pub fn so3(&self) -> SO3 {
        self.rotation
    }

    /// Replaces the rotation. On error `self` is left unchanged.
    pub fn set_rotation_matrix(&mut self, rotation: &DMat3) -> Result<(), LieError> {
        self.rotation = SO3::from_matrix(rotation)?;
        Ok(())
    }

    /// Replaces the translation.
    pub fn set_translation(&mut self, translation: DVec3) {
        self.translation = translation;
    }

    /// Replaces the translation from a slice of exactly 3 values.
    pub fn set_translation_slice(&mut self, data: &[f64]) -> Result<(), LieError> {
        self.translation = DVec3::from_array(matrix::array_from_slice::<3>(data)?);
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
    pub fn transform(&self, point: DVec3) -> DVec3 {
        self.rotation * point + self.translation
    }

    /// Applies the transformation to every point of a `N×3` batch.
    pub fn transform_points(&self, points: &[[f64; 3]]) -> Vec<[f64; 3]> {
        points
            .iter()
            .map(|p| self.transform(DVec3::from_array(*p)).to_array())
            .collect()
    }

    /// Row-major 6×6 adjoint `[[R, [t]×R], [0, R]]`.
    pub fn adjoint(&self) -> [[f64; 6]; 6] {
        let r = self.rotation.matrix();
        let tr = SO3::hat(self.translation) * r;
        let (r_rows, tr_rows) = (matrix::rows3(&r), matrix::rows3(&tr));

        let mut adj = [[0.0; 6]; 6];
        for i in 0..3 {
            adj[i][..3].copy_from_slice(&r_rows[i]);
            adj[i][3..].copy_from_slice(&tr_rows[i]);
            adj[i + 3][3..].copy_from_slice(&r_rows[i]);
        }
        adj
    }

    /// Lie algebra -> Lie group.
    pub fn exp(v: [f64; 6]) -> Self {
        let upsilon = DVec3::new(v[0], v[1], v[2]);
        let omega = DVec3::new(v[3], v[4], v[5]);

        Self {
            rotation: SO3::exp(omega),
            translation: SO3::left_jacobian(omega) * upsilon,
        }
    }

    /// Lie group -> Lie algebra.
    pub fn log(&self) -> [f64; 6] {
        let omega = self.rotation.log();
        let upsilon = SO3::left_jacobian_inverse(omega) * self.translation;
        [upsilon.x, upsilon.y, upsilon.z, omega.x, omega.y, omega.z]
    }

    /// Vector space -> Lie algebra, `[[[ω]×, υ], [0, 0]]`.
    pub fn hat(v: [f64; 6]) -> DMat4 {
        let skew = SO3::hat(DVec3::new(v[3], v[4], v[5]));
        DMat4::from_cols(
            skew.x_axis.extend(0.0),
            skew.y_axis.extend(0.0),
            skew.z_axis.extend(0.0),
            DVec4::new(v[0], v[1], v[2], 0.0),
        )
    }

    /// Lie algebra -> vector space.
    pub fn vee(omega: &DMat4) -> [f64; 6] {
        let w = SO3::vee(&DMat3::from_mat4(*omega));
        [omega.w_axis.x, omega.w_axis.y, omega.w_axis.z, w.x, w.y, w.z]
    }
}

impl Default for SE3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl std::ops::Mul<SE3> for SE3 {
    type Output = SE3;

    fn mul(self, rhs: SE3) -> SE3 {
        self.compose(&rhs)
    }
}

impl std::ops::MulAssign<SE3> for SE3 {
    fn mul_assign(&mut self, rhs: SE3) {
        *self = self.compose(&rhs);
    }
}

impl std::ops::Mul<DVec3> for SE3 {
    type Output = DVec3;

    fn mul(self, rhs: DVec3) -> DVec3 {
        self.transform(rhs)
    }
}

impl std::ops::Mul<&[[f64; 3]]> for SE3 {
    type Output = Vec<[f64; 3]>;

    fn mul(self, rhs: &[[f64; 3]]) -> Self::Output {
        self.transform_points(rhs)
    }
}

impl fmt::Display for SE3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&matrix::matrix_to_string("SE3", &matrix::rows4(&self.matrix())))
    }
}

#[cfg(feature = "approx")]
impl approx::AbsDiffEq for SE3 {
    type Epsilon = f64;

    fn default_epsilon() -> f64 {
        <f64 as approx::AbsDiffEq>::default_epsilon()
    }

    fn abs_diff_eq(&self, other: &Self, epsilon: f64) -> bool {
        self.matrix().abs_diff_eq(other.matrix(), epsilon)
    }
}

#[cfg(feature = "approx")]
impl approx::RelativeEq for SE3 {
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

impl LieGroup for SE3 {
    const NAME: &'static str = "SE3";
    const DOF: usize = 6;
    const DIM: usize = 4;

    type Tangent = [f64; 6];
    type Point = DVec3;
    type Matrix = DMat4;

    fn from_matrix(mat: &DMat4) -> Result<Self, LieError> {
        SE3::from_matrix(mat)
    }

    fn matrix(&self) -> DMat4 {
        SE3::matrix(self)
    }

    fn inverse(&self) -> Self {
        SE3::inverse(self)
    }

    fn compose(&self, other: &Self) -> Self {
        SE3::compose(self, other)
    }

    fn transform(&self, point: DVec3) -> DVec3 {
        SE3::transform(self, point)
    }

    fn exp(v: [f64; 6]) -> Self {
        SE3::exp(v)
    }

    fn log(&self) -> [f64; 6] {
        SE3::log(self)
    }

    fn hat(v: [f64; 6]) -> DMat4 {
        SE3::hat(v)
    }

    fn vee(omega: &DMat4) -> [f64; 6] {
        SE3::vee(omega)
    }

    fn tangent_from_slice(data: &[f64]) -> Result<[f64; 6], LieError> {
        matrix::array_from_slice::<6>(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    const EPSILON: f64 = 1e-9;

    fn make_random_tangent() -> [f64; 6] {
        let mut rng = rand::rng();
        let mut v = [0.0; 6];
        for x in v[..3].iter_mut() {
            *x = rng.random_range(-10.0..10.0);
        }
        for x in v[3..].iter_mut() {
            *x = rng.random_range(-1.5..1.5);
        }
        v
    }

    fn reference_pose() -> [f64; 16] {
        [
            -0.02495988040066277,
            0.01720436961811805,
            0.9995404014027787,
            -1103.428193030075,
            0.06813350186490005,
            0.997556284701166,
            -0.01546883243273596,
            -35.93298768047541,
            -0.9973639407428014,
            0.06771608759556018,
            -0.02607107950853105,
            798.7780129474496,
            0.0,
            0.0,
            0.0,
            1.0,
        ]
    }

    fn assert_slice_eq(a: &[f64], b: &[f64], epsilon: f64) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b.iter()) {
            assert_relative_eq!(x, y, epsilon = epsilon);
        }
    }

    #[test]
    fn test_identity() {
        let t = SE3::default();
        assert_eq!(t.matrix(), DMat4::IDENTITY);
        assert_eq!(t.log(), [0.0; 6]);
        assert_eq!(
            t.to_string(),
            "SE3([[1, 0, 0, 0],\n     [0, 1, 0, 0],\n     [0, 0, 1, 0],\n     [0, 0, 0, 1]])"
        );
    }

    #[test]
    fn test_from_row_slice_reference() -> Result<(), LieError> {
        let data = reference_pose();
        let t = SE3::from_row_slice(&data)?;
        assert_eq!(
            t.translation(),
            DVec3::new(-1103.428193030075, -35.93298768047541, 798.7780129474496)
        );
        assert_slice_eq(&t.to_pose_row(), &data[..12], 0.0);
        assert_slice_eq(
            &t.so3().log().to_array(),
            &[0.06646925, 1.59563459, 0.04069513],
            1e-7,
        );
        Ok(())
    }

    #[test]
    fn test_inverse_reference() -> Result<(), LieError> {
        let t = SE3::from_row_slice(&reference_pose())?;
        let inv = t.inverse();

        assert_eq!(inv.rotation_matrix(), t.rotation_matrix().transpose());
        let expected_t = -(t.rotation_matrix().transpose() * t.translation());
        assert_slice_eq(&inv.translation().to_array(), &expected_t.to_array(), 1e-9);

        assert!((t * inv).matrix().abs_diff_eq(DMat4::IDENTITY, 1e-9));
        assert!((inv * t).matrix().abs_diff_eq(DMat4::IDENTITY, 1e-9));
        Ok(())
    }

    #[test]
    fn test_from_matrix_validation() {
        let mut data = reference_pose();
        data[13] = 0.1;
        assert!(matches!(
            SE3::from_row_slice(&data),
            Err(LieError::NotAffine(row)) if row == vec![0.0, 0.1, 0.0, 1.0]
        ));

        let mut data = reference_pose();
        data[0] += 1e-3;
        assert!(matches!(
            SE3::from_row_slice(&data),
            Err(LieError::NotOrthogonal { .. })
        ));

        let mut flipped = DMat4::IDENTITY;
        flipped.z_axis.z = -1.0;
        assert!(matches!(
            SE3::from_matrix(&flipped),
            Err(LieError::NotProperRotation { .. })
        ));

        assert!(matches!(
            SE3::from_row_slice(&[0.0; 12]),
            Err(LieError::InvalidShape {
                expected_rows: 4,
                expected_cols: 4,
                len: 12
            })
        ));
    }

    #[test]
    fn test_pose_row() -> Result<(), LieError> {
        let t = SE3::from_random();
        let row = t.to_pose_row();
        assert_eq!(SE3::from_pose_row(&row)?, t);
        assert_eq!(t.matrix3x4()[2][3], t.translation().z);

        let mut bad = row;
        bad[0] = 3.0;
        assert!(SE3::from_pose_row(&bad).is_err());
        Ok(())
    }

    #[test]
    fn test_compose() {
        for _ in 0..20 {
            let (a, b) = (SE3::from_random(), SE3::from_random());
            assert!((a * b).matrix().abs_diff_eq(a.matrix() * b.matrix(), EPSILON));
        }

        let (a, b, c) = (SE3::from_random(), SE3::from_random(), SE3::from_random());
        assert!(((a * b) * c).matrix().abs_diff_eq((a * (b * c)).matrix(), EPSILON));

        let mut d = a;
        d *= b;
        assert_eq!(d, a * b);
    }

    #[test]
    fn test_transform() {
        let t = SE3::new(
            SO3::exp(DVec3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2)),
            DVec3::new(1.0, 2.0, 3.0),
        );
        let out = t * &[[1.0, -1.0, 1.0], [2.0, 3.0, 4.0]][..];
        assert_slice_eq(&out[0], &[2.0, 3.0, 4.0], EPSILON);
        assert_slice_eq(&out[1], &[-2.0, 4.0, 7.0], EPSILON);

        let p = DVec3::new(0.5, -0.5, 2.0);
        let homogeneous = t.matrix() * p.extend(1.0);
        assert!((t * p).abs_diff_eq(homogeneous.truncate(), EPSILON));
    }

    #[test]
    fn test_exp_log() {
        for _ in 0..50 {
            let v = make_random_tangent();
            assert_slice_eq(&SE3::exp(v).log(), &v, EPSILON);
        }

        for _ in 0..20 {
            let t = SE3::from_random();
            assert!(SE3::exp(t.log()).matrix().abs_diff_eq(t.matrix(), EPSILON));
        }

        let t = SE3::exp([1.0, 2.0, 3.0, 0.0, 0.0, 0.0]);
        assert_eq!(t.translation(), DVec3::new(1.0, 2.0, 3.0));
        assert_eq!(t.rotation_matrix(), DMat3::IDENTITY);
    }

    #[test]
    fn test_exp_log_near_pi() {
        let axis = DVec3::new(1.0, 2.0, -2.0) / 3.0;
        let pi = std::f64::consts::PI;
        for theta in [pi, pi - 1e-9, pi - 1e-6, pi - 1e-3] {
            let w = axis * theta;
            let v = [0.5, -1.0, 2.0, w.x, w.y, w.z];
            let t = SE3::exp(v);
            let u = t.log();
            assert!(u.iter().all(|x| x.is_finite()));
            assert!(SE3::exp(u).matrix().abs_diff_eq(t.matrix(), EPSILON));
        }
    }

    #[test]
    fn test_exp_log_small_angle() {
        let v = [0.3, -0.2, 0.1, 1e-9, 2e-9, -1e-9];
        assert_slice_eq(&SE3::exp(v).log(), &v, 1e-12);
    }

    #[test]
    fn test_hat_vee() {
        let v = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let omega = SE3::hat(v);
        assert_eq!(omega.w_axis, DVec4::new(1.0, 2.0, 3.0, 0.0));
        assert_eq!(DMat3::from_mat4(omega), SO3::hat(DVec3::new(4.0, 5.0, 6.0)));
        assert_eq!(omega.row(3), DVec4::ZERO);
        assert_eq!(SE3::vee(&omega), v);
    }

    #[test]
    fn test_adjoint() {
        for _ in 0..10 {
            let t = SE3::from_random();
            let v = make_random_tangent();
            let adj = t.adjoint();

            let mut ad_v = [0.0; 6];
            for (i, row) in adj.iter().enumerate() {
                ad_v[i] = row.iter().zip(v.iter()).map(|(a, b)| a * b).sum();
            }

            // T·exp(v)·T⁻¹ = exp(Ad·v)
            let lhs = t * SE3::exp(v) * t.inverse();
            let rhs = SE3::exp(ad_v);
            assert!(lhs.matrix().abs_diff_eq(rhs.matrix(), 1e-8));
        }

        let adj = SE3::IDENTITY.adjoint();
        for (i, row) in adj.iter().enumerate() {
            for (j, value) in row.iter().enumerate() {
                assert_eq!(*value, if i == j { 1.0 } else { 0.0 });
            }
        }
    }

    #[test]
    fn test_setters() -> Result<(), LieError> {
        let mut t = SE3::from_row_slice(&reference_pose())?;
        let before = t;

        let mut bad = DMat3::IDENTITY;
        bad.x_axis.x = 2.0;
        assert!(t.set_rotation_matrix(&bad).is_err());
        assert_eq!(t, before);

        t.set_rotation_matrix(&DMat3::IDENTITY)?;
        assert_eq!(t.rotation_matrix(), DMat3::IDENTITY);
        assert_eq!(t.translation(), before.translation());

        assert!(t.set_translation_slice(&[1.0, 2.0]).is_err());
        t.set_translation_slice(&[1.0, 2.0, 3.0])?;
        assert_eq!(t.translation(), DVec3::new(1.0, 2.0, 3.0));

        t.set_translation(DVec3::ZERO);
        assert_eq!(t, SE3::IDENTITY);
        Ok(())
    }

    #[cfg(feature = "approx")]
    #[test]
    fn test_approx() {
        let t = SE3::from_random();
        approx::assert_relative_eq!(t * t.inverse(), SE3::IDENTITY, epsilon = EPSILON);
    }
}
