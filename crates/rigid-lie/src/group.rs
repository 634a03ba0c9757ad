use std::fmt;

use crate::LieError;

/// Operations shared by all the rigid transformation groups.
///
/// The inherent methods of [`SO2`](crate::SO2), [`SO3`](crate::SO3), [`SE2`](crate::SE2)
/// and [`SE3`](crate::SE3) are the primary API; this trait exposes the same operations
/// to generic code, e.g. batch processing or optimizers working on any manifold.
pub trait LieGroup: Copy + Default + PartialEq + fmt::Debug + fmt::Display + Send + Sync {
    /// Short name used when printing, e.g. `"SO3"`.
    const NAME: &'static str;
    /// Degrees of freedom, i.e. the dimension of the tangent space.
    const DOF: usize;
    /// Side of the square matrix representation.
    const DIM: usize;

    /// Tangent vector type.
    type Tangent: Copy + fmt::Debug;
    /// Point type the group acts on.
    type Point: Copy + fmt::Debug;
    /// Matrix representation, also used for Lie algebra elements.
    type Matrix: Copy + fmt::Debug;

    /// The identity element.
    fn identity() -> Self {
        Self::default()
    }

    /// Validates and wraps a matrix.
    fn from_matrix(mat: &Self::Matrix) -> Result<Self, LieError>;

    /// Matrix representation of the element.
    fn matrix(&self) -> Self::Matrix;

    /// Group inverse.
    fn inverse(&self) -> Self;

    /// Group product `self ∘ other`.
    fn compose(&self, other: &Self) -> Self;

    /// Group action on a single point.
    fn transform(&self, point: Self::Point) -> Self::Point;

    /// Exponential map from the tangent space.
    fn exp(tangent: Self::Tangent) -> Self;

    /// Logarithmic map to the tangent space.
    fn log(&self) -> Self::Tangent;

    /// Tangent vector to Lie algebra matrix.
    fn hat(tangent: Self::Tangent) -> Self::Matrix;

    /// Lie algebra matrix to tangent vector.
    fn vee(mat: &Self::Matrix) -> Self::Tangent;

    /// Reads a tangent vector from a slice of exactly [`Self::DOF`] values.
    fn tangent_from_slice(data: &[f64]) -> Result<Self::Tangent, LieError>;

    /// [`exp`](Self::exp) on an untyped slice.
    fn exp_slice(data: &[f64]) -> Result<Self, LieError> {
        Ok(Self::exp(Self::tangent_from_slice(data)?))
    }

    /// [`hat`](Self::hat) on an untyped slice.
    fn hat_slice(data: &[f64]) -> Result<Self::Matrix, LieError> {
        Ok(Self::hat(Self::tangent_from_slice(data)?))
    }

    /// Right plus: `self ∘ exp(tau)`.
    fn rplus(&self, tau: Self::Tangent) -> Self {
        self.compose(&Self::exp(tau))
    }

    /// Right minus: `log(self⁻¹ ∘ other)`.
    fn rminus(&self, other: &Self) -> Self::Tangent {
        self.inverse().compose(other).log()
    }
}

/// Overwrites `dst` with the value of `src`.
///
/// Both sides have the same group type, checked at compile time. See
/// [`AnyGroup::copy_from`](crate::AnyGroup::copy_from) for the runtime-typed variant.
pub fn copy_to<G: LieGroup>(dst: &mut G, src: &G) {
    *dst = *src;
}
