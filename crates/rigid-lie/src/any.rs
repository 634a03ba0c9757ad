use std::fmt;

use crate::{matrix, LieError, LieGroup, SE2, SE3, SO2, SO3};

/// A group element whose type is only known at runtime.
///
/// Useful at dynamically typed boundaries, e.g. when elements are loaded from a
/// heterogeneous list. In statically typed code prefer the concrete types and
/// [`copy_to`](crate::copy_to).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AnyGroup {
    /// A planar rotation.
    SO2(SO2),
    /// A 3D rotation.
    SO3(SO3),
    /// A planar rigid transformation.
    SE2(SE2),
    /// A 3D rigid transformation.
    SE3(SE3),
}

impl AnyGroup {
    /// Name of the wrapped group, e.g. `"SE3"`.
    pub fn name(&self) -> &'static str {
        match self {
            AnyGroup::SO2(_) => SO2::NAME,
            AnyGroup::SO3(_) => SO3::NAME,
            AnyGroup::SE2(_) => SE2::NAME,
            AnyGroup::SE3(_) => SE3::NAME,
        }
    }

    /// Side of the square matrix representation.
    pub fn dim(&self) -> usize {
        match self {
            AnyGroup::SO2(_) => SO2::DIM,
            AnyGroup::SO3(_) => SO3::DIM,
            AnyGroup::SE2(_) => SE2::DIM,
            AnyGroup::SE3(_) => SE3::DIM,
        }
    }

    /// The matrix representation, flattened row-major into `dim() * dim()` values.
    pub fn to_row_major(&self) -> Vec<f64> {
        match self {
            AnyGroup::SO2(g) => matrix::rows2(&g.matrix()).concat(),
            AnyGroup::SO3(g) => matrix::rows3(&g.matrix()).concat(),
            AnyGroup::SE2(g) => matrix::rows3(&g.matrix()).concat(),
            AnyGroup::SE3(g) => matrix::rows4(&g.matrix()).concat(),
        }
    }

    /// Overwrites `self` with `src` when both wrap the same group.
    ///
    /// # Errors
    ///
    /// [`LieError::TypeMismatch`] when the groups differ; `self` is left unchanged.
    pub fn copy_from(&mut self, src: &AnyGroup) -> Result<(), LieError> {
        if std::mem::discriminant(self) != std::mem::discriminant(src) {
            return Err(LieError::TypeMismatch {
                dst: self.name(),
                src: src.name(),
            });
        }
        *self = *src;
        Ok(())
    }
}

impl fmt::Display for AnyGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AnyGroup::SO2(g) => fmt::Display::fmt(g, f),
            AnyGroup::SO3(g) => fmt::Display::fmt(g, f),
            AnyGroup::SE2(g) => fmt::Display::fmt(g, f),
            AnyGroup::SE3(g) => fmt::Display::fmt(g, f),
        }
    }
}

impl From<SO2> for AnyGroup {
    fn from(g: SO2) -> Self {
        AnyGroup::SO2(g)
    }
}

impl From<SO3> for AnyGroup {
    fn from(g: SO3) -> Self {
        AnyGroup::SO3(g)
    }
}

impl From<SE2> for AnyGroup {
    fn from(g: SE2) -> Self {
        AnyGroup::SE2(g)
    }
}

impl From<SE3> for AnyGroup {
    fn from(g: SE3) -> Self {
        AnyGroup::SE3(g)
    }
}
