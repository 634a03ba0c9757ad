#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]
//!
//! # Rigid Lie Groups
//!
//! Lie groups of rotations and rigid body motions, as used in robotics, SLAM and
//! computer vision, on top of the `glam` f64 types.
//!
//! ## Supported Groups
//!
//! - **SO(2)**: 2D rotations, tangent `θ`
//! - **SO(3)**: 3D rotations, tangent `ω ∈ ℝ³`
//! - **SE(2)**: 2D rigid transformations, tangent `[υx, υy, θ]`
//! - **SE(3)**: 3D rigid transformations, tangent `[υx, υy, υz, ωx, ωy, ωz]`
//!
//! Elements are always valid: constructors from raw matrices check orthogonality
//! (within [`ORTHOGONALITY_TOLERANCE`]), the determinant, and the homogeneous bottom
//! row, and return a [`LieError`] otherwise. To recover matrices that drifted, use
//! `from_matrix_orthogonalized`, which projects onto the closest rotation.
//!
//! Batch operations on many flattened poses live in [`poses`].
//!
//! ## Example
//!
//! ```rust
//! use glam::DVec3;
//! use rigid_lie::{SE3, SO3};
//!
//! // a quarter turn about z, then a shift along x
//! let rotation = SO3::exp(DVec3::new(0.0, 0.0, std::f64::consts::FRAC_PI_2));
//! let pose = SE3::new(rotation, DVec3::new(1.0, 0.0, 0.0));
//!
//! let p = pose * DVec3::X;
//! assert!(p.abs_diff_eq(DVec3::new(1.0, 1.0, 0.0), 1e-12));
//!
//! let back = pose.inverse() * p;
//! assert!(back.abs_diff_eq(DVec3::X, 1e-12));
//! ```

mod any;
mod error;
mod group;
mod matrix;

/// Batched transforms and inverses over flattened pose rows.
pub mod poses;

/// Special Euclidean group SE(2) for 2D rigid transformations.
pub mod se2;

/// Special Euclidean group SE(3) for 3D rigid transformations.
pub mod se3;

/// Special Orthogonal group SO(2) for 2D rotations.
pub mod so2;

/// Special Orthogonal group SO(3) for 3D rotations.
pub mod so3;

pub use any::AnyGroup;
pub use error::LieError;
pub use group::{copy_to, LieGroup};
pub use matrix::{matrix_to_string, AFFINE_TOLERANCE, ORTHOGONALITY_TOLERANCE};
pub use se2::SE2;
pub use se3::SE3;
pub use so2::SO2;
pub use so3::SO3;

pub use rigid_linalg::{to_orthogonal, to_orthogonal2, to_orthogonal3};
