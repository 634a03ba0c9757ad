#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Projection of near-rotation matrices onto SO(2) and SO(3).
pub mod orthogonal;

/// Module to calculate the SVD of 2x2 and 3x3 matrices
pub mod svd;

pub use orthogonal::{to_orthogonal, to_orthogonal2, to_orthogonal3};
