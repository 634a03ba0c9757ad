//! Batched operations on many poses at once.
//!
//! Poses are passed as flattened rows of the top block of their homogeneous matrix:
//!
//! - 3D: `[R | t]` is `3×4`, stored row-major as `[f64; 12]`.
//! - 2D: `[R | t]` is `2×3`, stored row-major as `[f64; 6]`.
//!
//! Every routine runs data-parallel over poses with [`rayon`], and the output order
//! always matches the input order. Rotation blocks are trusted as given, no
//! orthogonality check is made on the hot path.
//!
//! # Example
//!
//! ```
//! use rigid_lie::poses::transform_points_by_poses;
//!
//! let identity = [1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0];
//! let shifted = [1.0, 0.0, 0.0, 10.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0, 0.0];
//! let points = [[1.0, -1.0, 1.0], [2.0, 3.0, 4.0]];
//!
//! let out = transform_points_by_poses(&[identity, shifted], &points, false);
//! assert_eq!(out.len(), 4);
//! assert_eq!(out[2], [11.0, -1.0, 1.0]);
//! ```
use glam::{DVec2, DVec3};
use rayon::prelude::*;

use crate::{LieError, LieGroup, SE2, SE3};

/// A pose flattened into a fixed-size row.
pub trait PoseRow: Copy + Send + Sync {
    /// Point type the pose acts on, as a plain array.
    type Point: Copy + Default + Send + Sync;
    /// Group element the row describes.
    type Pose: LieGroup;

    /// Reads the row without validating the rotation block.
    fn to_pose(&self) -> Self::Pose;

    /// Flattens a pose back into a row.
    fn from_pose(pose: &Self::Pose) -> Self;

    /// Applies `pose` to a single point.
    fn transform_point(pose: &Self::Pose, point: &Self::Point) -> Self::Point;

    /// Row of the inverse pose, `[Rᵀ | -Rᵀt]`.
    fn invert(&self) -> Self {
        Self::from_pose(&self.to_pose().inverse())
    }
}

impl PoseRow for [f64; 12] {
    type Point = [f64; 3];
    type Pose = SE3;

    fn to_pose(&self) -> SE3 {
        SE3::from_pose_row_unchecked(self)
    }

    fn from_pose(pose: &SE3) -> Self {
        pose.to_pose_row()
    }

    fn transform_point(pose: &SE3, point: &[f64; 3]) -> [f64; 3] {
        pose.transform(DVec3::from_array(*point)).to_array()
    }
}

impl PoseRow for [f64; 6] {
    type Point = [f64; 2];
    type Pose = SE2;

    fn to_pose(&self) -> SE2 {
        SE2::from_pose_row_unchecked(self)
    }

    fn from_pose(pose: &SE2) -> Self {
        pose.to_pose_row()
    }

    fn transform_point(pose: &SE2, point: &[f64; 2]) -> [f64; 2] {
        pose.transform(DVec2::from_array(*point)).to_array()
    }
}

/// Applies every pose (or its inverse) to every point.
///
/// The output has `poses.len() * points.len()` rows, grouped by pose: rows
/// `i * M .. (i + 1) * M` hold pose `i` applied to all `M` points.
pub fn transform_points_by_poses<P: PoseRow>(
    poses: &[P],
    points: &[P::Point],
    inverse: bool,
) -> Vec<P::Point> {
    log::trace!(
        "transform_points_by_poses: {} poses x {} points (inverse: {inverse})",
        poses.len(),
        points.len()
    );

    let num_points = points.len();
    let mut out = vec![P::Point::default(); poses.len() * num_points];
    if num_points == 0 {
        return out;
    }

    out.par_chunks_mut(num_points)
        .zip(poses.par_iter())
        .for_each(|(block, row)| {
            let pose = if inverse {
                row.to_pose().inverse()
            } else {
                row.to_pose()
            };
            for (dst, point) in block.iter_mut().zip(points.iter()) {
                *dst = P::transform_point(&pose, point);
            }
        });

    out
}

/// Inverts every pose row, `[R | t]` to `[Rᵀ | -Rᵀt]`.
pub fn invert_poses<P: PoseRow>(poses: &[P]) -> Vec<P> {
    log::trace!("invert_poses: {} poses", poses.len());
    poses.par_iter().map(PoseRow::invert).collect()
}

/// Inverts a single pose row.
pub fn invert_pose<P: PoseRow>(pose: &P) -> P {
    pose.invert()
}

fn rows_from_flat<const N: usize>(data: &[f64]) -> Result<Vec<[f64; N]>, LieError> {
    if data.len() % N != 0 {
        return Err(LieError::RaggedBatch {
            width: N,
            len: data.len(),
        });
    }
    Ok(data
        .chunks_exact(N)
        .map(|chunk| {
            let mut row = [0.0; N];
            row.copy_from_slice(chunk);
            row
        })
        .collect())
}

fn flatten<const N: usize>(rows: Vec<[f64; N]>) -> Vec<f64> {
    rows.into_iter().flatten().collect()
}

/// [`transform_points_by_poses`] on flat buffers: `N×12` poses and `M×3` points,
/// returning `N·M×3` values.
///
/// # Errors
///
/// [`LieError::RaggedBatch`] when a buffer length is not a multiple of its row width.
pub fn transform_points_by_poses_flat(
    poses: &[f64],
    points: &[f64],
    inverse: bool,
) -> Result<Vec<f64>, LieError> {
    let poses = rows_from_flat::<12>(poses)?;
    let points = rows_from_flat::<3>(points)?;
    Ok(flatten(transform_points_by_poses(&poses, &points, inverse)))
}

/// [`invert_poses`] on a flat `N×12` buffer.
///
/// # Errors
///
/// [`LieError::RaggedBatch`] when a buffer length is not a multiple of its row width.
pub fn invert_poses_flat(poses: &[f64]) -> Result<Vec<f64>, LieError> {
    let poses = rows_from_flat::<12>(poses)?;
    Ok(flatten(invert_poses(&poses)))
}

/// [`transform_points_by_poses`] on flat buffers: `N×6` planar poses and `M×2` points.
///
/// # Errors
///
/// [`LieError::RaggedBatch`] when a buffer length is not a multiple of its row width.
pub fn transform_points_by_poses_2d_flat(
    poses: &[f64],
    points: &[f64],
    inverse: bool,
) -> Result<Vec<f64>, LieError> {
    let poses = rows_from_flat::<6>(poses)?;
    let points = rows_from_flat::<2>(points)?;
    Ok(flatten(transform_points_by_poses(&poses, &points, inverse)))
}

/// [`invert_poses`] on a flat `N×6` buffer of planar poses.
///
/// # Errors
///
/// [`LieError::RaggedBatch`] when a buffer length is not a multiple of its row width.
pub fn invert_poses_2d_flat(poses: &[f64]) -> Result<Vec<f64>, LieError> {
    let poses = rows_from_flat::<6>(poses)?;
    Ok(flatten(invert_poses(&poses)))
}
