use thiserror::Error;

/// An error type for the Lie group operations.
#[derive(Debug, Error, PartialEq)]
pub enum LieError {
    /// The input does not hold the number of values of the expected matrix.
    #[error("Expected a {expected_rows}x{expected_cols} matrix, got {len} values")]
    InvalidShape {
        /// Number of rows of the expected matrix.
        expected_rows: usize,
        /// Number of columns of the expected matrix.
        expected_cols: usize,
        /// Number of values received.
        len: usize,
    },

    /// The rotation block deviates from orthogonality by more than the tolerance.
    #[error("Matrix is not orthogonal: |RᵀR - I| = {residual:e} exceeds {tolerance:e}")]
    NotOrthogonal {
        /// Frobenius norm of `RᵀR - I`.
        residual: f64,
        /// The tolerance that was exceeded.
        tolerance: f64,
    },

    /// The rotation block is orthogonal but is a reflection.
    #[error("Matrix is a reflection, determinant {determinant} is not +1")]
    NotProperRotation {
        /// Determinant of the rotation block.
        determinant: f64,
    },

    /// The bottom row of a homogeneous matrix is not `[0, .., 0, 1]`.
    #[error("Bottom row of a homogeneous matrix must be [0, .., 0, 1], got {0:?}")]
    NotAffine(Vec<f64>),

    /// A vector of the wrong length was passed.
    #[error("Expected a vector of {expected} values, got {got}")]
    DimensionMismatch {
        /// Expected number of values.
        expected: usize,
        /// Number of values received.
        got: usize,
    },

    /// A flat batch does not hold a whole number of rows.
    #[error("Batch of {len} values is not a multiple of the row width {width}")]
    RaggedBatch {
        /// Width of one row.
        width: usize,
        /// Length of the flat buffer.
        len: usize,
    },

    /// In-place copy between two different group types.
    #[error("Cannot copy a {src} element into a {dst} element")]
    TypeMismatch {
        /// Name of the destination group.
        dst: &'static str,
        /// Name of the source group.
        src: &'static str,
    },
}
