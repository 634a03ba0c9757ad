//! Shape checks, validation and text rendering shared by the group types.
use glam::{DMat2, DMat3, DMat4};

use crate::LieError;

/// Maximum Frobenius norm of `RᵀR - I` accepted for a rotation block.
pub const ORTHOGONALITY_TOLERANCE: f64 = 1e-6;

/// Maximum deviation of a homogeneous bottom row from `[0, .., 0, 1]`.
pub const AFFINE_TOLERANCE: f64 = 1e-6;

fn frobenius(values: &[f64]) -> f64 {
    values.iter().map(|v| v * v).sum::<f64>().sqrt()
}

fn check_orthogonality(residual: f64, determinant: f64) -> Result<(), LieError> {
    if residual.is_nan() || residual > ORTHOGONALITY_TOLERANCE {
        return Err(LieError::NotOrthogonal {
            residual,
            tolerance: ORTHOGONALITY_TOLERANCE,
        });
    }
    if determinant < 0.0 {
        return Err(LieError::NotProperRotation { determinant });
    }
    Ok(())
}

pub(crate) fn check_rotation2(r: &DMat2) -> Result<(), LieError> {
    let residual = frobenius(&(r.transpose() * *r - DMat2::IDENTITY).to_cols_array());
    check_orthogonality(residual, r.determinant())
}

pub(crate) fn check_rotation3(r: &DMat3) -> Result<(), LieError> {
    let residual = frobenius(&(r.transpose() * *r - DMat3::IDENTITY).to_cols_array());
    check_orthogonality(residual, r.determinant())
}

/// Checks that `row` is `[0, .., 0, 1]` within [`AFFINE_TOLERANCE`].
pub(crate) fn check_bottom_row(row: &[f64]) -> Result<(), LieError> {
    let last = row.len().saturating_sub(1);
    let is_affine = row.iter().enumerate().all(|(i, &v)| {
        let expected = if i == last { 1.0 } else { 0.0 };
        (v - expected).abs() <= AFFINE_TOLERANCE
    });
    if !is_affine {
        return Err(LieError::NotAffine(row.to_vec()));
    }
    Ok(())
}

fn shape_error(rows: usize, cols: usize, len: usize) -> LieError {
    LieError::InvalidShape {
        expected_rows: rows,
        expected_cols: cols,
        len,
    }
}

// glam is column-major, the boundary is row-major: read as columns, then transpose.

pub(crate) fn dmat2_from_row_slice(data: &[f64]) -> Result<DMat2, LieError> {
    let values: &[f64; 4] = data
        .try_into()
        .map_err(|_| shape_error(2, 2, data.len()))?;
    Ok(DMat2::from_cols_array(values).transpose())
}

pub(crate) fn dmat3_from_row_slice(data: &[f64]) -> Result<DMat3, LieError> {
    let values: &[f64; 9] = data
        .try_into()
        .map_err(|_| shape_error(3, 3, data.len()))?;
    Ok(DMat3::from_cols_array(values).transpose())
}

pub(crate) fn dmat4_from_row_slice(data: &[f64]) -> Result<DMat4, LieError> {
    let values: &[f64; 16] = data
        .try_into()
        .map_err(|_| shape_error(4, 4, data.len()))?;
    Ok(DMat4::from_cols_array(values).transpose())
}

pub(crate) fn array_from_slice<const N: usize>(data: &[f64]) -> Result<[f64; N], LieError> {
    data.try_into().map_err(|_| LieError::DimensionMismatch {
        expected: N,
        got: data.len(),
    })
}

pub(crate) fn rows2(m: &DMat2) -> [[f64; 2]; 2] {
    m.transpose().to_cols_array_2d()
}

pub(crate) fn rows3(m: &DMat3) -> [[f64; 3]; 3] {
    m.transpose().to_cols_array_2d()
}

pub(crate) fn rows4(m: &DMat4) -> [[f64; 4]; 4] {
    m.transpose().to_cols_array_2d()
}

/// Renders a matrix as a labeled, bracketed block of rows.
///
/// All entries are right aligned to the widest one, using the shortest representation
/// that round-trips.
///
/// # Example
///
/// ```
/// use rigid_lie::matrix_to_string;
///
/// let text = matrix_to_string("SO2", &[[1.0, 0.0], [0.0, 1.0]]);
/// assert_eq!(text, "SO2([[1, 0],\n     [0, 1]])");
/// ```
pub fn matrix_to_string<const C: usize>(name: &str, rows: &[[f64; C]]) -> String {
    let cells: Vec<Vec<String>> = rows
        .iter()
        // adding `+0.0` turns `-0.0` into `0.0`, which would otherwise print as `-0`
        .map(|row| row.iter().map(|&v| (v + 0.0).to_string()).collect())
        .collect();
    let width = cells.iter().flatten().map(String::len).max().unwrap_or(0);

    let separator = format!(",\n{}", " ".repeat(name.len() + 2));
    let body = cells
        .iter()
        .map(|row| {
            let row = row
                .iter()
                .map(|cell| format!("{cell:>width$}"))
                .collect::<Vec<_>>()
                .join(", ");
            format!("[{row}]")
        })
        .collect::<Vec<_>>()
        .join(&separator);

    format!("{name}([{body}])")
}
