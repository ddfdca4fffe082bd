// src/layout.rs

//! Row-major <-> column-major conversion for dense `n × n` matrices.
//!
//! Pure index permutations: values are copied verbatim, nothing is rounded.

/// Writes the column-major form of `row_major` into `column_major`.
///
/// `column_major[r + c*n] = row_major[r*n + c]` for all `r, c < n`.
pub fn to_column_major_into(row_major: &[f64], n: usize, column_major: &mut [f64]) {
    debug_assert!(row_major.len() >= n * n && column_major.len() >= n * n);
    for r in 0..n {
        for c in 0..n {
            column_major[r + c * n] = row_major[r * n + c];
        }
    }
}

/// Inverse of [`to_column_major_into`].
pub fn to_row_major_into(column_major: &[f64], n: usize, row_major: &mut [f64]) {
    debug_assert!(row_major.len() >= n * n && column_major.len() >= n * n);
    for r in 0..n {
        for c in 0..n {
            row_major[r * n + c] = column_major[r + c * n];
        }
    }
}

/// Allocating variant of [`to_column_major_into`].
pub fn to_column_major(row_major: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n * n];
    to_column_major_into(row_major, n, &mut out);
    out
}

/// Allocating variant of [`to_row_major_into`].
pub fn to_row_major(column_major: &[f64], n: usize) -> Vec<f64> {
    let mut out = vec![0.0; n * n];
    to_row_major_into(column_major, n, &mut out);
    out
}
