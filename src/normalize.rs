// src/normalize.rs

//! Puts raw solver output into the caller-facing convention: eigenvalues
//! descending, and each eigenvector's dominant entry positive.
//!
//! Both steps work on row-major `n × n` eigenvector storage where column `i`
//! belongs to eigenvalue `i`.

use log::trace;

/// Swaps columns `i` and `j` of a row-major `n × n` matrix.
pub fn swap_columns(matrix: &mut [f64], n: usize, i: usize, j: usize) {
    if i == j {
        return;
    }
    for r in 0..n {
        matrix.swap(r * n + i, r * n + j);
    }
}

/// Reverses ascending eigenpairs into descending order, swapping eigenvector
/// columns together with their eigenvalues.
pub fn reverse_eigenpairs(eigenvalues: &mut [f64], eigenvectors: &mut [f64], n: usize) {
    for i in 0..n / 2 {
        let j = n - 1 - i;
        eigenvalues.swap(i, j);
        swap_columns(eigenvectors, n, i, j);
    }
}

/// Row index of the largest-magnitude entry in column `c`.
///
/// Ties go to the first row scanned, and an all-zero column yields row 0.
pub fn dominant_row(matrix: &[f64], n: usize, c: usize) -> usize {
    let mut max_idx = 0;
    let mut max_abs = 0.0;
    for r in 0..n {
        let v = matrix[r * n + c].abs();
        if v > max_abs {
            max_abs = v;
            max_idx = r;
        }
    }
    max_idx
}

/// Flips every column whose dominant entry is negative.
pub fn canonicalize_signs(eigenvectors: &mut [f64], n: usize) {
    for c in 0..n {
        let anchor = dominant_row(eigenvectors, n, c);
        if eigenvectors[anchor * n + c] < 0.0 {
            trace!("flipping sign of eigenvector {} (anchor row {})", c, anchor);
            for r in 0..n {
                eigenvectors[r * n + c] = -eigenvectors[r * n + c];
            }
        }
    }
}

/// Reorder then sign-fix.
pub fn normalize(eigenvalues: &mut [f64], eigenvectors: &mut [f64], n: usize) {
    reverse_eigenpairs(eigenvalues, eigenvectors, n);
    canonicalize_signs(eigenvectors, n);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reverse_odd_dimension() {
        let mut vals = vec![1.0, 2.0, 3.0];
        #[rustfmt::skip]
        let mut vecs = vec![
            1.0, 2.0, 3.0,
            4.0, 5.0, 6.0,
            7.0, 8.0, 9.0,
        ];
        reverse_eigenpairs(&mut vals, &mut vecs, 3);
        assert_eq!(vals, vec![3.0, 2.0, 1.0]);
        assert_eq!(vecs, vec![3.0, 2.0, 1.0, 6.0, 5.0, 4.0, 9.0, 8.0, 7.0]);
    }

    #[test]
    fn test_reverse_single() {
        let mut vals = vec![7.0];
        let mut vecs = vec![1.0];
        reverse_eigenpairs(&mut vals, &mut vecs, 1);
        assert_eq!(vals, vec![7.0]);
        assert_eq!(vecs, vec![1.0]);
    }

    #[test]
    fn test_dominant_row_tie_goes_to_first() {
        // Column 0: |−0.5| ties with |0.5|, first one wins.
        let m = vec![-0.5, 0.0, 0.5, 1.0];
        assert_eq!(dominant_row(&m, 2, 0), 0);
        assert_eq!(dominant_row(&m, 2, 1), 1);
        assert_eq!(dominant_row(&[0.0, 0.0, 0.0, 0.0], 2, 1), 0);
    }

    #[test]
    fn test_canonicalize_flips_negative_dominant() {
        #[rustfmt::skip]
        let mut vecs = vec![
            -0.6, 0.8,
            -0.8, -0.6,
        ];
        canonicalize_signs(&mut vecs, 2);
        assert_eq!(vecs, vec![0.6, 0.8, 0.8, -0.6]);
    }

    #[test]
    fn test_canonicalize_tie_uses_first_row() {
        // Exact magnitude tie: row 0 is the anchor, so (−a, a) flips and (a, −a) stays.
        let a = std::f64::consts::FRAC_1_SQRT_2;
        let mut vecs = vec![-a, a, a, -a];
        canonicalize_signs(&mut vecs, 2);
        assert_eq!(vecs, vec![a, a, -a, -a]);
    }

    #[test]
    fn test_normalize_full() {
        let mut vals = vec![1.0, 3.0];
        let a = std::f64::consts::FRAC_1_SQRT_2;
        // Columns: (a, −a) for 1, (−a, −a) for 3.
        let mut vecs = vec![a, -a, -a, -a];
        normalize(&mut vals, &mut vecs, 2);
        assert_eq!(vals, vec![3.0, 1.0]);
        assert_eq!(vecs, vec![a, a, a, -a]);
    }
}
