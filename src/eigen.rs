// src/eigen.rs

//! Eigendecomposition of symmetric (covariance) matrices.
//!
//! The pipeline is: row-major input → column-major working copy → solver
//! (workspace query, then compute) → row-major eigenvectors → descending order
//! and canonical signs. Caller output buffers are written only after the solver
//! has succeeded, so a failed call leaves them exactly as they were.

use log::debug;
use ndarray::{Array1, Array2, ArrayView2};

use crate::driver;
use crate::error::{EigenError, Result};
use crate::normalize;
use crate::solver::{NalgebraSyev, SymmetricEigensolver, Triangle};
use crate::workspace::{square_len, try_alloc, WorkingCopy};

/// Options for a decomposition call.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct EigenConfig {
    /// Triangle of the input the solver reads.
    pub triangle: Triangle,
    /// When set, reject inputs whose mirrored entries differ by more than this
    /// relative tolerance. Off by default: symmetry is the caller's job.
    pub symmetry_tolerance: Option<f64>,
}

impl EigenConfig {
    pub fn new(triangle: Triangle) -> Self {
        EigenConfig {
            triangle,
            symmetry_tolerance: None,
        }
    }

    pub fn with_symmetry_check(mut self, tolerance: f64) -> Self {
        assert!(tolerance >= 0.0, "Symmetry tolerance must be non-negative");
        self.symmetry_tolerance = Some(tolerance);
        self
    }
}

/// Computes eigenvalues (descending) and eigenvectors (row-major, column `i`
/// for eigenvalue `i`) of the symmetric row-major `n × n` `matrix`.
///
/// Uses the pure-Rust [`NalgebraSyev`] backend and the default [`EigenConfig`].
pub fn compute_symmetric_eigendecomposition(
    n: i32,
    matrix: &[f64],
    eigenvalues: &mut [f64],
    eigenvectors: &mut [f64],
) -> Result<()> {
    compute_symmetric_eigendecomposition_with(
        &NalgebraSyev,
        &EigenConfig::default(),
        n,
        matrix,
        eigenvalues,
        eigenvectors,
    )
}

/// [`compute_symmetric_eigendecomposition`] with an explicit backend and config.
///
/// Safe to call from several threads at once as long as `solver` is.
pub fn compute_symmetric_eigendecomposition_with<S>(
    solver: &S,
    config: &EigenConfig,
    n: i32,
    matrix: &[f64],
    eigenvalues: &mut [f64],
    eigenvectors: &mut [f64],
) -> Result<()>
where
    S: SymmetricEigensolver + ?Sized,
{
    if n <= 0 {
        return Err(EigenError::invalid(format!(
            "matrix dimension must be positive, got {}",
            n
        )));
    }
    let n = n as usize;
    let len = square_len(n, "working copy")?;
    check_len("input matrix", matrix.len(), len)?;
    check_len("eigenvalue output", eigenvalues.len(), n)?;
    check_len("eigenvector output", eigenvectors.len(), len)?;
    if let Some(tolerance) = config.symmetry_tolerance {
        check_symmetry(matrix, n, tolerance)?;
    }

    debug!("symmetric eigendecomposition: n = {}, triangle = {:?}", n, config.triangle);
    let working = WorkingCopy::from_row_major(matrix, n)?;
    let output = driver::solve(solver, working, config.triangle)?;

    eigenvalues.copy_from_slice(&output.eigenvalues);
    output.eigenvectors.write_row_major(eigenvectors);
    normalize::normalize(eigenvalues, eigenvectors, n);
    Ok(())
}

fn check_len(what: &str, got: usize, expected: usize) -> Result<()> {
    if got == 0 {
        return Err(EigenError::invalid(format!("{} buffer is empty", what)));
    }
    if got != expected {
        return Err(EigenError::invalid(format!(
            "{} has {} elements, expected {}",
            what, got, expected
        )));
    }
    Ok(())
}

/// Relative check of `a[i][j]` against `a[j][i]` for every off-diagonal pair.
fn check_symmetry(matrix: &[f64], n: usize, tolerance: f64) -> Result<()> {
    for i in 0..n {
        for j in (i + 1)..n {
            let upper = matrix[i * n + j];
            let lower = matrix[j * n + i];
            let scale = 1.0_f64.max(upper.abs()).max(lower.abs());
            let diff = (upper - lower).abs();
            if diff.is_nan() || diff > tolerance * scale {
                return Err(EigenError::invalid(format!(
                    "matrix is not symmetric at ({}, {}): {} vs {}",
                    i, j, upper, lower
                )));
            }
        }
    }
    Ok(())
}

/// Owned result of a decomposition.
#[derive(Debug, Clone, PartialEq)]
pub struct Eigendecomposition {
    pub n: usize,
    /// Descending.
    pub eigenvalues: Vec<f64>,
    /// Row-major `n × n`; column `i` is the unit eigenvector for `eigenvalues[i]`.
    pub eigenvectors: Vec<f64>,
}

impl Eigendecomposition {
    /// Column `i` of the eigenvector matrix.
    ///
    /// # Panics
    ///
    /// Panics if `i >= self.n`.
    pub fn eigenvector(&self, i: usize) -> Vec<f64> {
        assert!(i < self.n, "eigenvector index {} out of range for n = {}", i, self.n);
        (0..self.n).map(|r| self.eigenvectors[r * self.n + i]).collect()
    }

    /// `V · diag(λ) · Vᵀ`, row-major.
    pub fn reconstruct(&self) -> Vec<f64> {
        let n = self.n;
        let v = &self.eigenvectors;
        let mut out = vec![0.0; n * n];
        for r in 0..n {
            for c in 0..n {
                out[r * n + c] = (0..n)
                    .map(|k| v[r * n + k] * self.eigenvalues[k] * v[c * n + k])
                    .sum();
            }
        }
        out
    }

    pub fn to_ndarray(&self) -> (Array1<f64>, Array2<f64>) {
        let values = Array1::from_vec(self.eigenvalues.clone());
        let vectors = Array2::from_shape_fn((self.n, self.n), |(r, c)| {
            self.eigenvectors[r * self.n + c]
        });
        (values, vectors)
    }
}

/// Decomposes a row-major `n × n` matrix into freshly allocated outputs.
pub fn eigh(n: i32, matrix: &[f64]) -> Result<Eigendecomposition> {
    eigh_with(&NalgebraSyev, &EigenConfig::default(), n, matrix)
}

/// [`eigh`] with an explicit backend and config.
pub fn eigh_with<S>(solver: &S, config: &EigenConfig, n: i32, matrix: &[f64]) -> Result<Eigendecomposition>
where
    S: SymmetricEigensolver + ?Sized,
{
    if n <= 0 {
        return Err(EigenError::invalid(format!(
            "matrix dimension must be positive, got {}",
            n
        )));
    }
    let dim = n as usize;
    let len = square_len(dim, "eigenvector output")?;
    check_len("input matrix", matrix.len(), len)?;
    let mut eigenvalues = try_alloc(dim, "eigenvalue output")?;
    let mut eigenvectors = try_alloc(len, "eigenvector output")?;
    compute_symmetric_eigendecomposition_with(
        solver,
        config,
        n,
        matrix,
        &mut eigenvalues,
        &mut eigenvectors,
    )?;
    Ok(Eigendecomposition {
        n: dim,
        eigenvalues,
        eigenvectors,
    })
}

/// ndarray front end: returns `(eigenvalues, eigenvectors)` with eigenvectors as columns.
pub fn eigh_array(matrix: ArrayView2<'_, f64>) -> Result<(Array1<f64>, Array2<f64>)> {
    let (rows, cols) = matrix.dim();
    if rows != cols {
        return Err(EigenError::invalid(format!(
            "matrix must be square, got {}x{}",
            rows, cols
        )));
    }
    let n = i32::try_from(rows)
        .map_err(|_| EigenError::invalid(format!("dimension {} is too large", rows)))?;
    let standard = matrix.as_standard_layout();
    let flat = standard
        .as_slice()
        .ok_or_else(|| EigenError::invalid("matrix could not be laid out contiguously"))?;
    Ok(eigh(n, flat)?.to_ndarray())
}
