// src/driver.rs

//! Drives a [`SymmetricEigensolver`] through its two-call protocol.

use log::debug;

use crate::error::{EigenError, Result};
use crate::solver::{Job, SymmetricEigensolver, Triangle};
use crate::workspace::{try_alloc, Populated, Solved, WorkingCopy};

/// Raw solver output: eigenvalues ascending, eigenvectors as columns of the
/// working copy. Not yet normalized.
#[derive(Debug)]
pub struct SolverOutput {
    pub eigenvalues: Vec<f64>,
    pub eigenvectors: WorkingCopy<Solved>,
}

/// Runs the workspace query and the decomposition on `matrix`.
///
/// The working copy is consumed: on success it comes back as solver output, on
/// failure it is dropped together with the scratch buffer. A nonzero status
/// from either call is returned as [`EigenError::SolverFailure`] with the code
/// unchanged.
pub fn solve<S>(solver: &S, matrix: WorkingCopy<Populated>, triangle: Triangle) -> Result<SolverOutput>
where
    S: SymmetricEigensolver + ?Sized,
{
    let n = matrix.dim();
    let n_i32 = i32::try_from(n)
        .map_err(|_| EigenError::invalid(format!("dimension {} exceeds the solver's range", n)))?;
    let lda = n_i32.max(1);

    let mut matrix = matrix;
    let mut eigenvalues = try_alloc(n, "eigenvalue buffer")?;

    let mut query = [0.0_f64; 1];
    let status = solver.syev(
        Job::Vectors,
        triangle,
        n_i32,
        matrix.solver_buffer(),
        lda,
        &mut eigenvalues,
        &mut query,
        -1,
    );
    if status != 0 {
        return Err(EigenError::SolverFailure { status });
    }

    let lwork = workspace_len(query[0])?;
    debug!("eigensolver workspace for n = {}: {} elements", n, lwork);
    let mut work = try_alloc(lwork, "workspace")?;

    let status = solver.syev(
        Job::Vectors,
        triangle,
        n_i32,
        matrix.solver_buffer(),
        lda,
        &mut eigenvalues,
        &mut work,
        lwork as i32,
    );
    drop(work);
    if status != 0 {
        return Err(EigenError::SolverFailure { status });
    }

    Ok(SolverOutput {
        eigenvalues,
        eigenvectors: matrix.into_solved(),
    })
}

/// Decodes the workspace size written by a query call.
///
/// LAPACK reports it as a float; anything that is not a finite value within
/// `1..=i32::MAX` cannot be handed back to the solver.
fn workspace_len(reported: f64) -> Result<usize> {
    if !reported.is_finite() || reported > i32::MAX as f64 {
        return Err(EigenError::AllocationFailure {
            buffer: "workspace",
            elements: usize::MAX,
        });
    }
    Ok((reported as usize).max(1))
}
