// tests/test_driver.rs

use std::cell::RefCell;

use symeig::driver::solve;
use symeig::solver::{optimal_workspace, Job, NalgebraSyev, SymmetricEigensolver, Triangle};
use symeig::workspace::WorkingCopy;
use symeig::{compute_symmetric_eigendecomposition_with, EigenConfig, EigenError, SolverStatus};

/// Records every call and replays a fixed script of statuses.
struct ScriptedSolver {
    query_status: i32,
    query_size: f64,
    compute_status: i32,
    calls: RefCell<Vec<(Job, Triangle, i32, usize)>>,
}

impl ScriptedSolver {
    fn new(query_status: i32, query_size: f64, compute_status: i32) -> Self {
        ScriptedSolver {
            query_status,
            query_size,
            compute_status,
            calls: RefCell::new(Vec::new()),
        }
    }
}

impl SymmetricEigensolver for ScriptedSolver {
    fn syev(
        &self,
        job: Job,
        triangle: Triangle,
        n: i32,
        a: &mut [f64],
        _lda: i32,
        w: &mut [f64],
        work: &mut [f64],
        lwork: i32,
    ) -> i32 {
        self.calls.borrow_mut().push((job, triangle, lwork, work.len()));
        if lwork == -1 {
            work[0] = self.query_size;
            return self.query_status;
        }
        // Scribble over everything the solver owns, as a failing LAPACK may.
        a.iter_mut().for_each(|v| *v = f64::NAN);
        w.iter_mut().for_each(|v| *v = f64::NAN);
        if self.compute_status != 0 {
            return self.compute_status;
        }
        // Identity eigenvectors, eigenvalues 0..n ascending.
        let n = n as usize;
        for c in 0..n {
            for r in 0..n {
                a[r + c * n] = if r == c { 1.0 } else { 0.0 };
            }
            w[c] = c as f64;
        }
        0
    }
}

fn run(solver: &ScriptedSolver) -> (Result<(), EigenError>, Vec<f64>, Vec<f64>) {
    let matrix = [2.0, 1.0, 1.0, 2.0];
    let mut values = vec![-7.0; 2];
    let mut vectors = vec![-7.0; 4];
    let result = compute_symmetric_eigendecomposition_with(
        solver,
        &EigenConfig::default(),
        2,
        &matrix,
        &mut values,
        &mut vectors,
    );
    (result, values, vectors)
}

#[test]
fn test_query_then_compute_with_exact_workspace() {
    let solver = ScriptedSolver::new(0, 17.0, 0);
    let (result, values, vectors) = run(&solver);
    assert!(result.is_ok());

    let calls = solver.calls.borrow();
    assert_eq!(calls.len(), 2);
    assert_eq!(calls[0], (Job::Vectors, Triangle::Upper, -1, 1));
    assert_eq!(calls[1], (Job::Vectors, Triangle::Upper, 17, 17));

    // Reversed into descending order; identity columns swapped.
    assert_eq!(values, vec![1.0, 0.0]);
    assert_eq!(vectors, vec![0.0, 1.0, 1.0, 0.0]);
}

#[test]
fn test_query_failure_skips_compute_and_forwards_status() {
    let solver = ScriptedSolver::new(-5, 17.0, 0);
    let (result, values, vectors) = run(&solver);
    assert_eq!(result, Err(EigenError::SolverFailure { status: -5 }));
    assert_eq!(solver.calls.borrow().len(), 1);
    assert_eq!(values, vec![-7.0; 2]);
    assert_eq!(vectors, vec![-7.0; 4]);
}

#[test]
fn test_compute_failure_leaves_outputs_untouched() {
    let solver = ScriptedSolver::new(0, 17.0, 2);
    let (result, values, vectors) = run(&solver);
    let err = result.unwrap_err();
    assert_eq!(err, EigenError::SolverFailure { status: 2 });
    assert_eq!(err.solver_status(), Some(SolverStatus::NoConvergence(2)));
    assert_eq!(values, vec![-7.0; 2]);
    assert_eq!(vectors, vec![-7.0; 4]);
}

#[test]
fn test_unrepresentable_workspace_is_allocation_failure() {
    let solver = ScriptedSolver::new(0, f64::INFINITY, 0);
    let (result, values, _) = run(&solver);
    assert!(matches!(
        result,
        Err(EigenError::AllocationFailure {
            buffer: "workspace",
            ..
        })
    ));
    assert_eq!(solver.calls.borrow().len(), 1);
    assert_eq!(values, vec![-7.0; 2]);
}

#[test]
fn test_lower_triangle_is_passed_through() {
    let solver = ScriptedSolver::new(0, 4.0, 0);
    let config = EigenConfig::new(Triangle::Lower);
    let mut values = vec![0.0; 2];
    let mut vectors = vec![0.0; 4];
    compute_symmetric_eigendecomposition_with(
        &solver,
        &config,
        2,
        &[1.0, 0.0, 0.0, 1.0],
        &mut values,
        &mut vectors,
    )
    .unwrap();
    assert!(solver.calls.borrow().iter().all(|c| c.1 == Triangle::Lower));
}

#[test]
fn test_driver_with_nalgebra_backend() {
    let working = WorkingCopy::from_row_major(&[3.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 2.0], 3).unwrap();
    let output = solve(&NalgebraSyev, working, Triangle::Upper).unwrap();

    // Raw solver convention: ascending, not yet reversed.
    let ascending = &output.eigenvalues;
    assert!(ascending.windows(2).all(|p| p[0] <= p[1]));
    assert!((ascending[0] - 1.0).abs() < 1e-12);
    assert!((ascending[2] - 3.0).abs() < 1e-12);
    assert_eq!(output.eigenvectors.dim(), 3);
    assert_eq!(output.eigenvectors.as_slice().len(), 9);
}

#[test]
fn test_nalgebra_backend_query_matches_optimal_size() {
    let mut a = vec![0.0; 25];
    let mut w = vec![0.0; 5];
    let mut work = [0.0];
    let status = NalgebraSyev.syev(Job::Vectors, Triangle::Upper, 5, &mut a, 5, &mut w, &mut work, -1);
    assert_eq!(status, 0);
    assert_eq!(work[0] as usize, optimal_workspace(5));
}
