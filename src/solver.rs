// src/solver.rs

//! The dense symmetric eigensolver boundary.
//!
//! [`SymmetricEigensolver`] follows the classical LAPACK `dsyev` contract:
//! column-major storage, one triangle consulted, a workspace query
//! (`lwork == -1`) followed by the real call, eigenvalues returned ascending and
//! a signed `info` status. Within the library only [`crate::driver`] calls it,
//! so the column-major convention stays contained there.
//!
//! Thread safety is a property of the backend. [`NalgebraSyev`] is reentrant.
//! `LapackSyev` (feature `lapack`) is only as reentrant as the linked LAPACK library; if that
//! library is single-threaded-only, callers must serialise calls themselves.

use nalgebra::{DMatrix, SymmetricEigen};

/// Which outputs the solver should produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Job {
    /// Eigenvalues and eigenvectors (`'V'`).
    Vectors,
    /// Eigenvalues only (`'N'`).
    ValuesOnly,
}

impl Job {
    pub fn as_lapack_char(self) -> u8 {
        match self {
            Job::Vectors => b'V',
            Job::ValuesOnly => b'N',
        }
    }
}

/// Which triangle of the symmetric input the solver reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Triangle {
    #[default]
    Upper,
    Lower,
}

impl Triangle {
    pub fn as_lapack_char(self) -> u8 {
        match self {
            Triangle::Upper => b'U',
            Triangle::Lower => b'L',
        }
    }
}

/// A routine with the `dsyev` calling convention.
pub trait SymmetricEigensolver {
    /// Computes the eigendecomposition of the `n × n` column-major matrix in `a`.
    ///
    /// With `lwork == -1` nothing is computed and `work[0]` receives the optimal
    /// workspace length. Otherwise `w[..n]` receives eigenvalues in ascending order
    /// and, for [`Job::Vectors`], `a` is overwritten with the matching orthonormal
    /// eigenvectors as columns.
    ///
    /// Returns 0 on success, `-i` if argument `i` (1-based, `dsyev` order) is
    /// invalid, `+i` if the iteration failed to converge.
    #[allow(clippy::too_many_arguments)]
    fn syev(
        &self,
        job: Job,
        triangle: Triangle,
        n: i32,
        a: &mut [f64],
        lda: i32,
        w: &mut [f64],
        work: &mut [f64],
        lwork: i32,
    ) -> i32;
}

impl<T: SymmetricEigensolver + ?Sized> SymmetricEigensolver for &T {
    fn syev(
        &self,
        job: Job,
        triangle: Triangle,
        n: i32,
        a: &mut [f64],
        lda: i32,
        w: &mut [f64],
        work: &mut [f64],
        lwork: i32,
    ) -> i32 {
        (**self).syev(job, triangle, n, a, lda, w, work, lwork)
    }
}

/// Block size reported in workspace queries, the usual `ilaenv` answer for `dsytrd`.
const BLOCK_SIZE: usize = 32;

/// Smallest workspace `dsyev` accepts: `max(1, 3n - 1)`.
pub fn min_workspace(n: usize) -> usize {
    (3 * n).saturating_sub(1).max(1)
}

/// Optimal workspace reported by the query: `max(1, (nb + 2) n)`.
pub fn optimal_workspace(n: usize) -> usize {
    ((BLOCK_SIZE + 2) * n).max(1)
}

/// Pure-Rust backend built on `nalgebra::SymmetricEigen`.
///
/// Only the selected triangle is read. Equal eigenvalues are ordered by
/// decreasing position so that a later descending reorder lists them in natural
/// order.
#[derive(Debug, Clone, Copy, Default)]
pub struct NalgebraSyev;

impl NalgebraSyev {
    /// `dsyev` argument checks, in the order LAPACK reports them.
    fn check_args(n: i32, a: &[f64], lda: i32, w: &[f64], work: &[f64], lwork: i32) -> i32 {
        if n < 0 {
            return -3;
        }
        let nu = n as usize;
        if lda < n.max(1) {
            return -5;
        }
        if a.len() < lda as usize * nu {
            return -4;
        }
        if w.len() < nu {
            return -6;
        }
        if lwork == -1 {
            return if work.is_empty() { -7 } else { 0 };
        }
        if lwork < 0 || (lwork as usize) < min_workspace(nu) {
            return -8;
        }
        if work.len() < lwork as usize {
            return -7;
        }
        0
    }
}

impl SymmetricEigensolver for NalgebraSyev {
    fn syev(
        &self,
        job: Job,
        triangle: Triangle,
        n: i32,
        a: &mut [f64],
        lda: i32,
        w: &mut [f64],
        work: &mut [f64],
        lwork: i32,
    ) -> i32 {
        let info = Self::check_args(n, a, lda, w, work, lwork);
        if info != 0 {
            return info;
        }
        let n = n as usize;
        let lda = lda as usize;

        if lwork == -1 {
            work[0] = optimal_workspace(n) as f64;
            return 0;
        }
        if n == 0 {
            return 0;
        }
        if n == 1 {
            w[0] = a[0];
            if job == Job::Vectors {
                a[0] = 1.0;
            }
            return 0;
        }

        let mut full = DMatrix::<f64>::zeros(n, n);
        for c in 0..n {
            for r in 0..n {
                let (i, j) = match triangle {
                    Triangle::Upper if r <= c => (r, c),
                    Triangle::Upper => (c, r),
                    Triangle::Lower if r >= c => (r, c),
                    Triangle::Lower => (c, r),
                };
                full[(r, c)] = a[i + j * lda];
            }
        }
        if full.iter().any(|v| !v.is_finite()) {
            return n as i32;
        }

        let Some(decomp) = SymmetricEigen::try_new(full, f64::EPSILON, 30 * n) else {
            return n as i32;
        };

        // Unsorted eigenvalues are staged in the workspace while ordering.
        let staged = &mut work[..n];
        staged.copy_from_slice(decomp.eigenvalues.as_slice());
        let mut order: Vec<usize> = (0..n).collect();
        order.sort_by(|&x, &y| staged[x].total_cmp(&staged[y]).then(y.cmp(&x)));

        for (dst, &src) in order.iter().enumerate() {
            w[dst] = staged[src];
        }
        if job == Job::Vectors {
            for (dst, &src) in order.iter().enumerate() {
                for r in 0..n {
                    a[r + dst * lda] = decomp.eigenvectors[(r, src)];
                }
            }
        }
        0
    }
}

/// Backend that calls the system LAPACK `dsyev`.
#[cfg(feature = "lapack")]
#[derive(Debug, Clone, Copy, Default)]
pub struct LapackSyev;

#[cfg(feature = "lapack")]
impl SymmetricEigensolver for LapackSyev {
    fn syev(
        &self,
        job: Job,
        triangle: Triangle,
        n: i32,
        a: &mut [f64],
        lda: i32,
        w: &mut [f64],
        work: &mut [f64],
        lwork: i32,
    ) -> i32 {
        // dsyev trusts its arguments, so slice lengths are checked here first.
        let info = NalgebraSyev::check_args(n, a, lda, w, work, lwork);
        if info != 0 {
            return info;
        }
        let mut info = 0;
        unsafe {
            lapack::dsyev(
                job.as_lapack_char(),
                triangle.as_lapack_char(),
                n,
                a,
                lda,
                w,
                work,
                lwork,
                &mut info,
            );
        }
        info
    }
}
