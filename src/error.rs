// src/error.rs

//! Error taxonomy for the symmetric eigendecomposition pipeline.

use thiserror::Error;

/// Result type alias using [`EigenError`].
pub type Result<T> = std::result::Result<T, EigenError>;

/// Errors surfaced by [`crate::compute_symmetric_eigendecomposition`] and friends.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EigenError {
    /// Bad dimension or mis-sized buffer. Raised before anything is allocated.
    #[error("invalid argument: {reason}")]
    InvalidArgument {
        /// What was wrong with the call
        reason: String,
    },

    /// A working buffer could not be obtained.
    #[error("failed to allocate {elements} f64 elements for the {buffer}")]
    AllocationFailure {
        /// Which buffer ("working copy", "workspace", ...)
        buffer: &'static str,
        /// Requested length in elements
        elements: usize,
    },

    /// The eigensolver returned a nonzero status. The code is forwarded untouched.
    #[error("eigensolver failed with status {status} ({})", SolverStatus::from_code(*.status))]
    SolverFailure {
        /// Raw solver status code
        status: i32,
    },
}

impl EigenError {
    pub(crate) fn invalid(reason: impl Into<String>) -> Self {
        EigenError::InvalidArgument {
            reason: reason.into(),
        }
    }

    /// Decoded solver status, if this is a [`EigenError::SolverFailure`].
    pub fn solver_status(&self) -> Option<SolverStatus> {
        match self {
            EigenError::SolverFailure { status } => Some(SolverStatus::from_code(*status)),
            _ => None,
        }
    }
}

/// Interpretation of a LAPACK-style `info` code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SolverStatus {
    Success,
    /// Argument at this 1-based position was rejected.
    InvalidParameter(u32),
    /// The iteration failed to converge; the solver reports this index.
    NoConvergence(u32),
}

impl SolverStatus {
    pub fn from_code(code: i32) -> Self {
        match code {
            0 => SolverStatus::Success,
            c if c < 0 => SolverStatus::InvalidParameter(c.unsigned_abs()),
            c => SolverStatus::NoConvergence(c.unsigned_abs()),
        }
    }
}

impl std::fmt::Display for SolverStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverStatus::Success => write!(f, "success"),
            SolverStatus::InvalidParameter(pos) => write!(f, "argument {} had an illegal value", pos),
            SolverStatus::NoConvergence(idx) => {
                write!(f, "{} off-diagonal elements did not converge", idx)
            }
        }
    }
}
