pub mod driver;
pub mod eigen;
pub mod error;
pub mod layout;
pub mod normalize;
pub mod report;
pub mod solver;
pub mod workspace;

pub use eigen::{
    compute_symmetric_eigendecomposition, compute_symmetric_eigendecomposition_with, eigh,
    eigh_array, eigh_with, EigenConfig, Eigendecomposition,
};
pub use error::{EigenError, Result, SolverStatus};
pub use solver::{Job, NalgebraSyev, SymmetricEigensolver, Triangle};

#[cfg(feature = "lapack")]
pub use solver::LapackSyev;
