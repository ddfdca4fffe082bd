// src/workspace.rs

//! Buffers owned by a single decomposition call.
//!
//! Every buffer here is a plain `Vec<f64>` obtained through [`try_alloc`], so an
//! allocation failure becomes an [`EigenError::AllocationFailure`] instead of an
//! abort, and every early return drops what was already acquired.
//!
//! The working copy is the one buffer the solver reads *and* overwrites. It is
//! modelled as a typestate so that the populated input and the solver output
//! can never be confused with each other or aliased with caller memory.

use std::marker::PhantomData;

use crate::error::{EigenError, Result};
use crate::layout;

/// Allocates a zeroed buffer of `len` elements, reporting failure instead of aborting.
pub fn try_alloc(len: usize, buffer: &'static str) -> Result<Vec<f64>> {
    let mut data = Vec::new();
    data.try_reserve_exact(len)
        .map_err(|_| EigenError::AllocationFailure {
            buffer,
            elements: len,
        })?;
    data.resize(len, 0.0);
    Ok(data)
}

/// `n * n`, or an allocation failure if it does not fit in `usize`.
pub fn square_len(n: usize, buffer: &'static str) -> Result<usize> {
    n.checked_mul(n).ok_or(EigenError::AllocationFailure {
        buffer,
        elements: usize::MAX,
    })
}

/// Working copy holds the column-major input matrix.
#[derive(Debug)]
pub enum Populated {}

/// Working copy has been overwritten by the solver with column-major eigenvectors.
#[derive(Debug)]
pub enum Solved {}

/// Private `n × n` column-major buffer handed to the eigensolver.
#[derive(Debug)]
pub struct WorkingCopy<S> {
    data: Vec<f64>,
    n: usize,
    _state: PhantomData<S>,
}

impl<S> WorkingCopy<S> {
    pub fn dim(&self) -> usize {
        self.n
    }

    pub fn as_slice(&self) -> &[f64] {
        &self.data
    }
}

impl WorkingCopy<Populated> {
    /// Copies a row-major caller matrix into a fresh column-major buffer.
    /// The caller's slice is only read.
    pub fn from_row_major(row_major: &[f64], n: usize) -> Result<Self> {
        let len = square_len(n, "working copy")?;
        if row_major.len() != len {
            return Err(EigenError::invalid(format!(
                "matrix has {} elements, expected {}",
                row_major.len(),
                len
            )));
        }
        let mut data = try_alloc(len, "working copy")?;
        layout::to_column_major_into(row_major, n, &mut data);
        Ok(WorkingCopy {
            data,
            n,
            _state: PhantomData,
        })
    }

    /// Mutable view for the solver call.
    pub(crate) fn solver_buffer(&mut self) -> &mut [f64] {
        &mut self.data
    }

    /// Marks the buffer as holding solver output. Only called after a zero status.
    pub(crate) fn into_solved(self) -> WorkingCopy<Solved> {
        WorkingCopy {
            data: self.data,
            n: self.n,
            _state: PhantomData,
        }
    }
}

impl WorkingCopy<Solved> {
    /// Writes the eigenvectors row-major into `out` (column `i` = eigenvector `i`).
    pub fn write_row_major(&self, out: &mut [f64]) {
        layout::to_row_major_into(&self.data, self.n, out);
    }
}
