//! Solver oracle interface and the available backends
//!
//! A solver receives a complete [`MilpProblem`] and returns a [`ProblemSolution`]. Each
//! backend is behind a cargo feature; [`default_solver`] picks one of the enabled ones.
use cfg_if::cfg_if;
use thiserror::Error;

use crate::optimize::problem::MilpProblem;
use crate::optimize::ProblemSolution;

#[cfg(feature = "highs")]
pub mod highs;
#[cfg(feature = "microlp")]
pub mod microlp;

/// A mixed integer linear programming solver, used as an opaque oracle
pub trait MilpSolver {
    /// Short name of the backend, used in logs
    fn name(&self) -> &'static str;

    /// Solve `problem`
    ///
    /// Infeasible, unbounded or halted solves are reported through
    /// [`ProblemSolution::status`]; an `Err` means the backend itself failed.
    fn solve(&mut self, problem: &MilpProblem) -> Result<ProblemSolution, SolverError>;
}

impl<S: MilpSolver + ?Sized> MilpSolver for &mut S {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(&mut self, problem: &MilpProblem) -> Result<ProblemSolution, SolverError> {
        (**self).solve(problem)
    }
}

impl<S: MilpSolver + ?Sized> MilpSolver for Box<S> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn solve(&mut self, problem: &MilpProblem) -> Result<ProblemSolution, SolverError> {
        (**self).solve(problem)
    }
}

/// Create the preferred solver among the enabled backends
///
/// HiGHS is preferred over microlp. Returns None when no backend feature is enabled.
pub fn default_solver() -> Option<Box<dyn MilpSolver>> {
    cfg_if! {
        if #[cfg(feature = "highs")] {
            Some(Box::new(highs::HighsSolver::default()))
        } else if #[cfg(feature = "microlp")] {
            Some(Box::new(microlp::MicrolpSolver::default()))
        } else {
            None
        }
    }
}

/// Errors raised by a solver backend
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SolverError {
    /// The problem has no variables
    #[error("Problem has no variables")]
    EmptyProblem,
    /// The backend failed while loading or solving the problem
    #[error("Solver backend {backend} failed: {message}")]
    Backend {
        backend: &'static str,
        message: String,
    },
}
