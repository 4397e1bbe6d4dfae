//! Module for constructing mixed integer linear problems and handing them to a solver

pub mod constraint;
pub mod objective;
pub mod problem;
pub mod solvers;
pub mod variable;

use std::fmt::{Display, Formatter};

use serde::Serialize;

/// Struct representing the solution to an optimization problem
#[derive(Clone, Debug, PartialEq)]
pub struct ProblemSolution {
    /// The status of the optimization problem, representing if the optimization was
    /// completed successfully
    pub status: OptimizationStatus,
    /// Optimized value of the objective
    ///
    /// Some(f64) if the optimization was completed successfully, None otherwise
    pub objective_value: Option<f64>,
    /// Values of the variables at the optimum, in column order
    ///
    /// Some(Vec) if the problem could be solved, None otherwise
    pub variable_values: Option<Vec<f64>>,
}

impl ProblemSolution {
    /// Solution of a problem solved to optimality
    pub fn optimal(objective_value: f64, variable_values: Vec<f64>) -> Self {
        ProblemSolution {
            status: OptimizationStatus::Optimal,
            objective_value: Some(objective_value),
            variable_values: Some(variable_values),
        }
    }

    /// Solution carrying only a status, for problems which could not be solved
    pub fn without_values(status: OptimizationStatus) -> Self {
        ProblemSolution {
            status,
            objective_value: None,
            variable_values: None,
        }
    }
}

/// Status of an optimization problem
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum OptimizationStatus {
    /// Problem has not yet attempted to be optimized
    Unoptimized,
    /// Problem has been optimized
    Optimal,
    /// Problem can't be optimized because objective value is not bounded
    Unbounded,
    /// Problem can't be solved because it is infeasible (conflicting constraints)
    Infeasible,
    /// A numerical error occurred during solving
    NumericalError,
    /// The solver hit the maximum allowed iterations, or max time, or made insufficient progress
    SolverHalted,
}

impl Display for OptimizationStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            OptimizationStatus::Unoptimized => "unoptimized",
            OptimizationStatus::Optimal => "optimal",
            OptimizationStatus::Unbounded => "unbounded",
            OptimizationStatus::Infeasible => "infeasible",
            OptimizationStatus::NumericalError => "numerical_error",
            OptimizationStatus::SolverHalted => "solver_halted",
        };
        write!(f, "{}", s)
    }
}
