//! Solver interface for the pure Rust microlp solver
use ::microlp::{ComparisonOp, OptimizationDirection, Problem};

use crate::optimize::constraint::RowSense;
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::MilpProblem;
use crate::optimize::solvers::{MilpSolver, SolverError};
use crate::optimize::variable::VariableType;
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// Branch and bound solver from the microlp crate
///
/// Suited to small problems; it has no time limit.
#[derive(Clone, Debug, Default)]
pub struct MicrolpSolver {}

impl MilpSolver for MicrolpSolver {
    fn name(&self) -> &'static str {
        "microlp"
    }

    fn solve(&mut self, problem: &MilpProblem) -> Result<ProblemSolution, SolverError> {
        if problem.num_variables() == 0 {
            return Err(SolverError::EmptyProblem);
        }
        let direction = match problem.sense() {
            ObjectiveSense::Maximize => OptimizationDirection::Maximize,
            ObjectiveSense::Minimize => OptimizationDirection::Minimize,
        };
        let mut pb = Problem::new(direction);
        let vars: Vec<::microlp::Variable> = problem
            .variables()
            .map(|v| match v.variable_type {
                VariableType::Continuous => {
                    pb.add_var(v.objective_coefficient, (v.lower_bound, v.upper_bound))
                }
                VariableType::Binary => pb.add_binary_var(v.objective_coefficient),
            })
            .collect();
        for cons in problem.constraints() {
            // microlp rejects empty expressions, so decide those rows here
            if cons.terms.is_empty() {
                if cons.is_satisfied(&[], 0f64) {
                    continue;
                }
                return Ok(ProblemSolution::without_values(
                    OptimizationStatus::Infeasible,
                ));
            }
            let expr: Vec<(::microlp::Variable, f64)> = cons
                .terms
                .iter()
                .map(|t| (vars[t.column], t.coefficient))
                .collect();
            let op = match cons.sense {
                RowSense::Equal => ComparisonOp::Eq,
                RowSense::LessOrEqual => ComparisonOp::Le,
                RowSense::GreaterOrEqual => ComparisonOp::Ge,
            };
            pb.add_constraint(expr, op, cons.rhs);
        }
        match pb.solve() {
            Ok(solution) => {
                let values: Vec<f64> = vars.iter().map(|v| solution[*v]).collect();
                Ok(ProblemSolution::optimal(solution.objective(), values))
            }
            Err(::microlp::Error::Infeasible) => Ok(ProblemSolution::without_values(
                OptimizationStatus::Infeasible,
            )),
            Err(::microlp::Error::Unbounded) => Ok(ProblemSolution::without_values(
                OptimizationStatus::Unbounded,
            )),
            Err(::microlp::Error::InternalError(message)) => Err(SolverError::Backend {
                backend: "microlp",
                message,
            }),
        }
    }
}
