//! Solver interface for HiGHS
use ::highs::{Col, HighsModelStatus, RowProblem, Sense};
use tracing::debug;

use crate::optimize::constraint::RowSense;
use crate::optimize::objective::ObjectiveSense;
use crate::optimize::problem::MilpProblem;
use crate::optimize::solvers::{MilpSolver, SolverError};
use crate::optimize::variable::VariableType;
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// HiGHS mixed integer solver
#[derive(Clone, Debug, Default)]
pub struct HighsSolver {
    /// Wall clock limit for a single solve, in seconds
    pub time_limit: Option<f64>,
    /// Let HiGHS print its own log
    pub verbose: bool,
}

impl HighsSolver {
    pub fn with_time_limit(time_limit: f64) -> Self {
        HighsSolver {
            time_limit: Some(time_limit),
            verbose: false,
        }
    }
}

impl MilpSolver for HighsSolver {
    fn name(&self) -> &'static str {
        "highs"
    }

    fn solve(&mut self, problem: &MilpProblem) -> Result<ProblemSolution, SolverError> {
        if problem.num_variables() == 0 {
            return Err(SolverError::EmptyProblem);
        }
        let mut pb = RowProblem::default();
        let cols: Vec<Col> = problem
            .variables()
            .map(|v| match v.variable_type {
                VariableType::Continuous => {
                    pb.add_column(v.objective_coefficient, v.lower_bound..=v.upper_bound)
                }
                VariableType::Binary => {
                    pb.add_integer_column(v.objective_coefficient, v.lower_bound..=v.upper_bound)
                }
            })
            .collect();
        for cons in problem.constraints() {
            let factors: Vec<(Col, f64)> = cons
                .terms
                .iter()
                .map(|t| (cols[t.column], t.coefficient))
                .collect();
            match cons.sense {
                RowSense::Equal => {
                    pb.add_row(cons.rhs..=cons.rhs, &factors);
                }
                RowSense::LessOrEqual => {
                    pb.add_row(..=cons.rhs, &factors);
                }
                RowSense::GreaterOrEqual => {
                    pb.add_row(cons.rhs.., &factors);
                }
            }
        }
        let sense = match problem.sense() {
            ObjectiveSense::Maximize => Sense::Maximise,
            ObjectiveSense::Minimize => Sense::Minimise,
        };
        let mut model = pb.optimise(sense);
        model.set_option("output_flag", self.verbose);
        if let Some(limit) = self.time_limit {
            model.set_option("time_limit", limit);
        }
        let solved = model.try_solve().map_err(|status| SolverError::Backend {
            backend: "highs",
            message: format!("{:?}", status),
        })?;
        let model_status = solved.status();
        debug!(backend = "highs", status = ?model_status, "solve finished");
        let status = match model_status {
            HighsModelStatus::Optimal => OptimizationStatus::Optimal,
            // Presolve reports infeasible integer programs this way
            HighsModelStatus::Infeasible | HighsModelStatus::UnboundedOrInfeasible => {
                OptimizationStatus::Infeasible
            }
            HighsModelStatus::Unbounded => OptimizationStatus::Unbounded,
            HighsModelStatus::ReachedTimeLimit | HighsModelStatus::ReachedIterationLimit => {
                OptimizationStatus::SolverHalted
            }
            _ => OptimizationStatus::NumericalError,
        };
        if status != OptimizationStatus::Optimal {
            return Ok(ProblemSolution::without_values(status));
        }
        let values = solved.get_solution().columns().to_vec();
        let objective = problem
            .objective_value(&values)
            .map_err(|err| SolverError::Backend {
                backend: "highs",
                message: err.to_string(),
            })?;
        Ok(ProblemSolution::optimal(objective, values))
    }
}
