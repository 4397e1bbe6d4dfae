//! Iterative search for every Must pair
use tracing::{debug, info, warn};

use crate::metabolic_model::network::NetworkPrimitives;
use crate::must_set::error::MustSetError;
use crate::must_set::formulation::MustLLFormulation;
use crate::must_set::inputs::{ExcludedReactions, FixedFluxes, FluxEnvelope};
use crate::must_set::layout::Slot;
use crate::must_set::options::MustLLOptions;
use crate::must_set::result::{MustPair, MustSetResult, Termination};
use crate::optimize::problem::MilpProblem;
use crate::optimize::solvers::MilpSolver;
use crate::optimize::{OptimizationStatus, ProblemSolution};

/// State of the search between solver calls
#[derive(Debug)]
enum SearchState {
    /// Build the next problem and call the solver
    Ready,
    /// The solver produced a new pair
    Accepted(MustPair),
    /// The solver result can't be used, the search ends early
    Rejected(Termination),
    Done(Termination),
}

/// Find every MustLL pair of `network`
///
/// Builds the formulation once, then repeatedly solves it with `solver`, each time
/// cutting off the pairs found so far, until the solver reports infeasibility.
///
/// # Errors
/// Only invalid inputs are errors. Solver failures end the search and are reported
/// through [`MustSetResult::termination`], keeping every pair accepted before them.
pub fn find_must_ll<S: MilpSolver + ?Sized>(
    solver: &mut S,
    network: &NetworkPrimitives,
    envelope: &FluxEnvelope,
    fixed: &FixedFluxes,
    excluded: &ExcludedReactions,
    options: &MustLLOptions,
) -> Result<MustSetResult, MustSetError> {
    let formulation = MustLLFormulation::new(network, envelope, fixed, excluded, options)?;
    enumerate_pairs(solver, &formulation, options)
}

/// Run the search on an already built formulation
pub fn enumerate_pairs<S: MilpSolver + ?Sized>(
    solver: &mut S,
    formulation: &MustLLFormulation,
    options: &MustLLOptions,
) -> Result<MustSetResult, MustSetError> {
    let mut pairs: Vec<MustPair> = Vec::new();
    let selectable = formulation.partition().candidate_free().len();
    if selectable < 2 {
        info!(selectable, "Not enough selectable reactions to form a pair");
        return Ok(MustSetResult {
            pairs,
            termination: Termination::NoCandidates,
        });
    }
    info!(
        solver = solver.name(),
        selectable,
        max_pairs = formulation.partition().max_pairs(),
        "Starting MustLL search"
    );

    let mut state = SearchState::Ready;
    let termination = loop {
        state = match state {
            SearchState::Ready => {
                if options
                    .max_iterations
                    .is_some_and(|limit| pairs.len() >= limit)
                {
                    SearchState::Done(Termination::IterationLimit)
                } else {
                    let cuts = pairs.iter().map(MustPair::indices).collect::<Vec<_>>();
                    let problem = formulation.problem_with_cuts(&cuts)?;
                    debug!(
                        iteration = pairs.len() + 1,
                        columns = problem.num_variables(),
                        rows = problem.num_constraints(),
                        "Solving MustLL problem"
                    );
                    match solver.solve(&problem) {
                        Err(err) => SearchState::Rejected(Termination::SolverFailed {
                            message: err.to_string(),
                        }),
                        Ok(solution) => match solution.status {
                            OptimizationStatus::Optimal => {
                                match read_pair(formulation, &problem, &solution, &pairs, options)
                                {
                                    Ok(pair) => SearchState::Accepted(pair),
                                    Err(message) => {
                                        SearchState::Rejected(Termination::SolverFailed { message })
                                    }
                                }
                            }
                            OptimizationStatus::Infeasible => {
                                SearchState::Done(Termination::Exhausted)
                            }
                            status => {
                                SearchState::Rejected(Termination::SolverStopped { status })
                            }
                        },
                    }
                }
            }
            SearchState::Accepted(pair) => {
                info!(
                    iteration = pairs.len() + 1,
                    first = %pair.first_id,
                    second = %pair.second_id,
                    objective = pair.objective_value,
                    "Accepted Must pair"
                );
                pairs.push(pair);
                SearchState::Ready
            }
            SearchState::Rejected(termination) => {
                warn!(
                    pairs = pairs.len(),
                    ?termination,
                    "MustLL search stopped before exhausting all pairs"
                );
                SearchState::Done(termination)
            }
            SearchState::Done(termination) => break termination,
        };
    };

    info!(pairs = pairs.len(), ?termination, "MustLL search finished");
    Ok(MustSetResult { pairs, termination })
}

/// Read the selected pair out of an optimal solution
fn read_pair(
    formulation: &MustLLFormulation,
    problem: &MilpProblem,
    solution: &ProblemSolution,
    accepted: &[MustPair],
    options: &MustLLOptions,
) -> Result<MustPair, String> {
    let values = solution
        .variable_values
        .as_deref()
        .ok_or_else(|| "optimal status without variable values".to_string())?;
    if values.len() != problem.num_variables() {
        return Err(format!(
            "solution has {} values, the problem has {} columns",
            values.len(),
            problem.num_variables()
        ));
    }
    audit_solution(problem, values, options.feasibility_tolerance);

    let layout = formulation.layout();
    let first = layout.selected_reaction(values, Slot::First, options.binary_threshold)?;
    let second = layout.selected_reaction(values, Slot::Second, options.binary_threshold)?;
    let network = formulation.network();
    if first == second {
        return Err(format!(
            "reaction {} selected for both slots",
            network.reaction_id(first)
        ));
    }
    if accepted.iter().any(|p| p.contains_pair(first, second)) {
        return Err(format!(
            "pair ({}, {}) found again despite its cuts",
            network.reaction_id(first),
            network.reaction_id(second)
        ));
    }
    Ok(MustPair {
        first,
        second,
        first_id: network.reaction_id(first).to_string(),
        second_id: network.reaction_id(second).to_string(),
        objective_value: values[layout.objective()],
    })
}

/// Log rows and columns the solver left violated
fn audit_solution(problem: &MilpProblem, values: &[f64], tolerance: f64) {
    let rows = problem.violated_constraints(values, tolerance).unwrap_or_default();
    let columns = problem.violated_variables(values, tolerance).unwrap_or_default();
    if !rows.is_empty() || !columns.is_empty() {
        warn!(
            rows = rows.len(),
            columns = columns.len(),
            first_row = rows.first().copied().unwrap_or(""),
            first_column = columns.first().copied().unwrap_or(""),
            "Solver solution violates the problem beyond tolerance"
        );
    }
}
