//! Shared fixtures for the must_set tests
use std::collections::VecDeque;
use std::sync::Once;

use indexmap::IndexMap;
use nalgebra_sparse::{CooMatrix, CscMatrix};

use crate::metabolic_model::model::Model;
use crate::metabolic_model::network::NetworkPrimitives;
use crate::metabolic_model::reaction::ReactionBuilder;
use crate::must_set::inputs::{ExcludedReactions, FixedFluxes, FluxEnvelope};
use crate::must_set::layout::ColumnLayout;
use crate::must_set::partition::ReactionPartition;
use crate::optimize::constraint::Constraint;
use crate::optimize::problem::MilpProblem;
use crate::optimize::solvers::{MilpSolver, SolverError};
use crate::optimize::variable::VariableType;
use crate::optimize::{OptimizationStatus, ProblemSolution};

static TRACING: Once = Once::new();

pub(crate) fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::DEBUG)
            .with_test_writer()
            .try_init();
    });
}

/// `(id, stoichiometry, lower bound, upper bound)`
pub(crate) type Entry = (&'static str, &'static [(&'static str, f64)], f64, f64);

pub(crate) fn network_of(reactions: &[Entry]) -> NetworkPrimitives {
    let mut model = Model::new_empty();
    for &(id, stoich, lower_bound, upper_bound) in reactions {
        let metabolites = stoich
            .iter()
            .map(|(met, coef)| (met.to_string(), *coef))
            .collect::<IndexMap<_, _>>();
        model.add_reaction(
            ReactionBuilder::default()
                .id(id.to_string())
                .metabolites(metabolites)
                .lower_bound(lower_bound)
                .upper_bound(upper_bound)
                .build()
                .unwrap(),
        );
    }
    NetworkPrimitives::from_model(&model).unwrap()
}

/// Uptake `EX_a` of metabolite a, `R1` converting a to b and `R2` draining b
pub(crate) fn toy_network() -> NetworkPrimitives {
    let reactions: [Entry; 3] = [
        ("EX_a", &[("a", -1.)], -1000., 1000.),
        ("R1", &[("a", -1.), ("b", 1.)], 0., 1000.),
        ("R2", &[("b", -1.)], 0., 1000.),
    ];
    network_of(&reactions)
}

pub(crate) fn toy_envelope() -> FluxEnvelope {
    FluxEnvelope::new(vec![-10., 5., 5.], vec![-10., 10., 10.])
}

/// `EX_a` fixed at -10
pub(crate) const TOY_FIXED: [(usize, f64); 1] = [(0, -10.)];

pub(crate) fn toy_fixed() -> FixedFluxes {
    FixedFluxes::from_pairs([("EX_a", -10.)]).unwrap()
}

pub(crate) fn toy_partition() -> ReactionPartition {
    ReactionPartition::new(
        &toy_network(),
        &toy_envelope(),
        &toy_fixed(),
        &ExcludedReactions::new(),
        1e-7,
    )
    .unwrap()
}

/// Optimal point of the toy with R1 in the first slot and R2 in the second
///
/// Fluxes (-10, 10, 10), duals lambda = (-2, -1), rho = -2, bound duals zero, z = 10.
pub(crate) fn toy_assignment(problem: &MilpProblem, layout: &ColumnLayout) -> Vec<f64> {
    let mut values = vec![0.; problem.num_variables()];
    values[layout.flux(0)] = -10.;
    values[layout.flux(1)] = 10.;
    values[layout.flux(2)] = 10.;
    let r1 = layout.slot(1).unwrap();
    let r2 = layout.slot(2).unwrap();
    values[r1.select_first] = 1.;
    values[r1.witness_first] = 10.;
    values[r2.select_second] = 1.;
    values[r2.witness_second] = 10.;
    values[layout.metabolite_dual(0)] = -2.;
    values[layout.metabolite_dual(1)] = -1.;
    values[layout.fixed_dual(0).unwrap()] = -2.;
    values[layout.objective()] = 10.;
    values
}

/// Uptake `EX_a` fixed at -10 splitting into `R1` (a to b) and `R2` (a to c),
/// drained by `R3` (b) and `R4` (c)
///
/// Every branch carries between 2 and 8 in the reference envelope, so each pair
/// covering the whole uptake improves the summed minimum of 4 by 6.
#[cfg(any(feature = "microlp", feature = "highs"))]
pub(crate) fn branching_network() -> (NetworkPrimitives, FluxEnvelope, FixedFluxes) {
    let reactions: [Entry; 5] = [
        ("EX_a", &[("a", -1.)], -1000., 1000.),
        ("R1", &[("a", -1.), ("b", 1.)], 0., 1000.),
        ("R2", &[("a", -1.), ("c", 1.)], 0., 1000.),
        ("R3", &[("b", -1.)], 0., 1000.),
        ("R4", &[("c", -1.)], 0., 1000.),
    ];
    let network = network_of(&reactions);
    let envelope = FluxEnvelope::new(
        vec![-10., 2., 2., 2., 2.],
        vec![-10., 8., 8., 8., 8.],
    );
    let fixed = FixedFluxes::from_pairs([("EX_a", -10.)]).unwrap();
    (network, envelope, fixed)
}

/// `k` unconnected reactions `R1..Rk` in `[0, 10]`, all selectable
pub(crate) fn line_network(k: usize) -> (NetworkPrimitives, FluxEnvelope) {
    let network = NetworkPrimitives::from_parts(
        (1..=k).map(|i| format!("R{}", i)).collect(),
        Vec::new(),
        CscMatrix::from(&CooMatrix::<f64>::new(0, k)),
        vec![0.; k],
        vec![10.; k],
        vec![0.; k],
        None,
    )
    .unwrap();
    (network, FluxEnvelope::new(vec![1.; k], vec![10.; k]))
}

/// Combinatorial stand-in for a MILP solver
///
/// Tries every assignment with exactly two binaries at one, in lexicographic column
/// order, and accepts the first one satisfying every row made of binaries only.
/// Continuous columns are left at zero.
#[derive(Debug, Default)]
pub(crate) struct ToyOracle {
    pub calls: usize,
}

impl MilpSolver for ToyOracle {
    fn name(&self) -> &'static str {
        "toy"
    }

    fn solve(&mut self, problem: &MilpProblem) -> Result<ProblemSolution, SolverError> {
        self.calls += 1;
        let is_binary = problem
            .variables()
            .map(|v| v.variable_type == VariableType::Binary)
            .collect::<Vec<_>>();
        let binaries = (0..is_binary.len())
            .filter(|&c| is_binary[c])
            .collect::<Vec<_>>();
        let rows = problem
            .constraints()
            .filter(|c| c.terms.iter().all(|t| is_binary[t.column]))
            .collect::<Vec<&Constraint>>();
        for a in 0..binaries.len() {
            for b in a + 1..binaries.len() {
                let mut values = vec![0.; problem.num_variables()];
                values[binaries[a]] = 1.;
                values[binaries[b]] = 1.;
                if rows.iter().all(|c| c.is_satisfied(&values, 1e-9)) {
                    let objective = problem.objective_value(&values).unwrap_or(0.);
                    return Ok(ProblemSolution::optimal(objective, values));
                }
            }
        }
        Ok(ProblemSolution::without_values(
            OptimizationStatus::Infeasible,
        ))
    }
}

/// Replays scripted answers, `None` entries and calls past the script go to a [`ToyOracle`]
pub(crate) struct ScriptedOracle {
    script: VecDeque<Option<Result<ProblemSolution, SolverError>>>,
    repeat_first: bool,
    first: Option<ProblemSolution>,
    toy: ToyOracle,
}

impl ScriptedOracle {
    pub fn new(script: Vec<Option<Result<ProblemSolution, SolverError>>>) -> Self {
        ScriptedOracle {
            script: script.into(),
            repeat_first: false,
            first: None,
            toy: ToyOracle::default(),
        }
    }

    /// Answers every call with the toy answer to the first call
    pub fn repeating_first() -> Self {
        ScriptedOracle {
            repeat_first: true,
            ..ScriptedOracle::new(Vec::new())
        }
    }
}

impl MilpSolver for ScriptedOracle {
    fn name(&self) -> &'static str {
        "scripted"
    }

    fn solve(&mut self, problem: &MilpProblem) -> Result<ProblemSolution, SolverError> {
        if let Some(first) = &self.first {
            return Ok(first.clone());
        }
        let answer = match self.script.pop_front() {
            Some(Some(answer)) => answer,
            _ => self.toy.solve(problem),
        };
        if self.repeat_first {
            if let Ok(solution) = &answer {
                self.first = Some(solution.clone());
            }
        }
        answer
    }
}
