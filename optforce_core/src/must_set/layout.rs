//! Mapping from the logical variables of the MustLL formulation to problem columns
use indexmap::IndexMap;

use crate::metabolic_model::network::NetworkPrimitives;
use crate::must_set::partition::ReactionPartition;
use crate::optimize::problem::{MilpProblem, ProblemError};
use crate::optimize::variable::VariableType;

/// One of the two selection slots of a Must pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub const BOTH: [Slot; 2] = [Slot::First, Slot::Second];

    /// Suffix used in column and row ids
    pub fn label(&self) -> &'static str {
        match self {
            Slot::First => "1",
            Slot::Second => "2",
        }
    }
}

/// Columns belonging to one selectable reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotColumns {
    pub witness_first: usize,
    pub witness_second: usize,
    pub select_first: usize,
    pub select_second: usize,
}

impl SlotColumns {
    /// Continuous column equal to the reaction flux when the slot selects the reaction
    pub fn witness(&self, slot: Slot) -> usize {
        match slot {
            Slot::First => self.witness_first,
            Slot::Second => self.witness_second,
        }
    }

    /// Binary column selecting the reaction for `slot`
    pub fn select(&self, slot: Slot) -> usize {
        match slot {
            Slot::First => self.select_first,
            Slot::Second => self.select_second,
        }
    }
}

/// Column positions of every logical variable
///
/// Columns are allocated in blocks: fluxes, first witnesses, second witnesses, first
/// selections, second selections, metabolite duals, fixed flux duals, lower bound
/// duals, upper bound duals and finally the outer objective.
#[derive(Debug, Clone, PartialEq)]
pub struct ColumnLayout {
    flux: Vec<usize>,
    slots: IndexMap<usize, SlotColumns>,
    metabolite_duals: Vec<usize>,
    fixed_duals: IndexMap<usize, usize>,
    lower_bound_duals: IndexMap<usize, usize>,
    upper_bound_duals: IndexMap<usize, usize>,
    objective: usize,
}

impl ColumnLayout {
    /// Add every column of the formulation to `problem` and record where it went
    ///
    /// Witness columns are bounded by `[-big_m, big_m]`, bound duals are non-negative,
    /// everything else continuous is free.
    pub fn allocate(
        problem: &mut MilpProblem,
        network: &NetworkPrimitives,
        partition: &ReactionPartition,
        big_m: f64,
    ) -> Result<Self, ProblemError> {
        let inf = f64::INFINITY;
        let rxn = |j: usize| network.reaction_id(j);

        let flux = (0..network.num_reactions())
            .map(|j| {
                problem.add_new_variable(&format!("v[{}]", rxn(j)), VariableType::Continuous, -inf, inf)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let candidates = partition.candidate_free();
        let mut witness = [Vec::new(), Vec::new()];
        for (s, slot) in Slot::BOTH.iter().enumerate() {
            for &j in candidates {
                witness[s].push(problem.add_new_variable(
                    &format!("w{}[{}]", slot.label(), rxn(j)),
                    VariableType::Continuous,
                    -big_m,
                    big_m,
                )?);
            }
        }
        let mut select = [Vec::new(), Vec::new()];
        for (s, slot) in Slot::BOTH.iter().enumerate() {
            for &j in candidates {
                select[s].push(
                    problem.add_new_binary_variable(&format!("y{}[{}]", slot.label(), rxn(j)))?,
                );
            }
        }
        let slots = candidates
            .iter()
            .enumerate()
            .map(|(k, &j)| {
                (
                    j,
                    SlotColumns {
                        witness_first: witness[0][k],
                        witness_second: witness[1][k],
                        select_first: select[0][k],
                        select_second: select[1][k],
                    },
                )
            })
            .collect();

        let metabolite_duals = network
            .metabolite_ids()
            .iter()
            .map(|met| {
                problem.add_new_variable(&format!("lambda[{}]", met), VariableType::Continuous, -inf, inf)
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut fixed_duals = IndexMap::new();
        for &j in partition.fixed() {
            let col = problem.add_new_variable(
                &format!("rho[{}]", rxn(j)),
                VariableType::Continuous,
                -inf,
                inf,
            )?;
            fixed_duals.insert(j, col);
        }
        let free = partition.free();
        let mut lower_bound_duals = IndexMap::new();
        for &j in &free {
            let col = problem.add_new_variable(
                &format!("mu[{}]", rxn(j)),
                VariableType::Continuous,
                0.,
                inf,
            )?;
            lower_bound_duals.insert(j, col);
        }
        let mut upper_bound_duals = IndexMap::new();
        for &j in &free {
            let col = problem.add_new_variable(
                &format!("nu[{}]", rxn(j)),
                VariableType::Continuous,
                0.,
                inf,
            )?;
            upper_bound_duals.insert(j, col);
        }
        let objective = problem.add_new_variable("z", VariableType::Continuous, -inf, inf)?;

        Ok(ColumnLayout {
            flux,
            slots,
            metabolite_duals,
            fixed_duals,
            lower_bound_duals,
            upper_bound_duals,
            objective,
        })
    }

    /// Flux column of reaction `reaction`
    ///
    /// # Panics
    /// If `reaction` is not a reaction position
    pub fn flux(&self, reaction: usize) -> usize {
        self.flux[reaction]
    }

    /// Witness and selection columns, only present for selectable reactions
    pub fn slot(&self, reaction: usize) -> Option<&SlotColumns> {
        self.slots.get(&reaction)
    }

    /// Selectable reactions with their columns, ascending by reaction
    pub fn slots(&self) -> impl Iterator<Item = (usize, &SlotColumns)> {
        self.slots.iter().map(|(j, cols)| (*j, cols))
    }

    pub fn num_selectable(&self) -> usize {
        self.slots.len()
    }

    /// Dual column of the mass balance row of metabolite `metabolite`
    ///
    /// # Panics
    /// If `metabolite` is not a metabolite position
    pub fn metabolite_dual(&self, metabolite: usize) -> usize {
        self.metabolite_duals[metabolite]
    }

    pub fn fixed_dual(&self, reaction: usize) -> Option<usize> {
        self.fixed_duals.get(&reaction).copied()
    }

    pub fn lower_bound_dual(&self, reaction: usize) -> Option<usize> {
        self.lower_bound_duals.get(&reaction).copied()
    }

    pub fn upper_bound_dual(&self, reaction: usize) -> Option<usize> {
        self.upper_bound_duals.get(&reaction).copied()
    }

    /// Column of the outer objective
    pub fn objective(&self) -> usize {
        self.objective
    }

    /// Reaction selected by `slot` in a solution
    ///
    /// # Errors
    /// Unless exactly one selection binary of `slot` is above `threshold`
    pub fn selected_reaction(
        &self,
        values: &[f64],
        slot: Slot,
        threshold: f64,
    ) -> Result<usize, String> {
        let mut active = self
            .slots
            .iter()
            .filter(|(_, cols)| values.get(cols.select(slot)).is_some_and(|&y| y > threshold))
            .map(|(j, _)| *j);
        match (active.next(), active.next()) {
            (Some(j), None) => Ok(j),
            (None, _) => Err(format!("no selection binary active for slot {}", slot.label())),
            (Some(_), Some(_)) => Err(format!(
                "more than one selection binary active for slot {}",
                slot.label()
            )),
        }
    }
}
