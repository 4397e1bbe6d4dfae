//! Outcome of a Must set search
use serde::Serialize;

use crate::optimize::OptimizationStatus;
use crate::utils::unique_in_order;

/// A pair of reactions which must be forced together, as found by one iteration
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MustPair {
    /// Reaction selected by the first slot
    pub first: usize,
    /// Reaction selected by the second slot
    pub second: usize,
    pub first_id: String,
    pub second_id: String,
    /// Outer objective of the accepted iteration
    pub objective_value: f64,
}

impl MustPair {
    /// Whether this pair holds reactions `a` and `b`, in either order
    pub fn contains_pair(&self, a: usize, b: usize) -> bool {
        (self.first == a && self.second == b) || (self.first == b && self.second == a)
    }

    pub fn indices(&self) -> (usize, usize) {
        (self.first, self.second)
    }

    pub fn ids(&self) -> (&str, &str) {
        (&self.first_id, &self.second_id)
    }
}

/// Why a search stopped
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Termination {
    /// The solver proved no further pair exists
    Exhausted,
    /// Fewer than two selectable reactions, the solver was never called
    NoCandidates,
    /// The configured maximum number of pairs was reached
    IterationLimit,
    /// The solver ended with a status other than optimal or infeasible
    SolverStopped { status: OptimizationStatus },
    /// The solver failed, or returned a solution no pair could be read from
    SolverFailed { message: String },
}

impl Termination {
    /// Whether every pair has been found
    pub fn is_complete(&self) -> bool {
        matches!(self, Termination::Exhausted | Termination::NoCandidates)
    }
}

/// Pairs in discovery order and the reason the search stopped
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MustSetResult {
    pub pairs: Vec<MustPair>,
    pub termination: Termination,
}

impl MustSetResult {
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    pub fn is_complete(&self) -> bool {
        self.termination.is_complete()
    }

    /// Reaction id pairs in discovery order
    pub fn pair_ids(&self) -> Vec<(String, String)> {
        self.pairs
            .iter()
            .map(|p| (p.first_id.clone(), p.second_id.clone()))
            .collect()
    }

    /// Reaction index pairs in discovery order
    pub fn pair_indices(&self) -> Vec<(usize, usize)> {
        self.pairs.iter().map(MustPair::indices).collect()
    }

    /// Every reaction id appearing in a pair, in order of first appearance
    pub fn unique_reaction_ids(&self) -> Vec<String> {
        unique_in_order(
            self.pairs
                .iter()
                .flat_map(|p| [p.first_id.clone(), p.second_id.clone()]),
        )
    }

    /// Every reaction index appearing in a pair, in order of first appearance
    pub fn unique_reaction_indices(&self) -> Vec<usize> {
        unique_in_order(self.pairs.iter().flat_map(|p| [p.first, p.second]))
    }

    /// JSON report of the pairs, the flattened reaction lists and the termination
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(&serde_json::json!({
            "pairs": self.pairs,
            "unique_reaction_ids": self.unique_reaction_ids(),
            "unique_reaction_indices": self.unique_reaction_indices(),
            "termination": self.termination,
        }))
    }
}
