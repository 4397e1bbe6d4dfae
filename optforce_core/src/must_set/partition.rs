//! Split of the reactions into the roles they play in the MustLL formulation
use crate::metabolic_model::network::NetworkPrimitives;
use crate::must_set::error::InputError;
use crate::must_set::inputs::{ExcludedReactions, FixedFluxes, FluxEnvelope};

/// Role of a single reaction
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionRole {
    /// Flux pinned to a fixed value
    Fixed,
    /// Never selectable
    Excluded,
    /// Free and selectable by the outer binaries
    CandidateFree,
    /// Free, but trivially zero in the wild-type envelope
    OtherFree,
}

/// Four disjoint, ascending lists of reaction positions
///
/// Every reaction is in exactly one list. A reaction both fixed and excluded is
/// reported as fixed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReactionPartition {
    roles: Vec<ReactionRole>,
    fixed: Vec<usize>,
    excluded: Vec<usize>,
    candidate_free: Vec<usize>,
    other_free: Vec<usize>,
}

impl ReactionPartition {
    /// Partition the reactions of `network`
    ///
    /// # Errors
    /// An id in `fixed` or `excluded` which is not a reaction of `network`
    pub fn new(
        network: &NetworkPrimitives,
        envelope: &FluxEnvelope,
        fixed: &FixedFluxes,
        excluded: &ExcludedReactions,
        tolerance: f64,
    ) -> Result<Self, InputError> {
        envelope.validate(network, tolerance)?;
        let fixed = fixed
            .resolve(network)?
            .into_iter()
            .map(|(j, _)| j)
            .collect::<Vec<_>>();
        let excluded = excluded.resolve(network)?;
        Ok(Self::from_indices(
            &envelope.candidate_mask(tolerance),
            &fixed,
            &excluded,
        ))
    }

    /// Partition from already resolved positions
    ///
    /// The reaction count is the length of `candidate_mask`; out of range positions in
    /// `fixed` and `excluded` are ignored.
    pub fn from_indices(candidate_mask: &[bool], fixed: &[usize], excluded: &[usize]) -> Self {
        let n = candidate_mask.len();
        let mut is_fixed = vec![false; n];
        let mut is_excluded = vec![false; n];
        fixed.iter().filter(|&&j| j < n).for_each(|&j| is_fixed[j] = true);
        excluded
            .iter()
            .filter(|&&j| j < n)
            .for_each(|&j| is_excluded[j] = true);

        let roles = (0..n)
            .map(|j| {
                if is_fixed[j] {
                    ReactionRole::Fixed
                } else if is_excluded[j] {
                    ReactionRole::Excluded
                } else if candidate_mask[j] {
                    ReactionRole::CandidateFree
                } else {
                    ReactionRole::OtherFree
                }
            })
            .collect::<Vec<_>>();
        let with_role = |role: ReactionRole| {
            roles
                .iter()
                .enumerate()
                .filter(|(_, r)| **r == role)
                .map(|(j, _)| j)
                .collect::<Vec<_>>()
        };
        ReactionPartition {
            fixed: with_role(ReactionRole::Fixed),
            excluded: with_role(ReactionRole::Excluded),
            candidate_free: with_role(ReactionRole::CandidateFree),
            other_free: with_role(ReactionRole::OtherFree),
            roles,
        }
    }

    pub fn num_reactions(&self) -> usize {
        self.roles.len()
    }

    /// Role of the reaction at `index`, `None` when out of range
    pub fn role(&self, index: usize) -> Option<ReactionRole> {
        self.roles.get(index).copied()
    }

    pub fn fixed(&self) -> &[usize] {
        &self.fixed
    }

    pub fn excluded(&self) -> &[usize] {
        &self.excluded
    }

    pub fn candidate_free(&self) -> &[usize] {
        &self.candidate_free
    }

    pub fn other_free(&self) -> &[usize] {
        &self.other_free
    }

    /// Every reaction which is not fixed, ascending
    pub fn free(&self) -> Vec<usize> {
        self.roles
            .iter()
            .enumerate()
            .filter(|(_, r)| **r != ReactionRole::Fixed)
            .map(|(j, _)| j)
            .collect()
    }

    /// Number of unordered pairs of selectable reactions
    pub fn max_pairs(&self) -> usize {
        let k = self.candidate_free.len();
        k * k.saturating_sub(1) / 2
    }
}
