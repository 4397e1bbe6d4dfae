//! Inputs of a Must set search: the wild-type flux envelope, fixed fluxes and
//! excluded reactions
use indexmap::{IndexMap, IndexSet};

use crate::metabolic_model::network::NetworkPrimitives;
use crate::must_set::error::InputError;

/// Wild-type flux ranges, one `[min, max]` per reaction in network order
///
/// Usually the result of a flux variability analysis of the wild-type strain.
#[derive(Debug, Clone, PartialEq)]
pub struct FluxEnvelope {
    min: Vec<f64>,
    max: Vec<f64>,
}

impl FluxEnvelope {
    pub fn new(min: Vec<f64>, max: Vec<f64>) -> Self {
        FluxEnvelope { min, max }
    }

    pub fn min(&self) -> &[f64] {
        &self.min
    }

    pub fn max(&self) -> &[f64] {
        &self.max
    }

    /// Check the envelope against a network
    ///
    /// Both vectors need one finite entry per reaction, and `min` may exceed `max` by at
    /// most `tolerance`.
    pub fn validate(
        &self,
        network: &NetworkPrimitives,
        tolerance: f64,
    ) -> Result<(), InputError> {
        let expected = network.num_reactions();
        for (field, values) in [("min", &self.min), ("max", &self.max)] {
            if values.len() != expected {
                return Err(InputError::EnvelopeLengthMismatch {
                    field,
                    expected,
                    found: values.len(),
                });
            }
        }
        for (j, (&min, &max)) in self.min.iter().zip(&self.max).enumerate() {
            if !min.is_finite() || !max.is_finite() || min > max + tolerance {
                return Err(InputError::InvalidEnvelope {
                    reaction: network.reaction_id(j).to_string(),
                    min,
                    max,
                });
            }
        }
        Ok(())
    }

    /// Reactions worth testing: `false` only where both envelope ends are zero
    /// within `tolerance`
    ///
    /// # Examples
    /// ```rust
    /// use optforce_core::must_set::FluxEnvelope;
    /// let envelope = FluxEnvelope::new(vec![0., 0., -1.], vec![0., 2., 0.]);
    /// assert_eq!(envelope.candidate_mask(1e-7), vec![false, true, true]);
    /// ```
    pub fn candidate_mask(&self, tolerance: f64) -> Vec<bool> {
        self.min
            .iter()
            .zip(&self.max)
            .map(|(min, max)| !(min.abs() <= tolerance && max.abs() <= tolerance))
            .collect()
    }
}

/// Reactions whose flux is pinned to a single value in the inner problem
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FixedFluxes {
    values: IndexMap<String, f64>,
}

impl FixedFluxes {
    pub fn new() -> Self {
        FixedFluxes::default()
    }

    /// Build from parallel lists of reaction ids and values
    pub fn from_lists(ids: Vec<String>, values: Vec<f64>) -> Result<Self, InputError> {
        if ids.len() != values.len() {
            return Err(InputError::FixedLengthMismatch {
                ids: ids.len(),
                values: values.len(),
            });
        }
        Self::from_pairs(ids.into_iter().zip(values))
    }

    /// Build from (reaction id, value) pairs
    pub fn from_pairs<S, I>(pairs: I) -> Result<Self, InputError>
    where
        S: Into<String>,
        I: IntoIterator<Item = (S, f64)>,
    {
        let mut fixed = FixedFluxes::new();
        for (id, value) in pairs {
            fixed.insert(id, value)?;
        }
        Ok(fixed)
    }

    /// Pin a reaction to `value`, a reaction can only be pinned once
    pub fn insert<S: Into<String>>(&mut self, id: S, value: f64) -> Result<(), InputError> {
        let id = id.into();
        if !value.is_finite() {
            return Err(InputError::NonFiniteFixedValue(id));
        }
        if self.values.contains_key(&id) {
            return Err(InputError::DuplicateFixedReaction(id));
        }
        self.values.insert(id, value);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<f64> {
        self.values.get(id).copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(id, v)| (id.as_str(), *v))
    }

    /// Resolve ids to reaction positions, sorted by position
    pub fn resolve(&self, network: &NetworkPrimitives) -> Result<Vec<(usize, f64)>, InputError> {
        let mut resolved = self
            .values
            .iter()
            .map(|(id, value)| match network.reaction_index(id) {
                Some(j) => Ok((j, *value)),
                None => Err(InputError::UnknownReaction {
                    field: "fixed",
                    id: id.clone(),
                }),
            })
            .collect::<Result<Vec<_>, _>>()?;
        resolved.sort_by_key(|(j, _)| *j);
        Ok(resolved)
    }
}

/// Reactions which may never be part of a Must pair
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ExcludedReactions {
    ids: IndexSet<String>,
}

impl ExcludedReactions {
    pub fn new() -> Self {
        ExcludedReactions::default()
    }

    /// Build from reaction ids, repeated ids are kept once
    pub fn from_ids<S, I>(ids: I) -> Self
    where
        S: Into<String>,
        I: IntoIterator<Item = S>,
    {
        ExcludedReactions {
            ids: ids.into_iter().map(Into::into).collect(),
        }
    }

    pub fn insert<S: Into<String>>(&mut self, id: S) -> bool {
        self.ids.insert(id.into())
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.ids.contains(id)
    }

    /// Resolve ids to reaction positions, sorted ascending
    pub fn resolve(&self, network: &NetworkPrimitives) -> Result<Vec<usize>, InputError> {
        let mut resolved = self
            .ids
            .iter()
            .map(|id| {
                network
                    .reaction_index(id)
                    .ok_or_else(|| InputError::UnknownReaction {
                        field: "excluded",
                        id: id.clone(),
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        resolved.sort_unstable();
        Ok(resolved)
    }
}

impl<S: Into<String>> FromIterator<S> for ExcludedReactions {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        ExcludedReactions::from_ids(iter)
    }
}
