//! This module provides the Model struct for representing an entire metabolic model
use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::reaction::Reaction;

use indexmap::IndexMap;

/// Represents a Genome Scale Metabolic Model
///
/// Reactions and metabolites keep their insertion order, and that order defines the
/// column and row positions used by every matrix built from the model.
#[derive(Clone, Debug)]
pub struct Model {
    /// Map of reaction ids to Reaction Objects
    pub reactions: IndexMap<String, Reaction>,
    /// Map of metabolite ids to Metabolite Objects
    pub metabolites: IndexMap<String, Metabolite>,
    /// Map of reaction ids to objective function coefficients
    pub objective: IndexMap<String, f64>,
    /// Id associated with the Model
    pub id: Option<String>,
    /// Compartments in the model
    ///
    /// An IndexMap<String, String> of {short name: long name}
    pub compartments: Option<IndexMap<String, String>>,
    /// A version identifier for the Model, stored as a string
    pub version: Option<String>,
}

impl Model {
    pub fn new_empty() -> Self {
        Model {
            reactions: IndexMap::new(),
            metabolites: IndexMap::new(),
            objective: IndexMap::new(),
            id: None,
            compartments: None,
            version: None,
        }
    }

    /// Add a reaction to the model
    ///
    /// Metabolites referenced by the reaction which are not yet part of the model are
    /// added with only their id.
    ///
    /// # Examples
    /// ```rust
    /// use optforce_core::metabolic_model::model::Model;
    /// use optforce_core::metabolic_model::reaction::ReactionBuilder;
    /// let mut model = Model::new_empty();
    /// let new_reaction = ReactionBuilder::default().id("new_reaction".to_string()).build().unwrap();
    /// model.add_reaction(new_reaction);
    /// assert_eq!(model.reaction_index("new_reaction"), Some(0));
    /// ```
    pub fn add_reaction(&mut self, reaction: Reaction) {
        for met in reaction.metabolites.keys() {
            if !self.metabolites.contains_key(met) {
                self.metabolites
                    .insert(met.clone(), Metabolite::new_id_only(met));
            }
        }
        let id = reaction.id.clone();
        self.reactions.insert(id, reaction);
    }

    /// Add a metabolite to the model
    pub fn add_metabolite(&mut self, metabolite: Metabolite) {
        let id = metabolite.id.clone();
        self.metabolites.insert(id, metabolite);
    }

    /// Set the objective coefficient of a reaction
    pub fn set_objective_coefficient(&mut self, reaction_id: &str, coefficient: f64) {
        self.objective.insert(reaction_id.to_string(), coefficient);
    }

    /// Position of a reaction in the model's reaction order
    pub fn reaction_index(&self, reaction_id: &str) -> Option<usize> {
        self.reactions.get_index_of(reaction_id)
    }

    /// Reaction ids in model order
    pub fn reaction_ids(&self) -> Vec<String> {
        self.reactions.keys().cloned().collect()
    }

    /// Metabolite ids in model order
    pub fn metabolite_ids(&self) -> Vec<String> {
        self.metabolites.keys().cloned().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metabolic_model::reaction::ReactionBuilder;

    #[test]
    fn add_reaction_registers_metabolites() {
        let mut model = Model::new_empty();
        let mut stoich = IndexMap::new();
        stoich.insert("a".to_string(), -1.);
        stoich.insert("b".to_string(), 1.);
        model.add_reaction(
            ReactionBuilder::default()
                .id("R1".to_string())
                .metabolites(stoich)
                .build()
                .unwrap(),
        );
        assert_eq!(model.metabolite_ids(), vec!["a".to_string(), "b".to_string()]);
        assert_eq!(model.reaction_ids(), vec!["R1".to_string()]);
        assert_eq!(model.reaction_index("R1"), Some(0));
        assert_eq!(model.reaction_index("R2"), None);
    }

    #[test]
    fn existing_metabolites_are_kept() {
        let mut model = Model::new_empty();
        let mut glc = Metabolite::new_id_only("glc");
        glc.name = Some("Glucose".to_string());
        model.add_metabolite(glc);
        let mut stoich = IndexMap::new();
        stoich.insert("glc".to_string(), -1.);
        model.add_reaction(
            ReactionBuilder::default()
                .id("EX_glc".to_string())
                .metabolites(stoich)
                .build()
                .unwrap(),
        );
        assert_eq!(model.metabolites.len(), 1);
        assert_eq!(
            model.metabolites.get("glc").unwrap().name.clone().unwrap(),
            "Glucose"
        );
    }
}
