//! Module providing JSON input for Models, in the COBRA JSON layout
use std::fs;
use std::path::Path;

use indexmap::IndexMap;
use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

use crate::metabolic_model::metabolite::Metabolite;
use crate::metabolic_model::model::Model;
use crate::metabolic_model::reaction::{ReactionBuilder, ReactionBuilderError};

// region JSON Model
/// Represents a JSON serialized model
#[derive(Deserialize)]
struct JsonModel {
    metabolites: Vec<JsonMetabolite>,
    reactions: Vec<JsonReaction>,
    id: Option<String>,
    compartments: Option<IndexMap<String, String>>,
    version: Option<Value>,
}

#[derive(Deserialize)]
struct JsonMetabolite {
    id: String,
    name: Option<String>,
    compartment: Option<String>,
    charge: Option<i32>,
    formula: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}

/// Genes and gene reaction rules are skipped
#[derive(Deserialize)]
struct JsonReaction {
    id: String,
    name: Option<String>,
    metabolites: IndexMap<String, f64>,
    lower_bound: f64,
    upper_bound: f64,
    objective_coefficient: Option<f64>,
    subsystem: Option<String>,
    notes: Option<Value>,
    annotation: Option<Value>,
}
// endregion JSON Model

// region Conversions
impl From<JsonMetabolite> for Metabolite {
    fn from(m: JsonMetabolite) -> Self {
        // Notes and annotations are loosely structured, so they are kept as JSON text
        Self {
            id: m.id,
            name: m.name,
            compartment: m.compartment,
            charge: m.charge.unwrap_or_default(),
            formula: m.formula,
            notes: m.notes.map(|v| v.to_string()),
            annotation: m.annotation.map(|v| v.to_string()),
        }
    }
}

impl Model {
    /// Read a model from a COBRA JSON file
    pub fn read_json<P: AsRef<Path>>(path: P) -> Result<Model, JsonError> {
        let model_str = fs::read_to_string(path)?;
        Model::from_json_str(&model_str)
    }

    /// Read a model from a COBRA JSON string
    ///
    /// # Examples
    /// ```rust
    /// use optforce_core::metabolic_model::model::Model;
    /// let model = Model::from_json_str(r#"{
    ///     "metabolites": [{"id": "a"}],
    ///     "reactions": [{"id": "EX_a", "metabolites": {"a": -1.0},
    ///                    "lower_bound": -10.0, "upper_bound": 1000.0}]
    /// }"#).unwrap();
    /// assert_eq!(model.reaction_ids(), vec!["EX_a".to_string()]);
    /// ```
    pub fn from_json_str(model_str: &str) -> Result<Model, JsonError> {
        let json_model = serde_json::from_str::<JsonModel>(model_str)?;
        Model::from_json(json_model)
    }

    fn from_json(json_model: JsonModel) -> Result<Self, JsonError> {
        let mut model = Model::new_empty();
        json_model.metabolites.into_iter().for_each(|m| {
            model.add_metabolite(Metabolite::from(m));
        });
        for rxn in json_model.reactions {
            if model.reactions.contains_key(&rxn.id) {
                return Err(JsonError::DuplicateReaction(rxn.id));
            }
            let new_reaction = ReactionBuilder::default()
                .id(rxn.id.clone())
                .metabolites(rxn.metabolites)
                .name(rxn.name)
                .lower_bound(rxn.lower_bound)
                .upper_bound(rxn.upper_bound)
                .subsystem(rxn.subsystem)
                .notes(rxn.notes.map(|v| v.to_string()))
                .annotation(rxn.annotation.map(|v| v.to_string()))
                .build()?;
            model.add_reaction(new_reaction);
            // Add the reaction to the objective function if it has a coefficient
            match rxn.objective_coefficient {
                Some(coef) if coef != 0. => model.set_objective_coefficient(&rxn.id, coef),
                _ => {}
            }
        }
        model.id = json_model.id;
        model.compartments = json_model.compartments;
        // Versions are written both as strings and as numbers
        model.version = json_model.version.map(|v| match v {
            Value::String(s) => s,
            other => other.to_string(),
        });
        Ok(model)
    }
}
// endregion Conversions

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unable to read file: {0}")]
    UnableToRead(#[from] std::io::Error),
    #[error("Unable to parse json: {0}")]
    UnableToParse(#[from] serde_json::Error),
    #[error("Unable to build reaction")]
    UnableToBuildReaction(#[from] ReactionBuilderError),
    #[error("Reaction {0} appears more than once")]
    DuplicateReaction(String),
}
