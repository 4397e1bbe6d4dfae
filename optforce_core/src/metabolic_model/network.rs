//! Matrix view of a metabolic network, used as the input of the Must set formulations
use indexmap::IndexSet;
use nalgebra::DVector;
use nalgebra_sparse::{CooMatrix, CscMatrix, CsrMatrix};
use thiserror::Error;

use crate::metabolic_model::model::Model;

/// Dimensioned primitives of a metabolic network
///
/// The stoichiometric matrix has one row per metabolite and one column per reaction, in
/// the order of `metabolite_ids` and `reaction_ids`.
#[derive(Clone, Debug)]
pub struct NetworkPrimitives {
    reaction_ids: IndexSet<String>,
    metabolite_ids: IndexSet<String>,
    stoichiometry: CscMatrix<f64>,
    lower_bounds: DVector<f64>,
    upper_bounds: DVector<f64>,
    objective: DVector<f64>,
    /// Right hand side of the mass balance `S v = b`, conventionally zero
    balance_rhs: DVector<f64>,
}

impl NetworkPrimitives {
    /// Extract the network primitives from a [`Model`]
    ///
    /// # Errors
    /// - The model has no reactions
    /// - A reaction references a metabolite missing from the model
    /// - A reaction has lower_bound > upper_bound
    /// - An objective coefficient refers to an unknown reaction, or is not finite
    pub fn from_model(model: &Model) -> Result<Self, NetworkError> {
        if model.reactions.is_empty() {
            return Err(NetworkError::MissingField("reactions"));
        }
        let n_mets = model.metabolites.len();
        let n_rxns = model.reactions.len();
        let mut coo = CooMatrix::new(n_mets, n_rxns);
        let mut lower_bounds = DVector::<f64>::zeros(n_rxns);
        let mut upper_bounds = DVector::<f64>::zeros(n_rxns);
        for (col, (rxn_id, rxn)) in model.reactions.iter().enumerate() {
            for (met_id, coef) in &rxn.metabolites {
                let row = match model.metabolites.get_index_of(met_id) {
                    Some(row) => row,
                    None => {
                        return Err(NetworkError::MetaboliteNotFound {
                            reaction: rxn_id.clone(),
                            metabolite: met_id.clone(),
                        })
                    }
                };
                if *coef != 0f64 {
                    coo.push(row, col, *coef);
                }
            }
            lower_bounds[col] = rxn.lower_bound;
            upper_bounds[col] = rxn.upper_bound;
        }
        let mut objective = DVector::<f64>::zeros(n_rxns);
        for (rxn_id, coef) in &model.objective {
            match model.reactions.get_index_of(rxn_id) {
                Some(col) => objective[col] = *coef,
                None => return Err(NetworkError::UnknownObjectiveReaction(rxn_id.clone())),
            }
        }
        let network = NetworkPrimitives {
            reaction_ids: model.reactions.keys().cloned().collect(),
            metabolite_ids: model.metabolites.keys().cloned().collect(),
            stoichiometry: CscMatrix::from(&coo),
            lower_bounds,
            upper_bounds,
            objective,
            balance_rhs: DVector::<f64>::zeros(n_mets),
        };
        network.validate_values()?;
        Ok(network)
    }

    /// Assemble network primitives from explicit parts
    ///
    /// `balance_rhs` defaults to the zero vector.
    ///
    /// # Errors
    /// Fails when a required part is empty, identifiers repeat, or any vector or matrix
    /// dimension disagrees with the reaction/metabolite counts.
    pub fn from_parts(
        reaction_ids: Vec<String>,
        metabolite_ids: Vec<String>,
        stoichiometry: CscMatrix<f64>,
        lower_bounds: Vec<f64>,
        upper_bounds: Vec<f64>,
        objective: Vec<f64>,
        balance_rhs: Option<Vec<f64>>,
    ) -> Result<Self, NetworkError> {
        if reaction_ids.is_empty() {
            return Err(NetworkError::MissingField("reaction_ids"));
        }
        let n_rxns = reaction_ids.len();
        let n_mets = metabolite_ids.len();
        let reaction_ids = unique_ids("reaction_ids", reaction_ids)?;
        let metabolite_ids = unique_ids("metabolite_ids", metabolite_ids)?;
        check_dimension("stoichiometry columns", n_rxns, stoichiometry.ncols())?;
        check_dimension("stoichiometry rows", n_mets, stoichiometry.nrows())?;
        check_dimension("lower_bounds", n_rxns, lower_bounds.len())?;
        check_dimension("upper_bounds", n_rxns, upper_bounds.len())?;
        check_dimension("objective", n_rxns, objective.len())?;
        let balance_rhs = match balance_rhs {
            Some(rhs) => {
                check_dimension("balance_rhs", n_mets, rhs.len())?;
                DVector::from_vec(rhs)
            }
            None => DVector::<f64>::zeros(n_mets),
        };
        let network = NetworkPrimitives {
            reaction_ids,
            metabolite_ids,
            stoichiometry,
            lower_bounds: DVector::from_vec(lower_bounds),
            upper_bounds: DVector::from_vec(upper_bounds),
            objective: DVector::from_vec(objective),
            balance_rhs,
        };
        network.validate_values()?;
        Ok(network)
    }

    fn validate_values(&self) -> Result<(), NetworkError> {
        for (j, id) in self.reaction_ids.iter().enumerate() {
            let (lower, upper) = (self.lower_bounds[j], self.upper_bounds[j]);
            if lower.is_nan() || upper.is_nan() || lower > upper {
                return Err(NetworkError::InvalidBounds {
                    reaction: id.clone(),
                    lower,
                    upper,
                });
            }
            if !self.objective[j].is_finite() {
                return Err(NetworkError::NonFiniteObjective(id.clone()));
            }
        }
        Ok(())
    }

    /// Check that `big_m` dominates every bound the linearization relies on
    ///
    /// The big-M must be finite, positive, and at least twice the magnitude of every
    /// bound of a non-fixed reaction and every fixed flux value. `fixed` lists
    /// (reaction index, value) pairs.
    pub fn validate_big_m(&self, big_m: f64, fixed: &[(usize, f64)]) -> Result<(), NetworkError> {
        if !big_m.is_finite() || big_m <= 0f64 {
            return Err(NetworkError::InvalidBigM(big_m));
        }
        let mut is_fixed = vec![false; self.num_reactions()];
        let mut worst: Option<(usize, f64)> = None;
        for &(j, value) in fixed {
            is_fixed[j] = true;
            if worst.map_or(true, |(_, m)| value.abs() > m) {
                worst = Some((j, value.abs()));
            }
        }
        for j in 0..self.num_reactions() {
            if is_fixed[j] {
                continue;
            }
            let magnitude = self.lower_bounds[j].abs().max(self.upper_bounds[j].abs());
            if worst.map_or(true, |(_, m)| magnitude > m) {
                worst = Some((j, magnitude));
            }
        }
        match worst {
            Some((j, magnitude)) if 2f64 * magnitude > big_m => Err(NetworkError::BigMTooSmall {
                big_m,
                reaction: self.reaction_id(j).to_string(),
                magnitude,
            }),
            _ => Ok(()),
        }
    }

    /// Number of reactions (columns of the stoichiometric matrix)
    pub fn num_reactions(&self) -> usize {
        self.reaction_ids.len()
    }

    /// Number of metabolites (rows of the stoichiometric matrix)
    pub fn num_metabolites(&self) -> usize {
        self.metabolite_ids.len()
    }

    pub fn reaction_ids(&self) -> &IndexSet<String> {
        &self.reaction_ids
    }

    pub fn metabolite_ids(&self) -> &IndexSet<String> {
        &self.metabolite_ids
    }

    /// Id of the reaction at position `index`
    ///
    /// # Panics
    /// If `index` is not a valid reaction position
    pub fn reaction_id(&self, index: usize) -> &str {
        &self.reaction_ids[index]
    }

    /// Position of a reaction id, if present
    pub fn reaction_index(&self, id: &str) -> Option<usize> {
        self.reaction_ids.get_index_of(id)
    }

    pub fn stoichiometry(&self) -> &CscMatrix<f64> {
        &self.stoichiometry
    }

    /// Row major copy of the stoichiometric matrix, one row per metabolite
    pub fn stoichiometry_rows(&self) -> CsrMatrix<f64> {
        CsrMatrix::from(&self.stoichiometry)
    }

    pub fn lower_bounds(&self) -> &DVector<f64> {
        &self.lower_bounds
    }

    pub fn upper_bounds(&self) -> &DVector<f64> {
        &self.upper_bounds
    }

    pub fn objective(&self) -> &DVector<f64> {
        &self.objective
    }

    pub fn balance_rhs(&self) -> &DVector<f64> {
        &self.balance_rhs
    }
}

fn unique_ids(field: &'static str, ids: Vec<String>) -> Result<IndexSet<String>, NetworkError> {
    let mut set = IndexSet::with_capacity(ids.len());
    for id in ids {
        if set.contains(&id) {
            return Err(NetworkError::DuplicateIdentifier { field, id });
        }
        set.insert(id);
    }
    Ok(set)
}

fn check_dimension(field: &'static str, expected: usize, found: usize) -> Result<(), NetworkError> {
    if expected != found {
        return Err(NetworkError::DimensionMismatch {
            field,
            expected,
            found,
        });
    }
    Ok(())
}

/// Errors raised while extracting network primitives
#[derive(Error, Debug, Clone, PartialEq)]
pub enum NetworkError {
    #[error("Required field `{0}` is missing or empty")]
    MissingField(&'static str),
    #[error("Reaction {reaction} references metabolite {metabolite}, which is not in the model")]
    MetaboliteNotFound { reaction: String, metabolite: String },
    #[error("Objective references reaction {0}, which is not in the model")]
    UnknownObjectiveReaction(String),
    #[error("Identifier {id} appears more than once in `{field}`")]
    DuplicateIdentifier { field: &'static str, id: String },
    #[error("Dimension mismatch for `{field}`: expected {expected}, found {found}")]
    DimensionMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Reaction {reaction} has invalid bounds [{lower}, {upper}]")]
    InvalidBounds {
        reaction: String,
        lower: f64,
        upper: f64,
    },
    #[error("Reaction {0} has a non-finite objective coefficient")]
    NonFiniteObjective(String),
    #[error("Big-M must be positive and finite, got {0}")]
    InvalidBigM(f64),
    #[error("Big-M {big_m} is smaller than twice the bound magnitude {magnitude} of reaction {reaction}")]
    BigMTooSmall {
        big_m: f64,
        reaction: String,
        magnitude: f64,
    },
}
