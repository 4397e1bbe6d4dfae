//! Errors raised while preparing a Must set search
use thiserror::Error;

use crate::metabolic_model::network::NetworkError;
use crate::must_set::options::MustLLOptionsBuilderError;
use crate::optimize::problem::ProblemError;

/// Problems with the search inputs (envelope, fixed fluxes, excluded reactions)
#[derive(Error, Debug, Clone, PartialEq)]
pub enum InputError {
    #[error("Fixed flux lists differ in length: {ids} ids but {values} values")]
    FixedLengthMismatch { ids: usize, values: usize },
    #[error("Reaction {0} is given more than one fixed flux")]
    DuplicateFixedReaction(String),
    #[error("Fixed flux for reaction {0} is not finite")]
    NonFiniteFixedValue(String),
    #[error("Reaction {id} listed in `{field}` is not in the model")]
    UnknownReaction { field: &'static str, id: String },
    #[error("Flux envelope `{field}` has {found} entries, but the network has {expected} reactions")]
    EnvelopeLengthMismatch {
        field: &'static str,
        expected: usize,
        found: usize,
    },
    #[error("Flux envelope of reaction {reaction} is invalid: min {min}, max {max}")]
    InvalidEnvelope { reaction: String, min: f64, max: f64 },
}

/// Errors which stop a Must set search before the solver is called
///
/// Failures of the solver itself are not errors, they end the search with a
/// [`Termination`](crate::must_set::Termination) and keep the pairs found so far.
#[derive(Error, Debug)]
pub enum MustSetError {
    #[error(transparent)]
    Network(#[from] NetworkError),
    #[error(transparent)]
    Input(#[from] InputError),
    #[error(transparent)]
    Problem(#[from] ProblemError),
    #[error("Invalid search options: {0}")]
    Options(#[from] MustLLOptionsBuilderError),
    #[error("Pair ({first}, {second}) can't be cut, reaction is not selectable")]
    UnselectablePair { first: String, second: String },
}
