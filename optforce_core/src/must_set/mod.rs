//! Search for MustLL sets: pairs of reactions whose fluxes must both be pushed beyond
//! their wild-type ranges for an overproduction target
//!
//! The bilevel OptForce problem (an outer problem choosing two reactions, an inner flux
//! balance problem adversarially minimizing their total flux) is rewritten as one
//! MILP using the inner problem's dual and a zero duality gap row. Pairs are then
//! enumerated by solving that MILP repeatedly with no-good cuts for every pair found.
//!
//! # Examples
//! ```rust,no_run
//! use optforce_core::metabolic_model::model::Model;
//! use optforce_core::metabolic_model::network::NetworkPrimitives;
//! use optforce_core::must_set::{
//!     find_must_ll, ExcludedReactions, FixedFluxes, FluxEnvelope, MustLLOptions,
//! };
//! use optforce_core::optimize::solvers::default_solver;
//!
//! let model = Model::read_json("e_coli_core.json").unwrap();
//! let network = NetworkPrimitives::from_model(&model).unwrap();
//! let n = network.num_reactions();
//! let envelope = FluxEnvelope::new(vec![0.; n], vec![1.; n]);
//! let fixed = FixedFluxes::from_pairs([("EX_glc__D_e", -10.)]).unwrap();
//! let mut solver = default_solver().expect("no solver backend enabled");
//! let result = find_must_ll(
//!     &mut solver,
//!     &network,
//!     &envelope,
//!     &fixed,
//!     &ExcludedReactions::new(),
//!     &MustLLOptions::default(),
//! )
//! .unwrap();
//! println!("{:?}", result.pair_ids());
//! ```
mod dual;
mod enumerate;
mod error;
mod formulation;
mod inputs;
mod layout;
mod linking;
mod options;
mod outer;
mod partition;
mod result;
#[cfg(test)]
pub(crate) mod test_utils;

pub use enumerate::{enumerate_pairs, find_must_ll};
pub use error::{InputError, MustSetError};
pub use formulation::MustLLFormulation;
pub use inputs::{ExcludedReactions, FixedFluxes, FluxEnvelope};
pub use layout::{ColumnLayout, Slot, SlotColumns};
pub use options::{MustLLOptions, MustLLOptionsBuilder, MustLLOptionsBuilderError};
pub use partition::{ReactionPartition, ReactionRole};
pub use result::{MustPair, MustSetResult, Termination};
