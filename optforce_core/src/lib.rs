//! Core rust implementation of OptForce MustLL set identification, built on a small
//! constraint based metabolic modeling layer.
//!
//! A [`Model`](metabolic_model::model::Model) is read (for instance with
//! [`Model::read_json`](metabolic_model::model::Model::read_json)), turned into
//! [`NetworkPrimitives`](metabolic_model::network::NetworkPrimitives), and searched for
//! Must pairs with [`must_set::find_must_ll`] using any [`optimize::solvers::MilpSolver`].

pub mod configuration;
pub mod io;
pub mod metabolic_model;
pub mod must_set;
pub mod optimize;
mod utils;
