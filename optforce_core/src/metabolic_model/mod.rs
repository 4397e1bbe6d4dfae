//! Module providing the Model struct for representing a metabolic model, and the
//! [`NetworkPrimitives`](network::NetworkPrimitives) adapter that turns it into matrices.

pub mod metabolite;
pub mod model;
pub mod network;
pub mod reaction;
