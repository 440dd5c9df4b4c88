//! # Online RNN - Real-Time Recurrent Learning (Rust)
//!
//! Recurrent neural networks that are fed one time step at a time and can
//! report, after any step, the exact gradient of a loss on that step's
//! outputs with respect to every weight, without unrolling the sequence.
//!
//! ## Features
//!
//! - **Topologies**: inputs, bias, hidden and output neurons connected by
//!   immediate (same step) or delayed (previous step) synapses
//! - **Online evaluation**: one step per call, state owned by the caller
//! - **RTRL gradients**: sensitivity tensor advanced in place every step
//! - **Teacher forcing**: overwrite fed-back outputs with known targets
//! - **Ensembles**: weighted mean and weighted vote over any [`Model`]
//!
//! ## Quick Start
//!
//! ```rust
//! use online_rnn::prelude::*;
//!
//! let mut structure = RecurrentStructure::fully_recurrent(2, 4, 1, Activation::Tanh);
//! structure.init_uniform(-0.5, 0.5, 42).unwrap();
//!
//! let net = OnlineRnn::new(&mut structure, true).unwrap();
//! let mut state = net.create_state();
//!
//! let output = net.step(&[0.3, -0.1], &mut state).unwrap();
//! assert_eq!(output.len(), 1);
//!
//! let gradient = net.gradient_contribution(&[1.0], &state).unwrap();
//! assert_eq!(gradient.len(), net.number_of_parameters());
//! ```
//!
//! [`Model`]: crate::model::Model

pub mod activation;
pub mod ensemble;
pub mod error;
pub mod linear;
pub mod model;
pub mod online;
pub mod structure;

pub use error::{Result, RnnError};

pub mod prelude {
    pub use crate::activation::Activation;
    pub use crate::ensemble::MeanModel;
    pub use crate::error::{Result, RnnError};
    pub use crate::linear::LinearModel;
    pub use crate::model::{Model, StatefulModel};
    pub use crate::online::{EvaluationState, OnlineRnn};
    pub use crate::structure::{Latency, RecurrentStructure, StructureConfig, Synapse, Topology};
}
