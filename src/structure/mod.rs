//! # Recurrent network topologies
//!
//! A topology describes which units exist, which synapses connect them, how
//! long each synapse delays its signal and which weights are trainable. The
//! evaluators in [`crate::online`] only see it through the [`Topology`]
//! query trait; [`RecurrentStructure`] is the dense implementation shipped
//! with the crate.
//!
//! ## Unit Layout
//!
//! | Units | Role |
//! |-------|------|
//! | `0 .. inputs` | Input values of the current step |
//! | `inputs` | Bias, always 1 |
//! | `inputs + 1 .. units - outputs` | Hidden neurons |
//! | `units - outputs .. units` | Output neurons |

use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::error::Result;

mod base;
mod random;
mod recurrent;

pub use base::{Latency, Synapse, Topology};
pub use recurrent::RecurrentStructure;

/// One synapse of a [`StructureConfig`]
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SynapseConfig {
    pub source: usize,
    pub neuron: usize,
    pub latency: Latency,
    /// Weight of a fixed synapse; `None` marks a trainable one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fixed_weight: Option<f64>,
}

/// Configuration struct for serialization/deserialization of recurrent structures
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct StructureConfig {
    pub inputs: usize,
    pub hidden: usize,
    pub outputs: usize,
    #[serde(default)]
    pub activation: Activation,
    #[serde(default)]
    pub synapses: Vec<SynapseConfig>,
    /// Trainable weights in parameter order; zeros when absent
    #[serde(default)]
    pub parameters: Option<Vec<f64>>,
}

impl StructureConfig {
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Builds the structure this configuration describes.
    pub fn build(&self) -> Result<RecurrentStructure> {
        RecurrentStructure::from_config(self)
    }
}
