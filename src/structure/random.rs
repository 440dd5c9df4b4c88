use rand::prelude::*;

use super::base::{Latency, Topology};
use super::recurrent::RecurrentStructure;
use crate::activation::Activation;
use crate::error::{Result, RnnError};

impl RecurrentStructure {
    /// Seeded sparse variant of [`RecurrentStructure::fully_recurrent`].
    ///
    /// Of the candidate synapses (inputs into neurons in the current step,
    /// neurons into neurons from the previous step) a fraction
    /// `1 - sparsity_level` is kept. Every neuron always keeps its bias.
    pub fn random(
        inputs: usize,
        hidden: usize,
        outputs: usize,
        activation: Activation,
        sparsity_level: f64,
        seed: u64,
    ) -> Result<Self> {
        if !(0.0..1.0).contains(&sparsity_level) {
            return Err(RnnError::InvalidParameter {
                name: "sparsity_level",
                reason: format!("must be in range [0, 1), got {}", sparsity_level),
            });
        }

        let mut structure = Self::new(inputs, hidden, outputs, activation);
        let neurons = structure.number_of_neurons();
        let first_neuron = structure.first_neuron();
        let bias = structure.bias_unit();
        let mut rng = StdRng::seed_from_u64(seed);

        // Create all possible synapse pairs
        let mut candidates: Vec<(usize, usize, Latency)> =
            Vec::with_capacity(neurons * (inputs + neurons));
        for neuron in 0..neurons {
            for source in 0..inputs {
                candidates.push((source, neuron, Latency::Immediate));
            }
            for source in first_neuron..first_neuron + neurons {
                candidates.push((source, neuron, Latency::Delayed));
            }
        }

        let keep = (candidates.len() as f64 * (1.0 - sparsity_level)).round() as usize;
        let selected: Vec<_> = candidates
            .choose_multiple(&mut rng, keep)
            .cloned()
            .collect();

        for (source, neuron, latency) in selected {
            structure.add_synapse(source, neuron, latency)?;
        }
        for neuron in 0..neurons {
            structure.add_synapse(bias, neuron, Latency::Immediate)?;
        }

        tracing::debug!(
            inputs,
            hidden,
            outputs,
            sparsity_level,
            synapses = structure.synapse_count(),
            "built random recurrent structure"
        );
        Ok(structure)
    }
}
