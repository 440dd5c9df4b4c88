use ndarray::Array1;
use serde::{Deserialize, Serialize};

use crate::activation::Activation;
use crate::error::Result;

/// When a synapse reads its source unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Latency {
    /// Reads the value the source unit has in the current time step. The
    /// source must be an input, the bias, or a neuron with a lower index.
    Immediate,
    /// Reads the value the source unit had in the previous time step.
    Delayed,
}

/// A connection arriving at a neuron, as seen by an evaluator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Synapse {
    pub latency: Latency,
    /// Index into the parameter vector, or `None` for a fixed weight.
    pub parameter: Option<usize>,
}

/// Read-only query interface for the static description of a recurrent
/// network.
///
/// Units are laid out as `[inputs | bias | hidden neurons | output neurons]`.
/// Neuron `k` is unit `first_neuron() + k`, and the outputs are the last
/// `output_size()` units. Neurons are evaluated in index order, so that
/// order must be consistent with every [`Latency::Immediate`] synapse.
pub trait Topology: Send + Sync {
    /// Total number of units: inputs, bias and neurons
    fn number_of_units(&self) -> usize;

    /// Number of units with incoming weights and a nonlinearity
    fn number_of_neurons(&self) -> usize;

    /// Number of trainable weights
    fn number_of_parameters(&self) -> usize;

    fn input_size(&self) -> usize;

    fn output_size(&self) -> usize;

    /// Unit index of the bias, which always reads 1
    fn bias_unit(&self) -> usize {
        self.input_size()
    }

    /// Unit index of neuron 0
    fn first_neuron(&self) -> usize {
        self.number_of_units() - self.number_of_neurons()
    }

    /// Unit index of the first output neuron
    fn first_output(&self) -> usize {
        self.number_of_units() - self.output_size()
    }

    /// The synapse from `unit` into `neuron`, if there is one
    fn synapse(&self, neuron: usize, unit: usize) -> Option<Synapse>;

    /// Weight of the connection from `unit` into `neuron` (0 if absent)
    fn weight(&self, neuron: usize, unit: usize) -> f64;

    /// Activation function shared by every neuron
    fn activation(&self) -> Activation;

    /// Copy of the trainable weights in parameter-index order
    fn parameter_vector(&self) -> Array1<f64>;

    /// Replaces the trainable weights
    fn set_parameter_vector(&mut self, parameters: &[f64]) -> Result<()>;

    /// Count the synapses of any kind
    fn synapse_count(&self) -> usize {
        let units = self.number_of_units();
        (0..self.number_of_neurons())
            .map(|k| (0..units).filter(|&j| self.synapse(k, j).is_some()).count())
            .sum()
    }

    /// True if no synapse reads a previous time step
    fn is_feedforward(&self) -> bool {
        let units = self.number_of_units();
        (0..self.number_of_neurons()).all(|k| {
            (0..units).all(|j| {
                self.synapse(k, j)
                    .map_or(true, |s| s.latency == Latency::Immediate)
            })
        })
    }
}
