use ndarray::{Array1, Array2, ArrayView2};
use rand::distributions::{Distribution, Uniform};
use rand::prelude::*;

use super::base::{Latency, Synapse, Topology};
use super::{StructureConfig, SynapseConfig};
use crate::activation::Activation;
use crate::error::{ensure_len, Result, RnnError};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Link {
    latency: Latency,
    trainable: bool,
}

/// Concrete recurrent topology backed by dense `[neurons × units]` matrices.
///
/// Trainable weights are numbered in row-major order over
/// `(neuron, source unit)`. The numbering is recomputed whenever synapses
/// are added; weights that already existed keep their values and new
/// trainable weights start at zero.
#[derive(Clone, Debug)]
pub struct RecurrentStructure {
    inputs: usize,
    hidden: usize,
    outputs: usize,
    activation: Activation,
    links: Array2<Option<Link>>,
    weights: Array2<f64>,
    parameter_index: Array2<Option<usize>>,
    parameters: usize,
}

impl RecurrentStructure {
    /// Creates a structure without any synapses.
    pub fn new(inputs: usize, hidden: usize, outputs: usize, activation: Activation) -> Self {
        let neurons = hidden + outputs;
        let units = inputs + 1 + neurons;
        tracing::debug!(inputs, hidden, outputs, units, "created empty recurrent structure");
        Self {
            inputs,
            hidden,
            outputs,
            activation,
            links: Array2::from_elem((neurons, units), None),
            weights: Array2::zeros((neurons, units)),
            parameter_index: Array2::from_elem((neurons, units), None),
            parameters: 0,
        }
    }

    /// Every neuron reads every input and the bias in the current step, and
    /// every neuron (itself included) from the previous step.
    pub fn fully_recurrent(
        inputs: usize,
        hidden: usize,
        outputs: usize,
        activation: Activation,
    ) -> Self {
        let mut structure = Self::new(inputs, hidden, outputs, activation);
        let first_neuron = structure.first_neuron();
        for neuron in 0..structure.number_of_neurons() {
            for unit in 0..structure.number_of_units() {
                let latency = if unit < first_neuron {
                    Latency::Immediate
                } else {
                    Latency::Delayed
                };
                structure.links[[neuron, unit]] = Some(Link {
                    latency,
                    trainable: true,
                });
            }
        }
        structure.reindex();
        structure
    }

    /// Strictly layered feedforward structure: inputs and bias feed the hidden
    /// neurons, the hidden neurons (or the inputs, when there are none) feed
    /// the outputs. Every synapse is immediate and trainable.
    pub fn feedforward(
        inputs: usize,
        hidden: usize,
        outputs: usize,
        activation: Activation,
    ) -> Self {
        let mut structure = Self::new(inputs, hidden, outputs, activation);
        let bias = structure.bias_unit();
        let first_neuron = structure.first_neuron();
        let output_sources: Vec<usize> = if hidden == 0 {
            (0..inputs).collect()
        } else {
            (first_neuron..first_neuron + hidden).collect()
        };
        for neuron in 0..hidden {
            for unit in 0..=bias {
                structure.links[[neuron, unit]] = Some(Link {
                    latency: Latency::Immediate,
                    trainable: true,
                });
            }
        }
        for neuron in hidden..hidden + outputs {
            for &unit in output_sources.iter().chain(std::iter::once(&bias)) {
                structure.links[[neuron, unit]] = Some(Link {
                    latency: Latency::Immediate,
                    trainable: true,
                });
            }
        }
        structure.reindex();
        structure
    }

    pub fn hidden_size(&self) -> usize {
        self.hidden
    }

    /// Dense `[neurons × units]` weight matrix, zero where no synapse exists
    pub fn weights(&self) -> ArrayView2<'_, f64> {
        self.weights.view()
    }

    /// Adds (or replaces) a trainable synapse from `source` into `neuron`.
    pub fn add_synapse(&mut self, source: usize, neuron: usize, latency: Latency) -> Result<()> {
        self.check_synapse(source, neuron, latency)?;
        self.links[[neuron, source]] = Some(Link {
            latency,
            trainable: true,
        });
        self.reindex();
        Ok(())
    }

    /// Adds (or replaces) a synapse whose weight is not a parameter.
    pub fn add_fixed_synapse(
        &mut self,
        source: usize,
        neuron: usize,
        latency: Latency,
        weight: f64,
    ) -> Result<()> {
        self.check_synapse(source, neuron, latency)?;
        self.links[[neuron, source]] = Some(Link {
            latency,
            trainable: false,
        });
        self.weights[[neuron, source]] = weight;
        self.reindex();
        Ok(())
    }

    /// Removes the synapse from `source` into `neuron`, if present.
    ///
    /// Fails with [`RnnError::InvalidSynapse`] if either index is out of range.
    pub fn remove_synapse(&mut self, source: usize, neuron: usize) -> Result<()> {
        self.check_bounds(source, neuron)?;
        self.links[[neuron, source]] = None;
        self.weights[[neuron, source]] = 0.0;
        self.reindex();
        Ok(())
    }

    /// Number of synapses whose weight is a parameter
    pub fn trainable_count(&self) -> usize {
        self.parameters
    }

    /// Draws every trainable weight from `U(low, high)` with a seeded generator.
    pub fn init_uniform(&mut self, low: f64, high: f64, seed: u64) -> Result<()> {
        if !(low < high) {
            return Err(RnnError::InvalidParameter {
                name: "range",
                reason: format!("empty interval [{}, {})", low, high),
            });
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let dist = Uniform::new(low, high);
        for ((neuron, unit), index) in self.parameter_index.indexed_iter() {
            if index.is_some() {
                self.weights[[neuron, unit]] = dist.sample(&mut rng);
            }
        }
        Ok(())
    }

    fn check_bounds(&self, source: usize, neuron: usize) -> Result<()> {
        let invalid = |reason| RnnError::InvalidSynapse {
            source_unit: source,
            neuron,
            reason,
        };
        if neuron >= self.number_of_neurons() {
            return Err(invalid("no such neuron"));
        }
        if source >= self.number_of_units() {
            return Err(invalid("no such source unit"));
        }
        Ok(())
    }

    fn check_synapse(&self, source: usize, neuron: usize, latency: Latency) -> Result<()> {
        self.check_bounds(source, neuron)?;
        let invalid = |reason| RnnError::InvalidSynapse {
            source_unit: source,
            neuron,
            reason,
        };
        let first_neuron = self.first_neuron();
        let neuron_source = source >= first_neuron;
        if latency == Latency::Immediate && neuron_source && source - first_neuron >= neuron {
            return Err(invalid(
                "immediate synapses must come from a neuron evaluated earlier",
            ));
        }
        Ok(())
    }

    fn reindex(&mut self) {
        let mut next = 0;
        for (index, link) in self.parameter_index.iter_mut().zip(self.links.iter()) {
            *index = match link {
                Some(link) if link.trainable => {
                    next += 1;
                    Some(next - 1)
                }
                _ => None,
            };
        }
        self.parameters = next;
    }

    /// Create a serialization config for this structure
    pub fn get_config(&self) -> StructureConfig {
        let synapses = self
            .links
            .indexed_iter()
            .filter_map(|((neuron, source), link)| {
                link.map(|link| SynapseConfig {
                    source,
                    neuron,
                    latency: link.latency,
                    fixed_weight: (!link.trainable).then(|| self.weights[[neuron, source]]),
                })
            })
            .collect();
        StructureConfig {
            inputs: self.inputs,
            hidden: self.hidden,
            outputs: self.outputs,
            activation: self.activation,
            synapses,
            parameters: Some(self.parameter_vector().to_vec()),
        }
    }

    pub fn from_config(config: &StructureConfig) -> Result<Self> {
        let mut structure =
            Self::new(config.inputs, config.hidden, config.outputs, config.activation);
        for synapse in &config.synapses {
            structure.check_synapse(synapse.source, synapse.neuron, synapse.latency)?;
            structure.links[[synapse.neuron, synapse.source]] = Some(Link {
                latency: synapse.latency,
                trainable: synapse.fixed_weight.is_none(),
            });
            if let Some(weight) = synapse.fixed_weight {
                structure.weights[[synapse.neuron, synapse.source]] = weight;
            }
        }
        structure.reindex();
        if let Some(parameters) = &config.parameters {
            structure
                .set_parameter_vector(parameters)
                .map_err(|err| RnnError::Config(err.to_string()))?;
        }
        Ok(structure)
    }
}

impl Topology for RecurrentStructure {
    fn number_of_units(&self) -> usize {
        self.inputs + 1 + self.hidden + self.outputs
    }

    fn number_of_neurons(&self) -> usize {
        self.hidden + self.outputs
    }

    fn number_of_parameters(&self) -> usize {
        self.parameters
    }

    fn input_size(&self) -> usize {
        self.inputs
    }

    fn output_size(&self) -> usize {
        self.outputs
    }

    #[inline]
    fn synapse(&self, neuron: usize, unit: usize) -> Option<Synapse> {
        self.links[[neuron, unit]].map(|link| Synapse {
            latency: link.latency,
            parameter: self.parameter_index[[neuron, unit]],
        })
    }

    #[inline]
    fn weight(&self, neuron: usize, unit: usize) -> f64 {
        self.weights[[neuron, unit]]
    }

    fn activation(&self) -> Activation {
        self.activation
    }

    fn parameter_vector(&self) -> Array1<f64> {
        let mut parameters = Array1::zeros(self.parameters);
        for (index, &weight) in self.parameter_index.iter().zip(self.weights.iter()) {
            if let Some(p) = index {
                parameters[*p] = weight;
            }
        }
        parameters
    }

    fn set_parameter_vector(&mut self, parameters: &[f64]) -> Result<()> {
        ensure_len("parameter vector", self.parameters, parameters.len())?;
        for (index, weight) in self.parameter_index.iter().zip(self.weights.iter_mut()) {
            if let Some(p) = index {
                *weight = parameters[*p];
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let s = RecurrentStructure::new(3, 4, 2, Activation::Tanh);
        assert_eq!(s.number_of_units(), 10);
        assert_eq!(s.number_of_neurons(), 6);
        assert_eq!(s.bias_unit(), 3);
        assert_eq!(s.first_neuron(), 4);
        assert_eq!(s.first_output(), 8);
        assert_eq!(s.number_of_parameters(), 0);
    }

    #[test]
    fn test_parameter_indices_are_row_major() {
        let mut s = RecurrentStructure::new(1, 1, 1, Activation::Linear);
        // units: input 0, bias 1, hidden 2, output 3
        s.add_synapse(3, 1, Latency::Delayed).unwrap();
        s.add_synapse(0, 0, Latency::Immediate).unwrap();
        s.add_synapse(2, 1, Latency::Immediate).unwrap();
        assert_eq!(s.synapse(0, 0).unwrap().parameter, Some(0));
        assert_eq!(s.synapse(1, 2).unwrap().parameter, Some(1));
        assert_eq!(s.synapse(1, 3).unwrap().parameter, Some(2));
    }

    #[test]
    fn test_reindex_keeps_weights() {
        let mut s = RecurrentStructure::new(1, 0, 1, Activation::Linear);
        s.add_synapse(0, 0, Latency::Immediate).unwrap();
        s.set_parameter_vector(&[2.5]).unwrap();
        s.add_synapse(1, 0, Latency::Immediate).unwrap();
        assert_eq!(s.parameter_vector().to_vec(), vec![2.5, 0.0]);
    }

    #[test]
    fn test_fixed_synapse_is_not_a_parameter() {
        let mut s = RecurrentStructure::new(1, 0, 1, Activation::Linear);
        s.add_fixed_synapse(1, 0, Latency::Immediate, 0.75).unwrap();
        assert_eq!(s.number_of_parameters(), 0);
        assert_eq!(s.weight(0, 1), 0.75);
        assert_eq!(s.synapse(0, 1).unwrap().parameter, None);
        assert_eq!(s.synapse_count(), 1);
    }

    #[test]
    fn test_immediate_cycle_rejected() {
        let mut s = RecurrentStructure::new(1, 1, 1, Activation::Linear);
        // output neuron 1 (unit 3) can not feed hidden neuron 0 within a step
        let err = s.add_synapse(3, 0, Latency::Immediate).unwrap_err();
        assert!(matches!(err, RnnError::InvalidSynapse { .. }));
        // nor can a neuron feed itself
        assert!(s.add_synapse(2, 0, Latency::Immediate).is_err());
        // but delayed is fine
        assert!(s.add_synapse(3, 0, Latency::Delayed).is_ok());
    }

    #[test]
    fn test_out_of_bounds_synapse() {
        let mut s = RecurrentStructure::new(1, 1, 1, Activation::Linear);
        assert!(s.add_synapse(0, 5, Latency::Immediate).is_err());
        assert!(s.add_synapse(9, 0, Latency::Delayed).is_err());
    }

    #[test]
    fn test_fully_recurrent_counts() {
        let s = RecurrentStructure::fully_recurrent(2, 3, 1, Activation::Tanh);
        // 4 neurons × 7 units
        assert_eq!(s.number_of_parameters(), 28);
        assert!(!s.is_feedforward());
        assert_eq!(s.synapse(0, 0).unwrap().latency, Latency::Immediate);
        assert_eq!(s.synapse(0, 4).unwrap().latency, Latency::Delayed);
    }

    #[test]
    fn test_feedforward_counts() {
        let s = RecurrentStructure::feedforward(2, 3, 1, Activation::Tanh);
        // hidden: 3 × (2 + bias), output: 3 hidden + bias
        assert_eq!(s.number_of_parameters(), 13);
        assert!(s.is_feedforward());
    }

    #[test]
    fn test_init_uniform_is_seeded() {
        let mut a = RecurrentStructure::fully_recurrent(2, 2, 1, Activation::Tanh);
        let mut b = a.clone();
        a.init_uniform(-0.5, 0.5, 7).unwrap();
        b.init_uniform(-0.5, 0.5, 7).unwrap();
        assert_eq!(a.parameter_vector(), b.parameter_vector());
        assert!(a.parameter_vector().iter().all(|w| (-0.5..0.5).contains(w)));
        assert!(a.init_uniform(1.0, 1.0, 7).is_err());
    }

    #[test]
    fn test_set_parameter_vector_length() {
        let mut s = RecurrentStructure::fully_recurrent(1, 0, 1, Activation::Tanh);
        let err = s.set_parameter_vector(&[1.0]).unwrap_err();
        assert!(err.is_shape_error());
    }
}
