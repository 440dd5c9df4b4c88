//! Online recurrent network with real-time recurrent learning
//!
//! Reference: Williams & Zipser, "A learning algorithm for continually
//! running fully recurrent neural networks", Neural Computation 1989

use ndarray::{s, Array1, Array2, ArrayView1, Zip};

use super::state::EvaluationState;
use crate::error::{ensure_len, Result, RnnError};
use crate::model::{Model, StatefulModel};
use crate::structure::{Latency, RecurrentStructure, Topology};

/// A recurrent network fed one time step at a time.
///
/// The network borrows its topology for its whole lifetime; the topology
/// has to outlive the evaluator. All per-sequence data lives in an
/// [`EvaluationState`] created by [`OnlineRnn::create_state`] and owned by
/// the caller, so one evaluator can drive any number of independent
/// sequences.
///
/// When the evaluator computes gradients, every state it creates carries a
/// `[parameters × neurons]` sensitivity tensor that [`OnlineRnn::step`]
/// advances in place. This costs O(n³) memory and O(n⁴) time per step for n
/// neurons, in exchange for never storing the history of the sequence.
///
/// Changing the parameters while a sequence is in flight leaves its
/// sensitivities referring to the old weights. Start a new state instead.
///
/// # Example
///
/// ```rust
/// use online_rnn::prelude::*;
///
/// let mut structure = RecurrentStructure::new(1, 0, 1, Activation::Linear);
/// structure.add_synapse(0, 0, Latency::Immediate).unwrap();
/// structure.add_synapse(2, 0, Latency::Delayed).unwrap();
/// structure.set_parameter_vector(&[1.0, 0.5]).unwrap();
///
/// let net = OnlineRnn::new(&mut structure, true).unwrap();
/// let mut state = net.create_state();
///
/// let y = net.step(&[1.0], &mut state).unwrap();
/// assert_eq!(y[0], 1.0);
/// let y = net.step(&[0.0], &mut state).unwrap();
/// assert_eq!(y[0], 0.5);
///
/// let gradient = net.gradient_contribution(&[1.0], &state).unwrap();
/// assert_eq!(gradient.to_vec(), vec![0.5, 1.0]);
/// ```
#[derive(Debug)]
pub struct OnlineRnn<'a, T: Topology + ?Sized = RecurrentStructure> {
    topology: &'a mut T,
    compute_gradient: bool,
}

impl<'a, T: Topology + ?Sized> OnlineRnn<'a, T> {
    /// Creates an evaluator over `topology`.
    ///
    /// `compute_gradient` decides whether states created by
    /// [`OnlineRnn::create_state`] track sensitivities. Fails if an
    /// immediate synapse reads a neuron that is not evaluated before its
    /// target.
    pub fn new(topology: &'a mut T, compute_gradient: bool) -> Result<Self> {
        check_evaluation_order(&*topology)?;
        tracing::debug!(
            units = topology.number_of_units(),
            neurons = topology.number_of_neurons(),
            parameters = topology.number_of_parameters(),
            compute_gradient,
            "created online recurrent network"
        );
        Ok(Self {
            topology,
            compute_gradient,
        })
    }

    /// Sets whether states created from now on track sensitivities.
    ///
    /// States that already exist keep the tracking mode they were created
    /// with.
    pub fn with_gradient(mut self, compute_gradient: bool) -> Self {
        self.compute_gradient = compute_gradient;
        self
    }

    /// Whether [`OnlineRnn::create_state`] allocates sensitivities
    pub fn computes_gradient(&self) -> bool {
        self.compute_gradient
    }

    pub fn topology(&self) -> &T {
        &*self.topology
    }

    pub fn input_size(&self) -> usize {
        self.topology.input_size()
    }

    pub fn output_size(&self) -> usize {
        self.topology.output_size()
    }

    pub fn number_of_parameters(&self) -> usize {
        self.topology.number_of_parameters()
    }

    pub fn parameter_vector(&self) -> Array1<f64> {
        self.topology.parameter_vector()
    }

    /// Replaces the weights of the underlying topology.
    ///
    /// States of sequences already in flight are not updated.
    pub fn set_parameter_vector(&mut self, parameters: &[f64]) -> Result<()> {
        self.topology.set_parameter_vector(parameters)
    }

    /// Starts a new sequence: all activations and sensitivities are zero.
    pub fn create_state(&self) -> EvaluationState {
        let state = EvaluationState::new(&*self.topology, self.compute_gradient);
        tracing::debug!(
            track_gradient = self.compute_gradient,
            "created evaluation state"
        );
        state
    }

    /// Feeds one time step and returns the outputs of the network.
    ///
    /// The previous activation is saved, the input and bias slots are
    /// filled, and every neuron is evaluated in index order: immediate
    /// synapses read values of this step, delayed ones values of the last
    /// step. If the state tracks gradients the sensitivity tensor is
    /// advanced as well, whether or not a gradient is requested afterwards.
    ///
    /// Shape errors are raised before the state is touched.
    pub fn step<'s>(
        &self,
        input: &[f64],
        state: &'s mut EvaluationState,
    ) -> Result<ArrayView1<'s, f64>> {
        self.check_state(state)?;
        ensure_len("input", self.topology.input_size(), input.len())?;

        let topology = &*self.topology;
        let units = topology.number_of_units();
        let first_neuron = topology.first_neuron();
        let activation = topology.activation();

        let EvaluationState {
            activation: current,
            previous_activation: previous,
            net_input,
            sensitivity,
            time_step,
            ..
        } = state;

        previous.assign(&*current);
        current
            .slice_mut(s![..input.len()])
            .assign(&ArrayView1::from(input));
        current[topology.bias_unit()] = 1.0;
        previous[topology.bias_unit()] = 1.0;

        for k in 0..topology.number_of_neurons() {
            let mut net = 0.0;
            for j in 0..units {
                if let Some(synapse) = topology.synapse(k, j) {
                    let source = match synapse.latency {
                        Latency::Immediate => current[j],
                        Latency::Delayed => previous[j],
                    };
                    net += topology.weight(k, j) * source;
                }
            }
            net_input[k] = net;
            current[first_neuron + k] = activation.value(net);
        }

        if let Some(sensitivity) = sensitivity.as_mut() {
            std::mem::swap(&mut sensitivity.current, &mut sensitivity.previous);
            update_sensitivity(
                topology,
                current.view(),
                previous.view(),
                net_input.view(),
                &mut sensitivity.current,
                &sensitivity.previous,
            );
        }

        *time_step += 1;
        tracing::trace!(time_step = *time_step, "evaluated online step");

        Ok(state.output())
    }

    /// Contracts the sensitivity tensor with per-output loss coefficients:
    /// `gradient[p] = Σ_o coefficients[o] · ∂y_o/∂w_p`.
    ///
    /// Only the steps that carry a loss signal need to call this.
    pub fn gradient_contribution(
        &self,
        coefficients: &[f64],
        state: &EvaluationState,
    ) -> Result<Array1<f64>> {
        let mut gradient = Array1::zeros(self.topology.number_of_parameters());
        self.accumulate_gradient(coefficients, state, &mut gradient)?;
        Ok(gradient)
    }

    /// Adds the gradient contribution of the current step to `gradient`.
    ///
    /// For each parameter the outputs are summed in ascending order before
    /// the result is added to the accumulator.
    pub fn accumulate_gradient(
        &self,
        coefficients: &[f64],
        state: &EvaluationState,
        gradient: &mut Array1<f64>,
    ) -> Result<()> {
        self.check_state(state)?;
        let sensitivity = state
            .sensitivity
            .as_ref()
            .ok_or(RnnError::GradientNotTracked)?;
        ensure_len(
            "coefficients",
            self.topology.output_size(),
            coefficients.len(),
        )?;
        ensure_len(
            "gradient",
            self.topology.number_of_parameters(),
            gradient.len(),
        )?;

        let first_output =
            self.topology.number_of_neurons() - self.topology.output_size();
        let outputs = sensitivity.current.slice(s![.., first_output..]);
        for (g, row) in gradient.iter_mut().zip(outputs.outer_iter()) {
            let mut sum = 0.0;
            for (c, s) in coefficients.iter().zip(row.iter()) {
                sum += c * s;
            }
            *g += sum;
        }
        Ok(())
    }

    /// Overwrites the output activations, e.g. with the target values for
    /// teacher forcing.
    ///
    /// Only the output slots of the current activation change; the previous
    /// activation and the sensitivities stay as the last step left them. The
    /// next step reads the forced values through its delayed synapses.
    pub fn set_output_activation(&self, state: &mut EvaluationState, values: &[f64]) -> Result<()> {
        self.check_state(state)?;
        ensure_len("output activation", self.topology.output_size(), values.len())?;
        let first_output = self.topology.first_output();
        state
            .activation
            .slice_mut(s![first_output..])
            .assign(&ArrayView1::from(values));
        Ok(())
    }

    fn check_state(&self, state: &EvaluationState) -> Result<()> {
        let topology = &*self.topology;
        let mismatch = |reason: String| Err(RnnError::StateMismatch { reason });
        if state.activation.len() != topology.number_of_units() {
            return mismatch(format!(
                "{} units, topology has {}",
                state.activation.len(),
                topology.number_of_units()
            ));
        }
        if state.net_input.len() != topology.number_of_neurons() {
            return mismatch(format!(
                "{} neurons, topology has {}",
                state.net_input.len(),
                topology.number_of_neurons()
            ));
        }
        if state.first_output != topology.first_output() {
            return mismatch(format!(
                "outputs start at unit {}, topology starts them at {}",
                state.first_output,
                topology.first_output()
            ));
        }
        if let Some(sensitivity) = &state.sensitivity {
            if sensitivity.current.nrows() != topology.number_of_parameters() {
                return mismatch(format!(
                    "{} parameters, topology has {}",
                    sensitivity.current.nrows(),
                    topology.number_of_parameters()
                ));
            }
        }
        Ok(())
    }
}

/// Advances the sensitivities by one step.
///
/// For neuron k with pre-activation net_k:
///
/// ```text
/// S[p][k](t) = f'(net_k) · Σ_j ( w_kj · S[p][j](τ) + [p owns w_kj] · a_j(τ) )
/// ```
///
/// where τ is t for immediate synapses and t-1 for delayed ones, and the
/// propagated term only exists when source j is a neuron. Neurons are
/// visited in index order, sources in ascending unit order, and for every
/// source the propagated term is added before the direct term.
fn update_sensitivity<T: Topology + ?Sized>(
    topology: &T,
    activation: ArrayView1<f64>,
    previous_activation: ArrayView1<f64>,
    net_input: ArrayView1<f64>,
    current: &mut Array2<f64>,
    previous: &Array2<f64>,
) {
    let units = topology.number_of_units();
    let first_neuron = topology.first_neuron();
    let function = topology.activation();

    for k in 0..topology.number_of_neurons() {
        current.column_mut(k).fill(0.0);
        for j in 0..units {
            let Some(synapse) = topology.synapse(k, j) else {
                continue;
            };
            let weight = topology.weight(k, j);
            if j >= first_neuron {
                let l = j - first_neuron;
                match synapse.latency {
                    Latency::Delayed => {
                        Zip::from(current.column_mut(k))
                            .and(previous.column(l))
                            .for_each(|s, &prev| *s += weight * prev);
                    }
                    Latency::Immediate => {
                        // l < k, checked when the evaluator was created
                        let (mut target, source) =
                            current.multi_slice_mut((s![.., k], s![.., l]));
                        Zip::from(&mut target)
                            .and(&source)
                            .for_each(|s, &src| *s += weight * src);
                    }
                }
            }
            if let Some(p) = synapse.parameter {
                current[[p, k]] += match synapse.latency {
                    Latency::Immediate => activation[j],
                    Latency::Delayed => previous_activation[j],
                };
            }
        }
        let derivative = function.derivative(net_input[k]);
        current.column_mut(k).mapv_inplace(|s| s * derivative);
    }
}

fn check_evaluation_order<T: Topology + ?Sized>(topology: &T) -> Result<()> {
    let first_neuron = topology.first_neuron();
    for k in 0..topology.number_of_neurons() {
        for j in first_neuron..topology.number_of_units() {
            let immediate = topology
                .synapse(k, j)
                .map_or(false, |s| s.latency == Latency::Immediate);
            if immediate && j - first_neuron >= k {
                return Err(RnnError::InvalidSynapse {
                    source_unit: j,
                    neuron: k,
                    reason: "immediate synapses must come from a neuron evaluated earlier",
                });
            }
        }
    }
    Ok(())
}

impl<'a, T: Topology + ?Sized> Model for OnlineRnn<'a, T> {
    fn name(&self) -> &'static str {
        "OnlineRnn"
    }

    fn input_size(&self) -> usize {
        self.topology.input_size()
    }

    fn output_size(&self) -> usize {
        self.topology.output_size()
    }

    fn number_of_parameters(&self) -> usize {
        self.topology.number_of_parameters()
    }

    fn parameter_vector(&self) -> Array1<f64> {
        self.topology.parameter_vector()
    }

    fn set_parameter_vector(&mut self, parameters: &[f64]) -> Result<()> {
        self.topology.set_parameter_vector(parameters)
    }

    /// Always fails: an online network only processes single steps of a
    /// sequence held in an [`EvaluationState`].
    fn evaluate(&self, _input: &[f64]) -> Result<Array1<f64>> {
        Err(RnnError::StateRequired { model: "OnlineRnn" })
    }
}

impl<'a, T: Topology + ?Sized> StatefulModel for OnlineRnn<'a, T> {
    type State = EvaluationState;

    fn create_state(&self) -> EvaluationState {
        OnlineRnn::create_state(self)
    }

    fn evaluate_step(&self, input: &[f64], state: &mut EvaluationState) -> Result<Array1<f64>> {
        Ok(self.step(input, state)?.to_owned())
    }
}
