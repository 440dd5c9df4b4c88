use ndarray::{s, Array1, Array2, ArrayView1, ArrayView2};

use crate::structure::Topology;

/// Two `[parameters × neurons]` buffers. `current` holds
/// ∂y_k(t)/∂w_p after a step; `previous` is scratch space holding the
/// values of step t-1 while the new ones are computed.
#[derive(Clone, Debug)]
pub(crate) struct Sensitivity {
    pub(crate) current: Array2<f64>,
    pub(crate) previous: Array2<f64>,
}

/// Everything an [`OnlineRnn`](super::OnlineRnn) remembers about one
/// in-flight sequence.
///
/// A new sequence starts with a fresh state; dropping the state ends it.
/// Memory is allocated once here and reused by every step.
#[derive(Clone, Debug)]
pub struct EvaluationState {
    pub(crate) activation: Array1<f64>,
    pub(crate) previous_activation: Array1<f64>,
    /// Pre-activations of the neurons in the last step
    pub(crate) net_input: Array1<f64>,
    pub(crate) sensitivity: Option<Sensitivity>,
    pub(crate) time_step: usize,
    pub(crate) first_output: usize,
}

impl EvaluationState {
    pub(crate) fn new<T: Topology + ?Sized>(topology: &T, track_gradient: bool) -> Self {
        let units = topology.number_of_units();
        let neurons = topology.number_of_neurons();
        let sensitivity = track_gradient.then(|| {
            let shape = (topology.number_of_parameters(), neurons);
            Sensitivity {
                current: Array2::zeros(shape),
                previous: Array2::zeros(shape),
            }
        });
        Self {
            activation: Array1::zeros(units),
            previous_activation: Array1::zeros(units),
            net_input: Array1::zeros(neurons),
            sensitivity,
            time_step: 0,
            first_output: topology.first_output(),
        }
    }

    /// Activation of every unit after the last step
    pub fn activation(&self) -> ArrayView1<'_, f64> {
        self.activation.view()
    }

    /// Activation of every unit one step before the last
    pub fn previous_activation(&self) -> ArrayView1<'_, f64> {
        self.previous_activation.view()
    }

    /// Output slots of [`EvaluationState::activation`]
    pub fn output(&self) -> ArrayView1<'_, f64> {
        self.activation.slice(s![self.first_output..])
    }

    /// `[parameters × neurons]` derivative of each neuron's current
    /// activation with respect to each parameter, if tracked
    pub fn sensitivity(&self) -> Option<ArrayView2<'_, f64>> {
        self.sensitivity.as_ref().map(|s| s.current.view())
    }

    pub fn tracks_gradient(&self) -> bool {
        self.sensitivity.is_some()
    }

    /// Number of steps processed since the state was created
    pub fn time_step(&self) -> usize {
        self.time_step
    }
}
