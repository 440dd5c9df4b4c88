//! Contract shared by every evaluable model in the crate.

use ndarray::Array1;

use crate::error::Result;

/// A parametrised mapping from input vectors to output vectors.
///
/// Object safe, so heterogeneous models can be collected in an
/// [`MeanModel`](crate::ensemble::MeanModel).
pub trait Model {
    fn name(&self) -> &'static str;

    fn input_size(&self) -> usize;

    fn output_size(&self) -> usize;

    fn number_of_parameters(&self) -> usize;

    fn parameter_vector(&self) -> Array1<f64>;

    fn set_parameter_vector(&mut self, parameters: &[f64]) -> Result<()>;

    /// Evaluates a single input without any carried state.
    fn evaluate(&self, input: &[f64]) -> Result<Array1<f64>>;
}

/// A model whose output depends on what it has seen before.
pub trait StatefulModel: Model {
    /// Per-sequence state, owned by the caller
    type State;

    fn create_state(&self) -> Self::State;

    /// Evaluates one input and advances `state`.
    fn evaluate_step(&self, input: &[f64], state: &mut Self::State) -> Result<Array1<f64>>;
}
