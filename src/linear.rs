//! Non-recurrent affine model `y = f(W x + b)`.

use ndarray::{Array1, Array2, ArrayView1};
use rand::distributions::{Distribution, Uniform};
use rand::prelude::*;

use crate::activation::Activation;
use crate::error::{ensure_len, Result, RnnError};
use crate::model::{Model, StatefulModel};

/// Single dense layer. Parameters are the weights in row-major order
/// followed by the biases.
#[derive(Clone, Debug)]
pub struct LinearModel {
    weights: Array2<f64>,
    bias: Array1<f64>,
    activation: Activation,
}

impl LinearModel {
    /// Creates a layer with all weights and biases set to zero.
    pub fn new(inputs: usize, outputs: usize, activation: Activation) -> Self {
        Self {
            weights: Array2::zeros((outputs, inputs)),
            bias: Array1::zeros(outputs),
            activation,
        }
    }

    /// Creates a layer from a `[outputs × inputs]` weight matrix and biases.
    pub fn from_weights(
        weights: Array2<f64>,
        bias: Array1<f64>,
        activation: Activation,
    ) -> Result<Self> {
        ensure_len("bias", weights.nrows(), bias.len())?;
        Ok(Self {
            weights,
            bias,
            activation,
        })
    }

    pub fn with_activation(mut self, activation: Activation) -> Self {
        self.activation = activation;
        self
    }

    pub fn weights(&self) -> &Array2<f64> {
        &self.weights
    }

    pub fn bias(&self) -> &Array1<f64> {
        &self.bias
    }

    pub fn init_uniform(&mut self, low: f64, high: f64, seed: u64) -> Result<()> {
        if !(low < high) {
            return Err(RnnError::InvalidParameter {
                name: "range",
                reason: format!("empty interval [{}, {})", low, high),
            });
        }
        let mut rng = StdRng::seed_from_u64(seed);
        let dist = Uniform::new(low, high);
        self.weights.mapv_inplace(|_| dist.sample(&mut rng));
        self.bias.mapv_inplace(|_| dist.sample(&mut rng));
        Ok(())
    }
}

impl Model for LinearModel {
    fn name(&self) -> &'static str {
        "LinearModel"
    }

    fn input_size(&self) -> usize {
        self.weights.ncols()
    }

    fn output_size(&self) -> usize {
        self.weights.nrows()
    }

    fn number_of_parameters(&self) -> usize {
        self.weights.len() + self.bias.len()
    }

    fn parameter_vector(&self) -> Array1<f64> {
        self.weights.iter().chain(self.bias.iter()).copied().collect()
    }

    fn set_parameter_vector(&mut self, parameters: &[f64]) -> Result<()> {
        ensure_len(
            "parameter vector",
            self.number_of_parameters(),
            parameters.len(),
        )?;
        let split = self.weights.len();
        for (w, &p) in self.weights.iter_mut().zip(&parameters[..split]) {
            *w = p;
        }
        self.bias.assign(&ArrayView1::from(&parameters[split..]));
        Ok(())
    }

    fn evaluate(&self, input: &[f64]) -> Result<Array1<f64>> {
        ensure_len("input", self.input_size(), input.len())?;
        let x = ArrayView1::from(input);
        let mut y = self.weights.dot(&x) + &self.bias;
        y.mapv_inplace(|v| self.activation.value(v));
        Ok(y)
    }
}

/// Stateless models can drive sequences too; the state is empty.
impl StatefulModel for LinearModel {
    type State = ();

    fn create_state(&self) -> Self::State {}

    fn evaluate_step(&self, input: &[f64], _state: &mut ()) -> Result<Array1<f64>> {
        self.evaluate(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{array, s};

    #[test]
    fn test_evaluate() {
        let model = LinearModel::from_weights(
            array![[1.0, 2.0], [0.5, -1.0]],
            array![0.0, 1.0],
            Activation::Linear,
        )
        .unwrap();
        let y = model.evaluate(&[1.0, 1.0]).unwrap();
        assert_eq!(y.to_vec(), vec![3.0, 0.5]);
    }

    #[test]
    fn test_parameter_round_trip() {
        let mut model = LinearModel::new(3, 2, Activation::Tanh);
        model.init_uniform(-1.0, 1.0, 3).unwrap();
        let params = model.parameter_vector();
        assert_eq!(params.len(), 8);
        assert_eq!(params.slice(s![6..]).to_vec(), model.bias().to_vec());

        let mut other = LinearModel::new(3, 2, Activation::Tanh);
        other.set_parameter_vector(params.as_slice().unwrap()).unwrap();
        assert_eq!(other.weights(), model.weights());
    }

    #[test]
    fn test_input_shape_error() {
        let model = LinearModel::new(3, 2, Activation::Tanh);
        assert!(model.evaluate(&[1.0]).unwrap_err().is_shape_error());
    }
}
