//! Neuron activation functions
//!
//! Every neuron of a recurrent structure applies the same scalar function to
//! its pre-activation (the weighted sum of its incoming synapses). The
//! gradient recurrence needs the derivative with respect to that same
//! pre-activation, so each variant provides both.

use serde::{Deserialize, Serialize};

/// Scale of LeCun's tanh.
const LECUN_SCALE: f64 = 1.7159;
/// Input slope of LeCun's tanh.
const LECUN_SLOPE: f64 = 0.666;

/// Scalar activation function applied to neuron pre-activations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Activation {
    /// Identity: `f(x) = x`
    Linear,
    /// Logistic sigmoid: `f(x) = 1 / (1 + exp(-x))`
    #[default]
    Logistic,
    /// Hyperbolic tangent
    Tanh,
    /// Cheap sigmoid: `f(x) = x / (1 + |x|)`
    FastSigmoid,
    /// LeCun's tanh activation function.
    ///
    /// This activation function is defined as:
    /// `f(x) = 1.7159 * tanh(0.666 * x)`
    ///
    /// The scaling factors are chosen such that the function approximates
    /// the identity near the origin and saturates at about ±1.7159.
    LeCun,
}

impl Activation {
    /// Applies the activation to a pre-activation value.
    ///
    /// # Example
    ///
    /// ```rust
    /// use online_rnn::activation::Activation;
    ///
    /// assert_eq!(Activation::Linear.value(0.25), 0.25);
    /// assert!((Activation::Logistic.value(0.0) - 0.5).abs() < 1e-12);
    /// ```
    #[inline]
    pub fn value(self, x: f64) -> f64 {
        match self {
            Activation::Linear => x,
            Activation::Logistic => 1.0 / (1.0 + (-x).exp()),
            Activation::Tanh => x.tanh(),
            Activation::FastSigmoid => x / (1.0 + x.abs()),
            Activation::LeCun => LECUN_SCALE * (LECUN_SLOPE * x).tanh(),
        }
    }

    /// Derivative of [`Activation::value`] at the pre-activation `x`.
    #[inline]
    pub fn derivative(self, x: f64) -> f64 {
        match self {
            Activation::Linear => 1.0,
            Activation::Logistic => {
                let y = self.value(x);
                y * (1.0 - y)
            }
            Activation::Tanh => {
                let y = x.tanh();
                1.0 - y * y
            }
            Activation::FastSigmoid => {
                let d = 1.0 + x.abs();
                1.0 / (d * d)
            }
            Activation::LeCun => {
                let y = (LECUN_SLOPE * x).tanh();
                LECUN_SCALE * LECUN_SLOPE * (1.0 - y * y)
            }
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Activation::Linear => "linear",
            Activation::Logistic => "logistic",
            Activation::Tanh => "tanh",
            Activation::FastSigmoid => "fast_sigmoid",
            Activation::LeCun => "lecun",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    const ALL: [Activation; 5] = [
        Activation::Linear,
        Activation::Logistic,
        Activation::Tanh,
        Activation::FastSigmoid,
        Activation::LeCun,
    ];

    #[test]
    fn test_zero_points() {
        assert_eq!(Activation::Linear.value(0.0), 0.0);
        assert_abs_diff_eq!(Activation::Logistic.value(0.0), 0.5, epsilon = 1e-12);
        assert_eq!(Activation::Tanh.value(0.0), 0.0);
        assert_eq!(Activation::FastSigmoid.value(0.0), 0.0);
        assert_eq!(Activation::LeCun.value(0.0), 0.0);
    }

    #[test]
    fn test_derivatives_match_central_differences() {
        let h = 1e-6;
        for act in ALL {
            for &x in &[-3.0, -0.7, -0.1, 0.3, 1.2, 4.0] {
                let numeric = (act.value(x + h) - act.value(x - h)) / (2.0 * h);
                assert_abs_diff_eq!(act.derivative(x), numeric, epsilon = 1e-6);
            }
        }
    }

    #[test]
    fn test_lecun_saturation() {
        assert!(Activation::LeCun.value(100.0) > 1.7);
        assert!(Activation::LeCun.value(-100.0) < -1.7);
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Activation::FastSigmoid).unwrap();
        assert_eq!(json, "\"FastSigmoid\"");
        let back: Activation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, Activation::FastSigmoid);
    }
}
