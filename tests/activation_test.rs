//! Activation functions checked against Burn's tensor implementations

use burn::backend::NdArray;
use burn::tensor::{activation, Tensor};
use online_rnn::activation::Activation;

type Backend = NdArray<f64>;

const POINTS: [f64; 9] = [-10.0, -3.0, -1.0, -0.25, 0.0, 0.25, 1.0, 3.0, 10.0];

fn reference(f: impl Fn(Tensor<Backend, 1>) -> Tensor<Backend, 1>) -> Vec<f64> {
    let device = Default::default();
    let x = Tensor::<Backend, 1>::from_floats(POINTS.as_slice(), &device);
    f(x).into_data().to_vec::<f64>().unwrap()
}

fn assert_matches(act: Activation, expected: Vec<f64>) {
    for (&x, y) in POINTS.iter().zip(expected) {
        assert!(
            (act.value(x) - y).abs() < 1e-6,
            "{} incorrect at x={}: got {}, expected {}",
            act.name(),
            x,
            act.value(x),
            y
        );
    }
}

#[test]
fn test_logistic_matches_sigmoid() {
    assert_matches(Activation::Logistic, reference(activation::sigmoid));
}

#[test]
fn test_tanh_matches_tensor_tanh() {
    assert_matches(Activation::Tanh, reference(|x| x.tanh()));
}

#[test]
fn test_lecun_matches_scaled_tanh() {
    assert_matches(
        Activation::LeCun,
        reference(|x| x.mul_scalar(0.666).tanh().mul_scalar(1.7159)),
    );
}

#[test]
fn test_fast_sigmoid_matches_tensor_expression() {
    assert_matches(
        Activation::FastSigmoid,
        reference(|x| x.clone().div(x.abs().add_scalar(1.0))),
    );
}

#[test]
fn test_linear_is_identity() {
    assert_matches(Activation::Linear, POINTS.to_vec());
}
