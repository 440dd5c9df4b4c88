//! Online Prediction Example
//!
//! Trains a small fully recurrent network to predict the next value of a sine
//! wave while the sequence streams in. The gradient of the squared error is
//! taken after every step and applied immediately; for the first half of
//! each epoch the fed-back output is replaced by the true value (teacher
//! forcing).

use ndarray::Array1;
use online_rnn::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Online RTRL Example ===\n");

    let mut structure = RecurrentStructure::fully_recurrent(1, 4, 1, Activation::Tanh);
    structure.init_uniform(-0.3, 0.3, 12345)?;

    let learning_rate = 0.05;
    let epochs = 30;
    let length = 60;
    let signal: Vec<f64> = (0..=length).map(|t| 0.8 * (t as f64 * 0.3).sin()).collect();

    println!("Network:");
    println!("  Units:      {}", structure.number_of_units());
    println!("  Neurons:    {}", structure.number_of_neurons());
    println!("  Parameters: {}", structure.number_of_parameters());
    println!();

    for epoch in 0..epochs {
        let mut parameters = structure.parameter_vector();
        let mut net = OnlineRnn::new(&mut structure, true)?;
        let mut state = net.create_state();
        let mut squared_error = 0.0;

        for t in 0..length {
            let prediction = net.step(&[signal[t]], &mut state)?[0];
            let error = prediction - signal[t + 1];
            squared_error += error * error;

            let gradient: Array1<f64> = net.gradient_contribution(&[error], &state)?;
            parameters.scaled_add(-learning_rate, &gradient);
            // sensitivities keep referring to the old weights until the next epoch
            net.set_parameter_vector(parameters.as_slice().unwrap_or(&[]))?;

            if t < length / 2 {
                net.set_output_activation(&mut state, &[signal[t + 1]])?;
            }
        }

        if epoch % 5 == 0 || epoch == epochs - 1 {
            println!(
                "  Epoch {:>2}: mean squared error {:.6}",
                epoch,
                squared_error / length as f64
            );
        }
    }

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
