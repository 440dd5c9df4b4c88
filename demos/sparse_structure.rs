//! Sparse Structure Example
//!
//! Builds a random sparse recurrent structure, prints its configuration,
//! restores it from JSON, and combines several seeded networks' first steps
//! with a weighted ensemble of linear read-outs.

use online_rnn::prelude::*;

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    println!("=== Sparse Structure Example ===\n");

    let mut structure = RecurrentStructure::random(3, 5, 2, Activation::LeCun, 0.6, 99999)?;
    structure.init_uniform(-0.5, 0.5, 7)?;

    println!("Structure info:");
    println!("  Units:      {}", structure.number_of_units());
    println!("  Synapses:   {}", structure.synapse_count());
    println!("  Parameters: {}", structure.number_of_parameters());
    println!("  Feedforward: {}", structure.is_feedforward());
    println!();

    let json = structure.get_config().to_json()?;
    println!("Configuration is {} bytes of JSON", json.len());
    let mut restored = StructureConfig::from_json(&json)?.build()?;

    let net = OnlineRnn::new(&mut restored, false)?;
    let mut state = net.create_state();
    for t in 0..5 {
        let x = [t as f64 * 0.1, 1.0, -0.5];
        let y = net.step(&x, &mut state)?;
        println!("  t={} output={:?}", t, y.to_vec());
    }
    println!();

    println!("Ensemble of linear read-outs:");
    let mut ensemble = MeanModel::new();
    for (seed, weight) in [(1u64, 1.0), (2, 2.0), (3, 0.5)] {
        let mut model = LinearModel::new(2, 3, Activation::Logistic);
        model.init_uniform(-1.0, 1.0, seed)?;
        ensemble.add_model(Box::new(model), weight)?;
    }
    let readout = state.output().to_vec();
    println!("  mean:  {:?}", ensemble.evaluate(&readout)?.to_vec());
    println!("  class: {}", ensemble.classify(&readout)?);

    println!("\n=== Example completed successfully! ===");
    Ok(())
}
