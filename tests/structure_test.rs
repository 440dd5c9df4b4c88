//! Tests for the structure module

use online_rnn::structure::*;
use online_rnn::{activation::Activation, RnnError};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fully_recurrent_creation() {
        let s = RecurrentStructure::fully_recurrent(3, 5, 2, Activation::Tanh);
        assert_eq!(s.input_size(), 3);
        assert_eq!(s.output_size(), 2);
        assert_eq!(s.number_of_neurons(), 7);
        assert_eq!(s.number_of_units(), 11);
        assert_eq!(s.number_of_parameters(), 7 * 11);
        assert_eq!(s.synapse_count(), s.trainable_count());
        assert_eq!(s.weights().dim(), (7, 11));
    }

    #[test]
    fn test_config_round_trip() {
        let mut s = RecurrentStructure::random(2, 3, 1, Activation::LeCun, 0.5, 42).unwrap();
        s.add_fixed_synapse(0, 3, Latency::Delayed, -0.25).unwrap();
        s.init_uniform(-1.0, 1.0, 11).unwrap();

        let json = s.get_config().to_json().unwrap();
        let config = StructureConfig::from_json(&json).unwrap();
        let restored = config.build().unwrap();

        assert_eq!(restored.number_of_units(), s.number_of_units());
        assert_eq!(restored.number_of_parameters(), s.number_of_parameters());
        assert_eq!(restored.parameter_vector(), s.parameter_vector());
        assert_eq!(restored.weights(), s.weights());
        for k in 0..s.number_of_neurons() {
            for j in 0..s.number_of_units() {
                assert_eq!(restored.synapse(k, j), s.synapse(k, j));
            }
        }
    }

    #[test]
    fn test_config_from_hand_written_json() {
        let json = r#"{
            "inputs": 1,
            "hidden": 0,
            "outputs": 1,
            "activation": "Linear",
            "synapses": [
                { "source": 0, "neuron": 0, "latency": "Immediate" },
                { "source": 2, "neuron": 0, "latency": "Delayed" },
                { "source": 1, "neuron": 0, "latency": "Immediate", "fixed_weight": 0.5 }
            ],
            "parameters": [1.0, 0.5]
        }"#;
        let s = StructureConfig::from_json(json).unwrap().build().unwrap();
        assert_eq!(s.number_of_parameters(), 2);
        assert_eq!(s.weight(0, 1), 0.5);
        assert_eq!(s.weight(0, 2), 0.5);
        assert_eq!(s.activation(), Activation::Linear);
    }

    #[test]
    fn test_config_defaults() {
        let json = r#"{ "inputs": 2, "hidden": 1, "outputs": 1 }"#;
        let s = StructureConfig::from_json(json).unwrap().build().unwrap();
        assert_eq!(s.activation(), Activation::Logistic);
        assert_eq!(s.synapse_count(), 0);
    }

    #[test]
    fn test_config_rejects_bad_parameters() {
        let mut config = RecurrentStructure::fully_recurrent(1, 0, 1, Activation::Tanh).get_config();
        config.parameters = Some(vec![1.0]);
        assert!(matches!(config.build(), Err(RnnError::Config(_))));
    }

    #[test]
    fn test_config_rejects_immediate_cycle() {
        let json = r#"{
            "inputs": 1, "hidden": 1, "outputs": 1,
            "synapses": [{ "source": 3, "neuron": 0, "latency": "Immediate" }]
        }"#;
        let result = StructureConfig::from_json(json).unwrap().build();
        assert!(matches!(result, Err(RnnError::InvalidSynapse { .. })));
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            StructureConfig::from_json("{ inputs: }"),
            Err(RnnError::Config(_))
        ));
    }

    #[test]
    fn test_random_structure() {
        let s = RecurrentStructure::random(4, 6, 2, Activation::Tanh, 0.75, 1234).unwrap();
        // 8 neurons × 12 candidate sources, a quarter kept, plus biases
        assert_eq!(s.synapse_count(), 24 + 8);
        for k in 0..s.number_of_neurons() {
            assert!(s.synapse(k, s.bias_unit()).is_some());
        }
    }

    #[test]
    fn test_remove_synapse() {
        let mut s = RecurrentStructure::fully_recurrent(1, 1, 1, Activation::Tanh);
        s.init_uniform(0.1, 0.2, 1).unwrap();
        let before = s.number_of_parameters();
        s.remove_synapse(0, 1).unwrap();
        assert_eq!(s.number_of_parameters(), before - 1);
        assert!(s.synapse(1, 0).is_none());
        assert_eq!(s.weight(1, 0), 0.0);
    }

    #[test]
    fn test_remove_synapse_out_of_bounds() {
        let mut s = RecurrentStructure::fully_recurrent(1, 1, 1, Activation::Tanh);
        let before = s.number_of_parameters();
        let err = s.remove_synapse(0, 7).unwrap_err();
        assert!(matches!(err, RnnError::InvalidSynapse { neuron: 7, .. }));
        let err = s.remove_synapse(9, 0).unwrap_err();
        assert!(matches!(err, RnnError::InvalidSynapse { source_unit: 9, .. }));
        assert_eq!(s.number_of_parameters(), before);
    }

    #[test]
    fn test_feedforward_without_hidden() {
        let s = RecurrentStructure::feedforward(3, 0, 2, Activation::Linear);
        assert_eq!(s.number_of_parameters(), 2 * 4);
        assert!(s.is_feedforward());
    }

    #[test]
    fn test_add_synapse_out_of_bounds() {
        let mut s = RecurrentStructure::new(2, 2, 1, Activation::Tanh);
        let err = s.add_synapse(0, 15, Latency::Immediate).unwrap_err();
        assert!(matches!(err, RnnError::InvalidSynapse { neuron: 15, .. }));
    }
}
