//! Weighted ensembles of models.

use ndarray::Array1;

use crate::error::{ensure_len, Result, RnnError};
use crate::model::Model;

/// Weighted mean of a set of models.
///
/// Members are kept in insertion order, which also decides ties when
/// [`MeanModel::classify`] counts votes. The ensemble has no parameters of
/// its own.
#[derive(Default)]
pub struct MeanModel<'a> {
    models: Vec<Box<dyn Model + 'a>>,
    weights: Vec<f64>,
    weight_sum: f64,
}

impl<'a> MeanModel<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a new model to the ensemble. `weight` must be positive and the
    /// model must accept the same inputs as the existing members.
    pub fn add_model(&mut self, model: Box<dyn Model + 'a>, weight: f64) -> Result<()> {
        if !(weight > 0.0) {
            return Err(RnnError::InvalidWeight(weight));
        }
        if let Some(first) = self.models.first() {
            ensure_len("model input", first.input_size(), model.input_size())?;
        }
        tracing::debug!(
            model = model.name(),
            weight,
            members = self.models.len() + 1,
            "added model to ensemble"
        );
        self.models.push(model);
        self.weights.push(weight);
        self.weight_sum += weight;
        Ok(())
    }

    /// Removes all models from the ensemble
    pub fn clear_models(&mut self) {
        self.models.clear();
        self.weights.clear();
        self.weight_sum = 0.0;
    }

    pub fn number_of_models(&self) -> usize {
        self.models.len()
    }

    pub fn model(&self, index: usize) -> Option<&(dyn Model + 'a)> {
        self.models.get(index).map(|m| m.as_ref())
    }

    pub fn weight(&self, index: usize) -> Option<f64> {
        self.weights.get(index).copied()
    }

    pub fn weight_sum(&self) -> f64 {
        self.weight_sum
    }

    pub fn set_weight(&mut self, index: usize, weight: f64) -> Result<()> {
        if !(weight > 0.0) {
            return Err(RnnError::InvalidWeight(weight));
        }
        let Some(slot) = self.weights.get_mut(index) else {
            return Err(RnnError::InvalidParameter {
                name: "index",
                reason: format!("ensemble has {} models", self.models.len()),
            });
        };
        self.weight_sum += weight - *slot;
        *slot = weight;
        Ok(())
    }

    /// Weighted vote over the argmax of every member's output.
    ///
    /// Each member votes for the index of its largest output (the first one
    /// on ties) with its weight. The class with the most weight wins; ties go
    /// to the lowest class index.
    pub fn classify(&self, input: &[f64]) -> Result<usize> {
        if self.models.is_empty() {
            return Err(RnnError::EmptyEnsemble);
        }
        let mut votes: Vec<f64> = Vec::new();
        for (model, &weight) in self.models.iter().zip(&self.weights) {
            let output = model.evaluate(input)?;
            let Some(class) = argmax(output.iter().copied()) else {
                tracing::warn!(model = model.name(), "ensemble member produced no output");
                continue;
            };
            if votes.len() <= class {
                votes.resize(class + 1, 0.0);
            }
            votes[class] += weight;
        }
        argmax(votes.into_iter()).ok_or(RnnError::EmptyEnsemble)
    }
}

fn argmax(values: impl Iterator<Item = f64>) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, v) in values.enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

impl<'a> Model for MeanModel<'a> {
    fn name(&self) -> &'static str {
        "MeanModel"
    }

    fn input_size(&self) -> usize {
        self.models.first().map_or(0, |m| m.input_size())
    }

    fn output_size(&self) -> usize {
        self.models.first().map_or(0, |m| m.output_size())
    }

    /// This model does not have any parameters.
    fn number_of_parameters(&self) -> usize {
        0
    }

    fn parameter_vector(&self) -> Array1<f64> {
        Array1::zeros(0)
    }

    fn set_parameter_vector(&mut self, parameters: &[f64]) -> Result<()> {
        ensure_len("parameter vector", 0, parameters.len())
    }

    /// `Σ_i w_i · f_i(x) / Σ_i w_i`
    fn evaluate(&self, input: &[f64]) -> Result<Array1<f64>> {
        let mut members = self.models.iter().zip(&self.weights);
        let (first, &weight) = members.next().ok_or(RnnError::EmptyEnsemble)?;
        let mut output = first.evaluate(input)? * weight;
        for (model, &weight) in members {
            let y = model.evaluate(input)?;
            ensure_len("model output", output.len(), y.len())?;
            output.scaled_add(weight, &y);
        }
        output /= self.weight_sum;
        Ok(output)
    }
}
