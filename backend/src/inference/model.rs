use ndarray::Array3;
use sha2::{Digest, Sha256};
use shared::{class_labels, InferenceResponse, ModelInfo, TumorClass};
use std::sync::{Arc, Mutex};

use super::engine::{load_classifier, Classifier, OutputKind};
use super::error::InferenceError;
use super::preprocess::preprocess;
use crate::config::ModelConfig;

/// Process-wide handle to the loaded classifier. Cloning shares the same model.
#[derive(Clone)]
pub struct Model {
    classifier: Arc<Mutex<Box<dyn Classifier>>>,
    engine: &'static str,
    config: ModelConfig,
}

impl Model {
    pub fn load(config: &ModelConfig) -> Result<Self, InferenceError> {
        let classifier = load_classifier(&config.path, config.input_layout, config.input_size)?;
        Ok(Self::from_classifier(classifier, config.clone()))
    }

    pub fn from_classifier(classifier: Box<dyn Classifier>, config: ModelConfig) -> Self {
        let engine = classifier.name();
        Self {
            classifier: Arc::new(Mutex::new(classifier)),
            engine,
            config,
        }
    }

    pub fn inference(&self, image: &[u8]) -> Result<Vec<f32>, InferenceError> {
        let input = preprocess(image, self.config.input_size)?;
        self.predict(&input)
    }

    fn predict(&self, input: &Array3<f32>) -> Result<Vec<f32>, InferenceError> {
        let raw = {
            let classifier = self.classifier.lock().map_err(|_| InferenceError::Poisoned)?;
            classifier.predict(input)?
        };
        postprocess(raw, self.config.output_kind)
    }

    /// Returns the arg-max class and its probability as a percentage.
    pub fn calculate_result(&self, predictions: &[f32]) -> (TumorClass, f32) {
        calculate_result(predictions)
    }

    pub fn analyze(&self, image: &[u8]) -> Result<InferenceResponse, InferenceError> {
        let predictions = self.inference(image)?;
        let (predicted, confidence) = self.calculate_result(&predictions);
        Ok(InferenceResponse {
            predictions,
            class_labels: class_labels(),
            predicted,
            confidence,
            image_hash: Some(image_hash(image)),
        })
    }

    pub fn info(&self) -> ModelInfo {
        ModelInfo {
            input_size: self.config.input_size,
            channels: shared::INPUT_CHANNELS,
            class_labels: class_labels(),
            engine: self.engine.to_string(),
            model_path: self.config.path.display().to_string(),
        }
    }
}

pub fn image_hash(image: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(image);
    hex::encode(hasher.finalize())
}

fn postprocess(raw: Vec<f32>, kind: OutputKind) -> Result<Vec<f32>, InferenceError> {
    let expected = TumorClass::ALL.len();
    if raw.len() != expected {
        return Err(InferenceError::OutputShape {
            expected,
            actual: raw.len(),
        });
    }

    let probabilities = match kind {
        OutputKind::Probabilities => raw,
        OutputKind::Logits => softmax(&raw),
    };
    Ok(probabilities
        .into_iter()
        .map(|p| if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) })
        .collect())
}

fn softmax(logits: &[f32]) -> Vec<f32> {
    let max = logits
        .iter()
        .copied()
        .filter(|v| !v.is_nan())
        .fold(f32::NEG_INFINITY, f32::max);
    if max == f32::INFINITY {
        let winner = logits.iter().position(|&v| v == f32::INFINITY);
        return (0..logits.len())
            .map(|i| if Some(i) == winner { 1.0 } else { 0.0 })
            .collect();
    }
    let exps: Vec<f32> = logits.iter().map(|v| (v - max).exp()).collect();
    let sum: f32 = exps.iter().filter(|v| v.is_finite()).sum();
    if sum <= 0.0 {
        return vec![0.0; logits.len()];
    }
    exps.into_iter().map(|e| e / sum).collect()
}

// NaN never wins and ties resolve to the lowest index.
fn calculate_result(predictions: &[f32]) -> (TumorClass, f32) {
    let mut best = (TumorClass::ALL[0], f32::NEG_INFINITY);
    for (class, &p) in TumorClass::ALL.iter().zip(predictions) {
        if p > best.1 {
            best = (*class, p);
        }
    }
    let confidence = (best.1 * 100.0).clamp(0.0, 100.0);
    (best.0, confidence)
}
