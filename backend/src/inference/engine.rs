use ndarray::Array3;
use serde::{Deserialize, Serialize};
use std::path::Path;

use super::error::InferenceError;

/// Memory layout the model expects for its single image input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum InputLayout {
    /// Batch x height x width x channel, as exported from Keras.
    #[default]
    Nhwc,
    /// Batch x channel x height x width, as exported from PyTorch.
    Nchw,
}

impl InputLayout {
    pub fn shape(self, size: usize) -> [usize; 4] {
        match self {
            InputLayout::Nhwc => [1, size, size, 3],
            InputLayout::Nchw => [1, 3, size, size],
        }
    }

    /// Flattens an HWC array into this layout (batch of one).
    pub fn flatten(self, input: &Array3<f32>) -> Vec<f32> {
        match self {
            InputLayout::Nhwc => input.iter().copied().collect(),
            InputLayout::Nchw => input.view().permuted_axes([2, 0, 1]).iter().copied().collect(),
        }
    }
}

/// Whether the model's last layer already applies softmax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OutputKind {
    #[default]
    Probabilities,
    Logits,
}

pub trait Classifier: Send {
    /// Runs one forward pass over a preprocessed HWC image and returns the raw
    /// output vector.
    fn predict(&self, input: &Array3<f32>) -> Result<Vec<f32>, InferenceError>;

    fn name(&self) -> &'static str;
}

/// Loads the model artifact at `path`, choosing the engine by file extension.
#[cfg_attr(not(any(feature = "onnx", feature = "torch")), allow(unused_variables))]
pub fn load_classifier(
    path: &Path,
    layout: InputLayout,
    input_size: u32,
) -> Result<Box<dyn Classifier>, InferenceError> {
    if !path.exists() {
        return Err(InferenceError::ModelNotFound(path.to_path_buf()));
    }

    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .unwrap_or_default();

    match extension.as_str() {
        #[cfg(feature = "onnx")]
        "onnx" => Ok(Box::new(super::onnx::OnnxClassifier::load(path, layout, input_size)?)),
        #[cfg(feature = "torch")]
        "pt" | "ts" => Ok(Box::new(super::torch::TorchClassifier::load(path, layout, input_size)?)),
        _ => Err(InferenceError::UnsupportedModel(format!(
            "{} (no engine compiled in for '.{}' files)",
            path.display(),
            extension
        ))),
    }
}
