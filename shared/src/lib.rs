use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

mod labels;
mod treatment;

pub use labels::{class_labels, TumorClass};
pub use treatment::{treatment_plan, TreatmentPlan, TreatmentStep};

/// Side length of the square model input.
pub const INPUT_SIZE: u32 = 128;
pub const INPUT_CHANNELS: u32 = 3;
/// Most images accepted in one upload.
pub const MAX_FILES: usize = 15;

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct InferenceResponse {
    pub predictions: Vec<f32>,
    pub class_labels: Vec<String>,
    pub predicted: TumorClass,
    /// Percentage in [0, 100].
    pub confidence: f32,
    pub image_hash: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnalysisEntry {
    pub id: Uuid,
    pub file_name: String,
    pub file_size: usize,
    pub analyzed_at: DateTime<Utc>,
    #[serde(default)]
    pub cached: bool,
    pub inference: Option<InferenceResponse>,
    pub error: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct AnalysisResponse {
    pub results: Vec<AnalysisEntry>,
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct ModelInfo {
    pub input_size: u32,
    pub channels: u32,
    pub class_labels: Vec<String>,
    pub engine: String,
    pub model_path: String,
}
