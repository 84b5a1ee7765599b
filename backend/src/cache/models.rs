use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::{InferenceResponse, TumorClass};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CachedInference {
    pub image_hash: String,
    pub file_name: String,
    pub response: InferenceResponse,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub access_count: i32,
    #[serde(skip)]
    pub(super) last_used: u64,
}

impl CachedInference {
    pub fn new(image_hash: String, file_name: String, response: InferenceResponse, tick: u64) -> Self {
        let now = chrono::Utc::now();
        Self {
            image_hash,
            file_name,
            response,
            created_at: now,
            last_accessed: now,
            access_count: 1,
            last_used: tick,
        }
    }

    pub(super) fn touch(&mut self, tick: u64) {
        self.last_accessed = chrono::Utc::now();
        self.access_count += 1;
        self.last_used = tick;
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CacheHistoryEntry {
    pub image_hash: String,
    pub file_name: String,
    pub predicted: TumorClass,
    pub confidence: f32,
    pub created_at: DateTime<Utc>,
    pub last_accessed: DateTime<Utc>,
    pub access_count: i32,
}

impl From<&CachedInference> for CacheHistoryEntry {
    fn from(entry: &CachedInference) -> Self {
        Self {
            image_hash: entry.image_hash.clone(),
            file_name: entry.file_name.clone(),
            predicted: entry.response.predicted,
            confidence: entry.response.confidence,
            created_at: entry.created_at,
            last_accessed: entry.last_accessed,
            access_count: entry.access_count,
        }
    }
}
