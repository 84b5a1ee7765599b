use shared::InferenceResponse;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::cache::models::{CacheHistoryEntry, CachedInference};

/// In-memory inference results keyed by the SHA-256 of the uploaded bytes.
#[derive(Clone)]
pub struct CacheService {
    state: Arc<Mutex<CacheState>>,
    capacity: usize,
}

#[derive(Default)]
struct CacheState {
    entries: HashMap<String, CachedInference>,
    clock: u64,
}

impl CacheState {
    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    fn evict_least_recently_used(&mut self) {
        let oldest = self
            .entries
            .values()
            .min_by_key(|entry| entry.last_used)
            .map(|entry| entry.image_hash.clone());
        if let Some(hash) = oldest {
            log::debug!("Evicting cached inference {}", hash);
            self.entries.remove(&hash);
        }
    }
}

impl CacheService {
    pub fn new(capacity: usize) -> Self {
        Self {
            state: Arc::new(Mutex::new(CacheState::default())),
            capacity,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.capacity > 0
    }

    pub async fn get_cached_inference(&self, image_hash: &str) -> Option<InferenceResponse> {
        let mut state = self.state.lock().await;
        let tick = state.tick();
        let entry = state.entries.get_mut(image_hash)?;
        entry.touch(tick);
        Some(entry.response.clone())
    }

    pub async fn get_entry(&self, image_hash: &str) -> Option<CachedInference> {
        self.state.lock().await.entries.get(image_hash).cloned()
    }

    /// Stores `response` under its image hash. Responses without a hash are ignored.
    pub async fn cache_inference_result(&self, file_name: &str, response: &InferenceResponse) {
        if !self.is_enabled() {
            return;
        }
        let Some(image_hash) = response.image_hash.clone() else {
            return;
        };

        let mut state = self.state.lock().await;
        let tick = state.tick();
        if let Some(existing) = state.entries.get_mut(&image_hash) {
            existing.touch(tick);
            return;
        }
        while state.entries.len() >= self.capacity {
            state.evict_least_recently_used();
        }
        let entry = CachedInference::new(image_hash.clone(), file_name.to_string(), response.clone(), tick);
        state.entries.insert(image_hash, entry);
    }

    /// Cached results, newest first.
    pub async fn get_cache_history(&self) -> Vec<CacheHistoryEntry> {
        let state = self.state.lock().await;
        let mut entries: Vec<&CachedInference> = state.entries.values().collect();
        entries.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.last_used.cmp(&a.last_used)));
        entries.into_iter().map(CacheHistoryEntry::from).collect()
    }

    pub async fn delete_cached_inference(&self, image_hash: &str) -> bool {
        self.state.lock().await.entries.remove(image_hash).is_some()
    }

    pub async fn clear(&self) {
        self.state.lock().await.entries.clear();
    }

    pub async fn len(&self) -> usize {
        self.state.lock().await.entries.len()
    }
}
