use dashmap::DashMap;
use feedback::Feedback;
use sha2::{Digest, Sha256};

/// Analysis results keyed by a hash of the clip bytes. The model call is the
/// expensive step, so re-analyzing an identical clip is served from here.
pub struct AnalysisCache {
    entries: DashMap<String, Feedback>,
    max_entries: usize,
}

impl AnalysisCache {
    pub fn new(max_entries: usize) -> Self {
        Self {
            entries: DashMap::new(),
            max_entries,
        }
    }

    pub fn get(&self, clip: &[u8]) -> Option<Feedback> {
        let key = hash_clip(clip);
        self.entries.get(&key).map(|r| r.value().clone())
    }

    pub fn set(&self, clip: &[u8], feedback: Feedback) {
        if self.entries.len() >= self.max_entries {
            // Simple eviction: clear 25% when full
            let to_remove: Vec<_> = self
                .entries
                .iter()
                .take(self.max_entries / 4)
                .map(|r| r.key().clone())
                .collect();
            for key in to_remove {
                self.entries.remove(&key);
            }
        }
        let key = hash_clip(clip);
        self.entries.insert(key, feedback);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            analyses_cached: self.entries.len(),
        }
    }
}

fn hash_clip(clip: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(clip);
    hex::encode(hasher.finalize())
}

#[derive(Debug, serde::Serialize)]
pub struct CacheStats {
    pub analyses_cached: usize,
}
