use std::sync::Arc;

use tracing::{info, warn};

use crate::catalog::Level;
use crate::engine::progress::{self, ProgressRecord};
use crate::store::PersistenceError;
use crate::store::kv::KeyValueStore;

pub const PROGRESS_KEY: &str = "progress.json";

/// Loads and saves the learner's progress record as a whole.
pub struct ProgressStore {
    kv: Arc<dyn KeyValueStore>,
    catalog: &'static [Level],
}

impl ProgressStore {
    pub fn new(kv: Arc<dyn KeyValueStore>, catalog: &'static [Level]) -> Self {
        Self { kv, catalog }
    }

    /// Read the stored record. A missing, unreadable or unparsable value
    /// yields the default record.
    pub fn load(&self) -> ProgressRecord {
        let content = match self.kv.get(PROGRESS_KEY) {
            Ok(Some(content)) => content,
            Ok(None) => {
                info!("no saved progress, starting fresh");
                return ProgressRecord::new(self.catalog);
            }
            Err(e) => {
                warn!(error = %e, "failed to read progress, starting fresh");
                return ProgressRecord::new(self.catalog);
            }
        };

        match serde_json::from_str::<ProgressRecord>(&content) {
            Ok(mut record) => {
                if record.repair(self.catalog) {
                    warn!("saved progress was missing the first level, restored it");
                }
                record
            }
            Err(e) => {
                warn!(error = %e, "saved progress is corrupt, starting fresh");
                ProgressRecord::new(self.catalog)
            }
        }
    }

    pub fn save(&self, record: &ProgressRecord) -> Result<(), PersistenceError> {
        let json = serde_json::to_string_pretty(record)?;
        self.kv.set(PROGRESS_KEY, &json)
    }

    /// Save, logging instead of failing. The in-memory record stays
    /// authoritative either way.
    pub fn commit(&self, record: &ProgressRecord) {
        if let Err(e) = self.save(record) {
            warn!(error = %e, "failed to save progress");
        }
    }

    /// Replace whatever is stored with a brand-new record and return it.
    pub fn reset(&self) -> ProgressRecord {
        let record = progress::reset_progress(self.catalog);
        if let Err(e) = self.kv.remove(PROGRESS_KEY) {
            warn!(error = %e, "failed to remove saved progress");
        }
        self.commit(&record);
        info!("progress reset");
        record
    }
}
