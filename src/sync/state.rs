//! Sync run reporting.

/// Outcome counters for one synchronization run.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub downloaded: u64,
    pub skipped: u64,
    pub failed: Vec<String>,
}

impl SyncReport {
    /// Record a newly synchronized item.
    pub fn record_downloaded(&mut self) {
        self.downloaded += 1;
    }

    /// Record an item skipped because it was already synced.
    pub fn record_skipped(&mut self) {
        self.skipped += 1;
    }

    /// Record a failed item key.
    pub fn record_failed(&mut self, item_key: String) {
        self.failed.push(item_key);
    }

    /// Whether any item failed this run.
    pub fn has_failures(&self) -> bool {
        !self.failed.is_empty()
    }

    /// Total number of items considered.
    pub fn total_processed(&self) -> u64 {
        self.downloaded + self.skipped + self.failed.len() as u64
    }
}
