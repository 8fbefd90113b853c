//! Single-slot dataset cache.
//!
//! Holds the records of the most recent generation window. A request for
//! the same window returns the stored allocation; any other window
//! replaces it. There is no eviction policy beyond "last call wins".

use crate::{
    calendar::SimWindow,
    config::GeneratorConfig,
    generator::{generate_all_data, DailyRecord},
};
use std::sync::Arc;

struct CachedDataset {
    window:  SimWindow,
    records: Arc<[DailyRecord]>,
}

#[derive(Default)]
pub struct DatasetCache {
    slot:        Option<CachedDataset>,
    generations: u64,
}

impl DatasetCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records for `window`, generating them only on a miss.
    pub fn get_or_generate(
        &mut self,
        config: &GeneratorConfig,
        window: SimWindow,
    ) -> Arc<[DailyRecord]> {
        if let Some(cached) = &self.slot {
            if cached.window == window {
                log::debug!("dataset cache hit: {} days from {}", window.days, window.start);
                return Arc::clone(&cached.records);
            }
        }

        let records: Arc<[DailyRecord]> = generate_all_data(config, window).into();
        self.generations += 1;
        log::info!(
            "generated dataset #{}: {} records, {} days from {}",
            self.generations,
            records.len(),
            window.days,
            window.start,
        );
        self.slot = Some(CachedDataset {
            window,
            records: Arc::clone(&records),
        });
        records
    }

    /// Window currently held, if any.
    pub fn cached_window(&self) -> Option<SimWindow> {
        self.slot.as_ref().map(|c| c.window)
    }

    /// Number of times a dataset has been generated.
    pub fn generations(&self) -> u64 {
        self.generations
    }

    /// Drop the held dataset. The next request regenerates.
    pub fn invalidate(&mut self) {
        self.slot = None;
    }
}
