use serde::{Deserialize, Serialize};

use crate::enumerate::EnumerationStrategy;

/// Options for the generation engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateOptions {
    /// Identifier recorded in logs and the report; generated when absent.
    pub run_id: Option<String>,
    pub strategy: EnumerationStrategy,
    /// Stop pulling combinations after this many records.
    pub limit: Option<u64>,
    /// Flush the sink every N records.
    pub flush_every: u64,
    /// Emit a progress event every N records; 0 disables progress events.
    pub progress_every: u64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            run_id: None,
            strategy: EnumerationStrategy::Subsets,
            limit: None,
            flush_every: 1,
            progress_every: 100_000,
        }
    }
}

/// Report for a generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationReport {
    pub run_id: String,
    pub strategy: EnumerationStrategy,
    pub attributes: usize,
    pub required_attributes: usize,
    /// Pre-filter tuple count of the subset layout; `None` on overflow.
    pub candidate_bound: Option<u128>,
    pub candidates: u64,
    pub rejected: u64,
    pub records_emitted: u64,
    pub limit_reached: bool,
    pub bytes_written: u64,
    pub duration_ms: u64,
    pub records_per_sec: f64,
}

impl GenerationReport {
    pub fn new(run_id: String, strategy: EnumerationStrategy) -> Self {
        Self {
            run_id,
            strategy,
            attributes: 0,
            required_attributes: 0,
            candidate_bound: None,
            candidates: 0,
            rejected: 0,
            records_emitted: 0,
            limit_reached: false,
            bytes_written: 0,
            duration_ms: 0,
            records_per_sec: 0.0,
        }
    }
}
