// src/utils/logging.rs - Phase logging for a linking run
use log::{debug, info, warn};
use std::time::Instant;

const TAG: &str = "[LINK] 🔗";

#[derive(Clone)]
pub struct LinkingLogger {
    start_time: Instant,
}

impl Default for LinkingLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl LinkingLogger {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
        }
    }

    pub fn log_start(&self, run_id: &str, use_cache: bool) {
        info!(
            "{} 🚀 Starting partner linking (run ID: {}){}",
            TAG,
            run_id,
            if use_cache { " with resolution cache" } else { " (cache disabled)" }
        );
    }

    pub fn log_phase(&self, phase: &str, details: Option<&str>) {
        let elapsed = self.start_time.elapsed().as_secs_f32();
        match details {
            Some(details) => info!("{} 🔄 Phase: {} - {} [+{:.1}s]", TAG, phase, details, elapsed),
            None => info!("{} 🔄 Phase: {} [+{:.1}s]", TAG, phase, elapsed),
        }
    }

    pub fn log_data_loaded(&self, count: usize, data_type: &str) {
        info!("{} 📊 Loaded {} {} records", TAG, count, data_type);
    }

    pub fn log_cache_results(&self, hits: usize, misses: usize) {
        let total = hits + misses;
        if total > 0 {
            info!(
                "{} 💾 Cache results: {} hits, {} misses ({:.1}% hit rate)",
                TAG,
                hits,
                misses,
                hits as f64 / total as f64 * 100.0
            );
        }
    }

    pub fn log_completion(&self, proposals: usize) {
        info!(
            "{} 🎉 COMPLETED: {} proposals in {:.2?}",
            TAG,
            proposals,
            self.start_time.elapsed()
        );
    }

    pub fn log_data_quality_issue(&self, issue_type: &str, count: usize) {
        if count > 0 {
            warn!("{} ⚠️  Data quality: {} instances of {}", TAG, count, issue_type);
        }
    }

    pub fn log_debug(&self, message: &str) {
        debug!("{} {}", TAG, message);
    }
}
