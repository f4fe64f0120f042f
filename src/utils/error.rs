// src/utils/error.rs
use thiserror::Error;

/// Caller contract violations caught when a config is constructed, never during ranking.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("min_score must be within [0, 1], got {0}")]
    InvalidMinScore(f64),
    #[error("max_candidates must be at least 1, got {0}")]
    InvalidMaxCandidates(i64),
    #[error("exact_match_boost must be a finite non-negative number, got {0}")]
    InvalidBoost(f64),
    #[error("{name} must be within [0, 1], got {value}")]
    InvalidThreshold { name: &'static str, value: f64 },
    #[error("auto_link_threshold ({auto}) must not be below suggest_threshold ({suggest})")]
    ThresholdOrder { auto: f64, suggest: f64 },
}
