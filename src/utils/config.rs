//! Matching and linking configuration.
//! Values come from code or environment variables and are validated on construction.

use log::{debug, info, warn};
use std::env;
use std::str::FromStr;

use crate::utils::error::ConfigError;

pub const DEFAULT_MIN_SCORE: f64 = 0.6;
pub const DEFAULT_MAX_CANDIDATES: usize = 5;
pub const DEFAULT_EXACT_MATCH_BOOST: f64 = 0.3;
pub const DEFAULT_AUTO_LINK_THRESHOLD: f64 = 0.9;
pub const DEFAULT_SUGGEST_THRESHOLD: f64 = 0.6;

fn unit_interval(value: f64) -> bool {
    (0.0..=1.0).contains(&value)
}

/// Reads an env var, falling back to `default` when unset or unparsable.
fn env_or<T: FromStr>(key: &str, default: T) -> T {
    match env::var(key) {
        Ok(raw) => raw.trim().parse().unwrap_or_else(|_| {
            warn!("Ignoring unparsable {}={:?}, using default", key, raw);
            default
        }),
        Err(_) => default,
    }
}

/// Candidate ranking settings.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MatchConfig {
    min_score: f64,
    max_candidates: usize,
    exact_match_boost: f64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            min_score: DEFAULT_MIN_SCORE,
            max_candidates: DEFAULT_MAX_CANDIDATES,
            exact_match_boost: DEFAULT_EXACT_MATCH_BOOST,
        }
    }
}

impl MatchConfig {
    /// `max_candidates` is signed so that zero and negative limits from callers are rejected here.
    pub fn new(
        min_score: f64,
        max_candidates: i64,
        exact_match_boost: f64,
    ) -> Result<Self, ConfigError> {
        if !unit_interval(min_score) {
            return Err(ConfigError::InvalidMinScore(min_score));
        }
        if max_candidates <= 0 {
            return Err(ConfigError::InvalidMaxCandidates(max_candidates));
        }
        if !exact_match_boost.is_finite() || exact_match_boost < 0.0 {
            return Err(ConfigError::InvalidBoost(exact_match_boost));
        }
        Ok(Self {
            min_score,
            max_candidates: max_candidates as usize,
            exact_match_boost,
        })
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::new(
            env_or("MATCH_MIN_SCORE", DEFAULT_MIN_SCORE),
            env_or("MATCH_MAX_CANDIDATES", DEFAULT_MAX_CANDIDATES as i64),
            env_or("MATCH_EXACT_BOOST", DEFAULT_EXACT_MATCH_BOOST),
        )?;
        debug!("Match config from env: {:?}", config);
        Ok(config)
    }

    pub fn min_score(&self) -> f64 {
        self.min_score
    }

    pub fn max_candidates(&self) -> usize {
        self.max_candidates
    }

    pub fn exact_match_boost(&self) -> f64 {
        self.exact_match_boost
    }

    pub fn log_config(&self) {
        info!("🎯 Candidate ranking configuration");
        info!("   Minimum score: {:.2}", self.min_score);
        info!("   Maximum candidates: {}", self.max_candidates);
        info!("   Exact match boost: {:.2}", self.exact_match_boost);
    }
}

/// Decision thresholds and the no-match policy.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinkConfig {
    auto_link_threshold: f64,
    suggest_threshold: f64,
    create_new_if_no_match: bool,
}

impl Default for LinkConfig {
    fn default() -> Self {
        Self {
            auto_link_threshold: DEFAULT_AUTO_LINK_THRESHOLD,
            suggest_threshold: DEFAULT_SUGGEST_THRESHOLD,
            create_new_if_no_match: true,
        }
    }
}

impl LinkConfig {
    pub fn new(
        auto_link_threshold: f64,
        suggest_threshold: f64,
        create_new_if_no_match: bool,
    ) -> Result<Self, ConfigError> {
        if !unit_interval(auto_link_threshold) {
            return Err(ConfigError::InvalidThreshold {
                name: "auto_link_threshold",
                value: auto_link_threshold,
            });
        }
        if !unit_interval(suggest_threshold) {
            return Err(ConfigError::InvalidThreshold {
                name: "suggest_threshold",
                value: suggest_threshold,
            });
        }
        if auto_link_threshold < suggest_threshold {
            return Err(ConfigError::ThresholdOrder {
                auto: auto_link_threshold,
                suggest: suggest_threshold,
            });
        }
        Ok(Self {
            auto_link_threshold,
            suggest_threshold,
            create_new_if_no_match,
        })
    }

    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let config = Self::new(
            env_or("LINK_AUTO_THRESHOLD", DEFAULT_AUTO_LINK_THRESHOLD),
            env_or("LINK_SUGGEST_THRESHOLD", DEFAULT_SUGGEST_THRESHOLD),
            env_or("LINK_CREATE_IF_NO_MATCH", true),
        )?;
        debug!("Link config from env: {:?}", config);
        Ok(config)
    }

    pub fn auto_link_threshold(&self) -> f64 {
        self.auto_link_threshold
    }

    pub fn suggest_threshold(&self) -> f64 {
        self.suggest_threshold
    }

    pub fn create_new_if_no_match(&self) -> bool {
        self.create_new_if_no_match
    }

    pub fn log_config(&self) {
        info!("🔗 Link decision configuration");
        info!("   Auto-link threshold: {:.2}", self.auto_link_threshold);
        info!("   Suggest threshold: {:.2}", self.suggest_threshold);
        if self.create_new_if_no_match {
            info!("   Unmatched names: propose creating a new partner");
        } else {
            info!("   Unmatched names: skip");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let match_config = MatchConfig::default();
        assert_eq!(match_config.min_score(), 0.6);
        assert_eq!(match_config.max_candidates(), 5);
        assert_eq!(match_config.exact_match_boost(), 0.3);

        let link_config = LinkConfig::default();
        assert_eq!(link_config.auto_link_threshold(), 0.9);
        assert_eq!(link_config.suggest_threshold(), 0.6);
        assert!(link_config.create_new_if_no_match());
    }

    #[test]
    fn test_match_config_rejects_contract_violations() {
        assert_eq!(MatchConfig::new(1.2, 5, 0.3), Err(ConfigError::InvalidMinScore(1.2)));
        assert_eq!(MatchConfig::new(-0.1, 5, 0.3), Err(ConfigError::InvalidMinScore(-0.1)));
        assert!(matches!(MatchConfig::new(f64::NAN, 5, 0.3), Err(ConfigError::InvalidMinScore(_))));
        assert_eq!(MatchConfig::new(0.6, 0, 0.3), Err(ConfigError::InvalidMaxCandidates(0)));
        assert_eq!(MatchConfig::new(0.6, -3, 0.3), Err(ConfigError::InvalidMaxCandidates(-3)));
        assert_eq!(MatchConfig::new(0.6, 5, -0.1), Err(ConfigError::InvalidBoost(-0.1)));
        assert!(MatchConfig::new(0.0, 1, 0.0).is_ok());
        assert!(MatchConfig::new(1.0, 1, 0.0).is_ok());
    }

    #[test]
    fn test_link_config_threshold_order() {
        assert_eq!(
            LinkConfig::new(0.5, 0.6, true),
            Err(ConfigError::ThresholdOrder { auto: 0.5, suggest: 0.6 })
        );
        assert!(matches!(
            LinkConfig::new(1.5, 0.6, true),
            Err(ConfigError::InvalidThreshold { name: "auto_link_threshold", .. })
        ));
        let config = LinkConfig::new(0.8, 0.5, false).unwrap();
        assert_eq!(config.auto_link_threshold(), 0.8);
        assert_eq!(config.suggest_threshold(), 0.5);
        assert!(!config.create_new_if_no_match());
        assert!(LinkConfig::new(0.7, 0.7, true).is_ok());
    }

    #[test]
    fn test_config_from_env() {
        env::set_var("MATCH_MIN_SCORE", "0.4");
        env::set_var("MATCH_MAX_CANDIDATES", "not-a-number");
        env::set_var("LINK_AUTO_THRESHOLD", "0.85");
        env::set_var("LINK_CREATE_IF_NO_MATCH", "false");

        let match_config = MatchConfig::from_env().unwrap();
        assert_eq!(match_config.min_score(), 0.4);
        assert_eq!(match_config.max_candidates(), DEFAULT_MAX_CANDIDATES);

        let link_config = LinkConfig::from_env().unwrap();
        assert_eq!(link_config.auto_link_threshold(), 0.85);
        assert!(!link_config.create_new_if_no_match());

        env::set_var("LINK_SUGGEST_THRESHOLD", "0.95");
        assert!(LinkConfig::from_env().is_err());

        // Cleanup
        env::remove_var("MATCH_MIN_SCORE");
        env::remove_var("MATCH_MAX_CANDIDATES");
        env::remove_var("LINK_AUTO_THRESHOLD");
        env::remove_var("LINK_SUGGEST_THRESHOLD");
        env::remove_var("LINK_CREATE_IF_NO_MATCH");
    }
}
