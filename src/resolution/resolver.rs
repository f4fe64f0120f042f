// src/resolution/resolver.rs - Adapter seam for turning raw transaction names into canonical names
use anyhow::{Context, Result};
use log::{debug, warn};
use serde::Deserialize;
use std::collections::HashMap;

use crate::matching::normalize::{clean_search_name, normalize};
use crate::models::matching::{ConfidenceBand, Resolution};
use crate::resolution::cache::ResolutionCache;

/// Anything that can determine the registered company behind a store or transaction name.
pub trait NameResolver: Sync {
    fn resolve(&self, name: &str) -> Result<Resolution>;
}

/// Resolve through the cache first. Resolver errors become unresolved results and are
/// never cached, so a later attempt can still succeed.
pub fn resolve_cached(
    resolver: &dyn NameResolver,
    cache: &mut dyn ResolutionCache,
    name: &str,
    use_cache: bool,
) -> Resolution {
    if use_cache {
        if let Some(cached) = cache.get(name) {
            debug!("Resolution cache hit for {:?}", name);
            return cached;
        }
    }

    let resolution = match resolver.resolve(name) {
        Ok(resolution) => resolution,
        Err(e) => {
            warn!("Name resolution failed for {:?}: {:#}", name, e);
            return Resolution::unresolved(name, format!("resolution error: {:#}", e));
        }
    };

    if use_cache && resolution.resolved_name().is_some() {
        cache.insert(name, resolution.clone());
    }
    resolution
}

/// Treats every name as already canonical. Used when no resolution source is configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct PassthroughResolver;

impl NameResolver for PassthroughResolver {
    fn resolve(&self, name: &str) -> Result<Resolution> {
        let mut resolution = Resolution::resolved(name, name.trim(), ConfidenceBand::Unknown);
        resolution.reasoning = "name used as-is".to_string();
        Ok(resolution)
    }
}

/// A lookup table from known store/transaction names to registered company names.
///
/// Lookup order: exact raw name, then normalized name, then the cleaned search key.
/// The first key that hits wins; this is a heuristic, not a guarantee of the best match.
#[derive(Debug, Default, Clone)]
pub struct TableResolver {
    exact: HashMap<String, String>,
    normalized: HashMap<String, String>,
    search_keys: HashMap<String, String>,
}

impl TableResolver {
    pub fn new<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let mut resolver = Self::default();
        for (key, value) in entries {
            resolver.insert(key.into(), value.into());
        }
        resolver
    }

    pub fn insert(&mut self, key: String, value: String) {
        let normalized_key = normalize(&key);
        if !normalized_key.is_empty() {
            self.normalized
                .entry(normalized_key)
                .or_insert_with(|| value.clone());
        }
        let search_key = normalize(&clean_search_name(&key));
        if !search_key.is_empty() {
            self.search_keys
                .entry(search_key)
                .or_insert_with(|| value.clone());
        }
        self.exact.insert(key, value);
    }

    /// Loads a JSON object of `{"raw name": "registered name"}` pairs.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: HashMap<String, String> =
            serde_json::from_str(json).context("Failed to parse resolution table JSON")?;
        Ok(Self::new(table))
    }

    pub fn len(&self) -> usize {
        self.exact.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exact.is_empty()
    }
}

impl NameResolver for TableResolver {
    fn resolve(&self, name: &str) -> Result<Resolution> {
        if let Some(value) = self.exact.get(name) {
            return Ok(Resolution::resolved(name, value.as_str(), ConfidenceBand::High));
        }
        if let Some(value) = self.normalized.get(&normalize(name)) {
            return Ok(Resolution::resolved(name, value.as_str(), ConfidenceBand::Medium));
        }
        let search_key = normalize(&clean_search_name(name));
        if let Some(value) = self.search_keys.get(&search_key) {
            let mut resolution = Resolution::resolved(name, value.as_str(), ConfidenceBand::Low);
            resolution.reasoning = format!("matched by search key '{}'", search_key);
            return Ok(resolution);
        }
        Ok(Resolution::unresolved(name, "no table entry"))
    }
}

#[derive(Debug, Deserialize)]
struct ResolutionReply {
    parent_company: Option<String>,
    #[serde(default)]
    confidence: Option<String>,
    #[serde(default)]
    reasoning: Option<String>,
    #[serde(default)]
    is_individual: bool,
    #[serde(default)]
    notes: Option<String>,
}

/// The JSON body of a reply, with an optional ```json or ``` fence removed.
fn extract_json_block(text: &str) -> &str {
    let fenced = text
        .split_once("```json")
        .or_else(|| text.split_once("```"))
        .map(|(_, rest)| rest.split("```").next().unwrap_or(rest));
    fenced.unwrap_or(text).trim()
}

/// Parse a resolution reply of the form
/// `{"parent_company": ..., "confidence": ..., "reasoning": ..., "is_individual": ..., "notes": ...}`.
/// Malformed replies produce an unresolved result rather than an error.
pub fn parse_resolution_reply(original_name: &str, text: &str) -> Resolution {
    let body = extract_json_block(text);
    match serde_json::from_str::<ResolutionReply>(body) {
        Ok(reply) => Resolution {
            original_name: original_name.to_string(),
            resolved_name: reply.parent_company.filter(|name| !name.trim().is_empty()),
            confidence: reply
                .confidence
                .as_deref()
                .map(ConfidenceBand::from_label)
                .unwrap_or(ConfidenceBand::Unknown),
            reasoning: reply.reasoning.unwrap_or_default(),
            is_individual: reply.is_individual,
            notes: reply.notes.unwrap_or_default(),
        },
        Err(e) => {
            let mut resolution =
                Resolution::unresolved(original_name, format!("reply parse error: {}", e));
            resolution.notes = text.chars().take(200).collect();
            resolution
        }
    }
}
