// src/matching/ranker.rs - Bounded, descending-score candidate lists for one query
use log::debug;
use rayon::prelude::*;
use std::collections::HashSet;

use crate::matching::index::{EntityIndex, IndexedEntity};
use crate::matching::normalize::normalize;
use crate::matching::similarity::boosted_field_similarity;
use crate::models::core::EntityId;
use crate::models::matching::{MatchCandidate, MatchField, MatchKind, QueryInput};
use crate::utils::config::MatchConfig;

/// Best-scoring name field of one entity. Ties keep the earlier (higher priority) field.
fn best_field_score(
    entity: &IndexedEntity<'_>,
    normalized_query: &str,
    exact_match_boost: f64,
) -> Option<(f64, MatchField)> {
    let mut best: Option<(f64, MatchField)> = None;
    for (field, normalized_value) in &entity.fields {
        let score = boosted_field_similarity(normalized_query, normalized_value, exact_match_boost);
        if best.map_or(true, |(best_score, _)| score > best_score) {
            best = Some((score, *field));
        }
    }
    best
}

/// Rank directory entities against `query_name`.
///
/// An identifier hit is placed first with score 1.0 and excluded from name scoring. The
/// remaining entities keep their best field score when it reaches `min_score`, are sorted by
/// score descending (ties keep directory order) and truncated to `max_candidates`.
pub fn rank<'a>(
    index: &EntityIndex<'a>,
    query_name: &str,
    identifier: Option<&str>,
    config: &MatchConfig,
) -> Vec<MatchCandidate<'a>> {
    let mut candidates: Vec<MatchCandidate<'a>> = Vec::new();
    let mut seen_ids: HashSet<EntityId> = HashSet::new();

    if let Some(entity) = identifier.and_then(|id| index.lookup_identifier(id)) {
        candidates.push(MatchCandidate {
            entity,
            score: 1.0,
            match_kind: MatchKind::IdentifierExact,
            matched_field: MatchField::ExternalIdentifier,
        });
        seen_ids.insert(entity.id);
    }

    let normalized_query = normalize(query_name);
    let mut name_candidates: Vec<MatchCandidate<'a>> = Vec::new();

    if !normalized_query.is_empty() {
        for entity in index.entities() {
            if seen_ids.contains(&entity.record.id) {
                continue;
            }
            let Some((score, field)) =
                best_field_score(entity, &normalized_query, config.exact_match_boost())
            else {
                continue;
            };
            if score < config.min_score() {
                continue;
            }
            seen_ids.insert(entity.record.id);
            name_candidates.push(MatchCandidate {
                entity: entity.record,
                score,
                match_kind: MatchKind::from_name_score(score),
                matched_field: field,
            });
        }
    }

    // Stable sort: equal scores stay in directory order.
    name_candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.extend(name_candidates);
    candidates.truncate(config.max_candidates());

    debug!(
        "Ranked {:?} (identifier {:?}): {} candidate(s), top {:?}",
        query_name,
        identifier,
        candidates.len(),
        candidates.first().map(|c| (c.entity.id, c.score))
    );
    candidates
}

/// Top candidate only, if any.
pub fn find_best_match<'a>(
    index: &EntityIndex<'a>,
    query_name: &str,
    identifier: Option<&str>,
    config: &MatchConfig,
) -> Option<MatchCandidate<'a>> {
    rank(index, query_name, identifier, config).into_iter().next()
}

/// Rank independent queries in parallel. Output order matches input order.
pub fn rank_batch<'a>(
    index: &EntityIndex<'a>,
    queries: &[QueryInput],
    config: &MatchConfig,
) -> Vec<Vec<MatchCandidate<'a>>> {
    queries
        .par_iter()
        .map(|query| rank(index, &query.name, query.external_identifier.as_deref(), config))
        .collect()
}
