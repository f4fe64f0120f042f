// src/linking/decision.rs - Turns a ranked candidate list into one link/create/skip proposal
use log::debug;

use crate::models::matching::{ConfidenceBand, LinkProposal, MatchCandidate, ProposedAction};
use crate::utils::config::LinkConfig;

struct ProposalDraft<'a> {
    action: ProposedAction<'a>,
    score: f64,
    confidence_band: ConfidenceBand,
    rationale: String,
}

/// Create-or-skip outcome used when nothing usable matched.
fn no_match_draft<'a>(
    config: &LinkConfig,
    resolved_name: &str,
    score: f64,
    confidence_band: ConfidenceBand,
    reason: String,
) -> ProposalDraft<'a> {
    if config.create_new_if_no_match() {
        ProposalDraft {
            action: ProposedAction::Create,
            score,
            confidence_band,
            rationale: format!("{}; propose creating new partner '{}'", reason, resolved_name),
        }
    } else {
        ProposalDraft {
            action: ProposedAction::Skip,
            score,
            confidence_band: ConfidenceBand::Low,
            rationale: reason,
        }
    }
}

/// Decide what to do with one query given its ranked candidates.
///
/// Pure and total: an absent resolved name skips with `unknown` confidence, an empty or
/// low-scoring list creates (or skips, per policy), and otherwise the top candidate is linked
/// with `high` confidence at or above the auto-link threshold and `medium` (needs human
/// confirmation) at or above the suggest threshold.
pub fn decide<'a>(
    query_name: &str,
    resolved_name: Option<&str>,
    external_identifier: Option<&str>,
    candidates: &[MatchCandidate<'a>],
    config: &LinkConfig,
) -> LinkProposal<'a> {
    let resolved = resolved_name.map(str::trim).filter(|name| !name.is_empty());
    let identifier = external_identifier
        .map(str::trim)
        .filter(|id| !id.is_empty());

    let draft = match (resolved, candidates.first()) {
        (None, _) => ProposalDraft {
            action: ProposedAction::Skip,
            score: 0.0,
            confidence_band: ConfidenceBand::Unknown,
            rationale: "no resolved name".to_string(),
        },
        (Some(resolved), None) => {
            let band = if identifier.is_some() {
                ConfidenceBand::Medium
            } else {
                ConfidenceBand::Low
            };
            no_match_draft(
                config,
                resolved,
                0.0,
                band,
                "no existing partner matched".to_string(),
            )
        }
        (Some(resolved), Some(best)) => {
            let score = best.score;
            let name = &best.entity.canonical_name;
            if score >= config.auto_link_threshold() {
                ProposalDraft {
                    action: ProposedAction::Link { target: best.entity },
                    score,
                    confidence_band: ConfidenceBand::High,
                    rationale: format!("high-similarity match: {} (score: {:.2})", name, score),
                }
            } else if score >= config.suggest_threshold() {
                ProposalDraft {
                    action: ProposedAction::Link { target: best.entity },
                    score,
                    confidence_band: ConfidenceBand::Medium,
                    rationale: format!(
                        "candidate needs confirmation: {} (score: {:.2})",
                        name, score
                    ),
                }
            } else {
                no_match_draft(
                    config,
                    resolved,
                    score,
                    ConfidenceBand::Low,
                    format!("best candidate {} scored too low (score: {:.2})", name, score),
                )
            }
        }
    };

    debug!(
        "Decision for {:?}: {} ({}) - {}",
        query_name,
        draft.action.kind(),
        draft.confidence_band,
        draft.rationale
    );

    LinkProposal {
        query_name: query_name.to_string(),
        resolved_name: resolved.map(str::to_string),
        external_identifier: identifier.map(str::to_string),
        action: draft.action,
        score: draft.score,
        confidence_band: draft.confidence_band,
        rationale: draft.rationale,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::core::{AliasKind, EntityRecord};
    use crate::models::matching::{ActionKind, MatchField, MatchKind};

    fn seven_eleven() -> EntityRecord {
        EntityRecord::new(1, "株式会社セブン-イレブン・ジャパン")
            .with_alias(AliasKind::Short, "セブンイレブン")
            .with_identifier("8011101021428")
    }

    fn candidate(entity: &EntityRecord, score: f64) -> MatchCandidate<'_> {
        MatchCandidate {
            entity,
            score,
            match_kind: MatchKind::from_name_score(score),
            matched_field: MatchField::CanonicalName,
        }
    }

    #[test]
    fn test_unresolved_name_skips() {
        let proposal = decide("Q", None, None, &[], &LinkConfig::default());
        assert_eq!(proposal.action_kind(), ActionKind::Skip);
        assert_eq!(proposal.confidence_band, ConfidenceBand::Unknown);
        assert_eq!(proposal.rationale, "no resolved name");
        assert!(proposal.target_entity().is_none());
    }

    #[test]
    fn test_unresolved_name_skips_even_with_candidates() {
        let entity = seven_eleven();
        let candidates = [candidate(&entity, 0.99)];
        let proposal = decide("Q", Some("  "), None, &candidates, &LinkConfig::default());
        assert_eq!(proposal.action_kind(), ActionKind::Skip);
        assert_eq!(proposal.confidence_band, ConfidenceBand::Unknown);
    }

    #[test]
    fn test_no_candidates_creates_with_low_confidence() {
        let proposal = decide("Q", Some("Resolved Co."), None, &[], &LinkConfig::default());
        assert_eq!(proposal.action_kind(), ActionKind::Create);
        assert_eq!(proposal.confidence_band, ConfidenceBand::Low);
        assert!(proposal.rationale.contains("Resolved Co."));
    }

    #[test]
    fn test_no_candidates_with_identifier_creates_with_medium_confidence() {
        let proposal = decide(
            "Q",
            Some("Resolved Co."),
            Some("1234567890123"),
            &[],
            &LinkConfig::default(),
        );
        assert_eq!(proposal.action_kind(), ActionKind::Create);
        assert_eq!(proposal.confidence_band, ConfidenceBand::Medium);
        assert_eq!(proposal.external_identifier.as_deref(), Some("1234567890123"));
    }

    #[test]
    fn test_no_candidates_skips_when_creation_disabled() {
        let config = LinkConfig::new(0.9, 0.6, false).unwrap();
        let proposal = decide("Q", Some("Resolved Co."), Some("1234567890123"), &[], &config);
        assert_eq!(proposal.action_kind(), ActionKind::Skip);
        assert_eq!(proposal.confidence_band, ConfidenceBand::Low);
    }

    #[test]
    fn test_high_score_links() {
        let entity = seven_eleven();
        let candidates = [candidate(&entity, 0.95)];
        let proposal = decide(
            "セブンイレブン代々木",
            Some("株式会社セブン-イレブン・ジャパン"),
            None,
            &candidates,
            &LinkConfig::default(),
        );
        assert_eq!(proposal.action_kind(), ActionKind::Link);
        assert_eq!(proposal.confidence_band, ConfidenceBand::High);
        assert_eq!(proposal.target_entity().map(|e| e.id), Some(1));
        assert_eq!(proposal.score, 0.95);
        assert!(proposal.rationale.contains("株式会社セブン-イレブン・ジャパン"));
        assert!(proposal.rationale.contains("0.95"));
    }

    #[test]
    fn test_threshold_boundaries() {
        let entity = seven_eleven();
        let config = LinkConfig::default();

        let at_auto = [candidate(&entity, 0.9)];
        let proposal = decide("Q", Some("R"), None, &at_auto, &config);
        assert_eq!(proposal.confidence_band, ConfidenceBand::High);

        let at_suggest = [candidate(&entity, 0.6)];
        let proposal = decide("Q", Some("R"), None, &at_suggest, &config);
        assert_eq!(proposal.action_kind(), ActionKind::Link);
        assert_eq!(proposal.confidence_band, ConfidenceBand::Medium);
    }

    #[test]
    fn test_medium_score_needs_confirmation() {
        let entity = seven_eleven();
        let candidates = [candidate(&entity, 0.75)];
        let proposal = decide("セブン", Some("セブン-イレブン"), None, &candidates, &LinkConfig::default());
        assert_eq!(proposal.action_kind(), ActionKind::Link);
        assert_eq!(proposal.confidence_band, ConfidenceBand::Medium);
        assert!(proposal.rationale.contains("0.75"));
    }

    #[test]
    fn test_low_score_creates_or_skips() {
        let entity = seven_eleven();
        let candidates = [candidate(&entity, 0.4)];

        let proposal = decide("Q", Some("別の会社株式会社"), None, &candidates, &LinkConfig::default());
        assert_eq!(proposal.action_kind(), ActionKind::Create);
        assert_eq!(proposal.confidence_band, ConfidenceBand::Low);
        assert_eq!(proposal.score, 0.4);
        assert!(proposal.rationale.contains("0.40"));
        assert!(proposal.target_entity().is_none());

        let no_create = LinkConfig::new(0.9, 0.6, false).unwrap();
        let proposal = decide("Q", Some("別の会社株式会社"), Some("1234567890123"), &candidates, &no_create);
        assert_eq!(proposal.action_kind(), ActionKind::Skip);
        assert_eq!(proposal.confidence_band, ConfidenceBand::Low);
    }
}
