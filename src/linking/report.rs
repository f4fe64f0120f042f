// src/linking/report.rs - Append-only collection of proposals with summary counts
use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::models::matching::{ActionKind, ConfidenceBand, LinkProposal};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub total: usize,
    pub by_action: BTreeMap<ActionKind, usize>,
    pub by_confidence: BTreeMap<ConfidenceBand, usize>,
}

impl ReportSummary {
    pub fn count_action(&self, action: ActionKind) -> usize {
        self.by_action.get(&action).copied().unwrap_or(0)
    }

    pub fn count_confidence(&self, band: ConfidenceBand) -> usize {
        self.by_confidence.get(&band).copied().unwrap_or(0)
    }
}

/// Proposals for one run, in the order they were produced.
#[derive(Debug, Clone, Serialize)]
pub struct LinkReport<'a> {
    run_id: Uuid,
    generated_at: DateTime<Utc>,
    proposals: Vec<LinkProposal<'a>>,
}

impl<'a> Default for LinkReport<'a> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> LinkReport<'a> {
    pub fn new() -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            proposals: Vec::new(),
        }
    }

    pub fn run_id(&self) -> Uuid {
        self.run_id
    }

    pub fn push(&mut self, proposal: LinkProposal<'a>) {
        self.proposals.push(proposal);
    }

    pub fn proposals(&self) -> &[LinkProposal<'a>] {
        &self.proposals
    }

    pub fn len(&self) -> usize {
        self.proposals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.proposals.is_empty()
    }

    pub fn summary(&self) -> ReportSummary {
        let mut summary = ReportSummary {
            total: self.proposals.len(),
            ..ReportSummary::default()
        };
        for proposal in &self.proposals {
            *summary.by_action.entry(proposal.action_kind()).or_insert(0) += 1;
            *summary
                .by_confidence
                .entry(proposal.confidence_band)
                .or_insert(0) += 1;
        }
        summary
    }

    pub fn log_summary(&self) {
        let summary = self.summary();
        info!("📊 Proposal summary (run ID: {})", self.run_id);
        info!("   Total: {}", summary.total);
        info!("   By action:");
        for (action, count) in &summary.by_action {
            let icon = match action {
                ActionKind::Link => "🔗",
                ActionKind::Create => "➕",
                ActionKind::Skip => "⏭️",
            };
            let pct = if summary.total > 0 {
                *count as f64 / summary.total as f64 * 100.0
            } else {
                0.0
            };
            info!("      {} {}: {} ({:.1}%)", icon, action, count, pct);
        }
        info!("   By confidence:");
        for (band, count) in &summary.by_confidence {
            let icon = match band {
                ConfidenceBand::High => "🟢",
                ConfidenceBand::Medium => "🟡",
                ConfidenceBand::Low => "🔴",
                ConfidenceBand::Unknown => "⚪",
            };
            info!("      {} {}: {}", icon, band, count);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::linking::decision::decide;
    use crate::models::core::EntityRecord;
    use crate::models::matching::{MatchCandidate, MatchField, MatchKind};
    use crate::utils::config::LinkConfig;

    #[test]
    fn test_summary_counts() {
        let entity = EntityRecord::new(1, "Acme");
        let candidates = [MatchCandidate {
            entity: &entity,
            score: 0.97,
            match_kind: MatchKind::NameExact,
            matched_field: MatchField::CanonicalName,
        }];
        let config = LinkConfig::default();

        let mut report = LinkReport::new();
        assert!(report.is_empty());
        report.push(decide("acme shop", Some("Acme"), None, &candidates, &config));
        report.push(decide("unknown", None, None, &[], &config));
        report.push(decide("new co", Some("New Co"), None, &[], &config));
        report.push(decide("new co 2", Some("New Co 2"), Some("1234567890123"), &[], &config));

        let summary = report.summary();
        assert_eq!(summary.total, 4);
        assert_eq!(summary.count_action(ActionKind::Link), 1);
        assert_eq!(summary.count_action(ActionKind::Create), 2);
        assert_eq!(summary.count_action(ActionKind::Skip), 1);
        assert_eq!(summary.count_confidence(ConfidenceBand::High), 1);
        assert_eq!(summary.count_confidence(ConfidenceBand::Medium), 1);
        assert_eq!(summary.count_confidence(ConfidenceBand::Low), 1);
        assert_eq!(summary.count_confidence(ConfidenceBand::Unknown), 1);
        assert_eq!(report.proposals()[0].query_name, "acme shop");
    }

    #[test]
    fn test_report_serializes_proposals() {
        let mut report = LinkReport::new();
        report.push(decide("unknown", None, None, &[], &LinkConfig::default()));
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["proposals"][0]["action"], "skip");
        assert_eq!(json["run_id"], report.run_id().to_string());
    }
}
