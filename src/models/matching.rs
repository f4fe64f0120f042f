// src/models/matching.rs
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::core::{AliasKind, EntityRecord, NameSource};

/// How a candidate was found. Name kinds are derived from score bands, not from `min_score`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchKind {
    IdentifierExact,
    NameExact,
    NamePartial,
    NameSimilar,
}

impl MatchKind {
    pub const EXACT_BAND: f64 = 0.95;
    pub const PARTIAL_BAND: f64 = 0.7;

    pub fn from_name_score(score: f64) -> Self {
        if score >= Self::EXACT_BAND {
            MatchKind::NameExact
        } else if score >= Self::PARTIAL_BAND {
            MatchKind::NamePartial
        } else {
            MatchKind::NameSimilar
        }
    }
}

/// The field that produced a candidate's winning score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchField {
    ExternalIdentifier,
    CanonicalName,
    LegalName,
    ShortName,
}

impl From<NameSource> for MatchField {
    fn from(source: NameSource) -> Self {
        match source {
            NameSource::Canonical => MatchField::CanonicalName,
            NameSource::Alias(AliasKind::Legal) => MatchField::LegalName,
            NameSource::Alias(AliasKind::Short) => MatchField::ShortName,
        }
    }
}

/// A directory entity scored against one query. Borrows from the snapshot it was ranked in.
#[derive(Debug, Clone, Serialize)]
pub struct MatchCandidate<'a> {
    pub entity: &'a EntityRecord,
    pub score: f64,
    pub match_kind: MatchKind,
    pub matched_field: MatchField,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConfidenceBand {
    High,
    Medium,
    Low,
    Unknown,
}

impl ConfidenceBand {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConfidenceBand::High => "high",
            ConfidenceBand::Medium => "medium",
            ConfidenceBand::Low => "low",
            ConfidenceBand::Unknown => "unknown",
        }
    }

    /// Lenient parse for labels coming from resolution adapters; unrecognized labels are unknown.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(ConfidenceBand::Unknown)
    }
}

impl fmt::Display for ConfidenceBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ConfidenceBand {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(ConfidenceBand::High),
            "medium" => Ok(ConfidenceBand::Medium),
            "low" => Ok(ConfidenceBand::Low),
            "unknown" => Ok(ConfidenceBand::Unknown),
            other => Err(format!("unrecognized confidence label '{}'", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ActionKind {
    Link,
    Create,
    Skip,
}

impl ActionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Link => "link",
            ActionKind::Create => "create",
            ActionKind::Skip => "skip",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The proposed action. Only `Link` carries a target entity.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ProposedAction<'a> {
    Link { target: &'a EntityRecord },
    Create,
    Skip,
}

impl<'a> ProposedAction<'a> {
    pub fn kind(&self) -> ActionKind {
        match self {
            ProposedAction::Link { .. } => ActionKind::Link,
            ProposedAction::Create => ActionKind::Create,
            ProposedAction::Skip => ActionKind::Skip,
        }
    }
}

/// Decision output for one query. Immutable once produced; reports only collect them.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LinkProposal<'a> {
    pub query_name: String,
    pub resolved_name: Option<String>,
    pub external_identifier: Option<String>,
    #[serde(flatten)]
    pub action: ProposedAction<'a>,
    pub score: f64,
    pub confidence_band: ConfidenceBand,
    pub rationale: String,
}

impl<'a> LinkProposal<'a> {
    pub fn action_kind(&self) -> ActionKind {
        self.action.kind()
    }

    pub fn target_entity(&self) -> Option<&'a EntityRecord> {
        match self.action {
            ProposedAction::Link { target } => Some(target),
            _ => None,
        }
    }
}

/// What a name-resolution adapter determined for one raw transaction name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Resolution {
    pub original_name: String,
    pub resolved_name: Option<String>,
    pub confidence: ConfidenceBand,
    #[serde(default)]
    pub reasoning: String,
    #[serde(default)]
    pub is_individual: bool,
    #[serde(default)]
    pub notes: String,
}

impl Resolution {
    pub fn resolved(
        original_name: impl Into<String>,
        resolved_name: impl Into<String>,
        confidence: ConfidenceBand,
    ) -> Self {
        Self {
            original_name: original_name.into(),
            resolved_name: Some(resolved_name.into()),
            confidence,
            reasoning: String::new(),
            is_individual: false,
            notes: String::new(),
        }
    }

    pub fn unresolved(original_name: impl Into<String>, reasoning: impl Into<String>) -> Self {
        Self {
            original_name: original_name.into(),
            resolved_name: None,
            confidence: ConfidenceBand::Unknown,
            reasoning: reasoning.into(),
            is_individual: false,
            notes: String::new(),
        }
    }

    /// Resolved name with surrounding whitespace removed; blank names count as unresolved.
    pub fn resolved_name(&self) -> Option<&str> {
        self.resolved_name
            .as_deref()
            .map(str::trim)
            .filter(|name| !name.is_empty())
    }
}

/// One transaction-side name to reconcile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueryInput {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub external_identifier: Option<String>,
}

impl QueryInput {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: None,
            name: name.into(),
            external_identifier: None,
        }
    }
}
