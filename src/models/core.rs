// src/models/core.rs
use serde::{Deserialize, Serialize};

/// Directory-assigned partner id. Stable for the lifetime of one snapshot.
pub type EntityId = i64;

/// Which kind of name an alias carries. Legal names are searched before short names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasKind {
    Legal,
    Short,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Alias {
    pub kind: AliasKind,
    pub value: String,
}

/// One canonical partner entry in the directory snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub id: EntityId,
    pub canonical_name: String,
    #[serde(default)]
    pub aliases: Vec<Alias>,
    #[serde(default)]
    pub external_identifier: Option<String>,
}

impl EntityRecord {
    pub fn new(id: EntityId, canonical_name: impl Into<String>) -> Self {
        Self {
            id,
            canonical_name: canonical_name.into(),
            aliases: Vec::new(),
            external_identifier: None,
        }
    }

    pub fn with_alias(mut self, kind: AliasKind, value: impl Into<String>) -> Self {
        self.aliases.push(Alias {
            kind,
            value: value.into(),
        });
        self
    }

    pub fn with_identifier(mut self, identifier: impl Into<String>) -> Self {
        self.external_identifier = Some(identifier.into());
        self
    }

    /// Name fields in search priority order: canonical name, legal aliases, short aliases.
    /// Blank fields are skipped.
    pub fn name_fields(&self) -> Vec<(NameSource, &str)> {
        let mut fields = Vec::with_capacity(1 + self.aliases.len());
        fields.push((NameSource::Canonical, self.canonical_name.as_str()));
        for kind in [AliasKind::Legal, AliasKind::Short] {
            fields.extend(
                self.aliases
                    .iter()
                    .filter(|alias| alias.kind == kind)
                    .map(|alias| (NameSource::Alias(kind), alias.value.as_str())),
            );
        }
        fields.retain(|(_, value)| !value.trim().is_empty());
        fields
    }

    /// An entity with every name field blank cannot be matched and is excluded from indexing.
    pub fn has_name(&self) -> bool {
        !self.name_fields().is_empty()
    }

    pub fn identifier(&self) -> Option<&str> {
        self.external_identifier
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum NameSource {
    Canonical,
    Alias(AliasKind),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_fields_priority_order() {
        let record = EntityRecord::new(4, "Starbucks Coffee Japan, Ltd.")
            .with_alias(AliasKind::Short, "Starbucks")
            .with_alias(AliasKind::Legal, "Starbucks Coffee Japan Limited")
            .with_alias(AliasKind::Short, "");

        let fields = record.name_fields();
        assert_eq!(fields.len(), 3);
        assert_eq!(fields[0].0, NameSource::Canonical);
        assert_eq!(fields[1], (NameSource::Alias(AliasKind::Legal), "Starbucks Coffee Japan Limited"));
        assert_eq!(fields[2], (NameSource::Alias(AliasKind::Short), "Starbucks"));
    }

    #[test]
    fn test_blank_entity_has_no_name() {
        let record = EntityRecord::new(9, "  ").with_alias(AliasKind::Short, "");
        assert!(!record.has_name());
    }

    #[test]
    fn test_blank_identifier_is_absent() {
        let record = EntityRecord::new(1, "Acme").with_identifier("   ");
        assert_eq!(record.identifier(), None);
    }
}
