//! Change records and result structures for API diffing.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Whether a change can break existing consumers.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    Breaking,
    NonBreaking,
}

/// Type of change detected.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeType {
    Added,
    Removed,
    Modified,
}

/// Kind of API element a change is about.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    Framework,
    Assembly,
    Type,
    Interface,
    GenericParameter,
    Property,
    Method,
    Parameter,
    Field,
    EnumValue,
}

/// A single classified API change.
///
/// Write-once: fields are only readable, and nothing points back at the
/// compared entities.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Change {
    classification: Classification,
    change_type: ChangeType,
    entity_type: EntityType,
    message: String,
}

impl Change {
    pub fn new(
        classification: Classification,
        change_type: ChangeType,
        entity_type: EntityType,
        message: impl Into<String>,
    ) -> Self {
        Self {
            classification,
            change_type,
            entity_type,
            message: message.into(),
        }
    }

    pub fn breaking(
        change_type: ChangeType,
        entity_type: EntityType,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Classification::Breaking, change_type, entity_type, message)
    }

    pub fn non_breaking(
        change_type: ChangeType,
        entity_type: EntityType,
        message: impl Into<String>,
    ) -> Self {
        Self::new(Classification::NonBreaking, change_type, entity_type, message)
    }

    pub fn classification(&self) -> Classification {
        self.classification
    }

    pub fn is_breaking(&self) -> bool {
        self.classification == Classification::Breaking
    }

    pub fn change_type(&self) -> ChangeType {
        self.change_type
    }

    pub fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    /// One-letter tag: `B` for breaking, `N` for non-breaking.
    pub fn marker(&self) -> char {
        if self.is_breaking() {
            'B'
        } else {
            'N'
        }
    }
}

impl fmt::Display for Change {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.marker(), self.message)
    }
}

/// Changes attributed to one top-level type.
///
/// `type_name` is `None` for changes that belong to no type, such as a
/// removed assembly.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct TypeChanges {
    pub type_name: Option<String>,
    pub changes: Vec<Change>,
}

impl TypeChanges {
    pub fn new(type_name: Option<String>, changes: Vec<Change>) -> Self {
        Self { type_name, changes }
    }

    pub fn breaking_count(&self) -> usize {
        self.changes.iter().filter(|c| c.is_breaking()).count()
    }
}

/// Added / removed / modified counters for one entity type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeCounts {
    pub added: u32,
    pub removed: u32,
    pub modified: u32,
}

impl ChangeCounts {
    fn record(&mut self, change_type: ChangeType) {
        match change_type {
            ChangeType::Added => self.added += 1,
            ChangeType::Removed => self.removed += 1,
            ChangeType::Modified => self.modified += 1,
        }
    }

    fn is_empty(&self) -> bool {
        self.added == 0 && self.removed == 0 && self.modified == 0
    }

    fn text(&self) -> String {
        let mut parts = Vec::new();
        if self.added > 0 {
            parts.push(format!("{} added", self.added));
        }
        if self.removed > 0 {
            parts.push(format!("{} removed", self.removed));
        }
        if self.modified > 0 {
            parts.push(format!("{} modified", self.modified));
        }
        parts.join(", ")
    }
}

/// Summary statistics for a diff.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DiffSummary {
    pub assemblies: ChangeCounts,
    pub types: ChangeCounts,
    pub interfaces: ChangeCounts,
    pub methods: ChangeCounts,
    pub properties: ChangeCounts,
    pub fields: ChangeCounts,
    /// Parameters, generic parameters and enum values.
    pub signatures: ChangeCounts,

    pub breaking_changes: u32,
    pub non_breaking_changes: u32,
}

impl DiffSummary {
    /// Increment counters for one change.
    pub fn record(&mut self, change: &Change) {
        let counts = match change.entity_type() {
            EntityType::Framework | EntityType::Assembly => &mut self.assemblies,
            EntityType::Type => &mut self.types,
            EntityType::Interface => &mut self.interfaces,
            EntityType::Method => &mut self.methods,
            EntityType::Property => &mut self.properties,
            EntityType::Field => &mut self.fields,
            EntityType::Parameter | EntityType::GenericParameter | EntityType::EnumValue => {
                &mut self.signatures
            }
        };
        counts.record(change.change_type());

        if change.is_breaking() {
            self.breaking_changes += 1;
        } else {
            self.non_breaking_changes += 1;
        }
    }

    /// Generate human-readable summary string.
    pub fn text(&self) -> String {
        let sections = [
            ("assemblies", &self.assemblies),
            ("types", &self.types),
            ("interfaces", &self.interfaces),
            ("methods", &self.methods),
            ("properties", &self.properties),
            ("fields", &self.fields),
            ("signatures", &self.signatures),
        ];

        let parts: Vec<String> = sections
            .iter()
            .filter(|(_, counts)| !counts.is_empty())
            .map(|(label, counts)| format!("{}: {}", label, counts.text()))
            .collect();

        if parts.is_empty() {
            "No changes".to_string()
        } else {
            parts.join("; ")
        }
    }
}

/// Complete result of comparing two modules.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct DiffResult {
    /// Changes grouped by originating type, in comparison order
    pub type_changes: Vec<TypeChanges>,

    /// Summary statistics
    pub summary: DiffSummary,

    /// Human-readable summary text
    pub summary_text: String,

    /// Duration of diff operation in milliseconds
    pub duration_ms: f64,
}

impl DiffResult {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one type's changes and update the summary.
    pub fn add_type_changes(&mut self, type_changes: TypeChanges) {
        for change in &type_changes.changes {
            self.summary.record(change);
        }
        self.type_changes.push(type_changes);
    }

    /// Finalize the result with timing and summary text.
    pub fn finalize(&mut self, duration_ms: f64) {
        self.duration_ms = duration_ms;
        self.summary_text = self.summary.text();
    }

    /// All changes, flattened in order.
    pub fn changes(&self) -> impl Iterator<Item = &Change> {
        self.type_changes.iter().flat_map(|t| t.changes.iter())
    }

    /// Breaking changes only.
    pub fn breaking_changes(&self) -> impl Iterator<Item = &Change> {
        self.changes().filter(|c| c.is_breaking())
    }

    /// Check if there are any changes.
    pub fn has_changes(&self) -> bool {
        self.changes().next().is_some()
    }

    /// Check if there are breaking changes.
    pub fn has_breaking_changes(&self) -> bool {
        self.breaking_changes().next().is_some()
    }

    /// Get change count.
    pub fn change_count(&self) -> usize {
        self.changes().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_change_display() {
        let change = Change::breaking(ChangeType::Removed, EntityType::Type, "Type removed: Lib.A");
        assert!(change.is_breaking());
        assert_eq!(change.to_string(), "B Type removed: Lib.A");

        let change = Change::non_breaking(ChangeType::Added, EntityType::Type, "Type added: Lib.B");
        assert_eq!(change.classification(), Classification::NonBreaking);
        assert_eq!(change.to_string(), "N Type added: Lib.B");
    }

    #[test]
    fn test_change_serialization() {
        let change = Change::non_breaking(ChangeType::Added, EntityType::Method, "Method added: M");
        let json = serde_json::to_string(&change).unwrap();
        assert!(json.contains("\"classification\":\"non_breaking\""));
        assert!(json.contains("\"entity_type\":\"method\""));
    }

    #[test]
    fn test_diff_summary_record() {
        let mut summary = DiffSummary::default();

        summary.record(&Change::non_breaking(
            ChangeType::Added,
            EntityType::Method,
            "m",
        ));
        assert_eq!(summary.methods.added, 1);

        summary.record(&Change::breaking(ChangeType::Removed, EntityType::Type, "t"));
        assert_eq!(summary.types.removed, 1);
        assert_eq!(summary.breaking_changes, 1);
        assert_eq!(summary.non_breaking_changes, 1);
    }

    #[test]
    fn test_diff_summary_text() {
        let summary = DiffSummary {
            methods: ChangeCounts {
                added: 2,
                ..Default::default()
            },
            types: ChangeCounts {
                modified: 1,
                ..Default::default()
            },
            ..Default::default()
        };

        let text = summary.text();
        assert!(text.contains("methods: 2 added"));
        assert!(text.contains("types: 1 modified"));
    }

    #[test]
    fn test_diff_summary_text_no_changes() {
        let summary = DiffSummary::default();
        assert_eq!(summary.text(), "No changes");
    }

    #[test]
    fn test_diff_result_add_type_changes() {
        let mut result = DiffResult::default();
        result.add_type_changes(TypeChanges::new(Some("Lib.A".to_string()), vec![]));
        assert!(!result.has_changes());

        result.add_type_changes(TypeChanges::new(
            Some("Lib.B".to_string()),
            vec![
                Change::non_breaking(ChangeType::Added, EntityType::Field, "f"),
                Change::breaking(ChangeType::Modified, EntityType::Method, "m"),
            ],
        ));

        assert!(result.has_changes());
        assert!(result.has_breaking_changes());
        assert_eq!(result.change_count(), 2);
        assert_eq!(result.type_changes[1].breaking_count(), 1);
        assert_eq!(result.summary.fields.added, 1);
    }

    #[test]
    fn test_diff_result_finalize() {
        let mut result = DiffResult::default();
        result.summary.methods.added = 1;

        result.finalize(42.5);

        assert_eq!(result.duration_ms, 42.5);
        assert_eq!(result.summary_text, "methods: 1 added");
    }
}
