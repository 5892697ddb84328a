//! Core types for SuperCards

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};

/// Stable identifier of a card, unique within the catalogue
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    /// Create a CardId from anything string-like
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw id
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for CardId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for CardId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Assessment card category
///
/// The six known categories drive colour and icon selection. Anything else is
/// kept verbatim in `Other` so it survives a round trip through storage.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum AssessmentCategory {
    WhoIsAssessed,
    TheAssessor,
    Artefact,
    Format,
    Context,
    Timing,
    Other(String),
}

impl AssessmentCategory {
    /// Known categories in the order a spread deals them
    pub const ALL: [AssessmentCategory; 6] = [
        AssessmentCategory::WhoIsAssessed,
        AssessmentCategory::TheAssessor,
        AssessmentCategory::Artefact,
        AssessmentCategory::Format,
        AssessmentCategory::Context,
        AssessmentCategory::Timing,
    ];

    /// Parse a category label as it appears in the catalogue
    pub fn parse(label: &str) -> Self {
        match label {
            "Who is assessed" => Self::WhoIsAssessed,
            "The assessor" => Self::TheAssessor,
            "Assessment artefact" => Self::Artefact,
            "Assessment format" => Self::Format,
            "Context" => Self::Context,
            "Assessment timing" => Self::Timing,
            other => Self::Other(other.to_string()),
        }
    }

    /// Human-readable label
    pub fn label(&self) -> &str {
        match self {
            Self::WhoIsAssessed => "Who is assessed",
            Self::TheAssessor => "The assessor",
            Self::Artefact => "Assessment artefact",
            Self::Format => "Assessment format",
            Self::Context => "Context",
            Self::Timing => "Assessment timing",
            Self::Other(label) => label,
        }
    }
}

impl From<String> for AssessmentCategory {
    fn from(label: String) -> Self {
        Self::parse(&label)
    }
}

impl Default for AssessmentCategory {
    fn default() -> Self {
        Self::Other(String::new())
    }
}

impl From<AssessmentCategory> for String {
    fn from(category: AssessmentCategory) -> Self {
        category.label().to_string()
    }
}

impl std::fmt::Display for AssessmentCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Type-specific display fields of a card, tagged by `type`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum CardKind {
    #[serde(rename = "mission", alias = "Mission")]
    Mission {
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
        #[serde(default, deserialize_with = "null_as_default")]
        description: String,
    },
    #[serde(rename = "assessment", alias = "Assessment")]
    Assessment {
        #[serde(default, deserialize_with = "null_as_default")]
        category: AssessmentCategory,
        #[serde(default, deserialize_with = "null_as_default")]
        name: String,
        #[serde(default, deserialize_with = "null_as_default")]
        description: String,
        #[serde(default, deserialize_with = "null_as_default")]
        details: String,
    },
    /// Any tag this build does not know how to display
    #[serde(other)]
    Unknown,
}

/// Absent attributes may be stored as `null`
fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

impl CardKind {
    /// Label shown on the card face
    pub fn type_label(&self) -> &'static str {
        match self {
            CardKind::Mission { .. } => "Mission",
            CardKind::Assessment { .. } => "Assessment",
            CardKind::Unknown => "Unknown",
        }
    }

    pub fn name(&self) -> Option<&str> {
        match self {
            CardKind::Mission { name, .. } | CardKind::Assessment { name, .. } => Some(name),
            CardKind::Unknown => None,
        }
    }

    pub fn description(&self) -> Option<&str> {
        match self {
            CardKind::Mission { description, .. } | CardKind::Assessment { description, .. } => {
                Some(description)
            }
            CardKind::Unknown => None,
        }
    }

    pub fn category(&self) -> Option<&AssessmentCategory> {
        match self {
            CardKind::Assessment { category, .. } => Some(category),
            _ => None,
        }
    }
}

/// Display fields of one live card, as handed over by the catalogue
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardFields {
    pub id: CardId,
    pub kind: CardKind,
}

impl CardFields {
    pub fn mission(
        id: impl Into<CardId>,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: CardKind::Mission {
                name: name.into(),
                description: description.into(),
            },
        }
    }

    pub fn assessment(
        id: impl Into<CardId>,
        category: AssessmentCategory,
        name: impl Into<String>,
        description: impl Into<String>,
        details: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            kind: CardKind::Assessment {
                category,
                name: name.into(),
                description: description.into(),
                details: details.into(),
            },
        }
    }

    /// Capture a point-in-time snapshot of these fields
    pub fn snapshot(&self, bookmarked: bool, timestamp: DateTime<Utc>) -> CardSnapshot {
        CardSnapshot {
            id: self.id.clone(),
            kind: self.kind.clone(),
            bookmarked,
            timestamp,
        }
    }

    /// Apply a partial update and report which derived state must be refreshed
    pub fn apply(&mut self, update: CardFieldsUpdate) -> FieldChanges {
        let mut changes = FieldChanges::default();

        if let Some(id) = update.id {
            if id != self.id {
                self.id = id;
                changes.id = true;
            }
        }

        match &mut self.kind {
            CardKind::Mission { name, description } => {
                changes.theme |= replace(name, update.name);
                changes.cosmetic |= replace(description, update.description);
            }
            CardKind::Assessment {
                category,
                name,
                description,
                details,
            } => {
                if let Some(new_category) = update.category {
                    if *category != new_category {
                        *category = new_category;
                        changes.theme = true;
                    }
                }
                changes.cosmetic |= replace(name, update.name);
                changes.cosmetic |= replace(description, update.description);
                changes.cosmetic |= replace(details, update.details);
            }
            CardKind::Unknown => {}
        }

        changes
    }
}

fn replace(slot: &mut String, value: Option<String>) -> bool {
    match value {
        Some(value) if *slot != value => {
            *slot = value;
            true
        }
        _ => false,
    }
}

/// Partial update of a live card's fields
///
/// Fields that do not exist on the card's variant are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CardFieldsUpdate {
    pub id: Option<CardId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<AssessmentCategory>,
    pub details: Option<String>,
}

/// What changed after applying a [`CardFieldsUpdate`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FieldChanges {
    /// The card id changed; bookmark state must be re-read
    pub id: bool,
    /// A theme input (mission name, assessment category) changed
    pub theme: bool,
    /// Some other display field changed
    pub cosmetic: bool,
}

impl FieldChanges {
    pub fn any(&self) -> bool {
        self.id || self.theme || self.cosmetic
    }
}

/// Immutable record of a card captured when it was bookmarked
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardSnapshot {
    pub id: CardId,
    #[serde(flatten)]
    pub kind: CardKind,
    pub bookmarked: bool,
    pub timestamp: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mission_snapshot_json_shape() {
        let ts = DateTime::parse_from_rfc3339("2026-10-19T10:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        let snapshot = CardFields::mission("m1", "Innovation", "Try something new").snapshot(true, ts);

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["id"], "m1");
        assert_eq!(value["type"], "mission");
        assert_eq!(value["name"], "Innovation");
        assert_eq!(value["bookmarked"], true);
        assert_eq!(value["timestamp"], "2026-10-19T10:00:00Z");
    }

    #[test]
    fn test_assessment_category_serializes_as_label() {
        let ts = Utc::now();
        let snapshot = CardFields::assessment(
            "a1",
            AssessmentCategory::Timing,
            "Weekly",
            "Every week",
            "Short quizzes",
        )
        .snapshot(true, ts);

        let value = serde_json::to_value(&snapshot).unwrap();
        assert_eq!(value["type"], "assessment");
        assert_eq!(value["category"], "Assessment timing");
        assert_eq!(value["details"], "Short quizzes");

        let back: CardSnapshot = serde_json::from_value(value).unwrap();
        assert_eq!(back, snapshot);
    }

    #[test]
    fn test_capitalized_mission_tag_is_accepted() {
        let json = r#"{"id":"m2","type":"Mission","name":"Learning","description":"d",
            "bookmarked":true,"timestamp":"2026-01-01T00:00:00Z"}"#;
        let snapshot: CardSnapshot = serde_json::from_str(json).unwrap();
        assert!(matches!(snapshot.kind, CardKind::Mission { .. }));
    }

    #[test]
    fn test_unknown_tag_decodes_to_unknown() {
        let json = r#"{"id":"x1","type":"reflection","prompt":"why?",
            "bookmarked":true,"timestamp":"2026-01-01T00:00:00Z"}"#;
        let snapshot: CardSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.kind, CardKind::Unknown);
        assert_eq!(snapshot.id, CardId::from("x1"));
    }

    #[test]
    fn test_null_attributes_decode_as_empty() {
        let json = r#"{"id":"a2","type":"assessment","category":null,"name":"Viva",
            "description":null,"details":null,"bookmarked":true,"timestamp":"2026-01-01T00:00:00Z"}"#;
        let snapshot: CardSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.kind.category(), Some(&AssessmentCategory::default()));
        assert_eq!(snapshot.kind.name(), Some("Viva"));
        assert_eq!(snapshot.kind.description(), Some(""));
    }

    #[test]
    fn test_unrecognized_category_is_kept() {
        let category = AssessmentCategory::parse("Peer review");
        assert_eq!(category, AssessmentCategory::Other("Peer review".to_string()));
        assert_eq!(category.label(), "Peer review");
    }

    #[test]
    fn test_apply_reports_changes() {
        let mut fields = CardFields::assessment(
            "a1",
            AssessmentCategory::Context,
            "Workplace",
            "d",
            "x",
        );

        let changes = fields.apply(CardFieldsUpdate {
            details: Some("y".to_string()),
            ..Default::default()
        });
        assert_eq!(
            changes,
            FieldChanges {
                id: false,
                theme: false,
                cosmetic: true
            }
        );

        let changes = fields.apply(CardFieldsUpdate {
            category: Some(AssessmentCategory::Format),
            ..Default::default()
        });
        assert!(changes.theme);

        let changes = fields.apply(CardFieldsUpdate {
            id: Some(CardId::from("a1")),
            ..Default::default()
        });
        assert!(!changes.any());

        let changes = fields.apply(CardFieldsUpdate {
            id: Some(CardId::from("a2")),
            ..Default::default()
        });
        assert!(changes.id);
        assert_eq!(fields.id.as_str(), "a2");
    }

    #[test]
    fn test_mission_ignores_assessment_fields() {
        let mut fields = CardFields::mission("m1", "Innovation", "d");
        let changes = fields.apply(CardFieldsUpdate {
            category: Some(AssessmentCategory::Context),
            details: Some("ignored".to_string()),
            ..Default::default()
        });
        assert!(!changes.any());
    }
}
