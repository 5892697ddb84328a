//! Icon and colour lookup for card faces

use crate::types::{AssessmentCategory, CardKind};

/// Fallback icon for missions without a dedicated image
pub const DEFAULT_MISSION_ICON: &str = "assets/images/default_mission.png";

/// Fallback icon for assessments in an unrecognized category
pub const DEFAULT_ASSESSMENT_ICON: &str = "assets/images/default_assessment.png";

/// Artwork on the front of every mission card
pub const MISSION_FRONT_IMAGE: &str = "assets/images/super_assessor.png";

/// Presentation state derived from a card's fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardTheme {
    pub icon: &'static str,
    /// CSS custom property naming the category colour, if the category has one
    pub colour_var: Option<&'static str>,
}

impl CardTheme {
    /// Derive the theme for a card.
    ///
    /// Missions are themed by name, assessments by category.
    pub fn for_kind(kind: &CardKind) -> Self {
        match kind {
            CardKind::Mission { name, .. } => Self {
                icon: mission_icon(name),
                colour_var: None,
            },
            CardKind::Assessment { category, .. } => {
                let colour_var = category_colour(category);
                if colour_var.is_none() {
                    tracing::warn!(category = %category, "No colour for assessment category");
                }
                Self {
                    icon: category_icon(category),
                    colour_var,
                }
            }
            CardKind::Unknown => Self {
                icon: DEFAULT_MISSION_ICON,
                colour_var: None,
            },
        }
    }
}

fn mission_icon(name: &str) -> &'static str {
    match name {
        "Innovation" => "assets/images/innovation.png",
        "Time management" => "assets/images/time_management.png",
        "Learning" => "assets/images/learning.png",
        "Student engagement" => "assets/images/student_engagement.png",
        "Authenticity" => "assets/images/authenticity.png",
        "Cost cutting" => "assets/images/cost_cutting.png",
        "Counteract cheating" => "assets/images/counteract_cheating.png",
        _ => DEFAULT_MISSION_ICON,
    }
}

fn category_icon(category: &AssessmentCategory) -> &'static str {
    match category {
        AssessmentCategory::WhoIsAssessed => "assets/images/who_is_assessed.png",
        AssessmentCategory::TheAssessor => "assets/images/the_assessor.png",
        AssessmentCategory::Artefact => "assets/images/assessment_artefact.png",
        AssessmentCategory::Format => "assets/images/assessment_format.png",
        AssessmentCategory::Context => "assets/images/context.png",
        AssessmentCategory::Timing => "assets/images/assessment_timing.png",
        AssessmentCategory::Other(_) => DEFAULT_ASSESSMENT_ICON,
    }
}

fn category_colour(category: &AssessmentCategory) -> Option<&'static str> {
    match category {
        AssessmentCategory::WhoIsAssessed => Some("--color-who-is-assessed"),
        AssessmentCategory::TheAssessor => Some("--color-the-assessor"),
        AssessmentCategory::Artefact => Some("--color-artefact"),
        AssessmentCategory::Format => Some("--color-format"),
        AssessmentCategory::Context => Some("--color-context"),
        AssessmentCategory::Timing => Some("--color-timing"),
        AssessmentCategory::Other(_) => None,
    }
}
