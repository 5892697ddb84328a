//! Card catalogue loading and dealing
//!
//! The catalogue is two JSON files of flat attribute objects:
//!
//! ```text
//! <dir>/mission.json     [{"card-id": "m1", "card-type": "Mission", "card-name": ..., "card-description": ...}]
//! <dir>/assessment.json  [{"card-id": "a1", "card-type": "assessment", "card-category": ..., "card-details": ..., ...}]
//! ```
//!
//! A deal picks a few random missions plus one random assessment per known
//! category.

use std::path::Path;

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::{CardError, CardResult};
use crate::types::{AssessmentCategory, CardFields, CardId, CardKind};

/// Mission file name inside the catalogue directory
pub const MISSION_FILE: &str = "mission.json";

/// Assessment file name inside the catalogue directory
pub const ASSESSMENT_FILE: &str = "assessment.json";

/// Missions per deal unless configured otherwise
pub const DEFAULT_MISSION_COUNT: usize = 3;

/// One catalogue entry as stored on disk
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CardAttributes {
    #[serde(rename = "card-id")]
    pub id: String,
    #[serde(rename = "card-type", default)]
    pub card_type: Option<String>,
    #[serde(rename = "card-name", default)]
    pub name: Option<String>,
    #[serde(rename = "card-description", default)]
    pub description: Option<String>,
    #[serde(rename = "card-category", default)]
    pub category: Option<String>,
    #[serde(rename = "card-details", default)]
    pub details: Option<String>,
}

/// Which file an entry came from; decides the variant when `card-type` is absent
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Deck {
    Missions,
    Assessments,
}

impl CardAttributes {
    fn into_fields(self, deck: Deck) -> CardFields {
        let tag = match self.card_type.as_deref() {
            Some(tag) => tag.to_ascii_lowercase(),
            None if deck == Deck::Missions => "mission".to_string(),
            None => "assessment".to_string(),
        };

        let name = self.name.unwrap_or_default();
        let description = self.description.unwrap_or_default();
        let kind = match tag.as_str() {
            "mission" => CardKind::Mission { name, description },
            "assessment" => CardKind::Assessment {
                category: AssessmentCategory::parse(self.category.as_deref().unwrap_or_default()),
                name,
                description,
                details: self.details.unwrap_or_default(),
            },
            _ => CardKind::Unknown,
        };

        CardFields {
            id: CardId::new(self.id),
            kind,
        }
    }
}

/// Cards dealt by one randomize action
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Spread {
    pub missions: Vec<CardFields>,
    pub assessments: Vec<CardFields>,
}

impl Spread {
    /// All cards, missions first
    pub fn cards(&self) -> impl Iterator<Item = &CardFields> {
        self.missions.iter().chain(self.assessments.iter())
    }

    pub fn len(&self) -> usize {
        self.missions.len() + self.assessments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Every card available for dealing
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalogue {
    missions: Vec<CardFields>,
    assessments: Vec<CardFields>,
}

impl Catalogue {
    pub fn new(missions: Vec<CardFields>, assessments: Vec<CardFields>) -> Self {
        Self {
            missions,
            assessments,
        }
    }

    /// Load `mission.json` and `assessment.json` from `dir`
    pub async fn load(dir: impl AsRef<Path>) -> CardResult<Self> {
        let dir = dir.as_ref();
        let missions = read_file(&dir.join(MISSION_FILE)).await?;
        let assessments = read_file(&dir.join(ASSESSMENT_FILE)).await?;

        let catalogue = Self::from_json(&missions, &assessments)?;
        info!(
            dir = %dir.display(),
            missions = catalogue.missions.len(),
            assessments = catalogue.assessments.len(),
            "Loaded card catalogue"
        );
        Ok(catalogue)
    }

    /// Parse both catalogue files from strings
    pub fn from_json(missions: &str, assessments: &str) -> CardResult<Self> {
        Ok(Self {
            missions: parse_deck(missions, Deck::Missions)?,
            assessments: parse_deck(assessments, Deck::Assessments)?,
        })
    }

    pub fn missions(&self) -> &[CardFields] {
        &self.missions
    }

    pub fn assessments(&self) -> &[CardFields] {
        &self.assessments
    }

    pub fn len(&self) -> usize {
        self.missions.len() + self.assessments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Look a card up by id across both decks
    pub fn find(&self, id: &CardId) -> Option<&CardFields> {
        self.missions
            .iter()
            .chain(self.assessments.iter())
            .find(|card| &card.id == id)
    }

    /// Deal `mission_count` distinct random missions and one random
    /// assessment per known category, in category order.
    ///
    /// Categories without cards are skipped, so an empty catalogue deals an
    /// empty spread.
    pub fn deal<R: Rng + ?Sized>(&self, rng: &mut R, mission_count: usize) -> Spread {
        let mut missions = self.missions.clone();
        missions.shuffle(rng);
        missions.truncate(mission_count);

        let mut assessments = Vec::new();
        for category in AssessmentCategory::ALL {
            let mut candidates: Vec<&CardFields> = self
                .assessments
                .iter()
                .filter(|card| card.kind.category() == Some(&category))
                .collect();
            candidates.shuffle(rng);
            match candidates.first() {
                Some(card) => assessments.push((*card).clone()),
                None => debug!(category = %category, "No assessment cards in category"),
            }
        }

        Spread {
            missions,
            assessments,
        }
    }
}

async fn read_file(path: &Path) -> CardResult<String> {
    tokio::fs::read_to_string(path)
        .await
        .map_err(|e| CardError::Catalogue(format!("{}: {}", path.display(), e)))
}

fn parse_deck(json: &str, deck: Deck) -> CardResult<Vec<CardFields>> {
    let entries: Vec<CardAttributes> = serde_json::from_str(json)
        .map_err(|e| CardError::Catalogue(format!("{:?} deck is not valid JSON: {}", deck, e)))?;
    Ok(entries
        .into_iter()
        .map(|entry| entry.into_fields(deck))
        .collect())
}
