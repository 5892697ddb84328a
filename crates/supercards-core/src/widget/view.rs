//! Render models handed to surfaces
//!
//! Views are plain data. `Display` gives the terminal rendering used by the
//! `supercards` binary.

use std::fmt;

use chrono::{DateTime, Utc};

use crate::theme::{CardTheme, MISSION_FRONT_IMAGE};
use crate::types::{CardFields, CardKind, CardSnapshot};

/// Bookmark star shown on both faces of a card
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookmarkGlyph {
    Filled,
    Hollow,
}

impl BookmarkGlyph {
    pub fn from_bookmarked(bookmarked: bool) -> Self {
        if bookmarked {
            BookmarkGlyph::Filled
        } else {
            BookmarkGlyph::Hollow
        }
    }

    pub fn as_char(self) -> char {
        match self {
            BookmarkGlyph::Filled => '★',
            BookmarkGlyph::Hollow => '☆',
        }
    }
}

impl fmt::Display for BookmarkGlyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

/// Everything needed to draw one card
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CardView {
    pub id: String,
    pub type_label: &'static str,
    pub name: String,
    pub description: String,
    pub category: Option<String>,
    pub details: Option<String>,
    pub icon: &'static str,
    pub colour_var: Option<&'static str>,
    pub glyph: BookmarkGlyph,
    pub flipped: bool,
}

impl CardView {
    pub fn new(fields: &CardFields, theme: &CardTheme, bookmarked: bool, flipped: bool) -> Self {
        let (name, description, category, details) = match &fields.kind {
            CardKind::Mission { name, description } => {
                (name.clone(), description.clone(), None, None)
            }
            CardKind::Assessment {
                category,
                name,
                description,
                details,
            } => (
                name.clone(),
                description.clone(),
                Some(category.label().to_string()),
                Some(details.clone()),
            ),
            CardKind::Unknown => (String::new(), String::new(), None, None),
        };

        Self {
            id: fields.id.to_string(),
            type_label: fields.kind.type_label(),
            name,
            description,
            category,
            details,
            icon: theme.icon,
            colour_var: theme.colour_var,
            glyph: BookmarkGlyph::from_bookmarked(bookmarked),
            flipped,
        }
    }
}

impl fmt::Display for CardView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let heading = self.category.as_deref().unwrap_or(self.type_label);

        if !self.flipped {
            writeln!(f, "[{}] {} {}", self.id, self.glyph, heading.to_uppercase())?;
            match self.category {
                // assessment fronts show the card name under the category
                Some(_) => write!(f, "    {}", self.name),
                None => write!(f, "    ({})", MISSION_FRONT_IMAGE),
            }
        } else {
            writeln!(f, "[{}] {} {} (back)", self.id, self.glyph, heading.to_uppercase())?;
            writeln!(f, "    {}  <{}>", self.name.to_uppercase(), self.icon)?;
            write!(f, "    {}", self.description)?;
            if let Some(details) = &self.details {
                write!(f, "\n    {}", details)?;
            }
            Ok(())
        }
    }
}

/// One row of the favourites list
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FavouriteEntryView {
    Mission {
        id: String,
        timestamp: DateTime<Utc>,
        name: String,
        description: String,
    },
    Assessment {
        id: String,
        timestamp: DateTime<Utc>,
        category: String,
        name: String,
        description: String,
        details: String,
    },
    /// Placeholder for a stored type this build cannot display
    Unknown { id: String },
}

impl FavouriteEntryView {
    pub fn id(&self) -> &str {
        match self {
            FavouriteEntryView::Mission { id, .. }
            | FavouriteEntryView::Assessment { id, .. }
            | FavouriteEntryView::Unknown { id } => id,
        }
    }
}

impl From<&CardSnapshot> for FavouriteEntryView {
    fn from(snapshot: &CardSnapshot) -> Self {
        let id = snapshot.id.to_string();
        match &snapshot.kind {
            CardKind::Mission { name, description } => FavouriteEntryView::Mission {
                id,
                timestamp: snapshot.timestamp,
                name: name.clone(),
                description: description.clone(),
            },
            CardKind::Assessment {
                category,
                name,
                description,
                details,
            } => FavouriteEntryView::Assessment {
                id,
                timestamp: snapshot.timestamp,
                category: category.label().to_string(),
                name: name.clone(),
                description: description.clone(),
                details: details.clone(),
            },
            CardKind::Unknown => FavouriteEntryView::Unknown { id },
        }
    }
}

fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S UTC").to_string()
}

impl fmt::Display for FavouriteEntryView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FavouriteEntryView::Mission {
                timestamp,
                name,
                description,
                ..
            } => write!(
                f,
                "({}) Type: Mission | Name: {} | Description: {}",
                format_timestamp(timestamp),
                name,
                description
            ),
            FavouriteEntryView::Assessment {
                timestamp,
                category,
                name,
                description,
                details,
                ..
            } => write!(
                f,
                "({}) Category: {} | Name: {} | Description: {} | Details: {}",
                format_timestamp(timestamp),
                category,
                name,
                description,
                details
            ),
            FavouriteEntryView::Unknown { .. } => write!(f, "Unknown card"),
        }
    }
}
