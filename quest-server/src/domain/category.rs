//! Quest categories.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown quest category: {0}")]
pub struct InvalidCategory(String);

/// The kind of experience a quest offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QuestCategory {
    HiddenGem,
    Scenic,
    Food,
    History,
    PhotoSpot,
    Weird,
    Nature,
    Culture,
}

impl QuestCategory {
    /// Every category, in display order.
    pub const ALL: [QuestCategory; 8] = [
        QuestCategory::HiddenGem,
        QuestCategory::Scenic,
        QuestCategory::Food,
        QuestCategory::History,
        QuestCategory::PhotoSpot,
        QuestCategory::Weird,
        QuestCategory::Nature,
        QuestCategory::Culture,
    ];

    /// The wire name (`hidden_gem`, `photo_spot`, ...).
    pub fn as_str(&self) -> &'static str {
        match self {
            QuestCategory::HiddenGem => "hidden_gem",
            QuestCategory::Scenic => "scenic",
            QuestCategory::Food => "food",
            QuestCategory::History => "history",
            QuestCategory::PhotoSpot => "photo_spot",
            QuestCategory::Weird => "weird",
            QuestCategory::Nature => "nature",
            QuestCategory::Culture => "culture",
        }
    }

    /// Human readable label.
    pub fn label(&self) -> &'static str {
        match self {
            QuestCategory::HiddenGem => "Hidden Gem",
            QuestCategory::Scenic => "Scenic Detour",
            QuestCategory::Food => "Local Food",
            QuestCategory::History => "History",
            QuestCategory::PhotoSpot => "Photo Spot",
            QuestCategory::Weird => "Weird & Wonderful",
            QuestCategory::Nature => "Nature",
            QuestCategory::Culture => "Culture",
        }
    }

    /// Parse a list of names, silently dropping unknown ones.
    pub fn parse_lenient<S: AsRef<str>>(names: &[S]) -> Vec<QuestCategory> {
        let mut out = Vec::new();
        for name in names {
            if let Ok(cat) = name.as_ref().parse::<QuestCategory>() {
                if !out.contains(&cat) {
                    out.push(cat);
                }
            }
        }
        out
    }
}

impl FromStr for QuestCategory {
    type Err = InvalidCategory;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        QuestCategory::ALL
            .iter()
            .find(|c| c.as_str() == s)
            .copied()
            .ok_or_else(|| InvalidCategory(s.to_string()))
    }
}

impl fmt::Display for QuestCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returns true if `category` passes an interest filter.
///
/// An empty filter accepts everything.
pub fn matches_interests(category: QuestCategory, interests: &[QuestCategory]) -> bool {
    interests.is_empty() || interests.contains(&category)
}
