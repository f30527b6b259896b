//! Points of interest and matched quests.

use serde::{Deserialize, Serialize};

use super::{GeoPoint, QuestCategory};

/// A point of interest that can be offered as a side quest.
///
/// Catalog entries carry stable ids. AI-discovered entries get a generated
/// id unless they coincide with a catalog entry, in which case they take
/// over the catalog id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PointOfInterest {
    pub id: String,
    pub title: String,
    pub description: String,
    pub category: QuestCategory,
    pub location: GeoPoint,
    pub reward_points: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
}

impl PointOfInterest {
    pub fn new(
        id: impl Into<String>,
        title: impl Into<String>,
        category: QuestCategory,
        location: GeoPoint,
        reward_points: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            description: String::new(),
            category,
            location,
            reward_points,
            address: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// A point of interest annotated with its estimated detour from a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchedQuest {
    #[serde(flatten)]
    pub poi: PointOfInterest,
    pub detour_minutes: u32,
}

impl MatchedQuest {
    pub fn new(poi: PointOfInterest, detour_minutes: u32) -> Self {
        Self {
            poi,
            detour_minutes,
        }
    }

    pub fn id(&self) -> &str {
        &self.poi.id
    }

    pub fn location(&self) -> GeoPoint {
        self.poi.location
    }
}
