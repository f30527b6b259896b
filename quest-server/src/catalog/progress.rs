//! Exploration progress over the catalog.

use std::collections::HashSet;

use serde::Serialize;

use super::QuestCatalog;

/// How many quests of a region (or of the whole catalog) are completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ExplorationProgress {
    pub completed: usize,
    pub total: usize,
    /// Rounded to the nearest whole percent.
    pub percentage: u32,
}

impl ExplorationProgress {
    fn from_counts(completed: usize, total: usize) -> Self {
        let percentage = if total > 0 {
            ((completed as f64 / total as f64) * 100.0).round() as u32
        } else {
            0
        };
        Self {
            completed,
            total,
            percentage,
        }
    }
}

/// Progress within a single region. Unknown regions report zero.
pub fn region_progress<S: AsRef<str>>(
    catalog: &QuestCatalog,
    region_id: &str,
    completed_ids: &[S],
) -> ExplorationProgress {
    let Some(region) = catalog.region(region_id) else {
        return ExplorationProgress::from_counts(0, 0);
    };
    let done: HashSet<&str> = completed_ids.iter().map(|s| s.as_ref()).collect();
    let completed = region
        .quests
        .iter()
        .filter(|q| done.contains(q.id.as_str()))
        .count();
    ExplorationProgress::from_counts(completed, region.quests.len())
}

/// Progress across every region.
pub fn overall_progress<S: AsRef<str>>(
    catalog: &QuestCatalog,
    completed_ids: &[S],
) -> ExplorationProgress {
    let done: HashSet<&str> = completed_ids.iter().map(|s| s.as_ref()).collect();
    let completed = catalog
        .quests()
        .filter(|q| done.contains(q.id.as_str()))
        .count();
    ExplorationProgress::from_counts(completed, catalog.len())
}

/// Rank name for a completion percentage.
pub fn progress_label(percentage: u32) -> &'static str {
    match percentage {
        0 => "Undiscovered",
        100.. => "Mastered",
        75..=99 => "Veteran",
        50..=74 => "Explorer",
        25..=49 => "Adventurer",
        _ => "Newcomer",
    }
}
