//! List issues: severity, summary, affected entries.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum IssueSeverity {
    Info,
    Warn,
}

impl IssueSeverity {
    pub fn as_str(&self) -> &'static str {
        match self {
            IssueSeverity::Info => "info",
            IssueSeverity::Warn => "warn",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListIssue {
    pub code: String,
    pub severity: IssueSeverity,
    /// Short message shown next to the list.
    pub summary: String,
    /// Storage indices of the entries involved.
    pub entry_indices: Vec<usize>,
}

impl ListIssue {
    pub const DUPLICATE_SHIPS: &'static str = "DUPLICATE_SHIPS";
    pub const INCOMPLETE_WEAPONS: &'static str = "INCOMPLETE_WEAPONS";

    pub fn duplicate_ships(ship: &str, first: usize, second: usize) -> Self {
        Self {
            code: Self::DUPLICATE_SHIPS.to_string(),
            severity: IssueSeverity::Warn,
            summary: format!(
                "Two {} entries carry the same weapon loadout.",
                ship
            ),
            entry_indices: vec![first, second],
        }
    }

    pub fn incomplete_weapons(indices: Vec<usize>) -> Self {
        Self {
            code: Self::INCOMPLETE_WEAPONS.to_string(),
            severity: IssueSeverity::Warn,
            summary: format!(
                "{} ship(s) still have unselected weapon slots.",
                indices.len()
            ),
            entry_indices: indices,
        }
    }
}
