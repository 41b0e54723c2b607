//! Validation against the catalog: faction membership, stale entries, list issues.

mod issue;

pub use issue::{IssueSeverity, ListIssue};

use crate::army::{ArmyList, ArmyListEntry};
use crate::catalog::Catalog;

pub fn is_valid_faction(name: &str, catalog: &Catalog) -> bool {
    catalog.contains_faction(name)
}

/// Keep only entries whose ship exists in `catalog[faction]`. An unknown
/// faction keeps nothing. Used when restoring a list from a URL.
pub fn validate_army_list(
    entries: Vec<ArmyListEntry>,
    faction: &str,
    catalog: &Catalog,
) -> Vec<ArmyListEntry> {
    let Some(f) = catalog.faction(faction) else {
        if !entries.is_empty() {
            tracing::warn!(
                "discarding {} restored entr(ies): unknown faction {:?}",
                entries.len(),
                faction
            );
        }
        return Vec::new();
    };
    entries
        .into_iter()
        .filter(|entry| {
            let known = f.ships.contains_key(&entry.name);
            if !known {
                tracing::warn!(
                    "dropping restored ship {:?}: not in {} catalog",
                    entry.name,
                    faction
                );
            }
            known
        })
        .collect()
}

/// Duplicate and incomplete-loadout issues for the list, in that order.
pub fn list_issues(list: &ArmyList, catalog: &Catalog) -> Vec<ListIssue> {
    let Some(faction) = catalog.faction(list.faction()) else {
        return Vec::new();
    };
    let mut issues = Vec::new();
    if let Some((i, j)) = list.first_duplicate_pair(faction) {
        issues.push(ListIssue::duplicate_ships(&list.entries()[i].name, i, j));
    }
    if list.has_incomplete_weapon_selections(faction) {
        issues.push(ListIssue::incomplete_weapons(list.incomplete_indices(faction)));
    }
    issues
}
