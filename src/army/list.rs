//! The army list engine: owns the entries for one faction.

use super::{
    compute_ship_cost, is_complete, is_squadron_size, sorted_join, ArmyListEntry, ProwSelection,
    Slot,
};
use crate::catalog::{Faction, ShipCatalogEntry};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ArmyError {
    #[error("list index {index} out of range (list has {len} entries)")]
    IndexOutOfRange { index: usize, len: usize },
}

/// Insertion-ordered entries for the selected faction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ArmyList {
    faction: String,
    entries: Vec<ArmyListEntry>,
}

impl ArmyList {
    pub fn new(faction: impl Into<String>) -> Self {
        Self {
            faction: faction.into(),
            entries: Vec::new(),
        }
    }

    /// Rebuild a list from restored entries. Callers validate against the catalog first.
    pub fn from_entries(faction: impl Into<String>, entries: Vec<ArmyListEntry>) -> Self {
        Self {
            faction: faction.into(),
            entries,
        }
    }

    pub fn faction(&self) -> &str {
        &self.faction
    }

    pub fn entries(&self) -> &[ArmyListEntry] {
        &self.entries
    }

    pub fn get(&self, index: usize) -> Option<&ArmyListEntry> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Append one ship. Cost is fixed here and never recomputed.
    pub fn add_ship(&mut self, name: &str, catalog_entry: &ShipCatalogEntry) -> &ArmyListEntry {
        let squadron = is_squadron_size(&catalog_entry.size);
        let points = compute_ship_cost(catalog_entry.points, &catalog_entry.size);
        let prow_weapon = if squadron {
            ProwSelection::Multi(Vec::new())
        } else {
            ProwSelection::Single(String::new())
        };
        self.entries.push(ArmyListEntry {
            name: name.to_string(),
            count: 1,
            points,
            prow_weapon,
            hull_weapons: Vec::new(),
            is_squadron: Some(squadron),
        });
        tracing::debug!("added {} ({} pts) to {} list", name, points, self.faction);
        &self.entries[self.entries.len() - 1]
    }

    pub fn remove_ship(&mut self, index: usize) -> Result<ArmyListEntry, ArmyError> {
        self.check_index(index)?;
        let removed = self.entries.remove(index);
        tracing::debug!("removed {} at index {}", removed.name, index);
        Ok(removed)
    }

    /// Replace both weapon selections of one entry. Points are untouched.
    pub fn update_weapons(
        &mut self,
        index: usize,
        prow_weapon: ProwSelection,
        hull_weapons: Vec<Slot>,
    ) -> Result<(), ArmyError> {
        self.check_index(index)?;
        let entry = &mut self.entries[index];
        entry.prow_weapon = prow_weapon;
        entry.hull_weapons = hull_weapons;
        Ok(())
    }

    /// Drop every entry and key the list to `new_faction`. No partial retention.
    pub fn switch_faction(&mut self, new_faction: &str) {
        if !self.entries.is_empty() {
            tracing::debug!(
                "clearing {} entries on switch from {} to {}",
                self.entries.len(),
                self.faction,
                new_faction
            );
        }
        self.faction = new_faction.to_string();
        self.entries.clear();
    }

    /// Sum of entry points, saturating at the `i64` bounds.
    pub fn total_points(&self) -> i64 {
        self.entries
            .iter()
            .fold(0i64, |acc, e| acc.saturating_add(e.points))
    }

    /// Two complete, non-squadron entries of the same ship with the same
    /// loadout (order-insensitive).
    pub fn has_duplicate_ships(&self, faction: &Faction) -> bool {
        self.first_duplicate_pair(faction).is_some()
    }

    /// First duplicate pair `(i, j)` with `i < j`, scanning in storage order.
    pub fn first_duplicate_pair(&self, faction: &Faction) -> Option<(usize, usize)> {
        let complete: Vec<bool> = self
            .entries
            .iter()
            .map(|e| entry_complete(e, faction))
            .collect();
        for i in 0..self.entries.len() {
            for j in (i + 1)..self.entries.len() {
                let (a, b) = (&self.entries[i], &self.entries[j]);
                if a.squadron() || b.squadron() {
                    continue;
                }
                if !complete[i] || !complete[j] {
                    continue;
                }
                if a.name == b.name
                    && a.prow_weapon.normalized() == b.prow_weapon.normalized()
                    && sorted_join(&a.hull_weapons) == sorted_join(&b.hull_weapons)
                {
                    return Some((i, j));
                }
            }
        }
        None
    }

    pub fn has_incomplete_weapon_selections(&self, faction: &Faction) -> bool {
        !self.entries.is_empty() && self.entries.iter().any(|e| !entry_complete(e, faction))
    }

    /// Indices of entries with unfilled weapon slots.
    pub fn incomplete_indices(&self, faction: &Faction) -> Vec<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| !entry_complete(e, faction))
            .map(|(i, _)| i)
            .collect()
    }

    /// Display order: points descending, ties in insertion order. Each entry is
    /// paired with its storage index for follow-up edits.
    pub fn sorted_by_points(&self) -> Vec<(usize, &ArmyListEntry)> {
        let mut view: Vec<(usize, &ArmyListEntry)> = self.entries.iter().enumerate().collect();
        view.sort_by(|a, b| b.1.points.cmp(&a.1.points));
        view
    }

    fn check_index(&self, index: usize) -> Result<(), ArmyError> {
        if index >= self.entries.len() {
            return Err(ArmyError::IndexOutOfRange {
                index,
                len: self.entries.len(),
            });
        }
        Ok(())
    }
}

// A ship missing from the faction cannot be checked and counts as incomplete.
fn entry_complete(entry: &ArmyListEntry, faction: &Faction) -> bool {
    faction
        .ship(&entry.name)
        .map(|ship| is_complete(entry, ship))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::loyalists_catalog;

    fn loyalists() -> (crate::catalog::Catalog, ArmyList) {
        (loyalists_catalog(), ArmyList::new("Loyalists"))
    }

    fn arm(list: &mut ArmyList, index: usize, prow: &str, hull: &[&str]) {
        list.update_weapons(
            index,
            ProwSelection::Single(prow.to_string()),
            hull.iter().map(|h| Some(h.to_string())).collect(),
        )
        .unwrap();
    }

    #[test]
    fn running_totals_and_faction_switch() {
        let (catalog, mut list) = loyalists();
        let faction = catalog.faction("Loyalists").unwrap();
        list.add_ship("Galleon", faction.ship("Galleon").unwrap());
        assert_eq!(list.total_points(), 9);
        let added = list.add_ship("Squadron Ship", faction.ship("Squadron Ship").unwrap());
        assert_eq!(added.points, 12);
        assert_eq!(added.prow_weapon, ProwSelection::Multi(vec![]));
        assert_eq!(added.is_squadron, Some(true));
        assert_eq!(list.total_points(), 21);

        list.switch_faction("Raiders");
        assert_eq!(list.total_points(), 0);
        assert!(list.is_empty());
        assert_eq!(list.faction(), "Raiders");
    }

    #[test]
    fn total_saturates_instead_of_overflowing() {
        let (catalog, _) = loyalists();
        let mut big = catalog.ship("Loyalists", "Galleon").unwrap().clone();
        big.points = i64::MAX;
        let mut list = ArmyList::new("Loyalists");
        list.add_ship("Galleon", &big);
        list.add_ship("Galleon", catalog.ship("Loyalists", "Galleon").unwrap());
        assert_eq!(list.total_points(), i64::MAX);
    }

    #[test]
    fn add_initializes_single_prow_for_regular_ships() {
        let (catalog, mut list) = loyalists();
        let entry = list.add_ship("Galleon", catalog.ship("Loyalists", "Galleon").unwrap());
        assert_eq!(entry.count, 1);
        assert_eq!(entry.prow_weapon, ProwSelection::Single(String::new()));
        assert!(entry.hull_weapons.is_empty());
        assert_eq!(entry.is_squadron, Some(false));
    }

    #[test]
    fn remove_and_update_are_bounds_checked() {
        let (catalog, mut list) = loyalists();
        list.add_ship("Frigate", catalog.ship("Loyalists", "Frigate").unwrap());
        assert_eq!(
            list.remove_ship(3),
            Err(ArmyError::IndexOutOfRange { index: 3, len: 1 })
        );
        assert!(list
            .update_weapons(1, ProwSelection::default(), vec![])
            .is_err());
        let removed = list.remove_ship(0).unwrap();
        assert_eq!(removed.name, "Frigate");
        assert!(list.is_empty());
    }

    #[test]
    fn update_weapons_keeps_points() {
        let (catalog, mut list) = loyalists();
        list.add_ship("Galleon", catalog.ship("Loyalists", "Galleon").unwrap());
        arm(&mut list, 0, "Lance", &["Torpedo", "Missile"]);
        assert_eq!(list.entries()[0].points, 9);
        assert_eq!(list.entries()[0].prow_weapon.normalized(), "Lance");
    }

    #[test]
    fn duplicates_need_identical_complete_loadouts() {
        let (catalog, mut list) = loyalists();
        let faction = catalog.faction("Loyalists").unwrap();
        let galleon = faction.ship("Galleon").unwrap();
        list.add_ship("Galleon", galleon);
        list.add_ship("Galleon", galleon);
        // both incomplete: skipped
        assert!(!list.has_duplicate_ships(faction));

        arm(&mut list, 0, "Lance", &["Torpedo", "Missile"]);
        arm(&mut list, 1, "Lance", &["Missile", "Torpedo"]);
        assert!(list.has_duplicate_ships(faction));
        assert_eq!(list.first_duplicate_pair(faction), Some((0, 1)));

        arm(&mut list, 1, "Lance", &["Torpedo", "Torpedo"]);
        assert!(!list.has_duplicate_ships(faction));
    }

    #[test]
    fn squadrons_are_never_duplicates() {
        let (catalog, mut list) = loyalists();
        let faction = catalog.faction("Loyalists").unwrap();
        let squadron = faction.ship("Squadron Ship").unwrap();
        for i in 0..2 {
            list.add_ship("Squadron Ship", squadron);
            list.update_weapons(
                i,
                ProwSelection::Multi(vec![]),
                vec![Some("Torpedo".into()); 3],
            )
            .unwrap();
        }
        assert!(!list.has_incomplete_weapon_selections(faction));
        assert!(!list.has_duplicate_ships(faction));
    }

    #[test]
    fn incomplete_detection() {
        let (catalog, mut list) = loyalists();
        let faction = catalog.faction("Loyalists").unwrap();
        assert!(!list.has_incomplete_weapon_selections(faction));
        list.add_ship("Frigate", faction.ship("Frigate").unwrap());
        assert!(!list.has_incomplete_weapon_selections(faction));
        list.add_ship("Galleon", faction.ship("Galleon").unwrap());
        assert!(list.has_incomplete_weapon_selections(faction));
        assert_eq!(list.incomplete_indices(faction), vec![1]);
        arm(&mut list, 1, "Lance", &["Torpedo", "Missile"]);
        assert!(!list.has_incomplete_weapon_selections(faction));
    }

    #[test]
    fn unknown_ship_counts_as_incomplete() {
        let catalog = loyalists_catalog();
        let faction = catalog.faction("Loyalists").unwrap();
        let list = ArmyList::from_entries(
            "Loyalists",
            vec![ArmyListEntry {
                name: "Ghost".into(),
                count: 1,
                points: 1,
                prow_weapon: ProwSelection::default(),
                hull_weapons: vec![],
                is_squadron: None,
            }],
        );
        assert!(list.has_incomplete_weapon_selections(faction));
    }

    #[test]
    fn sorted_view_is_stable_and_descending() {
        let (catalog, mut list) = loyalists();
        let faction = catalog.faction("Loyalists").unwrap();
        list.add_ship("Frigate", faction.ship("Frigate").unwrap());
        list.add_ship("Galleon", faction.ship("Galleon").unwrap());
        list.add_ship("Squadron Ship", faction.ship("Squadron Ship").unwrap());
        list.add_ship("Galleon", faction.ship("Galleon").unwrap());
        let order: Vec<usize> = list.sorted_by_points().iter().map(|(i, _)| *i).collect();
        assert_eq!(order, vec![2, 1, 3, 0]);
        // storage order is untouched
        assert_eq!(list.entries()[0].name, "Frigate");
    }
}
