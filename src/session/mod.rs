//! Builder session: one owned state object tying the catalog, the list engine
//! and the location together.
//!
//! Every list mutation schedules a debounced location write; a faction change
//! writes immediately and drops whatever write was pending. Callers drive the
//! debounce with [`BuilderSession::tick`] or force it with
//! [`BuilderSession::flush`].

use crate::army::{
    format_selection, format_slots, is_complete, points_breakdown, ArmyError, ArmyList,
    ArmyListEntry, ProwSelection, Slot,
};
use crate::catalog::{Catalog, Faction, ShipCatalogEntry};
use crate::codec::{deserialize, update_location, Debouncer, Location, ARMY_PARAM, FACTION_PARAM};
use crate::validate::{is_valid_faction, list_issues, validate_army_list, ListIssue};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("unknown faction: {0}")]
    UnknownFaction(String),
    #[error("no faction selected")]
    NoFactionSelected,
    #[error("ship {ship:?} is not in the {faction} roster")]
    UnknownShip { faction: String, ship: String },
    #[error(transparent)]
    Army(#[from] ArmyError),
}

/// Snapshot of the state a deferred location write will apply.
#[derive(Debug, Clone, PartialEq, Eq)]
struct PendingWrite {
    faction: String,
    entries: Vec<ArmyListEntry>,
}

pub struct BuilderSession {
    catalog: Arc<Catalog>,
    list: ArmyList,
    location: Location,
    debouncer: Debouncer<PendingWrite>,
}

impl BuilderSession {
    /// Fresh session: no faction selected, empty list.
    pub fn new(catalog: Arc<Catalog>, location: Location, debounce: Duration) -> Self {
        Self {
            catalog,
            list: ArmyList::default(),
            location,
            debouncer: Debouncer::new(debounce),
        }
    }

    /// Rebuild state from the `faction` and `army` parameters of `location`.
    /// An unknown faction leaves the defaults; the list is only restored for a
    /// known faction, and ships missing from its roster are dropped.
    pub fn restore(catalog: Arc<Catalog>, location: Location, debounce: Duration) -> Self {
        let mut session = Self::new(catalog, location, debounce);
        let Some(faction) = session.location.query_param(FACTION_PARAM) else {
            return session;
        };
        if !is_valid_faction(&faction, &session.catalog) {
            tracing::debug!("ignoring unknown faction parameter {:?}", faction);
            return session;
        }
        let entries = session
            .location
            .query_param(ARMY_PARAM)
            .map(|raw| validate_army_list(deserialize(&raw), &faction, &session.catalog))
            .unwrap_or_default();
        tracing::info!(
            "restored {} with {} ship(s)",
            faction,
            entries.len()
        );
        session.list = ArmyList::from_entries(faction, entries);
        session
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn list(&self) -> &ArmyList {
        &self.list
    }

    pub fn location(&self) -> &Location {
        &self.location
    }

    /// Selected faction name; empty when none is selected.
    pub fn faction_name(&self) -> &str {
        self.list.faction()
    }

    pub fn selected_faction(&self) -> Option<&Faction> {
        self.catalog.faction(self.list.faction())
    }

    /// Switch faction, clearing the list. An empty name deselects. The
    /// location is written immediately.
    pub fn select_faction(&mut self, name: &str) -> Result<(), SessionError> {
        if !name.is_empty() && !is_valid_faction(name, &self.catalog) {
            return Err(SessionError::UnknownFaction(name.to_string()));
        }
        self.list.switch_faction(name);
        self.debouncer.cancel();
        update_location(&mut self.location, name, &[]);
        Ok(())
    }

    /// Add one ship from the selected faction's roster. Success means any
    /// add-ship picker can close.
    pub fn add_ship(&mut self, name: &str, now: Instant) -> Result<ArmyListEntry, SessionError> {
        let catalog = Arc::clone(&self.catalog);
        let ship = self.roster_ship(&catalog, name)?;
        let entry = self.list.add_ship(name, ship).clone();
        self.schedule_write(now);
        Ok(entry)
    }

    pub fn remove_ship(&mut self, index: usize, now: Instant) -> Result<ArmyListEntry, SessionError> {
        let removed = self.list.remove_ship(index).map_err(|e| {
            tracing::warn!("remove rejected: {}", e);
            e
        })?;
        self.schedule_write(now);
        Ok(removed)
    }

    pub fn update_weapons(
        &mut self,
        index: usize,
        prow_weapon: ProwSelection,
        hull_weapons: Vec<Slot>,
        now: Instant,
    ) -> Result<(), SessionError> {
        self.list
            .update_weapons(index, prow_weapon, hull_weapons)
            .map_err(|e| {
                tracing::warn!("weapon update rejected: {}", e);
                e
            })?;
        self.schedule_write(now);
        Ok(())
    }

    /// Apply the pending location write if its quiet period has passed.
    pub fn tick(&mut self, now: Instant) -> bool {
        match self.debouncer.poll(now) {
            Some(write) => {
                self.apply(write);
                true
            }
            None => false,
        }
    }

    /// Apply the pending location write now.
    pub fn flush(&mut self) -> bool {
        match self.debouncer.flush() {
            Some(write) => {
                self.apply(write);
                true
            }
            None => false,
        }
    }

    /// Drop the pending location write.
    pub fn cancel_pending_write(&mut self) {
        self.debouncer.cancel();
    }

    pub fn has_pending_write(&self) -> bool {
        self.debouncer.is_pending()
    }

    /// Ships of the selected faction, in catalog order.
    pub fn roster(&self) -> Vec<(&str, &ShipCatalogEntry)> {
        self.selected_faction()
            .map(|f| f.ships.iter().map(|(n, s)| (n.as_str(), s)).collect())
            .unwrap_or_default()
    }

    pub fn total_points(&self) -> i64 {
        self.list.total_points()
    }

    pub fn has_duplicate_ships(&self) -> bool {
        self.selected_faction()
            .map(|f| self.list.has_duplicate_ships(f))
            .unwrap_or(false)
    }

    pub fn has_incomplete_weapon_selections(&self) -> bool {
        self.selected_faction()
            .map(|f| self.list.has_incomplete_weapon_selections(f))
            .unwrap_or(false)
    }

    /// Derived view of the list: points-sorted entries, totals and issues.
    pub fn summary(&self) -> ListSummary {
        let faction = self.selected_faction();
        let entries = self
            .list
            .sorted_by_points()
            .into_iter()
            .map(|(index, entry)| {
                let ship = faction.and_then(|f| f.ship(&entry.name));
                SummaryEntry {
                    index,
                    name: entry.name.clone(),
                    size: ship.map(|s| s.size.clone()).unwrap_or_default(),
                    points: entry.points,
                    points_label: points_breakdown(entry),
                    prow: ship
                        .map(|s| format_selection(&entry.prow_weapon, s.prow_options()))
                        .unwrap_or_default(),
                    hull: ship
                        .map(|s| format_slots(&entry.hull_weapons, s.hull_options()))
                        .unwrap_or_default(),
                    complete: ship.map(|s| is_complete(entry, s)).unwrap_or(false),
                }
            })
            .collect();
        ListSummary {
            faction: self.list.faction().to_string(),
            total_points: self.list.total_points(),
            entries,
            has_duplicate_ships: self.has_duplicate_ships(),
            has_incomplete_weapon_selections: self.has_incomplete_weapon_selections(),
            issues: list_issues(&self.list, &self.catalog),
            url: self.location.url().to_string(),
        }
    }

    fn roster_ship<'c>(
        &self,
        catalog: &'c Catalog,
        name: &str,
    ) -> Result<&'c ShipCatalogEntry, SessionError> {
        let faction = self.list.faction();
        if faction.is_empty() {
            return Err(SessionError::NoFactionSelected);
        }
        catalog
            .ship(faction, name)
            .ok_or_else(|| SessionError::UnknownShip {
                faction: faction.to_string(),
                ship: name.to_string(),
            })
    }

    fn schedule_write(&mut self, now: Instant) {
        self.debouncer.schedule(
            PendingWrite {
                faction: self.list.faction().to_string(),
                entries: self.list.entries().to_vec(),
            },
            now,
        );
    }

    fn apply(&mut self, write: PendingWrite) {
        update_location(&mut self.location, &write.faction, &write.entries);
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SummaryEntry {
    /// Storage index, for remove/update calls.
    pub index: usize,
    pub name: String,
    pub size: String,
    pub points: i64,
    pub points_label: String,
    pub prow: Vec<String>,
    pub hull: Vec<String>,
    pub complete: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct ListSummary {
    pub faction: String,
    pub total_points: i64,
    pub entries: Vec<SummaryEntry>,
    pub has_duplicate_ships: bool,
    pub has_incomplete_weapon_selections: bool,
    pub issues: Vec<ListIssue>,
    pub url: String,
}
