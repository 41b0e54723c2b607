//! Army list entries, cost, weapon slots and the list engine.

mod cost;
mod list;
mod weapons;

pub use cost::{compute_ship_cost, is_squadron_size, points_breakdown, SQUADRON_MULTIPLIER};
pub use list::{ArmyError, ArmyList};
pub use weapons::{
    format_selection, format_weapon, is_complete, option_label, required_hull_slots,
    required_prow_slots,
};
pub(crate) use weapons::format_slots;

use serde::{Deserialize, Serialize};

/// One weapon slot. `None` (JSON null) and `""` are both an unfilled slot.
pub type Slot = Option<String>;

pub(crate) fn slot_filled(slot: &Slot) -> bool {
    slot.as_deref().map(|w| !w.is_empty()).unwrap_or(false)
}

/// Prow selection: a single name for single-select ships, or one slot per
/// position for squadrons and multi-select prows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ProwSelection {
    Single(String),
    Multi(Vec<Slot>),
}

impl Default for ProwSelection {
    fn default() -> Self {
        ProwSelection::Single(String::new())
    }
}

impl ProwSelection {
    /// Number of selected positions: array length, or 1 for a non-empty single name.
    pub fn selected_count(&self) -> usize {
        match self {
            ProwSelection::Multi(slots) => slots.len(),
            ProwSelection::Single(name) if !name.is_empty() => 1,
            ProwSelection::Single(_) => 0,
        }
    }

    pub fn all_filled(&self) -> bool {
        match self {
            ProwSelection::Multi(slots) => slots.iter().all(slot_filled),
            ProwSelection::Single(name) => !name.is_empty(),
        }
    }

    /// Order-insensitive key used when comparing loadouts.
    pub fn normalized(&self) -> String {
        match self {
            ProwSelection::Multi(slots) => sorted_join(slots),
            ProwSelection::Single(name) => name.clone(),
        }
    }

    pub fn slots(&self) -> Vec<Option<&str>> {
        match self {
            ProwSelection::Multi(slots) => slots.iter().map(|s| s.as_deref()).collect(),
            ProwSelection::Single(name) => vec![Some(name.as_str())],
        }
    }
}

pub(crate) fn sorted_join(slots: &[Slot]) -> String {
    let mut names: Vec<&str> = slots.iter().map(|s| s.as_deref().unwrap_or("")).collect();
    names.sort_unstable();
    names.join(",")
}

/// One ship in the user's list, with its own loadout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ArmyListEntry {
    /// Catalog key of the ship.
    pub name: String,
    /// Always 1; each physical ship is its own entry.
    pub count: i64,
    /// Cost fixed when the ship was added.
    pub points: i64,
    pub prow_weapon: ProwSelection,
    pub hull_weapons: Vec<Slot>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_squadron: Option<bool>,
}

impl ArmyListEntry {
    pub fn squadron(&self) -> bool {
        self.is_squadron.unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prow_selected_count() {
        assert_eq!(ProwSelection::Single(String::new()).selected_count(), 0);
        assert_eq!(ProwSelection::Single("Lance".into()).selected_count(), 1);
        assert_eq!(
            ProwSelection::Multi(vec![Some("Lance".into()), None]).selected_count(),
            2
        );
    }

    #[test]
    fn normalized_sorts_multi_selection() {
        let a = ProwSelection::Multi(vec![Some("Ram".into()), Some("Lance".into())]);
        let b = ProwSelection::Multi(vec![Some("Lance".into()), Some("Ram".into())]);
        assert_eq!(a.normalized(), "Lance,Ram");
        assert_eq!(a.normalized(), b.normalized());
    }

    #[test]
    fn entry_json_shape_is_camel_case() {
        let entry = ArmyListEntry {
            name: "Galleon".into(),
            count: 1,
            points: 9,
            prow_weapon: ProwSelection::Single("Lance".into()),
            hull_weapons: vec![Some("Torpedo".into()), None],
            is_squadron: Some(false),
        };
        let json = serde_json::to_value(&entry).unwrap();
        assert_eq!(json["prowWeapon"], "Lance");
        assert_eq!(json["hullWeapons"][1], serde_json::Value::Null);
        assert_eq!(json["isSquadron"], false);
        let back: ArmyListEntry = serde_json::from_value(json).unwrap();
        assert_eq!(back, entry);
    }
}
