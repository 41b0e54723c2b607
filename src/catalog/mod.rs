//! Catalog model: factions, ships, weapon options, statlines.

mod loader;

pub use loader::{load_catalog, parse_catalog, CatalogError};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// One selectable weapon for a prow or hull slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponOption {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub targets: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attacks: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub range: Option<String>,
}

/// Ship statline. JSON keys are PascalCase (`Hull`, `Speed`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Statline {
    pub hull: u32,
    pub speed: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub armour: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub shields: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flak: Option<u32>,
}

/// A weapon section: how many slots to fill and the options to fill them with.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeaponGroup {
    pub select: u32,
    #[serde(default)]
    pub options: Vec<WeaponOption>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShipCatalogEntry {
    pub size: String,
    /// Base cost, before any squadron multiplier.
    pub points: i64,
    pub statline: Statline,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prow: Option<WeaponGroup>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hull: Option<WeaponGroup>,
    /// Carried for data-shape compatibility; cost and slot counts key off `size`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub squadron: Option<bool>,
}

impl ShipCatalogEntry {
    pub fn prow_options(&self) -> &[WeaponOption] {
        self.prow.as_ref().map(|g| g.options.as_slice()).unwrap_or(&[])
    }

    pub fn hull_options(&self) -> &[WeaponOption] {
        self.hull.as_ref().map(|g| g.options.as_slice()).unwrap_or(&[])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SpecialRule {
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommandAbility {
    pub dice: u32,
    pub name: String,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faction {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fluff: Option<String>,
    #[serde(default)]
    pub special_rules: Vec<SpecialRule>,
    #[serde(default)]
    pub command_abilities: Vec<CommandAbility>,
    /// Ships in catalog order.
    pub ships: IndexMap<String, ShipCatalogEntry>,
}

impl Faction {
    pub fn ship(&self, name: &str) -> Option<&ShipCatalogEntry> {
        self.ships.get(name)
    }
}

/// All factions, keyed by name in catalog order. Read-only once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Catalog {
    factions: IndexMap<String, Faction>,
}

impl Catalog {
    pub fn new(factions: IndexMap<String, Faction>) -> Self {
        Self { factions }
    }

    /// Selectable faction names, in catalog order.
    pub fn faction_names(&self) -> impl Iterator<Item = &str> {
        self.factions.keys().map(String::as_str)
    }

    pub fn faction(&self, name: &str) -> Option<&Faction> {
        self.factions.get(name)
    }

    pub fn contains_faction(&self, name: &str) -> bool {
        self.factions.contains_key(name)
    }

    pub fn ship(&self, faction: &str, ship: &str) -> Option<&ShipCatalogEntry> {
        self.faction(faction).and_then(|f| f.ship(ship))
    }

    pub fn len(&self) -> usize {
        self.factions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.factions.is_empty()
    }
}
