//! Weapon slot completeness and display formatting.

use super::{slot_filled, ArmyListEntry, ProwSelection, Slot, SQUADRON_MULTIPLIER};
use crate::catalog::{ShipCatalogEntry, WeaponOption};

/// Prow slots an entry must fill. Not multiplied for squadrons.
pub fn required_prow_slots(catalog_entry: &ShipCatalogEntry) -> usize {
    catalog_entry
        .prow
        .as_ref()
        .map(|g| g.select as usize)
        .unwrap_or(0)
}

/// Hull slots an entry must fill; tripled for squadrons.
pub fn required_hull_slots(entry: &ArmyListEntry, catalog_entry: &ShipCatalogEntry) -> usize {
    let base = catalog_entry
        .hull
        .as_ref()
        .map(|g| g.select as usize)
        .unwrap_or(0);
    if entry.squadron() {
        base * SQUADRON_MULTIPLIER as usize
    } else {
        base
    }
}

/// True when every prow and hull slot the catalog asks for holds a weapon name.
/// Sections the ship does not have are satisfied.
pub fn is_complete(entry: &ArmyListEntry, catalog_entry: &ShipCatalogEntry) -> bool {
    if catalog_entry.prow.is_some() {
        let required = required_prow_slots(catalog_entry);
        if entry.prow_weapon.selected_count() < required || !entry.prow_weapon.all_filled() {
            return false;
        }
    }
    if catalog_entry.hull.is_some() {
        let required = required_hull_slots(entry, catalog_entry);
        if entry.hull_weapons.len() < required || !entry.hull_weapons.iter().all(slot_filled) {
            return false;
        }
    }
    true
}

/// Render a selected weapon as `Name (Targets) N dice @ Range`.
pub fn format_weapon(weapon_name: Option<&str>, options: &[WeaponOption]) -> String {
    let name = match weapon_name {
        Some(n) if !n.is_empty() => n,
        _ => return "None".to_string(),
    };
    let Some(weapon) = options.iter().find(|o| o.name == name) else {
        // stale data: show what was stored
        return name.to_string();
    };
    let targets = weapon
        .targets
        .as_deref()
        .filter(|t| !t.is_empty())
        .unwrap_or("Unknown");
    let dice = weapon.attacks.filter(|a| *a != 0).unwrap_or(1);
    let range = weapon
        .range
        .as_deref()
        .filter(|r| !r.is_empty())
        .unwrap_or("0\"");
    format!("{} ({}) {} dice @ {}", name, targets, dice, range)
}

/// Format every slot of a prow selection.
pub fn format_selection(selection: &ProwSelection, options: &[WeaponOption]) -> Vec<String> {
    selection
        .slots()
        .into_iter()
        .map(|slot| format_weapon(slot, options))
        .collect()
}

pub(crate) fn format_slots(slots: &[Slot], options: &[WeaponOption]) -> Vec<String> {
    slots
        .iter()
        .map(|slot| format_weapon(slot.as_deref(), options))
        .collect()
}

/// Picker label: `Lance (2 attacks, 18")` when attacks and range are both known.
pub fn option_label(option: &WeaponOption) -> String {
    match (option.attacks.filter(|a| *a != 0), option.range.as_deref()) {
        (Some(attacks), Some(range)) if !range.is_empty() => {
            format!("{} ({} attacks, {})", option.name, attacks, range)
        }
        _ => option.name.clone(),
    }
}
