//! Ship point cost.

use super::ArmyListEntry;

/// Squadrons field three hulls for the catalog cost of one.
pub const SQUADRON_MULTIPLIER: i64 = 3;

/// True when the catalog size label marks a squadron (case-insensitive).
pub fn is_squadron_size(size_label: &str) -> bool {
    size_label.to_lowercase() == "squadron"
}

/// Cost of one list entry. Base points pass through unchecked, sign included;
/// the squadron product saturates.
pub fn compute_ship_cost(base_points: i64, size_label: &str) -> i64 {
    if is_squadron_size(size_label) {
        base_points.saturating_mul(SQUADRON_MULTIPLIER)
    } else {
        base_points
    }
}

/// Points label for a list card: `"4 x 3 = 12"` for squadrons, `"9"` otherwise.
/// Squadron points that do not divide by the multiplier get the plain label.
pub fn points_breakdown(entry: &ArmyListEntry) -> String {
    if entry.squadron() && entry.points % SQUADRON_MULTIPLIER == 0 {
        format!(
            "{} x {} = {}",
            entry.points / SQUADRON_MULTIPLIER,
            SQUADRON_MULTIPLIER,
            entry.points
        )
    } else {
        entry.points.to_string()
    }
}
