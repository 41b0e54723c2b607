//! URL state codec: the `army` query parameter and the location it lives in.
//!
//! The list is JSON-encoded and then percent-encoded with the same unreserved
//! set as a browser's `encodeURIComponent`, so links produced here and links
//! produced by the web builder decode identically. Decoding never fails: a
//! malformed parameter restores as an empty list.

mod debounce;
mod location;

pub use debounce::Debouncer;
pub use location::{update_location, Location, ARMY_PARAM, FACTION_PARAM};

use crate::army::{ArmyListEntry, ProwSelection, Slot};
use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};
use serde_json::Value;

/// Characters `encodeURIComponent` leaves untouched besides ASCII alphanumerics.
const URI_COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Largest `count` or `points` magnitude a restored entry may carry.
pub const MAX_RESTORED_VALUE: i64 = 1_000_000;

/// Percent-encode like `encodeURIComponent`.
pub fn encode_uri_component(s: &str) -> String {
    utf8_percent_encode(s, URI_COMPONENT).to_string()
}

/// Percent-decode like `decodeURIComponent`: a `%` not followed by two hex
/// digits, or bytes that are not UTF-8, is an error.
pub fn decode_uri_component(s: &str) -> Option<String> {
    let bytes = s.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' {
            let ok = bytes.len() > i + 2
                && bytes[i + 1].is_ascii_hexdigit()
                && bytes[i + 2].is_ascii_hexdigit();
            if !ok {
                return None;
            }
            i += 3;
        } else {
            i += 1;
        }
    }
    percent_decode_str(s)
        .decode_utf8()
        .ok()
        .map(|cow| cow.into_owned())
}

/// Encode the list for the `army` parameter.
pub fn serialize(entries: &[ArmyListEntry]) -> String {
    // a Vec of plain structs has no non-string keys; serialization cannot fail
    let json = serde_json::to_string(entries).unwrap_or_else(|_| "[]".to_string());
    encode_uri_component(&json)
}

/// Decode an `army` parameter. Malformed input yields an empty list, and
/// elements that do not have the entry shape are dropped.
pub fn deserialize(raw: &str) -> Vec<ArmyListEntry> {
    let Some(decoded) = decode_uri_component(raw) else {
        tracing::debug!("army parameter is not valid percent-encoding");
        return Vec::new();
    };
    let parsed: Value = match serde_json::from_str(&decoded) {
        Ok(v) => v,
        Err(e) => {
            tracing::debug!("army parameter is not valid JSON: {}", e);
            return Vec::new();
        }
    };
    let Value::Array(items) = parsed else {
        tracing::debug!("army parameter is not a JSON array");
        return Vec::new();
    };
    let total = items.len();
    let entries: Vec<ArmyListEntry> = items.iter().filter_map(entry_from_value).collect();
    if entries.len() < total {
        tracing::debug!(
            "dropped {} malformed army entr(ies)",
            total - entries.len()
        );
    }
    entries
}

fn entry_from_value(value: &Value) -> Option<ArmyListEntry> {
    let obj = value.as_object()?;
    let name = obj.get("name")?.as_str()?.to_string();
    let count = bounded(obj.get("count")?)?;
    let points = bounded(obj.get("points")?)?;
    let prow_weapon = match obj.get("prowWeapon")? {
        Value::String(s) => ProwSelection::Single(s.clone()),
        Value::Array(items) => ProwSelection::Multi(items.iter().map(slot_from_value).collect()),
        _ => return None,
    };
    let hull_weapons = obj
        .get("hullWeapons")?
        .as_array()?
        .iter()
        .map(slot_from_value)
        .collect();
    let is_squadron = obj.get("isSquadron").and_then(Value::as_bool);
    Some(ArmyListEntry {
        name,
        count,
        points,
        prow_weapon,
        hull_weapons,
        is_squadron,
    })
}

// Falsy values are empty slots; other non-strings keep their JSON text.
fn slot_from_value(value: &Value) -> Slot {
    match value {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) => Some(s.clone()),
        Value::Number(n) if n.as_f64() == Some(0.0) => None,
        other => Some(other.to_string()),
    }
}

fn bounded(value: &Value) -> Option<i64> {
    integral(value).filter(|n| (-MAX_RESTORED_VALUE..=MAX_RESTORED_VALUE).contains(n))
}

fn integral(value: &Value) -> Option<i64> {
    if let Some(n) = value.as_i64() {
        return Some(n);
    }
    let f = value.as_f64()?;
    if f.is_finite() && f.fract() == 0.0 && f.abs() < i64::MAX as f64 {
        Some(f as i64)
    } else {
        None
    }
}
