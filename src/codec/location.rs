//! The page location that mirrors builder state.

use super::serialize;
use crate::army::ArmyListEntry;
use url::Url;

pub const FACTION_PARAM: &str = "faction";
pub const ARMY_PARAM: &str = "army";

/// Current location. Writes replace it in place; there is no history to push onto.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    url: Url,
    writes: usize,
}

impl Location {
    pub fn parse(s: &str) -> Result<Self, url::ParseError> {
        Url::parse(s).map(Self::new)
    }

    pub fn new(url: Url) -> Self {
        Self { url, writes: 0 }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    /// First value of `key`, form-decoded once.
    pub fn query_param(&self, key: &str) -> Option<String> {
        self.url
            .query_pairs()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.into_owned())
    }

    /// Replace the current location without adding a navigation step.
    pub fn replace(&mut self, url: Url) {
        self.url = url;
        self.writes += 1;
    }

    /// Number of replace writes applied so far.
    pub fn writes(&self) -> usize {
        self.writes
    }
}

/// Set or delete the `faction` and `army` parameters and replace the location.
/// `faction` is removed when empty; `army` is removed when the list is empty.
/// Other parameters are kept in place.
pub fn update_location(location: &mut Location, faction: &str, entries: &[ArmyListEntry]) {
    let mut pairs: Vec<(String, String)> = location
        .url()
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    if faction.is_empty() {
        delete_param(&mut pairs, FACTION_PARAM);
    } else {
        set_param(&mut pairs, FACTION_PARAM, faction);
    }
    if entries.is_empty() {
        delete_param(&mut pairs, ARMY_PARAM);
    } else {
        set_param(&mut pairs, ARMY_PARAM, &serialize(entries));
    }

    let mut url = location.url().clone();
    if pairs.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(pairs.iter());
    }
    tracing::trace!("location -> {}", url);
    location.replace(url);
}

// Replace the first occurrence and drop the rest, or append when absent.
fn set_param(pairs: &mut Vec<(String, String)>, key: &str, value: &str) {
    match pairs.iter().position(|(k, _)| k == key) {
        Some(first) => {
            pairs[first].1 = value.to_string();
            let mut i = 0;
            pairs.retain(|(k, _)| {
                let keep = k != key || i == first;
                i += 1;
                keep
            });
        }
        None => pairs.push((key.to_string(), value.to_string())),
    }
}

fn delete_param(pairs: &mut Vec<(String, String)>, key: &str) {
    pairs.retain(|(k, _)| k != key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::army::ProwSelection;
    use crate::codec::deserialize;

    fn frigate() -> ArmyListEntry {
        ArmyListEntry {
            name: "Frigate".into(),
            count: 1,
            points: 3,
            prow_weapon: ProwSelection::Single(String::new()),
            hull_weapons: vec![],
            is_squadron: Some(false),
        }
    }

    #[test]
    fn sets_both_params_and_round_trips() {
        let mut loc = Location::parse("http://localhost/builder/").unwrap();
        let list = vec![frigate()];
        update_location(&mut loc, "Loyalists", &list);
        assert_eq!(loc.writes(), 1);
        assert_eq!(loc.query_param(FACTION_PARAM).as_deref(), Some("Loyalists"));
        let army = loc.query_param(ARMY_PARAM).unwrap();
        assert_eq!(deserialize(&army), list);
        assert_eq!(loc.url().path(), "/builder/");
    }

    #[test]
    fn empty_values_delete_params() {
        let mut loc = Location::parse("http://localhost/?faction=Raiders&army=x&theme=dark").unwrap();
        update_location(&mut loc, "", &[]);
        assert_eq!(loc.query_param(FACTION_PARAM), None);
        assert_eq!(loc.query_param(ARMY_PARAM), None);
        assert_eq!(loc.query_param("theme").as_deref(), Some("dark"));

        // a no-op write still replaces the location
        update_location(&mut loc, "", &[]);
        assert_eq!(loc.writes(), 2);
    }

    #[test]
    fn clears_query_when_nothing_left() {
        let mut loc = Location::parse("http://localhost/?faction=Raiders").unwrap();
        update_location(&mut loc, "", &[]);
        assert_eq!(loc.url().as_str(), "http://localhost/");
    }

    #[test]
    fn set_replaces_in_place_and_dedups() {
        let mut loc =
            Location::parse("http://localhost/?faction=A&theme=dark&faction=B").unwrap();
        update_location(&mut loc, "Loyalists", &[]);
        assert_eq!(
            loc.url().query(),
            Some("faction=Loyalists&theme=dark")
        );
    }

    #[test]
    fn faction_with_spaces_is_form_encoded() {
        let mut loc = Location::parse("http://localhost/").unwrap();
        update_location(&mut loc, "Star Pirates", &[]);
        assert_eq!(loc.url().query(), Some("faction=Star+Pirates"));
        assert_eq!(loc.query_param(FACTION_PARAM).as_deref(), Some("Star Pirates"));
    }
}
