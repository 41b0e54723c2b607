//! Print sheet: the current list as a table, plus faction rules, in text, JSON and HTML.
//! Also the faction info view (fluff, special rules, command abilities).

use crate::army::{ArmyList, ProwSelection, Slot};
use crate::catalog::{Catalog, CommandAbility, Faction, SpecialRule};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Serialize)]
pub struct PrintRow {
    pub ship: String,
    pub size: String,
    pub points: i64,
    pub hull: u32,
    pub speed: u32,
    pub shields: Option<u32>,
    pub flak: Option<u32>,
    pub prow_weapons: String,
    pub hull_weapons: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct PrintSheet {
    pub faction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fluff: Option<String>,
    pub generated_at: DateTime<Utc>,
    pub total_points: i64,
    pub rows: Vec<PrintRow>,
    pub special_rules: Vec<SpecialRule>,
    pub command_abilities: Vec<CommandAbility>,
}

/// Build the sheet for `list`, rows in list order. `None` when the list's
/// faction is not in the catalog.
pub fn build_print_sheet(catalog: &Catalog, list: &ArmyList) -> Option<PrintSheet> {
    let faction = catalog.faction(list.faction())?;
    let rows = list
        .entries()
        .iter()
        .filter_map(|entry| {
            let ship = faction.ship(&entry.name)?;
            Some(PrintRow {
                ship: entry.name.clone(),
                size: ship.size.clone(),
                points: entry.points,
                hull: ship.statline.hull,
                speed: ship.statline.speed,
                shields: ship.statline.shields,
                flak: ship.statline.flak,
                prow_weapons: prow_cell(&entry.prow_weapon),
                hull_weapons: join_slots(&entry.hull_weapons),
            })
        })
        .collect();
    Some(PrintSheet {
        faction: list.faction().to_string(),
        fluff: faction.fluff.clone().filter(|f| !f.is_empty()),
        generated_at: Utc::now(),
        total_points: list.total_points(),
        rows,
        special_rules: faction.special_rules.clone(),
        command_abilities: faction.command_abilities.clone(),
    })
}

/// Faction lore and rules, shown next to the roster.
#[derive(Debug, Clone, Serialize)]
pub struct FactionInfo {
    pub faction: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fluff: Option<String>,
    pub special_rules: Vec<SpecialRule>,
    pub command_abilities: Vec<CommandAbility>,
}

impl FactionInfo {
    pub fn new(name: &str, faction: &Faction) -> Self {
        Self {
            faction: name.to_string(),
            fluff: faction.fluff.clone().filter(|f| !f.is_empty()),
            special_rules: faction.special_rules.clone(),
            command_abilities: faction.command_abilities.clone(),
        }
    }
}

pub fn faction_info(catalog: &Catalog, name: &str) -> Option<FactionInfo> {
    catalog.faction(name).map(|f| FactionInfo::new(name, f))
}

/// Plain-text faction info. Empty sections are left out.
pub fn render_faction_info(info: &FactionInfo) -> String {
    let mut out = format!("{}\n", info.faction);
    if let Some(fluff) = &info.fluff {
        out.push_str(&format!("\n{}\n", fluff));
    }
    push_rules(&mut out, &info.special_rules, &info.command_abilities);
    out
}

fn push_rules(out: &mut String, rules: &[SpecialRule], abilities: &[CommandAbility]) {
    if !rules.is_empty() {
        out.push_str("\nSpecial Rules\n");
        for rule in rules {
            out.push_str(&format!("  {}: {}\n", rule.name, rule.description));
        }
    }
    if !abilities.is_empty() {
        out.push_str("\nCommand Abilities\n");
        for ability in abilities {
            out.push_str(&format!(
                "  [{}] {}: {}\n",
                ability.dice, ability.name, ability.description
            ));
        }
    }
}

fn prow_cell(selection: &ProwSelection) -> String {
    match selection {
        ProwSelection::Multi(slots) => join_slots(slots),
        ProwSelection::Single(name) if name.is_empty() => "None".to_string(),
        ProwSelection::Single(name) => name.clone(),
    }
}

fn join_slots(slots: &[Slot]) -> String {
    slots
        .iter()
        .map(|s| s.as_deref().unwrap_or(""))
        .collect::<Vec<_>>()
        .join(", ")
}

fn opt_cell(v: Option<u32>) -> String {
    v.map(|n| n.to_string()).unwrap_or_default()
}

/// Plain-text table for terminals.
pub fn render_text(sheet: &PrintSheet) -> String {
    let header = [
        "Ship", "Size", "Points", "Hull", "Speed", "Shields", "Flak", "Prow Weapons",
        "Hull Weapons",
    ];
    let cells: Vec<[String; 9]> = sheet
        .rows
        .iter()
        .map(|r| {
            [
                r.ship.clone(),
                r.size.clone(),
                r.points.to_string(),
                r.hull.to_string(),
                r.speed.to_string(),
                opt_cell(r.shields),
                opt_cell(r.flak),
                r.prow_weapons.clone(),
                r.hull_weapons.clone(),
            ]
        })
        .collect();
    let mut widths: Vec<usize> = header.iter().map(|h| h.chars().count()).collect();
    for row in &cells {
        for (w, c) in widths.iter_mut().zip(row.iter()) {
            *w = (*w).max(c.chars().count());
        }
    }
    let line = |row: &[String]| -> String {
        row.iter()
            .zip(widths.iter())
            .map(|(c, w)| format!("{:<width$}", c, width = *w))
            .collect::<Vec<_>>()
            .join("  ")
            .trim_end()
            .to_string()
    };

    let mut out = String::new();
    out.push_str("Void Admiral Army List\n");
    out.push_str(&format!("Faction: {}\n", sheet.faction));
    if let Some(fluff) = &sheet.fluff {
        out.push_str(&format!("{}\n", fluff));
    }
    out.push('\n');
    let header_row: Vec<String> = header.iter().map(|h| h.to_string()).collect();
    out.push_str(&line(&header_row[..]));
    out.push('\n');
    for row in &cells {
        out.push_str(&line(&row[..]));
        out.push('\n');
    }
    out.push_str(&format!("\nTotal Points: {}\n", sheet.total_points));
    push_rules(&mut out, &sheet.special_rules, &sheet.command_abilities);
    out
}

pub fn write_json_report(sheet: &PrintSheet, path: &Path) -> Result<(), String> {
    let json = serde_json::to_string_pretty(sheet).map_err(|e| e.to_string())?;
    fs::write(path, json).map_err(|e| e.to_string())?;
    Ok(())
}

pub fn write_html_report(sheet: &PrintSheet, path: &Path) -> Result<(), String> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| e.to_string())?;
    }
    fs::write(path, render_html(sheet)).map_err(|e| e.to_string())?;
    Ok(())
}

pub fn render_html(sheet: &PrintSheet) -> String {
    let rows: String = sheet
        .rows
        .iter()
        .map(|r| {
            format!(
                "<tr><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td><td>{}</td></tr>",
                html_escape(&r.ship),
                html_escape(&r.size),
                r.points,
                r.hull,
                r.speed,
                opt_cell(r.shields),
                opt_cell(r.flak),
                html_escape(&r.prow_weapons),
                html_escape(&r.hull_weapons)
            )
        })
        .collect();
    let rules: String = sheet
        .special_rules
        .iter()
        .map(|rule| {
            format!(
                r#"<div class="rule"><div class="name">{}</div><div>{}</div></div>"#,
                html_escape(&rule.name),
                html_escape(&rule.description)
            )
        })
        .collect();
    let abilities: String = sheet
        .command_abilities
        .iter()
        .map(|a| {
            format!(
                r#"<div class="rule"><div class="name"><span class="dice">[{}]</span> {}</div><div>{}</div></div>"#,
                a.dice,
                html_escape(&a.name),
                html_escape(&a.description)
            )
        })
        .collect();
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head><meta charset="utf-8"><title>{} - Void Admiral Army List</title>
<style>body{{font-family:system-ui,sans-serif;margin:1rem;}} table{{border-collapse:collapse;width:100%;}} th,td{{border:1px solid #ccc;padding:6px;text-align:left;}} .total{{font-weight:bold;margin:1rem 0;}} .rule{{margin:6px 0;}} .name{{font-weight:bold;}} .dice{{color:#555;}}</style>
</head>
<body>
<h1>Void Admiral Army List</h1>
<p>Faction: {}</p>
{}
<table><thead><tr><th>Ship</th><th>Size</th><th>Points</th><th>Hull</th><th>Speed</th><th>Shields</th><th>Flak</th><th>Prow Weapons</th><th>Hull Weapons</th></tr></thead>
<tbody>{}</tbody>
</table>
<div class="total">Total Points: {}</div>
<h3>Special Rules</h3>
{}
<h3>Command Abilities</h3>
{}
</body>
</html>"#,
        html_escape(&sheet.faction),
        html_escape(&sheet.faction),
        sheet
            .fluff
            .as_deref()
            .map(|f| format!(r#"<p class="fluff">{}</p>"#, html_escape(f)))
            .unwrap_or_default(),
        rows,
        sheet.total_points,
        rules,
        abilities
    )
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::fixtures::loyalists_catalog;

    fn sample() -> (Catalog, ArmyList) {
        let catalog = loyalists_catalog();
        let mut list = ArmyList::new("Loyalists");
        list.add_ship("Frigate", catalog.ship("Loyalists", "Frigate").unwrap());
        list.add_ship("Galleon", catalog.ship("Loyalists", "Galleon").unwrap());
        list.update_weapons(
            1,
            ProwSelection::Single("Lance".into()),
            vec![Some("Torpedo".into()), Some("Missile".into())],
        )
        .unwrap();
        (catalog, list)
    }

    #[test]
    fn sheet_rows_follow_list_order() {
        let (catalog, list) = sample();
        let sheet = build_print_sheet(&catalog, &list).unwrap();
        assert_eq!(sheet.total_points, 12);
        assert_eq!(sheet.rows[0].ship, "Frigate");
        assert_eq!(sheet.rows[0].prow_weapons, "None");
        assert_eq!(sheet.rows[1].ship, "Galleon");
        assert_eq!(sheet.rows[1].prow_weapons, "Lance");
        assert_eq!(sheet.rows[1].hull_weapons, "Torpedo, Missile");
        assert_eq!(sheet.fluff.as_deref(), Some("Sworn to the throne."));
        assert_eq!(sheet.special_rules.len(), 1);
        assert!(build_print_sheet(&catalog, &ArmyList::new("Nobody")).is_none());
    }

    #[test]
    fn text_sheet_lists_everything() {
        let (catalog, list) = sample();
        let text = render_text(&build_print_sheet(&catalog, &list).unwrap());
        assert!(text.contains("Faction: Loyalists\nSworn to the throne.\n"));
        assert!(text.contains("Prow Weapons"));
        assert!(text.contains("Torpedo, Missile"));
        assert!(text.contains("Total Points: 12"));
        assert!(text.contains("[2] Broadside"));
    }

    #[test]
    fn html_and_json_files_written() {
        let (catalog, list) = sample();
        let sheet = build_print_sheet(&catalog, &list).unwrap();
        let dir = tempfile::tempdir().unwrap();
        let html = dir.path().join("print").join("sheet.html");
        let json = dir.path().join("sheet.json");
        write_html_report(&sheet, &html).unwrap();
        write_json_report(&sheet, &json).unwrap();
        let page = fs::read_to_string(&html).unwrap();
        assert!(page.contains("<td>Galleon</td>"));
        assert!(page.contains("Total Points: 12"));
        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&json).unwrap()).unwrap();
        assert_eq!(value["rows"][1]["ship"], "Galleon");
        assert_eq!(value["fluff"], "Sworn to the throne.");
        assert!(page.contains("<title>Loyalists - Void Admiral Army List</title>"));
        assert!(page.contains(r#"<p class="fluff">Sworn to the throne.</p>"#));
        assert_eq!(value["total_points"], 12);
    }

    #[test]
    fn faction_info_shows_fluff_and_rules() {
        let catalog = loyalists_catalog();
        let info = faction_info(&catalog, "Loyalists").unwrap();
        let text = render_faction_info(&info);
        assert!(text.starts_with("Loyalists\n\nSworn to the throne.\n"));
        assert!(text.contains("Drilled Crews: Reroll one dice per turn."));
        assert!(text.contains("[2] Broadside"));

        let raiders = render_faction_info(&faction_info(&catalog, "Raiders").unwrap());
        assert_eq!(raiders, "Raiders\n");
        assert!(faction_info(&catalog, "Nobody").is_none());
    }

    #[test]
    fn escape_html() {
        assert_eq!(html_escape("<a & \"b\">"), "&lt;a &amp; &quot;b&quot;&gt;");
    }
}
