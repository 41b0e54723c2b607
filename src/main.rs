//! Void Admiral army list builder: CLI.

use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;
use void_admiral_builder::army::{option_label, ProwSelection};
use void_admiral_builder::catalog::{load_catalog, Catalog};
use void_admiral_builder::codec::Location;
use void_admiral_builder::config::BuilderConfig;
use void_admiral_builder::report::{
    build_print_sheet, faction_info, render_faction_info, render_text, write_html_report,
    write_json_report,
};
use void_admiral_builder::session::{BuilderSession, ListSummary};
use void_admiral_builder::util::{init_logging, parse_weapon_list};

#[derive(Parser)]
#[command(name = "vab")]
#[command(about = "Void Admiral army list builder: point costs, weapon loadouts, shareable list URLs")]
struct Cli {
    #[arg(short, long, global = true)]
    verbose: bool,

    /// TOML config file (catalog_path, base_url, debounce_ms).
    #[arg(long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Faction catalog JSON; overrides the config file.
    #[arg(long, global = true, value_name = "PATH")]
    catalog: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List the factions in the catalog.
    Factions,
    /// Show a faction's roster.
    Ships {
        #[arg(long)]
        faction: String,
    },
    /// Show a faction's fluff, special rules and command abilities.
    Info {
        #[arg(long)]
        faction: String,
        #[arg(long, help = "Print as JSON")]
        json: bool,
    },
    /// Restore a list URL and print entries, totals and warnings.
    Show {
        #[arg(long, value_name = "URL")]
        url: Option<String>,
        #[arg(long, help = "Print the summary as JSON")]
        json: bool,
    },
    /// Select a faction (clears the list) and print the new URL.
    Faction {
        #[arg(long, value_name = "URL")]
        url: Option<String>,
        name: String,
    },
    /// Add a ship to the list and print the new URL.
    Add {
        #[arg(long, value_name = "URL")]
        url: Option<String>,
        ship: String,
    },
    /// Remove the entry at INDEX (as shown by `show`) and print the new URL.
    Remove {
        #[arg(long, value_name = "URL")]
        url: Option<String>,
        index: usize,
    },
    /// Set the weapon loadout of the entry at INDEX and print the new URL.
    Arm {
        #[arg(long, value_name = "URL")]
        url: Option<String>,
        index: usize,
        #[arg(long, default_value = "", help = "Comma-separated prow weapons")]
        prow: String,
        #[arg(long, default_value = "", help = "Comma-separated hull weapons")]
        hull: String,
    },
    /// Print sheet for a list URL: text to stdout, or JSON + HTML into --out.
    Print {
        #[arg(long, value_name = "URL")]
        url: Option<String>,
        #[arg(long, value_name = "DIR")]
        out: Option<PathBuf>,
    },
    /// Serve list summaries and print sheets over HTTP.
    #[cfg(feature = "serve")]
    Serve {
        #[arg(long, default_value = "127.0.0.1:8080")]
        addr: std::net::SocketAddr,
    },
}

fn main() -> Result<(), String> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match &cli.config {
        Some(path) => BuilderConfig::load(path).map_err(|e| e.to_string())?,
        None => BuilderConfig::default(),
    };
    if let Some(path) = cli.catalog {
        config.catalog_path = path;
    }
    let catalog = Arc::new(load_catalog(&config.catalog_path).map_err(|e| e.to_string())?);

    match cli.command {
        Commands::Factions => {
            for name in catalog.faction_names() {
                println!("{}", name);
            }
            Ok(())
        }
        Commands::Ships { faction } => run_ships(&catalog, &faction),
        Commands::Info { faction, json } => {
            let info = faction_info(&catalog, &faction)
                .ok_or_else(|| format!("unknown faction: {}", faction))?;
            if json {
                let out = serde_json::to_string_pretty(&info).map_err(|e| e.to_string())?;
                println!("{}", out);
            } else {
                print!("{}", render_faction_info(&info));
            }
            Ok(())
        }
        Commands::Show { url, json } => {
            let session = open_session(&catalog, &config, url.as_deref())?;
            let summary = session.summary();
            if json {
                let out = serde_json::to_string_pretty(&summary).map_err(|e| e.to_string())?;
                println!("{}", out);
            } else {
                print_summary(&summary);
            }
            Ok(())
        }
        Commands::Faction { url, name } => {
            let mut session = open_session(&catalog, &config, url.as_deref())?;
            session.select_faction(&name).map_err(|e| e.to_string())?;
            finish(session)
        }
        Commands::Add { url, ship } => {
            let mut session = open_session(&catalog, &config, url.as_deref())?;
            let entry = session
                .add_ship(&ship, Instant::now())
                .map_err(|e| e.to_string())?;
            tracing::info!("added {} for {} pts", entry.name, entry.points);
            finish(session)
        }
        Commands::Remove { url, index } => {
            let mut session = open_session(&catalog, &config, url.as_deref())?;
            let removed = session
                .remove_ship(index, Instant::now())
                .map_err(|e| e.to_string())?;
            tracing::info!("removed {}", removed.name);
            finish(session)
        }
        Commands::Arm {
            url,
            index,
            prow,
            hull,
        } => {
            let mut session = open_session(&catalog, &config, url.as_deref())?;
            let current = session
                .list()
                .get(index)
                .map(|e| e.prow_weapon.clone())
                .ok_or_else(|| format!("no list entry at index {}", index))?;
            let prow = prow_selection(&current, &prow);
            session
                .update_weapons(index, prow, parse_weapon_list(&hull), Instant::now())
                .map_err(|e| e.to_string())?;
            finish(session)
        }
        Commands::Print { url, out } => {
            let session = open_session(&catalog, &config, url.as_deref())?;
            run_print(&session, out.as_deref())
        }
        #[cfg(feature = "serve")]
        Commands::Serve { addr } => run_serve(addr, Arc::clone(&catalog), config),
    }
}

fn open_session(
    catalog: &Arc<Catalog>,
    config: &BuilderConfig,
    url: Option<&str>,
) -> Result<BuilderSession, String> {
    let raw = url.unwrap_or(&config.base_url);
    let location = Location::parse(raw).map_err(|e| format!("invalid list URL {}: {}", raw, e))?;
    Ok(BuilderSession::restore(
        Arc::clone(catalog),
        location,
        config.debounce(),
    ))
}

/// Apply the pending location write and print the resulting URL.
fn finish(mut session: BuilderSession) -> Result<(), String> {
    session.flush();
    println!("{}", session.location().url());
    Ok(())
}

/// Keep the entry's prow shape: slot lists stay lists, single names stay single.
fn prow_selection(current: &ProwSelection, arg: &str) -> ProwSelection {
    let slots = parse_weapon_list(arg);
    match current {
        ProwSelection::Multi(_) => ProwSelection::Multi(slots),
        ProwSelection::Single(_) if slots.len() > 1 => ProwSelection::Multi(slots),
        ProwSelection::Single(_) => {
            ProwSelection::Single(slots.into_iter().flatten().next().unwrap_or_default())
        }
    }
}

fn run_ships(catalog: &Catalog, faction: &str) -> Result<(), String> {
    let f = catalog
        .faction(faction)
        .ok_or_else(|| format!("unknown faction: {}", faction))?;
    for (name, ship) in &f.ships {
        println!(
            "{}  [{}]  {} pts  Hull {}  Speed {}\"  Shields {}  Flak {}",
            name,
            ship.size,
            ship.points,
            ship.statline.hull,
            ship.statline.speed,
            ship.statline.shields.unwrap_or(0),
            ship.statline.flak.unwrap_or(0)
        );
        if let Some(prow) = &ship.prow {
            let opts: Vec<String> = prow.options.iter().map(option_label).collect();
            println!("    prow (select {}): {}", prow.select, opts.join(" | "));
        }
        if let Some(hull) = &ship.hull {
            let opts: Vec<String> = hull.options.iter().map(option_label).collect();
            println!("    hull (select {}): {}", hull.select, opts.join(" | "));
        }
    }
    Ok(())
}

fn print_summary(summary: &ListSummary) {
    if summary.faction.is_empty() {
        println!("No faction selected");
        return;
    }
    println!("Faction: {}", summary.faction);
    println!("Total Points: {}", summary.total_points);
    if summary.entries.is_empty() {
        println!("No ships added yet");
    }
    for e in &summary.entries {
        let mark = if e.complete { " " } else { "!" };
        println!("{} #{} {} ({} pts)", mark, e.index, e.name, e.points_label);
        if !e.prow.is_empty() {
            println!("      prow: {}", e.prow.join("; "));
        }
        if !e.hull.is_empty() {
            println!("      hull: {}", e.hull.join("; "));
        }
    }
    for issue in &summary.issues {
        println!("[{}] {}", issue.code, issue.summary);
    }
}

fn run_print(session: &BuilderSession, out: Option<&Path>) -> Result<(), String> {
    let sheet = build_print_sheet(session.catalog(), session.list())
        .ok_or("no faction selected in list URL")?;
    match out {
        Some(dir) => {
            std::fs::create_dir_all(dir).map_err(|e| e.to_string())?;
            let json_path = dir.join("sheet.json");
            let html_path = dir.join("sheet.html");
            write_json_report(&sheet, &json_path)?;
            write_html_report(&sheet, &html_path)?;
            tracing::info!("wrote {} and {}", json_path.display(), html_path.display());
        }
        None => print!("{}", render_text(&sheet)),
    }
    Ok(())
}

#[cfg(feature = "serve")]
fn run_serve(
    addr: std::net::SocketAddr,
    catalog: Arc<Catalog>,
    config: BuilderConfig,
) -> Result<(), String> {
    use void_admiral_builder::server::{serve, ServerState};
    let runtime = tokio::runtime::Runtime::new().map_err(|e| e.to_string())?;
    runtime
        .block_on(serve(addr, ServerState { catalog, config }))
        .map_err(|e| e.to_string())
}
