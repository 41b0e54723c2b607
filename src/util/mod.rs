//! Shared utilities: logging, weapon list parsing.

use crate::army::Slot;
use tracing::Level;

/// Initialize tracing with env filter. Safe to call once at startup.
pub fn init_logging(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::INFO };
    let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| level.to_string());
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Split a comma-separated weapon list into slots. Blank items become empty
/// slots so positions are kept: `"Lance,,Ram"` has three slots.
pub fn parse_weapon_list(s: &str) -> Vec<Slot> {
    if s.trim().is_empty() {
        return Vec::new();
    }
    s.split(',')
        .map(|w| {
            let w = w.trim();
            if w.is_empty() {
                None
            } else {
                Some(w.to_string())
            }
        })
        .collect()
}
