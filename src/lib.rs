//! Void Admiral army list builder: library entry point.
//!
//! Exposes catalog, army, codec, validate, session, and report for use by
//! the CLI, the optional HTTP server, and tests.

pub mod army;
pub mod catalog;
pub mod codec;
pub mod config;
pub mod report;
#[cfg(feature = "serve")]
pub mod server;
pub mod session;
pub mod util;
pub mod validate;
