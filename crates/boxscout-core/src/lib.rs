//! boxscout-core — shared types for the boxscout crates.
//!
//! Holds the NetBox record model (the subset of fields the derivation
//! pipeline consumes), the emitted target-group shape, and the daemon
//! configuration file parser.

pub mod config;
pub mod types;

pub use config::Config;
pub use types::*;
