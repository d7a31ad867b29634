//! Process entry point for the railway information kiosk.
//!
//! Resolves [`config::KioskSettings`], then drives the `kiosk_store`
//! services through the [`cli`] commands. Store logic lives entirely in
//! `kiosk_store`; this crate only wires it to configuration and a terminal.

pub mod cli;
pub mod config;

pub use cli::{Cli, CliError, KioskContext, run};
pub use config::{ConfigError, KioskSettings};
