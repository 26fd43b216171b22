//! TUI 2048 (workspace facade crate).
//!
//! Re-exports the member crates as `tui_2048::{core,adapter,term,input,types}`
//! and hosts the pieces only the binary needs: environment configuration and
//! logging setup.

pub mod config;
pub mod logging;

pub use tui_2048_adapter as adapter;
pub use tui_2048_core as core;
pub use tui_2048_input as input;
pub use tui_2048_term as term;
pub use tui_2048_types as types;

pub use config::AppConfig;
