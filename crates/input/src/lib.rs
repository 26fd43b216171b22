//! Terminal input module (engine-facing).
//!
//! This module is intentionally independent of any UI framework. It maps
//! `crossterm` key and mouse events into [`crate::types::GameAction`] and
//! provides the move cooldown gate that keeps one gesture from becoming a
//! burst of moves.

pub mod handler;
pub mod map;
pub mod swipe;

pub use tui_2048_types as types;

pub use handler::InputHandler;
pub use map::{handle_key_event, should_quit};
pub use swipe::{swipe_direction, SwipeTracker};
