//! Move cooldown gate for terminal environments.
//!
//! Terminals repeat held keys and a mouse drag can end in a burst of events.
//! After a move is accepted, further moves are dropped until the cooldown has
//! elapsed. Time is advanced explicitly with [`InputHandler::update`], so the
//! gate is deterministic under test.

use crossterm::event::KeyEvent;

use crate::map::handle_key_event;
use crate::types::{Direction, GameAction, MOVE_COOLDOWN_MS};

/// Tracks input state for the move cooldown.
#[derive(Debug, Clone)]
pub struct InputHandler {
    cooldown_ms: u32,
    remaining_ms: u32,
}

impl InputHandler {
    pub fn new() -> Self {
        Self::with_cooldown_ms(MOVE_COOLDOWN_MS)
    }

    pub fn with_cooldown_ms(cooldown_ms: u32) -> Self {
        Self {
            cooldown_ms,
            remaining_ms: 0,
        }
    }

    /// Time left before the next move is accepted.
    pub fn remaining_ms(&self) -> u32 {
        self.remaining_ms
    }

    pub fn is_ready(&self) -> bool {
        self.remaining_ms == 0
    }

    /// Advance the clock.
    pub fn update(&mut self, elapsed_ms: u32) {
        self.remaining_ms = self.remaining_ms.saturating_sub(elapsed_ms);
    }

    /// Gate an action. Moves start the cooldown; restart always passes and
    /// clears it.
    pub fn try_accept(&mut self, action: GameAction) -> Option<GameAction> {
        match action {
            GameAction::Restart => {
                self.reset();
                Some(action)
            }
            GameAction::Move(_) => {
                if !self.is_ready() {
                    return None;
                }
                self.remaining_ms = self.cooldown_ms;
                Some(action)
            }
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> Option<GameAction> {
        handle_key_event(key).and_then(|action| self.try_accept(action))
    }

    /// Gate a direction that came from a swipe.
    pub fn handle_direction(&mut self, direction: Direction) -> Option<GameAction> {
        self.try_accept(GameAction::Move(direction))
    }

    pub fn reset(&mut self) {
        self.remaining_ms = 0;
    }
}

impl Default for InputHandler {
    fn default() -> Self {
        Self::new()
    }
}
