//! Swipe detection - turns a drag into a direction.
//!
//! Terminals report mouse drags as a press followed by a release; the tracker
//! remembers where the press happened and classifies the delta on release.

use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};

use crate::types::{Direction, SWIPE_THRESHOLD_CELLS};

/// Classify a drag delta.
///
/// The dominant axis wins (`|dx| > |dy|` is horizontal, ties are vertical);
/// the delta along it must exceed `threshold` in magnitude.
///
/// ```
/// use tui_2048_input::swipe_direction;
/// use tui_2048_input::types::Direction;
///
/// assert_eq!(swipe_direction(30, 5, 20), Some(Direction::Right));
/// assert_eq!(swipe_direction(-4, -25, 20), Some(Direction::Up));
/// assert_eq!(swipe_direction(10, 0, 20), None);
/// ```
pub fn swipe_direction(dx: i32, dy: i32, threshold: i32) -> Option<Direction> {
    if dx.abs() > dy.abs() {
        if dx > threshold {
            Some(Direction::Right)
        } else if dx < -threshold {
            Some(Direction::Left)
        } else {
            None
        }
    } else if dy > threshold {
        Some(Direction::Down)
    } else if dy < -threshold {
        Some(Direction::Up)
    } else {
        None
    }
}

/// Tracks a left-button drag across mouse events.
#[derive(Debug, Clone)]
pub struct SwipeTracker {
    origin: Option<(u16, u16)>,
    threshold: u16,
}

impl SwipeTracker {
    pub fn new() -> Self {
        Self::with_threshold(SWIPE_THRESHOLD_CELLS)
    }

    pub fn with_threshold(threshold: u16) -> Self {
        Self {
            origin: None,
            threshold,
        }
    }

    pub fn is_tracking(&self) -> bool {
        self.origin.is_some()
    }

    pub fn press(&mut self, column: u16, row: u16) {
        self.origin = Some((column, row));
    }

    /// Finish the drag at `(column, row)`; `None` for taps and short drags.
    pub fn release(&mut self, column: u16, row: u16) -> Option<Direction> {
        let (c0, r0) = self.origin.take()?;
        let dx = column as i32 - c0 as i32;
        let dy = row as i32 - r0 as i32;
        swipe_direction(dx, dy, self.threshold as i32)
    }

    pub fn cancel(&mut self) {
        self.origin = None;
    }

    /// Feed a raw mouse event; yields a direction when a drag completes.
    pub fn handle_mouse_event(&mut self, event: MouseEvent) -> Option<Direction> {
        match event.kind {
            MouseEventKind::Down(MouseButton::Left) => {
                self.press(event.column, event.row);
                None
            }
            MouseEventKind::Up(MouseButton::Left) => self.release(event.column, event.row),
            _ => None,
        }
    }
}

impl Default for SwipeTracker {
    fn default() -> Self {
        Self::new()
    }
}
