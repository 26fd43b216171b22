//! GameView: maps a `core::GameSnapshot` into a terminal framebuffer.
//!
//! This module is pure (no I/O). It can be unit-tested.

use crate::core::GameSnapshot;
use crate::fb::{decimal_width, CellStyle, FrameBuffer, Rgb};
use crate::types::Tile;

/// Terminal viewport dimensions.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: u16,
    pub height: u16,
}

impl Viewport {
    pub fn new(width: u16, height: u16) -> Self {
        Self { width, height }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AdapterStatusView {
    pub enabled: bool,
    pub client_count: u16,
    pub controller_id: Option<usize>,
    pub streaming_count: u16,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnchorY {
    Center,
    Top,
}

const TEXT: Rgb = Rgb::from_hex(0x776e65);
const TEXT_LIGHT: Rgb = Rgb::from_hex(0xf9f6f2);
const BOARD_BG: Rgb = Rgb::from_hex(0xbbada0);
const SCREEN_BG: Rgb = Rgb::new(0, 0, 0);
const FALLBACK_BG: Rgb = Rgb::from_hex(0x3c3a32);

/// Background color of a tile.
pub fn tile_color(value: Tile) -> Rgb {
    match value {
        0 => Rgb::from_hex(0xf9f6f2),
        2 => Rgb::from_hex(0xffd1dc),
        4 => Rgb::from_hex(0xfbcdfd),
        8 => Rgb::from_hex(0xffe4e1),
        16 => Rgb::from_hex(0xffe8b3),
        32 => Rgb::from_hex(0xc5f5dc),
        64 => Rgb::from_hex(0xcce7ff),
        128 => Rgb::from_hex(0xfce7f3),
        256 => Rgb::from_hex(0xe9d8fd),
        512 => Rgb::from_hex(0xfffacc),
        1024 => Rgb::from_hex(0xffdef0),
        2048 => Rgb::from_hex(0xffe3f3),
        _ => FALLBACK_BG,
    }
}

fn tile_style(value: Tile) -> CellStyle {
    let bg = tile_color(value);
    let fg = if bg == FALLBACK_BG { TEXT_LIGHT } else { TEXT };
    CellStyle::new(fg, bg).bold()
}

/// A lightweight terminal renderer for the 2048 board.
pub struct GameView {
    /// Tile width in terminal columns.
    cell_w: u16,
    /// Tile height in terminal rows.
    cell_h: u16,
    anchor_y: AnchorY,
}

impl Default for GameView {
    fn default() -> Self {
        // 7x3 fits a six digit value with a margin and keeps tiles roughly square.
        Self {
            cell_w: 7,
            cell_h: 3,
            anchor_y: AnchorY::Center,
        }
    }
}

impl GameView {
    pub fn new(cell_w: u16, cell_h: u16) -> Self {
        Self {
            cell_w: cell_w.max(1),
            cell_h: cell_h.max(1),
            anchor_y: AnchorY::Center,
        }
    }

    pub fn with_anchor_y(mut self, anchor_y: AnchorY) -> Self {
        self.anchor_y = anchor_y;
        self
    }

    /// Outer size (border included) of the board for an `n`×`n` grid.
    pub fn frame_size(&self, n: usize) -> (u16, u16) {
        let n = n as u16;
        // One column/row of board background between and around tiles.
        let inner_w = n * (self.cell_w + 1) + 1;
        let inner_h = n * (self.cell_h + 1) + 1;
        (inner_w + 2, inner_h + 2)
    }

    /// Render the current game state into an existing framebuffer.
    ///
    /// Callers can reuse a framebuffer across frames and only resize when the
    /// terminal size changes.
    pub fn render_into(&self, snap: &GameSnapshot, viewport: Viewport, fb: &mut FrameBuffer) {
        self.render_into_with_adapter(snap, None, viewport, fb);
    }

    pub fn render_into_with_adapter(
        &self,
        snap: &GameSnapshot,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        fb: &mut FrameBuffer,
    ) {
        fb.resize(viewport.width, viewport.height);
        fb.clear(CellStyle::default().into_cell(' '));

        let (frame_w, frame_h) = self.frame_size(snap.size);
        let start_x = viewport.width.saturating_sub(frame_w) / 2;
        let start_y = match self.anchor_y {
            AnchorY::Center => viewport.height.saturating_sub(frame_h) / 2,
            AnchorY::Top => 0,
        };

        let border = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);
        let board_bg = CellStyle::new(TEXT, BOARD_BG);

        fb.fill_rect(start_x + 1, start_y + 1, frame_w - 2, frame_h - 2, ' ', board_bg);
        self.draw_border(fb, start_x, start_y, frame_w, frame_h, border);

        for row in 0..snap.size {
            for col in 0..snap.size {
                let value = snap.tile(row, col);
                let highlight = snap
                    .last_spawn
                    .is_some_and(|s| s.row == row && s.col == col);
                self.draw_tile(fb, start_x, start_y, row as u16, col as u16, value, highlight);
            }
        }

        self.draw_side_panel(fb, snap, adapter, viewport, start_x, start_y, frame_w);

        if snap.won() {
            self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "YOU WIN!");
        } else if snap.lost() {
            self.draw_overlay_text(fb, start_x, start_y, frame_w, frame_h, "GAME OVER");
        }
    }

    /// Convenience helper that allocates a new framebuffer.
    pub fn render(&self, snap: &GameSnapshot, viewport: Viewport) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into(snap, viewport, &mut fb);
        fb
    }

    pub fn render_with_adapter(
        &self,
        snap: &GameSnapshot,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
    ) -> FrameBuffer {
        let mut fb = FrameBuffer::new(viewport.width, viewport.height);
        self.render_into_with_adapter(snap, adapter, viewport, &mut fb);
        fb
    }

    fn draw_border(&self, fb: &mut FrameBuffer, x: u16, y: u16, w: u16, h: u16, style: CellStyle) {
        if w < 2 || h < 2 {
            return;
        }

        fb.put_char(x, y, '┌', style);
        fb.put_char(x + w - 1, y, '┐', style);
        fb.put_char(x, y + h - 1, '└', style);
        fb.put_char(x + w - 1, y + h - 1, '┘', style);

        for dx in 1..w - 1 {
            fb.put_char(x + dx, y, '─', style);
            fb.put_char(x + dx, y + h - 1, '─', style);
        }
        for dy in 1..h - 1 {
            fb.put_char(x, y + dy, '│', style);
            fb.put_char(x + w - 1, y + dy, '│', style);
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_tile(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        row: u16,
        col: u16,
        value: Tile,
        highlight: bool,
    ) {
        let px = start_x + 2 + col * (self.cell_w + 1);
        let py = start_y + 2 + row * (self.cell_h + 1);
        let mut style = tile_style(value);
        fb.fill_rect(px, py, self.cell_w, self.cell_h, ' ', style);

        if value == 0 {
            return;
        }
        if highlight {
            style.fg = Rgb::new(200, 60, 110);
        }
        let label_w = decimal_width(value as u64);
        let lx = px + self.cell_w.saturating_sub(label_w) / 2;
        let ly = py + self.cell_h / 2;
        fb.put_u32(lx, ly, value, style);
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_side_panel(
        &self,
        fb: &mut FrameBuffer,
        snap: &GameSnapshot,
        adapter: Option<&AdapterStatusView>,
        viewport: Viewport,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
    ) {
        let panel_x = start_x.saturating_add(frame_w).saturating_add(2);
        if panel_x >= viewport.width {
            return;
        }
        let panel_w = viewport.width - panel_x;
        if panel_w < 10 {
            return;
        }

        let label = CellStyle::new(Rgb::new(220, 220, 220), SCREEN_BG).bold();
        let value = CellStyle::new(Rgb::new(200, 200, 200), SCREEN_BG);
        let dim = value.dim();

        let mut y = start_y;
        fb.put_str(panel_x, y, "2048", CellStyle::new(tile_color(2), SCREEN_BG).bold());
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "SCORE", label);
        y = y.saturating_add(1);
        fb.put_u64(panel_x, y, snap.score, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "BEST TILE", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.best_tile(), value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "MOVES", label);
        y = y.saturating_add(1);
        fb.put_u32(panel_x, y, snap.moves, value);
        y = y.saturating_add(2);

        fb.put_str(panel_x, y, "AI", label);
        y = y.saturating_add(1);
        match adapter {
            Some(st) if st.enabled => {
                fb.put_str(panel_x, y, "ON", value);
                if panel_w >= 16 {
                    fb.put_str(panel_x + 3, y, "clients", dim);
                }
                y = y.saturating_add(1);
                fb.put_str(panel_x, y, "C", value);
                fb.put_u32(panel_x + 2, y, st.client_count as u32, value);
                y = y.saturating_add(1);
                fb.put_str(panel_x, y, "S", value);
                fb.put_u32(panel_x + 2, y, st.streaming_count as u32, value);
                y = y.saturating_add(1);
                fb.put_str(panel_x, y, "CTRL", value);
                if let Some(id) = st.controller_id {
                    fb.put_u64(panel_x + 5, y, id as u64, value);
                } else {
                    fb.put_str(panel_x + 5, y, "-", value);
                }
            }
            _ => fb.put_str(panel_x, y, "OFF", value),
        }
        y = y.saturating_add(2);

        if y < viewport.height {
            fb.put_str(panel_x, y, "Reach ", dim);
            fb.put_u32(panel_x + 6, y, snap.target, dim);
        }
    }

    fn draw_overlay_text(
        &self,
        fb: &mut FrameBuffer,
        start_x: u16,
        start_y: u16,
        frame_w: u16,
        frame_h: u16,
        text: &str,
    ) {
        let style = CellStyle::new(Rgb::new(255, 255, 255), SCREEN_BG).bold();
        let hint = "r: restart";
        let mid_y = start_y.saturating_add(frame_h / 2);

        for (dy, line) in [(0u16, text), (1, hint)] {
            let text_w = line.chars().count() as u16;
            let x = start_x.saturating_add(frame_w.saturating_sub(text_w + 2) / 2);
            // Pad one cell either side so the text reads over the tiles.
            fb.fill_rect(x, mid_y + dy, text_w + 2, 1, ' ', style);
            fb.put_str(x + 1, mid_y + dy, line, if dy == 0 { style } else { style.dim() });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette() {
        assert_eq!(tile_color(0), Rgb::from_hex(0xf9f6f2));
        assert_eq!(tile_color(2048), Rgb::from_hex(0xffe3f3));
        assert_eq!(tile_color(4096), FALLBACK_BG);
        assert_eq!(tile_style(4096).fg, TEXT_LIGHT);
        assert_eq!(tile_style(2).fg, TEXT);
    }

    #[test]
    fn test_frame_size() {
        let view = GameView::default();
        assert_eq!(view.frame_size(4), (35, 19));
        assert_eq!(GameView::new(2, 1).frame_size(3), (12, 9));
    }
}
