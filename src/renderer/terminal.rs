//! Terminal render surface
//!
//! Draw calls rasterise into a character grid scaled from field pixels to
//! terminal cells. `present` writes the grid out with crossterm.

use std::io::Write;

use crossterm::{QueueableCommand, cursor, style, terminal};
use glam::IVec2;

use super::{Canvas, Color, Sprite, TextSize};
use crate::sim::{AsteroidTint, Field, Rect};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Cell {
    ch: char,
    color: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    color: Color::White,
};

pub struct TerminalCanvas<W: Write> {
    out: W,
    field: Field,
    cols: u16,
    rows: u16,
    cells: Vec<Cell>,
}

impl<W: Write> TerminalCanvas<W> {
    pub fn new(out: W, field: Field, cols: u16, rows: u16) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);
        Self {
            out,
            field,
            cols,
            rows,
            cells: vec![BLANK; cols as usize * rows as usize],
        }
    }

    /// Follow a terminal resize
    pub fn resize(&mut self, cols: u16, rows: u16) {
        self.cols = cols.max(1);
        self.rows = rows.max(1);
        self.cells = vec![BLANK; self.cols as usize * self.rows as usize];
    }

    pub fn size(&self) -> (u16, u16) {
        (self.cols, self.rows)
    }

    /// Character at a cell, if inside the grid
    pub fn char_at(&self, col: u16, row: u16) -> Option<char> {
        self.index(col as i32, row as i32).map(|i| self.cells[i].ch)
    }

    /// Row `row` of the grid as a string
    pub fn row_text(&self, row: u16) -> String {
        (0..self.cols)
            .filter_map(|col| self.char_at(col, row))
            .collect()
    }

    fn index(&self, col: i32, row: i32) -> Option<usize> {
        if col < 0 || row < 0 || col >= self.cols as i32 || row >= self.rows as i32 {
            return None;
        }
        Some(row as usize * self.cols as usize + col as usize)
    }

    /// Field pixel to terminal cell
    fn to_cell(&self, p: IVec2) -> (i32, i32) {
        let col = (p.x as i64 * self.cols as i64).div_euclid(self.field.width as i64);
        let row = (p.y as i64 * self.rows as i64).div_euclid(self.field.height as i64);
        (col as i32, row as i32)
    }

    fn put(&mut self, col: i32, row: i32, ch: char, color: Color) {
        if let Some(i) = self.index(col, row) {
            self.cells[i] = Cell { ch, color };
        }
    }

    /// Fill every cell the rectangle covers (at least one)
    fn fill(&mut self, rect: Rect, ch: char, color: Color) {
        let (c0, r0) = self.to_cell(IVec2::new(rect.left(), rect.top()));
        let (c1, r1) = self.to_cell(IVec2::new(rect.right() - 1, rect.bottom() - 1));
        for row in r0..=r1.max(r0) {
            for col in c0..=c1.max(c0) {
                self.put(col, row, ch, color);
            }
        }
    }
}

fn glyph(sprite: Sprite) -> (char, Color) {
    match sprite {
        Sprite::Star => ('*', Color::Yellow),
        Sprite::Ufo => ('@', Color::Green),
        Sprite::Asteroid(AsteroidTint::Red) => ('O', Color::Red),
        Sprite::Asteroid(AsteroidTint::Blue) => ('O', Color::Blue),
        Sprite::Explosion(1) => ('#', Color::Yellow),
        Sprite::Explosion(2) => ('x', Color::OrangeRed),
        Sprite::Explosion(_) => ('.', Color::Grey),
        Sprite::Ship => ('>', Color::Cyan),
        Sprite::AidKit => ('+', Color::Green),
    }
}

fn term_color(color: Color) -> style::Color {
    match color {
        Color::White => style::Color::White,
        Color::Grey => style::Color::DarkGrey,
        Color::OrangeRed => style::Color::DarkYellow,
        Color::Red => style::Color::Red,
        Color::Blue => style::Color::Blue,
        Color::Yellow => style::Color::Yellow,
        Color::Green => style::Color::Green,
        Color::Cyan => style::Color::Cyan,
    }
}

impl<W: Write> Canvas for TerminalCanvas<W> {
    fn clear(&mut self) {
        self.cells.fill(BLANK);
    }

    fn draw_sprite(&mut self, sprite: Sprite, rect: Rect) {
        let (ch, color) = glyph(sprite);
        self.fill(rect, ch, color);
    }

    fn draw_rect(&mut self, rect: Rect, color: Color) {
        self.fill(rect, '-', color);
    }

    fn draw_line(&mut self, from: IVec2, to: IVec2, color: Color) {
        let (c0, r0) = self.to_cell(from);
        let (c1, r1) = self.to_cell(to);
        let steps = (c1 - c0).abs().max((r1 - r0).abs());
        if steps == 0 {
            self.put(c0, r0, '.', color);
            return;
        }
        for s in 0..=steps {
            let col = c0 + (c1 - c0) * s / steps;
            let row = r0 + (r1 - r0) * s / steps;
            self.put(col, row, '.', color);
        }
    }

    fn draw_text(&mut self, pos: IVec2, text: &str, color: Color, size: TextSize) {
        let (mut col, row) = self.to_cell(pos);
        let text = match size {
            TextSize::Normal => text.to_string(),
            TextSize::Banner => text.to_uppercase(),
        };
        if size == TextSize::Banner {
            // Banners are centred on the grid rather than scaled
            let width = text.chars().count() as i32;
            col = (self.cols as i32 - width) / 2;
        }
        for (i, ch) in text.chars().enumerate() {
            self.put(col + i as i32, row, ch, color);
        }
    }

    fn present(&mut self) -> std::io::Result<()> {
        self.out.queue(cursor::MoveTo(0, 0))?;
        self.out
            .queue(terminal::Clear(terminal::ClearType::FromCursorDown))?;

        let mut current: Option<Color> = None;
        for row in 0..self.rows {
            self.out.queue(cursor::MoveTo(0, row))?;
            let start = row as usize * self.cols as usize;
            for i in start..start + self.cols as usize {
                let cell = self.cells[i];
                if current != Some(cell.color) {
                    self.out
                        .queue(style::SetForegroundColor(term_color(cell.color)))?;
                    current = Some(cell.color);
                }
                self.out.queue(style::Print(cell.ch))?;
            }
        }

        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> TerminalCanvas<Vec<u8>> {
        // 10 px per cell on both axes
        TerminalCanvas::new(Vec::new(), Field::new(800, 600).unwrap(), 80, 60)
    }

    #[test]
    fn test_sprite_fills_scaled_cells() {
        let mut c = canvas();
        c.draw_sprite(Sprite::Ship, Rect::new(10, 300, 36, 26));
        assert_eq!(c.char_at(1, 30), Some('>'));
        assert_eq!(c.char_at(4, 32), Some('>'));
        assert_eq!(c.char_at(5, 30), Some(' '));
    }

    #[test]
    fn test_tiny_rect_still_visible() {
        let mut c = canvas();
        c.draw_rect(Rect::new(405, 110, 4, 1), Color::OrangeRed);
        assert_eq!(c.char_at(40, 11), Some('-'));
    }

    #[test]
    fn test_offscreen_draws_are_clipped() {
        let mut c = canvas();
        c.draw_sprite(Sprite::Star, Rect::new(-100, -100, 15, 15));
        c.draw_sprite(Sprite::Star, Rect::new(900, 700, 15, 15));
        assert!((0..60).all(|row| c.row_text(row).trim().is_empty()));
    }

    #[test]
    fn test_text_and_clear() {
        let mut c = canvas();
        c.draw_text(IVec2::ZERO, "Energy: 100", Color::White, TextSize::Normal);
        assert!(c.row_text(0).starts_with("Energy: 100"));
        c.clear();
        assert!(c.row_text(0).trim().is_empty());
    }

    #[test]
    fn test_banner_is_centred() {
        let mut c = canvas();
        c.draw_text(IVec2::new(0, 300), "The End", Color::White, TextSize::Banner);
        let row = c.row_text(30);
        assert_eq!(row.find("THE END"), Some((80 - 7) / 2));
    }

    #[test]
    fn test_present_writes_grid() {
        let mut c = canvas();
        c.draw_text(IVec2::ZERO, "Score: 0", Color::Yellow, TextSize::Normal);
        c.present().unwrap();
        let written = String::from_utf8_lossy(&c.out).to_string();
        assert!(written.contains('S'));
        assert!(!c.out.is_empty());
    }

    #[test]
    fn test_resize_resets_grid() {
        let mut c = canvas();
        c.draw_text(IVec2::ZERO, "x", Color::White, TextSize::Normal);
        c.resize(40, 20);
        assert_eq!(c.size(), (40, 20));
        assert_eq!(c.char_at(0, 0), Some(' '));
        assert_eq!(c.char_at(40, 0), None);
    }
}
