//! Character-cell canvas implementing the core's `Renderer`.

use std::io::Write;

use crossterm::{
    cursor::MoveTo,
    queue,
    style::{Color, Print, ResetColor, SetForegroundColor},
};
use pingpong_core::{Arena, Renderer};

/// One character cell
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Cell {
    pub glyph: char,
    pub color: Color,
}

impl Cell {
    const EMPTY: Cell = Cell {
        glyph: ' ',
        color: Color::Reset,
    };
}

/// Arena scaled down to a grid of terminal cells
pub struct TerminalCanvas {
    cols: usize,
    rows: usize,
    /// Arena pixels per column
    scale_x: f64,
    /// Arena pixels per row
    scale_y: f64,
    cells: Vec<Cell>,
}

impl TerminalCanvas {
    pub fn new(arena: &Arena, cols: usize, rows: usize) -> Self {
        let cols = cols.max(1);
        let rows = rows.max(1);

        TerminalCanvas {
            cols,
            rows,
            scale_x: arena.width / cols as f64,
            scale_y: arena.height / rows as f64,
            cells: vec![Cell::EMPTY; cols * rows],
        }
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cell(&self, col: usize, row: usize) -> Cell {
        self.cells[row * self.cols + col]
    }

    fn col_of(&self, x: f64) -> usize {
        ((x / self.scale_x).floor().max(0.0) as usize).min(self.cols - 1)
    }

    fn row_of(&self, y: f64) -> usize {
        ((y / self.scale_y).floor().max(0.0) as usize).min(self.rows - 1)
    }

    fn put(&mut self, col: usize, row: usize, cell: Cell) {
        self.cells[row * self.cols + col] = cell;
    }

    /// Write the grid inside a box whose top-left corner is at `top`
    pub fn present<W: Write>(&self, out: &mut W, top: u16) -> std::io::Result<u16> {
        let mut row = top;
        let border = "─".repeat(self.cols);

        queue!(out, MoveTo(0, row), Print(format!("┌{border}┐")))?;
        row += 1;

        for r in 0..self.rows {
            queue!(out, MoveTo(0, row), Print("│"))?;
            for c in 0..self.cols {
                let cell = self.cell(c, r);
                queue!(out, SetForegroundColor(cell.color), Print(cell.glyph), ResetColor)?;
            }
            queue!(out, Print("│"))?;
            row += 1;
        }

        queue!(out, MoveTo(0, row), Print(format!("└{border}┘")))?;
        Ok(row + 1)
    }
}

impl Renderer for TerminalCanvas {
    fn clear_frame(&mut self) {
        self.cells.fill(Cell::EMPTY);
    }

    fn draw_rectangle(&mut self, x: f64, y: f64, width: f64, height: f64, color: &str) {
        let cell = Cell {
            glyph: '█',
            color: parse_color(color),
        };
        let (left, right) = (self.col_of(x), self.col_of(x + width));
        let (top, bottom) = (self.row_of(y), self.row_of(y + height));

        for row in top..=bottom {
            for col in left..=right {
                self.put(col, row, cell);
            }
        }
    }

    fn draw_circle(&mut self, x: f64, y: f64, _radius: f64, color: &str) {
        let cell = Cell {
            glyph: '●',
            color: parse_color(color),
        };
        self.put(self.col_of(x), self.row_of(y), cell);
    }
}

/// `#RRGGBB` to a terminal color, white when malformed
pub fn parse_color(hex: &str) -> Color {
    let digits = hex.trim_start_matches('#');
    if digits.len() != 6 || !digits.is_ascii() {
        return Color::White;
    }

    let channel = |i: usize| u8::from_str_radix(&digits[i..i + 2], 16).ok();
    match (channel(0), channel(2), channel(4)) {
        (Some(r), Some(g), Some(b)) => Color::Rgb { r, g, b },
        _ => Color::White,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canvas() -> TerminalCanvas {
        TerminalCanvas::new(&Arena::new(600.0, 700.0), 60, 35)
    }

    #[test]
    fn test_parse_color() {
        assert_eq!(parse_color("#FF0000"), Color::Rgb { r: 255, g: 0, b: 0 });
        assert_eq!(parse_color("0000ff"), Color::Rgb { r: 0, g: 0, b: 255 });
        assert_eq!(parse_color("#XYZ123"), Color::White);
        assert_eq!(parse_color("#FFF"), Color::White);
    }

    #[test]
    fn test_rectangle_cells() {
        let mut canvas = canvas();
        canvas.draw_rectangle(260.0, 660.0, 80.0, 10.0, "#FF0000");

        // 10px columns, 20px rows
        assert_eq!(canvas.cell(26, 33).glyph, '█');
        assert_eq!(canvas.cell(34, 33).glyph, '█');
        assert_eq!(canvas.cell(25, 33).glyph, ' ');
        assert_eq!(canvas.cell(30, 32).glyph, ' ');
    }

    #[test]
    fn test_circle_clamped_and_cleared() {
        let mut canvas = canvas();
        canvas.draw_circle(1000.0, -5.0, 10.0, "#FFFFFF");
        assert_eq!(canvas.cell(59, 0).glyph, '●');

        canvas.clear_frame();
        assert_eq!(canvas.cell(59, 0), Cell::EMPTY);
    }

    #[test]
    fn test_present_writes_box() {
        let canvas = TerminalCanvas::new(&Arena::new(600.0, 700.0), 4, 2);
        let mut out = Vec::new();

        let next_row = canvas.present(&mut out, 3).unwrap();

        assert_eq!(next_row, 3 + 2 + 2);
        let text = String::from_utf8_lossy(&out);
        assert!(text.contains("┌────┐"));
        assert!(text.contains("└────┘"));
    }
}
