/// Presentation layer: double-buffered, diff-based terminal renderer.
///
/// How it works:
///   1. Build the next frame into `front` buffer (array of Cell)
///   2. Compare each cell with `back` buffer (previous frame)
///   3. Only emit terminal commands for cells that changed
///   4. All commands are batched with `queue!`, flushed once at the end
///   5. Swap front/back

use std::io::{self, BufWriter, Write};
use std::time::Duration;

use crossterm::{
    cursor::{self, MoveTo},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute, queue,
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal::{self, Clear, ClearType},
};

use crate::domain::entry::{MenuEntries, SceneId};
use crate::ui::view::MenuView;

const BASE_RGB: (u8, u8, u8) = (22, 22, 35);
const BASE_BG: Color = Color::Rgb { r: BASE_RGB.0, g: BASE_RGB.1, b: BASE_RGB.2 };

const GOLD: Color = Color::Rgb { r: 255, g: 200, b: 50 };
const GREEN: Color = Color::Rgb { r: 80, g: 255, b: 80 };
const RED: Color = Color::Rgb { r: 255, g: 90, b: 90 };
const DIM: Color = Color::DarkGrey;

/// Title fades in after this delay, over `TITLE_FADE`.
const TITLE_DELAY: Duration = Duration::from_millis(2000);
const TITLE_FADE: Duration = Duration::from_millis(5000);

const TITLE_ROW: usize = 1;
const MENU_TOP: usize = 4;
const HAND_COL: usize = 4;
const NAME_COL: usize = 8;

// ── Cell: the unit of the back-buffer ──

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
struct Cell {
    ch: char,
    fg: Color,
    bg: Color,
}

impl Cell {
    const BLANK: Cell = Cell { ch: ' ', fg: Color::White, bg: BASE_BG };

    /// Sentinel that differs from every real cell; forces a full repaint.
    const INVALID: Cell = Cell { ch: '?', fg: Color::Magenta, bg: Color::Magenta };
}

// ── FrameBuffer: a 2D grid of Cells ──

struct FrameBuffer {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    fn new(w: usize, h: usize) -> Self {
        FrameBuffer { width: w, height: h, cells: vec![Cell::BLANK; w * h] }
    }

    fn resize(&mut self, w: usize, h: usize) {
        if self.width != w || self.height != h {
            self.width = w;
            self.height = h;
            self.cells = vec![Cell::BLANK; w * h];
        }
    }

    fn clear(&mut self) {
        self.cells.fill(Cell::BLANK);
    }

    fn set(&mut self, x: usize, y: usize, cell: Cell) {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x] = cell;
        }
    }

    fn get(&self, x: usize, y: usize) -> Cell {
        if x < self.width && y < self.height {
            self.cells[y * self.width + x]
        } else {
            Cell::BLANK
        }
    }

    fn put_str(&mut self, x: usize, y: usize, s: &str, fg: Color) {
        for (i, ch) in s.chars().enumerate() {
            if x + i >= self.width { break; }
            self.set(x + i, y, Cell { ch, fg, bg: BASE_BG });
        }
    }

    fn put_centered(&mut self, y: usize, s: &str, fg: Color) {
        let len = s.chars().count();
        self.put_str(self.width.saturating_sub(len) / 2, y, s, fg);
    }
}

// ── What to draw ──

pub struct MenuFrame<'a> {
    pub title: &'a str,
    pub entries: &'a MenuEntries,
    pub selected: usize,
    pub view: &'a MenuView,
    /// Rows between menu entries; matches the cursor step (at least 1).
    pub row_step: i32,
    pub since_entry: Duration,
}

pub enum Screen<'a> {
    Menu(MenuFrame<'a>),
    Scene { scene: &'a SceneId, blink: bool },
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum ScreenKind {
    Menu,
    Scene,
}

// ── Renderer ──

pub struct Renderer {
    writer: BufWriter<io::Stdout>,
    front: FrameBuffer,
    back: FrameBuffer,
    last_kind: Option<ScreenKind>,
}

impl Renderer {
    pub fn new() -> Self {
        Renderer {
            writer: BufWriter::with_capacity(16384, io::stdout()),
            front: FrameBuffer::new(0, 0),
            back: FrameBuffer::new(0, 0),
            last_kind: None,
        }
    }

    pub fn init(&mut self) -> io::Result<()> {
        terminal::enable_raw_mode()?;
        execute!(
            self.writer,
            terminal::EnterAlternateScreen,
            EnableMouseCapture,
            cursor::Hide,
            SetBackgroundColor(BASE_BG),
            Clear(ClearType::All)
        )?;

        let (tw, th) = terminal::size().unwrap_or((80, 24));
        self.front.resize(tw as usize, th as usize);
        self.back.resize(tw as usize, th as usize);
        self.back.cells.fill(Cell::INVALID);
        Ok(())
    }

    pub fn cleanup(&mut self) -> io::Result<()> {
        execute!(
            self.writer,
            ResetColor,
            DisableMouseCapture,
            cursor::Show,
            terminal::LeaveAlternateScreen
        )?;
        terminal::disable_raw_mode()
    }

    pub fn render(&mut self, screen: &Screen<'_>) -> io::Result<()> {
        let (tw, th) = terminal::size().unwrap_or((80, 24));
        let resized = tw as usize != self.front.width || th as usize != self.front.height;
        if resized {
            self.front.resize(tw as usize, th as usize);
            self.back.resize(tw as usize, th as usize);
        }

        let kind = match screen {
            Screen::Menu(_) => ScreenKind::Menu,
            Screen::Scene { .. } => ScreenKind::Scene,
        };
        if resized || self.last_kind != Some(kind) {
            self.back.cells.fill(Cell::INVALID);
            queue!(self.writer, SetBackgroundColor(BASE_BG), Clear(ClearType::All))?;
            self.last_kind = Some(kind);
        }

        self.front.clear();
        match screen {
            Screen::Menu(frame) => self.compose_menu(frame),
            Screen::Scene { scene, blink } => self.compose_scene(scene, *blink),
        }

        self.flush_diff()?;
        std::mem::swap(&mut self.front, &mut self.back);
        Ok(())
    }

    // ── Diff flush: only write changed cells ──

    fn flush_diff(&mut self) -> io::Result<()> {
        let mut last_fg = Color::White;
        let mut last_bg = BASE_BG;

        // Explicit base colors: ResetColor would fall back to the terminal's
        // own default background.
        queue!(self.writer, SetForegroundColor(last_fg), SetBackgroundColor(last_bg))?;

        for y in 0..self.front.height {
            let mut need_move = true;
            for x in 0..self.front.width {
                let cell = self.front.get(x, y);
                if cell == self.back.get(x, y) {
                    need_move = true;
                    continue;
                }
                if need_move {
                    queue!(self.writer, MoveTo(x as u16, y as u16))?;
                    need_move = false;
                }
                if cell.fg != last_fg {
                    queue!(self.writer, SetForegroundColor(cell.fg))?;
                    last_fg = cell.fg;
                }
                if cell.bg != last_bg {
                    queue!(self.writer, SetBackgroundColor(cell.bg))?;
                    last_bg = cell.bg;
                }
                queue!(self.writer, Print(cell.ch))?;
            }
        }

        self.writer.flush()
    }

    // ── Compose: build front buffer content ──

    fn compose_menu(&mut self, f: &MenuFrame<'_>) {
        let title_fg = blend(BASE_RGB, (255, 255, 255), title_alpha(f.since_entry));
        self.front.put_centered(TITLE_ROW, f.title, title_fg);

        // Audio icons share one slot in the top-right corner.
        let icon_col = self.front.width.saturating_sub(14);
        if f.view.audio_icon {
            let label = format!("♪ MUSIC {:>3}%", (f.view.volume * 100.0).round() as u32);
            self.front.put_str(icon_col, TITLE_ROW, &label, GREEN);
        }
        if f.view.muted_icon {
            self.front.put_str(icon_col, TITLE_ROW, "✕ MUTED      ", RED);
        }

        let step = f.row_step as usize;
        for entry in f.entries.iter() {
            let row = MENU_TOP + entry.ordinal * step;
            let fg = if entry.ordinal == f.selected { GOLD } else { Color::White };
            self.front.put_str(NAME_COL, row, &entry.display_name, fg);
        }

        if let Some(row) = cursor_row(f.view.cursor_offset) {
            self.front.put_str(HAND_COL, row, "☞", GOLD);
        }

        let footer = MENU_TOP + f.entries.len() * step + 1;
        let help = "↑↓ Select   ENTER Play   M / Click Music   ESC Quit";
        self.front.put_str(NAME_COL, footer, help, DIM);
    }

    fn compose_scene(&mut self, scene: &SceneId, blink: bool) {
        let mid = self.front.height / 2;
        let banner = format!("══  {}  ══", scene.as_str().to_uppercase());
        self.front.put_centered(mid.saturating_sub(2), &banner, GOLD);
        self.front.put_centered(mid, "Insert coin to continue", Color::White);
        if blink {
            self.front.put_centered(mid + 2, "press any key to return", DIM);
        }
    }
}

// ── Pure helpers ──

/// Title opacity in 0.0..=1.0 for time since the menu was entered.
fn title_alpha(since_entry: Duration) -> f32 {
    let shown = since_entry.saturating_sub(TITLE_DELAY);
    (shown.as_secs_f32() / TITLE_FADE.as_secs_f32()).clamp(0.0, 1.0)
}

/// Linear blend from `from` to `to` by `t`.
fn blend(from: (u8, u8, u8), to: (u8, u8, u8), t: f32) -> Color {
    let mix = |a: u8, b: u8| (a as f32 + (b as f32 - a as f32) * t).round() as u8;
    Color::Rgb { r: mix(from.0, to.0), g: mix(from.1, to.1), b: mix(from.2, to.2) }
}

/// Screen row for a cursor offset; `None` if it would sit above the menu.
fn cursor_row(offset: i32) -> Option<usize> {
    let row = MENU_TOP as i64 + offset as i64;
    usize::try_from(row).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_hidden_during_delay() {
        assert_eq!(title_alpha(Duration::ZERO), 0.0);
        assert_eq!(title_alpha(Duration::from_millis(1999)), 0.0);
    }

    #[test]
    fn title_fades_in_linearly_then_holds() {
        assert!((title_alpha(Duration::from_millis(4500)) - 0.5).abs() < 1e-4);
        assert_eq!(title_alpha(Duration::from_secs(7)), 1.0);
        assert_eq!(title_alpha(Duration::from_secs(60)), 1.0);
    }

    #[test]
    fn blend_endpoints() {
        assert_eq!(blend(BASE_RGB, (255, 255, 255), 0.0), BASE_BG);
        assert_eq!(blend(BASE_RGB, (255, 255, 255), 1.0), Color::Rgb { r: 255, g: 255, b: 255 });
    }

    #[test]
    fn cursor_row_follows_offset() {
        assert_eq!(cursor_row(0), Some(MENU_TOP));
        assert_eq!(cursor_row(6), Some(MENU_TOP + 6));
        assert_eq!(cursor_row(-(MENU_TOP as i32) - 1), None);
    }

    #[test]
    fn put_str_clips_at_right_edge() {
        let mut fb = FrameBuffer::new(4, 1);
        fb.put_str(2, 0, "abcdef", Color::White);
        assert_eq!(fb.get(3, 0).ch, 'b');
        assert_eq!(fb.get(1, 0), Cell::BLANK);
    }
}
