//! Crossterm platform layer: the terminal is the game window.
//!
//! World coordinates are scaled onto the terminal grid, so the game runs at
//! its configured resolution whatever the terminal size. Drawing goes to an
//! in-memory cell canvas that is flushed in one pass by `present`.

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::mpsc;
use std::thread;

use crossterm::{
    cursor,
    event::{
        self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseButton, MouseEventKind,
    },
    style::{self, Print},
    QueueableCommand,
};

use crate::geometry::{Rect, Vec2};
use crate::platform::{Color, FrameInput, HeldKeys, Input, InputEvent, Key, Renderer};

fn term_color(c: Color) -> style::Color {
    style::Color::Rgb {
        r: c.r,
        g: c.g,
        b: c.b,
    }
}

/// Maps between world pixels and terminal cells.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Viewport {
    pub cols: u16,
    pub rows: u16,
    pub world_width: f32,
    pub world_height: f32,
}

impl Viewport {
    pub fn new(cols: u16, rows: u16, world_width: f32, world_height: f32) -> Self {
        Self {
            cols: cols.max(1),
            rows: rows.max(1),
            world_width,
            world_height,
        }
    }

    /// World pixels per cell, horizontally.
    fn cell_width(&self) -> f32 {
        self.world_width / self.cols as f32
    }

    fn cell_height(&self) -> f32 {
        self.world_height / self.rows as f32
    }

    /// Cell containing a world point, if it is on screen.
    pub fn to_cell(&self, p: Vec2) -> Option<(u16, u16)> {
        let col = (p.x / self.cell_width()).floor();
        let row = (p.y / self.cell_height()).floor();
        if col < 0.0 || row < 0.0 || col >= self.cols as f32 || row >= self.rows as f32 {
            return None;
        }
        Some((col as u16, row as u16))
    }

    /// World point at the centre of a cell.
    pub fn to_world(&self, col: u16, row: u16) -> Vec2 {
        Vec2::new(
            (col as f32 + 0.5) * self.cell_width(),
            (row as f32 + 0.5) * self.cell_height(),
        )
    }

    /// Cell span covered by a world rectangle, clipped to the grid.
    fn cell_span(&self, rect: Rect) -> Option<(u16, u16, u16, u16)> {
        let x0 = (rect.x / self.cell_width()).floor().max(0.0);
        let y0 = (rect.y / self.cell_height()).floor().max(0.0);
        let x1 = (rect.right() / self.cell_width()).ceil().min(self.cols as f32);
        let y1 = (rect.bottom() / self.cell_height()).ceil().min(self.rows as f32);
        if x1 <= x0 || y1 <= y0 {
            return None;
        }
        Some((x0 as u16, y0 as u16, x1 as u16, y1 as u16))
    }
}

// ── Renderer ──────────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Cell {
    pub ch: char,
    pub fg: Color,
    pub bg: Color,
}

const BLANK: Cell = Cell {
    ch: ' ',
    fg: Color::WHITE,
    bg: Color::BLACK,
};

pub struct TerminalRenderer<W: Write> {
    out: W,
    viewport: Viewport,
    cells: Vec<Cell>,
}

impl<W: Write> TerminalRenderer<W> {
    pub fn new(out: W, viewport: Viewport) -> Self {
        let size = viewport.cols as usize * viewport.rows as usize;
        Self {
            out,
            viewport,
            cells: vec![BLANK; size],
        }
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Adopt a new terminal size; the canvas is cleared.
    pub fn resize(&mut self, cols: u16, rows: u16) {
        let Viewport {
            world_width,
            world_height,
            ..
        } = self.viewport;
        self.viewport = Viewport::new(cols, rows, world_width, world_height);
        self.cells = vec![BLANK; self.viewport.cols as usize * self.viewport.rows as usize];
    }

    pub fn cell(&self, col: u16, row: u16) -> Option<&Cell> {
        if col >= self.viewport.cols || row >= self.viewport.rows {
            return None;
        }
        self.cells
            .get(row as usize * self.viewport.cols as usize + col as usize)
    }

    fn cell_mut(&mut self, col: u16, row: u16) -> Option<&mut Cell> {
        if col >= self.viewport.cols || row >= self.viewport.rows {
            return None;
        }
        let cols = self.viewport.cols as usize;
        self.cells.get_mut(row as usize * cols + col as usize)
    }

    fn put(&mut self, p: Vec2, ch: char, fg: Color) {
        if let Some((col, row)) = self.viewport.to_cell(p) {
            if let Some(cell) = self.cell_mut(col, row) {
                cell.ch = ch;
                cell.fg = fg;
            }
        }
    }

    fn write_at(&mut self, col: i32, row: u16, text: &str, fg: Color) {
        for (i, ch) in text.chars().enumerate() {
            let c = col + i as i32;
            if c < 0 {
                continue;
            }
            if let Some(cell) = self.cell_mut(c as u16, row) {
                cell.ch = ch;
                cell.fg = fg;
            }
        }
    }
}

impl<W: Write> Renderer for TerminalRenderer<W> {
    type Error = io::Error;

    fn clear(&mut self, color: Color) {
        for cell in &mut self.cells {
            *cell = Cell {
                ch: ' ',
                fg: Color::WHITE,
                bg: color,
            };
        }
    }

    fn fill_rect(&mut self, rect: Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = self.viewport.cell_span(rect) else {
            return;
        };
        for row in y0..y1 {
            for col in x0..x1 {
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.bg = color;
                    cell.ch = ' ';
                }
            }
        }
    }

    fn stroke_rect(&mut self, rect: Rect, color: Color) {
        let Some((x0, y0, x1, y1)) = self.viewport.cell_span(rect) else {
            return;
        };
        let (right, bottom) = (x1 - 1, y1 - 1);
        for col in x0..x1 {
            for row in [y0, bottom] {
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.ch = '─';
                    cell.fg = color;
                }
            }
        }
        for row in y0..y1 {
            for col in [x0, right] {
                if let Some(cell) = self.cell_mut(col, row) {
                    cell.ch = '│';
                    cell.fg = color;
                }
            }
        }
        let corners = [
            (x0, y0, '┌'),
            (right, y0, '┐'),
            (x0, bottom, '└'),
            (right, bottom, '┘'),
        ];
        for (col, row, ch) in corners {
            if let Some(cell) = self.cell_mut(col, row) {
                cell.ch = ch;
            }
        }
    }

    fn circle(&mut self, center: Vec2, radius: f32, color: Color) {
        let bounds = Rect::centered(center, radius * 2.0);
        let Some((x0, y0, x1, y1)) = self.viewport.cell_span(bounds) else {
            return;
        };
        let mut drawn = false;
        for row in y0..y1 {
            for col in x0..x1 {
                let p = self.viewport.to_world(col, row);
                if p.distance(center) <= radius {
                    if let Some(cell) = self.cell_mut(col, row) {
                        cell.ch = '●';
                        cell.fg = color;
                        drawn = true;
                    }
                }
            }
        }
        // smaller than a cell: mark the cell under the centre
        if !drawn {
            self.put(center, '•', color);
        }
    }

    fn line(&mut self, from: Vec2, to: Vec2, color: Color) {
        let (Some(a), Some(b)) = (self.viewport.to_cell(from), self.viewport.to_cell(to)) else {
            self.put(from, '·', color);
            return;
        };
        let steps = (a.0.abs_diff(b.0)).max(a.1.abs_diff(b.1)).max(1);
        for i in 1..=steps {
            let t = i as f32 / steps as f32;
            self.put(from + (to - from) * t, '·', color);
        }
    }

    fn text(&mut self, pos: Vec2, text: &str, color: Color) {
        if let Some((col, row)) = self.viewport.to_cell(pos) {
            self.write_at(col as i32, row, text, color);
        }
    }

    fn text_centered(&mut self, pos: Vec2, text: &str, color: Color) {
        if let Some((col, row)) = self.viewport.to_cell(pos) {
            let start = col as i32 - text.chars().count() as i32 / 2;
            self.write_at(start, row, text, color);
        }
    }

    fn present(&mut self) -> io::Result<()> {
        let cols = self.viewport.cols as usize;
        let mut current: Option<(Color, Color)> = None;
        for (row, line) in self.cells.chunks(cols).enumerate() {
            self.out.queue(cursor::MoveTo(0, row as u16))?;
            for cell in line {
                if current != Some((cell.fg, cell.bg)) {
                    self.out.queue(style::SetForegroundColor(term_color(cell.fg)))?;
                    self.out.queue(style::SetBackgroundColor(term_color(cell.bg)))?;
                    current = Some((cell.fg, cell.bg));
                }
                self.out.queue(Print(cell.ch))?;
            }
        }
        self.out.queue(style::ResetColor)?;
        self.out.flush()
    }
}

// ── Input ─────────────────────────────────────────────────────────────────────

/// A key counts as held if its last press/repeat event arrived within this
/// many frames. Covers terminals that never report key releases: OS key
/// repeat refreshes the entry before it expires.
pub const HOLD_WINDOW: u64 = 8;

/// Spawn a thread that blocks on terminal events and forwards them, so the
/// frame loop never blocks on I/O.
pub fn spawn_event_reader() -> mpsc::Receiver<Event> {
    let (tx, rx) = mpsc::channel::<Event>();
    thread::spawn(move || loop {
        match event::read() {
            Ok(ev) => {
                if tx.send(ev).is_err() {
                    break;
                }
            }
            Err(e) => {
                tracing::warn!("Terminal event read failed: {}", e);
                break;
            }
        }
    });
    rx
}

/// Keyboard and mouse from crossterm events.
///
/// Held state works on two classes of terminal: those with keyboard
/// enhancement send releases and keys are dropped on release; classic
/// ones only repeat presses and keys expire after [`HOLD_WINDOW`] frames.
pub struct TerminalInput {
    rx: mpsc::Receiver<Event>,
    viewport: Viewport,
    key_frame: HashMap<KeyCode, u64>,
    frame: u64,
    pointer: Vec2,
    mouse_fire: bool,
}

impl TerminalInput {
    pub fn new(rx: mpsc::Receiver<Event>, viewport: Viewport) -> Self {
        Self {
            rx,
            pointer: Vec2::new(viewport.world_width / 2.0, 0.0),
            viewport,
            key_frame: HashMap::new(),
            frame: 0,
            mouse_fire: false,
        }
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    fn is_held(&self, key: &KeyCode) -> bool {
        self.key_frame
            .get(key)
            .is_some_and(|&last| self.frame.saturating_sub(last) <= HOLD_WINDOW)
    }

    fn any_held(&self, keys: &[KeyCode]) -> bool {
        keys.iter().any(|k| self.is_held(k))
    }

    fn held(&self) -> HeldKeys {
        HeldKeys {
            up: self.any_held(&[KeyCode::Up, KeyCode::Char('w')]),
            down: self.any_held(&[KeyCode::Down, KeyCode::Char('s')]),
            left: self.any_held(&[KeyCode::Left, KeyCode::Char('a')]),
            right: self.any_held(&[KeyCode::Right, KeyCode::Char('d')]),
            fire: self.is_held(&KeyCode::Char(' ')) || self.mouse_fire,
        }
    }

    fn on_key(&mut self, key: KeyEvent, frame: &mut FrameInput) {
        let code = normalize(key.code);
        match key.kind {
            KeyEventKind::Press => {
                self.key_frame.insert(code, self.frame);
                if key.modifiers.contains(KeyModifiers::CONTROL) && code == KeyCode::Char('c') {
                    frame.quit = true;
                } else if let Some(k) = map_key(code) {
                    frame.events.push(InputEvent::KeyPressed(k));
                }
            }
            KeyEventKind::Repeat => {
                self.key_frame.insert(code, self.frame);
            }
            KeyEventKind::Release => {
                self.key_frame.remove(&code);
            }
        }
    }
}

impl Input for TerminalInput {
    fn sample(&mut self) -> FrameInput {
        self.frame += 1;
        let mut frame = FrameInput::default();

        while let Ok(ev) = self.rx.try_recv() {
            match ev {
                Event::Key(key) => self.on_key(key, &mut frame),
                Event::Mouse(mouse) => {
                    self.pointer = self.viewport.to_world(mouse.column, mouse.row);
                    match mouse.kind {
                        MouseEventKind::Down(MouseButton::Left) => {
                            self.mouse_fire = true;
                            frame.events.push(InputEvent::Click(self.pointer));
                        }
                        MouseEventKind::Up(MouseButton::Left) => self.mouse_fire = false,
                        _ => {}
                    }
                }
                Event::Resize(cols, rows) => {
                    self.viewport = Viewport::new(
                        cols,
                        rows,
                        self.viewport.world_width,
                        self.viewport.world_height,
                    );
                }
                _ => {}
            }
        }

        frame.held = self.held();
        frame.pointer = self.pointer;
        frame
    }
}

/// Letters are tracked case-insensitively.
fn normalize(code: KeyCode) -> KeyCode {
    match code {
        KeyCode::Char(c) => KeyCode::Char(c.to_ascii_lowercase()),
        other => other,
    }
}

fn map_key(code: KeyCode) -> Option<Key> {
    match code {
        KeyCode::Char(' ') => Some(Key::Fire),
        KeyCode::Esc => Some(Key::Pause),
        KeyCode::Enter => Some(Key::Confirm),
        KeyCode::Char(c) if c.is_ascii_digit() => c.to_digit(10).map(|d| Key::Digit(d as u8)),
        KeyCode::Char(c) => Some(Key::Char(c)),
        _ => None,
    }
}
