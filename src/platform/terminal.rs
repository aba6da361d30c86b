//! Terminal platform: crossterm input and half-block pixel rendering
//!
//! Each terminal cell shows two vertically stacked pixels using the upper
//! half block glyph, so a cell grid of `cols x rows` becomes a square-ish
//! pixel grid of `cols x rows * 2`. The logical screen is scaled to fit and
//! centered.

use std::io::{self, Stdout, Write};
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    QueueableCommand, cursor,
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    style::{Color, Print, ResetColor, SetBackgroundColor, SetForegroundColor},
    terminal,
};
use glam::Vec2;

use super::{DrawCommand, DrawList, InputFrame, OutlineColor, Platform, SpriteId};
use crate::Rect;
use crate::consts::MAX_FRAME_DELTA;
use crate::sim::{ActorVariant, ObstacleVariant};

/// 24-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Rgb(u8, u8, u8);

impl Rgb {
    fn to_color(self) -> Color {
        Color::Rgb {
            r: self.0,
            g: self.1,
            b: self.2,
        }
    }
}

const LETTERBOX: Rgb = Rgb(0, 0, 0);
const TEXT_FG: Rgb = Rgb(255, 255, 255);
const TEXT_BG: Rgb = Rgb(40, 40, 40);

fn sprite_color(sprite: SpriteId) -> Rgb {
    match sprite {
        SpriteId::Background => Rgb(78, 192, 202),
        SpriteId::Ground => Rgb(222, 216, 149),
        SpriteId::Actor(ActorVariant::Red) => Rgb(230, 80, 60),
        SpriteId::Actor(ActorVariant::Blue) => Rgb(80, 140, 230),
        SpriteId::Actor(ActorVariant::Yellow) => Rgb(250, 200, 60),
        SpriteId::Obstacle(ObstacleVariant::Green) => Rgb(115, 190, 46),
        SpriteId::Obstacle(ObstacleVariant::Red) => Rgb(200, 70, 50),
        SpriteId::GameOverBanner => Rgb(250, 150, 40),
    }
}

fn outline_color(color: OutlineColor) -> Rgb {
    match color {
        OutlineColor::Actor => Rgb(255, 0, 0),
        OutlineColor::Obstacle => Rgb(0, 255, 0),
    }
}

/// Pixel grid, two pixels per terminal cell
struct PixelBuf {
    w: usize,
    h: usize,
    px: Vec<Rgb>,
}

impl PixelBuf {
    fn new(cols: u16, rows: u16) -> Self {
        let (w, h) = (cols as usize, rows as usize * 2);
        Self {
            w,
            h,
            px: vec![LETTERBOX; w * h],
        }
    }

    fn resize(&mut self, cols: u16, rows: u16) {
        self.w = cols as usize;
        self.h = rows as usize * 2;
        self.px.clear();
        self.px.resize(self.w * self.h, LETTERBOX);
    }

    fn fill(&mut self, c: Rgb) {
        self.px.fill(c);
    }

    fn set(&mut self, x: i32, y: i32, c: Rgb) {
        if x >= 0 && y >= 0 && (x as usize) < self.w && (y as usize) < self.h {
            self.px[y as usize * self.w + x as usize] = c;
        }
    }

    fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, c: Rgb) {
        let (x0, x1) = (x0.max(0), x1.min(self.w as i32));
        let (y0, y1) = (y0.max(0), y1.min(self.h as i32));
        for y in y0..y1 {
            for x in x0..x1 {
                self.set(x, y, c);
            }
        }
    }

    fn outline_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, c: Rgb) {
        for x in x0..x1 {
            self.set(x, y0, c);
            self.set(x, y1 - 1, c);
        }
        for y in y0..y1 {
            self.set(x0, y, c);
            self.set(x1 - 1, y, c);
        }
    }

    fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        out.queue(cursor::MoveTo(0, 0))?;
        let rows = self.h / 2;
        let mut fg: Option<Rgb> = None;
        let mut bg: Option<Rgb> = None;

        for row in 0..rows {
            out.queue(cursor::MoveTo(0, row as u16))?;
            for col in 0..self.w {
                let top = self.px[row * 2 * self.w + col];
                let bottom = self.px[(row * 2 + 1) * self.w + col];

                if bg != Some(bottom) {
                    out.queue(SetBackgroundColor(bottom.to_color()))?;
                    bg = Some(bottom);
                }
                if top == bottom {
                    out.queue(Print(' '))?;
                } else {
                    if fg != Some(top) {
                        out.queue(SetForegroundColor(top.to_color()))?;
                        fg = Some(top);
                    }
                    out.queue(Print('\u{2580}'))?; // ▀
                }
            }
        }
        out.queue(ResetColor)?;
        Ok(())
    }
}

/// Maps logical screen coordinates onto the pixel grid
#[derive(Debug, Clone, Copy)]
struct Viewport {
    scale: f32,
    offset: Vec2,
}

impl Viewport {
    fn fit(screen: Vec2, w: usize, h: usize) -> Self {
        let scale = (w as f32 / screen.x).min(h as f32 / screen.y).max(0.0);
        let offset = (Vec2::new(w as f32, h as f32) - screen * scale) * 0.5;
        Self { scale, offset }
    }

    fn point(&self, p: Vec2) -> (i32, i32) {
        let p = p * self.scale + self.offset;
        (p.x.round() as i32, p.y.round() as i32)
    }

    /// Pixel bounds `(x0, y0, x1, y1)` of a rectangle, at least one pixel wide
    fn rect(&self, rect: &Rect) -> (i32, i32, i32, i32) {
        let (x0, y0) = self.point(rect.pos);
        let (x1, y1) = self.point(rect.pos + rect.size);
        (x0, y0, x1.max(x0 + 1), y1.max(y0 + 1))
    }
}

/// Interactive platform on the controlling terminal
pub struct TerminalPlatform {
    stdout: Stdout,
    buf: PixelBuf,
    screen: Vec2,
    frame_duration: Duration,
    last_frame: Instant,
    closed: bool,
    entered: bool,
}

impl TerminalPlatform {
    pub fn new(screen: Vec2, target_fps: u32) -> Result<Self> {
        let (cols, rows) = terminal::size()?;
        Ok(Self {
            stdout: io::stdout(),
            buf: PixelBuf::new(cols, rows),
            screen,
            frame_duration: Duration::from_secs_f32(1.0 / target_fps.max(1) as f32),
            last_frame: Instant::now(),
            closed: false,
            entered: false,
        })
    }

    pub fn enter(&mut self, title: &str) -> Result<()> {
        terminal::enable_raw_mode()?;
        self.entered = true;
        self.stdout.queue(terminal::EnterAlternateScreen)?;
        self.stdout.queue(terminal::SetTitle(title))?;
        self.stdout.queue(cursor::Hide)?;
        self.stdout.queue(terminal::DisableLineWrap)?;
        self.stdout.flush()?;
        Ok(())
    }

    pub fn exit(&mut self) -> Result<()> {
        if !self.entered {
            return Ok(());
        }
        self.entered = false;
        self.stdout.queue(ResetColor)?;
        self.stdout.queue(terminal::EnableLineWrap)?;
        self.stdout.queue(cursor::Show)?;
        self.stdout.queue(terminal::LeaveAlternateScreen)?;
        self.stdout.flush()?;
        terminal::disable_raw_mode()?;
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent, input: &mut InputFrame) {
        if key.kind != KeyEventKind::Press {
            return;
        }
        match key.code {
            KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                self.closed = true;
            }
            KeyCode::Char('q') | KeyCode::Esc => self.closed = true,
            KeyCode::Char(' ') | KeyCode::Up | KeyCode::Enter => {
                input.jumps += 1;
                input.restart = true;
            }
            KeyCode::F(1) | KeyCode::Char('d') => input.toggle_debug = true,
            KeyCode::Char('i') => input.toggle_autopilot = true,
            _ => {}
        }
    }

    fn draw_text(&mut self, viewport: &Viewport, text: &str, pos: Vec2) -> io::Result<()> {
        let (x, y) = viewport.point(pos);
        let width = text.chars().count() as i32;
        let col = (x - width / 2).max(0);
        let row = (y / 2).max(0);
        if row as usize >= self.buf.h / 2 {
            return Ok(());
        }
        self.stdout.queue(cursor::MoveTo(col as u16, row as u16))?;
        self.stdout.queue(SetForegroundColor(TEXT_FG.to_color()))?;
        self.stdout.queue(SetBackgroundColor(TEXT_BG.to_color()))?;
        self.stdout.queue(Print(text))?;
        self.stdout.queue(ResetColor)?;
        Ok(())
    }
}

impl Drop for TerminalPlatform {
    fn drop(&mut self) {
        let _ = self.exit();
    }
}

impl Platform for TerminalPlatform {
    fn screen_size(&self) -> Vec2 {
        self.screen
    }

    fn frame_delta_seconds(&mut self) -> f32 {
        let now = Instant::now();
        let dt = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        dt.min(MAX_FRAME_DELTA)
    }

    fn poll_input(&mut self) -> Result<InputFrame> {
        let mut input = InputFrame::default();
        while event::poll(Duration::ZERO)? {
            match event::read()? {
                Event::Key(key) => self.handle_key(key, &mut input),
                Event::Resize(cols, rows) => self.buf.resize(cols, rows),
                _ => {}
            }
        }
        Ok(input)
    }

    fn present(&mut self, frame: &DrawList) -> Result<()> {
        let viewport = Viewport::fit(self.screen, self.buf.w, self.buf.h);
        self.buf.fill(LETTERBOX);

        let mut texts = Vec::new();
        for cmd in frame.commands() {
            match cmd {
                DrawCommand::Sprite { sprite, rect, .. } => {
                    let (x0, y0, x1, y1) = viewport.rect(rect);
                    self.buf.fill_rect(x0, y0, x1, y1, sprite_color(*sprite));
                }
                DrawCommand::Outline { rect, color } => {
                    let (x0, y0, x1, y1) = viewport.rect(rect);
                    self.buf.outline_rect(x0, y0, x1, y1, outline_color(*color));
                }
                DrawCommand::Text { text, pos } => texts.push((text, *pos)),
            }
        }

        self.buf.write_to(&mut self.stdout)?;
        for (text, pos) in texts {
            self.draw_text(&viewport, text, pos)?;
        }
        self.stdout.flush()?;

        // Frame pacing
        let elapsed = self.last_frame.elapsed();
        if elapsed < self.frame_duration {
            std::thread::sleep(self.frame_duration - elapsed);
        }
        Ok(())
    }

    fn should_close(&self) -> bool {
        self.closed
    }
}
