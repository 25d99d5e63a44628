use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Frame;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::editor::{Editor, Key};
use crate::model::blink::Blink;
use crate::model::clipboard::Clipboard;
use crate::model::config::AppConfig;
use crate::model::mode::Mode;
use crate::model::position::Position;
use crate::model::regions;
use crate::model::surface::{RenderSurface, TerminalSurface};
use crate::msg::Msg;

const GUTTER_WIDTH: u16 = 5;

const CURSOR_COLOR: Color = Color::Red;
const BG_COLOR: Color = Color::Rgb(38, 39, 47);
const FG_COLOR: Color = Color::Rgb(70, 73, 90);
const TEXT_COLOR: Color = Color::Rgb(220, 220, 220);
const HIGHLIGHT_FG: Color = Color::Rgb(255, 198, 58);
const HIGHLIGHT_BG: Color = Color::Rgb(70, 73, 90);
const SELECTION_BG: Color = Color::Rgb(90, 80, 140);
const REGION_EVEN: Color = Color::Rgb(147, 112, 219);
const REGION_ODD: Color = Color::Rgb(32, 178, 170);

pub struct App {
    pub editor: Editor,
    pub config: AppConfig,
    pub should_quit: bool,
    blink: Blink,
}

impl App {
    /// `size` is the full terminal size; the editor pane is carved out of it.
    pub fn new(
        config: AppConfig,
        text: &str,
        clipboard: Box<dyn Clipboard>,
        size: (u16, u16),
    ) -> Self {
        let (width, height) = pane_size(&config, size.0, size.1);
        let editor = Editor::new(text, TerminalSurface::new(width, height), clipboard)
            .with_tab_width(usize::from(config.editor.tab_width));
        let blink = Blink::new(config.blink_on(), config.blink_off(), Instant::now());

        tracing::info!(
            lines = editor.document().line_count(),
            width,
            height,
            "editor ready"
        );

        Self {
            editor,
            config,
            should_quit: false,
            blink,
        }
    }

    pub fn cursor_visible(&self) -> bool {
        self.blink.visible()
    }

    // ── MVU: Update ──────────────────────────────────────────────

    pub fn update(&mut self, msg: Msg) -> Result<()> {
        match msg {
            Msg::Key(key) if is_quit_key(&key) => self.update(Msg::Quit)?,
            Msg::Key(key) => self.handle_key(key),
            Msg::Resize(w, h) => self.resize(w, h),
            Msg::Tick => {
                self.blink.tick(Instant::now());
            }
            Msg::Quit => {
                tracing::info!("quit requested");
                self.should_quit = true;
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) {
        if key.kind != KeyEventKind::Press {
            return;
        }

        if let Some(key) = translate_key(key) {
            self.editor.handle_key(key);
            self.blink.reset(Instant::now());
        }
    }

    fn resize(&mut self, width: u16, height: u16) {
        let (width, height) = pane_size(&self.config, width, height);
        if self.editor.surface().size() == (width, height) {
            return;
        }
        self.editor.surface_mut().resize(width, height);
        self.editor.sync_viewport();
    }

    // ── MVU: View ────────────────────────────────────────────────

    pub fn view(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.resize(area.width, area.height);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(1),    // body
                Constraint::Length(1), // status bar
            ])
            .split(area);

        let gutter = if self.config.editor.line_numbers {
            GUTTER_WIDTH
        } else {
            0
        };
        let body = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(gutter), Constraint::Min(1)])
            .split(chunks[0]);

        if gutter > 0 {
            self.render_gutter(frame, body[0]);
        }
        self.render_editor(frame, body[1]);
        self.render_status_bar(frame, chunks[1]);
    }

    fn render_gutter(&self, frame: &mut Frame, area: Rect) {
        let doc = self.editor.document();
        let regions = doc.runnable_regions();
        let cursor_row = doc.cursor().row;
        let first = doc.line_num_offset();
        let last = (first + area.height as usize).min(doc.line_count() + 1);

        let lines: Vec<Line> = (first..last)
            .map(|n| {
                let style = if n == cursor_row {
                    let fg = match self.editor.mode() {
                        Mode::Insert => CURSOR_COLOR,
                        Mode::Normal => HIGHLIGHT_FG,
                    };
                    Style::default().fg(fg).bg(HIGHLIGHT_BG)
                } else {
                    let id = regions.get(&n).copied().unwrap_or(0);
                    Style::default().fg(region_color(id)).bg(BG_COLOR)
                };
                Line::from(vec![
                    Span::styled(format!("{n:>3} "), style),
                    Span::styled("│", Style::default().fg(FG_COLOR).bg(BG_COLOR)),
                ])
            })
            .collect();

        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(BG_COLOR)),
            area,
        );
    }

    fn render_editor(&self, frame: &mut Frame, area: Rect) {
        let doc = self.editor.document();
        let viewport = doc.viewport();
        let buffer = doc.buffer();
        let cursor = doc.cursor();
        let selection = self.editor.selection();
        let width = area.width as usize;

        let first = viewport.offset_row;
        let last = (first + area.height as usize).min(doc.line_count());
        let cursor_line = doc.visible_line();

        let lines: Vec<Line> = (first..last)
            .map(|idx| {
                let row = idx + 1;
                let text = buffer.line_text(idx).unwrap_or_default();
                let on_cursor_line = cursor_line == Some(idx - first);
                let base = if on_cursor_line {
                    Style::default().fg(TEXT_COLOR).bg(HIGHLIGHT_BG)
                } else {
                    Style::default().fg(TEXT_COLOR)
                };

                let mut cells: Vec<char> = text.chars().collect();
                let text_len = cells.len();
                let fill = (viewport.offset_col + width).saturating_sub(cells.len());
                cells.extend(std::iter::repeat_n(' ', fill));

                let spans: Vec<Span> = cells
                    .into_iter()
                    .enumerate()
                    .skip(viewport.offset_col)
                    .take(width)
                    .map(|(i, ch)| {
                        let pos = Position::new(row, i + 1);
                        let style = if pos == cursor && self.cursor_visible() {
                            Style::default()
                                .fg(Color::Black)
                                .bg(CURSOR_COLOR)
                                .add_modifier(Modifier::BOLD)
                        } else if i < text_len.max(1) && selection.contains(pos) {
                            base.bg(SELECTION_BG)
                        } else {
                            base
                        };
                        Span::styled(ch.to_string(), style)
                    })
                    .collect();

                Line::from(spans)
            })
            .collect();

        frame.render_widget(
            Paragraph::new(lines).style(Style::default().bg(BG_COLOR)),
            area,
        );
    }

    fn render_status_bar(&self, frame: &mut Frame, area: Rect) {
        let mode_style = match self.editor.mode() {
            Mode::Normal => Style::default()
                .fg(Color::Black)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
            Mode::Insert => Style::default()
                .fg(Color::Black)
                .bg(CURSOR_COLOR)
                .add_modifier(Modifier::BOLD),
        };
        let mode_span = Span::styled(format!(" {} ", self.editor.mode().label()), mode_style);

        let doc = self.editor.document();
        let cursor = doc.cursor();
        let breadcrumbs = self.config.status.breadcrumbs.join(" ► ");

        let statement = regions::region_at(&doc.runnable_regions(), cursor.row)
            .map(|lines| format!("  stmt {}-{}", lines.start(), lines.end()))
            .unwrap_or_default();

        let pending = if self.editor.pending_keys().is_empty() {
            String::new()
        } else {
            format!("  {}", self.editor.pending_keys())
        };

        let info = Span::styled(
            format!(
                " {breadcrumbs}{statement}{pending}  [{},{}] ",
                cursor.row, cursor.col
            ),
            Style::default().fg(Color::Gray).bg(FG_COLOR),
        );

        let bar = Line::from(vec![mode_span, info]);
        let status = Paragraph::new(bar).style(Style::default().bg(FG_COLOR));
        frame.render_widget(status, area);
    }
}

/// Editor pane size for a terminal of `width` x `height`: minus the status
/// bar row and the gutter.
fn pane_size(config: &AppConfig, width: u16, height: u16) -> (usize, usize) {
    let gutter = if config.editor.line_numbers {
        GUTTER_WIDTH
    } else {
        0
    };
    (
        usize::from(width.saturating_sub(gutter)),
        usize::from(height.saturating_sub(1)),
    )
}

/// Ctrl+C and Ctrl+Q end the session before the editor sees the key.
fn is_quit_key(key: &KeyEvent) -> bool {
    key.kind == KeyEventKind::Press
        && key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q'))
}

fn translate_key(key: KeyEvent) -> Option<Key> {
    if key
        .modifiers
        .intersects(KeyModifiers::CONTROL | KeyModifiers::ALT)
    {
        return None;
    }

    match key.code {
        KeyCode::Char(ch) => Some(Key::Char(ch)),
        KeyCode::Up => Some(Key::Up),
        KeyCode::Down => Some(Key::Down),
        KeyCode::Left => Some(Key::Left),
        KeyCode::Right => Some(Key::Right),
        KeyCode::Esc => Some(Key::Escape),
        KeyCode::Enter => Some(Key::Enter),
        KeyCode::Tab => Some(Key::Tab),
        KeyCode::Backspace => Some(Key::Backspace),
        _ => None,
    }
}

/// Gutter color for a runnable region; blank separators stay muted.
fn region_color(id: usize) -> Color {
    match id {
        0 => FG_COLOR,
        id if id % 2 == 0 => REGION_EVEN,
        _ => REGION_ODD,
    }
}
