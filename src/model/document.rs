use std::collections::BTreeMap;

use tracing::{debug, warn};

use super::buffer::TextBuffer;
use super::clipboard::Clipboard;
use super::cursor::CursorState;
use super::position::{Position, clamp};
use super::regions;
use super::selection::{Selection, SelectionRange};
use super::surface::RenderSurface;
use super::viewport::Viewport;

/// Text, cursor and viewport of one editing surface.
///
/// Every public operation leaves the cursor on a valid position and the
/// scroll offset inside `[0, max_offset_row]`.
#[derive(Debug, Clone, Default)]
pub struct Document {
    buffer: TextBuffer,
    cursor: CursorState,
    viewport: Viewport,
    /// Insert mode may sit one column past the end of the line.
    allow_past_end: bool,
}

impl Document {
    pub fn new(text: &str) -> Self {
        let mut doc = Self {
            buffer: TextBuffer::from_text(text),
            cursor: CursorState::new(),
            viewport: Viewport::default(),
            allow_past_end: false,
        };
        doc.clamp();
        doc
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn cursor(&self) -> Position {
        self.cursor.position()
    }

    pub fn preferred_col(&self) -> usize {
        self.cursor.preferred_col
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    pub fn set_text(&mut self, text: &str) {
        self.buffer.set_text(text);
        self.clamp();
    }

    pub fn set_allow_past_end(&mut self, allow: bool) {
        self.allow_past_end = allow;
        self.clamp();
    }

    // ── Motions ─────────────────────────────────────────────────

    pub fn move_up(&mut self) {
        self.cursor.pos.row = self.cursor.pos.row.saturating_sub(1);
        self.cursor.pos.col = self.cursor.preferred_col;
        self.clamp();
    }

    pub fn move_down(&mut self) {
        self.cursor.pos.row += 1;
        self.cursor.pos.col = self.cursor.preferred_col;
        self.clamp();
    }

    pub fn move_left(&mut self) {
        self.cursor.pos.col = self.cursor.pos.col.saturating_sub(1);
        self.clamp();
        self.cursor.preferred_col = self.cursor.pos.col;
    }

    pub fn move_right(&mut self) {
        self.cursor.pos.col += 1;
        self.clamp();
        self.cursor.preferred_col = self.cursor.pos.col;
    }

    pub fn move_to_beginning(&mut self) {
        self.move_to(Position::ORIGIN);
    }

    pub fn move_to_end(&mut self) {
        self.move_to(Position::new(self.line_count(), 1));
    }

    pub fn move_to(&mut self, pos: Position) {
        self.cursor.move_to(pos);
        self.clamp();
        self.cursor.preferred_col = self.cursor.pos.col;
    }

    /// Pull the cursor back onto a valid position and refit the scroll bound.
    pub fn clamp(&mut self) {
        let line_count = self.buffer.line_count();
        let row = clamp(self.cursor.pos.row, 1, line_count);
        let line_len = self.buffer.line_len(row - 1);
        let max_col = if self.allow_past_end {
            line_len + 1
        } else {
            line_len.max(1)
        };

        self.cursor.pos.row = row;
        self.cursor.pos.col = clamp(self.cursor.pos.col, 1, max_col);
        self.viewport.fit(line_count);
    }

    // ── Scrolling ───────────────────────────────────────────────

    /// The cursor sits below the midline and there is content left to scroll.
    pub fn should_scroll_down(&self) -> bool {
        let rel = self.cursor.row().saturating_sub(self.viewport.offset_row);
        rel > self.viewport.midline() && self.viewport.offset_row < self.viewport.max_offset_row
    }

    /// The cursor sits above the midline and the view is not at the top.
    pub fn should_scroll_up(&self) -> bool {
        let rel = self.cursor.row().saturating_sub(self.viewport.offset_row);
        rel < self.viewport.midline() && self.viewport.offset_row > 0
    }

    pub fn scroll_down(&mut self, surface: &mut dyn RenderSurface) {
        surface.scroll_to(self.viewport.offset_row + 1, self.viewport.offset_col);
        self.sync_offset(surface);
    }

    pub fn scroll_up(&mut self, surface: &mut dyn RenderSurface) {
        surface.scroll_to(
            self.viewport.offset_row.saturating_sub(1),
            self.viewport.offset_col,
        );
        self.sync_offset(surface);
    }

    /// Re-read size and offset from the surface, e.g. after a resize.
    pub fn sync_viewport(&mut self, surface: &mut dyn RenderSurface) {
        let (width, height) = surface.size();
        self.viewport.width = width;
        self.viewport.height = height;
        self.sync_offset(surface);
    }

    /// Scroll so the cursor is on screen again, placing it near the middle.
    /// Does nothing when it is already visible.
    pub fn reveal_cursor(&mut self, surface: &mut dyn RenderSurface) {
        if self.viewport.height == 0 || self.viewport.shows_row(self.cursor.row()) {
            return;
        }
        let target = self
            .cursor
            .row()
            .saturating_sub(1 + self.viewport.midline())
            .min(self.viewport.max_offset_row);
        surface.scroll_to(target, self.viewport.offset_col);
        self.sync_offset(surface);
    }

    fn sync_offset(&mut self, surface: &mut dyn RenderSurface) {
        let (row, col) = surface.scroll_offset();
        self.viewport.offset_col = col;
        self.viewport.offset_row = row;
        self.viewport.fit(self.buffer.line_count());

        if row > self.viewport.offset_row {
            // The surface is past the end of the content; ask it to come back.
            surface.scroll_to(self.viewport.offset_row, col);
            let (row, _) = surface.scroll_offset();
            self.viewport.offset_row = row.min(self.viewport.max_offset_row);
        }
    }

    /// 0-based screen row of the cursor, if it is within the viewport. The
    /// host uses it to place the cursor-line highlight.
    pub fn visible_line(&self) -> Option<usize> {
        let line = self
            .cursor
            .row()
            .checked_sub(self.viewport.offset_row + 1)?;
        (line < self.viewport.height).then_some(line)
    }

    /// 1-based number of the first visible line.
    pub fn line_num_offset(&self) -> usize {
        self.viewport.offset_row + 1
    }

    // ── Line operations ─────────────────────────────────────────

    /// Delete the cursor line, putting its text on the clipboard.
    pub fn delete_line(&mut self, clipboard: &mut dyn Clipboard) -> String {
        let removed = self.buffer.delete_line(self.cursor.pos.line_idx());
        write_clipboard(clipboard, &removed);
        self.clamp();
        removed
    }

    /// Delete rows `first..=last` (1-based) and land on `first`.
    pub fn delete_rows(
        &mut self,
        first: usize,
        last: usize,
        clipboard: &mut dyn Clipboard,
    ) -> String {
        let removed = self.buffer.delete_lines(first - 1, last - 1).join("\n");
        write_clipboard(clipboard, &removed);
        self.move_to(Position::new(first, 1));
        removed
    }

    /// Copy the cursor line. Neither the buffer nor the cursor changes.
    pub fn copy_line(&self, clipboard: &mut dyn Clipboard) {
        let line = self
            .buffer
            .line_text(self.cursor.pos.line_idx())
            .unwrap_or_default();
        write_clipboard(clipboard, &line);
    }

    pub fn copy_rows(&self, first: usize, last: usize, clipboard: &mut dyn Clipboard) {
        let text = (first - 1..last)
            .filter_map(|idx| self.buffer.line_text(idx))
            .collect::<Vec<_>>()
            .join("\n");
        write_clipboard(clipboard, &text);
    }

    /// Insert the clipboard lines below (or above) the cursor line. A failed
    /// read pastes nothing and returns false.
    pub fn paste(&mut self, clipboard: &mut dyn Clipboard, above: bool) -> bool {
        let text = match clipboard.read() {
            Ok(text) => text,
            Err(err) => {
                debug!("paste skipped: {err}");
                return false;
            }
        };

        let lines: Vec<&str> = text.split('\n').collect();
        self.buffer.insert_lines(self.cursor.pos.line_idx(), &lines, above);
        self.clamp();
        true
    }

    // ── Selection operations ────────────────────────────────────

    /// Text covered by the selection.
    pub fn selection_text(&self, selection: &Selection) -> Option<String> {
        match selection.range()? {
            SelectionRange::Chars { start, stop } => Some(self.buffer.slice(start, stop)),
            SelectionRange::Lines { first, last } => Some(
                (first - 1..last)
                    .filter_map(|idx| self.buffer.line_text(idx))
                    .collect::<Vec<_>>()
                    .join("\n"),
            ),
        }
    }

    /// Delete whatever the selection covers and clear it. Returns false when
    /// no selection is active.
    pub fn delete_selection(
        &mut self,
        selection: &mut Selection,
        clipboard: &mut dyn Clipboard,
    ) -> bool {
        let Some(range) = selection.range() else {
            return false;
        };

        match range {
            SelectionRange::Chars { start, stop } => {
                let removed = self.buffer.remove_range(start, stop);
                write_clipboard(clipboard, &removed);
                self.move_to(start);
            }
            SelectionRange::Lines { first, last } => {
                self.delete_rows(first, last, clipboard);
            }
        }

        selection.abort();
        true
    }

    /// Copy whatever the selection covers, clear it and move to its start.
    /// Returns false when no selection is active.
    pub fn copy_selection(
        &mut self,
        selection: &mut Selection,
        clipboard: &mut dyn Clipboard,
    ) -> bool {
        let Some(text) = self.selection_text(selection) else {
            return false;
        };
        write_clipboard(clipboard, &text);

        let start = match selection.range() {
            Some(SelectionRange::Chars { start, .. }) => start,
            Some(SelectionRange::Lines { first, .. }) => Position::new(first, self.cursor.col()),
            None => self.cursor(),
        };
        self.move_to(start);
        selection.abort();
        true
    }

    // ── Insert-mode editing ─────────────────────────────────────

    pub fn insert_char(&mut self, ch: char) {
        self.buffer.insert_char(self.cursor.pos, ch);
        self.cursor.pos.col += 1;
        self.clamp();
        self.cursor.preferred_col = self.cursor.pos.col;
    }

    pub fn insert_newline(&mut self) {
        self.buffer.insert_newline(self.cursor.pos);
        self.move_to(Position::new(self.cursor.row() + 1, 1));
    }

    pub fn backspace(&mut self) {
        if let Some(landing) = self.buffer.delete_char_before(self.cursor.pos) {
            self.move_to(landing);
        }
    }

    /// Recomputed from the current text on every call.
    pub fn runnable_regions(&self) -> BTreeMap<usize, usize> {
        regions::segment(self.buffer.lines())
    }
}

fn write_clipboard(clipboard: &mut dyn Clipboard, text: &str) {
    if let Err(err) = clipboard.write(text) {
        warn!("clipboard write failed, keeping buffer change: {err}");
    }
}
