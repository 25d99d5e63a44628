//! Modal keystroke dispatch.
//!
//! One key is processed to completion at a time: command resolution, the
//! buffer edit, clamping, scroll reconciliation and the selection update all
//! happen before `handle_key` returns.

use tracing::debug;

use crate::model::clipboard::Clipboard;
use crate::model::document::Document;
use crate::model::keymap::{Command, CommandTrie, Motion, Operator, Resolution};
use crate::model::mode::Mode;
use crate::model::position::Position;
use crate::model::selection::Selection;
use crate::model::surface::{RenderSurface, TerminalSurface};

/// A discrete key from the keystroke source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    Char(char),
    Up,
    Down,
    Left,
    Right,
    Escape,
    Enter,
    Tab,
    Backspace,
}

pub struct Editor<S: RenderSurface = TerminalSurface> {
    document: Document,
    selection: Selection,
    mode: Mode,
    pending: String,
    keymap: CommandTrie,
    tab_width: usize,
    surface: S,
    clipboard: Box<dyn Clipboard>,
}

impl<S: RenderSurface> Editor<S> {
    pub fn new(text: &str, surface: S, clipboard: Box<dyn Clipboard>) -> Self {
        let mut editor = Self {
            document: Document::new(text),
            selection: Selection::None,
            mode: Mode::Normal,
            pending: String::new(),
            keymap: CommandTrie::normal_mode(),
            tab_width: 4,
            surface,
            clipboard,
        };
        editor.sync_viewport();
        editor
    }

    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width;
        self
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn pending_keys(&self) -> &str {
        &self.pending
    }

    pub fn cursor(&self) -> Position {
        self.document.cursor()
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn clipboard_mut(&mut self) -> &mut dyn Clipboard {
        self.clipboard.as_mut()
    }

    /// Re-read the surface after it was resized or scrolled externally.
    pub fn sync_viewport(&mut self) {
        self.document.sync_viewport(&mut self.surface);
        self.document.reveal_cursor(&mut self.surface);
    }

    pub fn handle_key(&mut self, key: Key) {
        match self.mode {
            Mode::Normal => self.handle_key_normal(key),
            Mode::Insert => self.handle_key_insert(key),
        }
    }

    fn handle_key_normal(&mut self, key: Key) {
        match key {
            Key::Up => self.apply_motion(Motion::Up),
            Key::Down => self.apply_motion(Motion::Down),
            Key::Left => self.apply_motion(Motion::Left),
            Key::Right => self.apply_motion(Motion::Right),
            Key::Escape => {
                self.selection.abort();
                self.pending.clear();
            }
            Key::Char(ch) => {
                self.pending.push(ch);
                self.resolve_pending();
            }
            Key::Enter | Key::Tab | Key::Backspace => {}
        }
    }

    fn handle_key_insert(&mut self, key: Key) {
        match key {
            Key::Escape => {
                self.mode = Mode::Normal;
                self.selection.abort();
                self.document.set_allow_past_end(false);
                debug!(target = "editor.keys", "leave_insert");
            }
            Key::Enter => {
                self.document.insert_newline();
                self.document.reveal_cursor(&mut self.surface);
            }
            Key::Backspace => {
                self.document.backspace();
                self.document.reveal_cursor(&mut self.surface);
            }
            Key::Tab => {
                for _ in 0..self.tab_width {
                    self.document.insert_char(' ');
                }
            }
            Key::Char(ch) => self.document.insert_char(ch),
            Key::Up => self.apply_motion(Motion::Up),
            Key::Down => self.apply_motion(Motion::Down),
            Key::Left => self.apply_motion(Motion::Left),
            Key::Right => self.apply_motion(Motion::Right),
        }
    }

    fn resolve_pending(&mut self) {
        match self.keymap.resolve(&self.pending) {
            Resolution::Complete {
                command,
                extensible,
            } => {
                let consumed = self.execute(command);
                debug!(target = "editor.keys", keys = %self.pending, ?command, consumed, "command");
                if consumed || !extensible {
                    self.pending.clear();
                }
            }
            Resolution::Prefix => {
                debug!(target = "editor.keys", keys = %self.pending, "prefix");
            }
            Resolution::Invalid => {
                debug!(target = "editor.keys", keys = %self.pending, "unmapped");
                self.pending.clear();
            }
        }
    }

    /// Run a resolved command. Returns false only when a selection operator
    /// found no selection to act on.
    fn execute(&mut self, command: Command) -> bool {
        match command {
            Command::EnterInsert => {
                self.selection.abort();
                self.mode = Mode::Insert;
                self.document.set_allow_past_end(true);
            }
            Command::Move(motion) => self.apply_motion(motion),
            Command::StartSelection(mode) => self.selection.start(mode, self.document.cursor()),
            Command::Paste { above } => {
                self.selection.abort();
                self.document.paste(self.clipboard.as_mut(), above);
                self.document.reveal_cursor(&mut self.surface);
            }
            Command::DeleteLine => {
                self.selection.abort();
                self.document.delete_line(self.clipboard.as_mut());
                self.document.reveal_cursor(&mut self.surface);
            }
            Command::CopyLine => self.document.copy_line(self.clipboard.as_mut()),
            Command::SelectionOperator(Operator::Delete) => {
                let deleted = self
                    .document
                    .delete_selection(&mut self.selection, self.clipboard.as_mut());
                if deleted {
                    self.document.reveal_cursor(&mut self.surface);
                }
                return deleted;
            }
            Command::SelectionOperator(Operator::Yank) => {
                let copied = self
                    .document
                    .copy_selection(&mut self.selection, self.clipboard.as_mut());
                if copied {
                    self.document.reveal_cursor(&mut self.surface);
                }
                return copied;
            }
            Command::OperatorMotion { op, motion } => self.apply_operator(op, motion),
        }
        true
    }

    fn apply_motion(&mut self, motion: Motion) {
        match motion {
            Motion::Up => self.document.move_up(),
            Motion::Down => self.document.move_down(),
            Motion::Left => self.document.move_left(),
            Motion::Right => self.document.move_right(),
            Motion::Beginning => self.document.move_to_beginning(),
            Motion::End => self.document.move_to_end(),
        }

        match motion {
            Motion::Down if self.document.should_scroll_down() => {
                self.document.scroll_down(&mut self.surface);
            }
            Motion::Up if self.document.should_scroll_up() => {
                self.document.scroll_up(&mut self.surface);
            }
            _ => {}
        }
        self.document.reveal_cursor(&mut self.surface);
        self.selection.update(self.document.cursor());
    }

    /// Line-wise operator from the cursor row through the motion's target row.
    fn apply_operator(&mut self, op: Operator, motion: Motion) {
        let row = self.document.cursor().row;
        let target = match motion {
            Motion::Up => row.saturating_sub(1).max(1),
            Motion::Down => (row + 1).min(self.document.line_count()),
            Motion::Beginning => 1,
            Motion::End => self.document.line_count(),
            Motion::Left | Motion::Right => row,
        };
        let (first, last) = (row.min(target), row.max(target));

        match op {
            Operator::Delete => {
                self.selection.abort();
                self.document.delete_rows(first, last, self.clipboard.as_mut());
                self.document.reveal_cursor(&mut self.surface);
            }
            Operator::Yank => {
                self.document.copy_rows(first, last, self.clipboard.as_mut());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::clipboard::MemoryClipboard;
    use crate::model::selection::SelectionMode;

    fn editor(text: &str) -> Editor {
        Editor::new(
            text,
            TerminalSurface::new(80, 10),
            Box::new(MemoryClipboard::new()),
        )
    }

    fn press(editor: &mut Editor, keys: &str) {
        for ch in keys.chars() {
            editor.handle_key(Key::Char(ch));
        }
    }

    #[test]
    fn i_enters_insert_and_escape_leaves() {
        let mut ed = editor("abc");
        press(&mut ed, "v");
        press(&mut ed, "i");
        assert_eq!(ed.mode(), Mode::Insert);
        assert!(!ed.selection().is_active());

        press(&mut ed, "x");
        assert_eq!(ed.document().buffer().text(), "xabc");

        ed.handle_key(Key::Escape);
        assert_eq!(ed.mode(), Mode::Normal);
    }

    #[test]
    fn hjkl_move() {
        let mut ed = editor("abc\ndef\nghi");
        press(&mut ed, "jl");
        assert_eq!(ed.cursor(), Position::new(2, 2));
        press(&mut ed, "kh");
        assert_eq!(ed.cursor(), Position::new(1, 1));
    }

    #[test]
    fn v_starts_precise_and_follows_cursor() {
        let mut ed = editor("abc\ndef");
        press(&mut ed, "lvj");
        assert_eq!(ed.selection().mode(), Some(SelectionMode::Precise));
        let span = ed.selection().span().unwrap();
        assert_eq!(span.anchor, Position::new(1, 2));
        assert_eq!(span.active, Position::new(2, 2));
    }

    #[test]
    fn escape_aborts_selection_and_pending() {
        let mut ed = editor("abc");
        press(&mut ed, "Vg");
        assert_eq!(ed.pending_keys(), "g");
        ed.handle_key(Key::Escape);
        assert!(!ed.selection().is_active());
        assert_eq!(ed.pending_keys(), "");
    }

    #[test]
    fn arrows_move_without_touching_pending() {
        let mut ed = editor("abc\ndef");
        press(&mut ed, "g");
        ed.handle_key(Key::Down);
        assert_eq!(ed.cursor(), Position::new(2, 1));
        assert_eq!(ed.pending_keys(), "g");
    }

    #[test]
    fn d_waits_for_a_second_key_without_selection() {
        let mut ed = editor("a\nb\nc");
        press(&mut ed, "d");
        assert_eq!(ed.pending_keys(), "d");
        press(&mut ed, "d");
        assert_eq!(ed.pending_keys(), "");
        assert_eq!(ed.document().buffer().text(), "b\nc");
    }

    #[test]
    fn d_consumes_active_selection() {
        let mut ed = editor("a\nb\nc");
        press(&mut ed, "Vjd");
        assert_eq!(ed.pending_keys(), "");
        assert!(!ed.selection().is_active());
        assert_eq!(ed.document().buffer().text(), "c");
        assert_eq!(ed.clipboard_mut().read().unwrap(), "a\nb");
    }

    #[test]
    fn dj_and_dk_delete_two_lines() {
        let mut ed = editor("1\n2\n3\n4\n5");
        press(&mut ed, "jdj");
        assert_eq!(ed.document().buffer().text(), "1\n4\n5");
        assert_eq!(ed.cursor(), Position::new(2, 1));

        press(&mut ed, "dk");
        assert_eq!(ed.document().buffer().text(), "5");
        assert_eq!(ed.clipboard_mut().read().unwrap(), "1\n4");
    }

    #[test]
    fn yank_motions_leave_buffer_alone() {
        let mut ed = editor("1\n2\n3");
        press(&mut ed, "jyG");
        assert_eq!(ed.clipboard_mut().read().unwrap(), "2\n3");
        press(&mut ed, "ygg");
        assert_eq!(ed.clipboard_mut().read().unwrap(), "1\n2");
        assert_eq!(ed.document().buffer().text(), "1\n2\n3");
        assert_eq!(ed.cursor(), Position::new(2, 1));
    }

    #[test]
    fn yy_then_p_duplicates_line() {
        let mut ed = editor("SELECT 1;\nSELECT 2;");
        press(&mut ed, "yyp");
        assert_eq!(
            ed.document().buffer().text(),
            "SELECT 1;\nSELECT 1;\nSELECT 2;"
        );
    }

    #[test]
    fn insert_mode_keys_edit_text() {
        let mut ed = editor("");
        press(&mut ed, "i");
        press(&mut ed, "ab");
        ed.handle_key(Key::Enter);
        ed.handle_key(Key::Tab);
        press(&mut ed, "c");
        ed.handle_key(Key::Backspace);
        assert_eq!(ed.document().buffer().text(), "ab\n    ");
    }
}
