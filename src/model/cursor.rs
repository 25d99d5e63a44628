use super::position::Position;

/// Cursor position within a document.
#[derive(Debug, Clone, Default)]
pub struct CursorState {
    /// Current position (1-based).
    pub pos: Position,
    /// Column restored on vertical moves ("sticky" column).
    pub preferred_col: usize,
}

impl CursorState {
    pub fn new() -> Self {
        Self {
            pos: Position::ORIGIN,
            preferred_col: 1,
        }
    }

    pub fn position(&self) -> Position {
        self.pos
    }

    pub fn row(&self) -> usize {
        self.pos.row
    }

    pub fn col(&self) -> usize {
        self.pos.col
    }

    /// Jump to a position, resetting the sticky column.
    pub fn move_to(&mut self, pos: Position) {
        self.pos = pos;
        self.preferred_col = pos.col;
    }
}
