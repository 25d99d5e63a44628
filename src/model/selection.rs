use super::buffer::TextBuffer;
use super::position::{Position, normalized};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionMode {
    /// Character-wise (`v`).
    Precise,
    /// Line-wise (`V`).
    WholeLine,
}

/// The two ends of a selection as the user dragged them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub anchor: Position,
    pub active: Position,
}

impl Span {
    fn at(pos: Position) -> Self {
        Self {
            anchor: pos,
            active: pos,
        }
    }

    /// `(start, stop)` with `start <= stop` whatever the drag direction.
    pub fn normalized(&self) -> (Position, Position) {
        normalized(self.anchor, self.active)
    }
}

/// Active selection, if any. The geometry is carried by the variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Selection {
    #[default]
    None,
    Precise(Span),
    WholeLine(Span),
}

/// Normalized extent of a selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionRange {
    Chars { start: Position, stop: Position },
    /// 1-based rows, inclusive.
    Lines { first: usize, last: usize },
}

impl Selection {
    /// Begin selecting at the cursor.
    pub fn start(&mut self, mode: SelectionMode, cursor: Position) {
        *self = match mode {
            SelectionMode::Precise => Selection::Precise(Span::at(cursor)),
            SelectionMode::WholeLine => Selection::WholeLine(Span::at(cursor)),
        };
    }

    /// Move the active end. Does nothing when no selection is active.
    pub fn update(&mut self, pos: Position) {
        match self {
            Selection::None => {}
            Selection::Precise(span) | Selection::WholeLine(span) => span.active = pos,
        }
    }

    pub fn abort(&mut self) {
        *self = Selection::None;
    }

    pub fn is_active(&self) -> bool {
        !matches!(self, Selection::None)
    }

    pub fn mode(&self) -> Option<SelectionMode> {
        match self {
            Selection::None => None,
            Selection::Precise(_) => Some(SelectionMode::Precise),
            Selection::WholeLine(_) => Some(SelectionMode::WholeLine),
        }
    }

    pub fn span(&self) -> Option<Span> {
        match self {
            Selection::None => None,
            Selection::Precise(span) | Selection::WholeLine(span) => Some(*span),
        }
    }

    pub fn range(&self) -> Option<SelectionRange> {
        match self {
            Selection::None => None,
            Selection::Precise(span) => {
                let (start, stop) = span.normalized();
                Some(SelectionRange::Chars { start, stop })
            }
            Selection::WholeLine(span) => {
                let (start, stop) = span.normalized();
                Some(SelectionRange::Lines {
                    first: start.row,
                    last: stop.row,
                })
            }
        }
    }

    /// Whether `pos` falls inside the selection.
    pub fn contains(&self, pos: Position) -> bool {
        match self.range() {
            None => false,
            Some(SelectionRange::Chars { start, stop }) => start <= pos && pos <= stop,
            Some(SelectionRange::Lines { first, last }) => (first..=last).contains(&pos.row),
        }
    }

    /// Every `(row, col)` the selection covers, in document order. An empty
    /// line contributes its single column-1 position.
    pub fn covered_positions(&self, buffer: &TextBuffer) -> Vec<Position> {
        let mut covered = Vec::new();

        match self.range() {
            None => {}
            Some(SelectionRange::Chars { start, stop }) => {
                for row in start.row..=stop.row {
                    let width = buffer.line_len(row - 1).max(1);
                    let lo = if row == start.row { start.col } else { 1 };
                    let hi = if row == stop.row { stop.col.min(width) } else { width };
                    covered.extend((lo..=hi).map(|col| Position::new(row, col)));
                }
            }
            Some(SelectionRange::Lines { first, last }) => {
                for row in first..=last {
                    let width = buffer.line_len(row - 1).max(1);
                    covered.extend((1..=width).map(|col| Position::new(row, col)));
                }
            }
        }

        covered
    }
}
