/// A 1-based `(row, col)` location in the document.
///
/// Ordering is row-major, then by column, which is exactly the derived
/// ordering given the field order below.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Position {
    pub row: usize,
    pub col: usize,
}

impl Position {
    pub const ORIGIN: Position = Position { row: 1, col: 1 };

    pub fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// 0-based line index into the buffer.
    pub fn line_idx(&self) -> usize {
        self.row.saturating_sub(1)
    }

    /// 0-based char offset within the line.
    pub fn col_idx(&self) -> usize {
        self.col.saturating_sub(1)
    }
}

impl Default for Position {
    fn default() -> Self {
        Self::ORIGIN
    }
}

/// Return `(a, b)` ordered so that the first is not after the second.
pub fn normalized(a: Position, b: Position) -> (Position, Position) {
    if a > b { (b, a) } else { (a, b) }
}

/// Clamp `v` into `[lo, hi]`, favouring `lo` when the range is empty.
pub fn clamp(v: usize, lo: usize, hi: usize) -> usize {
    v.min(hi).max(lo)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn orders_row_major_then_column() {
        assert!(Position::new(1, 9) < Position::new(2, 1));
        assert!(Position::new(3, 2) < Position::new(3, 5));
        assert_eq!(Position::new(4, 4), Position::new(4, 4));
    }

    #[test]
    fn normalized_swaps_backward_pairs() {
        let (start, stop) = normalized(Position::new(3, 5), Position::new(1, 2));
        assert_eq!(start, Position::new(1, 2));
        assert_eq!(stop, Position::new(3, 5));
    }

    #[test]
    fn clamp_prefers_lower_bound_on_empty_range() {
        assert_eq!(clamp(7, 1, 0), 1);
        assert_eq!(clamp(0, 1, 5), 1);
        assert_eq!(clamp(9, 1, 5), 5);
    }
}
