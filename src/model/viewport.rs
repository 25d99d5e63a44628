/// Viewport state for scroll tracking.
///
/// `width`/`height` are in character cells and mirror the render surface.
/// Offsets are 0-based.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
    pub offset_row: usize,
    pub offset_col: usize,
    pub max_offset_row: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    /// Recompute the scroll bound for a document of `line_count` lines and
    /// pull the offset back inside it.
    pub fn fit(&mut self, line_count: usize) {
        self.max_offset_row = line_count.saturating_sub(self.height);
        self.offset_row = self.offset_row.min(self.max_offset_row);
    }

    /// Half the height; the line the cursor is kept near.
    pub fn midline(&self) -> usize {
        self.height / 2
    }

    /// Whether a 1-based row is currently on screen.
    pub fn shows_row(&self, row: usize) -> bool {
        row > self.offset_row && row <= self.offset_row + self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fit_bounds_offset_to_content() {
        let mut viewport = Viewport::new(80, 10);
        viewport.offset_row = 40;
        viewport.fit(25);
        assert_eq!(viewport.max_offset_row, 15);
        assert_eq!(viewport.offset_row, 15);

        viewport.fit(4);
        assert_eq!(viewport.max_offset_row, 0);
        assert_eq!(viewport.offset_row, 0);
    }

    #[test]
    fn shows_row_is_one_based() {
        let mut viewport = Viewport::new(80, 3);
        viewport.offset_row = 2;
        assert!(!viewport.shows_row(2));
        assert!(viewport.shows_row(3));
        assert!(viewport.shows_row(5));
        assert!(!viewport.shows_row(6));
    }
}
