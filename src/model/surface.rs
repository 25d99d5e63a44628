/// The drawing area the document is projected onto.
///
/// The document asks the surface to scroll and then reads the offset back;
/// it never assumes a request was honoured.
pub trait RenderSurface {
    /// `(width, height)` in cells.
    fn size(&self) -> (usize, usize);
    /// `(row, col)` scroll origin, 0-based.
    fn scroll_offset(&self) -> (usize, usize);
    fn scroll_to(&mut self, row: usize, col: usize);
}

/// Surface backed by the terminal editor pane.
///
/// The host updates the size from resize events; the view draws starting at
/// the stored offset.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TerminalSurface {
    width: usize,
    height: usize,
    offset_row: usize,
    offset_col: usize,
}

impl TerminalSurface {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            ..Default::default()
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
    }
}

impl RenderSurface for TerminalSurface {
    fn size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn scroll_offset(&self) -> (usize, usize) {
        (self.offset_row, self.offset_col)
    }

    fn scroll_to(&mut self, row: usize, col: usize) {
        self.offset_row = row;
        self.offset_col = col;
    }
}
