use core::fmt;

use crate::Direction;

/// Tile coordinate, row increasing downward.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TilePos {
    pub row: usize,
    pub col: usize,
}

impl TilePos {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// Neighbor one unit step along `dir`, if it stays inside `height x width`.
    pub fn offset(self, dir: Direction, height: usize, width: usize) -> Option<TilePos> {
        let (dr, dc) = dir.offset();
        let r = self.row as isize + dr;
        let c = self.col as isize + dc;
        if r < 0 || c < 0 {
            return None;
        }

        let (ru, cu) = (r as usize, c as usize);
        if ru >= height || cu >= width {
            return None;
        }

        Some(TilePos::new(ru, cu))
    }

    pub fn on_border(self, height: usize, width: usize) -> bool {
        self.row == 0
            || self.col == 0
            || self.row + 1 == height
            || self.col + 1 == width
    }
}

impl From<(usize, usize)> for TilePos {
    fn from((row, col): (usize, usize)) -> Self {
        Self { row, col }
    }
}

impl From<TilePos> for (usize, usize) {
    fn from(p: TilePos) -> Self {
        (p.row, p.col)
    }
}

impl fmt::Display for TilePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}
