use core::ops::Index;

use crate::{ActivationMap, Direction, Error, TilePos};

pub type ChainId = usize;

/// Per-tile state.
///
/// `visited` and ownership are written by the tracer only. A claimed cell is
/// always visited; a visited cell without an owner is an isolated activation
/// the tracer discarded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cell {
    active: bool,
    visited: bool,
    owner: Option<(ChainId, usize)>,
}

impl Cell {
    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn activation(&self) -> u8 {
        u8::from(self.active)
    }

    pub fn is_visited(&self) -> bool {
        self.visited
    }

    /// Id of the first chain that claimed this tile.
    pub fn chain_id(&self) -> Option<ChainId> {
        self.owner.map(|(id, _)| id)
    }

    /// Position of this tile within its owning chain's tile sequence.
    pub fn index_in_chain(&self) -> Option<usize> {
        self.owner.map(|(_, idx)| idx)
    }
}

/// Fixed-size rectangular grid of [`Cell`]s, row-major.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CellGrid {
    height: usize,
    width: usize,
    cells: Vec<Cell>,
}

impl CellGrid {
    pub fn new(height: usize, width: usize) -> Self {
        let len = height.checked_mul(width).expect("grid size overflow");
        Self {
            height,
            width,
            cells: vec![Cell::default(); len],
        }
    }

    pub fn from_activation(map: &ActivationMap) -> Self {
        let mut grid = Self::new(map.height(), map.width());
        for (cell, &v) in grid.cells.iter_mut().zip(map.data()) {
            cell.active = v == 1;
        }
        grid
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn width(&self) -> usize {
        self.width
    }

    /// `(height, width)`.
    pub fn shape(&self) -> (usize, usize) {
        (self.height, self.width)
    }

    pub fn activation_map(&self) -> ActivationMap {
        let data = self.cells.iter().map(Cell::activation).collect();
        ActivationMap::from_vec(self.height, self.width, data)
            .expect("grid cells always form a binary plane of its own shape")
    }

    /// Replaces the activation plane. Rejects a plane of another shape before
    /// touching any cell.
    pub fn set_activation_map(&mut self, map: &ActivationMap) -> Result<(), Error> {
        if map.shape() != self.shape() {
            return Err(Error::ShapeMismatch {
                expected: self.shape(),
                actual: map.shape(),
            });
        }

        for (cell, &v) in self.cells.iter_mut().zip(map.data()) {
            cell.active = v == 1;
        }
        Ok(())
    }

    pub fn in_bounds(&self, row: isize, col: isize) -> bool {
        row >= 0 && col >= 0 && (row as usize) < self.height && (col as usize) < self.width
    }

    pub fn contains(&self, pos: TilePos) -> bool {
        pos.row < self.height && pos.col < self.width
    }

    pub fn get(&self, pos: TilePos) -> Option<&Cell> {
        if !self.contains(pos) {
            return None;
        }
        self.cells.get(self.linear(pos))
    }

    pub fn is_active(&self, pos: TilePos) -> bool {
        self.get(pos).is_some_and(Cell::is_active)
    }

    pub fn is_visited(&self, pos: TilePos) -> bool {
        self.get(pos).is_some_and(Cell::is_visited)
    }

    /// In-bounds 8-neighbors in the fixed `N, NE, ..., NW` order.
    pub fn neighbors(&self, pos: TilePos) -> impl Iterator<Item = (Direction, TilePos)> + '_ {
        Direction::ALL
            .into_iter()
            .filter_map(move |d| pos.offset(d, self.height, self.width).map(|p| (d, p)))
    }

    pub fn active_neighbors(&self, pos: TilePos) -> impl Iterator<Item = (Direction, TilePos)> + '_ {
        self.neighbors(pos)
            .filter(move |&(_, p)| self.is_active(p))
    }

    /// Marks `pos` visited and owned by `chain_id` at `index`. Ownership is
    /// written once; claiming an already visited tile is an error.
    pub fn claim(&mut self, pos: TilePos, chain_id: ChainId, index: usize) -> Result<(), Error> {
        let i = self.checked_linear(pos)?;
        let cell = &mut self.cells[i];
        if cell.visited {
            return Err(Error::AlreadyClaimed { pos });
        }
        cell.visited = true;
        cell.owner = Some((chain_id, index));
        Ok(())
    }

    /// Marks `pos` visited without an owner.
    pub fn discard(&mut self, pos: TilePos) -> Result<(), Error> {
        let i = self.checked_linear(pos)?;
        let cell = &mut self.cells[i];
        if cell.visited {
            return Err(Error::AlreadyClaimed { pos });
        }
        cell.visited = true;
        Ok(())
    }

    /// True while no tile has been visited yet.
    pub fn is_pristine(&self) -> bool {
        self.cells.iter().all(|c| !c.visited)
    }

    pub fn count_active(&self) -> usize {
        self.cells.iter().filter(|c| c.active).count()
    }

    pub fn count_visited(&self) -> usize {
        self.cells.iter().filter(|c| c.visited).count()
    }

    #[inline]
    fn linear(&self, pos: TilePos) -> usize {
        pos.row * self.width + pos.col
    }

    fn checked_linear(&self, pos: TilePos) -> Result<usize, Error> {
        if !self.contains(pos) {
            return Err(Error::OutOfBounds {
                pos,
                height: self.height,
                width: self.width,
            });
        }
        Ok(self.linear(pos))
    }
}

impl Index<TilePos> for CellGrid {
    type Output = Cell;

    fn index(&self, pos: TilePos) -> &Cell {
        assert!(self.contains(pos), "tile {pos} out of bounds");
        &self.cells[self.linear(pos)]
    }
}

#[cfg(test)]
mod tests {
    use super::CellGrid;
    use crate::{ActivationMap, Direction, Error, TilePos};

    fn fixture() -> ActivationMap {
        ActivationMap::from_ascii(
            "
            #..
            .#.
            ..#
            ",
        )
        .expect("valid fixture")
    }

    #[test]
    fn activation_map_round_trip() {
        let map = fixture();
        let grid = CellGrid::from_activation(&map);
        assert_eq!(grid.shape(), (3, 3));
        assert_eq!(grid.activation_map(), map);
        assert_eq!(grid.count_active(), 3);
        assert!(grid.is_pristine());
    }

    #[test]
    fn set_activation_map_rejects_shape_mismatch() {
        let mut grid = CellGrid::from_activation(&fixture());
        let wrong = ActivationMap::new(3, 4);
        assert_eq!(
            grid.set_activation_map(&wrong),
            Err(Error::ShapeMismatch {
                expected: (3, 3),
                actual: (3, 4),
            })
        );
        // untouched
        assert_eq!(grid.activation_map(), fixture());
    }

    #[test]
    fn neighbors_follow_fixed_order_and_bounds() {
        let grid = CellGrid::new(3, 3);
        let corner: Vec<_> = grid.neighbors(TilePos::new(0, 0)).collect();
        assert_eq!(
            corner,
            vec![
                (Direction::E, TilePos::new(0, 1)),
                (Direction::SE, TilePos::new(1, 1)),
                (Direction::S, TilePos::new(1, 0)),
            ]
        );
        assert_eq!(grid.neighbors(TilePos::new(1, 1)).count(), 8);

        assert!(grid.in_bounds(2, 2));
        assert!(!grid.in_bounds(-1, 0));
        assert!(!grid.in_bounds(0, 3));
    }

    #[test]
    fn active_neighbors_filter_inactive() {
        let grid = CellGrid::from_activation(&fixture());
        let nbs: Vec<_> = grid.active_neighbors(TilePos::new(1, 1)).collect();
        assert_eq!(
            nbs,
            vec![
                (Direction::SE, TilePos::new(2, 2)),
                (Direction::NW, TilePos::new(0, 0)),
            ]
        );
    }

    #[test]
    fn claim_sets_ownership_once() {
        let mut grid = CellGrid::from_activation(&fixture());
        let p = TilePos::new(1, 1);
        grid.claim(p, 4, 2).expect("fresh tile");
        assert!(grid[p].is_visited());
        assert_eq!(grid[p].chain_id(), Some(4));
        assert_eq!(grid[p].index_in_chain(), Some(2));

        assert_eq!(grid.claim(p, 5, 0), Err(Error::AlreadyClaimed { pos: p }));
        assert_eq!(grid[p].chain_id(), Some(4));
        assert!(!grid.is_pristine());
    }

    #[test]
    fn discard_marks_visited_without_owner() {
        let mut grid = CellGrid::from_activation(&fixture());
        let p = TilePos::new(0, 0);
        grid.discard(p).expect("fresh tile");
        assert!(grid[p].is_visited());
        assert_eq!(grid[p].chain_id(), None);
        assert_eq!(grid[p].index_in_chain(), None);
        assert_eq!(grid.count_visited(), 1);
    }

    #[test]
    fn claim_outside_the_grid_is_rejected() {
        let mut grid = CellGrid::from_activation(&fixture());
        let p = TilePos::new(3, 1);
        assert_eq!(
            grid.claim(p, 0, 0),
            Err(Error::OutOfBounds {
                pos: p,
                height: 3,
                width: 3,
            })
        );
        assert_eq!(
            grid.discard(p),
            Err(Error::OutOfBounds {
                pos: p,
                height: 3,
                width: 3,
            })
        );
        assert!(grid.is_pristine());
    }
}
