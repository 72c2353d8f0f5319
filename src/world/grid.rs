//! Grid data structure
//!
//! The fixed-size 2D array of cells every generation phase reads and writes.

use std::fmt;
use std::ops::{Index, IndexMut};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::cell::Cell;

/// Smallest grid edge that still leaves an interior inside the rim
pub const MIN_GRID_DIMENSION: i32 = 3;

/// A coordinate on the grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    pub fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    pub fn offset(&self, dx: i32, dy: i32) -> Position {
        Position::new(self.x + dx, self.y + dy)
    }
}

/// 4-connected neighborhood offsets
pub const CARDINALS: [(i32, i32); 4] = [(0, 1), (0, -1), (-1, 0), (1, 0)];

/// Errors raised by grid construction and checked access
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GridError {
    #[error("coordinate ({x}, {y}) is outside the {width}x{height} grid")]
    OutOfBounds { x: i32, y: i32, width: i32, height: i32 },

    #[error("grid dimensions must be odd, got {width}x{height}")]
    EvenDimension { width: i32, height: i32 },

    #[error("grid dimensions must be at least {min}, got {width}x{height}", min = MIN_GRID_DIMENSION)]
    TooSmall { width: i32, height: i32 },

    #[error("grid of {width}x{height} cells is too large to allocate")]
    TooLarge { width: i32, height: i32 },

    #[error("unknown cell code {code} at ({x}, {y})")]
    InvalidCell { code: u8, x: i32, y: i32 },

    #[error("row {row} has a different length than row 0")]
    RaggedRows { row: usize },

    #[error("grid has no rows")]
    Empty,
}

/// A dungeon layout grid
///
/// Dimensions are odd and fixed at construction. Maze growth only lands on
/// even coordinates, so the odd lattice between them acts as walls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Vec<u8>>", into = "Vec<Vec<u8>>")]
pub struct Grid {
    width: i32,
    height: i32,
    cells: Vec<Cell>,
}

impl Grid {
    /// Create a new grid filled with walls
    pub fn new(width: i32, height: i32) -> Result<Self, GridError> {
        if width < MIN_GRID_DIMENSION || height < MIN_GRID_DIMENSION {
            return Err(GridError::TooSmall { width, height });
        }
        if width % 2 == 0 || height % 2 == 0 {
            return Err(GridError::EvenDimension { width, height });
        }

        let area = width
            .checked_mul(height)
            .ok_or(GridError::TooLarge { width, height })?;

        Ok(Self {
            width,
            height,
            cells: vec![Cell::Wall; area as usize],
        })
    }

    pub fn width(&self) -> i32 {
        self.width
    }

    pub fn height(&self) -> i32 {
        self.height
    }

    /// Total number of cells
    pub fn area(&self) -> usize {
        self.cells.len()
    }

    /// Convert 2D coordinates to 1D index
    #[inline]
    pub fn xy_to_idx(&self, x: i32, y: i32) -> usize {
        (y * self.width + x) as usize
    }

    /// Convert 1D index to 2D coordinates
    #[inline]
    pub fn idx_to_xy(&self, idx: usize) -> (i32, i32) {
        let idx = idx as i32;
        (idx % self.width, idx / self.width)
    }

    /// Check if coordinates are within bounds
    #[inline]
    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width && y >= 0 && y < self.height
    }

    /// Whether the coordinate lies on the outermost ring
    pub fn is_rim(&self, x: i32, y: i32) -> bool {
        x == 0 || y == 0 || x == self.width - 1 || y == self.height - 1
    }

    /// Get the cell at a position
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        if self.in_bounds(x, y) {
            Some(self.cells[self.xy_to_idx(x, y)])
        } else {
            None
        }
    }

    /// Set the cell at a position
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> Result<(), GridError> {
        if !self.in_bounds(x, y) {
            return Err(self.out_of_bounds(x, y));
        }
        let idx = self.xy_to_idx(x, y);
        self.cells[idx] = cell;
        Ok(())
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Count cells in the given state
    pub fn count(&self, cell: Cell) -> usize {
        self.cells.iter().filter(|&&c| c == cell).count()
    }

    /// All positions holding the given state, row-major
    pub fn positions_of(&self, cell: Cell) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| **c == cell)
            .map(|(idx, _)| {
                let (x, y) = self.idx_to_xy(idx);
                Position::new(x, y)
            })
            .collect()
    }

    /// In-bounds 4-connected neighbors of a position
    pub fn cardinal_neighbors(&self, pos: Position) -> impl Iterator<Item = Position> + '_ {
        CARDINALS
            .iter()
            .map(move |&(dx, dy)| pos.offset(dx, dy))
            .filter(move |p| self.in_bounds(p.x, p.y))
    }

    /// Number of in-bounds cardinal neighbors in the given state
    pub fn count_cardinal(&self, pos: Position, cell: Cell) -> usize {
        self.cardinal_neighbors(pos)
            .filter(|p| self[(p.x, p.y)] == cell)
            .count()
    }

    /// Replace every transient room cell with its merged state
    pub fn normalize(&mut self) {
        for cell in &mut self.cells {
            *cell = cell.normalized();
        }
    }

    /// Rows of export codes, increasing y
    pub fn to_rows(&self) -> Vec<Vec<u8>> {
        self.cells
            .chunks(self.width as usize)
            .map(|row| row.iter().map(Cell::code).collect())
            .collect()
    }

    fn out_of_bounds(&self, x: i32, y: i32) -> GridError {
        GridError::OutOfBounds {
            x,
            y,
            width: self.width,
            height: self.height,
        }
    }
}

impl Index<(i32, i32)> for Grid {
    type Output = Cell;

    /// Panics on out-of-range access; callers check bounds first
    fn index(&self, (x, y): (i32, i32)) -> &Cell {
        if !self.in_bounds(x, y) {
            panic!("{}", self.out_of_bounds(x, y));
        }
        &self.cells[self.xy_to_idx(x, y)]
    }
}

impl IndexMut<(i32, i32)> for Grid {
    fn index_mut(&mut self, (x, y): (i32, i32)) -> &mut Cell {
        if !self.in_bounds(x, y) {
            panic!("{}", self.out_of_bounds(x, y));
        }
        let idx = self.xy_to_idx(x, y);
        &mut self.cells[idx]
    }
}

impl TryFrom<Vec<Vec<u8>>> for Grid {
    type Error = GridError;

    fn try_from(rows: Vec<Vec<u8>>) -> Result<Self, Self::Error> {
        let first = rows.first().ok_or(GridError::Empty)?;
        let width = first.len() as i32;
        let height = rows.len() as i32;
        let mut grid = Grid::new(width, height)?;

        for (y, row) in rows.iter().enumerate() {
            if row.len() != first.len() {
                return Err(GridError::RaggedRows { row: y });
            }
            for (x, &code) in row.iter().enumerate() {
                let (x, y) = (x as i32, y as i32);
                let cell = Cell::from_code(code).ok_or(GridError::InvalidCell { code, x, y })?;
                grid[(x, y)] = cell;
            }
        }

        Ok(grid)
    }
}

impl From<Grid> for Vec<Vec<u8>> {
    fn from(grid: Grid) -> Self {
        grid.to_rows()
    }
}

impl fmt::Display for Grid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.width as usize) {
            let line: String = row.iter().map(Cell::glyph).collect();
            writeln!(f, "{}", line)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_grid_is_all_wall() {
        let grid = Grid::new(7, 5).unwrap();
        assert_eq!(grid.width(), 7);
        assert_eq!(grid.height(), 5);
        assert_eq!(grid.count(Cell::Wall), 35);
    }

    #[test]
    fn test_rejects_even_and_tiny_dimensions() {
        assert_eq!(
            Grid::new(8, 5),
            Err(GridError::EvenDimension { width: 8, height: 5 })
        );
        assert_eq!(Grid::new(1, 5), Err(GridError::TooSmall { width: 1, height: 5 }));
    }

    #[test]
    fn test_rejects_overflowing_area() {
        assert_eq!(
            Grid::new(46_341, 46_341),
            Err(GridError::TooLarge { width: 46_341, height: 46_341 })
        );
    }

    #[test]
    fn test_checked_access() {
        let mut grid = Grid::new(5, 5).unwrap();
        assert!(grid.set(4, 4, Cell::Floor).is_ok());
        assert_eq!(grid.get(4, 4), Some(Cell::Floor));
        assert_eq!(grid.get(5, 0), None);
        assert!(matches!(
            grid.set(-1, 0, Cell::Floor),
            Err(GridError::OutOfBounds { x: -1, y: 0, .. })
        ));
    }

    #[test]
    #[should_panic(expected = "outside")]
    fn test_index_out_of_bounds_panics() {
        let grid = Grid::new(5, 5).unwrap();
        let _ = grid[(5, 2)];
    }

    #[test]
    fn test_idx_roundtrip() {
        let grid = Grid::new(9, 7).unwrap();
        let idx = grid.xy_to_idx(3, 4);
        assert_eq!(grid.idx_to_xy(idx), (3, 4));
    }

    #[test]
    fn test_cardinal_neighbors_clip_at_edges() {
        let grid = Grid::new(5, 5).unwrap();
        assert_eq!(grid.cardinal_neighbors(Position::new(0, 0)).count(), 2);
        assert_eq!(grid.cardinal_neighbors(Position::new(2, 0)).count(), 3);
        assert_eq!(grid.cardinal_neighbors(Position::new(2, 2)).count(), 4);
    }

    #[test]
    fn test_normalize_clears_room_cells() {
        let mut grid = Grid::new(5, 5).unwrap();
        grid[(2, 2)] = Cell::RoomInterior;
        grid.normalize();
        assert_eq!(grid[(2, 2)], Cell::Floor);
        assert_eq!(grid.count(Cell::RoomInterior), 0);
    }

    #[test]
    fn test_rows_are_row_major() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid[(2, 0)] = Cell::Floor;
        let rows = grid.to_rows();
        assert_eq!(rows[0], vec![0, 0, 1]);
        assert_eq!(rows.len(), 3);
    }

    #[test]
    fn test_try_from_rejects_bad_rows() {
        assert_eq!(Grid::try_from(Vec::new()), Err(GridError::Empty));
        let ragged = vec![vec![0, 0, 0], vec![0, 0], vec![0, 0, 0]];
        assert_eq!(Grid::try_from(ragged), Err(GridError::RaggedRows { row: 1 }));
        let bad = vec![vec![0, 0, 0], vec![0, 9, 0], vec![0, 0, 0]];
        assert_eq!(
            Grid::try_from(bad),
            Err(GridError::InvalidCell { code: 9, x: 1, y: 1 })
        );
    }

    #[test]
    fn test_display_uses_glyphs() {
        let mut grid = Grid::new(3, 3).unwrap();
        grid[(1, 1)] = Cell::Floor;
        assert_eq!(grid.to_string(), "###\n#.#\n###\n");
    }
}
