//! Board module - the placed-block grid and collision engine
//!
//! The board is a 10x40 grid stored as a flat array, bottom row first
//! (`index = x + y * WIDTH`). Only the bottom 20 rows are the visible field;
//! the rows above are headroom for spawning and wall kicks.
//!
//! Every movement, rotation and drop decision goes through
//! [`Board::is_blocked`].

use arrayvec::ArrayVec;

use crate::pieces::mask;
use crate::types::{Cell, PieceKind, Rotation, BOARD_HEIGHT, BOARD_WIDTH, EMPTY_CELL, VISIBLE_HEIGHT};

/// Total number of cells on the board
pub const BOARD_SIZE: usize = BOARD_WIDTH * BOARD_HEIGHT;

/// Indices of rows removed by one [`Board::clear_full_rows`] call, bottom first.
pub type ClearedRows = ArrayVec<usize, BOARD_HEIGHT>;

/// The game board - 10 columns x 40 rows using flat array storage
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    /// Flat array of cells, row-major, bottom row first
    cells: [Cell; BOARD_SIZE],
}

impl Board {
    /// Create a new empty board
    pub fn new() -> Self {
        Self {
            cells: [EMPTY_CELL; BOARD_SIZE],
        }
    }

    /// Flat index for `(x, y)`, `None` when outside the grid.
    #[inline(always)]
    fn index(x: i32, y: i32) -> Option<usize> {
        if x < 0 || x >= BOARD_WIDTH as i32 || y < 0 || y >= BOARD_HEIGHT as i32 {
            return None;
        }
        Some(y as usize * BOARD_WIDTH + x as usize)
    }

    pub fn width(&self) -> usize {
        BOARD_WIDTH
    }

    pub fn height(&self) -> usize {
        BOARD_HEIGHT
    }

    /// Get cell at position (x, y)
    /// Returns None if out of bounds
    pub fn get(&self, x: i32, y: i32) -> Option<Cell> {
        Self::index(x, y).map(|idx| self.cells[idx])
    }

    /// Set cell at position (x, y)
    /// Returns false if out of bounds
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> bool {
        match Self::index(x, y) {
            Some(idx) => {
                self.cells[idx] = cell;
                true
            }
            None => false,
        }
    }

    /// Within bounds and holding a locked block
    pub fn is_occupied(&self, x: i32, y: i32) -> bool {
        matches!(self.get(x, y), Some(cell) if cell != EMPTY_CELL)
    }

    /// Collision predicate for a piece pose.
    ///
    /// True when any occupied cell of `kind` at `rotation`, placed with its
    /// origin at `(x, y)`, lies outside the grid or on a locked block.
    pub fn is_blocked(&self, kind: PieceKind, rotation: Rotation, x: i32, y: i32) -> bool {
        let bits = mask(kind, rotation);
        (0..16).filter(|&i| bits & (1 << i) != 0).any(|i| {
            match Self::index(x + (i & 3), y + (i >> 2)) {
                Some(idx) => self.cells[idx] != EMPTY_CELL,
                None => true,
            }
        })
    }

    /// Write a piece into the grid as `kind id + 1`.
    ///
    /// Cells outside the grid are dropped rather than rejected, so a piece
    /// that locks partly above the board still leaves its in-range blocks.
    /// Returns how many cells were written.
    pub fn lock_piece(&mut self, kind: PieceKind, rotation: Rotation, x: i32, y: i32) -> usize {
        let bits = mask(kind, rotation);
        let mut written = 0;
        for i in (0..16).filter(|&i| bits & (1 << i) != 0) {
            if self.set(x + (i & 3), y + (i >> 2), kind.cell_value()) {
                written += 1;
            }
        }
        written
    }

    /// Check if a row is completely filled
    pub fn is_row_full(&self, y: usize) -> bool {
        if y >= BOARD_HEIGHT {
            return false;
        }
        let start = y * BOARD_WIDTH;
        self.cells[start..start + BOARD_WIDTH]
            .iter()
            .all(|&cell| cell != EMPTY_CELL)
    }

    /// Remove every full row and let the rows above fall into place.
    ///
    /// The topmost row is headroom and is never cleared, though it still
    /// shifts down with everything else. Survivors keep their relative order
    /// and the vacated rows at the top are zero-filled. Returns the removed
    /// row indices (pre-clear coordinates, bottom first).
    pub fn clear_full_rows(&mut self) -> ClearedRows {
        let mut cleared = ClearedRows::new();
        let mut write_y = 0usize;

        for read_y in 0..BOARD_HEIGHT {
            if read_y < BOARD_HEIGHT - 1 && self.is_row_full(read_y) {
                cleared.push(read_y);
                continue;
            }
            if write_y != read_y {
                let src = read_y * BOARD_WIDTH;
                self.cells
                    .copy_within(src..src + BOARD_WIDTH, write_y * BOARD_WIDTH);
            }
            write_y += 1;
        }

        self.cells[write_y * BOARD_WIDTH..].fill(EMPTY_CELL);
        cleared
    }

    /// Rows from the floor up to and including the highest block in column `x`
    pub fn column_height(&self, x: usize) -> usize {
        if x >= BOARD_WIDTH {
            return 0;
        }
        (0..BOARD_HEIGHT)
            .rev()
            .find(|&y| self.cells[y * BOARD_WIDTH + x] != EMPTY_CELL)
            .map_or(0, |y| y + 1)
    }

    /// Height of the tallest column
    pub fn max_height(&self) -> usize {
        (0..BOARD_WIDTH).map(|x| self.column_height(x)).max().unwrap_or(0)
    }

    /// Empty cells with a block somewhere above them in the same column
    pub fn hole_count(&self) -> usize {
        (0..BOARD_WIDTH)
            .map(|x| {
                (0..self.column_height(x))
                    .filter(|&y| self.cells[y * BOARD_WIDTH + x] == EMPTY_CELL)
                    .count()
            })
            .sum()
    }

    /// All cells, row-major, bottom row first
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// The bottom 20 rows only
    pub fn visible_cells(&self) -> &[Cell] {
        &self.cells[..VISIBLE_HEIGHT * BOARD_WIDTH]
    }

    /// One row, `None` when out of range
    pub fn row(&self, y: usize) -> Option<&[Cell]> {
        if y >= BOARD_HEIGHT {
            return None;
        }
        let start = y * BOARD_WIDTH;
        Some(&self.cells[start..start + BOARD_WIDTH])
    }

    /// Clear the entire board
    pub fn clear(&mut self) {
        self.cells.fill(EMPTY_CELL);
    }

    /// Build a board from rows given bottom first; missing rows are empty.
    pub fn from_rows(rows: &[[Cell; BOARD_WIDTH]]) -> Self {
        let mut board = Self::new();
        for (y, row) in rows.iter().take(BOARD_HEIGHT).enumerate() {
            board.cells[y * BOARD_WIDTH..(y + 1) * BOARD_WIDTH].copy_from_slice(row);
        }
        board
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}
