use rand::Rng;

use crate::error::{Error, Result};

/// Number of rows in the warehouse grid
pub const ROWS: usize = 11;
/// Number of columns in the warehouse grid
pub const COLS: usize = 11;

/// Reward for reaching the packaging area
pub const GOAL_REWARD: f64 = 100.0;
/// Reward for each move through an aisle, penalizing long routes
pub const AISLE_REWARD: f64 = -1.0;
/// Reward for crashing into an item storage rack
pub const STORAGE_REWARD: f64 = -100.0;

/// A (row, column) grid coordinate, 0-indexed from the top-left corner
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct Cell {
    pub row: usize,
    pub col: usize,
}

impl Cell {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }
}

/// What occupies a single square of the warehouse floor
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Square {
    /// Traversable floor, the only non-terminal kind
    Aisle,
    /// An item storage rack
    Storage,
    /// The item packaging area
    Goal,
}

impl Square {
    /// Reward received for entering a square of this kind
    pub const fn reward(self) -> f64 {
        match self {
            Square::Aisle => AISLE_REWARD,
            Square::Storage => STORAGE_REWARD,
            Square::Goal => GOAL_REWARD,
        }
    }
}

/// Aisle columns for rows 1 through 9. Rows 0 and 10 are solid storage
/// apart from the goal.
const AISLES: [(usize, &[usize]); 9] = [
    (1, &[1, 2, 3, 4, 5, 6, 7, 8, 9]),
    (2, &[1, 9]),
    (3, &[1, 2, 3, 4, 5, 6, 7, 9]),
    (4, &[3, 7, 9]),
    (5, &[1, 2, 3, 4, 5, 6, 7, 8, 9]),
    (6, &[2, 5, 8]),
    (7, &[1, 2, 3, 4, 5, 6, 7, 8, 9]),
    (8, &[1, 9]),
    (9, &[1, 2, 3, 4, 5, 6, 7, 8, 9]),
];

const GOAL: Cell = Cell::new(0, 5);

/// The fixed 11x11 warehouse floor plan.
///
/// Every square is classified once at construction; terminality is a
/// property of the square kind (everything but an [`Square::Aisle`] ends an
/// episode), never a comparison against reward values at query time.
pub struct Warehouse {
    squares: [[Square; COLS]; ROWS],
}

impl Warehouse {
    /// Build the fixed layout: storage everywhere, then the goal, then the
    /// aisles. The three passes never overlap in this layout, but the order
    /// is what resolves a conflict if the configuration is ever edited.
    pub fn new() -> Self {
        let mut squares = [[Square::Storage; COLS]; ROWS];
        squares[GOAL.row][GOAL.col] = Square::Goal;
        for (row, cols) in AISLES {
            for &col in cols {
                squares[row][col] = Square::Aisle;
            }
        }
        Self { squares }
    }

    /// Whether `cell` lies inside the grid
    pub fn contains(&self, cell: Cell) -> bool {
        cell.row < ROWS && cell.col < COLS
    }

    /// Kind of the square at `cell`, which must be in bounds
    pub fn square(&self, cell: Cell) -> Square {
        self.squares[cell.row][cell.col]
    }

    /// Static reward for entering `cell`
    pub fn reward(&self, cell: Cell) -> Result<f64> {
        if !self.contains(cell) {
            return Err(Error::InvalidCell {
                row: cell.row,
                col: cell.col,
            });
        }
        Ok(self.square(cell).reward())
    }

    /// Whether `cell` ends an episode. The goal and every storage square
    /// are both terminal; only aisles can be moved through. `cell` must be
    /// in bounds.
    pub fn is_terminal(&self, cell: Cell) -> bool {
        self.square(cell) != Square::Aisle
    }

    /// The packaging area
    pub const fn goal(&self) -> Cell {
        GOAL
    }

    /// Draw a uniformly random non-terminal cell by rejection sampling.
    ///
    /// Retries are unbounded: on a grid with no aisle squares this would
    /// never return. The fixed layout has 54 aisles, so in practice a few
    /// draws suffice.
    pub fn random_start(&self, rng: &mut impl Rng) -> Cell {
        loop {
            let cell = Cell::new(rng.gen_range(0..ROWS), rng.gen_range(0..COLS));
            if !self.is_terminal(cell) {
                return cell;
            }
        }
    }
}
