use rand::thread_rng;

use crate::error::{Error, Result};
use crate::exploration::EpsilonGreedy;
use crate::grid::{Cell, Warehouse};
use crate::q_table::QTable;

/// Greedy path extraction over a trained [`QTable`].
///
/// Holds shared borrows only: the table is frozen while paths are queried,
/// so repeated queries from the same start yield identical paths.
pub struct PathFinder<'a> {
    env: &'a Warehouse,
    q: &'a QTable,
}

impl<'a> PathFinder<'a> {
    pub fn new(env: &'a Warehouse, q: &'a QTable) -> Self {
        Self { env, q }
    }

    /// Follow the greedy policy from `start` until a terminal cell,
    /// collecting every visited cell including `start` itself.
    ///
    /// Returns an empty path when `start` is already terminal (a storage
    /// square or the goal). An empty result is the degenerate-start signal
    /// callers must check before rendering. Fails with
    /// [`Error::InvalidCell`] when `start` lies outside the grid.
    ///
    /// The walk has no step bound and no cycle detection: under a table
    /// whose greedy policy never reaches a terminal cell (undertrained, or
    /// trapped in a local optimum) it loops forever. That mirrors the real
    /// behavior of the learned policy and is deliberately not capped here;
    /// use [`shortest_path_capped`](Self::shortest_path_capped) to impose a
    /// step budget.
    pub fn shortest_path(&self, start: Cell) -> Result<Vec<Cell>> {
        self.walk(start, None)
    }

    /// Same walk as [`shortest_path`](Self::shortest_path), but fails with
    /// [`Error::StepLimit`] once `max_steps` moves have been taken without
    /// reaching a terminal cell
    pub fn shortest_path_capped(&self, start: Cell, max_steps: usize) -> Result<Vec<Cell>> {
        self.walk(start, Some(max_steps))
    }

    fn walk(&self, start: Cell, max_steps: Option<usize>) -> Result<Vec<Cell>> {
        if !self.env.contains(start) {
            return Err(Error::InvalidCell {
                row: start.row,
                col: start.col,
            });
        }
        if self.env.is_terminal(start) {
            return Ok(Vec::new());
        }

        // Epsilon 1.0 always exploits, so the draw never changes the
        // outcome and the walk is deterministic.
        let policy = EpsilonGreedy::new(1.0);
        let mut rng = thread_rng();
        let mut path = vec![start];
        let mut cell = start;
        let mut steps = 0;
        while !self.env.is_terminal(cell) {
            if let Some(limit) = max_steps {
                if steps == limit {
                    return Err(Error::StepLimit { limit });
                }
            }
            let action = policy.select(self.q, cell, &mut rng);
            cell = action.apply(cell);
            path.push(cell);
            steps += 1;
        }

        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::action::Action;
    use crate::grid::{AISLE_REWARD, COLS, ROWS};
    use crate::trainer::{Trainer, TrainerConfig};
    use rand::{rngs::StdRng, SeedableRng};

    fn trained() -> (Warehouse, QTable) {
        let env = Warehouse::new();
        let mut q = QTable::new();
        let mut rng = StdRng::seed_from_u64(42);
        Trainer::new(TrainerConfig::default()).train(&env, &mut q, &mut rng);
        (env, q)
    }

    #[test]
    fn terminal_starts_yield_an_empty_path() {
        let env = Warehouse::new();
        let q = QTable::new();
        let finder = PathFinder::new(&env, &q);
        // storage corner and the goal itself
        assert_eq!(finder.shortest_path(Cell::new(0, 0)), Ok(Vec::new()));
        assert_eq!(finder.shortest_path(env.goal()), Ok(Vec::new()));
    }

    #[test]
    fn out_of_bounds_start_fails() {
        let env = Warehouse::new();
        let q = QTable::new();
        let finder = PathFinder::new(&env, &q);
        assert_eq!(
            finder.shortest_path(Cell::new(ROWS, 3)),
            Err(Error::InvalidCell { row: ROWS, col: 3 })
        );
    }

    #[test]
    fn trained_path_reaches_the_goal_through_aisles() {
        let (env, q) = trained();
        let finder = PathFinder::new(&env, &q);
        let start = Cell::new(9, 3);
        let path = finder
            .shortest_path_capped(start, ROWS * COLS)
            .expect("trained policy should reach the goal");

        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&env.goal()));
        for &cell in &path[..path.len() - 1] {
            assert_eq!(env.reward(cell), Ok(AISLE_REWARD));
        }
        // consecutive cells are one clamped move apart
        for pair in path.windows(2) {
            let dr = pair[0].row.abs_diff(pair[1].row);
            let dc = pair[0].col.abs_diff(pair[1].col);
            assert_eq!(dr + dc, 1);
        }
    }

    #[test]
    fn repeated_queries_are_identical() {
        let (env, q) = trained();
        let finder = PathFinder::new(&env, &q);
        let start = Cell::new(9, 3);
        assert_eq!(
            finder.shortest_path_capped(start, ROWS * COLS),
            finder.shortest_path_capped(start, ROWS * COLS)
        );
    }

    #[test]
    fn zero_table_rollout_can_end_on_storage() {
        let env = Warehouse::new();
        let q = QTable::new();
        let finder = PathFinder::new(&env, &q);
        // all-zero table is greedy toward Up; from (1, 1) that crashes
        // straight into the storage row above
        let path = finder.shortest_path(Cell::new(1, 1)).unwrap();
        assert_eq!(path, vec![Cell::new(1, 1), Cell::new(0, 1)]);
        assert!(env.is_terminal(Cell::new(0, 1)));
    }

    #[test]
    fn cyclic_policy_hits_the_step_limit() {
        let env = Warehouse::new();
        let mut q = QTable::new();
        // two adjacent aisle cells pointing at each other
        let a = Cell::new(5, 4);
        let b = Cell::new(5, 5);
        q.set(a, Action::Right, 1.0);
        q.set(b, Action::Left, 1.0);

        let finder = PathFinder::new(&env, &q);
        assert_eq!(
            finder.shortest_path_capped(a, 10),
            Err(Error::StepLimit { limit: 10 })
        );
    }
}
