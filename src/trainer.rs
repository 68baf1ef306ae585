use log::{debug, info};
use rand::Rng;

use crate::exploration::EpsilonGreedy;
use crate::grid::Warehouse;
use crate::q_table::QTable;

/// Configuration for the [`Trainer`]
pub struct TrainerConfig {
    /// Probability of taking the greedy action during training
    /// (see [`EpsilonGreedy`] for the inverted convention)
    pub epsilon: f64,
    /// Discount factor for future rewards
    pub discount_factor: f64,
    /// Step size of each temporal-difference update
    pub learning_rate: f64,
    /// Fixed number of episodes to run
    pub episodes: u32,
}

impl Default for TrainerConfig {
    fn default() -> Self {
        Self {
            epsilon: 0.9,
            discount_factor: 0.9,
            learning_rate: 0.9,
            episodes: 1000,
        }
    }
}

/// Episodic tabular Q-learning over the warehouse grid.
///
/// Holds no state of its own beyond the configuration; the table being
/// trained is borrowed exclusively for the duration of [`train`](Self::train).
pub struct Trainer {
    config: TrainerConfig,
}

impl Trainer {
    pub fn new(config: TrainerConfig) -> Self {
        Self { config }
    }

    /// Run the full episode budget, mutating `q` in place.
    ///
    /// Always runs exactly `episodes` episodes; there is no convergence
    /// check, so a stabilized table keeps receiving (no-op) updates. Each
    /// episode starts from a random non-terminal cell and steps until a
    /// terminal cell, applying the Bellman temporal-difference update
    /// `q += learning_rate * (reward + discount_factor * max_next - q)`
    /// in plain `f64`, with no clipping.
    pub fn train(&self, env: &Warehouse, q: &mut QTable, rng: &mut impl Rng) {
        let TrainerConfig {
            epsilon,
            discount_factor,
            learning_rate,
            episodes,
        } = self.config;
        let policy = EpsilonGreedy::new(epsilon);

        for episode in 0..episodes {
            let mut cell = env.random_start(rng);
            while !env.is_terminal(cell) {
                let action = policy.select(q, cell, rng);
                let next = action.apply(cell);

                // The reward belongs to the cell the move lands on. Clamped
                // moves land back on `cell`, so the lookup stays in bounds.
                let reward = env.square(next).reward();
                let old_q = q.get(cell, action);
                let td = reward + discount_factor * q.max(next) - old_q;
                q.set(cell, action, old_q + learning_rate * td);

                cell = next;
            }

            if (episode + 1) % 100 == 0 {
                debug!("episode {}/{}", episode + 1, episodes);
            }
        }

        info!("training complete after {episodes} episodes");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grid::Cell;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn values_propagate_toward_the_goal() {
        let env = Warehouse::new();
        let mut q = QTable::new();
        let mut rng = StdRng::seed_from_u64(42);
        Trainer::new(TrainerConfig::default()).train(&env, &mut q, &mut rng);

        // the aisle directly under the goal should value its best action
        // well above a far corner aisle's best
        let near = q.max(Cell::new(1, 5));
        let far = q.max(Cell::new(9, 1));
        assert!(near > 0.0, "near-goal value should be positive, got {near}");
        assert!(
            near > far,
            "expected value to decay with distance: near {near}, far {far}"
        );
    }

    #[test]
    fn runs_the_exact_episode_budget_even_when_zero() {
        let env = Warehouse::new();
        let mut q = QTable::new();
        let mut rng = StdRng::seed_from_u64(1);
        let config = TrainerConfig {
            episodes: 0,
            ..Default::default()
        };
        Trainer::new(config).train(&env, &mut q, &mut rng);

        // untouched table
        for row in 0..crate::grid::ROWS {
            for col in 0..crate::grid::COLS {
                assert_eq!(q.max(Cell::new(row, col)), 0.0);
            }
        }
    }
}
