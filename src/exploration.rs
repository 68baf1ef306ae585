use rand::{seq::IteratorRandom, Rng};
use strum::IntoEnumIterator;

use crate::action::Action;
use crate::grid::Cell;
use crate::q_table::QTable;

/// Exploration policy result
pub enum Choice {
    Explore,
    Exploit,
}

/// Epsilon-greedy action selection over a [`QTable`].
///
/// Note the convention: `epsilon` is the probability of EXPLOITING (taking
/// the greedy action), not of exploring. This is inverted from the usual
/// textbook parameterization and kept that way on purpose; a caller that
/// wants a fully greedy policy passes 1.0.
///
/// No range is enforced. Values above 1 always exploit, values at or below
/// 0 always explore; restricting the useful range is left to the caller.
pub struct EpsilonGreedy {
    epsilon: f64,
}

impl EpsilonGreedy {
    pub fn new(epsilon: f64) -> Self {
        Self { epsilon }
    }

    /// Draw once against epsilon for the current step
    pub fn choose(&self, rng: &mut impl Rng) -> Choice {
        if rng.gen::<f64>() < self.epsilon {
            Choice::Exploit
        } else {
            Choice::Explore
        }
    }

    /// Pick the next action at `cell`: the greedy action under `q` when
    /// exploiting, a uniformly random one when exploring
    pub fn select(&self, q: &QTable, cell: Cell, rng: &mut impl Rng) -> Action {
        match self.choose(rng) {
            Choice::Exploit => q.greedy(cell),
            Choice::Explore => Action::iter()
                .choose(rng)
                .expect("there is always at least one action available"),
        }
    }
}
