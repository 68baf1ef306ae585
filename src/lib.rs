//! Tabular Q-learning for warehouse robot pathfinding.
//!
//! A fixed 11x11 warehouse floor plan is navigated by a robot that learns,
//! through episodic temporal-difference updates, the shortest route from any
//! aisle cell to the item packaging area. Once trained, the greedy policy is
//! followed to extract the route for display.
//!
//! Everything runs synchronously in memory: training completes before path
//! queries, and nothing is persisted between runs.

/// Grid movement actions
pub mod action;

/// Error types
pub mod error;

/// Exploration policies
pub mod exploration;

/// The warehouse floor plan and reward model
pub mod grid;

/// Greedy path extraction
pub mod path;

/// The learned action-value table
pub mod q_table;

/// Episodic Q-learning
pub mod trainer;

/// Terminal UI for interactive training and path rendering
#[cfg(feature = "viz")]
pub mod viz;

pub use action::Action;
pub use error::{Error, Result};
pub use exploration::EpsilonGreedy;
pub use grid::{Cell, Square, Warehouse};
pub use path::PathFinder;
pub use q_table::QTable;
pub use trainer::{Trainer, TrainerConfig};
