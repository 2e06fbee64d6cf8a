use crate::prelude::*;

use std::fmt;
use std::time::{Duration, Instant};

use thiserror::Error;

mod bfs;
pub use bfs::Bfs;

mod ida;
pub use ida::IdaStar;

mod two_phase;
pub use two_phase::{Delegating, TwoPhase};

/// Any scrambled cube can be solved in at most this many face turns.
pub const MAX_SOLUTION_LEN: u32 = 20;

/// A solving strategy. All three share the same contract; they differ only
/// in optimality guarantees and latency.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strategy {
    /// Exhaustive breadth-first search; shortest solution, shallow scrambles only.
    Bfs,
    /// Cost-bounded iterative deepening guided by a heuristic; near-optimal.
    #[default]
    IdaStar,
    /// Two-phase engine, falling back to iterative deepening on any failure.
    TwoPhase,
}

#[derive(Debug, Clone)]
pub struct SolveConfig {
    pub strategy: Strategy,
    pub heuristic: Heuristic,
    /// Upper bound on states examined before the search gives up.
    pub node_budget: Option<u64>,
    /// Wall-clock bound, checked at every expansion.
    pub timeout: Option<Duration>,
    /// Breadth-first depth ceiling; the frontier grows exponentially past
    /// a handful of moves.
    pub max_bfs_depth: u32,
}

impl Default for SolveConfig {
    fn default() -> SolveConfig {
        SolveConfig {
            strategy: Strategy::default(),
            heuristic: Heuristic::default(),
            node_budget: None,
            timeout: None,
            max_bfs_depth: 8,
        }
    }
}

/// The outcome of a successful search: the restoring move sequence and how
/// many states the search examined to find it. Owned by the caller; nothing
/// is shared between solve calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Solution {
    pub moves: Vec<Move>,
    pub nodes_examined: u64,
}

impl fmt::Display for Solution {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", format_sequence(&self.moves))
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SolveError {
    #[error("invalid state: {0}")]
    InvalidState(#[from] InvalidState),
    #[error(
        "no solution within the configured bounds \
         ({nodes_examined} states examined, depth {depth_reached} reached)"
    )]
    NoSolution {
        nodes_examined: u64,
        depth_reached: u32,
    },
}

pub trait Solver {
    fn solve(&self, cube: &Cube) -> Result<Solution, SolveError>;
}

/// Validates `state` and runs the configured strategy against it.
pub fn solve(state: &str, config: &SolveConfig) -> Result<Solution, SolveError> {
    let cube: Cube = state.parse()?;
    log::debug!("solving {:?} with {:?}", state, config.strategy);
    match config.strategy {
        Strategy::Bfs => Bfs::new(config.clone()).solve(&cube),
        Strategy::IdaStar => IdaStar::new(config.clone()).solve(&cube),
        Strategy::TwoPhase => Delegating::new(config.clone()).solve(&cube),
    }
}

/// Per-call search bookkeeping: the examined-state counter plus the optional
/// node and wall-clock budgets. Never shared between calls, so independent
/// solves can run concurrently.
pub(crate) struct Budget {
    pub nodes: u64,
    limit: Option<u64>,
    deadline: Option<Instant>,
}

impl Budget {
    pub fn new(config: &SolveConfig) -> Budget {
        Budget {
            nodes: 0,
            limit: config.node_budget,
            deadline: config.timeout.map(|t| Instant::now() + t),
        }
    }

    /// Accounts for one examined state; false once a budget is exhausted.
    pub fn spend(&mut self) -> bool {
        self.nodes += 1;
        if self.limit.is_some_and(|limit| self.nodes > limit) {
            return false;
        }
        if self.deadline.is_some_and(|deadline| Instant::now() > deadline) {
            return false;
        }
        true
    }
}

/// Depth-first move pruning: skip the exact inverse of the preceding move,
/// and skip a third consecutive turn of the same face.
pub(crate) fn worth_applying(path: &[Move], next: Move) -> bool {
    match path.last() {
        Some(&prev) if next.cancels(prev) => return false,
        _ => {}
    }
    let n = path.len();
    n < 2 || path[n - 1].face != next.face || path[n - 2].face != next.face
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn solve_rejects_malformed_states_before_searching() {
        let config = SolveConfig::default();

        let short = &SOLVED_STATE[..53];
        assert!(matches!(
            solve(short, &config),
            Err(SolveError::InvalidState(InvalidState::WrongLength(53)))
        ));

        let bad_symbol = format!("Z{}", &SOLVED_STATE[1..]);
        assert!(matches!(
            solve(&bad_symbol, &config),
            Err(SolveError::InvalidState(InvalidState::BadSymbol { .. }))
        ));

        let bad_count = format!("O{}", &SOLVED_STATE[1..]);
        assert!(matches!(
            solve(&bad_count, &config),
            Err(SolveError::InvalidState(InvalidState::BadCount { .. }))
        ));
    }

    #[test]
    fn solve_dispatches_every_strategy() {
        let scrambled = Cube::solved().apply("F'".parse().unwrap());
        let state = scrambled.to_state_string();
        for strategy in [Strategy::Bfs, Strategy::IdaStar, Strategy::TwoPhase] {
            let config = SolveConfig {
                strategy,
                ..SolveConfig::default()
            };
            let solution = solve(&state, &config).unwrap();
            assert!(
                scrambled.apply_all(solution.moves).is_solved(),
                "{:?}",
                strategy
            );
        }
    }

    #[test]
    fn worth_applying_skips_the_inverse_of_the_last_move() {
        let path = Move::parse_sequence("R U").unwrap();
        assert!(!worth_applying(&path, "U'".parse().unwrap()));
        assert!(worth_applying(&path, "U".parse().unwrap()));
        assert!(worth_applying(&path, "F".parse().unwrap()));
        assert!(worth_applying(&[], "U'".parse().unwrap()));
    }

    #[test]
    fn worth_applying_skips_a_third_same_face_turn() {
        let path = Move::parse_sequence("U U").unwrap();
        assert!(!worth_applying(&path, "U".parse().unwrap()));
        assert!(!worth_applying(&path, "U2".parse().unwrap()));
        assert!(worth_applying(&path, "D".parse().unwrap()));
    }

    #[test]
    fn budget_counts_and_cuts_off() {
        let config = SolveConfig {
            node_budget: Some(2),
            ..SolveConfig::default()
        };
        let mut budget = Budget::new(&config);
        assert!(budget.spend());
        assert!(budget.spend());
        assert!(!budget.spend());
        assert_eq!(budget.nodes, 3);
    }
}
