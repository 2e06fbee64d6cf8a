//! Searches for move sequences that restore a scrambled 3x3 cube.
//!
//! A cube state is a 54-character string over the alphabet `W O G R B Y`,
//! face order up, left, front, right, back, down, row-major within each
//! face. Three interchangeable strategies implement the same solve
//! contract: exhaustive breadth-first search, cost-bounded iterative
//! deepening, and a two-phase engine that transparently falls back to the
//! iterative-deepening search when it cannot answer.
//!
//! ```
//! use snapcube::{solve, SolveConfig, Strategy};
//!
//! let scrambled = "WWWWWWWWWGGGOOOOOORRRGGGGGGBBBRRRRRROOOBBBBBBYYYYYYYYY";
//! let config = SolveConfig {
//!     strategy: Strategy::IdaStar,
//!     ..SolveConfig::default()
//! };
//! let solution = solve(scrambled, &config).unwrap();
//! assert_eq!(solution.to_string(), "U'");
//! ```

pub mod cube;
pub mod heuristic;
pub mod history;
pub mod r#move;
pub mod prelude;
pub mod solver;

pub use crate::cube::{Color, Cube, Face, InvalidState, SOLVED_STATE};
pub use crate::heuristic::Heuristic;
pub use crate::history::MoveHistory;
pub use crate::r#move::{format_sequence, Direction, Move, ParseMoveError};
pub use crate::solver::{
    solve, Bfs, Delegating, IdaStar, SolveConfig, SolveError, Solution, Solver, Strategy,
    TwoPhase, MAX_SOLUTION_LEN,
};
