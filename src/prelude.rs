pub use crate::cube::*;
pub use crate::heuristic::*;
pub use crate::history::*;
pub use crate::r#move::*;
pub use crate::solver::*;

pub use std::time::Duration;
