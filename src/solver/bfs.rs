use crate::prelude::*;

use std::collections::{HashSet, VecDeque};

use crate::solver::Budget;

/// Exhaustive breadth-first search.
///
/// Explores the move graph level by level, so the first solution found is a
/// shortest one. The frontier grows by a factor of ~18 per level; useful for
/// scrambles a handful of moves deep, after which the depth ceiling or node
/// budget cuts the search off.
pub struct Bfs {
    config: SolveConfig,
}

impl Bfs {
    pub fn new(config: SolveConfig) -> Bfs {
        Bfs { config }
    }
}

impl Solver for Bfs {
    fn solve(&self, cube: &Cube) -> Result<Solution, SolveError> {
        if cube.is_solved() {
            return Ok(Solution {
                moves: Vec::new(),
                nodes_examined: 0,
            });
        }

        let mut budget = Budget::new(&self.config);
        let mut deepest = 0;

        let mut frontier: VecDeque<(Cube, Vec<Move>)> = VecDeque::new();
        frontier.push_back((*cube, Vec::new()));
        let mut visited: HashSet<Cube> = HashSet::new();
        visited.insert(*cube);

        while let Some((current, path)) = frontier.pop_front() {
            if !budget.spend() {
                return Err(SolveError::NoSolution {
                    nodes_examined: budget.nodes,
                    depth_reached: deepest,
                });
            }

            if current.is_solved() {
                return Ok(Solution {
                    nodes_examined: budget.nodes,
                    moves: path,
                });
            }

            deepest = path.len() as u32;
            if deepest >= self.config.max_bfs_depth {
                // Everything shallower has already been dequeued.
                return Err(SolveError::NoSolution {
                    nodes_examined: budget.nodes,
                    depth_reached: deepest,
                });
            }

            for move_ in Move::all() {
                let child = current.apply(move_);
                if visited.insert(child) {
                    let mut child_path = path.clone();
                    child_path.push(move_);
                    frontier.push_back((child, child_path));
                }
            }
        }

        // The reachable portion of the state space was exhausted without
        // hitting the goal; possible only for states outside the solved
        // cube's orbit.
        Err(SolveError::NoSolution {
            nodes_examined: budget.nodes,
            depth_reached: deepest,
        })
    }
}
