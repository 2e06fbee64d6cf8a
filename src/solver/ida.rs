use crate::prelude::*;

use smallvec::SmallVec;

use crate::solver::{worth_applying, Budget, MAX_SOLUTION_LEN};

type Path = SmallVec<[Move; 32]>;

/// Cost-bounded iterative deepening.
///
/// Runs depth-first searches under a rising cost bound: any branch where
/// path length plus the heuristic estimate exceeds the bound is pruned, and
/// the smallest overshoot seen becomes the next bound. Memory use stays
/// linear in the search depth, and the heuristic biases the order enough to
/// reach near-optimal solutions well before the exhaustive search could.
pub struct IdaStar {
    heuristic: Heuristic,
    config: SolveConfig,
}

enum Search {
    Found(Vec<Move>),
    /// Smallest cost that exceeded the bound, or `u32::MAX` when nothing
    /// was prunable (the space under the bound is exhausted).
    NotFound(u32),
}

impl IdaStar {
    pub fn new(config: SolveConfig) -> IdaStar {
        IdaStar {
            heuristic: config.heuristic,
            config,
        }
    }

    fn find_solution(
        &self,
        cube: &Cube,
        cost: u32,
        bound: u32,
        path: &mut Path,
        budget: &mut Budget,
    ) -> Result<Search, SolveError> {
        if !budget.spend() {
            return Err(SolveError::NoSolution {
                nodes_examined: budget.nodes,
                depth_reached: bound,
            });
        }

        let estimate = cost + self.heuristic.estimate(cube);
        if estimate > bound {
            return Ok(Search::NotFound(estimate));
        }

        if cube.is_solved() {
            return Ok(Search::Found(path.to_vec()));
        }

        let mut next_bound = u32::MAX;
        for move_ in Move::all() {
            if !worth_applying(path, move_) {
                continue;
            }

            path.push(move_);
            let child = cube.apply(move_);
            let result = self.find_solution(&child, cost + 1, bound, path, budget)?;
            path.pop();

            match result {
                Search::Found(moves) => return Ok(Search::Found(moves)),
                Search::NotFound(overshoot) => next_bound = next_bound.min(overshoot),
            }
        }
        Ok(Search::NotFound(next_bound))
    }
}

impl Solver for IdaStar {
    fn solve(&self, cube: &Cube) -> Result<Solution, SolveError> {
        if cube.is_solved() {
            return Ok(Solution {
                moves: Vec::new(),
                nodes_examined: 0,
            });
        }

        let mut budget = Budget::new(&self.config);
        let mut bound = self.heuristic.estimate(cube);

        loop {
            log::debug!("searching with cost bound {}", bound);
            let mut path = Path::new();
            match self.find_solution(cube, 0, bound, &mut path, &mut budget)? {
                Search::Found(moves) => {
                    return Ok(Solution {
                        moves: simplify_sequence(moves),
                        nodes_examined: budget.nodes,
                    })
                }
                Search::NotFound(overshoot) => {
                    if overshoot == u32::MAX || overshoot > MAX_SOLUTION_LEN {
                        return Err(SolveError::NoSolution {
                            nodes_examined: budget.nodes,
                            depth_reached: bound,
                        });
                    }
                    bound = overshoot;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solve(scramble: &str) -> Solution {
        let cube = Cube::solved().apply_all(Move::parse_sequence(scramble).unwrap());
        IdaStar::new(SolveConfig::default()).solve(&cube).unwrap()
    }

    #[test]
    fn already_solved_examines_nothing() {
        let solution = IdaStar::new(SolveConfig::default())
            .solve(&Cube::solved())
            .unwrap();
        assert!(solution.moves.is_empty());
        assert_eq!(solution.nodes_examined, 0);
    }

    #[test]
    fn one_move_scramble_has_one_move_solution() {
        let solution = solve("R'");
        assert_eq!(format_sequence(&solution.moves), "R");
        assert!(solution.nodes_examined > 0);
    }

    #[test]
    fn two_move_scrambles_get_shortest_solutions() {
        // At this depth the initial cost bound cannot overshoot the
        // optimum, so the answer is exact.
        assert_eq!(solve("U F2").moves.len(), 2);
        assert_eq!(solve("R F").moves.len(), 2);
    }

    #[test]
    fn deeper_scrambles_stay_within_a_bounded_gap() {
        // The scaled-count heuristic is not a lower bound, so the search
        // may settle on a slightly longer path than the optimum.
        assert!(solve("L D' B").moves.len() <= 5);
        assert!(solve("R U F' D").moves.len() <= 6);
    }

    #[test]
    fn solution_restores_the_cube() {
        let scramble = Move::parse_sequence("B2 L U' F R' D").unwrap();
        let cube = Cube::solved().apply_all(scramble);
        let solution = IdaStar::new(SolveConfig::default()).solve(&cube).unwrap();
        assert!(cube.apply_all(solution.moves).is_solved());
    }

    #[test]
    fn both_heuristics_solve() {
        let cube = Cube::solved().apply_all(Move::parse_sequence("F L2 U'").unwrap());
        for heuristic in [Heuristic::Misplaced, Heuristic::WrongFace] {
            let config = SolveConfig {
                heuristic,
                ..SolveConfig::default()
            };
            let solution = IdaStar::new(config).solve(&cube).unwrap();
            assert!(cube.apply_all(solution.moves).is_solved(), "{:?}", heuristic);
        }
    }

    #[test]
    fn tiny_node_budget_fails_instead_of_running_unbounded() {
        let cube = Cube::solved()
            .apply_all(Move::parse_sequence("R U F' D2 L B U2 R' F L2 D B'").unwrap());
        let config = SolveConfig {
            node_budget: Some(100),
            ..SolveConfig::default()
        };
        match IdaStar::new(config).solve(&cube) {
            Err(SolveError::NoSolution { nodes_examined, .. }) => {
                assert!(nodes_examined <= 102);
            }
            other => panic!("expected budget exhaustion, got {:?}", other),
        }
    }
}
