use crate::prelude::*;

use std::collections::VecDeque;

use smallvec::SmallVec;
use thiserror::Error;

use crate::cube::coord::{
    self, Axis, CoordCube, DecomposeError, CORNER_PERM_VALUES, FLIP_VALUES, SLICE_EDGE_VALUES,
    TWIST_VALUES, UD_EDGE_VALUES,
};
use crate::solver::{worth_applying, Budget};

type Path = SmallVec<[Move; 32]>;

/// No reduction takes more than this many moves when guided by the
/// orientation tables.
const REDUCTION_MAX: u32 = 12;
/// Upper bound on finishing a cube already inside the subgroup.
const FINISH_MAX: u32 = 18;

const UNREACHED: u8 = u8::MAX;

/// The engine's own failure modes. None of these ever reach a caller of the
/// delegating solver; they only trigger the fallback.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum EngineError {
    #[error(transparent)]
    Decompose(#[from] DecomposeError),
    #[error("pruning table {table} is degenerate: reached {reached} of {expected} values")]
    Init {
        table: &'static str,
        reached: usize,
        expected: usize,
    },
    #[error("{phase}: no path within {max_len} moves")]
    PhaseExhausted { phase: &'static str, max_len: u32 },
    #[error("{phase}: search budget exhausted after {nodes} states")]
    BudgetExhausted { phase: &'static str, nodes: u64 },
}

/// Solves in two phases: first drive the cube into the subgroup generated by
/// up/down turns and half turns (all corners oriented, all edges oriented,
/// middle-layer edges home), then finish inside that subgroup with its
/// restricted move set. Each phase is a cost-bounded deepening search over
/// coordinates, pruned by exact distance tables computed breadth-first over
/// the coordinate graphs.
pub struct TwoPhase {
    reduction: Phase,
    finish: Phase,
    config: SolveConfig,
}

struct Phase {
    name: &'static str,
    allowed: Vec<Move>,
    goal: fn(&CoordCube) -> bool,
    prune: Prune,
    max_len: u32,
}

enum Prune {
    /// Phase one: the larger of the corner-twist and edge-flip distances.
    Orientation { twist: Vec<u8>, flip: Vec<u8> },
    /// Phase two: the largest of the corner, up/down-edge, and middle-edge
    /// permutation distances, measured under subgroup moves only. Inside the
    /// subgroup a zero estimate means the cube is solved.
    Position {
        corner_perm: Vec<u8>,
        ud_edges: Vec<u8>,
        slice_edges: Vec<u8>,
    },
}

impl Phase {
    fn estimate(&self, cube: &CoordCube) -> u32 {
        match &self.prune {
            Prune::Orientation { twist, flip } => {
                u32::from(twist[cube.twist() as usize]).max(u32::from(flip[cube.flip() as usize]))
            }
            Prune::Position {
                corner_perm,
                ud_edges,
                slice_edges,
            } => {
                let corners = u32::from(corner_perm[cube.corner_perm() as usize]);
                let ud = cube
                    .ud_edges()
                    .map(|e| u32::from(ud_edges[e as usize]))
                    .unwrap_or(0);
                let slice = cube
                    .slice_edges()
                    .map(|e| u32::from(slice_edges[e as usize]))
                    .unwrap_or(0);
                corners.max(ud).max(slice)
            }
        }
    }
}

enum Search {
    Found(Vec<Move>),
    NotFound(u32),
}

/// The reduction target: up and down faces show only up/down colors, and the
/// four middle-layer front/back facelets show only front/back colors.
pub(crate) fn in_domino_subgroup(cube: &Cube) -> bool {
    (0..9)
        .chain(45..54)
        .all(|i| Axis::from(cube.facelet(i)) == Axis::UpDown)
        && [21, 23, 39, 41]
            .iter()
            .all(|&i| Axis::from(cube.facelet(i)) == Axis::FrontBack)
}

fn domino_moves() -> impl Iterator<Item = Move> {
    Move::all().filter(|&m| coord::domino_move_index(m).is_some())
}

/// Breadth-first distances from the solved value over a coordinate graph.
fn explore(values: usize, moves: &[Move], step: impl Fn(u16, Move) -> u16) -> Vec<u8> {
    let mut distance = vec![UNREACHED; values];
    distance[0] = 0;
    let mut frontier = VecDeque::from([0u16]);
    while let Some(value) = frontier.pop_front() {
        let next_distance = distance[value as usize] + 1;
        for &move_ in moves {
            let next = step(value, move_);
            if distance[next as usize] == UNREACHED {
                distance[next as usize] = next_distance;
                frontier.push_back(next);
            }
        }
    }
    distance
}

fn full_table(
    name: &'static str,
    values: usize,
    moves: &[Move],
    step: impl Fn(u16, Move) -> u16,
) -> Result<Vec<u8>, EngineError> {
    let table = explore(values, moves, step);
    let reached = table.iter().filter(|&&d| d != UNREACHED).count();
    if reached != values {
        return Err(EngineError::Init {
            table: name,
            reached,
            expected: values,
        });
    }
    Ok(table)
}

impl TwoPhase {
    pub fn new(config: &SolveConfig) -> Result<TwoPhase, EngineError> {
        CoordCube::init_tables();

        let all: Vec<Move> = Move::all().collect();
        let domino: Vec<Move> = domino_moves().collect();

        // Every orientation is reachable, so these tables must fill
        // completely; anything less means the move tables are unusable.
        let twist = full_table("corner-twist", TWIST_VALUES, &all, coord::twist_transition)?;
        let flip = full_table("edge-flip", FLIP_VALUES, &all, coord::flip_transition)?;

        // Subgroup moves reach only part of the permutation spaces; values
        // left unreached act as an immediately overshooting estimate.
        let corner_perm = explore(CORNER_PERM_VALUES, &domino, coord::corner_perm_transition);
        let ud_edges = explore(UD_EDGE_VALUES, &domino, |v, m| {
            coord::ud_edges_transition(v, m).unwrap_or(v)
        });
        let slice_edges = explore(SLICE_EDGE_VALUES, &domino, |v, m| {
            coord::slice_edges_transition(v, m).unwrap_or(v)
        });

        Ok(TwoPhase {
            reduction: Phase {
                name: "reduction",
                allowed: all,
                goal: |c| in_domino_subgroup(&c.raw),
                prune: Prune::Orientation { twist, flip },
                max_len: REDUCTION_MAX,
            },
            finish: Phase {
                name: "finish",
                allowed: domino,
                goal: |c| c.raw.is_solved(),
                prune: Prune::Position {
                    corner_perm,
                    ud_edges,
                    slice_edges,
                },
                max_len: FINISH_MAX,
            },
            config: config.clone(),
        })
    }

    /// Runs both phases and hands back the engine's solution as a token
    /// string, along with the states examined.
    pub fn solve(&self, cube: &Cube) -> Result<(String, u64), EngineError> {
        let start = CoordCube::project(*cube)?;
        let mut budget = Budget::new(&self.config);

        let reduction = self.search_phase(&self.reduction, start, &[], &mut budget)?;
        // Re-project so the subgroup edge coordinate is available to the
        // finish phase's pruning.
        let reduced = CoordCube::project(cube.apply_all(reduction.iter().copied()))?;
        let finish = self.search_phase(&self.finish, reduced, &reduction, &mut budget)?;

        // The phase boundary can leave two turns of the same face adjacent.
        let moves = simplify_sequence(reduction.into_iter().chain(finish));
        Ok((format_sequence(&moves), budget.nodes))
    }

    fn search_phase(
        &self,
        phase: &Phase,
        start: CoordCube,
        prefix: &[Move],
        budget: &mut Budget,
    ) -> Result<Vec<Move>, EngineError> {
        let exhausted = || EngineError::PhaseExhausted {
            phase: phase.name,
            max_len: phase.max_len,
        };

        let mut bound = phase.estimate(&start);
        loop {
            if bound > phase.max_len {
                return Err(exhausted());
            }
            log::debug!("{}: searching with cost bound {}", phase.name, bound);
            let mut path: Path = prefix.iter().copied().collect();
            match self.find_solution(phase, &start, 0, bound, &mut path, budget)? {
                Search::Found(moves) => return Ok(moves[prefix.len()..].to_vec()),
                Search::NotFound(u32::MAX) => return Err(exhausted()),
                Search::NotFound(overshoot) => bound = overshoot,
            }
        }
    }

    fn find_solution(
        &self,
        phase: &Phase,
        cube: &CoordCube,
        cost: u32,
        bound: u32,
        path: &mut Path,
        budget: &mut Budget,
    ) -> Result<Search, EngineError> {
        if !budget.spend() {
            return Err(EngineError::BudgetExhausted {
                phase: phase.name,
                nodes: budget.nodes,
            });
        }

        let estimate = cost + phase.estimate(cube);
        if estimate > bound {
            return Ok(Search::NotFound(estimate));
        }

        if (phase.goal)(cube) {
            return Ok(Search::Found(path.to_vec()));
        }

        let mut next_bound = u32::MAX;
        for &move_ in &phase.allowed {
            if !worth_applying(path, move_) {
                continue;
            }

            path.push(move_);
            let child = cube.apply(move_);
            let result = self.find_solution(phase, &child, cost + 1, bound, path, budget)?;
            path.pop();

            match result {
                Search::Found(moves) => return Ok(Search::Found(moves)),
                Search::NotFound(overshoot) => next_bound = next_bound.min(overshoot),
            }
        }
        Ok(Search::NotFound(next_bound))
    }
}

/// The delegating solver: hand the cube to the two-phase engine, and on any
/// engine failure substitute the heuristic solver. Callers see the same
/// contract either way. The substitute runs the default heuristic
/// configuration but keeps the caller's resource bounds.
pub struct Delegating {
    engine: Option<TwoPhase>,
    fallback: IdaStar,
}

impl Delegating {
    pub fn new(config: SolveConfig) -> Delegating {
        let engine = match TwoPhase::new(&config) {
            Ok(engine) => Some(engine),
            Err(error) => {
                log::warn!("two-phase engine unavailable: {}", error);
                None
            }
        };
        let fallback = IdaStar::new(SolveConfig {
            node_budget: config.node_budget,
            timeout: config.timeout,
            ..SolveConfig::default()
        });
        Delegating { engine, fallback }
    }
}

impl Solver for Delegating {
    fn solve(&self, cube: &Cube) -> Result<Solution, SolveError> {
        if let Some(engine) = &self.engine {
            match engine.solve(cube) {
                Ok((tokens, nodes_examined)) => match Move::parse_sequence(&tokens) {
                    Ok(moves) => {
                        return Ok(Solution {
                            moves,
                            nodes_examined,
                        })
                    }
                    Err(error) => {
                        log::warn!(
                            "two-phase engine emitted unparseable sequence {:?}: {}",
                            tokens,
                            error
                        );
                    }
                },
                Err(error) => {
                    log::warn!("two-phase engine failed: {}", error);
                }
            }
            log::warn!("substituting the heuristic solver");
        }
        self.fallback.solve(cube)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine() -> TwoPhase {
        TwoPhase::new(&SolveConfig::default()).unwrap()
    }

    #[test]
    fn solved_cube_is_in_the_subgroup() {
        assert!(in_domino_subgroup(&Cube::solved()));
    }

    #[test]
    fn subgroup_moves_stay_in_the_subgroup() {
        let cube = Cube::solved().apply_all(
            Move::parse_sequence("U R2 D' F2 U2 L2 B2 D R2 U'").unwrap(),
        );
        assert!(in_domino_subgroup(&cube));
    }

    #[test]
    fn quarter_turn_of_a_side_face_leaves_the_subgroup() {
        assert!(!in_domino_subgroup(&Cube::solved().apply("F".parse().unwrap())));
        assert!(!in_domino_subgroup(&Cube::solved().apply("R'".parse().unwrap())));
    }

    #[test]
    fn engine_initializes() {
        let engine = engine();
        assert_eq!(engine.reduction.allowed.len(), 18);
        assert_eq!(engine.finish.allowed.len(), 10);
    }

    #[test]
    fn engine_solves_a_scramble() {
        let engine = engine();
        let scramble = Move::parse_sequence("R U F' D2 L B'").unwrap();
        let cube = Cube::solved().apply_all(scramble);

        let (tokens, nodes) = engine.solve(&cube).unwrap();
        let moves = Move::parse_sequence(&tokens).unwrap();
        assert!(cube.apply_all(moves).is_solved());
        assert!(nodes > 0);
    }

    #[test]
    fn engine_solution_for_subgroup_state_uses_subgroup_moves() {
        let engine = engine();
        let cube = Cube::solved().apply_all(Move::parse_sequence("U R2 F2 D'").unwrap());

        let (tokens, _) = engine.solve(&cube).unwrap();
        for move_ in Move::parse_sequence(&tokens).unwrap() {
            assert!(coord::domino_move_index(move_).is_some(), "{}", move_);
        }
    }

    #[test]
    fn engine_reports_budget_exhaustion() {
        let config = SolveConfig {
            node_budget: Some(3),
            ..SolveConfig::default()
        };
        let engine = TwoPhase::new(&config).unwrap();
        let cube = Cube::solved().apply_all(Move::parse_sequence("R U F' D2 L B'").unwrap());

        assert!(matches!(
            engine.solve(&cube),
            Err(EngineError::BudgetExhausted { .. })
        ));
    }

    #[test]
    fn delegate_solves_through_the_engine() {
        let scramble = Move::parse_sequence("L2 D R' F U2 B").unwrap();
        let cube = Cube::solved().apply_all(scramble);

        let solution = Delegating::new(SolveConfig::default()).solve(&cube).unwrap();
        assert!(cube.apply_all(solution.moves).is_solved());
        assert!(solution.nodes_examined > 0);
    }

    #[test]
    fn delegate_without_engine_substitutes_the_heuristic_solver() {
        let delegate = Delegating {
            engine: None,
            fallback: IdaStar::new(SolveConfig::default()),
        };
        let cube = Cube::solved().apply_all(Move::parse_sequence("F2 U'").unwrap());

        let solution = delegate.solve(&cube).unwrap();
        assert!(cube.apply_all(solution.moves).is_solved());
    }

    #[test]
    fn engine_rejects_states_that_do_not_decompose() {
        let mut state = SOLVED_STATE.to_string();
        state.replace_range(8..9, "G");
        state.replace_range(19..20, "W");
        let cube: Cube = state.parse().unwrap();

        assert!(matches!(
            engine().solve(&cube),
            Err(EngineError::Decompose(_))
        ));
    }

    #[test]
    fn delegate_answers_identically_for_the_solved_cube() {
        let solution = Delegating::new(SolveConfig::default())
            .solve(&Cube::solved())
            .unwrap();
        assert!(solution.moves.is_empty());
    }

    #[test]
    fn delegate_surfaces_no_solution_for_non_physical_states() {
        // Two stickers of one corner swapped: a twisted corner decomposes
        // but cannot be restored by any move sequence, so the engine and
        // the fallback both spend their budget and fail.
        let mut state = SOLVED_STATE.to_string();
        state.replace_range(8..9, "R");
        state.replace_range(27..28, "W");
        let cube: Cube = state.parse().unwrap();

        let config = SolveConfig {
            node_budget: Some(20_000),
            ..SolveConfig::default()
        };
        assert!(matches!(
            Delegating::new(config).solve(&cube),
            Err(SolveError::NoSolution { .. })
        ));
    }
}
