use crate::prelude::*;

/// Remaining-distance estimators for the cost-bounded search.
///
/// Both count mismatched facelets and scale the count down by an empirically
/// tuned divisor. Neither is a proven lower bound on the remaining move
/// count, so solutions guided by them are near-optimal, not optimal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Heuristic {
    #[default]
    Misplaced,
    WrongFace,
}

const MISPLACED_DIVISOR: u32 = 8;
const WRONG_FACE_DIVISOR: u32 = 12;

impl Heuristic {
    pub fn estimate(self, cube: &Cube) -> u32 {
        match self {
            Heuristic::Misplaced => misplaced(cube) / MISPLACED_DIVISOR,
            Heuristic::WrongFace => wrong_face(cube) / WRONG_FACE_DIVISOR,
        }
    }
}

/// Facelets differing from the canonical solved configuration.
fn misplaced(cube: &Cube) -> u32 {
    let solved = Cube::solved();
    (0..54)
        .filter(|&i| cube.facelet(i) != solved.facelet(i))
        .count() as u32
}

/// Non-center facelets sitting on a face other than their home face.
fn wrong_face(cube: &Cube) -> u32 {
    (0..54)
        .filter(|&i| i % 9 != 4)
        .filter(|&i| cube.facelet(i) != Face::of_position(i).home_color())
        .count() as u32
}
