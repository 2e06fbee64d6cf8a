use crate::prelude::*;

use std::fmt;

use thiserror::Error;

/// A face turn: one of the 18 legal moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Move {
    pub face: Face,
    pub direction: Direction,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, enum_iterator::Sequence)]
pub enum Direction {
    Single,
    Double,
    Reverse,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseMoveError {
    #[error("empty move token")]
    Empty,
    #[error("unrecognized face {0:?}")]
    UnknownFace(char),
    #[error("unrecognized direction {0:?}")]
    UnknownDirection(char),
    #[error("trailing input after move token: {0:?}")]
    TrailingInput(String),
}

impl Move {
    /// All 18 moves, grouped by face.
    pub fn all() -> impl Iterator<Item = Move> {
        enum_iterator::all::<Face>().flat_map(|face| {
            enum_iterator::all::<Direction>().map(move |direction| Move { face, direction })
        })
    }

    pub fn inverse(self) -> Move {
        let direction = match self.direction {
            Direction::Single => Direction::Reverse,
            Direction::Reverse => Direction::Single,
            Direction::Double => Direction::Double,
        };
        Move {
            face: self.face,
            direction,
        }
    }

    /// True when applying `self` after `prev` restores the state `prev` started from.
    pub fn cancels(self, prev: Move) -> bool {
        self == prev.inverse()
    }

    pub fn parse_sequence(s: &str) -> Result<Vec<Move>, ParseMoveError> {
        s.split_whitespace().map(|token| token.parse()).collect()
    }

    /// Element-wise inverse in reverse order.
    pub fn inverse_sequence(moves: &[Move]) -> Vec<Move> {
        moves.iter().rev().map(|m| m.inverse()).collect()
    }

    /// Dense index in face-major order, used by the precomputed tables.
    pub(crate) fn index(self) -> usize {
        self.face as usize * 3 + self.direction as usize
    }
}

impl core::str::FromStr for Move {
    type Err = ParseMoveError;

    fn from_str(s: &str) -> Result<Move, ParseMoveError> {
        let mut chars = s.chars();

        let face = match chars.next() {
            None => return Err(ParseMoveError::Empty),
            Some('U' | 'u') => Face::Up,
            Some('L' | 'l') => Face::Left,
            Some('F' | 'f') => Face::Front,
            Some('R' | 'r') => Face::Right,
            Some('B' | 'b') => Face::Back,
            Some('D' | 'd') => Face::Down,
            Some(c) => return Err(ParseMoveError::UnknownFace(c)),
        };

        let direction = match chars.next() {
            None => Direction::Single,
            Some('\'') => Direction::Reverse,
            Some('2') => Direction::Double,
            Some(c) => return Err(ParseMoveError::UnknownDirection(c)),
        };

        let rest = chars.as_str();
        if !rest.is_empty() {
            return Err(ParseMoveError::TrailingInput(rest.to_string()));
        }

        Ok(Move { face, direction })
    }
}

impl fmt::Display for Move {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let face = match self.face {
            Face::Up => 'U',
            Face::Left => 'L',
            Face::Front => 'F',
            Face::Right => 'R',
            Face::Back => 'B',
            Face::Down => 'D',
        };
        let suffix = match self.direction {
            Direction::Single => "",
            Direction::Reverse => "'",
            Direction::Double => "2",
        };
        write!(f, "{}{}", face, suffix)
    }
}

/// Renders a sequence in the token grammar, e.g. `"R U2 L'"`.
pub fn format_sequence(moves: &[Move]) -> String {
    moves
        .iter()
        .map(|m| m.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Collapses adjacent same-face turns and drops the identities that result:
/// `R R2` becomes `R'`, `R U U' R'` becomes nothing. The returned sequence
/// is the same group element as the input.
pub fn simplify_sequence(moves: impl IntoIterator<Item = Move>) -> Vec<Move> {
    let mut out: Vec<Move> = Vec::new();
    for move_ in moves {
        match out.last() {
            Some(&prev) if prev.face == move_.face => {
                let quarters =
                    (prev.direction.quarter_turns() + move_.direction.quarter_turns()) % 4;
                out.pop();
                if let Some(direction) = Direction::from_quarter_turns(quarters) {
                    out.push(Move {
                        face: move_.face,
                        direction,
                    });
                }
            }
            _ => out.push(move_),
        }
    }
    out
}

impl Direction {
    fn quarter_turns(self) -> u8 {
        match self {
            Direction::Single => 1,
            Direction::Double => 2,
            Direction::Reverse => 3,
        }
    }

    fn from_quarter_turns(quarters: u8) -> Option<Direction> {
        match quarters {
            0 => None,
            1 => Some(Direction::Single),
            2 => Some(Direction::Double),
            _ => Some(Direction::Reverse),
        }
    }
}

#[cfg(test)]
impl quickcheck::Arbitrary for Move {
    fn arbitrary(g: &mut quickcheck::Gen) -> Move {
        let all = Move::all().collect::<Vec<_>>();
        *g.choose(&all).unwrap()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[test]
    fn eighteen_moves() {
        assert_eq!(Move::all().count(), 18);
    }

    #[test]
    fn parse_display_round_trip() {
        for move_ in Move::all() {
            let token = move_.to_string();
            assert_eq!(token.parse::<Move>().unwrap(), move_);
        }
    }

    #[test]
    fn parse_sequence_tokens() {
        let moves = Move::parse_sequence("R U2 l' f").unwrap();
        assert_eq!(format_sequence(&moves), "R U2 L' F");
    }

    #[test]
    fn parse_sequence_of_empty_string_is_empty() {
        assert_eq!(Move::parse_sequence("").unwrap(), Vec::new());
    }

    #[test]
    fn rejects_bad_tokens() {
        assert_eq!("X".parse::<Move>(), Err(ParseMoveError::UnknownFace('X')));
        assert_eq!(
            "U3".parse::<Move>(),
            Err(ParseMoveError::UnknownDirection('3'))
        );
        assert_eq!(
            "R2'".parse::<Move>(),
            Err(ParseMoveError::TrailingInput("'".to_string()))
        );
    }

    #[test]
    fn inverse_pairs() {
        let u: Move = "U".parse().unwrap();
        assert_eq!(u.inverse(), "U'".parse().unwrap());
        assert_eq!(u.inverse().inverse(), u);

        let f2: Move = "F2".parse().unwrap();
        assert_eq!(f2.inverse(), f2);
    }

    #[test]
    fn cancels_exact_inverse_only() {
        let r: Move = "R".parse().unwrap();
        let r_prime: Move = "R'".parse().unwrap();
        let r2: Move = "R2".parse().unwrap();

        assert!(r_prime.cancels(r));
        assert!(r.cancels(r_prime));
        assert!(r2.cancels(r2));
        assert!(!r.cancels(r));
        assert!(!r2.cancels(r));
    }

    #[test]
    fn simplify_merges_same_face_turns() {
        let simplify = |s: &str| format_sequence(&simplify_sequence(Move::parse_sequence(s).unwrap()));
        assert_eq!(simplify("R R2"), "R'");
        assert_eq!(simplify("U U"), "U2");
        assert_eq!(simplify("F2 F2"), "");
        assert_eq!(simplify("R U U' R'"), "");
        assert_eq!(simplify("R U R'"), "R U R'");
    }

    #[quickcheck]
    fn simplify_preserves_the_group_element(moves: Vec<Move>) -> bool {
        use crate::cube::Cube;
        let simplified = simplify_sequence(moves.iter().copied());
        Cube::solved().apply_all(moves) == Cube::solved().apply_all(simplified)
    }

    #[test]
    fn move_indices_are_dense() {
        let mut seen = [false; 18];
        for move_ in Move::all() {
            seen[move_.index()] = true;
        }
        assert!(seen.iter().all(|&s| s));
    }
}
