use crate::prelude::*;

use std::fmt;

use thiserror::Error;

pub mod coord;
pub mod perm;

/// The wire encoding of the solved cube, face order U L F R B D.
pub const SOLVED_STATE: &str =
    "WWWWWWWWWOOOOOOOOOGGGGGGGGGRRRRRRRRRBBBBBBBBBYYYYYYYYY";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, enum_iterator::Sequence)]
pub enum Face {
    Up,
    Left,
    Front,
    Right,
    Back,
    Down,
}

impl Face {
    /// Index of the first facelet of this face in the 54-position layout.
    pub fn offset(self) -> usize {
        self as usize * 9
    }

    /// The face a position belongs to.
    pub fn of_position(index: usize) -> Face {
        match index / 9 {
            0 => Face::Up,
            1 => Face::Left,
            2 => Face::Front,
            3 => Face::Right,
            4 => Face::Back,
            _ => Face::Down,
        }
    }

    /// The color this face shows when solved.
    pub fn home_color(self) -> Color {
        match self {
            Face::Up => Color::White,
            Face::Left => Color::Orange,
            Face::Front => Color::Green,
            Face::Right => Color::Red,
            Face::Back => Color::Blue,
            Face::Down => Color::Yellow,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, enum_iterator::Sequence)]
pub enum Color {
    White,
    Orange,
    Green,
    Red,
    Blue,
    Yellow,
}

impl Color {
    pub fn to_char(self) -> char {
        match self {
            Color::White => 'W',
            Color::Orange => 'O',
            Color::Green => 'G',
            Color::Red => 'R',
            Color::Blue => 'B',
            Color::Yellow => 'Y',
        }
    }

    pub fn from_char(c: char) -> Option<Color> {
        match c {
            'W' => Some(Color::White),
            'O' => Some(Color::Orange),
            'G' => Some(Color::Green),
            'R' => Some(Color::Red),
            'B' => Some(Color::Blue),
            'Y' => Some(Color::Yellow),
            _ => None,
        }
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

/// Why a raw state string was rejected. Checks run cheapest first: length,
/// then alphabet, then per-symbol counts.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InvalidState {
    #[error("state must be 54 characters, got {0}")]
    WrongLength(usize),
    #[error("invalid symbol {symbol:?} at position {index}; expected one of W, O, G, R, B, Y")]
    BadSymbol { index: usize, symbol: char },
    #[error("expected exactly 9 {symbol} facelets, found {count}")]
    BadCount { symbol: char, count: usize },
}

/// A cube configuration: 54 facelets in face order U L F R B D, row-major
/// within each face. Plain value semantics; applying a move yields a new cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Cube {
    facelets: [Color; 54],
}

impl Cube {
    pub fn solved() -> Cube {
        let mut facelets = [Color::White; 54];
        for (i, facelet) in facelets.iter_mut().enumerate() {
            *facelet = Face::of_position(i).home_color();
        }
        Cube { facelets }
    }

    pub fn apply(self, move_: Move) -> Cube {
        let perm = perm::permutation(move_);
        let mut facelets = [Color::White; 54];
        for i in 0..54 {
            facelets[i] = self.facelets[perm[i] as usize];
        }
        Cube { facelets }
    }

    pub fn apply_all(self, moves: impl IntoIterator<Item = Move>) -> Cube {
        moves.into_iter().fold(self, |cube, m| cube.apply(m))
    }

    /// True when every facelet matches its face's center.
    pub fn is_solved(&self) -> bool {
        enum_iterator::all::<Face>().all(|face| {
            let segment = &self.facelets[face.offset()..face.offset() + 9];
            segment.iter().all(|&c| c == segment[4])
        })
    }

    pub fn facelet(&self, index: usize) -> Color {
        self.facelets[index]
    }

    pub fn to_state_string(&self) -> String {
        self.facelets.iter().map(|c| c.to_char()).collect()
    }
}

impl core::str::FromStr for Cube {
    type Err = InvalidState;

    fn from_str(s: &str) -> Result<Cube, InvalidState> {
        if s.chars().count() != 54 {
            return Err(InvalidState::WrongLength(s.chars().count()));
        }

        let mut facelets = [Color::White; 54];
        for (index, symbol) in s.chars().enumerate() {
            facelets[index] =
                Color::from_char(symbol).ok_or(InvalidState::BadSymbol { index, symbol })?;
        }

        for color in enum_iterator::all::<Color>() {
            let count = facelets.iter().filter(|&&c| c == color).count();
            if count != 9 {
                return Err(InvalidState::BadCount {
                    symbol: color.to_char(),
                    count,
                });
            }
        }

        Ok(Cube { facelets })
    }
}

impl fmt::Display for Cube {
    /// Unfolded net: the up face, then the four side faces abreast, then down.
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let row = |face: Face, r: usize| {
            let start = face.offset() + r * 3;
            self.facelets[start..start + 3]
                .iter()
                .map(|c| c.to_char())
                .collect::<String>()
        };

        for r in 0..3 {
            writeln!(f, "    {}", row(Face::Up, r))?;
        }
        for r in 0..3 {
            writeln!(
                f,
                "{} {} {} {}",
                row(Face::Left, r),
                row(Face::Front, r),
                row(Face::Right, r),
                row(Face::Back, r),
            )?;
        }
        for r in 0..3 {
            writeln!(f, "    {}", row(Face::Down, r))?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickcheck_macros::quickcheck;

    #[quickcheck]
    fn sequence_then_reversed_inverses_round_trips(moves: Vec<Move>) -> bool {
        let start = Cube::solved().apply("D'".parse().unwrap());
        let there = start.apply_all(moves.iter().copied());
        there.apply_all(Move::inverse_sequence(&moves)) == start
    }

    #[test]
    fn solved_is_solved() {
        assert!(Cube::solved().is_solved());
        assert_eq!(Cube::solved(), Cube::solved());
    }

    #[test]
    fn solved_matches_wire_encoding() {
        assert_eq!(Cube::solved().to_state_string(), SOLVED_STATE);
        assert_eq!(SOLVED_STATE.parse::<Cube>().unwrap(), Cube::solved());
    }

    #[test]
    fn single_move_is_not_solved() {
        for move_ in Move::all() {
            assert!(!Cube::solved().apply(move_).is_solved(), "{}", move_);
        }
    }

    #[test]
    fn up_turn_cycles_side_rows() {
        let cube = Cube::solved().apply("U".parse().unwrap());

        // Looking down at the up face, clockwise sends front to left,
        // left to back, back to right, right to front.
        let top_row = |face: Face| {
            (0..3)
                .map(|i| cube.facelet(face.offset() + i))
                .collect::<Vec<_>>()
        };
        assert_eq!(top_row(Face::Left), vec![Color::Green; 3]);
        assert_eq!(top_row(Face::Back), vec![Color::Orange; 3]);
        assert_eq!(top_row(Face::Right), vec![Color::Blue; 3]);
        assert_eq!(top_row(Face::Front), vec![Color::Red; 3]);

        // The rest of each side face is untouched.
        for face in [Face::Left, Face::Front, Face::Right, Face::Back] {
            for i in 3..9 {
                assert_eq!(cube.facelet(face.offset() + i), face.home_color());
            }
        }
    }

    #[test]
    fn quarter_turn_has_order_four() {
        for face in enum_iterator::all::<Face>() {
            let turn = Move {
                face,
                direction: Direction::Single,
            };
            let cube = Cube::solved().apply_all([turn; 4]);
            assert_eq!(cube, Cube::solved(), "{:?}", face);
        }
    }

    #[test]
    fn half_turn_has_order_two() {
        for face in enum_iterator::all::<Face>() {
            let turn = Move {
                face,
                direction: Direction::Double,
            };
            let cube = Cube::solved().apply_all([turn; 2]);
            assert_eq!(cube, Cube::solved(), "{:?}", face);
        }
    }

    #[test]
    fn move_then_inverse_is_identity() {
        let scrambled = Cube::solved().apply_all(Move::parse_sequence("R U F2 D'").unwrap());
        for move_ in Move::all() {
            assert_eq!(
                scrambled.apply(move_).apply(move_.inverse()),
                scrambled,
                "{}",
                move_
            );
        }
    }

    #[test]
    fn rejects_wrong_length() {
        let short = &SOLVED_STATE[..53];
        assert_eq!(short.parse::<Cube>(), Err(InvalidState::WrongLength(53)));
    }

    #[test]
    fn rejects_bad_symbol() {
        let mut state = SOLVED_STATE.to_string();
        state.replace_range(10..11, "X");
        assert_eq!(
            state.parse::<Cube>(),
            Err(InvalidState::BadSymbol {
                index: 10,
                symbol: 'X'
            })
        );
    }

    #[test]
    fn rejects_bad_counts() {
        // Ten whites, eight oranges.
        let mut state = SOLVED_STATE.to_string();
        state.replace_range(9..10, "W");
        assert_eq!(
            state.parse::<Cube>(),
            Err(InvalidState::BadCount {
                symbol: 'W',
                count: 10
            })
        );
    }

    #[test]
    fn state_string_round_trips_through_moves() {
        let cube = Cube::solved().apply_all(Move::parse_sequence("L2 B D' R F").unwrap());
        let reparsed: Cube = cube.to_state_string().parse().unwrap();
        assert_eq!(reparsed, cube);
    }

    #[test]
    fn display_renders_net() {
        let net = Cube::solved().to_string();
        assert_eq!(net.lines().count(), 9);
        assert!(net.lines().next().unwrap().contains("WWW"));
        assert!(net.lines().nth(3).unwrap().contains("OOO GGG RRR BBB"));
    }
}
