//! Cubie-coordinate view of the cube.
//!
//! The two-phase solver works on compact coordinates instead of raw
//! facelets: corner twist (3^7 values), edge flip (2^11 values), the corner
//! permutation (8! values), and — inside the restricted subgroup — the
//! permutation of the eight up/down-layer edges. Each coordinate transforms
//! under a move through a precomputed transition table, and the cubie-level
//! action of every move is itself derived from the facelet permutation
//! tables.

use crate::prelude::*;

use lazy_static::lazy_static;
use thiserror::Error;

pub const TWIST_VALUES: usize = 2187; // 3^7
pub const FLIP_VALUES: usize = 2048; // 2^11
pub const CORNER_PERM_VALUES: usize = 40320; // 8!
pub const UD_EDGE_VALUES: usize = 40320; // 8!
pub const SLICE_EDGE_VALUES: usize = 24; // 4!

/// Facelet indices of the 8 corner slots, listed clockwise around each
/// corner starting from its up/down facelet.
const CORNER_SLOTS: [[usize; 3]; 8] = [
    [8, 27, 20],  // up-right-front
    [6, 18, 11],  // up-front-left
    [0, 9, 38],   // up-left-back
    [2, 36, 29],  // up-back-right
    [47, 26, 33], // down-front-right
    [45, 17, 24], // down-left-front
    [51, 44, 15], // down-back-left
    [53, 35, 42], // down-right-back
];

/// Facelet index pairs of the 12 edge slots. The first index is the up/down
/// facelet for top- and bottom-layer edges and the front/back facelet for
/// middle-layer edges; edge flip is defined against it.
const EDGE_SLOTS: [[usize; 2]; 12] = [
    [7, 19],  // up-front
    [5, 28],  // up-right
    [1, 37],  // up-back
    [3, 10],  // up-left
    [46, 25], // down-front
    [50, 34], // down-right
    [52, 43], // down-back
    [48, 16], // down-left
    [23, 30], // front-right
    [21, 14], // front-left
    [39, 32], // back-right
    [41, 12], // back-left
];

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Axis {
    UpDown,
    LeftRight,
    FrontBack,
}

impl From<Color> for Axis {
    fn from(color: Color) -> Axis {
        match color {
            Color::White | Color::Yellow => Axis::UpDown,
            Color::Orange | Color::Red => Axis::LeftRight,
            Color::Green | Color::Blue => Axis::FrontBack,
        }
    }
}

/// The state does not decompose into the pieces of a physical cube. Symbol
/// counts alone cannot rule this out.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DecomposeError {
    #[error("corner slot {0} does not hold a valid corner piece")]
    Corner(usize),
    #[error("edge slot {0} does not hold a valid edge piece")]
    Edge(usize),
    #[error("corner piece appears twice, second time in slot {0}")]
    DuplicateCorner(usize),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoordCube {
    pub raw: Cube,
    twist: u16,
    flip: u16,
    corner_perm: u16,
    /// Defined only while the cube stays inside the up/down-axis subgroup;
    /// cleared by any move that leaves it.
    ud_edges: Option<u16>,
    /// Permutation of the four middle-layer edges; same lifetime as `ud_edges`.
    slice_edges: Option<u16>,
}

impl CoordCube {
    /// Forces construction of the shared move tables, so the cost is paid
    /// once up front rather than inside the first search.
    pub fn init_tables() {
        lazy_static::initialize(&TRANSITIONS);
    }

    pub fn project(raw: Cube) -> Result<CoordCube, DecomposeError> {
        Ok(CoordCube {
            twist: twist_of(&raw)?,
            flip: flip_of(&raw)?,
            corner_perm: corner_perm_of(&raw)?,
            ud_edges: ud_edges_of(&raw),
            slice_edges: slice_edges_of(&raw),
            raw,
        })
    }

    pub fn apply(self, move_: Move) -> CoordCube {
        let m = move_.index();
        let domino = domino_move_index(move_);
        let ud_edges = match (self.ud_edges, domino) {
            (Some(e), Some(d)) => Some(TRANSITIONS.ud_edges[e as usize][d]),
            _ => None,
        };
        let slice_edges = match (self.slice_edges, domino) {
            (Some(e), Some(d)) => Some(TRANSITIONS.slice_edges[e as usize][d]),
            _ => None,
        };
        CoordCube {
            raw: self.raw.apply(move_),
            twist: TRANSITIONS.twist[self.twist as usize][m],
            flip: TRANSITIONS.flip[self.flip as usize][m],
            corner_perm: TRANSITIONS.corner_perm[self.corner_perm as usize][m],
            ud_edges,
            slice_edges,
        }
    }

    pub fn twist(&self) -> u16 {
        self.twist
    }

    pub fn flip(&self) -> u16 {
        self.flip
    }

    pub fn corner_perm(&self) -> u16 {
        self.corner_perm
    }

    pub fn ud_edges(&self) -> Option<u16> {
        self.ud_edges
    }

    pub fn slice_edges(&self) -> Option<u16> {
        self.slice_edges
    }
}

/// Moves that keep the up/down-axis subgroup closed: any up or down turn,
/// half turns elsewhere. Returns the move's dense index within that set.
pub(crate) fn domino_move_index(move_: Move) -> Option<usize> {
    match (move_.face, move_.direction) {
        (Face::Up, d) => Some(d as usize),
        (Face::Down, d) => Some(3 + d as usize),
        (Face::Left, Direction::Double) => Some(6),
        (Face::Front, Direction::Double) => Some(7),
        (Face::Right, Direction::Double) => Some(8),
        (Face::Back, Direction::Double) => Some(9),
        _ => None,
    }
}

pub(crate) fn twist_transition(value: u16, move_: Move) -> u16 {
    TRANSITIONS.twist[value as usize][move_.index()]
}

pub(crate) fn flip_transition(value: u16, move_: Move) -> u16 {
    TRANSITIONS.flip[value as usize][move_.index()]
}

pub(crate) fn corner_perm_transition(value: u16, move_: Move) -> u16 {
    TRANSITIONS.corner_perm[value as usize][move_.index()]
}

pub(crate) fn ud_edges_transition(value: u16, move_: Move) -> Option<u16> {
    let d = domino_move_index(move_)?;
    Some(TRANSITIONS.ud_edges[value as usize][d])
}

pub(crate) fn slice_edges_transition(value: u16, move_: Move) -> Option<u16> {
    let d = domino_move_index(move_)?;
    Some(TRANSITIONS.slice_edges[value as usize][d])
}

fn corner_orientations(cube: &Cube) -> Result<[u16; 8], DecomposeError> {
    let mut orientations = [0u16; 8];
    for (slot, indices) in CORNER_SLOTS.iter().enumerate() {
        let up_down = indices
            .iter()
            .filter(|&&i| Axis::from(cube.facelet(i)) == Axis::UpDown)
            .count();
        if up_down != 1 {
            return Err(DecomposeError::Corner(slot));
        }
        orientations[slot] = indices
            .iter()
            .position(|&i| Axis::from(cube.facelet(i)) == Axis::UpDown)
            .unwrap() as u16;
    }
    Ok(orientations)
}

fn twist_of(cube: &Cube) -> Result<u16, DecomposeError> {
    // The last corner's twist is determined for any legal cube, so the
    // coordinate covers only the first seven.
    let orientations = corner_orientations(cube)?;
    Ok(orientations[..7]
        .iter()
        .enumerate()
        .map(|(slot, &o)| o * 3u16.pow(slot as u32))
        .sum())
}

fn flip_of(cube: &Cube) -> Result<u16, DecomposeError> {
    let mut flip = 0u16;
    for (slot, &[primary, secondary]) in EDGE_SLOTS.iter().enumerate() {
        let pair = [cube.facelet(primary), cube.facelet(secondary)];
        // An edge piece carries its reference color on exactly one sticker:
        // the up/down color if it has one, otherwise the front/back color.
        let reference = match pair.map(Axis::from) {
            [Axis::UpDown, Axis::UpDown] => return Err(DecomposeError::Edge(slot)),
            [Axis::UpDown, _] => 0,
            [_, Axis::UpDown] => 1,
            [Axis::FrontBack, Axis::FrontBack] => return Err(DecomposeError::Edge(slot)),
            [Axis::FrontBack, _] => 0,
            [_, Axis::FrontBack] => 1,
            [Axis::LeftRight, Axis::LeftRight] => return Err(DecomposeError::Edge(slot)),
        };
        if slot < 11 {
            flip |= (reference as u16) << slot;
        }
    }
    Ok(flip)
}

lazy_static! {
    /// Sorted color set of the piece that lives in each corner slot when solved.
    static ref CORNER_PIECES: [[Color; 3]; 8] = {
        let solved = Cube::solved();
        let mut pieces = [[Color::White; 3]; 8];
        for (slot, indices) in CORNER_SLOTS.iter().enumerate() {
            let mut colors = indices.map(|i| solved.facelet(i));
            colors.sort();
            pieces[slot] = colors;
        }
        pieces
    };

    /// Sorted color pair of the piece in each up/down-layer edge slot when solved.
    static ref UD_EDGE_PIECES: [[Color; 2]; 8] = {
        let solved = Cube::solved();
        let mut pieces = [[Color::White; 2]; 8];
        for (slot, indices) in EDGE_SLOTS.iter().take(8).enumerate() {
            let mut colors = indices.map(|i| solved.facelet(i));
            colors.sort();
            pieces[slot] = colors;
        }
        pieces
    };

    /// Sorted color pair of the piece in each middle-layer edge slot when solved.
    static ref SLICE_EDGE_PIECES: [[Color; 2]; 4] = {
        let solved = Cube::solved();
        let mut pieces = [[Color::White; 2]; 4];
        for (slot, indices) in EDGE_SLOTS[8..].iter().enumerate() {
            let mut colors = indices.map(|i| solved.facelet(i));
            colors.sort();
            pieces[slot] = colors;
        }
        pieces
    };
}

fn corner_perm_of(cube: &Cube) -> Result<u16, DecomposeError> {
    let mut pieces = [0usize; 8];
    let mut seen = [false; 8];
    for (slot, indices) in CORNER_SLOTS.iter().enumerate() {
        let mut colors = indices.map(|i| cube.facelet(i));
        colors.sort();
        let piece = CORNER_PIECES
            .iter()
            .position(|&p| p == colors)
            .ok_or(DecomposeError::Corner(slot))?;
        if seen[piece] {
            return Err(DecomposeError::DuplicateCorner(slot));
        }
        seen[piece] = true;
        pieces[slot] = piece;
    }
    Ok(rank_permutation(&pieces))
}

/// Permutation of the eight up/down-layer edge pieces over their slots.
/// `None` whenever some other piece occupies one of those slots, which is
/// exactly the case outside the up/down-axis subgroup.
fn ud_edges_of(cube: &Cube) -> Option<u16> {
    let mut pieces = [0usize; 8];
    let mut seen = [false; 8];
    for (slot, indices) in EDGE_SLOTS.iter().take(8).enumerate() {
        let mut colors = indices.map(|i| cube.facelet(i));
        colors.sort();
        let piece = UD_EDGE_PIECES.iter().position(|&p| p == colors)?;
        if seen[piece] {
            return None;
        }
        seen[piece] = true;
        pieces[slot] = piece;
    }
    Some(rank_permutation(&pieces))
}

/// Permutation of the four middle-layer edge pieces over their slots.
fn slice_edges_of(cube: &Cube) -> Option<u16> {
    let mut pieces = [0usize; 4];
    let mut seen = [false; 4];
    for (slot, indices) in EDGE_SLOTS[8..].iter().enumerate() {
        let mut colors = indices.map(|i| cube.facelet(i));
        colors.sort();
        let piece = SLICE_EDGE_PIECES.iter().position(|&p| p == colors)?;
        if seen[piece] {
            return None;
        }
        seen[piece] = true;
        pieces[slot] = piece;
    }
    Some(rank_permutation(&pieces))
}

/// Lehmer rank in factorial base, written as a Horner evaluation.
fn rank_permutation<const N: usize>(perm: &[usize; N]) -> u16 {
    let mut rank = 0usize;
    for i in 0..N {
        let smaller_after = perm[i + 1..].iter().filter(|&&p| p < perm[i]).count();
        rank = rank * (N - i) + smaller_after;
    }
    rank as u16
}

fn unrank_permutation<const N: usize>(mut rank: usize) -> [usize; N] {
    let mut digits = [0usize; N];
    for i in (0..N).rev() {
        digits[i] = rank % (N - i);
        rank /= N - i;
    }

    let mut available: Vec<usize> = (0..N).collect();
    let mut perm = [0usize; N];
    for (slot, &digit) in perm.iter_mut().zip(digits.iter()) {
        *slot = available.remove(digit);
    }
    perm
}

/// Cubie-level action of one move: which slot each slot's piece comes from,
/// and how the piece is turned on the way.
struct CubieMove {
    corner_source: [usize; 8],
    /// Cyclic offset: facelet `j` of the slot receives facelet `(j + spin) % 3`
    /// of the source slot.
    corner_spin: [usize; 8],
    edge_source: [usize; 12],
    edge_flip: [bool; 12],
}

lazy_static! {
    static ref CUBIE_MOVES: Vec<CubieMove> = Move::all().map(derive_cubie_move).collect();
    static ref TRANSITIONS: Transitions = Transitions::build();
}

fn derive_cubie_move(move_: Move) -> CubieMove {
    let perm = crate::cube::perm::permutation(move_);

    let mut corner_source = [0usize; 8];
    let mut corner_spin = [0usize; 8];
    for (slot, indices) in CORNER_SLOTS.iter().enumerate() {
        let came_from = indices.map(|i| perm[i] as usize);
        let (source, spin) = (0..8)
            .flat_map(|s| (0..3).map(move |r| (s, r)))
            .find(|&(s, r)| (0..3).all(|j| came_from[j] == CORNER_SLOTS[s][(j + r) % 3]))
            .unwrap_or_else(|| unreachable!("{} does not map corner slots cyclically", move_));
        corner_source[slot] = source;
        corner_spin[slot] = spin;
    }

    let mut edge_source = [0usize; 12];
    let mut edge_flip = [false; 12];
    for (slot, indices) in EDGE_SLOTS.iter().enumerate() {
        let came_from = indices.map(|i| perm[i] as usize);
        let (source, flipped) = (0..12)
            .flat_map(|s| [(s, false), (s, true)])
            .find(|&(s, f)| (0..2).all(|j| came_from[j] == EDGE_SLOTS[s][(j + f as usize) % 2]))
            .unwrap_or_else(|| unreachable!("{} does not map edge slots pairwise", move_));
        edge_source[slot] = source;
        edge_flip[slot] = flipped;
    }

    CubieMove {
        corner_source,
        corner_spin,
        edge_source,
        edge_flip,
    }
}

struct Transitions {
    twist: Vec<[u16; 18]>,
    flip: Vec<[u16; 18]>,
    corner_perm: Vec<[u16; 18]>,
    /// Indexed by `domino_move_index`; valid only within the subgroup.
    ud_edges: Vec<[u16; 10]>,
    slice_edges: Vec<[u16; 10]>,
}

impl Transitions {
    fn build() -> Transitions {
        Transitions {
            twist: (0..TWIST_VALUES as u16).map(twist_transitions).collect(),
            flip: (0..FLIP_VALUES as u16).map(flip_transitions).collect(),
            corner_perm: (0..CORNER_PERM_VALUES as u16)
                .map(corner_perm_transitions)
                .collect(),
            ud_edges: (0..UD_EDGE_VALUES as u16).map(ud_edges_transitions).collect(),
            slice_edges: (0..SLICE_EDGE_VALUES as u16)
                .map(slice_edges_transitions)
                .collect(),
        }
    }
}

fn twist_transitions(twist: u16) -> [u16; 18] {
    let mut orientations = [0u16; 8];
    let mut remaining = twist;
    for o in orientations.iter_mut().take(7) {
        *o = remaining % 3;
        remaining /= 3;
    }
    orientations[7] = (3 - orientations[..7].iter().sum::<u16>() % 3) % 3;

    let mut out = [0u16; 18];
    for (m, cubie_move) in CUBIE_MOVES.iter().enumerate() {
        let mut next = 0u16;
        for slot in (0..7).rev() {
            let source = cubie_move.corner_source[slot];
            let spin = cubie_move.corner_spin[slot] as u16;
            next = next * 3 + (orientations[source] + 3 - spin) % 3;
        }
        out[m] = next;
    }
    out
}

fn flip_transitions(flip: u16) -> [u16; 18] {
    let mut flips = [false; 12];
    for (slot, f) in flips.iter_mut().take(11).enumerate() {
        *f = flip & (1 << slot) != 0;
    }
    flips[11] = flips[..11].iter().filter(|&&f| f).count() % 2 == 1;

    let mut out = [0u16; 18];
    for (m, cubie_move) in CUBIE_MOVES.iter().enumerate() {
        let mut next = 0u16;
        for slot in 0..11 {
            let flipped = flips[cubie_move.edge_source[slot]] ^ cubie_move.edge_flip[slot];
            next |= (flipped as u16) << slot;
        }
        out[m] = next;
    }
    out
}

fn corner_perm_transitions(rank: u16) -> [u16; 18] {
    let pieces: [usize; 8] = unrank_permutation(rank as usize);

    let mut out = [0u16; 18];
    for (m, cubie_move) in CUBIE_MOVES.iter().enumerate() {
        let mut next = [0usize; 8];
        for slot in 0..8 {
            next[slot] = pieces[cubie_move.corner_source[slot]];
        }
        out[m] = rank_permutation(&next);
    }
    out
}

fn ud_edges_transitions(rank: u16) -> [u16; 10] {
    let pieces: [usize; 8] = unrank_permutation(rank as usize);

    let mut out = [0u16; 10];
    for move_ in Move::all() {
        let Some(d) = domino_move_index(move_) else {
            continue;
        };
        let cubie_move = &CUBIE_MOVES[move_.index()];
        let mut next = [0usize; 8];
        for slot in 0..8 {
            // Subgroup moves keep the top and bottom layers' edges within
            // their eight slots.
            let source = cubie_move.edge_source[slot];
            assert!(source < 8, "{} mixes middle-layer edges", move_);
            next[slot] = pieces[source];
        }
        out[d] = rank_permutation(&next);
    }
    out
}

fn slice_edges_transitions(rank: u16) -> [u16; 10] {
    let pieces: [usize; 4] = unrank_permutation(rank as usize);

    let mut out = [0u16; 10];
    for move_ in Move::all() {
        let Some(d) = domino_move_index(move_) else {
            continue;
        };
        let cubie_move = &CUBIE_MOVES[move_.index()];
        let mut next = [0usize; 4];
        for slot in 0..4 {
            let source = cubie_move.edge_source[8 + slot];
            assert!(source >= 8, "{} mixes top- or bottom-layer edges", move_);
            next[slot] = pieces[source - 8];
        }
        out[d] = rank_permutation(&next);
    }
    out
}
