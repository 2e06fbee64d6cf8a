//! Precomputed facelet permutations for the 18 face turns.
//!
//! A move is a permutation over the 54 positions: `new[i] = old[perm[i]]`.
//! The six clockwise base permutations are derived once from an integer 3-D
//! model of the cube (each facelet has a position and an outward normal, a
//! clockwise quarter turn is a 90-degree rotation about the turning face's
//! axis). Counterclockwise is the inverse permutation and the half turn is
//! the clockwise turn composed with itself.

use crate::prelude::*;

use lazy_static::lazy_static;

pub type Perm = [u8; 54];

lazy_static! {
    /// All 18 permutations, indexed by `Move::index()`.
    static ref MOVE_PERMS: [Perm; 18] = build_move_perms();
}

/// The permutation backing `move_`.
pub fn permutation(move_: Move) -> &'static Perm {
    &MOVE_PERMS[move_.index()]
}

fn build_move_perms() -> [Perm; 18] {
    let mut perms = [[0u8; 54]; 18];
    for face in enum_iterator::all::<Face>() {
        let clockwise = clockwise_perm(face);
        let index = |direction| Move { face, direction }.index();
        perms[index(Direction::Single)] = clockwise;
        perms[index(Direction::Double)] = compose(&clockwise, &clockwise);
        perms[index(Direction::Reverse)] = invert(&clockwise);
    }
    perms
}

/// Applying `first` then `second`.
fn compose(first: &Perm, second: &Perm) -> Perm {
    let mut out = [0u8; 54];
    for i in 0..54 {
        out[i] = first[second[i] as usize];
    }
    out
}

fn invert(perm: &Perm) -> Perm {
    let mut out = [0u8; 54];
    for i in 0..54 {
        out[perm[i] as usize] = i as u8;
    }
    out
}

type V3 = [i32; 3];

fn dot(a: V3, b: V3) -> i32 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

fn cross(a: V3, b: V3) -> V3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

/// Quarter turn clockwise (seen from outside the face) about `axis`:
/// v' = axis(axis . v) - axis x v.
fn rotate(axis: V3, v: V3) -> V3 {
    let c = cross(axis, v);
    let d = dot(axis, v);
    [
        axis[0] * d - c[0],
        axis[1] * d - c[1],
        axis[2] * d - c[2],
    ]
}

/// Outward normal of a face. Axes: x left-to-right, y down-to-up, z back-to-front.
fn normal(face: Face) -> V3 {
    match face {
        Face::Up => [0, 1, 0],
        Face::Left => [-1, 0, 0],
        Face::Front => [0, 0, 1],
        Face::Right => [1, 0, 0],
        Face::Back => [0, 0, -1],
        Face::Down => [0, -1, 0],
    }
}

/// Position and outward normal of the facelet at `index`, per the standard
/// unfolded-net layout (row-major within each face).
fn placement(index: usize) -> (V3, V3) {
    let face = Face::of_position(index);
    let row = ((index % 9) / 3) as i32;
    let col = (index % 3) as i32;

    let position = match face {
        Face::Up => [col - 1, 1, row - 1],
        Face::Left => [-1, 1 - row, col - 1],
        Face::Front => [col - 1, 1 - row, 1],
        Face::Right => [1, 1 - row, 1 - col],
        Face::Back => [1 - col, 1 - row, -1],
        Face::Down => [col - 1, -1, 1 - row],
    };
    (position, normal(face))
}

fn position_index(position: V3, normal: V3) -> u8 {
    for i in 0..54 {
        if placement(i) == (position, normal) {
            return i as u8;
        }
    }
    unreachable!("no facelet at {:?} facing {:?}", position, normal);
}

fn clockwise_perm(face: Face) -> Perm {
    let axis = normal(face);
    let mut perm = [0u8; 54];
    for i in 0..54 {
        let (position, facing) = placement(i);
        if dot(position, axis) == 1 {
            // Facelet sits in the turning layer; find where it lands.
            let destination = position_index(rotate(axis, position), rotate(axis, facing));
            perm[destination as usize] = i as u8;
        } else {
            perm[i] = i as u8;
        }
    }
    perm
}
