//! Pieces module - shape tables for every piece kind
//!
//! Each kind owns a fixed, ordered list of rotation states. A rotation state is
//! a 5x5 grid anchored at its top-left corner; the piece anchor `(x, y)` on the
//! board is where that corner lands. Rotation simply advances through the list
//! (no wall kicks), and the running rotation index wraps at lookup time.
//!
//! The tables are built at compile time from row strings so they read like the
//! shapes they describe.

use arrayvec::ArrayVec;

use crate::types::PieceKind;

/// Side length of a rotation grid
pub const SHAPE_SIZE: usize = 5;

/// Largest number of occupied cells in any shape
pub const MAX_MINOS: usize = 4;

/// One rotation state: `grid[row][col]` is true for an occupied cell
pub type ShapeGrid = [[bool; SHAPE_SIZE]; SHAPE_SIZE];

/// Offset of a single mino relative to the piece anchor
pub type MinoOffset = (i8, i8);

/// Occupied offsets of one rotation state
pub type Minos = ArrayVec<MinoOffset, MAX_MINOS>;

const fn grid(rows: [&str; SHAPE_SIZE]) -> ShapeGrid {
    let mut out = [[false; SHAPE_SIZE]; SHAPE_SIZE];
    let mut y = 0;
    while y < SHAPE_SIZE {
        let bytes = rows[y].as_bytes();
        let mut x = 0;
        while x < SHAPE_SIZE {
            out[y][x] = bytes[x] == b'#';
            x += 1;
        }
        y += 1;
    }
    out
}

const I_SHAPES: [ShapeGrid; 2] = [
    grid([".....", "..#..", "..#..", "..#..", "..#.."]),
    grid([".....", ".....", "####.", ".....", "....."]),
];

const O_SHAPES: [ShapeGrid; 1] = [grid([".....", ".....", ".##..", ".##..", "....."])];

const T_SHAPES: [ShapeGrid; 4] = [
    grid([".....", ".....", ".#...", "###..", "....."]),
    grid([".....", ".....", ".#...", ".##..", ".#..."]),
    grid([".....", ".....", ".....", "###..", ".#..."]),
    grid([".....", ".....", ".#...", "##...", ".#..."]),
];

const S_SHAPES: [ShapeGrid; 2] = [
    grid([".....", ".....", ".##..", "##...", "....."]),
    grid([".....", ".....", ".#...", ".##..", "..#.."]),
];

const Z_SHAPES: [ShapeGrid; 2] = [
    grid([".....", ".....", "##...", ".##..", "....."]),
    grid([".....", ".....", "..#..", ".##..", ".#..."]),
];

const J_SHAPES: [ShapeGrid; 4] = [
    grid([".....", ".....", ".#...", ".#...", "##..."]),
    grid([".....", ".....", "#....", "###..", "....."]),
    grid([".....", ".....", ".##..", ".#...", ".#..."]),
    grid([".....", ".....", ".....", "###..", "..#.."]),
];

const L_SHAPES: [ShapeGrid; 4] = [
    grid([".....", ".....", ".#...", ".#...", ".##.."]),
    grid([".....", ".....", ".....", "###..", "#...."]),
    grid([".....", ".....", "##...", ".#...", ".#..."]),
    grid([".....", ".....", "..#..", "###..", "....."]),
];

const A_SHAPES: [ShapeGrid; 4] = [
    grid([".....", ".....", ".....", "#....", "##..."]),
    grid([".....", ".....", ".....", "##...", "#...."]),
    grid([".....", ".....", ".....", ".#...", "##..."]),
    grid([".....", ".....", ".....", "##...", ".#..."]),
];

const B_SHAPES: [ShapeGrid; 1] = [grid([".....", ".....", ".....", "#....", "....."])];

const C_SHAPES: [ShapeGrid; 2] = [
    grid([".....", ".....", ".....", "#....", "#...."]),
    grid([".....", ".....", ".....", "##...", "....."]),
];

/// All rotation states of a piece kind, in rotation order
pub fn rotations(kind: PieceKind) -> &'static [ShapeGrid] {
    match kind {
        PieceKind::I => &I_SHAPES,
        PieceKind::O => &O_SHAPES,
        PieceKind::T => &T_SHAPES,
        PieceKind::S => &S_SHAPES,
        PieceKind::Z => &Z_SHAPES,
        PieceKind::J => &J_SHAPES,
        PieceKind::L => &L_SHAPES,
        PieceKind::A => &A_SHAPES,
        PieceKind::B => &B_SHAPES,
        PieceKind::C => &C_SHAPES,
    }
}

/// Number of distinct rotation states of a kind
pub fn rotation_count(kind: PieceKind) -> usize {
    rotations(kind).len()
}

/// Wrap a running rotation counter onto the kind's rotation list
pub fn normalize_rotation(kind: PieceKind, rotation: i32) -> usize {
    rotation.rem_euclid(rotation_count(kind) as i32) as usize
}

/// Shape grid for a kind at a (running, possibly negative) rotation index
pub fn get_shape(kind: PieceKind, rotation: i32) -> &'static ShapeGrid {
    &rotations(kind)[normalize_rotation(kind, rotation)]
}

/// Occupied (col, row) offsets of a kind at a rotation, row-major order
pub fn minos(kind: PieceKind, rotation: i32) -> Minos {
    let shape = get_shape(kind, rotation);
    let mut out = Minos::new();
    for (row, cells) in shape.iter().enumerate() {
        for (col, &filled) in cells.iter().enumerate() {
            if filled {
                out.push((col as i8, row as i8));
            }
        }
    }
    out
}
