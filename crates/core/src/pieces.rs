//! Pieces module - the piece catalog
//!
//! Every kind has four rotation states stored as 16-bit masks over a 4x4
//! grid. Bit `i` is the cell at column `i & 3`, row `i >> 2` relative to the
//! piece origin, with rows growing upward like board `y`.

use crate::types::{PieceKind, Rotation, SPAWN_X, SPAWN_X_WIDE, SPAWN_Y};

/// Rotation masks indexed by `[kind id][rotation index]`.
const ROTATION_MASKS: [[u16; 4]; 7] = [
    // I
    [0x0F00, 0x2222, 0x00F0, 0x4444],
    // J
    [0x8E00, 0x6440, 0x0E20, 0x44C0],
    // L
    [0x2E00, 0x4460, 0x0E80, 0xC440],
    // O
    [0x6600, 0x6600, 0x6600, 0x6600],
    // S
    [0x6C00, 0x4620, 0x06C0, 0x8C40],
    // T
    [0x4E00, 0x4640, 0x0E40, 0x4C40],
    // Z
    [0xC600, 0x2640, 0x0C60, 0x4C80],
];

/// Offsets of the four occupied cells of a piece, relative to its origin.
pub type PieceCells = [(i32, i32); 4];

/// A piece placed on the board: kind, rotation and the origin of its 4x4 box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pose {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
}

impl Pose {
    /// Pose a kind enters the board with.
    pub fn spawn(kind: PieceKind) -> Self {
        let (x, y) = spawn_position(kind);
        Self {
            kind,
            rotation: Rotation::North,
            x,
            y,
        }
    }

    /// Same piece moved by `(dx, dy)`.
    pub fn shifted(self, dx: i32, dy: i32) -> Self {
        Self {
            x: self.x + dx,
            y: self.y + dy,
            ..self
        }
    }

    /// Board coordinates of the occupied cells
    pub fn cells(&self) -> PieceCells {
        cells(self.kind, self.rotation).map(|(cx, cy)| (self.x + cx, self.y + cy))
    }
}

/// Mask for a kind at any rotation index (taken modulo 4).
pub fn rotation_mask(kind: PieceKind, rotation_index: i32) -> u16 {
    ROTATION_MASKS[kind.id() as usize][rotation_index.rem_euclid(4) as usize]
}

/// Mask for a kind at a rotation state.
pub fn mask(kind: PieceKind, rotation: Rotation) -> u16 {
    ROTATION_MASKS[kind.id() as usize][rotation.index()]
}

/// The square and the line spawn one column further right than the rest.
pub fn is_square_or_line(kind: PieceKind) -> bool {
    matches!(kind, PieceKind::O | PieceKind::I)
}

/// Occupied cells of a kind at a rotation, in bit order (bottom row first).
pub fn cells(kind: PieceKind, rotation: Rotation) -> PieceCells {
    let bits = mask(kind, rotation);
    let mut out = [(0, 0); 4];
    let mut n = 0;
    for i in 0..16 {
        if bits & (1 << i) != 0 && n < out.len() {
            out[n] = (i & 3, i >> 2);
            n += 1;
        }
    }
    out
}

/// Spawn origin for a kind: `(x, y)` with rotation 0.
pub fn spawn_position(kind: PieceKind) -> (i32, i32) {
    let x = if is_square_or_line(kind) {
        SPAWN_X_WIDE
    } else {
        SPAWN_X
    };
    (x, SPAWN_Y)
}
