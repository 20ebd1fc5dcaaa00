//! Kicks module - SRS wall-kick resolution
//!
//! A rotation request is tried at up to five candidate offsets in order; the
//! first candidate the board accepts wins. Offsets are `(dx, dy)` with `dy`
//! pointing up, matching board coordinates.

use crate::board::Board;
use crate::pieces::Pose;
use crate::types::{PieceKind, Rotation};

/// Five candidate offsets for one rotation step
pub type KickRow = [(i32, i32); 5];

/// Kick table: one row per rotation state
pub type KickTable = [KickRow; 4];

/// Shared by J, L, S, T and Z (O never reaches a table)
const JLSTZ_KICKS: KickTable = [
    [(0, 0), (-1, 0), (-1, 1), (0, -2), (-1, -2)],
    [(0, 0), (1, 0), (1, -1), (0, 2), (1, 2)],
    [(0, 0), (1, 0), (1, 1), (0, -2), (1, -2)],
    [(0, 0), (-1, 0), (-1, -1), (0, 2), (-1, 2)],
];

const I_KICKS: KickTable = [
    [(0, 0), (-2, 0), (1, 0), (-2, -1), (1, 2)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, -1)],
    [(0, 0), (2, 0), (-1, 0), (2, 1), (-1, -2)],
    [(0, 0), (-1, 0), (2, 0), (-1, 2), (2, 1)],
];

/// Outcome of a successful rotation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KickResult {
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
    /// Candidate offset that was accepted
    pub offset: (i32, i32),
}

impl KickResult {
    /// Apply the result to the pose it was computed for.
    pub fn apply(&self, pose: Pose) -> Pose {
        Pose {
            rotation: self.rotation,
            x: self.x,
            y: self.y,
            ..pose
        }
    }
}

/// Get kick table for a piece kind
pub fn kick_table(kind: PieceKind) -> &'static KickTable {
    match kind {
        PieceKind::I => &I_KICKS,
        _ => &JLSTZ_KICKS,
    }
}

/// Candidate offsets for turning `kind` from `from` to `to`.
///
/// A successor step uses the row of the starting state, a predecessor step
/// the negated row of the target state, and a half turn the row of the target
/// state. Returns `None` for the square and for a zero-step request.
pub fn kick_offsets(kind: PieceKind, from: Rotation, to: Rotation) -> Option<KickRow> {
    if kind == PieceKind::O {
        return None;
    }
    let table = kick_table(kind);
    match (to.index() + 4 - from.index()) % 4 {
        1 => Some(table[from.index()]),
        2 => Some(table[to.index()]),
        3 => Some(table[to.index()].map(|(dx, dy)| (-dx, -dy))),
        _ => None,
    }
}

/// Try to turn `pose` to `requested`, kicking as needed.
///
/// Returns the first accepted candidate, or `None` when every candidate is
/// blocked (the pose is left to the caller unchanged). The square never
/// rotates.
pub fn try_rotate(board: &Board, pose: Pose, requested: Rotation) -> Option<KickResult> {
    let offsets = kick_offsets(pose.kind, pose.rotation, requested)?;

    offsets.into_iter().find_map(|(dx, dy)| {
        let (x, y) = (pose.x + dx, pose.y + dy);
        if board.is_blocked(pose.kind, requested, x, y) {
            None
        } else {
            Some(KickResult {
                rotation: requested,
                x,
                y,
                offset: (dx, dy),
            })
        }
    })
}
