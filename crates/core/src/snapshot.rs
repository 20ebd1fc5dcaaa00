use serde::{Deserialize, Serialize};

use crate::types::{Cell, PieceKind, Phase, Rotation, BOARD_HEIGHT, BOARD_WIDTH};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ActiveSnapshot {
    pub kind: PieceKind,
    pub rotation: Rotation,
    pub x: i32,
    pub y: i32,
}

/// Owned copy of everything the simulator exposes, taken between ticks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimSnapshot {
    pub frame: u64,
    pub episode_id: u32,
    pub piece_id: u32,
    pub phase: Phase,
    pub active: ActiveSnapshot,
    pub ghost_y: i32,
    pub hold: Option<PieceKind>,
    pub next: PieceKind,
    pub can_hold: bool,
    pub score: u32,
    pub level: u32,
    pub lines: u32,
    pub combo: u32,
    pub level_progress: u32,
    pub locking_index: u64,
    pub top_outs: u32,
    pub width: usize,
    pub height: usize,
    /// Row-major cells, bottom row first
    pub board: Vec<Cell>,
}

impl SimSnapshot {
    const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
    const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

    pub fn cell(&self, x: usize, y: usize) -> Option<Cell> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.board.get(y * self.width + x).copied()
    }

    /// FNV-1a over the board cells; equal boards hash equal.
    pub fn board_hash(&self) -> u64 {
        self.board.iter().fold(Self::FNV_OFFSET, |hash, &cell| {
            (hash ^ cell as u64).wrapping_mul(Self::FNV_PRIME)
        })
    }

    /// Rows top-down as text, `.` for empty and the kind letter otherwise.
    pub fn render_rows(&self, rows: usize) -> Vec<String> {
        (0..rows.min(self.height))
            .rev()
            .map(|y| {
                (0..self.width)
                    .map(|x| match self.cell(x, y).and_then(PieceKind::from_cell) {
                        Some(kind) => kind.as_str().to_ascii_uppercase(),
                        None => ".".to_string(),
                    })
                    .collect()
            })
            .collect()
    }

    pub fn is_full_size(&self) -> bool {
        self.width == BOARD_WIDTH && self.height == BOARD_HEIGHT && self.board.len() == BOARD_WIDTH * BOARD_HEIGHT
    }
}
