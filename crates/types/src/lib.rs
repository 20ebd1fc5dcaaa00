//! Core types module - shared data structures and constants
//!
//! Everything in here is plain data: piece identities, rotation states, the
//! per-frame input flags, lock events, and the rule constants the simulator is
//! built on. The simulator itself lives in `tetris-sim-core`.
//!
//! # Board Dimensions
//!
//! - **Width**: 10 columns (indexed 0-9, left to right)
//! - **Height**: 40 rows (indexed 0-39, bottom to top)
//! - **Visible**: the bottom 20 rows; the rest is headroom for spawning and kicks
//!
//! # Frame Timing Constants
//!
//! All timing is counted in logical frames (60 per second):
//!
//! | Constant | Value | Description |
//! |----------|-------|-------------|
//! | `DEFAULT_DAS_FRAMES` | 5 | Frames a direction is held before auto-repeat |
//! | `DEFAULT_ARR_FRAMES` | 8 | Frames between auto-repeated moves |
//! | `DEFAULT_ARE_FRAMES` | 30 | Entry delay after a spawn before gravity applies |
//! | `LOCK_DELAY_FRAMES` | 30 | Grounded frames before a piece commits |
//! | `SOFT_DROP_INTERVAL_FRAMES` | 1 | Soft drop acts when more frames than this have passed |
//!
//! # Examples
//!
//! ```
//! use tetris_sim_types::{Intent, PieceKind, Rotation, TickInput, BOARD_HEIGHT, BOARD_WIDTH};
//!
//! let piece = PieceKind::from_str("t").unwrap();
//! assert_eq!(piece, PieceKind::T);
//! assert_eq!(piece.cell_value(), 6);
//!
//! assert_eq!(Rotation::West.cw(), Rotation::North);
//! assert_eq!(Rotation::from_index(-1), Rotation::West);
//!
//! let input = TickInput::from_intents(&[Intent::MoveLeft, Intent::SoftDrop]);
//! assert!(input.move_left && input.soft_drop && !input.hard_drop);
//!
//! assert_eq!(BOARD_WIDTH, 10);
//! assert_eq!(BOARD_HEIGHT, 40);
//! ```

use serde::{Deserialize, Serialize};

/// Board width in cells (10 columns)
pub const BOARD_WIDTH: usize = 10;

/// Board height in cells, including the hidden headroom above the field
pub const BOARD_HEIGHT: usize = 40;

/// Number of rows (counted from the bottom) that belong to the playfield
pub const VISIBLE_HEIGHT: usize = 20;

/// Logical frames per second; converts level speed (seconds) into frames
pub const FRAMES_PER_SECOND: u32 = 60;

/// Delayed auto shift, in frames.
pub const DEFAULT_DAS_FRAMES: u32 = 5;

/// Auto repeat rate, in frames.
pub const DEFAULT_ARR_FRAMES: u32 = 8;

/// Entry delay, in frames.
pub const DEFAULT_ARE_FRAMES: u32 = 30;

/// Lock delay window in frames; the piece commits once grounded for more than this.
pub const LOCK_DELAY_FRAMES: u64 = 30;

/// Soft drop moves at most once every `SOFT_DROP_INTERVAL_FRAMES + 1` frames.
pub const SOFT_DROP_INTERVAL_FRAMES: u64 = 1;

/// Row the piece origin is placed on when (re)spawned.
pub const SPAWN_Y: i32 = 18;

/// Spawn column for the square and line pieces.
pub const SPAWN_X_WIDE: i32 = 3;

/// Spawn column for every other piece.
pub const SPAWN_X: i32 = 2;

/// Per-piece cap on each of the soft and hard drop bonus accumulators
pub const DROP_BONUS_CAP: i32 = 20;

/// Score per soft-dropped cell
pub const SOFT_DROP_POINTS: u32 = 1;

/// Score per hard-dropped cell
pub const HARD_DROP_POINTS: u32 = 2;

/// Level-progress points awarded for clearing N rows at once (index = rows)
pub const LEVEL_PROGRESS_POINTS: [u32; 5] = [0, 1, 3, 5, 8];

/// Base award for clearing N rows without a T-spin, before the `(level + 1)` multiplier.
///
/// A plain single earns nothing beyond drop bonuses.
pub const LINE_CLEAR_POINTS: [u32; 5] = [0, 0, 300, 500, 800];

/// Base award for a T-spin clearing N rows, before the `(level + 1)` multiplier.
pub const T_SPIN_POINTS: [u32; 4] = [100, 400, 1200, 1600];

/// A cell on the board: `0` is empty, otherwise `kind id + 1`.
pub type Cell = u8;

/// Value of an empty board cell
pub const EMPTY_CELL: Cell = 0;

/// The seven piece kinds
///
/// The discriminant is the stable piece id used for board cell values
/// (`id + 1`) and therefore render colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PieceKind {
    I = 0,
    J = 1,
    L = 2,
    O = 3,
    S = 4,
    T = 5,
    Z = 6,
}

impl PieceKind {
    /// All kinds in id order.
    pub const ALL: [PieceKind; 7] = [
        PieceKind::I,
        PieceKind::J,
        PieceKind::L,
        PieceKind::O,
        PieceKind::S,
        PieceKind::T,
        PieceKind::Z,
    ];

    pub fn id(self) -> u8 {
        self as u8
    }

    /// Look up a kind by its id.
    ///
    /// ```
    /// use tetris_sim_types::PieceKind;
    ///
    /// assert_eq!(PieceKind::from_id(3), Some(PieceKind::O));
    /// assert_eq!(PieceKind::from_id(7), None);
    /// ```
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.get(id as usize).copied()
    }

    /// Value written into board cells when this kind locks.
    pub fn cell_value(self) -> Cell {
        self.id() + 1
    }

    /// Inverse of [`PieceKind::cell_value`]; `None` for empty cells.
    pub fn from_cell(cell: Cell) -> Option<Self> {
        cell.checked_sub(1).and_then(Self::from_id)
    }

    /// Parse piece kind from string (case-insensitive)
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "i" => Some(PieceKind::I),
            "j" => Some(PieceKind::J),
            "l" => Some(PieceKind::L),
            "o" => Some(PieceKind::O),
            "s" => Some(PieceKind::S),
            "t" => Some(PieceKind::T),
            "z" => Some(PieceKind::Z),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            PieceKind::I => "i",
            PieceKind::J => "j",
            PieceKind::L => "l",
            PieceKind::O => "o",
            PieceKind::S => "s",
            PieceKind::T => "t",
            PieceKind::Z => "z",
        }
    }
}

/// Rotation states, indexed 0..=3.
///
/// Index arithmetic is what the rules care about: "clockwise" is the
/// successor index, "counter-clockwise" the predecessor, and a flip is two
/// steps. Any integer maps onto a state modulo 4.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Rotation {
    #[default]
    North = 0,
    East = 1,
    South = 2,
    West = 3,
}

impl Rotation {
    /// Normalize any integer rotation index (negative values included).
    pub fn from_index(index: i32) -> Self {
        match index.rem_euclid(4) {
            0 => Rotation::North,
            1 => Rotation::East,
            2 => Rotation::South,
            _ => Rotation::West,
        }
    }

    pub fn index(self) -> usize {
        self as usize
    }

    /// Successor state.
    ///
    /// ```
    /// use tetris_sim_types::Rotation;
    ///
    /// assert_eq!(Rotation::North.cw(), Rotation::East);
    /// assert_eq!(Rotation::West.cw(), Rotation::North);
    /// ```
    pub fn cw(self) -> Self {
        Self::from_index(self as i32 + 1)
    }

    /// Predecessor state.
    pub fn ccw(self) -> Self {
        Self::from_index(self as i32 - 1)
    }

    /// Two steps around.
    pub fn flip(self) -> Self {
        Self::from_index(self as i32 + 2)
    }

    /// Parse rotation from string
    ///
    /// Accepts full names, single letters, or digits (case-insensitive).
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "north" | "n" | "0" => Some(Rotation::North),
            "east" | "e" | "1" => Some(Rotation::East),
            "south" | "s" | "2" => Some(Rotation::South),
            "west" | "w" | "3" => Some(Rotation::West),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::North => "north",
            Rotation::East => "east",
            Rotation::South => "south",
            Rotation::West => "west",
        }
    }
}

/// One of the eight held inputs sampled each frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Intent {
    MoveLeft,
    MoveRight,
    Hold,
    RotateCw,
    RotateCcw,
    Rotate180,
    SoftDrop,
    HardDrop,
}

impl Intent {
    pub const ALL: [Intent; 8] = [
        Intent::MoveLeft,
        Intent::MoveRight,
        Intent::Hold,
        Intent::RotateCw,
        Intent::RotateCcw,
        Intent::Rotate180,
        Intent::SoftDrop,
        Intent::HardDrop,
    ];

    /// Parse intent from its camelCase name (case-insensitive)
    ///
    /// ```
    /// use tetris_sim_types::Intent;
    ///
    /// assert_eq!(Intent::from_str("moveLeft"), Some(Intent::MoveLeft));
    /// assert_eq!(Intent::from_str("ROTATE180"), Some(Intent::Rotate180));
    /// assert_eq!(Intent::from_str("pause"), None);
    /// ```
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "moveleft" => Some(Intent::MoveLeft),
            "moveright" => Some(Intent::MoveRight),
            "hold" => Some(Intent::Hold),
            "rotatecw" => Some(Intent::RotateCw),
            "rotateccw" => Some(Intent::RotateCcw),
            "rotate180" => Some(Intent::Rotate180),
            "softdrop" => Some(Intent::SoftDrop),
            "harddrop" => Some(Intent::HardDrop),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Intent::MoveLeft => "moveLeft",
            Intent::MoveRight => "moveRight",
            Intent::Hold => "hold",
            Intent::RotateCw => "rotateCw",
            Intent::RotateCcw => "rotateCcw",
            Intent::Rotate180 => "rotate180",
            Intent::SoftDrop => "softDrop",
            Intent::HardDrop => "hardDrop",
        }
    }
}

/// The eight "is currently held" flags for one frame.
///
/// Callers report levels, not edges; the simulator does its own edge
/// detection for rotation, hold and auto-shift.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct TickInput {
    pub move_left: bool,
    pub move_right: bool,
    pub hold: bool,
    pub rotate_cw: bool,
    pub rotate_ccw: bool,
    pub rotate_180: bool,
    pub soft_drop: bool,
    pub hard_drop: bool,
}

impl TickInput {
    /// Nothing held.
    pub const IDLE: TickInput = TickInput {
        move_left: false,
        move_right: false,
        hold: false,
        rotate_cw: false,
        rotate_ccw: false,
        rotate_180: false,
        soft_drop: false,
        hard_drop: false,
    };

    pub fn from_intents(intents: &[Intent]) -> Self {
        intents
            .iter()
            .fold(Self::IDLE, |input, &intent| input.with(intent))
    }

    /// Copy of `self` with `intent` held.
    pub fn with(mut self, intent: Intent) -> Self {
        *self.flag_mut(intent) = true;
        self
    }

    pub fn contains(&self, intent: Intent) -> bool {
        match intent {
            Intent::MoveLeft => self.move_left,
            Intent::MoveRight => self.move_right,
            Intent::Hold => self.hold,
            Intent::RotateCw => self.rotate_cw,
            Intent::RotateCcw => self.rotate_ccw,
            Intent::Rotate180 => self.rotate_180,
            Intent::SoftDrop => self.soft_drop,
            Intent::HardDrop => self.hard_drop,
        }
    }

    pub fn is_idle(&self) -> bool {
        *self == Self::IDLE
    }

    fn flag_mut(&mut self, intent: Intent) -> &mut bool {
        match intent {
            Intent::MoveLeft => &mut self.move_left,
            Intent::MoveRight => &mut self.move_right,
            Intent::Hold => &mut self.hold,
            Intent::RotateCw => &mut self.rotate_cw,
            Intent::RotateCcw => &mut self.rotate_ccw,
            Intent::Rotate180 => &mut self.rotate_180,
            Intent::SoftDrop => &mut self.soft_drop,
            Intent::HardDrop => &mut self.hard_drop,
        }
    }
}

/// Which timer currently governs the active piece.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Phase {
    /// Inside the entry delay: the piece is visible and steerable, but
    /// gravity, locking and drops are not applied.
    SpawnDelay,
    /// Airborne and subject to gravity.
    Falling,
    /// Resting on a surface; commits once the lock delay runs out.
    Locking,
}

/// Emitted by the simulator whenever a piece is committed to the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockEvent {
    /// Kind of the piece that locked.
    pub kind: PieceKind,
    pub lines_cleared: u32,
    pub t_spin: bool,
    /// Points added to the score by this commit (drop bonuses included).
    pub score_awarded: u32,
    pub level_up: bool,
    /// The next piece could not enter and the session was reset.
    pub topped_out: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rule_constants_match_documented_defaults() {
        assert_eq!(DEFAULT_DAS_FRAMES, 5);
        assert_eq!(DEFAULT_ARR_FRAMES, 8);
        assert_eq!(DEFAULT_ARE_FRAMES, 30);
        assert_eq!(LOCK_DELAY_FRAMES, 30);
        assert_eq!(DROP_BONUS_CAP, 20);
        assert_eq!(LEVEL_PROGRESS_POINTS, [0, 1, 3, 5, 8]);
        assert_eq!(VISIBLE_HEIGHT * 2, BOARD_HEIGHT);
    }

    #[test]
    fn cell_values_round_trip_through_kind() {
        for kind in PieceKind::ALL {
            assert_eq!(PieceKind::from_cell(kind.cell_value()), Some(kind));
        }
        assert_eq!(PieceKind::from_cell(EMPTY_CELL), None);
        assert_eq!(PieceKind::from_cell(8), None);
    }

    #[test]
    fn rotation_index_is_normalized() {
        assert_eq!(Rotation::from_index(4), Rotation::North);
        assert_eq!(Rotation::from_index(-2), Rotation::South);
        assert_eq!(Rotation::from_index(7), Rotation::West);
        assert_eq!(Rotation::East.ccw(), Rotation::North);
        assert_eq!(Rotation::East.flip(), Rotation::West);
    }

    #[test]
    fn tick_input_tracks_each_intent() {
        for intent in Intent::ALL {
            let input = TickInput::IDLE.with(intent);
            assert!(input.contains(intent));
            assert!(!input.is_idle());
            assert_eq!(Intent::from_str(intent.as_str()), Some(intent));
            for other in Intent::ALL.into_iter().filter(|&o| o != intent) {
                assert!(!input.contains(other));
            }
        }
        assert!(TickInput::default().is_idle());
    }
}
