//! Autoplay - a deterministic input source for headless runs
//!
//! For every new piece the driver scores each reachable landing spot (all
//! rotations, every column it can slide to along the entry row) and then
//! steers toward the best one like a player would: rotation and movement are
//! tapped on alternate frames so every press registers as a fresh edge, and
//! hard drop is held once the piece is lined up.

use rand::Rng;

use crate::core::pieces::spawn_position;
use crate::core::{Board, Simulator};
use crate::types::{Intent, PieceKind, Rotation, TickInput, BOARD_WIDTH};

const LINE_WEIGHT: i32 = 40;
const HOLE_WEIGHT: i32 = 8;
const HEIGHT_WEIGHT: i32 = 2;

/// Frames the driver spends steering one piece before dropping it where it is
const STEER_BUDGET_FRAMES: u64 = 90;

const ALL_ROTATIONS: [Rotation; 4] = [
    Rotation::North,
    Rotation::East,
    Rotation::South,
    Rotation::West,
];

/// A landing spot and how much the planner likes it
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Placement {
    pub x: i32,
    pub rotation: Rotation,
    pub landing_y: i32,
    pub score: i32,
}

fn rotations(kind: PieceKind) -> &'static [Rotation] {
    match kind {
        PieceKind::O => &ALL_ROTATIONS[..1],
        _ => &ALL_ROTATIONS,
    }
}

/// Heuristic value of locking `kind` at a pose: cleared lines minus holes and stack height.
pub fn evaluate(board: &Board, kind: PieceKind, rotation: Rotation, x: i32, y: i32) -> i32 {
    let mut after = board.clone();
    after.lock_piece(kind, rotation, x, y);
    let lines = after.clear_full_rows().len() as i32;
    lines * LINE_WEIGHT
        - after.hole_count() as i32 * HOLE_WEIGHT
        - after.max_height() as i32 * HEIGHT_WEIGHT
}

fn drop_y(board: &Board, kind: PieceKind, rotation: Rotation, x: i32, mut y: i32) -> i32 {
    while !board.is_blocked(kind, rotation, x, y - 1) {
        y -= 1;
    }
    y
}

fn path_is_clear(board: &Board, kind: PieceKind, rotation: Rotation, from_x: i32, to_x: i32, y: i32) -> bool {
    let (lo, hi) = (from_x.min(to_x), from_x.max(to_x));
    (lo..=hi).all(|x| !board.is_blocked(kind, rotation, x, y))
}

/// Best placement for `kind` entering at `(from_x, from_y)`.
///
/// A column is reachable when the piece can turn in place and slide there
/// along the entry row. Ties keep the first candidate found. `None` when the
/// piece cannot turn or slide anywhere.
pub fn plan_placement(board: &Board, kind: PieceKind, from_x: i32, from_y: i32) -> Option<Placement> {
    let mut best: Option<Placement> = None;

    for &rotation in rotations(kind) {
        if board.is_blocked(kind, rotation, from_x, from_y) {
            continue;
        }
        for x in -3..BOARD_WIDTH as i32 {
            if !path_is_clear(board, kind, rotation, from_x, x, from_y) {
                continue;
            }
            let landing_y = drop_y(board, kind, rotation, x, from_y);
            let score = evaluate(board, kind, rotation, x, landing_y);
            if best.map_or(true, |b| score > b.score) {
                best = Some(Placement {
                    x,
                    rotation,
                    landing_y,
                    score,
                });
            }
        }
    }

    best
}

fn rotation_intent(from: Rotation, to: Rotation) -> Intent {
    match (to.index() + 4 - from.index()) % 4 {
        1 => Intent::RotateCw,
        3 => Intent::RotateCcw,
        _ => Intent::Rotate180,
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PieceKey {
    episode_id: u32,
    piece_id: u32,
    can_hold: bool,
}

/// Frame-by-frame input generator built on [`plan_placement`]
#[derive(Debug, Clone)]
pub struct Autoplay {
    allow_hold: bool,
    key: Option<PieceKey>,
    target: Option<Placement>,
    hold_pending: bool,
    planned_at: u64,
    pulse: bool,
}

impl Default for Autoplay {
    fn default() -> Self {
        Self::new()
    }
}

impl Autoplay {
    pub fn new() -> Self {
        Self {
            allow_hold: true,
            key: None,
            target: None,
            hold_pending: false,
            planned_at: 0,
            pulse: false,
        }
    }

    /// Whether the driver may swap with the hold slot when that plays better
    pub fn with_hold(mut self, allow_hold: bool) -> Self {
        self.allow_hold = allow_hold;
        self
    }

    /// Placement the driver is currently steering toward
    pub fn target(&self) -> Option<Placement> {
        self.target
    }

    fn replan<R: Rng>(&mut self, sim: &Simulator<R>, key: PieceKey) {
        self.key = Some(key);
        self.planned_at = sim.frame();
        self.hold_pending = false;

        let board = sim.board();
        self.target = plan_placement(board, sim.current(), sim.x(), sim.y());

        if self.allow_hold && sim.can_hold() {
            let swap_in = sim.hold_piece().unwrap_or_else(|| sim.next_piece());
            let (x, y) = spawn_position(swap_in);
            let alternative = plan_placement(board, swap_in, x, y);
            let better = match (self.target, alternative) {
                (Some(current), Some(alt)) => alt.score > current.score,
                (None, Some(_)) => true,
                _ => false,
            };
            if better {
                self.hold_pending = true;
            }
        }
    }

    /// Inputs to hold during the next tick of `sim`.
    pub fn next_input<R: Rng>(&mut self, sim: &Simulator<R>) -> TickInput {
        let key = PieceKey {
            episode_id: sim.episode_id(),
            piece_id: sim.piece_id(),
            can_hold: sim.can_hold(),
        };
        if self.key != Some(key) {
            self.replan(sim, key);
        }
        self.pulse = !self.pulse;

        if self.hold_pending {
            self.hold_pending = false;
            return TickInput::IDLE.with(Intent::Hold);
        }

        let drop = TickInput::IDLE.with(Intent::HardDrop);
        let Some(target) = self.target else {
            return drop;
        };
        if sim.frame().saturating_sub(self.planned_at) > STEER_BUDGET_FRAMES {
            return drop;
        }

        let rotation_done = sim.rotation() == target.rotation;
        if rotation_done && sim.x() == target.x {
            return drop;
        }
        if !self.pulse {
            return TickInput::IDLE;
        }

        let intent = if !rotation_done {
            rotation_intent(sim.rotation(), target.rotation)
        } else if sim.x() > target.x {
            Intent::MoveLeft
        } else {
            Intent::MoveRight
        };
        TickInput::IDLE.with(intent)
    }
}
