//! Simulator module - the per-frame state machine
//!
//! One call to [`Simulator::tick`] is one logical frame. Within a frame the
//! steps run in a fixed order:
//!
//! 1. hold (ends the frame when it fires)
//! 2. rotation, edge-triggered through a latch
//! 3. horizontal movement with delayed auto shift and auto repeat
//! 4. entry delay gate: nothing below runs for `are` frames after a spawn
//! 5. gravity, support check and lock delay
//! 6. hard drop
//! 7. soft drop
//!
//! A commit (lock delay expiry or hard drop) writes the piece, clears rows,
//! scores, and brings in the next piece. If the next piece cannot enter, or a
//! piece swapped in from hold lands on the stack, the whole session resets.

use rand::Rng;
use rand_chacha::ChaCha8Rng;
use tracing::{debug, info, trace};

use crate::board::Board;
use crate::config::SimConfig;
use crate::kicks::try_rotate;
use crate::pieces::{spawn_position, Pose};
use crate::rng::PieceBag;
use crate::scoring::{advance_level, calculate_clear_score, calculate_drop_score, gravity_due};
use crate::snapshot::{ActiveSnapshot, SimSnapshot};
use crate::types::{
    LockEvent, Phase, PieceKind, Rotation, TickInput, LOCK_DELAY_FRAMES,
    SOFT_DROP_INTERVAL_FRAMES,
};

/// Lower bound for the landing search
const LOWEST_ORIGIN_Y: i32 = -4;

/// Complete simulation state
#[derive(Debug, Clone)]
pub struct Simulator<R = ChaCha8Rng> {
    config: SimConfig,
    board: Board,
    bag: PieceBag<R>,
    current: PieceKind,
    next: PieceKind,
    hold: Option<PieceKind>,
    rotation: Rotation,
    x: i32,
    y: i32,

    /// Frames since the session started (or last reset)
    frame: u64,
    /// Frame the current piece entered play (hold swaps do not restamp it)
    spawn_frame: u64,
    /// Frame the piece was found resting on a surface, while it stays there
    lock_started_at: Option<u64>,
    /// Auto-shift anchor
    move_anchor: u64,
    last_soft_drop: u64,
    /// Gravity frames accumulated since the last gravity step
    gravity_frames: u32,

    /// A direction has been held since the last neutral frame
    fast_move: bool,
    /// A rotation input has been held since the last neutral frame
    rotated: bool,
    /// Hold already used by the current piece
    switched: bool,

    soft_drop_cells: i32,
    hard_drop_cells: i32,

    score: u32,
    level: u32,
    lines: u32,
    combo: u32,
    level_progress: u32,

    /// Monotonic episode id (increments on every reset)
    episode_id: u32,
    /// Pieces brought into play this episode
    piece_id: u32,
    top_outs: u32,
}

impl Simulator<ChaCha8Rng> {
    /// Create a simulator with default timings and a seeded bag
    pub fn new(seed: u64) -> Self {
        Self::with_config(seed, SimConfig::default())
    }

    pub fn with_config(seed: u64, config: SimConfig) -> Self {
        Self::from_bag(config, PieceBag::seeded(seed))
    }
}

impl<R: Rng> Simulator<R> {
    /// Create a simulator drawing pieces from `bag`.
    ///
    /// The session starts reset: empty board, first piece at the spawn row,
    /// frame 0.
    pub fn from_bag(config: SimConfig, bag: PieceBag<R>) -> Self {
        let mut sim = Self {
            config,
            board: Board::new(),
            bag,
            current: PieceKind::I,
            next: PieceKind::I,
            hold: None,
            rotation: Rotation::North,
            x: 0,
            y: 0,
            frame: 0,
            spawn_frame: 0,
            lock_started_at: None,
            move_anchor: 0,
            last_soft_drop: 0,
            gravity_frames: 0,
            fast_move: false,
            rotated: false,
            switched: false,
            soft_drop_cells: 0,
            hard_drop_cells: 0,
            score: 0,
            level: 0,
            lines: 0,
            combo: 0,
            level_progress: 0,
            episode_id: 0,
            piece_id: 0,
            top_outs: 0,
        };
        sim.restart();
        sim
    }

    /// Start a new episode: counters, board and bag are cleared.
    pub fn reset(&mut self) {
        self.episode_id = self.episode_id.wrapping_add(1);
        self.restart();
    }

    fn restart(&mut self) {
        self.frame = 0;
        self.spawn_frame = 0;
        self.lock_started_at = None;
        self.move_anchor = 0;
        self.last_soft_drop = 0;
        self.gravity_frames = 0;
        self.fast_move = false;
        self.rotated = false;
        self.switched = false;
        self.soft_drop_cells = 0;
        self.hard_drop_cells = 0;
        self.score = 0;
        self.level = 0;
        self.lines = 0;
        self.combo = 0;
        self.level_progress = 0;

        self.board.clear();
        self.bag.clear();
        self.current = self.bag.next();
        self.next = self.bag.next();
        self.hold = None;
        self.piece_id = 1;
        self.respawn();
    }

    /// Advance one frame with the given held inputs.
    ///
    /// Returns the lock event when a piece was committed this frame.
    pub fn tick(&mut self, input: TickInput) -> Option<LockEvent> {
        self.frame += 1;

        if input.hold && !self.switched {
            self.hold_swap();
            return None;
        }

        self.tick_rotation(&input);
        self.tick_movement(&input);

        if self.in_spawn_delay() {
            return None;
        }
        self.tick_gravity(&input)
    }

    fn hold_swap(&mut self) {
        let outgoing = self.current;
        match self.hold {
            None => {
                self.current = self.next;
                self.next = self.bag.next();
                self.piece_id = self.piece_id.wrapping_add(1);
            }
            Some(held) => self.current = held,
        }
        self.hold = Some(outgoing);
        trace!(held = ?outgoing, current = ?self.current, "hold");

        self.soft_drop_cells = 0;
        self.hard_drop_cells = 0;
        self.respawn();
        if self.is_blocked_at(self.x, self.y, self.rotation) {
            self.top_out();
            return;
        }
        self.switched = true;
    }

    fn tick_rotation(&mut self, input: &TickInput) {
        let step = if input.rotate_cw {
            1
        } else if input.rotate_ccw {
            -1
        } else if input.rotate_180 {
            2
        } else {
            self.rotated = false;
            return;
        };
        if self.rotated {
            return;
        }
        self.rotated = true;

        let requested = Rotation::from_index(self.rotation as i32 + step);
        if let Some(kick) = try_rotate(&self.board, self.pose(), requested) {
            self.rotation = kick.rotation;
            self.x = kick.x;
            self.y = kick.y;
            self.restart_lock_delay();
        }
    }

    fn tick_movement(&mut self, input: &TickInput) {
        let dx = if input.move_left {
            -1
        } else if input.move_right {
            1
        } else {
            self.fast_move = false;
            return;
        };

        let step = if !self.fast_move {
            self.fast_move = true;
            self.move_anchor = self.frame;
            true
        } else if self.frame.saturating_sub(self.move_anchor) > self.config.das as u64 {
            self.move_anchor += self.config.arr as u64;
            true
        } else {
            false
        };

        // Moves slide the piece but leave a running lock delay alone.
        if step {
            self.try_shift(dx, 0);
        }
    }

    fn tick_gravity(&mut self, input: &TickInput) -> Option<LockEvent> {
        self.gravity_frames += 1;
        if gravity_due(self.gravity_frames, self.level) {
            if self.lock_started_at.is_none() {
                self.try_shift(0, -1);
            }
            self.gravity_frames = 0;
        }

        if self.is_blocked_at(self.x, self.y - 1, self.rotation) {
            if self.lock_started_at.is_none() {
                self.lock_started_at = Some(self.frame);
            }
        } else {
            self.lock_started_at = None;
        }

        if let Some(start) = self.lock_started_at {
            if self.frame - start > LOCK_DELAY_FRAMES {
                return Some(self.commit());
            }
        }

        if input.hard_drop {
            let landing = self.ghost_y();
            self.hard_drop_cells += self.y - landing;
            self.y = landing;
            return Some(self.commit());
        }

        if input.soft_drop && self.frame.saturating_sub(self.last_soft_drop) > SOFT_DROP_INTERVAL_FRAMES {
            self.last_soft_drop = self.frame;
            if self.try_shift(0, -1) {
                self.soft_drop_cells += 1;
            }
        }

        None
    }

    /// Lock the current piece, score it and bring in the next one.
    fn commit(&mut self) -> LockEvent {
        let kind = self.current;
        let t_spin = self.is_t_spin();

        self.board.lock_piece(kind, self.rotation, self.x, self.y);
        let cleared = self.board.clear_full_rows().len();
        self.lines += cleared as u32;

        let update = advance_level(self.level, self.level_progress, cleared);
        self.level = update.level;
        self.level_progress = update.progress;

        let awarded = calculate_drop_score(self.soft_drop_cells, self.hard_drop_cells)
            + calculate_clear_score(cleared, t_spin, self.level);
        self.score = self.score.saturating_add(awarded);
        self.soft_drop_cells = 0;
        self.hard_drop_cells = 0;
        self.combo = if cleared > 0 { self.combo + 1 } else { 0 };

        debug!(
            kind = ?kind,
            x = self.x,
            y = self.y,
            lines = cleared,
            t_spin,
            awarded,
            "piece committed"
        );
        if update.level_up {
            info!(level = self.level, lines = self.lines, score = self.score, "level up");
        }

        let topped_out = !self.spawn_next();

        LockEvent {
            kind,
            lines_cleared: cleared as u32,
            t_spin,
            score_awarded: awarded,
            level_up: update.level_up,
            topped_out,
        }
    }

    /// Wedged T: blocked one cell left, right and up from its resting pose.
    ///
    /// Probed before the piece's own cells are on the board.
    fn is_t_spin(&self) -> bool {
        self.current == PieceKind::T
            && self.is_blocked_at(self.x - 1, self.y, self.rotation)
            && self.is_blocked_at(self.x + 1, self.y, self.rotation)
            && self.is_blocked_at(self.x, self.y + 1, self.rotation)
    }

    /// Bring `next` into play one row below the spawn row.
    ///
    /// Returns false (after resetting the session) when that row is blocked.
    fn spawn_next(&mut self) -> bool {
        self.current = self.next;
        self.next = self.bag.next();
        self.piece_id = self.piece_id.wrapping_add(1);
        self.respawn();

        self.spawn_frame = self.frame;
        self.switched = false;
        self.lock_started_at = None;

        if self.is_blocked_at(self.x, self.y - 1, self.rotation) {
            self.top_out();
            return false;
        }
        self.y -= 1;
        true
    }

    fn top_out(&mut self) {
        self.top_outs += 1;
        info!(
            episode = self.episode_id,
            score = self.score,
            lines = self.lines,
            level = self.level,
            "top out, resetting"
        );
        self.reset();
    }

    fn respawn(&mut self) {
        let (x, y) = spawn_position(self.current);
        self.x = x;
        self.y = y;
        self.rotation = Rotation::North;
    }

    fn restart_lock_delay(&mut self) {
        if self.lock_started_at.is_some() {
            self.lock_started_at = Some(self.frame);
        }
    }

    fn try_shift(&mut self, dx: i32, dy: i32) -> bool {
        if self.is_blocked_at(self.x + dx, self.y + dy, self.rotation) {
            return false;
        }
        self.x += dx;
        self.y += dy;
        true
    }

    fn in_spawn_delay(&self) -> bool {
        self.frame.saturating_sub(self.spawn_frame) < self.config.are as u64
    }

    /// Collision check for the current piece at an arbitrary pose
    pub fn is_blocked_at(&self, x: i32, y: i32, rotation: Rotation) -> bool {
        self.board.is_blocked(self.current, rotation, x, y)
    }

    /// Row the current piece would land on if dropped straight down
    pub fn ghost_y(&self) -> i32 {
        let mut y = self.y;
        while y > LOWEST_ORIGIN_Y && !self.is_blocked_at(self.x, y - 1, self.rotation) {
            y -= 1;
        }
        y
    }

    pub fn board(&self) -> &Board {
        &self.board
    }

    #[cfg(test)]
    pub(crate) fn board_mut(&mut self) -> &mut Board {
        &mut self.board
    }

    /// Put the current piece at an arbitrary pose, bypassing collision.
    #[cfg(test)]
    pub(crate) fn place(&mut self, kind: PieceKind, rotation: Rotation, x: i32, y: i32) {
        self.current = kind;
        self.rotation = rotation;
        self.x = x;
        self.y = y;
    }

    pub fn width(&self) -> usize {
        self.board.width()
    }

    pub fn height(&self) -> usize {
        self.board.height()
    }

    pub fn config(&self) -> &SimConfig {
        &self.config
    }

    pub fn current(&self) -> PieceKind {
        self.current
    }

    pub fn next_piece(&self) -> PieceKind {
        self.next
    }

    pub fn hold_piece(&self) -> Option<PieceKind> {
        self.hold
    }

    /// Hold is available until the current piece has used it
    pub fn can_hold(&self) -> bool {
        !self.switched
    }

    pub fn x(&self) -> i32 {
        self.x
    }

    pub fn y(&self) -> i32 {
        self.y
    }

    pub fn rotation(&self) -> Rotation {
        self.rotation
    }

    pub fn pose(&self) -> Pose {
        Pose {
            kind: self.current,
            rotation: self.rotation,
            x: self.x,
            y: self.y,
        }
    }

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Frame the current piece entered play
    pub fn spawn_frame(&self) -> u64 {
        self.spawn_frame
    }

    /// Frames spent resting on a surface, capped at the lock delay; 0 when airborne.
    pub fn locking_index(&self) -> u64 {
        match self.lock_started_at {
            Some(start) => (self.frame - start).min(LOCK_DELAY_FRAMES),
            None => 0,
        }
    }

    pub fn phase(&self) -> Phase {
        if self.in_spawn_delay() {
            Phase::SpawnDelay
        } else if self.lock_started_at.is_some() {
            Phase::Locking
        } else {
            Phase::Falling
        }
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    pub fn lines(&self) -> u32 {
        self.lines
    }

    pub fn combo(&self) -> u32 {
        self.combo
    }

    pub fn level_progress(&self) -> u32 {
        self.level_progress
    }

    pub fn episode_id(&self) -> u32 {
        self.episode_id
    }

    pub fn piece_id(&self) -> u32 {
        self.piece_id
    }

    pub fn top_outs(&self) -> u32 {
        self.top_outs
    }

    pub fn snapshot(&self) -> SimSnapshot {
        SimSnapshot {
            frame: self.frame,
            episode_id: self.episode_id,
            piece_id: self.piece_id,
            phase: self.phase(),
            active: ActiveSnapshot {
                kind: self.current,
                rotation: self.rotation,
                x: self.x,
                y: self.y,
            },
            ghost_y: self.ghost_y(),
            hold: self.hold,
            next: self.next,
            can_hold: self.can_hold(),
            score: self.score,
            level: self.level,
            lines: self.lines,
            combo: self.combo,
            level_progress: self.level_progress,
            locking_index: self.locking_index(),
            top_outs: self.top_outs,
            width: self.board.width(),
            height: self.board.height(),
            board: self.board.cells().to_vec(),
        }
    }
}
