//! Scoring module - level speed, level progression and commit awards
//!
//! Everything here is a pure function of its arguments; the simulator owns
//! the counters and calls in at commit time.

use crate::types::{
    DROP_BONUS_CAP, FRAMES_PER_SECOND, HARD_DROP_POINTS, LEVEL_PROGRESS_POINTS,
    LINE_CLEAR_POINTS, SOFT_DROP_POINTS, T_SPIN_POINTS,
};

/// Seconds per gravity step at a level: `(0.8 - (level - 1) * 0.007)^(level - 1)`.
///
/// Level 1 is exactly one second; level 0 is slightly slower (`1 / 0.807`).
pub fn level_speed(level: u32) -> f64 {
    let n = level as i32 - 1;
    (0.8 - n as f64 * 0.007).powi(n)
}

/// Whether `frames` of accumulated gravity are past the step interval for `level`.
pub fn gravity_due(frames: u32, level: u32) -> bool {
    frames as f64 / FRAMES_PER_SECOND as f64 > level_speed(level)
}

/// Level-progress points for clearing `lines` rows in one commit
pub fn level_progress_points(lines: usize) -> u32 {
    LEVEL_PROGRESS_POINTS.get(lines).copied().unwrap_or(0)
}

/// Result of feeding one commit into the level counter
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelUpdate {
    pub level: u32,
    pub progress: u32,
    pub level_up: bool,
}

/// Add the progress for a clear and level up at most once.
///
/// Progress past `5 * (level + 1)` levels up and carries over
/// `progress - 5 * level`.
pub fn advance_level(level: u32, progress: u32, lines: usize) -> LevelUpdate {
    let progress = progress + level_progress_points(lines);
    if progress > 5 * (level + 1) {
        LevelUpdate {
            level: level + 1,
            progress: progress - 5 * level,
            level_up: true,
        }
    } else {
        LevelUpdate {
            level,
            progress,
            level_up: false,
        }
    }
}

/// Clamp a drop-bonus accumulator into `0..=DROP_BONUS_CAP`.
pub fn clamp_drop_bonus(cells: i32) -> u32 {
    cells.clamp(0, DROP_BONUS_CAP) as u32
}

/// Points from the soft and hard drop accumulators of one piece
pub fn calculate_drop_score(soft_cells: i32, hard_cells: i32) -> u32 {
    clamp_drop_bonus(soft_cells) * SOFT_DROP_POINTS + clamp_drop_bonus(hard_cells) * HARD_DROP_POINTS
}

/// Base award for a commit, already multiplied by `level + 1`.
///
/// `level` is the level after any level-up from the same commit.
pub fn calculate_clear_score(lines: usize, t_spin: bool, level: u32) -> u32 {
    let base = if t_spin {
        T_SPIN_POINTS.get(lines).copied().unwrap_or(0)
    } else {
        LINE_CLEAR_POINTS.get(lines).copied().unwrap_or(0)
    };
    base * (level + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_speed_curve() {
        assert_eq!(level_speed(1), 1.0);
        assert!((level_speed(0) - 1.0 / 0.807).abs() < 1e-12);
        assert!((level_speed(2) - 0.793).abs() < 1e-12);
        for level in 1..30 {
            assert!(level_speed(level + 1) < level_speed(level));
        }
    }

    #[test]
    fn test_gravity_interval_in_frames() {
        // Level 0: 1.2391 s, first due at frame 75.
        assert!(!gravity_due(74, 0));
        assert!(gravity_due(75, 0));
        // Level 1: strictly more than 60 frames.
        assert!(!gravity_due(60, 1));
        assert!(gravity_due(61, 1));
    }

    #[test]
    fn test_level_progression() {
        let update = advance_level(0, 0, 4);
        assert_eq!(update, LevelUpdate { level: 1, progress: 8, level_up: true });

        // Threshold is strict: 10 at level 1 is not enough.
        let update = advance_level(1, 7, 2);
        assert_eq!(update, LevelUpdate { level: 1, progress: 10, level_up: false });

        let update = advance_level(1, 10, 1);
        assert_eq!(update, LevelUpdate { level: 2, progress: 6, level_up: true });

        assert_eq!(advance_level(3, 4, 0), LevelUpdate { level: 3, progress: 4, level_up: false });
    }

    #[test]
    fn test_drop_bonus_is_clamped() {
        assert_eq!(calculate_drop_score(0, 0), 0);
        assert_eq!(calculate_drop_score(3, 5), 13);
        assert_eq!(calculate_drop_score(50, 50), 60);
        assert_eq!(calculate_drop_score(-4, -1), 0);
    }

    #[test]
    fn test_clear_awards() {
        assert_eq!(calculate_clear_score(0, false, 0), 0);
        assert_eq!(calculate_clear_score(1, false, 5), 0);
        assert_eq!(calculate_clear_score(2, false, 0), 300);
        assert_eq!(calculate_clear_score(3, false, 1), 1000);
        assert_eq!(calculate_clear_score(4, false, 2), 2400);

        assert_eq!(calculate_clear_score(0, true, 0), 100);
        assert_eq!(calculate_clear_score(1, true, 1), 800);
        assert_eq!(calculate_clear_score(2, true, 0), 1200);
        assert_eq!(calculate_clear_score(3, true, 0), 1600);
        assert_eq!(calculate_clear_score(4, true, 0), 0);
    }
}
