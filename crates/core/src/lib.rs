//! Core simulation module - pure, deterministic, and testable
//!
//! This crate holds every game rule and the frame-stepped state machine that
//! applies them. It does no I/O and knows nothing about windows, keyboards or
//! clocks: the caller samples eight held inputs once per logical frame and
//! hands them to [`Simulator::tick`].
//!
//! - **Deterministic**: the same seed and input sequence replay the same game
//! - **Allocation-free ticks**: fixed arrays and `ArrayVec` on the hot path
//! - **Observable**: commits come back as [`LockEvent`](types::LockEvent)s and
//!   are logged through `tracing`
//!
//! # Module Structure
//!
//! - [`board`]: 10x40 grid, collision predicate and row clearing
//! - [`pieces`]: the seven shapes as 4x4 rotation bitmasks
//! - [`kicks`]: SRS wall-kick resolution
//! - [`rng`]: 7-bag randomizer over an injected RNG
//! - [`scoring`]: level speed, level progression and awards
//! - [`simulator`]: the per-frame state machine
//! - [`snapshot`]: serializable copy of the query surface
//! - [`config`]: auto-shift and entry-delay timings
//!
//! # Example
//!
//! ```
//! use tetris_sim_core::Simulator;
//! use tetris_sim_core::types::{Intent, TickInput};
//!
//! let mut sim = Simulator::new(12345);
//!
//! // Nothing falls during the entry delay.
//! for _ in 0..29 {
//!     sim.tick(TickInput::IDLE);
//! }
//! assert_eq!(sim.y(), 18);
//!
//! let event = sim.tick(TickInput::from_intents(&[Intent::HardDrop])).unwrap();
//! assert_eq!(event.lines_cleared, 0);
//! assert!(sim.score() > 0); // hard drop awards points
//! ```

pub mod board;
pub mod config;
pub mod error;
pub mod kicks;
pub mod pieces;
pub mod rng;
pub mod scoring;
pub mod simulator;
pub mod snapshot;

pub use tetris_sim_types as types;

// Re-export commonly used types for convenience
pub use board::{Board, ClearedRows};
pub use config::SimConfig;
pub use error::ConfigError;
pub use kicks::{try_rotate, KickResult};
pub use pieces::Pose;
pub use rng::PieceBag;
pub use scoring::{calculate_clear_score, calculate_drop_score, level_speed};
pub use simulator::Simulator;
pub use snapshot::{ActiveSnapshot, SimSnapshot};
