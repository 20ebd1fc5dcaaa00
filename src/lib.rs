//! tetris-sim (workspace facade crate).
//!
//! Re-exports the simulation core and its shared types under
//! `tetris_sim::{core, types}`, and hosts the headless autoplay driver used by
//! the `tetris-sim` binary.

pub use tetris_sim_core as core;
pub use tetris_sim_types as types;

pub mod autoplay;
pub mod soak;
