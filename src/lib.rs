//! flapper - Flappy Bird simulation with neuro-evolved players.
//!
//! The `game` module holds the per-tick simulation, `ai` flies whole
//! populations against it, and `neuro` plus `training` breed the controllers.

pub mod ai;
pub mod build_info;
pub mod constants;
pub mod error;
pub mod frontend;
pub mod game;
pub mod genome_store;
pub mod logging;
pub mod neuro;
pub mod play;
pub mod training;
pub mod ui;

pub use error::{FlapError, Result};
