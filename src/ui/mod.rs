//! Terminal frontend built on ratatui and crossterm.

pub mod flappy_scene;
pub mod game_common;
mod terminal;

pub use terminal::TerminalFrontend;
