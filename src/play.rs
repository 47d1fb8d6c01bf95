//! Keyboard-driven single-player loop.

use crate::error::Result;
use crate::frontend::{FramePacer, Frontend, InputEvent};
use crate::game::{process_input, process_tick, SoloGame, SpawnPolicy, SpriteSet};
use rand::Rng;
use tracing::info;

/// Totals for a play session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PlaySummary {
    /// Runs started, including the first
    pub runs: u32,
    pub best_score: u32,
}

/// Play until the frontend asks to quit. A finished run stays on screen
/// until the player restarts or quits.
pub fn run_solo<R, F>(
    spawn_policy: SpawnPolicy,
    fps: u32,
    rng: &mut R,
    sprites: &SpriteSet,
    frontend: &mut F,
) -> Result<PlaySummary>
where
    R: Rng,
    F: Frontend + ?Sized,
{
    let mut game = SoloGame::new(spawn_policy, rng, sprites);
    let mut pacer = FramePacer::new(fps);
    let mut summary = PlaySummary {
        runs: 1,
        best_score: 0,
    };

    loop {
        pacer.wait();

        for event in frontend.poll_events()? {
            match event {
                InputEvent::Quit => {
                    info!(runs = summary.runs, best = summary.best_score, "leaving game");
                    return Ok(summary);
                }
                InputEvent::Restart if game.is_over() => {
                    game = SoloGame::new(spawn_policy, rng, sprites);
                    summary.runs += 1;
                }
                _ => process_input(&mut game, event),
            }
        }

        process_tick(&mut game, rng, sprites);
        summary.best_score = summary.best_score.max(game.score);
        frontend.render(&game.snapshot(sprites), sprites)?;
    }
}
