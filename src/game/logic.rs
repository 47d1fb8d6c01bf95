//! Single-player game logic: one bird steered by keyboard input.

use super::{target_pipe, Base, Bird, Pipe, SpawnPolicy, SpriteSet};
use crate::constants::FLOOR_Y;
use crate::frontend::{InputEvent, Snapshot};
use rand::Rng;
use tracing::{debug, info};

/// Why a single-player run ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SoloResult {
    /// Hit a pipe.
    Crashed,
    /// Hit the floor or flew off the top of the screen.
    OutOfBounds,
}

/// What happened during one tick.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    pub scored: bool,
    pub ended: bool,
}

#[derive(Debug, Clone)]
pub struct SoloGame {
    pub bird: Bird,
    pub pipes: Vec<Pipe>,
    pub base: Base,
    pub score: u32,
    pub game_result: Option<SoloResult>,
    /// Flap requested since the last tick.
    pub impulse_queued: bool,
    pub spawn_policy: SpawnPolicy,
    pub tick_count: u64,
}

impl SoloGame {
    pub fn new<R: Rng>(spawn_policy: SpawnPolicy, rng: &mut R, sprites: &SpriteSet) -> Self {
        Self {
            bird: Bird::default(),
            pipes: vec![spawn_policy.spawn(rng, sprites)],
            base: Base::new(FLOOR_Y),
            score: 0,
            game_result: None,
            impulse_queued: false,
            spawn_policy,
            tick_count: 0,
        }
    }

    pub fn is_over(&self) -> bool {
        self.game_result.is_some()
    }

    /// Pipe the bird is heading for.
    pub fn target(&self, sprites: &SpriteSet) -> Option<usize> {
        target_pipe(&self.pipes, [self.bird.x], sprites)
    }

    pub fn snapshot(&self, sprites: &SpriteSet) -> Snapshot<'_> {
        Snapshot {
            birds: vec![&self.bird],
            pipes: &self.pipes,
            base: &self.base,
            score: self.score,
            generation: None,
            target: self.target(sprites),
            game_over: self.is_over(),
        }
    }
}

/// Queue player input. Restart is handled by the caller, which owns the RNG.
pub fn process_input(game: &mut SoloGame, input: InputEvent) {
    if game.is_over() {
        return;
    }
    if input == InputEvent::Impulse {
        game.impulse_queued = true;
    }
}

/// Advance the game by one frame.
pub fn process_tick<R: Rng>(game: &mut SoloGame, rng: &mut R, sprites: &SpriteSet) -> TickReport {
    let mut report = TickReport::default();
    if game.is_over() {
        return report;
    }

    game.tick_count += 1;

    if std::mem::take(&mut game.impulse_queued) {
        game.bird.impulse();
    }
    game.bird.advance();
    game.bird.animate();

    let mut add_pipe = false;
    for pipe in &mut game.pipes {
        if pipe.collide(&game.bird, sprites) {
            game.game_result = Some(SoloResult::Crashed);
        }
        if pipe.check_passed(game.bird.x) {
            add_pipe = true;
        }
        pipe.advance();
    }
    game.pipes.retain(|p| !p.off_screen(sprites));

    if add_pipe {
        game.score += 1;
        report.scored = true;
        let pipe = game.spawn_policy.spawn(rng, sprites);
        debug!(x = pipe.x, height = pipe.height, "spawned pipe");
        game.pipes.push(pipe);
    }

    if game.game_result.is_none() && game.bird.out_of_bounds(FLOOR_Y, sprites) {
        game.game_result = Some(SoloResult::OutOfBounds);
    }

    game.base.advance();

    if let Some(result) = game.game_result {
        info!(score = game.score, ticks = game.tick_count, ?result, "run over");
        report.ended = true;
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn new_game(rng: &mut ChaCha8Rng, sprites: &SpriteSet) -> SoloGame {
        SoloGame::new(SpawnPolicy::fixed(), rng, sprites)
    }

    #[test]
    fn test_new_game_defaults() {
        let sprites = SpriteSet::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let game = new_game(&mut rng, &sprites);
        assert_eq!(game.score, 0);
        assert!(!game.is_over());
        assert_eq!(game.pipes.len(), 1);
        assert_eq!(game.pipes[0].x, 600);
        assert_eq!(game.bird.x, 230);
        assert_eq!(game.bird.y, 350.0);
    }

    #[test]
    fn test_impulse_is_consumed_next_tick() {
        let sprites = SpriteSet::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut game = new_game(&mut rng, &sprites);
        process_input(&mut game, InputEvent::Impulse);
        assert!(game.impulse_queued);
        process_tick(&mut game, &mut rng, &sprites);
        assert!(!game.impulse_queued);
        assert!(game.bird.y < 350.0);
    }

    #[test]
    fn test_falling_bird_hits_floor() {
        let sprites = SpriteSet::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut game = new_game(&mut rng, &sprites);
        let mut ticks = 0;
        while !game.is_over() && ticks < 200 {
            process_tick(&mut game, &mut rng, &sprites);
            ticks += 1;
        }
        assert_eq!(game.game_result, Some(SoloResult::OutOfBounds));
        assert_eq!(game.score, 0);
    }

    #[test]
    fn test_pipe_collision_ends_run() {
        let sprites = SpriteSet::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut game = new_game(&mut rng, &sprites);
        // Gap far above the bird, pipe right on top of it
        game.pipes = vec![Pipe::with_height(220, 60, &sprites)];
        let report = process_tick(&mut game, &mut rng, &sprites);
        assert!(report.ended);
        assert_eq!(game.game_result, Some(SoloResult::Crashed));
    }

    #[test]
    fn test_passing_pipe_scores_and_spawns() {
        let sprites = SpriteSet::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut game = new_game(&mut rng, &sprites);
        // Pipe already behind the bird, far from its silhouette
        game.pipes = vec![Pipe::with_height(100, 300, &sprites)];
        let report = process_tick(&mut game, &mut rng, &sprites);
        assert!(report.scored);
        assert_eq!(game.score, 1);
        assert_eq!(game.pipes.len(), 2);
        assert_eq!(game.pipes[1].x, 600);

        // Already passed: no second score
        process_tick(&mut game, &mut rng, &sprites);
        assert_eq!(game.score, 1);
    }

    #[test]
    fn test_off_screen_pipes_are_removed() {
        let sprites = SpriteSet::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut game = new_game(&mut rng, &sprites);
        let mut gone = Pipe::with_height(-100, 300, &sprites);
        gone.passed = true;
        game.pipes = vec![gone];
        process_tick(&mut game, &mut rng, &sprites);
        assert!(game.pipes.is_empty());
    }

    #[test]
    fn test_snapshot_reflects_state() {
        let sprites = SpriteSet::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut game = new_game(&mut rng, &sprites);
        game.score = 4;
        let snapshot = game.snapshot(&sprites);
        assert_eq!(snapshot.alive(), 1);
        assert_eq!(snapshot.score, 4);
        assert_eq!(snapshot.generation, None);
        assert_eq!(snapshot.target, Some(0));
        assert!(!snapshot.game_over);
    }

    #[test]
    fn test_no_changes_after_game_over() {
        let sprites = SpriteSet::standard();
        let mut rng = ChaCha8Rng::seed_from_u64(1);
        let mut game = new_game(&mut rng, &sprites);
        game.game_result = Some(SoloResult::Crashed);
        let y = game.bird.y;
        process_input(&mut game, InputEvent::Impulse);
        assert!(!game.impulse_queued);
        let report = process_tick(&mut game, &mut rng, &sprites);
        assert_eq!(report, TickReport::default());
        assert_eq!(game.bird.y, y);
    }
}
