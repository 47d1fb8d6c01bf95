//! Flappy Bird simulation core.
//!
//! A bird falls under a fixed kinematic curve and flaps upward on demand
//! while pipes scroll in from the right. Collisions are tested per pixel
//! against sprite silhouettes.

pub mod base;
pub mod bird;
pub mod logic;
pub mod mask;
pub mod pipe;
pub mod sprites;

pub use base::Base;
pub use bird::Bird;
pub use logic::*;
pub use mask::Mask;
pub use pipe::{Pipe, SpawnPolicy};
pub use sprites::SpriteSet;

/// Index of the pipe birds should aim for.
///
/// The first pipe, unless there is a second one and some bird has already
/// cleared the first pipe's trailing edge. `None` when there are no pipes.
pub fn target_pipe<I>(pipes: &[Pipe], bird_xs: I, sprites: &SpriteSet) -> Option<usize>
where
    I: IntoIterator<Item = i32>,
{
    let first = pipes.first()?;
    let edge = first.trailing_edge(sprites);
    if pipes.len() > 1 && bird_xs.into_iter().any(|x| x > edge) {
        Some(1)
    } else {
        Some(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_target_pipe_empty() {
        let sprites = SpriteSet::standard();
        assert_eq!(target_pipe(&[], [230], &sprites), None);
    }

    #[test]
    fn test_target_pipe_switches_after_trailing_edge() {
        let sprites = SpriteSet::standard();
        let pipes = vec![
            Pipe::with_height(100, 200, &sprites),
            Pipe::with_height(400, 200, &sprites),
        ];
        // Trailing edge of the first pipe is 204
        assert_eq!(target_pipe(&pipes, [204], &sprites), Some(0));
        assert_eq!(target_pipe(&pipes, [205], &sprites), Some(1));
        assert_eq!(target_pipe(&pipes, Vec::<i32>::new(), &sprites), Some(0));
    }

    #[test]
    fn test_target_pipe_single_pipe_stays_first() {
        let sprites = SpriteSet::standard();
        let pipes = vec![Pipe::with_height(0, 200, &sprites)];
        assert_eq!(target_pipe(&pipes, [230], &sprites), Some(0));
    }
}
