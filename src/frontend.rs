//! Rendering and input boundary.
//!
//! The simulation hands a [`Snapshot`] to a [`Frontend`] once per tick after
//! the tick's state is final, and asks it for input events once per tick.

use crate::error::Result;
use crate::game::{Base, Bird, Pipe, SpriteSet};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Discrete input collected between ticks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Quit,
    Impulse,
    Restart,
}

/// Read-only view of one finished tick.
#[derive(Debug)]
pub struct Snapshot<'a> {
    pub birds: Vec<&'a Bird>,
    pub pipes: &'a [Pipe],
    pub base: &'a Base,
    pub score: u32,
    /// Generation number in population mode.
    pub generation: Option<u32>,
    /// Pipe the birds are aiming for.
    pub target: Option<usize>,
    pub game_over: bool,
}

impl Snapshot<'_> {
    pub fn alive(&self) -> usize {
        self.birds.len()
    }
}

pub trait Frontend {
    /// Events that arrived since the previous call.
    fn poll_events(&mut self) -> Result<Vec<InputEvent>>;

    /// Draw the current state.
    fn render(&mut self, snapshot: &Snapshot<'_>, sprites: &SpriteSet) -> Result<()>;
}

/// Fixed-rate frame clock. A rate of zero runs unpaced.
#[derive(Debug)]
pub struct FramePacer {
    frame: Option<Duration>,
    last: Instant,
}

impl FramePacer {
    pub fn new(fps: u32) -> Self {
        Self {
            frame: (fps > 0).then(|| Duration::from_secs_f64(1.0 / fps as f64)),
            last: Instant::now(),
        }
    }

    /// Sleep out the rest of the current frame.
    pub fn wait(&mut self) {
        if let Some(frame) = self.frame {
            let elapsed = self.last.elapsed();
            if elapsed < frame {
                std::thread::sleep(frame - elapsed);
            }
        }
        self.last = Instant::now();
    }
}

/// Frontend that draws nothing and replays scripted input.
#[derive(Debug, Default)]
pub struct Headless {
    script: VecDeque<Vec<InputEvent>>,
    /// Number of frames rendered so far.
    pub frames: u64,
    pub last_score: u32,
    pub last_alive: usize,
    pub last_generation: Option<u32>,
    pub saw_game_over: bool,
}

impl Headless {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue input: entry `i` is delivered on the `i`-th poll.
    pub fn with_script<I>(script: I) -> Self
    where
        I: IntoIterator<Item = Vec<InputEvent>>,
    {
        Self {
            script: script.into_iter().collect(),
            ..Self::default()
        }
    }
}

impl Frontend for Headless {
    fn poll_events(&mut self) -> Result<Vec<InputEvent>> {
        Ok(self.script.pop_front().unwrap_or_default())
    }

    fn render(&mut self, snapshot: &Snapshot<'_>, _sprites: &SpriteSet) -> Result<()> {
        self.frames += 1;
        self.last_score = snapshot.score;
        self.last_alive = snapshot.alive();
        self.last_generation = snapshot.generation;
        self.saw_game_over |= snapshot.game_over;
        Ok(())
    }
}
