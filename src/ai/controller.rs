//! The controller capability: observation in, activation out.

use crate::constants::JUMP_THRESHOLD;
use crate::game::{Bird, Pipe};

/// What a controller sees each tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Observation {
    /// Bird height (top of sprite, pixels from the top of the screen).
    pub height: f64,
    /// Signed distance from the bird to the gap's upper edge.
    pub to_top: f64,
    /// Signed distance from the bird to the gap's lower edge.
    pub to_bottom: f64,
}

impl Observation {
    pub fn new(bird: &Bird, pipe: &Pipe) -> Self {
        Self {
            height: bird.y,
            to_top: bird.y - pipe.height as f64,
            to_bottom: bird.y - pipe.bottom as f64,
        }
    }

    pub fn as_array(&self) -> [f64; 3] {
        [self.height, self.to_top, self.to_bottom]
    }
}

/// Anything that can decide whether a bird should flap.
pub trait Controller {
    fn activate(&mut self, observation: &Observation) -> f64;
}

/// Activations above the threshold mean "flap".
pub fn wants_impulse(activation: f64) -> bool {
    activation > JUMP_THRESHOLD
}

/// Adapts a closure into a [`Controller`].
pub struct FnController<F>(pub F);

impl<F> Controller for FnController<F>
where
    F: FnMut(&Observation) -> f64,
{
    fn activate(&mut self, observation: &Observation) -> f64 {
        (self.0)(observation)
    }
}

/// Hand-written policy: flap when the bird sinks too close to the gap's
/// lower edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RuleController {
    /// Pixels kept between the bird's top edge and the gap's lower edge.
    pub clearance: f64,
}

impl Default for RuleController {
    fn default() -> Self {
        Self { clearance: 90.0 }
    }
}

impl Controller for RuleController {
    fn activate(&mut self, observation: &Observation) -> f64 {
        if observation.to_bottom > -self.clearance {
            1.0
        } else {
            0.0
        }
    }
}

/// Replays a fixed flap schedule, one entry per tick, then stays idle.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScriptedController {
    script: Vec<bool>,
    tick: usize,
}

impl ScriptedController {
    pub fn new(script: Vec<bool>) -> Self {
        Self { script, tick: 0 }
    }

    /// Flap on every listed tick (zero-based).
    pub fn flapping_at(ticks: &[usize]) -> Self {
        let len = ticks.iter().max().map_or(0, |&t| t + 1);
        let mut script = vec![false; len];
        for &t in ticks {
            script[t] = true;
        }
        Self::new(script)
    }
}

impl Controller for ScriptedController {
    fn activate(&mut self, _observation: &Observation) -> f64 {
        let flap = self.script.get(self.tick).copied().unwrap_or(false);
        self.tick += 1;
        if flap {
            1.0
        } else {
            0.0
        }
    }
}
