//! Lock-step evaluation of a whole population against one pipe course.

use super::controller::{wants_impulse, Controller, Observation};
use super::genome::Genome;
use crate::constants::{
    BIRD_START_X, BIRD_START_Y, COLLISION_PENALTY, FLOOR_Y, PIPE_REWARD, SURVIVAL_REWARD,
};
use crate::error::Result;
use crate::frontend::{FramePacer, Frontend, InputEvent, Snapshot};
use crate::game::{target_pipe, Base, Bird, Pipe, SpawnPolicy, SpriteSet};
use rand::Rng;
use tracing::{debug, trace};

/// One live individual: the index of its genome, the controller built from
/// it, and the bird it flies. The three are only ever created and dropped
/// together.
pub struct Entry<C> {
    pub genome: usize,
    pub controller: C,
    pub bird: Bird,
}

/// Live individuals, in the order their genomes were supplied.
pub struct Roster<C> {
    entries: Vec<Entry<C>>,
}

impl<C: Controller> Roster<C> {
    /// Reset every genome's fitness and give each a fresh bird.
    pub fn new<G>(genomes: &mut [G]) -> Self
    where
        G: Genome<Controller = C>,
    {
        let entries = genomes
            .iter_mut()
            .enumerate()
            .map(|(index, genome)| {
                *genome.fitness_mut() = 0.0;
                Entry {
                    genome: index,
                    controller: genome.controller(),
                    bird: Bird::new(BIRD_START_X, BIRD_START_Y),
                }
            })
            .collect();
        Self { entries }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn birds(&self) -> impl Iterator<Item = &Bird> {
        self.entries.iter().map(|e| &e.bird)
    }

    /// Genome indices of the survivors.
    pub fn survivor_indices(&self) -> Vec<usize> {
        self.entries.iter().map(|e| e.genome).collect()
    }

    /// Add `amount` to every live genome.
    pub fn reward_all<G: Genome>(&self, genomes: &mut [G], amount: f64) {
        for entry in &self.entries {
            *genomes[entry.genome].fitness_mut() += amount;
        }
    }

    /// Drop every entry for which `dead` returns true, charging `penalty` to
    /// its genome first. Returns how many were removed.
    fn cull<G, F>(&mut self, genomes: &mut [G], penalty: f64, mut dead: F) -> usize
    where
        G: Genome,
        F: FnMut(&Bird) -> bool,
    {
        let before = self.entries.len();
        self.entries.retain(|entry| {
            if !dead(&entry.bird) {
                return true;
            }
            let genome = &mut genomes[entry.genome];
            *genome.fitness_mut() -= penalty;
            debug!(genome = entry.genome, fitness = genome.fitness(), "bird died");
            false
        });
        before - self.entries.len()
    }
}

/// Knobs for one population evaluation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EvaluationSettings {
    /// Stop once the score exceeds this. `None` runs until every bird dies.
    pub break_score: Option<u32>,
    pub spawn_policy: SpawnPolicy,
    /// Frame rate; zero runs as fast as possible.
    pub fps: u32,
}

/// Summary of a finished evaluation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EvaluationOutcome {
    pub score: u32,
    pub ticks: u64,
    /// Birds still alive when the evaluation stopped.
    pub survivors: usize,
    /// The frontend asked to quit.
    pub quit: bool,
}

/// What one tick did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StepReport {
    pub collided: usize,
    pub out_of_bounds: usize,
    pub scored: bool,
}

/// A population flying one shared course.
pub struct PopulationRun<'g, G: Genome> {
    genomes: &'g mut [G],
    pub roster: Roster<G::Controller>,
    pub pipes: Vec<Pipe>,
    pub base: Base,
    pub score: u32,
    pub ticks: u64,
    pub spawn_policy: SpawnPolicy,
}

impl<'g, G: Genome> PopulationRun<'g, G> {
    pub fn new<R: Rng>(
        genomes: &'g mut [G],
        spawn_policy: SpawnPolicy,
        rng: &mut R,
        sprites: &SpriteSet,
    ) -> Self {
        let roster = Roster::new(genomes);
        Self {
            genomes,
            roster,
            pipes: vec![spawn_policy.spawn(rng, sprites)],
            base: Base::new(FLOOR_Y),
            score: 0,
            ticks: 0,
            spawn_policy,
        }
    }

    /// Pipe the population is steering for this tick.
    pub fn target(&self, sprites: &SpriteSet) -> Option<usize> {
        target_pipe(&self.pipes, self.roster.birds().map(|b| b.x), sprites)
    }

    /// Advance every bird and pipe by one tick.
    pub fn step<R: Rng>(&mut self, rng: &mut R, sprites: &SpriteSet) -> StepReport {
        let mut report = StepReport::default();
        if self.roster.is_empty() {
            return report;
        }
        self.ticks += 1;

        let target = self.target(sprites);
        self.roster.reward_all(self.genomes, SURVIVAL_REWARD);
        for entry in &mut self.roster.entries {
            entry.bird.advance();
            entry.bird.animate();

            if let Some(pipe) = target.and_then(|i| self.pipes.get(i)) {
                let observation = Observation::new(&entry.bird, pipe);
                if wants_impulse(entry.controller.activate(&observation)) {
                    entry.bird.impulse();
                }
            }
        }

        let pipes = &self.pipes;
        report.collided = self.roster.cull(self.genomes, COLLISION_PENALTY, |bird| {
            pipes.iter().any(|pipe| pipe.collide(bird, sprites))
        });

        // Only surviving birds can pass a pipe
        let lead_x = self.roster.birds().map(|b| b.x).max();
        let mut add_pipe = false;
        for pipe in &mut self.pipes {
            if let Some(x) = lead_x {
                add_pipe |= pipe.check_passed(x);
            }
            pipe.advance();
        }
        self.pipes.retain(|p| !p.off_screen(sprites));

        if add_pipe {
            self.score += 1;
            self.roster.reward_all(self.genomes, PIPE_REWARD);
            let pipe = self.spawn_policy.spawn(rng, sprites);
            trace!(x = pipe.x, height = pipe.height, "spawned pipe");
            self.pipes.push(pipe);
            report.scored = true;
        }

        report.out_of_bounds = self
            .roster
            .cull(self.genomes, 0.0, |bird| bird.out_of_bounds(FLOOR_Y, sprites));

        self.base.advance();
        report
    }

    pub fn snapshot(&self, generation: Option<u32>, sprites: &SpriteSet) -> Snapshot<'_> {
        Snapshot {
            birds: self.roster.birds().collect(),
            pipes: &self.pipes,
            base: &self.base,
            score: self.score,
            generation,
            target: self.target(sprites),
            game_over: self.roster.is_empty(),
        }
    }

    fn outcome(&self, quit: bool) -> EvaluationOutcome {
        EvaluationOutcome {
            score: self.score,
            ticks: self.ticks,
            survivors: self.roster.len(),
            quit,
        }
    }
}

/// Fly every genome until all birds are dead, the score ceiling is passed,
/// or the frontend asks to quit. Fitness is written back into `genomes`.
/// `generation` is only passed through to the frontend.
pub fn evaluate_generation<G, R, F>(
    genomes: &mut [G],
    generation: Option<u32>,
    settings: &EvaluationSettings,
    rng: &mut R,
    sprites: &SpriteSet,
    frontend: &mut F,
) -> Result<EvaluationOutcome>
where
    G: Genome,
    R: Rng,
    F: Frontend + ?Sized,
{
    let mut run = PopulationRun::new(genomes, settings.spawn_policy, rng, sprites);
    let mut pacer = FramePacer::new(settings.fps);

    while !run.roster.is_empty() {
        pacer.wait();

        if frontend.poll_events()?.contains(&InputEvent::Quit) {
            return Ok(run.outcome(true));
        }

        run.step(rng, sprites);
        frontend.render(&run.snapshot(generation, sprites), sprites)?;

        if let Some(ceiling) = settings.break_score {
            if run.score > ceiling {
                break;
            }
        }
    }

    Ok(run.outcome(false))
}
