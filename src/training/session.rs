//! Generation loop tying the evaluator to an evolution engine.

use super::config::TrainingConfig;
use super::report::{GenerationStats, StatisticsReporter};
use crate::ai::{evaluate_generation, EvaluationOutcome, EvaluationSettings, Evolution, Genome};
use crate::error::Result;
use crate::frontend::Frontend;
use crate::game::{SpawnPolicy, SpriteSet};
use rand::Rng;
use tracing::info;

/// How a training session ended.
#[derive(Debug, Clone)]
pub struct TrainingSummary<G> {
    /// Fittest genome seen; `None` if no generation finished.
    pub best: Option<G>,
    /// Generations fully evaluated.
    pub generations: u32,
    pub reached_threshold: bool,
    /// The operator quit mid-generation.
    pub interrupted: bool,
}

/// One training run. Owns the generation counter.
pub struct TrainingSession {
    pub config: TrainingConfig,
    pub reporter: StatisticsReporter,
    generation: u32,
}

impl TrainingSession {
    pub fn new(config: TrainingConfig) -> Self {
        Self {
            config,
            reporter: StatisticsReporter::new(),
            generation: 0,
        }
    }

    /// Generations evaluated so far.
    pub fn generation(&self) -> u32 {
        self.generation
    }

    pub fn settings(&self) -> EvaluationSettings {
        EvaluationSettings {
            break_score: self.config.break_score,
            spawn_policy: self.config.spawn_policy,
            fps: self.config.fps,
        }
    }

    /// Evaluate and breed until the generation limit, the fitness threshold,
    /// or a quit request.
    pub fn run<E, R, F>(
        &mut self,
        engine: &mut E,
        rng: &mut R,
        sprites: &SpriteSet,
        frontend: &mut F,
    ) -> Result<TrainingSummary<E::Genome>>
    where
        E: Evolution,
        R: Rng,
        F: Frontend + ?Sized,
    {
        let settings = self.settings();
        let mut reached_threshold = false;
        let mut interrupted = false;

        while self.generation < self.config.generations {
            let generation = self.generation;
            let population = engine.population_mut();
            // Shown to the operator counting from one
            let outcome = evaluate_generation(
                population,
                Some(generation + 1),
                &settings,
                rng,
                sprites,
                frontend,
            )?;
            if outcome.quit {
                info!(generation, "training interrupted");
                interrupted = true;
                break;
            }

            let stats = self
                .reporter
                .record(GenerationStats::from_genomes(generation, population, &outcome));
            reached_threshold = self
                .config
                .fitness_threshold
                .map_or(false, |threshold| stats.best >= threshold);

            self.generation += 1;
            engine.evolve();
            if reached_threshold {
                info!(generation, "fitness threshold reached");
                break;
            }
        }

        let summary = TrainingSummary {
            best: engine.best().cloned(),
            generations: self.generation,
            reached_threshold,
            interrupted,
        };
        if let Some(best) = &summary.best {
            info!(
                generations = summary.generations,
                fitness = best.fitness(),
                "training finished"
            );
        }
        Ok(summary)
    }
}

/// Fly one genome until it dies or the operator quits. `max_score` caps an
/// unattended replay; `None` lets a perfect genome fly forever.
pub fn replay<G, R, F>(
    genome: G,
    spawn_policy: SpawnPolicy,
    fps: u32,
    max_score: Option<u32>,
    rng: &mut R,
    sprites: &SpriteSet,
    frontend: &mut F,
) -> Result<(G, EvaluationOutcome)>
where
    G: Genome,
    R: Rng,
    F: Frontend + ?Sized,
{
    let settings = EvaluationSettings {
        break_score: max_score,
        spawn_policy,
        fps,
    };
    let mut genomes = [genome];
    let outcome = evaluate_generation(&mut genomes, None, &settings, rng, sprites, frontend)?;
    let [genome] = genomes;
    info!(score = outcome.score, fitness = genome.fitness(), "replay finished");
    Ok((genome, outcome))
}
