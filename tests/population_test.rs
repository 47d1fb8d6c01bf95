//! Integration test: population evaluation
//!
//! Flies populations with hand-written controllers through the public
//! evaluator and checks fitness bookkeeping and roster behaviour.

use flapper::ai::{
    evaluate_generation, Controller, EvaluationSettings, Genome, Observation, PopulationRun,
    RuleController, ScriptedController,
};
use flapper::constants::{PIPE_REWARD, SURVIVAL_REWARD};
use flapper::frontend::{Frontend, Headless, InputEvent, Snapshot};
use flapper::game::{SpawnPolicy, SpriteSet};
use flapper::Result;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Either a rule-based or a scripted bird.
#[derive(Clone)]
enum Pilot {
    Rule,
    Script(Vec<usize>),
}

struct TestGenome {
    pilot: Pilot,
    fitness: f64,
}

impl TestGenome {
    fn rule() -> Self {
        Self {
            pilot: Pilot::Rule,
            fitness: 0.0,
        }
    }

    fn idle() -> Self {
        Self {
            pilot: Pilot::Script(Vec::new()),
            fitness: 0.0,
        }
    }
}

enum PilotController {
    Rule(RuleController),
    Script(ScriptedController),
}

impl Controller for PilotController {
    fn activate(&mut self, observation: &Observation) -> f64 {
        match self {
            PilotController::Rule(c) => c.activate(observation),
            PilotController::Script(c) => c.activate(observation),
        }
    }
}

impl Genome for TestGenome {
    type Controller = PilotController;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn fitness_mut(&mut self) -> &mut f64 {
        &mut self.fitness
    }

    fn controller(&self) -> PilotController {
        match &self.pilot {
            Pilot::Rule => PilotController::Rule(RuleController::default()),
            Pilot::Script(ticks) => PilotController::Script(ScriptedController::flapping_at(ticks)),
        }
    }
}

/// Headless frontend that also checks every snapshot.
#[derive(Default)]
struct Recorder {
    alive: Vec<usize>,
    scores: Vec<u32>,
}

impl Frontend for Recorder {
    fn poll_events(&mut self) -> Result<Vec<InputEvent>> {
        Ok(Vec::new())
    }

    fn render(&mut self, snapshot: &Snapshot<'_>, _sprites: &SpriteSet) -> Result<()> {
        assert_eq!(snapshot.game_over, snapshot.birds.is_empty());
        if let Some(target) = snapshot.target {
            assert!(target < snapshot.pipes.len());
        }
        self.alive.push(snapshot.alive());
        self.scores.push(snapshot.score);
        Ok(())
    }
}

fn settings(break_score: Option<u32>) -> EvaluationSettings {
    EvaluationSettings {
        break_score,
        spawn_policy: SpawnPolicy::randomized(),
        fps: 0,
    }
}

// =============================================================================
// Bookkeeping
// =============================================================================

#[test]
fn test_idle_birds_share_one_fate() {
    let sprites = SpriteSet::standard();
    let mut rng = ChaCha8Rng::seed_from_u64(31);
    let mut genomes: Vec<TestGenome> = (0..8).map(|_| TestGenome::idle()).collect();
    let mut recorder = Recorder::default();

    let outcome = evaluate_generation(
        &mut genomes,
        Some(0),
        &settings(Some(50)),
        &mut rng,
        &sprites,
        &mut recorder,
    )
    .unwrap();

    assert_eq!(outcome.survivors, 0);
    assert_eq!(outcome.score, 0);
    // Everyone lands on the same tick, without penalty
    assert_eq!(recorder.alive.iter().filter(|&&n| n == 8).count() as u64, outcome.ticks - 1);
    assert_eq!(recorder.alive.last(), Some(&0));
    let expected = outcome.ticks as f64 * SURVIVAL_REWARD;
    for genome in &genomes {
        assert!((genome.fitness - expected).abs() < 1e-9);
    }
}

#[test]
fn test_rule_pilot_outlives_idle_birds() {
    let sprites = SpriteSet::standard();
    for seed in 0..5 {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let mut genomes = vec![TestGenome::idle(), TestGenome::rule(), TestGenome::idle()];
        evaluate_generation(
            &mut genomes,
            Some(0),
            &settings(Some(50)),
            &mut rng,
            &sprites,
            &mut Headless::new(),
        )
        .unwrap();
        assert!(genomes[1].fitness > genomes[0].fitness);
        assert_eq!(genomes[0].fitness, genomes[2].fitness);
    }
}

#[test]
fn test_alive_count_never_grows() {
    let sprites = SpriteSet::standard();
    let mut rng = ChaCha8Rng::seed_from_u64(77);
    let mut genomes: Vec<TestGenome> = (0..12)
        .map(|i| {
            if i % 3 == 0 {
                TestGenome::rule()
            } else {
                TestGenome {
                    pilot: Pilot::Script((0..40).step_by(i + 2).collect()),
                    fitness: 0.0,
                }
            }
        })
        .collect();
    let mut recorder = Recorder::default();
    evaluate_generation(
        &mut genomes,
        Some(4),
        &settings(Some(3)),
        &mut rng,
        &sprites,
        &mut recorder,
    )
    .unwrap();

    assert!(recorder.alive.windows(2).all(|w| w[1] <= w[0]));
    assert!(recorder.scores.windows(2).all(|w| w[1] == w[0] || w[1] == w[0] + 1));
}

#[test]
fn test_fitness_reset_between_generations() {
    let sprites = SpriteSet::standard();
    let mut genomes = vec![TestGenome::idle(), TestGenome::idle()];
    genomes[0].fitness = 1000.0;

    let mut rng = ChaCha8Rng::seed_from_u64(2);
    let first = evaluate_generation(
        &mut genomes,
        Some(0),
        &settings(None),
        &mut rng,
        &sprites,
        &mut Headless::new(),
    )
    .unwrap();
    assert!((genomes[0].fitness - first.ticks as f64 * SURVIVAL_REWARD).abs() < 1e-9);
    assert_eq!(genomes[0].fitness, genomes[1].fitness);
}

// =============================================================================
// Manual stepping
// =============================================================================

#[test]
fn test_pass_rewards_every_survivor() {
    let sprites = SpriteSet::standard();
    let mut rng = ChaCha8Rng::seed_from_u64(8);
    let mut genomes: Vec<TestGenome> = (0..3).map(|_| TestGenome::idle()).collect();
    {
        let mut run =
            PopulationRun::new(&mut genomes, SpawnPolicy::Fixed { x: 0 }, &mut rng, &sprites);
        // The opening pipe at x=0 is already behind the birds
        let report = run.step(&mut rng, &sprites);
        assert!(report.scored);
        assert_eq!(run.score, 1);
        assert_eq!(run.roster.len(), 3);
    }
    for genome in &genomes {
        assert!((genome.fitness - (SURVIVAL_REWARD + PIPE_REWARD)).abs() < 1e-9);
    }
}
