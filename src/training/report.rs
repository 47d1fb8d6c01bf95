//! Per-generation fitness statistics.

use crate::ai::{EvaluationOutcome, Genome};
use tracing::info;

/// Fitness summary of one evaluated generation.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationStats {
    pub generation: u32,
    pub population: usize,
    pub best: f64,
    pub mean: f64,
    pub stdev: f64,
    /// Pipes passed during the evaluation
    pub score: u32,
    pub ticks: u64,
}

impl GenerationStats {
    pub fn from_genomes<G: Genome>(
        generation: u32,
        genomes: &[G],
        outcome: &EvaluationOutcome,
    ) -> Self {
        let population = genomes.len();
        let n = population.max(1) as f64;
        let best = genomes
            .iter()
            .map(Genome::fitness)
            .fold(f64::NEG_INFINITY, f64::max);
        let mean = genomes.iter().map(Genome::fitness).sum::<f64>() / n;
        let variance = genomes
            .iter()
            .map(|g| (g.fitness() - mean).powi(2))
            .sum::<f64>()
            / n;

        Self {
            generation,
            population,
            best: if population == 0 { 0.0 } else { best },
            mean,
            stdev: variance.sqrt(),
            score: outcome.score,
            ticks: outcome.ticks,
        }
    }
}

/// Collects [`GenerationStats`] across a session and logs each one.
#[derive(Debug, Default)]
pub struct StatisticsReporter {
    pub history: Vec<GenerationStats>,
}

impl StatisticsReporter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, stats: GenerationStats) -> &GenerationStats {
        info!(
            generation = stats.generation,
            population = stats.population,
            best = stats.best,
            mean = stats.mean,
            stdev = stats.stdev,
            score = stats.score,
            ticks = stats.ticks,
            "generation evaluated"
        );
        let index = self.history.len();
        self.history.push(stats);
        &self.history[index]
    }

    pub fn best_fitness(&self) -> Option<f64> {
        self.history.iter().map(|s| s.best).reduce(f64::max)
    }

    pub fn best_score(&self) -> u32 {
        self.history.iter().map(|s| s.score).max().unwrap_or(0)
    }

    /// Plain-text table of every recorded generation.
    pub fn to_text(&self) -> String {
        let mut report = String::new();
        report.push_str("=== Training Report ===\n\n");
        report.push_str("  Gen   Best      Mean      Stdev     Score  Ticks\n");
        for s in &self.history {
            report.push_str(&format!(
                "  {:>3}   {:>8.2}  {:>8.2}  {:>8.2}  {:>5}  {:>6}\n",
                s.generation, s.best, s.mean, s.stdev, s.score, s.ticks
            ));
        }
        if let Some(best) = self.best_fitness() {
            report.push_str(&format!(
                "\n  Best fitness: {:.2}\n  Best score:   {}\n",
                best,
                self.best_score()
            ));
        }
        report
    }
}
