//! Generational breeding: elitism, tournament selection, uniform crossover
//! and weight perturbation.

use super::genome::NeuroGenome;
use crate::ai::Evolution;
use crate::error::{FlapError, Result};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Breeding parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvolutionParams {
    /// Genomes per generation
    pub population_size: usize,
    /// Hidden units per network; zero wires inputs straight to the output
    pub hidden_units: usize,
    /// Probability of perturbing each weight of a child
    pub mutation_rate: f64,
    /// Largest single perturbation
    pub mutation_strength: f64,
    /// Best genomes copied unchanged into the next generation
    pub elitism: usize,
    /// Contestants drawn per parent selection
    pub tournament_size: usize,
}

impl Default for EvolutionParams {
    fn default() -> Self {
        Self {
            population_size: 50,
            hidden_units: 4,
            mutation_rate: 0.2,
            mutation_strength: 0.5,
            elitism: 2,
            tournament_size: 3,
        }
    }
}

impl EvolutionParams {
    pub fn validate(&self) -> Result<()> {
        if self.population_size == 0 {
            return Err(FlapError::InvalidConfig(
                "population_size must be > 0".to_string(),
            ));
        }
        if self.elitism > self.population_size {
            return Err(FlapError::InvalidConfig(
                "elitism cannot exceed population_size".to_string(),
            ));
        }
        if self.tournament_size == 0 {
            return Err(FlapError::InvalidConfig(
                "tournament_size must be > 0".to_string(),
            ));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(FlapError::InvalidConfig(
                "mutation_rate must be within 0..=1".to_string(),
            ));
        }
        if self.mutation_strength.is_nan() || self.mutation_strength <= 0.0 {
            return Err(FlapError::InvalidConfig(
                "mutation_strength must be > 0".to_string(),
            ));
        }
        Ok(())
    }
}

/// Reference evolution engine over [`NeuroGenome`]s.
pub struct Engine<R> {
    pub params: EvolutionParams,
    population: Vec<NeuroGenome>,
    best: Option<NeuroGenome>,
    rng: R,
}

impl<R: Rng> Engine<R> {
    /// Random initial population.
    pub fn new(params: EvolutionParams, mut rng: R) -> Result<Self> {
        params.validate()?;
        let population = (0..params.population_size)
            .map(|_| NeuroGenome::random(params.hidden_units, &mut rng))
            .collect();
        Ok(Self {
            params,
            population,
            best: None,
            rng,
        })
    }

    pub fn population(&self) -> &[NeuroGenome] {
        &self.population
    }

    fn record_best(&mut self) {
        let fittest = self
            .population
            .iter()
            .max_by(|a, b| a.fitness.total_cmp(&b.fitness));
        if let Some(fittest) = fittest {
            let improved = self
                .best
                .as_ref()
                .map_or(true, |best| fittest.fitness > best.fitness);
            if improved {
                debug!(fitness = fittest.fitness, "new best genome");
                self.best = Some(fittest.clone());
            }
        }
    }
}

/// Fittest of `size` genomes drawn with replacement. `None` only for an
/// empty population.
fn tournament<'a, R: Rng>(
    population: &'a [NeuroGenome],
    size: usize,
    rng: &mut R,
) -> Option<&'a NeuroGenome> {
    (0..size.max(1))
        .filter_map(|_| population.choose(&mut *rng))
        .max_by(|a, b| a.fitness.total_cmp(&b.fitness))
}

impl<R: Rng> Evolution for Engine<R> {
    type Genome = NeuroGenome;

    fn population_mut(&mut self) -> &mut [NeuroGenome] {
        &mut self.population
    }

    fn evolve(&mut self) {
        self.record_best();

        let mut ranked = self.population.clone();
        ranked.sort_by(|a, b| b.fitness.total_cmp(&a.fitness));

        let mut next: Vec<NeuroGenome> = ranked.iter().take(self.params.elitism).cloned().collect();
        while next.len() < self.params.population_size {
            let size = self.params.tournament_size;
            let (Some(mother), Some(father)) = (
                tournament(&ranked, size, &mut self.rng),
                tournament(&ranked, size, &mut self.rng),
            ) else {
                break;
            };
            let mut network = mother.network.crossover(&father.network, &mut self.rng);
            network.mutate(
                self.params.mutation_rate,
                self.params.mutation_strength,
                &mut self.rng,
            );
            next.push(NeuroGenome::new(network));
        }
        self.population = next;
    }

    fn best(&self) -> Option<&NeuroGenome> {
        self.best.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    fn engine(params: EvolutionParams) -> Engine<ChaCha8Rng> {
        Engine::new(params, ChaCha8Rng::seed_from_u64(21)).unwrap()
    }

    fn score(engine: &mut Engine<ChaCha8Rng>) {
        for (i, genome) in engine.population_mut().iter_mut().enumerate() {
            genome.fitness = i as f64;
        }
    }

    #[test]
    fn test_default_params_valid() {
        assert!(EvolutionParams::default().validate().is_ok());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let bad = [
            EvolutionParams {
                population_size: 0,
                ..Default::default()
            },
            EvolutionParams {
                elitism: 60,
                ..Default::default()
            },
            EvolutionParams {
                tournament_size: 0,
                ..Default::default()
            },
            EvolutionParams {
                mutation_rate: 1.5,
                ..Default::default()
            },
            EvolutionParams {
                mutation_strength: 0.0,
                ..Default::default()
            },
        ];
        for params in bad {
            assert!(matches!(
                params.validate(),
                Err(FlapError::InvalidConfig(_))
            ));
        }
    }

    #[test]
    fn test_population_size_is_constant() {
        let mut engine = engine(EvolutionParams {
            population_size: 12,
            ..Default::default()
        });
        for _ in 0..5 {
            score(&mut engine);
            engine.evolve();
            assert_eq!(engine.population().len(), 12);
        }
    }

    #[test]
    fn test_elites_survive_unchanged() {
        let mut engine = engine(EvolutionParams {
            population_size: 10,
            elitism: 2,
            ..Default::default()
        });
        score(&mut engine);
        let top = engine.population()[9].network.clone();
        let second = engine.population()[8].network.clone();
        engine.evolve();
        assert_eq!(engine.population()[0].network, top);
        assert_eq!(engine.population()[1].network, second);
    }

    #[test]
    fn test_best_tracks_highest_fitness_ever() {
        let mut engine = engine(EvolutionParams {
            population_size: 6,
            ..Default::default()
        });
        assert!(engine.best().is_none());

        score(&mut engine);
        engine.evolve();
        assert_eq!(engine.best().map(|g| g.fitness), Some(5.0));

        // A worse generation does not replace it
        for genome in engine.population_mut() {
            genome.fitness = 1.0;
        }
        engine.evolve();
        assert_eq!(engine.best().map(|g| g.fitness), Some(5.0));
    }

    #[test]
    fn test_tournament_favours_fitness() {
        let mut rng = ChaCha8Rng::seed_from_u64(4);
        let mut pool: Vec<NeuroGenome> = (0..3)
            .map(|_| NeuroGenome::random(2, &mut rng))
            .collect();
        for (i, genome) in pool.iter_mut().enumerate() {
            genome.fitness = i as f64;
        }
        // 50 draws from three all but guarantee the fittest takes part
        let winner = tournament(&pool, 50, &mut rng).unwrap();
        assert_eq!(winner.fitness, 2.0);
        assert!(tournament(&pool, 1, &mut rng).is_some());
        assert!(tournament(&[], 3, &mut rng).is_none());
    }

    #[test]
    fn test_same_seed_same_offspring() {
        let params = EvolutionParams {
            population_size: 8,
            ..Default::default()
        };
        let mut a = engine(params.clone());
        let mut b = engine(params);
        score(&mut a);
        score(&mut b);
        a.evolve();
        b.evolve();
        assert_eq!(a.population(), b.population());
    }
}
