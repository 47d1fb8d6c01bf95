//! Training configuration file.

use crate::constants::{BREAK_SCORE, TRAINING_FPS};
use crate::error::{FlapError, Result};
use crate::game::SpawnPolicy;
use crate::neuro::EvolutionParams;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Everything a training or replay session needs. Missing fields in the file
/// fall back to [`Default`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    pub evolution: EvolutionParams,

    /// Generation limit for one training session
    pub generations: u32,

    /// Stop early once a genome reaches this fitness (None = never)
    pub fitness_threshold: Option<f64>,

    /// Random seed for reproducibility (None = random)
    pub seed: Option<u64>,

    /// A generation stops once its score exceeds this (None = unlimited)
    pub break_score: Option<u32>,

    /// Frames per second while training on screen; zero is unpaced
    pub fps: u32,

    pub spawn_policy: SpawnPolicy,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            evolution: EvolutionParams::default(),
            generations: 50,
            fitness_threshold: None,
            seed: None,
            break_score: Some(BREAK_SCORE),
            fps: TRAINING_FPS,
            spawn_policy: SpawnPolicy::randomized(),
        }
    }
}

impl TrainingConfig {
    /// Quick unpaced config for batch runs and tests
    pub fn headless(generations: u32, population_size: usize, seed: u64) -> Self {
        Self {
            evolution: EvolutionParams {
                population_size,
                ..Default::default()
            },
            generations,
            seed: Some(seed),
            fps: 0,
            ..Default::default()
        }
    }

    /// Load and validate a JSON config file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: TrainingConfig = serde_json::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty-printed JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        self.evolution.validate()?;
        self.spawn_policy.validate()?;
        if self.generations == 0 {
            return Err(FlapError::InvalidConfig(
                "generations must be > 0".to_string(),
            ));
        }
        if let Some(threshold) = self.fitness_threshold {
            if !threshold.is_finite() {
                return Err(FlapError::InvalidConfig(
                    "fitness_threshold must be finite".to_string(),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_valid() {
        let config = TrainingConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.break_score, Some(50));
        assert_eq!(config.spawn_policy, SpawnPolicy::randomized());
    }

    #[test]
    fn test_zero_generations_rejected() {
        let config = TrainingConfig {
            generations: 0,
            ..Default::default()
        };
        assert!(matches!(config.validate(), Err(FlapError::InvalidConfig(_))));
    }

    #[test]
    fn test_inverted_spawn_range_rejected() {
        let config = TrainingConfig {
            spawn_policy: SpawnPolicy::Randomized { min: 600, max: 450 },
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flapper.json");
        std::fs::write(
            &path,
            r#"{ "generations": 7, "evolution": { "population_size": 9 },
                "spawn_policy": { "kind": "fixed", "x": 520 } }"#,
        )
        .unwrap();

        let config = TrainingConfig::from_file(&path).unwrap();
        assert_eq!(config.generations, 7);
        assert_eq!(config.evolution.population_size, 9);
        assert_eq!(config.evolution.elitism, EvolutionParams::default().elitism);
        assert_eq!(config.spawn_policy, SpawnPolicy::Fixed { x: 520 });
        assert_eq!(config.fps, TRAINING_FPS);
    }

    #[test]
    fn test_save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flapper.json");
        let config = TrainingConfig::headless(3, 10, 99);
        config.save(&path).unwrap();
        assert_eq!(TrainingConfig::from_file(&path).unwrap(), config);
    }

    #[test]
    fn test_invalid_file_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("flapper.json");
        std::fs::write(&path, r#"{ "evolution": { "population_size": 0 } }"#).unwrap();
        assert!(matches!(
            TrainingConfig::from_file(&path),
            Err(FlapError::InvalidConfig(_))
        ));

        std::fs::write(&path, "not json").unwrap();
        assert!(matches!(
            TrainingConfig::from_file(&path),
            Err(FlapError::Serialization(_))
        ));
    }
}
