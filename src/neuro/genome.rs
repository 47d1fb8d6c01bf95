use super::network::Network;
use crate::ai::Genome;
use rand::Rng;
use serde::{Deserialize, Serialize};

/// A network plus the fitness it earned in its last evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NeuroGenome {
    pub network: Network,
    pub fitness: f64,
}

impl NeuroGenome {
    pub fn new(network: Network) -> Self {
        Self {
            network,
            fitness: 0.0,
        }
    }

    pub fn random<R: Rng>(hidden: usize, rng: &mut R) -> Self {
        Self::new(Network::random(hidden, rng))
    }
}

impl Genome for NeuroGenome {
    type Controller = Network;

    fn fitness(&self) -> f64 {
        self.fitness
    }

    fn fitness_mut(&mut self) -> &mut f64 {
        &mut self.fitness
    }

    fn controller(&self) -> Network {
        self.network.clone()
    }
}
