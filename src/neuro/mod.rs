//! Reference evolution collaborator: small feed-forward networks bred by a
//! generational genetic algorithm.

pub mod engine;
pub mod genome;
pub mod network;

pub use engine::{Engine, EvolutionParams};
pub use genome::NeuroGenome;
pub use network::Network;
