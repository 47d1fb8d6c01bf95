//! What the simulation needs from an evolvable individual.

use super::controller::Controller;

/// One individual handed over by the evolution engine for evaluation.
///
/// The simulation only touches the fitness accumulator and asks for a
/// controller; everything else about the genome is opaque.
pub trait Genome {
    type Controller: Controller;

    fn fitness(&self) -> f64;

    fn fitness_mut(&mut self) -> &mut f64;

    /// Build the controller this genome encodes.
    fn controller(&self) -> Self::Controller;
}

/// The evolution collaborator: owns a population of genomes and breeds the
/// next generation once every genome's fitness has been filled in.
pub trait Evolution {
    type Genome: Genome + Clone;

    /// Current generation, ready for evaluation.
    fn population_mut(&mut self) -> &mut [Self::Genome];

    /// Select, reproduce and mutate into the next generation.
    fn evolve(&mut self);

    /// Fittest genome seen so far across all evaluated generations.
    fn best(&self) -> Option<&Self::Genome>;
}
