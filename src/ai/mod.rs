//! Population evaluation: many birds flown in lock-step, each steered by a
//! controller built from an evolvable genome.

pub mod controller;
pub mod genome;
pub mod population;

pub use controller::{
    wants_impulse, Controller, FnController, Observation, RuleController, ScriptedController,
};
pub use genome::{Evolution, Genome};
pub use population::{
    evaluate_generation, EvaluationOutcome, EvaluationSettings, PopulationRun, Roster, StepReport,
};
