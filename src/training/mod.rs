//! Training sessions: configuration, the generation loop and statistics.

pub mod config;
pub mod report;
pub mod session;

pub use config::TrainingConfig;
pub use report::{GenerationStats, StatisticsReporter};
pub use session::{replay, TrainingSession, TrainingSummary};
