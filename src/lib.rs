pub mod math;
pub mod activation;
pub mod layers;
pub mod network;
pub mod loss;
pub mod train;
pub mod config;
pub mod error;

// Convenience re-exports
pub use math::matrix::Matrix;
pub use activation::Activator;
pub use layers::{Layer, Phase};
pub use network::{Network, NetworkSpec};
pub use loss::SquaredDeviation;
pub use train::{train_loop, StepStats, TrainConfig, TrainingSpec};
pub use config::RunConfig;
pub use error::{NnError, Result};
