//! Configuration, environment loading, and logging setup for Wayfarer.

mod env;
mod logging;
mod model;
mod registry;

pub use env::{load_and_apply, LoadError as EnvLoadError};
pub use logging::init_tracing;
pub use model::{ModelConfig, Provider};
pub use registry::{LoadError, ModelRegistry};
