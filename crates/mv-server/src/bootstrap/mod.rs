pub mod config;
pub mod run;
pub mod tracing;
pub mod wiring;

pub use config::{apply_env_overrides, load_config, load_from_env};
pub use run::run;
pub use wiring::{wire_dependencies, WiredApp, WiringError};
