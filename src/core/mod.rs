mod config;
mod logging;

pub use config::{AppConfig, persona_message};
pub use logging::init_tracing;
