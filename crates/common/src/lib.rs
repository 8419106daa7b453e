pub mod config;
pub mod logging;
pub mod retry;

pub use config::Environment;
pub use logging::setup_logging;
pub use retry::retry_with_backoff;
