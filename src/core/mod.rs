// Core infrastructure module
// Configuration, injected capabilities and the sync pipeline

pub mod app;
pub mod app_config;
pub mod confirm;
pub mod project_config;
pub mod reporter;

pub use app::{App, Outcome, Plan, RunMode, CONFIRM_PROMPT};
pub use app_config::{AppConfig, ConfigError};
pub use confirm::{Confirm, FixedAnswer};
pub use project_config::{ProjectConfig, PROJECT_CONFIG_NAME};
pub use reporter::{NullReporter, Reporter};
