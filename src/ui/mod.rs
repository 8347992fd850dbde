// UI module
// Console presentation and prompts for the sync pipeline

pub mod console;
pub mod prompt;
pub mod styles;

pub use console::ConsoleReporter;
pub use prompt::TerminalConfirm;
pub use styles::Styles;
