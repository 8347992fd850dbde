// Folder Sync Library
// Two-way directory synchronization driven by modification times

// Core infrastructure - pipeline, configuration and injected capabilities
pub mod core;

// Operations - scanning, diffing and executing sync operations
pub mod operations;

// Render - report table rendering
pub mod render;

// UI - console reporter, prompt and styles
pub mod ui;

// Utilities - path and pattern helpers
pub mod utilities;

// Re-export commonly used items for convenience
pub use core::{App, AppConfig, Confirm, Outcome, ProjectConfig, Reporter, RunMode};
pub use operations::{diff, Differ, Manifest, Scanner, SyncEngine, SyncOperation, SyncSummary};
