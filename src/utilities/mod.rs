// Utilities module
// Helper functions and tools

pub mod paths;
pub mod patterns;

pub use paths::{is_hidden, join_posix, resolve_root, to_posix};
pub use patterns::{matches_pattern, PatternMatcher};
