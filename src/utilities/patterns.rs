// Pattern Matching Utilities
// Glob-like matching of manifest keys for scan exclusions

/// Check if a single path component matches a pattern.
///
/// Matching is case-insensitive. `*` matches any run of characters and may
/// appear anywhere in the pattern, any number of times.
pub fn matches_pattern(name: &str, pattern: &str) -> bool {
    let name = name.to_lowercase();
    let pattern = pattern.to_lowercase();

    match pattern.split_once('*') {
        None => name == pattern,
        Some((prefix, suffix)) if !suffix.contains('*') => {
            name.len() >= prefix.len() + suffix.len()
                && name.starts_with(prefix)
                && name.ends_with(suffix)
        }
        // More than one wildcard: anchor the outer parts, find the inner ones in order
        Some(_) => {
            let parts: Vec<&str> = pattern.split('*').collect();
            let first = parts[0];
            let last = parts[parts.len() - 1];
            if name.len() < first.len() + last.len() || !name.starts_with(first) || !name.ends_with(last) {
                return false;
            }

            let mut rest = &name[first.len()..name.len() - last.len()];
            for part in parts[1..parts.len() - 1].iter().filter(|p| !p.is_empty()) {
                match rest.find(part) {
                    Some(idx) => rest = &rest[idx + part.len()..],
                    None => return false,
                }
            }
            true
        }
    }
}

/// Pattern matcher for scan exclusions
#[derive(Debug, Clone, Default)]
pub struct PatternMatcher {
    patterns: Vec<String>,
}

impl PatternMatcher {
    /// Create a new pattern matcher with the given patterns
    pub fn new(patterns: Vec<String>) -> Self {
        Self { patterns }
    }

    /// Check if any component of a forward-slash key is excluded
    pub fn should_exclude(&self, key: &str) -> bool {
        !self.patterns.is_empty()
            && key
                .split('/')
                .any(|name| self.patterns.iter().any(|p| matches_pattern(name, p)))
    }

    /// Get all patterns
    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }
}
