//! Glob pattern normalization and matching for include/exclude lists.

use super::error::{Result, UploadError};
use globset::{GlobBuilder, GlobMatcher};

/// Normalize a glob pattern for matching against source-relative paths.
///
/// Rules:
/// - Empty or "*" becomes "**/*" (match all)
/// - Leading slashes are stripped (relative matching)
/// - Patterns without a path separator get "**/" prefix
pub fn normalize_glob_pattern(raw: &str) -> String {
    let mut pattern = raw.trim().trim_start_matches('/').to_string();

    if pattern.is_empty() || pattern == "*" {
        pattern = "**/*".to_string();
    }

    if !pattern.contains('/') && !pattern.starts_with("**/") && pattern != "**/*" {
        pattern = format!("**/{}", pattern);
    }

    pattern
}

/// Build a case-insensitive glob matcher from a normalized pattern.
pub fn build_matcher(glob_pattern: &str) -> Result<GlobMatcher> {
    GlobBuilder::new(glob_pattern)
        .case_insensitive(true)
        .build()
        .map(|g| g.compile_matcher())
        .map_err(|e| UploadError::Pattern {
            pattern: glob_pattern.to_string(),
            message: e.kind().to_string(),
        })
}

/// An ordered list of compiled patterns.
///
/// [`PatternSet::matches`] also tries every ancestor directory of the path,
/// which is how exclude patterns cover a whole subtree.
/// [`PatternSet::matches_exact`] only tries the path itself.
#[derive(Debug, Clone, Default)]
pub struct PatternSet {
    raw: Vec<String>,
    matchers: Vec<GlobMatcher>,
}

impl PatternSet {
    /// Compile raw patterns, keeping their order.
    pub fn compile<S: AsRef<str>>(raw: &[S]) -> Result<Self> {
        let mut set = Self::default();
        for pattern in raw {
            let pattern = pattern.as_ref();
            let normalized = normalize_glob_pattern(pattern);
            let matcher = build_matcher(&normalized).map_err(|e| match e {
                UploadError::Pattern { message, .. } => UploadError::Pattern {
                    pattern: pattern.to_string(),
                    message,
                },
                other => other,
            })?;
            set.raw.push(pattern.to_string());
            set.matchers.push(matcher);
        }
        Ok(set)
    }

    pub fn is_empty(&self) -> bool {
        self.matchers.is_empty()
    }

    pub fn len(&self) -> usize {
        self.matchers.len()
    }

    /// The patterns as configured, before normalization.
    pub fn raw(&self) -> &[String] {
        &self.raw
    }

    /// Match a `/`-separated relative path, or any of its ancestors.
    pub fn matches(&self, rel_path: &str) -> bool {
        let candidate = rel_path.trim_start_matches('/');
        if candidate.is_empty() {
            return false;
        }
        ancestors_and_self(candidate).any(|p| self.matches_one(p))
    }

    /// Match a `/`-separated relative path as a whole, ignoring its ancestors.
    pub fn matches_exact(&self, rel_path: &str) -> bool {
        let candidate = rel_path.trim_start_matches('/');
        !candidate.is_empty() && self.matches_one(candidate)
    }

    fn matches_one(&self, path: &str) -> bool {
        self.matchers.iter().any(|m| m.is_match(path))
    }
}

/// Yields `a/b/c`, then `a/b`, then `a`.
fn ancestors_and_self(path: &str) -> impl Iterator<Item = &str> {
    let mut next = Some(path);
    std::iter::from_fn(move || {
        let current = next?;
        next = current.rfind('/').map(|idx| &current[..idx]).filter(|p| !p.is_empty());
        Some(current)
    })
}

/// Match a raw glob pattern against a path.
pub fn matches(raw_pattern: &str, path: &str) -> Result<bool> {
    let normalized = normalize_glob_pattern(raw_pattern);
    let matcher = build_matcher(&normalized)?;
    let candidate = path.trim_start_matches('/');
    Ok(matcher.is_match(candidate))
}
