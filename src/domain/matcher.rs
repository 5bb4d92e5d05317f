use std::fmt;

use crate::DispatchError;

/// A path pattern used to decide whether a staged file belongs to a scope.
///
/// Patterns containing `*`, `?` or `[` are globs (`*` also crosses `/`, so
/// `api/*.py` matches `api/core/app.py`). Anything else is a literal prefix
/// that matches whole path components: `web` and `web/` both match
/// `web/app.ts` but not `webpack.config.js`.
#[derive(Debug, Clone)]
pub enum PathMatcher {
    Glob(glob::Pattern),
    Prefix(String),
}

impl PathMatcher {
    /// Parse a pattern string, rejecting invalid globs
    pub fn parse(raw: &str) -> Result<Self, DispatchError> {
        let raw = raw.trim();
        if raw.is_empty() {
            return Err(DispatchError::Configuration(
                "path pattern must not be empty".to_string(),
            ));
        }

        if raw.contains(['*', '?', '[']) {
            let pattern = glob::Pattern::new(raw).map_err(|e| {
                DispatchError::Configuration(format!("invalid glob '{}': {}", raw, e))
            })?;
            Ok(PathMatcher::Glob(pattern))
        } else {
            Ok(PathMatcher::Prefix(raw.to_string()))
        }
    }

    /// Parse every pattern in order
    pub fn parse_all<S: AsRef<str>>(raw: &[S]) -> Result<Vec<Self>, DispatchError> {
        raw.iter().map(|p| Self::parse(p.as_ref())).collect()
    }

    /// Check a repository-relative, `/`-separated path against this pattern
    pub fn matches(&self, path: &str) -> bool {
        match self {
            PathMatcher::Glob(pattern) => pattern.matches(path),
            PathMatcher::Prefix(prefix) => {
                if prefix.ends_with('/') {
                    return path.starts_with(prefix.as_str());
                }
                match path.strip_prefix(prefix.as_str()) {
                    Some(rest) => rest.is_empty() || rest.starts_with('/'),
                    None => false,
                }
            }
        }
    }
}

impl fmt::Display for PathMatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathMatcher::Glob(pattern) => write!(f, "{}", pattern.as_str()),
            PathMatcher::Prefix(prefix) => write!(f, "{}", prefix),
        }
    }
}
