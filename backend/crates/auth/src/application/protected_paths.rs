//! Protected Path Allow-List
//!
//! Which request paths the gate applies to. Everything else passes through
//! unauthenticated.

/// Default patterns
pub const DEFAULT_PROTECTED_PATHS: &str = "/api/me,/api/me/*";

#[derive(Debug, Clone, PartialEq, Eq)]
enum PathPattern {
    Exact(String),
    /// Trailing `*`: stored without the star
    Prefix(String),
}

impl PathPattern {
    fn parse(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        if raw.is_empty() {
            return None;
        }

        Some(match raw.strip_suffix('*') {
            Some(prefix) => PathPattern::Prefix(prefix.to_string()),
            None => PathPattern::Exact(raw.to_string()),
        })
    }

    fn matches(&self, path: &str) -> bool {
        match self {
            PathPattern::Exact(exact) => path == exact,
            PathPattern::Prefix(prefix) => path.starts_with(prefix.as_str()),
        }
    }
}

/// Parsed allow-list of path patterns
///
/// `/api/me/*` matches `/api/me/x` and `/api/me/x/y` but not `/api/me`;
/// list `/api/me` separately to gate it too.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProtectedPaths(Vec<PathPattern>);

impl ProtectedPaths {
    /// Parse a comma-separated pattern list; blank entries are ignored
    pub fn parse(raw: &str) -> Self {
        Self(raw.split(',').filter_map(PathPattern::parse).collect())
    }

    pub fn matches(&self, path: &str) -> bool {
        self.0.iter().any(|pattern| pattern.matches(path))
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for ProtectedPaths {
    fn default() -> Self {
        Self::parse(DEFAULT_PROTECTED_PATHS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_patterns() {
        let paths = ProtectedPaths::default();

        assert!(paths.matches("/api/me"));
        assert!(paths.matches("/api/me/profile"));
        assert!(paths.matches("/api/me/cagnottes/42/updates"));

        assert!(!paths.matches("/api/auth/signin"));
        assert!(!paths.matches("/api/cagnottes"));
        assert!(!paths.matches("/api/meta"));
    }

    #[test]
    fn test_wildcard_does_not_cover_its_root() {
        let paths = ProtectedPaths::parse("/api/me/*");
        assert!(!paths.matches("/api/me"));
        assert!(paths.matches("/api/me/x/y"));
    }

    #[test]
    fn test_parse_ignores_blanks() {
        let paths = ProtectedPaths::parse(" /a , ,/b/* ,");
        assert!(paths.matches("/a"));
        assert!(paths.matches("/b/c"));
        assert!(!paths.matches("/c"));

        assert!(ProtectedPaths::parse(" , ").is_empty());
    }

    #[test]
    fn test_bare_star_matches_everything() {
        let paths = ProtectedPaths::parse("*");
        assert!(paths.matches("/"));
        assert!(paths.matches("/anything/at/all"));
    }
}
