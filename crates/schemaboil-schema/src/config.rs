//! Build configuration.
//!
//! Controls which tables are fetched and how strictly inconsistent accessor
//! output is treated.

use regex::Regex;
use schemaboil_core::error::{ConfigError, Error, Result};
use serde::{Deserialize, Serialize};

/// How dangling foreign key references are handled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConsistencyMode {
    /// Record inconsistencies as warnings next to a best-effort schema.
    #[default]
    Lenient,
    /// Fail the build if any inconsistency is recorded.
    Strict,
}

/// Configuration for [`crate::build_schema`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildConfig {
    /// Inconsistency handling
    pub consistency: ConsistencyMode,
    /// Only fetch tables matching one of these patterns (empty = all)
    pub include: Vec<String>,
    /// Never fetch tables matching one of these patterns; wins over `include`
    pub exclude: Vec<String>,
    /// Sort table names before fetching instead of keeping accessor order
    pub sort_tables: bool,
}

impl BuildConfig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the consistency mode.
    pub fn consistency(mut self, mode: ConsistencyMode) -> Self {
        self.consistency = mode;
        self
    }

    /// Shorthand for `consistency(ConsistencyMode::Strict)`.
    pub fn strict(self) -> Self {
        self.consistency(ConsistencyMode::Strict)
    }

    /// Add an inclusion pattern.
    pub fn include(mut self, pattern: impl Into<String>) -> Self {
        self.include.push(pattern.into());
        self
    }

    /// Add an exclusion pattern.
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude.push(pattern.into());
        self
    }

    /// Sort table names before fetching.
    pub fn sort_tables(mut self, sort: bool) -> Self {
        self.sort_tables = sort;
        self
    }

    pub fn is_strict(&self) -> bool {
        self.consistency == ConsistencyMode::Strict
    }

    /// Parse a configuration document.
    ///
    /// ```json
    /// { "consistency": "strict", "exclude": ["schema_migrations", "tmp_.*"] }
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| {
            Error::Config(ConfigError {
                message: format!("invalid build configuration: {}", e),
                source: Some(Box::new(e)),
            })
        })
    }

    /// Compile the table name patterns.
    pub fn compile(&self) -> Result<TableFilter> {
        Ok(TableFilter {
            include: compile_patterns(&self.include)?,
            exclude: compile_patterns(&self.exclude)?,
        })
    }
}

/// Compiled include/exclude patterns.
///
/// Patterns are regular expressions matched against the whole table name,
/// so a plain name only matches itself.
#[derive(Debug, Clone, Default)]
pub struct TableFilter {
    include: Vec<Regex>,
    exclude: Vec<Regex>,
}

impl TableFilter {
    /// Whether the named table should be fetched.
    pub fn allows(&self, table: &str) -> bool {
        if self.exclude.iter().any(|re| re.is_match(table)) {
            return false;
        }
        self.include.is_empty() || self.include.iter().any(|re| re.is_match(table))
    }
}

fn compile_patterns(patterns: &[String]) -> Result<Vec<Regex>> {
    patterns
        .iter()
        .map(|pattern| {
            Regex::new(&format!("^(?:{})$", pattern)).map_err(|e| {
                Error::Config(ConfigError {
                    message: format!("invalid table pattern '{}': {}", pattern, e),
                    source: Some(Box::new(e)),
                })
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = BuildConfig::default();
        assert_eq!(config.consistency, ConsistencyMode::Lenient);
        assert!(!config.is_strict());
        assert!(!config.sort_tables);

        let filter = config.compile().unwrap();
        assert!(filter.allows("anything"));
    }

    #[test]
    fn test_filter_patterns_match_whole_name() {
        let filter = BuildConfig::new()
            .exclude("schema_migrations")
            .exclude("tmp_.*")
            .compile()
            .unwrap();

        assert!(!filter.allows("schema_migrations"));
        assert!(filter.allows("schema_migrations_old"));
        assert!(!filter.allows("tmp_import"));
        assert!(filter.allows("users_tmp_x"));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let filter = BuildConfig::new()
            .include("user.*")
            .exclude("user_audit")
            .compile()
            .unwrap();

        assert!(filter.allows("users"));
        assert!(filter.allows("user_roles"));
        assert!(!filter.allows("user_audit"));
        assert!(!filter.allows("posts"));
    }

    #[test]
    fn test_invalid_pattern() {
        let err = BuildConfig::new().exclude("(unclosed").compile().unwrap_err();
        assert!(matches!(err, Error::Config(_)));
        assert!(err.to_string().contains("(unclosed"));
    }

    #[test]
    fn test_from_json() {
        let config = BuildConfig::from_json(
            r#"{ "consistency": "strict", "exclude": ["schema_migrations"], "sort_tables": true }"#,
        )
        .unwrap();
        assert!(config.is_strict());
        assert_eq!(config.exclude, vec!["schema_migrations"]);
        assert!(config.include.is_empty());
        assert!(config.sort_tables);

        assert_eq!(BuildConfig::from_json("{}").unwrap(), BuildConfig::default());
        assert!(matches!(
            BuildConfig::from_json(r#"{ "consistency": "paranoid" }"#),
            Err(Error::Config(_))
        ));
    }
}
