use crate::{error::GtmGraphError, properties::RESERVED_EVENT_VARIABLE};
use serde::{Deserialize, Serialize};
use std::{fs::read_to_string, path::Path};

/// Options controlling a graph build.
///
/// ```toml
/// reserved_variable_names = ["_event"]
/// builtin_variables = true
/// keep_diagnostics = true
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    /// Placeholder names that never resolve to a variable.
    pub reserved_variable_names: Vec<String>,
    /// Synthesize variables for the container's enabled built-in variables.
    pub builtin_variables: bool,
    /// Retain non-fatal build diagnostics on the graph. They are logged either way.
    pub keep_diagnostics: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        GraphConfig {
            reserved_variable_names: vec![RESERVED_EVENT_VARIABLE.to_string()],
            builtin_variables: true,
            keep_diagnostics: true,
        }
    }
}

impl GraphConfig {
    pub fn from_toml_str(content: &str) -> Result<GraphConfig, GtmGraphError> {
        Ok(toml::from_str(content)?)
    }

    /// Read a config file. A missing file yields the defaults.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<GraphConfig, GtmGraphError> {
        let path = path.as_ref();
        tracing::debug!("Attempting to read graph config from: {:?}", path);
        if !path.exists() {
            tracing::debug!("Config file not found, using default graph config.");
            return Ok(GraphConfig::default());
        }
        let content = read_to_string(path)?;
        GraphConfig::from_toml_str(&content)
    }

    pub fn is_reserved(&self, name: &str) -> bool {
        self.reserved_variable_names.iter().any(|r| r == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use test_log::test;

    #[test]
    fn defaults_reserve_event() {
        let config = GraphConfig::default();
        assert!(config.is_reserved("_event"));
        assert!(!config.is_reserved("Page URL"));
        assert!(config.builtin_variables);
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let config = GraphConfig::from_toml_str("builtin_variables = false").unwrap();
        assert!(!config.builtin_variables);
        assert!(config.keep_diagnostics);
        assert_eq!(config.reserved_variable_names, vec!["_event".to_string()]);
    }

    #[test]
    fn invalid_toml_is_config_error() {
        let err = GraphConfig::from_toml_str("builtin_variables = \"yes\"").unwrap_err();
        assert!(matches!(err, GtmGraphError::Config(_)));
    }

    #[test]
    fn load_reads_file_and_tolerates_missing() {
        let dir = tempfile::tempdir().unwrap();
        let missing = GraphConfig::load(dir.path().join("absent.toml")).unwrap();
        assert_eq!(missing, GraphConfig::default());

        let path = dir.path().join("gtmgraph.toml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "reserved_variable_names = [\"_event\", \"gtm.uniqueEventId\"]").unwrap();
        let config = GraphConfig::load(&path).unwrap();
        assert!(config.is_reserved("gtm.uniqueEventId"));
    }
}
