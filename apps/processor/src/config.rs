//! Processor configuration.
//!
//! All values come from the environment (the workflow engine injects
//! them into the container); `.env` files are honored in development.

use std::path::PathBuf;

use anyhow::Context;

/// Configuration for one processor run.
#[derive(Debug, Clone)]
pub struct Config {
    /// Authentication host.
    pub api_host: String,
    /// Workflow and import service host.
    pub api2_host: String,
    pub api_key: String,
    pub api_secret: String,
    /// Workflow instance this run executes under.
    pub workflow_instance_id: String,
    /// Directory holding the single staged input artifact.
    pub input_dir: PathBuf,
    /// Directory holding the rendered viewer assets to import.
    pub output_dir: PathBuf,
}

impl Config {
    /// Loads configuration from the process environment.
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_source(|key| std::env::var(key).ok())
    }

    fn from_source(get: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let require = |key: &str| {
            get(key)
                .filter(|v| !v.is_empty())
                .with_context(|| format!("missing required environment variable {key}"))
        };

        Ok(Self {
            api_host: require("API_HOST")?,
            api2_host: require("API2_HOST")?,
            api_key: require("API_KEY")?,
            api_secret: require("API_SECRET")?,
            workflow_instance_id: require("WORKFLOW_INSTANCE_ID")?,
            input_dir: PathBuf::from(require("INPUT_DIR")?),
            output_dir: PathBuf::from(require("OUTPUT_DIR")?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn full_env() -> HashMap<&'static str, &'static str> {
        HashMap::from([
            ("API_HOST", "https://api.test"),
            ("API2_HOST", "https://api2.test"),
            ("API_KEY", "key"),
            ("API_SECRET", "secret"),
            ("WORKFLOW_INSTANCE_ID", "wf-1"),
            ("INPUT_DIR", "/data/input"),
            ("OUTPUT_DIR", "/data/output"),
        ])
    }

    fn source(env: HashMap<&'static str, &'static str>) -> impl Fn(&str) -> Option<String> {
        move |key| env.get(key).map(|v| v.to_string())
    }

    #[test]
    fn loads_complete_environment() {
        let config = Config::from_source(source(full_env())).unwrap();
        assert_eq!(config.api_host, "https://api.test");
        assert_eq!(config.api2_host, "https://api2.test");
        assert_eq!(config.workflow_instance_id, "wf-1");
        assert_eq!(config.input_dir, PathBuf::from("/data/input"));
        assert_eq!(config.output_dir, PathBuf::from("/data/output"));
    }

    #[test]
    fn missing_variable_is_named_in_error() {
        let mut env = full_env();
        env.remove("API_SECRET");

        let err = Config::from_source(source(env)).unwrap_err();
        assert!(err.to_string().contains("API_SECRET"));
    }

    #[test]
    fn empty_variable_counts_as_missing() {
        let mut env = full_env();
        env.insert("WORKFLOW_INSTANCE_ID", "");

        let err = Config::from_source(source(env)).unwrap_err();
        assert!(err.to_string().contains("WORKFLOW_INSTANCE_ID"));
    }
}
