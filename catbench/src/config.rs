//! @ai:module:intent Configuration file for dispatch defaults and definition paths
//! @ai:module:layer infrastructure
//! @ai:module:public_api CatbenchConfig, DispatchConfig, PathConfig
//! @ai:module:stateless true

use crate::registry::{ResolveOptions, DEFAULT_PORT, LOCAL_SERVER};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// @ai:intent Top-level catbench configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CatbenchConfig {
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub paths: PathConfig,
}

/// @ai:intent Request settings used when the command line leaves them out
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_benchmark")]
    pub benchmark: String,
    #[serde(default = "default_dataset")]
    pub dataset: String,
    #[serde(default = "default_servers")]
    pub servers: Vec<String>,
    #[serde(default)]
    pub objectives: Option<Vec<String>>,
    #[serde(default)]
    pub enable_model: bool,
    #[serde(default = "default_true")]
    pub enable_tabular: bool,
    #[serde(default = "default_true")]
    pub enable_download: bool,
    #[serde(default = "default_port")]
    pub interopt_port: u16,
}

/// @ai:intent Locations of extra benchmark definition files
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PathConfig {
    #[serde(default)]
    pub definitions_dir: Option<PathBuf>,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            benchmark: default_benchmark(),
            dataset: default_dataset(),
            servers: default_servers(),
            objectives: None,
            enable_model: false,
            enable_tabular: true,
            enable_download: true,
            interopt_port: DEFAULT_PORT,
        }
    }
}

fn default_benchmark() -> String {
    "spmm".to_string()
}

fn default_dataset() -> String {
    "server".to_string()
}

fn default_servers() -> Vec<String> {
    vec![LOCAL_SERVER.to_string()]
}

fn default_true() -> bool {
    true
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

impl CatbenchConfig {
    /// @ai:intent Load configuration from a TOML file
    /// @ai:pre path exists and is readable
    /// @ai:effects fs:read
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = toml::from_str(&content)?;
        Ok(config)
    }

    /// @ai:intent Save configuration to a TOML file
    /// @ai:effects fs:write
    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let content = toml::to_string_pretty(self)?;
        std::fs::write(path, content)?;
        Ok(())
    }
}

impl DispatchConfig {
    /// @ai:intent Translate file settings into registry resolve options
    /// @ai:effects pure
    pub fn resolve_options(&self) -> ResolveOptions {
        ResolveOptions {
            enable_model: self.enable_model,
            dataset: Some(self.dataset.clone()),
            enabled_objectives: self.objectives.clone(),
            server_addresses: Some(self.servers.clone()),
            enable_tabular: self.enable_tabular,
            enable_download: self.enable_download,
            port: self.interopt_port,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config: CatbenchConfig = toml::from_str("").unwrap();
        assert_eq!(config, CatbenchConfig::default());
        assert_eq!(config.dispatch.benchmark, "spmm");
        assert_eq!(config.dispatch.interopt_port, 50050);
    }

    #[test]
    fn test_command_line_default_keeps_model_off() {
        let options = DispatchConfig::default().resolve_options();
        assert!(!options.enable_model);
        assert!(ResolveOptions::default().enable_model);
        assert_eq!(options.server_addresses, Some(vec!["localhost".to_string()]));
    }

    #[test]
    fn test_partial_section() {
        let config: CatbenchConfig = toml::from_str(
            r#"
[dispatch]
benchmark = "asum"
servers = ["host1", "host2"]
"#,
        )
        .unwrap();
        assert_eq!(config.dispatch.benchmark, "asum");
        assert_eq!(config.dispatch.dataset, "server");
        assert!(config.dispatch.enable_tabular);

        let options = config.dispatch.resolve_options();
        assert_eq!(options.server_addresses.unwrap().len(), 2);
        assert_eq!(options.enabled_objectives, None);
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("catbench.toml");

        let mut config = CatbenchConfig::default();
        config.dispatch.objectives = Some(vec!["energy".to_string()]);
        config.paths.definitions_dir = Some(PathBuf::from("definitions"));
        config.save(&path).unwrap();

        assert_eq!(CatbenchConfig::load(&path).unwrap(), config);
    }
}
