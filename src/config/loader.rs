// file: src/config/loader.rs
// version: 0.3.0
// guid: c0d81f36-2e94-4a57-b6c8-75f3a9e01d24

//! Configuration file loading and environment variable substitution

use super::ContainerConfig;
use crate::Result;
use regex::Regex;
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Configuration loader with environment variable substitution
pub struct ConfigLoader {
    env_vars: HashMap<String, String>,
}

impl ConfigLoader {
    /// Create a new config loader
    pub fn new() -> Self {
        Self {
            env_vars: std::env::vars().collect(),
        }
    }

    /// Load the container configuration from a YAML file
    pub fn load_container_config<P: AsRef<Path>>(&self, path: P) -> Result<ContainerConfig> {
        let content = fs::read_to_string(&path).map_err(|e| {
            crate::error::OnboardError::ConfigError(format!(
                "Failed to read config file {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;

        let expanded = self.expand_env_vars(&content)?;
        let config: ContainerConfig = serde_yaml::from_str(&expanded)?;

        config.validate()?;

        Ok(config)
    }

    /// Resolve the effective configuration.
    ///
    /// An explicit `--config` path is loaded as-is; otherwise the per-user
    /// config file is picked up when present, and the built-in defaults apply
    /// when it is not.
    pub fn load_or_default(&self, explicit: Option<&str>) -> Result<ContainerConfig> {
        if let Some(path) = explicit {
            return self.load_container_config(path);
        }

        if let Some(default_path) = Self::default_config_path() {
            if default_path.exists() {
                debug!("Loading config from {}", default_path.display());
                return self.load_container_config(default_path);
            }
        }

        Ok(ContainerConfig::default())
    }

    /// Per-user config file location
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("onboard-env").join("config.yaml"))
    }

    /// Expand `${VAR}` environment variable references in configuration content
    fn expand_env_vars(&self, content: &str) -> Result<String> {
        let re = Regex::new(r"\$\{([^}]+)\}").map_err(|e| {
            crate::error::OnboardError::ConfigError(format!("Invalid regex pattern: {}", e))
        })?;

        let mut result = content.to_string();
        let mut missing_vars = Vec::new();

        for cap in re.captures_iter(content) {
            let var_name = &cap[1];
            let placeholder = &cap[0];

            if let Some(value) = self.env_vars.get(var_name) {
                result = result.replace(placeholder, value);
            } else {
                missing_vars.push(var_name.to_string());
            }
        }

        if !missing_vars.is_empty() {
            return Err(crate::error::OnboardError::ConfigError(format!(
                "Missing environment variables: {}",
                missing_vars.join(", ")
            )));
        }

        Ok(result)
    }

    /// Set environment variable for substitution
    pub fn set_env_var(&mut self, key: String, value: String) {
        self.env_vars.insert(key, value);
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}
