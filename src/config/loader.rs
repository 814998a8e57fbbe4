//! Configuration loading functionality.
//!
//! This module provides the [`ConfigLoader`] type for loading the engine's
//! settings from YAML files.

use std::fs;
use std::path::Path;

use crate::error::{HrError, HrResult};

use super::types::{HrConfig, PayrollSettings, ServerSettings};

/// Directory used when none is given on the command line.
pub const DEFAULT_CONFIG_DIR: &str = "./config/default";

/// Loads and provides access to the engine configuration.
///
/// # Directory Structure
///
/// ```text
/// config/default/
/// ├── payroll.yaml   # allowance, deduction
/// └── server.yaml    # bind_address, log_filter
/// ```
///
/// # Example
///
/// ```no_run
/// use hr_admin::config::ConfigLoader;
///
/// let loader = ConfigLoader::load("./config/default")?;
/// println!("Allowance: {}", loader.payroll().allowance);
/// # Ok::<(), hr_admin::error::HrError>(())
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConfigLoader {
    config: HrConfig,
}

impl ConfigLoader {
    /// Loads configuration from the specified directory.
    ///
    /// Returns [`HrError::ConfigNotFound`] if either file is missing and
    /// [`HrError::ConfigParseError`] if either contains invalid YAML.
    pub fn load<P: AsRef<Path>>(path: P) -> HrResult<Self> {
        let path = path.as_ref();

        let payroll = Self::load_yaml::<PayrollSettings>(&path.join("payroll.yaml"))?;
        let server = Self::load_yaml::<ServerSettings>(&path.join("server.yaml"))?;

        Ok(Self {
            config: HrConfig { payroll, server },
        })
    }

    /// Wraps an already-built configuration.
    pub fn from_config(config: HrConfig) -> Self {
        Self { config }
    }

    /// Loads and parses a YAML file.
    fn load_yaml<T: serde::de::DeserializeOwned>(path: &Path) -> HrResult<T> {
        let path_str = path.display().to_string();

        let content = fs::read_to_string(path).map_err(|_| HrError::ConfigNotFound {
            path: path_str.clone(),
        })?;

        serde_yaml::from_str(&content).map_err(|e| HrError::ConfigParseError {
            path: path_str,
            message: e.to_string(),
        })
    }

    /// Returns the full configuration.
    pub fn config(&self) -> &HrConfig {
        &self.config
    }

    pub fn payroll(&self) -> &PayrollSettings {
        &self.config.payroll
    }

    pub fn server(&self) -> &ServerSettings {
        &self.config.server
    }
}
