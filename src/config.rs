use std::{fs, path::Path};

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use crate::engine::AngleUnit;

/// Tunables for a single evaluation.
///
/// Missing fields fall back to their defaults when read from TOML:
///
/// ```toml
/// max_depth = 64
/// angle_unit = "degrees"   # or "radians"
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct EngineConfig {
    /// Maximum number of nested groups, function calls and `^` operands.
    pub max_depth: usize,
    /// Unit of the arguments of `sin`, `cos` and `tan`.
    pub angle_unit: AngleUnit,
}

impl EngineConfig {
    pub const DEFAULT_MAX_DEPTH: usize = 64;
    /// Largest `max_depth` the recursive parser can honour on a default
    /// thread stack.
    pub const MAX_SUPPORTED_DEPTH: usize = 256;

    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    /// Returns an error if the text is not valid TOML, contains unknown keys,
    /// or sets `max_depth` outside `1..=MAX_SUPPORTED_DEPTH`.
    ///
    /// # Examples
    /// ```
    /// use scicalc::{config::EngineConfig, engine::AngleUnit};
    ///
    /// let config = EngineConfig::from_toml("angle_unit = \"radians\"").unwrap();
    /// assert_eq!(config.angle_unit, AngleUnit::Radians);
    /// assert_eq!(config.max_depth, EngineConfig::DEFAULT_MAX_DEPTH);
    /// ```
    pub fn from_toml(text: &str) -> Result<Self> {
        let config: Self = toml::from_str(text).context("invalid engine configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Reads a configuration file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or does not hold a valid
    /// configuration.
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        Self::from_toml(&text).with_context(|| format!("in config file {}", path.display()))
    }

    /// Checks that the settings can be honoured.
    ///
    /// # Errors
    /// Returns an error if `max_depth` is zero or above
    /// [`Self::MAX_SUPPORTED_DEPTH`].
    pub fn validate(&self) -> Result<()> {
        if self.max_depth == 0 {
            bail!("max_depth must be at least 1");
        }
        if self.max_depth > Self::MAX_SUPPORTED_DEPTH {
            bail!(
                "max_depth must be at most {}, got {}",
                Self::MAX_SUPPORTED_DEPTH,
                self.max_depth
            );
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            angle_unit: AngleUnit::default(),
        }
    }
}
