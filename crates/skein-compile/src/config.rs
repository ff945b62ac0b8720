//! Mapper configuration.
//!
//! Supports loading configuration from:
//! 1. Configuration files (YAML or JSON)
//! 2. Environment variables (with `SKEIN_` prefix)
//!
//! Configuration precedence (highest to lowest):
//! 1. Environment variables
//! 2. Configuration file
//! 3. Default values

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Complete mapper configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MapperConfig {
    /// Search budgets.
    #[serde(default)]
    pub limits: SearchLimits,

    /// Order in which islands of a segment are mapped.
    #[serde(default)]
    pub island_order: IslandOrder,

    /// Gate latencies. Recorded for reporting; the router does not weigh them.
    #[serde(default)]
    pub latency: Latency,
}

/// Budgets that bound the two exponential searches. `0` means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchLimits {
    /// Maximum backtracking calls per segment-mapping attempt.
    #[serde(default = "default_mapper_call_limit")]
    pub mapper_call_limit: u64,

    /// Maximum search nodes per swap transition before falling back to the
    /// constructive router.
    #[serde(default = "default_swap_node_limit")]
    pub swap_node_limit: u64,
}

impl SearchLimits {
    /// Limits that never cut a search short.
    pub fn unbounded() -> Self {
        Self {
            mapper_call_limit: 0,
            swap_node_limit: 0,
        }
    }

    /// Mapper call budget, `None` if unbounded.
    pub fn mapper_budget(&self) -> Option<u64> {
        (self.mapper_call_limit > 0).then_some(self.mapper_call_limit)
    }

    /// Swap search node budget, `None` if unbounded.
    pub fn swap_budget(&self) -> Option<u64> {
        (self.swap_node_limit > 0).then_some(self.swap_node_limit)
    }
}

impl Default for SearchLimits {
    fn default() -> Self {
        Self {
            mapper_call_limit: default_mapper_call_limit(),
            swap_node_limit: default_swap_node_limit(),
        }
    }
}

/// Island ordering inside one segment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IslandOrder {
    /// Most edges first, then most qubits; ties keep discovery order.
    #[default]
    LargestFirst,
    /// Order of discovery (ascending lowest qubit).
    Discovery,
}

impl FromStr for IslandOrder {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "largest_first" | "largest-first" => Ok(Self::LargestFirst),
            "discovery" => Ok(Self::Discovery),
            other => Err(ConfigError::ValidationError(format!(
                "Unknown island order: {other}"
            ))),
        }
    }
}

impl fmt::Display for IslandOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LargestFirst => write!(f, "largest_first"),
            Self::Discovery => write!(f, "discovery"),
        }
    }
}

/// Gate latencies in device time units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Latency {
    /// Single-qubit gate latency.
    #[serde(default = "default_latency")]
    pub single: u32,
    /// Two-qubit gate latency.
    #[serde(default = "default_latency")]
    pub two: u32,
    /// Swap latency.
    #[serde(default = "default_latency")]
    pub swap: u32,
}

impl Default for Latency {
    fn default() -> Self {
        Self {
            single: default_latency(),
            two: default_latency(),
            swap: default_latency(),
        }
    }
}

fn default_mapper_call_limit() -> u64 {
    2_000_000
}

fn default_swap_node_limit() -> u64 {
    2_000_000
}

fn default_latency() -> u32 {
    1
}

impl MapperConfig {
    /// Load configuration from a YAML or JSON file (chosen by extension,
    /// YAML otherwise).
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents =
            std::fs::read_to_string(path).map_err(|e| ConfigError::IoError(e.to_string()))?;

        let config: MapperConfig = if path.extension().is_some_and(|ext| ext == "json") {
            serde_json::from_str(&contents).map_err(|e| ConfigError::ParseError(e.to_string()))?
        } else {
            serde_yaml_ng::from_str(&contents)
                .map_err(|e| ConfigError::ParseError(e.to_string()))?
        };

        config.validate()?;
        Ok(config)
    }

    /// Load configuration with full precedence handling: the optional file
    /// (or defaults), then environment overrides, then validation.
    pub fn load(config_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        let config = config.merge_env_with(|key| std::env::var(key).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `SKEIN_*` overrides looked up through `lookup`.
    ///
    /// Only variables that are present override the current values.
    pub fn merge_env_with<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parse_u64 = |key: &str, value: String| {
            value.trim().parse::<u64>().map_err(|_| {
                ConfigError::ParseError(format!("{key} must be a non-negative integer, got '{value}'"))
            })
        };

        if let Some(v) = lookup("SKEIN_MAPPER_CALL_LIMIT") {
            self.limits.mapper_call_limit = parse_u64("SKEIN_MAPPER_CALL_LIMIT", v)?;
        }
        if let Some(v) = lookup("SKEIN_SWAP_NODE_LIMIT") {
            self.limits.swap_node_limit = parse_u64("SKEIN_SWAP_NODE_LIMIT", v)?;
        }
        if let Some(v) = lookup("SKEIN_ISLAND_ORDER") {
            self.island_order = v.parse()?;
        }
        Ok(self)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let Latency { single, two, swap } = self.latency;
        if single == 0 || two == 0 || swap == 0 {
            return Err(ConfigError::ValidationError(format!(
                "Latencies must be positive, got single={single} two={two} swap={swap}"
            )));
        }
        Ok(())
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    IoError(String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_config() {
        let config = MapperConfig::default();
        assert_eq!(config.limits.mapper_budget(), Some(2_000_000));
        assert_eq!(config.island_order, IslandOrder::LargestFirst);
        assert_eq!(config.latency.swap, 1);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_yaml_file_with_partial_fields() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(
            file,
            "limits:\n  mapper_call_limit: 0\nisland_order: discovery\nlatency:\n  swap: 3"
        )
        .unwrap();

        let config = MapperConfig::from_file(file.path()).unwrap();
        assert_eq!(config.limits.mapper_budget(), None);
        assert_eq!(config.limits.swap_budget(), Some(2_000_000));
        assert_eq!(config.island_order, IslandOrder::Discovery);
        assert_eq!(config.latency.swap, 3);
        assert_eq!(config.latency.single, 1);
    }

    #[test]
    fn test_json_file() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"limits": {{"swap_node_limit": 10}}}}"#).unwrap();

        let config = MapperConfig::from_file(file.path()).unwrap();
        assert_eq!(config.limits.swap_budget(), Some(10));
    }

    #[test]
    fn test_zero_latency_rejected() {
        let mut config = MapperConfig::default();
        config.latency.two = 0;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::ValidationError(_))
        ));
    }

    #[test]
    fn test_env_overrides() {
        let env = |key: &str| match key {
            "SKEIN_MAPPER_CALL_LIMIT" => Some("500".to_string()),
            "SKEIN_ISLAND_ORDER" => Some("Discovery".to_string()),
            _ => None,
        };
        let config = MapperConfig::default().merge_env_with(env).unwrap();
        assert_eq!(config.limits.mapper_call_limit, 500);
        assert_eq!(config.limits.swap_node_limit, 2_000_000);
        assert_eq!(config.island_order, IslandOrder::Discovery);

        let bad = |key: &str| (key == "SKEIN_SWAP_NODE_LIMIT").then(|| "many".to_string());
        assert!(MapperConfig::default().merge_env_with(bad).is_err());
    }

    #[test]
    fn test_missing_file() {
        assert!(matches!(
            MapperConfig::from_file("/nonexistent/skein.yaml"),
            Err(ConfigError::IoError(_))
        ));
    }
}
