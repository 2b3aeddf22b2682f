//! Engine configuration.

use serde::{Deserialize, Serialize};

/// Configuration for workflow execution.
///
/// All fields carry serde defaults so a partial config file (or `{}`)
/// deserializes into working settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Timeout per node in milliseconds. A node exceeding it aborts the
    /// run (same class as a transport failure).
    #[serde(default = "default_node_timeout_ms")]
    pub node_timeout_ms: u64,

    /// Maximum routing steps before the run is abandoned as a routing bug.
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    /// Number of ad variations the copywriter requests.
    #[serde(default = "default_copy_variations")]
    pub copy_variations: u8,
}

fn default_node_timeout_ms() -> u64 {
    60_000
}

fn default_max_steps() -> u32 {
    16
}

fn default_copy_variations() -> u8 {
    4
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            node_timeout_ms: default_node_timeout_ms(),
            max_steps: default_max_steps(),
            copy_variations: default_copy_variations(),
        }
    }
}

impl EngineConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_node_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.node_timeout_ms = timeout_ms;
        self
    }

    #[must_use]
    pub fn with_max_steps(mut self, max_steps: u32) -> Self {
        self.max_steps = max_steps;
        self
    }

    #[must_use]
    pub fn with_copy_variations(mut self, variations: u8) -> Self {
        self.copy_variations = variations;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_config_deserializes_to_defaults() {
        let config: EngineConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config.node_timeout_ms, 60_000);
        assert_eq!(config.max_steps, 16);
        assert_eq!(config.copy_variations, 4);
    }

    #[test]
    fn builder_overrides_defaults() {
        let config = EngineConfig::new()
            .with_node_timeout_ms(5_000)
            .with_max_steps(8)
            .with_copy_variations(3);
        assert_eq!(config.node_timeout_ms, 5_000);
        assert_eq!(config.max_steps, 8);
        assert_eq!(config.copy_variations, 3);
    }
}
