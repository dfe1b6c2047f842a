//! confgrid.toml server configuration parser.
//!
//! ```toml
//! gateway_names = ["api-gateway", "gateway-helper"]
//! log_properties = false
//!
//! [additions]
//! "spring.cloud.config.allow-override" = true
//! ```

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::FlattenedProperties;

/// Process-wide, read-only settings injected into the config service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ServerConfig {
    /// Services that receive the shared route table on poll.
    pub gateway_names: Vec<String>,
    /// Log every resolved property set in full.
    pub log_properties: bool,
    /// Static properties appended to every poll response.
    pub additions: BTreeMap<String, serde_json::Value>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            gateway_names: vec!["api-gateway".to_string(), "gateway-helper".to_string()],
            log_properties: false,
            additions: BTreeMap::new(),
        }
    }
}

impl ServerConfig {
    pub fn from_file(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> anyhow::Result<Self> {
        let config: ServerConfig = toml::from_str(content)?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> anyhow::Result<String> {
        Ok(toml::to_string_pretty(self)?)
    }

    /// Whether `service` is gateway-class.
    pub fn is_gateway(&self, service: &str) -> bool {
        self.gateway_names.iter().any(|name| name == service)
    }

    /// Overlay the static additions onto `properties`.
    pub fn append_additions(&self, properties: &mut FlattenedProperties) {
        for (key, value) in &self.additions {
            properties.insert(key.clone(), value.clone());
        }
    }
}
