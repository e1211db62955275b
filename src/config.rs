use crate::error::{Result, ZoneForgeError};
use crate::model::RecordType;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Engine configuration. Loadable from a TOML file or environment
/// variables; injected into [`crate::ZoneDataEngine`] at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name of the domain template applied to reverse zones that are
    /// auto-created for A records, when the source domain carries no
    /// `reverse_template` override. Unsetting it makes PTR synthesis
    /// into nonexistent reverse zones a configuration error.
    pub default_reverse_template: Option<String>,

    /// TTL applied to records saved without one.
    pub default_ttl: u32,

    /// When set, restricts the record types the engine accepts.
    pub allowed_record_types: Option<Vec<RecordType>>,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_reverse_template: Some("reverse".to_string()),
            default_ttl: 3600,
            allowed_record_types: None,
        }
    }
}

impl EngineConfig {
    /// Build a configuration from `ZONEFORGE_*` environment variables,
    /// starting from the defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();

        if let Ok(name) = std::env::var("ZONEFORGE_DEFAULT_REVERSE_TEMPLATE") {
            config.default_reverse_template = if name.is_empty() { None } else { Some(name) };
        }

        if let Ok(ttl) = std::env::var("ZONEFORGE_DEFAULT_TTL") {
            config.default_ttl = ttl
                .parse()
                .map_err(|_| ZoneForgeError::ConfigParse(format!("invalid default TTL: {}", ttl)))?;
        }

        if let Ok(types) = std::env::var("ZONEFORGE_RECORD_TYPES") {
            let parsed: std::result::Result<Vec<RecordType>, String> = types
                .split(',')
                .map(|s| s.trim().parse::<RecordType>())
                .collect();
            config.allowed_record_types = Some(parsed.map_err(ZoneForgeError::ConfigParse)?);
        }

        config.validate()?;
        Ok(config)
    }

    /// Load a configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ZoneForgeError::ConfigParse(e.to_string()))?;
        let config: Self =
            toml::from_str(&raw).map_err(|e| ZoneForgeError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.default_ttl == 0 {
            return Err(ZoneForgeError::ConfigInvalid(
                "default TTL must be greater than 0".to_string(),
            ));
        }
        if let Some(types) = &self.allowed_record_types {
            if types.is_empty() {
                return Err(ZoneForgeError::ConfigInvalid(
                    "allowed record types must not be empty".to_string(),
                ));
            }
        }
        Ok(())
    }
}
