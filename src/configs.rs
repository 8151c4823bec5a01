//! Application configuration.
//!
//! All fixed organization fields, key sizes, and validity periods live here
//! as an explicit configuration struct passed into each component, loaded
//! from an optional TOML file. Every field has a documented default so a
//! missing or partial config file still yields a working setup.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Default configuration file looked up in the working directory
pub const DEFAULT_CONFIG_FILE: &str = "pki-domains.toml";

#[derive(Debug, Deserialize, Clone, Default)]
pub struct AppConfig {
    /// Base directory all domain trees live under
    #[serde(default)]
    pub layout: LayoutConfig,
    /// Distinguished-name fields shared by every generated certificate
    #[serde(default)]
    pub subject: SubjectDefaults,
    /// Key sizes and validity periods per tier
    #[serde(default)]
    pub policy: CaPolicy,
}

#[derive(Debug, Deserialize, Clone)]
pub struct LayoutConfig {
    #[serde(default = "default_base_dir")]
    pub base_dir: PathBuf,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            base_dir: default_base_dir(),
        }
    }
}

fn default_base_dir() -> PathBuf {
    PathBuf::from("domains")
}

/// Subject fields used for every certificate in the hierarchy.
///
/// The common name is never configured here: it is derived per tier
/// (`Root CA.<domain>`, `Intermediate CA.<domain>`, or the host FQDN).
#[derive(Debug, Deserialize, Clone)]
pub struct SubjectDefaults {
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_state")]
    pub state: String,
    #[serde(default = "default_locality")]
    pub locality: String,
    #[serde(default = "default_organization")]
    pub organization: String,
    #[serde(default = "default_organizational_unit")]
    pub organizational_unit: String,
}

impl Default for SubjectDefaults {
    fn default() -> Self {
        Self {
            country: default_country(),
            state: default_state(),
            locality: default_locality(),
            organization: default_organization(),
            organizational_unit: default_organizational_unit(),
        }
    }
}

fn default_country() -> String {
    "US".to_string()
}

fn default_state() -> String {
    "California".to_string()
}

fn default_locality() -> String {
    "San Francisco".to_string()
}

fn default_organization() -> String {
    "Example Corp".to_string()
}

fn default_organizational_unit() -> String {
    "PKI".to_string()
}

/// Key sizes and validity periods for each tier of the hierarchy
#[derive(Debug, Deserialize, Clone)]
pub struct CaPolicy {
    #[serde(default = "default_root_validity")]
    pub root_validity_days: u32,
    #[serde(default = "default_intermediate_validity")]
    pub intermediate_validity_days: u32,
    #[serde(default = "default_host_validity")]
    pub host_validity_days: u32,
    #[serde(default = "default_ca_key_bits")]
    pub root_key_bits: u32,
    #[serde(default = "default_ca_key_bits")]
    pub intermediate_key_bits: u32,
    #[serde(default = "default_host_key_bits")]
    pub host_key_bits: u32,
}

impl Default for CaPolicy {
    fn default() -> Self {
        Self {
            root_validity_days: default_root_validity(),
            intermediate_validity_days: default_intermediate_validity(),
            host_validity_days: default_host_validity(),
            root_key_bits: default_ca_key_bits(),
            intermediate_key_bits: default_ca_key_bits(),
            host_key_bits: default_host_key_bits(),
        }
    }
}

fn default_root_validity() -> u32 {
    3650 // 10 years
}

fn default_intermediate_validity() -> u32 {
    1825 // 5 years
}

fn default_host_validity() -> u32 {
    825
}

fn default_ca_key_bits() -> u32 {
    4096
}

fn default_host_key_bits() -> u32 {
    2048
}

impl AppConfig {
    /// Load configuration from a TOML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let config_str = fs::read_to_string(path)
            .context(format!("Failed to read config file: {}", path.display()))?;

        let config: AppConfig =
            toml::from_str(&config_str).context("Failed to parse config file")?;

        Ok(config)
    }

    /// Load configuration from the default path, falling back to built-in
    /// defaults when no config file exists
    pub fn load() -> Result<Self> {
        let path = Path::new(DEFAULT_CONFIG_FILE);
        if path.exists() {
            Self::from_file(path)
        } else {
            Ok(Self::default())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.layout.base_dir, PathBuf::from("domains"));
        assert_eq!(config.policy.root_validity_days, 3650);
        assert_eq!(config.policy.intermediate_validity_days, 1825);
        assert_eq!(config.policy.host_validity_days, 825);
        assert_eq!(config.policy.root_key_bits, 4096);
        assert_eq!(config.policy.host_key_bits, 2048);
        assert_eq!(config.subject.country, "US");
    }

    #[test]
    fn test_partial_config_fills_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [subject]
            organization = "Acme Labs"

            [policy]
            host_validity_days = 90
            "#,
        )
        .unwrap();

        assert_eq!(config.subject.organization, "Acme Labs");
        assert_eq!(config.subject.country, "US");
        assert_eq!(config.policy.host_validity_days, 90);
        assert_eq!(config.policy.root_key_bits, 4096);
    }
}
