//! Configuration management for the eNodeB auto-configuration server

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AcsConfig {
    pub general: GeneralConfig,
    pub logging: LoggingConfig,
    pub registry: RegistryConfig,
    pub sas: SasConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneralConfig {
    pub node_id: String,
    pub description: String,
    /// Value written into `Device.ManagementServer.PeriodicInformInterval`
    /// during config post-processing.
    pub periodic_inform_interval: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: Option<String>,
    pub max_size: u64,
    pub max_files: u32,
    pub format: LogFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LogFormat {
    #[serde(rename = "json")]
    Json,
    #[serde(rename = "compact")]
    Compact,
    #[serde(rename = "full")]
    Full,
}

/// One declared (OUI, hardware version, software version) dispatch entry,
/// mapping an eNodeB's self-reported identity to a data-model/state-map key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryEntry {
    pub oui: String,
    pub hardware_version: String,
    pub software_version: String,
    pub model_key: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegistryConfig {
    pub entries: Vec<RegistryEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SasConfig {
    pub enabled: bool,
    /// 3GPP band number written into the CBRS radio parameters.
    pub band: u32,
    pub min_psd_dbm_per_mhz: f64,
    pub max_psd_dbm_per_mhz: f64,
    /// Seconds to hold a QRTB session idle after a post-reboot Inform before
    /// resuming provisioning.
    pub post_reboot_holdoff_secs: u64,
}

impl Default for SasConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            band: 48,
            min_psd_dbm_per_mhz: -137.0,
            max_psd_dbm_per_mhz: 37.0,
            post_reboot_holdoff_secs: 60,
        }
    }
}

impl AcsConfig {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: AcsConfig = toml::from_str(&contents)
            .map_err(|e| Error::configuration_error(format!("invalid TOML: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    pub fn load_from_env() -> Result<Self> {
        let settings = config::Config::builder().add_source(
            config::Environment::with_prefix("ACSD").separator("_"),
        );
        let config = settings.build()?;
        let acs_config: AcsConfig = config.try_deserialize()?;
        acs_config.validate()?;
        Ok(acs_config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sas.min_psd_dbm_per_mhz >= self.sas.max_psd_dbm_per_mhz {
            return Err(Error::configuration_error("invalid SAS PSD bounds"));
        }
        if self.registry.entries.is_empty() {
            return Err(Error::configuration_error(
                "registry must declare at least one device-model entry",
            ));
        }
        Ok(())
    }

    pub fn default_config() -> Self {
        Self {
            general: GeneralConfig {
                node_id: "enodebd-acs-1".to_string(),
                description: "LTE eNodeB auto-configuration server".to_string(),
                periodic_inform_interval: 60,
            },
            logging: LoggingConfig {
                level: "info".to_string(),
                file: Some("/var/log/enodebd-acs.log".to_string()),
                max_size: 100 * 1024 * 1024,
                max_files: 10,
                format: LogFormat::Json,
            },
            registry: RegistryConfig {
                entries: vec![
                    RegistryEntry {
                        oui: "48BF74".to_string(),
                        hardware_version: "A01".to_string(),
                        software_version: "BaiBS_RTS_3.1.6".to_string(),
                        model_key: "baicells_qafa".to_string(),
                    },
                    RegistryEntry {
                        oui: "48BF74".to_string(),
                        hardware_version: "E01".to_string(),
                        software_version: "BaiStation_V100R001C00B110SPC003".to_string(),
                        model_key: "baicells_qafb".to_string(),
                    },
                    RegistryEntry {
                        oui: "34ED0B".to_string(),
                        hardware_version: "A01".to_string(),
                        software_version: "BaiBS_QRTB_2.6.4".to_string(),
                        model_key: "baicells_qrtb".to_string(),
                    },
                ],
            },
            sas: SasConfig::default(),
        }
    }
}

impl Default for AcsConfig {
    fn default() -> Self {
        Self::default_config()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_validates() {
        assert!(AcsConfig::default_config().validate().is_ok());
    }

    #[test]
    fn rejects_inverted_psd_bounds() {
        let mut cfg = AcsConfig::default_config();
        cfg.sas.min_psd_dbm_per_mhz = 10.0;
        cfg.sas.max_psd_dbm_per_mhz = -10.0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_empty_registry() {
        let mut cfg = AcsConfig::default_config();
        cfg.registry.entries.clear();
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn round_trips_through_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("acsd.toml");
        let cfg = AcsConfig::default_config();
        std::fs::write(&path, toml::to_string_pretty(&cfg).unwrap()).unwrap();
        let loaded = AcsConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded.general.node_id, cfg.general.node_id);
    }
}
