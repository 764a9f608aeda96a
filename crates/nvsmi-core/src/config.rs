use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use crate::error::ConfigError;
use crate::scrape::{Scraper, DEFAULT_DEADLINE};
use crate::source::{DiagnosticSource, FixtureFile, SmiCommand, DEFAULT_SMI_PATH};

pub const DEFAULT_LISTEN_ADDRESS: &str = "0.0.0.0:9101";
pub const DEFAULT_FIXTURE_PATH: &str = "test.xml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AcquisitionMode {
    /// Run nvidia-smi on every scrape
    Live { program: PathBuf },
    /// Serve a captured document (`TEST_MODE=1`)
    Fixture { path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub listen_address: SocketAddr,
    pub mode: AcquisitionMode,
    pub scrape_timeout: Duration,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from any key lookup; `from_env` passes `std::env::var`.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let listen_raw =
            lookup("LISTEN_ADDRESS").unwrap_or_else(|| DEFAULT_LISTEN_ADDRESS.to_string());
        let listen_address = listen_raw
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                key: "LISTEN_ADDRESS",
                value: listen_raw.clone(),
                reason: e.to_string(),
            })?;

        let mode = if lookup("TEST_MODE").as_deref() == Some("1") {
            AcquisitionMode::Fixture {
                path: lookup("FIXTURE_PATH")
                    .unwrap_or_else(|| DEFAULT_FIXTURE_PATH.to_string())
                    .into(),
            }
        } else {
            AcquisitionMode::Live {
                program: lookup("NVIDIA_SMI_PATH")
                    .unwrap_or_else(|| DEFAULT_SMI_PATH.to_string())
                    .into(),
            }
        };

        let scrape_timeout = match lookup("SCRAPE_TIMEOUT_SECS") {
            None => DEFAULT_DEADLINE,
            Some(raw) => match raw.trim().parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                Ok(_) => {
                    return Err(ConfigError::Invalid {
                        key: "SCRAPE_TIMEOUT_SECS",
                        value: raw,
                        reason: "must be greater than zero".to_string(),
                    })
                }
                Err(e) => {
                    return Err(ConfigError::Invalid {
                        key: "SCRAPE_TIMEOUT_SECS",
                        value: raw,
                        reason: e.to_string(),
                    })
                }
            },
        };

        Ok(Self {
            listen_address,
            mode,
            scrape_timeout,
        })
    }

    pub fn is_test_mode(&self) -> bool {
        matches!(self.mode, AcquisitionMode::Fixture { .. })
    }

    /// The acquisition implementation selected by this config
    pub fn source(&self) -> Arc<dyn DiagnosticSource> {
        match &self.mode {
            AcquisitionMode::Live { program } => Arc::new(SmiCommand::new(program)),
            AcquisitionMode::Fixture { path } => Arc::new(FixtureFile::new(path)),
        }
    }

    pub fn scraper(&self) -> Scraper {
        Scraper::new(self.source(), self.scrape_timeout)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listen_address: SocketAddr::from(([0, 0, 0, 0], 9101)),
            mode: AcquisitionMode::Live {
                program: DEFAULT_SMI_PATH.into(),
            },
            scrape_timeout: DEFAULT_DEADLINE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup(&[])).unwrap();

        assert_eq!(config, Config::default());
        assert_eq!(config.listen_address.port(), 9101);
        assert!(!config.is_test_mode());
        assert_eq!(config.source().describe(), "/usr/bin/nvidia-smi -q -x");
    }

    #[test]
    fn test_test_mode_selects_fixture() {
        let config =
            Config::from_lookup(lookup(&[("TEST_MODE", "1"), ("FIXTURE_PATH", "/tmp/smi.xml")]))
                .unwrap();

        assert!(config.is_test_mode());
        assert_eq!(
            config.mode,
            AcquisitionMode::Fixture {
                path: "/tmp/smi.xml".into()
            }
        );
        assert_eq!(config.source().describe(), "fixture /tmp/smi.xml");
    }

    #[test]
    fn test_test_mode_requires_exactly_one() {
        for value in ["0", "true", "yes", ""] {
            let config = Config::from_lookup(lookup(&[("TEST_MODE", value)])).unwrap();
            assert!(!config.is_test_mode(), "TEST_MODE={value:?}");
        }
    }

    #[test]
    fn test_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("LISTEN_ADDRESS", "127.0.0.1:9400"),
            ("NVIDIA_SMI_PATH", "/opt/nvidia/bin/nvidia-smi"),
            ("SCRAPE_TIMEOUT_SECS", "3"),
        ]))
        .unwrap();

        assert_eq!(config.listen_address, "127.0.0.1:9400".parse::<SocketAddr>().unwrap());
        assert_eq!(config.scrape_timeout, Duration::from_secs(3));
        assert_eq!(
            config.mode,
            AcquisitionMode::Live {
                program: "/opt/nvidia/bin/nvidia-smi".into()
            }
        );
    }

    #[test]
    fn test_invalid_values() {
        assert!(Config::from_lookup(lookup(&[("LISTEN_ADDRESS", ":9101")])).is_err());
        assert!(Config::from_lookup(lookup(&[("SCRAPE_TIMEOUT_SECS", "0")])).is_err());
        assert!(Config::from_lookup(lookup(&[("SCRAPE_TIMEOUT_SECS", "soon")])).is_err());
    }
}
