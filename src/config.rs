//! vialctl configuration file
//!
//! Optional TOML file. Every field has a default, so a missing file or a
//! partial one is fine. Command-line flags override what the file says.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use vial_transport::protocol::timing::DEFAULT_TIMEOUT_MS;
use vial_transport::{HidDiscovery, TransportConfig};

/// Default tracing filter when neither `RUST_LOG` nor `-v` say otherwise
pub const DEFAULT_LOG: &str = "vialctl=info,vial_keyboard=info,vial_transport=info";

/// Which keyboard to open when several are plugged in
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceFilter {
    pub vid: Option<u16>,
    pub pid: Option<u16>,
    /// hidraw path, e.g. `/dev/hidraw3`
    pub path: Option<String>,
}

impl DeviceFilter {
    /// Discovery restricted to this filter
    pub fn discovery(&self) -> HidDiscovery {
        let mut discovery = HidDiscovery::new();
        if let Some(vid) = self.vid {
            discovery = discovery.with_vid(vid);
        }
        if let Some(pid) = self.pid {
            discovery = discovery.with_pid(pid);
        }
        if let Some(path) = &self.path {
            discovery = discovery.with_path(path.clone());
        }
        discovery
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Reply timeout per request
    pub timeout_ms: u64,
    /// Tracing filter directives
    pub log: String,
    /// Vendor extension command id to probe at connect time
    pub vendor_probe: Option<u8>,
    pub device: DeviceFilter,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            timeout_ms: DEFAULT_TIMEOUT_MS,
            log: DEFAULT_LOG.to_string(),
            vendor_probe: None,
            device: DeviceFilter::default(),
        }
    }
}

impl Config {
    /// `$XDG_CONFIG_HOME/vialctl/config.toml`, falling back to `~/.config`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".config")))
            .unwrap_or_else(|| PathBuf::from("."))
            .join("vialctl")
            .join("config.toml")
    }

    /// Load config from a file, or return default if not found
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        if path.exists() {
            let content = std::fs::read_to_string(path)?;
            Self::parse(&content)
                .map_err(|e| anyhow::anyhow!("{}: {e}", path.display()))
        } else {
            Ok(Self::default())
        }
    }

    /// Load the file named on the command line, or the default one.
    ///
    /// An explicitly named file must exist.
    pub fn resolve(explicit: Option<&Path>) -> anyhow::Result<Self> {
        match explicit {
            Some(path) if !path.exists() => {
                anyhow::bail!("config file {} does not exist", path.display())
            }
            Some(path) => Self::load(path),
            None => Self::load(&Self::default_path()),
        }
    }

    pub fn parse(content: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(content)?)
    }

    /// Apply command-line overrides
    pub fn with_overrides(mut self, timeout_ms: Option<u64>, device: Option<String>) -> Self {
        if let Some(ms) = timeout_ms {
            self.timeout_ms = ms;
        }
        if let Some(path) = device {
            self.device.path = Some(path);
        }
        self
    }

    /// Tracing filter for the given `-v` count
    pub fn log_directive(&self, verbose: u8) -> String {
        match verbose {
            0 => self.log.clone(),
            1 => "vialctl=debug,vial_keyboard=debug,vial_transport=info".to_string(),
            _ => "vialctl=trace,vial_keyboard=trace,vial_transport=trace".to_string(),
        }
    }

    pub fn transport_config(&self) -> TransportConfig {
        TransportConfig {
            timeout: Duration::from_millis(self.timeout_ms),
            ..TransportConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_full_file() {
        let config = Config::parse(
            r#"
timeout_ms = 250
log = "vialctl=debug"
vendor_probe = 0xFD

[device]
vid = 0x4653
pid = 0x0001
path = "/dev/hidraw3"
"#,
        )
        .unwrap();

        assert_eq!(config.timeout_ms, 250);
        assert_eq!(config.log, "vialctl=debug");
        assert_eq!(config.vendor_probe, Some(0xFD));
        assert_eq!(config.device.vid, Some(0x4653));
        assert_eq!(config.device.pid, Some(1));
        assert_eq!(config.device.path.as_deref(), Some("/dev/hidraw3"));
        assert_eq!(config.transport_config().timeout, Duration::from_millis(250));
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config = Config::parse("[device]\nvid = 0xFEED\n").unwrap();
        assert_eq!(config.timeout_ms, DEFAULT_TIMEOUT_MS);
        assert_eq!(config.log, DEFAULT_LOG);
        assert_eq!(config.vendor_probe, None);
        assert_eq!(config.device.vid, Some(0xFEED));
        assert_eq!(config.device.path, None);

        assert_eq!(Config::parse("").unwrap(), Config::default());
    }

    #[test]
    fn test_bad_values_rejected() {
        assert!(Config::parse("timeout_ms = \"fast\"").is_err());
        // Command ids are one byte
        assert!(Config::parse("vendor_probe = 0x1FD").is_err());
    }

    #[test]
    fn test_roundtrip() {
        let config = Config {
            timeout_ms: 2000,
            vendor_probe: Some(0xFD),
            device: DeviceFilter {
                vid: Some(0x4653),
                pid: None,
                path: None,
            },
            ..Config::default()
        };
        let toml_str = toml::to_string_pretty(&config).unwrap();
        assert_eq!(Config::parse(&toml_str).unwrap(), config);
    }

    #[test]
    fn test_overrides() {
        let config = Config::default().with_overrides(Some(50), Some("/dev/hidraw9".into()));
        assert_eq!(config.timeout_ms, 50);
        assert_eq!(config.device.path.as_deref(), Some("/dev/hidraw9"));

        let untouched = Config::default().with_overrides(None, None);
        assert_eq!(untouched, Config::default());
    }

    #[test]
    fn test_log_directive() {
        let config = Config::default();
        assert_eq!(config.log_directive(0), DEFAULT_LOG);
        assert!(config.log_directive(1).contains("vialctl=debug"));
        assert!(config.log_directive(3).contains("vial_transport=trace"));
    }

    #[test]
    fn test_load_missing_and_present() {
        let dir = std::env::temp_dir().join(format!("vialctl-config-{}", std::process::id()));
        let path = dir.join("config.toml");
        assert_eq!(Config::load(&path).unwrap(), Config::default());
        assert!(Config::resolve(Some(&path)).is_err());

        let config = Config {
            timeout_ms: 777,
            ..Config::default()
        };
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(&path, toml::to_string_pretty(&config).unwrap()).unwrap();
        assert_eq!(Config::resolve(Some(&path)).unwrap(), config);

        std::fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_default_path_layout() {
        let path = Config::default_path();
        assert!(path.ends_with("vialctl/config.toml"));
    }
}
