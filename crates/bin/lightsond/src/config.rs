//! Configuration loading — TOML file with environment variable overrides.
//!
//! Looks for `lightson.toml` in the working directory. Timings and logging
//! have defaults, but the watched device and the scene name must come from
//! the file or the environment. Environment variables take precedence over
//! file values.

use std::time::Duration;

use serde::Deserialize;

use lightson_domain::device::DeviceKey;
use lightson_domain::time::TimeWindow;
use lightson_domain::trigger::TriggerConfig;

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Which device drives which scene.
    pub trigger: TriggerSection,
    /// Optional activation preconditions.
    pub hooks: HooksConfig,
    /// Logging settings.
    pub logging: LoggingConfig,
    /// Layout of the simulated bridge and router.
    #[serde(rename = "virtual")]
    pub virtual_home: VirtualConfig,
}

/// `[trigger]` section.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct TriggerSection {
    /// Hardware address of the watched device (`AA:BB:CC:DD:EE:FF`).
    pub device: Option<String>,
    /// Bridge scene to recall on arrival.
    pub scene: String,
    pub poll_interval_secs: u64,
    pub debounce_secs: u64,
}

/// `[hooks]` section. A time window needs both bounds.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    /// Start of the allowed window, `HH:MM` local time.
    pub after: Option<String>,
    /// End of the allowed window, `HH:MM` local time.
    pub before: Option<String>,
}

/// Logging configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Filter directive (`RUST_LOG` syntax).
    pub filter: String,
}

/// `[virtual]` section.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct VirtualConfig {
    /// Light names, all initially off.
    pub lights: Vec<String>,
    pub scenes: Vec<SceneConfig>,
    /// Devices attached to the router at startup.
    pub connected: Vec<String>,
}

/// One `[[virtual.scenes]]` entry.
#[derive(Debug, Deserialize)]
pub struct SceneConfig {
    pub name: String,
    #[serde(default)]
    pub lights: Vec<String>,
}

impl Config {
    /// Load configuration from `lightson.toml` (if present), apply
    /// environment-variable overrides, then validate.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML file exists but is malformed, or if the
    /// resulting configuration is invalid.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::from_file("lightson.toml")?;
        config.apply_env_overrides();
        config.validate()?;
        Ok(config)
    }

    fn from_file(path: &str) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(content) => toml::from_str(&content).map_err(ConfigError::Parse),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(err) => Err(ConfigError::Io(err)),
        }
    }

    fn apply_env_overrides(&mut self) {
        self.apply_overrides(|key| std::env::var(key).ok());
    }

    /// Unparseable numeric overrides are ignored.
    fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(val) = lookup("LIGHTSON_DEVICE") {
            self.trigger.device = Some(val);
        }
        if let Some(val) = lookup("LIGHTSON_SCENE") {
            self.trigger.scene = val;
        }
        if let Some(val) = lookup("LIGHTSON_POLL_INTERVAL_SECS") {
            if let Ok(secs) = val.parse() {
                self.trigger.poll_interval_secs = secs;
            }
        }
        if let Some(val) = lookup("LIGHTSON_DEBOUNCE_SECS") {
            if let Ok(secs) = val.parse() {
                self.trigger.debounce_secs = secs;
            }
        }
        if let Some(val) = lookup("LIGHTSON_LOG") {
            self.logging.filter = val;
        }
        if let Some(val) = lookup("RUST_LOG") {
            self.logging.filter = val;
        }
    }

    fn validate(&self) -> Result<(), ConfigError> {
        self.trigger_config()?;
        self.time_window()?;
        self.connected_devices()?;
        Ok(())
    }

    /// Build the engine's [`TriggerConfig`] from the `[trigger]` section.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if the device is missing or
    /// malformed, the scene is blank, the poll interval is zero, or an
    /// interval is longer than a week.
    pub fn trigger_config(&self) -> Result<TriggerConfig, ConfigError> {
        let device = self
            .trigger
            .device
            .as_deref()
            .ok_or_else(|| ConfigError::Validation("trigger.device is required".to_string()))?;
        let watched = parse_device(device)?;

        TriggerConfig::builder()
            .watched(watched)
            .scene_name(self.trigger.scene.clone())
            .poll_interval(Duration::from_secs(self.trigger.poll_interval_secs))
            .debounce_interval(Duration::from_secs(self.trigger.debounce_secs))
            .build()
            .map_err(|err| ConfigError::Validation(err.to_string()))
    }

    /// The `[hooks]` time window, if one is configured.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] if only one bound is set or a
    /// bound is not `HH:MM`.
    pub fn time_window(&self) -> Result<Option<TimeWindow>, ConfigError> {
        match (&self.hooks.after, &self.hooks.before) {
            (None, None) => Ok(None),
            (Some(after), Some(before)) => TimeWindow::parse(after, before)
                .map(Some)
                .map_err(|err| ConfigError::Validation(err.to_string())),
            _ => Err(ConfigError::Validation(
                "hooks.after and hooks.before must be set together".to_string(),
            )),
        }
    }

    /// Devices attached to the virtual router at startup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] for a malformed address.
    pub fn connected_devices(&self) -> Result<Vec<DeviceKey>, ConfigError> {
        self.virtual_home
            .connected
            .iter()
            .map(String::as_str)
            .map(parse_device)
            .collect()
    }
}

fn parse_device(value: &str) -> Result<DeviceKey, ConfigError> {
    value
        .parse::<DeviceKey>()
        .map_err(|err| ConfigError::Validation(err.to_string()))
}

impl Default for TriggerSection {
    fn default() -> Self {
        Self {
            device: None,
            scene: String::new(),
            poll_interval_secs: 5,
            debounce_secs: 300,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            filter: "lightsond=info,lightson_app=info".to_string(),
        }
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// TOML parse failure.
    #[error("failed to parse config file")]
    Parse(#[from] toml::de::Error),
    /// File I/O failure.
    #[error("failed to read config file")]
    Io(#[from] std::io::Error),
    /// Semantic validation failure.
    #[error("invalid configuration: {0}")]
    Validation(String),
}
