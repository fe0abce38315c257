//! Trigger configuration — which device drives which scene, and how fast.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::device::DeviceKey;
use crate::error::{LightsOnError, ValidationError};

/// Upper bound for both the poll and the debounce interval (one week).
pub const MAX_INTERVAL: Duration = Duration::from_secs(7 * 24 * 60 * 60);

/// Immutable settings for one presence-driven lights trigger.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TriggerConfig {
    /// Device whose presence turns the lights on and off.
    pub watched: DeviceKey,
    /// Bridge scene recalled when the device comes home.
    pub scene_name: String,
    /// Time between two router queries.
    pub poll_interval: Duration,
    /// How long the device must stay away before the lights go off. Also
    /// the window after a disconnect during which the scene is never
    /// recalled.
    pub debounce_interval: Duration,
}

impl TriggerConfig {
    /// Create a builder for constructing a [`TriggerConfig`].
    #[must_use]
    pub fn builder() -> TriggerConfigBuilder {
        TriggerConfigBuilder::default()
    }

    /// Check domain invariants.
    ///
    /// # Errors
    ///
    /// Returns [`LightsOnError::Validation`] when:
    /// - `scene_name` is blank ([`ValidationError::EmptySceneName`])
    /// - `poll_interval` is zero ([`ValidationError::ZeroPollInterval`])
    /// - either interval exceeds [`MAX_INTERVAL`]
    ///   ([`ValidationError::IntervalTooLong`])
    pub fn validate(&self) -> Result<(), LightsOnError> {
        if self.scene_name.trim().is_empty() {
            return Err(ValidationError::EmptySceneName.into());
        }
        if self.poll_interval.is_zero() {
            return Err(ValidationError::ZeroPollInterval.into());
        }
        for (which, interval) in [
            ("poll", self.poll_interval),
            ("debounce", self.debounce_interval),
        ] {
            if interval > MAX_INTERVAL {
                return Err(ValidationError::IntervalTooLong {
                    which,
                    max_secs: MAX_INTERVAL.as_secs(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Step-by-step builder for [`TriggerConfig`].
#[derive(Debug)]
pub struct TriggerConfigBuilder {
    watched: Option<DeviceKey>,
    scene_name: Option<String>,
    poll_interval: Duration,
    debounce_interval: Duration,
}

impl Default for TriggerConfigBuilder {
    fn default() -> Self {
        Self {
            watched: None,
            scene_name: None,
            poll_interval: Duration::from_secs(5),
            debounce_interval: Duration::from_secs(300),
        }
    }
}

impl TriggerConfigBuilder {
    #[must_use]
    pub fn watched(mut self, watched: DeviceKey) -> Self {
        self.watched = Some(watched);
        self
    }

    #[must_use]
    pub fn scene_name(mut self, scene_name: impl Into<String>) -> Self {
        self.scene_name = Some(scene_name.into());
        self
    }

    #[must_use]
    pub fn poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    #[must_use]
    pub fn debounce_interval(mut self, debounce_interval: Duration) -> Self {
        self.debounce_interval = debounce_interval;
        self
    }

    /// Consume the builder, validate, and return a [`TriggerConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`LightsOnError::Validation`] if the device is missing or
    /// any invariant checked by [`TriggerConfig::validate`] fails.
    pub fn build(self) -> Result<TriggerConfig, LightsOnError> {
        let config = TriggerConfig {
            watched: self.watched.ok_or(ValidationError::MissingDevice)?,
            scene_name: self.scene_name.unwrap_or_default(),
            poll_interval: self.poll_interval,
            debounce_interval: self.debounce_interval,
        };
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key() -> DeviceKey {
        DeviceKey::from_bytes([0xA4, 0xC1, 0x38, 0x5B, 0x0E, 0xDF])
    }

    #[test]
    fn should_build_with_defaults() {
        let config = TriggerConfig::builder()
            .watched(key())
            .scene_name("Evening")
            .build()
            .unwrap();
        assert_eq!(config.poll_interval, Duration::from_secs(5));
        assert_eq!(config.debounce_interval, Duration::from_secs(300));
    }

    #[test]
    fn should_reject_missing_device() {
        let result = TriggerConfig::builder().scene_name("Evening").build();
        assert!(matches!(
            result,
            Err(LightsOnError::Validation(ValidationError::MissingDevice))
        ));
    }

    #[test]
    fn should_reject_blank_scene_name() {
        let result = TriggerConfig::builder()
            .watched(key())
            .scene_name("  ")
            .build();
        assert!(matches!(
            result,
            Err(LightsOnError::Validation(ValidationError::EmptySceneName))
        ));
    }

    #[test]
    fn should_reject_zero_poll_interval() {
        let result = TriggerConfig::builder()
            .watched(key())
            .scene_name("Evening")
            .poll_interval(Duration::ZERO)
            .build();
        assert!(matches!(
            result,
            Err(LightsOnError::Validation(ValidationError::ZeroPollInterval))
        ));
    }

    #[test]
    fn should_accept_zero_debounce_interval() {
        let config = TriggerConfig::builder()
            .watched(key())
            .scene_name("Evening")
            .debounce_interval(Duration::ZERO)
            .build()
            .unwrap();
        assert!(config.debounce_interval.is_zero());
    }

    #[test]
    fn should_reject_debounce_interval_beyond_one_week() {
        let result = TriggerConfig::builder()
            .watched(key())
            .scene_name("Evening")
            .debounce_interval(Duration::from_secs(u64::MAX))
            .build();
        assert!(matches!(
            result,
            Err(LightsOnError::Validation(ValidationError::IntervalTooLong {
                which: "debounce",
                ..
            }))
        ));
    }

    #[test]
    fn should_reject_poll_interval_beyond_one_week() {
        let result = TriggerConfig::builder()
            .watched(key())
            .scene_name("Evening")
            .poll_interval(MAX_INTERVAL + Duration::from_secs(1))
            .build();
        assert!(result.is_err());

        let config = TriggerConfig::builder()
            .watched(key())
            .scene_name("Evening")
            .poll_interval(MAX_INTERVAL)
            .debounce_interval(MAX_INTERVAL)
            .build();
        assert!(config.is_ok());
    }
}
