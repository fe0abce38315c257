//! Device — a network client identified by its hardware address.
//!
//! Presence is tracked per [`DeviceKey`]: the router reports which keys are
//! attached, and the trigger watches exactly one of them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Hardware (MAC) address of a tracked device.
///
/// Parses `AA:BB:CC:DD:EE:FF` or `aa-bb-cc-dd-ee-ff`; always displays as
/// upper-case, colon-separated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DeviceKey([u8; 6]);

impl DeviceKey {
    /// Wrap raw address bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; 6]) -> Self {
        Self(bytes)
    }

    /// Access the raw address bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> [u8; 6] {
        self.0
    }
}

impl fmt::Display for DeviceKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [a, b, c, d, e, g] = self.0;
        write!(f, "{a:02X}:{b:02X}:{c:02X}:{d:02X}:{e:02X}:{g:02X}")
    }
}

impl FromStr for DeviceKey {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidDeviceKey(s.to_string());
        let mut bytes = [0_u8; 6];
        let mut parts = s.trim().split([':', '-']);
        for byte in &mut bytes {
            let part = parts.next().ok_or_else(invalid)?;
            if part.len() != 2 || !part.bytes().all(|b| b.is_ascii_hexdigit()) {
                return Err(invalid());
            }
            *byte = u8::from_str_radix(part, 16).map_err(|_| invalid())?;
        }
        if parts.next().is_some() {
            return Err(invalid());
        }
        Ok(Self(bytes))
    }
}

impl TryFrom<String> for DeviceKey {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<DeviceKey> for String {
    fn from(key: DeviceKey) -> Self {
        key.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn should_parse_colon_separated_address() {
        let key: DeviceKey = "a4:c1:38:5b:0e:df".parse().unwrap();
        assert_eq!(key.as_bytes(), [0xA4, 0xC1, 0x38, 0x5B, 0x0E, 0xDF]);
    }

    #[test]
    fn should_parse_dash_separated_address() {
        let key: DeviceKey = "A4-C1-38-5B-0E-DF".parse().unwrap();
        assert_eq!(key.to_string(), "A4:C1:38:5B:0E:DF");
    }

    #[test]
    fn should_reject_short_address() {
        let err = "A4:C1:38:5B:0E".parse::<DeviceKey>().unwrap_err();
        assert_eq!(
            err,
            ValidationError::InvalidDeviceKey("A4:C1:38:5B:0E".to_string())
        );
    }

    #[test]
    fn should_reject_long_address_and_bad_digits() {
        assert!("A4:C1:38:5B:0E:DF:00".parse::<DeviceKey>().is_err());
        assert!("A4:C1:38:5B:0E:ZZ".parse::<DeviceKey>().is_err());
        assert!("A4:C1:38:5B:0E:D".parse::<DeviceKey>().is_err());
    }

    #[test]
    fn should_serialize_as_display_string() {
        let key = DeviceKey::from_bytes([1, 2, 3, 4, 5, 0xAB]);
        let json = serde_json::to_string(&key).unwrap();
        assert_eq!(json, "\"01:02:03:04:05:AB\"");
        let parsed: DeviceKey = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, key);
    }
}
