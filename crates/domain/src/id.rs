//! Bridge-assigned identifiers.
//!
//! Lighting bridges hand out their own opaque ids (`"1"`, `"7"`,
//! `"k3Zp9QmLx2"`). They are kept as given; lightson never mints them.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! bridge_id {
    ($(#[doc = $doc:expr])* $name:ident) => {
        $(#[doc = $doc])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            #[must_use]
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            #[must_use]
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl From<&str> for $name {
            fn from(id: &str) -> Self {
                Self::new(id)
            }
        }

        impl From<String> for $name {
            fn from(id: String) -> Self {
                Self(id)
            }
        }
    };
}

bridge_id!(
    /// Bridge id of a [`LightState`](crate::light::LightState).
    LightId
);

bridge_id!(
    /// Bridge id of a [`Scene`](crate::light::Scene).
    SceneId
);
