//! # lightson-domain
//!
//! Pure domain model for the lightson presence-driven lighting trigger.
//!
//! ## Responsibilities
//! - Foundational types: bridge-assigned identifiers, error conventions, timestamps
//! - Define **Devices** (network clients keyed by hardware address)
//! - Define **Presence events** (a device appeared on / disappeared from the network)
//! - Define **Lights** and **Scenes** (what the bridge reports)
//! - Define the **Trigger configuration** and enforce its invariants
//!
//! ## Dependency rule
//! This crate has **no internal dependencies**.
//! It must never import anything from `app`, adapters, or external IO crates.
//! All IO boundaries are expressed as traits in the `app` crate (ports).

pub mod error;
pub mod id;
pub mod time;

pub mod device;
pub mod light;
pub mod presence;
pub mod trigger;
