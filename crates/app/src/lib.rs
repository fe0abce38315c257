//! # lightson-app
//!
//! Application layer — the debounced trigger engine and **port definitions** (traits).
//!
//! ## Responsibilities
//! - Define **port traits** that adapters must implement:
//!   - `LightsActuator` — query lights, find/recall scenes, power everything off
//!   - `PresenceSource` — stream of devices joining/leaving the network
//!   - `ConnectedDevices` — snapshot of attached devices (router-like)
//! - Provide the **trigger engine** that turns presence into lights off / scene recall
//! - Provide the building blocks it owns: the **cancelable delay** and the
//!   **precondition hook chain**
//! - Provide **in-process infrastructure** (the presence poller) that doesn't need IO
//!
//! ## Dependency rule
//! Depends on `lightson-domain` only (plus `tokio` for tasks, timers and channels).
//! Never imports adapter crates. Adapters depend on *this* crate, not the reverse.

pub mod delay;
pub mod hooks;
pub mod ports;
pub mod presence_poller;
pub mod trigger_engine;
