//! # lightsond — presence-driven lights daemon
//!
//! Composition root that wires the trigger engine to its collaborators and
//! runs it until interrupted.
//!
//! ## Responsibilities
//! - Load configuration (`lightson.toml`, env vars)
//! - Install the `tracing` subscriber
//! - Construct the bridge and router adapters
//! - Build the hook chain and the presence poller
//! - Start the engine; an unknown scene aborts startup
//! - Stop the engine on Ctrl-C, dropping any pending power-off
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use lightson_adapter_virtual::{VirtualBridge, VirtualRouter};
use lightson_app::hooks::{HookChain, TimeWindowHook};
use lightson_app::presence_poller::PresencePoller;
use lightson_app::trigger_engine::TriggerEngine;
use tracing_subscriber::EnvFilter;

use crate::config::{Config, VirtualConfig};

const NOTIFICATION_CAPACITY: usize = 64;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_new(&config.logging.filter)?)
        .init();

    let trigger = config.trigger_config()?;

    // Adapters
    let bridge = build_bridge(&config.virtual_home);
    let router = Arc::new(VirtualRouter::with_attached(config.connected_devices()?));

    // Hooks
    let mut hooks = HookChain::new();
    if let Some(window) = config.time_window()? {
        tracing::info!(%window, "activation limited to time window");
        hooks.push(TimeWindowHook::new(window));
    }
    if hooks.is_empty() {
        tracing::info!("no activation hooks configured");
    }

    // Engine
    let poller = PresencePoller::new(router, NOTIFICATION_CAPACITY);
    let handle = TriggerEngine::new(trigger, bridge, hooks)
        .start(&poller)
        .await?;

    tokio::signal::ctrl_c().await?;
    tracing::info!("shutting down");
    handle.stop().await;

    Ok(())
}

fn build_bridge(layout: &VirtualConfig) -> VirtualBridge {
    let bridge = layout
        .lights
        .iter()
        .fold(VirtualBridge::new(), |bridge, name| bridge.with_light(name));

    layout.scenes.iter().fold(bridge, |bridge, scene| {
        let lights: Vec<&str> = scene.lights.iter().map(String::as_str).collect();
        bridge.with_scene(&scene.name, &lights)
    })
}
