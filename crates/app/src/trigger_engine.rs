//! Trigger engine — reacts to presence changes by switching the lights.
//!
//! The engine watches a single device. When it leaves the network the
//! lights are powered off, but only after a quiet period: a device that
//! drops off the Wi-Fi and comes straight back never causes a flicker.
//! When it joins, the configured scene is recalled, provided every light is
//! still off and every precondition hook agrees.
//!
//! ```text
//!                 Disappeared                      debounce elapsed
//!  Connected ─────────────────► PendingDeactivation ────────────────► Disconnected
//!      ▲                          │        ▲    │                         │
//!      │   Appeared (cancel)      │        └────┘ Disappeared (re-arm)    │
//!      └──────────────────────────┘                                       │
//!      ▲                          Appeared                                │
//!      └──────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All engine state lives in one spawned task that consumes notifications
//! in order, so two events can never race each other. Actuator calls run on
//! their own tasks and only see values captured when the decision was made.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::Instrument as _;

use lightson_domain::error::{LightsOnError, NotFoundError};
use lightson_domain::light::any_on;
use lightson_domain::presence::{PresenceChange, PresenceEvent};
use lightson_domain::trigger::TriggerConfig;

use crate::delay::{self, DelayHandle};
use crate::hooks::HookChain;
use crate::ports::{LightsActuator, PresenceNotification, PresenceSource};

/// What the engine decided to do with one presence event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Reaction {
    /// The event concerned another device.
    Ignored,
    /// A lights-off was scheduled. `replaced` is set when a still-pending
    /// lights-off was canceled to make room for it.
    DeactivationArmed { replaced: bool },
    /// An activation attempt was spawned. `canceled_deactivation` is set
    /// when a pending lights-off was suppressed.
    ActivationAttempted { canceled_deactivation: bool },
}

/// Result of one activation attempt. Only [`Recalled`](Self::Recalled)
/// touches the lights.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActivationOutcome {
    Recalled,
    /// The device reconnected before the debounce interval elapsed.
    WithinDebounce,
    /// Somebody already turned a light on by hand.
    LightsAlreadyOn,
    HookRejected,
    QueryFailed,
    RecallFailed,
}

#[derive(Debug)]
struct EngineState {
    /// Seeded with the startup instant, so no scene is recalled within one
    /// debounce interval of starting.
    last_disconnect_at: Instant,
    pending_deactivation: Option<DelayHandle>,
}

impl EngineState {
    fn starting_now() -> Self {
        Self {
            last_disconnect_at: Instant::now(),
            pending_deactivation: None,
        }
    }
}

/// Debounced presence → lights engine for one watched device.
pub struct TriggerEngine<A> {
    config: TriggerConfig,
    actuator: Arc<A>,
    hooks: Arc<HookChain>,
    state: EngineState,
}

impl<A> TriggerEngine<A>
where
    A: LightsActuator + 'static,
{
    /// Create an engine. Nothing happens until [`start`](Self::start).
    pub fn new(config: TriggerConfig, actuator: A, hooks: HookChain) -> Self {
        Self {
            config,
            actuator: Arc::new(actuator),
            hooks: Arc::new(hooks),
            state: EngineState::starting_now(),
        }
    }

    /// Validate the configuration against the bridge, subscribe to
    /// `source` and spawn the event loop.
    ///
    /// # Errors
    ///
    /// Returns [`LightsOnError::Validation`] for an invalid configuration,
    /// [`LightsOnError::NotFound`] when the configured scene does not exist
    /// on the bridge, or the bridge's own error if the lookup fails. All of
    /// these are fatal: no event is consumed.
    pub async fn start<S: PresenceSource>(
        mut self,
        source: &S,
    ) -> Result<EngineHandle, LightsOnError> {
        self.config.validate()?;

        let scene = self
            .actuator
            .find_scene_by_name(&self.config.scene_name)
            .await?
            .ok_or_else(|| NotFoundError {
                entity: "Scene",
                id: self.config.scene_name.clone(),
            })?;

        let span = tracing::info_span!(
            "trigger",
            module = "lightson",
            mac_address = %self.config.watched,
        );
        span.in_scope(|| {
            tracing::info!(
                scene = %scene.name,
                scene_id = %scene.id,
                poll_interval = ?self.config.poll_interval,
                debounce_interval = ?self.config.debounce_interval,
                hooks = self.hooks.len(),
                "listening for device connections"
            );
        });

        self.state.last_disconnect_at = Instant::now();
        let notifications = source.subscribe(self.config.poll_interval);
        let (stop_tx, stop_rx) = oneshot::channel();
        let task = tokio::spawn(self.run(notifications, stop_rx).instrument(span));

        Ok(EngineHandle {
            stop: stop_tx,
            task,
        })
    }

    async fn run(
        mut self,
        mut notifications: mpsc::Receiver<PresenceNotification>,
        mut stop: oneshot::Receiver<()>,
    ) {
        loop {
            tokio::select! {
                _ = &mut stop => {
                    tracing::info!("stop requested");
                    break;
                }
                notification = notifications.recv() => match notification {
                    Some(Ok(event)) => {
                        self.handle_event(&event);
                    }
                    Some(Err(err)) => {
                        tracing::debug!(%err, "ignoring failed presence notification");
                    }
                    None => {
                        tracing::warn!("presence source closed");
                        break;
                    }
                },
            }
        }
        self.shutdown();
    }

    /// Apply one presence event to the engine state.
    ///
    /// Returns immediately: lights-off is deferred on a [`DelayHandle`] and
    /// the activation attempt runs on its own task. Must be called from
    /// within a tokio runtime.
    pub fn handle_event(&mut self, event: &PresenceEvent) -> Reaction {
        if event.identity != self.config.watched {
            tracing::debug!(device = %event.identity, "ignoring unrelated device");
            return Reaction::Ignored;
        }

        tracing::info!(device_status = %event.change, "detected device status change");

        match event.change {
            PresenceChange::Disappeared => self.on_disappeared(),
            PresenceChange::Appeared => self.on_appeared(),
        }
    }

    fn on_disappeared(&mut self) -> Reaction {
        let disconnected_at = Instant::now();
        self.state.last_disconnect_at = disconnected_at;

        let replaced = self.cancel_pending_deactivation();
        let handle = delay::arm(
            self.config.debounce_interval,
            deactivate(Arc::clone(&self.actuator), disconnected_at).in_current_span(),
        );
        self.state.pending_deactivation = Some(handle);

        tracing::debug!(
            delay = ?self.config.debounce_interval,
            replaced,
            "lights off scheduled"
        );
        Reaction::DeactivationArmed { replaced }
    }

    fn on_appeared(&mut self) -> Reaction {
        let canceled_deactivation = self.cancel_pending_deactivation();
        if canceled_deactivation {
            tracing::info!("device came back, lights off canceled");
        }

        let attempt = ActivationAttempt {
            actuator: Arc::clone(&self.actuator),
            hooks: Arc::clone(&self.hooks),
            scene_name: self.config.scene_name.clone(),
            debounce_interval: self.config.debounce_interval,
            disconnected_for: self.state.last_disconnect_at.elapsed(),
        };
        tokio::spawn(
            async move {
                attempt.run().await;
            }
            .in_current_span(),
        );

        Reaction::ActivationAttempted {
            canceled_deactivation,
        }
    }

    fn cancel_pending_deactivation(&mut self) -> bool {
        self.state
            .pending_deactivation
            .take()
            .is_some_and(|pending| pending.cancel())
    }

    fn shutdown(&mut self) {
        if self.cancel_pending_deactivation() {
            tracing::info!("pending lights off dropped on shutdown");
        }
        tracing::info!("trigger engine stopped");
    }
}

/// Handle to a running engine.
///
/// Dropping the handle stops the engine as well; [`stop`](Self::stop)
/// additionally waits for it to wind down.
#[derive(Debug)]
pub struct EngineHandle {
    stop: oneshot::Sender<()>,
    task: JoinHandle<()>,
}

impl EngineHandle {
    /// Stop consuming events, drop any pending lights-off, and wait for the
    /// engine task to finish.
    pub async fn stop(self) {
        let _ = self.stop.send(());
        if let Err(err) = self.task.await {
            tracing::warn!(%err, "trigger engine task ended abnormally");
        }
    }

    /// Whether the engine task has exited (stopped, or its source closed).
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

async fn deactivate<A: LightsActuator>(actuator: Arc<A>, disconnected_at: Instant) {
    tracing::info!(
        away_for = ?disconnected_at.elapsed(),
        "device still away, powering lights off"
    );
    if let Err(err) = actuator.set_all_power(false).await {
        tracing::warn!(%err, "failed to power lights off");
    }
}

/// Everything an activation needs, captured when the device appeared.
struct ActivationAttempt<A> {
    actuator: Arc<A>,
    hooks: Arc<HookChain>,
    scene_name: String,
    debounce_interval: Duration,
    disconnected_for: Duration,
}

impl<A: LightsActuator> ActivationAttempt<A> {
    async fn run(self) -> ActivationOutcome {
        let outcome = self.decide().await;
        match outcome {
            ActivationOutcome::Recalled => {
                tracing::info!(scene = %self.scene_name, "scene recalled");
            }
            ActivationOutcome::QueryFailed | ActivationOutcome::RecallFailed => {}
            skipped => tracing::debug!(?skipped, "lights left untouched"),
        }
        outcome
    }

    async fn decide(&self) -> ActivationOutcome {
        if self.disconnected_for < self.debounce_interval {
            return ActivationOutcome::WithinDebounce;
        }

        let lights = match self.actuator.get_all_lights().await {
            Ok(lights) => lights,
            Err(err) => {
                tracing::warn!(%err, "failed to query lights, skipping activation");
                return ActivationOutcome::QueryFailed;
            }
        };
        if any_on(&lights) {
            return ActivationOutcome::LightsAlreadyOn;
        }

        if !self.hooks.evaluate() {
            return ActivationOutcome::HookRejected;
        }

        match self.actuator.recall_scene(&self.scene_name).await {
            Ok(()) => ActivationOutcome::Recalled,
            Err(err) => {
                tracing::warn!(%err, scene = %self.scene_name, "failed to recall scene");
                ActivationOutcome::RecallFailed
            }
        }
    }
}
