//! Presence ports — where presence events come from.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::mpsc;

use lightson_domain::device::DeviceKey;
use lightson_domain::error::LightsOnError;
use lightson_domain::presence::PresenceEvent;

/// One delivery from a presence source.
///
/// An `Err` means the source could not tell what happened this round; the
/// subscriber ignores it and keeps listening.
pub type PresenceNotification = Result<PresenceEvent, LightsOnError>;

/// A stream of presence changes for devices on the network.
pub trait PresenceSource {
    /// Start observing presence, checking every `poll_interval`.
    ///
    /// Notifications stop when the source is exhausted or when the
    /// returned receiver is dropped.
    fn subscribe(&self, poll_interval: Duration) -> mpsc::Receiver<PresenceNotification>;
}

/// A router-like collaborator that can list currently attached devices.
pub trait ConnectedDevices: Send + Sync {
    /// Snapshot of every device attached right now.
    fn connected_devices(
        &self,
    ) -> impl Future<Output = Result<Vec<DeviceKey>, LightsOnError>> + Send;
}

impl<T: ConnectedDevices> ConnectedDevices for Arc<T> {
    fn connected_devices(
        &self,
    ) -> impl Future<Output = Result<Vec<DeviceKey>, LightsOnError>> + Send {
        (**self).connected_devices()
    }
}
