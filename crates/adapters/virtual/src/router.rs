//! Virtual router — an in-memory set of attached devices.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use lightson_app::ports::ConnectedDevices;
use lightson_domain::device::DeviceKey;
use lightson_domain::error::LightsOnError;

use crate::error::VirtualError;

/// A simulated router whose attached-device list is set by hand.
#[derive(Debug, Default)]
pub struct VirtualRouter {
    attached: Mutex<BTreeSet<DeviceKey>>,
    unreachable: AtomicBool,
}

impl VirtualRouter {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a router with devices already attached.
    #[must_use]
    pub fn with_attached(keys: impl IntoIterator<Item = DeviceKey>) -> Self {
        Self {
            attached: Mutex::new(keys.into_iter().collect()),
            unreachable: AtomicBool::new(false),
        }
    }

    /// Attach a device. Returns `false` if it was already attached.
    pub fn connect(&self, key: DeviceKey) -> bool {
        self.lock().insert(key)
    }

    /// Detach a device. Returns `false` if it was not attached.
    pub fn disconnect(&self, key: DeviceKey) -> bool {
        self.lock().remove(&key)
    }

    #[must_use]
    pub fn is_connected(&self, key: DeviceKey) -> bool {
        self.lock().contains(&key)
    }

    /// Make snapshots fail until cleared.
    pub fn set_unreachable(&self, unreachable: bool) {
        self.unreachable.store(unreachable, Ordering::SeqCst);
    }

    fn lock(&self) -> MutexGuard<'_, BTreeSet<DeviceKey>> {
        self.attached.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl ConnectedDevices for VirtualRouter {
    fn connected_devices(
        &self,
    ) -> impl Future<Output = Result<Vec<DeviceKey>, LightsOnError>> + Send {
        let r = if self.unreachable.load(Ordering::SeqCst) {
            Err(LightsOnError::from(VirtualError::RouterUnreachable))
        } else {
            Ok(self.lock().iter().copied().collect())
        };
        async { r }
    }
}
