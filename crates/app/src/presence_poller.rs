//! Presence poller — turns periodic router snapshots into presence events.
//!
//! Each tick asks a [`ConnectedDevices`] collaborator who is attached and
//! diffs the answer against the previous one. The first successful snapshot
//! only establishes the baseline; devices already present at startup do not
//! produce events.

use std::collections::BTreeSet;
use std::time::Duration;

use tokio::sync::mpsc;
use tokio::time::MissedTickBehavior;

use lightson_domain::device::DeviceKey;
use lightson_domain::presence::PresenceEvent;

use crate::ports::{ConnectedDevices, PresenceNotification, PresenceSource};

const MIN_POLL_INTERVAL: Duration = Duration::from_millis(1);

/// [`PresenceSource`] backed by polling a [`ConnectedDevices`] snapshot.
#[derive(Debug, Clone)]
pub struct PresencePoller<D> {
    devices: D,
    capacity: usize,
}

impl<D> PresencePoller<D> {
    /// Create a poller; `capacity` bounds the notification channel.
    #[must_use]
    pub fn new(devices: D, capacity: usize) -> Self {
        Self {
            devices,
            capacity: capacity.max(1),
        }
    }
}

impl<D> PresenceSource for PresencePoller<D>
where
    D: ConnectedDevices + Clone + 'static,
{
    /// Spawn the polling loop. It runs until the receiver is dropped.
    fn subscribe(&self, poll_interval: Duration) -> mpsc::Receiver<PresenceNotification> {
        let (tx, rx) = mpsc::channel(self.capacity);
        tokio::spawn(poll_loop(
            self.devices.clone(),
            poll_interval.max(MIN_POLL_INTERVAL),
            tx,
        ));
        rx
    }
}

async fn poll_loop<D: ConnectedDevices>(
    devices: D,
    poll_interval: Duration,
    tx: mpsc::Sender<PresenceNotification>,
) {
    let mut ticker = tokio::time::interval(poll_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut known: Option<BTreeSet<DeviceKey>> = None;

    loop {
        tokio::select! {
            () = tx.closed() => break,
            _ = ticker.tick() => {}
        }

        let current = match devices.connected_devices().await {
            Ok(current) => current.into_iter().collect::<BTreeSet<_>>(),
            Err(err) => {
                tracing::debug!(%err, "router snapshot failed");
                if tx.send(Err(err)).await.is_err() {
                    break;
                }
                continue;
            }
        };

        if let Some(previous) = known.replace(current.clone()) {
            for event in diff(&previous, &current) {
                if tx.send(Ok(event)).await.is_err() {
                    return;
                }
            }
        } else {
            tracing::debug!(devices = current.len(), "presence baseline established");
        }
    }
    tracing::debug!("presence subscriber gone, stopping poller");
}

/// Departures first, then arrivals, each in address order.
fn diff(previous: &BTreeSet<DeviceKey>, current: &BTreeSet<DeviceKey>) -> Vec<PresenceEvent> {
    let departed = previous
        .difference(current)
        .map(|key| PresenceEvent::disappeared(*key));
    let arrived = current
        .difference(previous)
        .map(|key| PresenceEvent::appeared(*key));
    departed.chain(arrived).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use lightson_domain::error::LightsOnError;
    use lightson_domain::presence::PresenceChange;
    use std::future::Future;
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Default)]
    struct FakeRouter {
        attached: Mutex<Vec<DeviceKey>>,
        failing: AtomicBool,
    }

    impl FakeRouter {
        fn set(&self, keys: &[DeviceKey]) {
            *self.attached.lock().unwrap() = keys.to_vec();
        }
    }

    impl ConnectedDevices for FakeRouter {
        fn connected_devices(
            &self,
        ) -> impl Future<Output = Result<Vec<DeviceKey>, LightsOnError>> + Send {
            let r = if self.failing.load(Ordering::SeqCst) {
                Err(LightsOnError::Presence("router timeout".into()))
            } else {
                Ok(self.attached.lock().unwrap().clone())
            };
            async { r }
        }
    }

    const PHONE: DeviceKey = DeviceKey::from_bytes([0xA4, 0xC1, 0x38, 0x5B, 0x0E, 0xDF]);
    const LAPTOP: DeviceKey = DeviceKey::from_bytes([0x00, 0x11, 0x22, 0x33, 0x44, 0x55]);
    const TABLET: DeviceKey = DeviceKey::from_bytes([0x66, 0x77, 0x88, 0x99, 0xAA, 0xBB]);

    fn changes(rx: &mut mpsc::Receiver<PresenceNotification>) -> Vec<(DeviceKey, PresenceChange)> {
        let mut out = Vec::new();
        while let Ok(notification) = rx.try_recv() {
            if let Ok(event) = notification {
                out.push((event.identity, event.change));
            }
        }
        out
    }

    #[test]
    fn should_list_departures_before_arrivals() {
        let previous = BTreeSet::from([PHONE, LAPTOP]);
        let current = BTreeSet::from([LAPTOP, TABLET]);
        let events = diff(&previous, &current);

        assert_eq!(events.len(), 2);
        assert_eq!(events[0].identity, PHONE);
        assert_eq!(events[0].change, PresenceChange::Disappeared);
        assert_eq!(events[1].identity, TABLET);
        assert_eq!(events[1].change, PresenceChange::Appeared);
    }

    #[test]
    fn should_produce_nothing_for_identical_snapshots() {
        let snapshot = BTreeSet::from([PHONE]);
        assert!(diff(&snapshot, &snapshot).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn should_not_emit_events_for_baseline_snapshot() {
        let router = Arc::new(FakeRouter::default());
        router.set(&[PHONE, LAPTOP]);
        let mut rx = PresencePoller::new(Arc::clone(&router), 8).subscribe(Duration::from_secs(1));

        tokio::time::sleep(Duration::from_millis(2500)).await;
        assert!(changes(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn should_emit_changes_between_polls() {
        let router = Arc::new(FakeRouter::default());
        router.set(&[LAPTOP]);
        let mut rx = PresencePoller::new(Arc::clone(&router), 8).subscribe(Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(500)).await;

        router.set(&[LAPTOP, PHONE]);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(changes(&mut rx), vec![(PHONE, PresenceChange::Appeared)]);

        router.set(&[PHONE]);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert_eq!(changes(&mut rx), vec![(LAPTOP, PresenceChange::Disappeared)]);
    }

    #[tokio::test(start_paused = true)]
    async fn should_forward_snapshot_errors_and_keep_baseline() {
        let router = Arc::new(FakeRouter::default());
        router.set(&[PHONE]);
        let mut rx = PresencePoller::new(Arc::clone(&router), 8).subscribe(Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(500)).await;

        router.failing.store(true, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(matches!(rx.try_recv(), Ok(Err(LightsOnError::Presence(_)))));

        router.failing.store(false, Ordering::SeqCst);
        tokio::time::sleep(Duration::from_secs(1)).await;
        assert!(changes(&mut rx).is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn should_stop_polling_when_receiver_is_dropped() {
        let router = Arc::new(FakeRouter::default());
        let rx = PresencePoller::new(Arc::clone(&router), 8).subscribe(Duration::from_secs(1));
        tokio::time::sleep(Duration::from_millis(500)).await;
        // The poll loop holds the only other clone.
        assert_eq!(Arc::strong_count(&router), 2);

        drop(rx);
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(Arc::strong_count(&router), 1);
    }
}
