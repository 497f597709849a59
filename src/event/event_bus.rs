// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Fan-out of session events.

use tokio::sync::broadcast;

use super::DeviceEvent;

/// Events buffered per subscriber before the oldest are dropped.
const CAPACITY: usize = 64;

/// Fan-out of [`DeviceEvent`]s to every subscriber of one session.
///
/// A subscriber that falls more than 64 events behind gets
/// `RecvError::Lagged` and continues with the newest events.
///
/// # Examples
///
/// ```
/// use robovac_lib::event::{DeviceEvent, DeviceId, EventBus};
///
/// let bus = EventBus::new();
/// let mut rx = bus.subscribe();
///
/// bus.publish(DeviceEvent::available(DeviceId::new("vac-1")));
/// assert!(rx.try_recv().unwrap().is_availability());
/// ```
#[derive(Debug)]
pub struct EventBus {
    tx: broadcast::Sender<DeviceEvent>,
}

impl EventBus {
    /// Creates a bus without subscribers.
    #[must_use]
    pub fn new() -> Self {
        let (tx, _) = broadcast::channel(CAPACITY);
        Self { tx }
    }

    /// Returns a receiver for events published from now on.
    #[must_use]
    pub fn subscribe(&self) -> broadcast::Receiver<DeviceEvent> {
        self.tx.subscribe()
    }

    /// Sends an event to current subscribers; dropped if there are none.
    pub fn publish(&self, event: DeviceEvent) {
        let _ = self.tx.send(event);
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::DeviceId;
    use crate::scheduler::FailureClass;
    use crate::state::DeviceState;

    #[test]
    fn publish_without_subscribers_is_dropped() {
        let bus = EventBus::new();
        bus.publish(DeviceEvent::available(DeviceId::new("vac-1")));

        let mut rx = bus.subscribe();
        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn every_subscriber_sees_events_in_order() {
        let bus = EventBus::new();
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        let id = DeviceId::new("vac-1");
        bus.publish(DeviceEvent::state_updated(id.clone(), DeviceState::new()));
        bus.publish(DeviceEvent::unavailable(id, FailureClass::ConnectionFailed));

        for rx in [&mut first, &mut second] {
            assert!(rx.recv().await.unwrap().is_state_update());
            assert!(rx.recv().await.unwrap().is_availability());
        }
    }

    #[tokio::test]
    async fn slow_subscriber_skips_to_newest() {
        let bus = EventBus::new();
        let mut rx = bus.subscribe();

        for n in 0..=CAPACITY {
            bus.publish(DeviceEvent::available(DeviceId::new(format!("vac-{n}"))));
        }

        assert!(matches!(
            rx.recv().await,
            Err(broadcast::error::RecvError::Lagged(1))
        ));
        assert_eq!(rx.recv().await.unwrap().device_id().as_str(), "vac-1");
    }
}
