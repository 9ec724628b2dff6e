//! Delivery of committed notifications to downstream consumers.

use crate::runtime::NotifyEvent;
use std::sync::Mutex;
use tokio::sync::mpsc::UnboundedSender;
use tracing::debug;

/// Consumer of notifications from successful invocations.
pub trait NotificationSink {
    fn publish(&self, event: NotifyEvent);
}

impl NotificationSink for UnboundedSender<NotifyEvent> {
    fn publish(&self, event: NotifyEvent) {
        if let Err(err) = self.send(event) {
            debug!(event = %err.0.event_name, "notification receiver dropped");
        }
    }
}

impl NotificationSink for Mutex<Vec<NotifyEvent>> {
    fn publish(&self, event: NotifyEvent) {
        match self.lock() {
            Ok(mut events) => events.push(event),
            Err(poisoned) => poisoned.into_inner().push(event),
        }
    }
}
