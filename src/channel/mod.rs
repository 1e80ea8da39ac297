use std::sync::Mutex;

use tokio::sync::mpsc;

use crate::models::{Message, Notification};

/// The two named events the push connection delivers. At-least-once,
/// best-effort-ordered, only while connected.
#[derive(Debug, Clone)]
pub enum PushEvent {
    NewMessage(Message),
    NewNotification(Notification),
}

/// Subscription primitive the sync controller consumes.
///
/// A later `subscribe` replaces the previous subscription and the old
/// receiver stops seeing events, which is what makes re-initializing a
/// controller idempotent instead of doubling deliveries.
pub trait EventChannel {
    fn subscribe(&self) -> mpsc::UnboundedReceiver<PushEvent>;
}

/// In-process event channel with a single replaceable subscriber slot.
///
/// Whatever owns the real connection (a socket adapter, or a test) feeds
/// events in through `publish`; the controller drains them from its
/// subscribed receiver on its own thread. Reconnection policy belongs to the
/// feeder, not to this type.
pub struct PushChannel {
    subscriber: Mutex<Option<mpsc::UnboundedSender<PushEvent>>>,
}

impl PushChannel {
    pub fn new() -> Self {
        Self { subscriber: Mutex::new(None) }
    }

    /// Deliver one event to the current subscriber. Returns `false` when no
    /// live subscription exists (nobody initialized, or the receiver was
    /// dropped).
    pub fn publish(&self, event: PushEvent) -> bool {
        let guard = self.subscriber.lock().unwrap();
        match guard.as_ref() {
            Some(sender) => sender.send(event).is_ok(),
            None => false,
        }
    }
}

impl Default for PushChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl EventChannel for PushChannel {
    fn subscribe(&self) -> mpsc::UnboundedReceiver<PushEvent> {
        let (sender, receiver) = mpsc::unbounded_channel();
        *self.subscriber.lock().unwrap() = Some(sender);
        receiver
    }
}
