use std::sync::mpsc::{Receiver, TryRecvError};

use serde::Serialize;

/// The host switched to a different screen or scene.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScreenTransition {
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub u64);

/// A registered interest in screen transitions.
///
/// The host pushes transitions into the channel as they happen; the
/// subscriber drains them on its own thread of control.
#[derive(Debug)]
pub struct Subscription {
    pub id: SubscriptionId,
    pub events: Receiver<ScreenTransition>,
}

impl Subscription {
    /// All transitions delivered since the last drain, oldest first.
    pub fn drain(&self) -> Vec<ScreenTransition> {
        let mut pending = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(t) => pending.push(t),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        pending
    }
}

/// Narrow capability for screen/scene-transition notifications.
pub trait ScreenEventSource {
    fn subscribe(&mut self) -> Subscription;
    fn unsubscribe(&mut self, id: SubscriptionId);
}
