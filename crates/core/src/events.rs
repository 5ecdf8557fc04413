//! Event System
//!
//! Pub/sub event bus between the permission screens and their host.

use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::RwLock;
use tracing::debug;

use crate::types::{NavigationRequest, ViewEvent};

/// Events emitted by the permission screens
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// Catalog loaded at screen entry
    CatalogLoaded { package: String, groups: usize },
    /// Catalog re-read from the platform
    CatalogRefreshed { package: String, groups: usize },
    /// Package vanished while the screen was open
    CatalogInvalidated { package: String },
    /// A new rendering plan replaced the visible one
    PlanUpdated { package: String, generation: u64 },
    /// One row of an app permissions view was shown
    PermissionsViewed(ViewEvent),
    /// Host should navigate
    Navigate(NavigationRequest),
    /// Short user-visible notification
    Notify { message: String },
    /// Host should close the screen
    Finish,
}

/// Subscriber handle for receiving events
#[derive(Clone)]
pub struct EventSubscription {
    receiver: Receiver<Event>,
}

impl EventSubscription {
    /// Try to receive an event (non-blocking)
    pub fn try_recv(&self) -> Result<Event, crossbeam_channel::TryRecvError> {
        self.receiver.try_recv()
    }

    /// Drain every event currently queued
    pub fn drain(&self) -> Vec<Event> {
        self.receiver.try_iter().collect()
    }
}

/// Event bus for publish/subscribe pattern
pub struct EventBus {
    subscribers: RwLock<Vec<Sender<Event>>>,
}

impl EventBus {
    /// Create a new event bus
    pub fn new() -> Self {
        Self {
            subscribers: RwLock::new(Vec::new()),
        }
    }

    /// Subscribe to events
    pub fn subscribe(&self) -> EventSubscription {
        let (sender, receiver) = unbounded();
        self.subscribers.write().push(sender);
        EventSubscription { receiver }
    }

    /// Emit an event to all subscribers
    pub fn emit(&self, event: Event) -> usize {
        let subscribers = self.subscribers.read();
        let mut delivered = 0;

        for sender in subscribers.iter() {
            if sender.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }

        debug!("Event {:?} delivered to {} subscribers", event, delivered);
        delivered
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}
