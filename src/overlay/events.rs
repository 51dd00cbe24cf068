//! Subscription lifecycle for backend-pushed events.
//!
//! Each event channel is registered exactly once per controller instance and
//! released exactly once on teardown. A leaked handler shows up as duplicate
//! highlight updates, so release is guaranteed on every path via `Drop`.

use std::sync::Arc;

use tauri::Listener;

pub type SubscriptionId = u32;
pub type EventHandler = Box<dyn Fn(&str) + Send + Sync>;

/// Push-event channel the overlay subscribes to. Handlers receive the raw
/// JSON payload of the event.
pub trait EventBus: Send + Sync {
    fn listen(&self, event: &str, handler: EventHandler) -> Result<SubscriptionId, String>;
    fn unlisten(&self, id: SubscriptionId);
}

/// A live (event name, unregister capability) pair.
pub struct Subscription {
    event: String,
    id: SubscriptionId,
    bus: Arc<dyn EventBus>,
    released: bool,
}

impl Subscription {
    /// Unregisters the handler. Safe to call more than once; only the first
    /// call reaches the bus.
    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.bus.unlisten(self.id);
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.release();
    }
}

/// Every live subscription of one controller instance, at most one per
/// event name.
#[derive(Default)]
pub struct SubscriptionSet {
    subscriptions: Vec<Subscription>,
}

impl SubscriptionSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &mut self,
        bus: &Arc<dyn EventBus>,
        event: &str,
        handler: EventHandler,
    ) -> Result<(), String> {
        if self.subscriptions.iter().any(|s| s.event == event) {
            return Err(format!("already subscribed to {event}"));
        }
        let id = bus.listen(event, handler)?;
        self.subscriptions.push(Subscription {
            event: event.to_string(),
            id,
            bus: Arc::clone(bus),
            released: false,
        });
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.subscriptions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Releases every subscription. Part of controller teardown.
    pub fn clear(&mut self) {
        for subscription in &mut self.subscriptions {
            subscription.release();
        }
        self.subscriptions.clear();
    }
}

/// `EventBus` over the Tauri event system.
///
/// `tauri::Listener::listen` registers synchronously, so a teardown racing
/// an in-flight registration cannot leak a handler here.
pub struct TauriEventBus {
    app: tauri::AppHandle,
}

impl TauriEventBus {
    pub fn new(app: tauri::AppHandle) -> Self {
        Self { app }
    }
}

impl EventBus for TauriEventBus {
    fn listen(&self, event: &str, handler: EventHandler) -> Result<SubscriptionId, String> {
        Ok(self
            .app
            .listen(event.to_string(), move |event| handler(event.payload())))
    }

    fn unlisten(&self, id: SubscriptionId) {
        self.app.unlisten(id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct CountingBus {
        next_id: AtomicU32,
        unlistened: Mutex<Vec<SubscriptionId>>,
    }

    impl EventBus for CountingBus {
        fn listen(&self, _event: &str, _handler: EventHandler) -> Result<SubscriptionId, String> {
            Ok(self.next_id.fetch_add(1, Ordering::SeqCst))
        }

        fn unlisten(&self, id: SubscriptionId) {
            self.unlistened.lock().unwrap().push(id);
        }
    }

    #[derive(Default)]
    struct FailingBus;

    impl EventBus for FailingBus {
        fn listen(&self, event: &str, _handler: EventHandler) -> Result<SubscriptionId, String> {
            Err(format!("channel {event} unavailable"))
        }

        fn unlisten(&self, _id: SubscriptionId) {}
    }

    fn noop() -> EventHandler {
        Box::new(|_| {})
    }

    #[test]
    fn duplicate_event_name_is_rejected() {
        let bus: Arc<dyn EventBus> = Arc::new(CountingBus::default());
        let mut set = SubscriptionSet::new();

        set.subscribe(&bus, "element-hover", noop()).unwrap();
        let err = set.subscribe(&bus, "element-hover", noop()).unwrap_err();
        assert!(err.contains("element-hover"));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn clear_releases_every_subscription_once() {
        let counting = Arc::new(CountingBus::default());
        let bus: Arc<dyn EventBus> = counting.clone();
        let mut set = SubscriptionSet::new();

        set.subscribe(&bus, "element-hover", noop()).unwrap();
        set.subscribe(&bus, "capture-click", noop()).unwrap();
        set.clear();
        set.clear();

        let unlistened = counting.unlistened.lock().unwrap();
        assert_eq!(unlistened.len(), 2);
        assert!(set.is_empty());
    }

    #[test]
    fn drop_releases_exactly_once_after_manual_release() {
        let counting = Arc::new(CountingBus::default());
        let bus: Arc<dyn EventBus> = counting.clone();

        {
            let mut set = SubscriptionSet::new();
            set.subscribe(&bus, "show-settings", noop()).unwrap();
            set.clear();
            // set drops here; the released subscription must not unlisten again
        }

        assert_eq!(counting.unlistened.lock().unwrap().len(), 1);
    }

    #[test]
    fn failed_registration_leaves_no_subscription() {
        let bus: Arc<dyn EventBus> = Arc::new(FailingBus);
        let mut set = SubscriptionSet::new();

        assert!(set.subscribe(&bus, "capture-click", noop()).is_err());
        assert!(set.is_empty());
    }
}
