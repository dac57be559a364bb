//! Subscriptions for stat checks rolled inside stories.
//!
//! UI layers mount and unmount independently of the game loop, so they
//! subscribe here and hold on to the [`Subscription`] handle to detach.

use std::fmt;

use sw_core::StatRef;
use sw_mechanics::StatCheckResult;

/// A stat check rolled by a story predicate.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CheckEvent {
    /// The stat that was checked.
    pub stat: StatRef,
    /// How the roll went.
    pub result: StatCheckResult,
}

/// Handle returned by [`CheckObservers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Subscription(u64);

type Listener = Box<dyn FnMut(&CheckEvent)>;

/// Registry of stat-check listeners.
#[derive(Default)]
pub struct CheckObservers {
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
}

impl CheckObservers {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener. Keep the handle to remove it later.
    pub fn subscribe(&mut self, listener: impl FnMut(&CheckEvent) + 'static) -> Subscription {
        self.next_id += 1;
        self.listeners.push((self.next_id, Box::new(listener)));
        Subscription(self.next_id)
    }

    /// Remove a listener. Returns false if it was already gone.
    pub fn unsubscribe(&mut self, subscription: Subscription) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(id, _)| *id != subscription.0);
        self.listeners.len() != before
    }

    /// Deliver an event to every listener, in subscription order.
    pub fn notify(&mut self, event: &CheckEvent) {
        for (_, listener) in &mut self.listeners {
            listener(event);
        }
    }

    /// Number of listeners.
    pub fn len(&self) -> usize {
        self.listeners.len()
    }

    /// True when nobody is listening.
    pub fn is_empty(&self) -> bool {
        self.listeners.is_empty()
    }
}

impl fmt::Debug for CheckObservers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CheckObservers")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use sw_core::MainStat;
    use sw_mechanics::{FixedRng, StatCheckRequest, perform_stat_check};

    use super::*;

    fn event() -> CheckEvent {
        CheckEvent {
            stat: StatRef::Main(MainStat::Physique),
            result: perform_stat_check(&StatCheckRequest::new(10, 3), &mut FixedRng(0.5)),
        }
    }

    #[test]
    fn subscribe_notify_unsubscribe() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut observers = CheckObservers::new();

        let sink = Rc::clone(&seen);
        let first = observers.subscribe(move |e| sink.borrow_mut().push(("first", e.result.total)));
        let sink = Rc::clone(&seen);
        let _second = observers.subscribe(move |e| sink.borrow_mut().push(("second", e.result.total)));

        observers.notify(&event());
        assert_eq!(*seen.borrow(), vec![("first", 13), ("second", 13)]);

        assert!(observers.unsubscribe(first));
        assert!(!observers.unsubscribe(first));
        observers.notify(&event());
        assert_eq!(seen.borrow().len(), 3);
        assert_eq!(observers.len(), 1);
    }
}
