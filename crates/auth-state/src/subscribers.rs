//! Subscription registry
//!
//! Observers are kept in a `BTreeMap` keyed by a monotonically increasing
//! id, so iteration order is registration order and removal never depends
//! on comparing callbacks.
//!
//! `notify` snapshots the registered observers before invoking any of them.
//! Observers may therefore subscribe or unsubscribe (themselves or others)
//! from inside a callback. Each snapshot entry is re-checked against the
//! live map just before it is invoked, so an observer removed earlier in the
//! same pass is not called. Observers added during a pass wait for the next
//! one.

use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;
use std::rc::{Rc, Weak};

use tracing::debug;

/// Receives the signed-in state after every state-changing event.
pub trait AuthObserver {
    fn on_auth_change(&self, signed_in: bool);
}

impl<F: Fn(bool)> AuthObserver for F {
    fn on_auth_change(&self, signed_in: bool) {
        self(signed_in)
    }
}

type Observers = RefCell<BTreeMap<u64, Rc<dyn AuthObserver>>>;

/// Ordered set of observers.
#[derive(Default)]
pub struct Subscribers {
    observers: Rc<Observers>,
    next_id: Cell<u64>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a closure. It is not invoked until the next `notify`.
    pub fn subscribe(&self, observer: impl Fn(bool) + 'static) -> Subscription {
        self.subscribe_observer(observer)
    }

    /// Register an `AuthObserver` implementation.
    pub fn subscribe_observer(&self, observer: impl AuthObserver + 'static) -> Subscription {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.observers.borrow_mut().insert(id, Rc::new(observer));
        debug!(subscription_id = id, "observer subscribed");
        Subscription {
            id,
            observers: Rc::downgrade(&self.observers),
        }
    }

    /// Invoke every currently registered observer with `signed_in`, in
    /// registration order.
    pub(crate) fn notify(&self, signed_in: bool) {
        let snapshot: Vec<(u64, Rc<dyn AuthObserver>)> = self
            .observers
            .borrow()
            .iter()
            .map(|(id, observer)| (*id, Rc::clone(observer)))
            .collect();

        debug!(signed_in, observers = snapshot.len(), "notifying observers");

        for (id, observer) in snapshot {
            let still_registered = self.observers.borrow().contains_key(&id);
            if still_registered {
                observer.on_auth_change(signed_in);
            }
        }
    }

    pub fn len(&self) -> usize {
        self.observers.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Handle returned by `subscribe`.
///
/// Dropping the handle does not unsubscribe; call `unsubscribe()`.
#[derive(Debug, Clone)]
#[must_use = "keep the handle to be able to unsubscribe"]
pub struct Subscription {
    id: u64,
    observers: Weak<Observers>,
}

impl Subscription {
    /// Remove the associated observer. Safe to call any number of times,
    /// including after the registry itself is gone.
    pub fn unsubscribe(&self) {
        let Some(observers) = self.observers.upgrade() else {
            return;
        };
        if observers.borrow_mut().remove(&self.id).is_some() {
            debug!(subscription_id = self.id, "observer unsubscribed");
        }
    }
}
