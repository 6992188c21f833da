// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Listener registries with copy-on-write membership.
//!
//! [`ListenerSet`] stores listeners behind `Rc` and identifies them by pointer, so
//! registering the same `Rc` twice has no additional effect. Notification iterates a
//! snapshot of the membership: a listener may add or remove listeners (including
//! itself) while being notified, and the change takes effect from the next
//! notification pass. Notification order is unspecified.
//!
//! Registrations live as long as the registry; nothing is removed automatically.
//!
//! ```
//! use std::cell::Cell;
//! use std::rc::Rc;
//! use understory_bottom_sheet::{SheetListeners, SheetState};
//!
//! let listeners = SheetListeners::default();
//! let seen = Rc::new(Cell::new(0));
//! let seen_in_listener = seen.clone();
//! let listener: Rc<dyn Fn(SheetState)> = Rc::new(move |_: SheetState| seen_in_listener.set(seen_in_listener.get() + 1));
//!
//! assert!(listeners.add_state_listener(listener.clone()));
//! assert!(!listeners.add_state_listener(listener.clone()));
//! listeners.notify_state(SheetState::Peeked);
//! assert_eq!(seen.get(), 1);
//! ```

use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;
use core::fmt;

use crate::state::SheetState;

/// Observer of sheet state changes.
pub type StateListener = dyn Fn(SheetState);

/// Observer of completed dismissals.
pub type DismissListener = dyn Fn();

/// A set of `Rc` listeners with identity membership and snapshot iteration.
pub struct ListenerSet<T: ?Sized> {
    entries: RefCell<Rc<Vec<Rc<T>>>>,
}

impl<T: ?Sized> Default for ListenerSet<T> {
    fn default() -> Self {
        Self {
            entries: RefCell::new(Rc::new(Vec::new())),
        }
    }
}

impl<T: ?Sized> fmt::Debug for ListenerSet<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerSet")
            .field("len", &self.len())
            .finish_non_exhaustive()
    }
}

fn same<T: ?Sized>(a: &Rc<T>, b: &Rc<T>) -> bool {
    core::ptr::addr_eq(Rc::as_ptr(a), Rc::as_ptr(b))
}

impl<T: ?Sized> ListenerSet<T> {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a listener. Returns `false` if it was already registered.
    pub fn add(&self, listener: Rc<T>) -> bool {
        if self.contains(&listener) {
            return false;
        }
        let mut entries = self.entries.borrow_mut();
        Rc::make_mut(&mut entries).push(listener);
        true
    }

    /// Removes a listener. Returns `false` if it was not registered.
    pub fn remove(&self, listener: &Rc<T>) -> bool {
        let mut entries = self.entries.borrow_mut();
        let Some(index) = entries.iter().position(|l| same(l, listener)) else {
            return false;
        };
        Rc::make_mut(&mut entries).remove(index);
        true
    }

    /// Returns `true` if `listener` is registered.
    #[must_use]
    pub fn contains(&self, listener: &Rc<T>) -> bool {
        self.entries.borrow().iter().any(|l| same(l, listener))
    }

    /// Number of registered listeners.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    /// Returns `true` when nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Removes every listener.
    pub fn clear(&self) {
        *self.entries.borrow_mut() = Rc::new(Vec::new());
    }

    /// The current membership. Later mutations copy instead of touching this snapshot.
    #[must_use]
    pub fn snapshot(&self) -> Rc<Vec<Rc<T>>> {
        self.entries.borrow().clone()
    }

    /// Calls `f` for each listener in a snapshot of the current membership.
    pub fn for_each(&self, mut f: impl FnMut(&T)) {
        let snapshot = self.snapshot();
        for listener in snapshot.iter() {
            f(listener);
        }
    }
}

/// The two listener registries of a sheet.
///
/// Shared through `Rc` so that listeners can capture a handle and deregister
/// themselves (or others) during notification.
#[derive(Debug, Default)]
pub struct SheetListeners {
    state: ListenerSet<StateListener>,
    dismissed: ListenerSet<DismissListener>,
}

impl SheetListeners {
    /// Registers a state-change listener. Returns `false` if already registered.
    pub fn add_state_listener(&self, listener: Rc<StateListener>) -> bool {
        self.state.add(listener)
    }

    /// Deregisters a state-change listener. Returns `false` if it was not registered.
    pub fn remove_state_listener(&self, listener: &Rc<StateListener>) -> bool {
        self.state.remove(listener)
    }

    /// Registers a dismissal listener. Returns `false` if already registered.
    pub fn add_dismiss_listener(&self, listener: Rc<DismissListener>) -> bool {
        self.dismissed.add(listener)
    }

    /// Deregisters a dismissal listener. Returns `false` if it was not registered.
    pub fn remove_dismiss_listener(&self, listener: &Rc<DismissListener>) -> bool {
        self.dismissed.remove(listener)
    }

    /// The state-change registry.
    #[must_use]
    pub fn state_listeners(&self) -> &ListenerSet<StateListener> {
        &self.state
    }

    /// The dismissal registry.
    #[must_use]
    pub fn dismiss_listeners(&self) -> &ListenerSet<DismissListener> {
        &self.dismissed
    }

    /// Notifies every state-change listener.
    pub fn notify_state(&self, state: SheetState) {
        self.state.for_each(|listener| listener(state));
    }

    /// Notifies every dismissal listener.
    pub fn notify_dismissed(&self) {
        self.dismissed.for_each(|listener| listener());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;
    use core::cell::Cell;

    fn counter() -> (Rc<Cell<u32>>, Rc<DismissListener>) {
        let count = Rc::new(Cell::new(0));
        let inner = count.clone();
        (count, Rc::new(move || inner.set(inner.get() + 1)))
    }

    #[test]
    fn duplicate_registration_notifies_once() {
        let listeners = SheetListeners::default();
        let (count, listener) = counter();
        assert!(listeners.add_dismiss_listener(listener.clone()));
        assert!(!listeners.add_dismiss_listener(listener));
        listeners.notify_dismissed();
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn distinct_closures_are_distinct_listeners() {
        let listeners = SheetListeners::default();
        let (a, la) = counter();
        let (b, lb) = counter();
        listeners.add_dismiss_listener(la);
        listeners.add_dismiss_listener(lb);
        listeners.notify_dismissed();
        assert_eq!((a.get(), b.get()), (1, 1));
    }

    #[test]
    fn remove_stops_notifications() {
        let listeners = SheetListeners::default();
        let (count, listener) = counter();
        listeners.add_dismiss_listener(listener.clone());
        assert!(listeners.remove_dismiss_listener(&listener));
        assert!(!listeners.remove_dismiss_listener(&listener));
        listeners.notify_dismissed();
        assert_eq!(count.get(), 0);
    }

    #[test]
    fn listener_can_remove_itself_during_notification() {
        let listeners = Rc::new(SheetListeners::default());
        let slot: Rc<RefCell<Option<Rc<StateListener>>>> = Rc::new(RefCell::new(None));
        let seen = Rc::new(RefCell::new(Vec::new()));

        let handle = listeners.clone();
        let own = slot.clone();
        let log = seen.clone();
        let listener: Rc<StateListener> = Rc::new(move |state: SheetState| {
            log.borrow_mut().push(state);
            if let Some(me) = own.borrow().as_ref() {
                handle.remove_state_listener(me);
            }
        });
        *slot.borrow_mut() = Some(listener.clone());
        listeners.add_state_listener(listener);

        listeners.notify_state(SheetState::Preparing);
        listeners.notify_state(SheetState::Peeked);
        assert_eq!(*seen.borrow(), vec![SheetState::Preparing]);
        assert!(listeners.state_listeners().is_empty());
    }

    #[test]
    fn listener_added_during_notification_runs_next_pass() {
        let listeners = Rc::new(SheetListeners::default());
        let (late_count, late) = counter();
        let handle = listeners.clone();
        let adder: Rc<DismissListener> = Rc::new(move || {
            handle.add_dismiss_listener(late.clone());
        });
        listeners.add_dismiss_listener(adder);

        listeners.notify_dismissed();
        assert_eq!(late_count.get(), 0);
        assert_eq!(listeners.dismiss_listeners().len(), 2);

        listeners.notify_dismissed();
        assert_eq!(late_count.get(), 1);
    }

    #[test]
    fn snapshots_are_unaffected_by_later_mutation() {
        let set: ListenerSet<DismissListener> = ListenerSet::new();
        let (_, a) = counter();
        let (_, b) = counter();
        set.add(a);
        let snapshot = set.snapshot();
        set.add(b);
        assert_eq!(snapshot.len(), 1);
        assert_eq!(set.len(), 2);
        set.clear();
        assert!(set.is_empty());
        assert_eq!(snapshot.len(), 1);
    }
}
