//! Tracks which window the loading bar should overlay.
//!
//! `KeyWindowTracker` watches a window-focus-changed signal and republishes
//! the current key window as an observable slot. The slot carries a plain
//! [`WindowId`] handle, never a window reference; the UI layer re-checks
//! that the handle is still valid before using it.

use std::rc::Rc;

use crate::observable::{Subject, Subscription};

/// Plain window handle (the AppKit window number on macOS).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WindowId(pub isize);

/// Read-only view of the application's live window list.
pub trait WindowList {
    /// The window currently receiving input focus, if any. `None` is a valid
    /// state, not an error.
    fn key_window(&self) -> Option<WindowId>;
}

/// Handle identifying one registered focus observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObserverToken(pub u64);

/// A source of window-focus-changed events.
pub trait FocusEvents {
    fn add_observer(&self, callback: Rc<dyn Fn()>) -> ObserverToken;
    fn remove_observer(&self, token: ObserverToken);
}

/// View-model exposing "the window that currently needs the bar" as an
/// observable slot.
///
/// Construction seeds the slot from [`WindowList::key_window`] and registers
/// with the focus signal. Every signal re-reads the key window and publishes
/// the found value, with no equality check against the previous one. Dropping
/// the tracker unregisters the observer and then publishes `None`, so
/// subscribers can detach the bar before the tracker is gone.
pub struct KeyWindowTracker {
    slot: Subject<Option<WindowId>>,
    windows: Rc<dyn WindowList>,
    events: Rc<dyn FocusEvents>,
    token: ObserverToken,
}

impl KeyWindowTracker {
    pub fn new(windows: Rc<dyn WindowList>, events: Rc<dyn FocusEvents>) -> Rc<Self> {
        let slot = Subject::new(windows.key_window());

        Rc::new_cyclic(|weak: &std::rc::Weak<Self>| {
            let weak = weak.clone();
            let token = events.add_observer(Rc::new(move || {
                if let Some(tracker) = weak.upgrade() {
                    tracker.refresh();
                }
            }));

            Self {
                slot,
                windows: windows.clone(),
                events: events.clone(),
                token,
            }
        })
    }

    /// Latest published key window.
    pub fn current(&self) -> Option<WindowId> {
        self.slot.get()
    }

    /// Subscribes to the slot; the current value is replayed immediately.
    pub fn subscribe(
        &self,
        observer: impl Fn(&Option<WindowId>) + 'static,
    ) -> Subscription<Option<WindowId>> {
        self.slot.subscribe(observer)
    }

    fn refresh(&self) {
        self.slot.set(self.windows.key_window());
    }
}

impl Drop for KeyWindowTracker {
    fn drop(&mut self) {
        self.events.remove_observer(self.token);
        self.slot.set(None);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::{Cell, RefCell};

    struct FakeWindows {
        key: Cell<Option<WindowId>>,
    }

    impl FakeWindows {
        fn new(key: Option<WindowId>) -> Rc<Self> {
            Rc::new(Self { key: Cell::new(key) })
        }
    }

    impl WindowList for FakeWindows {
        fn key_window(&self) -> Option<WindowId> {
            self.key.get()
        }
    }

    #[derive(Default)]
    struct FakeSignal {
        observers: RefCell<Vec<(u64, Rc<dyn Fn()>)>>,
        next_token: Cell<u64>,
    }

    impl FakeSignal {
        fn new() -> Rc<Self> {
            Rc::new(Self::default())
        }

        fn fire(&self) {
            let callbacks: Vec<Rc<dyn Fn()>> = self
                .observers
                .borrow()
                .iter()
                .map(|(_, cb)| cb.clone())
                .collect();
            for callback in callbacks {
                callback();
            }
        }

        fn observer_count(&self) -> usize {
            self.observers.borrow().len()
        }
    }

    impl FocusEvents for FakeSignal {
        fn add_observer(&self, callback: Rc<dyn Fn()>) -> ObserverToken {
            let token = self.next_token.get();
            self.next_token.set(token + 1);
            self.observers.borrow_mut().push((token, callback));
            ObserverToken(token)
        }

        fn remove_observer(&self, token: ObserverToken) {
            self.observers.borrow_mut().retain(|(t, _)| *t != token.0);
        }
    }

    #[test]
    fn seeds_none_without_a_key_window() {
        let tracker = KeyWindowTracker::new(FakeWindows::new(None), FakeSignal::new());
        assert_eq!(tracker.current(), None);
    }

    #[test]
    fn seeds_from_current_key_window() {
        let windows = FakeWindows::new(Some(WindowId(3)));
        let tracker = KeyWindowTracker::new(windows, FakeSignal::new());
        assert_eq!(tracker.current(), Some(WindowId(3)));
    }

    #[test]
    fn focus_change_publishes_new_key_window() {
        let windows = FakeWindows::new(None);
        let signal = FakeSignal::new();
        let tracker = KeyWindowTracker::new(windows.clone(), signal.clone());

        windows.key.set(Some(WindowId(9)));
        signal.fire();

        assert_eq!(tracker.current(), Some(WindowId(9)));
    }

    #[test]
    fn focus_change_emits_even_when_unchanged() {
        let windows = FakeWindows::new(Some(WindowId(1)));
        let signal = FakeSignal::new();
        let tracker = KeyWindowTracker::new(windows, signal.clone());

        let emissions = Rc::new(Cell::new(0));
        let emissions_clone = emissions.clone();
        let _sub = tracker.subscribe(move |_| emissions_clone.set(emissions_clone.get() + 1));

        signal.fire();
        signal.fire();

        // One replay plus two identical republishes.
        assert_eq!(emissions.get(), 3);
    }

    #[test]
    fn teardown_emits_exactly_one_none() {
        let windows = FakeWindows::new(Some(WindowId(4)));
        let signal = FakeSignal::new();
        let tracker = KeyWindowTracker::new(windows, signal);

        let seen = Rc::new(RefCell::new(Vec::new()));
        let seen_clone = seen.clone();
        let _sub = tracker.subscribe(move |v| seen_clone.borrow_mut().push(*v));
        assert_eq!(*seen.borrow(), vec![Some(WindowId(4))]);

        drop(tracker);

        assert_eq!(*seen.borrow(), vec![Some(WindowId(4)), None]);
    }

    #[test]
    fn teardown_unregisters_from_the_signal() {
        let windows = FakeWindows::new(None);
        let signal = FakeSignal::new();
        let tracker = KeyWindowTracker::new(windows, signal.clone());

        assert_eq!(signal.observer_count(), 1);
        drop(tracker);
        assert_eq!(signal.observer_count(), 0);
    }
}
