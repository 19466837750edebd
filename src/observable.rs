//! Observable value with an explicit observer list.
//!
//! `Subject<T>` holds a current value and notifies registered observers on
//! every `set`, including sets that leave the value unchanged. Subscribing
//! replays the current value immediately; the returned [`Subscription`]
//! unregisters its observer when dropped. Single-threaded, main-loop-bound.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

struct SubjectInner<T> {
    value: RefCell<T>,
    observers: RefCell<Vec<(u64, Rc<dyn Fn(&T)>)>>,
    next_id: Cell<u64>,
}

pub struct Subject<T> {
    inner: Rc<SubjectInner<T>>,
}

impl<T> Clone for Subject<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T: Clone> Subject<T> {
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(SubjectInner {
                value: RefCell::new(value),
                observers: RefCell::new(Vec::new()),
                next_id: Cell::new(0),
            }),
        }
    }

    /// Current value, cloned out of the slot.
    pub fn get(&self) -> T {
        self.inner.value.borrow().clone()
    }

    /// Stores `value` and notifies every observer, even if the value is
    /// unchanged. Observers run synchronously, in subscription order.
    pub fn set(&self, value: T) {
        *self.inner.value.borrow_mut() = value;
        self.notify_all();
    }

    /// Registers `observer` and immediately replays the current value to it.
    pub fn subscribe(&self, observer: impl Fn(&T) + 'static) -> Subscription<T> {
        let id = self.inner.next_id.get();
        self.inner.next_id.set(id + 1);

        let observer: Rc<dyn Fn(&T)> = Rc::new(observer);
        self.inner.observers.borrow_mut().push((id, observer.clone()));

        let current = self.get();
        observer(&current);

        Subscription {
            inner: Rc::downgrade(&self.inner),
            id,
        }
    }

    fn notify_all(&self) {
        // Snapshot so an observer may subscribe/unsubscribe without holding
        // the list borrow across its own callback.
        let observers: Vec<Rc<dyn Fn(&T)>> = self
            .inner
            .observers
            .borrow()
            .iter()
            .map(|(_, observer)| observer.clone())
            .collect();
        let current = self.get();
        for observer in observers {
            observer(&current);
        }
    }
}

/// Keeps an observer registered for as long as it is held.
pub struct Subscription<T> {
    inner: Weak<SubjectInner<T>>,
    id: u64,
}

impl<T> Drop for Subscription<T> {
    fn drop(&mut self) {
        if let Some(inner) = self.inner.upgrade() {
            inner.observers.borrow_mut().retain(|(id, _)| *id != self.id);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_replays_current_value() {
        let subject = Subject::new(7);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = seen.clone();
        let _sub = subject.subscribe(move |v| seen_clone.borrow_mut().push(*v));

        assert_eq!(*seen.borrow(), vec![7]);
    }

    #[test]
    fn set_notifies_all_observers() {
        let subject = Subject::new(0);
        let a = Rc::new(RefCell::new(Vec::new()));
        let b = Rc::new(RefCell::new(Vec::new()));

        let a_clone = a.clone();
        let _sub_a = subject.subscribe(move |v| a_clone.borrow_mut().push(*v));
        let b_clone = b.clone();
        let _sub_b = subject.subscribe(move |v| b_clone.borrow_mut().push(*v));

        subject.set(1);
        subject.set(2);

        assert_eq!(*a.borrow(), vec![0, 1, 2]);
        assert_eq!(*b.borrow(), vec![0, 1, 2]);
    }

    #[test]
    fn set_notifies_even_when_value_unchanged() {
        let subject = Subject::new(5);
        let count = Rc::new(Cell::new(0));

        let count_clone = count.clone();
        let _sub = subject.subscribe(move |_| count_clone.set(count_clone.get() + 1));

        subject.set(5);
        subject.set(5);

        // One replay plus two identical sets.
        assert_eq!(count.get(), 3);
    }

    #[test]
    fn dropped_subscription_stops_notifications() {
        let subject = Subject::new(0);
        let seen = Rc::new(RefCell::new(Vec::new()));

        let seen_clone = seen.clone();
        let sub = subject.subscribe(move |v| seen_clone.borrow_mut().push(*v));
        subject.set(1);
        drop(sub);
        subject.set(2);

        assert_eq!(*seen.borrow(), vec![0, 1]);
    }

    #[test]
    fn get_returns_latest_value() {
        let subject = Subject::new("a".to_string());
        subject.set("b".to_string());
        assert_eq!(subject.get(), "b");
    }
}
