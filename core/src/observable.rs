//! Single-threaded observable value with an explicit subscribe/notify contract.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Callback<T> = Box<dyn FnMut(&T)>;

/// Holds a value and notifies every subscriber, in subscription order, each
/// time a new value is published. Equal values are still published.
pub struct Observable<T> {
    value: T,
    next_id: u64,
    subscribers: Vec<(SubscriptionId, Callback<T>)>,
}

impl<T> Observable<T> {
    pub fn new(value: T) -> Self {
        Self {
            value,
            next_id: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn get(&self) -> &T {
        &self.value
    }

    /// Stores `value` and notifies all subscribers before returning.
    pub fn set(&mut self, value: T) {
        self.value = value;
        for (_, callback) in &mut self.subscribers {
            callback(&self.value);
        }
    }

    /// Registers `callback`. It is not called with the current value.
    pub fn subscribe(&mut self, callback: impl FnMut(&T) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.push((id, Box::new(callback)));
        id
    }

    /// Returns false if `id` was not subscribed.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscribers.len();
        self.subscribers.retain(|(sub, _)| *sub != id);
        self.subscribers.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

impl<T: Default> Default for Observable<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

impl<T: fmt::Debug> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observable")
            .field("value", &self.value)
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    #[test]
    fn notifies_in_order_without_coalescing() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut obs = Observable::new(0);

        let a = Rc::clone(&seen);
        obs.subscribe(move |v| a.borrow_mut().push(("a", *v)));
        let b = Rc::clone(&seen);
        obs.subscribe(move |v| b.borrow_mut().push(("b", *v)));

        obs.set(1);
        obs.set(1);

        assert_eq!(*seen.borrow(), vec![("a", 1), ("b", 1), ("a", 1), ("b", 1)]);
        assert_eq!(*obs.get(), 1);
    }

    #[test]
    fn unsubscribed_callbacks_stop_firing() {
        let hits = Rc::new(RefCell::new(0));
        let mut obs = Observable::new("x");
        let h = Rc::clone(&hits);
        let id = obs.subscribe(move |_| *h.borrow_mut() += 1);

        obs.set("y");
        assert!(obs.unsubscribe(id));
        assert!(!obs.unsubscribe(id));
        obs.set("z");

        assert_eq!(*hits.borrow(), 1);
        assert_eq!(obs.subscriber_count(), 0);
    }
}
