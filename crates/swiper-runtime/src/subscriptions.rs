use std::cell::{Cell, RefCell};
use std::rc::Rc;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

pub type SubscriptionId = u64;

/// Id-keyed callback registry with reentrancy-safe emission.
///
/// `emit` snapshots the current callbacks before invoking any of them, so a
/// callback may subscribe or unsubscribe (itself included) without poisoning
/// the registry borrow. Emission order across subscribers is unspecified.
pub struct Subscriptions<T> {
    next_id: Cell<SubscriptionId>,
    entries: RefCell<FxHashMap<SubscriptionId, Rc<dyn Fn(T)>>>,
}

impl<T: Copy> Subscriptions<T> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(1),
            entries: RefCell::new(FxHashMap::default()),
        }
    }

    pub fn subscribe(&self, callback: impl Fn(T) + 'static) -> SubscriptionId {
        let id = self.next_id.get();
        self.next_id.set(id + 1);
        self.entries.borrow_mut().insert(id, Rc::new(callback));
        id
    }

    /// Returns true when the id was present.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.entries.borrow_mut().remove(&id).is_some()
    }

    pub fn emit(&self, value: T) {
        let snapshot: SmallVec<[Rc<dyn Fn(T)>; 4]> =
            self.entries.borrow().values().cloned().collect();
        for callback in snapshot {
            callback(value);
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }
}

impl<T: Copy> Default for Subscriptions<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn subscribe_emit_unsubscribe() {
        let subs: Subscriptions<f32> = Subscriptions::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let id = {
            let seen = seen.clone();
            subs.subscribe(move |value| seen.borrow_mut().push(value))
        };
        subs.emit(1.5);
        assert!(subs.unsubscribe(id));
        subs.emit(2.5);

        assert_eq!(*seen.borrow(), vec![1.5]);
        assert!(!subs.unsubscribe(id));
    }

    #[test]
    fn ids_are_unique() {
        let subs: Subscriptions<()> = Subscriptions::new();
        let a = subs.subscribe(|_| {});
        let b = subs.subscribe(|_| {});
        assert_ne!(a, b);
        assert_eq!(subs.len(), 2);
    }

    #[test]
    fn unsubscribe_during_emit_does_not_panic() {
        let subs: Rc<Subscriptions<()>> = Rc::new(Subscriptions::new());
        let id_slot = Rc::new(Cell::new(0));

        let id = {
            let subs = subs.clone();
            let id_slot = id_slot.clone();
            subs.clone()
                .subscribe(move |_| {
                    subs.unsubscribe(id_slot.get());
                })
        };
        id_slot.set(id);

        subs.emit(());
        assert!(subs.is_empty());
    }

    #[test]
    fn subscribe_during_emit_lands_in_registry() {
        let subs: Rc<Subscriptions<()>> = Rc::new(Subscriptions::new());
        let added = Rc::new(Cell::new(false));

        {
            let subs_inner = subs.clone();
            let added = added.clone();
            subs.subscribe(move |_| {
                let added = added.clone();
                subs_inner.subscribe(move |_| added.set(true));
            });
        }

        subs.emit(());
        assert_eq!(subs.len(), 2);
        assert!(!added.get());

        subs.emit(());
        assert!(added.get());
    }
}
