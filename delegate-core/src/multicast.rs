//! Ordered multicast dispatch list
//!
//! A [`MulticastList`] stores bindings in insertion order and fires all of
//! them on [`invoke`](MulticastList::invoke). Every operation takes `&self`:
//! the slot sequence lives in a `RefCell`, so a [`RegistrationView`] can be
//! handed out while the owner keeps the ability to fire.
//!
//! # Re-entrancy
//!
//! Dispatch runs over a snapshot taken when `invoke` starts. A handler may
//! add, remove or clear slots on the list it is being called from; the
//! change is visible to the next dispatch, not the running one.

use crate::any_slot::AnySlot;
use crate::config::ListConfig;
use crate::slot::{Binding, Slot};
use crate::types::{unbound_result, Result};
use crate::view::RegistrationView;
use std::cell::RefCell;
use std::fmt;
use std::ops::{AddAssign, SubAssign};
use std::ptr;
use std::rc::Rc;

/// Multicast list of [`Slot<A, R>`]; the last slot's result is returned
pub type Delegate<A, R = ()> = MulticastList<Slot<A, R>>;

/// Multicast list accepting handlers of any return type, results discarded
pub type AnyDelegate<A> = MulticastList<AnySlot<A>>;

/// Alias used by publishers exposing an event
pub type Event<A, R = ()> = Delegate<A, R>;

/// An insertion-ordered sequence of non-empty bindings
///
/// # Example
///
/// ```
/// use delegate_core::{Delegate, Slot};
///
/// fn add_one(x: &i32) -> i32 {
///     x + 1
/// }
///
/// fn add_two(x: &i32) -> i32 {
///     x + 2
/// }
///
/// let event: Delegate<i32, i32> = Delegate::new();
/// event.add(Slot::function(add_one));
/// event.add(Slot::function(add_two));
///
/// // Both run, the last registration's result wins
/// assert_eq!(event.invoke(&10).unwrap(), 12);
/// ```
pub struct MulticastList<S> {
    slots: RefCell<Vec<S>>,
}

impl<S: Binding> MulticastList<S> {
    /// Create an empty list with the default configuration
    pub fn new() -> Self {
        Self::with_config(&ListConfig::default())
    }

    /// Create an empty list with room for `capacity` slots
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: RefCell::new(Vec::with_capacity(capacity)),
        }
    }

    /// Create an empty list from a configuration
    pub fn with_config(config: &ListConfig) -> Self {
        Self::with_capacity(config.initial_capacity)
    }

    /// Append `slot`; empty slots are ignored, duplicates are kept
    pub fn add(&self, slot: S) {
        if slot.is_empty() {
            log::debug!("Ignoring empty slot on add");
            return;
        }

        log::trace!("Adding {} slot", slot.kind());
        self.slots.borrow_mut().push(slot);
    }

    /// Remove the most recently added slot equal to `slot`
    ///
    /// Only one registration is removed per call. Returns whether anything
    /// was removed.
    pub fn remove(&self, slot: &S) -> bool {
        let mut slots = self.slots.borrow_mut();
        match slots.iter().rposition(|stored| stored == slot) {
            Some(index) => {
                slots.remove(index);
                log::trace!("Removed {} slot at position {}", slot.kind(), index);
                true
            }
            None => false,
        }
    }

    /// True if any stored slot is equal to `slot`
    pub fn contains(&self, slot: &S) -> bool {
        self.slots.borrow().iter().any(|stored| stored == slot)
    }

    /// Remove every slot
    pub fn clear(&self) {
        self.slots.borrow_mut().clear();
    }

    pub fn is_empty(&self) -> bool {
        self.slots.borrow().is_empty()
    }

    /// Number of registrations
    pub fn len(&self) -> usize {
        self.slots.borrow().len()
    }

    /// Copy of the current slot sequence, in dispatch order
    pub fn slots(&self) -> Vec<S> {
        self.slots.borrow().clone()
    }

    /// Exchange the contents of two lists
    pub fn swap(&self, other: &Self) {
        if ptr::eq(self, other) {
            return;
        }
        self.slots.swap(&other.slots);
    }

    /// Registration-only handle over this list
    pub fn view(&self) -> RegistrationView<'_, S> {
        RegistrationView::new(self)
    }

    /// Invoke every slot in insertion order and return the last result
    ///
    /// Results of earlier slots are dropped. An empty list fails with
    /// [`DelegateError::EmptyInvocation`](crate::DelegateError::EmptyInvocation)
    /// unless the output is `()`. A panicking handler stops the dispatch;
    /// slots that already ran are not undone.
    pub fn invoke(&self, args: &S::Args) -> Result<S::Output> {
        match self.try_invoke(args) {
            Some(value) => Ok(value),
            None => unbound_result(),
        }
    }

    /// Invoke every slot, or return `None` without calling anything if empty
    ///
    /// Bound methods whose receiver was dropped are skipped, so the returned
    /// value comes from the last slot that actually ran.
    pub fn try_invoke(&self, args: &S::Args) -> Option<S::Output> {
        let snapshot = self.slots();
        if snapshot.is_empty() {
            log::debug!("Dispatch on empty list");
            return None;
        }

        log::trace!("Dispatching to {} slot(s)", snapshot.len());
        let mut last = None;
        for slot in &snapshot {
            if let Some(value) = slot.try_invoke(args) {
                last = Some(value);
            }
        }
        last
    }
}

/// Shorthands that build the slot in place
impl<A: ?Sized + 'static, R: 'static> MulticastList<Slot<A, R>> {
    /// Append `method` bound to `receiver`
    pub fn add_method<T: 'static>(&self, receiver: &Rc<T>, method: fn(&T, &A) -> R) {
        self.add(Slot::method(receiver, method));
    }

    /// Remove the most recent registration of `method` on `receiver`
    pub fn remove_method<T: 'static>(&self, receiver: &Rc<T>, method: fn(&T, &A) -> R) -> bool {
        self.remove(&Slot::method(receiver, method))
    }

    pub fn contains_method<T: 'static>(&self, receiver: &Rc<T>, method: fn(&T, &A) -> R) -> bool {
        self.contains(&Slot::method(receiver, method))
    }

    /// Append a free function
    pub fn add_function(&self, function: fn(&A) -> R) {
        self.add(Slot::function(function));
    }

    /// Remove the most recent registration of `function`
    pub fn remove_function(&self, function: fn(&A) -> R) -> bool {
        self.remove(&Slot::function(function))
    }

    pub fn contains_function(&self, function: fn(&A) -> R) -> bool {
        self.contains(&Slot::function(function))
    }
}

impl<S: Binding> Default for MulticastList<S> {
    fn default() -> Self {
        Self::new()
    }
}

impl<S: Binding> Clone for MulticastList<S> {
    fn clone(&self) -> Self {
        Self {
            slots: RefCell::new(self.slots()),
        }
    }
}

impl<S: Binding + fmt::Debug> fmt::Debug for MulticastList<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MulticastList")
            .field("slots", &self.slots.borrow())
            .finish()
    }
}

impl<S: Binding> AddAssign<S> for MulticastList<S> {
    fn add_assign(&mut self, slot: S) {
        self.add(slot);
    }
}

impl<S: Binding> SubAssign<S> for MulticastList<S> {
    fn sub_assign(&mut self, slot: S) {
        self.remove(&slot);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::DelegateError;
    use std::cell::Cell;

    thread_local! {
        static TRACE: RefCell<Vec<&'static str>> = const { RefCell::new(Vec::new()) };
    }

    fn first(x: &i32) -> i32 {
        TRACE.with(|t| t.borrow_mut().push("first"));
        x + 1
    }

    fn second(x: &i32) -> i32 {
        TRACE.with(|t| t.borrow_mut().push("second"));
        x + 2
    }

    fn third(x: &i32) -> i32 {
        TRACE.with(|t| t.borrow_mut().push("third"));
        x + 3
    }

    fn take_trace() -> Vec<&'static str> {
        TRACE.with(|t| std::mem::take(&mut *t.borrow_mut()))
    }

    #[test]
    fn test_add_ignores_empty_slots() {
        let list: Delegate<i32, i32> = Delegate::new();
        list.add(Slot::new());
        list.add(Slot::function(first));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_invoke_order_and_last_result() {
        take_trace();
        let list: Delegate<i32, i32> = Delegate::new();
        list.add(Slot::function(first));
        list.add(Slot::function(second));
        list.add(Slot::function(third));

        assert_eq!(list.invoke(&0), Ok(3));
        assert_eq!(take_trace(), vec!["first", "second", "third"]);
    }

    #[test]
    fn test_remove_most_recent_match() {
        let list: Delegate<i32, i32> = Delegate::new();
        let a = Slot::function(first);
        let b = Slot::function(second);
        list.add(a.clone());
        list.add(b.clone());
        list.add(a.clone());

        assert!(list.remove(&a));
        assert_eq!(list.slots(), vec![a.clone(), b.clone()]);
        assert!(list.contains(&a));
    }

    #[test]
    fn test_remove_missing_returns_false() {
        let list: Delegate<i32, i32> = Delegate::new();
        list.add(Slot::function(first));

        assert!(!list.remove(&Slot::function(second)));
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn test_empty_list_invocation() {
        let values: Delegate<i32, i32> = Delegate::new();
        assert_eq!(values.invoke(&1), Err(DelegateError::EmptyInvocation));
        assert_eq!(values.try_invoke(&1), None);

        let unit: Delegate<i32> = Delegate::new();
        assert_eq!(unit.invoke(&1), Ok(()));
        assert_eq!(unit.try_invoke(&1), None);
    }

    #[test]
    fn test_clear_and_swap() {
        let left: Delegate<i32, i32> = Delegate::new();
        let right: Delegate<i32, i32> = Delegate::new();
        left.add(Slot::function(first));
        left.add(Slot::function(second));
        right.add(Slot::function(third));

        left.swap(&right);
        assert_eq!(left.len(), 1);
        assert_eq!(right.len(), 2);

        left.swap(&left);
        assert_eq!(left.len(), 1);

        right.clear();
        assert!(right.is_empty());
    }

    #[test]
    fn test_operators() {
        let mut list: Delegate<i32, i32> = Delegate::with_capacity(8);
        list += Slot::function(first);
        list += Slot::function(second);
        list -= Slot::function(first);
        assert_eq!(list.slots(), vec![Slot::function(second)]);
    }

    #[test]
    fn test_handler_can_unsubscribe_itself_during_dispatch() {
        let list: Rc<Delegate<i32>> = Rc::new(Delegate::new());
        let calls = Rc::new(Cell::new(0));

        let slot_cell: Rc<RefCell<Slot<i32>>> = Rc::new(RefCell::new(Slot::new()));
        let weak_list = Rc::downgrade(&list);
        let own = Rc::downgrade(&slot_cell);
        let counter = Rc::clone(&calls);
        slot_cell.borrow_mut().bind_closure(move |_: &i32| {
            counter.set(counter.get() + 1);
            if let (Some(list), Some(own)) = (weak_list.upgrade(), own.upgrade()) {
                list.remove(&own.borrow());
            }
        });

        list.add(slot_cell.borrow().clone());
        list.invoke(&0).unwrap();
        list.invoke(&0).unwrap();

        assert_eq!(calls.get(), 1);
        assert!(list.is_empty());
        // The closure only holds the slot weakly
        assert_eq!(Rc::strong_count(&slot_cell), 1);
    }

    #[test]
    fn test_method_and_function_shorthands() {
        struct Source(i32);
        impl Source {
            fn value(&self, _: &i32) -> i32 {
                self.0
            }
        }

        take_trace();
        let source = Rc::new(Source(7));
        let list: Delegate<i32, i32> = Delegate::new();
        list.add_function(first);
        list.add_method(&source, Source::value);
        list.add_function(first);

        assert!(list.contains_method(&source, Source::value));
        assert!(list.contains_function(first));
        assert!(!list.contains_function(second));
        assert_eq!(list.invoke(&0), Ok(1));

        assert!(list.remove_function(first));
        assert_eq!(list.invoke(&0), Ok(7));
        assert!(list.remove_method(&source, Source::value));
        assert!(!list.remove_method(&source, Source::value));
        assert_eq!(list.slots(), vec![Slot::function(first)]);
        assert_eq!(take_trace(), vec!["first", "first", "first"]);
    }

    #[test]
    fn test_expired_receivers_are_skipped() {
        struct Source(i32);
        impl Source {
            fn value(&self, _: &i32) -> i32 {
                self.0
            }
        }

        let alive = Rc::new(Source(1));
        let doomed = Rc::new(Source(2));
        let list: Delegate<i32, i32> = Delegate::new();
        list.add(Slot::method(&alive, Source::value));
        list.add(Slot::method(&doomed, Source::value));
        drop(doomed);

        assert_eq!(list.invoke(&0), Ok(1));
    }

    #[test]
    fn test_any_delegate_mixed_returns() {
        let hits = Rc::new(Cell::new(0));
        let a = Rc::clone(&hits);
        let b = Rc::clone(&hits);

        let list: AnyDelegate<i32> = AnyDelegate::new();
        list.add(AnySlot::closure(move |x: &i32| {
            a.set(a.get() + x);
            true
        }));
        list.add(AnySlot::closure(move |x: &i32| b.set(b.get() + x)));
        list.add(AnySlot::function(first));

        assert_eq!(list.invoke(&2), Ok(()));
        assert_eq!(hits.get(), 4);
        assert!(list.remove(&AnySlot::function(first)));
        assert_eq!(list.len(), 2);
    }
}
