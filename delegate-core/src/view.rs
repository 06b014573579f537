//! Registration-only facade over a dispatch list
//!
//! A publisher keeps its [`MulticastList`] private and hands out a
//! [`RegistrationView`] so other code can subscribe and unsubscribe without
//! being able to fire the event. The view borrows the list, so it can never
//! outlive it.
//!
//! ```
//! use delegate_core::{Event, RegistrationView, Slot};
//!
//! struct Button {
//!     clicked: Event<u32>,
//! }
//!
//! impl Button {
//!     fn on_click(&self) -> RegistrationView<'_, Slot<u32>> {
//!         self.clicked.view()
//!     }
//!
//!     fn press(&self, times: u32) {
//!         self.clicked.invoke(&times).unwrap();
//!     }
//! }
//!
//! fn report(times: &u32) {
//!     println!("clicked {} time(s)", times);
//! }
//!
//! let button = Button { clicked: Event::new() };
//! button.on_click().register(Slot::function(report));
//! button.press(2);
//! assert!(button.on_click().unregister(&Slot::function(report)));
//! ```

use crate::multicast::MulticastList;
use crate::slot::Binding;
use std::fmt;
use std::ops::{AddAssign, SubAssign};

/// Non-owning handle exposing registration operations only
///
/// Firing is left to the list's owner:
///
/// ```compile_fail
/// use delegate_core::{Delegate, Slot};
///
/// fn noop(_: &i32) {}
///
/// let event: Delegate<i32> = Delegate::new();
/// let view = event.view();
/// view.register(Slot::function(noop));
/// view.invoke(&0);
/// ```
pub struct RegistrationView<'a, S> {
    list: &'a MulticastList<S>,
}

impl<'a, S: Binding> RegistrationView<'a, S> {
    pub fn new(list: &'a MulticastList<S>) -> Self {
        Self { list }
    }

    /// Append `slot` to the underlying list
    pub fn register(&self, slot: S) {
        self.list.add(slot);
    }

    /// Remove the most recent registration equal to `slot`
    pub fn unregister(&self, slot: &S) -> bool {
        self.list.remove(slot)
    }

    pub fn contains(&self, slot: &S) -> bool {
        self.list.contains(slot)
    }

    pub fn len(&self) -> usize {
        self.list.len()
    }

    pub fn is_empty(&self) -> bool {
        self.list.is_empty()
    }
}

impl<S> Clone for RegistrationView<'_, S> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<S> Copy for RegistrationView<'_, S> {}

impl<S: Binding> fmt::Debug for RegistrationView<'_, S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RegistrationView")
            .field("len", &self.len())
            .finish()
    }
}

impl<S: Binding> AddAssign<S> for RegistrationView<'_, S> {
    fn add_assign(&mut self, slot: S) {
        self.register(slot);
    }
}

impl<S: Binding> SubAssign<S> for RegistrationView<'_, S> {
    fn sub_assign(&mut self, slot: S) {
        self.unregister(&slot);
    }
}
