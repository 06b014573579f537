//! Delegate Core Library
//!
//! Callback registration and multicast dispatch for single-threaded code.
//!
//! # Architecture
//!
//! - [`Slot`] holds one binding: a method on a shared receiver, a free
//!   function, or a closure. Slots compare by target identity.
//! - [`MulticastList`] keeps slots in insertion order and fires all of them;
//!   [`Delegate`] returns the last slot's result.
//! - [`AnySlot`] erases the return type so handlers returning different types
//!   can share one [`AnyDelegate`].
//! - [`RegistrationView`] lets a publisher expose subscribe/unsubscribe
//!   without exposing the ability to fire.
//!
//! The library does NOT:
//! - Synchronize across threads (types are `!Send`)
//! - Keep receivers alive (bound methods hold them weakly)
//! - Isolate handler panics
//!
//! # Example Usage
//!
//! ```
//! use delegate_core::{Delegate, DelegateError, Slot};
//! use std::cell::RefCell;
//! use std::rc::Rc;
//!
//! struct Tally {
//!     seen: Vec<i32>,
//! }
//!
//! impl Tally {
//!     fn record(&mut self, value: &i32) {
//!         self.seen.push(*value);
//!     }
//! }
//!
//! let tally = Rc::new(RefCell::new(Tally { seen: Vec::new() }));
//! let changed: Delegate<i32> = Delegate::new();
//!
//! let handler = Slot::method_mut(&tally, Tally::record);
//! changed.add(handler.clone());
//! changed.invoke(&5).unwrap();
//! assert_eq!(tally.borrow().seen, vec![5]);
//!
//! assert!(changed.remove(&handler));
//! assert_eq!(changed.try_invoke(&6), None);
//!
//! let scores: Delegate<i32, i32> = Delegate::new();
//! assert_eq!(scores.invoke(&1), Err(DelegateError::EmptyInvocation));
//! ```

// Public modules
pub mod any_slot;
pub mod config;
pub mod multicast;
pub mod slot;
pub mod types;
pub mod view;

// Re-export main types for convenience
pub use any_slot::AnySlot;
pub use config::ListConfig;
pub use multicast::{AnyDelegate, Delegate, Event, MulticastList};
pub use slot::{Binding, Slot};
pub use types::{DelegateError, Result, SlotKind};
pub use view::RegistrationView;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_library_basics() {
        // Smoke test: a fresh list has nothing to fire
        let list: Delegate<i32, i32> = Delegate::with_config(&ListConfig::new());
        assert!(list.is_empty());
        assert_eq!(list.try_invoke(&0), None);
    }
}
