//! Discard-result slot for heterogeneous-return dispatch
//!
//! An [`AnySlot`] wraps a concretely typed [`Slot<A, R>`] behind a trait
//! object whose only job is "try-invoke and throw the result away". That lets
//! handlers returning `bool`, `()` or anything else share one
//! [`AnyDelegate`](crate::AnyDelegate) whose own output is `()`.

use crate::slot::{Binding, Slot};
use crate::types::{Identity, SlotKind};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Uniform view of a slot with its return type erased
trait DiscardResult<A: ?Sized> {
    /// Try-invoke the inner slot and drop its value; false if nothing ran.
    fn invoke_discarding(&self, args: &A) -> bool;
    fn identity(&self) -> Option<Identity>;
    fn is_expired(&self) -> bool;
}

impl<A: ?Sized + 'static, R: 'static> DiscardResult<A> for Slot<A, R> {
    fn invoke_discarding(&self, args: &A) -> bool {
        self.try_invoke(args).is_some()
    }

    fn identity(&self) -> Option<Identity> {
        Slot::identity(self)
    }

    fn is_expired(&self) -> bool {
        Slot::is_expired(self)
    }
}

/// A slot that accepts a target of any return type and discards the result
///
/// Equality and emptiness follow the inner binding only; the erased return
/// type is not part of the identity.
///
/// ```
/// use delegate_core::AnySlot;
///
/// fn is_positive(x: &i32) -> bool {
///     *x > 0
/// }
///
/// let slot = AnySlot::function(is_positive);
/// slot.invoke(&3);
/// assert_eq!(slot, AnySlot::function(is_positive));
/// ```
pub struct AnySlot<A: ?Sized> {
    inner: Option<Rc<dyn DiscardResult<A>>>,
}

impl<A: ?Sized + 'static> AnySlot<A> {
    /// Create an empty slot
    pub fn new() -> Self {
        Self { inner: None }
    }

    pub fn method<T: 'static, R: 'static>(receiver: &Rc<T>, method: fn(&T, &A) -> R) -> Self {
        Self::from(Slot::method(receiver, method))
    }

    pub fn method_mut<T: 'static, R: 'static>(
        receiver: &Rc<RefCell<T>>,
        method: fn(&mut T, &A) -> R,
    ) -> Self {
        Self::from(Slot::method_mut(receiver, method))
    }

    pub fn function<R: 'static>(function: fn(&A) -> R) -> Self {
        Self::from(Slot::function(function))
    }

    pub fn closure<F, R>(closure: F) -> Self
    where
        F: Fn(&A) -> R + 'static,
        R: 'static,
    {
        Self::from(Slot::closure(closure))
    }

    /// Bind `method` on `receiver`, replacing any previous binding
    pub fn bind_method<T: 'static, R: 'static>(&mut self, receiver: &Rc<T>, method: fn(&T, &A) -> R) {
        self.bind_slot(Slot::method(receiver, method));
    }

    /// Bind a mutating `method` on `receiver`, replacing any previous binding
    ///
    /// # Panics
    ///
    /// Invoking panics if `receiver` is already borrowed, see
    /// [`Slot::bind_method_mut`].
    pub fn bind_method_mut<T: 'static, R: 'static>(
        &mut self,
        receiver: &Rc<RefCell<T>>,
        method: fn(&mut T, &A) -> R,
    ) {
        self.bind_slot(Slot::method_mut(receiver, method));
    }

    /// Bind a free function, replacing any previous binding
    pub fn bind_function<R: 'static>(&mut self, function: fn(&A) -> R) {
        self.bind_slot(Slot::function(function));
    }

    /// Bind an owned closure, replacing any previous binding
    pub fn bind_closure<F, R>(&mut self, closure: F)
    where
        F: Fn(&A) -> R + 'static,
        R: 'static,
    {
        self.bind_slot(Slot::closure(closure));
    }

    /// Store an already built slot; an empty one leaves this slot empty
    pub fn bind_slot<R: 'static>(&mut self, slot: Slot<A, R>) {
        self.inner = if slot.is_empty() {
            None
        } else {
            Some(Rc::new(slot))
        };
    }

    pub fn unbind(&mut self) {
        self.inner = None;
    }

    pub fn is_empty(&self) -> bool {
        self.inner.is_none()
    }

    pub fn kind(&self) -> SlotKind {
        self.identity()
            .map(|identity| identity.kind())
            .unwrap_or(SlotKind::Empty)
    }

    /// True if the inner slot is a bound method whose receiver was dropped
    pub fn is_expired(&self) -> bool {
        self.inner.as_ref().is_some_and(|inner| inner.is_expired())
    }

    /// Invoke the inner slot and discard its result; never fails
    pub fn invoke(&self, args: &A) {
        self.try_invoke(args);
    }

    /// Invoke the inner slot; `None` if nothing was called
    pub fn try_invoke(&self, args: &A) -> Option<()> {
        let inner = self.inner.as_ref()?;
        inner.invoke_discarding(args).then_some(())
    }

    fn identity(&self) -> Option<Identity> {
        self.inner.as_ref().and_then(|inner| inner.identity())
    }
}

impl<A: ?Sized + 'static> Default for AnySlot<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized> Clone for AnySlot<A> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<A: ?Sized + 'static> PartialEq for AnySlot<A> {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl<A: ?Sized + 'static> Eq for AnySlot<A> {}

impl<A: ?Sized + 'static> fmt::Debug for AnySlot<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnySlot")
            .field("kind", &self.kind())
            .field("identity", &self.identity())
            .finish()
    }
}

impl<A: ?Sized + 'static, R: 'static> From<Slot<A, R>> for AnySlot<A> {
    fn from(slot: Slot<A, R>) -> Self {
        let mut any = Self::new();
        any.bind_slot(slot);
        any
    }
}

impl<A: ?Sized + 'static> Binding for AnySlot<A> {
    type Args = A;
    type Output = ();

    fn is_empty(&self) -> bool {
        AnySlot::is_empty(self)
    }

    fn kind(&self) -> SlotKind {
        AnySlot::kind(self)
    }

    fn try_invoke(&self, args: &A) -> Option<()> {
        AnySlot::try_invoke(self, args)
    }
}
