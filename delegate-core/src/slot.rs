//! Single type-erased callable binding
//!
//! A [`Slot`] holds at most one target: a method bound to a shared receiver,
//! a free function, or an owned closure. Slots compare by the identity of
//! their target, which is what lets a listener unregister itself later by
//! building an equal slot.

use crate::types::{unbound_result, Identity, Result, SlotKind};
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// Common surface of anything a [`MulticastList`](crate::MulticastList) can store
pub trait Binding: Clone + PartialEq {
    /// Event argument type (passed by reference)
    type Args: ?Sized;
    /// What one invocation produces
    type Output: 'static;

    /// True if nothing is bound
    fn is_empty(&self) -> bool;

    /// Kind of the bound target
    fn kind(&self) -> SlotKind;

    /// Invoke the target, or return `None` without calling anything if unbound
    fn try_invoke(&self, args: &Self::Args) -> Option<Self::Output>;
}

/// Receiver-side half of a bound method
///
/// The receiver is held weakly; a slot never keeps it alive.
trait BoundReceiver<A: ?Sized, R> {
    fn call(&self, args: &A) -> Option<R>;
    fn is_alive(&self) -> bool;
}

struct SharedReceiver<T, A: ?Sized, R> {
    receiver: Weak<T>,
    method: fn(&T, &A) -> R,
}

impl<T, A: ?Sized, R> BoundReceiver<A, R> for SharedReceiver<T, A, R> {
    fn call(&self, args: &A) -> Option<R> {
        let receiver = self.receiver.upgrade()?;
        Some((self.method)(&receiver, args))
    }

    fn is_alive(&self) -> bool {
        self.receiver.strong_count() > 0
    }
}

struct ExclusiveReceiver<T, A: ?Sized, R> {
    receiver: Weak<RefCell<T>>,
    method: fn(&mut T, &A) -> R,
}

impl<T, A: ?Sized, R> BoundReceiver<A, R> for ExclusiveReceiver<T, A, R> {
    fn call(&self, args: &A) -> Option<R> {
        let receiver = self.receiver.upgrade()?;
        // Panics if the receiver is already borrowed, e.g. a handler firing
        // an event that calls back into the same receiver.
        let mut receiver = receiver.borrow_mut();
        Some((self.method)(&mut receiver, args))
    }

    fn is_alive(&self) -> bool {
        self.receiver.strong_count() > 0
    }
}

enum Target<A: ?Sized, R> {
    Empty,
    Method {
        receiver: usize,
        selector: usize,
        bound: Rc<dyn BoundReceiver<A, R>>,
    },
    Function(fn(&A) -> R),
    Closure(Rc<dyn Fn(&A) -> R>),
}

impl<A: ?Sized, R> Clone for Target<A, R> {
    fn clone(&self) -> Self {
        match self {
            Target::Empty => Target::Empty,
            Target::Method {
                receiver,
                selector,
                bound,
            } => Target::Method {
                receiver: *receiver,
                selector: *selector,
                bound: Rc::clone(bound),
            },
            Target::Function(function) => Target::Function(*function),
            Target::Closure(closure) => Target::Closure(Rc::clone(closure)),
        }
    }
}

/// A single callable binding taking `&A` and returning `R`
///
/// # Example
///
/// ```
/// use delegate_core::Slot;
/// use std::rc::Rc;
///
/// struct Scale(i32);
///
/// impl Scale {
///     fn apply(&self, x: &i32) -> i32 {
///         self.0 * x
///     }
/// }
///
/// let scale = Rc::new(Scale(3));
/// let slot = Slot::method(&scale, Scale::apply);
/// assert_eq!(slot.invoke(&2).unwrap(), 6);
/// assert_eq!(slot, Slot::method(&scale, Scale::apply));
/// ```
pub struct Slot<A: ?Sized, R = ()> {
    target: Target<A, R>,
}

impl<A: ?Sized + 'static, R: 'static> Slot<A, R> {
    /// Create an empty slot
    pub fn new() -> Self {
        Self {
            target: Target::Empty,
        }
    }

    /// Create a slot bound to `method` on `receiver`
    pub fn method<T: 'static>(receiver: &Rc<T>, method: fn(&T, &A) -> R) -> Self {
        let mut slot = Self::new();
        slot.bind_method(receiver, method);
        slot
    }

    /// Create a slot bound to a mutating `method` on `receiver`
    ///
    /// # Panics
    ///
    /// Invoking the slot panics if `receiver` is already borrowed, which
    /// happens when the method re-enters a dispatch that calls it again.
    pub fn method_mut<T: 'static>(receiver: &Rc<RefCell<T>>, method: fn(&mut T, &A) -> R) -> Self {
        let mut slot = Self::new();
        slot.bind_method_mut(receiver, method);
        slot
    }

    /// Create a slot bound to a free function
    ///
    /// Closures that capture nothing coerce to `fn` pointers and land here,
    /// which gives them value identity.
    pub fn function(function: fn(&A) -> R) -> Self {
        let mut slot = Self::new();
        slot.bind_function(function);
        slot
    }

    /// Create a slot owning `closure`
    pub fn closure<F>(closure: F) -> Self
    where
        F: Fn(&A) -> R + 'static,
    {
        let mut slot = Self::new();
        slot.bind_closure(closure);
        slot
    }

    /// Bind `method` on `receiver`, replacing any previous binding
    ///
    /// The receiver is referenced weakly. Once it is dropped the slot behaves
    /// as unbound when invoked, see [`Slot::is_expired`].
    pub fn bind_method<T: 'static>(&mut self, receiver: &Rc<T>, method: fn(&T, &A) -> R) {
        self.target = Target::Method {
            receiver: Rc::as_ptr(receiver) as *const () as usize,
            selector: method as usize,
            bound: Rc::new(SharedReceiver {
                receiver: Rc::downgrade(receiver),
                method,
            }),
        };
    }

    /// Bind a mutating `method` on `receiver`, replacing any previous binding
    ///
    /// The receiver is borrowed mutably for the duration of each call.
    ///
    /// # Panics
    ///
    /// Invoking the slot panics if `receiver` is already borrowed, for
    /// example when the method fires an event that calls back into the same
    /// receiver.
    pub fn bind_method_mut<T: 'static>(
        &mut self,
        receiver: &Rc<RefCell<T>>,
        method: fn(&mut T, &A) -> R,
    ) {
        self.target = Target::Method {
            receiver: Rc::as_ptr(receiver) as *const () as usize,
            selector: method as usize,
            bound: Rc::new(ExclusiveReceiver {
                receiver: Rc::downgrade(receiver),
                method,
            }),
        };
    }

    /// Bind a free function, replacing any previous binding
    pub fn bind_function(&mut self, function: fn(&A) -> R) {
        self.target = Target::Function(function);
    }

    /// Bind an owned closure, replacing any previous binding
    ///
    /// A closure slot is equal only to itself and its clones.
    pub fn bind_closure<F>(&mut self, closure: F)
    where
        F: Fn(&A) -> R + 'static,
    {
        self.target = Target::Closure(Rc::new(closure));
    }

    /// Reset to the empty state
    pub fn unbind(&mut self) {
        self.target = Target::Empty;
    }

    /// True if nothing is bound
    pub fn is_empty(&self) -> bool {
        matches!(self.target, Target::Empty)
    }

    /// Kind of the bound target
    pub fn kind(&self) -> SlotKind {
        match &self.target {
            Target::Empty => SlotKind::Empty,
            Target::Method { .. } => SlotKind::BoundMethod,
            Target::Function(_) => SlotKind::FreeFunction,
            Target::Closure(_) => SlotKind::Closure,
        }
    }

    /// True if this is a bound method whose receiver has been dropped
    pub fn is_expired(&self) -> bool {
        match &self.target {
            Target::Method { bound, .. } => !bound.is_alive(),
            _ => false,
        }
    }

    /// Invoke the bound target and return its result
    ///
    /// With nothing bound (or an expired receiver) this returns
    /// [`DelegateError::EmptyInvocation`](crate::DelegateError::EmptyInvocation),
    /// except for `R = ()` where it is a no-op.
    pub fn invoke(&self, args: &A) -> Result<R> {
        match self.try_invoke(args) {
            Some(value) => Ok(value),
            None => unbound_result(),
        }
    }

    /// Invoke the bound target, or return `None` without calling anything
    ///
    /// For `R = ()` a successful call yields `Some(())`.
    pub fn try_invoke(&self, args: &A) -> Option<R> {
        match &self.target {
            Target::Empty => None,
            Target::Method { bound, .. } => {
                let result = bound.call(args);
                if result.is_none() {
                    log::debug!("Skipping bound method whose receiver was dropped");
                }
                result
            }
            Target::Function(function) => Some(function(args)),
            Target::Closure(closure) => Some(closure(args)),
        }
    }

    pub(crate) fn identity(&self) -> Option<Identity> {
        match &self.target {
            Target::Empty => None,
            Target::Method {
                receiver, selector, ..
            } => Some(Identity::Method {
                receiver: *receiver,
                selector: *selector,
            }),
            Target::Function(function) => Some(Identity::Function(*function as usize)),
            Target::Closure(closure) => Some(Identity::Closure(
                Rc::as_ptr(closure) as *const () as usize,
            )),
        }
    }
}

impl<A: ?Sized + 'static, R: 'static> Default for Slot<A, R> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A: ?Sized, R> Clone for Slot<A, R> {
    fn clone(&self) -> Self {
        Self {
            target: self.target.clone(),
        }
    }
}

impl<A: ?Sized + 'static, R: 'static> PartialEq for Slot<A, R> {
    fn eq(&self, other: &Self) -> bool {
        self.identity() == other.identity()
    }
}

impl<A: ?Sized + 'static, R: 'static> Eq for Slot<A, R> {}

impl<A: ?Sized + 'static, R: 'static> fmt::Debug for Slot<A, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Slot")
            .field("kind", &self.kind())
            .field("identity", &self.identity())
            .finish()
    }
}

impl<A: ?Sized + 'static, R: 'static> From<fn(&A) -> R> for Slot<A, R> {
    fn from(function: fn(&A) -> R) -> Self {
        Self::function(function)
    }
}

impl<A: ?Sized + 'static, R: 'static> Binding for Slot<A, R> {
    type Args = A;
    type Output = R;

    fn is_empty(&self) -> bool {
        Slot::is_empty(self)
    }

    fn kind(&self) -> SlotKind {
        Slot::kind(self)
    }

    fn try_invoke(&self, args: &A) -> Option<R> {
        Slot::try_invoke(self, args)
    }
}
