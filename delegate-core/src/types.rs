//! Core types shared by slots and dispatch lists
//!
//! This module defines the error type raised by strict invocation, the
//! crate-wide `Result` alias, and the slot kinds.

use std::any::Any;
use std::fmt;

/// Result type for strict invocation
pub type Result<T> = std::result::Result<T, DelegateError>;

/// Errors that can occur when invoking a slot or a dispatch list
///
/// A fresh value is produced for every failure; there is no shared instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum DelegateError {
    #[error("Attempted to invoke an empty delegate for a return value")]
    EmptyInvocation,
}

/// Resolve the outcome of invoking nothing.
///
/// `()` carries no value, so an unbound unit invocation succeeds. Every other
/// return type fails with [`DelegateError::EmptyInvocation`].
pub(crate) fn unbound_result<R: 'static>() -> Result<R> {
    let unit: Box<dyn Any> = Box::new(());
    unit.downcast::<R>()
        .map(|value| *value)
        .map_err(|_| DelegateError::EmptyInvocation)
}

/// Which kind of target a slot is bound to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotKind {
    /// Nothing bound
    Empty,
    /// A method bound to a shared receiver
    BoundMethod,
    /// A plain function pointer
    FreeFunction,
    /// An owned closure
    Closure,
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SlotKind::Empty => write!(f, "empty"),
            SlotKind::BoundMethod => write!(f, "bound method"),
            SlotKind::FreeFunction => write!(f, "free function"),
            SlotKind::Closure => write!(f, "closure"),
        }
    }
}

/// Value-comparable identity of a bound target
///
/// Return types are not part of the identity, so slots with different
/// return types but the same target compare equal through it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Identity {
    Method { receiver: usize, selector: usize },
    Function(usize),
    Closure(usize),
}

impl Identity {
    pub(crate) fn kind(&self) -> SlotKind {
        match self {
            Identity::Method { .. } => SlotKind::BoundMethod,
            Identity::Function(_) => SlotKind::FreeFunction,
            Identity::Closure(_) => SlotKind::Closure,
        }
    }
}
