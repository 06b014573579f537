//! Scenario listeners
//!
//! Each configured listener becomes a receiver whose methods are bound into
//! slots. Method and free-function handlers are rebuilt on every
//! subscribe/unsubscribe and matched by identity; closure handlers have no
//! value identity, so the slot created once per listener is reused.

use crate::config::{HandlerKind, ListenerConfig};
use delegate_core::{AnySlot, Slot};
use serde::Serialize;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

/// Stateless handler shared by every `echo` listener
pub fn echo(value: &i64) -> i64 {
    log::debug!("echo <- {}", value);
    *value
}

/// A configured listener and everything it has observed
pub struct Listener {
    pub name: String,
    pub handler: HandlerKind,
    param: i64,
    total: Cell<i64>,
    calls: RefCell<Vec<i64>>,
}

impl Listener {
    pub fn new(config: &ListenerConfig) -> Rc<Self> {
        Rc::new(Self {
            name: config.name.clone(),
            handler: config.handler,
            param: config.param,
            total: Cell::new(0),
            calls: RefCell::new(Vec::new()),
        })
    }

    fn scale(&self, value: &i64) -> i64 {
        self.calls.borrow_mut().push(*value);
        value.saturating_mul(self.param)
    }

    fn accumulate(&self, value: &i64) -> i64 {
        self.calls.borrow_mut().push(*value);
        let total = self.total.get().saturating_add(*value);
        self.total.set(total);
        total
    }

    fn threshold(&self, value: &i64) -> bool {
        self.calls.borrow_mut().push(*value);
        *value >= self.param
    }

    fn summary(&self) -> ListenerSummary {
        ListenerSummary {
            name: self.name.clone(),
            handler: self.handler,
            calls: self.calls.borrow().clone(),
        }
    }
}

/// What a listener saw during the scenario
#[derive(Debug, Clone, Serialize)]
pub struct ListenerSummary {
    pub name: String,
    pub handler: HandlerKind,
    pub calls: Vec<i64>,
}

/// A listener together with its pre-built closure slot
pub struct Subscriber {
    listener: Rc<Listener>,
    closure: Option<AnySlot<i64>>,
}

impl Subscriber {
    pub fn new(config: &ListenerConfig) -> Self {
        let listener = Listener::new(config);
        let closure = (config.handler == HandlerKind::Print).then(|| {
            let name = listener.name.clone();
            let receiver = Rc::downgrade(&listener);
            AnySlot::closure(move |value: &i64| {
                log::info!("[{}] received {}", name, value);
                if let Some(listener) = receiver.upgrade() {
                    listener.calls.borrow_mut().push(*value);
                }
            })
        });

        Self { listener, closure }
    }

    pub fn name(&self) -> &str {
        &self.listener.name
    }

    /// Slot for the value-returning event; empty for handlers without a value
    pub fn transform_slot(&self) -> Slot<i64, i64> {
        match self.listener.handler {
            HandlerKind::Scale => Slot::method(&self.listener, Listener::scale),
            HandlerKind::Accumulate => Slot::method(&self.listener, Listener::accumulate),
            HandlerKind::Echo => Slot::function(echo),
            HandlerKind::Threshold | HandlerKind::Print => Slot::new(),
        }
    }

    /// Slot for the notification event
    pub fn notify_slot(&self) -> AnySlot<i64> {
        match self.listener.handler {
            HandlerKind::Scale => AnySlot::method(&self.listener, Listener::scale),
            HandlerKind::Accumulate => AnySlot::method(&self.listener, Listener::accumulate),
            HandlerKind::Threshold => AnySlot::method(&self.listener, Listener::threshold),
            HandlerKind::Echo => AnySlot::function(echo),
            HandlerKind::Print => self.closure.clone().unwrap_or_default(),
        }
    }

    pub fn summary(&self) -> ListenerSummary {
        self.listener.summary()
    }
}
