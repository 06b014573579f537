//! Scenario execution
//!
//! A [`Publisher`] owns two events and only exposes registration views to
//! the outside; the runner subscribes listeners through those views and fires
//! through the publisher.

use crate::config::{EventName, ScenarioConfig, StepConfig};
use crate::listeners::Subscriber;
use crate::report::{Report, StepOutcome, StepRecord};
use delegate_core::{
    AnyDelegate, AnySlot, DelegateError, Event, ListConfig, RegistrationView, Slot,
};
use std::collections::HashMap;

/// Owner of the scenario events
pub struct Publisher {
    transform: Event<i64, i64>,
    notify: AnyDelegate<i64>,
}

impl Publisher {
    pub fn new(config: &ListConfig) -> Self {
        Self {
            transform: Event::with_config(config),
            notify: AnyDelegate::with_config(config),
        }
    }

    pub fn on_transform(&self) -> RegistrationView<'_, Slot<i64, i64>> {
        self.transform.view()
    }

    pub fn on_notify(&self) -> RegistrationView<'_, AnySlot<i64>> {
        self.notify.view()
    }

    /// Fire both events; the transform result is the last subscriber's value
    pub fn fire(&self, value: i64) -> Result<i64, DelegateError> {
        self.notify.invoke(&value)?;
        self.transform.invoke(&value)
    }

    /// Fire both events if they have subscribers; `None` if transform had none
    pub fn try_fire(&self, value: i64) -> Option<i64> {
        self.notify.try_invoke(&value);
        self.transform.try_invoke(&value)
    }

    fn clear(&self, event: EventName) {
        match event {
            EventName::Transform => self.transform.clear(),
            EventName::Notify => self.notify.clear(),
        }
    }

    fn subscribers(&self, event: EventName) -> usize {
        match event {
            EventName::Transform => self.on_transform().len(),
            EventName::Notify => self.on_notify().len(),
        }
    }
}

/// Run a validated scenario and collect the report
pub fn run(config: &ScenarioConfig) -> Report {
    let publisher = Publisher::new(&config.list);
    let subscribers: Vec<Subscriber> = config.listeners.iter().map(Subscriber::new).collect();
    let by_name: HashMap<&str, &Subscriber> =
        subscribers.iter().map(|s| (s.name(), s)).collect();

    let mut steps = Vec::with_capacity(config.steps.len());
    for (index, step) in config.steps.iter().enumerate() {
        log::debug!("Step {}: {:?}", index + 1, step);
        let outcome = match step {
            StepConfig::Subscribe { listener, event } => {
                let Some(subscriber) = by_name.get(listener.as_str()) else {
                    log::warn!("Skipping subscribe of unknown listener {}", listener);
                    continue;
                };
                match event {
                    EventName::Transform => {
                        publisher.on_transform().register(subscriber.transform_slot())
                    }
                    EventName::Notify => publisher.on_notify().register(subscriber.notify_slot()),
                }
                StepOutcome::Subscribed {
                    subscribers: publisher.subscribers(*event),
                }
            }
            StepConfig::Unsubscribe { listener, event } => {
                let Some(subscriber) = by_name.get(listener.as_str()) else {
                    log::warn!("Skipping unsubscribe of unknown listener {}", listener);
                    continue;
                };
                let removed = match event {
                    EventName::Transform => publisher
                        .on_transform()
                        .unregister(&subscriber.transform_slot()),
                    EventName::Notify => {
                        publisher.on_notify().unregister(&subscriber.notify_slot())
                    }
                };
                StepOutcome::Unsubscribed {
                    removed,
                    subscribers: publisher.subscribers(*event),
                }
            }
            StepConfig::Fire { value } => match publisher.fire(*value) {
                Ok(result) => StepOutcome::Returned { result },
                Err(e) => StepOutcome::Failed {
                    error: e.to_string(),
                },
            },
            StepConfig::TryFire { value } => match publisher.try_fire(*value) {
                Some(result) => StepOutcome::Returned { result },
                None => StepOutcome::NothingRegistered,
            },
            StepConfig::Clear { event } => {
                publisher.clear(*event);
                StepOutcome::Cleared
            }
        };

        log::info!("Step {} -> {}", index + 1, outcome);
        steps.push(StepRecord {
            index: index + 1,
            step: step.clone(),
            outcome,
        });
    }

    Report {
        steps,
        listeners: subscribers.iter().map(Subscriber::summary).collect(),
        transform_subscribers: publisher.subscribers(EventName::Transform),
        notify_subscribers: publisher.subscribers(EventName::Notify),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scenario(toml_content: &str) -> ScenarioConfig {
        let config: ScenarioConfig = toml::from_str(toml_content).unwrap();
        config.validate().unwrap();
        config
    }

    #[test]
    fn test_last_subscriber_result_wins() {
        let report = run(&scenario(
            r#"
            [[listeners]]
            name = "double"
            handler = "scale"
            param = 2

            [[listeners]]
            name = "triple"
            handler = "scale"
            param = 3

            [[steps]]
            action = "subscribe"
            listener = "double"

            [[steps]]
            action = "subscribe"
            listener = "triple"

            [[steps]]
            action = "fire"
            value = 5
            "#,
        ));

        assert_eq!(report.steps[2].outcome, StepOutcome::Returned { result: 15 });
        assert_eq!(report.listeners[0].calls, vec![5]);
        assert_eq!(report.listeners[1].calls, vec![5]);
        assert_eq!(report.transform_subscribers, 2);
    }

    #[test]
    fn test_empty_transform_fails_strict_fire_only() {
        let report = run(&scenario(
            r#"
            [[listeners]]
            name = "gate"
            handler = "threshold"
            param = 3

            [[steps]]
            action = "subscribe"
            listener = "gate"
            event = "notify"

            [[steps]]
            action = "try_fire"
            value = 4

            [[steps]]
            action = "fire"
            value = 1
            "#,
        ));

        assert_eq!(report.steps[1].outcome, StepOutcome::NothingRegistered);
        assert!(matches!(report.steps[2].outcome, StepOutcome::Failed { .. }));
        // Notify still ran on both fires
        assert_eq!(report.listeners[0].calls, vec![4, 1]);
    }

    #[test]
    fn test_unsubscribe_removes_one_registration() {
        let report = run(&scenario(
            r#"
            [[listeners]]
            name = "sum"
            handler = "accumulate"

            [[steps]]
            action = "subscribe"
            listener = "sum"

            [[steps]]
            action = "subscribe"
            listener = "sum"

            [[steps]]
            action = "unsubscribe"
            listener = "sum"

            [[steps]]
            action = "fire"
            value = 2

            [[steps]]
            action = "unsubscribe"
            listener = "sum"

            [[steps]]
            action = "unsubscribe"
            listener = "sum"
            "#,
        ));

        assert_eq!(
            report.steps[2].outcome,
            StepOutcome::Unsubscribed { removed: true, subscribers: 1 }
        );
        assert_eq!(report.steps[3].outcome, StepOutcome::Returned { result: 2 });
        assert_eq!(
            report.steps[5].outcome,
            StepOutcome::Unsubscribed { removed: false, subscribers: 0 }
        );
    }

    #[test]
    fn test_print_listener_and_clear() {
        let report = run(&scenario(
            r#"
            [[listeners]]
            name = "log"
            handler = "print"

            [[steps]]
            action = "subscribe"
            listener = "log"
            event = "notify"

            [[steps]]
            action = "try_fire"
            value = 9

            [[steps]]
            action = "clear"
            event = "notify"

            [[steps]]
            action = "try_fire"
            value = 10
            "#,
        ));

        assert_eq!(report.listeners[0].calls, vec![9]);
        assert_eq!(report.notify_subscribers, 0);
    }

    #[test]
    fn test_bundled_basic_scenario() {
        let report = run(&scenario(include_str!("../../scenarios/basic.toml")));

        assert_eq!(report.steps[0].outcome, StepOutcome::NothingRegistered);
        assert!(matches!(report.steps[1].outcome, StepOutcome::Failed { .. }));
        assert_eq!(report.steps[6].outcome, StepOutcome::Returned { result: 5 });
        // [double, running, double]: the second double registration answers
        assert_eq!(report.steps[8].outcome, StepOutcome::Returned { result: 12 });
        // Unsubscribe drops the most recent double, running answers again
        assert_eq!(report.steps[10].outcome, StepOutcome::Returned { result: 18 });
        assert_eq!(report.steps[12].outcome, StepOutcome::Returned { result: 26 });
        assert_eq!(report.notify_subscribers, 0);
        assert_eq!(report.transform_subscribers, 2);
    }
}
