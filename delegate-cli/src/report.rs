//! Report generation
//!
//! Renders the outcome of a scenario as plain text or JSON.

use crate::config::StepConfig;
use crate::listeners::ListenerSummary;
use serde::Serialize;
use std::fmt;

/// Everything a scenario run produced
#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub steps: Vec<StepRecord>,
    pub listeners: Vec<ListenerSummary>,
    pub transform_subscribers: usize,
    pub notify_subscribers: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct StepRecord {
    pub index: usize,
    pub step: StepConfig,
    pub outcome: StepOutcome,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum StepOutcome {
    Subscribed { subscribers: usize },
    Unsubscribed { removed: bool, subscribers: usize },
    Returned { result: i64 },
    Failed { error: String },
    NothingRegistered,
    Cleared,
}

impl fmt::Display for StepOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StepOutcome::Subscribed { subscribers } => {
                write!(f, "subscribed ({} registered)", subscribers)
            }
            StepOutcome::Unsubscribed {
                removed,
                subscribers,
            } => {
                let verb = if *removed { "removed" } else { "not found" };
                write!(f, "{} ({} registered)", verb, subscribers)
            }
            StepOutcome::Returned { result } => write!(f, "returned {}", result),
            StepOutcome::Failed { error } => write!(f, "failed: {}", error),
            StepOutcome::NothingRegistered => write!(f, "nothing registered"),
            StepOutcome::Cleared => write!(f, "cleared"),
        }
    }
}

impl Report {
    /// Render as pretty-printed JSON
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Render as a plain-text table
    pub fn to_text(&self) -> String {
        let mut out = String::new();
        out.push_str("Steps\n");
        out.push_str("─────────────────────────────────────────────\n");
        for record in &self.steps {
            out.push_str(&format!(
                "{:>3}  {:<28} {}\n",
                record.index,
                describe_step(&record.step),
                record.outcome
            ));
        }

        out.push_str("\nListeners\n");
        out.push_str("─────────────────────────────────────────────\n");
        for listener in &self.listeners {
            out.push_str(&format!(
                "  {:<12} {:<12} calls: {:?}\n",
                listener.name,
                format!("{:?}", listener.handler),
                listener.calls
            ));
        }

        out.push_str(&format!(
            "\nRegistered at end: transform={}, notify={}\n",
            self.transform_subscribers, self.notify_subscribers
        ));
        out
    }
}

fn describe_step(step: &StepConfig) -> String {
    match step {
        StepConfig::Subscribe { listener, event } => format!("subscribe {} {:?}", listener, event),
        StepConfig::Unsubscribe { listener, event } => {
            format!("unsubscribe {} {:?}", listener, event)
        }
        StepConfig::Fire { value } => format!("fire {}", value),
        StepConfig::TryFire { value } => format!("try_fire {}", value),
        StepConfig::Clear { event } => format!("clear {:?}", event),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{EventName, HandlerKind};

    fn sample() -> Report {
        Report {
            steps: vec![
                StepRecord {
                    index: 1,
                    step: StepConfig::Subscribe {
                        listener: "double".to_string(),
                        event: EventName::Transform,
                    },
                    outcome: StepOutcome::Subscribed { subscribers: 1 },
                },
                StepRecord {
                    index: 2,
                    step: StepConfig::Fire { value: 4 },
                    outcome: StepOutcome::Returned { result: 8 },
                },
            ],
            listeners: vec![ListenerSummary {
                name: "double".to_string(),
                handler: HandlerKind::Scale,
                calls: vec![4],
            }],
            transform_subscribers: 1,
            notify_subscribers: 0,
        }
    }

    #[test]
    fn test_outcome_display() {
        assert_eq!(StepOutcome::Returned { result: 3 }.to_string(), "returned 3");
        assert_eq!(
            StepOutcome::Unsubscribed {
                removed: false,
                subscribers: 2
            }
            .to_string(),
            "not found (2 registered)"
        );
    }

    #[test]
    fn test_text_report() {
        let text = sample().to_text();
        assert!(text.contains("subscribe double Transform"));
        assert!(text.contains("returned 8"));
        assert!(text.contains("transform=1, notify=0"));
    }

    #[test]
    fn test_json_report() {
        let json: serde_json::Value = serde_json::from_str(&sample().to_json().unwrap()).unwrap();
        assert_eq!(json["steps"][1]["outcome"]["kind"], "returned");
        assert_eq!(json["steps"][1]["outcome"]["result"], 8);
        assert_eq!(json["steps"][0]["step"]["action"], "subscribe");
        assert_eq!(json["listeners"][0]["handler"], "scale");
    }
}
