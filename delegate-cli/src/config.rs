//! Scenario loading and parsing

use anyhow::{Context, Result};
use delegate_core::ListConfig;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// A scenario file (loaded from scenario.toml)
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ScenarioConfig {
    /// Sizing for both publisher events
    #[serde(default)]
    pub list: ListConfig,
    #[serde(default)]
    pub listeners: Vec<ListenerConfig>,
    #[serde(default)]
    pub steps: Vec<StepConfig>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ListenerConfig {
    pub name: String,
    pub handler: HandlerKind,
    /// Factor for `scale`, limit for `threshold`; ignored otherwise
    #[serde(default)]
    pub param: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum HandlerKind {
    /// Method: returns value * param
    Scale,
    /// Method: adds value to a running total and returns the total
    Accumulate,
    /// Method: returns value >= param (notify event only)
    Threshold,
    /// Free function: returns the value unchanged
    Echo,
    /// Closure: logs the value, returns nothing
    Print,
}

/// Which publisher event a step targets
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EventName {
    /// Value-returning event, last subscriber's result wins
    #[default]
    Transform,
    /// Notification event accepting any handler return type
    Notify,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum StepConfig {
    Subscribe {
        listener: String,
        #[serde(default)]
        event: EventName,
    },
    Unsubscribe {
        listener: String,
        #[serde(default)]
        event: EventName,
    },
    /// Fire both events strictly
    Fire { value: i64 },
    /// Fire both events only if they have subscribers
    TryFire { value: i64 },
    Clear {
        #[serde(default)]
        event: EventName,
    },
}

/// Errors found while validating a scenario
#[derive(Debug, thiserror::Error)]
pub enum ScenarioError {
    #[error("Listener declared twice: {0}")]
    DuplicateListener(String),

    #[error("Step {step} refers to unknown listener: {listener}")]
    UnknownListener { step: usize, listener: String },

    #[error("Listener {listener} ({handler:?}) cannot subscribe to the transform event")]
    UnsupportedHandler {
        listener: String,
        handler: HandlerKind,
    },
}

impl ScenarioConfig {
    /// Check listener names and handler/event combinations
    pub fn validate(&self) -> std::result::Result<(), ScenarioError> {
        let mut names = HashSet::new();
        for listener in &self.listeners {
            if !names.insert(listener.name.as_str()) {
                return Err(ScenarioError::DuplicateListener(listener.name.clone()));
            }
        }

        for (index, step) in self.steps.iter().enumerate() {
            let (name, event) = match step {
                StepConfig::Subscribe { listener, event }
                | StepConfig::Unsubscribe { listener, event } => (listener, *event),
                _ => continue,
            };

            let listener = self
                .listeners
                .iter()
                .find(|l| &l.name == name)
                .ok_or_else(|| ScenarioError::UnknownListener {
                    step: index + 1,
                    listener: name.clone(),
                })?;

            if event == EventName::Transform && !listener.handler.returns_value() {
                return Err(ScenarioError::UnsupportedHandler {
                    listener: listener.name.clone(),
                    handler: listener.handler,
                });
            }
        }

        Ok(())
    }
}

impl HandlerKind {
    /// True if the handler produces an `i64` usable by the transform event
    pub fn returns_value(self) -> bool {
        matches!(self, HandlerKind::Scale | HandlerKind::Accumulate | HandlerKind::Echo)
    }
}

/// Load a scenario from a TOML file
pub fn load_config(path: &Path) -> Result<ScenarioConfig> {
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read scenario file: {:?}", path))?;

    let config: ScenarioConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse scenario file: {:?}", path))?;

    config
        .validate()
        .with_context(|| format!("Invalid scenario: {:?}", path))?;

    Ok(config)
}
