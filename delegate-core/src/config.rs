//! Dispatch list configuration
//!
//! Only storage sizing is configurable. Dispatch order (insertion order),
//! duplicate handling (allowed) and removal order (most recent first) are
//! fixed behaviour of [`MulticastList`](crate::MulticastList).

use serde::{Deserialize, Serialize};

/// Configuration for a dispatch list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListConfig {
    /// Number of slots reserved up front (default: 4)
    #[serde(default = "default_capacity")]
    pub initial_capacity: usize,
}

fn default_capacity() -> usize {
    4
}

impl Default for ListConfig {
    fn default() -> Self {
        Self {
            initial_capacity: default_capacity(),
        }
    }
}

impl ListConfig {
    /// Create a configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder method: set the number of slots reserved up front
    pub fn with_capacity(mut self, capacity: usize) -> Self {
        self.initial_capacity = capacity;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_capacity() {
        assert_eq!(ListConfig::new().initial_capacity, 4);
    }

    #[test]
    fn test_builder() {
        let config = ListConfig::new().with_capacity(32);
        assert_eq!(config.initial_capacity, 32);
    }
}
