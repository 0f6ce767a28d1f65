//! Dashboard sinks

// ---------------------------------------------------------------------------
// IMPORTS
// ---------------------------------------------------------------------------

use log::debug;
use std::collections::BTreeMap;

use super::DashboardSink;

// ---------------------------------------------------------------------------
// DATA STRUCTURES
// ---------------------------------------------------------------------------

/// A dashboard which writes every published value to the log and remembers
/// the latest value of each key.
#[derive(Debug, Default)]
pub struct LogDashboard {
    values: BTreeMap<String, f64>,
    num_published: u64,
}

// ---------------------------------------------------------------------------
// IMPLEMENTATIONS
// ---------------------------------------------------------------------------

impl LogDashboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Latest value published under `key`.
    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    /// Latest values of all keys, sorted by key.
    pub fn values(&self) -> &BTreeMap<String, f64> {
        &self.values
    }

    /// Total number of publish calls.
    pub fn num_published(&self) -> u64 {
        self.num_published
    }
}

impl DashboardSink for LogDashboard {
    fn publish(&mut self, key: &str, value: f64) {
        debug!("{} {:.4}", key, value);

        self.num_published += 1;
        self.values.insert(key.to_string(), value);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_publish_keeps_latest() {
        let mut dash = LogDashboard::new();

        dash.publish("left RPM:", 1.0);
        dash.publish("left RPM:", 2.0);
        dash.publish("right RPM:", 3.0);

        assert_eq!(dash.get("left RPM:"), Some(2.0));
        assert_eq!(dash.get("right RPM:"), Some(3.0));
        assert_eq!(dash.get("missing"), None);
        assert_eq!(dash.values().len(), 2);
        assert_eq!(dash.num_published(), 3);
    }
}
