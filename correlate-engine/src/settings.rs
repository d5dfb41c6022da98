//! Dynamically-updatable engine settings.
//!
//! Reads never block writers and vice versa; each correlation request
//! captures one snapshot at its start and never re-reads mid-flight, so
//! a settings change and an in-flight request have no ordering
//! guarantee beyond last-writer-wins.

use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};

use correlate_core::config::CorrelationConfig;

/// Process-wide mutable settings, updated in place via atomics.
#[derive(Debug)]
pub struct DynamicSettings {
    time_window_ms: AtomicI64,
    history_shards: AtomicUsize,
}

/// Immutable view captured at request start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SettingsSnapshot {
    pub time_window_ms: i64,
    pub history_shards: usize,
}

impl DynamicSettings {
    pub fn from_config(config: &CorrelationConfig) -> Self {
        Self {
            time_window_ms: AtomicI64::new(config.time_window_ms),
            history_shards: AtomicUsize::new(config.history_shards),
        }
    }

    pub fn snapshot(&self) -> SettingsSnapshot {
        SettingsSnapshot {
            time_window_ms: self.time_window_ms.load(Ordering::Acquire),
            history_shards: self.history_shards.load(Ordering::Acquire),
        }
    }

    /// Update the correlation time window. Zero or negative values are
    /// allowed and collapse the window to a single instant.
    pub fn set_time_window_ms(&self, window: i64) {
        self.time_window_ms.store(window, Ordering::Release);
    }

    pub fn set_history_shards(&self, shards: usize) {
        self.history_shards.store(shards, Ordering::Release);
    }
}

impl Default for DynamicSettings {
    fn default() -> Self {
        Self::from_config(&CorrelationConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_reflects_last_write() {
        let settings = DynamicSettings::default();
        assert_eq!(settings.snapshot().time_window_ms, 300_000);

        settings.set_time_window_ms(60_000);
        settings.set_history_shards(3);

        let snapshot = settings.snapshot();
        assert_eq!(snapshot.time_window_ms, 60_000);
        assert_eq!(snapshot.history_shards, 3);
    }

    #[test]
    fn snapshots_are_independent_of_later_writes() {
        let settings = DynamicSettings::default();
        let before = settings.snapshot();
        settings.set_time_window_ms(-5);
        assert_eq!(before.time_window_ms, 300_000);
        assert_eq!(settings.snapshot().time_window_ms, -5);
    }
}
