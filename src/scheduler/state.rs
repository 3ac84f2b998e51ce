use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Scheduler state machine: `Idle` until started, `Running` while the
/// processing loop task is alive.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum SchedulerStatus {
    Idle,
    Running,
}

impl Default for SchedulerStatus {
    fn default() -> Self {
        SchedulerStatus::Idle
    }
}

/// Cadence configuration: the minimum interval between cycle starts.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ScheduleConfig {
    pub min_interval_ms: u64,
}

impl ScheduleConfig {
    pub fn new(min_interval_ms: u64) -> Self {
        Self { min_interval_ms }
    }

    pub fn min_interval(&self) -> Duration {
        Duration::from_millis(self.min_interval_ms)
    }

    /// Wait remaining after a cycle that took `elapsed`: the interval
    /// minus the time the cycle already consumed, floored at zero. A
    /// slow engine shortens or eliminates the wait; a fast one waits
    /// out the remainder.
    pub fn remaining_delay(&self, elapsed: Duration) -> Duration {
        self.min_interval().saturating_sub(elapsed)
    }
}

/// Mutable per-cycle inputs, distributed to the loop over a watch
/// channel. Changes apply to cycles not yet scheduled.
#[derive(Debug, Clone, Default)]
pub(crate) struct LoopSettings {
    pub config: ScheduleConfig,
    pub instruction: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_interval_is_zero() {
        assert_eq!(ScheduleConfig::default().min_interval_ms, 0);
        assert_eq!(
            ScheduleConfig::default().remaining_delay(Duration::from_millis(50)),
            Duration::ZERO
        );
    }

    #[test]
    fn fast_cycle_waits_out_the_remainder() {
        let config = ScheduleConfig::new(1000);
        assert_eq!(
            config.remaining_delay(Duration::from_millis(200)),
            Duration::from_millis(800)
        );
    }

    #[test]
    fn slow_cycle_eliminates_the_wait() {
        let config = ScheduleConfig::new(1000);
        assert_eq!(
            config.remaining_delay(Duration::from_millis(1000)),
            Duration::ZERO
        );
        assert_eq!(
            config.remaining_delay(Duration::from_millis(2500)),
            Duration::ZERO
        );
    }

    #[test]
    fn config_serializes_camel_case() {
        let config: ScheduleConfig = serde_json::from_str(r#"{"minIntervalMs":250}"#).unwrap();
        assert_eq!(config, ScheduleConfig::new(250));
    }
}
