//! Session metrics and the rolling event log
//!
//! `MetricsState` holds the counters the metrics panel shows. Every entry of
//! its `EventLog` is stamped `[HH:MM:SS]` by an `EventClock`, and the log never
//! holds more than `EVENT_LOG_CAPACITY` entries: appending to a full log drops
//! the oldest one.

use std::collections::VecDeque;

use crate::ds_interface::{EventClock, LocalClock, EVENT_LOG_CAPACITY};

// ============================================================================
// Event Log
// ============================================================================

/// Bounded FIFO of timestamped, human readable entries
pub struct EventLog {
    entries: VecDeque<String>,
    capacity: usize,
    clock: Box<dyn EventClock>,
}

impl EventLog {
    pub fn new(clock: Box<dyn EventClock>) -> Self {
        Self::with_capacity(EVENT_LOG_CAPACITY, clock)
    }

    pub fn with_capacity(capacity: usize, clock: Box<dyn EventClock>) -> Self {
        Self {
            entries: VecDeque::with_capacity(capacity + 1),
            capacity,
            clock,
        }
    }

    /// Append `message` prefixed with the current timestamp, evicting the oldest
    /// entry when over capacity. The only way entries are added.
    pub fn log_event(&mut self, message: &str) {
        let entry = format!("[{}] {}", self.clock.timestamp(), message);
        self.entries.push_back(entry);
        if self.entries.len() > self.capacity {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Oldest first
    pub fn iter(&self) -> impl DoubleEndedIterator<Item = &String> {
        self.entries.iter()
    }

    /// Up to `n` most recent entries, newest first
    pub fn recent(&self, n: usize) -> Vec<&str> {
        self.entries.iter().rev().take(n).map(String::as_str).collect()
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

impl std::fmt::Debug for EventLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventLog")
            .field("entries", &self.entries)
            .field("capacity", &self.capacity)
            .finish()
    }
}

// ============================================================================
// Metrics State
// ============================================================================

/// Point-in-time view of the counters, for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricsSummary {
    pub messages_exchanged: u64,
    pub failure_count: u64,
    pub latency_samples: usize,
    pub average_latency: f64,
}

/// Counters and log owned by exactly one session
#[derive(Debug)]
pub struct MetricsState {
    messages_exchanged: u64,
    failure_count: u64,
    latency_samples: Vec<f64>,
    event_log: EventLog,
}

impl MetricsState {
    /// Fresh state stamping log entries with the local wall clock
    pub fn new() -> Self {
        Self::with_clock(Box::new(LocalClock))
    }

    pub fn with_clock(clock: Box<dyn EventClock>) -> Self {
        Self {
            messages_exchanged: 0,
            failure_count: 0,
            latency_samples: Vec::new(),
            event_log: EventLog::new(clock),
        }
    }

    pub fn record_message(&mut self) {
        self.messages_exchanged += 1;
    }

    pub fn record_failure(&mut self) {
        self.failure_count += 1;
    }

    /// Caller guarantees `seconds` is positive; anything else is a bug upstream.
    pub fn record_latency(&mut self, seconds: f64) {
        debug_assert!(
            seconds.is_finite() && seconds > 0.0,
            "latency sample must be positive, got {}",
            seconds
        );
        self.latency_samples.push(seconds);
    }

    pub fn log_event(&mut self, message: &str) {
        self.event_log.log_event(message);
    }

    /// Arithmetic mean of the samples, 0 when there are none
    pub fn average_latency(&self) -> f64 {
        if self.latency_samples.is_empty() {
            return 0.0;
        }
        self.latency_samples.iter().sum::<f64>() / self.latency_samples.len() as f64
    }

    pub fn messages_exchanged(&self) -> u64 {
        self.messages_exchanged
    }

    pub fn failure_count(&self) -> u64 {
        self.failure_count
    }

    pub fn latency_samples(&self) -> &[f64] {
        &self.latency_samples
    }

    pub fn event_log(&self) -> &EventLog {
        &self.event_log
    }

    /// Newest first, as the log panel renders it
    pub fn recent_events(&self, n: usize) -> Vec<&str> {
        self.event_log.recent(n)
    }

    pub fn summary(&self) -> MetricsSummary {
        MetricsSummary {
            messages_exchanged: self.messages_exchanged,
            failure_count: self.failure_count,
            latency_samples: self.latency_samples.len(),
            average_latency: self.average_latency(),
        }
    }

    /// Back to the all-zero state of a new session; the clock is kept
    pub fn reset(&mut self) {
        self.messages_exchanged = 0;
        self.failure_count = 0;
        self.latency_samples.clear();
        self.event_log.clear();
    }
}

impl Default for MetricsState {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ds_interface::FixedClock;

    fn fixed_state() -> MetricsState {
        MetricsState::with_clock(Box::new(FixedClock("12:34:56".to_string())))
    }

    #[test]
    fn test_counters_start_at_zero() {
        let state = fixed_state();
        assert_eq!(state.messages_exchanged(), 0);
        assert_eq!(state.failure_count(), 0);
        assert!(state.latency_samples().is_empty());
        assert!(state.event_log().is_empty());
    }

    #[test]
    fn test_counters_are_independent() {
        let mut state = fixed_state();
        for _ in 0..5 {
            state.record_message();
        }
        state.record_failure();
        state.record_failure();

        assert_eq!(state.messages_exchanged(), 5);
        assert_eq!(state.failure_count(), 2);
        assert!(state.event_log().is_empty());
    }

    #[test]
    fn test_average_latency() {
        let mut state = fixed_state();
        assert_eq!(state.average_latency(), 0.0);

        state.record_latency(1.0);
        state.record_latency(2.0);
        state.record_latency(3.0);
        assert!((state.average_latency() - 2.0).abs() < 1e-12);
    }

    #[test]
    #[should_panic]
    #[cfg(debug_assertions)]
    fn test_non_positive_latency_is_a_bug() {
        let mut state = fixed_state();
        state.record_latency(0.0);
    }

    #[test]
    fn test_log_entries_are_timestamped() {
        let mut state = fixed_state();
        state.log_event("Peer A has failed!");
        assert_eq!(
            state.event_log().iter().next().unwrap(),
            "[12:34:56] Peer A has failed!"
        );
    }

    #[test]
    fn test_log_evicts_oldest_first() {
        let mut state = fixed_state();
        for i in 0..150 {
            state.log_event(&format!("event {}", i));
            assert!(state.event_log().len() <= EVENT_LOG_CAPACITY);
        }

        let kept: Vec<&String> = state.event_log().iter().collect();
        assert_eq!(kept.len(), EVENT_LOG_CAPACITY);
        for (offset, entry) in kept.iter().enumerate() {
            assert_eq!(**entry, format!("[12:34:56] event {}", offset + 50));
        }
    }

    #[test]
    fn test_recent_events_newest_first() {
        let mut state = fixed_state();
        for i in 0..15 {
            state.log_event(&format!("e{}", i));
        }

        let recent = state.recent_events(10);
        assert_eq!(recent.len(), 10);
        assert_eq!(recent[0], "[12:34:56] e14");
        assert_eq!(recent[9], "[12:34:56] e5");

        // fewer entries than requested
        let mut small = fixed_state();
        small.log_event("only");
        assert_eq!(small.recent_events(10), vec!["[12:34:56] only"]);
    }

    #[test]
    fn test_summary_and_reset() {
        let mut state = fixed_state();
        state.record_message();
        state.record_failure();
        state.record_latency(1.5);
        state.log_event("x");

        let summary = state.summary();
        assert_eq!(summary.messages_exchanged, 1);
        assert_eq!(summary.failure_count, 1);
        assert_eq!(summary.latency_samples, 1);
        assert!((summary.average_latency - 1.5).abs() < 1e-12);

        state.reset();
        assert_eq!(
            state.summary(),
            MetricsSummary {
                messages_exchanged: 0,
                failure_count: 0,
                latency_samples: 0,
                average_latency: 0.0,
            }
        );
        assert!(state.event_log().is_empty());
    }

    #[test]
    fn test_custom_capacity() {
        let mut log = EventLog::with_capacity(3, Box::new(FixedClock("00:00:00".to_string())));
        for i in 0..5 {
            log.log_event(&i.to_string());
        }
        let kept: Vec<&str> = log.iter().map(String::as_str).collect();
        assert_eq!(kept, vec!["[00:00:00] 2", "[00:00:00] 3", "[00:00:00] 4"]);
    }
}
