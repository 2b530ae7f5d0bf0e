use bnote_core::constants::SESSION_SERIES_MAX_LEN;
use bnote_core::{SessionSamplePoint, TimestampMillis};

/// Append `value` at `now_ms`, then drop the oldest points until at most
/// `max_len` remain. Identical consecutive values are still appended.
pub fn record(
    mut series: Vec<SessionSamplePoint>,
    value: f64,
    now_ms: TimestampMillis,
    max_len: usize,
) -> Vec<SessionSamplePoint> {
    series.push(SessionSamplePoint { timestamp: now_ms, value });
    if series.len() > max_len {
        let excess = series.len() - max_len;
        series.drain(..excess);
    }
    series
}

/// [`record`] with the default bound.
pub fn record_default(
    series: Vec<SessionSamplePoint>,
    value: f64,
    now_ms: TimestampMillis,
) -> Vec<SessionSamplePoint> {
    record(series, value, now_ms, SESSION_SERIES_MAX_LEN)
}

/// Remembers the last observed upstream value so a caller can record only
/// when it changes. The first observation always counts as a change.
#[derive(Debug, Default)]
pub struct ChangeGate<T> {
    last: Option<T>,
}

impl<T: PartialEq + Clone> ChangeGate<T> {
    pub fn new() -> Self {
        Self { last: None }
    }

    /// True if `value` differs from the previous observation.
    pub fn observe(&mut self, value: &T) -> bool {
        if self.last.as_ref() == Some(value) {
            return false;
        }
        self.last = Some(value.clone());
        true
    }

    pub fn last(&self) -> Option<&T> {
        self.last.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn appends_in_order() {
        let s = record(Vec::new(), 1.0, 10, 200);
        let s = record(s, 2.0, 20, 200);
        assert_eq!(s.len(), 2);
        assert_eq!(s[1], SessionSamplePoint { timestamp: 20, value: 2.0 });
    }

    #[test]
    fn keeps_newest_when_over_bound() {
        let mut s = Vec::new();
        for i in 0..250 {
            s = record_default(s, i as f64, i);
        }
        assert_eq!(s.len(), 200);
        assert_eq!(s.first().unwrap().timestamp, 50);
        assert_eq!(s.last().unwrap().timestamp, 249);
        assert!(s.windows(2).all(|w| w[0].timestamp < w[1].timestamp));
    }

    #[test]
    fn duplicates_are_not_collapsed() {
        let s = record(Vec::new(), 5.0, 1, 200);
        let s = record(s, 5.0, 2, 200);
        assert_eq!(s.len(), 2);
    }

    #[test]
    fn oversized_input_is_trimmed() {
        let s: Vec<_> = (0..10)
            .map(|i| SessionSamplePoint { timestamp: i, value: 0.0 })
            .collect();
        let s = record(s, 1.0, 10, 3);
        let ts: Vec<i64> = s.iter().map(|p| p.timestamp).collect();
        assert_eq!(ts, vec![8, 9, 10]);
    }

    #[test]
    fn gate_fires_on_change_only() {
        let mut gate = ChangeGate::new();
        assert!(gate.observe(&100u128));
        assert!(!gate.observe(&100u128));
        assert!(gate.observe(&101u128));
        assert_eq!(gate.last(), Some(&101));
    }
}
