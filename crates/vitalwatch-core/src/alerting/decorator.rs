//! Alert decoration pipeline
//!
//! A finding is wrapped in layers that each implement [`AlertCondition`] and
//! rewrite the text of the layer below. The standard pipeline is
//! `Prioritized<Recheck<Finding>>`, rendering
//! `<description>[ (rechecked)] [Priority: High]`.

use std::fmt;
use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use crate::clock::Clock;
use crate::models::{Alert, Finding, Priority};

/// Minimum time between two recheck markers, in milliseconds
pub const RECHECK_INTERVAL_MS: i64 = 60_000;

/// Marker appended by [`Recheck`] once its interval has elapsed
pub const RECHECK_MARKER: &str = " (rechecked)";

/// Something that renders an alert's condition text
pub trait AlertCondition: fmt::Debug + Send + Sync {
    /// Patient the condition is about
    fn patient_id(&self) -> &str;

    /// Timestamp of the underlying finding
    fn timestamp(&self) -> i64;

    /// Condition text, including every decoration layer
    fn condition(&self) -> String;
}

impl AlertCondition for Finding {
    fn patient_id(&self) -> &str {
        &self.patient_id
    }

    fn timestamp(&self) -> i64 {
        self.timestamp
    }

    fn condition(&self) -> String {
        self.description().to_string()
    }
}

/// Marks the condition as rechecked when read after its interval elapsed
///
/// Reading is stateful: a read that shows the marker restarts the interval,
/// so the marker appears again only after another full interval.
#[derive(Debug)]
pub struct Recheck<C> {
    inner: C,
    interval: i64,
    last_checked: AtomicI64,
    clock: Arc<dyn Clock>,
}

impl<C: AlertCondition> Recheck<C> {
    /// Wrap `inner`; the interval starts at the inner condition's timestamp
    pub fn new(inner: C, interval: i64, clock: Arc<dyn Clock>) -> Self {
        let last_checked = AtomicI64::new(inner.timestamp());
        Self {
            inner,
            interval,
            last_checked,
            clock,
        }
    }

    /// When the condition was last shown as rechecked
    pub fn last_checked(&self) -> i64 {
        self.last_checked.load(Ordering::SeqCst)
    }

    /// Override the last-checked time
    pub fn set_last_checked(&self, timestamp: i64) {
        self.last_checked.store(timestamp, Ordering::SeqCst);
    }
}

impl<C: AlertCondition> AlertCondition for Recheck<C> {
    fn patient_id(&self) -> &str {
        self.inner.patient_id()
    }

    fn timestamp(&self) -> i64 {
        self.inner.timestamp()
    }

    fn condition(&self) -> String {
        let now = self.clock.now();
        let last = self.last_checked.load(Ordering::SeqCst);

        let elapsed = now.saturating_sub(last) > self.interval
            && self
                .last_checked
                .compare_exchange(last, now, Ordering::SeqCst, Ordering::SeqCst)
                .is_ok();

        if elapsed {
            format!("{}{RECHECK_MARKER}", self.inner.condition())
        } else {
            self.inner.condition()
        }
    }
}

/// Appends a fixed `[Priority: <level>]` suffix
#[derive(Debug)]
pub struct Prioritized<C> {
    inner: C,
    priority: Priority,
}

impl<C: AlertCondition> Prioritized<C> {
    /// Wrap `inner` with `priority`
    pub fn new(inner: C, priority: Priority) -> Self {
        Self { inner, priority }
    }

    /// The attached priority
    pub fn priority(&self) -> Priority {
        self.priority
    }
}

impl<C: AlertCondition> AlertCondition for Prioritized<C> {
    fn patient_id(&self) -> &str {
        self.inner.patient_id()
    }

    fn timestamp(&self) -> i64 {
        self.inner.timestamp()
    }

    fn condition(&self) -> String {
        format!("{} [Priority: {}]", self.inner.condition(), self.priority)
    }
}

/// Run a finding through the standard pipeline: recheck first, then high priority
pub fn decorate(finding: Finding, clock: Arc<dyn Clock>) -> Alert {
    let kind = finding.kind;
    let rechecked = Recheck::new(finding, RECHECK_INTERVAL_MS, clock);
    Alert::new(kind, Prioritized::new(rechecked, Priority::High))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::ManualClock;
    use crate::models::FindingKind;
    use pretty_assertions::assert_eq;

    fn finding_at(timestamp: i64) -> Finding {
        Finding::new("1", FindingKind::BloodPressureThreshold, timestamp)
    }

    #[test]
    fn test_recheck_after_interval() {
        let clock = Arc::new(ManualClock::new(1_000_000));
        let repeated = Recheck::new(finding_at(1_000_000), RECHECK_INTERVAL_MS, clock.clone());

        repeated.set_last_checked(1_000_000 - 60_001);

        assert_eq!(
            repeated.condition(),
            "Critical Threshold Alert: Blood Pressure Out of Range (rechecked)"
        );
        assert_eq!(repeated.last_checked(), 1_000_000);
    }

    #[test]
    fn test_priority_suffix() {
        let prioritized = Prioritized::new(finding_at(0), Priority::High);
        assert_eq!(
            prioritized.condition(),
            "Critical Threshold Alert: Blood Pressure Out of Range [Priority: High]"
        );
        assert_eq!(prioritized.priority(), Priority::High);
    }

    #[test]
    fn test_reads_within_interval_are_identical() {
        let clock = Arc::new(ManualClock::new(0));
        let alert = decorate(finding_at(0), clock.clone());

        clock.set(10_000);
        let first = alert.condition();
        clock.set(40_000);
        let second = alert.condition();
        assert_eq!(first, second);
        assert_eq!(
            first,
            "Critical Threshold Alert: Blood Pressure Out of Range [Priority: High]"
        );

        clock.set(70_000);
        let third = alert.condition();
        assert_eq!(
            third,
            "Critical Threshold Alert: Blood Pressure Out of Range (rechecked) [Priority: High]"
        );
        assert_eq!(third.replace(RECHECK_MARKER, ""), first);
    }

    #[test]
    fn test_marker_reappears_only_after_another_interval() {
        let clock = Arc::new(ManualClock::new(60_001));
        let alert = decorate(finding_at(0), clock.clone());

        assert!(alert.condition().contains("(rechecked)"));
        assert!(!alert.condition().contains("(rechecked)"));

        clock.advance(RECHECK_INTERVAL_MS);
        assert!(!alert.condition().contains("(rechecked)"));

        clock.advance(1);
        assert!(alert.condition().contains("(rechecked)"));
    }

    #[test]
    fn test_exact_interval_is_not_elapsed() {
        let clock = Arc::new(ManualClock::new(RECHECK_INTERVAL_MS));
        let alert = decorate(finding_at(0), clock);
        assert!(!alert.condition().contains("(rechecked)"));
    }

    #[test]
    fn test_extreme_timestamps_do_not_overflow() {
        let clock = Arc::new(ManualClock::new(1_621_453_800));

        let ancient = decorate(finding_at(i64::MIN), clock.clone());
        assert!(ancient.condition().contains("(rechecked)"));

        let future = decorate(finding_at(i64::MAX), clock.clone());
        assert!(!future.condition().contains("(rechecked)"));

        clock.set(i64::MIN);
        assert!(!future.condition().contains("(rechecked)"));
    }

    #[test]
    fn test_decorated_alert_keeps_finding_identity() {
        let alert = decorate(finding_at(1234), Arc::new(ManualClock::new(1234)));

        assert_eq!(alert.patient_id(), "1");
        assert_eq!(alert.timestamp(), 1234);
        assert_eq!(alert.kind(), FindingKind::BloodPressureThreshold);
    }
}
