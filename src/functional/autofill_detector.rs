//! Autofill heuristic.
//!
//! Browsers autofill a field with one synthetic change and no focus or
//! blur. Left alone, such a field stays `Untouched` and its value is never
//! checked. The detector recognises that pattern and arms a grace timer;
//! when the timer elapses uninterrupted the owner touches the field as if it
//! had been blurred, validating whatever value is present at that moment.

use std::time::{Duration, Instant};

use crate::config::{DEFAULT_AUTOFILL_GRACE, DEFAULT_AUTOFILL_MIN_GROWTH};
use crate::functional::scheduled_task::{ScheduledTask, TaskTicket};
use crate::functional::validation_rules::is_blank;
use crate::models::field::AutofillShape;

/// Facts about one change event the heuristic needs.
#[derive(Debug, Clone, Copy)]
pub struct ChangeProbe<'a> {
    pub previous: &'a str,
    pub next: &'a str,
    /// The field has received focus at least once.
    pub ever_focused: bool,
    pub touched: bool,
}

#[derive(Debug)]
pub struct AutofillDetector {
    shape: AutofillShape,
    grace: Duration,
    min_growth: usize,
    task: ScheduledTask,
}

impl AutofillDetector {
    pub fn new(shape: AutofillShape) -> Self {
        Self::with_timing(shape, DEFAULT_AUTOFILL_GRACE, DEFAULT_AUTOFILL_MIN_GROWTH)
    }

    pub fn with_timing(shape: AutofillShape, grace: Duration, min_growth: usize) -> Self {
        Self {
            shape,
            grace,
            min_growth,
            task: ScheduledTask::new(),
        }
    }

    /// True when every autofill condition holds for this change.
    pub fn is_suspected(&self, probe: &ChangeProbe<'_>) -> bool {
        let growth = probe
            .next
            .chars()
            .count()
            .saturating_sub(probe.previous.chars().count());

        is_blank(probe.previous)
            && !is_blank(probe.next)
            && growth > self.min_growth
            && !probe.ever_focused
            && !probe.touched
            && self.shape.matches(probe.next)
    }

    /// Classifies a change. A suspected autofill re-arms the grace timer
    /// (last detection wins); any other change leaves a pending timer alone.
    pub fn on_change(&mut self, probe: &ChangeProbe<'_>, now: Instant) -> Option<TaskTicket> {
        if !self.is_suspected(probe) {
            return None;
        }
        let ticket = self.task.arm(now, self.grace);
        log::debug!("autofill suspected, grace timer armed for {:?}", self.grace);
        Some(ticket)
    }

    /// Focus or blur: the user is interacting, so drop the grace timer.
    pub fn on_interaction(&mut self) -> bool {
        let cancelled = self.task.cancel();
        if cancelled {
            log::trace!("autofill grace timer cancelled by interaction");
        }
        cancelled
    }

    /// Fires the grace timer if it is due at `now`.
    pub fn poll(&mut self, now: Instant) -> bool {
        self.task.fire(now)
    }

    pub fn cancel(&mut self) -> bool {
        self.task.cancel()
    }

    pub fn is_pending(&self) -> bool {
        self.task.is_armed()
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.task.due_at()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn probe<'a>(previous: &'a str, next: &'a str) -> ChangeProbe<'a> {
        ChangeProbe {
            previous,
            next,
            ever_focused: false,
            touched: false,
        }
    }

    #[test]
    fn test_email_autofill_is_suspected() {
        let detector = AutofillDetector::new(AutofillShape::Email);
        assert!(detector.is_suspected(&probe("", "user@example.com")));
        assert!(detector.is_suspected(&probe("  ", "user@example.com")));
    }

    #[test]
    fn test_each_condition_is_required() {
        let detector = AutofillDetector::new(AutofillShape::Email);
        // previous value not blank
        assert!(!detector.is_suspected(&probe("u", "user@example.com")));
        // growth of exactly two characters is typing speed
        assert!(!detector.is_suspected(&probe("", "a@")));
        assert!(!detector.is_suspected(&probe("", "a.")));
        // wrong shape
        assert!(!detector.is_suspected(&probe("", "username")));
        // already focused or touched
        let mut focused = probe("", "user@example.com");
        focused.ever_focused = true;
        assert!(!detector.is_suspected(&focused));
        let mut touched = probe("", "user@example.com");
        touched.touched = true;
        assert!(!detector.is_suspected(&touched));
    }

    #[test]
    fn test_growth_threshold_is_configurable() {
        let detector =
            AutofillDetector::with_timing(AutofillShape::NonBlank, DEFAULT_AUTOFILL_GRACE, 5);
        assert!(!detector.is_suspected(&probe("", "Paris")));
        assert!(detector.is_suspected(&probe("", "Montreal")));
    }

    #[test]
    fn test_timer_fires_after_grace() {
        let start = Instant::now();
        let mut detector = AutofillDetector::new(AutofillShape::Email);
        assert!(detector.on_change(&probe("", "user@example.com"), start).is_some());
        assert!(detector.is_pending());
        assert!(!detector.poll(start + Duration::from_millis(1499)));
        assert!(detector.poll(start + Duration::from_millis(1500)));
        assert!(!detector.is_pending());
    }

    #[test]
    fn test_interaction_cancels_timer() {
        let start = Instant::now();
        let mut detector = AutofillDetector::new(AutofillShape::Email);
        detector.on_change(&probe("", "user@example.com"), start);
        assert!(detector.on_interaction());
        assert!(!detector.poll(start + Duration::from_secs(5)));
    }

    #[test]
    fn test_new_detection_restarts_timer() {
        let start = Instant::now();
        let mut detector = AutofillDetector::new(AutofillShape::Email);
        detector.on_change(&probe("", "user@example.com"), start);
        let later = start + Duration::from_millis(1000);
        detector.on_change(&probe("", "other@example.com"), later);

        assert!(!detector.poll(start + Duration::from_millis(1500)));
        assert!(detector.poll(later + Duration::from_millis(1500)));
    }

    #[test]
    fn test_plain_change_keeps_pending_timer() {
        let start = Instant::now();
        let mut detector = AutofillDetector::new(AutofillShape::Email);
        detector.on_change(&probe("", "user@example.com"), start);
        assert!(detector
            .on_change(&probe("user@example.com", "user@example.co"), start)
            .is_none());
        assert!(detector.is_pending());
    }
}
