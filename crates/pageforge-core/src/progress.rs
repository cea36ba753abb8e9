//! Job progress reporting.
//!
//! Jobs emit monotonically increasing progress events through an observer.
//! A misbehaving observer must never abort a job: panics raised inside the
//! callback are caught and logged, and the job carries on.

use std::panic::{catch_unwind, AssertUnwindSafe};
use tracing::warn;

/// A single progress event.
#[derive(Debug, Clone, PartialEq)]
pub struct JobProgress {
    /// Units completed so far, including the one this event reports.
    pub current: u32,
    /// Total units the job will process.
    pub total: u32,
    /// Human-readable description of the completed unit.
    pub label: String,
}

impl JobProgress {
    /// Completion as a fraction in `[0, 1]`.
    pub fn fraction(&self) -> f32 {
        if self.total == 0 {
            return 1.0;
        }
        self.current as f32 / self.total as f32
    }
}

/// Receiver for progress events.
pub trait ProgressObserver {
    fn on_progress(&mut self, progress: &JobProgress);
}

impl<F: FnMut(&JobProgress)> ProgressObserver for F {
    fn on_progress(&mut self, progress: &JobProgress) {
        self(progress)
    }
}

/// Observer that discards all events.
pub struct NullObserver;

impl ProgressObserver for NullObserver {
    fn on_progress(&mut self, _progress: &JobProgress) {}
}

/// Drives an observer through a fixed number of units.
///
/// Created by a job once its total unit count is known; each completed unit
/// calls [`advance`](Self::advance) exactly once.
pub struct ProgressReporter<'a> {
    observer: &'a mut dyn ProgressObserver,
    total: u32,
    current: u32,
}

impl<'a> ProgressReporter<'a> {
    pub fn new(observer: &'a mut dyn ProgressObserver, total: u32) -> Self {
        Self {
            observer,
            total,
            current: 0,
        }
    }

    /// Record one completed unit and notify the observer.
    pub fn advance(&mut self, label: impl Into<String>) {
        self.current += 1;
        let progress = JobProgress {
            current: self.current,
            total: self.total,
            label: label.into(),
        };
        let result = catch_unwind(AssertUnwindSafe(|| {
            self.observer.on_progress(&progress);
        }));
        if result.is_err() {
            warn!(
                "progress observer panicked at {}/{}; continuing",
                progress.current, progress.total
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_events_are_monotonic_and_labeled() {
        let mut events: Vec<JobProgress> = Vec::new();
        let mut observer = |p: &JobProgress| events.push(p.clone());

        let mut reporter = ProgressReporter::new(&mut observer, 3);
        reporter.advance("Page 1");
        reporter.advance("Page 2");
        reporter.advance("Page 3");

        assert_eq!(events.len(), 3);
        assert_eq!(events[0].current, 1);
        assert_eq!(events[2].current, 3);
        assert_eq!(events[2].total, 3);
        assert_eq!(events[1].label, "Page 2");
    }

    #[test]
    fn test_fraction() {
        let progress = JobProgress {
            current: 1,
            total: 4,
            label: String::new(),
        };
        assert_eq!(progress.fraction(), 0.25);
    }

    #[test]
    fn test_zero_total_fraction_is_complete() {
        let progress = JobProgress {
            current: 0,
            total: 0,
            label: String::new(),
        };
        assert_eq!(progress.fraction(), 1.0);
    }

    #[test]
    fn test_panicking_observer_does_not_abort() {
        struct Panicky {
            calls: u32,
        }
        impl ProgressObserver for Panicky {
            fn on_progress(&mut self, _progress: &JobProgress) {
                self.calls += 1;
                panic!("observer bug");
            }
        }

        let mut observer = Panicky { calls: 0 };
        let mut reporter = ProgressReporter::new(&mut observer, 2);
        reporter.advance("one");
        reporter.advance("two");
        assert_eq!(observer.calls, 2);
    }
}
