//! Hierarchical progress reporting with cancellation.
//!
//! A [`ProgressReporter`] owns an interval of the overall `[0, 1]` range.
//! Nested operations receive sub-reporters carved out of their caller's
//! interval, so each level reports local fractions in `[0, 1]` without
//! knowing where it sits in the whole operation.
//!
//! Reporters hold no mutable state: they are `Copy` and can be handed to
//! nested calls freely. Cancellation is polled on every [`report`] call,
//! which fails with [`EngineError::Cancelled`] once the sink asks to stop.
//!
//! [`report`]: ProgressReporter::report

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::error::{EngineError, Result};

/// One progress notification, with `fraction` mapped onto `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressEvent<'a> {
    pub stage: &'a str,
    pub detail: &'a str,
    pub fraction: f64,
    pub is_final: bool,
}

/// Consumer of progress events (progress bar, log, test recorder).
pub trait ProgressSink {
    fn on_progress(&self, event: &ProgressEvent<'_>);

    /// Polled before every event; returning `true` aborts the operation.
    fn is_cancelled(&self) -> bool {
        false
    }
}

struct SilentSink;

impl ProgressSink for SilentSink {
    fn on_progress(&self, _event: &ProgressEvent<'_>) {}
}

static SILENT: SilentSink = SilentSink;

/// Shared cancellation request.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag(Arc<AtomicBool>);

impl CancelFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Sink forwarding events to a closure, optionally cancellable.
pub struct CallbackSink<F> {
    callback: F,
    cancel: Option<CancelFlag>,
}

impl<F: Fn(&ProgressEvent<'_>)> CallbackSink<F> {
    pub fn new(callback: F) -> Self {
        Self {
            callback,
            cancel: None,
        }
    }

    #[must_use]
    pub fn with_cancel_flag(mut self, flag: CancelFlag) -> Self {
        self.cancel = Some(flag);
        self
    }
}

impl<F: Fn(&ProgressEvent<'_>)> ProgressSink for CallbackSink<F> {
    fn on_progress(&self, event: &ProgressEvent<'_>) {
        (self.callback)(event);
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(CancelFlag::is_cancelled)
    }
}

/// Maps local progress fractions onto a sub-interval of the root range.
#[derive(Clone, Copy)]
pub struct ProgressReporter<'a> {
    sink: &'a dyn ProgressSink,
    start: f64,
    end: f64,
}

impl fmt::Debug for ProgressReporter<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProgressReporter")
            .field("start", &self.start)
            .field("end", &self.end)
            .finish_non_exhaustive()
    }
}

impl<'a> ProgressReporter<'a> {
    /// Root reporter covering `[0, 1]`.
    pub fn new(sink: &'a dyn ProgressSink) -> Self {
        Self {
            sink,
            start: 0.0,
            end: 1.0,
        }
    }

    /// Reporter that drops events and never cancels.
    pub fn silent() -> ProgressReporter<'static> {
        ProgressReporter::new(&SILENT)
    }

    /// Bounds of this reporter's interval within the root range.
    pub fn interval(&self) -> (f64, f64) {
        (self.start, self.end)
    }

    /// Fail with [`EngineError::Cancelled`] if cancellation was requested.
    pub fn check_cancelled(&self) -> Result<()> {
        if self.sink.is_cancelled() {
            return Err(EngineError::Cancelled);
        }
        Ok(())
    }

    /// Emit an event at local `fraction` (clamped to `[0, 1]`).
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Cancelled`] without emitting if the sink
    /// requested cancellation.
    pub fn report(&self, stage: &str, detail: &str, fraction: f64, is_final: bool) -> Result<()> {
        self.check_cancelled()?;
        self.sink.on_progress(&ProgressEvent {
            stage,
            detail,
            fraction: self.map(fraction),
            is_final,
        });
        Ok(())
    }

    /// Reporter for the local sub-range `[from, to]`.
    pub fn section(&self, from: f64, to: f64) -> Self {
        let from = self.map(from);
        let to = self.map(to).max(from);
        Self {
            sink: self.sink,
            start: from,
            end: to,
        }
    }

    /// Reporter for the `index`-th of `count` equal parts of this interval.
    pub fn subdivide(&self, index: usize, count: usize) -> Self {
        debug_assert!(index < count, "subdivide index {index} out of {count}");
        let count = count.max(1);
        let index = index.min(count - 1);
        self.section(index as f64 / count as f64, (index + 1) as f64 / count as f64)
    }

    fn map(&self, fraction: f64) -> f64 {
        if fraction.is_nan() || fraction <= 0.0 {
            self.start
        } else if fraction >= 1.0 {
            self.end
        } else {
            (self.start + fraction * (self.end - self.start)).min(self.end)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[derive(Default)]
    struct Recorder {
        events: RefCell<Vec<(String, f64, bool)>>,
        cancel_after: Option<usize>,
    }

    impl ProgressSink for Recorder {
        fn on_progress(&self, event: &ProgressEvent<'_>) {
            self.events
                .borrow_mut()
                .push((event.stage.to_string(), event.fraction, event.is_final));
        }

        fn is_cancelled(&self) -> bool {
            self.cancel_after
                .is_some_and(|n| self.events.borrow().len() >= n)
        }
    }

    #[test]
    fn test_report_maps_onto_interval() {
        let sink = Recorder::default();
        let root = ProgressReporter::new(&sink);
        let child = root.subdivide(1, 4);
        assert_eq!(child.interval(), (0.25, 0.5));

        child.report("stage", "", 0.5, false).unwrap();
        child.report("stage", "", 2.0, true).unwrap();
        let events = sink.events.borrow();
        assert_eq!(events[0].1, 0.375);
        assert_eq!(events[1].1, 0.5);
        assert!(events[1].2);
    }

    #[test]
    fn test_section_nests() {
        let sink = Recorder::default();
        let root = ProgressReporter::new(&sink);
        let nested = root.section(0.3, 0.6).subdivide(0, 3);
        let (start, end) = nested.interval();
        assert_eq!(start, 0.3);
        assert!((end - 0.4).abs() < 1e-12);
    }

    #[test]
    fn test_cancellation_stops_reporting() {
        let sink = Recorder {
            cancel_after: Some(1),
            ..Recorder::default()
        };
        let root = ProgressReporter::new(&sink);
        root.report("first", "", 0.0, false).unwrap();
        let err = root.subdivide(0, 2).report("second", "", 0.0, false);
        assert!(matches!(err, Err(EngineError::Cancelled)));
        assert_eq!(sink.events.borrow().len(), 1);
    }

    #[test]
    fn test_cancel_flag_sink() {
        let flag = CancelFlag::new();
        let sink = CallbackSink::new(|_: &ProgressEvent<'_>| {}).with_cancel_flag(flag.clone());
        let root = ProgressReporter::new(&sink);
        assert!(root.check_cancelled().is_ok());
        flag.cancel();
        assert!(root.check_cancelled().unwrap_err().is_cancelled());
    }

    #[test]
    fn test_silent_reporter() {
        let silent = ProgressReporter::silent();
        assert!(silent.report("x", "y", 0.5, false).is_ok());
        assert_eq!(silent.interval(), (0.0, 1.0));
    }
}
