//! Progress reporting for filter runs.
//!
//! A run reports one [`ProgressEvent::Level`] per completed Gaussian level
//! and a terminal [`ProgressEvent::Done`]. `Done` is sent only when the run
//! succeeds.
//!
//! Any `FnMut(ProgressEvent)` closure is a [`Progress`] sink:
//!
//! ```rust
//! use lapsharp_ops::progress::{Progress, ProgressEvent};
//!
//! let mut seen = Vec::new();
//! let mut sink = |e: ProgressEvent| seen.push(e);
//! sink.report(ProgressEvent::Done);
//! assert_eq!(seen, vec![ProgressEvent::Done]);
//! ```

/// A progress notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProgressEvent {
    /// Pyramid level `index` of `total` has been built.
    Level {
        /// Zero-based level index
        index: usize,
        /// Total number of levels
        total: usize,
    },
    /// The run has finished and the destination is written.
    Done,
}

/// Receives progress notifications.
pub trait Progress {
    /// Called once per event, on the thread running the filter.
    fn report(&mut self, event: ProgressEvent);
}

impl<F: FnMut(ProgressEvent)> Progress for F {
    fn report(&mut self, event: ProgressEvent) {
        self(event)
    }
}

/// Discards all events.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl Progress for NoProgress {
    fn report(&mut self, _event: ProgressEvent) {}
}
