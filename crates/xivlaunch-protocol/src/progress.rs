//! Progress reporting side channel

/// Progress notification emitted while patching or logging in
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatchEvent {
    /// A new stage started
    Stage(String),
    /// Bytes received across all downloads of the current run
    Download {
        /// Bytes received so far
        received: u64,
        /// Bytes expected in total
        total: u64,
    },
    /// A patch is about to be installed
    Install {
        /// Zero-based position in install order
        index: usize,
        /// Number of patches in the run
        count: usize,
    },
}

/// Receiver for progress events
///
/// Download events arrive from spawned tasks, so implementations must be
/// shareable across threads.
pub trait ProgressReporter: Send + Sync {
    fn report(&self, event: &PatchEvent);
}

impl<F> ProgressReporter for F
where
    F: Fn(&PatchEvent) + Send + Sync,
{
    fn report(&self, event: &PatchEvent) {
        self(event);
    }
}

/// Reporter that drops every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NoProgress;

impl ProgressReporter for NoProgress {
    fn report(&self, _event: &PatchEvent) {}
}
