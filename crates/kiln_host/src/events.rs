//! Event channel from the host to the build driver.
//!
//! The host reports two kinds of events: every file the cache observes (for
//! file watchers and dependency tracking) and every translated diagnostic.
//! Listeners can be closures, `mpsc` senders, or a shared [`EventLog`].

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc::Sender;
use std::sync::{Arc, Mutex};

use kiln_cache::FileObserved;
use kiln_diagnostics::CompileError;

/// An event reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostEvent {
    /// A file was read into the cache, whether freshly parsed or reused.
    File(FileObserved),
    /// A diagnostic was raised during a compile pass.
    Error(CompileError),
}

/// A receiver of host events.
pub trait EventSink {
    /// Delivers one event.
    fn send(&mut self, event: &HostEvent);
}

impl<F> EventSink for F
where
    F: FnMut(&HostEvent),
{
    fn send(&mut self, event: &HostEvent) {
        self(event)
    }
}

impl EventSink for Sender<HostEvent> {
    fn send(&mut self, event: &HostEvent) {
        // A dropped receiver just means nobody is listening any more.
        let _ = Sender::<HostEvent>::send(&*self, event.clone());
    }
}

impl EventSink for Arc<EventLog> {
    fn send(&mut self, event: &HostEvent) {
        self.record(event.clone());
    }
}

/// Fan-out to every subscribed sink.
#[derive(Default)]
pub(crate) struct Listeners {
    sinks: Vec<Box<dyn EventSink>>,
}

impl Listeners {
    pub(crate) fn subscribe(&mut self, sink: Box<dyn EventSink>) {
        self.sinks.push(sink);
    }

    pub(crate) fn dispatch(&mut self, event: HostEvent) {
        for sink in &mut self.sinks {
            sink.send(&event);
        }
    }
}

/// A thread-safe recorder of host events.
///
/// Subscribe an `Arc<EventLog>` and keep a clone to inspect what happened.
/// The error count is tracked atomically so `has_errors` never locks.
#[derive(Default)]
pub struct EventLog {
    events: Mutex<Vec<HostEvent>>,
    error_count: AtomicUsize,
}

impl EventLog {
    /// Creates a new empty, shareable log.
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Records an event.
    pub fn record(&self, event: HostEvent) {
        if matches!(event, HostEvent::Error(_)) {
            self.error_count.fetch_add(1, Ordering::Relaxed);
        }
        self.lock().push(event);
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Vec<HostEvent>> {
        // A panic while holding the lock cannot leave the Vec half-written.
        self.events.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Returns `true` if any error event has been recorded.
    pub fn has_errors(&self) -> bool {
        self.error_count.load(Ordering::Relaxed) > 0
    }

    /// Number of error events recorded so far.
    pub fn error_count(&self) -> usize {
        self.error_count.load(Ordering::Relaxed)
    }

    /// Snapshot of every recorded event.
    pub fn events(&self) -> Vec<HostEvent> {
        self.lock().clone()
    }

    /// Snapshot of the recorded file observations.
    pub fn files(&self) -> Vec<FileObserved> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                HostEvent::File(f) => Some(f.clone()),
                HostEvent::Error(_) => None,
            })
            .collect()
    }

    /// Snapshot of the recorded errors.
    pub fn errors(&self) -> Vec<CompileError> {
        self.lock()
            .iter()
            .filter_map(|e| match e {
                HostEvent::Error(err) => Some(err.clone()),
                HostEvent::File(_) => None,
            })
            .collect()
    }

    /// Takes all recorded events, leaving the log empty.
    ///
    /// The error count is not reset.
    pub fn take_all(&self) -> Vec<HostEvent> {
        std::mem::take(&mut *self.lock())
    }
}
