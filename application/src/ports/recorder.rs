//! Event recorder port
//!
//! A recorder is a sink invoked once per emitted [`RoundtableEvent`]. The
//! terminal renderer and the JSONL history writer are both recorders; each
//! must accept every event variant, ignoring the ones it has no use for.

use roundtable_domain::RoundtableEvent;

/// Sink for roundtable events.
///
/// `handle_event` is synchronous and non-fallible so a slow or broken sink
/// cannot stall or abort the discussion; implementations swallow their own
/// I/O errors.
pub trait EventRecorder: Send + Sync {
    fn handle_event(&self, event: &RoundtableEvent);
}

/// No-op recorder for tests and when recording is disabled.
pub struct NoRecorder;

impl EventRecorder for NoRecorder {
    fn handle_event(&self, _event: &RoundtableEvent) {}
}

/// A recorder that delegates every event to multiple inner recorders, in order.
pub struct CompositeRecorder<'a> {
    delegates: Vec<&'a dyn EventRecorder>,
}

impl<'a> CompositeRecorder<'a> {
    pub fn new(delegates: Vec<&'a dyn EventRecorder>) -> Self {
        Self { delegates }
    }

    pub fn push(&mut self, recorder: &'a dyn EventRecorder) {
        self.delegates.push(recorder);
    }
}

impl EventRecorder for CompositeRecorder<'_> {
    fn handle_event(&self, event: &RoundtableEvent) {
        for d in &self.delegates {
            d.handle_event(event);
        }
    }
}
