//! Discussion history: structured event recording.
//!
//! Provides [`JsonlDiscussionRecorder`], a JSONL file writer that implements
//! the [`EventRecorder`](roundtable_application::EventRecorder) port.

mod jsonl_recorder;

pub use jsonl_recorder::{JsonlDiscussionRecorder, history_file_name};
