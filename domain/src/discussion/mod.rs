//! Discussion domain
//!
//! The state a single roundtable run accumulates (the [`Transcript`]) and the
//! typed event stream through which its progress is observed.

pub mod event;
pub mod outcome;
pub mod stats;
pub mod transcript;

pub use event::RoundtableEvent;
pub use outcome::RoundtableOutcome;
pub use stats::{DiscussionStats, estimate_tokens};
pub use transcript::{Transcript, TranscriptEntry};
