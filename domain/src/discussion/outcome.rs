//! Interpreting a finished event stream.
//!
//! A run succeeded iff a `roundtable_done` event was observed. Panelist
//! events without a final `roundtable_done` mean the discussion failed, even
//! if most of the transcript was delivered.

use super::event::RoundtableEvent;
use super::stats::DiscussionStats;

#[derive(Debug, Clone, PartialEq)]
pub enum RoundtableOutcome {
    Completed {
        answer: String,
        stats: DiscussionStats,
    },
    Failed {
        error: String,
    },
    /// The stream ended without a terminal event (consumer stopped early or
    /// the producer vanished).
    Incomplete,
}

impl RoundtableOutcome {
    pub fn from_events<'a>(events: impl IntoIterator<Item = &'a RoundtableEvent>) -> Self {
        let mut last_fatal = None;
        for event in events {
            match event {
                RoundtableEvent::RoundtableDone { answer, stats } => {
                    return RoundtableOutcome::Completed {
                        answer: answer.clone(),
                        stats: *stats,
                    };
                }
                RoundtableEvent::Error { error, .. } => last_fatal = Some(error.clone()),
                // Panelist errors are recovered once their round closes
                RoundtableEvent::RoundEnd { .. } | RoundtableEvent::SynthesisStart { .. } => {
                    last_fatal = None
                }
                _ => {}
            }
        }
        match last_fatal {
            Some(error) => RoundtableOutcome::Failed { error },
            None => RoundtableOutcome::Incomplete,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, RoundtableOutcome::Completed { .. })
    }
}
