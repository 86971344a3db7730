//! Append-only record of completed panelist turns.

use serde::{Deserialize, Serialize};

/// One completed panelist turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranscriptEntry {
    pub agent_id: String,
    pub agent_name: String,
    pub round: u32,
    pub response: String,
    pub model: String,
}

/// Ordered transcript of a run.
///
/// Entries are only ever appended, in the order their `agent_done` events are
/// emitted. Nothing is reordered or removed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transcript {
    entries: Vec<TranscriptEntry>,
}

impl Transcript {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: TranscriptEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[TranscriptEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TranscriptEntry> {
        self.entries.iter()
    }

    /// Entries from rounds strictly before `round`.
    pub fn before_round(&self, round: u32) -> Vec<&TranscriptEntry> {
        self.entries.iter().filter(|e| e.round < round).collect()
    }

    /// Entries recorded during `round`.
    pub fn in_round(&self, round: u32) -> Vec<&TranscriptEntry> {
        self.entries.iter().filter(|e| e.round == round).collect()
    }
}

impl<'a> IntoIterator for &'a Transcript {
    type Item = &'a TranscriptEntry;
    type IntoIter = std::slice::Iter<'a, TranscriptEntry>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
