//! Domain error types

use thiserror::Error;

/// Panel composition errors, checked before round 1
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("No panelist agents defined in the roundtable configuration")]
    NoPanelists,

    #[error("No synthesizer agent defined in the roundtable configuration")]
    NoSynthesizer,
}
