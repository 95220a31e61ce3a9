//! Error types for the spread matcher.
//!
//! Every error is raised at the input boundary, before any remaining-volume
//! counter is touched. Once resolution starts the engine cannot fail.

use thiserror::Error;

use crate::types::Side;

/// Reasons a volume value is rejected at the boundary.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum VolumeError {
    /// Volume below zero
    #[error("volume `{0}` is negative")]
    Negative(String),

    /// Volume with a non-zero fractional part
    #[error("volume `{0}` is not a whole number of units")]
    Fractional(String),

    /// Volume that does not fit the integer representation
    #[error("volume `{0}` is out of range")]
    Overflow(String),

    /// Input that is not a number at all
    #[error("volume `{0}` is not a number")]
    Malformed(String),
}

/// Errors returned by [`SpreadMatcher::run`](crate::SpreadMatcher::run).
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MatchError {
    /// The same id appears twice within one entity group
    #[error("duplicate {side} entity `{id}`")]
    DuplicateEntity { side: Side, id: String },

    /// A priority node names an entity missing from its group
    #[error("priority forest references unknown {side} entity `{id}`")]
    DanglingReference { side: Side, id: String },

    /// The same id is listed twice among the peers of one tier
    #[error("`{id}` appears more than once among the peers of a single tier")]
    DuplicatePeer { id: String },

    /// A supply-side node carries its own nested priority forest
    #[error(
        "supply entity `{id}` carries a nested priority forest; \
         only demand -> supply nesting is supported"
    )]
    UnsupportedNesting { id: String },

    /// Volume rejected while parsing input
    #[error("invalid volume: {0}")]
    InvalidVolume(#[from] VolumeError),

    /// Request text that is not valid JSON or does not have the request shape
    #[error("malformed request: {0}")]
    MalformedRequest(String),
}

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, MatchError>;
