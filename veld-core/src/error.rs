//! Errors of this crate.
use thiserror::Error;

/// Errors raised by the learning core.
///
/// Construction-time variants indicate configuration mistakes; the
/// remaining variants indicate protocol violations by a collaborator and
/// are never recovered from.
#[derive(Debug, Error)]
pub enum VeldError {
    /// A schedule was requested without a parameter its variant requires.
    #[error("{kind} schedule: missing required parameter '{missing}'")]
    ScheduleConfig {
        /// Schedule variant name.
        kind: &'static str,
        /// Name of the absent parameter.
        missing: &'static str,
    },

    /// A schedule was invoked without the decay input it declares.
    #[error("{kind} schedule: no value for decay input '{input}' given")]
    MissingScheduleInput {
        /// Schedule variant name.
        kind: &'static str,
        /// Name of the declared decay input.
        input: &'static str,
    },

    /// A feature vector did not match the weight vector length.
    #[error("feature vector dimension {got} does not match weight vector length {expected}")]
    DimensionMismatch {
        /// Weight vector length.
        expected: usize,
        /// Offending feature vector length.
        got: usize,
    },

    /// The environment state was queried after the episode terminated.
    #[error("state queried after the episode has terminated")]
    EpisodeTerminated,

    /// A scale key was re-registered with conflicting bounds.
    #[error("scale '{key}' already registered with different bounds")]
    ScaleConflict {
        /// Offending scale key.
        key: String,
    },

    /// A value was scaled against a key that was never registered.
    #[error("no scale registered under key '{key}'")]
    UnknownScale {
        /// Missing scale key.
        key: String,
    },

    /// A record lookup used an unknown key.
    #[error("record has no key '{0}'")]
    RecordKey(String),

    /// A record value had a different type than requested.
    #[error("record value under '{0}' has an unexpected type")]
    RecordType(String),
}
