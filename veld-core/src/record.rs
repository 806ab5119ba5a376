//! Records for logging and value-function snapshots.
mod base;
mod snapshot;

pub use base::{Record, RecordValue};
pub use snapshot::{GridSnapshot, NullSnapshot, SnapshotRow, ValueSnapshot};
