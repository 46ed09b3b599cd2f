//! On-disk persistence for the registration engine.
//!
//! State is written as a single pretty-printed JSON snapshot stamped with the
//! time it was saved. Snapshots are replaced atomically: the new contents go
//! to a temporary file that is then renamed over the old one.

pub mod snapshot;

pub use snapshot::{Snapshot, SnapshotStore};
