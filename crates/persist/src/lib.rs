//! Persistence: team memory carried across the matches of a series.
//!
//! # Invariants
//! - A stored file is only accepted if its schema version, digest and
//!   per-team length all match.
//! - Memory written during a match becomes the next match's read-only
//!   previous memory.

pub mod store;

pub use store::{MemoryPayload, StoreError, TeamMemoryStore};
