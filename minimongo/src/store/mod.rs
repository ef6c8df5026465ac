//! Whole-database snapshots.
//!
//! A snapshot is the complete state of a [crate::MongoDatabase] written as
//! one blob: an 8-byte magic, a little-endian `u32` format version, then the
//! database name and every collection encoded with bincode. Collections are
//! kept in name order and documents in store order, so saving the same
//! database twice produces the same bytes.
//!
//! There is no incremental persistence. A snapshot is written in full and
//! read back in full.

mod snapshot;

pub(crate) use snapshot::*;
