//! Error types for the generation pipeline.
//!
//! Every variant is fatal: the pipeline is a one-shot batch job, so errors
//! unwind straight to the caller with no retry and no cleanup of partial
//! output. Each variant names the stage that failed and, for filesystem
//! failures, the offending path.

use std::{io, path::PathBuf};
use thiserror::Error;

/// A result type defaulting to the crate [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors `idshard` can produce.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum Error {
    /// The ID buffer could not be allocated, either because the element count
    /// overflows `usize` or because the allocator refused the request.
    #[error("synthesize: cannot allocate buffer for {requested} ids")]
    Allocation { requested: u128 },

    /// The OS entropy source could not seed the shuffle engine.
    #[error("shuffle: entropy source unavailable: {reason}")]
    EntropyUnavailable { reason: String },

    /// The buffer holds more IDs than the shard layout can address.
    #[error("write: {total} ids exceed layout capacity of {capacity}")]
    LayoutOverflow { total: usize, capacity: usize },

    /// A directory could not be created (it already exists, or permission
    /// was denied).
    #[error("write: create directory {path:?} failed: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A chunk file could not be opened for writing.
    #[error("write: create file {path:?} failed: {source}")]
    CreateFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A chunk file was opened but the IDs could not be written out.
    #[error("write: write file {path:?} failed: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A chunk file could not be read back.
    #[error("read: open file {path:?} failed: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A chunk file's contents are not a packed run of 4-byte IDs.
    #[error("read: invalid shard {path:?}: {reason}")]
    InvalidShard { path: PathBuf, reason: String },

    /// A decoded value is not a composite of the permitted digit groups.
    #[error("verify: malformed id {id} in {path:?}")]
    MalformedId { path: PathBuf, id: u32 },

    /// The same ID appeared more than once across the tree.
    #[error("verify: duplicate id {id} in {path:?}")]
    DuplicateId { path: PathBuf, id: u32 },

    /// A database operation failed while importing a chunk.
    #[error("import: {context} failed: {source}")]
    Database {
        context: &'static str,
        #[source]
        source: rusqlite::Error,
    },
}
