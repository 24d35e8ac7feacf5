//! # Shard layout
//!
//! Output is a fixed two-level directory tree:
//!
//! ```text
//! <root>/<a>/<b>/id_<a><b><k>
//! ```
//!
//! - `<a>`, `<b>`: one letter each from [`ALPHABET`] (26 × 26 directories)
//! - `<k>`: a decimal digit, [`FILES_PER_DIR`] files per leaf directory
//!
//! Each file holds up to [`ShardLayout::ids_per_file`] IDs. Coordinates are
//! assigned by the writer's position in the shuffled buffer and say nothing
//! about the ID values inside a file.

use std::path::PathBuf;

/// Symbols naming both directory levels.
pub const ALPHABET: &[u8; 26] = b"abcdefghijklmnopqrstuvwxyz";

/// Number of chunk files in each second-level directory.
pub const FILES_PER_DIR: usize = 10;

/// Default number of IDs per chunk file.
pub const IDS_PER_FILE: usize = 200_000;

/// Prefix of every chunk file name.
pub const FILE_PREFIX: &str = "id_";

/// Position of one chunk file in the tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ShardCoord {
    pub i: usize,
    pub j: usize,
    pub k: usize,
}

impl ShardCoord {
    pub fn new(i: usize, j: usize, k: usize) -> Self {
        debug_assert!(i < ALPHABET.len() && j < ALPHABET.len() && k < FILES_PER_DIR);
        Self { i, j, k }
    }

    /// Linear index of this coordinate in `(i, j, k)` nested order.
    pub fn ordinal(&self) -> usize {
        (self.i * ALPHABET.len() + self.j) * FILES_PER_DIR + self.k
    }

    pub fn dir1_name(&self) -> char {
        ALPHABET[self.i] as char
    }

    pub fn dir2_name(&self) -> char {
        ALPHABET[self.j] as char
    }

    /// `id_<a><b><k>`, e.g. `id_ab3`.
    pub fn file_name(&self) -> String {
        format!(
            "{FILE_PREFIX}{}{}{}",
            self.dir1_name(),
            self.dir2_name(),
            self.k
        )
    }

    /// `<a>/<b>/id_<a><b><k>`, relative to the output root.
    pub fn relative_path(&self) -> PathBuf {
        let mut path = PathBuf::new();
        path.push(self.dir1_name().to_string());
        path.push(self.dir2_name().to_string());
        path.push(self.file_name());
        path
    }
}

/// Sizing of the shard tree.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ShardLayout {
    pub ids_per_file: usize,
}

impl Default for ShardLayout {
    fn default() -> Self {
        Self {
            ids_per_file: IDS_PER_FILE,
        }
    }
}

impl ShardLayout {
    pub fn new(ids_per_file: usize) -> Self {
        Self { ids_per_file }
    }

    /// Total number of chunk files the tree can hold.
    pub const fn file_slots() -> usize {
        ALPHABET.len() * ALPHABET.len() * FILES_PER_DIR
    }

    /// Maximum number of IDs the tree can hold, saturating on overflow.
    pub fn capacity(&self) -> usize {
        Self::file_slots().saturating_mul(self.ids_per_file)
    }

    /// Number of files needed for `total` IDs.
    pub fn files_for(&self, total: usize) -> usize {
        if self.ids_per_file == 0 {
            return 0;
        }
        total.div_ceil(self.ids_per_file)
    }

    /// Every coordinate in writing order.
    pub fn coords() -> impl Iterator<Item = ShardCoord> {
        (0..ALPHABET.len()).flat_map(|i| {
            (0..ALPHABET.len())
                .flat_map(move |j| (0..FILES_PER_DIR).map(move |k| ShardCoord::new(i, j, k)))
        })
    }
}
