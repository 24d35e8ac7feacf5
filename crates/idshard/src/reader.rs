//! Reading chunk files back and checking a finished tree.
//!
//! A chunk file is a bare run of native-endian `u32` values. Anything empty or
//! not a whole number of values is rejected.

use crate::{
    COMPOSITE_ID_SIZE, CompositeId, DigitGroup, Error, Result, ShardLayout, total_ids,
};
use std::{
    fs, io,
    path::{Path, PathBuf},
};
use thiserror::Error;

/// Why a byte run is not a chunk of IDs.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeError {
    #[error("empty file")]
    Empty,
    #[error("{len} bytes is not a multiple of {COMPOSITE_ID_SIZE}")]
    Ragged { len: usize },
}

/// Decodes a chunk's contents into IDs.
///
/// # Example
///
/// ```
/// use idshard::{DecodeError, decode_ids};
///
/// let bytes = 100_001_001u32.to_ne_bytes();
/// assert_eq!(decode_ids(&bytes), Ok(vec![100_001_001]));
/// assert_eq!(decode_ids(&bytes[..3]), Err(DecodeError::Ragged { len: 3 }));
/// ```
pub fn decode_ids(bytes: &[u8]) -> Result<Vec<u32>, DecodeError> {
    if bytes.is_empty() {
        return Err(DecodeError::Empty);
    }
    if bytes.len() % COMPOSITE_ID_SIZE != 0 {
        return Err(DecodeError::Ragged { len: bytes.len() });
    }
    Ok(bytes
        .chunks_exact(COMPOSITE_ID_SIZE)
        .map(|b| u32::from_ne_bytes([b[0], b[1], b[2], b[3]]))
        .collect())
}

/// Reads one chunk file into memory.
///
/// # Errors
///
/// - [`Error::ReadFile`] if the file cannot be read
/// - [`Error::InvalidShard`] if [`decode_ids`] rejects its contents
pub fn read_shard(path: &Path) -> Result<Vec<u32>> {
    let bytes = fs::read(path).map_err(|source| Error::ReadFile {
        path: path.to_path_buf(),
        source,
    })?;
    decode_ids(&bytes).map_err(|e| Error::InvalidShard {
        path: path.to_path_buf(),
        reason: e.to_string(),
    })
}

/// Outcome of [`verify_tree`].
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct VerifyReport {
    pub files: usize,
    pub ids: usize,
    /// Size of the full ID space, `|A| * |B| * |B|`.
    pub expected: usize,
}

impl VerifyReport {
    /// `true` if the tree holds the entire ID space.
    pub fn is_complete(&self) -> bool {
        self.ids == self.expected
    }
}

/// One bit per possible composite value, grown on demand.
#[derive(Default)]
struct SeenSet {
    words: Vec<u64>,
}

impl SeenSet {
    /// Marks `id`, returning `false` if it was already marked.
    fn insert(&mut self, id: u32) -> bool {
        let (word, bit) = (id as usize / 64, id % 64);
        if word >= self.words.len() {
            self.words.resize(word + 1, 0);
        }
        let mask = 1u64 << bit;
        let fresh = self.words[word] & mask == 0;
        self.words[word] |= mask;
        fresh
    }
}

/// Walks the tree under `root` in writing order and checks its contents.
///
/// The walk ends at the first missing file. Every value must be a well-formed
/// composite of the built-in digit groups and appear only once. Every file
/// except the last must be full.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "info",
        skip(layout),
        fields(ids_per_file = layout.ids_per_file)
    )
)]
pub fn verify_tree(root: &Path, layout: ShardLayout) -> Result<VerifyReport> {
    let first = DigitGroup::first();
    let rest = DigitGroup::rest();
    let mut report = VerifyReport {
        expected: total_ids(&first, &rest)?,
        ..Default::default()
    };
    let mut seen = SeenSet::default();
    let mut short: Option<PathBuf> = None;

    for coord in ShardLayout::coords() {
        let path = root.join(coord.relative_path());
        let ids = match read_shard(&path) {
            Ok(ids) => ids,
            Err(Error::ReadFile { source, .. }) if source.kind() == io::ErrorKind::NotFound => {
                break;
            }
            Err(e) => return Err(e),
        };

        if let Some(prev) = short.take() {
            return Err(Error::InvalidShard {
                path: prev,
                reason: format!("short chunk followed by {}", coord.file_name()),
            });
        }
        if ids.len() > layout.ids_per_file {
            return Err(Error::InvalidShard {
                path,
                reason: format!("{} ids exceed {} per file", ids.len(), layout.ids_per_file),
            });
        }

        for &id in &ids {
            if !CompositeId::from_raw(id).is_well_formed(&first, &rest) {
                return Err(Error::MalformedId { path, id });
            }
            if !seen.insert(id) {
                return Err(Error::DuplicateId { path, id });
            }
        }

        report.files += 1;
        report.ids += ids.len();
        if ids.len() < layout.ids_per_file {
            short = Some(path);
        }
    }

    #[cfg(feature = "tracing")]
    tracing::info!(
        files = report.files,
        ids = report.ids,
        expected = report.expected,
        "tree verified"
    );

    Ok(report)
}
