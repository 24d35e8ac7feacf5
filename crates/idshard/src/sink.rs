use crate::{Error, Result};
use std::{
    collections::BTreeSet,
    fs::{self, OpenOptions},
    io::{self, BufWriter, Write},
    path::{Path, PathBuf},
};

/// Destination for the shard tree.
///
/// This abstraction keeps the writer independent of the real filesystem so
/// tests and benchmarks can capture output in memory.
pub trait ShardSink {
    /// Creates a single directory. Must fail if `path` already exists.
    fn create_dir(&mut self, path: &Path) -> Result<()>;

    /// Creates a new file at `path` and writes `ids` to it as consecutive
    /// native-endian 4-byte integers, with no header or trailer.
    fn write_ids(&mut self, path: &Path, ids: &[u32]) -> Result<()>;
}

impl<S: ShardSink + ?Sized> ShardSink for &mut S {
    fn create_dir(&mut self, path: &Path) -> Result<()> {
        (**self).create_dir(path)
    }

    fn write_ids(&mut self, path: &Path, ids: &[u32]) -> Result<()> {
        (**self).write_ids(path, ids)
    }
}

/// Size of the write buffer placed in front of each chunk file.
const WRITE_BUFFER_BYTES: usize = 1 << 20;

/// A [`ShardSink`] backed by the local filesystem.
#[derive(Clone, Debug, Default)]
pub struct FsSink;

impl ShardSink for FsSink {
    fn create_dir(&mut self, path: &Path) -> Result<()> {
        fs::create_dir(path).map_err(|source| Error::CreateDir {
            path: path.to_path_buf(),
            source,
        })
    }

    fn write_ids(&mut self, path: &Path, ids: &[u32]) -> Result<()> {
        let file = OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .map_err(|source| Error::CreateFile {
                path: path.to_path_buf(),
                source,
            })?;

        // The handle is closed when `out` drops, on success and error alike.
        let mut out = BufWriter::with_capacity(WRITE_BUFFER_BYTES, file);
        write_native(&mut out, ids)
            .and_then(|()| out.flush())
            .map_err(|source| Error::WriteFile {
                path: path.to_path_buf(),
                source,
            })
    }
}

fn write_native<W: Write>(out: &mut W, ids: &[u32]) -> io::Result<()> {
    for id in ids {
        out.write_all(&id.to_ne_bytes())?;
    }
    Ok(())
}

/// A [`ShardSink`] that records everything in memory.
///
/// Directories are tracked so that creating one twice fails just like the
/// filesystem would.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    dirs: BTreeSet<PathBuf>,
    dir_order: Vec<PathBuf>,
    files: Vec<(PathBuf, Vec<u32>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directories in creation order.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dir_order
    }

    /// Files and their contents in creation order.
    pub fn files(&self) -> &[(PathBuf, Vec<u32>)] {
        &self.files
    }

    /// Concatenation of every file's contents in creation order.
    pub fn concat(&self) -> Vec<u32> {
        self.files
            .iter()
            .flat_map(|(_, ids)| ids.iter().copied())
            .collect()
    }
}

impl ShardSink for MemorySink {
    fn create_dir(&mut self, path: &Path) -> Result<()> {
        if !self.dirs.insert(path.to_path_buf()) {
            return Err(Error::CreateDir {
                path: path.to_path_buf(),
                source: io::Error::from(io::ErrorKind::AlreadyExists),
            });
        }
        self.dir_order.push(path.to_path_buf());
        Ok(())
    }

    fn write_ids(&mut self, path: &Path, ids: &[u32]) -> Result<()> {
        let parent_known = path.parent().is_some_and(|p| self.dirs.contains(p));
        let exists = self.files.iter().any(|(p, _)| p == path);
        if !parent_known || exists {
            let kind = if exists {
                io::ErrorKind::AlreadyExists
            } else {
                io::ErrorKind::NotFound
            };
            return Err(Error::CreateFile {
                path: path.to_path_buf(),
                source: io::Error::from(kind),
            });
        }
        self.files.push((path.to_path_buf(), ids.to_vec()));
        Ok(())
    }
}
