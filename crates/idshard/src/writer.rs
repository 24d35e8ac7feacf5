use crate::{Error, IdBuffer, Result, ShardCoord, ShardLayout, ShardSink};
use std::path::{Path, PathBuf};

/// Progress of a single [`ShardWriter::write`] call.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WriterState {
    NotStarted,
    CreatingRoot,
    /// `next` is the coordinate of the next file to write and `cursor` the
    /// number of IDs already consumed.
    IteratingShards { next: ShardCoord, cursor: usize },
    Done,
    Failed,
}

/// Counts reported by a successful write.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct WriteSummary {
    /// Directories created, including the root.
    pub directories: usize,
    pub files: usize,
    pub ids: usize,
}

/// Streams a shuffled [`IdBuffer`] into the shard tree.
///
/// Files are filled strictly in buffer order: file `n` (in `(i, j, k)` nested
/// order) holds elements `[n * ids_per_file, (n + 1) * ids_per_file)`. Writing
/// stops as soon as the buffer is exhausted, so no empty directory or file is
/// ever created.
#[derive(Debug)]
pub struct ShardWriter {
    layout: ShardLayout,
    state: WriterState,
}

impl ShardWriter {
    pub fn new(layout: ShardLayout) -> Self {
        Self {
            layout,
            state: WriterState::NotStarted,
        }
    }

    pub fn layout(&self) -> ShardLayout {
        self.layout
    }

    pub fn state(&self) -> &WriterState {
        &self.state
    }

    /// Creates `root` and writes every ID in `buffer` below it.
    ///
    /// # Errors
    ///
    /// - [`Error::LayoutOverflow`] if `buffer` does not fit the layout; checked
    ///   before anything is created.
    /// - [`Error::CreateDir`], [`Error::CreateFile`], [`Error::WriteFile`]
    ///   from the sink. The write aborts immediately and leaves whatever was
    ///   already written in place.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "info", skip_all, fields(root = ?root, len = buffer.len()))
    )]
    pub fn write<S: ShardSink>(
        &mut self,
        mut sink: S,
        root: &Path,
        buffer: &IdBuffer,
    ) -> Result<WriteSummary> {
        let result = self.run(&mut sink, root, buffer);
        if result.is_err() {
            self.state = WriterState::Failed;
        }
        result
    }

    fn run<S: ShardSink>(
        &mut self,
        sink: &mut S,
        root: &Path,
        buffer: &IdBuffer,
    ) -> Result<WriteSummary> {
        let ids = buffer.as_slice();
        let capacity = self.layout.capacity();
        if ids.len() > capacity {
            return Err(Error::LayoutOverflow {
                total: ids.len(),
                capacity,
            });
        }

        self.state = WriterState::CreatingRoot;
        sink.create_dir(root)?;
        let mut summary = WriteSummary {
            directories: 1,
            ..Default::default()
        };

        let mut dir1 = PathBuf::new();
        let mut dir2 = PathBuf::new();
        let chunks = ids.chunks(self.layout.ids_per_file.max(1));

        for (chunk, coord) in chunks.zip(ShardLayout::coords()) {
            self.state = WriterState::IteratingShards {
                next: coord,
                cursor: summary.ids,
            };

            if coord.j == 0 && coord.k == 0 {
                dir1 = root.join(coord.dir1_name().to_string());
                sink.create_dir(&dir1)?;
                summary.directories += 1;

                #[cfg(feature = "tracing")]
                tracing::debug!(dir = ?dir1, cursor = summary.ids, "created first-level directory");
            }
            if coord.k == 0 {
                dir2 = dir1.join(coord.dir2_name().to_string());
                sink.create_dir(&dir2)?;
                summary.directories += 1;
            }

            sink.write_ids(&dir2.join(coord.file_name()), chunk)?;
            summary.files += 1;
            summary.ids += chunk.len();
        }
        debug_assert_eq!(summary.ids, ids.len());

        #[cfg(feature = "tracing")]
        tracing::info!(
            directories = summary.directories,
            files = summary.files,
            ids = summary.ids,
            "shard tree written"
        );

        self.state = WriterState::Done;
        Ok(summary)
    }
}

#[cfg(test)]
mod tests;
