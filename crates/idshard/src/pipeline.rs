use crate::{
    DigitGroup, Result, ShardLayout, ShardSink, ShardWriter, Shuffler, WriteSummary,
    synthesize_parallel,
};
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

/// Settings for one end-to-end run.
#[derive(Clone, Debug)]
pub struct Pipeline {
    pub root: PathBuf,
    pub layout: ShardLayout,
    /// Threads used by the fill stage; `1` fills sequentially.
    pub fill_threads: usize,
    /// Fixed shuffle seed. `None` seeds from the OS entropy source.
    pub seed: Option<u64>,
}

/// Wall time spent in each stage.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StageTimings {
    pub filter: Duration,
    pub synthesize: Duration,
    pub shuffle: Duration,
    pub write: Duration,
}

impl StageTimings {
    pub fn total(&self) -> Duration {
        self.filter + self.synthesize + self.shuffle + self.write
    }
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct PipelineReport {
    pub first_len: usize,
    pub rest_len: usize,
    pub written: WriteSummary,
    pub timings: StageTimings,
}

impl Pipeline {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            layout: ShardLayout::default(),
            fill_threads: 1,
            seed: None,
        }
    }

    /// Runs filter, synthesize, shuffle and write, in that order, over the
    /// built-in digit groups.
    pub fn run<S: ShardSink>(&self, sink: S) -> Result<PipelineReport> {
        let started = Instant::now();
        let first = DigitGroup::first();
        let rest = DigitGroup::rest();
        let filter = started.elapsed();

        self.run_with_groups(sink, &first, &rest, filter)
    }

    /// Same as [`run`](Self::run) with caller-supplied groups.
    pub fn run_with_groups<S: ShardSink>(
        &self,
        sink: S,
        first: &DigitGroup,
        rest: &DigitGroup,
        filter: Duration,
    ) -> Result<PipelineReport> {
        let mut timings = StageTimings {
            filter,
            ..Default::default()
        };

        // Seed before the fill so a missing entropy source fails fast.
        let mut shuffler = match self.seed {
            Some(seed) => Shuffler::from_seed(seed),
            None => Shuffler::from_entropy()?,
        };

        let started = Instant::now();
        let buffer = synthesize_parallel(first, rest, self.fill_threads)?;
        timings.synthesize = started.elapsed();

        #[cfg(feature = "tracing")]
        tracing::info!(
            ids = buffer.len(),
            elapsed_ms = timings.synthesize.as_millis() as u64,
            "fill finished"
        );

        let started = Instant::now();
        let buffer = shuffler.shuffle(buffer);
        timings.shuffle = started.elapsed();

        #[cfg(feature = "tracing")]
        tracing::info!(elapsed_ms = timings.shuffle.as_millis() as u64, "shuffle finished");

        let started = Instant::now();
        let written = ShardWriter::new(self.layout).write(sink, &self.root, &buffer)?;
        timings.write = started.elapsed();

        #[cfg(feature = "tracing")]
        tracing::info!(elapsed_ms = timings.write.as_millis() as u64, "write finished");

        Ok(PipelineReport {
            first_len: first.len(),
            rest_len: rest.len(),
            written,
            timings,
        })
    }
}
