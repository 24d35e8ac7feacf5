use crate::{Error, IdBuffer, Result};
use rand::{Rng, SeedableRng, rngs::StdRng, seq::SliceRandom};

/// Applies a uniform random permutation to an [`IdBuffer`] in place.
///
/// The shuffle is Fisher–Yates: one pass from the back of the buffer,
/// swapping each slot with a uniformly chosen earlier (or same) slot. It runs
/// in `O(n)` time and allocates nothing beyond the buffer it is given.
///
/// The random engine is a type parameter so tests and benchmarks can plug in
/// a seeded generator. Production runs use [`Shuffler::from_entropy`].
#[derive(Clone, Debug)]
pub struct Shuffler<R = StdRng> {
    rng: R,
}

impl Shuffler<StdRng> {
    /// Seeds the engine from the operating system's entropy source.
    ///
    /// # Errors
    ///
    /// [`Error::EntropyUnavailable`] if the OS source cannot be read. There is
    /// no fallback to a fixed or time-based seed.
    pub fn from_entropy() -> Result<Self> {
        let rng = StdRng::try_from_os_rng().map_err(|e| Error::EntropyUnavailable {
            reason: e.to_string(),
        })?;
        Ok(Self { rng })
    }

    /// Seeds the engine with a caller-chosen value, making the permutation
    /// reproducible.
    ///
    /// Only used when a seed is requested explicitly.
    pub fn from_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }
}

impl<R: Rng> Shuffler<R> {
    pub fn with_rng(rng: R) -> Self {
        Self { rng }
    }

    /// Permutes `buffer` and hands it back.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(level = "info", skip_all, fields(len = buffer.len()))
    )]
    pub fn shuffle(&mut self, mut buffer: IdBuffer) -> IdBuffer {
        buffer.as_mut_slice().shuffle(&mut self.rng);
        buffer
    }
}
