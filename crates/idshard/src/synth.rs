use crate::{CompositeId, DigitGroup, Error, FIRST_WEIGHT, MIDDLE_WEIGHT, Result};
use std::thread;

/// The flat buffer holding every generated ID.
///
/// Exactly one `IdBuffer` exists per run. It is created by [`synthesize`],
/// moved into the shuffler, and then handed to the writer. Its length never
/// changes after the fill; later stages only reorder or read it.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct IdBuffer {
    ids: Vec<u32>,
}

impl IdBuffer {
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.ids
    }

    pub(crate) fn as_mut_slice(&mut self) -> &mut [u32] {
        &mut self.ids
    }

    pub fn iter_ids(&self) -> impl ExactSizeIterator<Item = CompositeId> + '_ {
        self.ids.iter().copied().map(CompositeId::from_raw)
    }

    pub fn into_inner(self) -> Vec<u32> {
        self.ids
    }
}

impl From<Vec<u32>> for IdBuffer {
    fn from(ids: Vec<u32>) -> Self {
        Self { ids }
    }
}

/// Number of IDs produced from `first × rest × rest`.
///
/// Fails with [`Error::Allocation`] if the product does not fit in `usize`.
pub fn total_ids(first: &DigitGroup, rest: &DigitGroup) -> Result<usize> {
    first
        .len()
        .checked_mul(rest.len())
        .and_then(|n| n.checked_mul(rest.len()))
        .ok_or(Error::Allocation {
            requested: first.len() as u128 * rest.len() as u128 * rest.len() as u128,
        })
}

fn allocate(total: usize) -> Result<Vec<u32>> {
    let mut ids = Vec::new();
    ids.try_reserve_exact(total).map_err(|_| Error::Allocation {
        requested: total as u128,
    })?;
    Ok(ids)
}

/// Allocates the buffer and fills it with every composite of
/// `first × rest × rest`.
///
/// Writes happen at a strictly increasing index, with the trailing segment
/// varying fastest, so memory is touched front to back exactly once. `rest`
/// is iterated in both the middle and trailing roles.
///
/// # Errors
///
/// [`Error::Allocation`] if the buffer cannot be reserved. No fill work is
/// done in that case.
///
/// # Example
///
/// ```
/// use idshard::{DigitGroup, synthesize};
///
/// let group = DigitGroup::from_range(1..3);
/// let buffer = synthesize(&group, &group).unwrap();
/// assert_eq!(buffer.len(), 8);
/// assert_eq!(buffer.as_slice()[0], 1_001_001);
/// ```
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(level = "info", skip_all, fields(first = first.len(), rest = rest.len()))
)]
pub fn synthesize(first: &DigitGroup, rest: &DigitGroup) -> Result<IdBuffer> {
    let total = total_ids(first, rest)?;
    let mut ids = allocate(total)?;

    #[cfg(feature = "tracing")]
    tracing::info!(total, "allocated id buffer");

    for f in first.iter() {
        for s in rest.iter() {
            let prefix = f * FIRST_WEIGHT + s * MIDDLE_WEIGHT;
            ids.extend(rest.iter().map(|t| prefix + t));
        }
    }
    debug_assert_eq!(ids.len(), total);

    Ok(IdBuffer { ids })
}

/// Same result as [`synthesize`], filled by up to `threads` scoped threads.
///
/// The buffer is split into one contiguous block per leading value; each
/// thread takes a run of consecutive blocks and writes them front to back.
/// `threads <= 1` is the sequential fill.
#[cfg_attr(
    feature = "tracing",
    tracing::instrument(
        level = "info",
        skip_all,
        fields(first = first.len(), rest = rest.len(), threads = threads)
    )
)]
pub fn synthesize_parallel(
    first: &DigitGroup,
    rest: &DigitGroup,
    threads: usize,
) -> Result<IdBuffer> {
    let block = rest.len() * rest.len();
    if threads <= 1 || first.len() <= 1 || block == 0 {
        return synthesize(first, rest);
    }

    let total = total_ids(first, rest)?;
    let mut ids = allocate(total)?;
    ids.resize(total, 0);

    #[cfg(feature = "tracing")]
    tracing::info!(total, "allocated id buffer");

    let leading = first.as_slice();
    let per_thread = leading.len().div_ceil(threads);

    thread::scope(|scope| {
        for (out, firsts) in ids
            .chunks_mut(per_thread * block)
            .zip(leading.chunks(per_thread))
        {
            scope.spawn(move || {
                for (out, &f) in out.chunks_mut(block).zip(firsts) {
                    for (row, s) in out.chunks_mut(rest.len()).zip(rest.iter()) {
                        let prefix = f * FIRST_WEIGHT + s * MIDDLE_WEIGHT;
                        for (slot, t) in row.iter_mut().zip(rest.iter()) {
                            *slot = prefix + t;
                        }
                    }
                }
            });
        }
    });

    Ok(IdBuffer { ids })
}
