//! Fixed-block downsampling of a [`Series`].
//!
//! Charts don't need every raw sample, so the history view averages
//! consecutive blocks of points into one. Blocks are cut in the order the
//! series arrives; the series is never re-sorted here. A range query that
//! returns newest first therefore produces newest-block-first output.
//!
//! Applying `downsample` again to its own output keeps shrinking the
//! series whenever `block_size > 1`; only `block_size == 1` is idempotent.

use crate::types::Series;

/// Block size used by the history view.
pub const DEFAULT_BLOCK_SIZE: usize = 4;

/// Reduce a series by averaging consecutive blocks of `block_size` points.
///
/// For each complete block the output holds the arithmetic mean of the
/// block's values, paired with the **last** timestamp in the block. A
/// trailing partial block is dropped, so the output length is always
/// `series.len() / block_size`. Values and times are cut at the same
/// indices, keeping output index `i` aligned in both sequences.
///
/// A `block_size` of zero yields an empty series.
///
/// # Precondition
///
/// `series.values` and `series.times` have equal length and are already in
/// the order the caller wants blocks formed in. Extra points in the longer
/// sequence, if any, are treated as part of a trailing partial block.
///
/// # Examples
///
/// ```
/// use envlog_types::{Series, downsample};
///
/// let series: Series = vec![(10.0, 1), (20.0, 2), (30.0, 3), (40.0, 4), (50.0, 5)]
///     .into_iter()
///     .collect();
///
/// let reduced = downsample(&series, 4);
/// assert_eq!(reduced.values, vec![25.0]);
/// assert_eq!(reduced.times, vec![4]);
/// ```
#[must_use]
pub fn downsample(series: &Series, block_size: usize) -> Series {
    if block_size == 0 {
        return Series::new();
    }

    let points = series.values.len().min(series.times.len());
    let mut out = Series::with_capacity(points / block_size);

    for (values, times) in series.values[..points]
        .chunks_exact(block_size)
        .zip(series.times[..points].chunks_exact(block_size))
    {
        let mean = values.iter().sum::<f64>() / block_size as f64;
        // chunks_exact never yields an empty slice
        let last = times[block_size - 1];
        out.push(mean, last);
    }

    out
}
