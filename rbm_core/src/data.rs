//! Batching and synthetic datasets.
//!
//! Datasets use the same layout as the engine: one column per sample, one
//! row per feature, values in [0, 1].

use ndarray::{s, Array2, ArrayView2};
use rand::Rng;

/// Splits `data` into contiguous column blocks of `batch_size`.
///
/// The last block holds the remainder and may be narrower. Order is the
/// column order of `data`; nothing is shuffled.
///
/// # Panics
///
/// Panics if `batch_size` is zero.
pub fn column_batches<'a>(
    data: ArrayView2<'a, f64>,
    batch_size: usize,
) -> impl Iterator<Item = ArrayView2<'a, f64>> {
    let columns = data.ncols();
    (0..columns).step_by(batch_size).map(move |start| {
        let end = (start + batch_size).min(columns);
        data.slice_move(s![.., start..end])
    })
}

/// Number of batches [`column_batches`] yields.
pub fn batch_count(columns: usize, batch_size: usize) -> usize {
    columns.div_ceil(batch_size)
}

/// Every bars-and-stripes pattern on a `side × side` grid.
///
/// A pattern either fills a subset of the grid's columns (bars) or a subset
/// of its rows (stripes). Pixel `(r, c)` is feature `r * side + c`. The empty
/// and the full grid appear once, giving `2^(side+1) − 2` columns.
///
/// # Examples
///
/// ```
/// use rbm_core::data::bars_and_stripes;
///
/// let patterns = bars_and_stripes(3);
/// assert_eq!(patterns.dim(), (9, 14));
/// ```
pub fn bars_and_stripes(side: usize) -> Array2<f64> {
    let subsets = 1usize << side;
    let mut patterns: Vec<Vec<f64>> = Vec::with_capacity(2 * subsets);

    for mask in 0..subsets {
        let bars = (0..side * side)
            .map(|pixel| bit(mask, pixel % side))
            .collect();
        patterns.push(bars);
    }
    // Skip the empty and the full mask, already emitted as bars
    for mask in 1..subsets.saturating_sub(1) {
        let stripes = (0..side * side)
            .map(|pixel| bit(mask, pixel / side))
            .collect();
        patterns.push(stripes);
    }

    let n_patterns = if side == 0 { 0 } else { patterns.len() };
    Array2::from_shape_fn((side * side, n_patterns), |(feature, column)| {
        patterns[column][feature]
    })
}

fn bit(mask: usize, position: usize) -> f64 {
    if (mask >> position) & 1 == 1 {
        1.0
    } else {
        0.0
    }
}

/// `copies` noisy replicas of every prototype column.
///
/// Each value is replaced by `1 − x` with probability `flip_prob`. Replicas
/// of the same prototype are adjacent in the output.
pub fn noisy_copies<R: Rng + ?Sized>(
    prototypes: ArrayView2<'_, f64>,
    copies: usize,
    flip_prob: f64,
    rng: &mut R,
) -> Array2<f64> {
    let (features, n_prototypes) = prototypes.dim();
    let mut out = Array2::zeros((features, n_prototypes * copies));

    for (index, mut column) in out.columns_mut().into_iter().enumerate() {
        let source = prototypes.column(index / copies);
        for (target, &value) in column.iter_mut().zip(source.iter()) {
            *target = if rng.gen::<f64>() < flip_prob {
                1.0 - value
            } else {
                value
            };
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_column_batches_keep_order_and_remainder() {
        let data = Array2::from_shape_fn((2, 7), |(r, c)| (r * 10 + c) as f64);
        let batches: Vec<_> = column_batches(data.view(), 3).collect();

        assert_eq!(batches.len(), 3);
        assert_eq!(batch_count(7, 3), 3);
        assert_eq!(batches[0].dim(), (2, 3));
        assert_eq!(batches[2].dim(), (2, 1));
        assert_eq!(batches[1][[1, 0]], 13.0);
        assert_eq!(batches[2][[0, 0]], 6.0);
    }

    #[test]
    fn test_column_batches_outlive_the_view_argument() {
        let data = Array2::from_shape_fn((3, 5), |(r, c)| (r * 5 + c) as f64);
        let batches: Vec<ArrayView2<'_, f64>> = {
            let view = data.view();
            column_batches(view, 2).collect()
        };

        assert_eq!(batches.iter().map(|b| b.ncols()).collect::<Vec<_>>(), vec![2, 2, 1]);
        assert_eq!(batches[1].column(0).to_vec(), vec![2.0, 7.0, 12.0]);
        assert_eq!(batches[2].column(0), data.column(4));
    }

    #[test]
    #[should_panic]
    fn test_column_batches_reject_zero_batch_size() {
        let data = Array2::<f64>::zeros((2, 3));
        let _ = column_batches(data.view(), 0);
    }

    #[test]
    fn test_column_batches_of_empty_data() {
        let data = Array2::<f64>::zeros((4, 0));
        assert_eq!(column_batches(data.view(), 3).count(), 0);
        assert_eq!(batch_count(0, 3), 0);
    }

    #[test]
    fn test_bars_and_stripes_counts() {
        assert_eq!(bars_and_stripes(2).dim(), (4, 6));
        assert_eq!(bars_and_stripes(4).dim(), (16, 30));
    }

    #[test]
    fn test_bars_and_stripes_patterns_are_distinct() {
        let patterns = bars_and_stripes(3);
        let columns: Vec<Vec<f64>> = patterns
            .columns()
            .into_iter()
            .map(|c| c.to_vec())
            .collect();
        for i in 0..columns.len() {
            for j in i + 1..columns.len() {
                assert_ne!(columns[i], columns[j]);
            }
        }
        assert!(patterns.iter().all(|&v| v == 0.0 || v == 1.0));
    }

    #[test]
    fn test_bars_fill_whole_grid_columns() {
        let patterns = bars_and_stripes(2);
        // mask 0b01 lights grid column 0: pixels 0 and 2
        assert_eq!(patterns.column(1).to_vec(), vec![1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_noisy_copies_layout() {
        let prototypes = array![[1.0, 0.0], [0.0, 1.0], [1.0, 1.0]];
        let mut rng = StdRng::seed_from_u64(4);

        let exact = noisy_copies(prototypes.view(), 3, 0.0, &mut rng);
        assert_eq!(exact.dim(), (3, 6));
        assert_eq!(exact.column(2), prototypes.column(0));
        assert_eq!(exact.column(3), prototypes.column(1));

        let inverted = noisy_copies(prototypes.view(), 1, 1.0, &mut rng);
        assert_eq!(inverted, prototypes.mapv(|v| 1.0 - v));
    }
}
