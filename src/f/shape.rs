use std::ops::Range;

use ndarray::Array1;

pub fn onehot(i: usize, size: usize) -> Array1<f64> {
    let mut oh = Array1::zeros(size);
    if i < size {
        oh[i] = 1.;
    }
    oh
}

/// Contiguous batch ranges covering `0..n`. Every batch holds `batch_size`
/// items except possibly the last, which is shorter but never empty.
pub fn batches(n: usize, batch_size: usize) -> Vec<Range<usize>> {
    if batch_size == 0 {
        return vec![];
    }

    (0..n.div_ceil(batch_size))
        .map(|i| {
            let start = i * batch_size;
            start..(start + batch_size).min(n)
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nine_items_in_batches_of_four() {
        let b = batches(9, 4);
        let sizes = b.iter().map(|r| r.len()).collect::<Vec<_>>();

        assert_eq!(b.len(), 3);
        assert_eq!(sizes, vec![4, 4, 1]);
        assert_eq!(b[2], 8..9);
    }

    #[test]
    fn exact_multiple_has_no_short_batch() {
        assert_eq!(batches(8, 4), vec![0..4, 4..8]);
    }

    #[test]
    fn empty_split_has_no_batches() {
        assert!(batches(0, 40).is_empty());
    }

    #[test]
    fn onehot_ignores_out_of_range() {
        assert_eq!(onehot(2, 3).to_vec(), vec![0., 0., 1.]);
        assert_eq!(onehot(5, 3).sum(), 0.);
    }
}
