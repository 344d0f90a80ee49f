//! Equal-width histogram used to weight candidates by population.

/// Number of bins used for similarity re-weighting.
pub const DEFAULT_BINS: usize = 10;

/// Equal-width histogram over the range of its input.
///
/// Binning follows the usual convention: bins are half-open `[a, b)` except
/// the last, which includes the maximum. A constant input is widened to
/// `[v - 0.5, v + 0.5]`.
#[derive(Clone, Debug, PartialEq)]
pub struct Histogram {
    edges: Vec<f64>,
    counts: Vec<usize>,
    total: usize,
}

impl Histogram {
    /// Build a histogram of `values` with `bins` bins.
    ///
    /// `values` must be finite and `bins` non-zero.
    pub fn new(values: &[f64], bins: usize) -> Self {
        debug_assert!(bins > 0, "histogram needs at least one bin");

        let (mut lo, mut hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        if values.is_empty() {
            lo = 0.0;
            hi = 1.0;
        } else if lo == hi {
            lo -= 0.5;
            hi += 0.5;
        }

        let step = (hi - lo) / bins as f64;
        let mut edges: Vec<f64> = (0..=bins).map(|i| lo + i as f64 * step).collect();
        edges[bins] = hi;

        let mut counts = vec![0; bins];
        let norm = bins as f64 / (hi - lo);
        for &v in values {
            let mut index = (((v - lo) * norm) as usize).min(bins - 1);
            // Floating point can put a value one bin off its edges.
            if v < edges[index] && index > 0 {
                index -= 1;
            } else if v >= edges[index + 1] && index != bins - 1 {
                index += 1;
            }
            counts[index] += 1;
        }

        Self {
            edges,
            counts,
            total: values.len(),
        }
    }

    /// Bin edges, one more than the number of bins.
    pub fn edges(&self) -> &[f64] {
        &self.edges
    }

    /// Raw counts per bin.
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Counts divided by the number of values; sums to one.
    pub fn frequencies(&self) -> Vec<f64> {
        if self.total == 0 {
            return vec![0.0; self.counts.len()];
        }
        let total = self.total as f64;
        self.counts.iter().map(|&c| c as f64 / total).collect()
    }

    /// Midpoint of each bin.
    pub fn centers(&self) -> Vec<f64> {
        self.edges.windows(2).map(|w| (w[0] + w[1]) / 2.0).collect()
    }

    /// Bin whose center is closest to `value`; the first bin wins ties.
    pub fn nearest_bin(&self, value: f64) -> usize {
        let mut best = 0;
        let mut best_distance = f64::INFINITY;
        for (i, center) in self.centers().into_iter().enumerate() {
            let distance = (value - center).abs();
            if distance < best_distance {
                best = i;
                best_distance = distance;
            }
        }
        best
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_edges_and_counts() {
        let h = Histogram::new(&[0.0, 1.0, 2.5, 10.0], 10);
        assert_eq!(h.edges().len(), 11);
        assert_eq!(h.edges()[0], 0.0);
        assert_eq!(h.edges()[10], 10.0);
        assert_eq!(h.counts(), &[1, 1, 1, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_maximum_lands_in_last_bin() {
        let h = Histogram::new(&[1.0, 5.0], 10);
        assert_eq!(h.counts()[9], 1);
        assert_eq!(h.counts().iter().sum::<usize>(), 2);
    }

    #[test]
    fn test_value_below_computed_edge_moves_down() {
        // The third edge of [0, 1] is 3 * 0.1 = 0.30000000000000004, so 0.3
        // belongs to bin 2 even though 0.3 * 10 rounds to 3.
        let h = Histogram::new(&[0.0, 0.3, 1.0], 10);
        assert_eq!(h.counts(), &[1, 0, 1, 0, 0, 0, 0, 0, 0, 1]);
    }

    #[test]
    fn test_constant_input_is_widened() {
        let h = Histogram::new(&[2.0, 2.0, 2.0], 10);
        assert_eq!(h.edges()[0], 1.5);
        assert_eq!(h.edges()[10], 2.5);
        // 2.0 is the edge between bins 4 and 5.
        assert_eq!(h.counts()[5], 3);
    }

    #[test]
    fn test_frequencies_sum_to_one() {
        let h = Histogram::new(&[0.1, 0.2, 0.2, 0.9, 0.5], 10);
        let total: f64 = h.frequencies().iter().sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_nearest_bin_prefers_first_on_tie() {
        let h = Histogram::new(&[0.0, 10.0], 10);
        // Centers are 0.5, 1.5, ... ; 3.0 is equidistant from 2.5 and 3.5.
        assert_eq!(h.nearest_bin(3.0), 2);
        assert_eq!(h.nearest_bin(-4.0), 0);
        assert_eq!(h.nearest_bin(9.9), 9);
    }
}
