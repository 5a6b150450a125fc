//! Lag-binned histogram of timestamp pairs.
//!
//! The kernel counts, for every ordered pair of timestamps drawn from two
//! sorted sequences, how many pairs fall into each lag bin of a symmetric
//! axis centered on lag zero. It is invoked once per trial per channel pair
//! and is the performance-sensitive primitive of the analysis.

/// Compute the symmetric cross-correlation count vector of two spike-time
/// sequences.
///
/// `n_bins` must be odd (`2L + 1`); bin `k` is centered on lag
/// `(k - L) * bin_width`, where a lag is the second timestamp minus the
/// first. A pair is assigned to the nearest bin center,
/// `bin = L + round(lag / bin_width)`, which keeps the assignment
/// deterministic on bin boundaries and exactly antisymmetric under argument
/// swap (half-bin lags round away from zero on both sides).
///
/// Both inputs must be sorted ascending. Sortedness is exploited: for each
/// timestamp in `series_a`, only the `series_b` window within
/// `±(max_lag + bin_width/2)` is scanned, so the cost is near
/// `O(|A| + |B| + matches)` instead of `O(|A| × |B|)`.
///
/// Returns an all-zero vector when either sequence is empty. Pure and
/// deterministic; no shared state.
///
/// # Panics
///
/// Panics if `n_bins` is even or zero, or if `bin_width` is not positive.
pub fn lag_histogram(series_a: &[f64], series_b: &[f64], bin_width: f64, n_bins: usize) -> Vec<u64> {
    assert!(n_bins % 2 == 1, "n_bins must be odd, got {}", n_bins);
    assert!(bin_width > 0.0, "bin_width must be positive, got {}", bin_width);

    let mut counts = vec![0u64; n_bins];
    if series_a.is_empty() || series_b.is_empty() {
        return counts;
    }

    let half_bins = (n_bins / 2) as i64;
    // Pairs beyond max_lag + bin_width/2 round outside the axis.
    let reach = half_bins as f64 * bin_width + bin_width / 2.0;

    let mut window_start = 0usize;
    for &t_a in series_a {
        while window_start < series_b.len() && series_b[window_start] < t_a - reach {
            window_start += 1;
        }
        for &t_b in &series_b[window_start..] {
            if t_b > t_a + reach {
                break;
            }
            let bin = half_bins + ((t_b - t_a) / bin_width).round() as i64;
            if (0..n_bins as i64).contains(&bin) {
                counts[bin as usize] += 1;
            }
        }
    }

    counts
}

/// Compute the lag axis matching [`lag_histogram`]'s bins.
///
/// Returns `2L + 1` offsets in seconds, symmetric around zero and spaced by
/// `bin_width`, with `L = round(max_lag / bin_width)`.
pub fn lag_axis(max_lag: f64, bin_width: f64) -> Vec<f64> {
    let half_bins = (max_lag / bin_width).round() as i64;
    (-half_bins..=half_bins)
        .map(|k| k as f64 * bin_width)
        .collect()
}
