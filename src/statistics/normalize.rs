//! Per-slice normalization of the accumulated histogram tensors.
//!
//! Normalization operates slice-by-slice: each `(a, b, :)` lag vector of the
//! summed tensor gets its own divisor, and the same divisor applies to that
//! pair's per-trial slices. A zero divisor yields NaN for the whole slice
//! rather than being special-cased away.

use ndarray::{s, Array3, Array4};

use crate::config::OutputUnit;

/// Normalize the listed `(a, b)` slices of the summed tensor in place,
/// propagating each slice's divisor to the per-trial tensor when present.
///
/// - `Raw`: no change.
/// - `Proportion`: divide each slice by its own sum across lags, so it sums
///   to 1.
/// - `Center`: divide each slice by its own zero-lag value, so the center bin
///   becomes 1.
///
/// Slices not listed in `slices` are left untouched; the divisor for a slice
/// with no events is zero and the slice (and its per-trial counterparts)
/// becomes NaN.
pub fn normalize_slices(
    unit: OutputUnit,
    sum: &mut Array3<f64>,
    mut per_trial: Option<&mut Array4<f64>>,
    slices: &[(usize, usize)],
) {
    if unit == OutputUnit::Raw {
        return;
    }

    let center = sum.shape()[2] / 2;
    for &(a, b) in slices {
        let divisor = match unit {
            OutputUnit::Raw => unreachable!(),
            OutputUnit::Proportion => sum.slice(s![a, b, ..]).sum(),
            OutputUnit::Center => sum[[a, b, center]],
        };

        if divisor == 0.0 {
            sum.slice_mut(s![a, b, ..]).fill(f64::NAN);
        } else {
            sum.slice_mut(s![a, b, ..]).mapv_inplace(|v| v / divisor);
        }

        if let Some(trial) = per_trial.as_deref_mut() {
            if divisor == 0.0 {
                trial.slice_mut(s![.., a, b, ..]).fill(f64::NAN);
            } else {
                trial
                    .slice_mut(s![.., a, b, ..])
                    .mapv_inplace(|v| v / divisor);
            }
        }
    }
}
