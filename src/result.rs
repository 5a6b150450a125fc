//! Result structure of a cross-correlation run.

use ndarray::{s, Array3, Array4, ArrayView1};
use serde::{Deserialize, Serialize};

use crate::config::{Method, OutputUnit};
use crate::types::Dimord;

/// Complete statistic produced by a cross-correlation run.
///
/// Tensors are indexed by channel positions in [`labels`](Self::labels); only
/// the slices belonging to requested channel pairs carry data, the rest stay
/// zero. The summed tensor is point-symmetric: `xcorr[a, b, k]` equals
/// `xcorr[b, a, n_bins - 1 - k]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct XcorrResult {
    /// Method that produced the tensor (plain correlation or shift predictor).
    pub method: Method,

    /// Summed histogram, shape `(n_channels, n_channels, 2L + 1)`; raw counts
    /// or normalized values depending on `output_unit`.
    pub xcorr: Array3<f64>,

    /// Per-trial histograms, shape `(n_trials_used, n_channels, n_channels,
    /// 2L + 1)`, present when per-trial detail was requested. For the shift
    /// predictor the first trial slice is NaN (no preceding trial) and later
    /// slices hold half of each symmetric trial-offset contribution.
    pub trial: Option<Array4<f64>>,

    /// Lag axis in seconds, length `2L + 1`, symmetric around zero.
    pub lags: Vec<f64>,

    /// Channel labels; tensor axes 0 and 1 are indexed against this list.
    pub labels: Vec<String>,

    /// Sorted indices of the channels used by any requested pair.
    pub channel_indices: Vec<usize>,

    /// Original dataset indices of the trials that entered the accumulation,
    /// in processing order.
    pub trials_used: Vec<usize>,

    /// Normalization the tensors carry.
    pub output_unit: OutputUnit,

    /// Dimension-order tag: whether per-trial detail is present.
    pub dimord: Dimord,
}

impl XcorrResult {
    /// Number of lag bins (always odd).
    pub fn n_bins(&self) -> usize {
        self.lags.len()
    }

    /// Index of the zero-lag bin.
    pub fn zero_lag_index(&self) -> usize {
        self.lags.len() / 2
    }

    /// Lag vector of the summed tensor for channel pair `(a, b)`.
    pub fn pair_slice(&self, a: usize, b: usize) -> ArrayView1<'_, f64> {
        self.xcorr.slice(s![a, b, ..])
    }

    /// Lag and value of the maximum bin for channel pair `(a, b)`, ignoring
    /// NaN entries. `None` when every bin is NaN or the axis is empty.
    pub fn peak_lag(&self, a: usize, b: usize) -> Option<(f64, f64)> {
        let slice = self.pair_slice(a, b);
        let (mut best, mut best_val) = (None, f64::NEG_INFINITY);
        for (k, &v) in slice.iter().enumerate() {
            if v.is_nan() {
                continue;
            }
            if v > best_val {
                best_val = v;
                best = Some(k);
            }
        }
        best.map(|k| (self.lags[k], best_val))
    }
}
