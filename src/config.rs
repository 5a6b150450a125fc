//! Configuration for cross-correlation analysis.
//!
//! `Config` is an immutable, fully-resolved value constructed once before the
//! computation runs. Builder methods live on [`crate::SpikeXcorr`].

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Configuration options for a spike cross-correlation run.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// Which trials enter the analysis (default: all).
    pub trials: TrialSelection,

    /// Latency window the spikes are restricted to (default: maximal period).
    pub latency: Latency,

    /// Keep the per-trial histogram tensor alongside the sum (default: false).
    pub keep_per_trial: bool,

    /// Correlation method (default: plain cross-correlation).
    pub method: Method,

    /// Allow trials that do not cover the full latency window (default: false,
    /// i.e. fixed-length mode drops such trials).
    pub variable_trial_length: bool,

    /// Accepted for interface compatibility; currently has no effect on the
    /// output. No debiasing scale factor is applied beyond the
    /// method-specific rescale.
    pub biased: bool,

    /// Maximum lag covered by the histogram, in seconds (default: 0.1).
    pub max_lag: f64,

    /// Lag bin width in seconds (default: 0.001).
    pub bin_width: f64,

    /// Normalization applied to the output tensors (default: raw counts).
    pub output_unit: OutputUnit,
}

/// Trial subset entering the analysis.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TrialSelection {
    /// Use every trial in the dataset.
    All,
    /// Use exactly these trial indices (duplicate-free; processed in
    /// ascending dataset order).
    Explicit(Vec<usize>),
}

/// Latency window specification.
///
/// The symbolic variants are resolved against the selected trials' time
/// bounds; `Window` is taken as-is.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Latency {
    /// Explicit `[start, end]` window in seconds.
    Window(f64, f64),
    /// `[min(starts), max(ends)]` over the selected trials.
    MaxPeriod,
    /// `[max(starts), min(ends)]` over the selected trials.
    MinPeriod,
    /// `[min(starts), 0]`: everything before stimulus onset.
    PreStimulus,
    /// `[0, max(ends)]`: everything after stimulus onset.
    PostStimulus,
}

/// Correlation method.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Method {
    /// Direct cross-correlation of each trial with itself.
    #[serde(rename = "xcorr")]
    Correlation,
    /// Shift-predictor control: each trial's spikes are correlated against
    /// the preceding trial's spikes, estimating the correlation expected from
    /// rate co-variation alone.
    #[serde(rename = "shiftpredictor")]
    ShiftPredictor,
}

/// Normalization of the output tensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputUnit {
    /// Raw accumulated counts.
    #[serde(rename = "raw")]
    Raw,
    /// Each `(a, b, :)` slice divided by its own sum across lags.
    #[serde(rename = "proportion")]
    Proportion,
    /// Each `(a, b, :)` slice divided by its own zero-lag value.
    #[serde(rename = "center")]
    Center,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            trials: TrialSelection::All,
            latency: Latency::MaxPeriod,
            keep_per_trial: false,
            method: Method::Correlation,
            variable_trial_length: false,
            biased: false,
            max_lag: 0.1,
            bin_width: 0.001,
            output_unit: OutputUnit::Raw,
        }
    }
}

impl Config {
    /// Half the lag-axis length: `L = round(max_lag / bin_width)`.
    ///
    /// The histogram has `2L + 1` bins, bin `L` centered on lag zero.
    pub fn half_bins(&self) -> usize {
        (self.max_lag / self.bin_width).round() as usize
    }

    /// Total number of lag bins, always odd.
    pub fn n_bins(&self) -> usize {
        2 * self.half_bins() + 1
    }

    /// Fail-fast validation of the numeric options.
    ///
    /// Trial and channel indices are validated against the dataset by the
    /// driver; everything here is checkable from the configuration alone.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.bin_width > 0.0) || !self.bin_width.is_finite() {
            return Err(ConfigError::NonPositiveBinWidth(self.bin_width));
        }
        if !(self.max_lag > 0.0) || !self.max_lag.is_finite() {
            return Err(ConfigError::NonPositiveMaxLag(self.max_lag));
        }
        if self.bin_width > self.max_lag {
            return Err(ConfigError::BinWidthExceedsMaxLag {
                bin_width: self.bin_width,
                max_lag: self.max_lag,
            });
        }
        if let Latency::Window(start, end) = self.latency {
            if !start.is_finite() || !end.is_finite() || start >= end {
                return Err(ConfigError::InvalidLatencyWindow { start, end });
            }
            if end - start < self.max_lag {
                return Err(ConfigError::LatencyWindowTooNarrow {
                    span: end - start,
                    max_lag: self.max_lag,
                });
            }
        }
        if let TrialSelection::Explicit(ref indices) = self.trials {
            let mut sorted = indices.clone();
            sorted.sort_unstable();
            if let Some(w) = sorted.windows(2).find(|w| w[0] == w[1]) {
                return Err(ConfigError::DuplicateTrial(w[0]));
            }
        }
        Ok(())
    }
}
