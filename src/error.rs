//! Error types for configuration and selection failures.
//!
//! All configuration problems are detected before the trial loop runs, so a
//! failed `run` never leaves partially filled tensors behind.

use std::fmt;

/// Error type for invalid or mutually incompatible analysis options.
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigError {
    /// `bin_width` must be a positive, finite number of seconds.
    NonPositiveBinWidth(f64),
    /// `max_lag` must be a positive, finite number of seconds.
    NonPositiveMaxLag(f64),
    /// `bin_width` may not exceed `max_lag` (the lag axis would be empty).
    BinWidthExceedsMaxLag {
        /// Configured bin width in seconds.
        bin_width: f64,
        /// Configured maximum lag in seconds.
        max_lag: f64,
    },
    /// An explicit latency window must be finite with `start < end`.
    InvalidLatencyWindow {
        /// Window start in seconds.
        start: f64,
        /// Window end in seconds.
        end: f64,
    },
    /// An explicit latency window must span at least `max_lag`; a narrower
    /// window cannot contain any spike pair at the extreme lags.
    LatencyWindowTooNarrow {
        /// Window span `end - start` in seconds.
        span: f64,
        /// Configured maximum lag in seconds.
        max_lag: f64,
    },
    /// An explicitly selected trial index does not exist in the dataset.
    TrialOutOfRange {
        /// Offending trial index.
        index: usize,
        /// Number of trials in the dataset.
        n_trials: usize,
    },
    /// The same trial index was selected more than once.
    DuplicateTrial(usize),
    /// A requested channel-pair index does not exist in the dataset.
    ChannelOutOfRange {
        /// Offending channel index.
        index: usize,
        /// Number of channels in the dataset.
        n_channels: usize,
    },
    /// The shift predictor pairs each trial with its predecessor and needs at
    /// least two eligible trials.
    ShiftPredictorTooFewTrials(usize),
    /// Shift predictor with variable trial lengths requires every eligible
    /// trial to cover the full latency window; rate non-stationarity would
    /// otherwise bias the control.
    ShiftPredictorVariableLength {
        /// Number of trials that fail to cover the full window.
        dropped: usize,
    },
    /// The spike dataset violates its structural invariants.
    MalformedSpikeData(String),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::NonPositiveBinWidth(v) => {
                write!(f, "bin_width must be positive and finite, got {} s", v)
            }
            ConfigError::NonPositiveMaxLag(v) => {
                write!(f, "max_lag must be positive and finite, got {} s", v)
            }
            ConfigError::BinWidthExceedsMaxLag { bin_width, max_lag } => write!(
                f,
                "bin_width ({} s) may not exceed max_lag ({} s)",
                bin_width, max_lag
            ),
            ConfigError::InvalidLatencyWindow { start, end } => write!(
                f,
                "latency window must be finite with start < end, got [{}, {}]",
                start, end
            ),
            ConfigError::LatencyWindowTooNarrow { span, max_lag } => write!(
                f,
                "latency window spans {} s but must cover at least max_lag ({} s)",
                span, max_lag
            ),
            ConfigError::TrialOutOfRange { index, n_trials } => write!(
                f,
                "trial index {} out of range (dataset has {} trials)",
                index, n_trials
            ),
            ConfigError::DuplicateTrial(index) => {
                write!(f, "trial index {} selected more than once", index)
            }
            ConfigError::ChannelOutOfRange { index, n_channels } => write!(
                f,
                "channel index {} out of range (dataset has {} channels)",
                index, n_channels
            ),
            ConfigError::ShiftPredictorTooFewTrials(n) => write!(
                f,
                "shift predictor needs at least 2 eligible trials, got {}",
                n
            ),
            ConfigError::ShiftPredictorVariableLength { dropped } => write!(
                f,
                "shift predictor with variable trial lengths requires full \
                 latency-window coverage; {} trial(s) fall short",
                dropped
            ),
            ConfigError::MalformedSpikeData(msg) => {
                write!(f, "malformed spike data: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}
