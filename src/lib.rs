//! # spikecorr
//!
//! Cross-correlation histograms for trial-based spike data.
//!
//! Given per-channel spike timestamps recorded across experimental trials,
//! this crate computes the symmetric cross-correlation histogram between
//! pairs of channels over a fixed lag range, and optionally the
//! trial-shuffled "shift predictor" control that estimates how much of the
//! correlation is explained by firing-rate co-variation alone.
//!
//! ## Quick start
//!
//! ```
//! use spikecorr::{xcorr, SpikeData};
//!
//! let data = SpikeData {
//!     labels: vec!["unit1".into(), "unit2".into()],
//!     time: vec![vec![0.0, 0.5], vec![0.1, 0.6]],
//!     trial: vec![vec![0, 0], vec![0, 0]],
//!     trial_time: vec![[0.0, 1.0]],
//! };
//!
//! let result = xcorr(&data, &[(0, 1)]).unwrap();
//! assert_eq!(result.lags.len(), 201); // default: ±0.1 s in 1 ms bins
//! ```
//!
//! Non-default runs go through the [`SpikeXcorr`] builder:
//!
//! ```
//! use spikecorr::{Method, OutputUnit, SpikeXcorr};
//! # use spikecorr::SpikeData;
//! # let data = SpikeData {
//! #     labels: vec!["a".into(), "b".into()],
//! #     time: vec![vec![0.1, 0.3], vec![0.2, 0.6]],
//! #     trial: vec![vec![0, 0], vec![0, 1]],
//! #     trial_time: vec![[0.0, 1.0], [0.0, 1.0]],
//! # };
//!
//! let result = SpikeXcorr::new()
//!     .max_lag(0.05)
//!     .bin_width(0.005)
//!     .method(Method::ShiftPredictor)
//!     .output_unit(OutputUnit::Proportion)
//!     .keep_per_trial(true)
//!     .run(&data, &[(0, 1)])
//!     .unwrap();
//! assert!(result.trial.is_some());
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// Core modules
mod analysis;
mod config;
mod error;
mod result;
mod types;

// Functional modules
pub mod output;
pub mod statistics;

// Re-exports for public API
pub use analysis::SpikeXcorr;
pub use config::{Config, Latency, Method, OutputUnit, TrialSelection};
pub use error::ConfigError;
pub use result::XcorrResult;
pub use types::{all_pairs, Dimord, SpikeData};

/// Convenience function running a default-configured cross-correlation.
///
/// Equivalent to `SpikeXcorr::new().run(data, pairs)`: raw counts, all
/// trials, the maximal latency period, ±0.1 s lag range in 1 ms bins.
///
/// # Errors
///
/// Returns a [`ConfigError`] for malformed data or out-of-range channel
/// pairs; see [`SpikeXcorr::run`].
pub fn xcorr(data: &SpikeData, pairs: &[(usize, usize)]) -> Result<XcorrResult, ConfigError> {
    SpikeXcorr::new().run(data, pairs)
}
