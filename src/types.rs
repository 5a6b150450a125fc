//! Shared input types for spike cross-correlation analysis.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Trial-based spike dataset, one timestamp list per channel.
///
/// The structure mirrors what the surrounding toolbox hands to an analysis
/// routine after parsing and validation: per-channel spike timestamps with a
/// parallel trial-membership list, per-trial time bounds, and an ordered
/// channel-label list. Timestamps are seconds relative to each trial's own
/// time axis, so trials overlap freely on the clock; within one trial a
/// channel's spikes are sorted ascending.
#[derive(Debug, Clone, PartialEq)]
pub struct SpikeData {
    /// Ordered channel labels; channel indices refer into this list.
    pub labels: Vec<String>,
    /// Per-channel spike timestamps in seconds, sorted ascending within each
    /// trial's subsequence.
    pub time: Vec<Vec<f64>>,
    /// Per-channel trial membership, parallel to `time`: `trial[c][s]` is the
    /// trial index of spike `time[c][s]`.
    pub trial: Vec<Vec<usize>>,
    /// Per-trial `[start, end]` time bounds in seconds.
    pub trial_time: Vec<[f64; 2]>,
}

impl SpikeData {
    /// Number of channels in the dataset.
    pub fn n_channels(&self) -> usize {
        self.labels.len()
    }

    /// Number of trials in the dataset.
    pub fn n_trials(&self) -> usize {
        self.trial_time.len()
    }

    /// Verify the structural invariants of the dataset.
    ///
    /// Checks that the per-channel arrays are parallel and equally many as the
    /// labels, that every trial-membership entry points at an existing trial,
    /// that each trial's timestamp subsequence is sorted ascending per
    /// channel, and that every trial interval satisfies `start <= end`.
    /// Timestamps are trial-relative, so no ordering is required across
    /// trials.
    pub fn check(&self) -> Result<(), ConfigError> {
        let nchan = self.labels.len();
        if self.time.len() != nchan || self.trial.len() != nchan {
            return Err(ConfigError::MalformedSpikeData(format!(
                "{} labels but {} timestamp lists and {} trial lists",
                nchan,
                self.time.len(),
                self.trial.len()
            )));
        }

        let ntrial = self.trial_time.len();
        for (c, (times, trials)) in self.time.iter().zip(self.trial.iter()).enumerate() {
            if times.len() != trials.len() {
                return Err(ConfigError::MalformedSpikeData(format!(
                    "channel {}: {} timestamps but {} trial entries",
                    c,
                    times.len(),
                    trials.len()
                )));
            }
            let mut last = vec![f64::NEG_INFINITY; ntrial];
            for (&t, &tr) in times.iter().zip(trials) {
                if tr >= ntrial {
                    return Err(ConfigError::MalformedSpikeData(format!(
                        "channel {}: trial index {} out of range ({} trials)",
                        c, tr, ntrial
                    )));
                }
                if t < last[tr] {
                    return Err(ConfigError::MalformedSpikeData(format!(
                        "channel {}: trial {} timestamps not sorted ascending",
                        c, tr
                    )));
                }
                last[tr] = t;
            }
        }

        for (t, bounds) in self.trial_time.iter().enumerate() {
            if !(bounds[0] <= bounds[1]) {
                return Err(ConfigError::MalformedSpikeData(format!(
                    "trial {}: start {} exceeds end {}",
                    t, bounds[0], bounds[1]
                )));
            }
        }

        Ok(())
    }
}

/// Expand the "all pairs" shorthand into explicit channel-pair indices.
///
/// Produces every unordered pair `(i, j)` with `i < j`. Autocorrelation pairs
/// `(i, i)` are not included; request them explicitly when needed.
pub fn all_pairs(n_channels: usize) -> Vec<(usize, usize)> {
    let mut pairs = Vec::with_capacity(n_channels.saturating_sub(1) * n_channels / 2);
    for i in 0..n_channels {
        for j in (i + 1)..n_channels {
            pairs.push((i, j));
        }
    }
    pairs
}

/// Dimension-order tag of the result tensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Dimord {
    /// Summed histogram only: `(channel, channel, lag)`.
    #[serde(rename = "chan_chan_lag")]
    ChanChanLag,
    /// Per-trial detail retained: `(trial, channel, channel, lag)`.
    #[serde(rename = "trial_chan_chan_lag")]
    TrialChanChanLag,
}
