//! Cross-correlation driver: trial selection, per-trial accumulation,
//! shift-predictor offset logic, and final normalization.

use ndarray::{s, Array3, Array4};

use crate::config::{Config, Latency, Method, OutputUnit, TrialSelection};
use crate::error::ConfigError;
use crate::result::XcorrResult;
use crate::statistics::{lag_axis, lag_histogram, normalize_slices};
use crate::types::{Dimord, SpikeData};

/// Cross-correlation analysis of trial-based spike data.
///
/// Configure with the builder methods, then call [`run`](Self::run) with a
/// dataset and a resolved list of channel-pair indices.
///
/// # Example
///
/// ```
/// use spikecorr::{SpikeData, SpikeXcorr};
///
/// let data = SpikeData {
///     labels: vec!["ch1".into(), "ch2".into()],
///     time: vec![vec![0.0, 0.5], vec![0.1, 0.6]],
///     trial: vec![vec![0, 0], vec![0, 0]],
///     trial_time: vec![[0.0, 1.0]],
/// };
///
/// let result = SpikeXcorr::new()
///     .max_lag(0.2)
///     .bin_width(0.1)
///     .run(&data, &[(0, 1)])
///     .unwrap();
///
/// // channel 2 follows channel 1 by 0.1 s, twice
/// assert_eq!(result.xcorr[[0, 1, 3]], 2.0);
/// ```
#[derive(Debug, Clone, Default)]
pub struct SpikeXcorr {
    config: Config,
}

impl SpikeXcorr {
    /// Create with default configuration.
    pub fn new() -> Self {
        Self {
            config: Config::default(),
        }
    }

    /// Create from an existing configuration value.
    pub fn with_config(config: Config) -> Self {
        Self { config }
    }

    /// Set the maximum lag in seconds.
    pub fn max_lag(mut self, seconds: f64) -> Self {
        self.config.max_lag = seconds;
        self
    }

    /// Set the lag bin width in seconds.
    pub fn bin_width(mut self, seconds: f64) -> Self {
        self.config.bin_width = seconds;
        self
    }

    /// Set the correlation method.
    pub fn method(mut self, method: Method) -> Self {
        self.config.method = method;
        self
    }

    /// Set the output normalization.
    pub fn output_unit(mut self, unit: OutputUnit) -> Self {
        self.config.output_unit = unit;
        self
    }

    /// Keep the per-trial histogram tensor alongside the sum.
    pub fn keep_per_trial(mut self, keep: bool) -> Self {
        self.config.keep_per_trial = keep;
        self
    }

    /// Select the trials entering the analysis.
    pub fn trials(mut self, trials: TrialSelection) -> Self {
        self.config.trials = trials;
        self
    }

    /// Set the latency window specification.
    pub fn latency(mut self, latency: Latency) -> Self {
        self.config.latency = latency;
        self
    }

    /// Allow trials that do not cover the full latency window.
    pub fn variable_trial_length(mut self, allow: bool) -> Self {
        self.config.variable_trial_length = allow;
        self
    }

    /// Accepted for interface compatibility; currently has no effect on the
    /// output.
    pub fn biased(mut self, biased: bool) -> Self {
        self.config.biased = biased;
        self
    }

    /// Get the current configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the analysis over the dataset for the given channel pairs.
    ///
    /// Pairs may be given in either orientation; each is processed with the
    /// lower channel index first and the mirror slice filled by reversing the
    /// lag axis. An empty pair list or an empty trial selection produces a
    /// warning and a degenerate all-zero result; the shift-predictor
    /// eligibility conditions are hard errors.
    ///
    /// # Errors
    ///
    /// All configuration errors are detected before any histogram is
    /// computed; a failed run produces no partial tensors.
    pub fn run(
        &self,
        data: &SpikeData,
        pairs: &[(usize, usize)],
    ) -> Result<XcorrResult, ConfigError> {
        let config = &self.config;
        config.validate()?;
        data.check()?;

        let nchan = data.n_channels();
        for &(i, j) in pairs {
            for index in [i, j] {
                if index >= nchan {
                    return Err(ConfigError::ChannelOutOfRange {
                        index,
                        n_channels: nchan,
                    });
                }
            }
        }

        // Canonical orientation, duplicates collapsed.
        let mut canonical: Vec<(usize, usize)> = Vec::with_capacity(pairs.len());
        for &(i, j) in pairs {
            let pair = (i.min(j), i.max(j));
            if !canonical.contains(&pair) {
                canonical.push(pair);
            }
        }
        if canonical.is_empty() {
            eprintln!("[WARNING] no channel pairs requested; returning an empty result");
        }

        let n_bins = config.n_bins();
        let lags = lag_axis(config.max_lag, config.bin_width);
        debug_assert_eq!(lags.len(), n_bins);

        let selected = resolve_trials(&config.trials, data.n_trials())?;

        // The latency window is resolved once against the selected trials and
        // stays fixed through filtering and extraction.
        let mut window = (0.0, 0.0);
        let kept = if selected.is_empty() {
            Vec::new()
        } else {
            window = resolve_latency(config.latency, &data.trial_time, &selected);
            let (kept, coverage_shortfall) = filter_trials(
                &selected,
                &data.trial_time,
                window,
                config.max_lag,
                config.variable_trial_length,
            );
            if config.method == Method::ShiftPredictor
                && config.variable_trial_length
                && coverage_shortfall > 0
            {
                return Err(ConfigError::ShiftPredictorVariableLength {
                    dropped: coverage_shortfall,
                });
            }
            kept
        };

        if config.method == Method::ShiftPredictor && kept.len() < 2 {
            return Err(ConfigError::ShiftPredictorTooFewTrials(kept.len()));
        }

        let mut sum = Array3::<f64>::zeros((nchan, nchan, n_bins));
        let mut per_trial = config
            .keep_per_trial
            .then(|| Array4::<f64>::zeros((kept.len(), nchan, nchan, n_bins)));

        // Both orientations of every requested pair; these are the slices the
        // accumulation touches and normalization divides.
        let mut touched: Vec<(usize, usize)> = Vec::with_capacity(canonical.len() * 2);
        for &(lo, hi) in &canonical {
            touched.push((lo, hi));
            if lo != hi {
                touched.push((hi, lo));
            }
        }

        if kept.is_empty() {
            if canonical.is_empty() || selected.is_empty() {
                eprintln!("[WARNING] no trials selected; returning an empty result");
            } else {
                eprintln!(
                    "[WARNING] no trials survive the duration/latency filters; \
                     returning an empty result"
                );
            }
        } else {
            let channels_used = used_channels(&canonical);

            // The shift predictor pairs trial t with trial t-1, so the
            // previous trial's per-channel series is carried as loop state.
            let mut prev: Vec<Option<Vec<f64>>> = vec![None; nchan];
            for (t_pos, &trial_idx) in kept.iter().enumerate() {
                let mut curr: Vec<Option<Vec<f64>>> = vec![None; nchan];
                for &c in &channels_used {
                    curr[c] = Some(trial_series(data, c, trial_idx, window));
                }

                match config.method {
                    Method::Correlation => {
                        for &(lo, hi) in &canonical {
                            let hist = lag_histogram(
                                curr[lo].as_deref().unwrap_or(&[]),
                                curr[hi].as_deref().unwrap_or(&[]),
                                config.bin_width,
                                n_bins,
                            );
                            for (k, &c) in hist.iter().enumerate() {
                                let c = c as f64;
                                sum[[lo, hi, k]] += c;
                                if lo != hi {
                                    sum[[hi, lo, n_bins - 1 - k]] += c;
                                }
                                if let Some(trial) = per_trial.as_mut() {
                                    trial[[t_pos, lo, hi, k]] = c;
                                    if lo != hi {
                                        trial[[t_pos, hi, lo, n_bins - 1 - k]] = c;
                                    }
                                }
                            }
                        }
                    }
                    Method::ShiftPredictor => {
                        if t_pos == 0 {
                            // No preceding trial: the slice reads as missing.
                            if let Some(trial) = per_trial.as_mut() {
                                for &(a, b) in &touched {
                                    trial.slice_mut(s![0, a, b, ..]).fill(f64::NAN);
                                }
                            }
                        } else {
                            for &(lo, hi) in &canonical {
                                let h1 = lag_histogram(
                                    curr[lo].as_deref().unwrap_or(&[]),
                                    prev[hi].as_deref().unwrap_or(&[]),
                                    config.bin_width,
                                    n_bins,
                                );
                                let h2 = lag_histogram(
                                    prev[lo].as_deref().unwrap_or(&[]),
                                    curr[hi].as_deref().unwrap_or(&[]),
                                    config.bin_width,
                                    n_bins,
                                );
                                for k in 0..n_bins {
                                    let c = (h1[k] + h2[k]) as f64;
                                    sum[[lo, hi, k]] += c;
                                    if lo != hi {
                                        sum[[hi, lo, n_bins - 1 - k]] += c;
                                    }
                                    if let Some(trial) = per_trial.as_mut() {
                                        // Two symmetric trial-offset pairings
                                        // combine into one stored slice.
                                        trial[[t_pos, lo, hi, k]] = c / 2.0;
                                        if lo != hi {
                                            trial[[t_pos, hi, lo, n_bins - 1 - k]] = c / 2.0;
                                        }
                                    }
                                }
                            }
                        }
                    }
                }

                prev = curr;
            }

            if config.method == Method::ShiftPredictor {
                // Degrees-of-freedom correction: the doubled symmetric
                // accumulation ran over n-1 trial pairs instead of n trials.
                let n = kept.len() as f64;
                let factor = n / (2.0 * (n - 1.0));
                sum.mapv_inplace(|v| v * factor);
            }
        }

        normalize_slices(
            config.output_unit,
            &mut sum,
            per_trial.as_mut(),
            &touched,
        );

        let dimord = if per_trial.is_some() {
            Dimord::TrialChanChanLag
        } else {
            Dimord::ChanChanLag
        };

        Ok(XcorrResult {
            method: config.method,
            xcorr: sum,
            trial: per_trial,
            lags,
            labels: data.labels.clone(),
            channel_indices: used_channels(&canonical),
            trials_used: kept,
            output_unit: config.output_unit,
            dimord,
        })
    }
}

/// Resolve the trial selection to ordered dataset indices.
fn resolve_trials(
    selection: &TrialSelection,
    n_trials: usize,
) -> Result<Vec<usize>, ConfigError> {
    match selection {
        TrialSelection::All => Ok((0..n_trials).collect()),
        TrialSelection::Explicit(indices) => {
            let mut resolved = indices.clone();
            resolved.sort_unstable();
            if let Some(&index) = resolved.iter().find(|&&t| t >= n_trials) {
                return Err(ConfigError::TrialOutOfRange { index, n_trials });
            }
            Ok(resolved)
        }
    }
}

/// Resolve the latency specification against the selected trials' bounds.
fn resolve_latency(latency: Latency, bounds: &[[f64; 2]], selected: &[usize]) -> (f64, f64) {
    let starts = selected.iter().map(|&t| bounds[t][0]);
    let ends = selected.iter().map(|&t| bounds[t][1]);
    let min_start = starts.clone().fold(f64::INFINITY, f64::min);
    let max_start = starts.fold(f64::NEG_INFINITY, f64::max);
    let min_end = ends.clone().fold(f64::INFINITY, f64::min);
    let max_end = ends.fold(f64::NEG_INFINITY, f64::max);

    match latency {
        Latency::Window(start, end) => (start, end),
        Latency::MaxPeriod => (min_start, max_end),
        Latency::MinPeriod => (max_start, min_end),
        Latency::PreStimulus => (min_start, 0.0),
        Latency::PostStimulus => (0.0, max_end),
    }
}

/// Apply the duration, overlap, and coverage filters to the selected trials.
///
/// Returns the surviving trial indices plus the number of otherwise-eligible
/// trials that fail to cover the full latency window. In fixed-length mode
/// those trials are dropped; in variable-length mode they are kept, and the
/// count lets the shift predictor reject the combination.
fn filter_trials(
    selected: &[usize],
    bounds: &[[f64; 2]],
    window: (f64, f64),
    max_lag: f64,
    variable_trial_length: bool,
) -> (Vec<usize>, usize) {
    let (w_start, w_end) = window;
    let inner = (w_start + max_lag, w_end - max_lag);

    let mut kept = Vec::with_capacity(selected.len());
    let mut coverage_shortfall = 0usize;
    for &t in selected {
        let [start, end] = bounds[t];
        if end - start < max_lag {
            continue;
        }
        if start > inner.1 || end < inner.0 {
            continue;
        }
        let covers = start <= w_start && end >= w_end;
        if !covers {
            coverage_shortfall += 1;
            if !variable_trial_length {
                continue;
            }
        }
        kept.push(t);
    }
    (kept, coverage_shortfall)
}

/// Sorted unique channel indices appearing in the canonical pair list.
fn used_channels(canonical: &[(usize, usize)]) -> Vec<usize> {
    let mut channels: Vec<usize> = canonical
        .iter()
        .flat_map(|&(lo, hi)| [lo, hi])
        .collect();
    channels.sort_unstable();
    channels.dedup();
    channels
}

/// Spikes of one channel confined to one trial and the latency window.
fn trial_series(data: &SpikeData, chan: usize, trial_idx: usize, window: (f64, f64)) -> Vec<f64> {
    data.time[chan]
        .iter()
        .zip(&data.trial[chan])
        .filter(|&(&t, &tr)| tr == trial_idx && t >= window.0 && t <= window.1)
        .map(|(&t, _)| t)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_sets_every_option() {
        let analysis = SpikeXcorr::new()
            .max_lag(0.25)
            .bin_width(0.05)
            .method(Method::ShiftPredictor)
            .output_unit(OutputUnit::Proportion)
            .keep_per_trial(true)
            .variable_trial_length(true)
            .biased(true)
            .trials(TrialSelection::Explicit(vec![1, 3]))
            .latency(Latency::Window(-0.5, 1.5));

        let config = analysis.config();
        assert!((config.max_lag - 0.25).abs() < 1e-12);
        assert!((config.bin_width - 0.05).abs() < 1e-12);
        assert_eq!(config.method, Method::ShiftPredictor);
        assert_eq!(config.output_unit, OutputUnit::Proportion);
        assert!(config.keep_per_trial);
        assert!(config.variable_trial_length);
        assert!(config.biased);
        assert_eq!(config.trials, TrialSelection::Explicit(vec![1, 3]));
        assert_eq!(config.latency, Latency::Window(-0.5, 1.5));
    }

    #[test]
    fn resolve_trials_sorts_explicit_indices() {
        let resolved = resolve_trials(&TrialSelection::Explicit(vec![3, 0, 2]), 4).unwrap();
        assert_eq!(resolved, vec![0, 2, 3]);

        assert_eq!(
            resolve_trials(&TrialSelection::Explicit(vec![0, 5]), 4),
            Err(ConfigError::TrialOutOfRange {
                index: 5,
                n_trials: 4
            })
        );

        assert_eq!(resolve_trials(&TrialSelection::All, 3).unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn latency_modes_resolve_against_trial_bounds() {
        let bounds = [[-0.5, 1.0], [-0.2, 1.5], [-0.4, 0.8]];
        let selected = [0, 1, 2];

        assert_eq!(
            resolve_latency(Latency::MaxPeriod, &bounds, &selected),
            (-0.5, 1.5)
        );
        assert_eq!(
            resolve_latency(Latency::MinPeriod, &bounds, &selected),
            (-0.2, 0.8)
        );
        assert_eq!(
            resolve_latency(Latency::PreStimulus, &bounds, &selected),
            (-0.5, 0.0)
        );
        assert_eq!(
            resolve_latency(Latency::PostStimulus, &bounds, &selected),
            (0.0, 1.5)
        );
        assert_eq!(
            resolve_latency(Latency::Window(-0.1, 0.3), &bounds, &selected),
            (-0.1, 0.3)
        );
    }

    #[test]
    fn short_trials_are_dropped() {
        // trial 1 is shorter than max_lag
        let bounds = [[0.0, 1.0], [0.0, 0.05], [0.0, 1.0]];
        let (kept, _) = filter_trials(&[0, 1, 2], &bounds, (0.0, 1.0), 0.1, false);
        assert_eq!(kept, vec![0, 2]);
    }

    #[test]
    fn non_overlapping_trials_are_dropped() {
        // trial 1 lies entirely after the shrunken window [0.1, 0.9]
        let bounds = [[0.0, 1.0], [2.0, 3.0]];
        let (kept, _) = filter_trials(&[0, 1], &bounds, (0.0, 1.0), 0.1, false);
        assert_eq!(kept, vec![0]);
    }

    #[test]
    fn fixed_length_mode_requires_full_coverage() {
        // trial 1 overlaps but does not cover [0, 1]
        let bounds = [[0.0, 1.0], [0.2, 1.0]];
        let (kept, shortfall) = filter_trials(&[0, 1], &bounds, (0.0, 1.0), 0.1, false);
        assert_eq!(kept, vec![0]);
        assert_eq!(shortfall, 1);
    }

    #[test]
    fn variable_length_mode_keeps_partial_trials() {
        let bounds = [[0.0, 1.0], [0.2, 1.0]];
        let (kept, shortfall) = filter_trials(&[0, 1], &bounds, (0.0, 1.0), 0.1, true);
        assert_eq!(kept, vec![0, 1]);
        assert_eq!(shortfall, 1);
    }

    #[test]
    fn trial_series_respects_membership_and_window() {
        let data = SpikeData {
            labels: vec!["a".into()],
            time: vec![vec![0.1, 0.2, 0.4, 1.1]],
            trial: vec![vec![0, 1, 0, 0]],
            trial_time: vec![[0.0, 2.0], [0.0, 2.0]],
        };
        assert_eq!(trial_series(&data, 0, 0, (0.0, 1.0)), vec![0.1, 0.4]);
        assert_eq!(trial_series(&data, 0, 1, (0.0, 1.0)), vec![0.2]);
        assert!(trial_series(&data, 0, 0, (0.5, 0.9)).is_empty());
    }

    #[test]
    fn duplicate_and_swapped_pairs_collapse() {
        let data = SpikeData {
            labels: vec!["a".into(), "b".into()],
            time: vec![vec![0.0, 0.5], vec![0.1, 0.6]],
            trial: vec![vec![0, 0], vec![0, 0]],
            trial_time: vec![[0.0, 1.0]],
        };
        let once = SpikeXcorr::new()
            .max_lag(0.2)
            .bin_width(0.1)
            .run(&data, &[(0, 1)])
            .unwrap();
        let redundant = SpikeXcorr::new()
            .max_lag(0.2)
            .bin_width(0.1)
            .run(&data, &[(0, 1), (1, 0), (0, 1)])
            .unwrap();
        assert_eq!(once.xcorr, redundant.xcorr);
    }

    #[test]
    fn rejects_out_of_range_channel_pair() {
        let data = SpikeData {
            labels: vec!["a".into()],
            time: vec![vec![]],
            trial: vec![vec![]],
            trial_time: vec![[0.0, 1.0]],
        };
        let err = SpikeXcorr::new().run(&data, &[(0, 3)]).unwrap_err();
        assert_eq!(
            err,
            ConfigError::ChannelOutOfRange {
                index: 3,
                n_channels: 1
            }
        );
    }

    #[test]
    fn autocorrelation_pair_is_counted_once() {
        let data = SpikeData {
            labels: vec!["a".into()],
            time: vec![vec![0.1, 0.2]],
            trial: vec![vec![0, 0]],
            trial_time: vec![[0.0, 1.0]],
        };
        let result = SpikeXcorr::new()
            .max_lag(0.2)
            .bin_width(0.1)
            .run(&data, &[(0, 0)])
            .unwrap();
        // pairs: (0.1,0.1) and (0.2,0.2) at lag 0; (0.1,0.2) at +0.1 and
        // (0.2,0.1) at -0.1; nothing double-counted
        assert_eq!(result.xcorr[[0, 0, 2]], 2.0);
        assert_eq!(result.xcorr[[0, 0, 3]], 1.0);
        assert_eq!(result.xcorr[[0, 0, 1]], 1.0);
    }
}
