//! End-to-end integration tests.

use ndarray::s;
use rand::{rngs::StdRng, Rng, SeedableRng};
use spikecorr::{
    all_pairs, xcorr, Dimord, Method, OutputUnit, SpikeData, SpikeXcorr, TrialSelection,
};

/// Two channels, one trial [0, 1] s, channel 2 following channel 1 by 0.1 s
/// twice. With bin width 0.1 s and max lag 0.2 s the lag axis is
/// [-0.2, -0.1, 0, 0.1, 0.2].
fn delayed_pair_data() -> SpikeData {
    SpikeData {
        labels: vec!["unit1".into(), "unit2".into()],
        time: vec![vec![0.0, 0.5], vec![0.1, 0.6]],
        trial: vec![vec![0, 0], vec![0, 0]],
        trial_time: vec![[0.0, 1.0]],
    }
}

/// Seeded random dataset: `n_channels` channels, `n_trials` trials of [0, 1] s.
fn random_data(seed: u64, n_channels: usize, n_trials: usize) -> SpikeData {
    let mut rng = StdRng::seed_from_u64(seed);
    let mut time = Vec::with_capacity(n_channels);
    let mut trial = Vec::with_capacity(n_channels);
    for _ in 0..n_channels {
        let mut times = Vec::new();
        let mut trials = Vec::new();
        for t in 0..n_trials {
            let n_spikes = rng.gen_range(5..25);
            let mut spikes: Vec<f64> = (0..n_spikes).map(|_| rng.gen_range(0.0..1.0)).collect();
            spikes.sort_by(|a, b| a.total_cmp(b));
            trials.extend(std::iter::repeat(t).take(spikes.len()));
            times.extend(spikes);
        }
        time.push(times);
        trial.push(trials);
    }
    SpikeData {
        labels: (0..n_channels).map(|c| format!("unit{}", c + 1)).collect(),
        time,
        trial,
        trial_time: vec![[0.0, 1.0]; n_trials],
    }
}

#[test]
fn counts_land_in_the_expected_lag_bins() {
    let result = SpikeXcorr::new()
        .max_lag(0.2)
        .bin_width(0.1)
        .run(&delayed_pair_data(), &[(0, 1)])
        .unwrap();

    assert_eq!(result.lags.len(), 5);
    assert_eq!(result.zero_lag_index(), 2);

    // channel 2 follows channel 1 by +0.1 s twice, mirrored at -0.1 s
    let expected_01 = [0.0, 0.0, 0.0, 2.0, 0.0];
    let expected_10 = [0.0, 2.0, 0.0, 0.0, 0.0];
    for k in 0..5 {
        assert_eq!(result.xcorr[[0, 1, k]], expected_01[k], "bin {}", k);
        assert_eq!(result.xcorr[[1, 0, k]], expected_10[k], "bin {}", k);
    }
}

#[test]
fn trial_relative_timestamps_accumulate_across_trials() {
    // Both trials share the [0, 1] s time base, so trial 1's spikes come
    // earlier on the clock than trial 0's even though they sit later in the
    // lists. Each trial contributes one +0.1 s pairing.
    let data = SpikeData {
        labels: vec!["unit1".into(), "unit2".into()],
        time: vec![vec![0.8, 0.1], vec![0.9, 0.2]],
        trial: vec![vec![0, 1], vec![0, 1]],
        trial_time: vec![[0.0, 1.0], [0.0, 1.0]],
    };

    let result = SpikeXcorr::new()
        .max_lag(0.2)
        .bin_width(0.1)
        .run(&data, &[(0, 1)])
        .unwrap();

    assert_eq!(result.trials_used, vec![0, 1]);
    let expected_01 = [0.0, 0.0, 0.0, 2.0, 0.0];
    for k in 0..5 {
        assert_eq!(result.xcorr[[0, 1, k]], expected_01[k], "bin {}", k);
    }
}

#[test]
fn summed_tensor_is_mirror_symmetric() {
    let data = random_data(11, 3, 4);
    let result = SpikeXcorr::new()
        .max_lag(0.05)
        .bin_width(0.005)
        .run(&data, &all_pairs(3))
        .unwrap();

    let n_bins = result.n_bins();
    for a in 0..3 {
        for b in 0..3 {
            for k in 0..n_bins {
                assert_eq!(
                    result.xcorr[[a, b, k]],
                    result.xcorr[[b, a, n_bins - 1 - k]],
                    "asymmetry at ({}, {}, {})",
                    a,
                    b,
                    k
                );
            }
        }
    }
}

#[test]
fn raw_output_matches_manual_accumulation() {
    let data = random_data(5, 2, 3);
    let result = SpikeXcorr::new()
        .max_lag(0.05)
        .bin_width(0.01)
        .run(&data, &[(0, 1)])
        .unwrap();

    // Accumulate the kernel by hand over each trial's in-window spikes.
    let n_bins = result.n_bins();
    let mut expected = vec![0u64; n_bins];
    for t in 0..3 {
        let series_a: Vec<f64> = data.time[0]
            .iter()
            .zip(&data.trial[0])
            .filter(|&(_, &tr)| tr == t)
            .map(|(&s, _)| s)
            .collect();
        let series_b: Vec<f64> = data.time[1]
            .iter()
            .zip(&data.trial[1])
            .filter(|&(_, &tr)| tr == t)
            .map(|(&s, _)| s)
            .collect();
        let hist = spikecorr::statistics::lag_histogram(&series_a, &series_b, 0.01, n_bins);
        for (acc, c) in expected.iter_mut().zip(hist) {
            *acc += c;
        }
    }

    for (k, &c) in expected.iter().enumerate() {
        assert_eq!(result.xcorr[[0, 1, k]], c as f64);
    }
}

#[test]
fn proportion_slices_sum_to_one() {
    let data = random_data(7, 2, 3);
    let result = SpikeXcorr::new()
        .max_lag(0.05)
        .bin_width(0.005)
        .output_unit(OutputUnit::Proportion)
        .run(&data, &[(0, 1)])
        .unwrap();

    let total: f64 = result.pair_slice(0, 1).sum();
    assert!((total - 1.0).abs() < 1e-9, "slice sums to {}", total);
    let total: f64 = result.pair_slice(1, 0).sum();
    assert!((total - 1.0).abs() < 1e-9, "mirror slice sums to {}", total);
}

#[test]
fn center_normalization_pins_the_zero_lag_bin() {
    let data = random_data(13, 2, 4);
    let result = SpikeXcorr::new()
        .max_lag(0.05)
        .bin_width(0.005)
        .output_unit(OutputUnit::Center)
        .run(&data, &[(0, 1)])
        .unwrap();

    let center = result.zero_lag_index();
    assert!((result.xcorr[[0, 1, center]] - 1.0).abs() < 1e-12);
    assert!((result.xcorr[[1, 0, center]] - 1.0).abs() < 1e-12);
}

#[test]
fn per_trial_slices_add_up_to_the_sum() {
    let data = random_data(3, 2, 4);
    let result = SpikeXcorr::new()
        .max_lag(0.05)
        .bin_width(0.005)
        .keep_per_trial(true)
        .run(&data, &[(0, 1)])
        .unwrap();

    assert_eq!(result.dimord, Dimord::TrialChanChanLag);
    let trial = result.trial.as_ref().unwrap();
    assert_eq!(trial.shape()[0], 4);

    let n_bins = result.n_bins();
    for k in 0..n_bins {
        let stacked: f64 = trial.slice(s![.., 0, 1, k]).sum();
        assert_eq!(stacked, result.xcorr[[0, 1, k]], "bin {}", k);
    }
}

#[test]
fn repeated_runs_are_bit_identical() {
    let data = random_data(19, 3, 5);
    let analysis = SpikeXcorr::new()
        .max_lag(0.04)
        .bin_width(0.004)
        .keep_per_trial(true)
        .output_unit(OutputUnit::Proportion);

    let first = analysis.clone().run(&data, &all_pairs(3)).unwrap();
    let second = analysis.run(&data, &all_pairs(3)).unwrap();

    // Exact equality: same inputs, same configuration, no hidden state.
    // NaN-bearing slices are compared bitwise.
    let bits = |xs: &[f64]| xs.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
    assert_eq!(
        bits(first.xcorr.as_slice().unwrap()),
        bits(second.xcorr.as_slice().unwrap())
    );
    assert_eq!(
        bits(first.trial.as_ref().unwrap().as_slice().unwrap()),
        bits(second.trial.as_ref().unwrap().as_slice().unwrap())
    );
    assert_eq!(first.lags, second.lags);
}

#[test]
fn empty_pair_list_yields_a_zeroed_result() {
    let result = xcorr(&delayed_pair_data(), &[]).unwrap();
    assert!(result.channel_indices.is_empty());
    assert!(result.xcorr.iter().all(|&v| v == 0.0));
    assert_eq!(result.lags.len(), 201);
}

#[test]
fn empty_trial_selection_yields_a_zeroed_result() {
    let result = SpikeXcorr::new()
        .max_lag(0.2)
        .bin_width(0.1)
        .trials(TrialSelection::Explicit(vec![]))
        .run(&delayed_pair_data(), &[(0, 1)])
        .unwrap();
    assert!(result.trials_used.is_empty());
    assert!(result.xcorr.iter().all(|&v| v == 0.0));
}

#[test]
fn result_serializes_to_json_and_back() {
    let result = SpikeXcorr::new()
        .max_lag(0.2)
        .bin_width(0.1)
        .run(&delayed_pair_data(), &[(0, 1)])
        .unwrap();

    let json = spikecorr::output::json::to_json(&result).unwrap();
    assert!(json.contains("\"method\":\"xcorr\""));

    let back: spikecorr::XcorrResult = serde_json::from_str(&json).unwrap();
    assert_eq!(back, result);
}

#[test]
fn terminal_summary_names_the_channels() {
    let result = xcorr(&delayed_pair_data(), &[(0, 1)]).unwrap();
    let text = spikecorr::output::terminal::format_result(&result);
    assert!(text.contains("unit1"));
    assert!(text.contains("unit2"));
}

#[test]
fn convenience_function_uses_defaults() {
    let result = xcorr(&delayed_pair_data(), &[(0, 1)]).unwrap();
    assert_eq!(result.method, Method::Correlation);
    assert_eq!(result.output_unit, OutputUnit::Raw);
    assert_eq!(result.lags.len(), 201);
    assert!(result.trial.is_none());
}
