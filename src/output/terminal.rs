//! Terminal output formatting with colors.

use colored::Colorize;

use crate::config::{Method, OutputUnit};
use crate::result::XcorrResult;

/// Format an `XcorrResult` for human-readable terminal output.
///
/// Prints the run parameters followed by one line per requested channel pair
/// with the lag of its maximum bin.
pub fn format_result(result: &XcorrResult) -> String {
    let mut output = String::new();
    let sep = "\u{2500}".repeat(62);

    output.push_str("spikecorr\n");
    output.push_str(&sep);
    output.push('\n');
    output.push('\n');

    let method = match result.method {
        Method::Correlation => "cross-correlation",
        Method::ShiftPredictor => "shift predictor",
    };
    let unit = match result.output_unit {
        OutputUnit::Raw => "raw counts",
        OutputUnit::Proportion => "proportion",
        OutputUnit::Center => "center-scaled",
    };

    output.push_str(&format!("  Method:   {}\n", method.bold()));
    output.push_str(&format!("  Output:   {}\n", unit));
    output.push_str(&format!(
        "  Channels: {} of {}\n",
        result.channel_indices.len(),
        result.labels.len()
    ));
    output.push_str(&format!("  Trials:   {}\n", result.trials_used.len()));
    if let (Some(first), Some(last)) = (result.lags.first(), result.lags.last()) {
        output.push_str(&format!(
            "  Lags:     [{:+.4}, {:+.4}] s in {} bins\n",
            first,
            last,
            result.n_bins()
        ));
    }
    output.push('\n');

    if result.trials_used.is_empty() {
        output.push_str(&format!("  {}\n", "\u{26A0} Empty result (no trials)".yellow().bold()));
    } else {
        output.push_str("  Peak lags:\n");
        for (pos, &a) in result.channel_indices.iter().enumerate() {
            for &b in &result.channel_indices[pos..] {
                match result.peak_lag(a, b) {
                    Some((lag, value)) if value != 0.0 => {
                        output.push_str(&format!(
                            "    {} \u{2194} {}: {} at {:+.4} s\n",
                            result.labels[a],
                            result.labels[b],
                            format!("{:.4}", value).green(),
                            lag
                        ));
                    }
                    _ => {}
                }
            }
        }
    }

    output.push('\n');
    output.push_str(&sep);
    output.push('\n');
    output
}
