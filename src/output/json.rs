//! JSON serialization for analysis results.

use crate::result::XcorrResult;

/// Serialize an `XcorrResult` to a compact JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for
/// `XcorrResult`).
pub fn to_json(result: &XcorrResult) -> Result<String, serde_json::Error> {
    serde_json::to_string(result)
}

/// Serialize an `XcorrResult` to a pretty-printed JSON string.
///
/// # Errors
///
/// Returns an error if serialization fails (should not happen for
/// `XcorrResult`).
pub fn to_json_pretty(result: &XcorrResult) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(result)
}
