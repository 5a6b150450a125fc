//! Numeric kernels for cross-correlation analysis.
//!
//! This module holds the pure, data-structure-free pieces of the computation:
//! - Lag-binned histogram of timestamp pairs (the innermost primitive)
//! - Per-slice normalization of the accumulated tensors

mod histogram;
mod normalize;

pub use histogram::{lag_axis, lag_histogram};
pub use normalize::normalize_slices;
