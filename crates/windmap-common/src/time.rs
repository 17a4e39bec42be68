//! Time-axis sampling and timestamp formatting.

use chrono::{DateTime, Utc};

/// Format used for frame titles.
pub const TITLE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M";

/// Indices selected by a fixed stride: `0, stride, 2*stride, ...` below `len`.
///
/// Yields `ceil(len / stride)` indices. A stride of 0 is treated as 1.
pub fn sample_indices(len: usize, stride: usize) -> Vec<usize> {
    (0..len).step_by(stride.max(1)).collect()
}

/// Human-readable timestamp for frame titles.
pub fn format_timestamp(time: &DateTime<Utc>) -> String {
    time.format(TITLE_TIME_FORMAT).to_string()
}
