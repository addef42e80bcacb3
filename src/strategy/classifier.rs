//! Lane selection by file size
//!
//! Boundaries are inclusive on the lower lane: a file of exactly
//! `small_threshold` bytes is small, one of exactly `huge_threshold` bytes is
//! serial-large.

use super::types::{Lane, LanePlan, UploadConfig};

/// Pick the lane for a single file size
pub fn classify(file_size: u64, config: &UploadConfig) -> Lane {
    if file_size <= config.small_threshold {
        Lane::Batched
    } else if file_size <= config.huge_threshold {
        Lane::SerialLarge
    } else {
        Lane::Chunked
    }
}

/// Group file sizes by lane, preserving submission order within each lane
pub fn partition<I>(sizes: I, config: &UploadConfig) -> LanePlan
where
    I: IntoIterator<Item = u64>,
{
    let mut plan = LanePlan::default();

    for (idx, size) in sizes.into_iter().enumerate() {
        match classify(size, config) {
            lane if lane.is_small() => plan.small.push(idx),
            lane => plan.large.push((idx, lane)),
        }
    }

    plan.small_lane = match plan.small.len() {
        0 => None,
        1 => Some(Lane::Direct),
        _ => Some(Lane::Batched),
    };

    plan
}
