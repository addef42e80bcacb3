//! Upload metrics
//!
//! Counters and histograms for lane routing, per-file outcomes and chunk
//! traffic, recorded through the `metrics` facade. Without an installed
//! recorder every call is a no-op.

pub mod recorder;

pub use recorder::{
    init_metrics, record_chunk_sent, record_lane_assigned, record_payload_sent,
    record_upload_finished, FileTimer,
};
