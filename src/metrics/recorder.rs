//! Metrics recorder for upload operations

use metrics::{counter, describe_counter, describe_histogram, histogram};
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::{Duration, Instant};

use crate::strategy::Lane;

static METRICS_INITIALIZED: AtomicBool = AtomicBool::new(false);

/// Initialize metric descriptions (call once at startup)
pub fn init_metrics() {
    if METRICS_INITIALIZED.swap(true, Ordering::SeqCst) {
        return;
    }

    describe_counter!(
        "upload_files_routed_total",
        "Files assigned to each transfer lane"
    );
    describe_counter!(
        "upload_outcomes_total",
        "Per-file upload outcomes by lane and status"
    );
    describe_counter!("upload_chunks_sent_total", "Chunks acknowledged by the server");
    describe_counter!("upload_bytes_sent_total", "Payload bytes acknowledged");
    describe_counter!(
        "upload_calls_total",
        "Upload calls by overall result (complete, partial, failed)"
    );

    describe_histogram!(
        "upload_file_duration_seconds",
        "Time to transfer one file, all chunks included"
    );
    describe_histogram!("upload_file_size_bytes", "Size of uploaded files");
}

/// Record a file being routed to a lane
pub fn record_lane_assigned(lane: Lane, file_size: u64) {
    counter!("upload_files_routed_total", "lane" => lane.as_str()).increment(1);
    histogram!("upload_file_size_bytes", "lane" => lane.as_str()).record(file_size as f64);
}

/// Record one acknowledged chunk
pub fn record_chunk_sent(chunk_size: usize) {
    counter!("upload_chunks_sent_total").increment(1);
    counter!("upload_bytes_sent_total").increment(chunk_size as u64);
}

/// Record a whole-file payload acknowledged by the server
pub fn record_payload_sent(bytes: u64) {
    counter!("upload_bytes_sent_total").increment(bytes);
}

/// Record the overall result of an upload call
pub fn record_upload_finished(total: usize, failed: usize) {
    let result = match failed {
        0 => "complete",
        f if f == total => "failed",
        _ => "partial",
    };
    counter!("upload_calls_total", "result" => result).increment(1);
}

/// Times a single file transfer and records its outcome
pub struct FileTimer {
    lane: Lane,
    start_time: Instant,
}

impl FileTimer {
    pub fn start(lane: Lane) -> Self {
        Self {
            lane,
            start_time: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn success(self) {
        counter!("upload_outcomes_total", "lane" => self.lane.as_str(), "status" => "success")
            .increment(1);
        histogram!("upload_file_duration_seconds", "lane" => self.lane.as_str())
            .record(self.elapsed().as_secs_f64());
    }

    pub fn failure(self) {
        counter!("upload_outcomes_total", "lane" => self.lane.as_str(), "status" => "error")
            .increment(1);
    }
}
