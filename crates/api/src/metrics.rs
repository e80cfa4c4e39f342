use serde::Serialize;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::time::Instant;

pub struct Metrics {
    // Counters
    total_requests: AtomicUsize,
    successful_requests: AtomicUsize,
    failed_requests: AtomicUsize,

    // Uploads and analyses
    total_uploads: AtomicUsize,
    total_analyses: AtomicUsize,
    failed_analyses: AtomicUsize,
    cached_analyses: AtomicUsize,

    // Timing (in microseconds)
    total_analysis_time_us: AtomicU64,
}

impl Metrics {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            total_requests: AtomicUsize::new(0),
            successful_requests: AtomicUsize::new(0),
            failed_requests: AtomicUsize::new(0),
            total_uploads: AtomicUsize::new(0),
            total_analyses: AtomicUsize::new(0),
            failed_analyses: AtomicUsize::new(0),
            cached_analyses: AtomicUsize::new(0),
            total_analysis_time_us: AtomicU64::new(0),
        })
    }

    pub fn record_request(&self, success: bool) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
        if success {
            self.successful_requests.fetch_add(1, Ordering::Relaxed);
        } else {
            self.failed_requests.fetch_add(1, Ordering::Relaxed);
        }
    }

    pub fn record_upload(&self) {
        self.total_uploads.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_analysis(&self, duration: std::time::Duration) {
        self.total_analyses.fetch_add(1, Ordering::Relaxed);
        self.total_analysis_time_us
            .fetch_add(duration.as_micros() as u64, Ordering::Relaxed);
    }

    pub fn record_failed_analysis(&self) {
        self.failed_analyses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_cached_analysis(&self) {
        self.cached_analyses.fetch_add(1, Ordering::Relaxed);
    }

    pub fn snapshot(&self) -> MetricsSnapshot {
        let total_analyses = self.total_analyses.load(Ordering::Relaxed);
        let total_us = self.total_analysis_time_us.load(Ordering::Relaxed);

        let avg_analysis_time_ms = if total_analyses > 0 {
            total_us as f64 / total_analyses as f64 / 1000.0
        } else {
            0.0
        };

        MetricsSnapshot {
            total_requests: self.total_requests.load(Ordering::Relaxed),
            successful_requests: self.successful_requests.load(Ordering::Relaxed),
            failed_requests: self.failed_requests.load(Ordering::Relaxed),
            total_uploads: self.total_uploads.load(Ordering::Relaxed),
            total_analyses,
            failed_analyses: self.failed_analyses.load(Ordering::Relaxed),
            cached_analyses: self.cached_analyses.load(Ordering::Relaxed),
            avg_analysis_time_ms,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MetricsSnapshot {
    pub total_requests: usize,
    pub successful_requests: usize,
    pub failed_requests: usize,
    pub total_uploads: usize,
    pub total_analyses: usize,
    pub failed_analyses: usize,
    pub cached_analyses: usize,
    pub avg_analysis_time_ms: f64,
}

pub struct TimedOperation {
    start: Instant,
}

impl TimedOperation {
    pub fn start() -> Self {
        Self {
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> std::time::Duration {
        self.start.elapsed()
    }
}
