use tracing::info;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use crate::workflow::CallTarget;

/// Pipeline usage metrics for one controller
#[derive(Debug, Default)]
pub struct PipelineMetrics {
    pub analysis_requests: AtomicU64,
    pub recommendation_requests: AtomicU64,
    pub remote_failures: AtomicU64,
    pub validation_rejections: AtomicU64,
    pub busy_rejections: AtomicU64,
}

impl PipelineMetrics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record_request(&self, target: CallTarget) {
        let counter = match target {
            CallTarget::Analysis => &self.analysis_requests,
            CallTarget::Recommendation => &self.recommendation_requests,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_remote_failure(&self) {
        self.remote_failures.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_validation_rejection(&self) {
        self.validation_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_busy_rejection(&self) {
        self.busy_rejections.fetch_add(1, Ordering::Relaxed);
    }

    pub fn get_stats(&self) -> PipelineStats {
        PipelineStats {
            analysis_requests: self.analysis_requests.load(Ordering::Relaxed),
            recommendation_requests: self.recommendation_requests.load(Ordering::Relaxed),
            remote_failures: self.remote_failures.load(Ordering::Relaxed),
            validation_rejections: self.validation_rejections.load(Ordering::Relaxed),
            busy_rejections: self.busy_rejections.load(Ordering::Relaxed),
        }
    }

    pub fn log_stats(&self) {
        let stats = self.get_stats();
        info!(
            "Pipeline metrics: analyses={}, recommendations={}, failures={}, validation_rejections={}, busy_rejections={}",
            stats.analysis_requests,
            stats.recommendation_requests,
            stats.remote_failures,
            stats.validation_rejections,
            stats.busy_rejections
        );
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PipelineStats {
    pub analysis_requests: u64,
    pub recommendation_requests: u64,
    pub remote_failures: u64,
    pub validation_rejections: u64,
    pub busy_rejections: u64,
}

impl PipelineStats {
    /// Remote calls actually issued
    pub fn total_requests(&self) -> u64 {
        self.analysis_requests + self.recommendation_requests
    }
}

/// Time a remote call and log its duration
pub struct OperationTimer {
    target: CallTarget,
    start: Instant,
}

impl OperationTimer {
    pub fn new(target: CallTarget) -> Self {
        Self {
            target,
            start: Instant::now(),
        }
    }

    pub fn finish(self, succeeded: bool) -> Duration {
        let duration = self.start.elapsed();
        info!(
            call = %self.target,
            succeeded,
            duration_ms = duration.as_millis() as u64,
            "Remote call completed"
        );
        duration
    }
}
