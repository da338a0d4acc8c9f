// file: src/utils/telemetry.rs
// description: stage timing and throughput metrics for inventory runs
// reference: tracing-based operation timing

use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::info;

/// Times one pipeline stage and turns it into [`PerformanceMetrics`].
pub struct StageTimer {
    stage: String,
    start: Instant,
}

impl StageTimer {
    pub fn start(stage: &str) -> Self {
        info!("Starting stage: {}", stage);
        Self {
            stage: stage.to_string(),
            start: Instant::now(),
        }
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    pub fn finish(self, count: usize) -> PerformanceMetrics {
        let metrics = PerformanceMetrics::new(&self.stage, count, self.elapsed());
        info!("Completed stage: {}", metrics.format());
        metrics
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PerformanceMetrics {
    pub stage: String,
    pub count: usize,
    pub duration_ms: u64,
    /// Items per second.
    pub throughput: f64,
    pub avg_item_time_ms: f64,
}

impl PerformanceMetrics {
    pub fn new(stage: &str, count: usize, duration: Duration) -> Self {
        let duration_ms = duration.as_millis() as u64;
        let duration_secs = duration.as_secs_f64();

        let throughput = if duration_secs > 0.0 {
            count as f64 / duration_secs
        } else {
            0.0
        };

        let avg_item_time_ms = if count > 0 {
            duration_ms as f64 / count as f64
        } else {
            0.0
        };

        Self {
            stage: stage.to_string(),
            count,
            duration_ms,
            throughput,
            avg_item_time_ms,
        }
    }

    pub fn format(&self) -> String {
        format!(
            "{}: {} items in {}ms ({:.2} items/sec)",
            self.stage, self.count, self.duration_ms, self.throughput
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_performance_metrics() {
        let metrics = PerformanceMetrics::new("parse", 100, Duration::from_secs(10));
        assert_eq!(metrics.count, 100);
        assert_eq!(metrics.throughput, 10.0);
        assert_eq!(metrics.avg_item_time_ms, 100.0);
        assert_eq!(metrics.format(), "parse: 100 items in 10000ms (10.00 items/sec)");
    }

    #[test]
    fn test_zero_items() {
        let metrics = PerformanceMetrics::new("dedup", 0, Duration::ZERO);
        assert_eq!(metrics.throughput, 0.0);
        assert_eq!(metrics.avg_item_time_ms, 0.0);
    }

    #[test]
    fn test_stage_timer() {
        let timer = StageTimer::start("summarize");
        std::thread::sleep(Duration::from_millis(10));
        let metrics = timer.finish(3);
        assert_eq!(metrics.stage, "summarize");
        assert_eq!(metrics.count, 3);
        assert!(metrics.duration_ms >= 10);
    }
}
