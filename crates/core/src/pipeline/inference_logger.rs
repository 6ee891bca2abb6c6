use std::collections::HashMap;
use std::time::Instant;

use parking_lot::Mutex;

/// Cross-cutting observer for per-request inference events.
///
/// Use cases are shared across concurrent requests, so every method takes
/// `&self`.
pub trait InferenceLogger: Send + Sync {
    /// Record how long a named stage took for one request.
    fn timing(&self, stage: &str, duration_ms: f64);

    /// Record a point-in-time metric (e.g. detected face count).
    fn metric(&self, name: &str, value: f64);

    /// Log a human-readable status message.
    fn info(&self, message: &str);

    /// Emit a report of everything recorded so far. Default: no-op.
    fn summary(&self) {}
}

/// Discards all events. Used by tests.
pub struct NullInferenceLogger;

impl InferenceLogger for NullInferenceLogger {
    fn timing(&self, _stage: &str, _duration_ms: f64) {}
    fn metric(&self, _name: &str, _value: f64) {}
    fn info(&self, _message: &str) {}
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct StageStats {
    pub count: usize,
    pub total_ms: f64,
    pub max_ms: f64,
}

impl StageStats {
    fn record(&mut self, value: f64) {
        self.count += 1;
        self.total_ms += value;
        self.max_ms = self.max_ms.max(value);
    }

    pub fn avg_ms(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.total_ms / self.count as f64
        }
    }
}

/// Running aggregate of a unitless metric such as the face count.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MetricStats {
    pub count: usize,
    pub sum: f64,
    pub max: f64,
}

impl MetricStats {
    fn record(&mut self, value: f64) {
        self.max = if self.count == 0 { value } else { self.max.max(value) };
        self.count += 1;
        self.sum += value;
    }

    pub fn mean(&self) -> f64 {
        if self.count == 0 {
            0.0
        } else {
            self.sum / self.count as f64
        }
    }
}

/// Writes events through the `log` facade and keeps running per-stage
/// aggregates for a summary at shutdown.
pub struct LogInferenceLogger {
    timings: Mutex<HashMap<String, StageStats>>,
    metrics: Mutex<HashMap<String, MetricStats>>,
    start_time: Instant,
}

impl LogInferenceLogger {
    pub fn new() -> Self {
        Self {
            timings: Mutex::new(HashMap::new()),
            metrics: Mutex::new(HashMap::new()),
            start_time: Instant::now(),
        }
    }

    pub fn timings_for(&self, stage: &str) -> Option<StageStats> {
        self.timings.lock().get(stage).copied()
    }

    pub fn metrics_for(&self, name: &str) -> Option<MetricStats> {
        self.metrics.lock().get(name).copied()
    }

    /// Returns the formatted summary string, or `None` if nothing was recorded.
    pub fn summary_string(&self) -> Option<String> {
        let timings = self.timings.lock();
        let metrics = self.metrics.lock();
        if timings.is_empty() && metrics.is_empty() {
            return None;
        }

        let uptime = self.start_time.elapsed().as_secs_f64();
        let mut lines = vec![format!("Inference summary ({uptime:.1}s uptime):")];

        let mut stages: Vec<_> = timings.iter().collect();
        stages.sort_by(|a, b| a.0.cmp(b.0));
        for (stage, stats) in stages {
            lines.push(format!(
                "  {stage:12}: {:5} calls  avg {:7.1}ms  max {:7.1}ms",
                stats.count,
                stats.avg_ms(),
                stats.max_ms
            ));
        }

        let mut names: Vec<_> = metrics.iter().collect();
        names.sort_by(|a, b| a.0.cmp(b.0));
        for (name, stats) in names {
            lines.push(format!(
                "  {name}: avg {:.1}  max {:.0}",
                stats.mean(),
                stats.max
            ));
        }

        Some(lines.join("\n"))
    }
}

impl Default for LogInferenceLogger {
    fn default() -> Self {
        Self::new()
    }
}

impl InferenceLogger for LogInferenceLogger {
    fn timing(&self, stage: &str, duration_ms: f64) {
        log::debug!("{stage} took {duration_ms:.1}ms");
        self.timings
            .lock()
            .entry(stage.to_string())
            .or_default()
            .record(duration_ms);
    }

    fn metric(&self, name: &str, value: f64) {
        self.metrics
            .lock()
            .entry(name.to_string())
            .or_default()
            .record(value);
    }

    fn info(&self, message: &str) {
        log::info!("{message}");
    }

    fn summary(&self) {
        if let Some(text) = self.summary_string() {
            log::info!("\n\n{text}");
        }
    }
}

/// Milliseconds elapsed since `start`.
pub fn elapsed_ms(start: Instant) -> f64 {
    start.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_null_logger_all_methods_are_noop() {
        let logger = NullInferenceLogger;
        logger.timing("detect", 5.0);
        logger.metric("faces", 3.0);
        logger.info("hello");
        logger.summary();
    }

    #[test]
    fn test_timing_aggregates_per_stage() {
        let logger = LogInferenceLogger::new();
        logger.timing("detect", 20.0);
        logger.timing("detect", 30.0);
        logger.timing("classify", 5.0);

        let detect = logger.timings_for("detect").unwrap();
        assert_eq!(detect.count, 2);
        assert_relative_eq!(detect.avg_ms(), 25.0);
        assert_relative_eq!(detect.max_ms, 30.0);
        assert_eq!(logger.timings_for("classify").unwrap().count, 1);
        assert!(logger.timings_for("decode").is_none());
    }

    #[test]
    fn test_metric_aggregates() {
        let logger = LogInferenceLogger::new();
        logger.metric("faces", 3.0);
        logger.metric("faces", 4.0);
        let faces = logger.metrics_for("faces").unwrap();
        assert_eq!(faces.count, 2);
        assert_relative_eq!(faces.sum, 7.0);
        assert_relative_eq!(faces.mean(), 3.5);
        assert_relative_eq!(faces.max, 4.0);
    }

    #[test]
    fn test_summary_lists_stages_and_metrics() {
        let logger = LogInferenceLogger::new();
        logger.timing("decode", 2.0);
        logger.timing("classify", 40.0);
        logger.metric("faces", 1.0);

        let summary = logger.summary_string().unwrap();
        assert!(summary.contains("Inference summary"));
        assert!(summary.contains("decode"));
        assert!(summary.contains("classify"));
        assert!(summary.contains("faces: avg 1.0  max 1"));
    }

    #[test]
    fn test_empty_summary_returns_none() {
        assert!(LogInferenceLogger::default().summary_string().is_none());
    }
}
