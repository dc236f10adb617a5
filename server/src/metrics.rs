// Metrics collection and tracking

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Stream session counters
#[derive(Debug, Clone)]
pub struct StreamMetrics {
    pub started: Arc<AtomicU64>,
    pub completed: Arc<AtomicU64>,
    pub aborted: Arc<AtomicU64>,
    pub fragments_emitted: Arc<AtomicU64>,
    pub total_session_ms: Arc<AtomicU64>,
    pub max_session_ms: Arc<AtomicU64>,
}

impl StreamMetrics {
    pub fn new() -> Self {
        Self {
            started: Arc::new(AtomicU64::new(0)),
            completed: Arc::new(AtomicU64::new(0)),
            aborted: Arc::new(AtomicU64::new(0)),
            fragments_emitted: Arc::new(AtomicU64::new(0)),
            total_session_ms: Arc::new(AtomicU64::new(0)),
            max_session_ms: Arc::new(AtomicU64::new(0)),
        }
    }

    pub fn record_start(&self) {
        self.started.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_fragment(&self) {
        self.fragments_emitted.fetch_add(1, Ordering::Relaxed);
    }

    pub fn record_end(&self, completed: bool, elapsed_ms: u64) {
        if completed {
            self.completed.fetch_add(1, Ordering::Relaxed);
        } else {
            self.aborted.fetch_add(1, Ordering::Relaxed);
        }
        self.total_session_ms.fetch_add(elapsed_ms, Ordering::Relaxed);
        self.max_session_ms.fetch_max(elapsed_ms, Ordering::Relaxed);
    }

    /// Sessions started but not yet finished either way.
    pub fn active(&self) -> u64 {
        let started = self.started.load(Ordering::Relaxed);
        let finished = self.completed.load(Ordering::Relaxed) + self.aborted.load(Ordering::Relaxed);
        started.saturating_sub(finished)
    }

    pub fn avg_session_ms(&self) -> f64 {
        let finished = self.completed.load(Ordering::Relaxed) + self.aborted.load(Ordering::Relaxed);
        if finished == 0 {
            return 0.0;
        }
        let total = self.total_session_ms.load(Ordering::Relaxed);
        total as f64 / finished as f64
    }

    pub fn snapshot(&self) -> StreamMetricsResponse {
        StreamMetricsResponse {
            started: self.started.load(Ordering::Relaxed),
            completed: self.completed.load(Ordering::Relaxed),
            aborted: self.aborted.load(Ordering::Relaxed),
            active: self.active(),
            fragments_emitted: self.fragments_emitted.load(Ordering::Relaxed),
            avg_session_ms: self.avg_session_ms(),
            max_session_ms: self.max_session_ms.load(Ordering::Relaxed),
        }
    }
}

impl Default for StreamMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// Comprehensive metrics structure
#[derive(Debug, Clone)]
pub struct AppMetrics {
    pub request_count: Arc<AtomicU64>,
    pub streams: StreamMetrics,
}

impl AppMetrics {
    pub fn new() -> Self {
        Self {
            request_count: Arc::new(AtomicU64::new(0)),
            streams: StreamMetrics::new(),
        }
    }

    pub fn record_request(&self) {
        self.request_count.fetch_add(1, Ordering::Relaxed);
    }
}

impl Default for AppMetrics {
    fn default() -> Self {
        Self::new()
    }
}

#[derive(Serialize)]
pub struct MetricsResponse {
    pub timestamp: DateTime<Utc>,
    pub system: SystemMetrics,
    pub streams: StreamMetricsResponse,
}

#[derive(Serialize)]
pub struct SystemMetrics {
    pub cpu_usage_percent: f32,
    pub memory_used_mb: u64,
    pub memory_total_mb: u64,
    pub memory_usage_percent: f32,
    pub request_count: u64,
    pub uptime_seconds: u64,
    pub system_load: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct StreamMetricsResponse {
    pub started: u64,
    pub completed: u64,
    pub aborted: u64,
    pub active: u64,
    pub fragments_emitted: u64,
    pub avg_session_ms: f64,
    pub max_session_ms: u64,
}
