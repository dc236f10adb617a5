use axum::{extract::State, http::Uri, Json};
use chrono::Utc;

use crate::error::ApiError;
use crate::metrics::{MetricsResponse, SystemMetrics};
use crate::AppState;

pub async fn health_check() -> &'static str {
    "ok"
}

pub async fn metrics_endpoint(State(state): State<AppState>) -> Json<MetricsResponse> {
    let mut system = sysinfo::System::new();
    system.refresh_cpu();
    system.refresh_memory();

    // Get CPU usage (average across all cores)
    let cpu_usage = system.global_cpu_info().cpu_usage();

    let memory_used = system.used_memory();
    let memory_total = system.total_memory();
    let memory_usage_percent = if memory_total > 0 {
        (memory_used as f64 / memory_total as f64 * 100.0) as f32
    } else {
        0.0
    };

    Json(MetricsResponse {
        timestamp: Utc::now(),
        system: SystemMetrics {
            cpu_usage_percent: cpu_usage,
            memory_used_mb: memory_used / 1024 / 1024,
            memory_total_mb: memory_total / 1024 / 1024,
            memory_usage_percent,
            request_count: state
                .metrics
                .request_count
                .load(std::sync::atomic::Ordering::Relaxed),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            system_load: system_load(),
        },
        streams: state.metrics.streams.snapshot(),
    })
}

/// One-minute load average (Unix-like systems only)
fn system_load() -> Option<f64> {
    #[cfg(unix)]
    {
        std::fs::read_to_string("/proc/loadavg")
            .ok()
            .and_then(|loadavg| loadavg.split_whitespace().next()?.parse::<f64>().ok())
    }
    #[cfg(not(unix))]
    {
        None
    }
}

pub async fn not_found(uri: Uri) -> ApiError {
    ApiError::NotFound(format!("No route for {}", uri.path()))
}
