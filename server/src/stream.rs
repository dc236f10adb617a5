//! `POST /stream`: pick a canned reply and stream it word by word.
//!
//! The body is the raw concatenation of fragments, one chunk per fragment,
//! sent as `text/event-stream` with the headers proxies need to pass chunks
//! through unbuffered. Completion is signalled by closing the body.

use std::{convert::Infallible, time::Instant};

use axum::{
    body::Body,
    extract::{rejection::JsonRejection, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use futures_util::stream::{Stream, StreamExt};
use llm_sim::{PacedEmitter, DEFAULT_DURATION_SECS};
use serde::Deserialize;
use tracing::{debug, info};

use crate::error::ApiError;
use crate::metrics::StreamMetrics;
use crate::AppState;

const X_ACCEL_BUFFERING: HeaderName = HeaderName::from_static("x-accel-buffering");

#[derive(Debug, Deserialize)]
pub struct StreamRequest {
    pub query: String,
    #[serde(default = "default_duration")]
    pub duration: f64,
}

fn default_duration() -> f64 {
    DEFAULT_DURATION_SECS
}

pub async fn stream_endpoint(
    State(state): State<AppState>,
    payload: Result<Json<StreamRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    state.metrics.record_request();

    // Any body that parses is served; query length and duration are not capped
    let Json(req) = payload.map_err(|rejection| ApiError::InvalidInput(rejection.body_text()))?;

    let text = llm_sim::select(&req.query);
    let emitter = PacedEmitter::new(text, req.duration);

    info!(
        "Stream request received: query length={}, duration={}s, words={}, delay={}ms",
        req.query.len(),
        req.duration,
        emitter.word_count(),
        emitter.delay().as_millis()
    );

    let session = StreamSession::start(state.metrics.streams.clone(), emitter.word_count());
    let body = Body::from_stream(session.track(emitter.into_stream()));

    Ok((StatusCode::OK, stream_headers(), body).into_response())
}

fn stream_headers() -> [(HeaderName, HeaderValue); 4] {
    [
        (header::CONTENT_TYPE, HeaderValue::from_static("text/event-stream")),
        (header::CACHE_CONTROL, HeaderValue::from_static("no-cache")),
        (header::CONNECTION, HeaderValue::from_static("keep-alive")),
        (X_ACCEL_BUFFERING, HeaderValue::from_static("no")),
    ]
}

/// Lifetime of one streamed response.
///
/// Dropped together with the body, either after the last fragment or when
/// the transport gives up on the connection.
struct StreamSession {
    metrics: StreamMetrics,
    expected: usize,
    emitted: usize,
    started_at: Instant,
}

impl StreamSession {
    fn start(metrics: StreamMetrics, expected: usize) -> Self {
        metrics.record_start();
        Self {
            metrics,
            expected,
            emitted: 0,
            started_at: Instant::now(),
        }
    }

    /// Count fragments as they pass. The session lives as long as the returned stream.
    fn track<S>(mut self, fragments: S) -> impl Stream<Item = Result<String, Infallible>> + Send + 'static
    where
        S: Stream<Item = String> + Send + 'static,
    {
        fragments.map(move |fragment| {
            self.observe();
            Ok(fragment)
        })
    }

    fn observe(&mut self) {
        self.emitted += 1;
        self.metrics.record_fragment();
    }
}

impl Drop for StreamSession {
    fn drop(&mut self) {
        let completed = self.emitted >= self.expected;
        let elapsed = self.started_at.elapsed();
        self.metrics.record_end(completed, elapsed.as_millis() as u64);

        if completed {
            info!(
                "Stream completed: {} fragments in {:.2}s",
                self.emitted,
                elapsed.as_secs_f64()
            );
        } else {
            debug!(
                "Stream aborted after {}/{} fragments ({:.2}s), client went away",
                self.emitted,
                self.expected,
                elapsed.as_secs_f64()
            );
        }
    }
}
