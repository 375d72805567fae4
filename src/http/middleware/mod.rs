//! HTTP middleware for the info server
//!
//! Currently a single concern: access logging. Every request that passes
//! through [`access_log_middleware`] produces exactly one
//! [`AccessLogRecord`], emitted after the wrapped handler returns, whether or
//! not that handler produced an error response. The middleware never looks at
//! status codes; it is a timing/path logger only.

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{DateTime, Local};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::info;

/// One access record per handled request.
#[derive(Debug, Clone)]
pub struct AccessLogRecord {
    /// Wall-clock time the request entered the middleware.
    pub started_at: DateTime<Local>,
    /// Total time spent in the wrapped handler chain.
    pub elapsed: Duration,
    /// Requested URI.
    pub path: String,
}

impl AccessLogRecord {
    /// Render the record as `<start-timestamp>, <duration>, <path>`.
    pub fn line(&self) -> String {
        format!(
            "{}, {:?}, {}",
            self.started_at.to_rfc3339(),
            self.elapsed,
            self.path
        )
    }
}

/// Destination for access records. Production uses [`StdoutSink`]; tests
/// substitute a collecting sink.
pub trait AccessSink: Send + Sync {
    fn emit(&self, record: &AccessLogRecord);
}

/// Writes each record as one line to standard output via the tracing
/// subscriber.
pub struct StdoutSink;

impl AccessSink for StdoutSink {
    fn emit(&self, record: &AccessLogRecord) {
        info!(target: "access", "{}", record.line());
    }
}

/// Wrap a handler with request timing and access logging.
pub async fn access_log_middleware(
    State(sink): State<Arc<dyn AccessSink>>,
    request: Request,
    next: Next,
) -> Response {
    let path = request.uri().to_string();
    let started_at = Local::now();
    let start = Instant::now();

    let response = next.run(request).await;

    sink.emit(&AccessLogRecord {
        started_at,
        elapsed: start.elapsed(),
        path,
    });
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        http::StatusCode,
        middleware::from_fn_with_state,
        routing::get,
        Router,
    };
    use std::sync::Mutex;
    use tower::ServiceExt;

    /// Collects every emitted record for inspection.
    struct CollectingSink {
        records: Mutex<Vec<AccessLogRecord>>,
    }

    impl CollectingSink {
        fn new() -> Self {
            Self {
                records: Mutex::new(Vec::new()),
            }
        }

        fn records(&self) -> Vec<AccessLogRecord> {
            self.records.lock().unwrap().clone()
        }
    }

    impl AccessSink for CollectingSink {
        fn emit(&self, record: &AccessLogRecord) {
            self.records.lock().unwrap().push(record.clone());
        }
    }

    fn router_with_sink(sink: Arc<CollectingSink>) -> Router {
        let sink: Arc<dyn AccessSink> = sink;
        Router::new()
            .route("/info", get(|| async { "ok" }))
            .route("/boom", get(|| async { StatusCode::INTERNAL_SERVER_ERROR }))
            .layer(from_fn_with_state(sink, access_log_middleware))
    }

    fn get_request(path: &str) -> Request {
        Request::builder().uri(path).body(Default::default()).unwrap()
    }

    #[test]
    fn line_has_timestamp_duration_and_path_in_order() {
        let record = AccessLogRecord {
            started_at: Local::now(),
            elapsed: Duration::from_millis(3),
            path: "/info".to_string(),
        };
        let line = record.line();
        let fields: Vec<&str> = line.splitn(3, ", ").collect();
        assert_eq!(fields.len(), 3);
        assert!(DateTime::parse_from_rfc3339(fields[0]).is_ok());
        assert_eq!(fields[1], "3ms");
        assert_eq!(fields[2], "/info");
    }

    #[tokio::test]
    async fn single_request_emits_exactly_one_record() {
        let sink = Arc::new(CollectingSink::new());
        let router = router_with_sink(sink.clone());

        let response = router.oneshot(get_request("/info")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "/info");
    }

    #[tokio::test]
    async fn record_is_emitted_even_for_error_responses() {
        let sink = Arc::new(CollectingSink::new());
        let router = router_with_sink(sink.clone());

        let response = router.oneshot(get_request("/boom")).await.unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let records = sink.records();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].path, "/boom");
    }

    #[tokio::test]
    async fn fifty_concurrent_requests_emit_fifty_intact_records() {
        let sink = Arc::new(CollectingSink::new());
        let router = router_with_sink(sink.clone());

        let mut tasks = Vec::new();
        for _ in 0..50 {
            let router = router.clone();
            tasks.push(tokio::spawn(async move {
                router.oneshot(get_request("/info")).await.unwrap()
            }));
        }
        for task in tasks {
            assert_eq!(task.await.unwrap().status(), StatusCode::OK);
        }

        let records = sink.records();
        assert_eq!(records.len(), 50);
        for record in &records {
            assert_eq!(record.path, "/info");
            // Durations are always non-negative; the line stays well formed.
            assert_eq!(record.line().splitn(3, ", ").count(), 3);
        }
    }
}
