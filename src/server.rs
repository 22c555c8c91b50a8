//! Static Server
//!
//! Read-only HTTP view of the report directory. `/` resolves to `index.html`,
//! every other path to the file of that name; there are no dynamic routes.
use crate::errors::DriftError;
use axum::Router;
use log::info;
use std::net::SocketAddr;
use std::path::Path;
use tokio::net::TcpListener;
use tower_http::services::ServeDir;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

/// Router serving the files of `dir`. Every request is logged at info level.
pub fn router(dir: &Path) -> Router {
    let files = ServeDir::new(dir).append_index_html_on_directories(true);
    let trace = TraceLayer::new_for_http()
        .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
        .on_response(DefaultOnResponse::new().level(Level::INFO));
    Router::new().fallback_service(files).layer(trace)
}

/// Serve `dir` on `addr` until the process is stopped.
pub async fn serve(dir: &Path, addr: SocketAddr) -> Result<(), DriftError> {
    let listener = TcpListener::bind(addr).await?;
    info!("Serving {} on http://{}", dir.display(), listener.local_addr()?);
    axum::serve(listener, router(dir)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Method, Request, StatusCode};
    use http_body_util::BodyExt;
    use crate::constants::DEFAULT_LOG_FILTER;
    use std::fs;
    use std::io;
    use std::sync::{Arc, Mutex};
    use tower::ServiceExt;
    use tracing_subscriber::EnvFilter;

    fn report_dir() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("index.html"),
            "<html><head><title>Data Drift Dashboard</title></head></html>",
        )
        .unwrap();
        fs::write(dir.path().join("target_drift_cnt.svg"), "<svg></svg>").unwrap();
        fs::write(dir.path().join("report.json"), r#"{"oob_score":null}"#).unwrap();
        dir
    }

    async fn get(dir: &Path, method: Method, uri: &str) -> (StatusCode, String) {
        let request = Request::builder().method(method).uri(uri).body(Body::empty()).unwrap();
        let response = router(dir).oneshot(request).await.unwrap();
        let status = response.status();
        let body = response.into_body().collect().await.unwrap().to_bytes();
        (status, String::from_utf8_lossy(&body).to_string())
    }

    #[tokio::test]
    async fn test_root_serves_index() {
        let dir = report_dir();
        let (status, body) = get(dir.path(), Method::GET, "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Data Drift Dashboard"));
    }

    #[tokio::test]
    async fn test_serves_images_by_name() {
        let dir = report_dir();
        let (status, body) = get(dir.path(), Method::GET, "/target_drift_cnt.svg").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, "<svg></svg>");

        let (status, _) = get(dir.path(), Method::GET, "/feature_drift_temp.svg").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_read_only() {
        let dir = report_dir();
        let (status, _) = get(dir.path(), Method::POST, "/index.html").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }

    #[tokio::test]
    async fn test_serves_summary_document() {
        let dir = report_dir();
        let (status, body) = get(dir.path(), Method::GET, "/report.json").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, r#"{"oob_score":null}"#);
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_requests_logged_under_default_filter() {
        let dir = report_dir();
        let captured = Captured::default();
        let writer = captured.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::new(DEFAULT_LOG_FILTER))
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let (status, _) = get(dir.path(), Method::GET, "/target_drift_cnt.svg").await;
        assert_eq!(status, StatusCode::OK);

        let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
        assert!(output.contains("finished processing request"));
        assert!(output.contains("INFO"));
        assert!(output.contains("/target_drift_cnt.svg"));
    }
}
