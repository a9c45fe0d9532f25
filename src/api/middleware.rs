//! Request logging and metrics

use crate::metrics::MetricsCollector;
use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use std::sync::Arc;
use tracing::{debug, warn};

/// Record every routed request by its route template, so ids in paths do not
/// explode label cardinality.
pub async fn track_requests(
    State(metrics): State<Arc<MetricsCollector>>,
    request: Request,
    next: Next,
) -> Response {
    let timer = metrics.start_timer();
    let method = request.method().to_string();
    let route = request
        .extensions()
        .get::<MatchedPath>()
        .map(|path| path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;

    let status = response.status();
    let elapsed = timer.stop();
    metrics.record_http_request(&route, &method, status.as_u16(), elapsed);

    if status.is_server_error() {
        warn!("{} {} -> {} in {:?}", method, route, status, elapsed);
    } else {
        debug!("{} {} -> {} in {:?}", method, route, status, elapsed);
    }

    response
}
