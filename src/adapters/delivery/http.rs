//! HTTP surface
//!
//! `GET /documents/:kind/:id?mode=inline|print|download` and `GET /health`.
//! Errors carry only the generic user-facing message; diagnostics go to
//! the log.

use super::response::{DeliveryMode, DeliveryResponse, PRINT_HEADER};
use super::service::DocumentDelivery;
use crate::adapters::records::RecordSource;
use crate::domain::{ClinidocError, ErrorCategory, FormKind, RecordId};
use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;

/// Shared handler state
#[derive(Clone)]
pub struct AppState {
    pub delivery: DocumentDelivery,
    pub records: Arc<dyn RecordSource>,
}

impl AppState {
    pub fn new(delivery: DocumentDelivery, records: Arc<dyn RecordSource>) -> Self {
        Self { delivery, records }
    }
}

#[derive(Debug, Deserialize)]
pub struct DocumentQuery {
    pub mode: Option<String>,
}

/// Build the delivery router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/documents/:kind/:id", get(get_document))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Fires the cancel signal if the request future is dropped (client gone)
struct CancelOnDrop(watch::Sender<bool>);

impl Drop for CancelOnDrop {
    fn drop(&mut self) {
        let _ = self.0.send(true);
    }
}

async fn get_document(
    State(state): State<AppState>,
    Path((kind, id)): Path<(String, String)>,
    Query(query): Query<DocumentQuery>,
    headers: HeaderMap,
) -> Response {
    let Ok(kind) = kind.parse::<FormKind>() else {
        return error_body(StatusCode::NOT_FOUND, "Unknown document type.");
    };
    let Ok(id) = id.parse::<RecordId>() else {
        return error_body(StatusCode::BAD_REQUEST, "Invalid record id.");
    };
    let mode = match query.mode.as_deref().map(str::parse::<DeliveryMode>) {
        None => DeliveryMode::default(),
        Some(Ok(mode)) => mode,
        Some(Err(_)) => return error_body(StatusCode::BAD_REQUEST, "Unknown delivery mode."),
    };

    let record = match state.records.load(kind, id).await {
        Ok(Some(record)) => record,
        Ok(None) => return error_body(StatusCode::NOT_FOUND, "Record not found."),
        Err(e) => return error_response(&e),
    };

    // Generation runs in its own task so a disconnect stops it at the next
    // stage boundary instead of mid-write
    let (cancel_tx, cancel_rx) = watch::channel(false);
    let _cancel_guard = CancelOnDrop(cancel_tx);
    let delivery = state.delivery.clone();
    let task = tokio::spawn(async move { delivery.deliver(&record, mode, &cancel_rx).await });

    match task.await {
        Ok(Ok(response)) => document_response(response, &headers),
        Ok(Err(e)) => error_response(&e),
        Err(e) => {
            tracing::error!(error = %e, "Delivery task failed");
            error_body(StatusCode::INTERNAL_SERVER_ERROR, "Failed to generate document.")
        }
    }
}

fn document_response(response: DeliveryResponse, request: &HeaderMap) -> Response {
    let not_modified = request
        .get(header::IF_NONE_MATCH)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == response.etag);

    let mut headers = HeaderMap::new();
    headers.insert(header::CONTENT_TYPE, HeaderValue::from_static(response.content_type));
    if let Ok(value) = HeaderValue::from_str(&response.content_disposition()) {
        headers.insert(header::CONTENT_DISPOSITION, value);
    }
    if let Ok(value) = HeaderValue::from_str(&response.etag) {
        headers.insert(header::ETAG, value);
    }
    headers.insert(header::CACHE_CONTROL, HeaderValue::from_static("private, no-cache"));
    if response.print {
        headers.insert(PRINT_HEADER, HeaderValue::from_static("true"));
    }

    if not_modified {
        return (StatusCode::NOT_MODIFIED, headers).into_response();
    }
    (StatusCode::OK, headers, response.body).into_response()
}

/// HTTP status for an error category
pub fn status_for(category: ErrorCategory) -> StatusCode {
    match category {
        ErrorCategory::Input => StatusCode::UNPROCESSABLE_ENTITY,
        ErrorCategory::Conversion => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCategory::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
        ErrorCategory::Configuration | ErrorCategory::PartialState | ErrorCategory::Internal => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

fn error_response(error: &ClinidocError) -> Response {
    crate::log_error_with_context!(error, "Document request failed");
    error_body(status_for(error.category()), error.user_message())
}

fn error_body(status: StatusCode, message: &str) -> Response {
    let body = Json(json!({
        "error": true,
        "message": message,
        "status": status.as_u16()
    }));
    (status, body).into_response()
}
