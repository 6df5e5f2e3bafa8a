//! Remote conversion against a mock service, and post-condition checks

mod common;

use clinidoc::adapters::convert::{RemoteConverter, FODT_MEDIA_TYPE};
use clinidoc::config::{secret_string, RemoteConverterConfig};
use clinidoc::core::pipeline::never_cancelled;
use clinidoc::domain::{ClinidocError, ConversionError, ErrorCategory};
use common::{bp_chart, files_with_extension, pipeline_with, SilentConverter};
use std::sync::Arc;
use tempfile::TempDir;

const PDF_BYTES: &[u8] = b"%PDF-1.7\n% remote\n%%EOF\n";

fn remote(base_url: String) -> Arc<RemoteConverter> {
    let config = RemoteConverterConfig {
        base_url,
        api_key: Some(secret_string("test-key".to_string())),
        timeout_seconds: 5,
        tls_verify: true,
    };
    Arc::new(RemoteConverter::new(&config).unwrap())
}

#[tokio::test]
async fn test_remote_conversion_writes_service_output() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/convert/fodt/to/pdf")
        .match_header("authorization", "Bearer test-key")
        .match_header("content-type", FODT_MEDIA_TYPE)
        .with_status(200)
        .with_header("content-type", "application/pdf")
        .with_body(PDF_BYTES)
        .expect(1)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let pipeline = pipeline_with(dir.path(), remote(server.url()));

    let outcome = pipeline
        .ensure_artifact(&bp_chart(30, 2), &never_cancelled())
        .await
        .unwrap();
    assert_eq!(std::fs::read(&outcome.artifact.fixed_layout).unwrap(), PDF_BYTES);

    // Cached now, the service is not called again
    let again = pipeline
        .ensure_artifact(&bp_chart(30, 2), &never_cancelled())
        .await
        .unwrap();
    assert!(again.cache_hit);

    mock.assert_async().await;
}

#[tokio::test]
async fn test_rejected_credential_keeps_editable_artifact() {
    let mut server = mockito::Server::new_async().await;
    let mock = server
        .mock("POST", "/convert/fodt/to/pdf")
        .with_status(401)
        .with_body(r#"{"Code":4011,"Message":"Invalid token"}"#)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let pipeline = pipeline_with(dir.path(), remote(server.url()));

    let err = pipeline
        .ensure_artifact(&bp_chart(31, 2), &never_cancelled())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClinidocError::Conversion(ConversionError::CredentialRejected(401))
    ));
    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert!(!err.user_message().contains("Invalid token"));

    assert_eq!(files_with_extension(dir.path(), "fodt").len(), 1);
    assert!(files_with_extension(dir.path(), "pdf").is_empty());
    assert!(files_with_extension(dir.path(), "tmp").is_empty());
    mock.assert_async().await;
}

#[tokio::test]
async fn test_service_error_then_reconvert() {
    let mut server = mockito::Server::new_async().await;
    let failing = server
        .mock("POST", "/convert/fodt/to/pdf")
        .with_status(503)
        .with_body("maintenance")
        .expect(1)
        .create_async()
        .await;

    let dir = TempDir::new().unwrap();
    let pipeline = pipeline_with(dir.path(), remote(server.url()));
    let record = bp_chart(32, 1);

    let err = pipeline
        .ensure_artifact(&record, &never_cancelled())
        .await
        .unwrap_err();
    match &err {
        ClinidocError::Conversion(ConversionError::ServiceError { status, message }) => {
            assert_eq!(*status, 503);
            assert_eq!(message, "maintenance");
        }
        other => panic!("unexpected error: {other:?}"),
    }
    assert!(err.is_conversion_failure());
    assert_eq!(err.category(), ErrorCategory::Conversion);
    failing.assert_async().await;
    failing.remove_async().await;

    let healthy = server
        .mock("POST", "/convert/fodt/to/pdf")
        .with_status(200)
        .with_body(PDF_BYTES)
        .expect(1)
        .create_async()
        .await;

    let outcome = pipeline.reconvert(&record).await.unwrap();
    assert!(!outcome.rendered);
    assert_eq!(std::fs::read(&outcome.artifact.fixed_layout).unwrap(), PDF_BYTES);
    healthy.assert_async().await;
}

#[tokio::test]
async fn test_unreachable_service_is_network_error() {
    let dir = TempDir::new().unwrap();
    // Nothing listens on port 9 (discard) in the test environment
    let pipeline = pipeline_with(dir.path(), remote("http://127.0.0.1:9".to_string()));

    let err = pipeline
        .ensure_artifact(&bp_chart(33, 1), &never_cancelled())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClinidocError::Conversion(ConversionError::Network(_) | ConversionError::Timeout)
    ));
    assert_eq!(files_with_extension(dir.path(), "fodt").len(), 1);
}

#[tokio::test]
async fn test_converter_reporting_success_without_output() {
    let dir = TempDir::new().unwrap();
    let pipeline = pipeline_with(dir.path(), Arc::new(SilentConverter));

    let err = pipeline
        .ensure_artifact(&bp_chart(34, 1), &never_cancelled())
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ClinidocError::Conversion(ConversionError::OutputMissing(_))
    ));
    assert!(files_with_extension(dir.path(), "pdf").is_empty());
}
