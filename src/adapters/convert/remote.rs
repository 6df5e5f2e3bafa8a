//! Remote conversion service client
//!
//! Posts the editable artifact to an external document-conversion service
//! and writes the returned PDF to the target path. Calls carry an explicit
//! timeout and are never retried: a failure propagates to the caller, who
//! can re-run conversion alone because the editable artifact stays on disk.

use super::DocumentConverter;
use crate::config::{RemoteConverterConfig, SecretString};
use crate::core::cache::write_atomic;
use crate::domain::{ClinidocError, ConversionError, Result, ResultExt};
use async_trait::async_trait;
use reqwest::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use reqwest::{Client, ClientBuilder, StatusCode};
use secrecy::ExposeSecret;
use std::path::Path;
use std::time::Duration;

/// Media type of a flat OpenDocument text file
pub const FODT_MEDIA_TYPE: &str = "application/vnd.oasis.opendocument.text-flat-xml";

const CONVERT_PATH: &str = "/convert/fodt/to/pdf";

/// Longest error body echoed into logs
const MAX_ERROR_BODY: usize = 256;

/// Remote conversion strategy
///
/// # Example
///
/// ```no_run
/// use clinidoc::adapters::convert::{DocumentConverter, RemoteConverter};
/// use clinidoc::config::{secret_string, RemoteConverterConfig};
/// use std::path::Path;
///
/// # async fn example() -> clinidoc::domain::Result<()> {
/// let config = RemoteConverterConfig {
///     api_key: Some(secret_string("key".to_string())),
///     ..Default::default()
/// };
/// let converter = RemoteConverter::new(&config)?;
/// converter
///     .convert(Path::new("chart.fodt"), Path::new("chart.pdf"))
///     .await?;
/// # Ok(())
/// # }
/// ```
pub struct RemoteConverter {
    endpoint: String,
    client: Client,
    api_key: SecretString,
}

impl RemoteConverter {
    /// Build a client from configuration
    ///
    /// # Errors
    ///
    /// Returns [`ConversionError::CredentialMissing`] if no usable key is
    /// configured, or a configuration error if the HTTP client cannot be built.
    pub fn new(config: &RemoteConverterConfig) -> Result<Self> {
        let api_key = match &config.api_key {
            Some(key) if !key.expose_secret().is_empty() => key.clone(),
            _ => return Err(ConversionError::CredentialMissing.into()),
        };

        let mut client_builder = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .connect_timeout(Duration::from_secs(config.timeout_seconds.min(30)));

        if !config.tls_verify {
            client_builder = client_builder.danger_accept_invalid_certs(true);
        }

        let client = client_builder.build().map_err(|e| {
            ClinidocError::Configuration(format!("Failed to build HTTP client: {e}"))
        })?;

        Ok(Self {
            endpoint: format!("{}{CONVERT_PATH}", config.base_url.trim_end_matches('/')),
            client,
            api_key,
        })
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    fn map_transport(err: reqwest::Error) -> ConversionError {
        if err.is_timeout() {
            ConversionError::Timeout
        } else {
            ConversionError::Network(err.to_string())
        }
    }
}

#[async_trait]
impl DocumentConverter for RemoteConverter {
    async fn convert(&self, editable: &Path, target: &Path) -> Result<()> {
        let body = tokio::fs::read(editable)
            .await
            .with_context(|| format!("Failed to read {}", editable.display()))?;

        tracing::debug!(
            endpoint = %self.endpoint,
            bytes = body.len(),
            "Sending document to conversion service"
        );

        let response = self
            .client
            .post(&self.endpoint)
            .header(
                AUTHORIZATION,
                format!("Bearer {}", self.api_key.expose_secret().as_ref()),
            )
            .header(CONTENT_TYPE, FODT_MEDIA_TYPE)
            .header(ACCEPT, "application/pdf")
            .body(body)
            .send()
            .await
            .map_err(Self::map_transport)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            tracing::error!(status = status.as_u16(), "Conversion service rejected the credential");
            return Err(ConversionError::CredentialRejected(status.as_u16()).into());
        }
        if !status.is_success() {
            let mut message = response.text().await.unwrap_or_default();
            if message.len() > MAX_ERROR_BODY {
                let mut cut = MAX_ERROR_BODY;
                while !message.is_char_boundary(cut) {
                    cut -= 1;
                }
                message.truncate(cut);
            }
            return Err(ConversionError::ServiceError {
                status: status.as_u16(),
                message,
            }
            .into());
        }

        let bytes = response.bytes().await.map_err(Self::map_transport)?;
        write_atomic(target, &bytes)
            .await
            .with_context(|| format!("Failed to write {}", target.display()))?;

        tracing::debug!(target = %target.display(), bytes = bytes.len(), "Remote conversion complete");
        Ok(())
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}
