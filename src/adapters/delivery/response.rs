//! Delivery modes and response payloads

use crate::domain::{ClinidocError, FormKind, InputError, RecordId};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::str::FromStr;

pub const PDF_CONTENT_TYPE: &str = "application/pdf";

/// Header asking the client to open the print dialog once loaded
pub const PRINT_HEADER: &str = "x-print-on-load";

/// How the fixed-layout artifact is handed to the client
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryMode {
    /// View in the browser
    #[default]
    Inline,
    /// View in the browser and trigger printing
    #[serde(rename = "print")]
    PreviewPrint,
    /// Save as a file
    Download,
}

impl FromStr for DeliveryMode {
    type Err = ClinidocError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "inline" | "view" => Ok(Self::Inline),
            "print" | "preview" => Ok(Self::PreviewPrint),
            "download" | "attachment" => Ok(Self::Download),
            other => Err(InputError::InvalidRecord(format!(
                "Unknown delivery mode '{other}' (expected inline, print or download)"
            ))
            .into()),
        }
    }
}

impl std::fmt::Display for DeliveryMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Inline => "inline",
            Self::PreviewPrint => "print",
            Self::Download => "download",
        })
    }
}

/// Content-Disposition kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Disposition {
    Inline,
    Attachment,
}

/// Bytes plus the headers the HTTP layer should send with them
#[derive(Debug, Clone)]
pub struct DeliveryResponse {
    pub body: Vec<u8>,
    pub content_type: &'static str,
    pub disposition: Disposition,
    pub filename: String,
    /// Client should print on load
    pub print: bool,
    /// Quoted SHA-256 of the body
    pub etag: String,
}

impl DeliveryResponse {
    pub fn new(kind: FormKind, id: RecordId, mode: DeliveryMode, body: Vec<u8>) -> Self {
        let etag = format!("\"{}\"", sha256_hex(&body));
        Self {
            body,
            content_type: PDF_CONTENT_TYPE,
            disposition: match mode {
                DeliveryMode::Download => Disposition::Attachment,
                _ => Disposition::Inline,
            },
            filename: download_name(kind, id),
            print: mode == DeliveryMode::PreviewPrint,
            etag,
        }
    }

    /// Value for the Content-Disposition header
    pub fn content_disposition(&self) -> String {
        let kind = match self.disposition {
            Disposition::Inline => "inline",
            Disposition::Attachment => "attachment",
        };
        format!("{kind}; filename=\"{}\"", self.filename)
    }
}

/// Suggested file name, e.g. `BP-Chart-7.pdf`
pub fn download_name(kind: FormKind, id: RecordId) -> String {
    format!("{}-{id}.pdf", kind.label())
}

fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
