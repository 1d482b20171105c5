//! Content-type classification for uploaded artifacts.
//!
//! The default classifier derives the type purely from the filename suffix
//! (no magic-byte sniffing), defaulting to a generic binary type when the
//! suffix is unmatched. An unmatched suffix is a deliberate degradation, not
//! a hard failure. A stricter magic-byte classifier can be substituted
//! without touching the pipeline.

use serde::{Deserialize, Serialize};

/// Content-type classification of an uploaded artifact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ContentType {
    Pdf,
    Docx,
    /// Unknown binary, forwarded with a generic MIME type
    OctetStream,
}

impl ContentType {
    /// MIME type string sent to the upload endpoint and embedded in the
    /// generation request's file reference.
    pub fn mime(&self) -> &'static str {
        match self {
            ContentType::Pdf => "application/pdf",
            ContentType::Docx => "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
            ContentType::OctetStream => "application/octet-stream",
        }
    }
}

/// A trait for classifying uploaded artifacts.
///
/// In practise the [`SuffixClassifier`] is used, matching the filename
/// suffix; [`MagicByteClassifier`] inspects leading bytes instead and can be
/// swapped in where stricter classification is wanted.
pub trait ContentTypeClassifier: Send + Sync {
    fn classify(&self, file_name: &str, content: &[u8]) -> ContentType;
}

/// Classifies by case-insensitive filename suffix. Never fails; unmatched
/// suffixes degrade to [`ContentType::OctetStream`].
#[derive(Debug, Default)]
pub struct SuffixClassifier;

impl ContentTypeClassifier for SuffixClassifier {
    fn classify(&self, file_name: &str, _content: &[u8]) -> ContentType {
        let lower = file_name.to_lowercase();
        if lower.ends_with(".pdf") {
            ContentType::Pdf
        } else if lower.ends_with(".docx") {
            ContentType::Docx
        } else {
            ContentType::OctetStream
        }
    }
}

/// Classifies by leading magic bytes, ignoring the filename entirely.
///
/// PDF files start with `%PDF`; DOCX files are ZIP containers starting with
/// `PK\x03\x04`.
#[derive(Debug, Default)]
pub struct MagicByteClassifier;

impl ContentTypeClassifier for MagicByteClassifier {
    fn classify(&self, _file_name: &str, content: &[u8]) -> ContentType {
        if content.starts_with(b"%PDF") {
            ContentType::Pdf
        } else if content.starts_with(b"PK\x03\x04") {
            ContentType::Docx
        } else {
            ContentType::OctetStream
        }
    }
}
