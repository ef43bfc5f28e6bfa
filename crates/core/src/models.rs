use crate::error::ExtractError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::Path;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DocumentKind {
    Pdf,
    Image,
}

impl DocumentKind {
    pub fn from_extension(extension: &str) -> Option<Self> {
        match extension.to_ascii_lowercase().as_str() {
            "pdf" => Some(Self::Pdf),
            "png" | "jpg" | "jpeg" => Some(Self::Image),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Document {
    pub bytes: Vec<u8>,
    pub kind: DocumentKind,
    pub source_name: String,
}

impl Document {
    pub fn new(bytes: Vec<u8>, kind: DocumentKind, source_name: impl Into<String>) -> Self {
        Self {
            bytes,
            kind,
            source_name: source_name.into(),
        }
    }

    pub fn from_path(path: &Path) -> Result<Self, ExtractError> {
        let extension = path
            .extension()
            .and_then(|extension| extension.to_str())
            .unwrap_or_default();
        let kind = DocumentKind::from_extension(extension).ok_or_else(|| {
            ExtractError::UnsupportedFormat(format!(
                "{} is not a pdf, png, jpg, or jpeg file",
                path.display()
            ))
        })?;
        let bytes = fs::read(path)?;
        let source_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document")
            .to_string();
        Ok(Self::new(bytes, kind, source_name))
    }

    pub fn checksum(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(&self.bytes);
        format!("{:x}", hasher.finalize())
    }
}

#[derive(Debug, Clone, Copy)]
pub struct AnalysisOptions {
    pub chunk_chars: usize,
    pub summary_max_length: usize,
    pub summary_min_length: usize,
    pub answer_context_chars: usize,
    pub fallback_excerpt_chars: usize,
}

impl Default for AnalysisOptions {
    fn default() -> Self {
        Self {
            chunk_chars: 1000,
            summary_max_length: 130,
            summary_min_length: 30,
            answer_context_chars: 5000,
            fallback_excerpt_chars: 500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Answer {
    pub text: String,
    pub score: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DocumentReceipt {
    pub session_id: String,
    pub summary: String,
    pub checksum: String,
    pub ingested_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionAnswer {
    pub session_id: String,
    pub summary: String,
    pub question: String,
    pub answer: Answer,
}
