use crate::error::ExtractError;
use crate::models::{Document, DocumentKind};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use lopdf::Document as PdfDocument;
use serde::{Deserialize, Serialize};

const OCR_ENDPOINT_VAR: &str = "OCR_ENDPOINT";
const OCR_API_KEY_VAR: &str = "OCR_API_KEY";

pub trait TextExtractor: Send + Sync {
    fn extract(&self, document: &Document) -> Result<String, ExtractError>;
}

#[derive(Debug, Clone)]
pub struct OcrEndpoint {
    pub url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Default)]
pub struct DocumentTextExtractor {
    ocr: Option<OcrEndpoint>,
}

impl DocumentTextExtractor {
    pub fn new(ocr: Option<OcrEndpoint>) -> Self {
        Self { ocr }
    }

    pub fn from_env() -> Self {
        Self::new(ocr_endpoint_from_env())
    }
}

impl TextExtractor for DocumentTextExtractor {
    fn extract(&self, document: &Document) -> Result<String, ExtractError> {
        match document.kind {
            DocumentKind::Pdf => extract_pdf_text(&document.bytes),
            DocumentKind::Image => match &self.ocr {
                Some(endpoint) => recognize_image_text(document, endpoint),
                None => Err(ExtractError::OcrFailed(format!(
                    "no OCR endpoint configured; set {OCR_ENDPOINT_VAR}"
                ))),
            },
        }
    }
}

pub fn extract_pdf_text(bytes: &[u8]) -> Result<String, ExtractError> {
    let document =
        PdfDocument::load_mem(bytes).map_err(|error| ExtractError::PdfParse(error.to_string()))?;

    let mut text = String::new();
    for (page_number, _object_id) in document.get_pages() {
        let page_text = document
            .extract_text(&[page_number])
            .map_err(|error| ExtractError::PdfParse(error.to_string()))?;
        text.push_str(&page_text);
    }
    Ok(text)
}

fn ocr_endpoint_from_env() -> Option<OcrEndpoint> {
    let url = std::env::var(OCR_ENDPOINT_VAR).ok()?;
    let url = url.trim().to_string();
    if url.is_empty() {
        return None;
    }
    let api_key = std::env::var(OCR_API_KEY_VAR).ok().and_then(|value| {
        let key = value.trim().to_string();
        if key.is_empty() {
            None
        } else {
            Some(key)
        }
    });
    Some(OcrEndpoint { url, api_key })
}

#[derive(Debug, Serialize)]
struct OcrRequest {
    image_base64: String,
    source_name: String,
}

#[derive(Debug, Deserialize)]
struct OcrResponse {
    text: Option<String>,
}

fn recognize_image_text(
    document: &Document,
    endpoint: &OcrEndpoint,
) -> Result<String, ExtractError> {
    tokio::task::block_in_place(|| recognize_image_text_blocking(document, endpoint))
}

fn recognize_image_text_blocking(
    document: &Document,
    endpoint: &OcrEndpoint,
) -> Result<String, ExtractError> {
    let payload = OcrRequest {
        image_base64: BASE64.encode(&document.bytes),
        source_name: document.source_name.clone(),
    };

    let mut request = reqwest::blocking::Client::new()
        .post(&endpoint.url)
        .header("content-type", "application/json")
        .json(&payload);

    if let Some(api_key) = &endpoint.api_key {
        request = request.bearer_auth(api_key);
    }

    let response = request.send()?;
    if !response.status().is_success() {
        return Err(ExtractError::OcrFailed(format!(
            "OCR request to {} returned {}",
            endpoint.url,
            response.status()
        )));
    }

    let body: OcrResponse = response.json()?;
    recognized_text(&body)
}

fn recognized_text(body: &OcrResponse) -> Result<String, ExtractError> {
    match &body.text {
        Some(text) if !text.trim().is_empty() => Ok(text.clone()),
        _ => Err(ExtractError::OcrFailed(
            "OCR response carries no readable text".to_string(),
        )),
    }
}
