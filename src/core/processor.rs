//! HTTP client for the slide-generation backend.
//!
//! The backend owns transcript fetching, document parsing, and slide
//! generation. This service only submits sources and decodes the
//! `{ success, slides, error }` envelope that comes back.

use crate::core::deck::{ProcessResponse, Slide};
use crate::core::template;
use crate::error::{Error, Result};
use serde::Deserialize;
use serde_json::json;
use std::env;
use std::path::Path;

pub const DEFAULT_BACKEND: &str = "http://localhost:5000";
pub const BACKEND_ENV: &str = "DECKGEN_BACKEND";

const DOCUMENT_EXTENSIONS: &[&str] = &["doc", "docx", "pdf", "txt"];

#[derive(Debug, Deserialize)]
struct HealthResponse {
    status: String,
    #[serde(default)]
    message: Option<String>,
}

#[derive(Clone)]
pub struct ProcessorService {
    client: reqwest::Client,
    base_url: String,
}

impl ProcessorService {
    /// Uses the `DECKGEN_BACKEND` environment variable when set, otherwise
    /// the default local backend.
    pub fn new() -> Self {
        let base_url = env::var(BACKEND_ENV)
            .ok()
            .filter(|url| !url.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_BACKEND.to_string());
        Self::with_base_url(&base_url)
    }

    pub fn with_base_url(base_url: &str) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.trim().trim_end_matches('/').to_string(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Submit a YouTube URL for transcription and slide generation.
    pub async fn process_video(&self, url: &str, template_id: &str) -> Result<Vec<Slide>> {
        let url = url.trim();
        if url.is_empty() {
            return Err(Error::custom("Please provide a YouTube URL"));
        }

        let body = json!({
            "youtubeUrl": url,
            "template": template_id,
            "templateFile": template::template_file(template_id),
        });
        log::debug!("POST {}/api/process-video", self.base_url);
        let response = self
            .client
            .post(format!("{}/api/process-video", self.base_url))
            .json(&body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Submit raw text for slide generation.
    pub async fn process_text(&self, text: &str, template_id: &str) -> Result<Vec<Slide>> {
        let text = text.trim();
        if text.is_empty() {
            return Err(Error::custom("Please enter some text"));
        }

        let body = json!({
            "text": text,
            "template": template_id,
            "templateFile": template::template_file(template_id),
        });
        log::debug!(
            "POST {}/api/process-text ({} chars)",
            self.base_url,
            text.len()
        );
        let response = self
            .client
            .post(format!("{}/api/process-text", self.base_url))
            .json(&body)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Upload a document (doc, docx, pdf or txt) for slide generation.
    pub async fn process_document(&self, path: &Path, template_id: &str) -> Result<Vec<Slide>> {
        let mime = document_mime(path)?;
        let data = tokio::fs::read(path).await?;
        let file_name = path
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or("document")
            .to_string();

        let part = reqwest::multipart::Part::bytes(data)
            .file_name(file_name)
            .mime_str(mime)?;
        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("template", template_id.to_string())
            .text("templateFile", template::template_file(template_id).to_string());

        log::debug!(
            "POST {}/api/process-document ({})",
            self.base_url,
            path.display()
        );
        let response = self
            .client
            .post(format!("{}/api/process-document", self.base_url))
            .multipart(form)
            .send()
            .await?;
        Self::decode(response).await
    }

    /// Ping the backend's health route.
    pub async fn health(&self) -> Result<String> {
        let response = self
            .client
            .get(format!("{}/", self.base_url))
            .send()
            .await?;
        let payload: HealthResponse = response.json().await?;
        Ok(match payload.message {
            Some(message) => format!("{} ({message})", payload.status),
            None => payload.status,
        })
    }

    async fn decode(response: reqwest::Response) -> Result<Vec<Slide>> {
        let status = response.status();
        let payload: ProcessResponse = match response.json().await {
            Ok(payload) => payload,
            // A failed backend may answer with a non-JSON error page.
            Err(_) if !status.is_success() => {
                return Err(Error::backend(format!("backend returned {status}")));
            }
            Err(err) => return Err(err.into()),
        };
        payload.into_slides()
    }
}

impl Default for ProcessorService {
    fn default() -> Self {
        Self::new()
    }
}

fn document_mime(path: &Path) -> Result<&'static str> {
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => Ok("application/pdf"),
        Some("doc") => Ok("application/msword"),
        Some("docx") => {
            Ok("application/vnd.openxmlformats-officedocument.wordprocessingml.document")
        }
        Some("txt") => Ok("text/plain"),
        _ => Err(Error::custom(format!(
            "Unsupported document type '{}' (expected one of: {})",
            path.display(),
            DOCUMENT_EXTENSIONS.join(", ")
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn trailing_slash_is_normalized() {
        let service = ProcessorService::with_base_url("http://localhost:5000/");
        assert_eq!(service.base_url(), "http://localhost:5000");
    }

    #[test]
    fn known_document_types_map_to_mimes() {
        assert_eq!(
            document_mime(&PathBuf::from("notes.pdf")).unwrap(),
            "application/pdf"
        );
        assert_eq!(
            document_mime(&PathBuf::from("NOTES.TXT")).unwrap(),
            "text/plain"
        );
        assert!(document_mime(&PathBuf::from("archive.zip")).is_err());
        assert!(document_mime(&PathBuf::from("no-extension")).is_err());
    }

    #[tokio::test]
    async fn blank_url_is_rejected_before_any_request() {
        // Port 9 is never contacted; validation fails first.
        let service = ProcessorService::with_base_url("http://127.0.0.1:9");
        let err = service.process_video("   ", "modern").await.unwrap_err();
        assert!(err.to_string().contains("YouTube URL"));
    }

    #[tokio::test]
    async fn blank_text_is_rejected_before_any_request() {
        let service = ProcessorService::with_base_url("http://127.0.0.1:9");
        let err = service.process_text("", "modern").await.unwrap_err();
        assert!(err.to_string().contains("enter some text"));
    }

    #[tokio::test]
    async fn unsupported_document_is_rejected_before_any_request() {
        let service = ProcessorService::with_base_url("http://127.0.0.1:9");
        let err = service
            .process_document(Path::new("slides.pptx"), "modern")
            .await
            .unwrap_err();
        assert!(err.to_string().contains("Unsupported document type"));
    }
}
