use crate::core::chunk::Chunker;
use crate::error::{Error, Result};
use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

/// One slide as returned by the backend.
///
/// The video pipeline emits the body under a `content` key while the text and
/// document pipelines use `text`; both land in [`Slide::text`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slide {
    pub heading: String,
    #[serde(default)]
    pub is_title: bool,
    #[serde(default, alias = "content")]
    pub text: String,
    /// Base64 image blob, possibly prefixed with a `data:` URI header.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template: Option<String>,
    /// Source position for video decks. The backend emits whole seconds;
    /// decoding turns them into an `MM:SS` label.
    #[serde(
        default,
        deserialize_with = "timestamp_label",
        skip_serializing_if = "Option::is_none"
    )]
    pub timestamp: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    Video,
    Text,
    Document,
}

impl SourceKind {
    pub fn label(&self) -> &'static str {
        match self {
            SourceKind::Video => "video",
            SourceKind::Text => "text",
            SourceKind::Document => "document",
        }
    }
}

/// A stored, named set of slides produced by one backend submission.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub id: String,
    pub name: String,
    pub source: SourceKind,
    pub source_label: String,
    pub template: String,
    pub created_at: DateTime<Local>,
    pub slides: Vec<Slide>,
}

impl Deck {
    pub fn new(
        name: &str,
        source: SourceKind,
        source_label: &str,
        template: &str,
        slides: Vec<Slide>,
    ) -> Self {
        Self {
            id: generate_deck_id(name),
            name: name.to_string(),
            source,
            source_label: source_label.to_string(),
            template: template.to_string(),
            created_at: Local::now(),
            slides,
        }
    }

    /// Per-slide template override, falling back to the deck template.
    pub fn template_for<'a>(&'a self, slide: &'a Slide) -> &'a str {
        slide.template.as_deref().unwrap_or(&self.template)
    }

    /// Number of physical pages an export of this deck produces.
    pub fn page_count(&self, chunker: &Chunker) -> usize {
        self.slides
            .iter()
            .map(|slide| {
                if slide.is_title {
                    1
                } else {
                    chunker.chunk(&slide.text).len()
                }
            })
            .sum()
    }
}

/// Wire shape of every submission endpoint's answer.
#[derive(Debug, Clone, Deserialize)]
pub struct ProcessResponse {
    pub success: bool,
    pub slides: Option<Vec<Slide>>,
    pub error: Option<String>,
}

impl ProcessResponse {
    /// Extract the slide list, mapping backend-reported failures and
    /// malformed answers to errors.
    pub fn into_slides(self) -> Result<Vec<Slide>> {
        if !self.success {
            let message = self
                .error
                .unwrap_or_else(|| "backend reported failure without detail".to_string());
            return Err(Error::backend(message));
        }

        self.slides
            .ok_or_else(|| Error::backend("response is missing the slide list"))
    }
}

/// Video timestamps arrive as integer seconds on the wire, while stored
/// decks already carry the formatted label. Accept both.
fn timestamp_label<'de, D>(deserializer: D) -> std::result::Result<Option<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Seconds(u64),
        Label(String),
    }

    Ok(Option::<Raw>::deserialize(deserializer)?.map(|raw| match raw {
        Raw::Seconds(total) => format!("{:02}:{:02}", total / 60, total % 60),
        Raw::Label(label) => label,
    }))
}

/// Derive a storage-safe identifier from a human deck name.
pub fn generate_deck_id(name: &str) -> String {
    let mut slug: String = name
        .trim()
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '-' })
        .collect();
    slug.truncate(40);
    let slug = slug.trim_matches('-');
    let slug = if slug.is_empty() { "deck" } else { slug };

    format!("{}-{}", slug, Local::now().format("%Y%m%d-%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn video_slides_decode_with_content_key() {
        let payload = r#"{
            "success": true,
            "slides": [
                {"heading": "Intro", "is_title": true, "text": ""},
                {"heading": "Point", "content": "Body text here.", "timestamp": 90, "image": "aGVsbG8="}
            ]
        }"#;

        let response: ProcessResponse = serde_json::from_str(payload).expect("decode");
        let slides = response.into_slides().expect("slides");

        assert_eq!(slides.len(), 2);
        assert!(slides[0].is_title);
        assert_eq!(slides[1].text, "Body text here.");
        assert_eq!(slides[1].timestamp.as_deref(), Some("01:30"));
    }

    #[test]
    fn numeric_timestamps_become_minute_labels() {
        let slide: Slide =
            serde_json::from_str(r#"{"heading": "H", "content": "", "timestamp": 135}"#)
                .expect("decode");
        assert_eq!(slide.timestamp.as_deref(), Some("02:15"));

        let slide: Slide =
            serde_json::from_str(r#"{"heading": "H", "content": "", "timestamp": 0}"#)
                .expect("decode");
        assert_eq!(slide.timestamp.as_deref(), Some("00:00"));
    }

    #[test]
    fn label_timestamps_survive_reload() {
        let slide = Slide {
            heading: "Point".to_string(),
            is_title: false,
            text: "Body.".to_string(),
            image: None,
            template: None,
            timestamp: Some("02:15".to_string()),
        };

        let json = serde_json::to_string(&slide).expect("encode");
        let back: Slide = serde_json::from_str(&json).expect("decode");
        assert_eq!(back.timestamp.as_deref(), Some("02:15"));
    }

    #[test]
    fn text_slides_decode_with_text_key() {
        let payload = r#"{"success": true, "slides": [{"heading": "H", "text": "A. B."}]}"#;
        let response: ProcessResponse = serde_json::from_str(payload).expect("decode");
        let slides = response.into_slides().expect("slides");

        assert_eq!(slides[0].text, "A. B.");
        assert!(!slides[0].is_title);
    }

    #[test]
    fn failure_response_carries_backend_message() {
        let payload = r#"{"success": false, "error": "unsupported file type"}"#;
        let response: ProcessResponse = serde_json::from_str(payload).expect("decode");

        let err = response.into_slides().unwrap_err();
        assert!(err.to_string().contains("unsupported file type"));
    }

    #[test]
    fn missing_slide_list_is_an_error() {
        let payload = r#"{"success": true}"#;
        let response: ProcessResponse = serde_json::from_str(payload).expect("decode");

        assert!(response.into_slides().is_err());
    }

    #[test]
    fn response_without_success_flag_fails_to_decode() {
        let payload = r#"{"slides": []}"#;
        assert!(serde_json::from_str::<ProcessResponse>(payload).is_err());
    }

    #[test]
    fn deck_ids_are_storage_safe() {
        let id = generate_deck_id("  My Fancy Deck!! ");
        assert!(id.starts_with("my-fancy-deck"));
        assert!(
            id.chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        );
    }

    #[test]
    fn empty_name_still_produces_an_id() {
        let id = generate_deck_id("???");
        assert!(id.starts_with("deck-"));
    }

    #[test]
    fn slide_template_override_wins() {
        let mut slide = Slide {
            heading: "H".to_string(),
            is_title: false,
            text: String::new(),
            image: None,
            template: None,
            timestamp: None,
        };
        let deck = Deck::new("demo", SourceKind::Text, "stdin", "modern", vec![]);

        assert_eq!(deck.template_for(&slide), "modern");
        slide.template = Some("digital-domination".to_string());
        assert_eq!(deck.template_for(&slide), "digital-domination");
    }
}
