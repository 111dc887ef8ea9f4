//! Turns a stored deck into a PowerPoint file.
//!
//! Title slides map to a single page. Content slides are paginated through
//! [`Chunker`], one page per chunk, with the page counter appended to the
//! heading when a slide spans more than one page. Slide images ride along as
//! base64 data URLs and are attached to the first page only.

use crate::core::PptxWriter;
use crate::core::chunk::Chunker;
use crate::core::deck::{Deck, Slide};
use crate::core::template;
use crate::error::Result;
use base64::prelude::*;

/// File name used when no explicit output path is given.
pub const DEFAULT_EXPORT_NAME: &str = "presentation.pptx";

/// Image marker emitted by backend test fixtures, never decodable.
const PLACEHOLDER_IMAGE: &str = "test_image_data";

#[derive(Clone)]
pub struct ExportService {
    chunker: Chunker,
}

impl ExportService {
    pub fn new() -> Self {
        Self {
            chunker: Chunker::new(),
        }
    }

    pub fn with_max_bullets(max_bullets: usize) -> Self {
        Self {
            chunker: Chunker::with_max_bullets(max_bullets),
        }
    }

    /// Pages the deck will occupy once exported.
    pub fn page_count(&self, deck: &Deck) -> usize {
        deck.page_count(&self.chunker)
    }

    /// Render the deck to `.pptx` bytes.
    pub fn export(&self, deck: &Deck) -> Result<Vec<u8>> {
        let mut writer = PptxWriter::new(&deck.name);

        for slide in &deck.slides {
            let style = template::style_for(deck.template_for(slide));
            let mut image = decode_image(slide);

            if slide.is_title {
                writer.add_title_page(&slide.heading, image, style);
                continue;
            }

            let chunks = self.chunker.chunk(&slide.text);
            let total = chunks.len();
            for (index, chunk) in chunks.into_iter().enumerate() {
                let heading = page_heading(&slide.heading, index, total);
                let page_image = if index == 0 { image.take() } else { None };
                writer.add_content_page(&heading, chunk.fragments, page_image, style);
            }
        }

        writer.to_bytes()
    }
}

impl Default for ExportService {
    fn default() -> Self {
        Self::new()
    }
}

/// Heading for page `index` of `total`, numbered only when a slide spans
/// multiple pages.
pub fn page_heading(heading: &str, index: usize, total: usize) -> String {
    if total > 1 {
        format!("{heading} ({}/{})", index + 1, total)
    } else {
        heading.to_string()
    }
}

/// Decode a slide's image payload, tolerating a `data:...;base64,` prefix.
/// Undecodable payloads are skipped so a bad image never sinks the export.
fn decode_image(slide: &Slide) -> Option<Vec<u8>> {
    let data = slide.image.as_deref()?;
    if data.is_empty() || data == PLACEHOLDER_IMAGE {
        return None;
    }

    let encoded = match data.find("base64,") {
        Some(pos) => &data[pos + "base64,".len()..],
        None => data,
    };

    match BASE64_STANDARD.decode(encoded.trim()) {
        Ok(bytes) => Some(bytes),
        Err(err) => {
            log::warn!(
                "Skipping image on slide '{}': not valid base64 ({err})",
                slide.heading
            );
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deck::SourceKind;
    use std::io::{Cursor, Read};

    fn deck_with(slides: Vec<Slide>) -> Deck {
        Deck::new("Demo Deck", SourceKind::Text, "inline text", "modern", slides)
    }

    fn slide(heading: &str, text: &str) -> Slide {
        Slide {
            heading: heading.to_string(),
            is_title: false,
            text: text.to_string(),
            image: None,
            template: None,
            timestamp: None,
        }
    }

    fn title_slide(heading: &str) -> Slide {
        Slide {
            is_title: true,
            ..slide(heading, "")
        }
    }

    fn read_part(bytes: &[u8], name: &str) -> String {
        let mut archive =
            zip::ZipArchive::new(Cursor::new(bytes.to_vec())).expect("open archive");
        let mut part = archive.by_name(name).expect("part present");
        let mut content = String::new();
        part.read_to_string(&mut content).expect("read part");
        content
    }

    fn has_part(bytes: &[u8], name: &str) -> bool {
        let mut archive =
            zip::ZipArchive::new(Cursor::new(bytes.to_vec())).expect("open archive");
        archive.by_name(name).is_ok()
    }

    #[test]
    fn title_slide_becomes_one_centered_page() {
        let deck = deck_with(vec![title_slide("Grand Opening")]);
        let bytes = ExportService::new().export(&deck).expect("export");

        let slide_xml = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide_xml.contains("Grand Opening"));
        assert!(slide_xml.contains(r#"sz="4400""#));
        assert!(!has_part(&bytes, "ppt/slides/slide2.xml"));
    }

    #[test]
    fn single_chunk_keeps_plain_heading() {
        let deck = deck_with(vec![slide("Intro", "One point. Two points.")]);
        let bytes = ExportService::new().export(&deck).expect("export");

        let slide_xml = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide_xml.contains("<a:t>Intro</a:t>"));
        assert!(!slide_xml.contains("(1/1)"));
    }

    #[test]
    fn long_content_spans_numbered_pages() {
        // Six short fragments overflow the four-bullet page budget.
        let text = "A one. A two. A three. A four. A five. A six.";
        let deck = deck_with(vec![slide("Topic", text)]);
        let bytes = ExportService::new().export(&deck).expect("export");

        let first = read_part(&bytes, "ppt/slides/slide1.xml");
        let second = read_part(&bytes, "ppt/slides/slide2.xml");
        assert!(first.contains("Topic (1/2)"));
        assert!(second.contains("Topic (2/2)"));
        assert!(second.contains("A five."));
    }

    #[test]
    fn empty_content_slide_adds_no_pages() {
        let deck = deck_with(vec![slide("Hollow", "   "), title_slide("End")]);
        let bytes = ExportService::new().export(&deck).expect("export");

        let slide_xml = read_part(&bytes, "ppt/slides/slide1.xml");
        assert!(slide_xml.contains("End"));
        assert!(!has_part(&bytes, "ppt/slides/slide2.xml"));
    }

    #[test]
    fn placeholder_image_is_skipped() {
        let mut s = slide("Pic", "Something short.");
        s.image = Some(PLACEHOLDER_IMAGE.to_string());
        let bytes = ExportService::new()
            .export(&deck_with(vec![s]))
            .expect("export");

        assert!(!has_part(&bytes, "ppt/media/image1.png"));
    }

    #[test]
    fn data_url_prefix_is_stripped() {
        let encoded = BASE64_STANDARD.encode(b"\x89PNG\r\n\x1a\npixels");
        let mut s = slide("Pic", "Something short.");
        s.image = Some(format!("data:image/png;base64,{encoded}"));
        let bytes = ExportService::new()
            .export(&deck_with(vec![s]))
            .expect("export");

        assert!(has_part(&bytes, "ppt/media/image1.png"));
    }

    #[test]
    fn bad_image_data_does_not_fail_export() {
        let mut s = slide("Pic", "Something short.");
        s.image = Some("data:image/png;base64,@@not-base64@@".to_string());
        let bytes = ExportService::new()
            .export(&deck_with(vec![s]))
            .expect("export");

        assert!(has_part(&bytes, "ppt/slides/slide1.xml"));
        assert!(!has_part(&bytes, "ppt/media/image1.png"));
    }

    #[test]
    fn image_rides_on_first_page_only() {
        let encoded = BASE64_STANDARD.encode(b"\x89PNG\r\n\x1a\npixels");
        let text = "A one. A two. A three. A four. A five. A six.";
        let mut s = slide("Topic", text);
        s.image = Some(format!("data:image/png;base64,{encoded}"));
        let bytes = ExportService::new()
            .export(&deck_with(vec![s]))
            .expect("export");

        let first_rels = read_part(&bytes, "ppt/slides/_rels/slide1.xml.rels");
        let second_rels = read_part(&bytes, "ppt/slides/_rels/slide2.xml.rels");
        assert!(first_rels.contains("../media/image1.png"));
        assert!(!second_rels.contains("image1.png"));
    }

    #[test]
    fn custom_bullet_budget_changes_pagination() {
        let text = "A one. A two. A three. A four. A five. A six.";
        let deck = deck_with(vec![slide("Topic", text)]);

        let service = ExportService::with_max_bullets(6);
        assert_eq!(service.page_count(&deck), 1);
        let bytes = service.export(&deck).expect("export");
        assert!(!has_part(&bytes, "ppt/slides/slide2.xml"));
    }

    #[test]
    fn slide_template_override_styles_its_own_page() {
        let mut dark = slide("Dark", "One point.");
        dark.template = Some("digital-domination".to_string());
        let deck = deck_with(vec![slide("Light", "Other point."), dark]);
        let bytes = ExportService::new().export(&deck).expect("export");

        let first = read_part(&bytes, "ppt/slides/slide1.xml");
        let second = read_part(&bytes, "ppt/slides/slide2.xml");
        assert!(!first.contains("1A1A2E"));
        assert!(second.contains("1A1A2E"));
    }
}
