use crate::core::chunk::Chunker;
use crate::core::deck::Deck;
use crate::core::export::page_heading;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent, MouseEventKind};
use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};

/// One display line of the gallery, pre-rendered from the deck so
/// scrolling never re-chunks slide text.
enum GalleryLine {
    Heading(String),
    Bullet(String),
    Text(String),
    Meta(String),
    Blank,
}

/// Page-by-page preview of a stored deck, laid out the way an export
/// paginates it.
pub struct DeckViewer {
    deck_name: String,
    lines: Vec<GalleryLine>,
    pub scroll: usize,
}

impl DeckViewer {
    pub fn new(deck: &Deck) -> Self {
        let chunker = Chunker::new();
        Self {
            deck_name: deck.name.clone(),
            lines: build_lines(deck, &chunker),
            scroll: 0,
        }
    }

    pub fn handle_key(&mut self, key: KeyEvent, area_height: usize) -> bool {
        let total = self.lines.len();
        let page_size = area_height.saturating_sub(2);
        match key.code {
            KeyCode::Up => {
                if self.scroll > 0 {
                    self.scroll -= 1;
                }
                true
            }
            KeyCode::Down => {
                if self.scroll < total.saturating_sub(page_size) {
                    self.scroll += 1;
                }
                true
            }
            KeyCode::PageUp => {
                self.scroll = self.scroll.saturating_sub(page_size);
                true
            }
            KeyCode::PageDown => {
                self.scroll = (self.scroll + page_size).min(total.saturating_sub(page_size));
                true
            }
            KeyCode::Home => {
                self.scroll = 0;
                true
            }
            KeyCode::End => {
                self.scroll = total.saturating_sub(page_size);
                true
            }
            _ => false,
        }
    }

    pub fn handle_mouse(&mut self, mouse: MouseEvent, area_height: usize) -> bool {
        let total = self.lines.len();
        let page_size = area_height.saturating_sub(2);
        match mouse.kind {
            MouseEventKind::ScrollUp => {
                self.scroll = self.scroll.saturating_sub(1);
                true
            }
            MouseEventKind::ScrollDown => {
                if self.scroll < total.saturating_sub(page_size) {
                    self.scroll += 1;
                }
                true
            }
            _ => false,
        }
    }

    pub fn render(&self, f: &mut Frame, area: Rect) {
        let visible_lines = area.height.saturating_sub(2) as usize;

        let lines: Vec<Line> = self
            .lines
            .iter()
            .skip(self.scroll)
            .take(visible_lines)
            .map(|line| match line {
                GalleryLine::Heading(text) => Line::from(Span::styled(
                    text.as_str(),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                )),
                GalleryLine::Bullet(text) => Line::from(Span::styled(
                    text.as_str(),
                    Style::default().fg(Color::Green),
                )),
                GalleryLine::Text(text) => Line::from(Span::raw(text.as_str())),
                GalleryLine::Meta(text) => Line::from(Span::styled(
                    text.as_str(),
                    Style::default().fg(Color::DarkGray),
                )),
                GalleryLine::Blank => Line::from(""),
            })
            .collect();

        let total_lines = self.lines.len();
        let scroll_info = if total_lines > visible_lines {
            format!(
                " (Line {}-{} of {})",
                self.scroll + 1,
                (self.scroll + visible_lines).min(total_lines),
                total_lines
            )
        } else {
            String::new()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .title(format!("Gallery: {}{scroll_info}", self.deck_name));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false });

        f.render_widget(paragraph, area);
    }
}

fn build_lines(deck: &Deck, chunker: &Chunker) -> Vec<GalleryLine> {
    let mut lines = Vec::new();

    for slide in &deck.slides {
        if !lines.is_empty() {
            lines.push(GalleryLine::Blank);
        }

        if slide.is_title {
            lines.push(GalleryLine::Heading(slide.heading.clone()));
            if !slide.text.trim().is_empty() {
                lines.push(GalleryLine::Text(slide.text.clone()));
            }
            if let Some(timestamp) = &slide.timestamp {
                lines.push(GalleryLine::Meta(format!("timestamp: {timestamp}")));
            }
            continue;
        }

        let chunks = chunker.chunk(&slide.text);
        if chunks.is_empty() {
            lines.push(GalleryLine::Heading(slide.heading.clone()));
            lines.push(GalleryLine::Meta("(no content)".to_string()));
            continue;
        }

        let total = chunks.len();
        for (index, chunk) in chunks.iter().enumerate() {
            if index > 0 {
                lines.push(GalleryLine::Blank);
            }
            lines.push(GalleryLine::Heading(page_heading(
                &slide.heading,
                index,
                total,
            )));
            for fragment in &chunk.fragments {
                lines.push(GalleryLine::Bullet(format!("• {fragment}")));
            }
        }
    }

    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deck::{Slide, SourceKind};

    fn deck(slides: Vec<Slide>) -> Deck {
        Deck::new("Sample", SourceKind::Text, "stdin", "modern", slides)
    }

    fn content(heading: &str, text: &str) -> Slide {
        Slide {
            heading: heading.to_string(),
            is_title: false,
            text: text.to_string(),
            image: None,
            template: None,
            timestamp: None,
        }
    }

    #[test]
    fn title_slide_shows_heading_text_and_timestamp() {
        let mut slide = content("Intro", "");
        slide.is_title = true;
        slide.text = "Welcome aboard".to_string();
        slide.timestamp = Some("00:12".to_string());

        let viewer = DeckViewer::new(&deck(vec![slide]));

        assert!(matches!(&viewer.lines[0], GalleryLine::Heading(h) if h == "Intro"));
        assert!(matches!(&viewer.lines[1], GalleryLine::Text(t) if t == "Welcome aboard"));
        assert!(matches!(&viewer.lines[2], GalleryLine::Meta(m) if m == "timestamp: 00:12"));
    }

    #[test]
    fn multi_chunk_slide_gets_numbered_headings() {
        let text = "A one. A two. A three. A four. A five. A six.";
        let viewer = DeckViewer::new(&deck(vec![content("Topic", text)]));

        let headings: Vec<&str> = viewer
            .lines
            .iter()
            .filter_map(|line| match line {
                GalleryLine::Heading(h) => Some(h.as_str()),
                _ => None,
            })
            .collect();
        assert_eq!(headings, vec!["Topic (1/2)", "Topic (2/2)"]);

        let bullets = viewer
            .lines
            .iter()
            .filter(|line| matches!(line, GalleryLine::Bullet(_)))
            .count();
        assert_eq!(bullets, 6);
    }

    #[test]
    fn empty_slide_is_marked_instead_of_dropped() {
        let viewer = DeckViewer::new(&deck(vec![content("Empty", "   ")]));

        assert!(matches!(&viewer.lines[0], GalleryLine::Heading(h) if h == "Empty"));
        assert!(matches!(&viewer.lines[1], GalleryLine::Meta(m) if m == "(no content)"));
    }

    #[test]
    fn scroll_stops_at_the_end() {
        let text = "A one. A two. A three. A four. A five. A six.";
        let mut viewer = DeckViewer::new(&deck(vec![content("Topic", text)]));

        viewer.handle_key(KeyEvent::from(KeyCode::End), 5);
        let expected = viewer.lines.len().saturating_sub(3);
        assert_eq!(viewer.scroll, expected);

        viewer.handle_key(KeyEvent::from(KeyCode::Down), 5);
        assert_eq!(viewer.scroll, expected, "Down past the end must not move");
    }
}
