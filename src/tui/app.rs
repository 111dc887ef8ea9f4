use crate::core::{
    Deck, ExportService, FileType, ProcessorService, SourceKind, StorageService,
    storage::FileEntry, template,
};
use crate::error::Result;
use crate::tui::components::{DeckViewer, FileList, InputField, ProgressBar};
use crate::tui::events::AppEvent;
use crossterm::event::{KeyCode, KeyEvent, MouseEvent};
use std::path::{Path, PathBuf};
use tokio::sync::mpsc;

#[derive(Debug, Clone, PartialEq)]
pub enum AppState {
    Home,
    NewDeck,
    Processing { source_label: String },
    Browser,
    Gallery { deck_id: String },
    Settings,
}

#[derive(Debug, Clone, PartialEq)]
pub enum FileFilter {
    All,
    Decks,
    Exports,
}

/// Form values collected on the New Deck screen.
#[derive(Debug, Clone)]
pub struct DeckRequest {
    pub source: SourceKind,
    pub input: String,
    pub name: Option<String>,
    pub template: &'static str,
}

pub struct App {
    pub state: AppState,
    pub should_quit: bool,

    // Home screen
    pub selected_option: usize,

    // New deck screen
    pub source_kind: SourceKind,
    pub url_input: InputField,
    pub text_input: InputField,
    pub path_input: InputField,
    pub name_input: InputField,
    pub selected_template: usize,
    pub input_focus: usize,

    // Browser screen
    pub file_list: FileList,
    pub search_input: InputField,
    pub filter: FileFilter,

    // Gallery screen
    pub deck_viewer: Option<DeckViewer>,
    pub viewer_height: u16,

    // Processing screen
    pub progress_bar: ProgressBar,

    // Services
    pub processor: ProcessorService,
    pub storage: StorageService,

    // Async communication
    pub processing_tx: Option<mpsc::UnboundedSender<String>>,
    pub processing_rx: Option<mpsc::UnboundedReceiver<String>>,
}

impl App {
    pub fn new(processor: ProcessorService, storage: StorageService) -> Self {
        let files = storage.list_files().unwrap_or_default();

        Self {
            state: AppState::Home,
            should_quit: false,

            selected_option: 0,

            source_kind: SourceKind::Video,
            url_input: InputField::new("Video URL", "https://youtu.be/..."),
            text_input: InputField::new("Text", "Paste the text to turn into slides"),
            path_input: InputField::new("Document", "notes.pdf"),
            name_input: InputField::new("Deck name", "Defaults to the first heading"),
            selected_template: 0,
            input_focus: 0,

            file_list: FileList::new(files),
            search_input: InputField::new("Search", "Filter files..."),
            filter: FileFilter::All,

            deck_viewer: None,
            viewer_height: 0,
            progress_bar: ProgressBar::new(),

            processor,
            storage,

            processing_tx: None,
            processing_rx: None,
        }
    }

    pub fn handle_event(&mut self, event: AppEvent) -> Result<()> {
        match event {
            AppEvent::Key(key) => {
                self.handle_key(key)?;
            }
            AppEvent::Mouse(mouse) => {
                self.handle_mouse(mouse);
            }
            AppEvent::Tick => {
                self.handle_tick()?;
            }
        }
        Ok(())
    }

    fn handle_key(&mut self, key: KeyEvent) -> Result<()> {
        match &self.state {
            AppState::Home => self.handle_home_key(key),
            AppState::NewDeck => self.handle_new_deck_key(key),
            AppState::Browser => self.handle_browser_key(key),
            AppState::Gallery { .. } => self.handle_gallery_key(key),
            AppState::Processing { .. } => self.handle_processing_key(key),
            AppState::Settings => self.handle_settings_key(key),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) {
        match &self.state {
            AppState::Browser => {
                self.file_list.handle_mouse(mouse);
            }
            AppState::Gallery { .. } => {
                if let Some(viewer) = &mut self.deck_viewer {
                    viewer.handle_mouse(mouse, self.viewer_height as usize);
                }
            }
            _ => {}
        }
    }

    fn handle_home_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Up => {
                if self.selected_option > 0 {
                    self.selected_option -= 1;
                }
            }
            KeyCode::Down => {
                if self.selected_option < 3 {
                    self.selected_option += 1;
                }
            }
            KeyCode::Char('1') => self.selected_option = 0,
            KeyCode::Char('2') => self.selected_option = 1,
            KeyCode::Char('3') => self.selected_option = 2,
            KeyCode::Char('4') => self.selected_option = 3,
            KeyCode::Char('q') => {
                self.should_quit = true;
            }
            KeyCode::Enter => match self.selected_option {
                0 => {
                    self.open_new_deck();
                }
                1 => {
                    self.filter = FileFilter::Decks;
                    self.apply_filter();
                    self.state = AppState::Browser;
                }
                2 => {
                    self.filter = FileFilter::Exports;
                    self.apply_filter();
                    self.state = AppState::Browser;
                }
                3 => {
                    self.state = AppState::Settings;
                }
                _ => {}
            },
            _ => {}
        }
        Ok(())
    }

    fn open_new_deck(&mut self) {
        self.url_input.clear();
        self.text_input.clear();
        self.path_input.clear();
        self.name_input.clear();
        self.input_focus = 0;
        self.set_input_focus();
        self.state = AppState::NewDeck;
    }

    fn handle_new_deck_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.state = AppState::Home;
            }
            KeyCode::Tab => {
                self.cycle_input_focus();
            }
            KeyCode::Enter => {
                if self.input_focus < 3 {
                    self.cycle_input_focus();
                } else {
                    self.start_processing();
                }
            }
            KeyCode::Left if self.input_focus == 0 => {
                self.previous_source();
            }
            KeyCode::Right | KeyCode::Char(' ') if self.input_focus == 0 => {
                self.next_source();
            }
            KeyCode::Left if self.input_focus == 3 => {
                self.previous_template();
            }
            KeyCode::Right | KeyCode::Char(' ') if self.input_focus == 3 => {
                self.next_template();
            }
            _ => match self.input_focus {
                1 => {
                    self.active_input_mut().handle_key(key);
                }
                2 => {
                    self.name_input.handle_key(key);
                }
                _ => {}
            },
        }
        Ok(())
    }

    fn handle_browser_key(&mut self, key: KeyEvent) -> Result<()> {
        if self.search_input.focused {
            match key.code {
                KeyCode::Esc => {
                    self.search_input.focused = false;
                    self.search_input.clear();
                    self.apply_filter();
                }
                KeyCode::Enter => {
                    self.search_input.focused = false;
                }
                _ => {
                    self.search_input.handle_key(key);
                    self.apply_search_filter();
                }
            }
            return Ok(());
        }

        match key.code {
            KeyCode::Esc => {
                self.state = AppState::Home;
            }
            KeyCode::Enter => {
                if let Some(file) = self.file_list.get_selected() {
                    let file = file.clone();
                    if let Err(err) = self.open_file(file) {
                        log::warn!("Could not open deck: {err}");
                    }
                }
            }
            KeyCode::Char('e') => {
                self.export_selected();
            }
            KeyCode::Delete => {
                self.delete_selected_files()?;
            }
            KeyCode::Char('/') => {
                self.search_input.focused = true;
            }
            KeyCode::Char('1') => {
                self.filter = FileFilter::All;
                self.apply_filter();
            }
            KeyCode::Char('2') => {
                self.filter = FileFilter::Decks;
                self.apply_filter();
            }
            KeyCode::Char('3') => {
                self.filter = FileFilter::Exports;
                self.apply_filter();
            }
            _ => {
                self.file_list.handle_key(key);
            }
        }
        Ok(())
    }

    fn handle_gallery_key(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Esc => {
                self.deck_viewer = None;
                self.state = AppState::Browser;
            }
            KeyCode::Char('e') => {
                if let AppState::Gallery { deck_id } = &self.state {
                    self.start_export_task(deck_id.clone());
                }
            }
            _ => {
                if let Some(viewer) = &mut self.deck_viewer {
                    viewer.handle_key(key, self.viewer_height as usize);
                }
            }
        }
        Ok(())
    }

    fn handle_processing_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Esc {
            // Leaves the progress screen; the background task keeps running.
            self.state = AppState::NewDeck;
            self.progress_bar.reset();
        }
        Ok(())
    }

    fn handle_settings_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.code == KeyCode::Esc {
            self.state = AppState::Home;
        }
        Ok(())
    }

    fn handle_tick(&mut self) -> Result<()> {
        // Drain messages from background tasks
        let mut messages = Vec::new();
        if let Some(rx) = &mut self.processing_rx {
            while let Ok(message) = rx.try_recv() {
                messages.push(message);
            }
        }

        for message in messages {
            if message.starts_with("PROGRESS:") {
                if let Ok(progress) = message.trim_start_matches("PROGRESS:").parse::<f64>() {
                    self.progress_bar.set_progress(progress);
                }
            } else if message.starts_with("STATUS:") {
                let status = message.trim_start_matches("STATUS:").to_string();
                self.progress_bar.set_message(status);
            } else if message.starts_with("LOG:") {
                let log = message.trim_start_matches("LOG:").to_string();
                self.progress_bar.add_log(log);
            } else if message.starts_with("ERROR:") {
                let error = message.trim_start_matches("ERROR:").to_string();
                self.progress_bar.add_log(error.clone());
                self.progress_bar.set_message(format!("Error: {error}"));
            } else if message.starts_with("COMPLETE:") {
                let deck_id = message.trim_start_matches("COMPLETE:").to_string();
                self.finish_task(&deck_id);
            }
        }
        Ok(())
    }

    /// A background task finished: refresh the listing and highlight the
    /// deck it produced.
    fn finish_task(&mut self, deck_id: &str) {
        if matches!(self.state, AppState::Processing { .. }) {
            self.filter = FileFilter::Decks;
            self.progress_bar.reset();
            self.state = AppState::Browser;
        }
        self.apply_search_filter();
        self.file_list.select_named(deck_id);
    }

    fn cycle_input_focus(&mut self) {
        self.input_focus = (self.input_focus + 1) % 4;
        self.set_input_focus();
    }

    fn set_input_focus(&mut self) {
        self.url_input.focused = false;
        self.text_input.focused = false;
        self.path_input.focused = false;
        self.name_input.focused = false;

        match self.input_focus {
            1 => self.active_input_mut().focused = true,
            2 => self.name_input.focused = true,
            _ => {}
        }
    }

    /// The source field matching the selected source kind.
    fn active_input_mut(&mut self) -> &mut InputField {
        match self.source_kind {
            SourceKind::Video => &mut self.url_input,
            SourceKind::Text => &mut self.text_input,
            SourceKind::Document => &mut self.path_input,
        }
    }

    fn next_source(&mut self) {
        self.source_kind = match self.source_kind {
            SourceKind::Video => SourceKind::Text,
            SourceKind::Text => SourceKind::Document,
            SourceKind::Document => SourceKind::Video,
        };
        self.set_input_focus();
    }

    fn previous_source(&mut self) {
        self.source_kind = match self.source_kind {
            SourceKind::Video => SourceKind::Document,
            SourceKind::Text => SourceKind::Video,
            SourceKind::Document => SourceKind::Text,
        };
        self.set_input_focus();
    }

    fn next_template(&mut self) {
        self.selected_template = (self.selected_template + 1) % template::catalog().len();
    }

    fn previous_template(&mut self) {
        let count = template::catalog().len();
        self.selected_template = (self.selected_template + count - 1) % count;
    }

    fn start_processing(&mut self) {
        let input = match self.source_kind {
            SourceKind::Video => &self.url_input,
            SourceKind::Text => &self.text_input,
            SourceKind::Document => &self.path_input,
        };
        if !input.is_valid() {
            return;
        }

        let name = self.name_input.value.trim();
        let request = DeckRequest {
            source: self.source_kind,
            input: input.value.trim().to_string(),
            name: if name.is_empty() {
                None
            } else {
                Some(name.to_string())
            },
            template: template::catalog()[self.selected_template].id,
        };

        let source_label = match request.source {
            SourceKind::Text => "text input".to_string(),
            _ => request.input.clone(),
        };

        self.state = AppState::Processing {
            source_label: source_label.clone(),
        };
        self.progress_bar.reset();
        self.progress_bar.set_message("Starting...".to_string());

        if let Some(tx) = &self.processing_tx {
            self.start_real_processing(request, source_label, tx.clone());
        }
    }

    fn start_real_processing(
        &self,
        request: DeckRequest,
        source_label: String,
        tx: mpsc::UnboundedSender<String>,
    ) {
        // Clone the services for the async task
        let processor = self.processor.clone();
        let storage = self.storage.clone();

        tokio::spawn(async move {
            let _ = tx.send("STATUS:Checking backend...".to_string());
            let _ = tx.send("PROGRESS:0.1".to_string());

            match processor.health().await {
                Ok(status) => {
                    let _ = tx.send(format!("LOG:Backend: {status}"));
                }
                Err(err) => {
                    let _ = tx.send(format!("LOG:Health check failed: {err}"));
                    let _ = tx.send(format!(
                        "ERROR:Backend unreachable at {}",
                        processor.base_url()
                    ));
                    return;
                }
            }

            let _ = tx.send("STATUS:Submitting source...".to_string());
            let _ = tx.send("PROGRESS:0.2".to_string());
            let _ = tx.send(format!("LOG:Submitting {}...", request.source.label()));

            let result = match request.source {
                SourceKind::Video => {
                    processor
                        .process_video(&request.input, request.template)
                        .await
                }
                SourceKind::Text => {
                    processor
                        .process_text(&request.input, request.template)
                        .await
                }
                SourceKind::Document => {
                    processor
                        .process_document(Path::new(&request.input), request.template)
                        .await
                }
            };

            let slides = match result {
                Ok(slides) => slides,
                Err(err) => {
                    let _ = tx.send(format!("LOG:Processing failed: {err}"));
                    let _ = tx.send(format!("ERROR:{err}"));
                    return;
                }
            };

            let _ = tx.send("PROGRESS:0.7".to_string());
            let _ = tx.send(format!("LOG:Received {} slides", slides.len()));
            let _ = tx.send("STATUS:Saving deck...".to_string());

            let name = request
                .name
                .or_else(|| slides.first().map(|slide| slide.heading.clone()))
                .unwrap_or_else(|| source_label.clone());
            let deck = Deck::new(&name, request.source, &source_label, request.template, slides);

            match storage.save_deck(&deck).await {
                Ok(path) => {
                    let _ = tx.send("PROGRESS:1.0".to_string());
                    let _ = tx.send(format!("LOG:Deck saved to {}", path.display()));
                    let _ = tx.send("STATUS:Completed".to_string());
                    let _ = tx.send(format!("COMPLETE:{}", deck.id));
                }
                Err(err) => {
                    let _ = tx.send(format!("LOG:Error saving deck: {err}"));
                    let _ = tx.send(format!("ERROR:{err}"));
                }
            }
        });
    }

    /// Render a stored deck to .pptx next to its JSON copy.
    fn start_export_task(&self, deck_id: String) {
        if let Some(tx) = &self.processing_tx {
            let tx = tx.clone();
            let storage = self.storage.clone();

            tokio::spawn(async move {
                let result: Result<PathBuf> = async {
                    let deck = storage.load_deck(&deck_id).await?;
                    let bytes = ExportService::new().export(&deck)?;
                    storage.save_export(&deck.id, &bytes).await
                }
                .await;

                match result {
                    Ok(path) => {
                        let _ = tx.send(format!("LOG:Exported to {}", path.display()));
                        let _ = tx.send(format!("COMPLETE:{deck_id}"));
                    }
                    Err(err) => {
                        let _ = tx.send(format!("LOG:Export failed: {err}"));
                        let _ = tx.send(format!("ERROR:{err}"));
                    }
                }
            });
        }
    }

    fn export_selected(&mut self) {
        let deck_id = match self.file_list.get_selected() {
            Some(file) if file.file_type == FileType::Deck => file.deck_id(),
            _ => None,
        };

        if let Some(deck_id) = deck_id {
            self.start_export_task(deck_id);
        }
    }

    fn apply_filter(&mut self) {
        let all_files = self.storage.list_files().unwrap_or_default();
        let filtered_files: Vec<FileEntry> = all_files
            .into_iter()
            .filter(|file| match self.filter {
                FileFilter::All => true,
                FileFilter::Decks => file.file_type == FileType::Deck,
                FileFilter::Exports => file.file_type == FileType::Export,
            })
            .collect();

        self.file_list.update_items(filtered_files);
    }

    fn apply_search_filter(&mut self) {
        let search_term = self.search_input.value.to_lowercase();
        if search_term.is_empty() {
            self.apply_filter();
            return;
        }

        let all_files = self.storage.list_files().unwrap_or_default();
        let filtered_files: Vec<FileEntry> = all_files
            .into_iter()
            .filter(|file| {
                let matches_filter = match self.filter {
                    FileFilter::All => true,
                    FileFilter::Decks => file.file_type == FileType::Deck,
                    FileFilter::Exports => file.file_type == FileType::Export,
                };

                let matches_search = file.name.to_lowercase().contains(&search_term);

                matches_filter && matches_search
            })
            .collect();

        self.file_list.update_items(filtered_files);
    }

    fn open_file(&mut self, file: FileEntry) -> Result<()> {
        // Only deck files open in the gallery; exports are opaque binaries.
        if file.file_type != FileType::Deck {
            return Ok(());
        }

        let content = std::fs::read_to_string(&file.path)?;
        let deck: Deck = serde_json::from_str(&content)?;
        self.deck_viewer = Some(DeckViewer::new(&deck));
        self.state = AppState::Gallery { deck_id: deck.id };
        Ok(())
    }

    fn delete_selected_files(&mut self) -> Result<()> {
        let paths: Vec<PathBuf> = {
            let marked = self.file_list.get_selected_items();
            if marked.is_empty() {
                // Nothing checkbox-marked: delete the highlighted entry.
                self.file_list
                    .get_selected()
                    .map(|file| file.path.clone())
                    .into_iter()
                    .collect()
            } else {
                marked.into_iter().map(|file| file.path.clone()).collect()
            }
        };

        for path in paths {
            self.storage.delete_file(&path)?;
        }
        self.apply_search_filter();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deck::Slide;
    use tempfile::TempDir;

    fn app_with_channel(dir: &TempDir) -> App {
        let processor = ProcessorService::with_base_url("http://127.0.0.1:9");
        let storage = StorageService::with_root(dir.path());
        let mut app = App::new(processor, storage);

        let (tx, rx) = mpsc::unbounded_channel();
        app.processing_tx = Some(tx);
        app.processing_rx = Some(rx);
        app
    }

    fn send(app: &App, message: &str) {
        app.processing_tx
            .as_ref()
            .expect("channel")
            .send(message.to_string())
            .expect("send");
    }

    #[tokio::test]
    async fn progress_messages_drive_the_progress_bar() {
        let dir = TempDir::new().expect("tempdir");
        let mut app = app_with_channel(&dir);

        send(&app, "PROGRESS:0.5");
        send(&app, "STATUS:Submitting source...");
        send(&app, "LOG:Backend: ok");
        app.handle_tick().expect("tick");

        assert_eq!(app.progress_bar.progress, 0.5);
        assert_eq!(app.progress_bar.message, "Submitting source...");
        assert!(app.progress_bar.logs[0].contains("Backend: ok"));
    }

    #[tokio::test]
    async fn complete_switches_to_browser_and_selects_the_deck() {
        let dir = TempDir::new().expect("tempdir");
        let mut app = app_with_channel(&dir);

        let deck = Deck::new(
            "Fresh deck",
            SourceKind::Text,
            "text input",
            "modern",
            vec![Slide {
                heading: "Fresh deck".to_string(),
                is_title: true,
                text: String::new(),
                image: None,
                template: None,
                timestamp: None,
            }],
        );
        app.storage.save_deck(&deck).await.expect("save");

        app.state = AppState::Processing {
            source_label: "text input".to_string(),
        };
        send(&app, &format!("COMPLETE:{}", deck.id));
        app.handle_tick().expect("tick");

        assert_eq!(app.state, AppState::Browser);
        assert_eq!(app.filter, FileFilter::Decks);
        let selected = app.file_list.get_selected().expect("selection");
        assert_eq!(selected.deck_id().as_deref(), Some(deck.id.as_str()));
    }

    #[tokio::test]
    async fn error_keeps_the_processing_screen() {
        let dir = TempDir::new().expect("tempdir");
        let mut app = app_with_channel(&dir);

        app.state = AppState::Processing {
            source_label: "https://youtu.be/abc".to_string(),
        };
        send(&app, "ERROR:Backend unreachable at http://127.0.0.1:9");
        app.handle_tick().expect("tick");

        assert!(matches!(app.state, AppState::Processing { .. }));
        assert!(app.progress_bar.message.starts_with("Error:"));
    }

    #[tokio::test]
    async fn source_and_template_selectors_wrap() {
        let dir = TempDir::new().expect("tempdir");
        let mut app = app_with_channel(&dir);

        app.next_source();
        app.next_source();
        app.next_source();
        assert_eq!(app.source_kind, SourceKind::Video);

        app.previous_template();
        assert_eq!(app.selected_template, template::catalog().len() - 1);
        app.next_template();
        assert_eq!(app.selected_template, 0);
    }

    #[tokio::test]
    async fn blank_source_input_never_leaves_the_form() {
        let dir = TempDir::new().expect("tempdir");
        let mut app = app_with_channel(&dir);

        app.open_new_deck();
        app.input_focus = 3;
        app.start_processing();

        assert_eq!(app.state, AppState::NewDeck);
    }
}
