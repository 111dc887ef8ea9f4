use crate::core::{SourceKind, template};
use crate::tui::app::{App, AppState, FileFilter};
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
};

pub fn draw(f: &mut Frame, app: &mut App) {
    match &app.state {
        AppState::Home => draw_home(f, app),
        AppState::NewDeck => draw_new_deck(f, app),
        AppState::Processing { source_label } => draw_processing(f, app, source_label),
        AppState::Browser => draw_browser(f, app),
        AppState::Gallery { .. } => draw_gallery(f, app),
        AppState::Settings => draw_settings(f, app),
    }
}

fn draw_home(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(1),    // Menu
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    // Title
    let title = Paragraph::new("deckgen")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    // Menu options
    let options = [
        "● New Deck",
        "○ Browse Decks",
        "○ Browse Exports",
        "○ Settings",
    ];

    let menu_items: Vec<ListItem> = options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let style = if i == app.selected_option {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let text = if i == app.selected_option {
                option.replace("○", "●")
            } else {
                option.replace("●", "○")
            };

            ListItem::new(Line::from(Span::styled(text, style)))
        })
        .collect();

    let menu = List::new(menu_items)
        .block(Block::default().borders(Borders::ALL).title("Mode"))
        .style(Style::default().fg(Color::White));
    f.render_widget(menu, chunks[1]);

    // Help
    let help = Paragraph::new("[↑↓] Navigate  [Enter] Select  [q] Exit")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn selector_border(focused: bool) -> Style {
    if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    }
}

fn draw_new_deck(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Length(3), // Source selector
            Constraint::Length(3), // Source input
            Constraint::Length(3), // Deck name
            Constraint::Length(4), // Template selector
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    // Title
    let title = Paragraph::new("New Deck")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    // Source selector
    let marker = |kind: SourceKind| {
        if app.source_kind == kind {
            "●"
        } else {
            "○"
        }
    };
    let source_row = format!(
        "{} Video   {} Text   {} Document",
        marker(SourceKind::Video),
        marker(SourceKind::Text),
        marker(SourceKind::Document)
    );
    let source_selector = Paragraph::new(source_row).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Source")
            .border_style(selector_border(app.input_focus == 0)),
    );
    f.render_widget(source_selector, chunks[1]);

    // Source input for the selected kind
    match app.source_kind {
        SourceKind::Video => app.url_input.render(f, chunks[2]),
        SourceKind::Text => app.text_input.render(f, chunks[2]),
        SourceKind::Document => app.path_input.render(f, chunks[2]),
    }

    // Deck name
    app.name_input.render(f, chunks[3]);

    // Template selector
    let entry = template::catalog()[app.selected_template];
    let template_lines = vec![
        Line::from(format!("◀ {} ▶", entry.name)),
        Line::from(Span::styled(
            format!("{}: {}", entry.category, entry.description),
            Style::default().fg(Color::DarkGray),
        )),
    ];
    let template_selector = Paragraph::new(template_lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title("Template")
            .border_style(selector_border(app.input_focus == 3)),
    );
    f.render_widget(template_selector, chunks[4]);

    // Help
    let help = Paragraph::new("[Tab] Next  [←→] Change  [Enter] Submit  [Esc] Back")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[5]);
}

fn draw_processing(f: &mut Frame, app: &App, source_label: &str) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(1),    // Progress area
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    // Title
    let title = Paragraph::new("Processing...")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    // Progress area
    app.progress_bar.render(f, chunks[1], source_label);

    // Help
    let help = Paragraph::new("[Esc] Back to form")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}

fn draw_browser(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(20), Constraint::Min(1)])
        .split(f.area());

    let left_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(6), // Filters
            Constraint::Length(3), // Search
        ])
        .split(chunks[0]);

    // Filter panel
    let filter_options = ["● All", "○ Decks", "○ Exports"];
    let filter_items: Vec<ListItem> = filter_options
        .iter()
        .enumerate()
        .map(|(i, option)| {
            let is_selected = matches!(
                (&app.filter, i),
                (FileFilter::All, 0) | (FileFilter::Decks, 1) | (FileFilter::Exports, 2)
            );

            let style = if is_selected {
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::White)
            };

            let text = if is_selected {
                option.replace("○", "●")
            } else {
                option.replace("●", "○")
            };

            ListItem::new(Line::from(Span::styled(text, style)))
        })
        .collect();

    let filters =
        List::new(filter_items).block(Block::default().borders(Borders::ALL).title("Filters"));
    f.render_widget(filters, left_chunks[0]);

    // Search
    app.search_input.render(f, left_chunks[1]);

    // File list
    let right_chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(chunks[1]);

    app.file_list.render(f, right_chunks[0], "Files");

    // Help
    let help = Paragraph::new(
        "[Enter] Open  [e] Export  [Del] Delete  [Space] Mark  [/] Search  [1-3] Filter",
    )
    .style(Style::default().fg(Color::Gray))
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, right_chunks[1]);
}

fn draw_gallery(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .split(f.area());

    // Slide preview
    if let Some(viewer) = &mut app.deck_viewer {
        app.viewer_height = chunks[0].height;
        viewer.render(f, chunks[0]);
    }

    // Help
    let help = Paragraph::new("[↑↓] Scroll  [PgUp/PgDn] Page  [e] Export  [Esc] Back")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[1]);
}

fn draw_settings(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title
            Constraint::Min(1),    // Settings content
            Constraint::Length(3), // Help
        ])
        .split(f.area());

    // Title
    let title = Paragraph::new("Settings")
        .style(
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
        )
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(title, chunks[0]);

    // Read-only for now; the backend is set via --backend or DECKGEN_BACKEND.
    let lines = vec![
        Line::from(format!("Backend:   {}", app.processor.base_url())),
        Line::from("Storage:   ./decks and ./exports"),
        Line::from(format!("Templates: {}", template::catalog().len())),
        Line::from(format!("Version:   {}", env!("CARGO_PKG_VERSION"))),
    ];
    let settings_content = Paragraph::new(lines)
        .style(Style::default().fg(Color::White))
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(settings_content, chunks[1]);

    // Help
    let help = Paragraph::new("[Esc] Back")
        .style(Style::default().fg(Color::Gray))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(help, chunks[2]);
}
