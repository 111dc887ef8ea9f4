mod cli;
mod core;
mod error;
mod tui;

use crate::cli::{Cli, Commands};
use crate::core::{
    Chunker, DEFAULT_EXPORT_NAME, Deck, ExportService, FileType, ProcessorService, Slide,
    SourceKind, StorageService, template,
};
use crate::error::Result;
use crate::tui::{App, EventHandler, Tui, init as tui_init, restore as tui_restore, ui};
use clap::Parser;
use crossterm::tty::IsTty;
use std::path::PathBuf;
use tokio::sync::mpsc;

#[tokio::main]
async fn main() {
    env_logger::init();
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        log::error!("{err:?}");
        eprintln!("Error: {err}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let processor = match cli.backend.as_deref() {
        Some(url) => ProcessorService::with_base_url(url),
        None => ProcessorService::new(),
    };
    let storage = StorageService::new();

    match cli.command {
        Some(Commands::Video {
            url,
            template,
            name,
        }) => {
            run_cli_video(&processor, &storage, url, template, name).await?;
        }
        Some(Commands::Text {
            file,
            template,
            name,
        }) => {
            run_cli_text(&processor, &storage, file, template, name).await?;
        }
        Some(Commands::Document {
            path,
            template,
            name,
        }) => {
            run_cli_document(&processor, &storage, path, template, name).await?;
        }
        Some(Commands::Export {
            deck,
            output,
            max_bullets,
        }) => {
            run_cli_export(&storage, deck, output, max_bullets).await?;
        }
        Some(Commands::List) => {
            run_cli_list(&storage)?;
        }
        Some(Commands::Show { deck }) => {
            run_cli_show(&storage, deck).await?;
        }
        Some(Commands::Delete { deck }) => {
            run_cli_delete(&storage, deck)?;
        }
        Some(Commands::Templates) => {
            run_cli_templates();
        }
        Some(Commands::Tui) | None => {
            if cli.cli {
                println!("Use 'deckgen --help' for available commands");
            } else {
                run_tui(processor, storage).await?;
            }
        }
    }

    Ok(())
}

/// Fall back to the default template for unknown ids, with a notice.
fn resolve_template(requested: &str) -> &'static str {
    let resolved = template::resolve(requested);
    if resolved.id != requested {
        println!("Unknown template '{requested}', using '{}'", resolved.id);
    }
    resolved.id
}

async fn save_deck(
    storage: &StorageService,
    slides: Vec<Slide>,
    source: SourceKind,
    source_label: &str,
    template_id: &str,
    name: Option<String>,
) -> Result<()> {
    let name = name
        .or_else(|| slides.first().map(|slide| slide.heading.clone()))
        .unwrap_or_else(|| source_label.to_string());

    let deck = Deck::new(&name, source, source_label, template_id, slides);
    let path = storage.save_deck(&deck).await?;

    println!("Deck '{}' saved with {} slides", deck.id, deck.slides.len());
    println!("Stored at: {}", path.display());
    println!("Export it with: deckgen export {}", deck.id);

    Ok(())
}

async fn run_cli_video(
    processor: &ProcessorService,
    storage: &StorageService,
    url: String,
    template: String,
    name: Option<String>,
) -> Result<()> {
    let template_id = resolve_template(&template);

    println!("Submitting video to {}", processor.base_url());
    let slides = processor.process_video(&url, template_id).await?;

    save_deck(storage, slides, SourceKind::Video, &url, template_id, name).await
}

async fn run_cli_text(
    processor: &ProcessorService,
    storage: &StorageService,
    file: Option<PathBuf>,
    template: String,
    name: Option<String>,
) -> Result<()> {
    let template_id = resolve_template(&template);

    let (text, source_label) = match file {
        Some(path) => {
            let content = tokio::fs::read_to_string(&path).await?;
            (content, path.display().to_string())
        }
        None => {
            if std::io::stdin().is_tty() {
                println!("Reading text from stdin (finish with Ctrl-D)...");
            }
            let content = std::io::read_to_string(std::io::stdin())?;
            (content, "stdin".to_string())
        }
    };

    println!("Submitting text to {}", processor.base_url());
    let slides = processor.process_text(&text, template_id).await?;

    save_deck(
        storage,
        slides,
        SourceKind::Text,
        &source_label,
        template_id,
        name,
    )
    .await
}

async fn run_cli_document(
    processor: &ProcessorService,
    storage: &StorageService,
    path: PathBuf,
    template: String,
    name: Option<String>,
) -> Result<()> {
    let template_id = resolve_template(&template);

    println!("Uploading {} to {}", path.display(), processor.base_url());
    let slides = processor.process_document(&path, template_id).await?;

    let label = path.display().to_string();
    save_deck(
        storage,
        slides,
        SourceKind::Document,
        &label,
        template_id,
        name,
    )
    .await
}

async fn run_cli_export(
    storage: &StorageService,
    deck_id: String,
    output: Option<PathBuf>,
    max_bullets: usize,
) -> Result<()> {
    let deck = storage.load_deck(&deck_id).await?;

    let service = ExportService::with_max_bullets(max_bullets);
    let pages = service.page_count(&deck);
    let bytes = service.export(&deck)?;

    let path = match output {
        Some(path) => {
            let target = if path.is_dir() {
                path.join(DEFAULT_EXPORT_NAME)
            } else {
                path
            };
            tokio::fs::write(&target, &bytes).await?;
            target
        }
        None => storage.save_export(&deck.id, &bytes).await?,
    };

    println!("Exported {pages} page(s) to {}", path.display());

    Ok(())
}

fn run_cli_list(storage: &StorageService) -> Result<()> {
    let files = storage.list_files()?;

    if files.is_empty() {
        println!("No decks stored yet.");
        return Ok(());
    }

    println!("Found {} files:", files.len());
    println!();

    for file in files {
        let file_type = match file.file_type {
            FileType::Deck => "Deck",
            FileType::Export => "Export",
        };

        let size_kb = file.size / 1024;
        let size_str = if size_kb < 1024 {
            format!("{size_kb}KB")
        } else {
            format!("{:.1}MB", size_kb as f64 / 1024.0)
        };

        println!("{:<8} {:<60} {}", file_type, file.name, size_str);
    }

    Ok(())
}

async fn run_cli_show(storage: &StorageService, deck_id: String) -> Result<()> {
    let deck = storage.load_deck(&deck_id).await?;
    let chunker = Chunker::new();

    println!("Deck:     {}", deck.name);
    println!("Id:       {}", deck.id);
    println!("Source:   {} ({})", deck.source.label(), deck.source_label);
    println!("Template: {}", deck.template);
    println!("Created:  {}", deck.created_at.format("%Y-%m-%d %H:%M:%S"));
    println!("Pages:    {}", deck.page_count(&chunker));
    println!();

    let bullet = textwrap::Options::new(72)
        .initial_indent("       • ")
        .subsequent_indent("         ");

    for (index, slide) in deck.slides.iter().enumerate() {
        if slide.is_title {
            println!("{:>3}. [title] {}", index + 1, slide.heading);
            continue;
        }

        let chunks = chunker.chunk(&slide.text);
        println!(
            "{:>3}. {} ({} page{})",
            index + 1,
            slide.heading,
            chunks.len(),
            if chunks.len() == 1 { "" } else { "s" }
        );
        for (page, chunk) in chunks.iter().enumerate() {
            if chunks.len() > 1 {
                println!("     page {}/{}", page + 1, chunks.len());
            }
            for fragment in &chunk.fragments {
                println!("{}", textwrap::fill(fragment, &bullet));
            }
        }
    }

    Ok(())
}

fn run_cli_delete(storage: &StorageService, deck_id: String) -> Result<()> {
    storage.delete_deck(&deck_id)?;
    println!("Deleted deck '{deck_id}'");
    Ok(())
}

fn run_cli_templates() {
    println!("{:<20} {:<34} {:<14} DESCRIPTION", "ID", "NAME", "CATEGORY");
    for entry in template::catalog() {
        println!(
            "{:<20} {:<34} {:<14} {}",
            entry.id, entry.name, entry.category, entry.description
        );
    }
}

async fn run_tui(processor: ProcessorService, storage: StorageService) -> Result<()> {
    // Initialize terminal
    let mut terminal = tui_init()?;

    // Create app
    let mut app = App::new(processor, storage);
    let event_handler = EventHandler::new();

    // Setup async communication channel for background tasks
    let (tx, rx) = mpsc::unbounded_channel();
    app.processing_tx = Some(tx.clone());
    app.processing_rx = Some(rx);

    // Restore the terminal even when the loop bails out with an error.
    let result = tui_loop(&mut terminal, &mut app, &event_handler);
    tui_restore()?;
    result
}

fn tui_loop(terminal: &mut Tui, app: &mut App, event_handler: &EventHandler) -> Result<()> {
    loop {
        // Handle events
        let event = event_handler.next_event()?;
        app.handle_event(event)?;

        // Draw UI
        terminal.draw(|f| {
            ui::draw(f, app);
        })?;

        // Check if we should quit
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
