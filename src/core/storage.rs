use crate::core::deck::Deck;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs as std_fs;
use std::path::{Path, PathBuf};

use tokio::fs;

const DECKS_DIR: &str = "decks";
const EXPORTS_DIR: &str = "exports";
const DECK_PREFIX: &str = "deck_";
const DECK_SUFFIX: &str = ".json";
const EXPORT_SUFFIX: &str = ".pptx";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FileEntry {
    pub path: PathBuf,
    pub name: String,
    pub file_type: FileType,
    pub size: u64,
    pub modified: std::time::SystemTime,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum FileType {
    Deck,
    Export,
}

#[derive(Clone)]
pub struct StorageService {
    root: PathBuf,
}

impl StorageService {
    pub fn new() -> Self {
        Self::with_root(".")
    }

    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn decks_dir(&self) -> PathBuf {
        self.root.join(DECKS_DIR)
    }

    fn exports_dir(&self) -> PathBuf {
        self.root.join(EXPORTS_DIR)
    }

    fn ensure_directories(&self) -> Result<()> {
        ensure_directory(&self.decks_dir())?;
        ensure_directory(&self.exports_dir())?;
        Ok(())
    }

    fn deck_path(&self, deck_id: &str) -> Result<PathBuf> {
        let sanitized = sanitize_deck_id(deck_id)?;
        Ok(self
            .decks_dir()
            .join(format!("{DECK_PREFIX}{sanitized}{DECK_SUFFIX}")))
    }

    pub fn export_path(&self, deck_id: &str) -> Result<PathBuf> {
        let sanitized = sanitize_deck_id(deck_id)?;
        Ok(self.exports_dir().join(format!("{sanitized}{EXPORT_SUFFIX}")))
    }

    pub fn deck_exists(&self, deck_id: &str) -> bool {
        if self.ensure_directories().is_err() {
            return false;
        }
        self.deck_path(deck_id)
            .map(|path| path.exists())
            .unwrap_or(false)
    }

    pub async fn save_deck(&self, deck: &Deck) -> Result<PathBuf> {
        self.ensure_directories()?;
        let path = self.deck_path(&deck.id)?;

        let content = serde_json::to_string_pretty(deck)?;
        fs::write(&path, &content).await?;
        log::info!("Deck saved to {}", path.display());

        Ok(path)
    }

    pub async fn load_deck(&self, deck_id: &str) -> Result<Deck> {
        let path = self.deck_path(deck_id)?;
        let content = fs::read_to_string(&path).await.map_err(|_| {
            Error::custom(format!("No stored deck with id '{deck_id}'"))
        })?;
        let deck = serde_json::from_str(&content)?;
        Ok(deck)
    }

    pub async fn save_export(&self, deck_id: &str, bytes: &[u8]) -> Result<PathBuf> {
        self.ensure_directories()?;
        let path = self.export_path(deck_id)?;

        fs::write(&path, bytes).await?;
        log::info!("Export saved to {}", path.display());

        Ok(path)
    }

    pub fn list_files(&self) -> Result<Vec<FileEntry>> {
        self.ensure_directories()?;
        let mut files = Vec::new();

        if let Ok(entries) = std_fs::read_dir(self.decks_dir()) {
            for entry in entries {
                let entry = entry?;
                let path = entry.path();

                if let Some(name) = path.file_name().and_then(|n| n.to_str())
                    && name.starts_with(DECK_PREFIX)
                    && name.ends_with(DECK_SUFFIX)
                {
                    let metadata = entry.metadata()?;
                    files.push(FileEntry {
                        path: path.clone(),
                        name: name.to_string(),
                        file_type: FileType::Deck,
                        size: metadata.len(),
                        modified: metadata.modified()?,
                    });
                }
            }
        }

        if let Ok(entries) = std_fs::read_dir(self.exports_dir()) {
            for entry in entries {
                let entry = entry?;
                let path = entry.path();

                if let Some(name) = path.file_name().and_then(|n| n.to_str())
                    && name.ends_with(EXPORT_SUFFIX)
                {
                    let metadata = entry.metadata()?;
                    files.push(FileEntry {
                        path: path.clone(),
                        name: name.to_string(),
                        file_type: FileType::Export,
                        size: metadata.len(),
                        modified: metadata.modified()?,
                    });
                }
            }
        }

        // Newest first.
        files.sort_by(|a, b| b.modified.cmp(&a.modified));

        Ok(files)
    }

    /// Remove a stored deck along with its export, when one exists.
    pub fn delete_deck(&self, deck_id: &str) -> Result<()> {
        let path = self.deck_path(deck_id)?;
        if !path.exists() {
            return Err(Error::custom(format!("No stored deck with id '{deck_id}'")));
        }
        self.delete_file(&path)?;

        let export = self.export_path(deck_id)?;
        if export.exists() {
            self.delete_file(&export)?;
        }
        Ok(())
    }

    pub fn delete_file(&self, path: &Path) -> Result<()> {
        self.ensure_directories()?;
        self.ensure_managed_path(path)?;
        std_fs::remove_file(path)?;
        Ok(())
    }

    fn ensure_managed_path(&self, path: &Path) -> Result<()> {
        let canonical = path
            .canonicalize()
            .map_err(|_| Error::custom("Target file does not exist or cannot be resolved"))?;

        let deck_base = self.decks_dir().canonicalize().ok();
        let export_base = self.exports_dir().canonicalize().ok();

        let allowed = deck_base
            .as_ref()
            .map(|base| canonical.starts_with(base))
            .unwrap_or(false)
            || export_base
                .as_ref()
                .map(|base| canonical.starts_with(base))
                .unwrap_or(false);

        if !allowed {
            return Err(Error::custom(
                "Refusing to operate on files outside managed deck/export directories",
            ));
        }

        Ok(())
    }
}

impl Default for StorageService {
    fn default() -> Self {
        Self::new()
    }
}

impl FileEntry {
    pub fn deck_id(&self) -> Option<String> {
        let name = &self.name;
        if name.starts_with(DECK_PREFIX) && name.ends_with(DECK_SUFFIX) {
            Some(
                name.trim_start_matches(DECK_PREFIX)
                    .trim_end_matches(DECK_SUFFIX)
                    .to_string(),
            )
        } else if name.ends_with(EXPORT_SUFFIX) {
            Some(name.trim_end_matches(EXPORT_SUFFIX).to_string())
        } else {
            None
        }
    }
}

fn ensure_directory(path: &Path) -> Result<()> {
    std_fs::create_dir_all(path)?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        let metadata = std_fs::metadata(path)?;
        let mut permissions = metadata.permissions();
        if permissions.mode() & 0o777 != 0o700 {
            permissions.set_mode(0o700);
            std_fs::set_permissions(path, permissions)?;
        }
    }

    Ok(())
}

const MAX_DECK_ID_LEN: usize = 128;

/// Ensure a deck identifier is safe for filesystem use. Only ASCII
/// alphanumeric characters plus `_` and `-` are allowed.
pub fn sanitize_deck_id(raw: &str) -> Result<String> {
    let trimmed = raw.trim();

    if trimmed.is_empty() {
        return Err(Error::custom("Deck ID cannot be empty"));
    }

    if trimmed.len() > MAX_DECK_ID_LEN {
        return Err(Error::custom("Deck ID is unexpectedly long"));
    }

    if !trimmed
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_'))
    {
        return Err(Error::custom(
            "Deck ID contains unsupported characters; expected only letters, numbers, '-' or '_'",
        ));
    }

    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::deck::{Slide, SourceKind};
    use tempfile::TempDir;

    fn sample_deck(id_hint: &str) -> Deck {
        Deck::new(
            id_hint,
            SourceKind::Text,
            "inline text",
            "modern",
            vec![Slide {
                heading: "Only slide".to_string(),
                is_title: true,
                text: String::new(),
                image: None,
                template: None,
                timestamp: None,
            }],
        )
    }

    #[test]
    fn allows_expected_characters() {
        let id = sanitize_deck_id("my-deck_01").expect("valid ID");
        assert_eq!(id, "my-deck_01");
    }

    #[test]
    fn rejects_empty() {
        assert!(sanitize_deck_id("   ").is_err());
    }

    #[test]
    fn rejects_path_traversal() {
        assert!(sanitize_deck_id("../../etc/passwd").is_err());
    }

    #[test]
    fn rejects_too_long() {
        let long = "a".repeat(MAX_DECK_ID_LEN + 1);
        assert!(sanitize_deck_id(&long).is_err());
    }

    #[tokio::test]
    async fn save_and_load_round_trip() {
        let dir = TempDir::new().expect("tempdir");
        let storage = StorageService::with_root(dir.path());

        let deck = sample_deck("roundtrip");
        storage.save_deck(&deck).await.expect("save");
        assert!(storage.deck_exists(&deck.id));

        let loaded = storage.load_deck(&deck.id).await.expect("load");
        assert_eq!(loaded.id, deck.id);
        assert_eq!(loaded.slides.len(), 1);
        assert_eq!(loaded.slides[0].heading, "Only slide");
    }

    #[tokio::test]
    async fn missing_deck_reports_its_id() {
        let dir = TempDir::new().expect("tempdir");
        let storage = StorageService::with_root(dir.path());

        let err = storage.load_deck("nonexistent").await.unwrap_err();
        assert!(err.to_string().contains("nonexistent"));
    }

    #[tokio::test]
    async fn list_classifies_decks_and_exports() {
        let dir = TempDir::new().expect("tempdir");
        let storage = StorageService::with_root(dir.path());

        let deck = sample_deck("listed");
        storage.save_deck(&deck).await.expect("save deck");
        storage
            .save_export(&deck.id, b"PK\x03\x04fake")
            .await
            .expect("save export");

        let files = storage.list_files().expect("list");
        assert_eq!(files.len(), 2);
        assert!(files
            .iter()
            .any(|f| f.file_type == FileType::Deck && f.deck_id().as_deref() == Some(deck.id.as_str())));
        assert!(files
            .iter()
            .any(|f| f.file_type == FileType::Export && f.deck_id().as_deref() == Some(deck.id.as_str())));
    }

    #[tokio::test]
    async fn delete_deck_takes_export_with_it() {
        let dir = TempDir::new().expect("tempdir");
        let storage = StorageService::with_root(dir.path());

        let deck = sample_deck("doomed");
        storage.save_deck(&deck).await.expect("save deck");
        storage
            .save_export(&deck.id, b"bytes")
            .await
            .expect("save export");

        storage.delete_deck(&deck.id).expect("delete");
        assert!(!storage.deck_exists(&deck.id));
        assert!(storage.list_files().expect("list").is_empty());
    }

    #[tokio::test]
    async fn delete_refuses_unmanaged_paths() {
        let dir = TempDir::new().expect("tempdir");
        let storage = StorageService::with_root(dir.path());

        let stray = dir.path().join("stray.txt");
        std::fs::write(&stray, "keep out").expect("write stray");

        assert!(storage.delete_file(&stray).is_err());
        assert!(stray.exists());
    }
}
