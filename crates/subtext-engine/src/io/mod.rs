use crate::editing::Document;
use crate::references::InMemoryResolver;
use std::fs;
use std::path::{Path, PathBuf};

/// Extensions of files that hold note text.
pub const NOTE_EXTENSIONS: [&str; 3] = ["subtext", "txt", "md"];

#[derive(Debug, thiserror::Error)]
pub enum IoError {
    #[error("File not found: {0}")]
    NotFound(PathBuf),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid references directory: {0}")]
    InvalidReferencesDir(PathBuf),
}

/// Read a note into a document, one block per line
pub fn read_note(path: &Path) -> Result<Document, IoError> {
    if !path.exists() {
        return Err(IoError::NotFound(path.to_path_buf()));
    }
    let text = fs::read_to_string(path)?;
    Ok(Document::from_text(&text))
}

/// Write a document's text back to a note
pub fn write_note(path: &Path, document: &Document) -> Result<(), IoError> {
    // Create parent directories if they don't exist
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, document.to_text())?;
    Ok(())
}

/// Scan a directory (not recursively) for note files, sorted by path
pub fn scan_notes(dir: &Path) -> Result<Vec<PathBuf>, IoError> {
    if !dir.is_dir() {
        return Err(IoError::InvalidReferencesDir(dir.to_path_buf()));
    }

    let mut files = Vec::new();
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if path.is_file()
            && let Some(ext) = path.extension().and_then(|e| e.to_str())
            && NOTE_EXTENSIONS.contains(&ext)
        {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Load every note in `dir` into a resolver keyed by file stem
pub fn load_references(dir: &Path) -> Result<InMemoryResolver, IoError> {
    let mut resolver = InMemoryResolver::new();
    for path in scan_notes(dir)? {
        let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
            continue;
        };
        let content = fs::read_to_string(&path)?;
        log::debug!("loaded reference {stem:?} from {}", path.display());
        resolver.insert(stem, content.trim_end());
    }
    Ok(resolver)
}
