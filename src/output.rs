/// Run artifacts on disk.
///
/// A run leaves three files in the output directory:
///   weather_data.json     the full `WeatherDocument`
///   prompts_for_llm.json  region name to summarizer prompt
///   index.html            the rendered briefing
///
/// The directory is created on first write. Existing files are replaced.

use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

use crate::model::WeatherDocument;

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DOCUMENT_FILE: &str = "weather_data.json";
pub const PROMPTS_FILE: &str = "prompts_for_llm.json";
pub const REPORT_FILE: &str = "index.html";

#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to write {}: {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("failed to serialize {}: {source}", .path.display())]
    Json { path: PathBuf, source: serde_json::Error },
}

fn write_file(dir: &Path, name: &str, contents: &str) -> Result<PathBuf, OutputError> {
    fs::create_dir_all(dir).map_err(|source| OutputError::Io { path: dir.to_path_buf(), source })?;
    let path = dir.join(name);
    fs::write(&path, contents).map_err(|source| OutputError::Io { path: path.clone(), source })?;
    Ok(path)
}

fn write_json<T: Serialize>(dir: &Path, name: &str, value: &T) -> Result<PathBuf, OutputError> {
    let json = serde_json::to_string_pretty(value).map_err(|source| OutputError::Json {
        path: dir.join(name),
        source,
    })?;
    write_file(dir, name, &json)
}

/// Writes `weather_data.json`. Returns the path written.
pub fn write_document(dir: &Path, doc: &WeatherDocument) -> Result<PathBuf, OutputError> {
    write_json(dir, DOCUMENT_FILE, doc)
}

/// Writes `prompts_for_llm.json`.
pub fn write_prompts<T: Serialize>(dir: &Path, prompts: &T) -> Result<PathBuf, OutputError> {
    write_json(dir, PROMPTS_FILE, prompts)
}

/// Writes `index.html`.
pub fn write_report(dir: &Path, html: &str) -> Result<PathBuf, OutputError> {
    write_file(dir, REPORT_FILE, html)
}

/// Reads a previously written `weather_data.json`.
pub fn read_document(dir: &Path) -> Result<WeatherDocument, OutputError> {
    let path = dir.join(DOCUMENT_FILE);
    let contents =
        fs::read_to_string(&path).map_err(|source| OutputError::Io { path: path.clone(), source })?;
    serde_json::from_str(&contents).map_err(|source| OutputError::Json { path, source })
}
