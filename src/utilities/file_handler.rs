//! Report writer — persists a finished report verbatim.

use std::fs;
use std::path::{Path, PathBuf};

/// Writes `<username>_persona.txt` files into one directory.
#[derive(Debug, Clone)]
pub struct ReportWriter {
    /// Directory for report files.
    pub directory: PathBuf,
}

impl ReportWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// File name used for a user's report.
    pub fn file_name(username: &str) -> String {
        format!("{}_persona.txt", username)
    }

    /// Path the report for `username` is written to.
    pub fn path_for(&self, username: &str) -> PathBuf {
        self.directory.join(Self::file_name(username))
    }

    /// Write the report, creating the directory if needed. Returns the path.
    pub fn write(&self, username: &str, report: &str) -> std::io::Result<PathBuf> {
        let dir = Path::new(&self.directory);
        if !dir.exists() {
            fs::create_dir_all(dir)?;
        }
        let path = self.path_for(username);
        fs::write(&path, report)?;
        Ok(path)
    }
}

impl Default for ReportWriter {
    fn default() -> Self {
        Self::new(".")
    }
}
