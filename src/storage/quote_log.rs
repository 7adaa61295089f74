use crate::model::{DateWinner, StorageError};
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

/// Sink for per-date winners. Diagnostic only; never read back by the search.
pub trait WinnerLog {
    fn record(&mut self, winner: &DateWinner) -> Result<(), StorageError>;
}

impl WinnerLog for Vec<DateWinner> {
    fn record(&mut self, winner: &DateWinner) -> Result<(), StorageError> {
        self.push(winner.clone());
        Ok(())
    }
}

/// Newline-delimited JSON log, reopened in append mode for every record.
pub struct QuoteLog {
    path: PathBuf,
}

impl QuoteLog {
    /// Creates (or truncates) the log file.
    pub fn create(path: &Path) -> Result<Self, StorageError> {
        File::create(path)?;
        Ok(Self {
            path: path.to_path_buf(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl WinnerLog for QuoteLog {
    fn record(&mut self, winner: &DateWinner) -> Result<(), StorageError> {
        let mut line = serde_json::to_string(winner)?;
        line.push('\n');
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}
