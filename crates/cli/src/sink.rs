//! File sink writing letters into a directory

use letter_core::FileSink;
use std::fs;
use std::io;
use std::path::PathBuf;

/// Writes each delivered document to `<dir>/<filename>`, creating the directory
#[derive(Debug)]
pub struct DirectorySink {
    dir: PathBuf,
    written: Vec<PathBuf>,
}

impl DirectorySink {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            written: Vec::new(),
        }
    }

    /// Paths written so far, oldest first
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }
}

impl FileSink for DirectorySink {
    type Error = io::Error;

    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<(), Self::Error> {
        fs::create_dir_all(&self.dir)?;
        let path = self.dir.join(filename);
        fs::write(&path, bytes)?;
        log::info!("wrote {} ({} bytes)", path.display(), bytes.len());
        self.written.push(path);
        Ok(())
    }
}
