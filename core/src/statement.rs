//! Where raw problem statements come from.

use std::io::Read;
use std::path::{Path, PathBuf};

/// Capability: fetch the raw text of one problem statement.
pub trait StatementSource {
    fn fetch(&mut self) -> std::io::Result<String>;

    /// Short label used in logs.
    fn describe(&self) -> String;
}

#[derive(Debug, Clone)]
pub struct FileStatement {
    path: PathBuf,
}

impl FileStatement {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StatementSource for FileStatement {
    fn fetch(&mut self) -> std::io::Result<String> {
        std::fs::read_to_string(&self.path)
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// Reads the whole statement from any reader, typically stdin.
pub struct ReaderStatement<R> {
    reader: R,
    label: String,
}

impl<R: Read> ReaderStatement<R> {
    pub fn new(reader: R, label: impl Into<String>) -> Self {
        Self {
            reader,
            label: label.into(),
        }
    }
}

impl ReaderStatement<std::io::Stdin> {
    pub fn stdin() -> Self {
        Self::new(std::io::stdin(), "<stdin>")
    }
}

impl<R: Read> StatementSource for ReaderStatement<R> {
    fn fetch(&mut self) -> std::io::Result<String> {
        let mut buf = String::new();
        self.reader.read_to_string(&mut buf)?;
        Ok(buf)
    }

    fn describe(&self) -> String {
        self.label.clone()
    }
}

/// Statement already held in memory.
#[derive(Debug, Clone)]
pub struct TextStatement(pub String);

impl StatementSource for TextStatement {
    fn fetch(&mut self) -> std::io::Result<String> {
        Ok(self.0.clone())
    }

    fn describe(&self) -> String {
        "<text>".to_string()
    }
}
