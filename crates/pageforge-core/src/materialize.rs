//! Output materialization: delivering finished artifacts, singly or bundled.

use std::io::{Cursor, Write};
use std::path::PathBuf;
use tracing::{debug, info};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::error::MaterializeError;

/// Destination for finished output artifacts.
pub trait OutputSink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<(), MaterializeError>;
}

/// Writes each artifact as a file in a directory.
pub struct DirectorySink {
    directory: PathBuf,
}

impl DirectorySink {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }
}

impl OutputSink for DirectorySink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<(), MaterializeError> {
        let path = self.directory.join(filename);
        std::fs::write(&path, bytes)?;
        info!("wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }
}

/// Collects artifacts in memory, for embedding hosts and tests.
#[derive(Default)]
pub struct MemorySink {
    outputs: Vec<(String, Vec<u8>)>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn outputs(&self) -> &[(String, Vec<u8>)] {
        &self.outputs
    }

    pub fn into_outputs(self) -> Vec<(String, Vec<u8>)> {
        self.outputs
    }
}

impl OutputSink for MemorySink {
    fn deliver(&mut self, filename: &str, bytes: &[u8]) -> Result<(), MaterializeError> {
        self.outputs.push((filename.to_string(), bytes.to_vec()));
        Ok(())
    }
}

/// Builds a zip archive bundling multiple artifacts into one deliverable.
///
/// Entries are stored flat (no directories), deflate-compressed, in the
/// order they were added.
pub struct ArchiveBuilder {
    writer: ZipWriter<Cursor<Vec<u8>>>,
    entry_count: usize,
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ArchiveBuilder {
    pub fn new() -> Self {
        Self {
            writer: ZipWriter::new(Cursor::new(Vec::new())),
            entry_count: 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.entry_count == 0
    }

    pub fn entry_count(&self) -> usize {
        self.entry_count
    }

    /// Append one named entry.
    pub fn add_entry(&mut self, filename: &str, bytes: &[u8]) -> Result<(), MaterializeError> {
        let options =
            SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
        self.writer
            .start_file(filename, options)
            .map_err(|e| MaterializeError::Archive(e.to_string()))?;
        self.writer.write_all(bytes)?;
        self.entry_count += 1;
        debug!("archived {filename} ({} bytes)", bytes.len());
        Ok(())
    }

    /// Finish the archive and return its bytes.
    pub fn finalize(self) -> Result<Vec<u8>, MaterializeError> {
        let cursor = self
            .writer
            .finish()
            .map_err(|e| MaterializeError::Archive(e.to_string()))?;
        Ok(cursor.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::io::Read;

    #[test]
    fn test_archive_round_trip() {
        let mut builder = ArchiveBuilder::new();
        builder.add_entry("doc-page-1.jpg", b"first").unwrap();
        builder.add_entry("doc-page-2.jpg", b"second").unwrap();
        assert_eq!(builder.entry_count(), 2);

        let bytes = builder.finalize().unwrap();
        let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        assert_eq!(archive.len(), 2);

        let mut contents = String::new();
        archive
            .by_name("doc-page-2.jpg")
            .unwrap()
            .read_to_string(&mut contents)
            .unwrap();
        assert_eq!(contents, "second");
    }

    #[test]
    fn test_archive_preserves_entry_order() {
        let mut builder = ArchiveBuilder::new();
        builder.add_entry("b.png", b"x").unwrap();
        builder.add_entry("a.png", b"y").unwrap();

        let bytes = builder.finalize().unwrap();
        let archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
        let names: Vec<&str> = archive.file_names().collect();
        assert_eq!(names, vec!["b.png", "a.png"]);
    }

    #[test]
    fn test_empty_builder() {
        let builder = ArchiveBuilder::new();
        assert!(builder.is_empty());
    }

    #[test]
    fn test_directory_sink_writes_files() {
        let dir = tempfile::tempdir().unwrap();
        let mut sink = DirectorySink::new(dir.path());
        sink.deliver("out.pdf", b"%PDF-data").unwrap();

        let written = std::fs::read(dir.path().join("out.pdf")).unwrap();
        assert_eq!(written, b"%PDF-data");
    }

    #[test]
    fn test_memory_sink_collects_outputs() {
        let mut sink = MemorySink::new();
        sink.deliver("a.pdf", b"1").unwrap();
        sink.deliver("b.zip", b"2").unwrap();

        let outputs = sink.into_outputs();
        assert_eq!(outputs.len(), 2);
        assert_eq!(outputs[0].0, "a.pdf");
        assert_eq!(outputs[1].1, b"2");
    }
}
