// this_file: src/archive.rs

//! In-memory ZIP archive of rendered outputs.
//!
//! Entry names follow `frame_{index}_{name}.jpg`. `index` is the photo's
//! 1-based position in the submitted list, so gaps appear where photos were
//! skipped. `name` is used verbatim: an existing extension is kept, giving
//! names like `frame_1_photo.png.jpg`. Downstream consumers match on this
//! exact format.

use crate::error::{Error, Result};
use log::debug;
use std::io::{Cursor, Seek, Write};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// Archive entry name for the photo at 1-based `index`.
pub fn entry_name(index: usize, name: &str) -> String {
    format!("frame_{}_{}.jpg", index, name)
}

/// Seekable target for archive bytes that hands the finished blob back.
pub trait ArchiveSink: Write + Seek {
    fn into_bytes(self) -> Vec<u8>;
}

impl ArchiveSink for Cursor<Vec<u8>> {
    fn into_bytes(self) -> Vec<u8> {
        self.into_inner()
    }
}

/// Accumulates encoded JPEGs into one ZIP blob.
pub struct ArchiveBuilder<W: ArchiveSink = Cursor<Vec<u8>>> {
    writer: ZipWriter<W>,
    entries: usize,
    payload_bytes: usize,
}

impl ArchiveBuilder {
    /// Builder writing into memory.
    pub fn new() -> Self {
        Self::with_sink(Cursor::new(Vec::new()))
    }
}

impl<W: ArchiveSink> ArchiveBuilder<W> {
    pub fn with_sink(sink: W) -> Self {
        Self {
            writer: ZipWriter::new(sink),
            entries: 0,
            payload_bytes: 0,
        }
    }

    /// Append one stored entry for the photo at 1-based `index`.
    pub fn add(&mut self, index: usize, name: &str, jpeg: &[u8]) -> Result<()> {
        let entry = entry_name(index, name);
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Stored);

        self.writer
            .start_file(entry.as_str(), options)
            .map_err(|e| Error::Archive(format!("cannot start entry '{}': {}", entry, e)))?;
        self.writer
            .write_all(jpeg)
            .map_err(|e| Error::Archive(format!("cannot write entry '{}': {}", entry, e)))?;

        debug!("Archived {} ({} bytes)", entry, jpeg.len());
        self.payload_bytes += jpeg.len();
        self.entries += 1;
        Ok(())
    }

    pub fn entry_count(&self) -> usize {
        self.entries
    }

    /// Sum of entry payload sizes, excluding ZIP headers.
    pub fn payload_bytes(&self) -> usize {
        self.payload_bytes
    }

    /// Write the central directory and return the archive bytes.
    pub fn finalize(self) -> Result<Vec<u8>> {
        let sink = self
            .writer
            .finish()
            .map_err(|e| Error::Archive(format!("cannot finalize archive: {}", e)))?;
        Ok(sink.into_bytes())
    }
}

impl Default for ArchiveBuilder {
    fn default() -> Self {
        Self::new()
    }
}
