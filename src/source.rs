// this_file: src/source.rs

//! Byte sources for frame and photo references.
//!
//! The host decides what a reference means. [`LocalSource`] understands
//! `data:` URIs and filesystem paths; [`MemorySource`] serves blobs the host
//! already holds. Fetches are never retried.

use crate::error::{Error, Result};
use crate::security::{sanitize_path, validate_source_size};
use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use camino::{Utf8Path, Utf8PathBuf};
use log::debug;
use std::collections::HashMap;
use std::fs;

/// Resolves an image reference to its encoded bytes.
pub trait ByteSource: Send + Sync {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>>;
}

impl<T: ByteSource + ?Sized> ByteSource for Box<T> {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>> {
        (**self).fetch(reference)
    }
}

impl<T: ByteSource + ?Sized> ByteSource for std::sync::Arc<T> {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>> {
        (**self).fetch(reference)
    }
}

/// Reads `data:` URIs inline and everything else from disk.
#[derive(Debug, Clone, Default)]
pub struct LocalSource {
    base_dir: Option<Utf8PathBuf>,
}

impl LocalSource {
    /// Source resolving relative paths against the working directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Source confined to `base_dir`; paths escaping it are rejected.
    pub fn with_base_dir(base_dir: impl Into<Utf8PathBuf>) -> Self {
        Self {
            base_dir: Some(base_dir.into()),
        }
    }

    fn read_file(&self, reference: &str) -> Result<Vec<u8>> {
        let path = sanitize_path(Utf8Path::new(reference), self.base_dir.as_deref())
            .map_err(|e| Error::fetch(reference, e.to_string()))?;

        let metadata = fs::metadata(&path).map_err(|e| Error::fetch(reference, e.to_string()))?;
        if !metadata.is_file() {
            return Err(Error::fetch(reference, "not a regular file"));
        }
        validate_source_size(reference, metadata.len())?;

        debug!("Reading {} ({} bytes)", path, metadata.len());
        fs::read(&path).map_err(|e| Error::fetch(reference, e.to_string()))
    }
}

impl ByteSource for LocalSource {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>> {
        if reference.starts_with("data:") {
            let bytes = decode_data_uri(reference)?;
            validate_source_size("data: URI", bytes.len() as u64)?;
            return Ok(bytes);
        }
        self.read_file(reference)
    }
}

/// Decode a base64 `data:` URI, e.g. `data:image/png;base64,iVBOR...`.
pub fn decode_data_uri(uri: &str) -> Result<Vec<u8>> {
    let rest = uri
        .strip_prefix("data:")
        .ok_or_else(|| Error::fetch(short_ref(uri), "not a data: URI"))?;
    let (header, payload) = rest
        .split_once(',')
        .ok_or_else(|| Error::fetch(short_ref(uri), "data: URI has no payload"))?;
    if !header.ends_with(";base64") {
        return Err(Error::fetch(
            short_ref(uri),
            "only base64 data: URIs are supported",
        ));
    }
    STANDARD
        .decode(payload.trim())
        .map_err(|e| Error::fetch(short_ref(uri), format!("invalid base64: {}", e)))
}

/// Keep error messages readable when the reference is a multi-megabyte URI.
fn short_ref(reference: &str) -> String {
    const MAX: usize = 48;
    match reference.char_indices().nth(MAX) {
        Some((cut, _)) => format!("{}…", &reference[..cut]),
        None => reference.to_string(),
    }
}

/// In-memory blobs keyed by reference.
#[derive(Debug, Clone, Default)]
pub struct MemorySource {
    blobs: HashMap<String, Vec<u8>>,
}

impl MemorySource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register (or replace) the bytes served for `reference`.
    pub fn insert(&mut self, reference: impl Into<String>, bytes: Vec<u8>) {
        self.blobs.insert(reference.into(), bytes);
    }

    /// Builder-style [`MemorySource::insert`].
    pub fn with(mut self, reference: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.insert(reference, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.blobs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blobs.is_empty()
    }
}

impl ByteSource for MemorySource {
    fn fetch(&self, reference: &str) -> Result<Vec<u8>> {
        self.blobs
            .get(reference)
            .cloned()
            .ok_or_else(|| Error::fetch(reference, "no such blob"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_data_uri_roundtrip() {
        let uri = format!("data:image/png;base64,{}", STANDARD.encode(b"hello"));
        assert_eq!(decode_data_uri(&uri).unwrap(), b"hello");
        assert_eq!(LocalSource::new().fetch(&uri).unwrap(), b"hello");
    }

    #[test]
    fn test_data_uri_rejects_plain_and_garbage() {
        assert!(decode_data_uri("data:text/plain,hello").is_err());
        assert!(decode_data_uri("data:image/png;base64,@@@").is_err());
        assert!(decode_data_uri("data:image/png;base64").is_err());
    }

    #[test]
    fn test_local_source_reads_within_base() {
        let dir = TempDir::new().unwrap();
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        fs::write(base.join("a.bin"), b"abc").unwrap();

        let source = LocalSource::with_base_dir(base.clone());
        assert_eq!(source.fetch("a.bin").unwrap(), b"abc");

        let err = source.fetch("missing.bin").unwrap_err();
        assert!(matches!(err, Error::Fetch { .. }));
    }

    #[test]
    fn test_local_source_reads_name_with_double_dot() {
        let dir = TempDir::new().unwrap();
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        fs::write(base.join("IMG..001.png"), b"png").unwrap();

        let source = LocalSource::with_base_dir(base);
        assert_eq!(source.fetch("IMG..001.png").unwrap(), b"png");
        assert!(source.fetch("../IMG..001.png").is_err());
    }

    #[test]
    fn test_local_source_rejects_empty_file() {
        let dir = TempDir::new().unwrap();
        let base = Utf8PathBuf::from_path_buf(dir.path().to_path_buf()).unwrap();
        fs::write(base.join("empty.jpg"), b"").unwrap();

        let err = LocalSource::with_base_dir(base).fetch("empty.jpg").unwrap_err();
        assert!(err.to_string().contains("empty"));
    }

    #[test]
    fn test_memory_source() {
        let source = MemorySource::new().with("frame", vec![1, 2, 3]);
        assert_eq!(source.len(), 1);
        assert_eq!(source.fetch("frame").unwrap(), vec![1, 2, 3]);
        assert!(source.fetch("other").is_err());
    }

    #[test]
    fn test_short_ref_truncates_long_references() {
        let long = "x".repeat(100);
        assert!(short_ref(&long).chars().count() <= 49);
        assert_eq!(short_ref("abc"), "abc");
    }
}
