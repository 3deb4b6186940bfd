// this_file: src/security.rs
//! Input limits and path validation

use crate::error::{Error, Result};
use camino::{Utf8Component, Utf8Path, Utf8PathBuf};
use log::{debug, warn};

/// Maximum allowed JSON input size (64MB; inline data: URIs can be large)
pub const MAX_JSON_SIZE: usize = 64 * 1024 * 1024;

/// Maximum allowed number of photos in a single job
pub const MAX_PHOTOS_PER_JOB: usize = 1000;

/// Maximum allowed size of one fetched image (100MB)
pub const MAX_SOURCE_BYTES: u64 = 100 * 1024 * 1024;

/// Maximum decoded width or height accepted from any image
pub const MAX_DECODE_DIMENSION: u32 = 16_384;

/// Maximum bytes the decoder may allocate for one image (512MB)
pub const MAX_DECODE_ALLOC: u64 = 512 * 1024 * 1024;

/// Validate and resolve a file path, optionally confined to `base_dir`.
///
/// `..` components and home-relative (`~`) paths are refused outright; dots
/// inside a file name are fine.
pub fn sanitize_path(path: &Utf8Path, base_dir: Option<&Utf8Path>) -> Result<Utf8PathBuf> {
    let has_parent = path
        .components()
        .any(|c| matches!(c, Utf8Component::ParentDir));
    if has_parent || path.as_str().starts_with('~') {
        warn!("Potential directory traversal attempt: {}", path);
        return Err(Error::InvalidParameter(
            "Path contains invalid components (.. or ~)".into(),
        ));
    }

    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else if let Some(base) = base_dir {
        base.join(path)
    } else {
        let cwd = std::env::current_dir()?;
        let cwd = Utf8PathBuf::from_path_buf(cwd).map_err(|p| {
            Error::InvalidParameter(format!("Working directory is not UTF-8: {}", p.display()))
        })?;
        cwd.join(path)
    };

    let canonical = absolute.canonicalize_utf8().map_err(|e| {
        Error::InvalidParameter(format!("Cannot resolve path {}: {}", absolute, e))
    })?;

    if let Some(base) = base_dir {
        let base_canonical = base.canonicalize_utf8().map_err(|e| {
            Error::InvalidParameter(format!("Cannot resolve base path {}: {}", base, e))
        })?;

        if !canonical.starts_with(&base_canonical) {
            warn!(
                "Path {} is outside base directory {}",
                canonical, base_canonical
            );
            return Err(Error::InvalidParameter(
                "Path is outside allowed directory".into(),
            ));
        }
    }

    debug!("Sanitized path: {} -> {}", path, canonical);
    Ok(canonical)
}

/// Validate JSON input size
pub fn validate_json_size(json: &str) -> Result<()> {
    if json.len() > MAX_JSON_SIZE {
        return Err(Error::InvalidParameter(format!(
            "JSON input too large: {} bytes (max: {} bytes)",
            json.len(),
            MAX_JSON_SIZE
        )));
    }
    Ok(())
}

/// Validate the byte length of a fetched source
pub fn validate_source_size(reference: &str, len: u64) -> Result<()> {
    if len > MAX_SOURCE_BYTES {
        return Err(Error::fetch(
            reference,
            format!("source too large: {} bytes (max: {} bytes)", len, MAX_SOURCE_BYTES),
        ));
    }
    if len == 0 {
        return Err(Error::fetch(reference, "source is empty"));
    }
    Ok(())
}
