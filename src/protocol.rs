// this_file: src/protocol.rs

//! Host ↔ engine messages and their JSON-lines wire form.
//!
//! One `start` request goes in; a run of `progress` responses and exactly one
//! terminal `complete` or `error` come out. Archive bytes travel as standard
//! base64 on the wire.

use crate::batch::{BatchJob, PhotoJobItem};
use crate::error::Result;
use serde::{Deserialize, Serialize};

/// Host → engine.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Request {
    /// Begin exactly one batch job
    Start {
        frame: String,
        #[serde(default)]
        photos: Vec<PhotoJobItem>,
    },
}

/// Engine → host.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Response {
    /// Photo `current` of `total` has begun processing
    Progress { current: usize, total: usize },
    /// Job finished; some photos may have been skipped
    Complete {
        #[serde(with = "base64_bytes")]
        archive: Vec<u8>,
    },
    /// Job aborted without an archive
    Error { message: String },
}

impl Request {
    /// Parse one request line.
    pub fn from_json(json: &str) -> Result<Self> {
        crate::security::validate_json_size(json)?;
        Ok(serde_json::from_str(json)?)
    }

    pub fn start(job: BatchJob) -> Self {
        Request::Start {
            frame: job.frame,
            photos: job.photos,
        }
    }

    /// Job carried by a `start` request.
    pub fn into_job(self) -> BatchJob {
        match self {
            Request::Start { frame, photos } => BatchJob { frame, photos },
        }
    }
}

impl Response {
    /// True for `complete` and `error`.
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Response::Progress { .. })
    }

    /// Serialize as a single JSON line (no trailing newline).
    pub fn to_json_line(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

mod base64_bytes {
    use base64::engine::general_purpose::STANDARD;
    use base64::Engine as _;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded.as_bytes())
            .map_err(serde::de::Error::custom)
    }
}
