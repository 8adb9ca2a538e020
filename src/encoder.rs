//! File encoding for the Gemini request body.
//!
//! Each input file becomes exactly one request part. Small text files go in
//! as plain text, small binary files as base64 inline data, and oversized
//! files as a placeholder instruction that defers retrieval to the model's
//! web-search tool (their content is never read into memory).

use std::path::{Path, PathBuf};

use base64::Engine;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::error::FinLensError;

/// One part of the `contents[0].parts` array, in Gemini wire shape.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RequestPart {
    Text {
        text: String,
    },
    InlineData {
        #[serde(rename = "inlineData")]
        inline_data: InlineBlob,
    },
}

/// Base64 payload with its MIME type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InlineBlob {
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub data: String,
}

impl RequestPart {
    pub fn text(text: impl Into<String>) -> Self {
        RequestPart::Text { text: text.into() }
    }

    pub fn inline(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        RequestPart::InlineData {
            inline_data: InlineBlob {
                mime_type: mime_type.into(),
                data: base64::engine::general_purpose::STANDARD.encode(bytes),
            },
        }
    }
}

/// Encode all files into request parts, order-preserving.
///
/// Reads are started together (one task per file) and the function returns
/// only once every read has settled. Any single failure aborts the whole
/// batch with an error naming the offending file.
pub async fn encode_files(
    paths: &[PathBuf],
    inline_limit_bytes: u64,
) -> Result<Vec<RequestPart>, FinLensError> {
    let handles: Vec<JoinHandle<Result<RequestPart, FinLensError>>> = paths
        .iter()
        .map(|path| {
            let path = path.clone();
            tokio::spawn(async move { encode_file(&path, inline_limit_bytes).await })
        })
        .collect();

    let mut parts = Vec::with_capacity(handles.len());
    let mut first_error = None;
    for (handle, path) in handles.into_iter().zip(paths) {
        match handle.await {
            Ok(Ok(part)) => parts.push(part),
            Ok(Err(e)) => {
                first_error.get_or_insert(e);
            }
            Err(e) => {
                first_error.get_or_insert(FinLensError::FileRead {
                    path: path.display().to_string(),
                    message: format!("read task panicked: {}", e),
                });
            }
        }
    }
    if let Some(e) = first_error {
        return Err(e);
    }
    Ok(parts)
}

/// Encode a single file. The size check uses filesystem metadata only, so an
/// oversized file is never read.
async fn encode_file(path: &Path, inline_limit_bytes: u64) -> Result<RequestPart, FinLensError> {
    let metadata = tokio::fs::metadata(path).await.map_err(|e| FinLensError::FileRead {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let name = file_name(path);
    if metadata.len() >= inline_limit_bytes {
        warn!(
            "File '{}' is {} bytes (limit {}), sending web-search placeholder instead of content",
            name,
            metadata.len(),
            inline_limit_bytes
        );
        return Ok(RequestPart::text(placeholder_for(&name)));
    }

    let bytes = tokio::fs::read(path).await.map_err(|e| FinLensError::FileRead {
        path: path.display().to_string(),
        message: e.to_string(),
    })?;

    let mime = mime_for(path);
    info!("Encoded '{}' ({} bytes) as {}", name, bytes.len(), mime);

    if mime.starts_with("text/") {
        if let Ok(text) = String::from_utf8(bytes.clone()) {
            return Ok(RequestPart::text(text));
        }
        // Claims to be text but isn't valid UTF-8, fall through to inline data.
    }
    Ok(RequestPart::inline(mime, &bytes))
}

/// Placeholder sent in place of an oversized file's content.
fn placeholder_for(file_name: &str) -> String {
    format!(
        "The document '{}' was too large to attach. Locate this financial \
         document (or the figures it would contain) via web search and use it \
         in the analysis.",
        file_name
    )
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

/// MIME type from the file extension. PDFs are the common case; anything
/// unrecognized is treated as plain text so the model still sees something.
fn mime_for(path: &Path) -> String {
    mime_guess::from_path(path)
        .first()
        .map(|m| m.essence_str().to_string())
        .unwrap_or_else(|| "text/plain".to_string())
}
