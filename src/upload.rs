//! Multipart attachment upload.
//!
//! Turns a [`PendingAttachment`] plus optional caption text into the
//! `type`/`content`/`file` form the backend expects. The MIME type and
//! filename are whatever the picker reported; no content sniffing happens
//! here.

use reqwest::multipart::{Form, Part};

use crate::api::client::ApiClient;
use crate::api::models::{Message, PendingAttachment};
use crate::error::{Error, Result};

/// Reads the attachment's bytes and submits them with `content` in one
/// multipart request. Fails with [`Error::UnreadableFile`] (no network call)
/// when the local path cannot be read, and with [`Error::UploadRejected`]
/// when the server answers non-2xx, keeping the response body for display.
pub async fn upload(
    client: &ApiClient,
    room_id: &str,
    content: &str,
    attachment: &PendingAttachment,
) -> Result<Message> {
    let bytes = tokio::fs::read(&attachment.local_path)
        .await
        .map_err(|source| Error::UnreadableFile {
            path: attachment.local_path.clone(),
            source,
        })?;
    log::debug!(
        "uploading {} ({}, {} bytes) to room {room_id}",
        attachment.file_name,
        attachment.mime_type,
        bytes.len()
    );

    let part = Part::bytes(bytes)
        .file_name(attachment.file_name.clone())
        .mime_str(&attachment.mime_type)
        .map_err(|e| {
            Error::ValidationFailed(format!("bad mime type {:?}: {e}", attachment.mime_type))
        })?;
    let form = Form::new()
        .text("type", kind_for(&attachment.mime_type))
        .text("content", content.to_string())
        .part("file", part);

    client
        .post_message(room_id, form)
        .await
        .map_err(|err| match err {
            Error::RequestFailed {
                status: Some(status),
                body,
            } => Error::UploadRejected { status, body },
            other => other,
        })
}

/// The backend stores one of `text|image|file`; anything not declared as an
/// image travels as a generic file.
fn kind_for(mime_type: &str) -> &'static str {
    if mime_type.starts_with("image/") {
        "image"
    } else {
        "file"
    }
}
