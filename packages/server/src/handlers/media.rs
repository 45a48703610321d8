//! Multipart audio intake and streamed audio responses.

use std::path::PathBuf;

use axum::body::Body;
use axum::extract::DefaultBodyLimit;
use axum::extract::multipart::{Field, Multipart};
use axum::http::{StatusCode, header};
use axum::response::Response;
use tokio::io::AsyncWriteExt;
use tokio_util::io::ReaderStream;
use uuid::Uuid;

use crate::error::AppError;
use crate::extractors::json::parse_json_part;
use crate::models::Episode;
use crate::service::{AudioStream, AudioUpload};

/// Headroom for multipart framing and the metadata part.
const MULTIPART_OVERHEAD: u64 = 1024 * 1024;

pub fn audio_body_limit(max_object_size: u64) -> DefaultBodyLimit {
    let limit = max_object_size.saturating_add(MULTIPART_OVERHEAD);
    DefaultBodyLimit::max(usize::try_from(limit).unwrap_or(usize::MAX))
}

/// A spooled upload on local disk, removed when dropped.
pub struct SpooledFile {
    path: PathBuf,
}

impl Drop for SpooledFile {
    fn drop(&mut self) {
        // Best effort. Inside a runtime the unlink goes to the blocking pool.
        let path = std::mem::take(&mut self.path);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(move || std::fs::remove_file(path));
            }
            Err(_) => {
                let _ = std::fs::remove_file(path);
            }
        }
    }
}

/// An audio part that has been fully received.
pub struct ReceivedAudio {
    pub upload: AudioUpload,
    /// Keeps the spooled bytes alive until the service is done with them.
    pub spool: SpooledFile,
}

/// Parts of an episode-creation or audio-replacement request.
#[derive(Default)]
pub struct EpisodeForm {
    pub metadata: Option<Episode>,
    pub audio: Option<ReceivedAudio>,
}

impl EpisodeForm {
    /// Read every part. `file` is spooled to disk; unknown parts are ignored.
    pub async fn read(mut multipart: Multipart, max_size: u64) -> Result<Self, AppError> {
        let mut form = EpisodeForm::default();

        while let Some(field) = multipart
            .next_field()
            .await
            .map_err(|e| AppError::Validation(format!("Multipart error: {e}")))?
        {
            match field.name() {
                Some("file") => {
                    if form.audio.is_some() {
                        return Err(AppError::Validation("Only one 'file' part is allowed".into()));
                    }
                    form.audio = Some(receive_audio(field, max_size).await?);
                }
                Some("metadata") => {
                    let text = field.text().await.map_err(|e| {
                        AppError::Validation(format!("Failed to read metadata: {e}"))
                    })?;
                    form.metadata = Some(parse_json_part("metadata", &text)?);
                }
                _ => {}
            }
        }

        Ok(form)
    }
}

/// Resolve the declared audio type of a part.
///
/// Generic or missing types are guessed from the file name; anything that
/// still is not audio is left empty for the service default.
fn declared_content_type(field_type: Option<&str>, file_name: Option<&str>) -> String {
    match field_type {
        Some(ct) if !ct.is_empty() && ct != "application/octet-stream" => ct.to_string(),
        _ => file_name
            .and_then(|name| mime_guess::from_path(name).first())
            .filter(|mime| mime.type_() == mime_guess::mime::AUDIO)
            .map(|mime| mime.to_string())
            .unwrap_or_default(),
    }
}

/// Stream a multipart field to a temp file and reopen it for reading.
async fn receive_audio(mut field: Field<'_>, max_size: u64) -> Result<ReceivedAudio, AppError> {
    let file_name = field.file_name().map(str::to_string);
    let content_type = declared_content_type(field.content_type(), file_name.as_deref());

    let spool = SpooledFile {
        path: std::env::temp_dir().join(format!("podcast-upload-{}", Uuid::new_v4())),
    };

    let mut temp_file = tokio::fs::File::create(&spool.path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to create temp file: {e}")))?;

    let mut total_size: u64 = 0;
    while let Some(chunk) = field
        .chunk()
        .await
        .map_err(|e| AppError::Validation(format!("Upload read error: {e}")))?
    {
        total_size += chunk.len() as u64;
        if total_size > max_size {
            return Err(AppError::Validation(format!(
                "File exceeds maximum size of {max_size} bytes"
            )));
        }
        temp_file
            .write_all(&chunk)
            .await
            .map_err(|e| AppError::Internal(format!("Temp file write failed: {e}")))?;
    }

    temp_file
        .flush()
        .await
        .map_err(|e| AppError::Internal(format!("Temp file flush failed: {e}")))?;
    drop(temp_file);

    let file = tokio::fs::File::open(&spool.path)
        .await
        .map_err(|e| AppError::Internal(format!("Failed to reopen temp file: {e}")))?;

    Ok(ReceivedAudio {
        upload: AudioUpload {
            content: Box::new(file),
            content_type,
            file_name,
        },
        spool,
    })
}

/// Build a streaming audio response.
pub fn audio_response(audio: AudioStream) -> Result<Response, AppError> {
    let body = Body::from_stream(ReaderStream::new(audio.content));

    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, audio.content_type)
        .header(header::CONTENT_LENGTH, audio.size.to_string())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition_value(&audio.file_name),
        )
        .header(header::ACCEPT_RANGES, "none")
        .body(body)
        .map_err(|e| AppError::Internal(format!("Failed to build response: {e}")))
}

/// Build a safe `Content-Disposition` header value.
fn content_disposition_value(filename: &str) -> String {
    let ascii_safe: String = filename
        .chars()
        .filter(|c| c.is_ascii_graphic() && !matches!(c, '"' | ';' | '\\'))
        .collect();
    let ascii_name = if ascii_safe.is_empty() {
        "audio".to_string()
    } else {
        ascii_safe
    };

    // RFC 5987 percent-encoding for filename*.
    let encoded: String = filename
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'.' | b'_' | b'~' => {
                String::from(b as char)
            }
            _ => format!("%{b:02X}"),
        })
        .collect();

    format!("inline; filename=\"{ascii_name}\"; filename*=UTF-8''{encoded}")
}
