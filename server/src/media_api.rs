//! Media endpoints backing the upload page
//!
//! - `POST /media/upload` stores the multipart `file` field under the media root
//! - `GET /media` lists stored files, newest first
//! - `GET /media/{filename}` serves a stored file raw

use crate::error::ServerError;
use crate::state::MediaState;
use axum::{
    body::Body,
    extract::{Multipart, Path, State},
    http::{header, Response, StatusCode},
    routing::{get, post},
    Json, Router,
};
use chrono::{DateTime, Utc};
use common::{MediaItem, Timestamp, UploadResponse, LISTING_PATH, UPLOAD_FIELD, UPLOAD_PATH};
use std::io::ErrorKind;
use std::sync::Arc;
use std::time::SystemTime;
use tokio::fs;

pub fn media_routes() -> Router<Arc<MediaState>> {
    Router::new()
        .route(LISTING_PATH, get(list_media))
        .route(UPLOAD_PATH, post(upload_media))
        .route("/media/{filename}", get(get_media))
}

/// Final path component of a client-supplied filename, if it names a file
fn stored_name(raw: &str) -> Option<&str> {
    raw.rsplit(['/', '\\'])
        .next()
        .filter(|name| !name.is_empty() && *name != "." && *name != "..")
}

pub async fn upload_media(
    State(state): State<Arc<MediaState>>,
    mut multipart: Multipart,
) -> Result<Json<UploadResponse>, ServerError> {
    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .and_then(stored_name)
            .map(str::to_owned)
            .ok_or(ServerError::MissingFilename)?;
        let data = field.bytes().await?;

        fs::create_dir_all(&state.media_root).await?;
        fs::write(state.media_root.join(&filename), &data).await?;

        tracing::info!("Stored upload {} ({} bytes)", filename, data.len());
        return Ok(Json(UploadResponse { filename }));
    }

    Err(ServerError::MissingField(UPLOAD_FIELD))
}

pub async fn list_media(
    State(state): State<Arc<MediaState>>,
) -> Result<Json<Vec<MediaItem>>, ServerError> {
    let mut entries = match fs::read_dir(&state.media_root).await {
        Ok(entries) => entries,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Json(Vec::new())),
        Err(e) => return Err(e.into()),
    };

    let mut found: Vec<(SystemTime, MediaItem)> = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let metadata = entry.metadata().await?;
        if !metadata.is_file() {
            continue;
        }
        let Ok(filename) = entry.file_name().into_string() else {
            tracing::debug!("Skipping non UTF-8 filename {:?}", entry.file_name());
            continue;
        };
        let modified = metadata.modified()?;
        found.push((
            modified,
            MediaItem {
                filename,
                size: metadata.len(),
                uploaded_at: Timestamp::from_datetime(DateTime::<Utc>::from(modified)),
            },
        ));
    }

    found.sort_by(|(a_time, a), (b_time, b)| {
        b_time.cmp(a_time).then_with(|| a.filename.cmp(&b.filename))
    });

    tracing::debug!("Listing {} media files", found.len());
    Ok(Json(found.into_iter().map(|(_, item)| item).collect()))
}

pub async fn get_media(
    State(state): State<Arc<MediaState>>,
    Path(filename): Path<String>,
) -> Result<Response<Body>, ServerError> {
    if stored_name(&filename) != Some(filename.as_str()) {
        return Err(ServerError::NotFound(filename));
    }

    let data = match fs::read(state.media_root.join(&filename)).await {
        Ok(data) => data,
        Err(e) if e.kind() == ErrorKind::NotFound => return Err(ServerError::NotFound(filename)),
        Err(e) => return Err(e.into()),
    };

    let mime = mime_guess::from_path(&filename).first_or_octet_stream();
    Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, mime.as_ref())
        .body(Body::from(data))
        .map_err(|e| ServerError::Io(std::io::Error::other(e)))
}
