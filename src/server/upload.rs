use crate::{
    error::{RelayError, Result},
    models::Upload,
};
use actix_web::web;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use std::convert::Infallible;

/// Multipart field carrying the scoreboard image.
pub const UPLOAD_FIELD: &str = "file";

const PART_CONTENT_TYPE: &str = "content-type";

/// Buffers the request body, refusing anything above `limit` bytes.
pub async fn read_body(mut payload: web::Payload, limit: usize) -> Result<Bytes> {
    let mut body = BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk.map_err(|e| RelayError::UploadError(e.to_string()))?;
        if body.len() + chunk.len() > limit {
            return Err(RelayError::UploadTooLarge(limit));
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body.freeze())
}

/// Boundary of a `multipart/form-data` request, checked before the body is read.
pub fn parse_boundary(content_type: Option<&str>) -> Result<String> {
    let content_type = content_type.ok_or_else(|| {
        RelayError::UploadError("expected a multipart/form-data request".into())
    })?;
    multer::parse_boundary(content_type).map_err(|e| RelayError::UploadError(e.to_string()))
}

/// Extracts the `file` part of a buffered multipart body.
///
/// The part's `Content-Type` header is kept exactly as sent.
pub async fn read_upload(boundary: String, body: Bytes) -> Result<Upload> {
    let stream = futures::stream::once(async move { Ok::<Bytes, Infallible>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| RelayError::UploadError(e.to_string()))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }
        let declared = field
            .headers()
            .get(PART_CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| RelayError::UploadError(e.to_string()))?;
        return Ok(Upload::new(bytes.to_vec(), declared));
    }

    Err(RelayError::UploadError(format!(
        "missing multipart field `{}`",
        UPLOAD_FIELD
    )))
}
