//! Content streaming handler.

use axum::body::Body;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Path, Query, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::Response;
use futures::TryStreamExt;

use docvault_core::error::AppError;
use docvault_core::types::DocumentId;

use crate::dto::request::ContentQuery;
use crate::error::ApiError;
use crate::extractors::path::parse_id;
use crate::state::AppState;

/// GET /api/documents/{id}/content?version=...
///
/// Streams the stored bytes of the requested version, or the current one
/// when no version is given.
pub async fn get_content(
    State(state): State<AppState>,
    Path(id): Path<String>,
    query: Result<Query<ContentQuery>, QueryRejection>,
) -> Result<Response, ApiError> {
    let id: DocumentId = parse_id(&id, "document id")?;
    let Query(query) = query?;

    let content = state.content_resolver.resolve(id, query.version).await?;
    let stream = state.content_resolver.open_stream(&content).await?;

    let document_id = content.document_id;
    let version = content.version_number;
    let stream = stream.inspect_err(move |e| {
        tracing::warn!(
            document_id = %document_id,
            version,
            error = %e,
            "Content stream failed mid-transfer"
        );
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content.mime_type.as_str())
        .header(
            header::CONTENT_DISPOSITION,
            content_disposition(&content.original_filename),
        )
        .header(header::CONTENT_LENGTH, content.file_size)
        .body(Body::from_stream(stream))
        .map_err(|e| AppError::internal(format!("Response build failed: {e}")))?;

    Ok(response)
}

/// Builds an `inline` Content-Disposition value.
///
/// The quoted `filename` carries an ASCII rendition; non-ASCII names are
/// also sent percent-encoded in `filename*`.
pub fn content_disposition(filename: &str) -> HeaderValue {
    let ascii: String = filename
        .chars()
        .map(|c| match c {
            '"' | '\\' => '_',
            c if c.is_ascii() && !c.is_ascii_control() => c,
            _ => '_',
        })
        .collect();

    let value = if filename.is_ascii() {
        format!("inline; filename=\"{ascii}\"")
    } else {
        format!(
            "inline; filename=\"{ascii}\"; filename*=UTF-8''{}",
            percent_encode(filename)
        )
    };

    HeaderValue::from_str(&value).unwrap_or_else(|_| HeaderValue::from_static("inline"))
}

fn percent_encode(value: &str) -> String {
    let mut out = String::with_capacity(value.len() * 3);
    for byte in value.bytes() {
        if byte.is_ascii_alphanumeric() || b"-._~".contains(&byte) {
            out.push(byte as char);
        } else {
            out.push_str(&format!("%{byte:02X}"));
        }
    }
    out
}
