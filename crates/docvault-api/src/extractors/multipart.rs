//! Reads the multipart upload form shared by document and version uploads.

use axum::extract::Multipart;

use docvault_core::error::AppError;
use docvault_core::types::FolderId;
use docvault_service::document::UploadedFile;

use crate::error::ApiError;
use crate::extractors::path::parse_id;

/// Fields of an upload form.
///
/// `file` is the PDF part; text parts are `title`, `description`, and
/// `folderId` (or `folder_id`). Unknown parts are ignored.
#[derive(Debug, Default)]
pub struct UploadForm {
    /// The uploaded file part.
    pub file: Option<UploadedFile>,
    /// Title text part.
    pub title: Option<String>,
    /// Description text part.
    pub description: Option<String>,
    /// Target folder text part.
    pub folder_id: Option<FolderId>,
}

impl UploadForm {
    /// Drains every part of the request.
    pub async fn read(mut multipart: Multipart) -> Result<Self, ApiError> {
        let mut form = Self::default();

        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or("").to_string();
            match name.as_str() {
                "file" => {
                    let filename = field.file_name().unwrap_or("").to_string();
                    let content_type = field.content_type().map(String::from);
                    let data = field.bytes().await?;
                    form.file = Some(UploadedFile {
                        filename,
                        content_type,
                        data,
                    });
                }
                "title" => form.title = non_empty(field.text().await?),
                "description" => form.description = non_empty(field.text().await?),
                "folderId" | "folder_id" => {
                    form.folder_id = match non_empty(field.text().await?) {
                        Some(text) => Some(parse_id(text.trim(), "folderId")?),
                        None => None,
                    };
                }
                _ => {}
            }
        }

        Ok(form)
    }

    /// Takes the file part, failing when the form had none.
    pub fn take_file(&mut self) -> Result<UploadedFile, AppError> {
        self.file
            .take()
            .ok_or_else(|| AppError::validation("Multipart field 'file' is required"))
    }
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}
