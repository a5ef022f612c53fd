//! PDF content type and signature checks.

/// Content type of every document the registry serves.
pub const PDF_MIME: &str = "application/pdf";

/// Whether a declared content type names PDF, ignoring parameters and case.
pub fn is_pdf_mime(content_type: &str) -> bool {
    content_type
        .split(';')
        .next()
        .is_some_and(|essence| essence.trim().eq_ignore_ascii_case(PDF_MIME))
}

/// Whether a filename carries the `.pdf` extension.
pub fn has_pdf_extension(name: &str) -> bool {
    name.trim().to_ascii_lowercase().ends_with(".pdf")
}

/// Whether the bytes start with the PDF header.
pub fn looks_like_pdf(data: &[u8]) -> bool {
    data.starts_with(b"%PDF-")
}
