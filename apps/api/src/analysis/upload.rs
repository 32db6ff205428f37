//! Uploaded résumé files and the advertised file-type list.
//!
//! Acceptance is advisory only: anything outside the list is still forwarded
//! and any rejection comes from the remote service.

use bytes::Bytes;

/// Extension → MIME type for the formats the upload surface advertises.
pub const ACCEPTED_TYPES: &[(&str, &str)] = &[
    ("pdf", "application/pdf"),
    ("doc", "application/msword"),
    (
        "docx",
        "application/vnd.openxmlformats-officedocument.wordprocessingml.document",
    ),
    ("txt", "text/plain"),
    ("md", "text/markdown"),
];

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// One uploaded résumé: raw bytes plus its declared type.
#[derive(Debug, Clone)]
pub struct ResumeFile {
    pub file_name: String,
    pub mime_type: String,
    pub bytes: Bytes,
}

impl ResumeFile {
    /// Builds a file from an upload part. A missing or blank content type is
    /// inferred from the extension.
    pub fn new(file_name: impl Into<String>, content_type: Option<&str>, bytes: Bytes) -> Self {
        let file_name = file_name.into();
        let mime_type = content_type
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .map(str::to_string)
            .unwrap_or_else(|| infer_mime_type(&file_name).to_string());

        Self {
            file_name,
            mime_type,
            bytes,
        }
    }

    /// Whether the extension or MIME type is in the advertised list.
    pub fn is_advertised_type(&self) -> bool {
        let ext = extension(&self.file_name);
        let mime = base_mime(&self.mime_type);
        ACCEPTED_TYPES.iter().any(|(accepted_ext, accepted_mime)| {
            ext.as_deref() == Some(*accepted_ext) || mime.eq_ignore_ascii_case(accepted_mime)
        })
    }
}

fn extension(file_name: &str) -> Option<String> {
    let (stem, ext) = file_name.rsplit_once('.')?;
    if stem.is_empty() {
        return None;
    }
    Some(ext.to_ascii_lowercase())
}

/// Strips parameters such as `; charset=utf-8`.
fn base_mime(mime_type: &str) -> &str {
    mime_type.split(';').next().unwrap_or("").trim()
}

pub fn infer_mime_type(file_name: &str) -> &'static str {
    let Some(ext) = extension(file_name) else {
        return FALLBACK_MIME_TYPE;
    };
    ACCEPTED_TYPES
        .iter()
        .find(|(accepted_ext, _)| *accepted_ext == ext)
        .map(|(_, mime)| *mime)
        .unwrap_or(FALLBACK_MIME_TYPE)
}
