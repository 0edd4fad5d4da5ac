//! Supporting document metadata.

use std::path::Path;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// File extensions accepted for attached documents.
pub const ALLOWED_EXTENSIONS: &[&str] = &[
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "jpg", "jpeg", "png", "gif", "bmp",
    "tiff", "txt", "rtf", "odt", "ods", "odp",
];

const IMAGE_EXTENSIONS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".bmp", ".tiff", ".webp"];

/// Metadata of a document attached to a ledger entry.
///
/// The file itself lives in external storage; only its location is kept.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    pub id: u64,

    /// Ledger entry the document supports
    pub step_progress_id: u64,

    /// Original file name
    pub filename: String,

    /// Location in external storage
    pub file_path: String,

    /// Size in bytes
    pub file_size: Option<u64>,

    /// MIME type
    pub file_type: Option<String>,

    /// Free-text classification (deed, plan, receipt, ...)
    pub document_type: Option<String>,

    pub description: Option<String>,

    /// ID of the user who attached the document
    pub uploaded_by: Option<u64>,

    /// Timestamp when the document was attached (UTC)
    pub created_at: Timestamp,
}

impl Document {
    /// Lowercase extension including the leading dot, or an empty string.
    pub fn extension(&self) -> String {
        file_extension(&self.filename)
    }

    pub fn is_image(&self) -> bool {
        IMAGE_EXTENSIONS.contains(&self.extension().as_str())
    }

    pub fn is_pdf(&self) -> bool {
        self.extension() == ".pdf"
    }

    /// Size formatted with a binary unit and one decimal (`1.5 KB`).
    pub fn formatted_size(&self) -> Option<String> {
        self.file_size.map(format_file_size)
    }
}

/// Lowercase extension of `filename` including the leading dot.
pub fn file_extension(filename: &str) -> String {
    Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{}", ext.to_lowercase()))
        .unwrap_or_default()
}

/// Whether `filename` carries one of the [`ALLOWED_EXTENSIONS`].
pub fn is_allowed_filename(filename: &str) -> bool {
    let ext = file_extension(filename);
    ext.strip_prefix('.')
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext))
}

/// Formats a byte count as `B`, `KB`, `MB`, `GB` or `TB` with one decimal.
pub fn format_file_size(bytes: u64) -> String {
    let mut size = bytes as f64;
    for unit in ["B", "KB", "MB", "GB"] {
        if size < 1024.0 {
            return format!("{size:.1} {unit}");
        }
        size /= 1024.0;
    }
    format!("{size:.1} TB")
}
