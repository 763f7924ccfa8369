//! File attachments and the per-file intake rules.
//!
//! Each file in a batch is judged on its own: oversized or unsupported files are rejected
//! with a reason, the rest of the batch is kept.

use super::DomainError;
use serde::{Deserialize, Serialize};

/// Default per-file ceiling: 50MB.
pub const DEFAULT_MAX_ATTACHMENT_BYTES: u64 = 50 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: String,
    pub name: String,
    /// Where the file can be retrieved from (a `file://` URL for local picks).
    pub url: String,
    /// MIME type, e.g. `image/png`.
    #[serde(rename = "type")]
    pub mime: String,
    pub size: u64,
}

/// Broad family of an accepted attachment. Drives the icon/label shown in lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AttachmentKind {
    Image,
    Video,
    Audio,
    Document,
}

impl AttachmentKind {
    /// Classifies a MIME type. Anything that is not image/video/audio is a document.
    pub fn from_mime(mime: &str) -> Self {
        if mime.starts_with("image/") {
            AttachmentKind::Image
        } else if mime.starts_with("video/") {
            AttachmentKind::Video
        } else if mime.starts_with("audio/") {
            AttachmentKind::Audio
        } else {
            AttachmentKind::Document
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            AttachmentKind::Image => "Image",
            AttachmentKind::Video => "Video",
            AttachmentKind::Audio => "Audio",
            AttachmentKind::Document => "Document",
        }
    }
}

impl Attachment {
    pub fn kind(&self) -> AttachmentKind {
        AttachmentKind::from_mime(&self.mime)
    }
}

/// Accepted MIME families: any image, video or audio type, and PDF.
pub fn is_accepted_mime(mime: &str) -> bool {
    let mime = mime.trim().to_ascii_lowercase();
    mime.starts_with("image/")
        || mime.starts_with("video/")
        || mime.starts_with("audio/")
        || mime == "application/pdf"
}

/// Best-effort MIME type from a file extension. Unknown extensions map to `application/octet-stream`.
pub fn mime_from_extension(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "heic" => "image/heic",
        "bmp" => "image/bmp",
        "mp4" => "video/mp4",
        "mov" => "video/quicktime",
        "webm" => "video/webm",
        "avi" => "video/x-msvideo",
        "mkv" => "video/x-matroska",
        "mp3" => "audio/mpeg",
        "wav" => "audio/wav",
        "ogg" => "audio/ogg",
        "m4a" => "audio/mp4",
        "aac" => "audio/aac",
        "pdf" => "application/pdf",
        _ => "application/octet-stream",
    }
}

/// A file the user picked, before validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileCandidate {
    pub name: String,
    pub url: String,
    pub mime: String,
    pub size: u64,
}

/// Outcome of validating a batch of picked files.
#[derive(Debug, Default)]
pub struct AttachmentIntake {
    pub accepted: Vec<Attachment>,
    pub rejected: Vec<DomainError>,
}

impl AttachmentIntake {
    /// Validates every candidate independently against `max_bytes` and the accepted MIME families.
    /// `next_id` supplies ids for accepted files.
    pub fn from_candidates(
        candidates: impl IntoIterator<Item = FileCandidate>,
        max_bytes: u64,
        mut next_id: impl FnMut() -> String,
    ) -> Self {
        let mut intake = Self::default();
        for file in candidates {
            if file.size > max_bytes {
                intake.rejected.push(DomainError::AttachmentTooLarge {
                    name: file.name,
                    size: file.size,
                    max: max_bytes,
                });
            } else if !is_accepted_mime(&file.mime) {
                intake.rejected.push(DomainError::UnsupportedMediaType {
                    name: file.name,
                    mime: file.mime,
                });
            } else {
                intake.accepted.push(Attachment {
                    id: next_id(),
                    name: file.name,
                    url: file.url,
                    mime: file.mime,
                    size: file.size,
                });
            }
        }
        intake
    }
}
