//! Display kinds derived from file extensions.

use serde::Serialize;

/// Icon family used by the browser UI.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Pdf,
    Word,
    Excel,
    PowerPoint,
    Image,
    Audio,
    Video,
    Archive,
    Text,
    Code,
    /// Anything not in the known set.
    Generic,
}

impl FileKind {
    /// Classify a lowercase extension (as produced by `extension_of`).
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "pdf" => FileKind::Pdf,
            "doc" | "docx" => FileKind::Word,
            "xls" | "xlsx" => FileKind::Excel,
            "ppt" | "pptx" => FileKind::PowerPoint,
            "jpg" | "jpeg" | "png" | "gif" | "webp" => FileKind::Image,
            "mp3" | "wav" => FileKind::Audio,
            "mp4" | "webm" | "mov" | "ogg" => FileKind::Video,
            "zip" | "rar" => FileKind::Archive,
            "txt" => FileKind::Text,
            "html" | "css" | "js" | "json" => FileKind::Code,
            _ => FileKind::Generic,
        }
    }

    /// Icon identifier understood by the UI stylesheet.
    pub fn icon(self) -> &'static str {
        match self {
            FileKind::Pdf => "file-pdf",
            FileKind::Word => "file-word",
            FileKind::Excel => "file-excel",
            FileKind::PowerPoint => "file-powerpoint",
            FileKind::Image => "file-image",
            FileKind::Audio => "file-audio",
            FileKind::Video => "file-video",
            FileKind::Archive => "file-archive",
            FileKind::Text => "file-alt",
            FileKind::Code => "file-code",
            FileKind::Generic => "file",
        }
    }
}

/// Inline preview the UI can offer for a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Preview {
    Image,
    Video,
    None,
}

impl Preview {
    /// Preview kind for a lowercase extension.
    ///
    /// Only formats browsers play natively are previewed; `mov` gets a video
    /// icon but no player.
    pub fn from_extension(ext: &str) -> Self {
        match ext {
            "jpg" | "jpeg" | "png" | "gif" | "webp" => Preview::Image,
            "mp4" | "webm" | "ogg" => Preview::Video,
            _ => Preview::None,
        }
    }
}
