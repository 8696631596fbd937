use std::fmt::Display;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum MediaType {
    Video,
    Image,
    #[default]
    Unknown,
}

impl MediaType {
    /// Classifies by the top-level part of a MIME type.
    /// Returns `None` for anything that is neither video nor image.
    pub fn from_mime_type(mime_type: &str) -> Option<Self> {
        match top_level_type(mime_type).to_uppercase().as_str() {
            "VIDEO" => Some(MediaType::Video),
            "IMAGE" => Some(MediaType::Image),
            _ => None,
        }
    }
}

impl Display for MediaType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", format!("{:?}", self).to_lowercase())
    }
}

pub fn top_level_type(mime_type: &str) -> &str {
    mime_type.split('/').next().unwrap_or("")
}

const EXTENSION_MIME_TYPES: &[(&str, &str)] = &[
    ("3g2", "video/3gpp2"),
    ("3gp", "video/3gpp"),
    ("avi", "video/x-msvideo"),
    ("flv", "video/x-flv"),
    ("m4v", "video/x-m4v"),
    ("mkv", "video/x-matroska"),
    ("mov", "video/quicktime"),
    ("mp4", "video/mp4"),
    ("mpeg", "video/mpeg"),
    ("mpg", "video/mpeg"),
    ("ogv", "video/ogg"),
    ("ts", "video/mp2t"),
    ("webm", "video/webm"),
    ("wmv", "video/x-ms-wmv"),
    ("bmp", "image/bmp"),
    ("gif", "image/gif"),
    ("heic", "image/heic"),
    ("jpeg", "image/jpeg"),
    ("jpg", "image/jpeg"),
    ("png", "image/png"),
    ("webp", "image/webp"),
    ("aac", "audio/aac"),
    ("flac", "audio/flac"),
    ("m4a", "audio/mp4"),
    ("mp3", "audio/mpeg"),
    ("ogg", "audio/ogg"),
    ("opus", "audio/opus"),
    ("wav", "audio/x-wav"),
    ("json", "application/json"),
    ("pdf", "application/pdf"),
    ("txt", "text/plain"),
    ("zip", "application/zip"),
];

pub fn mime_type_from_extension(extension: &str) -> Option<&'static str> {
    let extension = extension.to_lowercase();
    EXTENSION_MIME_TYPES
        .iter()
        .find(|(ext, _)| *ext == extension)
        .map(|(_, mime_type)| *mime_type)
}
