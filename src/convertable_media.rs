use std::fmt::Display;
use std::fs;
use std::path::PathBuf;

use human_repr::HumanCount;

use crate::encoding_state::EncodingInfo;
use crate::mime::MediaType;

#[derive(Clone, Debug)]
pub struct ConvertableMedia {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub can_use_sound: bool,
    params: Option<String>,
    error: Option<String>,
    media_type: MediaType,
    encoding_info: EncodingInfo,
}

impl ConvertableMedia {
    pub fn new(input_path: PathBuf, output_path: PathBuf, can_use_sound: bool) -> Self {
        ConvertableMedia {
            input_path,
            output_path,
            can_use_sound,
            params: None,
            error: None,
            media_type: MediaType::default(),
            encoding_info: EncodingInfo::new(),
        }
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn media_type(&self) -> MediaType {
        self.media_type
    }

    pub fn encoding_progress(&self) -> f32 {
        self.encoding_info.progress()
    }

    pub fn conversion_finished(&self) -> bool {
        self.encoding_info.conversion_finished()
    }

    pub fn encoding_in_progress(&self) -> bool {
        self.encoding_info.encoding_in_progress()
    }

    pub fn can_be_encoded(&self) -> bool {
        !self.conversion_finished() && !self.encoding_in_progress() && self.error.is_none()
    }

    pub fn update_params(&mut self, params: Option<String>) {
        self.params = params;
    }

    pub fn update_error(&mut self, error: Option<String>) {
        self.error = error;
    }

    pub fn update_media_type(&mut self, media_type: MediaType) {
        self.media_type = media_type;
    }

    pub fn update_encoding_progress(&mut self, progress: f32) {
        self.encoding_info.update_encoding_progress(progress);
    }

    pub fn on_encoding_started(&mut self) {
        self.encoding_info.on_encoding_started();
    }

    pub fn on_encoding_canceled(&mut self) {
        self.encoding_info.on_encoding_canceled();
    }

    pub fn on_encoding_finished(&mut self) {
        self.encoding_info.on_encoding_finished();
    }

    fn status_glyph(&self) -> &'static str {
        if self.error.is_some() {
            "🚫"
        } else if self.conversion_finished() {
            "✅"
        } else if self.encoding_in_progress() {
            "🚧"
        } else if self.media_type == MediaType::Video {
            "☐"
        } else {
            "🤷"
        }
    }
}

impl Display for ConvertableMedia {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let size_str = match fs::metadata(&self.input_path) {
            Err(_) => String::from("------ B"),
            Ok(metadata) => format!("{:<8}", metadata.len().human_count_bytes()),
        };

        write!(
            f,
            "{} {:<7} {} {} -> {}",
            self.status_glyph(),
            self.media_type,
            size_str,
            self.input_path.display(),
            self.output_path.display())?;

        if let Some(params) = &self.params {
            write!(f, "\n    $ {}", params)?;
        }
        if let Some(error) = &self.error {
            write!(f, "\n    {}", error)?;
        }

        Ok(())
    }
}
