use std::io::BufRead;

use serde::Deserialize;

use crate::error::ConverterError;

pub const CONVERT_MEDIA_ACTION: &str = "convert_media";

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct MediaFileToConvert {
    pub input_file_path: String,
    #[serde(default)]
    pub output_file_path: String,
    #[serde(default)]
    pub can_use_sound: bool,
}

#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ConvertRequest {
    pub action: String,
    #[serde(default)]
    pub media_files_to_convert: Vec<MediaFileToConvert>,
}

impl ConvertRequest {
    pub fn convert_media(media_files_to_convert: Vec<MediaFileToConvert>) -> Self {
        ConvertRequest {
            action: String::from(CONVERT_MEDIA_ACTION),
            media_files_to_convert,
        }
    }
}

/// Parses one line of the newline-delimited request stream.
/// Blank lines carry no message and yield `Ok(None)`.
pub fn parse_request_line(line: &str) -> Result<Option<ConvertRequest>, ConverterError> {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    Ok(Some(serde_json::from_str::<ConvertRequest>(trimmed)?))
}

/// Reads every request from `reader`, handing each to `f` in order.
/// A malformed line is handed over as its parse error so the caller can report it.
pub fn read_requests<R: BufRead, F>(reader: R, mut f: F) -> Result<(), ConverterError>
where
    F: FnMut(Result<ConvertRequest, ConverterError>),
{
    for line in reader.lines() {
        match parse_request_line(&line?) {
            Ok(None) => continue,
            Ok(Some(request)) => f(Ok(request)),
            Err(err) => f(Err(err)),
        }
    }

    Ok(())
}
