use std::path::Path;
use std::process::Command;

use log::debug;
use serde::Deserialize;

use crate::error::ConverterError;

#[derive(Deserialize, Debug)]
struct FFProbeJsonOutput {
    #[serde(default)]
    pub streams: Vec<FFProbeJsonStream>,
    pub format: Option<FFProbeJsonFormat>,
}

#[derive(Deserialize, Debug)]
struct FFProbeJsonStream {
    pub codec_type: Option<String>,
    pub codec_name: Option<String>,
}

#[derive(Deserialize, Debug)]
struct FFProbeJsonFormat {
    pub format_name: Option<String>,
    pub duration: Option<String>,
    pub bit_rate: Option<String>,
}

/// Container duration in seconds.
pub fn probe_duration(ffprobe: &Path, path: &Path) -> Result<f64, ConverterError> {
    let output = Command::new(ffprobe)
        .args(["-v", "error", "-of", "json", "-show_format", "-show_streams"])
        .arg(path)
        .output()?;
    if !output.status.success() {
        return Err(ConverterError::probe(path, "ffprobe did not exit successfully."));
    }

    let utf8 = String::from_utf8_lossy(&output.stdout);
    duration_from_json(path, &utf8)
}

fn duration_from_json(path: &Path, json: &str) -> Result<f64, ConverterError> {
    let deserialized = serde_json::from_str::<FFProbeJsonOutput>(json)?;
    for stream in &deserialized.streams {
        debug!("{:?}: {} stream, codec: {}",
            path,
            stream.codec_type.as_deref().unwrap_or("unknown"),
            stream.codec_name.as_deref().unwrap_or("unknown"));
    }

    let format = deserialized.format
        .ok_or_else(|| ConverterError::probe(path, "ffprobe reported no format."))?;
    debug!("{:?}: format: {:?}, bitrate: {:?}, duration: {:?}", path, format.format_name, format.bit_rate, format.duration);

    match format.duration {
        None => Err(ConverterError::probe(path, "ffprobe reported no duration.")),
        Some(duration) => duration.parse::<f64>().map_err(|_| {
            ConverterError::probe(path, &format!("duration '{}' is not a number.", duration))
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duration_from_json() {
        let json = r#"{
            "streams": [{"codec_type": "video", "codec_name": "h264"}, {"codec_type": "audio", "codec_name": "aac"}],
            "format": {"format_name": "mov,mp4,m4a,3gp,3g2,mj2", "duration": "12.480000", "bit_rate": "1048576"}
        }"#;
        assert_eq!(duration_from_json(Path::new("a.mp4"), json).unwrap(), 12.48);
    }

    #[test]
    fn test_duration_missing() {
        let json = r#"{"format": {"format_name": "image2"}}"#;
        assert!(matches!(duration_from_json(Path::new("a.png"), json), Err(ConverterError::Probe { .. })));
        assert!(matches!(duration_from_json(Path::new("a.png"), "{}"), Err(ConverterError::Probe { .. })));
    }

    #[test]
    fn test_duration_bad_json() {
        assert!(matches!(duration_from_json(Path::new("a"), "nope"), Err(ConverterError::Json(_))));
    }
}
