use std::path::PathBuf;
use std::process::{Command, Stdio};
use std::thread;

pub mod encoder;
pub mod probe;
pub mod progress;
pub mod webm;

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum AudioCodec {
    Opus,
    Vorbis,
}

impl AudioCodec {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "opus" | "libopus" => Some(AudioCodec::Opus),
            "vorbis" | "libvorbis" => Some(AudioCodec::Vorbis),
            _ => None,
        }
    }

    pub fn encoder_name(&self) -> &'static str {
        match self {
            AudioCodec::Opus => "libopus",
            AudioCodec::Vorbis => "libvorbis",
        }
    }
}

#[derive(Clone, Debug)]
pub struct EncoderOptions {
    pub ffmpeg: PathBuf,
    pub ffprobe: PathBuf,
    pub vp9: bool,
    pub audio: AudioCodec,
    pub cpu_used: Option<usize>,
    pub overwrite: bool,
}

impl Default for EncoderOptions {
    fn default() -> Self {
        EncoderOptions {
            ffmpeg: PathBuf::from("ffmpeg"),
            ffprobe: PathBuf::from("ffprobe"),
            vp9: false,
            audio: AudioCodec::Opus,
            cpu_used: None,
            overwrite: false,
        }
    }
}

impl EncoderOptions {
    /// Configured value, or every core but two (at least two).
    pub fn cpu_used(&self) -> usize {
        match self.cpu_used {
            Some(n) if n > 0 => n,
            _ => {
                let cores = thread::available_parallelism().map(|n| n.get()).unwrap_or(1);
                cores.saturating_sub(2).max(2)
            },
        }
    }
}

pub struct FFmpeg {
    program: PathBuf,
}

impl FFmpeg {
    pub fn new(program: PathBuf) -> Self {
        FFmpeg { program }
    }

    pub fn is_installed(&self) -> bool {
        let cmd = Command::new(&self.program)
            .arg("-version")
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status();
        match cmd {
            Ok(status) => status.success(),
            Err(_) => false,
        }
    }
}
