use std::path::Path;

use super::{AudioCodec, EncoderOptions};

/// Video/audio encoder choice for one WebM conversion.
pub struct WebmParameters {
    vp9: bool,
    cpu_used: usize,
    audio: Option<AudioCodec>,
}

impl WebmParameters {
    pub fn new(options: &EncoderOptions, can_use_sound: bool) -> Self {
        WebmParameters {
            vp9: options.vp9,
            cpu_used: options.cpu_used(),
            audio: if can_use_sound { Some(options.audio) } else { None },
        }
    }

    pub fn parameters(&self) -> Vec<String> {
        let video = if self.vp9 { "libvpx-vp9" } else { "libvpx" };
        let mut params = vec![
            String::from("-c:v"), String::from(video),
            String::from("-cpu-used"), self.cpu_used.to_string(),
        ];

        match self.audio {
            None => params.push(String::from("-an")),
            Some(codec) => {
                params.push(String::from("-c:a"));
                params.push(String::from(codec.encoder_name()));
            },
        }

        params
    }
}

pub fn build_args(input: &Path, output: &Path, parameters: &WebmParameters, overwrite: bool) -> Vec<String> {
    let mut args = vec![
        String::from("-hide_banner"),
        String::from("-nostats"),
        String::from("-loglevel"), String::from("warning"),
        String::from("-progress"), String::from("pipe:1"),
        String::from(if overwrite { "-y" } else { "-n" }),
        String::from("-i"), input.display().to_string(),
    ];
    args.append(&mut parameters.parameters());

    // explicitly set the container, regardless of the destination extension
    args.push(String::from("-f"));
    args.push(String::from("webm"));

    args.push(output.display().to_string());
    args
}

/// Human readable command line, quoting arguments that contain whitespace.
pub fn command_line(program: &str, args: &[String]) -> String {
    let mut parts = vec![String::from(program)];
    for arg in args {
        if arg.chars().any(char::is_whitespace) {
            parts.push(format!("'{}'", arg));
        } else {
            parts.push(arg.clone());
        }
    }
    parts.join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options(vp9: bool) -> EncoderOptions {
        EncoderOptions {
            vp9,
            cpu_used: Some(4),
            ..Default::default()
        }
    }

    #[test]
    fn test_vp8_without_sound() {
        let params = WebmParameters::new(&options(false), false).parameters();
        assert_eq!(params, vec!["-c:v", "libvpx", "-cpu-used", "4", "-an"]);
    }

    #[test]
    fn test_vp9_with_sound() {
        let mut opts = options(true);
        opts.audio = AudioCodec::Vorbis;
        let params = WebmParameters::new(&opts, true).parameters();
        assert_eq!(params, vec!["-c:v", "libvpx-vp9", "-cpu-used", "4", "-c:a", "libvorbis"]);
    }

    #[test]
    fn test_build_args() {
        let parameters = WebmParameters::new(&options(false), true);
        let args = build_args(Path::new("/in/a.mp4"), Path::new("/out/a.webm"), &parameters, false);
        assert_eq!(&args[..9], &["-hide_banner", "-nostats", "-loglevel", "warning", "-progress", "pipe:1", "-n", "-i", "/in/a.mp4"]);
        assert_eq!(&args[args.len() - 3..], &["-f", "webm", "/out/a.webm"]);
        assert!(args.contains(&String::from("libopus")));

        let args = build_args(Path::new("a.mp4"), Path::new("a.webm"), &parameters, true);
        assert_eq!(args[6], "-y");
    }

    #[test]
    fn test_command_line() {
        let args = vec![String::from("-i"), String::from("/my videos/a.mp4")];
        assert_eq!(command_line("ffmpeg", &args), "ffmpeg -i '/my videos/a.mp4'");
    }
}
