use std::fs;
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStderr, ChildStdout, Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::Sender;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

use log::{debug, error, warn};

use crate::encoder::{ConversionResult, EncodeStatistics, Encoder};
use crate::error::ConverterError;
use super::probe::probe_duration;
use super::progress::{handle_ffmpeg_stdout_line, FFmpegStdoutResult};
use super::webm::command_line;
use super::EncoderOptions;

/// Runs the `ffmpeg` binary as a child process.
/// Raising `stop` makes a running session kill its child and report `Canceled`.
pub struct FFmpegEncoder {
    ffmpeg: PathBuf,
    ffprobe: PathBuf,
    stop: Arc<AtomicBool>,
}

impl FFmpegEncoder {
    pub fn new(options: &EncoderOptions, stop: Arc<AtomicBool>) -> Self {
        FFmpegEncoder {
            ffmpeg: options.ffmpeg.clone(),
            ffprobe: options.ffprobe.clone(),
            stop,
        }
    }

    fn should_stop(&self) -> bool {
        self.stop.load(Ordering::SeqCst)
    }

    /// Returns true when the session was stopped before ffmpeg finished.
    fn consume_stdout(&self, stdout: ChildStdout, progress_tx: &Sender<EncodeStatistics>) -> bool {
        let mut stats = EncodeStatistics::default();
        let stdout_reader = BufReader::new(stdout);
        for line in stdout_reader.lines() {
            if let Ok(l) = line {
                match handle_ffmpeg_stdout_line(&l, &mut stats) {
                    Ok(FFmpegStdoutResult::Continue) => (),
                    Ok(FFmpegStdoutResult::Render) | Ok(FFmpegStdoutResult::End) => {
                        let _ = progress_tx.send(stats.clone());
                    },
                    Err(err) => debug!("ignoring progress line: {}", err),
                }
            }

            if self.should_stop() {
                return true;
            }
        }

        self.should_stop()
    }
}

impl Encoder for FFmpegEncoder {
    fn probe_duration(&self, input: &Path) -> Result<f64, ConverterError> {
        probe_duration(&self.ffprobe, input)
    }

    fn execute(&self, args: &[String], output: &Path, progress_tx: Sender<EncodeStatistics>) -> ConversionResult {
        let full_command = command_line(&self.program(), args);
        if self.should_stop() {
            return ConversionResult::Canceled;
        }

        let preexisting_output = output.exists();

        let mut child = match Command::new(&self.ffmpeg)
            .args(args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn() {
            Ok(child) => child,
            Err(err) => {
                error!("Running '{}'... unable to start: {}", full_command, err);
                return ConversionResult::Error(format!("Running '{}'... unable to start ffmpeg: {}", full_command, err));
            },
        };

        let stderr_thread = child.stderr.take().map(drain_stderr);
        let stopped = match child.stdout.take() {
            Some(stdout) => self.consume_stdout(stdout, &progress_tx),
            None => false,
        };

        if stopped {
            kill(&mut child);
        }

        let status = child.wait();
        let stderr = stderr_thread
            .and_then(|t| t.join().ok())
            .unwrap_or_default();

        let result = if stopped {
            debug!("Running '{}'... Canceled", full_command);
            ConversionResult::Canceled
        } else {
            match status {
                Ok(status) if status.success() => {
                    debug!("Running '{}'... Success", full_command);
                    ConversionResult::Success
                },
                Ok(status) => {
                    let rc = match status.code() {
                        Some(code) => code.to_string(),
                        None => String::from("killed by signal"),
                    };
                    let msg = format!("Running '{}'... FAILURE! rc: {}. {}", full_command, rc, stderr.trim());
                    error!("{}", msg);
                    ConversionResult::Error(msg)
                },
                Err(err) => {
                    let msg = format!("Running '{}'... FAILURE! There was an error waiting for ffmpeg: {}", full_command, err);
                    error!("{}", msg);
                    ConversionResult::Error(msg)
                },
            }
        };

        // a partially written output is of no use
        if result != ConversionResult::Success && !preexisting_output {
            if let Err(err) = fs::remove_file(output) {
                debug!("not removing {:?}: {}", output, err);
            }
        }

        result
    }

    fn program(&self) -> String {
        self.ffmpeg.display().to_string()
    }
}

fn kill(child: &mut Child) {
    if let Err(err) = child.kill() {
        warn!("error killing ffmpeg process ({}) {err:?}", child.id());
    } else {
        debug!("killed ffmpeg process ({})", child.id());
    }
}

fn drain_stderr(stderr: ChildStderr) -> JoinHandle<String> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        match BufReader::new(stderr).read_to_end(&mut buf) {
            Ok(_) => String::from_utf8_lossy(&buf).to_string(),
            Err(_) => String::new(),
        }
    })
}
