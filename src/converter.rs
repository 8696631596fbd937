use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::{Arc, Mutex};
use std::thread;

use log::{info, warn};

use crate::encoder::{ConversionResult, Encoder};
use crate::ffmpeg::webm::{build_args, command_line, WebmParameters};
use crate::ffmpeg::EncoderOptions;
use crate::media_list::{lock_media, MediaList, SharedMedia};
use crate::mime::MediaType;

#[derive(Clone, Debug, PartialEq)]
pub enum ConverterEvent {
    Started { input: PathBuf, params: String },
    Progress { input: PathBuf, progress: f32, total_size: usize, frame: usize, fps: f64 },
    Finished(PathBuf),
    Canceled(PathBuf),
    Failed { input: PathBuf, error: String },
    Skipped { input: PathBuf, reason: String },
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConversionSummary {
    pub finished: usize,
    pub failed: usize,
    pub canceled: usize,
}

pub struct Converter {
    encoder: Arc<dyn Encoder>,
    options: EncoderOptions,
    subscribers: Vec<Sender<ConverterEvent>>,
}

impl Converter {
    pub fn new(encoder: Arc<dyn Encoder>, options: EncoderOptions) -> Self {
        Converter {
            encoder,
            options,
            subscribers: vec![],
        }
    }

    pub fn subscribe(&mut self) -> Receiver<ConverterEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }

    fn publish(&self, event: ConverterEvent) {
        for tx in &self.subscribers {
            let _ = tx.send(event.clone());
        }
    }

    /// Converts every encodable item in list order, one at a time.
    /// A canceled session stops the loop; the remaining items are left untouched.
    pub fn convert_media(&self, media_list: &Arc<Mutex<MediaList>>) -> ConversionSummary {
        let media_to_convert = media_list
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .encodable();
        let mut summary = ConversionSummary::default();

        for media in media_to_convert {
            let (input, media_type) = {
                let m = lock_media(&media);
                (m.input_path.clone(), m.media_type())
            };

            match media_type {
                MediaType::Video => match self.convert_to_webm(&media) {
                    ConversionResult::Success => summary.finished += 1,
                    ConversionResult::Error(_) => summary.failed += 1,
                    ConversionResult::Canceled => {
                        summary.canceled += 1;
                        break;
                    },
                },
                MediaType::Image => {
                    let reason = String::from("Image conversion is not supported");
                    lock_media(&media).update_error(Some(reason.clone()));
                    self.publish(ConverterEvent::Skipped { input, reason });
                },
                MediaType::Unknown => {
                    self.publish(ConverterEvent::Skipped { input, reason: String::from("Unknown media type") });
                },
            }
        }

        summary
    }

    fn convert_to_webm(&self, media: &SharedMedia) -> ConversionResult {
        let (input, output, can_use_sound) = {
            let m = lock_media(media);
            (m.input_path.clone(), m.output_path.clone(), m.can_use_sound)
        };

        let duration = match self.encoder.probe_duration(&input) {
            Ok(duration) => duration,
            Err(err) => {
                let error = err.to_string();
                warn!("{}", error);
                lock_media(media).update_error(Some(error.clone()));
                self.publish(ConverterEvent::Failed { input, error: error.clone() });
                return ConversionResult::Error(error);
            },
        };

        let parameters = WebmParameters::new(&self.options, can_use_sound);
        let args = build_args(&input, &output, &parameters, self.options.overwrite);
        let params = command_line(&self.encoder.program(), &args);
        info!("Running '{}'...", params);

        {
            let mut m = lock_media(media);
            m.update_params(Some(params.clone()));
            m.on_encoding_started();
        }
        self.publish(ConverterEvent::Started { input: input.clone(), params });

        let (progress_tx, progress_rx) = mpsc::channel();
        let (result_tx, result_rx) = mpsc::sync_channel(1);
        let encoder = Arc::clone(&self.encoder);
        let session = thread::spawn(move || {
            let result = encoder.execute(&args, &output, progress_tx);
            let _ = result_tx.send(result);
        });

        for stats in progress_rx {
            let progress = stats.progress(duration);
            lock_media(media).update_encoding_progress(progress);
            self.publish(ConverterEvent::Progress {
                input: input.clone(),
                progress,
                total_size: stats.total_size,
                frame: stats.frame,
                fps: stats.fps,
            });
        }

        let result = result_rx
            .recv()
            .unwrap_or_else(|_| ConversionResult::Error(String::from("Encoder session ended without a result")));
        if session.join().is_err() {
            warn!("encoder session for {:?} panicked", input);
        }

        let mut m = lock_media(media);
        match &result {
            ConversionResult::Success => {
                m.on_encoding_finished();
                self.publish(ConverterEvent::Finished(input));
            },
            ConversionResult::Canceled => {
                m.on_encoding_canceled();
                self.publish(ConverterEvent::Canceled(input));
            },
            ConversionResult::Error(error) => {
                m.update_error(Some(error.clone()));
                // back to unset so a later request for the same input can retry it
                m.on_encoding_canceled();
                self.publish(ConverterEvent::Failed { input, error: error.clone() });
            },
        }

        result
    }
}
