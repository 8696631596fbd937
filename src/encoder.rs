use std::path::Path;
use std::sync::mpsc::Sender;

use crate::error::ConverterError;

#[derive(Clone, Debug, PartialEq)]
pub enum ConversionResult {
    Success,
    Canceled,
    Error(String),
}

/// One block of statistics reported by a running encoder session.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EncodeStatistics {
    pub frame: usize,
    pub fps: f64,
    pub total_size: usize,
    pub out_time_us: u64,
}

impl EncodeStatistics {
    /// Encoded time over the input duration, clamped to `[0, 1]`.
    pub fn progress(&self, duration_secs: f64) -> f32 {
        if duration_secs <= 0.0 {
            return 0.0;
        }

        let encoded_secs = self.out_time_us as f64 / 1_000_000.0;
        (encoded_secs / duration_secs).clamp(0.0, 1.0) as f32
    }
}

/// The external encoding tool. `execute` blocks until the session completes,
/// fails or notices it was canceled; statistics are streamed over `progress_tx`.
pub trait Encoder: Send + Sync {
    fn probe_duration(&self, input: &Path) -> Result<f64, ConverterError>;

    fn execute(&self, args: &[String], output: &Path, progress_tx: Sender<EncodeStatistics>) -> ConversionResult;

    fn program(&self) -> String;
}
