use std::sync::mpsc::Receiver;

use human_repr::HumanCount;
use kdam::{term, tqdm, Bar, BarExt};

use crate::converter::{ConversionSummary, ConverterEvent};
use crate::convertable_media::ConvertableMedia;

const PROGRESS_STEPS: usize = 1000;

pub fn print_media_list(snapshot: &[ConvertableMedia]) {
    for (index, media) in snapshot.iter().enumerate() {
        println!("{:>3} {}", index + 1, media);
    }
}

/// Draws one progress bar per converting item until the converter hangs up.
pub fn render_events(events: Receiver<ConverterEvent>) {
    term::init(false);
    let mut pbar: Option<Bar> = None;

    for event in events {
        match event {
            ConverterEvent::Started { input, params } => {
                println!("{}", params);
                pbar = Some(tqdm!(
                    total = PROGRESS_STEPS,
                    desc = format!("converting {}", file_name(&input)),
                    position = 0,
                    force_refresh = true
                ));
            },
            ConverterEvent::Progress { progress, total_size, frame, fps, .. } => {
                if let Some(bar) = pbar.as_mut() {
                    bar.set_postfix(postfix(total_size, frame, fps));
                    let _ = bar.update_to(progress_steps(progress));
                }
            },
            ConverterEvent::Finished(input) => {
                if let Some(mut bar) = pbar.take() {
                    let _ = bar.update_to(PROGRESS_STEPS);
                }
                println!("\nConverted {}", file_name(&input));
            },
            ConverterEvent::Canceled(input) => {
                pbar.take();
                println!("\nCanceled {}", file_name(&input));
            },
            ConverterEvent::Failed { input, error } => {
                pbar.take();
                println!("\nFailed {}: {}", file_name(&input), error);
            },
            ConverterEvent::Skipped { input, reason } => {
                println!("Skipped {}: {}", file_name(&input), reason);
            },
        }
    }
}

pub fn summary_line(summary: &ConversionSummary) -> String {
    format!(
        "{} converted, {} failed, {} canceled",
        summary.finished,
        summary.failed,
        summary.canceled)
}

fn postfix(total_size: usize, frame: usize, fps: f64) -> String {
    format!("{} (frame {}, {:.1} fps)", total_size.human_count_bytes(), frame, fps)
}

fn progress_steps(progress: f32) -> usize {
    ((progress.clamp(0.0, 1.0) * PROGRESS_STEPS as f32).round()) as usize
}

fn file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().to_string())
        .unwrap_or_else(|| path.display().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;

    #[test]
    fn test_progress_steps() {
        assert_eq!(progress_steps(0.0), 0);
        assert_eq!(progress_steps(0.5), 500);
        assert_eq!(progress_steps(1.7), PROGRESS_STEPS);
        assert_eq!(progress_steps(-0.2), 0);
    }

    #[test]
    fn test_postfix() {
        assert!(postfix(0, 0, 0.0).ends_with(" (frame 0, 0.0 fps)"));
        assert!(postfix(524288, 120, 29.97).ends_with(" (frame 120, 30.0 fps)"));
    }

    #[test]
    fn test_summary_line() {
        let summary = ConversionSummary { finished: 2, failed: 1, canceled: 0 };
        assert_eq!(summary_line(&summary), "2 converted, 1 failed, 0 canceled");
    }

    #[test]
    fn test_file_name() {
        assert_eq!(file_name(Path::new("/videos/clip.mp4")), "clip.mp4");
    }
}
