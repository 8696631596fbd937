use crate::encoder::EncodeStatistics;
use crate::error::ConverterError;

#[derive(Debug, PartialEq)]
pub enum FFmpegStdoutResult {
    Continue,
    Render,
    End,
}

/// Folds one `key=value` line of `-progress` output into `stats`.
/// `progress=continue` closes a statistics block, `progress=end` closes the last one.
pub fn handle_ffmpeg_stdout_line(line: &str, stats: &mut EncodeStatistics) -> Result<FFmpegStdoutResult, ConverterError> {
    let Some((key, value)) = line.trim().split_once('=') else {
        return Ok(FFmpegStdoutResult::Continue);
    };
    let value = value.trim();

    match key {
        "frame" => stats.frame = parse_value(key, value)?.unwrap_or(stats.frame),
        "fps" => stats.fps = parse_value(key, value)?.unwrap_or(stats.fps),
        "total_size" => stats.total_size = parse_value(key, value)?.unwrap_or(stats.total_size),
        // both are microseconds; out_time_ms is misnamed by ffmpeg
        "out_time_us" | "out_time_ms" => stats.out_time_us = parse_value(key, value)?.unwrap_or(stats.out_time_us),
        "progress" => return Ok(match value {
            "end" => FFmpegStdoutResult::End,
            _ => FFmpegStdoutResult::Render,
        }),
        _ => (),
    }

    Ok(FFmpegStdoutResult::Continue)
}

fn parse_value<T: std::str::FromStr>(key: &str, value: &str) -> Result<Option<T>, ConverterError> {
    if value == "N/A" {
        return Ok(None);
    }

    value.parse::<T>().map(Some).map_err(|_| ConverterError::Progress {
        key: String::from(key),
        value: String::from(value),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_statistics_block() {
        let block = "frame=120\nfps=29.97\ntotal_size=524288\nout_time_us=4000000\nout_time_ms=4000000\nout_time=00:00:04.000000\nspeed=1.5x\nprogress=continue";
        let mut stats = EncodeStatistics::default();
        let results: Vec<FFmpegStdoutResult> = block
            .lines()
            .map(|l| handle_ffmpeg_stdout_line(l, &mut stats).unwrap())
            .collect();

        assert_eq!(results.last(), Some(&FFmpegStdoutResult::Render));
        assert_eq!(results.iter().filter(|r| **r == FFmpegStdoutResult::Render).count(), 1);
        assert_eq!(stats, EncodeStatistics {
            frame: 120,
            fps: 29.97,
            total_size: 524288,
            out_time_us: 4_000_000,
        });
    }

    #[test]
    fn test_end_and_na() {
        let mut stats = EncodeStatistics { out_time_us: 7, ..Default::default() };
        assert_eq!(handle_ffmpeg_stdout_line("out_time_us=N/A", &mut stats).unwrap(), FFmpegStdoutResult::Continue);
        assert_eq!(stats.out_time_us, 7);
        assert_eq!(handle_ffmpeg_stdout_line("progress=end", &mut stats).unwrap(), FFmpegStdoutResult::End);
        assert_eq!(handle_ffmpeg_stdout_line("no separator", &mut stats).unwrap(), FFmpegStdoutResult::Continue);
    }

    #[test]
    fn test_malformed_value() {
        let mut stats = EncodeStatistics::default();
        assert!(matches!(
            handle_ffmpeg_stdout_line("frame=abc", &mut stats),
            Err(ConverterError::Progress { .. })
        ));
    }
}
