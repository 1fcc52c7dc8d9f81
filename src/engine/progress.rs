//! Progress reporting for mix runs

use std::io::{self, Write};
use std::time::Duration;

use crate::utils::time::parse_timestamp;

/// Receives 0–100 progress values during a mix run.
///
/// The final call of a successful run always carries exactly 100; a failed
/// run never reaches it.
pub trait ProgressSink {
    fn update(&mut self, percent: f64);
}

/// Carriage-return percentage line for interactive terminals
pub struct ConsoleProgress;

impl ProgressSink for ConsoleProgress {
    fn update(&mut self, percent: f64) {
        print!("\rMixing.... {:.2}%   ", percent);
        let _ = io::stdout().flush();
    }
}

/// One JSON event per update, for machine consumers
pub struct JsonProgress;

impl ProgressSink for JsonProgress {
    fn update(&mut self, percent: f64) {
        let event = serde_json::json!({
            "event": "progress",
            "percent": percent,
            "timestamp": chrono::Utc::now().to_rfc3339(),
        });
        println!("{}", event);
    }
}

/// Discards all updates
pub struct NoOpProgress;

impl ProgressSink for NoOpProgress {
    fn update(&mut self, _percent: f64) {}
}

/// Extract the elapsed timestamp from one tool status update.
///
/// Only updates of the shape `frame=...` or `size=...` carry progress; the
/// `time=` field inside them is the elapsed position. Anything else,
/// including updates whose timestamp is malformed (`time=N/A`), yields
/// `None`.
pub fn parse_progress_time(update: &str) -> Option<Duration> {
    if !update.starts_with("frame=") && !update.starts_with("size=") {
        return None;
    }
    let value = update.split_once("time=")?.1;
    let end = value
        .find(|c: char| c.is_whitespace())
        .unwrap_or(value.len());
    parse_timestamp(&value[..end])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_time_from_frame_updates() {
        let line = "frame=  150 fps= 30 q=-1.0 size=    1024KiB time=00:00:05.00 bitrate=1677.8kbits/s speed=1.5x";
        assert_eq!(parse_progress_time(line), Some(Duration::from_secs(5)));
    }

    #[test]
    fn extracts_time_from_size_updates() {
        let line = "size=     512KiB time=00:01:00.50 bitrate=  69.2kbits/s speed= 120x";
        assert_eq!(
            parse_progress_time(line),
            Some(Duration::from_millis(60_500))
        );
    }

    #[test]
    fn ignores_lines_without_the_progress_prefix() {
        assert_eq!(parse_progress_time("Input #0, mov,mp4, from 'a.mp4':"), None);
        assert_eq!(
            parse_progress_time("  Duration: 00:10:00.00, start: 0.000000"),
            None
        );
        assert_eq!(parse_progress_time("time=00:00:05.00"), None);
        assert_eq!(parse_progress_time(""), None);
    }

    #[test]
    fn ignores_updates_with_malformed_timestamps() {
        assert_eq!(parse_progress_time("frame=  1 fps=0.0 time=N/A bitrate=N/A"), None);
        assert_eq!(parse_progress_time("frame=  1 fps=0.0 bitrate=N/A"), None);
    }
}
