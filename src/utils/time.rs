//! Parsing and formatting of the tool's `HH:MM:SS.ff` timestamps

use std::time::Duration;

/// Parse a strict `HH:MM:SS.ff` timestamp into a `Duration`.
///
/// The shape is exactly what the tool prints in `Duration:` and `time=`
/// fields: two digits per field, two fractional digits (centiseconds).
/// Anything else (including `N/A` and negative timestamps) yields `None`.
pub fn parse_timestamp(s: &str) -> Option<Duration> {
    let (hms, frac) = s.split_once('.')?;
    let mut fields = hms.split(':');
    let hours = parse_two_digits(fields.next()?)?;
    let minutes = parse_two_digits(fields.next()?)?;
    let seconds = parse_two_digits(fields.next()?)?;
    if fields.next().is_some() {
        return None;
    }
    let centis = parse_two_digits(frac)?;
    if minutes >= 60 || seconds >= 60 {
        return None;
    }
    let total_secs = hours * 3600 + minutes * 60 + seconds;
    Some(Duration::new(total_secs, centis as u32 * 10_000_000))
}

fn parse_two_digits(field: &str) -> Option<u64> {
    if field.len() != 2 || !field.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    field.parse().ok()
}

/// Format a `Duration` back into the tool's `HH:MM:SS.ff` shape.
pub fn format_timestamp(d: Duration) -> String {
    let total_secs = d.as_secs();
    let hours = total_secs / 3600;
    let minutes = (total_secs % 3600) / 60;
    let seconds = total_secs % 60;
    let centis = d.subsec_millis() / 10;
    format!("{:02}:{:02}:{:02}.{:02}", hours, minutes, seconds, centis)
}
