//! Stateful parser for the tool's probe diagnostics
//!
//! The diagnostic text is line-oriented and positional: `Input #n` opens an
//! input block, `Stream #n:m` / `Chapter #n:m` open a track or chapter, and
//! `Duration:` / `title :` lines attach to whatever is currently open. The
//! parser is an explicit state machine: a context-free [`classify`] step maps
//! each line to a [`LineEvent`], and a reducer applies it to the inventory
//! under the current [`ParserState`].

use std::time::Duration;

use tracing::warn;

use crate::model::{Chapter, Track, TrackGroup, TrackType};
use crate::utils::time::parse_timestamp;

/// What one diagnostic line means, independent of parser state.
///
/// Classification is a priority chain: the first matching rule wins, so a
/// line that would also match a later pattern is never re-interpreted.
#[derive(Debug, Clone, PartialEq)]
enum LineEvent {
    InputHeader {
        input: usize,
    },
    StreamHeader {
        input: usize,
        index: usize,
        track_type: TrackType,
        codec: String,
    },
    ChapterHeader {
        input: usize,
        index: usize,
    },
    Duration(Duration),
    Title(String),
    Noise,
}

/// Which entity, if any, subsequent metadata lines attach to.
///
/// `pos` is the position of the most recently appended track/chapter within
/// its group, which equals the echoed stream number whenever the tool's
/// numbering starts clean.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParserState {
    Idle,
    InInput { input: usize },
    InTrack { input: usize, pos: usize },
    InChapter { input: usize, pos: usize },
}

/// Builds an ordered inventory of [`TrackGroup`]s from the diagnostic lines
/// of one report-only invocation covering all inputs at once.
pub struct ProbeParser {
    paths: Vec<String>,
    groups: Vec<TrackGroup>,
    state: ParserState,
}

impl ProbeParser {
    pub fn new<S: AsRef<str>>(paths: &[S]) -> Self {
        Self {
            paths: paths.iter().map(|p| p.as_ref().to_string()).collect(),
            groups: Vec::new(),
            state: ParserState::Idle,
        }
    }

    /// Consume one diagnostic line.
    pub fn feed(&mut self, line: &str) {
        let event = classify(line);
        self.apply(event);
    }

    /// Finish parsing and hand back the inventory, ordered like the input paths.
    pub fn finish(self) -> Vec<TrackGroup> {
        self.groups
    }

    fn apply(&mut self, event: LineEvent) {
        match event {
            LineEvent::InputHeader { input } => {
                if input < self.groups.len() {
                    self.state = ParserState::InInput { input };
                } else if input == self.groups.len() && input < self.paths.len() {
                    self.groups.push(TrackGroup::new(self.paths[input].clone()));
                    self.state = ParserState::InInput { input };
                } else {
                    // A header we cannot attribute to a supplied path; the
                    // inventory must stay aligned with the given inputs.
                    warn!(input, "ignoring input header with no matching path");
                }
            }
            LineEvent::StreamHeader {
                input,
                index,
                track_type,
                codec,
            } => match self.groups.get_mut(input) {
                Some(group) => {
                    group.tracks.push(Track::new(index, track_type, codec));
                    self.state = ParserState::InTrack {
                        input,
                        pos: group.tracks.len() - 1,
                    };
                }
                None => warn!(input, index, "ignoring stream header for unknown input"),
            },
            LineEvent::ChapterHeader { input, index } => match self.groups.get_mut(input) {
                Some(group) => {
                    group.chapters.push(Chapter::new(index));
                    self.state = ParserState::InChapter {
                        input,
                        pos: group.chapters.len() - 1,
                    };
                }
                None => warn!(input, index, "ignoring chapter header for unknown input"),
            },
            LineEvent::Duration(duration) => {
                let input = match self.state {
                    ParserState::Idle => return,
                    ParserState::InInput { input }
                    | ParserState::InTrack { input, .. }
                    | ParserState::InChapter { input, .. } => input,
                };
                if let Some(group) = self.groups.get_mut(input) {
                    group.duration = Some(duration);
                }
                self.close_if_complete();
            }
            LineEvent::Title(text) => {
                match self.state {
                    ParserState::InTrack { input, pos } => {
                        if let Some(track) =
                            self.groups.get_mut(input).and_then(|g| g.tracks.get_mut(pos))
                        {
                            track.title = Some(text);
                        }
                    }
                    ParserState::InChapter { input, pos } => {
                        if let Some(chapter) = self
                            .groups
                            .get_mut(input)
                            .and_then(|g| g.chapters.get_mut(pos))
                        {
                            chapter.title = Some(text);
                        }
                    }
                    // No open track/chapter context; a title here belongs to
                    // container metadata we do not record.
                    ParserState::Idle | ParserState::InInput { .. } => {}
                }
                self.close_if_complete();
            }
            LineEvent::Noise => {}
        }
    }

    /// Transition guard for the stray-title heuristic: once the open entity
    /// has a non-empty title and its group's duration is known, nothing more
    /// can attach to it, so the context drops back to idle. This relies on
    /// the tool printing an input's duration before its per-stream titles; a
    /// title emitted first stays open until the duration arrives.
    fn close_if_complete(&mut self) {
        let complete = match self.state {
            ParserState::InTrack { input, pos } => self
                .groups
                .get(input)
                .map(|g| {
                    g.duration.is_some()
                        && g.tracks
                            .get(pos)
                            .and_then(|t| t.title.as_deref())
                            .is_some_and(|t| !t.is_empty())
                })
                .unwrap_or(false),
            ParserState::InChapter { input, pos } => self
                .groups
                .get(input)
                .map(|g| {
                    g.duration.is_some()
                        && g.chapters
                            .get(pos)
                            .and_then(|c| c.title.as_deref())
                            .is_some_and(|t| !t.is_empty())
                })
                .unwrap_or(false),
            ParserState::Idle | ParserState::InInput { .. } => false,
        };
        if complete {
            self.state = ParserState::Idle;
        }
    }
}

/// Classify one line. First matching rule wins; whitespace-only lines are
/// ignored unconditionally.
fn classify(line: &str) -> LineEvent {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return LineEvent::Noise;
    }

    if let Some(rest) = trimmed.strip_prefix("Input #") {
        if let Some((input, _)) = take_digits(rest) {
            return LineEvent::InputHeader { input };
        }
    }

    if let Some(rest) = trimmed.strip_prefix("Stream #") {
        if let Some(event) = parse_stream_header(rest) {
            return event;
        }
    }

    if let Some(rest) = trimmed.strip_prefix("Chapter #") {
        if let Some((input, rest)) = take_digits(rest) {
            if let Some(rest) = rest.strip_prefix(':') {
                if let Some((index, rest)) = take_digits(rest) {
                    if !rest.is_empty() {
                        return LineEvent::ChapterHeader { input, index };
                    }
                }
            }
        }
    }

    if let Some(rest) = trimmed.strip_prefix("Duration:") {
        let value = rest.trim_start();
        let end = value
            .find(|c: char| c == ',' || c.is_whitespace())
            .unwrap_or(value.len());
        if let Some(duration) = parse_timestamp(&value[..end]) {
            return LineEvent::Duration(duration);
        }
        // Unparsable durations (e.g. "N/A") are ignored outright.
        return LineEvent::Noise;
    }

    if let Some(rest) = trimmed.strip_prefix("title") {
        let rest = rest.trim_start();
        if let Some(value) = rest.strip_prefix(':') {
            let value = value.trim();
            if !value.is_empty() {
                return LineEvent::Title(value.to_string());
            }
        }
    }

    LineEvent::Noise
}

/// `Stream #<n>:<m> ... : <Type>: <Codec> ...` after the `Stream #` prefix.
fn parse_stream_header(rest: &str) -> Option<LineEvent> {
    let (input, rest) = take_digits(rest)?;
    let rest = rest.strip_prefix(':')?;
    let (index, rest) = take_digits(rest)?;
    let (type_label, codec) = find_type_and_codec(rest)?;
    Some(LineEvent::StreamHeader {
        input,
        index,
        track_type: TrackType::from_label(&type_label),
        codec,
    })
}

/// Scan for the first `: <Word>: <word>` occurrence, skipping whatever sits
/// between the stream number and the type label (language tags, hex ids).
fn find_type_and_codec(rest: &str) -> Option<(String, String)> {
    for (pos, _) in rest.char_indices().filter(|(_, c)| *c == ':') {
        let after = &rest[pos + 1..];
        let Some(after) = after.strip_prefix(' ') else {
            continue;
        };
        let Some((type_label, after)) = take_word(after) else {
            continue;
        };
        let Some(after) = after.strip_prefix(": ") else {
            continue;
        };
        if let Some((codec, _)) = take_word(after) {
            return Some((type_label.to_string(), codec.to_string()));
        }
    }
    None
}

fn take_digits(s: &str) -> Option<(usize, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    let value = s[..end].parse().ok()?;
    Some((value, &s[end..]))
}

fn take_word(s: &str) -> Option<(&str, &str)> {
    let end = s
        .find(|c: char| !c.is_ascii_alphanumeric() && c != '_')
        .unwrap_or(s.len());
    if end == 0 {
        return None;
    }
    Some((&s[..end], &s[end..]))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_lines<S: AsRef<str>>(paths: &[&str], lines: &[S]) -> Vec<TrackGroup> {
        let mut parser = ProbeParser::new(paths);
        for line in lines {
            parser.feed(line.as_ref());
        }
        parser.finish()
    }

    const TWO_INPUT_REPORT: &[&str] = &[
        "Input #0, mov,mp4,m4a,3gp,3g2,mj2, from 'a.mp4':",
        "  Duration: 00:10:00.00, start: 0.000000, bitrate: 1000 kb/s",
        "  Stream #0:0(und): Video: h264 (High) (avc1 / 0x31637661), yuv420p, 1920x1080",
        "  Stream #0:1(eng): Audio: aac (LC) (mp4a / 0x6134706D), 48000 Hz, stereo",
        "Input #1, matroska,webm, from 'b.mkv':",
        "  Duration: 00:08:00.00, start: 0.000000, bitrate: 500 kb/s",
        "  Stream #1:0(eng): Subtitle: subrip (srt)",
    ];

    #[test]
    fn builds_one_group_per_input_in_order() {
        let groups = parse_lines(&["a.mp4", "b.mkv"], TWO_INPUT_REPORT);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].path, "a.mp4");
        assert_eq!(groups[0].duration, Some(Duration::from_secs(600)));
        assert_eq!(groups[0].tracks.len(), 2);
        assert_eq!(groups[0].tracks[0].track_type, TrackType::Video);
        assert_eq!(groups[0].tracks[0].codec, "h264");
        assert_eq!(groups[0].tracks[1].track_type, TrackType::Audio);
        assert_eq!(groups[0].tracks[1].codec, "aac");

        assert_eq!(groups[1].path, "b.mkv");
        assert_eq!(groups[1].duration, Some(Duration::from_secs(480)));
        assert_eq!(groups[1].tracks.len(), 1);
        assert_eq!(groups[1].tracks[0].track_type, TrackType::Subtitle);
        assert_eq!(groups[1].tracks[0].codec, "subrip");
    }

    #[test]
    fn parsing_is_idempotent() {
        let first = parse_lines(&["a.mp4", "b.mkv"], TWO_INPUT_REPORT);
        let second = parse_lines(&["a.mp4", "b.mkv"], TWO_INPUT_REPORT);
        assert_eq!(first, second);
    }

    #[test]
    fn attaches_titles_to_the_open_track() {
        let lines = [
            "Input #0, matroska,webm, from 'movie.mkv':",
            "  Duration: 01:30:00.00, start: 0.000000, bitrate: 4000 kb/s",
            "  Stream #0:0: Video: h264 (High), yuv420p, 1920x1080",
            "  Metadata:",
            "      title           : Main Feature",
            "  Stream #0:1(jpn): Audio: flac, 48000 Hz, stereo",
            "  Metadata:",
            "      title           : Commentary",
        ];
        let groups = parse_lines(&["movie.mkv"], &lines);
        assert_eq!(groups[0].tracks[0].title.as_deref(), Some("Main Feature"));
        assert_eq!(groups[0].tracks[1].title.as_deref(), Some("Commentary"));
    }

    #[test]
    fn records_chapters_with_titles() {
        let lines = [
            "Input #0, matroska,webm, from 'movie.mkv':",
            "  Duration: 01:30:00.00, start: 0.000000, bitrate: 4000 kb/s",
            "  Chapter #0:0: start 0.000000, end 600.000000",
            "    Metadata:",
            "      title           : Opening",
            "  Chapter #0:1: start 600.000000, end 1200.000000",
            "    Metadata:",
            "      title           : Act One",
        ];
        let groups = parse_lines(&["movie.mkv"], &lines);
        assert_eq!(groups[0].chapters.len(), 2);
        assert_eq!(groups[0].chapters[0].index, 0);
        assert_eq!(groups[0].chapters[0].title.as_deref(), Some("Opening"));
        assert_eq!(groups[0].chapters[1].title.as_deref(), Some("Act One"));
    }

    #[test]
    fn closed_context_ignores_stray_titles() {
        // After a track has both its title and its group's duration, a later
        // title line with no new stream header must not overwrite it.
        let lines = [
            "Input #0, matroska,webm, from 'movie.mkv':",
            "  Duration: 01:30:00.00, start: 0.000000, bitrate: 4000 kb/s",
            "  Stream #0:0: Video: h264 (High), yuv420p, 1920x1080",
            "      title           : Main Feature",
            "      title           : Stray Global Tag",
        ];
        let groups = parse_lines(&["movie.mkv"], &lines);
        assert_eq!(groups[0].tracks[0].title.as_deref(), Some("Main Feature"));
    }

    #[test]
    fn title_before_duration_can_be_overwritten() {
        // Known limitation, preserved on purpose: when a title arrives before
        // the input's duration line, the context stays open and a later stray
        // title replaces the first one.
        let lines = [
            "Input #0, matroska,webm, from 'movie.mkv':",
            "  Stream #0:0: Video: h264 (High), yuv420p, 1920x1080",
            "      title           : Real Title",
            "  Duration: 01:30:00.00, start: 0.000000, bitrate: 4000 kb/s",
            "      title           : Stray Tag",
        ];
        let groups = parse_lines(&["movie.mkv"], &lines);
        // Duration closed the context (title + duration both set), so the
        // stray tag is dropped; had the duration come even later, "Stray Tag"
        // would have won.
        assert_eq!(groups[0].tracks[0].title.as_deref(), Some("Real Title"));

        let lines_without_close = [
            "Input #0, matroska,webm, from 'movie.mkv':",
            "  Stream #0:0: Video: h264 (High), yuv420p, 1920x1080",
            "      title           : Real Title",
            "      title           : Stray Tag",
        ];
        let groups = parse_lines(&["movie.mkv"], &lines_without_close);
        assert_eq!(groups[0].tracks[0].title.as_deref(), Some("Stray Tag"));
    }

    #[test]
    fn duration_without_open_input_is_ignored() {
        let lines = ["  Duration: 00:10:00.00, start: 0.000000"];
        let groups = parse_lines(&["a.mp4"], &lines);
        assert!(groups.is_empty());
    }

    #[test]
    fn unparsable_duration_keeps_the_sentinel() {
        let lines = [
            "Input #0, mov,mp4, from 'a.mp4':",
            "  Duration: N/A, start: 0.000000, bitrate: N/A",
            "  Stream #0:0: Video: h264, yuv420p, 1920x1080",
        ];
        let groups = parse_lines(&["a.mp4"], &lines);
        assert_eq!(groups[0].duration, None);
        assert_eq!(groups[0].tracks.len(), 1);
    }

    #[test]
    fn titles_without_track_context_are_ignored() {
        let lines = [
            "Input #0, mov,mp4, from 'a.mp4':",
            "      title           : Container Level Tag",
            "  Stream #0:0: Video: h264, yuv420p",
        ];
        let groups = parse_lines(&["a.mp4"], &lines);
        assert_eq!(groups[0].tracks[0].title, None);
    }

    #[test]
    fn whitespace_lines_and_noise_are_ignored() {
        let lines = [
            "",
            "   ",
            "Input #0, mov,mp4, from 'a.mp4':",
            "  Metadata:",
            "    encoder         : Lavf61.1.100",
            "  Stream #0:0: Video: h264, yuv420p",
            "frame=  100 fps= 30 time=00:00:05.00",
        ];
        let groups = parse_lines(&["a.mp4"], &lines);
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].tracks.len(), 1);
    }

    #[test]
    fn headers_for_unknown_inputs_are_ignored() {
        let lines = [
            "Input #2, mov,mp4, from 'c.mp4':",
            "  Stream #5:0: Video: h264, yuv420p",
        ];
        let groups = parse_lines(&["a.mp4"], &lines);
        assert!(groups.is_empty());
    }

    #[test]
    fn stream_header_with_language_tag_parses_type_and_codec() {
        let lines = [
            "Input #0, mov,mp4, from 'a.mp4':",
            "  Stream #0:2[0x3](ger): Subtitle: mov_text (tx3g / 0x67337874)",
        ];
        let groups = parse_lines(&["a.mp4"], &lines);
        let track = &groups[0].tracks[0];
        assert_eq!(track.index, 2);
        assert_eq!(track.track_type, TrackType::Subtitle);
        assert_eq!(track.codec, "mov_text");
    }

    #[test]
    fn unknown_type_labels_map_to_other() {
        let lines = [
            "Input #0, mov,mp4, from 'a.mp4':",
            "  Stream #0:3(und): Data: bin_data (text / 0x74786574)",
        ];
        let groups = parse_lines(&["a.mp4"], &lines);
        assert_eq!(groups[0].tracks[0].track_type, TrackType::Other);
        assert_eq!(groups[0].tracks[0].codec, "bin_data");
    }
}
