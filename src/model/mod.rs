//! Core data model: probed inventories and stream mappings

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Kind of a probed media track
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TrackType {
    Video,
    Audio,
    Subtitle,
    /// Anything the tool labels with a type we do not model (data, attachments, ...)
    Other,
}

impl TrackType {
    /// Map the tool's free-text codec-type label onto the closed enumeration.
    /// Unrecognized labels become `Other`.
    pub fn from_label(label: &str) -> Self {
        match label {
            "Video" => TrackType::Video,
            "Audio" => TrackType::Audio,
            "Subtitle" => TrackType::Subtitle,
            _ => TrackType::Other,
        }
    }

    /// Single-letter tag used in track listings and the selector language.
    /// `Other` tracks have no selector letter; they are shown as `?` and can
    /// only be selected by explicit index.
    pub fn letter(&self) -> char {
        match self {
            TrackType::Video => 'v',
            TrackType::Audio => 'a',
            TrackType::Subtitle => 's',
            TrackType::Other => '?',
        }
    }
}

impl fmt::Display for TrackType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TrackType::Video => "Video",
            TrackType::Audio => "Audio",
            TrackType::Subtitle => "Subtitle",
            TrackType::Other => "Other",
        };
        write!(f, "{}", name)
    }
}

/// One media stream discovered while probing an input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Stream index as reported by the tool, unique within its group
    pub index: usize,
    /// Track kind
    pub track_type: TrackType,
    /// Codec label as reported by the tool
    pub codec: String,
    /// Stream title, absent until discovered
    pub title: Option<String>,
}

impl Track {
    pub fn new(index: usize, track_type: TrackType, codec: impl Into<String>) -> Self {
        Self {
            index,
            track_type,
            codec: codec.into(),
            title: None,
        }
    }
}

/// One chapter discovered while probing an input
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    /// Chapter index as reported by the tool, unique within its group
    pub index: usize,
    /// Chapter title, absent until discovered
    pub title: Option<String>,
}

impl Chapter {
    pub fn new(index: usize) -> Self {
        Self { index, title: None }
    }
}

/// The structured probe result for one input file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackGroup {
    /// Input path, set at construction
    pub path: String,
    /// Container duration; `None` until a parseable duration line is seen
    pub duration: Option<Duration>,
    /// Tracks in discovery order
    pub tracks: Vec<Track>,
    /// Chapters in discovery order
    pub chapters: Vec<Chapter>,
}

impl TrackGroup {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            duration: None,
            tracks: Vec::new(),
            chapters: Vec::new(),
        }
    }

    /// Tracks of one kind, in discovery order
    pub fn tracks_of_type(&self, track_type: TrackType) -> impl Iterator<Item = &Track> {
        self.tracks
            .iter()
            .filter(move |tr| tr.track_type == track_type)
    }
}

/// One resolved "copy this stream / these chapters into the output" instruction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreamMap {
    /// References a `TrackGroup` by position in the inventory
    pub input_index: usize,
    /// References a track within that group; ignored when `for_chapter`
    pub track_index: usize,
    /// Copy all chapters from this input instead of a specific track
    pub for_chapter: bool,
}

impl StreamMap {
    /// Map one specific track of one input.
    pub fn track(input_index: usize, track_index: usize) -> Self {
        Self {
            input_index,
            track_index,
            for_chapter: false,
        }
    }

    /// Map all chapters of one input.
    pub fn chapters(input_index: usize) -> Self {
        Self {
            input_index,
            track_index: 0,
            for_chapter: true,
        }
    }
}

impl fmt::Display for StreamMap {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.for_chapter {
            write!(f, "{}:C", self.input_index)
        } else {
            write!(f, "{}:{}", self.input_index, self.track_index)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_type_from_label_maps_known_labels() {
        assert_eq!(TrackType::from_label("Video"), TrackType::Video);
        assert_eq!(TrackType::from_label("Audio"), TrackType::Audio);
        assert_eq!(TrackType::from_label("Subtitle"), TrackType::Subtitle);
    }

    #[test]
    fn track_type_from_label_maps_unknown_to_other() {
        assert_eq!(TrackType::from_label("Data"), TrackType::Other);
        assert_eq!(TrackType::from_label("Attachment"), TrackType::Other);
        assert_eq!(TrackType::from_label("video"), TrackType::Other); // label is case-sensitive
    }

    #[test]
    fn track_group_filters_by_type() {
        let mut group = TrackGroup::new("a.mp4");
        group.tracks.push(Track::new(0, TrackType::Video, "h264"));
        group.tracks.push(Track::new(1, TrackType::Audio, "aac"));
        group.tracks.push(Track::new(2, TrackType::Audio, "ac3"));

        let audio: Vec<usize> = group
            .tracks_of_type(TrackType::Audio)
            .map(|tr| tr.index)
            .collect();
        assert_eq!(audio, vec![1, 2]);
        assert_eq!(group.tracks_of_type(TrackType::Subtitle).count(), 0);
    }

    #[test]
    fn stream_map_display() {
        assert_eq!(StreamMap::track(0, 2).to_string(), "0:2");
        assert_eq!(StreamMap::chapters(1).to_string(), "1:C");
    }
}
