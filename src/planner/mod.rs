//! Mix planning: argument derivation and the progress denominator
//!
//! Planning is pure. It turns an inventory plus a validated mapping list
//! into the exact external-tool invocation and the duration used as the
//! progress denominator; running the invocation lives in the engine.

use std::path::Path;
use std::time::Duration;

use crate::error::{MixerError, MixerResult};
use crate::model::{StreamMap, TrackGroup};

/// A fully derived external-tool invocation for one mix request
#[derive(Debug, Clone, PartialEq)]
pub struct MixPlan {
    /// Complete argument vector, inputs first, output path last
    pub args: Vec<String>,
    /// Longest reported duration among mapped inputs; `None` when no mapped
    /// input reported one
    pub total_duration: Option<Duration>,
    /// Where the container will be written
    pub output: String,
}

/// Derives the external-tool invocation for a mix request
pub struct MixPlanner;

impl MixPlanner {
    /// Build a [`MixPlan`].
    ///
    /// Every inventory input becomes a `-i` argument in inventory order, so
    /// the `-map` indices line up with the tool's own input numbering even
    /// when some inputs contribute nothing. Track-level bounds were already
    /// checked during resolution; input-level bounds are re-checked here
    /// because [`StreamMap`] can be constructed directly.
    pub fn plan(
        groups: &[TrackGroup],
        maps: &[StreamMap],
        output: &str,
    ) -> MixerResult<MixPlan> {
        if maps.is_empty() {
            return Err(MixerError::NoStreamsMapped);
        }

        let mut total_duration: Option<Duration> = None;
        for map in maps {
            let group = groups
                .get(map.input_index)
                .ok_or(MixerError::MappedInputMissing {
                    input_index: map.input_index,
                })?;
            if let Some(duration) = group.duration {
                total_duration = Some(total_duration.map_or(duration, |t| t.max(duration)));
            }
        }

        let extension = Path::new(output)
            .extension()
            .and_then(|ext| ext.to_str())
            .unwrap_or("");

        let mut args: Vec<String> = Vec::new();
        for group in groups {
            args.push("-i".to_string());
            args.push(group.path.clone());
        }

        // Video is never re-encoded; this is a remuxer.
        push_flag(&mut args, "-c:v", "copy");

        // An .mp3 container cannot carry the default copied stream set, so
        // the tool picks the audio codec itself there.
        if extension != "mp3" {
            push_flag(&mut args, "-c:a", "copy");
        }

        // Matroska takes subtitles verbatim; everything else gets the
        // tolerant text codec.
        if extension == "mkv" {
            push_flag(&mut args, "-c:s", "copy");
        } else {
            push_flag(&mut args, "-c:s", "mov_text");
        }

        // The tool inherits global metadata and chapters from the first
        // input unless told otherwise; only explicit maps may contribute.
        push_flag(&mut args, "-map_metadata", "-1");
        push_flag(&mut args, "-map_chapters", "-1");

        for map in maps {
            if map.for_chapter {
                push_flag(&mut args, "-map_chapters", &map.input_index.to_string());
            } else {
                push_flag(
                    &mut args,
                    "-map",
                    &format!("{}:{}", map.input_index, map.track_index),
                );
            }
        }

        // Strictest interleave tolerance; mapped streams may have wildly
        // different native timestamps.
        push_flag(&mut args, "-max_interleave_delta", "0");

        args.push(output.to_string());

        Ok(MixPlan {
            args,
            total_duration,
            output: output.to_string(),
        })
    }
}

fn push_flag(args: &mut Vec<String>, flag: &str, value: &str) {
    args.push(flag.to_string());
    args.push(value.to_string());
}
