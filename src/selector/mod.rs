//! The track-selector mini-language
//!
//! Tokens name tracks across inputs: `0:1` (second track of the first
//! input), `1:C` (all chapters of the second input), `2:vs` (all video and
//! subtitle tracks of the third input). The colon is optional; without it a
//! pair splits after the first digit. Resolution validates every reference
//! against the inventory and fails the whole request on the first bad token.

use crate::error::{MixerError, MixerResult};
use crate::model::{StreamMap, TrackGroup, TrackType};

/// What one selector letter asks for. Video/audio/subtitle share the
/// by-type selection path; chapters are a different beast (one map for the
/// whole set), so they get their own variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Selection {
    ByType(TrackType),
    ByChapter,
}

impl Selection {
    fn from_letter(letter: char) -> Option<Self> {
        match letter {
            'v' => Some(Selection::ByType(TrackType::Video)),
            'a' => Some(Selection::ByType(TrackType::Audio)),
            's' => Some(Selection::ByType(TrackType::Subtitle)),
            'c' => Some(Selection::ByChapter),
            _ => None,
        }
    }
}

/// Resolve a raw selector string against the inventory into an ordered,
/// validated list of mappings.
///
/// Duplicate tokens (by exact text) are dropped, keeping the first
/// occurrence. An empty selector resolves to an empty list; callers treat
/// that as a cancel.
pub fn resolve(groups: &[TrackGroup], selector: &str) -> MixerResult<Vec<StreamMap>> {
    let mut seen: Vec<&str> = Vec::new();
    let mut maps = Vec::new();
    for token in selector.split_whitespace() {
        if seen.contains(&token) {
            continue;
        }
        seen.push(token);
        resolve_token(groups, token, &mut maps)?;
    }
    Ok(maps)
}

fn resolve_token(
    groups: &[TrackGroup],
    token: &str,
    maps: &mut Vec<StreamMap>,
) -> MixerResult<()> {
    if let Some((input_index, track_index)) = parse_explicit_pair(token) {
        let group = lookup_group(groups, token, input_index)?;
        if track_index >= group.tracks.len() {
            return Err(MixerError::TrackIndexOutOfRange {
                token: token.to_string(),
                input_index,
                track_index,
                track_count: group.tracks.len(),
            });
        }
        maps.push(StreamMap::track(input_index, track_index));
        return Ok(());
    }

    if let Some((input_index, selections)) = parse_letter_selector(token) {
        let group = lookup_group(groups, token, input_index)?;
        for selection in selections {
            match selection {
                Selection::ByType(track_type) => maps.extend(
                    group
                        .tracks_of_type(track_type)
                        .map(|track| StreamMap::track(input_index, track.index)),
                ),
                // One chapter map covers the whole set, however many (or
                // few) chapters the input has.
                Selection::ByChapter => maps.push(StreamMap::chapters(input_index)),
            }
        }
        return Ok(());
    }

    Err(MixerError::SelectorNotValid {
        token: token.to_string(),
    })
}

fn lookup_group<'a>(
    groups: &'a [TrackGroup],
    token: &str,
    input_index: usize,
) -> MixerResult<&'a TrackGroup> {
    groups
        .get(input_index)
        .ok_or_else(|| MixerError::InputIndexOutOfRange {
            token: token.to_string(),
            input_index,
            input_count: groups.len(),
        })
}

/// `<digits>:<digits>`, or without a colon `<digit><digits>` where the first
/// digit is the input index. The whole token must match.
fn parse_explicit_pair(token: &str) -> Option<(usize, usize)> {
    if let Some((lhs, rhs)) = token.split_once(':') {
        Some((parse_all_digits(lhs)?, parse_all_digits(rhs)?))
    } else {
        if token.len() < 2 || !token.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let (lhs, rhs) = token.split_at(1);
        Some((parse_all_digits(lhs)?, parse_all_digits(rhs)?))
    }
}

/// `<digits>[:]<letters>` with letters in {a,c,s,v}, case-insensitive. The
/// whole token must match. Duplicate letters collapse to their first
/// occurrence so `0:vva` selects video once.
fn parse_letter_selector(token: &str) -> Option<(usize, Vec<Selection>)> {
    let digits_end = token
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(token.len());
    if digits_end == 0 {
        return None;
    }
    let input_index = parse_all_digits(&token[..digits_end])?;
    let letters = token[digits_end..]
        .strip_prefix(':')
        .unwrap_or(&token[digits_end..]);
    if letters.is_empty() {
        return None;
    }

    let mut selections = Vec::new();
    for letter in letters.chars() {
        let selection = Selection::from_letter(letter.to_ascii_lowercase())?;
        if !selections.contains(&selection) {
            selections.push(selection);
        }
    }
    Some((input_index, selections))
}

fn parse_all_digits(s: &str) -> Option<usize> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}
