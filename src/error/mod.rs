//! Error handling module for TrackMix

use thiserror::Error;

/// Main error type for TrackMix operations
#[derive(Error, Debug)]
pub enum MixerError {
    /// Selector token matches no accepted grammar
    #[error("{token} not valid")]
    SelectorNotValid { token: String },

    /// Selector token names an input that does not exist
    #[error(
        "{token} not valid. Input index {input_index} exceeds number of inputs ({input_count})"
    )]
    InputIndexOutOfRange {
        token: String,
        input_index: usize,
        input_count: usize,
    },

    /// Selector token names a track that does not exist in its input
    #[error("{token} not valid. Track index {track_index} exceeds number of tracks ({track_count}) in input #{input_index}")]
    TrackIndexOutOfRange {
        token: String,
        input_index: usize,
        track_index: usize,
        track_count: usize,
    },

    /// A mapping references an input missing from the inventory
    #[error("Mapped a track that does not exist. Input index: {input_index}")]
    MappedInputMissing { input_index: usize },

    /// Mix was requested with nothing selected
    #[error("No streams mapped; select at least one track or chapter set")]
    NoStreamsMapped,

    /// The external tool binary could not be launched
    #[error("External tool not found: {program}")]
    ToolNotFound { program: String },

    /// The external tool ran but exited with a failure status
    #[error("External tool failed with {status}")]
    ToolFailed { status: String },

    /// Configuration file error
    #[error("Configuration error: {message}")]
    ConfigError { message: String },

    /// I/O error
    #[error("I/O error: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for TrackMix operations
pub type MixerResult<T> = std::result::Result<T, MixerError>;
