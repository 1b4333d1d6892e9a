use crate::audio::CueTag;
use crate::document_model::Position;
use std::path::PathBuf;
use thiserror::Error;

/// Failures reported by the editing core. None of these end the session.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EditorError {
    #[error("position {position} is outside the document")]
    OutOfBounds { position: Position },

    #[error("invalid range {start}..{end}")]
    InvalidRange { start: Position, end: Position },

    #[error("no cue mapped for {tag:?}")]
    UnmappedCue { tag: CueTag },

    #[error("save failed: {0}")]
    SaveFailed(String),
}

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("file not found: {}", .0.display())]
    NotFound(PathBuf),

    #[error("no file name to save to")]
    NoPath,

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Why the tone output could not be opened.
#[derive(Debug, Error)]
pub enum AudioError {
    #[error("no audio output device: {0}")]
    Stream(#[from] rodio::StreamError),

    #[error("cannot play on the audio output: {0}")]
    Play(#[from] rodio::PlayError),
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, EditorError>;
