//! clack - an audio-first modal text editor core.
//!
//! The editor gives feedback through speech and tones instead of a screen.
//! [`EditorSession`] owns all state; input, audio and storage are reached
//! only through the [`InputSource`], [`AudioBackend`] and [`StorageBackend`]
//! traits.

pub mod audio;
pub mod config;
pub mod controller;
pub mod document_model;
pub mod error;
pub mod input;
pub mod storage;

pub use audio::{AudioBackend, AudioCueDispatcher, CueEvent, CueRequest};
pub use config::EditorConfig;
pub use controller::{EditorSession, ModeKind};
pub use document_model::{CursorModel, Position, SearchState, TextBuffer};
pub use error::{EditorError, StorageError};
pub use input::InputSource;
pub use storage::StorageBackend;
