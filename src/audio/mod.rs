//! Audio subsystem - cue events, the dispatch table, and playback backends
//!
//! The editor core only produces [`CueEvent`]s. [`AudioCueDispatcher`] turns
//! them into [`CueRequest`]s and hands them to an [`AudioBackend`], which is
//! free to play them on another thread.

pub mod backend;
pub mod cue;
pub mod dispatcher;
pub mod player;
pub mod request;
pub mod speakable;

// Re-export public interface
pub use backend::{AudioBackend, ChannelBackend, CuePlayer, NullBackend, RecordingBackend};
pub use cue::{CueEvent, CueQueue, CueTag};
pub use dispatcher::{AudioCueDispatcher, CueRenderer, CueTable};
pub use player::{default_speech_program, tone_source, SystemPlayer, DEFAULT_RATE_WPM};
pub use request::{indent_tone, CueRequest, Tone};
