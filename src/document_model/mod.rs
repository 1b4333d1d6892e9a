//! Document model subsystem - text storage, cursor, and search
//!
//! Every mutating operation here reports what it did by pushing exactly one
//! cue event onto the caller's queue.

pub mod cursor;
pub mod search_state;
pub mod text_buffer;

// Re-export main types for convenience
pub use cursor::CursorModel;
pub use search_state::SearchState;
pub use text_buffer::{is_word_char, Position, TextBuffer};
