//! Controller subsystem - Handles all user input and mode transitions
//!
//! Keys are decoded by [`KeyHandler`] into either a mode [`Trigger`] or a
//! default-handler command, and [`EditorSession`] applies them to the
//! document model.

pub mod command;
pub mod key_handler;
pub mod mode;
pub mod session;

// Re-export public interface
pub use command::{EditCommand, FileNameCommand, FindCommand};
pub use key_handler::KeyHandler;
pub use mode::{transition_for, Effect, Fired, Mode, ModeController, ModeKind, Transition, Trigger};
pub use session::EditorSession;
