//! Configuration subsystem - editor settings and preferences
//!
//! Settings come from a `.clackrc` file and can be overridden on the command
//! line. The core only sees [`EditorConfig`].

pub mod rc;

// Re-export public interface
pub use rc::{RcConfig, RcLoader};

pub const DEFAULT_TAB_WIDTH: usize = 4;
pub const DEFAULT_PAGE_SIZE: usize = 20;

/// Options the editing core reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EditorConfig {
    /// Whitespace units per indentation level.
    pub tab_width: usize,
    /// Rows moved by page up / page down.
    pub page_size: usize,
    /// Insert spaces instead of a tab character for the tab key.
    pub expand_tab: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            tab_width: DEFAULT_TAB_WIDTH,
            page_size: DEFAULT_PAGE_SIZE,
            expand_tab: false,
        }
    }
}
