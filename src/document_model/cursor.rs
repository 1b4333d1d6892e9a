use super::text_buffer::{Position, TextBuffer};
use crate::audio::{CueEvent, CueQueue};
use crate::error::{EditorError, Result};

/// Cursor position plus the column vertical moves try to return to.
#[derive(Debug, Clone)]
pub struct CursorModel {
    position: Position,
    preferred_column: Option<usize>,
    anchor: Option<Position>,
    page_size: usize,
}

impl CursorModel {
    pub fn new(page_size: usize) -> Self {
        Self {
            position: Position::default(),
            preferred_column: None,
            anchor: None,
            page_size: page_size.max(1),
        }
    }

    pub fn position(&self) -> Position {
        self.position
    }

    pub fn row(&self) -> usize {
        self.position.row
    }

    pub fn column(&self) -> usize {
        self.position.column
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Place the cursor after an edit or a search jump. Silent: the caller's
    /// own event already describes the change.
    pub fn set_position(&mut self, pos: Position, buffer: &TextBuffer) -> Result<()> {
        if !buffer.contains(pos) {
            return Err(EditorError::OutOfBounds { position: pos });
        }
        self.position = pos;
        self.preferred_column = None;
        Ok(())
    }

    /// Pull the cursor (and anchor) back inside the document after it was
    /// replaced.
    pub fn clamp_to(&mut self, buffer: &TextBuffer) {
        self.position = clamp(self.position, buffer);
        self.preferred_column = None;
        self.keep_anchor_valid(buffer);
    }

    pub fn anchor(&self) -> Option<Position> {
        self.anchor
    }

    /// Drop the selection anchor at the cursor.
    pub fn set_anchor(&mut self) {
        self.anchor = Some(self.position);
    }

    pub fn clear_anchor(&mut self) {
        self.anchor = None;
    }

    /// Clamp the anchor after an edit shortened the document.
    pub fn keep_anchor_valid(&mut self, buffer: &TextBuffer) {
        if let Some(anchor) = self.anchor {
            self.anchor = Some(clamp(anchor, buffer));
        }
    }

    pub fn move_by(
        &mut self,
        delta_row: isize,
        delta_col: isize,
        buffer: &TextBuffer,
        events: &mut CueQueue,
    ) {
        if delta_row == 0 && delta_col == 0 {
            return;
        }

        let old = self.position;
        let mut pos = old;

        if delta_row != 0 {
            let last_row = buffer.line_count() - 1;
            let row = pos.row.saturating_add_signed(delta_row).min(last_row);
            let wanted = self.preferred_column.unwrap_or(pos.column);
            pos = Position::new(row, wanted.min(buffer.line_len(row)));
        }

        if delta_col != 0 {
            for _ in 0..delta_col.unsigned_abs() {
                let step = if delta_col > 0 {
                    buffer.next_position(pos)
                } else {
                    buffer.previous_position(pos)
                };
                match step {
                    Some(next) => pos = next,
                    None => break,
                }
            }
        }

        if delta_row != 0 && delta_col == 0 {
            // keep the remembered column across short lines
            self.preferred_column = Some(self.preferred_column.unwrap_or(old.column));
        } else {
            self.preferred_column = None;
        }

        self.position = pos;
        self.announce(old, buffer, events);
    }

    pub fn move_to_line_start(&mut self, buffer: &TextBuffer, events: &mut CueQueue) {
        let old = self.position;
        self.position.column = 0;
        self.preferred_column = None;
        self.announce(old, buffer, events);
    }

    pub fn move_to_line_end(&mut self, buffer: &TextBuffer, events: &mut CueQueue) {
        let old = self.position;
        self.position.column = buffer.line_len(old.row);
        self.preferred_column = None;
        self.announce(old, buffer, events);
    }

    pub fn page_up(&mut self, buffer: &TextBuffer, events: &mut CueQueue) {
        let delta = isize::try_from(self.page_size).unwrap_or(isize::MAX);
        self.move_by(-delta, 0, buffer, events);
    }

    pub fn page_down(&mut self, buffer: &TextBuffer, events: &mut CueQueue) {
        let delta = isize::try_from(self.page_size).unwrap_or(isize::MAX);
        self.move_by(delta, 0, buffer, events);
    }

    fn announce(&self, old: Position, buffer: &TextBuffer, events: &mut CueQueue) {
        let new = self.position;
        let event = if new == old {
            CueEvent::NavigationBlocked
        } else if new.row != old.row || buffer.indent_level(new.row) != buffer.indent_level(old.row)
        {
            CueEvent::IndentLevelAnnounced {
                level: buffer.indent_level(new.row),
            }
        } else {
            CueEvent::PositionChanged {
                row: new.row,
                column: new.column,
            }
        };
        events.push(event);
    }
}

fn clamp(pos: Position, buffer: &TextBuffer) -> Position {
    let row = pos.row.min(buffer.line_count() - 1);
    Position::new(row, pos.column.min(buffer.line_len(row)))
}
