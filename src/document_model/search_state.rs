use super::text_buffer::{Position, TextBuffer};
use crate::audio::{CueEvent, CueQueue};
use regex::Regex;

/// Incremental literal search. Lives only while the editor is in Find mode.
#[derive(Debug, Clone)]
pub struct SearchState {
    query: String,
    matches: Vec<Position>,
    current: usize,
    origin: Position,
}

impl SearchState {
    /// Start an empty search anchored at the cursor position.
    pub fn new(origin: Position) -> Self {
        Self {
            query: String::new(),
            matches: Vec::new(),
            current: 0,
            origin,
        }
    }

    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn matches(&self) -> &[Position] {
        &self.matches
    }

    pub fn match_count(&self) -> usize {
        self.matches.len()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current_match(&self) -> Option<Position> {
        self.matches.get(self.current).copied()
    }

    pub fn update_query(&mut self, query: &str, buffer: &TextBuffer, events: &mut CueQueue) {
        self.query = query.to_string();
        self.matches = find_all(query, buffer);
        self.current = self
            .matches
            .iter()
            .position(|m| *m >= self.origin)
            .unwrap_or(0);
        events.push(CueEvent::MatchCountChanged {
            count: self.matches.len(),
        });
    }

    pub fn push_char(&mut self, c: char, buffer: &TextBuffer, events: &mut CueQueue) {
        let mut query = self.query.clone();
        query.push(c);
        self.update_query(&query, buffer, events);
    }

    /// Drop the last query character. Returns false when the query was empty.
    pub fn pop_char(&mut self, buffer: &TextBuffer, events: &mut CueQueue) -> bool {
        let mut query = self.query.clone();
        if query.pop().is_none() {
            return false;
        }
        self.update_query(&query, buffer, events);
        true
    }

    pub fn next(&mut self, events: &mut CueQueue) -> Option<Position> {
        if self.matches.is_empty() {
            return None;
        }
        self.current = (self.current + 1) % self.matches.len();
        self.announce(events)
    }

    pub fn previous(&mut self, events: &mut CueQueue) -> Option<Position> {
        if self.matches.is_empty() {
            return None;
        }
        let count = self.matches.len();
        self.current = (self.current + count - 1) % count;
        self.announce(events)
    }

    fn announce(&self, events: &mut CueQueue) -> Option<Position> {
        let position = self.current_match()?;
        events.push(CueEvent::MatchSelected {
            index: self.current,
            count: self.matches.len(),
            position,
        });
        Some(position)
    }
}

/// Every non-overlapping, case-sensitive occurrence of `query`, top to bottom.
fn find_all(query: &str, buffer: &TextBuffer) -> Vec<Position> {
    if query.is_empty() {
        return Vec::new();
    }
    // Escape so the query is matched literally
    let Ok(regex) = Regex::new(&regex::escape(query)) else {
        return Vec::new();
    };

    let mut matches = Vec::new();
    for row in 0..buffer.line_count() {
        let line = buffer.line_at(row).unwrap_or_default();
        for found in regex.find_iter(line) {
            let column = line[..found.start()].chars().count();
            matches.push(Position::new(row, column));
        }
    }
    matches
}
