use super::backend::AudioBackend;
use super::cue::{CueEvent, CueQueue, CueTag};
use super::request::{chime, indent_tone, CueRequest};
use super::speakable::{char_name, speakable, spelled};
use crate::controller::ModeKind;
use crate::error::EditorError;
use std::collections::HashMap;

/// Turns one event into the request that voices it.
pub type CueRenderer = fn(&CueEvent) -> CueRequest;

/// Static mapping from event tag to renderer.
#[derive(Clone)]
pub struct CueTable {
    renderers: HashMap<CueTag, CueRenderer>,
}

impl CueTable {
    pub fn empty() -> Self {
        Self {
            renderers: HashMap::new(),
        }
    }

    pub fn with(mut self, tag: CueTag, renderer: CueRenderer) -> Self {
        self.renderers.insert(tag, renderer);
        self
    }

    pub fn without(mut self, tag: CueTag) -> Self {
        self.renderers.remove(&tag);
        self
    }

    pub fn is_mapped(&self, tag: CueTag) -> bool {
        self.renderers.contains_key(&tag)
    }

    pub fn render(&self, event: &CueEvent) -> Result<CueRequest, EditorError> {
        let tag = event.tag();
        let renderer = self
            .renderers
            .get(&tag)
            .ok_or(EditorError::UnmappedCue { tag })?;
        Ok(renderer(event))
    }
}

impl Default for CueTable {
    fn default() -> Self {
        CueTable::empty()
            .with(CueTag::CharacterTyped, render_character_typed)
            .with(CueTag::LineBroken, render_line_broken)
            .with(CueTag::TextInserted, render_text_change)
            .with(CueTag::TextDeleted, render_text_change)
            .with(CueTag::CharacterDeleted, render_character_deleted)
            .with(CueTag::LinesJoined, render_lines_joined)
            .with(CueTag::IndentLevelAnnounced, render_indent_level)
            .with(CueTag::PositionChanged, |_| CueRequest::Silent)
            .with(CueTag::NavigationBlocked, |_| {
                CueRequest::Tone(chime(220.0, 0.2))
            })
            .with(CueTag::LocationAnnounced, render_location)
            .with(CueTag::LineRead, render_line_read)
            .with(CueTag::WordSpelled, render_word_spelled)
            .with(CueTag::ModeChanged, render_mode_changed)
            .with(CueTag::MatchCountChanged, render_match_count)
            .with(CueTag::MatchSelected, render_match_selected)
            .with(CueTag::SaveSucceeded, render_save_succeeded)
            .with(CueTag::SaveFailed, |_| {
                CueRequest::Sequence(vec![
                    CueRequest::Tone(chime(196.0, 0.3)),
                    CueRequest::speak("save failed"),
                ])
            })
            .with(CueTag::DocumentOpened, render_document_opened)
    }
}

fn render_character_typed(event: &CueEvent) -> CueRequest {
    match event {
        CueEvent::CharacterTyped {
            completed_word: Some(word),
            ..
        } => CueRequest::speak(word.clone()),
        CueEvent::CharacterTyped { ch, .. } => CueRequest::speak(char_name(*ch)),
        _ => CueRequest::Silent,
    }
}

fn render_line_broken(event: &CueEvent) -> CueRequest {
    match event {
        CueEvent::LineBroken { finished_line } => CueRequest::speak(speakable(finished_line)),
        _ => CueRequest::Silent,
    }
}

fn render_text_change(event: &CueEvent) -> CueRequest {
    match event {
        CueEvent::TextInserted { text } => CueRequest::speak(speakable(text)),
        CueEvent::TextDeleted { text } => {
            CueRequest::speak(format!("deleted {}", speakable(text)))
        }
        _ => CueRequest::Silent,
    }
}

fn render_character_deleted(event: &CueEvent) -> CueRequest {
    match event {
        CueEvent::CharacterDeleted { ch } => {
            CueRequest::speak(format!("deleted {}", char_name(*ch)))
        }
        _ => CueRequest::Silent,
    }
}

fn render_lines_joined(event: &CueEvent) -> CueRequest {
    match event {
        CueEvent::LinesJoined { row } => CueRequest::speak(format!("joined line {}", row + 1)),
        _ => CueRequest::Silent,
    }
}

fn render_indent_level(event: &CueEvent) -> CueRequest {
    match event {
        CueEvent::IndentLevelAnnounced { level } => CueRequest::Tone(indent_tone(*level)),
        _ => CueRequest::Silent,
    }
}

fn render_location(event: &CueEvent) -> CueRequest {
    match event {
        CueEvent::LocationAnnounced { row, column } => {
            CueRequest::speak(format!("row {}, column {}", row + 1, column + 1))
        }
        _ => CueRequest::Silent,
    }
}

fn render_line_read(event: &CueEvent) -> CueRequest {
    match event {
        CueEvent::LineRead { level, text } => {
            let mut parts: Vec<CueRequest> = (0..*level)
                .map(|depth| CueRequest::Tone(indent_tone(depth)))
                .collect();
            parts.push(CueRequest::speak(speakable(text.trim_start())));
            CueRequest::Sequence(parts)
        }
        _ => CueRequest::Silent,
    }
}

fn render_word_spelled(event: &CueEvent) -> CueRequest {
    match event {
        CueEvent::WordSpelled { word } => CueRequest::speak(spelled(word)),
        _ => CueRequest::Silent,
    }
}

fn render_mode_changed(event: &CueEvent) -> CueRequest {
    let CueEvent::ModeChanged {
        to,
        unsaved_changes,
        needs_file_name,
        ..
    } = event
    else {
        return CueRequest::Silent;
    };

    let announcement = match to {
        ModeKind::QuitConfirm if *unsaved_changes => "quit without saving?".to_string(),
        ModeKind::SaveConfirm if *needs_file_name => "save as".to_string(),
        _ => format!("{} mode", to.spoken_name()),
    };
    CueRequest::Sequence(vec![
        CueRequest::Tone(chime(440.0, 0.06)),
        CueRequest::Tone(chime(660.0, 0.1)),
        CueRequest::speak(announcement),
    ])
}

fn render_save_succeeded(event: &CueEvent) -> CueRequest {
    let message = match event {
        CueEvent::SaveSucceeded {
            file_name: Some(name),
            ..
        } => format!("saved {}", speakable(name)),
        _ => "saved".to_string(),
    };
    CueRequest::Sequence(vec![
        CueRequest::Tone(chime(660.0, 0.08)),
        CueRequest::Tone(chime(880.0, 0.12)),
        CueRequest::speak(message),
    ])
}

fn render_match_count(event: &CueEvent) -> CueRequest {
    match event {
        CueEvent::MatchCountChanged { count: 0 } => CueRequest::speak("no matches"),
        CueEvent::MatchCountChanged { count: 1 } => CueRequest::speak("1 match"),
        CueEvent::MatchCountChanged { count } => CueRequest::speak(format!("{count} matches")),
        _ => CueRequest::Silent,
    }
}

fn render_match_selected(event: &CueEvent) -> CueRequest {
    match event {
        CueEvent::MatchSelected {
            index,
            count,
            position,
        } => CueRequest::speak(format!(
            "match {} of {}, row {}",
            index + 1,
            count,
            position.row + 1
        )),
        _ => CueRequest::Silent,
    }
}

fn render_document_opened(event: &CueEvent) -> CueRequest {
    match event {
        CueEvent::DocumentOpened { new_file: true, .. } => CueRequest::speak("new file"),
        CueEvent::DocumentOpened { line_count: 1, .. } => CueRequest::speak("opened, 1 line"),
        CueEvent::DocumentOpened { line_count, .. } => {
            CueRequest::speak(format!("opened, {line_count} lines"))
        }
        _ => CueRequest::Silent,
    }
}

/// Drains pending events in order and hands one request per event to the
/// audio backend.
pub struct AudioCueDispatcher {
    table: CueTable,
    dispatched: u64,
    skipped: u64,
}

impl AudioCueDispatcher {
    pub fn new(table: CueTable) -> Self {
        Self {
            table,
            dispatched: 0,
            skipped: 0,
        }
    }

    pub fn table(&self) -> &CueTable {
        &self.table
    }

    pub fn dispatched(&self) -> u64 {
        self.dispatched
    }

    pub fn skipped(&self) -> u64 {
        self.skipped
    }

    /// Empty `events` into `backend`. Returns how many requests were sent.
    pub fn dispatch(&mut self, events: &mut CueQueue, backend: &mut dyn AudioBackend) -> usize {
        let mut sent = 0;
        while let Some(event) = events.pop() {
            match self.table.render(&event) {
                Ok(request) => {
                    log::trace!("cue {:?} -> {:?}", event.tag(), request);
                    backend.enqueue_cue(request);
                    self.dispatched += 1;
                    sent += 1;
                }
                Err(err) => {
                    log::warn!("{err}; skipping playback");
                    self.skipped += 1;
                }
            }
        }
        sent
    }
}

impl Default for AudioCueDispatcher {
    fn default() -> Self {
        Self::new(CueTable::default())
    }
}
