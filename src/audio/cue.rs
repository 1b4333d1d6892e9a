use crate::controller::ModeKind;
use crate::document_model::Position;
use std::collections::VecDeque;

/// Something that just happened in the editor and should be heard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CueEvent {
    CharacterTyped {
        ch: char,
        completed_word: Option<String>,
    },
    LineBroken {
        finished_line: String,
    },
    TextInserted {
        text: String,
    },
    CharacterDeleted {
        ch: char,
    },
    LinesJoined {
        row: usize,
    },
    TextDeleted {
        text: String,
    },
    IndentLevelAnnounced {
        level: usize,
    },
    PositionChanged {
        row: usize,
        column: usize,
    },
    NavigationBlocked,
    LocationAnnounced {
        row: usize,
        column: usize,
    },
    LineRead {
        level: usize,
        text: String,
    },
    WordSpelled {
        word: String,
    },
    /// `unsaved_changes` is the buffer's modified flag at the time of the
    /// switch. `needs_file_name` is set when a save prompt must ask for a
    /// file name first.
    ModeChanged {
        from: ModeKind,
        to: ModeKind,
        unsaved_changes: bool,
        needs_file_name: bool,
    },
    MatchCountChanged {
        count: usize,
    },
    MatchSelected {
        index: usize,
        count: usize,
        position: Position,
    },
    SaveSucceeded {
        bytes: usize,
        file_name: Option<String>,
    },
    SaveFailed {
        reason: String,
    },
    DocumentOpened {
        line_count: usize,
        new_file: bool,
    },
}

/// The dataless discriminant of a [`CueEvent`], used to key the cue table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CueTag {
    CharacterTyped,
    LineBroken,
    TextInserted,
    CharacterDeleted,
    LinesJoined,
    TextDeleted,
    IndentLevelAnnounced,
    PositionChanged,
    NavigationBlocked,
    LocationAnnounced,
    LineRead,
    WordSpelled,
    ModeChanged,
    MatchCountChanged,
    MatchSelected,
    SaveSucceeded,
    SaveFailed,
    DocumentOpened,
}

impl CueTag {
    pub const ALL: [CueTag; 18] = [
        CueTag::CharacterTyped,
        CueTag::LineBroken,
        CueTag::TextInserted,
        CueTag::CharacterDeleted,
        CueTag::LinesJoined,
        CueTag::TextDeleted,
        CueTag::IndentLevelAnnounced,
        CueTag::PositionChanged,
        CueTag::NavigationBlocked,
        CueTag::LocationAnnounced,
        CueTag::LineRead,
        CueTag::WordSpelled,
        CueTag::ModeChanged,
        CueTag::MatchCountChanged,
        CueTag::MatchSelected,
        CueTag::SaveSucceeded,
        CueTag::SaveFailed,
        CueTag::DocumentOpened,
    ];
}

impl CueEvent {
    pub fn tag(&self) -> CueTag {
        match self {
            CueEvent::CharacterTyped { .. } => CueTag::CharacterTyped,
            CueEvent::LineBroken { .. } => CueTag::LineBroken,
            CueEvent::TextInserted { .. } => CueTag::TextInserted,
            CueEvent::CharacterDeleted { .. } => CueTag::CharacterDeleted,
            CueEvent::LinesJoined { .. } => CueTag::LinesJoined,
            CueEvent::TextDeleted { .. } => CueTag::TextDeleted,
            CueEvent::IndentLevelAnnounced { .. } => CueTag::IndentLevelAnnounced,
            CueEvent::PositionChanged { .. } => CueTag::PositionChanged,
            CueEvent::NavigationBlocked => CueTag::NavigationBlocked,
            CueEvent::LocationAnnounced { .. } => CueTag::LocationAnnounced,
            CueEvent::LineRead { .. } => CueTag::LineRead,
            CueEvent::WordSpelled { .. } => CueTag::WordSpelled,
            CueEvent::ModeChanged { .. } => CueTag::ModeChanged,
            CueEvent::MatchCountChanged { .. } => CueTag::MatchCountChanged,
            CueEvent::MatchSelected { .. } => CueTag::MatchSelected,
            CueEvent::SaveSucceeded { .. } => CueTag::SaveSucceeded,
            CueEvent::SaveFailed { .. } => CueTag::SaveFailed,
            CueEvent::DocumentOpened { .. } => CueTag::DocumentOpened,
        }
    }
}

/// Pending events for the current input cycle, oldest first.
#[derive(Debug, Default, Clone)]
pub struct CueQueue {
    events: VecDeque<CueEvent>,
}

impl CueQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: CueEvent) {
        self.events.push_back(event);
    }

    pub fn pop(&mut self) -> Option<CueEvent> {
        self.events.pop_front()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }

    pub fn iter(&self) -> impl Iterator<Item = &CueEvent> {
        self.events.iter()
    }

    pub fn tags(&self) -> Vec<CueTag> {
        self.events.iter().map(CueEvent::tag).collect()
    }
}
