use super::command::{EditCommand, FileNameCommand, FindCommand};
use super::key_handler::KeyHandler;
use super::mode::{Effect, ModeController, ModeKind, Trigger};
use crate::audio::{AudioBackend, AudioCueDispatcher, CueEvent, CueQueue};
use crate::config::EditorConfig;
use crate::document_model::{CursorModel, Position, SearchState, TextBuffer};
use crate::error::{EditorError, StorageError};
use crate::input::InputSource;
use crate::storage::StorageBackend;
use crossterm::event::KeyEvent;
use std::io;
use std::path::{Path, PathBuf};

/// All editor state for one document. Every key is fully handled (state
/// change, cue event, dispatch) before `handle_key_event` returns.
pub struct EditorSession {
    buffer: TextBuffer,
    cursor: CursorModel,
    modes: ModeController,
    events: CueQueue,
    dispatcher: AudioCueDispatcher,
    audio: Box<dyn AudioBackend>,
    storage: Box<dyn StorageBackend>,
    config: EditorConfig,
}

impl EditorSession {
    pub fn new(
        config: EditorConfig,
        audio: Box<dyn AudioBackend>,
        storage: Box<dyn StorageBackend>,
    ) -> Self {
        Self {
            buffer: TextBuffer::new(config.tab_width),
            cursor: CursorModel::new(config.page_size),
            modes: ModeController::new(),
            events: CueQueue::new(),
            dispatcher: AudioCueDispatcher::default(),
            audio,
            storage,
            config,
        }
    }

    /// Replace the document without announcing it.
    pub fn with_text(mut self, text: &str) -> Self {
        self.replace_document(text);
        self
    }

    pub fn with_dispatcher(mut self, dispatcher: AudioCueDispatcher) -> Self {
        self.dispatcher = dispatcher;
        self
    }

    /// Load `path` through the storage backend. A missing file starts an
    /// empty document that will be created on the first save.
    pub fn open(&mut self, path: &Path) -> Result<(), StorageError> {
        let new_file = match self.storage.load(path) {
            Ok(text) => {
                self.replace_document(&text);
                false
            }
            Err(StorageError::NotFound(_)) => {
                log::info!("{} does not exist yet", path.display());
                self.replace_document("");
                true
            }
            Err(err) => return Err(err),
        };

        self.events.push(CueEvent::DocumentOpened {
            line_count: self.buffer.line_count(),
            new_file,
        });
        self.flush();
        Ok(())
    }

    fn replace_document(&mut self, text: &str) {
        self.buffer = TextBuffer::from_text(text, self.config.tab_width);
        self.cursor.clamp_to(&self.buffer);
    }

    pub fn buffer(&self) -> &TextBuffer {
        &self.buffer
    }

    pub fn cursor(&self) -> &CursorModel {
        &self.cursor
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn mode_kind(&self) -> ModeKind {
        self.modes.kind()
    }

    pub fn search(&self) -> Option<&SearchState> {
        self.modes.search()
    }

    pub fn dispatcher(&self) -> &AudioCueDispatcher {
        &self.dispatcher
    }

    pub fn current_document_text(&self) -> String {
        self.buffer.text()
    }

    pub fn is_exited(&self) -> bool {
        self.modes.is_exited()
    }

    /// Read keys until the source runs dry or the user quits.
    pub fn run(&mut self, input: &mut dyn InputSource) -> io::Result<()> {
        log::info!("session started with {} lines", self.buffer.line_count());
        while !self.is_exited() {
            match input.next_key()? {
                Some(key) => self.handle_key_event(key),
                None => {
                    log::info!("input closed");
                    break;
                }
            }
        }
        log::info!("session ended");
        Ok(())
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) {
        let mode = self.modes.kind();
        if self.modes.file_name().is_some() {
            self.handle_file_name_key(key);
            self.flush();
            return;
        }

        match KeyHandler::trigger_for(mode, &key) {
            Some(trigger) => self.apply_trigger(trigger),
            None => match mode {
                ModeKind::Edit => match KeyHandler::edit_command(&key) {
                    Some(command) => self.handle_edit_command(command),
                    None => log::debug!("ignored {:?} in edit mode", key.code),
                },
                ModeKind::Find => match KeyHandler::find_command(&key) {
                    Some(command) => self.handle_find_command(command),
                    None => log::debug!("ignored {:?} in find mode", key.code),
                },
                ModeKind::SaveConfirm | ModeKind::QuitConfirm | ModeKind::Exited => {
                    log::debug!("ignored {:?} in {:?}", key.code, mode);
                }
            },
        }
        self.flush();
    }

    fn handle_file_name_key(&mut self, key: KeyEvent) {
        if let Some(trigger) = KeyHandler::file_name_trigger(&key) {
            self.apply_trigger(trigger);
            return;
        }
        let Some(command) = KeyHandler::file_name_command(&key) else {
            log::debug!("ignored {:?} in file name prompt", key.code);
            return;
        };
        let Some(name) = self.modes.file_name_mut() else {
            return;
        };

        match command {
            FileNameCommand::AppendChar(ch) => {
                name.push(ch);
                self.events.push(CueEvent::CharacterTyped {
                    ch,
                    completed_word: None,
                });
            }
            FileNameCommand::DeleteChar => match name.pop() {
                Some(ch) => self.events.push(CueEvent::CharacterDeleted { ch }),
                None => log::debug!("file name already empty"),
            },
        }
    }

    fn flush(&mut self) {
        self.dispatcher.dispatch(&mut self.events, self.audio.as_mut());
    }

    fn apply_trigger(&mut self, trigger: Trigger) {
        let Some(fired) = self.modes.fire(trigger, self.cursor.position()) else {
            log::debug!("{trigger:?} is not a transition in {:?}", self.modes.kind());
            return;
        };
        let transition = fired.transition;
        let needs_file_name =
            transition.to == ModeKind::SaveConfirm && self.storage.path().is_none();
        if needs_file_name {
            self.modes.ask_for_file_name();
        }
        let mode_changed = CueEvent::ModeChanged {
            from: transition.from,
            to: transition.to,
            unsaved_changes: self.buffer.is_modified(),
            needs_file_name,
        };

        match transition.effect {
            Effect::OpenSearch | Effect::CancelSearch | Effect::Announce => {
                self.events.push(mode_changed);
            }
            Effect::AcceptMatch => {
                if let Some(target) = fired.discarded_search().and_then(SearchState::current_match) {
                    self.place_cursor(target);
                }
                self.events.push(mode_changed);
            }
            Effect::Save => self.save(fired.typed_file_name()),
            Effect::Exit => log::info!("quit confirmed"),
        }
    }

    /// Save through storage. A name typed into the prompt becomes the
    /// storage path first.
    fn save(&mut self, typed_file_name: Option<&str>) {
        if let Some(name) = typed_file_name.map(str::trim).filter(|name| !name.is_empty()) {
            self.storage.set_path(PathBuf::from(name));
        }

        let text = self.buffer.text();
        match self.storage.save(&text) {
            Ok(bytes) => {
                self.buffer.mark_saved();
                let file_name = self.storage.path().and_then(|path| {
                    path.file_name()
                        .map(|name| name.to_string_lossy().into_owned())
                });
                self.events.push(CueEvent::SaveSucceeded { bytes, file_name });
            }
            Err(err) => {
                let err = EditorError::SaveFailed(err.to_string());
                log::warn!("{err}");
                self.events.push(CueEvent::SaveFailed {
                    reason: err.to_string(),
                });
            }
        }
    }

    fn handle_edit_command(&mut self, command: EditCommand) {
        let buffer = &self.buffer;
        let cursor = &mut self.cursor;
        let events = &mut self.events;

        match command {
            EditCommand::MoveUp => cursor.move_by(-1, 0, buffer, events),
            EditCommand::MoveDown => cursor.move_by(1, 0, buffer, events),
            EditCommand::MoveLeft => cursor.move_by(0, -1, buffer, events),
            EditCommand::MoveRight => cursor.move_by(0, 1, buffer, events),
            EditCommand::MoveLineStart => cursor.move_to_line_start(buffer, events),
            EditCommand::MoveLineEnd => cursor.move_to_line_end(buffer, events),
            EditCommand::MovePageUp => cursor.page_up(buffer, events),
            EditCommand::MovePageDown => cursor.page_down(buffer, events),

            EditCommand::SpeakLocation => events.push(CueEvent::LocationAnnounced {
                row: cursor.row(),
                column: cursor.column(),
            }),
            EditCommand::ReadLine => {
                let row = cursor.row();
                events.push(CueEvent::LineRead {
                    level: buffer.indent_level(row),
                    text: buffer.line_at(row).unwrap_or_default().to_string(),
                });
            }
            EditCommand::SpellWord => {
                let word = buffer.word_at(cursor.position());
                if word.is_empty() {
                    log::debug!("no word to spell at {}", cursor.position());
                } else {
                    events.push(CueEvent::WordSpelled { word });
                }
            }

            EditCommand::InsertChar(c) => self.insert_text(&c.to_string()),
            EditCommand::InsertNewline => self.insert_text("\n"),
            EditCommand::InsertTab => {
                let tab = if self.config.expand_tab {
                    " ".repeat(self.buffer.tab_width())
                } else {
                    "\t".to_string()
                };
                self.insert_text(&tab);
            }
            EditCommand::DeleteBackward => self.delete_backward(),
            EditCommand::DeleteForward => self.delete_forward(),
        }
    }

    fn insert_text(&mut self, text: &str) {
        let at = self.cursor.position();
        match self.buffer.insert(at, text, &mut self.events) {
            Ok(end) => self.place_cursor(end),
            Err(err) => log::debug!("insert rejected: {err}"),
        }
    }

    fn delete_backward(&mut self) {
        let end = self.cursor.position();
        let Some(start) = self.buffer.previous_position(end) else {
            log::debug!("backspace at document start");
            return;
        };
        match self.buffer.delete_range(start, end, &mut self.events) {
            Ok(_) => self.place_cursor(start),
            Err(err) => log::debug!("delete rejected: {err}"),
        }
    }

    fn delete_forward(&mut self) {
        let start = self.cursor.position();
        let Some(end) = self.buffer.next_position(start) else {
            log::debug!("delete at document end");
            return;
        };
        match self.buffer.delete_range(start, end, &mut self.events) {
            Ok(_) => self.place_cursor(start),
            Err(err) => log::debug!("delete rejected: {err}"),
        }
    }

    fn place_cursor(&mut self, target: Position) {
        if let Err(err) = self.cursor.set_position(target, &self.buffer) {
            log::debug!("{err}; clamping cursor");
            self.cursor.clamp_to(&self.buffer);
        }
        self.cursor.keep_anchor_valid(&self.buffer);
    }

    fn handle_find_command(&mut self, command: FindCommand) {
        let Some(search) = self.modes.search_mut() else {
            return;
        };
        let buffer = &self.buffer;
        let events = &mut self.events;

        match command {
            FindCommand::AppendChar(c) => search.push_char(c, buffer, events),
            FindCommand::DeleteChar => {
                if !search.pop_char(buffer, events) {
                    log::debug!("query already empty");
                }
            }
            FindCommand::NextMatch => {
                if search.next(events).is_none() {
                    log::debug!("no matches to cycle");
                }
            }
            FindCommand::PreviousMatch => {
                if search.previous(events).is_none() {
                    log::debug!("no matches to cycle");
                }
            }
        }
    }
}
