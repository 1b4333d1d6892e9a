use super::command::{EditCommand, FileNameCommand, FindCommand};
use super::mode::{ModeKind, Trigger};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub struct KeyHandler;

impl KeyHandler {
    /// The mode-transition trigger bound to `key` in `mode`, if any.
    pub fn trigger_for(mode: ModeKind, key: &KeyEvent) -> Option<Trigger> {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);

        match mode {
            ModeKind::Edit => match key.code {
                KeyCode::Char('f') if ctrl => Some(Trigger::FindKey),
                KeyCode::Char('s') if ctrl => Some(Trigger::SaveKey),
                KeyCode::Char('q') if ctrl => Some(Trigger::QuitKey),
                _ => None,
            },
            ModeKind::Find => match key.code {
                KeyCode::Enter => Some(Trigger::ConfirmKey),
                KeyCode::Esc => Some(Trigger::CancelKey),
                _ => None,
            },
            ModeKind::SaveConfirm | ModeKind::QuitConfirm => match key.code {
                KeyCode::Enter => Some(Trigger::ConfirmKey),
                KeyCode::Char('y' | 'Y') if !ctrl => Some(Trigger::ConfirmKey),
                KeyCode::Esc => Some(Trigger::CancelKey),
                KeyCode::Char('n' | 'N') if !ctrl => Some(Trigger::CancelKey),
                _ => None,
            },
            ModeKind::Exited => None,
        }
    }

    /// Triggers while the save prompt is collecting a file name. Letters
    /// belong to the name, so only Enter and Esc answer the prompt.
    pub fn file_name_trigger(key: &KeyEvent) -> Option<Trigger> {
        match key.code {
            KeyCode::Enter => Some(Trigger::ConfirmKey),
            KeyCode::Esc => Some(Trigger::CancelKey),
            _ => None,
        }
    }

    pub fn edit_command(key: &KeyEvent) -> Option<EditCommand> {
        let modifiers = key.modifiers;

        match key.code {
            // Alt chords first (more specific)
            KeyCode::Char(';') if modifiers.contains(KeyModifiers::ALT) => {
                Some(EditCommand::SpeakLocation)
            }
            KeyCode::Char('l') if modifiers.contains(KeyModifiers::ALT) => {
                Some(EditCommand::ReadLine)
            }
            KeyCode::Char('.') if modifiers.contains(KeyModifiers::ALT) => {
                Some(EditCommand::SpellWord)
            }

            KeyCode::Char(c) if Self::is_plain(modifiers) => Some(EditCommand::InsertChar(c)),
            KeyCode::Enter => Some(EditCommand::InsertNewline),
            KeyCode::Tab => Some(EditCommand::InsertTab),
            KeyCode::Backspace => Some(EditCommand::DeleteBackward),
            KeyCode::Delete => Some(EditCommand::DeleteForward),

            KeyCode::Up => Some(EditCommand::MoveUp),
            KeyCode::Down => Some(EditCommand::MoveDown),
            KeyCode::Left => Some(EditCommand::MoveLeft),
            KeyCode::Right => Some(EditCommand::MoveRight),
            KeyCode::Home => Some(EditCommand::MoveLineStart),
            KeyCode::End => Some(EditCommand::MoveLineEnd),
            KeyCode::PageUp => Some(EditCommand::MovePageUp),
            KeyCode::PageDown => Some(EditCommand::MovePageDown),

            // Unbound control chords and other keys stay silent
            _ => None,
        }
    }

    pub fn find_command(key: &KeyEvent) -> Option<FindCommand> {
        let modifiers = key.modifiers;

        match key.code {
            KeyCode::Char('n') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(FindCommand::NextMatch)
            }
            KeyCode::Char('p') if modifiers.contains(KeyModifiers::CONTROL) => {
                Some(FindCommand::PreviousMatch)
            }
            KeyCode::Down => Some(FindCommand::NextMatch),
            KeyCode::Up => Some(FindCommand::PreviousMatch),
            KeyCode::Backspace => Some(FindCommand::DeleteChar),
            KeyCode::Char(c) if Self::is_plain(modifiers) => Some(FindCommand::AppendChar(c)),
            _ => None,
        }
    }

    pub fn file_name_command(key: &KeyEvent) -> Option<FileNameCommand> {
        match key.code {
            KeyCode::Backspace => Some(FileNameCommand::DeleteChar),
            KeyCode::Char(c) if Self::is_plain(key.modifiers) => {
                Some(FileNameCommand::AppendChar(c))
            }
            _ => None,
        }
    }

    fn is_plain(modifiers: KeyModifiers) -> bool {
        modifiers.difference(KeyModifiers::SHIFT).is_empty()
    }
}
