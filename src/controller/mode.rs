use crate::document_model::{Position, SearchState};

/// Which mode is active, without any per-mode data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ModeKind {
    Edit,
    Find,
    SaveConfirm,
    QuitConfirm,
    Exited,
}

impl ModeKind {
    pub fn spoken_name(&self) -> &'static str {
        match self {
            ModeKind::Edit => "edit",
            ModeKind::Find => "find",
            ModeKind::SaveConfirm => "save",
            ModeKind::QuitConfirm => "quit",
            ModeKind::Exited => "exit",
        }
    }
}

/// The active mode. Search state only exists inside `Find`. A save prompt
/// that is collecting a file name holds it in `file_name`.
#[derive(Debug, Clone)]
pub enum Mode {
    Edit,
    Find(SearchState),
    SaveConfirm { file_name: Option<String> },
    QuitConfirm,
    Exited,
}

impl Mode {
    pub fn kind(&self) -> ModeKind {
        match self {
            Mode::Edit => ModeKind::Edit,
            Mode::Find(_) => ModeKind::Find,
            Mode::SaveConfirm { .. } => ModeKind::SaveConfirm,
            Mode::QuitConfirm => ModeKind::QuitConfirm,
            Mode::Exited => ModeKind::Exited,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    FindKey,
    SaveKey,
    QuitKey,
    ConfirmKey,
    CancelKey,
}

/// What the session must do besides switching modes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    OpenSearch,
    CancelSearch,
    AcceptMatch,
    Announce,
    Save,
    Exit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub from: ModeKind,
    pub to: ModeKind,
    pub effect: Effect,
}

/// The transition table. `None` means the trigger is not a transition in
/// that mode and the key goes to the mode's default handler.
pub fn transition_for(from: ModeKind, trigger: Trigger) -> Option<Transition> {
    use Effect::*;
    use Trigger::*;

    let (to, effect) = match (from, trigger) {
        (ModeKind::Edit, FindKey) => (ModeKind::Find, OpenSearch),
        (ModeKind::Edit, SaveKey) => (ModeKind::SaveConfirm, Announce),
        (ModeKind::Edit, QuitKey) => (ModeKind::QuitConfirm, Announce),
        (ModeKind::Edit, ConfirmKey | CancelKey) => return None,

        (ModeKind::Find, CancelKey) => (ModeKind::Edit, CancelSearch),
        (ModeKind::Find, ConfirmKey) => (ModeKind::Edit, AcceptMatch),
        (ModeKind::Find, FindKey | SaveKey | QuitKey) => return None,

        (ModeKind::SaveConfirm, ConfirmKey) => (ModeKind::Edit, Save),
        (ModeKind::SaveConfirm, CancelKey) => (ModeKind::Edit, Announce),
        (ModeKind::SaveConfirm, FindKey | SaveKey | QuitKey) => return None,

        (ModeKind::QuitConfirm, ConfirmKey) => (ModeKind::Exited, Exit),
        (ModeKind::QuitConfirm, CancelKey) => (ModeKind::Edit, Announce),
        (ModeKind::QuitConfirm, FindKey | SaveKey | QuitKey) => return None,

        (ModeKind::Exited, FindKey | SaveKey | QuitKey | ConfirmKey | CancelKey) => return None,
    };

    Some(Transition { from, to, effect })
}

/// Owns the active mode. Transitions are the only way it changes.
#[derive(Debug, Clone)]
pub struct ModeController {
    mode: Mode,
}

/// A transition that happened, plus the mode it replaced.
#[derive(Debug)]
pub struct Fired {
    pub transition: Transition,
    pub previous: Mode,
}

impl Fired {
    pub fn discarded_search(&self) -> Option<&SearchState> {
        match &self.previous {
            Mode::Find(search) => Some(search),
            _ => None,
        }
    }

    /// The file name typed into the save prompt being left, if it asked.
    pub fn typed_file_name(&self) -> Option<&str> {
        match &self.previous {
            Mode::SaveConfirm { file_name } => file_name.as_deref(),
            _ => None,
        }
    }
}

impl ModeController {
    pub fn new() -> Self {
        Self { mode: Mode::Edit }
    }

    pub fn mode(&self) -> &Mode {
        &self.mode
    }

    pub fn kind(&self) -> ModeKind {
        self.mode.kind()
    }

    pub fn is_exited(&self) -> bool {
        matches!(self.mode, Mode::Exited)
    }

    pub fn search(&self) -> Option<&SearchState> {
        match &self.mode {
            Mode::Find(search) => Some(search),
            _ => None,
        }
    }

    pub fn search_mut(&mut self) -> Option<&mut SearchState> {
        match &mut self.mode {
            Mode::Find(search) => Some(search),
            _ => None,
        }
    }

    pub fn file_name(&self) -> Option<&str> {
        match &self.mode {
            Mode::SaveConfirm { file_name } => file_name.as_deref(),
            _ => None,
        }
    }

    pub fn file_name_mut(&mut self) -> Option<&mut String> {
        match &mut self.mode {
            Mode::SaveConfirm { file_name } => file_name.as_mut(),
            _ => None,
        }
    }

    /// Make the open save prompt collect a file name. Returns false outside
    /// SaveConfirm.
    pub fn ask_for_file_name(&mut self) -> bool {
        match &mut self.mode {
            Mode::SaveConfirm { file_name } => {
                file_name.get_or_insert_with(String::new);
                true
            }
            _ => false,
        }
    }

    /// Apply `trigger`. `cursor` anchors a freshly opened search.
    pub fn fire(&mut self, trigger: Trigger, cursor: Position) -> Option<Fired> {
        let transition = transition_for(self.kind(), trigger)?;

        let next = match transition.to {
            ModeKind::Edit => Mode::Edit,
            ModeKind::Find => Mode::Find(SearchState::new(cursor)),
            ModeKind::SaveConfirm => Mode::SaveConfirm { file_name: None },
            ModeKind::QuitConfirm => Mode::QuitConfirm,
            ModeKind::Exited => Mode::Exited,
        };
        let previous = std::mem::replace(&mut self.mode, next);

        Some(Fired {
            transition,
            previous,
        })
    }
}

impl Default for ModeController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIGGERS: [Trigger; 5] = [
        Trigger::FindKey,
        Trigger::SaveKey,
        Trigger::QuitKey,
        Trigger::ConfirmKey,
        Trigger::CancelKey,
    ];

    #[test]
    fn test_starts_in_edit() {
        let controller = ModeController::new();
        assert_eq!(controller.kind(), ModeKind::Edit);
        assert!(controller.search().is_none());
    }

    #[test]
    fn test_transition_table() {
        let expected = [
            (ModeKind::Edit, Trigger::FindKey, ModeKind::Find, Effect::OpenSearch),
            (ModeKind::Find, Trigger::CancelKey, ModeKind::Edit, Effect::CancelSearch),
            (ModeKind::Find, Trigger::ConfirmKey, ModeKind::Edit, Effect::AcceptMatch),
            (ModeKind::Edit, Trigger::SaveKey, ModeKind::SaveConfirm, Effect::Announce),
            (ModeKind::SaveConfirm, Trigger::CancelKey, ModeKind::Edit, Effect::Announce),
            (ModeKind::SaveConfirm, Trigger::ConfirmKey, ModeKind::Edit, Effect::Save),
            (ModeKind::Edit, Trigger::QuitKey, ModeKind::QuitConfirm, Effect::Announce),
            (ModeKind::QuitConfirm, Trigger::ConfirmKey, ModeKind::Exited, Effect::Exit),
            (ModeKind::QuitConfirm, Trigger::CancelKey, ModeKind::Edit, Effect::Announce),
        ];
        for (from, trigger, to, effect) in expected {
            assert_eq!(
                transition_for(from, trigger),
                Some(Transition { from, to, effect }),
                "{from:?} + {trigger:?}"
            );
        }

        let defined = TRIGGERS
            .iter()
            .flat_map(|t| {
                [
                    ModeKind::Edit,
                    ModeKind::Find,
                    ModeKind::SaveConfirm,
                    ModeKind::QuitConfirm,
                    ModeKind::Exited,
                ]
                .map(|m| transition_for(m, *t))
            })
            .filter(Option::is_some)
            .count();
        assert_eq!(defined, expected.len());
    }

    #[test]
    fn test_exited_is_terminal() {
        for trigger in TRIGGERS {
            assert_eq!(transition_for(ModeKind::Exited, trigger), None);
        }
    }

    #[test]
    fn test_find_creates_fresh_search_each_time() {
        let mut controller = ModeController::new();
        let origin = Position::new(2, 3);

        controller.fire(Trigger::FindKey, origin).unwrap();
        assert_eq!(controller.search().map(|s| s.query()), Some(""));

        let fired = controller.fire(Trigger::CancelKey, origin).unwrap();
        assert!(fired.discarded_search().is_some());
        assert!(controller.search().is_none());

        controller.fire(Trigger::FindKey, origin).unwrap();
        assert_eq!(controller.search().map(|s| s.match_count()), Some(0));
    }

    #[test]
    fn test_unmatched_trigger_leaves_mode() {
        let mut controller = ModeController::new();
        assert!(controller.fire(Trigger::ConfirmKey, Position::default()).is_none());
        assert_eq!(controller.kind(), ModeKind::Edit);

        controller.fire(Trigger::SaveKey, Position::default());
        assert!(controller.fire(Trigger::QuitKey, Position::default()).is_none());
        assert_eq!(controller.kind(), ModeKind::SaveConfirm);
    }

    #[test]
    fn test_quit_confirm_exits() {
        let mut controller = ModeController::new();
        controller.fire(Trigger::QuitKey, Position::default());
        controller.fire(Trigger::ConfirmKey, Position::default());
        assert!(controller.is_exited());
    }

    #[test]
    fn test_save_prompt_collects_file_name() {
        let mut controller = ModeController::new();
        assert!(!controller.ask_for_file_name());

        controller.fire(Trigger::SaveKey, Position::default());
        assert_eq!(controller.file_name(), None);
        assert!(controller.ask_for_file_name());
        assert_eq!(controller.file_name(), Some(""));

        if let Some(name) = controller.file_name_mut() {
            name.push_str("a.txt");
        }
        let fired = controller.fire(Trigger::ConfirmKey, Position::default()).unwrap();

        assert_eq!(fired.transition.effect, Effect::Save);
        assert_eq!(fired.typed_file_name(), Some("a.txt"));
        assert!(fired.discarded_search().is_none());
        assert_eq!(controller.file_name(), None);
    }
}
