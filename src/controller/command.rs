/// Default-handler actions in Edit mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditCommand {
    // Text entry
    InsertChar(char),
    InsertNewline,
    InsertTab,
    DeleteBackward,
    DeleteForward,

    // Basic movement
    MoveUp,
    MoveDown,
    MoveLeft,
    MoveRight,
    MoveLineStart,
    MoveLineEnd,
    MovePageUp,
    MovePageDown,

    // Spoken queries
    SpeakLocation,
    ReadLine,
    SpellWord,
}

/// Default-handler actions in Find mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FindCommand {
    AppendChar(char),
    DeleteChar,
    NextMatch,
    PreviousMatch,
}

/// Default-handler actions while the save prompt collects a file name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileNameCommand {
    AppendChar(char),
    DeleteChar,
}
