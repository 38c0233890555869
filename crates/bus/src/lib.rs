use card_codec::Document;
use core_types::{CardId, ModeState, ObjectId};
use location::LocationDescriptor;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NavKind {
    // Browser back/forward onto an entry already in history
    Pop,
    Push,
    Replace,
    InitialLoad,
}

/// Who caused a history change.
///
/// `Internal` marks entries written by the navigation core's own commits;
/// reacting to those again would loop.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    Internal,
    External,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavEvent {
    pub kind: NavKind,
    pub origin: Origin,
    pub location: LocationDescriptor,
}

impl NavEvent {
    pub fn pop(location: LocationDescriptor) -> Self {
        Self {
            kind: NavKind::Pop,
            origin: Origin::External,
            location,
        }
    }

    pub fn initial_load(location: LocationDescriptor) -> Self {
        Self {
            kind: NavKind::InitialLoad,
            origin: Origin::External,
            location,
        }
    }

    pub fn push(location: LocationDescriptor, origin: Origin) -> Self {
        Self {
            kind: NavKind::Push,
            origin,
            location,
        }
    }

    pub fn replace(location: LocationDescriptor, origin: Origin) -> Self {
        Self {
            kind: NavKind::Replace,
            origin,
            location,
        }
    }
}

/// Side effects requested by the navigation core, executed in order by an adapter.
#[derive(Clone, Debug, PartialEq)]
pub enum NavCommand {
    // Document store
    CancelInFlight,
    FocusObject(ObjectId),
    ClearFocus,
    ReplaceDocument {
        document: Document,
        run: bool,
    },
    LoadSaved {
        id: CardId,
    },
    Reinitialize {
        location: LocationDescriptor,
    },
    SetMode {
        mode: ModeState,
        url_driven: bool,
        update_url: bool,
    },
    // History sink
    Push(LocationDescriptor),
    Replace(LocationDescriptor),
}

impl NavCommand {
    pub fn is_history_write(&self) -> bool {
        matches!(self, NavCommand::Push(_) | NavCommand::Replace(_))
    }
}
