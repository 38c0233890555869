//! Navigation state machine.
//!
//! Invariants:
//! - `step` is pure: it clones the machine, applies one input and returns the
//!   successor together with the commands to execute. No I/O happens here.
//! - `observed` is the last location the machine saw or wrote. It is only used
//!   to tell apart genuinely new pops; the sink's current location (from
//!   [`Env`]) is what commits compare against.
//! - `committed.fingerprint` is the content identity of the last document
//!   written to or read from history; equal fingerprints across a save mean
//!   "same card, now with an id".
//! - `phase` is `Reconciling` between a navigation that asked the store to
//!   change and the adapter's `Input::Settled`. Commits issued meanwhile are
//!   URL-driven and never push.

use crate::commit::CommitRequest;
use crate::config::NavConfig;
use bus::{NavCommand, NavEvent, NavKind, Origin};
use card_codec::{Document, fingerprint};
use core_types::{CardId, ModeState, ObjectId};
use location::LocationDescriptor;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Phase {
    #[default]
    Idle,
    Reconciling,
}

/// Bookkeeping for the last document/location pair recorded in history.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Committed {
    pub fingerprint: String,
    pub card_id: Option<CardId>,
    pub location: LocationDescriptor,
}

impl Committed {
    pub fn new(document: &Document, location: &LocationDescriptor) -> Self {
        Self {
            fingerprint: fingerprint(document),
            card_id: document.id,
            location: location.clone(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum Input {
    Navigate(NavEvent),
    Commit(CommitRequest),
    /// A saved card requested with `LoadSaved` arrived.
    Loaded(Document),
    /// The adapter finished executing the previous step's commands.
    Settled,
}

fn content_equal(a: &Document, b: &Document) -> bool {
    a.content_eq(b)
}

/// Everything the reducer reads from the outside world for one step.
pub struct Env<'a> {
    pub current_location: &'a LocationDescriptor,
    pub original: Option<&'a Document>,
    pub equal: &'a dyn Fn(&Document, &Document) -> bool,
    pub config: &'a NavConfig,
}

impl<'a> Env<'a> {
    pub fn new(
        current_location: &'a LocationDescriptor,
        original: Option<&'a Document>,
        config: &'a NavConfig,
    ) -> Self {
        Self {
            current_location,
            original,
            equal: &content_equal,
            config,
        }
    }

    pub fn with_equality(mut self, equal: &'a dyn Fn(&Document, &Document) -> bool) -> Self {
        self.equal = equal;
        self
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Transition {
    pub machine: Machine,
    pub commands: Vec<NavCommand>,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct Machine {
    pub(crate) phase: Phase,
    pub(crate) document: Document,
    pub(crate) mode: ModeState,
    pub(crate) focus: Option<ObjectId>,
    pub(crate) observed: Option<LocationDescriptor>,
    pub(crate) committed: Option<Committed>,
}

impl Machine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Machine initialised from the location the view was opened at.
    pub fn start(env: &Env<'_>, location: LocationDescriptor) -> Transition {
        Self::new().step(env, Input::Navigate(NavEvent::initial_load(location)))
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn mode(&self) -> ModeState {
        self.mode
    }

    pub fn focus(&self) -> Option<&ObjectId> {
        self.focus.as_ref()
    }

    pub fn observed(&self) -> Option<&LocationDescriptor> {
        self.observed.as_ref()
    }

    pub fn committed(&self) -> Option<&Committed> {
        self.committed.as_ref()
    }

    pub fn step(&self, env: &Env<'_>, input: Input) -> Transition {
        let mut machine = self.clone();
        let mut commands = Vec::new();

        match input {
            Input::Navigate(event) => machine.on_navigate(env, event, &mut commands),
            Input::Commit(request) => machine.on_commit(env, request, &mut commands),
            Input::Loaded(document) => machine.on_loaded(document),
            Input::Settled => machine.phase = Phase::Idle,
        }

        Transition { machine, commands }
    }

    fn on_navigate(&mut self, env: &Env<'_>, event: NavEvent, commands: &mut Vec<NavCommand>) {
        if event.kind != NavKind::InitialLoad && self.observed.as_ref() == Some(&event.location) {
            log::trace!(target: "qbnav.nav", "{:?} to the observed location {}; nothing to do", event.kind, event.location);
            return;
        }

        match (event.kind, event.origin) {
            (NavKind::Pop, _) => self.on_pop(env, event.location, commands),
            (NavKind::Push | NavKind::Replace, Origin::Internal) => {
                log::debug!(target: "qbnav.nav", "ignoring self-generated {:?} to {}", event.kind, event.location);
                self.observed = Some(event.location);
            }
            (NavKind::Push | NavKind::Replace, Origin::External) | (NavKind::InitialLoad, _) => {
                self.on_initial_load(env, event.location, commands)
            }
        }
    }

    fn on_loaded(&mut self, mut document: Document) {
        if document.id != self.document.id {
            log::debug!(target: "qbnav.nav", "ignoring stale load of card {:?}", document.id);
            return;
        }
        document.object_focus = self.focus.clone();
        if let Some(observed) = self.observed.as_ref() {
            self.committed = Some(Committed::new(&document, observed));
        }
        self.document = document;
    }

    pub(crate) fn mark_reconciling_if_needed(&mut self, commands: &[NavCommand]) {
        if commands
            .iter()
            .any(|c| !matches!(c, NavCommand::CancelInFlight))
        {
            self.phase = Phase::Reconciling;
        }
    }
}
