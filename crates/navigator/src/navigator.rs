use std::collections::VecDeque;
use std::sync::mpsc::Receiver;

use bus::{NavCommand, NavEvent};
use card_codec::Document;
use nav_core::{CommitRequest, DocumentStore, Env, HistorySink, Input, Machine, NavConfig, Phase};

pub struct Navigator<H: HistorySink, S: DocumentStore> {
    machine: Machine,
    history: H,
    store: S,
    events: Receiver<NavEvent>,
    config: NavConfig,
    pending: VecDeque<Input>,
}

impl<H: HistorySink, S: DocumentStore> Navigator<H, S> {
    pub fn new(mut history: H, store: S, config: NavConfig) -> Self {
        let events = history.subscribe();
        Self {
            machine: Machine::new(),
            history,
            store,
            events,
            config,
            pending: VecDeque::new(),
        }
    }

    /// Initialise from the sink's current location.
    pub fn start(&mut self) {
        let location = self.history.current_location();
        log::debug!(target: "qbnav.navigator", "start at {location}");
        self.dispatch(Input::Navigate(NavEvent::initial_load(location)));
        self.pump();
    }

    /// Record the store's current document in history.
    ///
    /// A request without a document commits whatever the store holds.
    pub fn commit(&mut self, mut request: CommitRequest) {
        if request.document.is_none() {
            request.document = Some(self.store.current().clone());
        }
        self.dispatch(Input::Commit(request));
        self.pump();
    }

    /// Drain navigation events delivered by the sink. Returns how many were seen.
    pub fn pump(&mut self) -> usize {
        let mut seen = 0;
        while let Ok(event) = self.events.try_recv() {
            seen += 1;
            self.dispatch(Input::Navigate(event));
        }
        seen
    }

    pub fn machine(&self) -> &Machine {
        &self.machine
    }

    pub fn history(&self) -> &H {
        &self.history
    }

    /// Mutable access for driving the sink from outside (back, forward, links).
    /// Call [`Navigator::pump`] afterwards.
    pub fn history_mut(&mut self) -> &mut H {
        &mut self.history
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &NavConfig {
        &self.config
    }

    fn dispatch(&mut self, input: Input) {
        self.pending.push_back(input);
        while let Some(input) = self.pending.pop_front() {
            let commands = self.step(input);
            if commands.is_empty() {
                continue;
            }
            for command in commands {
                self.execute(command);
            }
            if self.machine.phase() == Phase::Reconciling {
                self.pending.push_back(Input::Settled);
            }
        }
    }

    fn step(&mut self, input: Input) -> Vec<NavCommand> {
        let current = self.history.current_location();
        let store = &self.store;
        let equal = |a: &Document, b: &Document| store.structurally_equal(a, b);
        let env = Env::new(&current, store.original(), &self.config).with_equality(&equal);

        let transition = self.machine.step(&env, input);
        self.machine = transition.machine;
        transition.commands
    }

    fn execute(&mut self, command: NavCommand) {
        log::trace!(target: "qbnav.navigator", "execute {command:?}");
        match command {
            NavCommand::CancelInFlight => self.store.cancel_in_flight(),
            NavCommand::FocusObject(object_id) => self.store.set_focus(Some(object_id)),
            NavCommand::ClearFocus => self.store.set_focus(None),
            NavCommand::ReplaceDocument { document, run } => self.store.replace(document, run),
            NavCommand::LoadSaved { id } => match self.store.load_saved(id) {
                Some(document) => self.pending.push_back(Input::Loaded(document)),
                None => log::warn!(target: "qbnav.navigator", "card {id} not found; keeping the current document"),
            },
            NavCommand::Reinitialize { location } => {
                self.pending
                    .push_back(Input::Navigate(NavEvent::initial_load(location)));
            }
            NavCommand::SetMode {
                mode,
                url_driven,
                update_url,
            } => {
                log::debug!(target: "qbnav.navigator", "mode -> {mode:?} (url driven: {url_driven})");
                self.store.set_mode(mode);
                if update_url {
                    let request = CommitRequest::new()
                        .replace(true)
                        .focus(self.machine.focus().cloned());
                    self.pending.push_back(Input::Commit(request));
                }
            }
            NavCommand::Push(location) => self.history.push(location),
            NavCommand::Replace(location) => self.history.replace(location),
        }
    }
}
