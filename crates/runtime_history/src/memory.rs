use std::sync::mpsc::{self, Receiver, Sender};

use bus::{NavEvent, Origin};
use location::LocationDescriptor;
use nav_core::HistorySink;

/// Browser-style session history held in memory.
///
/// `entries[index]` is always the current location; the stack is never empty.
/// Every change is broadcast to all live subscribers: sink writes as
/// `Origin::Internal`, link clicks and redirects as `Origin::External`, and
/// back/forward as `Pop`.
#[derive(Debug)]
pub struct MemoryHistory {
    entries: Vec<LocationDescriptor>,
    index: usize,
    subscribers: Vec<Sender<NavEvent>>,
}

impl MemoryHistory {
    pub fn new(initial: LocationDescriptor) -> Self {
        Self {
            entries: vec![initial],
            index: 0,
            subscribers: Vec::new(),
        }
    }

    pub fn entries(&self) -> &[LocationDescriptor] {
        &self.entries
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn can_go_back(&self) -> bool {
        self.index > 0
    }

    pub fn can_go_forward(&self) -> bool {
        self.index + 1 < self.entries.len()
    }

    pub fn back(&mut self) -> bool {
        self.go(-1)
    }

    pub fn forward(&mut self) -> bool {
        self.go(1)
    }

    /// Move `delta` entries through the stack. Out-of-range moves and `0`
    /// are ignored and return `false`.
    pub fn go(&mut self, delta: isize) -> bool {
        let Some(target) = self.index.checked_add_signed(delta) else {
            return false;
        };
        if delta == 0 || target >= self.entries.len() {
            return false;
        }
        self.index = target;
        let location = self.entries[target].clone();
        log::trace!(target: "qbnav.history", "pop {delta:+} -> [{target}] {location}");
        self.emit(NavEvent::pop(location));
        true
    }

    /// A navigation the core did not initiate, such as a link click.
    pub fn follow_link(&mut self, location: LocationDescriptor) {
        self.push_entry(location.clone());
        self.emit(NavEvent::push(location, Origin::External));
    }

    /// An external in-place navigation, such as a server redirect.
    pub fn redirect(&mut self, location: LocationDescriptor) {
        self.entries[self.index] = location.clone();
        self.emit(NavEvent::replace(location, Origin::External));
    }

    fn push_entry(&mut self, location: LocationDescriptor) {
        self.entries.truncate(self.index + 1);
        self.entries.push(location);
        self.index = self.entries.len() - 1;
    }

    fn emit(&mut self, event: NavEvent) {
        // Dropped receivers unsubscribe.
        self.subscribers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}

impl HistorySink for MemoryHistory {
    fn current_location(&self) -> LocationDescriptor {
        self.entries[self.index].clone()
    }

    fn push(&mut self, location: LocationDescriptor) {
        log::trace!(target: "qbnav.history", "push [{}] {location}", self.index + 1);
        self.push_entry(location.clone());
        self.emit(NavEvent::push(location, Origin::Internal));
    }

    fn replace(&mut self, location: LocationDescriptor) {
        log::trace!(target: "qbnav.history", "replace [{}] {location}", self.index);
        self.entries[self.index] = location.clone();
        self.emit(NavEvent::replace(location, Origin::Internal));
    }

    fn subscribe(&mut self) -> Receiver<NavEvent> {
        let (tx, rx) = mpsc::channel();
        self.subscribers.push(tx);
        rx
    }
}
