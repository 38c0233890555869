use std::collections::BTreeMap;

use card_codec::Document;
use core_types::{CardId, ModeState, ObjectId};
use nav_core::DocumentStore;

/// Document store backed by a map of saved cards.
///
/// Query execution is not modelled; `runs` and `cancellations` count how often
/// the navigation core asked for either.
#[derive(Debug, Default)]
pub struct MemoryDocumentStore {
    current: Document,
    original: Option<Document>,
    saved: BTreeMap<CardId, Document>,
    focus: Option<ObjectId>,
    mode: ModeState,
    runs: usize,
    cancellations: usize,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a saved card. Documents without an id are ignored.
    pub fn with_saved(mut self, document: Document) -> Self {
        if let Some(id) = document.id {
            self.saved.insert(id, document.clone().with_focus(None));
        }
        self
    }

    /// Apply a user edit.
    pub fn edit(&mut self, document: Document) {
        self.current = document;
    }

    /// Persist the current document, assigning the next free id to a new card.
    pub fn save(&mut self) -> Document {
        let id = self.current.id.unwrap_or_else(|| {
            let next = self.saved.keys().next_back().map_or(1, |id| id.as_raw() + 1);
            CardId::from_raw(next)
        });
        let mut document = self.current.clone();
        document.id = Some(id);
        document.object_focus = None;
        self.saved.insert(id, document.clone());
        self.original = Some(document.clone());
        self.current = document.clone().with_focus(self.focus.clone());
        document
    }

    pub fn saved(&self, id: CardId) -> Option<&Document> {
        self.saved.get(&id)
    }

    pub fn focus(&self) -> Option<&ObjectId> {
        self.focus.as_ref()
    }

    pub fn mode(&self) -> ModeState {
        self.mode
    }

    pub fn runs(&self) -> usize {
        self.runs
    }

    pub fn cancellations(&self) -> usize {
        self.cancellations
    }
}

impl DocumentStore for MemoryDocumentStore {
    fn current(&self) -> &Document {
        &self.current
    }

    fn original(&self) -> Option<&Document> {
        self.original.as_ref()
    }

    fn replace(&mut self, document: Document, run: bool) {
        if run {
            self.runs += 1;
        }
        self.current = document;
    }

    fn load_saved(&mut self, id: CardId) -> Option<Document> {
        let document = self.saved.get(&id)?.clone();
        self.original = Some(document.clone());
        self.current = document.clone().with_focus(self.focus.clone());
        self.runs += 1;
        Some(document)
    }

    fn cancel_in_flight(&mut self) {
        self.cancellations += 1;
    }

    fn set_focus(&mut self, focus: Option<ObjectId>) {
        self.current.object_focus = focus.clone();
        self.focus = focus;
    }

    fn set_mode(&mut self, mode: ModeState) {
        self.mode = mode;
    }
}
