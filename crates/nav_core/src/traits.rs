//! Collaborator interfaces consumed by a navigation adapter.
//!
//! # Design Principles
//!
//! - The history sink is the single source of truth for the current location;
//!   callers ask it every time instead of caching
//! - The document store owns the edited card, its saved snapshot and any
//!   downstream work (query execution) that navigation may need to cancel

use bus::NavEvent;
use card_codec::Document;
use core_types::{CardId, ModeState, ObjectId};
use location::LocationDescriptor;
use std::sync::mpsc::Receiver;

/// Abstraction over a browser-style navigation stack.
pub trait HistorySink {
    fn current_location(&self) -> LocationDescriptor;

    /// Add an entry after the current one, dropping any forward entries.
    fn push(&mut self, location: LocationDescriptor);

    /// Overwrite the current entry.
    fn replace(&mut self, location: LocationDescriptor);

    /// Receive every navigation the stack goes through, tagged with its origin.
    fn subscribe(&mut self) -> Receiver<NavEvent>;
}

/// Holder of the card under edit.
pub trait DocumentStore {
    fn current(&self) -> &Document;

    /// Saved snapshot the current document is compared against for dirtiness.
    fn original(&self) -> Option<&Document>;

    /// Swap in a new document; `run` asks for its query to be executed.
    fn replace(&mut self, document: Document, run: bool);

    /// Fetch a saved card, making it both current and original.
    ///
    /// Returns `None` when the card does not exist.
    fn load_saved(&mut self, id: CardId) -> Option<Document>;

    /// Cancel any outstanding downstream work (e.g. a running query).
    fn cancel_in_flight(&mut self);

    fn set_focus(&mut self, focus: Option<ObjectId>);

    fn set_mode(&mut self, mode: ModeState);

    fn structurally_equal(&self, a: &Document, b: &Document) -> bool {
        a.content_eq(b)
    }
}
