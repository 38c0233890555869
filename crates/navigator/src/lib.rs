//! Runs the navigation reducer against real collaborators.
//!
//! [`Navigator`] owns the [`Machine`](nav_core::Machine), a
//! [`HistorySink`](nav_core::HistorySink) and a
//! [`DocumentStore`](nav_core::DocumentStore). It feeds inputs through the
//! reducer one at a time and executes the returned commands in order.
//!
//! ## Invariants
//!
//! - Inputs are processed strictly serially. Follow-up inputs produced while
//!   executing commands (a loaded card, a reinitialization, a URL update after
//!   a mode change) are queued and run after the current batch, never
//!   recursively.
//! - The environment for every step is rebuilt from the sink's current
//!   location and the store's original snapshot.

mod navigator;
mod store;

pub use navigator::Navigator;
pub use store::MemoryDocumentStore;
