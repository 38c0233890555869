//! # nav_core
//!
//! UI-agnostic navigation core for the query builder.
//!
//! The core keeps the card under edit ([`Document`](card_codec::Document)) and
//! the shareable location describing it in agreement:
//! - [`Machine`]: pure reducer `(state, input, env) -> (state, commands)`
//! - [`CommitRequest`]: reconcile an edited document into history
//! - [`NavConfig`]: base path, slugs, query preservation and the replace policy
//! - [`HistorySink`] / [`DocumentStore`]: the collaborators an adapter executes
//!   commands against
//!
//! ## Design Principles
//!
//! The reducer never performs I/O. Everything it needs from the outside world
//! (the sink's current location, the original snapshot, structural equality)
//! arrives in an [`Env`], and everything it wants done leaves as an ordered
//! list of [`NavCommand`](bus::NavCommand)s. Executing those commands is the
//! adapter's job.

mod commit;
mod config;
mod dirty;
mod machine;
mod pop;
mod traits;

pub use commit::CommitRequest;
pub use config::{ConfigError, FocusPopPolicy, NavConfig, ReplacePolicy};
pub use dirty::compute_dirty;
pub use machine::{Committed, Env, Input, Machine, Phase, Transition};
pub use traits::{DocumentStore, HistorySink};
