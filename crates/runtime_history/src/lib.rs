// crates/runtime_history/src/lib.rs
mod memory;

pub use memory::MemoryHistory;
