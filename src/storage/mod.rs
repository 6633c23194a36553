//! Database access for the relational store.
//!
//! Connection pools are created once per logical database name and shared
//! by every lookup for the lifetime of the process.

mod pool;

// Re-export commonly used items
pub use pool::{init_pool_for, pool_for};
