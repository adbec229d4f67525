//! # Backing Store Module
//!
//! The storage media records end up in:
//!
//! - **`backing`**: the `BackingStore` capability every medium implements
//! - **`memory`**: thread-safe in-memory storage using RwLock<HashMap>
//! - **`defaults`**: the process-wide settings store, split into suites
//! - **`sled_store`**: persistent storage on the sled embedded database
//!
//! The engine only talks to `BackingStore`, so any of these can sit under it
//! without changing the rest of the crate.

pub mod backing;
pub mod defaults;
pub mod memory;
pub mod sled_store;

// Re-export the trait and stores for convenience
pub use backing::BackingStore;
pub use defaults::DefaultsStore;
pub use memory::MemoryStore;
pub use sled_store::SledStore;
