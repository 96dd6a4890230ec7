//! Session persistence behind the [`SessionStore`] contract.

mod error;
mod json_store;
mod memory_store;
mod store;

pub use error::StoreError;
pub use json_store::JsonSessionStore;
pub use memory_store::MemorySessionStore;
pub use store::SessionStore;
