//! Key/value persistence for client-side preferences and drafts.
//!
//! [`ObfuscatedStore`] wraps any [`KeyValueStore`] and base64-encodes values
//! before they reach it. That keeps casual readers of the storage from seeing
//! values at a glance. It is not encryption: the encoding has no key and
//! anyone with access to the storage can reverse it.

pub mod backend;
pub mod file;
pub mod memory;
pub mod obfuscated;

pub use backend::{KeyValueStore, StoreError};
pub use file::FileStore;
pub use memory::MemoryStore;
pub use obfuscated::{ObfuscatedStore, ObfuscationError};
