//! In-memory backend for the Object Design System entity store.
//!
//! Four independent collections behind one async `RwLock`. Nothing is
//! persisted; dropping the last clone of a [`MemStore`] drops the data.

mod collection;
mod store;

pub use store::MemStore;
