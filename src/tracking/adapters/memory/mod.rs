//! In-memory adapters for tracking tests and embedded use.
//!
//! [`InMemoryTrackingStore`] implements both the work-item repository and
//! the organisation directory over a single lock, so roster checks and the
//! writes they guard observe the same snapshot.

mod directory;
mod store;
mod work_items;

pub use store::InMemoryTrackingStore;
