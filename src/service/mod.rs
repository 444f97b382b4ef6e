//! Sync service: bulk read and full-table replace.

pub mod sync;

pub use sync::*;
