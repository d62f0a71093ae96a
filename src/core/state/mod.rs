//! Sync state derived from the target tables

pub mod cursor;
pub mod gate;

pub use cursor::{read_cursor, LayerCursor, SyncCursor};
pub use gate::clear_boundary;
