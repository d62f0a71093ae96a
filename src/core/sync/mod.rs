//! Sync orchestration

pub mod coordinator;
pub mod partition;
pub mod summary;

pub use coordinator::SyncCoordinator;
pub use partition::{Buckets, PartitionStats, Partitioner};
pub use summary::{InsertCounts, SyncSummary};
