//! Persistence: table store clients and the batch writer.

pub mod batcher;
pub mod client;

pub use batcher::{PersistenceBatcher, RetryPolicy};
pub use client::{RestTableStore, StoreError, TableStore};
