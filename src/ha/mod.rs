//! High-availability request coordination
//!
//! The coordinator is responsible for:
//! - Fanning each request out to every replica of the role concurrently
//! - Resolving one logical outcome per dispatch policy (race-to-first for
//!   sign/extend/publications, wait-for-all for config polls)
//! - Caching per-replica config broadcasts and merging them into one
//!   consensus view
//! - Notifying subscribers when the consensus changes

mod cache;
pub mod handle;
pub mod merge;
mod runner;
pub mod service;

pub use cache::ConfigEvent;
pub use handle::{
    AggregatorConfigHandle, ExtendHandle, ExtenderConfigHandle, PublicationsHandle, RequestHandle,
    SignHandle,
};
pub use merge::Consolidate;
pub use service::{HaService, MAX_REPLICAS};
