//! # hasig
//!
//! High-availability client coordinator for a remote signing and
//! timestamping infrastructure:
//! - Up to three interchangeable backend replicas per role (signing,
//!   extending, publications file)
//! - Race-to-first-success dispatch for sign/extend/publications requests
//! - Wait-for-all dispatch with per-replica config caching and consensus
//!   merging for capability broadcasts
//! - Change notifications whenever the merged consensus view changes
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │               HaService                  │
//! │  (replica lists, deadline, subscriptions)│
//! └───────────┬──────────────────────────────┘
//!             │ spawn per replica
//!   ┌─────────┴──────────┬──────────────┐
//!   │                    │              │
//! ┌─▼──────────┐   ┌─────▼──────┐   ┌──▼───────────┐
//! │ Replica 1  │   │ Replica 2  │   │ Replica 3    │
//! │ (backend   │   │ (backend   │   │ (backend     │
//! │  client)   │   │  client)   │   │  client)     │
//! └─────┬──────┘   └─────┬──────┘   └──────┬───────┘
//!       │  results + config broadcasts     │
//!       └────────────────┼─────────────────┘
//!                 ┌──────▼───────┐
//!                 │ Config cache │──► change listeners
//!                 │  + consensus │
//!                 └──────────────┘
//! ```
//!
//! The wire protocol (PDU framing, HMAC, transport) lives below the
//! [`backend`] traits; implementations of those traits plug straight into
//! [`HaService`].
//!
//! ## Usage
//!
//! ```ignore
//! let service = HaService::new(signers, extenders, publications, timeout)?;
//! let signature = service.sign(hash, 0).await?;
//!
//! // or submit now, resolve later
//! let handle = service.submit_sign(hash, 0);
//! let signature = handle.await?;
//! ```

pub mod backend;
pub mod common;
pub mod ha;

pub use backend::{
    AggregatorClient, ExtendAck, ExtenderClient, PublicationsClient, Role, SignAck,
};
pub use common::{
    AggregatorConfig, CalendarHashChain, DataHash, Error, ExtenderConfig, PublicationsFile, Result,
    Signature,
};
pub use ha::{ConfigEvent, HaService, RequestHandle, MAX_REPLICAS};
