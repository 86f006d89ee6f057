//! Backend client traits consumed by the HA coordinator
//!
//! One trait per role. Implementations own the wire protocol (PDU framing,
//! HMAC, transport); the coordinator only sees typed results. All traits are
//! object-safe so replica lists can hold `Arc<dyn ...>` handles to mixed
//! implementations.

use crate::common::{
    AggregatorConfig, CalendarHashChain, DataHash, ExtenderConfig, PublicationsFile, Result,
    Signature,
};
use async_trait::async_trait;
use std::fmt;

/// Which replica list an operation or error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Signing,
    Extending,
    Publications,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Signing => write!(f, "signing"),
            Role::Extending => write!(f, "extending"),
            Role::Publications => write!(f, "publications file"),
        }
    }
}

/// Successful sign response. Aggregators may piggyback their current
/// capability broadcast on any response.
#[derive(Debug, Clone)]
pub struct SignAck {
    pub signature: Signature,
    pub config: Option<AggregatorConfig>,
}

/// Successful extend response, with the same piggyback rule.
#[derive(Debug, Clone)]
pub struct ExtendAck {
    pub chain: CalendarHashChain,
    pub config: Option<ExtenderConfig>,
}

/// One aggregation (signing) replica endpoint.
#[async_trait]
pub trait AggregatorClient: Send + Sync {
    /// Human-readable endpoint identifier
    fn address(&self) -> &str;

    /// Request a signature for `hash` at aggregation tree `level`.
    async fn sign(&self, hash: &DataHash, level: u32) -> Result<SignAck>;

    /// Request the replica's current capability broadcast.
    async fn aggregator_config(&self) -> Result<AggregatorConfig>;
}

/// One calendar extender replica endpoint.
#[async_trait]
pub trait ExtenderClient: Send + Sync {
    /// Human-readable endpoint identifier
    fn address(&self) -> &str;

    /// Extend `aggregation_time` to `publication_time`, or to the head of
    /// the calendar when no publication time is given.
    async fn extend(
        &self,
        aggregation_time: u64,
        publication_time: Option<u64>,
    ) -> Result<ExtendAck>;

    /// Request the replica's current capability broadcast.
    async fn extender_config(&self) -> Result<ExtenderConfig>;
}

/// One publications-file source.
#[async_trait]
pub trait PublicationsClient: Send + Sync {
    /// Human-readable endpoint identifier
    fn address(&self) -> &str;

    /// Fetch the current publications file.
    async fn publications_file(&self) -> Result<PublicationsFile>;
}
