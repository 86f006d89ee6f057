//! Value objects exchanged with backend services
//!
//! Everything here is an immutable snapshot: built once by a backend client,
//! then cloned around the coordinator. Config equality is field-wise and
//! order-sensitive on the parent URI list, which is what the consensus diff
//! relies on.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Hash imprint submitted for signing: a one-byte algorithm id followed by
/// the digest, kept split here for readability.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataHash {
    /// Hash algorithm id
    pub algorithm: u32,
    /// Raw digest bytes
    pub digest: Bytes,
}

impl DataHash {
    pub fn new(algorithm: u32, digest: impl Into<Bytes>) -> Self {
        Self {
            algorithm,
            digest: digest.into(),
        }
    }
}

impl fmt::Display for DataHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:02x}:{}", self.algorithm, hex::encode(&self.digest))
    }
}

/// An issued signature envelope. The coordinator treats the body as opaque;
/// decoding belongs to the wire layer below the backend clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Signature {
    /// Aggregation round this signature belongs to (UNIX seconds)
    pub aggregation_time: u64,
    /// Encoded signature body
    pub bytes: Bytes,
}

/// Calendar hash chain returned by an extension request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarHashChain {
    /// Publication round the chain connects to (UNIX seconds)
    pub publication_time: u64,
    /// Encoded chain body
    pub bytes: Bytes,
}

/// Publications file payload, verified and decoded by lower layers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PublicationsFile {
    pub bytes: Bytes,
}

/// Aggregator capability broadcast.
///
/// All numeric fields are optional: a replica only reports what it knows.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AggregatorConfig {
    /// Maximum aggregation tree level the replica accepts
    pub max_level: Option<u32>,
    /// Hash algorithm id the replica aggregates with
    pub aggregation_algorithm: Option<u32>,
    /// Aggregation round length in milliseconds
    pub aggregation_period: Option<u64>,
    /// Maximum requests per round
    pub max_requests: Option<u64>,
    /// Parent server URIs, order-sensitive
    pub parent_uris: Vec<String>,
}

/// Extender capability broadcast.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtenderConfig {
    /// Maximum requests per round
    pub max_requests: Option<u64>,
    /// Earliest calendar time the replica can extend from (UNIX seconds)
    pub calendar_first_time: Option<u64>,
    /// Latest calendar time the replica can extend to (UNIX seconds)
    pub calendar_last_time: Option<u64>,
    /// Parent server URIs, order-sensitive
    pub parent_uris: Vec<String>,
}
