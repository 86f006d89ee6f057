//! Common types shared across hasig

pub mod error;
pub mod types;

pub use error::{Error, Result};
pub use types::{
    AggregatorConfig, CalendarHashChain, DataHash, ExtenderConfig, PublicationsFile, Signature,
};
