//! Mock backend clients for coordinator tests
//!
//! Each mock holds a scripted result behind a mutex so tests can flip a
//! replica from healthy to failing between calls, plus an optional
//! artificial delay and atomic call counters.
#![allow(dead_code)]

use async_trait::async_trait;
use bytes::Bytes;
use hasig::backend::{AggregatorClient, ExtendAck, ExtenderClient, PublicationsClient, SignAck};
use hasig::common::{
    AggregatorConfig, CalendarHashChain, DataHash, Error, ExtenderConfig, PublicationsFile, Result,
    Signature,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

pub fn sample_hash() -> DataHash {
    DataHash::new(1, vec![0xab; 32])
}

pub fn signature(aggregation_time: u64) -> Signature {
    Signature {
        aggregation_time,
        bytes: Bytes::from_static(b"signature-body"),
    }
}

pub fn chain(publication_time: u64) -> CalendarHashChain {
    CalendarHashChain {
        publication_time,
        bytes: Bytes::from_static(b"chain-body"),
    }
}

pub fn agg_config(
    max_level: u32,
    algorithm: u32,
    period: u64,
    max_requests: u64,
    uris: &[&str],
) -> AggregatorConfig {
    AggregatorConfig {
        max_level: Some(max_level),
        aggregation_algorithm: Some(algorithm),
        aggregation_period: Some(period),
        max_requests: Some(max_requests),
        parent_uris: uris.iter().map(|s| s.to_string()).collect(),
    }
}

pub fn ext_config(max_requests: u64, first: u64, last: u64, uris: &[&str]) -> ExtenderConfig {
    ExtenderConfig {
        max_requests: Some(max_requests),
        calendar_first_time: Some(first),
        calendar_last_time: Some(last),
        parent_uris: uris.iter().map(|s| s.to_string()).collect(),
    }
}

fn refused() -> Error {
    Error::Transport("connection refused".into())
}

pub struct MockAggregator {
    address: String,
    delay: Mutex<Duration>,
    sign_result: Mutex<Result<SignAck>>,
    config_result: Mutex<Result<AggregatorConfig>>,
    pub sign_calls: AtomicUsize,
    pub config_calls: AtomicUsize,
}

impl MockAggregator {
    /// Healthy replica answering with `signature(aggregation_time)` and no
    /// piggybacked config.
    pub fn ok(address: &str, aggregation_time: u64) -> Self {
        Self {
            address: address.to_string(),
            delay: Mutex::new(Duration::ZERO),
            sign_result: Mutex::new(Ok(SignAck {
                signature: signature(aggregation_time),
                config: None,
            })),
            config_result: Mutex::new(Ok(AggregatorConfig::default())),
            sign_calls: AtomicUsize::new(0),
            config_calls: AtomicUsize::new(0),
        }
    }

    /// Replica refusing every request.
    pub fn failing(address: &str) -> Self {
        let mock = Self::ok(address, 0);
        mock.fail();
        mock
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = delay;
        self
    }

    pub fn with_config(self, config: AggregatorConfig) -> Self {
        self.set_config(Ok(config));
        self
    }

    /// Piggyback `config` on sign responses.
    pub fn with_piggyback(self, config: AggregatorConfig) -> Self {
        {
            let mut result = self.sign_result.lock().unwrap();
            if let Ok(ack) = result.as_mut() {
                ack.config = Some(config);
            }
        }
        self
    }

    pub fn set_sign(&self, result: Result<SignAck>) {
        *self.sign_result.lock().unwrap() = result;
    }

    pub fn set_config(&self, result: Result<AggregatorConfig>) {
        *self.config_result.lock().unwrap() = result;
    }

    /// Flip both operations to transport failures.
    pub fn fail(&self) {
        self.set_sign(Err(refused()));
        self.set_config(Err(refused()));
    }
}

#[async_trait]
impl AggregatorClient for MockAggregator {
    fn address(&self) -> &str {
        &self.address
    }

    async fn sign(&self, _hash: &DataHash, _level: u32) -> Result<SignAck> {
        self.sign_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        let result = self.sign_result.lock().unwrap().clone();
        tokio::time::sleep(delay).await;
        result
    }

    async fn aggregator_config(&self) -> Result<AggregatorConfig> {
        self.config_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        let result = self.config_result.lock().unwrap().clone();
        tokio::time::sleep(delay).await;
        result
    }
}

pub struct MockExtender {
    address: String,
    delay: Mutex<Duration>,
    extend_result: Mutex<Result<ExtendAck>>,
    config_result: Mutex<Result<ExtenderConfig>>,
    pub extend_calls: AtomicUsize,
    pub config_calls: AtomicUsize,
}

impl MockExtender {
    pub fn ok(address: &str, publication_time: u64) -> Self {
        Self {
            address: address.to_string(),
            delay: Mutex::new(Duration::ZERO),
            extend_result: Mutex::new(Ok(ExtendAck {
                chain: chain(publication_time),
                config: None,
            })),
            config_result: Mutex::new(Ok(ExtenderConfig::default())),
            extend_calls: AtomicUsize::new(0),
            config_calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(address: &str) -> Self {
        let mock = Self::ok(address, 0);
        mock.fail();
        mock
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = delay;
        self
    }

    pub fn with_config(self, config: ExtenderConfig) -> Self {
        self.set_config(Ok(config));
        self
    }

    pub fn with_piggyback(self, config: ExtenderConfig) -> Self {
        {
            let mut result = self.extend_result.lock().unwrap();
            if let Ok(ack) = result.as_mut() {
                ack.config = Some(config);
            }
        }
        self
    }

    pub fn set_extend(&self, result: Result<ExtendAck>) {
        *self.extend_result.lock().unwrap() = result;
    }

    pub fn set_config(&self, result: Result<ExtenderConfig>) {
        *self.config_result.lock().unwrap() = result;
    }

    pub fn fail(&self) {
        self.set_extend(Err(refused()));
        self.set_config(Err(refused()));
    }
}

#[async_trait]
impl ExtenderClient for MockExtender {
    fn address(&self) -> &str {
        &self.address
    }

    async fn extend(
        &self,
        _aggregation_time: u64,
        _publication_time: Option<u64>,
    ) -> Result<ExtendAck> {
        self.extend_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        let result = self.extend_result.lock().unwrap().clone();
        tokio::time::sleep(delay).await;
        result
    }

    async fn extender_config(&self) -> Result<ExtenderConfig> {
        self.config_calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        let result = self.config_result.lock().unwrap().clone();
        tokio::time::sleep(delay).await;
        result
    }
}

pub struct MockPublications {
    address: String,
    delay: Mutex<Duration>,
    result: Mutex<Result<PublicationsFile>>,
    pub calls: AtomicUsize,
}

impl MockPublications {
    pub fn ok(address: &str) -> Self {
        Self {
            address: address.to_string(),
            delay: Mutex::new(Duration::ZERO),
            result: Mutex::new(Ok(PublicationsFile {
                bytes: Bytes::from_static(b"publications-file"),
            })),
            calls: AtomicUsize::new(0),
        }
    }

    pub fn failing(address: &str) -> Self {
        let mock = Self::ok(address);
        *mock.result.lock().unwrap() = Err(refused());
        mock
    }

    pub fn with_delay(self, delay: Duration) -> Self {
        *self.delay.lock().unwrap() = delay;
        self
    }
}

#[async_trait]
impl PublicationsClient for MockPublications {
    fn address(&self) -> &str {
        &self.address
    }

    async fn publications_file(&self) -> Result<PublicationsFile> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = *self.delay.lock().unwrap();
        let result = self.result.lock().unwrap().clone();
        tokio::time::sleep(delay).await;
        result
    }
}
