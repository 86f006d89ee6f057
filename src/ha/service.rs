//! HA coordinator facade
//!
//! Owns the three replica lists, the shared per-operation deadline and the
//! two config caches. Every operation exists in two forms: a submit form
//! that returns a typed [`RequestHandle`] immediately, and an awaitable
//! form built on top of it. Submit forms spawn onto the ambient tokio
//! runtime, so they must be called from within one.

use crate::backend::{AggregatorClient, ExtenderClient, PublicationsClient, Role};
use crate::common::{
    AggregatorConfig, CalendarHashChain, DataHash, Error, ExtenderConfig, PublicationsFile, Result,
    Signature,
};
use crate::ha::cache::{ConfigCache, ConfigEvent};
use crate::ha::handle::{
    AggregatorConfigHandle, ExtendHandle, ExtenderConfigHandle, PublicationsHandle, RequestHandle,
    SignHandle,
};
use crate::ha::runner;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;

/// Hard cap on replicas per role.
pub const MAX_REPLICAS: usize = 3;

/// High-availability request coordinator over interchangeable backend
/// replicas.
pub struct HaService {
    signers: Vec<Arc<dyn AggregatorClient>>,
    extenders: Vec<Arc<dyn ExtenderClient>>,
    publications: Vec<Arc<dyn PublicationsClient>>,
    timeout: Duration,
    aggregator_cache: Arc<ConfigCache<AggregatorConfig>>,
    extender_cache: Arc<ConfigCache<ExtenderConfig>>,
}

impl std::fmt::Debug for HaService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HaService")
            .field("signers", &self.signers.len())
            .field("extenders", &self.extenders.len())
            .field("publications", &self.publications.len())
            .field("timeout", &self.timeout)
            .finish()
    }
}

impl HaService {
    /// Build a coordinator over up to [`MAX_REPLICAS`] replicas per role.
    ///
    /// An empty list is accepted here; operations of that role then fail
    /// with [`Error::NoServices`] without dispatching anything.
    pub fn new(
        signers: Vec<Arc<dyn AggregatorClient>>,
        extenders: Vec<Arc<dyn ExtenderClient>>,
        publications: Vec<Arc<dyn PublicationsClient>>,
        timeout: Duration,
    ) -> Result<Self> {
        if signers.len() > MAX_REPLICAS {
            return Err(Error::TooManyServices(Role::Signing));
        }
        if extenders.len() > MAX_REPLICAS {
            return Err(Error::TooManyServices(Role::Extending));
        }
        if publications.len() > MAX_REPLICAS {
            return Err(Error::TooManyServices(Role::Publications));
        }

        tracing::debug!(
            signers = signers.len(),
            extenders = extenders.len(),
            publications = publications.len(),
            timeout_ms = timeout.as_millis() as u64,
            "HA service configured"
        );

        Ok(Self {
            signers,
            extenders,
            publications,
            timeout,
            aggregator_cache: Arc::new(ConfigCache::new()),
            extender_cache: Arc::new(ConfigCache::new()),
        })
    }

    /// Shared deadline applied to every logical operation.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Semicolon-joined signing endpoints, trailing separator included.
    pub fn aggregator_address(&self) -> String {
        Self::joined(self.signers.iter().map(|c| c.address()))
    }

    /// Semicolon-joined extending endpoints.
    pub fn extender_address(&self) -> String {
        Self::joined(self.extenders.iter().map(|c| c.address()))
    }

    /// Semicolon-joined publications-file endpoints.
    pub fn publications_address(&self) -> String {
        Self::joined(self.publications.iter().map(|c| c.address()))
    }

    fn joined<'a>(addresses: impl Iterator<Item = &'a str>) -> String {
        addresses.map(|address| format!("{address}; ")).collect()
    }

    /// Register a callback for aggregator consensus changes. Delivery is
    /// serialized with cache mutation and may happen after the triggering
    /// request has already returned.
    pub fn on_aggregator_config_change(
        &self,
        listener: impl Fn(ConfigEvent<AggregatorConfig>) + Send + Sync + 'static,
    ) {
        self.aggregator_cache.subscribe(listener);
    }

    /// Register a callback for extender consensus changes.
    pub fn on_extender_config_change(
        &self,
        listener: impl Fn(ConfigEvent<ExtenderConfig>) + Send + Sync + 'static,
    ) {
        self.extender_cache.subscribe(listener);
    }

    // === Signing ===

    /// Race a signing request across every signing replica.
    pub fn submit_sign(&self, hash: DataHash, level: u32) -> SignHandle {
        if self.signers.is_empty() {
            return RequestHandle::immediate(Err(Error::NoServices));
        }
        let attempts: Vec<_> = self
            .signers
            .iter()
            .enumerate()
            .map(|(replica, client)| {
                let client = Arc::clone(client);
                let cache = Arc::clone(&self.aggregator_cache);
                let hash = hash.clone();
                async move {
                    let address = client.address().to_string();
                    match client.sign(&hash, level).await {
                        Ok(ack) => {
                            if let Some(config) = ack.config {
                                cache.update(replica, config);
                            }
                            Ok(ack.signature)
                        }
                        Err(error) => {
                            cache.evict(replica, &error);
                            Err(Error::sub_service(address, error))
                        }
                    }
                }
            })
            .collect();
        self.drive(runner::race(attempts, self.timeout))
    }

    /// Sign `hash` at aggregation tree `level`, blocking until resolution.
    pub async fn sign(&self, hash: DataHash, level: u32) -> Result<Signature> {
        self.submit_sign(hash, level).await
    }

    // === Extending ===

    /// Race an extension request across every extending replica.
    pub fn submit_extend(
        &self,
        aggregation_time: u64,
        publication_time: Option<u64>,
    ) -> ExtendHandle {
        if self.extenders.is_empty() {
            return RequestHandle::immediate(Err(Error::NoServices));
        }
        let attempts: Vec<_> = self
            .extenders
            .iter()
            .enumerate()
            .map(|(replica, client)| {
                let client = Arc::clone(client);
                let cache = Arc::clone(&self.extender_cache);
                async move {
                    let address = client.address().to_string();
                    match client.extend(aggregation_time, publication_time).await {
                        Ok(ack) => {
                            if let Some(config) = ack.config {
                                cache.update(replica, config);
                            }
                            Ok(ack.chain)
                        }
                        Err(error) => {
                            cache.evict(replica, &error);
                            Err(Error::sub_service(address, error))
                        }
                    }
                }
            })
            .collect();
        self.drive(runner::race(attempts, self.timeout))
    }

    /// Extend `aggregation_time`, optionally to a fixed publication time.
    pub async fn extend(
        &self,
        aggregation_time: u64,
        publication_time: Option<u64>,
    ) -> Result<CalendarHashChain> {
        self.submit_extend(aggregation_time, publication_time).await
    }

    // === Publications file ===

    /// Race a publications-file fetch across every configured source.
    pub fn submit_publications_file(&self) -> PublicationsHandle {
        if self.publications.is_empty() {
            return RequestHandle::immediate(Err(Error::NoServices));
        }
        let attempts: Vec<_> = self
            .publications
            .iter()
            .map(|client| {
                let client = Arc::clone(client);
                async move {
                    let address = client.address().to_string();
                    client
                        .publications_file()
                        .await
                        .map_err(|error| Error::sub_service(address, error))
                }
            })
            .collect();
        self.drive(runner::race(attempts, self.timeout))
    }

    /// Fetch the publications file, blocking until resolution.
    pub async fn publications_file(&self) -> Result<PublicationsFile> {
        self.submit_publications_file().await
    }

    // === Config consensus ===

    /// Poll every signing replica for its capability broadcast, then return
    /// the consensus over all currently cached snapshots (this call or
    /// earlier ones).
    pub fn submit_aggregator_config(&self) -> AggregatorConfigHandle {
        if self.signers.is_empty() {
            return RequestHandle::immediate(Err(Error::NoServices));
        }
        let attempts: Vec<_> = self
            .signers
            .iter()
            .enumerate()
            .map(|(replica, client)| {
                let client = Arc::clone(client);
                let cache = Arc::clone(&self.aggregator_cache);
                async move {
                    match client.aggregator_config().await {
                        Ok(config) => cache.update(replica, config),
                        Err(error) => {
                            tracing::debug!(
                                "aggregator config request to {} failed: {}",
                                client.address(),
                                error
                            );
                            cache.evict(replica, &error);
                        }
                    }
                }
            })
            .collect();

        let cache = Arc::clone(&self.aggregator_cache);
        let timeout = self.timeout;
        self.drive(async move {
            runner::settle_all(attempts, timeout).await?;
            cache.consensus().ok_or(Error::NoAggregatorConfig)
        })
    }

    /// Consensus aggregator configuration, blocking until resolution.
    pub async fn aggregator_config(&self) -> Result<AggregatorConfig> {
        self.submit_aggregator_config().await
    }

    /// Poll every extending replica for its capability broadcast, then
    /// return the consensus over all currently cached snapshots.
    pub fn submit_extender_config(&self) -> ExtenderConfigHandle {
        if self.extenders.is_empty() {
            return RequestHandle::immediate(Err(Error::NoServices));
        }
        let attempts: Vec<_> = self
            .extenders
            .iter()
            .enumerate()
            .map(|(replica, client)| {
                let client = Arc::clone(client);
                let cache = Arc::clone(&self.extender_cache);
                async move {
                    match client.extender_config().await {
                        Ok(config) => cache.update(replica, config),
                        Err(error) => {
                            tracing::debug!(
                                "extender config request to {} failed: {}",
                                client.address(),
                                error
                            );
                            cache.evict(replica, &error);
                        }
                    }
                }
            })
            .collect();

        let cache = Arc::clone(&self.extender_cache);
        let timeout = self.timeout;
        self.drive(async move {
            runner::settle_all(attempts, timeout).await?;
            cache.consensus().ok_or(Error::NoExtenderConfig)
        })
    }

    /// Consensus extender configuration, blocking until resolution.
    pub async fn extender_config(&self) -> Result<ExtenderConfig> {
        self.submit_extender_config().await
    }

    fn drive<T: Send + 'static>(
        &self,
        operation: impl Future<Output = Result<T>> + Send + 'static,
    ) -> RequestHandle<T> {
        let (tx, rx) = oneshot::channel();
        tokio::spawn(async move {
            let _ = tx.send(operation.await);
        });
        RequestHandle::new(rx)
    }
}
