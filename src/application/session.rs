//! Session facade tying the layers together.
//!
//! A [`SyncSession`] owns the API client, the query cache, the subscription
//! registry and the realtime connection for one authenticated principal.
//! Embedders build exactly one per login and replace it wholesale on auth
//! changes; `connect` with the same credentials is a no-op, so calling it
//! again after a token refresh is safe.

use std::sync::Arc;

use crate::adapters::cache::QueryCache;
use crate::adapters::realtime::{
    BackoffPolicy, ConnectOutcome, ConnectionManager, SubscriptionRegistry,
};
use crate::adapters::sync;
use crate::adapters::ApiClient;
use crate::config::AppConfig;
use crate::domain::foundation::SyncError;
use crate::domain::session::Credentials;
use crate::ports::{Notifier, RealtimeTransport, SubscriptionSet};

/// One principal's sync state: API client, cache, registry, connection.
pub struct SyncSession {
    api: Arc<ApiClient>,
    cache: Arc<QueryCache>,
    registry: SubscriptionRegistry,
    connection: ConnectionManager,
    notifier: Arc<dyn Notifier>,
}

impl SyncSession {
    /// Builds a session from validated configuration.
    ///
    /// Configuration is validated eagerly here; a malformed base URL or
    /// realtime endpoint fails construction instead of surfacing later.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::Init` on invalid configuration.
    pub fn new(
        config: &AppConfig,
        transport: Arc<dyn RealtimeTransport>,
        notifier: Arc<dyn Notifier>,
    ) -> Result<Self, SyncError> {
        config.validate().map_err(SyncError::init)?;
        let endpoint = config.realtime.parsed_url().map_err(SyncError::init)?;

        let api = Arc::new(ApiClient::new(&config.api)?);
        let cache = Arc::new(QueryCache::new());
        let registry = SubscriptionRegistry::new();
        let connection = ConnectionManager::new(
            transport,
            registry.clone(),
            endpoint,
            BackoffPolicy::from_config(&config.realtime),
        );

        Ok(Self {
            api,
            cache,
            registry,
            connection,
            notifier,
        })
    }

    /// Authenticates the API client and opens the realtime channel.
    ///
    /// # Errors
    ///
    /// Returns `SyncError::ConnectExhausted` when the channel cannot be
    /// opened within the reconnect budget. The bearer token stays installed
    /// in that case; plain request/response keeps working.
    pub async fn connect(&self, credentials: Credentials) -> Result<ConnectOutcome, SyncError> {
        self.api.set_token(credentials.token.clone());
        self.connection.connect(credentials).await
    }

    /// Tears down the channel and forgets all per-principal state.
    ///
    /// Drops the bearer token and empties the cache so nothing leaks into
    /// the next login.
    pub async fn disconnect(&self) {
        self.connection.disconnect().await;
        self.api.clear_token();
        self.cache.clear();
    }

    /// Whether the realtime channel is currently live.
    pub async fn is_connected(&self) -> bool {
        self.connection.is_connected().await
    }

    /// The shared REST client.
    pub fn api(&self) -> &Arc<ApiClient> {
        &self.api
    }

    /// The shared query cache.
    pub fn cache(&self) -> &Arc<QueryCache> {
        &self.cache
    }

    /// The subscription registry, for custom event handlers.
    pub fn registry(&self) -> &SubscriptionRegistry {
        &self.registry
    }

    /// The notice sink for user-facing feedback.
    pub fn notifier(&self) -> &Arc<dyn Notifier> {
        &self.notifier
    }

    /// Registers the invalidation bridges for every business domain.
    ///
    /// The returned set keeps the bridges alive; drop it to detach them all.
    #[must_use]
    pub fn sync_all_domains(&self) -> SubscriptionSet {
        let mut set = sync::product_sync(Arc::clone(&self.cache), &self.registry);
        set.extend(sync::order_sync(Arc::clone(&self.cache), &self.registry));
        set.extend(sync::shop_sync(Arc::clone(&self.cache), &self.registry));
        set.extend(sync::notification_sync(
            Arc::clone(&self.cache),
            &self.registry,
        ));
        set.extend(sync::settings_sync(Arc::clone(&self.cache), &self.registry));
        set.extend(sync::whatsapp_sync(Arc::clone(&self.cache), &self.registry));
        set.extend(sync::kaspi_sync(Arc::clone(&self.cache), &self.registry));
        set
    }
}
