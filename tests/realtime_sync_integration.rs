//! End-to-end tests for the realtime sync pipeline: mock transport in,
//! invalidated cache keys out.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;

use bazar_sync::adapters::cache::QueryKey;
use bazar_sync::adapters::realtime::{ConnectOutcome, MockTransport};
use bazar_sync::adapters::RecordingNotifier;
use bazar_sync::application::SyncSession;
use bazar_sync::config::{ApiConfig, AppConfig, AuthConfig, RealtimeConfig};
use bazar_sync::domain::session::{Credentials, ShopAccess};

fn test_config() -> AppConfig {
    AppConfig {
        api: ApiConfig {
            base_url: "https://api.bazar.test/api/v1".to_string(),
            request_timeout_secs: 30,
        },
        realtime: RealtimeConfig {
            url: "wss://api.bazar.test/ws".to_string(),
            reconnect_base_ms: 1,
            reconnect_cap_ms: 2,
            reconnect_max_attempts: 3,
        },
        auth: AuthConfig {
            oauth_client_id: "bazar-web".to_string(),
        },
    }
}

fn session_with(transport: Arc<MockTransport>) -> (SyncSession, Arc<RecordingNotifier>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
    let notifier = Arc::new(RecordingNotifier::new());
    let session = SyncSession::new(&test_config(), transport, notifier.clone())
        .expect("valid test config");
    (session, notifier)
}

async fn wait_until(mut condition: impl FnMut() -> bool) {
    for _ in 0..200 {
        if condition() {
            return;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    panic!("condition not met within timeout");
}

#[tokio::test]
async fn inbound_event_invalidates_the_matching_cache_keys() {
    let transport = MockTransport::new();
    let (session, _notifier) = session_with(transport.clone());
    let _domains = session.sync_all_domains();

    let list_key = QueryKey::root("products").child("list");
    let shop_key = QueryKey::root("shop");
    session.cache().set(list_key.clone(), json!([{"id": 1}]));
    session.cache().set(shop_key.clone(), json!({"name": "Dastarkhan"}));

    session.connect(Credentials::user("tok")).await.unwrap();
    transport.push_frame(r#"{"type": "product.created", "payload": {"product_id": 2}}"#);

    let cache = session.cache().clone();
    wait_until(move || cache.is_stale(&list_key)).await;
    assert!(!session.cache().is_stale(&shop_key));
}

#[tokio::test]
async fn double_connect_opens_one_stream() {
    let transport = MockTransport::new();
    let (session, _notifier) = session_with(transport.clone());

    let creds = Credentials::user("tok");
    assert_eq!(
        session.connect(creds.clone()).await.unwrap(),
        ConnectOutcome::Established
    );
    assert_eq!(
        session.connect(creds).await.unwrap(),
        ConnectOutcome::AlreadyConnected
    );
    assert_eq!(transport.open_count(), 1);
}

#[tokio::test]
async fn gated_shop_never_touches_the_transport() {
    let transport = MockTransport::new();
    let (session, _notifier) = session_with(transport.clone());

    let creds = Credentials::shop(
        "tok",
        ShopAccess {
            is_approved: false,
            is_active: true,
        },
    );
    assert_eq!(
        session.connect(creds).await.unwrap(),
        ConnectOutcome::Skipped
    );
    assert_eq!(transport.open_count(), 0);
    assert!(!session.is_connected().await);
}

#[tokio::test]
async fn reconnect_refreshes_every_synced_domain() {
    let transport = MockTransport::new();
    let (session, _notifier) = session_with(transport.clone());
    let _domains = session.sync_all_domains();

    let orders_key = QueryKey::root("orders").child("list");
    let products_key = QueryKey::root("products").child("detail").child(9);
    session.cache().set(orders_key.clone(), json!([]));
    session.cache().set(products_key.clone(), json!({"id": 9}));

    session.connect(Credentials::user("tok")).await.unwrap();
    transport.drop_connection();

    let cache = session.cache().clone();
    let orders = orders_key.clone();
    wait_until(move || cache.is_stale(&orders)).await;
    assert!(session.cache().is_stale(&products_key));
    assert_eq!(transport.open_count(), 2);
}

#[tokio::test]
async fn failed_optimistic_mutation_rolls_back_and_notifies() {
    let transport = MockTransport::new();
    let (session, notifier) = session_with(transport);

    let key = QueryKey::root("settings");
    let saved = json!({"category": "Dresses"});
    session.cache().set(key.clone(), saved.clone());

    let result: Result<(), String> = session
        .cache()
        .run_optimistic(
            &key,
            notifier.as_ref(),
            |_| json!({"category": "Shoes"}),
            async { Err("category update rejected".to_string()) },
        )
        .await;

    assert!(result.is_err());
    assert_eq!(session.cache().peek(&key), Some(saved));
    assert!(notifier.has_error());
}

#[tokio::test]
async fn successful_optimistic_mutation_leaves_the_key_stale() {
    let transport = MockTransport::new();
    let (session, notifier) = session_with(transport);

    let key = QueryKey::root("settings");
    session.cache().set(key.clone(), json!({"category": "Dresses"}));

    let result: Result<(), String> = session
        .cache()
        .run_optimistic(
            &key,
            notifier.as_ref(),
            |_| json!({"category": "Shoes"}),
            async { Ok(()) },
        )
        .await;

    assert!(result.is_ok());
    assert_eq!(
        session.cache().peek(&key),
        Some(json!({"category": "Shoes"}))
    );
    assert!(session.cache().is_stale(&key));
    assert!(!notifier.has_error());
}

#[tokio::test]
async fn disconnect_then_reconnect_starts_clean() {
    let transport = MockTransport::new();
    let (session, _notifier) = session_with(transport.clone());

    {
        let _domains = session.sync_all_domains();
        session.connect(Credentials::user("tok-a")).await.unwrap();
        session
            .cache()
            .set(QueryKey::root("orders").child("list"), json!([1]));
        session.disconnect().await;
    }

    assert!(session.cache().is_empty());
    assert!(session.registry().is_empty());

    assert_eq!(
        session.connect(Credentials::user("tok-b")).await.unwrap(),
        ConnectOutcome::Established
    );
    assert_eq!(transport.open_count(), 2);
}
