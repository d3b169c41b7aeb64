//! Per-domain realtime sync wiring.
//!
//! Each `*_sync` function registers one invalidation bridge for a business
//! domain and returns the guards keeping it alive. Every domain also listens
//! for the synthetic reconnect event and responds by invalidating its whole
//! root, since events emitted while the channel was down are never replayed.
//!
//! Key layout convention: lists live under `<root>:list`, single records
//! under `<root>:detail:<id>`. Invalidation is prefix-based, so tainting a
//! root reaches every derived key.

use std::sync::Arc;

use crate::adapters::cache::{QueryCache, QueryKey};
use crate::domain::foundation::{RealtimeEvent, CHANNEL_RECONNECTED};
use crate::ports::{EventSubscriber, SubscriptionSet};

use super::bridge::InvalidationBridge;

/// Events that affect the product catalog.
pub const PRODUCT_EVENTS: &[&str] = &[
    "product.created",
    "product.updated",
    "product.deleted",
    "product.stock_changed",
    CHANNEL_RECONNECTED,
];

/// Events that affect marketplace orders.
pub const ORDER_EVENTS: &[&str] = &[
    "order.created",
    "order.status_changed",
    "order.cancelled",
    CHANNEL_RECONNECTED,
];

/// Events that affect the shop profile.
pub const SHOP_EVENTS: &[&str] = &[
    "shop.updated",
    "shop.approved",
    "shop.deactivated",
    CHANNEL_RECONNECTED,
];

/// Events that affect the notification feed.
pub const NOTIFICATION_EVENTS: &[&str] = &["notification.created", CHANNEL_RECONNECTED];

/// Events that affect account settings.
pub const SETTINGS_EVENTS: &[&str] = &["settings.updated", CHANNEL_RECONNECTED];

/// Events that affect the WhatsApp integration status.
pub const WHATSAPP_EVENTS: &[&str] = &[
    "whatsapp.status_changed",
    "whatsapp.qr_updated",
    CHANNEL_RECONNECTED,
];

/// Events that affect Kaspi marketplace orders.
pub const KASPI_EVENTS: &[&str] = &[
    "kaspi.order.created",
    "kaspi.order.status_changed",
    "kaspi.order.completed",
    CHANNEL_RECONNECTED,
];

fn detail_key(root: &str, id: Option<i64>) -> Option<QueryKey> {
    id.map(|id| QueryKey::root(root).child("detail").child(id))
}

fn route_products(event: &RealtimeEvent) -> Vec<QueryKey> {
    match event.name.as_str() {
        "product.created" | "product.deleted" => vec![QueryKey::root("products").child("list")],
        "product.updated" | "product.stock_changed" => {
            let mut keys = vec![QueryKey::root("products").child("list")];
            keys.extend(detail_key("products", event.payload_i64("product_id")));
            keys
        }
        _ => vec![QueryKey::root("products")],
    }
}

fn route_orders(event: &RealtimeEvent) -> Vec<QueryKey> {
    match event.name.as_str() {
        "order.created" => vec![QueryKey::root("orders").child("list")],
        "order.status_changed" | "order.cancelled" => {
            let mut keys = vec![QueryKey::root("orders").child("list")];
            keys.extend(detail_key("orders", event.payload_i64("order_id")));
            keys
        }
        _ => vec![QueryKey::root("orders")],
    }
}

fn route_shop(_event: &RealtimeEvent) -> Vec<QueryKey> {
    // The profile is a singleton; every shop event refreshes it whole.
    vec![QueryKey::root("shop")]
}

fn route_notifications(_event: &RealtimeEvent) -> Vec<QueryKey> {
    // Feed and unread counter both live under the root.
    vec![QueryKey::root("notifications")]
}

fn route_settings(_event: &RealtimeEvent) -> Vec<QueryKey> {
    vec![QueryKey::root("settings")]
}

fn route_whatsapp(event: &RealtimeEvent) -> Vec<QueryKey> {
    match event.name.as_str() {
        "whatsapp.status_changed" => vec![QueryKey::root("whatsapp").child("status")],
        "whatsapp.qr_updated" => vec![QueryKey::root("whatsapp").child("qr")],
        _ => vec![QueryKey::root("whatsapp")],
    }
}

fn route_kaspi(event: &RealtimeEvent) -> Vec<QueryKey> {
    let orders = QueryKey::root("kaspi").child("orders");
    match event.name.as_str() {
        "kaspi.order.created" => vec![orders.child("list")],
        "kaspi.order.status_changed" | "kaspi.order.completed" => {
            let mut keys = vec![orders.clone().child("list")];
            if let Some(id) = event.payload_i64("order_id") {
                keys.push(orders.child("detail").child(id));
            }
            keys
        }
        _ => vec![QueryKey::root("kaspi")],
    }
}

fn register(
    name: &'static str,
    events: &[&str],
    routes: super::bridge::RouteFn,
    cache: Arc<QueryCache>,
    subscriber: &dyn EventSubscriber,
) -> SubscriptionSet {
    let bridge = Arc::new(InvalidationBridge::new(name, cache, routes));
    subscriber.subscribe_all(events, bridge)
}

/// Keeps product catalog queries in step with the channel.
pub fn product_sync(cache: Arc<QueryCache>, subscriber: &dyn EventSubscriber) -> SubscriptionSet {
    register("products", PRODUCT_EVENTS, route_products, cache, subscriber)
}

/// Keeps order queries in step with the channel.
pub fn order_sync(cache: Arc<QueryCache>, subscriber: &dyn EventSubscriber) -> SubscriptionSet {
    register("orders", ORDER_EVENTS, route_orders, cache, subscriber)
}

/// Keeps the shop profile in step with the channel.
pub fn shop_sync(cache: Arc<QueryCache>, subscriber: &dyn EventSubscriber) -> SubscriptionSet {
    register("shop", SHOP_EVENTS, route_shop, cache, subscriber)
}

/// Keeps the notification feed in step with the channel.
pub fn notification_sync(
    cache: Arc<QueryCache>,
    subscriber: &dyn EventSubscriber,
) -> SubscriptionSet {
    register(
        "notifications",
        NOTIFICATION_EVENTS,
        route_notifications,
        cache,
        subscriber,
    )
}

/// Keeps account settings in step with the channel.
pub fn settings_sync(cache: Arc<QueryCache>, subscriber: &dyn EventSubscriber) -> SubscriptionSet {
    register("settings", SETTINGS_EVENTS, route_settings, cache, subscriber)
}

/// Keeps WhatsApp integration state in step with the channel.
pub fn whatsapp_sync(cache: Arc<QueryCache>, subscriber: &dyn EventSubscriber) -> SubscriptionSet {
    register("whatsapp", WHATSAPP_EVENTS, route_whatsapp, cache, subscriber)
}

/// Keeps Kaspi order queries in step with the channel.
pub fn kaspi_sync(cache: Arc<QueryCache>, subscriber: &dyn EventSubscriber) -> SubscriptionSet {
    register("kaspi", KASPI_EVENTS, route_kaspi, cache, subscriber)
}
