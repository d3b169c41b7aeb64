//! Event-to-cache synchronization layer.

pub mod bridge;
pub mod domains;

pub use bridge::InvalidationBridge;
pub use domains::{
    kaspi_sync, notification_sync, order_sync, product_sync, settings_sync, shop_sync,
    whatsapp_sync,
};
