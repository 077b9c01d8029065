//! Shipment tracking for online purchases.

mod client;
mod endpoint;

pub use client::{DEFAULT_TRACKING_API_URL, DEFAULT_TRACKING_TIMEOUT, TrackingClient};
pub use endpoint::tracking_endpoint;

#[cfg(test)]
pub(crate) use client::ShipmentLocation;
