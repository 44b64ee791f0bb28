//! Gateways to external service APIs.

pub mod hubspot_oauth;
