pub mod client;

pub use client::{BillingAddress, ChargeOutcome, ChargeRequest, GatewayClient, GatewayError};
