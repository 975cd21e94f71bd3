//! CoinPayments - Gateway Client Library
//! HMAC-signed API requests and IPN (webhook) authentication

// Public modules
pub mod core;
pub mod gateway_api;
pub mod ipn;
pub mod signer;

// Re-exports
pub use crate::core::{Config, Error, ParamValue, ParameterSet, Result};
pub use gateway_api::{Command, Credentials, GatewayClient, RequestMethod, SignedRequest};
pub use ipn::{IpnRejection, IpnVerifier, authenticate_ipn_request};
pub use signer::sign as calculate_hmac;
