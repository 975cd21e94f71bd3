//! Core module - Parameter types, configuration, and error handling

pub mod config;
pub mod error;
pub mod types;

pub use config::{Config, GatewayConfig, IpnConfig};
pub use error::{Error, Result};
pub use types::{ParamValue, ParameterSet};
