//! CoinPayments HTTP API: signed requests and the command catalog

pub mod client;
pub mod command;
pub mod model;

pub use client::{Credentials, GatewayClient, RequestMethod, SignedRequest};
pub use command::Command;
pub use model::{CreateTransaction, CreateTransfer, CreateWithdrawal, GetCallbackAddress, remote_error};
