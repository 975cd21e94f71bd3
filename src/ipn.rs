//! Instant payment notification (IPN) authentication
//!
//! The gateway POSTs form-encoded notifications to the merchant's callback
//! URL and signs the body with the merchant's IPN secret. A notification is
//! accepted only if it names the expected merchant, uses the expected
//! `ipn_mode`, and carries an `HMAC` header matching the HMAC-SHA512 of all
//! received fields. Checks run in that order and the first failure is
//! reported.

use std::collections::HashMap;

use reqwest::header::HeaderMap;
use thiserror::Error;
use tracing::debug;

use crate::core::config::DEFAULT_IPN_MODE;
use crate::core::{IpnConfig, ParameterSet, Result};
use crate::signer;

/// Key under which the signature header appears in a CGI-style header map.
pub const HMAC_HEADER_KEY: &str = "HTTP_HMAC";

pub use crate::signer::HMAC_HEADER;

/// Why a notification was rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{}", self.reason())]
pub enum IpnRejection {
    NoMerchantId,
    InvalidMerchantId,
    NoIpnMode,
    InvalidIpnMode,
    NoHmac,
    InvalidHmac,
}

impl IpnRejection {
    pub fn reason(&self) -> &'static str {
        match self {
            IpnRejection::NoMerchantId => "No merchant ID",
            IpnRejection::InvalidMerchantId => "Invalid merchant ID",
            IpnRejection::NoIpnMode => "No ipn_mode",
            IpnRejection::InvalidIpnMode => "Invalid ipn_mode",
            IpnRejection::NoHmac => "No HTTP HMAC",
            IpnRejection::InvalidHmac => "Invalid HTTP HMAC",
        }
    }
}

/// Verifies notifications for one merchant account.
#[derive(Clone)]
pub struct IpnVerifier {
    secret: String,
    merchant_id: String,
    ipn_mode: String,
}

impl IpnVerifier {
    pub fn new(secret: impl Into<String>, merchant_id: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
            merchant_id: merchant_id.into(),
            ipn_mode: DEFAULT_IPN_MODE.to_string(),
        }
    }

    pub fn with_ipn_mode(mut self, ipn_mode: impl Into<String>) -> Self {
        self.ipn_mode = ipn_mode.into();
        self
    }

    pub fn from_config(config: &IpnConfig) -> Self {
        Self::new(&config.secret, &config.merchant_id).with_ipn_mode(&config.ipn_mode)
    }

    /// Check a notification given its header map and decoded body fields.
    pub fn verify(
        &self,
        headers: &HashMap<String, String>,
        fields: &ParameterSet,
    ) -> std::result::Result<(), IpnRejection> {
        let outcome = self.check(headers.get(HMAC_HEADER_KEY).map(String::as_str), fields);
        if let Err(rejection) = outcome {
            debug!(%rejection, "IPN rejected");
        }
        outcome
    }

    /// Check a notification straight from an HTTP request: the header map and
    /// the raw form-encoded body.
    ///
    /// The outer `Result` fails only if the body cannot be decoded.
    pub fn verify_raw(
        &self,
        headers: &HeaderMap,
        body: &str,
    ) -> Result<std::result::Result<(), IpnRejection>> {
        let fields = ParameterSet::from_form_body(body)?;
        // a present but undecodable header still counts as present
        let hmac = headers.get(HMAC_HEADER).map(|v| v.to_str().unwrap_or(""));

        let outcome = self.check(hmac, &fields);
        if let Err(rejection) = outcome {
            debug!(%rejection, "IPN rejected");
        }
        Ok(outcome)
    }

    fn check(&self, hmac: Option<&str>, fields: &ParameterSet) -> std::result::Result<(), IpnRejection> {
        let merchant = fields.get("merchant").ok_or(IpnRejection::NoMerchantId)?;
        if merchant.render() != self.merchant_id {
            return Err(IpnRejection::InvalidMerchantId);
        }

        let ipn_mode = fields.get("ipn_mode").ok_or(IpnRejection::NoIpnMode)?;
        if ipn_mode.render() != self.ipn_mode {
            return Err(IpnRejection::InvalidIpnMode);
        }

        let hmac = hmac.ok_or(IpnRejection::NoHmac)?;
        if !signer::verify(&self.secret, fields, hmac) {
            return Err(IpnRejection::InvalidHmac);
        }

        Ok(())
    }
}

impl std::fmt::Debug for IpnVerifier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IpnVerifier")
            .field("secret", &"<redacted>")
            .field("merchant_id", &self.merchant_id)
            .field("ipn_mode", &self.ipn_mode)
            .finish()
    }
}

/// Authenticate a notification, returning `(accepted, reason)`.
///
/// `reason` is `None` exactly when the notification is accepted.
pub fn authenticate_ipn_request(
    secret: &str,
    merchant_id: &str,
    headers: &HashMap<String, String>,
    fields: &ParameterSet,
    ipn_mode: &str,
) -> (bool, Option<&'static str>) {
    match IpnVerifier::new(secret, merchant_id)
        .with_ipn_mode(ipn_mode)
        .verify(headers, fields)
    {
        Ok(()) => (true, None),
        Err(rejection) => (false, Some(rejection.reason())),
    }
}
