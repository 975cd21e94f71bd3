use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::config::DEFAULT_API_URL;
use crate::core::{GatewayConfig, ParameterSet, Result};
use crate::gateway_api::command::Command;
use crate::signer;

/// API version sent with every request.
pub const API_VERSION: i64 = 1;

/// Response format requested from the gateway.
pub const RESPONSE_FORMAT: &str = "json";

pub use crate::signer::HMAC_HEADER;

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// API credentials, fixed for the lifetime of a client.
#[derive(Clone)]
pub struct Credentials {
    public_key: String,
    private_key: String,
    ipn_url: Option<String>,
}

impl Credentials {
    pub fn new(public_key: impl Into<String>, private_key: impl Into<String>) -> Self {
        Self {
            public_key: public_key.into(),
            private_key: private_key.into(),
            ipn_url: None,
        }
    }

    /// Callback URL for create_transaction / get_callback_address. Empty means unset.
    pub fn with_ipn_url(mut self, ipn_url: impl Into<String>) -> Self {
        let url = ipn_url.into();
        self.ipn_url = (!url.is_empty()).then_some(url);
        self
    }

    pub fn public_key(&self) -> &str {
        &self.public_key
    }

    pub fn ipn_url(&self) -> Option<&str> {
        self.ipn_url.as_deref()
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("public_key", &self.public_key)
            .field("private_key", &"<redacted>")
            .field("ipn_url", &self.ipn_url)
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestMethod {
    Get,
    Post,
}

/// Exact outbound body and its signature.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    /// Canonical form encoding; the POST body
    pub body: String,
    /// Lowercase hex HMAC-SHA512 of `body`, sent in the `Hmac` header
    pub signature: String,
}

/// CoinPayments API client.
///
/// Immutable after construction, so one instance can be shared across tasks.
#[derive(Debug, Clone)]
pub struct GatewayClient {
    client: Client,
    credentials: Credentials,
    api_url: String,
}

impl GatewayClient {
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_options(credentials, DEFAULT_API_URL, None)
    }

    pub fn from_config(config: &GatewayConfig) -> Result<Self> {
        let mut credentials = Credentials::new(&config.public_key, &config.private_key);
        if let Some(url) = config.ipn_url() {
            credentials = credentials.with_ipn_url(url);
        }
        Self::with_options(
            credentials,
            &config.api_url,
            config.timeout_secs.map(Duration::from_secs),
        )
    }

    fn with_options(credentials: Credentials, api_url: &str, timeout: Option<Duration>) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self {
            client: builder.build()?,
            credentials,
            api_url: api_url.to_string(),
        })
    }

    pub fn credentials(&self) -> &Credentials {
        &self.credentials
    }

    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Add `key`, `version` and `format` on top of the caller's parameters.
    ///
    /// Injected values win over caller-supplied ones of the same name; a
    /// key the caller already set keeps its position.
    pub fn package_params(&self, params: impl Into<ParameterSet>) -> ParameterSet {
        let mut params = params.into();
        params.insert("key", self.credentials.public_key.as_str());
        params.insert("version", API_VERSION);
        params.insert("format", RESPONSE_FORMAT);
        params
    }

    /// Encode and sign `params` without sending anything.
    pub fn prepare(&self, params: &ParameterSet) -> SignedRequest {
        let body = signer::encode(params);
        let signature = signer::sign_bytes(&self.credentials.private_key, body.as_bytes());
        SignedRequest { body, signature }
    }

    /// Send a signed request and parse the JSON body.
    ///
    /// The gateway reports failures inside the JSON envelope, so the body is
    /// parsed and returned whatever the HTTP status. Only transport failures
    /// and non-JSON bodies are errors.
    pub async fn dispatch(&self, method: RequestMethod, params: &ParameterSet) -> Result<Value> {
        let signed = self.prepare(params);
        debug!(?method, payload = %signed.body, "Dispatching gateway request");

        let mut headers = HeaderMap::new();
        headers.insert(HMAC_HEADER, HeaderValue::from_str(&signed.signature)?);

        let request = match method {
            RequestMethod::Get => self.client.get(&self.api_url).headers(headers),
            RequestMethod::Post => {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(FORM_CONTENT_TYPE));
                self.client.post(&self.api_url).headers(headers).body(signed.body)
            }
        };

        let resp = request.send().await?;
        let status = resp.status();
        let bytes = resp.bytes().await?;

        if !status.is_success() {
            warn!(%status, "Gateway returned non-success status, passing body through");
        }

        Ok(serde_json::from_slice(&bytes)?)
    }

    /// Run a gateway command with the standard parameter packaging.
    pub async fn invoke(&self, command: Command, params: impl Into<ParameterSet>) -> Result<Value> {
        let mut params = self.package_params(params);
        if command.injects_ipn_url() {
            if let Some(url) = self.credentials.ipn_url() {
                params.insert("ipn_url", url);
            }
        }
        params.insert("cmd", command.as_str());

        debug!(cmd = %command, "Invoking gateway command");
        self.dispatch(RequestMethod::Post, &params).await
    }

    /// Create a payment for a buyer.
    pub async fn create_transaction(&self, params: impl Into<ParameterSet>) -> Result<Value> {
        self.invoke(Command::CreateTransaction, params).await
    }

    /// Merchant info for the API key.
    pub async fn get_basic_info(&self, params: impl Into<ParameterSet>) -> Result<Value> {
        self.invoke(Command::GetBasicInfo, params).await
    }

    /// Current exchange rates.
    pub async fn rates(&self, params: impl Into<ParameterSet>) -> Result<Value> {
        self.invoke(Command::Rates, params).await
    }

    /// Wallet balances.
    pub async fn balances(&self, params: impl Into<ParameterSet>) -> Result<Value> {
        self.invoke(Command::Balances, params).await
    }

    /// Address for personal deposits.
    pub async fn get_deposit_address(&self, params: impl Into<ParameterSet>) -> Result<Value> {
        self.invoke(Command::GetDepositAddress, params).await
    }

    /// Address whose deposits are reported through IPN.
    pub async fn get_callback_address(&self, params: impl Into<ParameterSet>) -> Result<Value> {
        self.invoke(Command::GetCallbackAddress, params).await
    }

    /// Move coins to another gateway account.
    pub async fn create_transfer(&self, params: impl Into<ParameterSet>) -> Result<Value> {
        self.invoke(Command::CreateTransfer, params).await
    }

    pub async fn create_withdrawal(&self, params: impl Into<ParameterSet>) -> Result<Value> {
        self.invoke(Command::CreateWithdrawal, params).await
    }

    /// Convert a balance from one currency to another.
    pub async fn convert_coins(&self, params: impl Into<ParameterSet>) -> Result<Value> {
        self.invoke(Command::Convert, params).await
    }

    pub async fn get_conversion_limits(&self, params: impl Into<ParameterSet>) -> Result<Value> {
        self.invoke(Command::ConvertLimits, params).await
    }

    /// Recent withdrawals (up to 100).
    pub async fn get_withdrawal_history(&self, params: impl Into<ParameterSet>) -> Result<Value> {
        self.invoke(Command::GetWithdrawalHistory, params).await
    }

    pub async fn get_withdrawal_info(&self, params: impl Into<ParameterSet>) -> Result<Value> {
        self.invoke(Command::GetWithdrawalInfo, params).await
    }

    pub async fn get_conversion_info(&self, params: impl Into<ParameterSet>) -> Result<Value> {
        self.invoke(Command::GetConversionInfo, params).await
    }

    pub async fn get_tx_info(&self, params: impl Into<ParameterSet>) -> Result<Value> {
        self.invoke(Command::GetTxInfo, params).await
    }

    /// Up to 25 transactions; `txid` holds the ids separated by `|`.
    pub async fn get_tx_info_multi(&self, params: impl Into<ParameterSet>) -> Result<Value> {
        self.invoke(Command::GetTxInfoMulti, params).await
    }

    /// Transaction ids (`get_tx_ids`).
    pub async fn get_tx_list(&self, params: impl Into<ParameterSet>) -> Result<Value> {
        self.invoke(Command::GetTxIds, params).await
    }
}
