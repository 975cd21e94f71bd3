//! Typed request builders for the commands that take real arguments.
//!
//! Each builder converts into a [`ParameterSet`] with its named fields first
//! (in declaration order, unset fields skipped) followed by any extra
//! parameters added with `param`. Anything else can still be sent as a raw
//! `ParameterSet`.

use rust_decimal::Decimal;
use serde_json::Value;

use crate::core::{ParamValue, ParameterSet};

/// Arguments for `create_transaction`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTransaction {
    pub amount: Decimal,
    /// Original currency of the price
    pub currency1: String,
    /// Currency the buyer pays in
    pub currency2: String,
    pub buyer_email: String,
    pub address: Option<String>,
    pub buyer_name: Option<String>,
    pub item_name: Option<String>,
    pub item_number: Option<String>,
    pub invoice: Option<String>,
    pub custom: Option<String>,
    /// Ignored by the client when a callback URL is configured
    pub ipn_url: Option<String>,
    pub success_url: Option<String>,
    pub cancel_url: Option<String>,
    pub extra: ParameterSet,
}

impl CreateTransaction {
    pub fn new(
        amount: Decimal,
        currency1: impl Into<String>,
        currency2: impl Into<String>,
        buyer_email: impl Into<String>,
    ) -> Self {
        Self {
            amount,
            currency1: currency1.into(),
            currency2: currency2.into(),
            buyer_email: buyer_email.into(),
            address: None,
            buyer_name: None,
            item_name: None,
            item_number: None,
            invoice: None,
            custom: None,
            ipn_url: None,
            success_url: None,
            cancel_url: None,
            extra: ParameterSet::new(),
        }
    }

    pub fn address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn buyer_name(mut self, name: impl Into<String>) -> Self {
        self.buyer_name = Some(name.into());
        self
    }

    pub fn item(mut self, name: impl Into<String>, number: impl Into<String>) -> Self {
        self.item_name = Some(name.into());
        self.item_number = Some(number.into());
        self
    }

    pub fn invoice(mut self, invoice: impl Into<String>) -> Self {
        self.invoice = Some(invoice.into());
        self
    }

    pub fn custom(mut self, custom: impl Into<String>) -> Self {
        self.custom = Some(custom.into());
        self
    }

    pub fn ipn_url(mut self, url: impl Into<String>) -> Self {
        self.ipn_url = Some(url.into());
        self
    }

    pub fn redirect_urls(mut self, success: impl Into<String>, cancel: impl Into<String>) -> Self {
        self.success_url = Some(success.into());
        self.cancel_url = Some(cancel.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.extra.insert(key, value);
        self
    }
}

impl From<CreateTransaction> for ParameterSet {
    fn from(req: CreateTransaction) -> Self {
        let mut params = ParameterSet::new()
            .with("amount", req.amount)
            .with("currency1", req.currency1)
            .with("currency2", req.currency2)
            .with("buyer_email", req.buyer_email);
        push_opt(&mut params, "address", req.address);
        push_opt(&mut params, "buyer_name", req.buyer_name);
        push_opt(&mut params, "item_name", req.item_name);
        push_opt(&mut params, "item_number", req.item_number);
        push_opt(&mut params, "invoice", req.invoice);
        push_opt(&mut params, "custom", req.custom);
        push_opt(&mut params, "ipn_url", req.ipn_url);
        push_opt(&mut params, "success_url", req.success_url);
        push_opt(&mut params, "cancel_url", req.cancel_url);
        params.extend(req.extra);
        params
    }
}

/// Arguments for `create_withdrawal`.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateWithdrawal {
    pub amount: Decimal,
    /// Deduct the network fee from `amount` instead of adding it on top
    pub add_tx_fee: Option<bool>,
    pub currency: String,
    /// Express `amount` in this currency instead
    pub currency2: Option<String>,
    pub address: Option<String>,
    pub pbntag: Option<String>,
    pub dest_tag: Option<String>,
    pub ipn_url: Option<String>,
    pub auto_confirm: Option<bool>,
    pub note: Option<String>,
    pub extra: ParameterSet,
}

impl CreateWithdrawal {
    pub fn new(amount: Decimal, currency: impl Into<String>) -> Self {
        Self {
            amount,
            add_tx_fee: None,
            currency: currency.into(),
            currency2: None,
            address: None,
            pbntag: None,
            dest_tag: None,
            ipn_url: None,
            auto_confirm: None,
            note: None,
            extra: ParameterSet::new(),
        }
    }

    pub fn to_address(mut self, address: impl Into<String>) -> Self {
        self.address = Some(address.into());
        self
    }

    pub fn to_pbntag(mut self, tag: impl Into<String>) -> Self {
        self.pbntag = Some(tag.into());
        self
    }

    pub fn currency2(mut self, currency: impl Into<String>) -> Self {
        self.currency2 = Some(currency.into());
        self
    }

    pub fn dest_tag(mut self, tag: impl Into<String>) -> Self {
        self.dest_tag = Some(tag.into());
        self
    }

    pub fn add_tx_fee(mut self, add: bool) -> Self {
        self.add_tx_fee = Some(add);
        self
    }

    pub fn ipn_url(mut self, url: impl Into<String>) -> Self {
        self.ipn_url = Some(url.into());
        self
    }

    pub fn auto_confirm(mut self, confirm: bool) -> Self {
        self.auto_confirm = Some(confirm);
        self
    }

    pub fn note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.extra.insert(key, value);
        self
    }
}

impl From<CreateWithdrawal> for ParameterSet {
    fn from(req: CreateWithdrawal) -> Self {
        let mut params = ParameterSet::new().with("amount", req.amount);
        push_opt(&mut params, "add_tx_fee", req.add_tx_fee.map(flag));
        params.insert("currency", req.currency);
        push_opt(&mut params, "currency2", req.currency2);
        push_opt(&mut params, "address", req.address);
        push_opt(&mut params, "pbntag", req.pbntag);
        push_opt(&mut params, "dest_tag", req.dest_tag);
        push_opt(&mut params, "ipn_url", req.ipn_url);
        push_opt(&mut params, "auto_confirm", req.auto_confirm.map(flag));
        push_opt(&mut params, "note", req.note);
        params.extend(req.extra);
        params
    }
}

/// Arguments for `create_transfer` (to another gateway account).
#[derive(Debug, Clone, PartialEq)]
pub struct CreateTransfer {
    pub amount: Decimal,
    pub currency: String,
    pub merchant: Option<String>,
    pub pbntag: Option<String>,
    pub auto_confirm: Option<bool>,
    pub extra: ParameterSet,
}

impl CreateTransfer {
    pub fn to_merchant(amount: Decimal, currency: impl Into<String>, merchant: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            merchant: Some(merchant.into()),
            pbntag: None,
            auto_confirm: None,
            extra: ParameterSet::new(),
        }
    }

    pub fn to_pbntag(amount: Decimal, currency: impl Into<String>, pbntag: impl Into<String>) -> Self {
        Self {
            amount,
            currency: currency.into(),
            merchant: None,
            pbntag: Some(pbntag.into()),
            auto_confirm: None,
            extra: ParameterSet::new(),
        }
    }

    pub fn auto_confirm(mut self, confirm: bool) -> Self {
        self.auto_confirm = Some(confirm);
        self
    }

    pub fn param(mut self, key: impl Into<String>, value: impl Into<ParamValue>) -> Self {
        self.extra.insert(key, value);
        self
    }
}

impl From<CreateTransfer> for ParameterSet {
    fn from(req: CreateTransfer) -> Self {
        let mut params = ParameterSet::new()
            .with("amount", req.amount)
            .with("currency", req.currency);
        push_opt(&mut params, "merchant", req.merchant);
        push_opt(&mut params, "pbntag", req.pbntag);
        push_opt(&mut params, "auto_confirm", req.auto_confirm.map(flag));
        params.extend(req.extra);
        params
    }
}

/// Arguments for `get_callback_address`.
#[derive(Debug, Clone, PartialEq)]
pub struct GetCallbackAddress {
    pub currency: String,
    pub ipn_url: Option<String>,
    pub label: Option<String>,
}

impl GetCallbackAddress {
    pub fn new(currency: impl Into<String>) -> Self {
        Self { currency: currency.into(), ipn_url: None, label: None }
    }

    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn ipn_url(mut self, url: impl Into<String>) -> Self {
        self.ipn_url = Some(url.into());
        self
    }
}

impl From<GetCallbackAddress> for ParameterSet {
    fn from(req: GetCallbackAddress) -> Self {
        let mut params = ParameterSet::new().with("currency", req.currency);
        push_opt(&mut params, "ipn_url", req.ipn_url);
        push_opt(&mut params, "label", req.label);
        params
    }
}

fn push_opt<V: Into<ParamValue>>(params: &mut ParameterSet, key: &str, value: Option<V>) {
    if let Some(v) = value {
        params.insert(key, v);
    }
}

fn flag(on: bool) -> i64 {
    if on { 1 } else { 0 }
}

/// The gateway's error message, if the response envelope reports one.
///
/// Responses look like `{"error": "ok", "result": {...}}`; anything other
/// than `"ok"` is an application-level failure. The client never checks
/// this itself.
pub fn remote_error(response: &Value) -> Option<&str> {
    match response.get("error") {
        Some(Value::String(msg)) if msg == "ok" => None,
        Some(Value::String(msg)) => Some(msg),
        _ => None,
    }
}
