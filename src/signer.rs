//! HMAC-SHA512 request signing
//!
//! The gateway authenticates a request by recomputing HMAC-SHA512 over the
//! exact form-encoded body it received. Both sides must therefore agree on
//! the bytes, parameter order included.

use hmac::{Hmac, Mac};
use sha2::Sha512;
use subtle::ConstantTimeEq;

use crate::core::ParameterSet;

type HmacSha512 = Hmac<Sha512>;

/// Header carrying the signature, on requests and on IPN callbacks
/// (`Hmac`/`HMAC` on the wire; header names are case-insensitive).
pub const HMAC_HEADER: &str = "hmac";

/// Form-encode `params` in insertion order.
///
/// Unreserved characters (`A-Z a-z 0-9 - . _ ~`) pass through, space becomes
/// `+`, everything else is percent-escaped byte by byte.
pub fn encode(params: &ParameterSet) -> String {
    params
        .iter()
        .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(&v.render())))
        .collect::<Vec<_>>()
        .join("&")
}

fn encode_component(raw: &str) -> String {
    // a literal '%' is escaped to %25, so %20 can only come from a space
    urlencoding::encode(raw).replace("%20", "+")
}

/// HMAC-SHA512 of an already-encoded message, as lowercase hex.
pub fn sign_bytes(secret: &str, message: &[u8]) -> String {
    let mut mac =
        HmacSha512::new_from_slice(secret.as_bytes()).expect("HMAC can take key of any size");
    mac.update(message);
    hex::encode(mac.finalize().into_bytes())
}

/// Sign the canonical encoding of `params`.
pub fn sign(secret: &str, params: &ParameterSet) -> String {
    sign_bytes(secret, encode(params).as_bytes())
}

/// Exact comparison of `signature` against the signature of `params`.
pub fn verify(secret: &str, params: &ParameterSet, signature: &str) -> bool {
    signatures_match(&sign(secret, params), signature)
}

pub(crate) fn signatures_match(expected: &str, received: &str) -> bool {
    expected.as_bytes().ct_eq(received.as_bytes()).into()
}
