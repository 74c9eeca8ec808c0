//! Request signing.
//!
//! The server recomputes the HMAC over the exact path it receives, so the signed string must be
//! sent byte for byte.
use chrono::Utc;
use hmac::{Hmac, Mac};
use sha1::Sha1;

use crate::{Error, Result};

type HmacSha1 = Hmac<Sha1>;

/// Query parameter carrying the signing time.
pub const HMAC_TIMESTAMP_QUERY: &str = "hmac_timestamp";
/// Query parameter carrying the hex signature.
pub const HMAC_SIGN_QUERY: &str = "hmac_sign";

/// Append `hmac_timestamp` (current unix time) and `hmac_sign` to `path`.
pub fn sign(path: &str, secret_key: &str) -> Result<String> {
    sign_at(path, secret_key, Utc::now().timestamp())
}

/// Same as [`sign`] with an explicit unix timestamp.
pub fn sign_at(path: &str, secret_key: &str, timestamp: i64) -> Result<String> {
    let delimiter = if path.contains('?') { '&' } else { '?' };
    let mut signed = format!("{path}{delimiter}{HMAC_TIMESTAMP_QUERY}={timestamp}");

    let mut mac = HmacSha1::new_from_slice(secret_key.as_bytes())
        .map_err(|err| Error::invalid_argument(format!("unusable secret key: {err}")))?;
    mac.update(signed.as_bytes());
    let signature = hex::encode(mac.finalize().into_bytes());

    signed.push('&');
    signed.push_str(HMAC_SIGN_QUERY);
    signed.push('=');
    signed.push_str(&signature);
    Ok(signed)
}
