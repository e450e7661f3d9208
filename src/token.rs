//! Local inspection of access-token expiry.
//!
//! DESIGN
//! ======
//! Tokens are JWT-shaped: `header.payload.signature`, with a base64url JSON
//! payload (standard alphabet also accepted) carrying `exp` in epoch seconds. Nothing here verifies the
//! signature; the only question answered is whether a round-trip to the
//! renewal endpoint is worth making.
//!
//! A token whose expiry cannot be read (wrong shape, bad base64, bad JSON, or
//! no numeric `exp`) is reported as [`TokenExpiry::Unknown`] and resolved by
//! [`MissingExpiryPolicy`] instead of being silently treated either way.

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use serde_json::Value;

/// What to do with a token whose expiry claim cannot be decoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum MissingExpiryPolicy {
    /// Treat it as expired; `check()` answers `false` without a request.
    #[default]
    Expired,
    /// Treat it as live; `check()` lets the server decide.
    Valid,
}

/// Expiry claim extracted from a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenExpiry {
    /// `exp` claim, epoch seconds.
    At(i64),
    Unknown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ExpiryRules {
    /// Seconds before `exp` at which the token is already considered expired.
    pub leeway_secs: u64,
    pub missing: MissingExpiryPolicy,
}

impl ExpiryRules {
    /// Whether `token` should be treated as expired right now.
    #[must_use]
    pub fn is_expired(&self, token: &str) -> bool {
        self.is_expired_at(token, now_unix())
    }

    /// Whether `token` should be treated as expired at `now` (epoch seconds).
    #[must_use]
    pub fn is_expired_at(&self, token: &str, now: i64) -> bool {
        if token.is_empty() {
            return true;
        }
        match decode_expiry(token) {
            TokenExpiry::At(exp) => {
                let leeway = i64::try_from(self.leeway_secs).unwrap_or(i64::MAX);
                exp <= now.saturating_add(leeway)
            }
            TokenExpiry::Unknown => self.missing == MissingExpiryPolicy::Expired,
        }
    }
}

/// Current time as seconds since the Unix epoch.
#[must_use]
pub fn now_unix() -> i64 {
    time::OffsetDateTime::now_utc().unix_timestamp()
}

/// Read the `exp` claim from a JWT-shaped token without verifying it.
#[must_use]
pub fn decode_expiry(token: &str) -> TokenExpiry {
    let Some(claims) = decode_claims(token) else {
        return TokenExpiry::Unknown;
    };
    match claims.get("exp") {
        Some(exp) => exp
            .as_i64()
            .or_else(|| exp.as_f64().filter(|f| f.is_finite()).map(truncate_seconds))
            .map_or(TokenExpiry::Unknown, TokenExpiry::At),
        None => TokenExpiry::Unknown,
    }
}

/// Decode the payload segment of a JWT-shaped token into a JSON object.
#[must_use]
pub fn decode_claims(token: &str) -> Option<serde_json::Map<String, Value>> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (segments.next(), segments.next(), segments.next(), segments.next())
    else {
        return None;
    };
    let payload = payload.trim_end_matches('=');
    // Some issuers emit the standard alphabet (`+`, `/`) in the payload.
    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .or_else(|_| STANDARD_NO_PAD.decode(payload))
        .ok()?;
    match serde_json::from_slice::<Value>(&bytes).ok()? {
        Value::Object(map) => Some(map),
        _ => None,
    }
}

#[allow(clippy::cast_possible_truncation)]
fn truncate_seconds(secs: f64) -> i64 {
    secs.trunc() as i64
}

#[cfg(test)]
#[path = "token_test.rs"]
mod tests;
