use super::*;
use crate::test_helpers::jwt_with_claims;

const NOW: i64 = 1_700_000_000;

// =============================================================================
// decode_expiry
// =============================================================================

#[test]
fn decode_expiry_reads_exp_claim() {
    let token = jwt_with_claims(&serde_json::json!({ "UID": 42, "exp": NOW }));
    assert_eq!(decode_expiry(&token), TokenExpiry::At(NOW));
}

#[test]
fn decode_expiry_accepts_fractional_exp() {
    let token = jwt_with_claims(&serde_json::json!({ "exp": 1_700_000_000.75 }));
    assert_eq!(decode_expiry(&token), TokenExpiry::At(NOW));
}

#[test]
fn decode_expiry_tolerates_padding() {
    let token = jwt_with_claims(&serde_json::json!({ "exp": NOW, "iss": "x" }));
    let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
    parts[1].push_str("==");
    assert_eq!(decode_expiry(&parts.join(".")), TokenExpiry::At(NOW));
}

#[test]
fn decode_expiry_without_exp_is_unknown() {
    let token = jwt_with_claims(&serde_json::json!({ "iss": "threaduser1@empresa.com.br" }));
    assert_eq!(decode_expiry(&token), TokenExpiry::Unknown);
}

#[test]
fn decode_expiry_non_numeric_exp_is_unknown() {
    let token = jwt_with_claims(&serde_json::json!({ "exp": "tomorrow" }));
    assert_eq!(decode_expiry(&token), TokenExpiry::Unknown);
}

#[test]
fn decode_expiry_wrong_segment_count_is_unknown() {
    assert_eq!(decode_expiry("opaque-token"), TokenExpiry::Unknown);
    assert_eq!(decode_expiry("a.b"), TokenExpiry::Unknown);
    assert_eq!(decode_expiry("a.b.c.d"), TokenExpiry::Unknown);
}

#[test]
fn decode_expiry_bad_base64_is_unknown() {
    assert_eq!(decode_expiry("aaa.!!!.ccc"), TokenExpiry::Unknown);
}

#[test]
fn decode_expiry_accepts_standard_alphabet_payload() {
    let claims = serde_json::json!({ "exp": NOW, "sub": "~~~~~~??????" });
    let payload = base64::engine::general_purpose::STANDARD.encode(claims.to_string());
    assert!(payload.contains('+') && payload.contains('/'));
    assert_eq!(decode_expiry(&format!("h.{payload}.s")), TokenExpiry::At(NOW));
}

#[test]
fn decode_claims_rejects_non_object_payload() {
    let payload = URL_SAFE_NO_PAD.encode(b"[1,2,3]");
    assert!(decode_claims(&format!("h.{payload}.s")).is_none());
}

// =============================================================================
// ExpiryRules::is_expired_at
// =============================================================================

#[test]
fn past_exp_is_expired() {
    let token = jwt_with_claims(&serde_json::json!({ "exp": NOW - 3600 }));
    assert!(ExpiryRules::default().is_expired_at(&token, NOW));
}

#[test]
fn future_exp_is_not_expired() {
    let token = jwt_with_claims(&serde_json::json!({ "exp": NOW + 3600 }));
    assert!(!ExpiryRules::default().is_expired_at(&token, NOW));
}

#[test]
fn exp_equal_to_now_is_expired() {
    let token = jwt_with_claims(&serde_json::json!({ "exp": NOW }));
    assert!(ExpiryRules::default().is_expired_at(&token, NOW));
}

#[test]
fn leeway_expires_token_early() {
    let token = jwt_with_claims(&serde_json::json!({ "exp": NOW + 30 }));
    let rules = ExpiryRules { leeway_secs: 60, ..ExpiryRules::default() };
    assert!(rules.is_expired_at(&token, NOW));
    assert!(!ExpiryRules::default().is_expired_at(&token, NOW));
}

#[test]
fn empty_token_is_expired_under_either_policy() {
    let valid = ExpiryRules { missing: MissingExpiryPolicy::Valid, ..ExpiryRules::default() };
    assert!(ExpiryRules::default().is_expired_at("", NOW));
    assert!(valid.is_expired_at("", NOW));
}

#[test]
fn undecodable_token_follows_policy() {
    let expired = ExpiryRules::default();
    let valid = ExpiryRules { missing: MissingExpiryPolicy::Valid, ..ExpiryRules::default() };
    assert!(expired.is_expired_at("opaque-token", NOW));
    assert!(!valid.is_expired_at("opaque-token", NOW));
}

#[test]
fn now_unix_is_after_2020() {
    assert!(now_unix() > 1_577_836_800);
}
