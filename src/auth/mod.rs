// Caller identity extraction and the admin gate
//
// Tokens are verified by the fronting gateway before they reach this
// service. The gateway forwards the verified claims in the
// `x-auth-claims` header; when that header is absent we fall back to
// decoding the bearer token payload without re-verifying the signature.
use axum::http::HeaderMap;
use base64::{engine::general_purpose::URL_SAFE, Engine};
use serde_json::Value;
use std::collections::BTreeSet;

/// Header carrying gateway-verified claims as a JSON object.
pub const CLAIMS_HEADER: &str = "x-auth-claims";

/// Group name whose members may call the admin endpoints.
pub const ADMIN_GROUP: &str = "Admin";

/// The set of directory groups asserted for the calling identity.
///
/// Extraction never fails: any malformed header, token, or claim shape
/// degrades to the empty set, and the empty set is never an admin.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ClaimsSet {
    groups: BTreeSet<String>,
}

impl ClaimsSet {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        if let Some(raw) = headers.get(CLAIMS_HEADER).and_then(|v| v.to_str().ok()) {
            if let Ok(claims) = serde_json::from_str::<Value>(raw) {
                return Self::from_claims(&claims);
            }
            return Self::default();
        }

        let bearer = headers
            .get("authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        match bearer {
            Some(token) => Self::from_bearer_token(token),
            None => Self::default(),
        }
    }

    /// Decode the payload segment of a compact JWS without verifying
    /// the signature. Verification happened at the gateway.
    fn from_bearer_token(token: &str) -> Self {
        let mut segments = token.split('.');
        let payload = match (segments.next(), segments.next(), segments.next()) {
            (Some(_), Some(payload), Some(_)) if segments.next().is_none() => payload,
            _ => return Self::default(),
        };

        let decoded = match URL_SAFE.decode(restore_padding(payload)) {
            Ok(bytes) => bytes,
            Err(_) => return Self::default(),
        };

        match serde_json::from_slice::<Value>(&decoded) {
            Ok(claims) => Self::from_claims(&claims),
            Err(_) => Self::default(),
        }
    }

    /// Fold the `groups` claim into a set. The claim arrives either as
    /// a JSON array of strings or as a single comma-joined string.
    fn from_claims(claims: &Value) -> Self {
        let mut groups = BTreeSet::new();
        match claims.get("groups") {
            Some(Value::Array(items)) => {
                for item in items {
                    if let Value::String(name) = item {
                        let name = name.trim();
                        if !name.is_empty() {
                            groups.insert(name.to_string());
                        }
                    }
                }
            }
            Some(Value::String(joined)) => {
                for name in joined.split(',') {
                    let name = name.trim();
                    if !name.is_empty() {
                        groups.insert(name.to_string());
                    }
                }
            }
            _ => {}
        }
        Self { groups }
    }

    /// Case-sensitive membership test against the admin group.
    pub fn is_admin(&self) -> bool {
        self.groups.contains(ADMIN_GROUP)
    }

    pub fn groups(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(String::as_str)
    }
}

/// Base64url payloads arrive stripped of `=` padding; the decoder
/// requires it back.
fn restore_padding(segment: &str) -> String {
    let mut s = segment.to_string();
    while s.len() % 4 != 0 {
        s.push('=');
    }
    s
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(name: &'static str, value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(name, HeaderValue::from_str(value).unwrap());
        headers
    }

    fn bearer_for(payload: &Value) -> String {
        let encoded = URL_SAFE.encode(serde_json::to_vec(payload).unwrap());
        let payload = encoded.trim_end_matches('=');
        format!("Bearer eyJhbGciOiJSUzI1NiJ9.{}.c2ln", payload)
    }

    #[test]
    fn gateway_claims_array_groups() {
        let headers = headers_with(CLAIMS_HEADER, r#"{"groups":["Admin","CityOfficial"]}"#);
        let claims = ClaimsSet::from_headers(&headers);
        assert!(claims.is_admin());
        assert_eq!(claims.groups().count(), 2);
    }

    #[test]
    fn gateway_claims_comma_joined_groups() {
        let headers = headers_with(CLAIMS_HEADER, r#"{"groups":"CityOfficial, Admin"}"#);
        assert!(ClaimsSet::from_headers(&headers).is_admin());
    }

    #[test]
    fn admin_membership_is_case_sensitive() {
        let headers = headers_with(CLAIMS_HEADER, r#"{"groups":["admin","ADMIN"]}"#);
        assert!(!ClaimsSet::from_headers(&headers).is_admin());
    }

    #[test]
    fn bearer_payload_without_padding_decodes() {
        let token = bearer_for(&serde_json::json!({"groups": ["Admin"]}));
        let headers = headers_with("authorization", &token);
        assert!(ClaimsSet::from_headers(&headers).is_admin());
    }

    #[test]
    fn malformed_gateway_header_yields_empty_set() {
        let headers = headers_with(CLAIMS_HEADER, "not json at all");
        let claims = ClaimsSet::from_headers(&headers);
        assert!(!claims.is_admin());
        assert_eq!(claims.groups().count(), 0);
    }

    #[test]
    fn malformed_bearer_yields_empty_set() {
        for token in [
            "Bearer ",
            "Bearer onesegment",
            "Bearer a.b",
            "Bearer a.b.c.d",
            "Bearer a.!!!not-base64!!!.c",
        ] {
            let headers = headers_with("authorization", token);
            assert!(!ClaimsSet::from_headers(&headers).is_admin(), "{}", token);
        }
    }

    #[test]
    fn bearer_payload_that_is_not_json_yields_empty_set() {
        let encoded = URL_SAFE.encode(b"plain text payload");
        let token = format!("Bearer h.{}.s", encoded.trim_end_matches('='));
        let headers = headers_with("authorization", &token);
        assert!(!ClaimsSet::from_headers(&headers).is_admin());
    }

    #[test]
    fn missing_groups_claim_yields_empty_set() {
        let headers = headers_with(CLAIMS_HEADER, r#"{"sub":"carol"}"#);
        assert_eq!(ClaimsSet::from_headers(&headers).groups().count(), 0);
    }

    #[test]
    fn no_credentials_yields_empty_set() {
        let claims = ClaimsSet::from_headers(&HeaderMap::new());
        assert!(!claims.is_admin());
    }

    #[test]
    fn gateway_header_takes_precedence_over_bearer() {
        let mut headers = headers_with(CLAIMS_HEADER, r#"{"groups":[]}"#);
        let token = bearer_for(&serde_json::json!({"groups": ["Admin"]}));
        headers.insert("authorization", HeaderValue::from_str(&token).unwrap());
        assert!(!ClaimsSet::from_headers(&headers).is_admin());
    }

    #[test]
    fn empty_and_whitespace_group_names_are_dropped() {
        let headers = headers_with(CLAIMS_HEADER, r#"{"groups":" , Admin ,, "}"#);
        let claims = ClaimsSet::from_headers(&headers);
        assert!(claims.is_admin());
        assert_eq!(claims.groups().count(), 1);
    }
}
