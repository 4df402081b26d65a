use base64::Engine as _;
use chrono::{DateTime, Utc};

use crate::error::AuthError;

/// Decode the `exp` claim of a JWT without verifying its signature.
///
/// Only for display; the server remains the authority on validity.
///
/// # Errors
///
/// Returns `AuthError::InvalidToken` if the token is not a three-part JWT or
/// its payload has no numeric `exp`.
pub fn decode_expiry(jwt: &str) -> Result<DateTime<Utc>, AuthError> {
    let parts: Vec<&str> = jwt.split('.').collect();
    if parts.len() != 3 {
        return Err(AuthError::InvalidToken("invalid JWT format".into()));
    }
    let payload = base64::engine::general_purpose::URL_SAFE_NO_PAD
        .decode(parts[1].trim_end_matches('='))
        .map_err(|e| AuthError::InvalidToken(format!("base64 decode failed: {e}")))?;
    let value: serde_json::Value = serde_json::from_slice(&payload)
        .map_err(|e| AuthError::InvalidToken(format!("JSON parse failed: {e}")))?;
    let exp = value["exp"]
        .as_i64()
        .ok_or_else(|| AuthError::InvalidToken("missing exp claim".into()))?;
    DateTime::from_timestamp(exp, 0)
        .ok_or_else(|| AuthError::InvalidToken("invalid exp timestamp".into()))
}

#[cfg(test)]
pub(crate) fn make_jwt_with_exp(exp: i64) -> String {
    let engine = base64::engine::general_purpose::URL_SAFE_NO_PAD;
    let header = engine.encode(r#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = engine.encode(format!(
        r#"{{"token_type":"access","user_id":2,"exp":{exp}}}"#
    ));
    let signature = engine.encode("fake_sig");
    format!("{header}.{payload}.{signature}")
}
