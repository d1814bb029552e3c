use axum::extract::FromRef;
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use time::OffsetDateTime;
use tracing::debug;
use uuid::Uuid;

use crate::auth::claims::Claims;
use crate::auth::error::AuthError;
use crate::state::AppState;

/// HMAC-SHA256 keys derived from the shared signing secret.
#[derive(Clone)]
pub struct JwtKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
}

impl FromRef<AppState> for JwtKeys {
    fn from_ref(state: &AppState) -> Self {
        state.jwt.clone()
    }
}

impl JwtKeys {
    /// Derive keys from the configured secret.
    ///
    /// An empty secret never becomes a key; callers treat this as a fatal
    /// configuration error.
    pub fn from_secret(secret: &str) -> Result<Self, AuthError> {
        if secret.is_empty() {
            return Err(AuthError::Configuration);
        }
        Ok(Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
        })
    }

    /// Sign an access token asserting the given identity.
    pub fn sign(&self, email: &str, user_id: Uuid) -> anyhow::Result<String> {
        let claims = Claims {
            email: email.to_owned(),
            user_id: Some(user_id),
            iat: OffsetDateTime::now_utc().unix_timestamp() as usize,
        };
        let token = encode(&Header::default(), &claims, &self.encoding)?;
        debug!(user_id = %user_id, "jwt signed");
        Ok(token)
    }

    /// Validate a presented token and recover its claims.
    ///
    /// Rejects on signature mismatch, a non-HS256 header or a malformed
    /// token. There is no `exp` claim and no expiry check.
    pub fn verify(&self, token: &str) -> anyhow::Result<Claims> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = false;
        validation.required_spec_claims.clear();
        let data = decode::<Claims>(token, &self.decoding, &validation)?;
        debug!(email = %data.claims.email, "jwt verified");
        Ok(data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use base64ct::{Base64UrlUnpadded, Encoding};

    fn make_keys() -> JwtKeys {
        JwtKeys::from_secret("dev-secret").expect("non-empty secret")
    }

    #[test]
    fn empty_secret_is_rejected() {
        assert!(matches!(
            JwtKeys::from_secret(""),
            Err(AuthError::Configuration)
        ));
    }

    #[test]
    fn sign_and_verify_roundtrip() {
        let keys = make_keys();
        let user_id = Uuid::new_v4();
        let token = keys.sign("a@x.com", user_id).expect("sign");
        let claims = keys.verify(&token).expect("verify");
        assert_eq!(claims.email, "a@x.com");
        assert_eq!(claims.user_id, Some(user_id));
        assert!(claims.iat > 0);
    }

    #[test]
    fn token_is_three_part_hs256() {
        let token = make_keys().sign("a@x.com", Uuid::new_v4()).expect("sign");
        assert_eq!(token.split('.').count(), 3);
        let header = jsonwebtoken::decode_header(&token).expect("decode header");
        assert_eq!(header.alg, Algorithm::HS256);
    }

    #[test]
    fn payload_carries_wire_claim_names_and_no_exp() {
        let token = make_keys().sign("a@x.com", Uuid::new_v4()).expect("sign");
        let payload = token.split('.').nth(1).expect("payload segment");
        let bytes = Base64UrlUnpadded::decode_vec(payload).expect("base64url payload");
        let value: serde_json::Value = serde_json::from_slice(&bytes).expect("json payload");
        assert_eq!(value["email"], "a@x.com");
        assert!(value.get("userId").is_some());
        assert!(value.get("iat").is_some());
        assert!(value.get("exp").is_none());
    }

    #[test]
    fn verify_rejects_wrong_secret() {
        let token = make_keys().sign("a@x.com", Uuid::new_v4()).expect("sign");
        let other = JwtKeys::from_secret("other-secret").expect("non-empty secret");
        assert!(other.verify(&token).is_err());
    }

    #[test]
    fn verify_rejects_tampered_payload_and_signature() {
        let keys = make_keys();
        let token = keys.sign("a@x.com", Uuid::new_v4()).expect("sign");
        for segment in [1, 2] {
            let mut parts: Vec<String> = token.split('.').map(str::to_owned).collect();
            let mut chars: Vec<char> = parts[segment].chars().collect();
            chars[0] = if chars[0] == 'A' { 'B' } else { 'A' };
            parts[segment] = chars.into_iter().collect();
            let tampered = parts.join(".");
            assert!(
                keys.verify(&tampered).is_err(),
                "tampered segment {segment} was accepted"
            );
        }
    }

    #[test]
    fn verify_rejects_malformed_tokens() {
        let keys = make_keys();
        for garbage in ["", "not-a-token", "a.b", "a.b.c.d", "!!.!!.!!"] {
            assert!(keys.verify(garbage).is_err(), "{garbage:?} was accepted");
        }
    }
}
