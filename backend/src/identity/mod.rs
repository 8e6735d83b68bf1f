//! Bearer token verification
//!
//! Tokens are HS256 JWTs signed with a shared secret. The caller identity is read
//! from the first present of the `id`, `user_id` and `sub` claims; `username` and
//! `email` are optional profile fields. Any other signing algorithm is rejected.

mod error;

use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};

pub use error::IdentityError;

/// Claims probed for the caller id, in priority order
const SUBJECT_CLAIMS: [&str; 3] = ["id", "user_id", "sub"];

/// Caller identity derived from a verified credential
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    /// Stable user id, used as the storage prefix
    pub id: String,
    /// Optional display name
    pub username: Option<String>,
    /// Optional e-mail address
    pub email: Option<String>,
}

/// Verifies bearer credentials against a shared HS256 secret
#[derive(Clone)]
pub struct IdentityVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl IdentityVerifier {
    /// Creates a verifier for the given secret
    #[must_use]
    pub fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // `exp` is checked when present but not required
        validation.required_spec_claims.clear();
        validation.leeway = 0;

        Self {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    /// Verifies an `Authorization` header value and extracts the caller identity
    ///
    /// A leading `Bearer ` prefix is stripped if present.
    ///
    /// # Errors
    ///
    /// Returns `IdentityError::InvalidSignature` if the signature does not verify
    /// Returns `IdentityError::Expired` if the token has expired
    /// Returns `IdentityError::Malformed` if the token cannot be decoded
    /// Returns `IdentityError::MissingSubject` if no subject claim is present
    pub fn verify(&self, credential: &str) -> Result<Identity, IdentityError> {
        let token = credential.strip_prefix("Bearer ").unwrap_or(credential).trim();

        let claims = decode::<Map<String, Value>>(token, &self.decoding_key, &self.validation)?
            .claims;

        let id = SUBJECT_CLAIMS
            .iter()
            .find_map(|name| claim_as_string(&claims, name))
            .ok_or(IdentityError::MissingSubject)?;

        Ok(Identity {
            id,
            username: claim_as_string(&claims, "username"),
            email: claim_as_string(&claims, "email"),
        })
    }
}

/// Reads a claim as a non-empty string; numeric ids are rendered in decimal
fn claim_as_string(claims: &Map<String, Value>, name: &str) -> Option<String> {
    match claims.get(name)? {
        Value::String(value) if !value.is_empty() => Some(value.clone()),
        Value::Number(value) => Some(value.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;
    use jsonwebtoken::{encode, EncodingKey, Header};
    use serde_json::json;

    use super::*;

    const SECRET: &str = "test-secret";

    fn sign(claims: &Value) -> String {
        sign_with(Header::default(), SECRET, claims)
    }

    fn sign_with(header: Header, secret: &str, claims: &Value) -> String {
        encode(&header, claims, &EncodingKey::from_secret(secret.as_bytes())).unwrap()
    }

    #[test]
    fn test_verify_extracts_identity() {
        let token = sign(&json!({
            "id": "user-1",
            "username": "alice",
            "email": "alice@example.com",
            "exp": Utc::now().timestamp() + 3600,
        }));

        let identity = IdentityVerifier::new(SECRET)
            .verify(&format!("Bearer {token}"))
            .unwrap();

        assert_eq!(
            identity,
            Identity {
                id: "user-1".to_string(),
                username: Some("alice".to_string()),
                email: Some("alice@example.com".to_string()),
            }
        );
    }

    #[test]
    fn test_subject_claim_priority() {
        let verifier = IdentityVerifier::new(SECRET);

        let cases = [
            (json!({"id": "a", "user_id": "b", "sub": "c"}), "a"),
            (json!({"user_id": "b", "sub": "c"}), "b"),
            (json!({"sub": "c"}), "c"),
            (json!({"id": "", "sub": "c"}), "c"),
            (json!({"user_id": 42}), "42"),
        ];

        for (claims, expected) in cases {
            let identity = verifier.verify(&sign(&claims)).unwrap();
            assert_eq!(identity.id, expected, "claims: {claims}");
        }
    }

    #[test]
    fn test_token_without_bearer_prefix() {
        let token = sign(&json!({"sub": "user-2"}));
        let identity = IdentityVerifier::new(SECRET).verify(&token).unwrap();

        assert_eq!(identity.id, "user-2");
        assert_eq!(identity.username, None);
        assert_eq!(identity.email, None);
    }

    #[test]
    fn test_missing_subject() {
        let token = sign(&json!({"username": "nobody"}));
        let result = IdentityVerifier::new(SECRET).verify(&token);

        assert!(matches!(result, Err(IdentityError::MissingSubject)));
    }

    #[test]
    fn test_expired_token() {
        let token = sign(&json!({"id": "user-1", "exp": Utc::now().timestamp() - 60}));
        let result = IdentityVerifier::new(SECRET).verify(&token);

        assert!(matches!(result, Err(IdentityError::Expired)));
    }

    #[test]
    fn test_wrong_secret() {
        let token = sign_with(Header::default(), "another-secret", &json!({"id": "user-1"}));
        let result = IdentityVerifier::new(SECRET).verify(&token);

        assert!(matches!(result, Err(IdentityError::InvalidSignature)));
    }

    #[test]
    fn test_other_algorithm_rejected() {
        let token = sign_with(
            Header::new(Algorithm::HS384),
            SECRET,
            &json!({"id": "user-1"}),
        );
        let result = IdentityVerifier::new(SECRET).verify(&token);

        assert!(matches!(result, Err(IdentityError::Malformed(_))));
    }

    #[test]
    fn test_malformed_tokens() {
        let verifier = IdentityVerifier::new(SECRET);

        for token in ["", "Bearer ", "not-a-jwt", "a.b.c", "Bearer a.b"] {
            assert!(
                matches!(verifier.verify(token), Err(IdentityError::Malformed(_))),
                "should reject {token:?}"
            );
        }
    }
}
