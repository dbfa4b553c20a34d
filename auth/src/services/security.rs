use anyhow::anyhow;
use argon2::password_hash::{rand_core::OsRng, SaltString};
use argon2::{Argon2, Params, PasswordHash, PasswordHasher, PasswordVerifier, Version};
use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde_json::{Map, Value};

use cikulche_config::AuthConfig;
use cikulche_models::Claims;

/// Password hashing and token signing primitives.
///
/// Read-only after construction: the signing keys and Argon2 cost come from
/// the injected `AuthConfig` and never change, so a single instance can be
/// shared across concurrent requests without locking.
pub struct SecurityService {
    argon2: Argon2<'static>,
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    token_ttl: Duration,
    issuer: String,
}

impl SecurityService {
    pub fn new(config: &AuthConfig) -> Result<Self, anyhow::Error> {
        let params = Params::new(
            config.hash_memory_kib,
            config.hash_iterations,
            config.hash_parallelism,
            None,
        )
        .map_err(|e| anyhow!("Invalid Argon2 parameters: {}", e))?;

        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

        Ok(Self {
            argon2,
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            token_ttl: Duration::seconds(config.token_ttl_secs),
            issuer: config.issuer.clone(),
        })
    }

    // Password hashing and validation methods
    pub fn hash_password(&self, password: &str) -> Result<String, argon2::password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let password_hash = self.argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(password_hash.to_string())
    }

    pub fn verify_password(
        &self,
        password: &str,
        hash: &str,
    ) -> Result<bool, argon2::password_hash::Error> {
        let parsed_hash = PasswordHash::new(hash)?;
        match self.argon2.verify_password(password.as_bytes(), &parsed_hash) {
            Ok(_) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Mint a signed token for `subject`, expiring after the configured TTL.
    /// Extra claims are flattened alongside the registered ones.
    pub fn issue_token(
        &self,
        subject: &str,
        extra: Map<String, Value>,
    ) -> Result<(String, DateTime<Utc>), jsonwebtoken::errors::Error> {
        let now = Utc::now();
        let expires_at = now + self.token_ttl;

        let claims = Claims {
            sub: subject.to_string(),
            iat: now.timestamp() as usize,
            exp: expires_at.timestamp() as usize,
            iss: self.issuer.clone(),
            extra,
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)?;
        Ok((token, expires_at))
    }

    /// Verify signature, expiry and issuer. Zero leeway: a token is valid
    /// strictly until its embedded expiry, and anything unparsable is invalid.
    pub fn validate_token(&self, token: &str) -> Result<Claims, jsonwebtoken::errors::Error> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.leeway = 0;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)?;
        Ok(token_data.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_service(ttl_secs: i64) -> SecurityService {
        let mut config = AuthConfig::new("test-signing-secret", ttl_secs);
        // Keep the unit tests fast; cost tuning is covered by config defaults.
        config.hash_memory_kib = 1024;
        config.hash_iterations = 1;
        SecurityService::new(&config).unwrap()
    }

    #[test]
    fn hash_then_verify_roundtrip() {
        let service = test_service(3600);
        let digest = service.hash_password("secret1").unwrap();
        assert!(service.verify_password("secret1", &digest).unwrap());
        assert!(!service.verify_password("wrongpw", &digest).unwrap());
    }

    #[test]
    fn hashing_is_salted() {
        let service = test_service(3600);
        let first = service.hash_password("secret1").unwrap();
        let second = service.hash_password("secret1").unwrap();
        assert_ne!(first, second);
        assert!(service.verify_password("secret1", &first).unwrap());
        assert!(service.verify_password("secret1", &second).unwrap());
    }

    #[test]
    fn verify_rejects_garbage_digest() {
        let service = test_service(3600);
        assert!(service.verify_password("secret1", "not-a-phc-string").is_err());
    }

    #[test]
    fn token_roundtrip_preserves_subject() {
        let service = test_service(3600);
        let (token, _expires) = service.issue_token("b@x.com", Map::new()).unwrap();
        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.sub, "b@x.com");
        assert_eq!(claims.iss, cikulche_config::DEFAULT_ISSUER);
        assert!(claims.exp > claims.iat);
    }

    #[test]
    fn token_carries_extra_claims() {
        let service = test_service(3600);
        let mut extra = Map::new();
        extra.insert("cycle_length".to_string(), Value::from(28));
        let (token, _) = service.issue_token("b@x.com", extra).unwrap();
        let claims = service.validate_token(&token).unwrap();
        assert_eq!(claims.extra.get("cycle_length"), Some(&Value::from(28)));
    }

    #[test]
    fn expired_token_is_rejected() {
        let service = test_service(-120);
        let (token, _) = service.issue_token("b@x.com", Map::new()).unwrap();
        assert!(service.validate_token(&token).is_err());
    }

    #[test]
    fn tampered_signature_is_rejected() {
        let service = test_service(3600);
        let (token, _) = service.issue_token("b@x.com", Map::new()).unwrap();

        let sig_start = token.rfind('.').unwrap() + 1;
        let flip_at = sig_start + 5;
        let mut bytes = token.into_bytes();
        bytes[flip_at] = if bytes[flip_at] == b'A' { b'B' } else { b'A' };
        let tampered = String::from_utf8(bytes).unwrap();

        assert!(service.validate_token(&tampered).is_err());
    }

    #[test]
    fn malformed_token_is_rejected() {
        let service = test_service(3600);
        assert!(service.validate_token("not.a.jwt").is_err());
        assert!(service.validate_token("").is_err());
    }

    #[test]
    fn token_signed_with_other_key_is_rejected() {
        let service = test_service(3600);
        let other = {
            let mut config = AuthConfig::new("a-different-secret", 3600);
            config.hash_memory_kib = 1024;
            config.hash_iterations = 1;
            SecurityService::new(&config).unwrap()
        };
        let (token, _) = other.issue_token("b@x.com", Map::new()).unwrap();
        assert!(service.validate_token(&token).is_err());
    }
}
