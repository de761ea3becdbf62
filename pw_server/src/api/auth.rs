//! Bearer-token authentication for players.
//!
//! Access tokens are HS256 JWTs signed with the server's `JWT_SECRET`. The
//! `sub` claim carries the player id that new wallets are created for.

use chrono::Utc;
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use player_wallet::wallet::PlayerId;
use serde::{Deserialize, Serialize};

/// Claims carried by a player access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerClaims {
    /// Player ID
    pub sub: PlayerId,
    pub username: String,
    /// Expiration timestamp
    pub exp: i64,
}

/// Signs and verifies player access tokens
#[derive(Clone)]
pub struct TokenService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenService {
    pub fn new(secret: &str) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Validation::default(),
        }
    }

    /// Verify an access token and return its claims
    ///
    /// # Errors
    ///
    /// Returns an error for a bad signature, a malformed token or an expired `exp`
    pub fn verify(&self, token: &str) -> Result<PlayerClaims, jsonwebtoken::errors::Error> {
        let token_data = decode::<PlayerClaims>(token, &self.decoding_key, &self.validation)?;
        Ok(token_data.claims)
    }

    /// Issue an access token valid for `ttl_secs`
    pub fn issue(
        &self,
        player_id: PlayerId,
        username: &str,
        ttl_secs: i64,
    ) -> Result<String, jsonwebtoken::errors::Error> {
        let claims = PlayerClaims {
            sub: player_id,
            username: username.to_string(),
            exp: Utc::now().timestamp() + ttl_secs,
        };

        encode(&Header::default(), &claims, &self.encoding_key)
    }
}
