use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};

use crate::utils::{HubError, Result};

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// Stable user identifier.
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub exp: usize,
}

/// Who is on the other end of a connection. Both fields are `None` for
/// anonymous connections.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Option<String>,
    pub display_name: Option<String>,
}

impl Identity {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn is_authenticated(&self) -> bool {
        self.user_id.is_some()
    }

    /// The name announced in system messages, or `fallback` when absent or
    /// blank.
    pub fn display_name_or<'a>(&'a self, fallback: &'a str) -> &'a str {
        self.display_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
            .unwrap_or(fallback)
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        let display_name = claims
            .name
            .filter(|name| !name.trim().is_empty())
            .unwrap_or_else(|| claims.sub.clone());
        Self {
            user_id: Some(claims.sub),
            display_name: Some(display_name),
        }
    }
}

/// Verifies `token` against `secret` and extracts the caller's identity.
pub fn verify_token(token: &str, secret: &str) -> Result<Identity> {
    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map_err(HubError::InvalidToken)?;

    Ok(data.claims.into())
}

/// Signs a token for `user_id` valid for `ttl_hours`.
pub fn issue_token(
    secret: &str,
    user_id: &str,
    name: Option<&str>,
    ttl_hours: i64,
) -> Result<String> {
    let claims = Claims {
        sub: user_id.to_string(),
        name: name.map(str::to_string),
        exp: (chrono::Utc::now() + chrono::Duration::hours(ttl_hours)).timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(HubError::Signing)
}
