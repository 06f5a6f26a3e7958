//! Reads user identity out of an access token's payload.
//!
//! The signature is not checked here; the gateway verifies tokens on every
//! request and the browser only needs the claims for display.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use bookbuddy_types::{User, UserProfile};
use serde_json::{Map, Value};

use crate::error::{ClientError, Result};

pub const NAME_IDENTIFIER_CLAIM: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/nameidentifier";
pub const NAME_CLAIM: &str = "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/name";
pub const EMAIL_CLAIM: &str =
    "http://schemas.xmlsoap.org/ws/2005/05/identity/claims/emailaddress";
pub const ROLE_CLAIM: &str = "http://schemas.microsoft.com/ws/2008/06/identity/claims/role";

#[derive(Clone, Debug, PartialEq)]
pub struct TokenClaims(Map<String, Value>);

pub fn decode(token: &str) -> Result<TokenClaims> {
    let segments: Vec<&str> = token.split('.').collect();
    if segments.len() != 3 {
        return Err(ClientError::Token(format!(
            "expected 3 segments, found {}",
            segments.len()
        )));
    }

    let payloadBytes = URL_SAFE_NO_PAD
        .decode(segments[1].trim_end_matches('='))
        .map_err(|e| ClientError::Token(format!("payload is not base64url: {e}")))?;

    let payload: Map<String, Value> = serde_json::from_slice(&payloadBytes)
        .map_err(|e| ClientError::Token(format!("payload is not a JSON object: {e}")))?;

    Ok(TokenClaims(payload))
}

impl TokenClaims {
    /// First non-empty value among `keys`. Numbers are stringified and arrays
    /// resolve to their first string element.
    fn first(&self, keys: &[&str]) -> Option<String> {
        keys.iter().find_map(|key| match self.0.get(*key)? {
            Value::String(s) if !s.is_empty() => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            Value::Array(items) => items
                .iter()
                .find_map(|item| item.as_str().filter(|s| !s.is_empty()))
                .map(str::to_string),
            _ => None,
        })
    }

    pub fn user_id(&self) -> Option<String> {
        self.first(&["sub", "userId", NAME_IDENTIFIER_CLAIM])
    }

    pub fn username(&self) -> Option<String> {
        self.first(&["username", "name", NAME_CLAIM])
    }

    pub fn email(&self) -> Option<String> {
        self.first(&["email", EMAIL_CLAIM])
    }

    pub fn role(&self) -> Option<String> {
        self.first(&["role", ROLE_CLAIM])
    }

    /// Builds the session user, letting non-empty `profile` fields override claims.
    pub fn to_user(&self, profile: &UserProfile) -> Result<User> {
        let pick = |field: &Option<String>| field.clone().filter(|s| !s.is_empty());

        let userId = pick(&profile.user_id)
            .or_else(|| self.user_id())
            .ok_or_else(|| ClientError::Token("no user id claim".into()))?;

        Ok(User {
            user_id: userId,
            username: pick(&profile.username)
                .or_else(|| self.username())
                .unwrap_or_default(),
            email: pick(&profile.email).or_else(|| self.email()),
            role: pick(&profile.role).or_else(|| self.role()),
            profile_picture: pick(&profile.profile_picture),
        })
    }
}

#[cfg(test)]
pub(crate) fn encode_test_token(claims: &Value) -> String {
    let header = URL_SAFE_NO_PAD.encode(br#"{"alg":"HS256","typ":"JWT"}"#);
    let payload = URL_SAFE_NO_PAD.encode(claims.to_string());
    format!("{header}.{payload}.signature")
}
