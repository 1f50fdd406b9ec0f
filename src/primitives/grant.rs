//! The records persisted by the session store.
use std::fmt;

use chrono::Duration;
use serde::Serialize;

use super::Time;
use super::scope::Scope;
use super::secret::Secret;

/// The authentication scheme of an access token.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenType {
    /// Tokens sufficient on their own, RFC 6750.
    Bearer,

    /// Message authentication code tokens. Reserved, requests using them are always rejected.
    Mac,
}

/// An issued access credential.
///
/// Grants are minted by the session store with fresh tokens and are never modified afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Grant {
    /// The token presented by the client, unique among the live grants of a store.
    pub access_token: Secret,

    /// Scheme under which the access token is presented.
    pub token_type: TokenType,

    /// Lifetime after creation.
    pub expires_in: Duration,

    /// Optional token for requesting a replacement grant.
    pub refresh_token: Option<Secret>,

    /// The scope granted to the client, possibly empty.
    pub scope: Scope,

    /// Creation time (Utc).
    pub created_at: Time,

    /// Identifies the client to which the grant was issued, if any.
    ///
    /// Only the identifier is kept. The current client decisions are looked up when the grant is
    /// used.
    pub client_id: Option<String>,
}

/// A short-lived, single-use voucher for a grant.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AuthorizationCode {
    /// The code value handed to the user agent, unique among the live codes of a store.
    pub code: Secret,

    /// The redirect uri the code was issued to. Empty means that no binding is checked.
    pub redirect_uri: String,

    /// The client the code was issued to. Empty means that no binding is checked.
    pub client_id: String,

    /// The scope approved by the resource owner.
    pub scope: Scope,

    /// Creation time (Utc).
    pub created_at: Time,

    /// Lifetime after creation.
    pub expires_in: Duration,
}

/// Token response data for a successful grant.
///
/// This is the body of `200` responses of the token endpoint and the fragment content of implicit
/// grant redirects.
#[derive(Clone, Debug, Serialize)]
pub struct BearerToken {
    access_token: String,
    token_type: &'static str,
    expires_in: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    refresh_token: Option<String>,
    scope: String,
}

impl TokenType {
    /// The name as used in token responses.
    pub fn as_str(self) -> &'static str {
        match self {
            TokenType::Bearer => "bearer",
            TokenType::Mac => "mac",
        }
    }
}

impl fmt::Display for TokenType {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.as_str())
    }
}

/// A lifetime ending past the representable range never expires.
fn expired(created_at: Time, expires_in: Duration, now: Time) -> bool {
    created_at
        .checked_add_signed(expires_in)
        .map_or(false, |end| end <= now)
}

impl Grant {
    /// Check if the grant is no longer valid at a given time.
    pub fn is_expired_at(&self, now: Time) -> bool {
        expired(self.created_at, self.expires_in, now)
    }

    /// The token response for this grant.
    pub fn to_bearer(&self) -> BearerToken {
        BearerToken {
            access_token: self.access_token.raw().to_string(),
            token_type: self.token_type.as_str(),
            expires_in: self.expires_in.num_seconds(),
            refresh_token: self
                .refresh_token
                .as_ref()
                .map(|token| token.raw().to_string()),
            scope: self.scope.to_string(),
        }
    }
}

impl AuthorizationCode {
    /// Check if the code is no longer valid at a given time.
    pub fn is_expired_at(&self, now: Time) -> bool {
        expired(self.created_at, self.expires_in, now)
    }
}

impl BearerToken {
    /// The pairs of the response, in the order of the json object.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("access_token", self.access_token.clone()),
            ("token_type", self.token_type.to_string()),
            ("expires_in", self.expires_in.to_string()),
        ];
        if let Some(refresh) = &self.refresh_token {
            pairs.push(("refresh_token", refresh.clone()));
        }
        pairs.push(("scope", self.scope.clone()));
        pairs
    }

    /// Convert the token into a json string.
    pub fn to_json(&self) -> String {
        // Only strings and integers, serialization can not fail.
        serde_json::to_string(self).unwrap_or_default()
    }
}
