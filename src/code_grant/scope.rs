//! Negotiates the scope of a grant between the request, the client and the resource owner.
//!
//! Each layer may only narrow: the scope granted at the end contains exactly the requested tokens
//! that survived every layer. A request for the empty scope is valid and yields the empty scope.
use crate::primitives::client::{Authenticator, Client};
use crate::primitives::scope::Scope;
use crate::primitives::secret::Secret;

use super::error::{ErrorType, OAuthError};

/// Credentials of the resource owner taking part in the negotiation.
pub struct ResourceOwner<'a> {
    /// Verifies the credentials and decides for the owner.
    pub authenticator: &'a dyn Authenticator,

    /// The owner's name.
    pub username: &'a str,

    /// The owner's password.
    pub password: &'a Secret,
}

/// The layer which rejected the negotiation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ScopeError {
    /// The client rejected the request.
    Client(OAuthError),

    /// The resource owner could not be authenticated or rejected the request.
    ResourceOwner(OAuthError),

    /// These required tokens were not granted.
    MissingRequired(Scope),
}

impl ScopeError {
    /// The error reported when a flow does not decide otherwise.
    ///
    /// A client rejection is `invalid_scope`, the other failures are `access_denied`.
    pub fn into_error(self) -> OAuthError {
        match self {
            ScopeError::Client(err) => err.or_kind(ErrorType::InvalidScope),
            ScopeError::ResourceOwner(err) => err.or_kind(ErrorType::AccessDenied),
            ScopeError::MissingRequired(_) => OAuthError::access_denied(),
        }
    }
}

/// The client layer, the part of `requested` the client may receive.
pub fn client_layer(client: &dyn Client, requested: &Scope) -> Result<Scope, ScopeError> {
    let allowed = client.authorize_scope(requested).map_err(ScopeError::Client)?;
    Ok(requested.intersection(&allowed))
}

/// The resource owner layer, the part of `requested` the owner grants.
///
/// This also verifies the owner's password, so it is consulted even for an empty request.
pub fn owner_layer(owner: &ResourceOwner, requested: &Scope) -> Result<Scope, ScopeError> {
    let allowed = owner
        .authenticator
        .authorize_resource_owner(owner.username, owner.password, requested)
        .map_err(ScopeError::ResourceOwner)?;
    Ok(requested.intersection(&allowed))
}

/// Check that every required token has been granted.
pub fn require(granted: &Scope, required: &Scope) -> Result<(), ScopeError> {
    let missing = required.difference(granted);
    if missing.is_empty() {
        Ok(())
    } else {
        Err(ScopeError::MissingRequired(missing))
    }
}

/// Run all applicable layers in order: client, then resource owner, then the required tokens.
///
/// ```
/// # use oxide_auth_session::code_grant::scope::{authorize_scope, ResourceOwner};
/// # use oxide_auth_session::primitives::prelude::*;
/// let mut map = ClientMap::new();
/// map.register_client(RegisteredClient::public("app", "read write".parse().unwrap()));
/// map.register_owner_with_scope("alice", "secret", "read admin".parse().unwrap());
///
/// let client = map.get_client("app").unwrap();
/// let password = Secret::new("secret");
/// let owner = ResourceOwner { authenticator: &map, username: "alice", password: &password };
///
/// let requested = "read write admin".parse().unwrap();
/// let granted = authorize_scope(&requested, &*client, Some(&owner), None).unwrap();
/// assert_eq!(granted.to_string(), "read");
/// ```
pub fn authorize_scope(
    requested: &Scope, client: &dyn Client, owner: Option<&ResourceOwner>,
    required: Option<&Scope>,
) -> Result<Scope, ScopeError> {
    let mut granted = client_layer(client, requested)?;

    if let Some(owner) = owner {
        granted = owner_layer(owner, &granted)?;
    }

    if let Some(required) = required {
        require(&granted, required)?;
    }

    Ok(granted)
}
