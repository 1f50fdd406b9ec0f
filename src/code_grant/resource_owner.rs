//! Provides the handling for Resource Owner Password Credentials Requests.
use log::debug;

use crate::primitives::client::{Authenticator, GrantType, Strategy};
use crate::primitives::grant::BearerToken;
use crate::primitives::secret::Secret;
use crate::session::{Backend, SessionStore};

use super::error::{ErrorType, OAuthError};
use super::scope::{client_layer, owner_layer, ResourceOwner};
use super::{authenticate_client, expect_grant_type, requested_scope, Request};

/// Issue a grant to an authenticated client for a resource owner's credentials.
///
/// The client must be allowed to act for the owner before the password is even looked at. The
/// scope is narrowed by the client first and by the resource owner second.
pub fn resource_owner<B: Backend>(
    authenticator: &dyn Authenticator, store: &SessionStore<B>, request: &dyn Request,
) -> Result<BearerToken, OAuthError> {
    if !request.valid() {
        return Err(OAuthError::invalid_request());
    }

    expect_grant_type(request, GrantType::Password)?;

    let client = authenticate_client(authenticator, request)?;

    if !client.allow_strategy(Strategy::ResourceOwnerPasswordCredentials) {
        debug!("Client {:?} may not use owner passwords", client.client_id());
        return Err(OAuthError::unauthorized_client());
    }

    let username = match request.username() {
        Some(username) if !username.is_empty() => username,
        _ => {
            debug!("Password request without username");
            return Err(OAuthError::access_denied());
        }
    };

    client.authorize_resource_owner(&username).map_err(|err| {
        debug!("Client {:?} may not act for {:?}", client.client_id(), username);
        err.or_kind(ErrorType::UnauthorizedClient)
    })?;

    let password = request.password().map(Secret::new).ok_or_else(|| {
        debug!("Password request without password");
        OAuthError::access_denied()
    })?;

    let requested = requested_scope(request)?;
    let scope = client_layer(&*client, &requested).map_err(|err| err.into_error())?;

    let owner = ResourceOwner {
        authenticator,
        username: &username,
        password: &password,
    };
    let scope = owner_layer(&owner, &scope).map_err(|err| err.into_error())?;

    let grant = store.new_client_grant(client.client_id(), scope)?;
    Ok(grant.to_bearer())
}
