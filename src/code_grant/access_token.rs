//! Provides the handling for Access Token Requests, the second phase of the authorization code
//! grant.
//!
//! The code is only consumed once every check on the request has passed: the client has
//! authenticated, the code is valid for it and for the redirect uri, and the client still accepts
//! that redirect uri. Of two concurrent exchanges of the same code only the one deleting it first
//! receives a grant.
use log::debug;

use crate::primitives::client::{Authenticator, GrantType, Strategy};
use crate::primitives::grant::BearerToken;
use crate::session::{Backend, BackendError, SessionStore};

use super::error::{ErrorType, OAuthError};
use super::{authenticate_client, expect_grant_type, Request};

/// Try to redeem an authorization code.
pub fn access_token<B: Backend>(
    authenticator: &dyn Authenticator, store: &SessionStore<B>, request: &dyn Request,
) -> Result<BearerToken, OAuthError> {
    if !request.valid() {
        return Err(OAuthError::invalid_request());
    }

    let client = authenticate_client(authenticator, request)?;

    if !client.allow_strategy(Strategy::AuthorizationCode) {
        debug!("Client {:?} may not redeem authorization codes", client.client_id());
        return Err(OAuthError::unauthorized_client());
    }

    expect_grant_type(request, GrantType::AuthorizationCode)?;

    let code = request.code().ok_or_else(|| {
        debug!("Token request without authorization code");
        OAuthError::access_denied()
    })?;
    let redirect_uri = request.redirect_uri().unwrap_or_default();

    let stored = store.check_authorization_code(&code, &redirect_uri)?;

    if !stored.client_id.is_empty() && stored.client_id != client.client_id() {
        debug!("Authorization code presented by a different client {:?}", client.client_id());
        return Err(OAuthError::access_denied());
    }

    client.authorize_redirect_uri(&redirect_uri).map_err(|err| {
        debug!("Redirect uri no longer allowed for {:?}", client.client_id());
        err.or_kind(ErrorType::UnauthorizedClient)
    })?;

    match store.delete_authorization_code(&code) {
        Ok(()) => (),
        Err(BackendError::NotFound) => {
            debug!("Authorization code was redeemed concurrently");
            return Err(OAuthError::access_denied());
        }
        Err(err) => return Err(err.into()),
    }

    let grant = store.new_client_grant(client.client_id(), stored.scope)?;
    Ok(grant.to_bearer())
}
