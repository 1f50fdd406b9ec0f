//! Provides the handling for Client Credentials Requests.
//!
//! The client acts on its own behalf, so there is no resource owner and no redirect. Only
//! confidential clients able to authenticate with a secret can use this flow.
use log::debug;

use crate::primitives::client::{Authenticator, GrantType, Strategy};
use crate::primitives::grant::BearerToken;
use crate::session::{Backend, SessionStore};

use super::error::OAuthError;
use super::scope::client_layer;
use super::{authenticate_client, expect_grant_type, requested_scope, Request};

/// Issue a grant to an authenticated client.
pub fn client_credentials<B: Backend>(
    authenticator: &dyn Authenticator, store: &SessionStore<B>, request: &dyn Request,
) -> Result<BearerToken, OAuthError> {
    if !request.valid() {
        return Err(OAuthError::invalid_request());
    }

    expect_grant_type(request, GrantType::ClientCredentials)?;

    let client = authenticate_client(authenticator, request)?;

    if !client.allow_strategy(Strategy::ClientCredentials) {
        debug!("Client {:?} may not use client credentials", client.client_id());
        return Err(OAuthError::unauthorized_client());
    }

    let requested = requested_scope(request)?;
    let scope = client_layer(&*client, &requested).map_err(|err| err.into_error())?;

    let grant = store.new_client_grant(client.client_id(), scope)?;
    Ok(grant.to_bearer())
}
