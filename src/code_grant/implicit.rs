//! Provides the handling for Implicit Grant Requests.
//!
//! The token is issued directly at the authorization endpoint and delivered in the fragment of
//! the redirect, so that it is not sent to the client's server. Everything up to and including
//! the authorization of the redirect uri is reported directly, only a failure to issue the grant
//! is redirected.
use log::debug;
use url::Url;

use crate::primitives::client::{Authenticator, ResponseType, Strategy};
use crate::session::{Backend, SessionStore};

use super::error::{ErrorType, OAuthError};
use super::scope::client_layer;
use super::{append, requested_scope, Encoding, Error, ErrorUrl, Request};

/// Issue a grant and produce the redirect target carrying it.
pub fn implicit<B: Backend>(
    authenticator: &dyn Authenticator, store: &SessionStore<B>, request: &dyn Request,
) -> Result<Url, Error> {
    if !request.valid() {
        return Err(Error::Direct(OAuthError::invalid_request()));
    }

    match request.response_type() {
        Some(ref kind) if kind.parse::<ResponseType>() == Ok(ResponseType::Token) => (),
        _ => {
            debug!("Implicit request with wrong response type");
            return Err(Error::Direct(OAuthError::invalid_request()));
        }
    }

    let redirect_raw = request.redirect_uri().ok_or_else(|| {
        debug!("Implicit request without redirect uri");
        Error::Direct(OAuthError::invalid_request())
    })?;
    let redirect_uri = Url::parse(&redirect_raw).map_err(|_| {
        debug!("Malformed redirect uri {:?}", redirect_raw);
        Error::Direct(OAuthError::invalid_request())
    })?;

    let client_id = request.client_id().unwrap_or_default();
    let client = authenticator.get_client(&client_id).map_err(|err| {
        debug!("Implicit request by unknown client {:?}", client_id);
        Error::Direct(err.or_kind(ErrorType::UnauthorizedClient))
    })?;

    if !client.allow_strategy(Strategy::Implicit) {
        debug!("Client {:?} may not use the implicit grant", client_id);
        return Err(Error::Direct(OAuthError::unauthorized_client()));
    }

    let requested = requested_scope(request).map_err(Error::Direct)?;
    let scope = client_layer(&*client, &requested)
        .map_err(|err| Error::Direct(err.into_error()))?;

    client.authorize_redirect_uri(&redirect_raw).map_err(|err| {
        debug!("Redirect uri {:?} not allowed for {:?}", redirect_raw, client_id);
        Error::Direct(err.or_kind(ErrorType::UnauthorizedClient))
    })?;

    // The redirect uri is trusted from here on.
    let state = request.state();
    let grant = store
        .new_client_grant(client.client_id(), scope)
        .map_err(|err| {
            Error::Redirect(ErrorUrl::new(
                redirect_uri.clone(),
                state.as_deref(),
                Encoding::Fragment,
                err,
            ))
        })?;

    let token = grant.to_bearer();
    let mut pairs = token.to_pairs();
    // Refresh tokens are never exposed to the user agent.
    pairs.retain(|&(key, _)| key != "refresh_token");
    if let Some(state) = state {
        pairs.push(("state", state.into_owned()));
    }
    Ok(append(redirect_uri, Encoding::Fragment, pairs))
}
