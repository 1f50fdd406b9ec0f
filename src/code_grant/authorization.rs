//! Provides the handling for Authorization Code Requests, the first phase of the grant.
//!
//! The request is validated up to the scope negotiation with the client, which yields a
//! [`Pending`] authorization. The resource owner is then asked for consent and credentials, and
//! [`Pending::authorize`] issues the code once those have been verified.
//!
//! [`Pending`]: struct.Pending.html
//! [`Pending::authorize`]: struct.Pending.html#method.authorize
use std::fmt;

use log::debug;
use url::Url;

use crate::primitives::client::{Authenticator, Client, ResponseType, Strategy};
use crate::primitives::scope::Scope;
use crate::primitives::secret::Secret;
use crate::session::{Backend, SessionStore};

use super::error::{ErrorType, OAuthError};
use super::scope::{client_layer, owner_layer, ResourceOwner, ScopeError};
use super::{append, requested_scope, Encoding, Error, ErrorUrl, Request};

/// An authorization request which is waiting for the resource owner.
pub struct Pending<'a> {
    client: Box<dyn Client + 'a>,
    authenticator: &'a dyn Authenticator,
    redirect_raw: String,
    redirect_uri: Url,
    scope: Scope,
    state: Option<String>,
}

/// Retrieve allowed scope and redirect url from the client.
///
/// Checks the client, its eligibility for this flow and the redirect uri before anything is
/// reported through a redirect. Once the redirect uri is authorized for the client, the response
/// type and the scope are checked with errors being redirected.
pub fn authorization_code<'a>(
    authenticator: &'a dyn Authenticator, request: &dyn Request,
) -> Result<Pending<'a>, Error> {
    if !request.valid() {
        debug!("Authorization request is malformed");
        return Err(Error::Direct(OAuthError::invalid_request()));
    }

    let client_id = request.client_id().unwrap_or_default();
    let client = authenticator.get_client(&client_id).map_err(|err| {
        debug!("Authorization request by unknown client {:?}", client_id);
        Error::Direct(err.or_kind(ErrorType::UnauthorizedClient))
    })?;

    if !client.allow_strategy(Strategy::AuthorizationCode) {
        debug!("Client {:?} may not use the authorization code grant", client_id);
        return Err(Error::Direct(OAuthError::unauthorized_client()));
    }

    let redirect_raw = match request.redirect_uri() {
        Some(uri) => uri.into_owned(),
        None => {
            debug!("Authorization request without redirect uri");
            return Err(Error::Direct(OAuthError::invalid_request()));
        }
    };
    let redirect_uri = Url::parse(&redirect_raw).map_err(|_| {
        debug!("Malformed redirect uri {:?}", redirect_raw);
        Error::Direct(OAuthError::invalid_request())
    })?;

    client.authorize_redirect_uri(&redirect_raw).map_err(|err| {
        debug!("Redirect uri {:?} not allowed for {:?}", redirect_raw, client_id);
        Error::Direct(err.or_kind(ErrorType::UnauthorizedClient))
    })?;

    // The redirect uri is trusted from here on.
    let state = request.state().map(|state| state.into_owned());
    let redirect_error = |error: OAuthError| {
        Error::Redirect(ErrorUrl::new(
            redirect_uri.clone(),
            state.as_ref().map(String::as_str),
            Encoding::Query,
            error,
        ))
    };

    match request.response_type() {
        Some(ref kind) if kind.parse::<ResponseType>() == Ok(ResponseType::Code) => (),
        _ => {
            debug!("Authorization request with unsupported response type");
            return Err(redirect_error(OAuthError::new(ErrorType::UnsupportedResponseType)));
        }
    }

    let requested = requested_scope(request).map_err(redirect_error)?;
    let scope = client_layer(&*client, &requested)
        .map_err(|err| redirect_error(err.into_error()))?;

    Ok(Pending {
        client,
        authenticator,
        redirect_raw,
        redirect_uri,
        scope,
        state,
    })
}

impl<'a> Pending<'a> {
    /// The client requesting authorization.
    pub fn client_id(&self) -> &str {
        self.client.client_id()
    }

    /// The scope the client may receive, to be approved by the resource owner.
    pub fn scope(&self) -> &Scope {
        &self.scope
    }

    /// The redirect uri as given in the request.
    pub fn redirect_uri(&self) -> &str {
        &self.redirect_raw
    }

    /// The state given by the client.
    pub fn state(&self) -> Option<&str> {
        self.state.as_ref().map(String::as_str)
    }

    /// The parameters under which the consent form must be submitted again.
    pub fn action_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("response_type", ResponseType::Code.as_str().to_string()),
            ("client_id", self.client_id().to_string()),
            ("redirect_uri", self.redirect_raw.clone()),
            ("scope", self.scope.to_string()),
        ];
        if let Some(state) = &self.state {
            params.push(("state", state.clone()));
        }
        params
    }

    /// Redirect to the client, reporting an error.
    pub fn deny(&self, error: OAuthError) -> ErrorUrl {
        ErrorUrl::new(
            self.redirect_uri.clone(),
            self.state(),
            Encoding::Query,
            error,
        )
    }

    /// Verify the resource owner and issue a code for the approved scope.
    ///
    /// Credential failures are reported to the resource owner, who may try again. Failing to store
    /// the code is redirected to the client. On success, the result is the redirect target
    /// carrying the code and state.
    pub fn authorize<B: Backend>(
        &self, store: &SessionStore<B>, username: Option<&str>, password: Option<&str>,
    ) -> Result<Url, Error> {
        let username = match username {
            Some(username) if !username.is_empty() => username,
            _ => {
                debug!("Consent submitted without a username");
                return Err(Error::Owner(OAuthError::access_denied()));
            }
        };

        if let Err(err) = self.client.authorize_resource_owner(username) {
            debug!("Client {:?} may not act for {:?}", self.client_id(), username);
            return Err(Error::Owner(err.or_kind(ErrorType::UnauthorizedClient)));
        }

        let password = match password {
            Some(password) => Secret::new(password),
            None => {
                debug!("Consent submitted without a password");
                return Err(Error::Owner(OAuthError::access_denied()));
            }
        };

        let owner = ResourceOwner {
            authenticator: self.authenticator,
            username,
            password: &password,
        };
        let scope = match owner_layer(&owner, &self.scope) {
            Ok(scope) => scope,
            Err(ScopeError::ResourceOwner(err)) => {
                debug!("Resource owner {:?} failed to authenticate", username);
                let err = err.or_kind(ErrorType::AccessDenied);
                return Err(Error::Owner(if err.kind() == ErrorType::AccessDenied {
                    err.explain("username or password invalid")
                } else {
                    err
                }));
            }
            Err(other) => return Err(Error::Owner(other.into_error())),
        };

        let code = store
            .new_authorization_code(self.client_id(), &self.redirect_raw, scope)
            .map_err(|err| Error::Redirect(self.deny(err)))?;

        let mut params = vec![("code", code.code.raw())];
        if let Some(state) = self.state() {
            params.push(("state", state));
        }
        Ok(append(self.redirect_uri.clone(), Encoding::Query, params))
    }
}

impl<'a> fmt::Debug for Pending<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Pending")
            .field("client_id", &self.client_id())
            .field("redirect_uri", &self.redirect_raw)
            .field("scope", &self.scope)
            .field("state", &self.state)
            .finish()
    }
}
