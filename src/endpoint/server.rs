use log::debug;

use crate::code_grant::access_token::access_token;
use crate::code_grant::authorization::authorization_code;
use crate::code_grant::client_credentials::client_credentials;
use crate::code_grant::error::OAuthError;
use crate::code_grant::implicit::implicit;
use crate::code_grant::resource::{protect_with, ResourceError};
use crate::code_grant::resource_owner::resource_owner;
use crate::code_grant::{Error, Request};
use crate::primitives::client::{Authenticator, Strategy};
use crate::primitives::grant::{BearerToken, Grant, TokenType};
use crate::primitives::scope::Scope;
use crate::session::{Backend, SessionStore};

use super::request::WrappedRequest;
use super::resource::Protected;
use super::{
    error_response, flow_error_response, json_response, redirect_response, Consent, ConsentForm,
    Method, Registry, WebRequest, WebResponse, BASIC_CHALLENGE,
};

/// An authorization server: clients, a session store and the flows offered to them.
///
/// The server is immutable while serving. All state changes happen inside the session store, so
/// a server can be shared by reference between threads when its parts are `Sync`.
///
/// The endpoint methods `authorize` and `token` select the flow from the request. The per-flow
/// methods run a single flow directly, regardless of the registry.
pub struct Server<A, B> {
    authenticator: A,
    store: SessionStore<B>,
    registry: Registry,
}

impl<A: Authenticator, B: Backend> Server<A, B> {
    /// A server offering all four flows.
    pub fn new(authenticator: A, store: SessionStore<B>) -> Self {
        Server {
            authenticator,
            store,
            registry: Registry::standard(),
        }
    }

    /// Replace the offered flows.
    pub fn with_registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// The offered flows.
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// The session store holding codes and grants.
    pub fn store(&self) -> &SessionStore<B> {
        &self.store
    }

    /// The clients and resource owners.
    pub fn authenticator(&self) -> &A {
        &self.authenticator
    }

    /// The authorization endpoint, selecting a flow by `response_type`.
    pub fn authorize<R, F>(&self, mut request: R, form: &mut F) -> Result<R::Response, R::Error>
    where
        R: WebRequest,
        R::Response: Default,
        F: ConsentForm<R>,
    {
        let strategy = WrappedRequest::authorization(&mut request)
            .response_type()
            .and_then(|response_type| self.registry.authorize_strategy(&response_type));

        match strategy {
            Some(Strategy::AuthorizationCode) => self.authorization_code(request, form),
            Some(Strategy::Implicit) => self.implicit(request),
            _ => error_response(&OAuthError::invalid_request(), BASIC_CHALLENGE),
        }
    }

    /// The token endpoint, selecting a flow by `grant_type`.
    pub fn token<R>(&self, mut request: R) -> Result<R::Response, R::Error>
    where
        R: WebRequest,
        R::Response: Default,
    {
        let strategy = WrappedRequest::token(&mut request)
            .grant_type()
            .and_then(|grant_type| self.registry.token_strategy(&grant_type));

        match strategy {
            Some(Strategy::AuthorizationCode) => self.access_token(request),
            Some(Strategy::ClientCredentials) => self.client_credentials(request),
            Some(Strategy::ResourceOwnerPasswordCredentials) => self.resource_owner(request),
            _ => error_response(&OAuthError::invalid_request(), BASIC_CHALLENGE),
        }
    }

    /// Ask for consent on `GET`, issue an authorization code on `POST`.
    ///
    /// Rejected resource owner credentials are shown in the consent form again instead of being
    /// redirected to the client.
    pub fn authorization_code<R, F>(&self, mut request: R, form: &mut F) -> Result<R::Response, R::Error>
    where
        R: WebRequest,
        R::Response: Default,
        F: ConsentForm<R>,
    {
        let method = request.method();
        if method == Method::Other {
            debug!("Authorization request with unsupported method");
            return error_response(&OAuthError::invalid_request(), BASIC_CHALLENGE);
        }

        let wrapped = WrappedRequest::authorization(&mut request);
        let pending = match authorization_code(&self.authenticator, &wrapped) {
            Ok(pending) => pending,
            Err(err) => return flow_error_response(err),
        };

        if method == Method::Get {
            return form.render(&mut request, &Consent::new(&pending, None));
        }

        let username = wrapped.username();
        let password = wrapped.password();
        match pending.authorize(&self.store, username.as_deref(), password.as_deref()) {
            Ok(url) => redirect_response(url),
            Err(Error::Owner(err)) => form.render(&mut request, &Consent::new(&pending, Some(&err))),
            Err(err) => flow_error_response(err),
        }
    }

    /// Issue a token directly in the fragment of the redirect.
    pub fn implicit<R>(&self, mut request: R) -> Result<R::Response, R::Error>
    where
        R: WebRequest,
        R::Response: Default,
    {
        let wrapped = WrappedRequest::authorization(&mut request);
        match implicit(&self.authenticator, &self.store, &wrapped) {
            Ok(url) => redirect_response(url),
            Err(err) => flow_error_response(err),
        }
    }

    /// Exchange an authorization code for a token.
    pub fn access_token<R>(&self, mut request: R) -> Result<R::Response, R::Error>
    where
        R: WebRequest,
        R::Response: Default,
    {
        let wrapped = WrappedRequest::token(&mut request);
        token_response(access_token(&self.authenticator, &self.store, &wrapped))
    }

    /// Issue a token to a client on its own behalf.
    pub fn client_credentials<R>(&self, mut request: R) -> Result<R::Response, R::Error>
    where
        R: WebRequest,
        R::Response: Default,
    {
        let wrapped = WrappedRequest::token(&mut request);
        token_response(client_credentials(&self.authenticator, &self.store, &wrapped))
    }

    /// Issue a token for the credentials of a resource owner.
    pub fn resource_owner<R>(&self, mut request: R) -> Result<R::Response, R::Error>
    where
        R: WebRequest,
        R::Response: Default,
    {
        let wrapped = WrappedRequest::token(&mut request);
        token_response(resource_owner(&self.authenticator, &self.store, &wrapped))
    }

    /// Check the bearer token of a request against the required scope.
    ///
    /// Errors of the request itself are propagated, a rejected token is reported as
    /// `Ok(Err(_))`.
    pub fn verify<R: WebRequest>(
        &self, request: &mut R, required: &Scope,
    ) -> Result<Result<Grant, ResourceError>, R::Error> {
        self.verify_with(TokenType::Bearer, request, required)
    }

    /// Like `verify`, for a specific token type.
    pub fn verify_with<R: WebRequest>(
        &self, token_type: TokenType, request: &mut R, required: &Scope,
    ) -> Result<Result<Grant, ResourceError>, R::Error> {
        let header = request.authheader()?;
        Ok(protect_with(
            token_type,
            &self.authenticator,
            &self.store,
            header.as_deref(),
            required,
        ))
    }

    /// Guard a handler with the bearer gate.
    ///
    /// The handler is only invoked for requests with a live bearer token whose grant covers the
    /// required scope. An empty scope only requires a live token.
    pub fn secure<H>(&self, required: Scope, handler: H) -> Protected<'_, A, B, H> {
        Protected::new(self, TokenType::Bearer, required, handler)
    }

    /// Guard a handler, expecting a specific token type.
    pub fn secure_with<H>(&self, token_type: TokenType, required: Scope, handler: H) -> Protected<'_, A, B, H> {
        Protected::new(self, token_type, required, handler)
    }
}

fn token_response<W>(issued: Result<BearerToken, OAuthError>) -> Result<W, W::Error>
where
    W: WebResponse + Default,
{
    match issued {
        Ok(token) => json_response(&token.to_json()),
        Err(err) => error_response(&err, BASIC_CHALLENGE),
    }
}
