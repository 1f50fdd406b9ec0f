//! Polymorphic HTTP wrappers for the flows.
//!
//! The flows of [`code_grant`] are independent of any web server. This module connects them to
//! requests and responses through the [`WebRequest`] and [`WebResponse`] traits, which a frontend
//! implements for its own types. The [`Server`] routes requests by their `response_type` and
//! `grant_type` parameters to the flows enabled in its [`Registry`], and translates the outcome into
//! status codes, redirects and json bodies.
//!
//! The resource owner is the only party the library can not talk to on its own. At the
//! authorization endpoint a [`ConsentForm`] renders the prompt for consent and credentials, and is
//! asked again when the submitted credentials were rejected.
//!
//! [`code_grant`]: ../code_grant/index.html
//! [`WebRequest`]: trait.WebRequest.html
//! [`WebResponse`]: trait.WebResponse.html
//! [`Server`]: struct.Server.html
//! [`Registry`]: struct.Registry.html
//! [`ConsentForm`]: trait.ConsentForm.html
use std::borrow::Cow;

use url::form_urlencoded;
use url::Url;

use crate::code_grant::authorization::Pending;
use crate::code_grant::error::{ErrorStatus, OAuthError};
use crate::code_grant::Error;
use crate::primitives::scope::Scope;

mod query;
mod registry;
mod request;
mod resource;
mod server;

#[cfg(test)]
mod tests;

pub use self::query::{NormalizedParameter, QueryParameter};
pub use self::registry::Registry;
pub use self::resource::{Handler, Protected};
pub use self::server::Server;

/// The challenge of `401` responses to failed client authentication.
pub(crate) const BASIC_CHALLENGE: &str = "Basic";

/// The http method of a request.
///
/// The authorization endpoint renders the consent form for `GET` and accepts the resource owner's
/// credentials on `POST`. The token endpoint only accepts `POST`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    /// A `GET` request.
    Get,

    /// A `POST` request.
    Post,

    /// Any other method, never accepted.
    Other,
}

/// Abstraction of web requests with several different abstractions and constructors needed by an
/// endpoint. It is assumed to originate from an HTTP request, as defined in the scope of the rfc,
/// but theoretically other requests are possible.
pub trait WebRequest {
    /// The error generated from access of malformed or invalid requests.
    type Error;

    /// The corresponding type of Responses returned from this module.
    type Response: WebResponse<Error = Self::Error>;

    /// The http method of the request.
    fn method(&self) -> Method;

    /// Retrieve a parsed version of the url query.
    ///
    /// An Err return value indicates a malformed query or an otherwise malformed WebRequest. Note
    /// that an empty query should result in `Ok(HashMap::new())` instead of an Err.
    fn query(&mut self) -> Result<Cow<dyn QueryParameter + 'static>, Self::Error>;

    /// Retrieve the parsed `application/x-form-urlencoded` body of the request.
    ///
    /// An Err value / indicates a malformed body or a different Content-Type.
    fn urlbody(&mut self) -> Result<Cow<dyn QueryParameter + 'static>, Self::Error>;

    /// Contents of the authorization header or none if none exists. An Err value indicates a
    /// malformed header or request.
    fn authheader(&mut self) -> Result<Option<Cow<str>>, Self::Error>;
}

/// Response representation into which the Request is transformed by the server.
///
/// At most one of the methods `body_text`, `body_json` will be called. Some flows will
/// however not call any of those methods.
pub trait WebResponse {
    /// The error generated when trying to construct an unhandled or invalid response.
    type Error;

    /// Set the response status to 200.
    fn ok(&mut self) -> Result<(), Self::Error>;

    /// A response which will redirect the user-agent to which the response is issued.
    fn redirect(&mut self, url: Url) -> Result<(), Self::Error>;

    /// Set the response status to 400.
    fn client_error(&mut self) -> Result<(), Self::Error>;

    /// Set the response status to 401 and add a `WWW-Authenticate` header.
    fn unauthorized(&mut self, header_value: &str) -> Result<(), Self::Error>;

    /// Set the response status to 500.
    fn server_error(&mut self) -> Result<(), Self::Error>;

    /// Set the response status to 503.
    fn unavailable(&mut self) -> Result<(), Self::Error>;

    /// A pure text response with no special media type set.
    fn body_text(&mut self, text: &str) -> Result<(), Self::Error>;

    /// Json repsonse data, with media type `aplication/json`.
    fn body_json(&mut self, data: &str) -> Result<(), Self::Error>;
}

/// Everything the resource owner needs to decide on an authorization request.
pub struct Consent<'a> {
    pending: &'a Pending<'a>,
    error: Option<&'a OAuthError>,
}

impl<'a> Consent<'a> {
    pub(crate) fn new(pending: &'a Pending<'a>, error: Option<&'a OAuthError>) -> Self {
        Consent { pending, error }
    }

    /// The client asking for authorization.
    pub fn client_id(&self) -> &str {
        self.pending.client_id()
    }

    /// The scope that would be granted.
    pub fn scope(&self) -> &Scope {
        self.pending.scope()
    }

    /// The redirect uri as given in the request.
    pub fn redirect_uri(&self) -> &str {
        self.pending.redirect_uri()
    }

    /// The query under which the form must be posted back to the authorization endpoint.
    ///
    /// The form body then carries the `username` and `password` of the resource owner.
    pub fn action_query(&self) -> String {
        form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.pending.action_params())
            .finish()
    }

    /// Why previously submitted credentials were rejected.
    ///
    /// A form rendered with an error must respond with status `401`.
    pub fn error(&self) -> Option<&OAuthError> {
        self.error
    }
}

/// Renders the prompt for the resource owner.
///
/// The form is responsible for the complete response, including its status. It is asked on every
/// `GET` of a valid authorization request and whenever submitted credentials were rejected.
pub trait ConsentForm<R: WebRequest> {
    /// Produce the response showing the prompt.
    fn render(&mut self, request: &mut R, consent: &Consent) -> Result<R::Response, R::Error>;
}

impl<R, F> ConsentForm<R> for F
where
    R: WebRequest,
    F: FnMut(&mut R, &Consent) -> Result<R::Response, R::Error>,
{
    fn render(&mut self, request: &mut R, consent: &Consent) -> Result<R::Response, R::Error> {
        self(request, consent)
    }
}

/// A json error response with the status of the error kind.
pub(crate) fn error_response<W>(error: &OAuthError, challenge: &str) -> Result<W, W::Error>
where
    W: WebResponse + Default,
{
    let mut response = W::default();
    match error.kind().status() {
        ErrorStatus::BadRequest => response.client_error()?,
        ErrorStatus::Unauthorized => response.unauthorized(challenge)?,
        ErrorStatus::InternalError => response.server_error()?,
        ErrorStatus::Unavailable => response.unavailable()?,
    }
    response.body_json(&error.to_json())?;
    Ok(response)
}

/// Respond with a redirect to the given target.
pub(crate) fn redirect_response<W>(url: Url) -> Result<W, W::Error>
where
    W: WebResponse + Default,
{
    let mut response = W::default();
    response.redirect(url)?;
    Ok(response)
}

/// Respond to a failed flow in the way the error requires.
pub(crate) fn flow_error_response<W>(error: Error) -> Result<W, W::Error>
where
    W: WebResponse + Default,
{
    match error {
        Error::Direct(err) | Error::Owner(err) => error_response(&err, BASIC_CHALLENGE),
        Error::Redirect(url) => redirect_response(url.into_url()),
    }
}

/// Respond with a json body.
pub(crate) fn json_response<W>(json: &str) -> Result<W, W::Error>
where
    W: WebResponse + Default,
{
    let mut response = W::default();
    response.ok()?;
    response.body_json(json)?;
    Ok(response)
}
