//! Available flow algorithms.
//!
//! The flows codify the requirements of [RFC 6749] into functions over an abstract [`Request`].
//! Their results are abstract as well: a token, a redirect target or an error together with the
//! way it must be communicated. Translating these into http responses is left to [`endpoint`].
//!
//! Every flow is a fixed sequence of checks. The first failing check ends the request, nothing is
//! retried. Flows with a redirect uri distinguish two phases: before the redirect uri has been
//! authorized for the client, failures are reported directly to the user agent, afterwards they
//! are reported to the client by redirecting with the error.
//!
//! [RFC 6749]: https://tools.ietf.org/html/rfc6749
//! [`Request`]: trait.Request.html
//! [`endpoint`]: ../endpoint/index.html
use std::borrow::Cow;
use std::fmt;

use url::form_urlencoded;
use url::Url;

use log::debug;

use crate::primitives::client::{Authenticator, Client, GrantType};
use crate::primitives::scope::Scope;
use crate::primitives::secret::Secret;

pub mod access_token;
pub mod authorization;
pub mod client_credentials;
pub mod error;
pub mod implicit;
pub mod resource;
pub mod resource_owner;
pub mod scope;

use self::error::{ErrorType, OAuthError};

/// The parameters of a request to any of the flows.
///
/// Parameters that are missing or that were given more than once read as `None`.
pub trait Request {
    /// Received request might not be encoded correctly. This method gives implementors the chance
    /// to signal that a request was received but its encoding was generally malformed. If this is
    /// the case, then no other attribute will be queried.
    fn valid(&self) -> bool;

    /// The `response_type` of an authorization request.
    fn response_type(&self) -> Option<Cow<str>>;

    /// The `grant_type` of a token request.
    fn grant_type(&self) -> Option<Cow<str>>;

    /// Identifies the client at the authorization endpoint.
    fn client_id(&self) -> Option<Cow<str>>;

    /// The redirect uri exactly as given in the request.
    fn redirect_uri(&self) -> Option<Cow<str>>;

    /// The requested scope, space separated.
    fn scope(&self) -> Option<Cow<str>>;

    /// Opaque client state, echoed in redirects.
    fn state(&self) -> Option<Cow<str>>;

    /// The authorization code to exchange.
    fn code(&self) -> Option<Cow<str>>;

    /// The resource owner's name.
    fn username(&self) -> Option<Cow<str>>;

    /// The resource owner's password.
    fn password(&self) -> Option<Cow<str>>;

    /// Client id and secret of a basic authorization header.
    fn authorization(&self) -> Option<(Cow<str>, Secret)>;
}

/// An error of a flow with a redirect uri, together with the way it must be reported.
#[derive(Clone, Debug)]
pub enum Error {
    /// The redirect uri is not trusted. Respond directly to the user agent.
    Direct(OAuthError),

    /// The redirect uri is trusted. Redirect the user agent back to the client with the error.
    Redirect(ErrorUrl),

    /// The resource owner failed to authenticate. Show the error to the resource owner, without
    /// involving the client.
    Owner(OAuthError),
}

/// Where the parameters of a redirect are placed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Encoding {
    /// In the query, for the authorization code grant.
    Query,

    /// In the fragment, for the implicit grant.
    Fragment,
}

/// Encapsulates a redirect to a valid redirect_uri with an error response.
#[derive(Clone)]
pub struct ErrorUrl {
    base_uri: Url,
    state: Option<String>,
    encoding: Encoding,
    error: OAuthError,
}

impl ErrorUrl {
    /// Construct a new error, already fixing the state parameter if it exists.
    pub fn new(base_uri: Url, state: Option<&str>, encoding: Encoding, error: OAuthError) -> Self {
        ErrorUrl {
            base_uri,
            state: state.map(str::to_string),
            encoding,
            error,
        }
    }

    /// The error the client will receive.
    pub fn error(&self) -> &OAuthError {
        &self.error
    }

    /// The full redirect target.
    pub fn into_url(self) -> Url {
        let mut pairs: Vec<(&str, Cow<str>)> = self.error.iter().collect();
        if let Some(state) = &self.state {
            pairs.push(("state", Cow::Borrowed(state.as_str())));
        }
        append(self.base_uri.clone(), self.encoding, pairs)
    }
}

impl fmt::Debug for ErrorUrl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("ErrorUrl")
            .field("base_uri", &self.base_uri.as_str())
            .field("encoding", &self.encoding)
            .field("error", &self.error)
            .finish()
    }
}

/// Append parameters to a redirect target.
pub(crate) fn append<'a, I, V>(mut url: Url, encoding: Encoding, pairs: I) -> Url
where
    I: IntoIterator<Item = (&'a str, V)>,
    V: AsRef<str>,
{
    match encoding {
        Encoding::Query => {
            url.query_pairs_mut().extend_pairs(pairs);
        }
        Encoding::Fragment => {
            let mut fragment = form_urlencoded::Serializer::new(String::new());
            fragment.extend_pairs(pairs);
            url.set_fragment(Some(&fragment.finish()));
        }
    }
    url
}

/// The requested scope. Missing means empty, a malformed scope is `invalid_scope`.
pub(crate) fn requested_scope(request: &dyn Request) -> Result<Scope, OAuthError> {
    match request.scope() {
        None => Ok(Scope::empty()),
        Some(scope) => scope.parse().map_err(|_| OAuthError::invalid_scope()),
    }
}

/// Authenticate the client with the credentials of the basic authorization header.
///
/// Missing credentials are `access_denied`, wrong ones `unauthorized_client`.
pub(crate) fn authenticate_client<'a>(
    authenticator: &'a dyn Authenticator, request: &dyn Request,
) -> Result<Box<dyn Client + 'a>, OAuthError> {
    let (client_id, secret) = request.authorization().ok_or_else(|| {
        debug!("Token request without client credentials");
        OAuthError::access_denied()
    })?;

    authenticator
        .get_client_with_secret(&client_id, &secret)
        .map_err(|err| {
            debug!("Client {:?} failed to authenticate", client_id);
            err.or_kind(ErrorType::UnauthorizedClient)
        })
}

/// Check the `grant_type` parameter of a token request.
pub(crate) fn expect_grant_type(request: &dyn Request, expected: GrantType) -> Result<(), OAuthError> {
    match request.grant_type() {
        Some(ref grant_type) if grant_type.as_ref() == expected.as_str() => Ok(()),
        _ => {
            debug!("Token request is not for {}", expected.as_str());
            Err(OAuthError::invalid_request())
        }
    }
}
