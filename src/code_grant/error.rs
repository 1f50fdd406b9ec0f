//! Errors defined in [rfc6749].
//!
//! All flows share a single, closed set of error kinds. Each kind has a fixed machine readable
//! code, a default human readable description and the http status of a direct error response.
//!
//! [rfc6749]: https://tools.ietf.org/html/rfc6749#section-4.1.2.1
use std::borrow::Cow;
use std::{error, fmt, vec};

use serde::ser::{Serialize, SerializeStruct, Serializer};

/// Error codes returned from any of the flows.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorType {
    /// The request is missing a required parameter, includes an invalid parameter value, includes
    /// a parameter more than once, or is otherwise malformed.
    InvalidRequest,

    /// The client is not authorized to request an authorization code using this method.
    UnauthorizedClient,

    /// The resource owner or authorization server denied the request.
    AccessDenied,

    /// The authorization server does not support obtaining an authorization code using this method.
    UnsupportedResponseType,

    /// The requested scope is invalid, unknown, or malformed.
    InvalidScope,

    /// The authorization server encountered an unexpected condition that prevented it from
    /// fulfilling the request.
    ServerError,

    /// The authorization server is currently unable to handle the request due to a temporary
    /// overloading or maintenance of the server.
    ///
    /// No flow raises this on its own. It is reserved for back-ends and collaborators signalling
    /// overload.
    TemporarilyUnavailable,
}

/// The http status of a direct error response.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum ErrorStatus {
    /// Http status code 400.
    BadRequest,

    /// Http status code 401.
    Unauthorized,

    /// Http status code 500.
    InternalError,

    /// Http status code 503.
    Unavailable,
}

impl ErrorType {
    /// The error code as it appears on the wire.
    pub fn code(self) -> &'static str {
        match self {
            ErrorType::InvalidRequest => "invalid_request",
            ErrorType::UnauthorizedClient => "unauthorized_client",
            ErrorType::AccessDenied => "access_denied",
            ErrorType::UnsupportedResponseType => "unsupported_response_type",
            ErrorType::InvalidScope => "invalid_scope",
            ErrorType::ServerError => "server_error",
            ErrorType::TemporarilyUnavailable => "temporarily_unavailable",
        }
    }

    /// The default human readable explanation.
    pub fn description(self) -> &'static str {
        match self {
            ErrorType::InvalidRequest => "The request is missing a required parameter, includes an invalid parameter value, includes a parameter more than once, or is otherwise malformed.",
            ErrorType::UnauthorizedClient => "The client is not authorized to request an authorization code using this method.",
            ErrorType::AccessDenied => "The resource owner or authorization server denied the request.",
            ErrorType::UnsupportedResponseType => "The authorization server does not support obtaining an authorization code using this method.",
            ErrorType::InvalidScope => "The requested scope is invalid, unknown, or malformed.",
            ErrorType::ServerError => "The authorization server encountered an unexpected condition that prevented it from fulfilling the request.",
            ErrorType::TemporarilyUnavailable => "The authorization server is currently unable to handle the request due to a temporary overloading or maintenance of the server.",
        }
    }

    /// Status of a direct response carrying this error.
    pub fn status(self) -> ErrorStatus {
        match self {
            ErrorType::InvalidRequest => ErrorStatus::BadRequest,
            ErrorType::UnauthorizedClient => ErrorStatus::Unauthorized,
            ErrorType::AccessDenied => ErrorStatus::Unauthorized,
            ErrorType::UnsupportedResponseType => ErrorStatus::BadRequest,
            ErrorType::InvalidScope => ErrorStatus::BadRequest,
            ErrorType::ServerError => ErrorStatus::InternalError,
            ErrorType::TemporarilyUnavailable => ErrorStatus::Unavailable,
        }
    }

    /// Errors caused by the server itself rather than by the request.
    pub fn is_internal(self) -> bool {
        match self {
            ErrorType::ServerError | ErrorType::TemporarilyUnavailable => true,
            _ => false,
        }
    }
}

/// An error with its kind and a description.
///
/// Serializes as the json object `{"code": .., "description": ..}` of direct error responses. In
/// redirects the same information is carried by the `error` and `error_description` parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct OAuthError {
    error: ErrorType,
    description: Cow<'static, str>,
}

impl OAuthError {
    /// An error with the default description of its kind.
    pub fn new(error: ErrorType) -> Self {
        OAuthError {
            error,
            description: Cow::Borrowed(error.description()),
        }
    }

    /// Shorthand for an `invalid_request` error.
    pub fn invalid_request() -> Self {
        OAuthError::new(ErrorType::InvalidRequest)
    }

    /// Shorthand for an `access_denied` error.
    pub fn access_denied() -> Self {
        OAuthError::new(ErrorType::AccessDenied)
    }

    /// Shorthand for an `unauthorized_client` error.
    pub fn unauthorized_client() -> Self {
        OAuthError::new(ErrorType::UnauthorizedClient)
    }

    /// Shorthand for an `invalid_scope` error.
    pub fn invalid_scope() -> Self {
        OAuthError::new(ErrorType::InvalidScope)
    }

    /// Shorthand for a `server_error`.
    pub fn server_error() -> Self {
        OAuthError::new(ErrorType::ServerError)
    }

    /// Get the formal kind of error.
    pub fn kind(&self) -> ErrorType {
        self.error
    }

    /// The human readable explanation.
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Replace the description with a more specific text.
    pub fn explain<D: Into<Cow<'static, str>>>(mut self, description: D) -> Self {
        self.description = description.into();
        self
    }

    /// Reinterpret a collaborator's rejection as the error of the failing check.
    ///
    /// Internal errors are kept as they are, so that a failing storage or lookup service does not
    /// turn into a denial.
    pub fn or_kind(self, kind: ErrorType) -> Self {
        if self.error.is_internal() {
            self
        } else {
            OAuthError::new(kind)
        }
    }

    /// Serialize as the json body of a direct error response.
    pub fn to_json(&self) -> String {
        // Only strings, serialization can not fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Iterate over the key value pairs that describe this error.
    ///
    /// These pairs appear as part of a form urlencoded query or fragment component in the
    /// `Location` header of a redirect.
    pub fn iter(&self) -> <&Self as IntoIterator>::IntoIter {
        self.into_iter()
    }
}

impl From<ErrorType> for OAuthError {
    fn from(error: ErrorType) -> Self {
        OAuthError::new(error)
    }
}

impl fmt::Display for OAuthError {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        write!(fmt, "{}: {}", self.error.code(), self.description)
    }
}

impl error::Error for OAuthError {}

impl Serialize for OAuthError {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut state = serializer.serialize_struct("OAuthError", 2)?;
        state.serialize_field("code", self.error.code())?;
        state.serialize_field("description", &self.description)?;
        state.end()
    }
}

impl<'a> IntoIterator for &'a OAuthError {
    type Item = (&'static str, Cow<'a, str>);
    type IntoIter = vec::IntoIter<(&'static str, Cow<'a, str>)>;

    fn into_iter(self) -> Self::IntoIter {
        vec![
            ("error", Cow::Borrowed(self.error.code())),
            ("error_description", Cow::Borrowed(self.description.as_ref())),
        ]
        .into_iter()
    }
}
