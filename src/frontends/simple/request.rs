//! Simple, owning request and response types.
use std::borrow::Cow;

use url::Url;

use crate::endpoint::{Method, NormalizedParameter, QueryParameter, WebRequest, WebResponse};

/// Open and simple implementation of `WebRequest`.
#[derive(Clone, Debug)]
pub struct Request {
    /// The http method.
    pub method: Method,

    /// The key-value pairs in the url query component.
    pub query: NormalizedParameter,

    /// The key-value pairs of a `x-www-form-urlencoded` body.
    pub urlbody: NormalizedParameter,

    /// Provided authorization header.
    pub auth: Option<String>,
}

/// Open and simple implementation of `WebResponse`.
#[derive(Clone, Debug, Default)]
pub struct Response {
    /// HTTP status code.
    pub status: Status,

    /// A location header, for example for redirects.
    pub location: Option<Url>,

    /// Indicates how the client should have authenticated.
    ///
    /// Only set with `Unauthorized` status.
    pub www_authenticate: Option<String>,

    /// Encoded body of the response.
    ///
    /// One variant for each possible encoding type.
    pub body: Option<Body>,
}

/// An enum containing the necessary HTTP status codes.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub enum Status {
    /// Http status code 200.
    Ok,

    /// Http status code 302.
    Redirect,

    /// Http status code 400.
    BadRequest,

    /// Http status code 401.
    Unauthorized,

    /// Http status code 500.
    InternalError,

    /// Http status code 503.
    Unavailable,
}

/// Models the necessary body contents.
///
/// Real HTTP protocols should set a content type header for each of the body variants.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
    /// A pure text body.
    Text(String),

    /// A json encoded body, `application/json`.
    Json(String),
}

/// An uninhabited error type for simple requests and responses.
///
/// Since these types are built to never error on their operation, and `!` is not the stable unique
/// representation for uninhabited types, this simple enum without variants is used instead.
#[derive(Clone, Copy, Debug)]
pub enum NoError {}

impl Request {
    /// A `GET` request with an urlencoded query.
    pub fn get(query: &str) -> Self {
        Request {
            method: Method::Get,
            query: NormalizedParameter::from_urlencoded(query),
            urlbody: NormalizedParameter::new(),
            auth: None,
        }
    }

    /// A `POST` request with an urlencoded form body.
    pub fn post(body: &str) -> Self {
        Request {
            method: Method::Post,
            query: NormalizedParameter::new(),
            urlbody: NormalizedParameter::from_urlencoded(body),
            auth: None,
        }
    }

    /// Replace the query of the request.
    pub fn with_query(mut self, query: &str) -> Self {
        self.query = NormalizedParameter::from_urlencoded(query);
        self
    }

    /// Set the authorization header to the given value.
    pub fn with_auth(mut self, header: &str) -> Self {
        self.auth = Some(header.to_string());
        self
    }

    /// Set a basic authorization header for client credentials.
    pub fn with_basic_auth(self, client_id: &str, secret: &str) -> Self {
        let encoded = base64::encode(format!("{}:{}", client_id, secret));
        self.with_auth(&format!("Basic {}", encoded))
    }

    /// Set a bearer authorization header for an access token.
    pub fn with_bearer(self, token: &str) -> Self {
        self.with_auth(&format!("Bearer {}", token))
    }
}

impl Response {
    /// The json body, if the response has one.
    pub fn json(&self) -> Option<&str> {
        match &self.body {
            Some(Body::Json(json)) => Some(json),
            _ => None,
        }
    }
}

impl WebRequest for Request {
    type Error = NoError;
    type Response = Response;

    fn method(&self) -> Method {
        self.method
    }

    fn query(&mut self) -> Result<Cow<dyn QueryParameter + 'static>, Self::Error> {
        Ok(Cow::Borrowed(&self.query))
    }

    fn urlbody(&mut self) -> Result<Cow<dyn QueryParameter + 'static>, Self::Error> {
        Ok(Cow::Borrowed(&self.urlbody))
    }

    fn authheader(&mut self) -> Result<Option<Cow<str>>, Self::Error> {
        Ok(self.auth.as_ref().map(|string| Cow::Borrowed(string.as_str())))
    }
}

impl Response {
    fn set_status(&mut self, status: Status) {
        self.status = status;
        self.location = None;
        self.www_authenticate = None;
    }
}

impl WebResponse for Response {
    type Error = NoError;

    fn ok(&mut self) -> Result<(), Self::Error> {
        self.set_status(Status::Ok);
        Ok(())
    }

    /// A response which will redirect the user-agent to which the response is issued.
    fn redirect(&mut self, url: Url) -> Result<(), Self::Error> {
        self.set_status(Status::Redirect);
        self.location = Some(url);
        Ok(())
    }

    /// Set the response status to 400.
    fn client_error(&mut self) -> Result<(), Self::Error> {
        self.set_status(Status::BadRequest);
        Ok(())
    }

    /// Set the response status to 401 and add a `WWW-Authenticate` header.
    fn unauthorized(&mut self, header_value: &str) -> Result<(), Self::Error> {
        self.set_status(Status::Unauthorized);
        self.www_authenticate = Some(header_value.to_owned());
        Ok(())
    }

    fn server_error(&mut self) -> Result<(), Self::Error> {
        self.set_status(Status::InternalError);
        Ok(())
    }

    fn unavailable(&mut self) -> Result<(), Self::Error> {
        self.set_status(Status::Unavailable);
        Ok(())
    }

    /// A pure text response with no special media type set.
    fn body_text(&mut self, text: &str) -> Result<(), Self::Error> {
        self.body = Some(Body::Text(text.to_owned()));
        Ok(())
    }

    /// Json repsonse data, with media type `aplication/json.
    fn body_json(&mut self, data: &str) -> Result<(), Self::Error> {
        self.body = Some(Body::Json(data.to_owned()));
        Ok(())
    }
}

impl NoError {
    /// Turn this into any type.
    ///
    /// Since `NoError` is uninhabited, this always works but is never executed.
    pub fn into<T>(self) -> T {
        match self {}
    }
}

impl Default for Status {
    fn default() -> Self {
        Status::Ok
    }
}
