use std::borrow::Cow;
use std::collections::HashMap;

use url::Url;

use crate::code_grant::error::ErrorType;
use crate::endpoint::*;
use crate::primitives::client::Strategy;
use crate::primitives::registrar::{ClientMap, RegisteredClient};
use crate::session::tests::CountingGenerator;
use crate::session::{MemoryBackend, SessionStore};

use self::defaults::*;

/// Open and simple implementation of `WebRequest`.
#[derive(Clone, Debug)]
struct CraftedRequest {
    /// The http method.
    pub method: Method,

    /// The key-value pairs in the url query component.
    pub query: Option<HashMap<String, Vec<String>>>,

    /// The key-value pairs of a `x-www-form-urlencoded` body.
    pub urlbody: Option<HashMap<String, Vec<String>>>,

    /// Provided authorization header.
    pub auth: Option<String>,
}

/// Open and simple implementation of `WebResponse`.
#[derive(Debug, Default)]
struct CraftedResponse {
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
enum Status {
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
enum Body {
    /// A pure text body.
    Text(String),

    /// A json encoded body, `application/json`.
    Json(String),
}

#[derive(Debug)]
enum CraftedError {
    Crafted,
}

impl WebRequest for CraftedRequest {
    type Response = CraftedResponse;
    type Error = CraftedError;

    fn method(&self) -> Method {
        self.method
    }

    fn query(&mut self) -> Result<Cow<dyn QueryParameter + 'static>, Self::Error> {
        self.query
            .as_ref()
            .map(|hm| Cow::Borrowed(hm as &dyn QueryParameter))
            .ok_or(CraftedError::Crafted)
    }

    fn urlbody(&mut self) -> Result<Cow<dyn QueryParameter + 'static>, Self::Error> {
        self.urlbody
            .as_ref()
            .map(|hm| Cow::Borrowed(hm as &dyn QueryParameter))
            .ok_or(CraftedError::Crafted)
    }

    fn authheader(&mut self) -> Result<Option<Cow<str>>, Self::Error> {
        Ok(self.auth.as_ref().map(|bearer| bearer.as_str().into()))
    }
}

impl WebResponse for CraftedResponse {
    type Error = CraftedError;

    fn ok(&mut self) -> Result<(), Self::Error> {
        self.status = Status::Ok;
        self.location = None;
        self.www_authenticate = None;
        Ok(())
    }

    /// A response which will redirect the user-agent to which the response is issued.
    fn redirect(&mut self, url: Url) -> Result<(), Self::Error> {
        self.status = Status::Redirect;
        self.location = Some(url);
        self.www_authenticate = None;
        Ok(())
    }

    /// Set the response status to 400.
    fn client_error(&mut self) -> Result<(), Self::Error> {
        self.status = Status::BadRequest;
        self.location = None;
        self.www_authenticate = None;
        Ok(())
    }

    /// Set the response status to 401 and add a `WWW-Authenticate` header.
    fn unauthorized(&mut self, header_value: &str) -> Result<(), Self::Error> {
        self.status = Status::Unauthorized;
        self.location = None;
        self.www_authenticate = Some(header_value.to_owned());
        Ok(())
    }

    fn server_error(&mut self) -> Result<(), Self::Error> {
        self.status = Status::InternalError;
        self.location = None;
        self.www_authenticate = None;
        Ok(())
    }

    fn unavailable(&mut self) -> Result<(), Self::Error> {
        self.status = Status::Unavailable;
        self.location = None;
        self.www_authenticate = None;
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

impl Default for Status {
    fn default() -> Self {
        Status::Ok
    }
}

impl CraftedRequest {
    fn get(query: &[(&str, &str)]) -> Self {
        CraftedRequest {
            method: Method::Get,
            query: Some(query.iter().to_single_value_query()),
            urlbody: None,
            auth: None,
        }
    }

    fn post(query: &[(&str, &str)], body: &[(&str, &str)]) -> Self {
        CraftedRequest {
            method: Method::Post,
            query: Some(query.iter().to_single_value_query()),
            urlbody: Some(body.iter().to_single_value_query()),
            auth: None,
        }
    }

    /// A request to the token endpoint.
    fn token(body: &[(&str, &str)]) -> Self {
        CraftedRequest::post(&[], body)
    }

    fn with_auth(mut self, header: &str) -> Self {
        self.auth = Some(header.to_string());
        self
    }

    fn with_basic(self, client_id: &str, secret: &str) -> Self {
        let encoded = base64::encode(&format!("{}:{}", client_id, secret));
        self.with_auth(&format!("Basic {}", encoded))
    }
}

impl CraftedResponse {
    fn json(&self) -> serde_json::Value {
        match &self.body {
            Some(Body::Json(json)) => serde_json::from_str(json).expect("Response body is json"),
            other => panic!("Expected a json body, got {:?}", other),
        }
    }

    fn error_code(&self) -> String {
        self.json()["code"]
            .as_str()
            .expect("Error body has a code")
            .to_string()
    }

    fn assert_error(&self, status: Status, kind: ErrorType) {
        assert_eq!(self.status, status, "Unexpected response {:?}", self);
        assert_eq!(self.error_code(), kind.code());
        assert!(self.location.is_none());
    }

    /// The parameters of the redirect location.
    fn query_pairs(&self) -> HashMap<String, String> {
        let location = self.location.as_ref().expect("Response redirects");
        location.query_pairs().into_owned().collect()
    }

    /// The parameters in the fragment of the redirect location.
    fn fragment_pairs(&self) -> HashMap<String, String> {
        let location = self.location.as_ref().expect("Response redirects");
        let fragment = location.fragment().expect("Redirect has a fragment");
        url::form_urlencoded::parse(fragment.as_bytes())
            .into_owned()
            .collect()
    }
}

trait ToSingleValueQuery {
    fn to_single_value_query(self) -> HashMap<String, Vec<String>>;
}

impl<'r, I, K, V> ToSingleValueQuery for I
where
    I: Iterator<Item = &'r (K, V)>,
    K: AsRef<str> + 'r,
    V: AsRef<str> + 'r,
{
    fn to_single_value_query(self) -> HashMap<String, Vec<String>> {
        self.map(|&(ref k, ref v)| (k.as_ref().to_string(), vec![v.as_ref().to_string()]))
            .collect()
    }
}

/// Consent form recording every prompt it renders.
#[derive(Default)]
struct TestForm {
    rendered: Vec<Rendered>,
}

struct Rendered {
    client_id: String,
    scope: String,
    action: String,
    error: Option<ErrorType>,
}

impl ConsentForm<CraftedRequest> for TestForm {
    fn render(
        &mut self, _: &mut CraftedRequest, consent: &Consent,
    ) -> Result<CraftedResponse, CraftedError> {
        let mut response = CraftedResponse::default();
        match consent.error() {
            None => response.ok()?,
            Some(_) => response.unauthorized("Login")?,
        }
        response.body_text(&consent.action_query())?;

        self.rendered.push(Rendered {
            client_id: consent.client_id().to_string(),
            scope: consent.scope().to_string(),
            action: consent.action_query(),
            error: consent.error().map(|err| err.kind()),
        });
        Ok(response)
    }
}

pub mod defaults {
    pub const EXAMPLE_CLIENT_ID: &str = "ClientId";
    pub const EXAMPLE_PUBLIC_ID: &str = "PublicClient";
    pub const EXAMPLE_OTHER_ID: &str = "OtherClient";
    pub const EXAMPLE_RESTRICTED_ID: &str = "RestrictedClient";
    pub const EXAMPLE_OWNER_ID: &str = "Owner";
    pub const EXAMPLE_OWNER_PASSWORD: &str = "hunter2";
    pub const EXAMPLE_PASSPHRASE: &str = "VGhpcyBpcyBhIHZlcnkgc2VjdXJlIHBhc3NwaHJhc2UK";
    pub const EXAMPLE_REDIRECT_URI: &str = "https://client.example/endpoint";
    pub const EXAMPLE_SCOPE: &str = "example default";
}

fn clients() -> ClientMap {
    let scope = EXAMPLE_SCOPE.parse().unwrap();
    let mut clients = ClientMap::new();
    clients.register_client(
        RegisteredClient::confidential(EXAMPLE_CLIENT_ID, EXAMPLE_PASSPHRASE, scope)
            .with_redirect_uri(EXAMPLE_REDIRECT_URI),
    );
    clients.register_client(
        RegisteredClient::public(EXAMPLE_PUBLIC_ID, EXAMPLE_SCOPE.parse().unwrap())
            .with_redirect_uri(EXAMPLE_REDIRECT_URI),
    );
    clients.register_client(
        RegisteredClient::confidential(EXAMPLE_OTHER_ID, EXAMPLE_PASSPHRASE, EXAMPLE_SCOPE.parse().unwrap())
            .with_redirect_uri(EXAMPLE_REDIRECT_URI),
    );
    clients.register_client(
        RegisteredClient::confidential(EXAMPLE_RESTRICTED_ID, EXAMPLE_PASSPHRASE, EXAMPLE_SCOPE.parse().unwrap())
            .with_redirect_uri(EXAMPLE_REDIRECT_URI)
            .with_owner("SomeoneElse")
            .with_strategies(&[Strategy::ClientCredentials, Strategy::ResourceOwnerPasswordCredentials]),
    );
    clients.register_owner(EXAMPLE_OWNER_ID, EXAMPLE_OWNER_PASSWORD);
    clients
}

fn store() -> SessionStore<MemoryBackend> {
    SessionStore::new(MemoryBackend::new()).with_generator(CountingGenerator::default())
}

fn server() -> Server<ClientMap, MemoryBackend> {
    Server::new(clients(), store())
}

mod resource;
