//! A base for implementing front-ends.
//!
//! Front-ends are glue adapters from http server crates to the [`Server`] of this crate. Routing
//! is left to the web server: it only needs to pass requests for the authorization endpoint to
//! [`Server::authorize`], those for the token endpoint to [`Server::token`], and to wrap protected
//! handlers with [`Server::secure`].
//!
//! ## Guide to implementing a custom front-end
//!
//! All front-end implementations start with two closely related traits: [`WebRequest`] and
//! [`WebResponse`]. As an example, let's pretend that the web interface consists of the following
//! types and implement the traits for them:
//!
//! ```
//! use oxide_auth_session::frontends::dev::*;
//!
//! struct ExampleRequest {
//!     /// Whether the request was a `POST`.
//!     post: bool,
//!
//!     /// The query part of the retrieved uri, conveniently pre-parsed.
//!     query: NormalizedParameter,
//!
//!     /// The value of the authorization header if any was set.
//!     authorization_header: Option<String>,
//!
//!     /// The body of the request, only if its content type was `application/x-form-urlencoded`
//!     urlbody: Option<NormalizedParameter>,
//! }
//!
//! #[derive(Default)]
//! struct ExampleResponse {
//!     /// The http status code, 200 for OK
//!     status: u16,
//!
//!     /// The Content or MIME type of the body
//!     content_type: Option<String>,
//!
//!     /// The value of the `WWW-Authenticate` header if any
//!     www_authenticate: Option<String>,
//!
//!     /// The value of the `Location` header if any
//!     location: Option<String>,
//!
//!     /// The body sent
//!     body: Option<String>,
//! }
//!
//! /// Our request can only fail on a missing body.
//! struct MissingBody;
//!
//! impl WebRequest for ExampleRequest {
//!     type Response = ExampleResponse;
//!     type Error = MissingBody;
//!
//!     fn method(&self) -> Method {
//!         if self.post { Method::Post } else { Method::Get }
//!     }
//!
//!     fn query(&mut self) -> Result<Cow<dyn QueryParameter + 'static>, MissingBody> {
//!         Ok(Cow::Borrowed(&self.query))
//!     }
//!
//!     fn urlbody(&mut self) -> Result<Cow<dyn QueryParameter + 'static>, MissingBody> {
//!         self.urlbody.as_ref()
//!             .map(|body| Cow::Borrowed(body as &dyn QueryParameter))
//!             .ok_or(MissingBody)
//!     }
//!
//!     fn authheader(&mut self) -> Result<Option<Cow<str>>, MissingBody> {
//!         Ok(self.authorization_header.as_ref().map(|string| string.as_str().into()))
//!     }
//! }
//!
//! impl ExampleResponse {
//!     fn status(&mut self, status: u16) -> Result<(), MissingBody> {
//!         self.status = status;
//!         self.www_authenticate = None;
//!         self.location = None;
//!         Ok(())
//!     }
//! }
//!
//! impl WebResponse for ExampleResponse {
//!     type Error = MissingBody;
//!
//!     fn ok(&mut self) -> Result<(), MissingBody> {
//!         self.status(200)
//!     }
//!
//!     fn redirect(&mut self, target: Url) -> Result<(), MissingBody> {
//!         self.status(302)?;
//!         self.location = Some(target.to_string());
//!         Ok(())
//!     }
//!
//!     fn client_error(&mut self) -> Result<(), MissingBody> {
//!         self.status(400)
//!     }
//!
//!     fn unauthorized(&mut self, www_authenticate: &str) -> Result<(), MissingBody> {
//!         self.status(401)?;
//!         self.www_authenticate = Some(www_authenticate.to_string());
//!         Ok(())
//!     }
//!
//!     fn server_error(&mut self) -> Result<(), MissingBody> {
//!         self.status(500)
//!     }
//!
//!     fn unavailable(&mut self) -> Result<(), MissingBody> {
//!         self.status(503)
//!     }
//!
//!     fn body_text(&mut self, text: &str) -> Result<(), MissingBody> {
//!         self.body = Some(text.to_string());
//!         self.content_type = Some("text/plain".to_string());
//!         Ok(())
//!     }
//!
//!     fn body_json(&mut self, json: &str) -> Result<(), MissingBody> {
//!         self.body = Some(json.to_string());
//!         self.content_type = Some("application/json".to_string());
//!         Ok(())
//!     }
//! }
//! ```
//!
//! And we're done, the server is fully usable with these types. The implementation of [`simple`]
//! is almost the same with some minor extras.
//!
//! [`Server`]: ../endpoint/struct.Server.html
//! [`Server::authorize`]: ../endpoint/struct.Server.html#method.authorize
//! [`Server::token`]: ../endpoint/struct.Server.html#method.token
//! [`Server::secure`]: ../endpoint/struct.Server.html#method.secure
//! [`WebRequest`]: ../endpoint/trait.WebRequest.html
//! [`WebResponse`]: ../endpoint/trait.WebResponse.html
//! [`simple`]: simple/index.html

pub mod simple;

/// Simply a prelude useful for writing front-ends.
pub mod dev {
    pub use std::borrow::Cow;
    pub use url::Url;
    pub use crate::code_grant::error::OAuthError;
    pub use crate::endpoint::{Consent, ConsentForm, Handler, Method, WebRequest, WebResponse};
    pub use crate::endpoint::{NormalizedParameter, QueryParameter};
}
