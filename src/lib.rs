//! # oxide-auth-session
//!
//! Protocol state machines for an OAuth2 authorization server, built on a session store with a
//! pluggable back-end.
//!
//! ## About
//!
//! The crate implements the four grant types of RFC 6749 (authorization code, implicit, client
//! credentials and resource owner password credentials), the lifecycle of access grants and
//! authorization codes, the narrowing of requested scopes, and a bearer token gate for protected
//! resources. The embedding application supplies the policy: an [`Authenticator`] that finds
//! clients and verifies resource owner credentials, the [`Client`] decisions for each registered
//! application, and a [`Backend`] for storage.
//!
//! ## Layers
//!
//! - [`primitives`] contains the leaf data types: [`Secret`], the [`Scope`] of a grant, the
//! persisted [`Grant`] and [`AuthorizationCode`] records and the token generators.
//! - [`session`] manages the lifecycle of grants and codes: minting with fresh tokens, lazy expiry
//! and single use deletion over any [`Backend`].
//! - [`code_grant`] has the abstract, http independent flow logic. Every flow is a sequence of
//! checks where the first failing one terminates the request with a protocol error.
//! - [`endpoint`] binds the flows to HTTP through [`WebRequest`] and [`WebResponse`], dispatching
//! on `response_type` and `grant_type` through a per instance [`Registry`].
//! - [`frontends::simple`] has owning request and response types, useful for tests and for
//! translating the requests of other web libraries.
//!
//! ## Example
//!
//! ```
//! # use oxide_auth_session::endpoint::Server;
//! # use oxide_auth_session::frontends::simple::{Request, Status};
//! # use oxide_auth_session::primitives::registrar::{ClientMap, RegisteredClient};
//! # use oxide_auth_session::session::{MemoryBackend, SessionStore};
//! let mut clients = ClientMap::new();
//! clients.register_client(RegisteredClient::confidential("c1", "s1", "read".parse().unwrap()));
//!
//! let server = Server::new(clients, SessionStore::new(MemoryBackend::new()));
//!
//! let request = Request::post("grant_type=client_credentials&scope=read")
//!     .with_basic_auth("c1", "s1");
//! let response = server.token(request).unwrap_or_else(|err| err.into());
//! assert_eq!(response.status, Status::Ok);
//! ```
//!
//! [`Authenticator`]: primitives/client/trait.Authenticator.html
//! [`Client`]: primitives/client/trait.Client.html
//! [`Backend`]: session/trait.Backend.html
//! [`Secret`]: primitives/secret/struct.Secret.html
//! [`Scope`]: primitives/scope/struct.Scope.html
//! [`Grant`]: primitives/grant/struct.Grant.html
//! [`AuthorizationCode`]: primitives/grant/struct.AuthorizationCode.html
//! [`WebRequest`]: endpoint/trait.WebRequest.html
//! [`WebResponse`]: endpoint/trait.WebResponse.html
//! [`Registry`]: endpoint/struct.Registry.html
//! [`primitives`]: primitives/index.html
//! [`session`]: session/index.html
//! [`code_grant`]: code_grant/index.html
//! [`endpoint`]: endpoint/index.html
//! [`frontends::simple`]: frontends/simple/index.html
#![warn(missing_docs)]

pub mod code_grant;
pub mod endpoint;
pub mod frontends;
pub mod primitives;
pub mod session;
