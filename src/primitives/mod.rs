//! A collection of primitives shared by all grant flows.
//!
//! A primitive is the smallest independent unit of data or policy used by the flows. Tokens and
//! codes are [`Secret`]s produced by a [`TokenGenerator`], the persisted records are [`Grant`] and
//! [`AuthorizationCode`], and the policy of the embedding application enters through the
//! [`Client`] and [`Authenticator`] capabilities.
//!
//! ```
//! # use oxide_auth_session::primitives::prelude::*;
//! let mut clients = ClientMap::new();
//! clients.register_client(RegisteredClient::confidential("c1", "s1", "read write".parse().unwrap()));
//!
//! let client = clients.get_client_with_secret("c1", &Secret::new("s1")).unwrap();
//! let granted = client.authorize_scope(&"read".parse().unwrap()).unwrap();
//! assert_eq!(granted.to_string(), "read");
//! ```
//!
//! [`Secret`]: secret/struct.Secret.html
//! [`TokenGenerator`]: generator/trait.TokenGenerator.html
//! [`Grant`]: grant/struct.Grant.html
//! [`AuthorizationCode`]: grant/struct.AuthorizationCode.html
//! [`Client`]: client/trait.Client.html
//! [`Authenticator`]: client/trait.Authenticator.html
use chrono::DateTime;
use chrono::Utc;

pub mod client;
pub mod clock;
pub mod generator;
pub mod grant;
pub mod registrar;
pub mod scope;
pub mod secret;

/// Point in time used for creation stamps and expiry checks.
pub type Time = DateTime<Utc>;

/// Commonly used primitives for frontends and backends.
pub mod prelude {
    pub use super::client::{Authenticator, Client, Strategy};
    pub use super::clock::{Clock, SystemClock};
    pub use super::generator::{RandomGenerator, TokenGenerator};
    pub use super::grant::{AuthorizationCode, Grant, TokenType};
    pub use super::registrar::{ClientMap, RegisteredClient};
    pub use super::scope::Scope;
    pub use super::secret::Secret;
}
