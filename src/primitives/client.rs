//! Capabilities through which the embedding application decides about clients and owners.
//!
//! The flows never inspect client registrations directly. They ask an [`Authenticator`] to find
//! or authenticate a [`Client`] and then ask that client for its decisions: which scope it may
//! receive, where it may be redirected to, on behalf of which resource owners it may act and which
//! grant flows it is allowed to use.
//!
//! Rejections are reported as [`OAuthError`]s. The flows reinterpret an ordinary rejection as the
//! error of the check that failed, but keep `server_error` and `temporarily_unavailable` so that an
//! unavailable registry does not look like a denial.
//!
//! [`Authenticator`]: trait.Authenticator.html
//! [`Client`]: trait.Client.html
//! [`OAuthError`]: ../../code_grant/error/struct.OAuthError.html
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use crate::code_grant::error::OAuthError;

use super::scope::Scope;
use super::secret::Secret;

/// The four grant flows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Strategy {
    /// Authorization code grant, RFC 6749 section 4.1.
    AuthorizationCode,

    /// Implicit grant, RFC 6749 section 4.2.
    Implicit,

    /// Client credentials grant, RFC 6749 section 4.4.
    ClientCredentials,

    /// Resource owner password credentials grant, RFC 6749 section 4.3.
    ResourceOwnerPasswordCredentials,
}

/// Values of the `response_type` parameter of the authorization endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ResponseType {
    /// `code`, the first phase of the authorization code grant.
    Code,

    /// `token`, the implicit grant.
    Token,
}

/// Values of the `grant_type` parameter of the token endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum GrantType {
    /// `authorization_code`, the second phase of the authorization code grant.
    AuthorizationCode,

    /// `password`, the resource owner password credentials grant.
    Password,

    /// `client_credentials`, the client credentials grant.
    ClientCredentials,

    /// `refresh_token`. Recognized but not served by any flow.
    RefreshToken,
}

/// An unknown `response_type` or `grant_type` value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UnknownType(pub String);

impl Strategy {
    /// All strategies, in the order in which they are registered by default.
    pub const ALL: [Strategy; 4] = [
        Strategy::AuthorizationCode,
        Strategy::Implicit,
        Strategy::ClientCredentials,
        Strategy::ResourceOwnerPasswordCredentials,
    ];

    /// A stable name for logs and configuration.
    pub fn name(self) -> &'static str {
        match self {
            Strategy::AuthorizationCode => "authorization_code",
            Strategy::Implicit => "implicit",
            Strategy::ClientCredentials => "client_credentials",
            Strategy::ResourceOwnerPasswordCredentials => "resource_owner_password_credentials",
        }
    }

    /// The response type served by this strategy at the authorization endpoint.
    pub fn response_type(self) -> Option<ResponseType> {
        match self {
            Strategy::AuthorizationCode => Some(ResponseType::Code),
            Strategy::Implicit => Some(ResponseType::Token),
            _ => None,
        }
    }

    /// The grant type served by this strategy at the token endpoint.
    pub fn grant_type(self) -> Option<GrantType> {
        match self {
            Strategy::AuthorizationCode => Some(GrantType::AuthorizationCode),
            Strategy::ClientCredentials => Some(GrantType::ClientCredentials),
            Strategy::ResourceOwnerPasswordCredentials => Some(GrantType::Password),
            Strategy::Implicit => None,
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(self.name())
    }
}

impl ResponseType {
    /// The parameter value.
    pub fn as_str(self) -> &'static str {
        match self {
            ResponseType::Code => "code",
            ResponseType::Token => "token",
        }
    }
}

impl FromStr for ResponseType {
    type Err = UnknownType;

    fn from_str(value: &str) -> Result<Self, UnknownType> {
        match value {
            "code" => Ok(ResponseType::Code),
            "token" => Ok(ResponseType::Token),
            other => Err(UnknownType(other.to_string())),
        }
    }
}

impl GrantType {
    /// The parameter value.
    pub fn as_str(self) -> &'static str {
        match self {
            GrantType::AuthorizationCode => "authorization_code",
            GrantType::Password => "password",
            GrantType::ClientCredentials => "client_credentials",
            GrantType::RefreshToken => "refresh_token",
        }
    }
}

impl FromStr for GrantType {
    type Err = UnknownType;

    fn from_str(value: &str) -> Result<Self, UnknownType> {
        match value {
            "authorization_code" => Ok(GrantType::AuthorizationCode),
            "password" => Ok(GrantType::Password),
            "client_credentials" => Ok(GrantType::ClientCredentials),
            "refresh_token" => Ok(GrantType::RefreshToken),
            other => Err(UnknownType(other.to_string())),
        }
    }
}

/// Decisions of a single registered client.
pub trait Client {
    /// The identifier of this client, recorded on the grants issued to it.
    fn client_id(&self) -> &str;

    /// The part of the requested scope this client may receive.
    ///
    /// The result may only narrow the request. Tokens that were not requested are ignored.
    fn authorize_scope(&self, requested: &Scope) -> Result<Scope, OAuthError>;

    /// Check that the client may be redirected to the uri, compared as given in the request.
    fn authorize_redirect_uri(&self, uri: &str) -> Result<(), OAuthError>;

    /// Check that the client may act on behalf of the named resource owner.
    fn authorize_resource_owner(&self, username: &str) -> Result<(), OAuthError>;

    /// Check that the client may use a grant flow.
    ///
    /// Every flow is allowed unless a client restricts them.
    fn allow_strategy(&self, _strategy: Strategy) -> bool {
        true
    }
}

/// Server wide lookup of clients and verification of resource owners.
pub trait Authenticator {
    /// Find a client by its identifier, without authentication.
    fn get_client(&self, client_id: &str) -> Result<Box<dyn Client + '_>, OAuthError>;

    /// Find a client and authenticate it with its secret.
    fn get_client_with_secret(
        &self, client_id: &str, secret: &Secret,
    ) -> Result<Box<dyn Client + '_>, OAuthError>;

    /// Verify the credentials of a resource owner and decide on the scope it grants.
    ///
    /// The result may only narrow the requested scope.
    fn authorize_resource_owner(
        &self, username: &str, password: &Secret, requested: &Scope,
    ) -> Result<Scope, OAuthError>;
}

impl<'a, C: Client + ?Sized> Client for &'a C {
    fn client_id(&self) -> &str {
        (**self).client_id()
    }

    fn authorize_scope(&self, requested: &Scope) -> Result<Scope, OAuthError> {
        (**self).authorize_scope(requested)
    }

    fn authorize_redirect_uri(&self, uri: &str) -> Result<(), OAuthError> {
        (**self).authorize_redirect_uri(uri)
    }

    fn authorize_resource_owner(&self, username: &str) -> Result<(), OAuthError> {
        (**self).authorize_resource_owner(username)
    }

    fn allow_strategy(&self, strategy: Strategy) -> bool {
        (**self).allow_strategy(strategy)
    }
}

impl<C: Client + ?Sized> Client for Box<C> {
    fn client_id(&self) -> &str {
        (**self).client_id()
    }

    fn authorize_scope(&self, requested: &Scope) -> Result<Scope, OAuthError> {
        (**self).authorize_scope(requested)
    }

    fn authorize_redirect_uri(&self, uri: &str) -> Result<(), OAuthError> {
        (**self).authorize_redirect_uri(uri)
    }

    fn authorize_resource_owner(&self, username: &str) -> Result<(), OAuthError> {
        (**self).authorize_resource_owner(username)
    }

    fn allow_strategy(&self, strategy: Strategy) -> bool {
        (**self).allow_strategy(strategy)
    }
}

macro_rules! forward_authenticator {
    ($($ty:ty),*) => {$(
        impl<'s, A: Authenticator + ?Sized> Authenticator for $ty {
            fn get_client(&self, client_id: &str) -> Result<Box<dyn Client + '_>, OAuthError> {
                (**self).get_client(client_id)
            }

            fn get_client_with_secret(
                &self, client_id: &str, secret: &Secret,
            ) -> Result<Box<dyn Client + '_>, OAuthError> {
                (**self).get_client_with_secret(client_id, secret)
            }

            fn authorize_resource_owner(
                &self, username: &str, password: &Secret, requested: &Scope,
            ) -> Result<Scope, OAuthError> {
                (**self).authorize_resource_owner(username, password, requested)
            }
        }
    )*};
}

forward_authenticator!(&'s A, Box<A>, Arc<A>);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoint_keys() {
        assert_eq!("code".parse(), Ok(ResponseType::Code));
        assert_eq!("token".parse(), Ok(ResponseType::Token));
        assert!("Code".parse::<ResponseType>().is_err());

        for strategy in Strategy::ALL.iter().cloned() {
            if let Some(grant_type) = strategy.grant_type() {
                assert_eq!(grant_type.as_str().parse(), Ok(grant_type));
            }
            if let Some(response_type) = strategy.response_type() {
                assert_eq!(response_type.as_str().parse(), Ok(response_type));
            }
        }

        assert_eq!("refresh_token".parse(), Ok(GrantType::RefreshToken));
        assert!(Strategy::ALL
            .iter()
            .all(|strategy| strategy.grant_type() != Some(GrantType::RefreshToken)));
    }
}
