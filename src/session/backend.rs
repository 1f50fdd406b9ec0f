//! The storage interface of the session store.
use std::sync::Arc;

use thiserror::Error;

use crate::code_grant::error::{ErrorType, OAuthError};
use crate::primitives::grant::{AuthorizationCode, Grant};

/// Failures of a storage back-end.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum BackendError {
    /// No record under the key.
    #[error("no record under the requested key")]
    NotFound,

    /// A record is already stored under the key.
    #[error("a record already exists under the key")]
    Occupied,

    /// The back-end is overloaded or in maintenance.
    #[error("storage temporarily unavailable: {0}")]
    Unavailable(String),

    /// Any other failure of the back-end.
    #[error("storage failure: {0}")]
    Other(String),
}

/// Storage of grants and authorization codes, keyed by their raw token value.
///
/// Every single operation must be atomic with respect to all other operations on the same key.
/// In particular of two concurrent deletions of the same key exactly one succeeds, and of two
/// concurrent insertions of the same key exactly one succeeds.
///
/// Back-ends must not drop expired records on their own accord. Expiry is decided by the session
/// store when a record is read.
pub trait Backend {
    /// Insert a grant under its access token. Fails with `Occupied` if the key is taken.
    fn put_grant(&self, grant: Grant) -> Result<(), BackendError>;

    /// Fetch a copy of the grant with the access token.
    fn get_grant(&self, access_token: &str) -> Result<Grant, BackendError>;

    /// Remove the grant with the access token. Fails with `NotFound` if there is none.
    fn delete_grant(&self, access_token: &str) -> Result<(), BackendError>;

    /// Insert a code under its value. Fails with `Occupied` if the key is taken.
    fn put_authorization_code(&self, code: AuthorizationCode) -> Result<(), BackendError>;

    /// Fetch a copy of the authorization code.
    fn get_authorization_code(&self, code: &str) -> Result<AuthorizationCode, BackendError>;

    /// Remove the authorization code. Fails with `NotFound` if there is none.
    fn delete_authorization_code(&self, code: &str) -> Result<(), BackendError>;
}

impl BackendError {
    /// The protocol error reported for this failure.
    pub fn kind(&self) -> ErrorType {
        match self {
            BackendError::NotFound => ErrorType::AccessDenied,
            BackendError::Occupied => ErrorType::ServerError,
            BackendError::Unavailable(_) => ErrorType::TemporarilyUnavailable,
            BackendError::Other(_) => ErrorType::ServerError,
        }
    }
}

impl From<BackendError> for OAuthError {
    fn from(err: BackendError) -> Self {
        OAuthError::new(err.kind())
    }
}

macro_rules! forward_backend {
    ($($ty:ty),*) => {$(
        impl<'s, B: Backend + ?Sized> Backend for $ty {
            fn put_grant(&self, grant: Grant) -> Result<(), BackendError> {
                (**self).put_grant(grant)
            }

            fn get_grant(&self, access_token: &str) -> Result<Grant, BackendError> {
                (**self).get_grant(access_token)
            }

            fn delete_grant(&self, access_token: &str) -> Result<(), BackendError> {
                (**self).delete_grant(access_token)
            }

            fn put_authorization_code(&self, code: AuthorizationCode) -> Result<(), BackendError> {
                (**self).put_authorization_code(code)
            }

            fn get_authorization_code(&self, code: &str) -> Result<AuthorizationCode, BackendError> {
                (**self).get_authorization_code(code)
            }

            fn delete_authorization_code(&self, code: &str) -> Result<(), BackendError> {
                (**self).delete_authorization_code(code)
            }
        }
    )*};
}

forward_backend!(&'s B, Box<B>, Arc<B>);
