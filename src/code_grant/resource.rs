//! Verifies access tokens presented to protected resources.
//!
//! A request passes when it carries a `Bearer` token of a live grant whose scope covers the scope
//! required by the resource. If the grant was issued to a client, the client must also still be
//! allowed that scope: revoking scope from a client takes effect for existing grants.
use std::fmt;

use log::debug;

use crate::primitives::client::Authenticator;
use crate::primitives::grant::{Grant, TokenType};
use crate::primitives::scope::Scope;
use crate::session::{Backend, SessionStore};

use super::error::{ErrorType, OAuthError};
use super::scope::authorize_scope;

const BEARER_START: &str = "Bearer ";

/// A request rejected by the gate.
#[derive(Clone, Debug)]
pub struct ResourceError {
    error: OAuthError,
    scope: Option<Scope>,
}

impl ResourceError {
    fn denied(required: &Scope) -> Self {
        ResourceError {
            error: OAuthError::access_denied(),
            scope: Some(required.clone()).filter(|scope| !scope.is_empty()),
        }
    }

    /// The error of the response.
    pub fn error(&self) -> &OAuthError {
        &self.error
    }

    /// The value of the `WWW-Authenticate` header of the response.
    pub fn www_authenticate(&self) -> String {
        let mut header = BearerHeader::new();
        header.add_kvp("scope", self.scope.as_ref());
        header.add_kvp("error", Some(self.error.kind().code()));
        header.finalize()
    }
}

/// Check the `Authorization` header of a request against the required scope.
///
/// The grant is only returned when access is allowed. An expired grant is removed from the store
/// as a side effect.
pub fn protect<B: Backend>(
    authenticator: &dyn Authenticator, store: &SessionStore<B>, authorization: Option<&str>,
    required: &Scope,
) -> Result<Grant, ResourceError> {
    let header = authorization.ok_or_else(|| {
        debug!("Resource request without authorization");
        ResourceError::denied(required)
    })?;

    if !header.starts_with(BEARER_START) {
        debug!("Resource request without bearer token");
        return Err(ResourceError::denied(required));
    }
    let token = &header[BEARER_START.len()..];

    let grant = store.check_grant(token).map_err(|err| ResourceError {
        error: err.or_kind(ErrorType::AccessDenied),
        scope: ResourceError::denied(required).scope,
    })?;

    if required.is_empty() {
        return Ok(grant);
    }

    if !required.allow_access(&grant.scope) {
        debug!("Grant scope {:?} does not cover {:?}", grant.scope.to_string(), required.to_string());
        return Err(ResourceError::denied(required));
    }

    if let Some(client_id) = &grant.client_id {
        let client = authenticator.get_client(client_id).map_err(|_| {
            debug!("Grant issued to {:?} which no longer exists", client_id);
            ResourceError::denied(required)
        })?;

        authorize_scope(required, &*client, None, Some(required)).map_err(|_| {
            debug!("Client {:?} is no longer allowed {:?}", client_id, required.to_string());
            ResourceError::denied(required)
        })?;
    }

    Ok(grant)
}

/// Like [`protect`], for a resource expecting a specific token type.
///
/// Only bearer tokens are implemented. Every request to a resource expecting `mac` tokens is
/// rejected as `invalid_request`.
///
/// [`protect`]: fn.protect.html
pub fn protect_with<B: Backend>(
    token_type: TokenType, authenticator: &dyn Authenticator, store: &SessionStore<B>,
    authorization: Option<&str>, required: &Scope,
) -> Result<Grant, ResourceError> {
    match token_type {
        TokenType::Bearer => protect(authenticator, store, authorization, required),
        TokenType::Mac => {
            debug!("Mac token authentication is not supported");
            Err(ResourceError {
                error: OAuthError::invalid_request(),
                scope: None,
            })
        }
    }
}

struct BearerHeader {
    content: String,
    first_option: bool,
}

impl BearerHeader {
    fn new() -> Self {
        BearerHeader {
            content: "Bearer".to_string(),
            first_option: true,
        }
    }

    fn add_option(&mut self, args: fmt::Arguments) {
        if self.first_option {
            self.content.push(' ');
            self.first_option = false;
        } else {
            self.content.push_str(", ");
        }
        // Writing to a `String` does not fail.
        let _ = fmt::write(&mut self.content, args);
    }

    fn add_kvp(&mut self, key: &'static str, value: Option<impl fmt::Display>) {
        if let Some(value) = value {
            self.add_option(format_args!("{}=\"{}\"", key, value));
        }
    }

    fn finalize(self) -> String {
        self.content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::primitives::registrar::{ClientMap, RegisteredClient};
    use crate::session::MemoryBackend;

    fn scope(scope: &str) -> Scope {
        scope.parse().unwrap()
    }

    #[test]
    fn challenge_header() {
        let denied = ResourceError::denied(&scope("read write"));
        assert_eq!(
            denied.www_authenticate(),
            "Bearer scope=\"read write\", error=\"access_denied\""
        );

        let unscoped = ResourceError::denied(&Scope::empty());
        assert_eq!(unscoped.www_authenticate(), "Bearer error=\"access_denied\"");
    }

    #[test]
    fn mac_is_rejected() {
        let clients = ClientMap::new();
        let store = SessionStore::new(MemoryBackend::new());
        let grant = store.new_grant(Scope::empty()).unwrap();
        let header = format!("Bearer {}", grant.access_token.raw());

        let err = protect_with(TokenType::Mac, &clients, &store, Some(&header), &Scope::empty())
            .unwrap_err();
        assert_eq!(err.error().kind(), ErrorType::InvalidRequest);

        assert!(protect_with(TokenType::Bearer, &clients, &store, Some(&header), &Scope::empty())
            .is_ok());
    }

    #[test]
    fn client_scope_is_rechecked() {
        let mut clients = ClientMap::new();
        clients.register_client(RegisteredClient::confidential("c1", "s1", scope("read")));
        let store = SessionStore::new(MemoryBackend::new());
        let grant = store.new_client_grant("c1", scope("read write")).unwrap();
        let header = format!("Bearer {}", grant.access_token.raw());

        assert!(protect(&clients, &store, Some(&header), &scope("read")).is_ok());
        // Covered by the grant but not by the client.
        assert!(protect(&clients, &store, Some(&header), &scope("write")).is_err());

        let orphan = store.new_client_grant("gone", scope("read")).unwrap();
        let header = format!("Bearer {}", orphan.access_token.raw());
        assert!(protect(&clients, &store, Some(&header), &Scope::empty()).is_ok());
        assert!(protect(&clients, &store, Some(&header), &scope("read")).is_err());
    }

    #[test]
    fn scheme_is_exact() {
        let clients = ClientMap::new();
        let store = SessionStore::new(MemoryBackend::new());
        let grant = store.new_grant(Scope::empty()).unwrap();
        let token = grant.access_token.raw();

        for header in &[
            format!("bearer {}", token),
            format!("Bearer  {}", token),
            format!("Bearer{}", token),
            format!("Basic {}", token),
            token.to_string(),
        ] {
            let err = protect(&clients, &store, Some(header), &Scope::empty()).unwrap_err();
            assert_eq!(err.error().kind(), ErrorType::AccessDenied);
        }
    }
}
