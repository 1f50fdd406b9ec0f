//! Lifecycle of grants and authorization codes.
//!
//! The [`SessionStore`] mints records with fresh tokens, validates them on access and removes
//! them when they expire or are used up. The records themselves live in a [`Backend`], which only
//! has to provide atomic put, get and delete operations.
//!
//! Expiry is lazy: nothing is removed in the background. Reading an expired grant through
//! [`check_grant`] deletes it and denies access. Codes are never deleted by validation, the caller
//! decides when a code is consumed.
//!
//! [`SessionStore`]: struct.SessionStore.html
//! [`Backend`]: trait.Backend.html
//! [`check_grant`]: struct.SessionStore.html#method.check_grant
use std::fmt;

use chrono::Duration;
use log::{debug, info, warn};
use serde::Deserialize;
use thiserror::Error;

use crate::code_grant::error::OAuthError;
use crate::primitives::clock::{Clock, SystemClock};
use crate::primitives::generator::{RandomGenerator, TokenGenerator};
use crate::primitives::grant::{AuthorizationCode, Grant, TokenType};
use crate::primitives::scope::Scope;
use crate::primitives::secret::Secret;

mod backend;
mod memory;

pub use self::backend::{Backend, BackendError};
pub use self::memory::MemoryBackend;

/// Lifetimes and issuance options of a session store.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Settings {
    /// Lifetime of access grants, one hour by default.
    pub token_lifetime: Duration,

    /// Lifetime of authorization codes, ten seconds by default.
    pub code_lifetime: Duration,

    /// Whether grants carry a refresh token, true by default.
    pub refresh_tokens: bool,
}

/// Invalid settings.
#[derive(Debug, Error)]
pub enum SettingsError {
    /// The input was not valid json for the settings.
    #[error("malformed settings: {0}")]
    Json(#[from] serde_json::Error),

    /// A lifetime was negative.
    #[error("the lifetime {0} must not be negative")]
    NegativeLifetime(&'static str),

    /// A lifetime exceeded the longest supported one of ten years.
    #[error("the lifetime {0} exceeds ten years")]
    LifetimeTooLarge(&'static str),
}

/// Ten years, the longest lifetime accepted from a settings file.
const MAX_LIFETIME_SECS: i64 = 10 * 365 * 24 * 60 * 60;

#[derive(Deserialize)]
#[serde(default, deny_unknown_fields)]
struct SettingsFile {
    token_lifetime_secs: i64,
    code_lifetime_ms: i64,
    refresh_tokens: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            token_lifetime: Duration::seconds(3600),
            code_lifetime: Duration::seconds(10),
            refresh_tokens: true,
        }
    }
}

impl Default for SettingsFile {
    fn default() -> Self {
        let defaults = Settings::default();
        SettingsFile {
            token_lifetime_secs: defaults.token_lifetime.num_seconds(),
            code_lifetime_ms: defaults.code_lifetime.num_milliseconds(),
            refresh_tokens: defaults.refresh_tokens,
        }
    }
}

impl Settings {
    /// Parse settings from a json object.
    ///
    /// The recognized fields are `token_lifetime_secs`, `code_lifetime_ms` and `refresh_tokens`.
    /// Missing fields keep their default.
    ///
    /// ```
    /// # use oxide_auth_session::session::Settings;
    /// let settings = Settings::from_json(r#"{ "code_lifetime_ms": 1 }"#).unwrap();
    /// assert_eq!(settings.code_lifetime.num_milliseconds(), 1);
    /// assert_eq!(settings.token_lifetime.num_seconds(), 3600);
    /// ```
    pub fn from_json(json: &str) -> Result<Self, SettingsError> {
        let file: SettingsFile = serde_json::from_str(json)?;
        if file.token_lifetime_secs < 0 {
            return Err(SettingsError::NegativeLifetime("token_lifetime_secs"));
        }
        if file.code_lifetime_ms < 0 {
            return Err(SettingsError::NegativeLifetime("code_lifetime_ms"));
        }
        if file.token_lifetime_secs > MAX_LIFETIME_SECS {
            return Err(SettingsError::LifetimeTooLarge("token_lifetime_secs"));
        }
        if file.code_lifetime_ms / 1000 > MAX_LIFETIME_SECS {
            return Err(SettingsError::LifetimeTooLarge("code_lifetime_ms"));
        }
        Ok(Settings {
            token_lifetime: Duration::seconds(file.token_lifetime_secs),
            code_lifetime: Duration::milliseconds(file.code_lifetime_ms),
            refresh_tokens: file.refresh_tokens,
        })
    }
}

/// Creates, validates and removes grants and authorization codes over a back-end.
pub struct SessionStore<B> {
    backend: B,
    generator: Box<dyn TokenGenerator + Send + Sync>,
    clock: Box<dyn Clock + Send + Sync>,
    settings: Settings,
}

impl<B: Backend> SessionStore<B> {
    /// A store with random tokens, the system clock and default settings.
    pub fn new(backend: B) -> Self {
        SessionStore {
            backend,
            generator: Box::new(RandomGenerator::default()),
            clock: Box::new(SystemClock),
            settings: Settings::default(),
        }
    }

    /// Replace all settings.
    pub fn with_settings(mut self, settings: Settings) -> Self {
        self.settings = settings;
        self
    }

    /// Set the lifetime of newly issued grants.
    pub fn token_lifetime(mut self, lifetime: Duration) -> Self {
        self.settings.token_lifetime = lifetime;
        self
    }

    /// Set the lifetime of newly issued authorization codes.
    pub fn code_lifetime(mut self, lifetime: Duration) -> Self {
        self.settings.code_lifetime = lifetime;
        self
    }

    /// Choose whether new grants carry a refresh token.
    pub fn refresh_tokens(mut self, issue: bool) -> Self {
        self.settings.refresh_tokens = issue;
        self
    }

    /// Generate tokens and codes with another generator.
    pub fn with_generator<G>(mut self, generator: G) -> Self
    where
        G: TokenGenerator + Send + Sync + 'static,
    {
        self.generator = Box::new(generator);
        self
    }

    /// Take creation and access times from another clock.
    pub fn with_clock<C>(mut self, clock: C) -> Self
    where
        C: Clock + Send + Sync + 'static,
    {
        self.clock = Box::new(clock);
        self
    }

    /// The active settings.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// The underlying back-end.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    fn generate(&self) -> Result<Secret, OAuthError> {
        self.generator
            .generate()
            .map_err(|_| OAuthError::server_error())
    }

    /// Issue a code for the redirect uri and scope approved by a resource owner.
    ///
    /// A code colliding with a stored one is a `server_error`, no new value is tried.
    pub fn new_authorization_code(
        &self, client_id: &str, redirect_uri: &str, scope: Scope,
    ) -> Result<AuthorizationCode, OAuthError> {
        let code = AuthorizationCode {
            code: self.generate()?,
            redirect_uri: redirect_uri.to_string(),
            client_id: client_id.to_string(),
            scope,
            created_at: self.clock.now(),
            expires_in: self.settings.code_lifetime,
        };

        self.backend
            .put_authorization_code(code.clone())
            .map_err(|err| {
                warn!("Could not store new authorization code: {}", err);
                OAuthError::from(err)
            })?;

        info!("Issued authorization code to {:?} for scope {:?}", client_id, code.scope.to_string());
        Ok(code)
    }

    /// Fetch a code presented with a redirect uri, without consuming it.
    ///
    /// Fails with `access_denied` if there is no such code, if the code is bound to a different
    /// redirect uri or if it has expired.
    pub fn check_authorization_code(
        &self, code: &str, redirect_uri: &str,
    ) -> Result<AuthorizationCode, OAuthError> {
        let stored = self.backend.get_authorization_code(code).map_err(|err| {
            debug!("Authorization code lookup failed: {}", err);
            OAuthError::from(err)
        })?;

        if !stored.redirect_uri.is_empty() && stored.redirect_uri != redirect_uri {
            debug!("Authorization code presented with a different redirect uri");
            return Err(OAuthError::access_denied());
        }

        if stored.is_expired_at(self.clock.now()) {
            debug!("Authorization code has expired");
            return Err(OAuthError::access_denied());
        }

        Ok(stored)
    }

    /// Issue a grant not bound to any client.
    pub fn new_grant(&self, scope: Scope) -> Result<Grant, OAuthError> {
        self.issue(None, scope)
    }

    /// Issue a grant for a client.
    pub fn new_client_grant(&self, client_id: &str, scope: Scope) -> Result<Grant, OAuthError> {
        self.issue(Some(client_id.to_string()), scope)
    }

    fn issue(&self, client_id: Option<String>, scope: Scope) -> Result<Grant, OAuthError> {
        let refresh_token = if self.settings.refresh_tokens {
            Some(self.generate()?)
        } else {
            None
        };

        let grant = Grant {
            access_token: self.generate()?,
            token_type: TokenType::Bearer,
            expires_in: self.settings.token_lifetime,
            refresh_token,
            scope,
            created_at: self.clock.now(),
            client_id,
        };

        self.backend.put_grant(grant.clone()).map_err(|err| {
            warn!("Could not store new grant: {}", err);
            OAuthError::from(err)
        })?;

        info!(
            "Issued grant to {:?} for scope {:?}",
            grant.client_id.as_ref().map(String::as_str).unwrap_or("<none>"),
            grant.scope.to_string()
        );
        Ok(grant)
    }

    /// Fetch the grant of a presented access token.
    ///
    /// An expired grant is deleted and access is denied. The denial stands even when the deletion
    /// fails, the failure is only logged.
    pub fn check_grant(&self, access_token: &str) -> Result<Grant, OAuthError> {
        let grant = self.backend.get_grant(access_token).map_err(|err| {
            debug!("Grant lookup failed: {}", err);
            OAuthError::from(err)
        })?;

        if grant.is_expired_at(self.clock.now()) {
            debug!("Grant has expired");
            if let Err(err) = self.backend.delete_grant(access_token) {
                warn!("Failed to delete expired grant: {}", err);
            }
            return Err(OAuthError::access_denied());
        }

        Ok(grant)
    }

    /// Store a grant as is.
    pub fn put_grant(&self, grant: Grant) -> Result<(), BackendError> {
        self.backend.put_grant(grant)
    }

    /// Remove a grant, revoking its access token.
    pub fn delete_grant(&self, access_token: &str) -> Result<(), BackendError> {
        self.backend.delete_grant(access_token)
    }

    /// Store a code as is.
    pub fn put_authorization_code(&self, code: AuthorizationCode) -> Result<(), BackendError> {
        self.backend.put_authorization_code(code)
    }

    /// Fetch a code without any validation.
    pub fn get_authorization_code(&self, code: &str) -> Result<AuthorizationCode, BackendError> {
        self.backend.get_authorization_code(code)
    }

    /// Remove a code. Of two racing deletions of the same code only one succeeds.
    pub fn delete_authorization_code(&self, code: &str) -> Result<(), BackendError> {
        self.backend.delete_authorization_code(code)
    }
}

impl<B: fmt::Debug> fmt::Debug for SessionStore<B> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("SessionStore")
            .field("backend", &self.backend)
            .field("settings", &self.settings)
            .finish()
    }
}
