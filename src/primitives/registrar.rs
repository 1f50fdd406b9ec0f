//! A simple in-memory registry of clients and resource owners.
//!
//! Suitable for tests and small deployments with a fixed set of clients. Larger deployments will
//! implement [`Authenticator`] over their own user and client databases.
//!
//! [`Authenticator`]: ../client/trait.Authenticator.html
use std::collections::HashMap;
use std::fmt;

use log::debug;

use crate::code_grant::error::OAuthError;

use super::client::{Authenticator, Client, Strategy};
use super::scope::Scope;
use super::secret::Secret;

/// A registered client and its policy.
#[derive(Clone)]
pub struct RegisteredClient {
    client_id: String,
    client_type: ClientType,
    redirect_uris: Vec<String>,
    scope: Scope,
    owners: Option<Vec<String>>,
    strategies: Option<Vec<Strategy>>,
}

#[derive(Clone)]
enum ClientType {
    Public,
    Confidential { secret: Secret },
}

/// A registered resource owner.
#[derive(Clone, Debug)]
struct Owner {
    password: Secret,
    scope: Option<Scope>,
}

/// A very simple, in-memory hash map of clients and resource owners.
#[derive(Default)]
pub struct ClientMap {
    clients: HashMap<String, RegisteredClient>,
    owners: HashMap<String, Owner>,
}

impl fmt::Debug for ClientType {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        match self {
            ClientType::Public => write!(f, "<public>"),
            ClientType::Confidential { .. } => write!(f, "<confidential>"),
        }
    }
}

impl fmt::Debug for RegisteredClient {
    fn fmt(&self, f: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        f.debug_struct("RegisteredClient")
            .field("client_id", &self.client_id)
            .field("client_type", &self.client_type)
            .field("redirect_uris", &self.redirect_uris)
            .field("scope", &self.scope)
            .finish()
    }
}

impl RegisteredClient {
    /// Create a public client. It can not authenticate at the token endpoint.
    pub fn public(client_id: &str, scope: Scope) -> RegisteredClient {
        RegisteredClient {
            client_id: client_id.to_string(),
            client_type: ClientType::Public,
            redirect_uris: vec![],
            scope,
            owners: None,
            strategies: None,
        }
    }

    /// Create a confidential client with a secret.
    pub fn confidential(client_id: &str, secret: &str, scope: Scope) -> RegisteredClient {
        RegisteredClient {
            client_id: client_id.to_string(),
            client_type: ClientType::Confidential {
                secret: Secret::new(secret),
            },
            redirect_uris: vec![],
            scope,
            owners: None,
            strategies: None,
        }
    }

    /// Allow a redirect uri. Uris are compared exactly, as recommended by the rfc.
    pub fn with_redirect_uri(mut self, uri: &str) -> Self {
        self.redirect_uris.push(uri.to_string());
        self
    }

    /// Restrict the resource owners the client may act for. Without restriction, any owner.
    pub fn with_owner(mut self, username: &str) -> Self {
        self.owners
            .get_or_insert_with(Vec::new)
            .push(username.to_string());
        self
    }

    /// Restrict the grant flows the client may use. Without restriction, all of them.
    pub fn with_strategies(mut self, strategies: &[Strategy]) -> Self {
        self.strategies = Some(strategies.to_vec());
        self
    }

    fn check_authentication(&self, secret: &Secret) -> Result<(), OAuthError> {
        match &self.client_type {
            ClientType::Confidential { secret: stored } if stored == secret => Ok(()),
            _ => Err(OAuthError::unauthorized_client()),
        }
    }
}

impl Client for RegisteredClient {
    fn client_id(&self) -> &str {
        &self.client_id
    }

    fn authorize_scope(&self, requested: &Scope) -> Result<Scope, OAuthError> {
        Ok(requested.intersection(&self.scope))
    }

    fn authorize_redirect_uri(&self, uri: &str) -> Result<(), OAuthError> {
        if self.redirect_uris.iter().any(|allowed| allowed == uri) {
            Ok(())
        } else {
            Err(OAuthError::unauthorized_client())
        }
    }

    fn authorize_resource_owner(&self, username: &str) -> Result<(), OAuthError> {
        match &self.owners {
            Some(owners) if !owners.iter().any(|owner| owner == username) => {
                Err(OAuthError::unauthorized_client())
            }
            _ => Ok(()),
        }
    }

    fn allow_strategy(&self, strategy: Strategy) -> bool {
        match &self.strategies {
            Some(strategies) => strategies.contains(&strategy),
            None => true,
        }
    }
}

impl ClientMap {
    /// Create an empty map without any clients or owners in it.
    pub fn new() -> ClientMap {
        ClientMap::default()
    }

    /// Insert or update the client record.
    pub fn register_client(&mut self, client: RegisteredClient) {
        self.clients.insert(client.client_id.clone(), client);
    }

    /// Insert or update a resource owner. Its grants are capped by the client's scope only.
    pub fn register_owner(&mut self, username: &str, password: &str) {
        self.owners.insert(
            username.to_string(),
            Owner {
                password: Secret::new(password),
                scope: None,
            },
        );
    }

    /// Insert or update a resource owner which grants at most `scope`.
    pub fn register_owner_with_scope(&mut self, username: &str, password: &str, scope: Scope) {
        self.owners.insert(
            username.to_string(),
            Owner {
                password: Secret::new(password),
                scope: Some(scope),
            },
        );
    }
}

impl Authenticator for ClientMap {
    fn get_client(&self, client_id: &str) -> Result<Box<dyn Client + '_>, OAuthError> {
        match self.clients.get(client_id) {
            Some(client) => Ok(Box::new(client)),
            None => {
                debug!("No client registered as {:?}", client_id);
                Err(OAuthError::unauthorized_client())
            }
        }
    }

    fn get_client_with_secret(
        &self, client_id: &str, secret: &Secret,
    ) -> Result<Box<dyn Client + '_>, OAuthError> {
        let client = self
            .clients
            .get(client_id)
            .ok_or_else(OAuthError::unauthorized_client)?;
        client.check_authentication(secret).map_err(|err| {
            debug!("Client {:?} failed to authenticate", client_id);
            err
        })?;
        Ok(Box::new(client))
    }

    fn authorize_resource_owner(
        &self, username: &str, password: &Secret, requested: &Scope,
    ) -> Result<Scope, OAuthError> {
        match self.owners.get(username) {
            Some(owner) if &owner.password == password => Ok(match &owner.scope {
                Some(scope) => requested.intersection(scope),
                None => requested.clone(),
            }),
            _ => {
                debug!("Resource owner {:?} failed to authenticate", username);
                Err(OAuthError::access_denied())
            }
        }
    }
}
