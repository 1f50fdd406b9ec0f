use std::collections::HashMap;

use log::debug;

use crate::primitives::client::{GrantType, ResponseType, Strategy};

/// The flows a server offers, keyed by the request parameter that selects them.
///
/// Each server owns its registry. Lookups use the `response_type` parameter at the authorization
/// endpoint and the `grant_type` parameter at the token endpoint. Values without a registered flow
/// are answered with `invalid_request`.
#[derive(Clone, Debug, Default)]
pub struct Registry {
    authorize: HashMap<ResponseType, Strategy>,
    token: HashMap<GrantType, Strategy>,
}

impl Registry {
    /// A registry without any flow.
    pub fn new() -> Self {
        Registry::default()
    }

    /// A registry with all four flows.
    pub fn standard() -> Self {
        let mut registry = Registry::new();
        for &strategy in Strategy::ALL.iter() {
            registry.register(strategy);
        }
        registry
    }

    /// Offer a flow, under its response type or grant type.
    pub fn register(&mut self, strategy: Strategy) {
        if let Some(response_type) = strategy.response_type() {
            self.authorize.insert(response_type, strategy);
        }
        if let Some(grant_type) = strategy.grant_type() {
            self.token.insert(grant_type, strategy);
        }
    }

    /// Stop offering a flow.
    ///
    /// The authorization code grant is selected at both endpoints and is removed from both.
    pub fn deregister(&mut self, strategy: Strategy) {
        self.authorize.retain(|_, registered| *registered != strategy);
        self.token.retain(|_, registered| *registered != strategy);
    }

    /// Whether a flow is offered.
    pub fn is_registered(&self, strategy: Strategy) -> bool {
        self.authorize.values().chain(self.token.values()).any(|&s| s == strategy)
    }

    /// The flow of an authorization request with the given `response_type`.
    pub fn authorize_strategy(&self, response_type: &str) -> Option<Strategy> {
        let strategy = response_type
            .parse::<ResponseType>()
            .ok()
            .and_then(|response_type| self.authorize.get(&response_type).copied());
        if strategy.is_none() {
            debug!("No flow for response type {:?}", response_type);
        }
        strategy
    }

    /// The flow of a token request with the given `grant_type`.
    pub fn token_strategy(&self, grant_type: &str) -> Option<Strategy> {
        let strategy = grant_type
            .parse::<GrantType>()
            .ok()
            .and_then(|grant_type| self.token.get(&grant_type).copied());
        if strategy.is_none() {
            debug!("No flow for grant type {:?}", grant_type);
        }
        strategy
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn standard_flows() {
        let registry = Registry::standard();
        assert_eq!(registry.authorize_strategy("code"), Some(Strategy::AuthorizationCode));
        assert_eq!(registry.authorize_strategy("token"), Some(Strategy::Implicit));
        assert_eq!(registry.token_strategy("authorization_code"), Some(Strategy::AuthorizationCode));
        assert_eq!(registry.token_strategy("password"), Some(Strategy::ResourceOwnerPasswordCredentials));
        assert_eq!(registry.token_strategy("client_credentials"), Some(Strategy::ClientCredentials));
        // Declared, but there is no flow for it.
        assert_eq!(registry.token_strategy("refresh_token"), None);
        assert_eq!(registry.token_strategy("Password"), None);
        assert_eq!(registry.authorize_strategy("code token"), None);
    }

    #[test]
    fn registries_are_independent() {
        let mut restricted = Registry::standard();
        restricted.deregister(Strategy::AuthorizationCode);
        restricted.deregister(Strategy::Implicit);

        assert_eq!(restricted.authorize_strategy("code"), None);
        assert_eq!(restricted.token_strategy("authorization_code"), None);
        assert!(!restricted.is_registered(Strategy::Implicit));
        assert!(restricted.is_registered(Strategy::ClientCredentials));

        let full = Registry::standard();
        assert_eq!(full.authorize_strategy("code"), Some(Strategy::AuthorizationCode));

        let mut empty = Registry::new();
        assert_eq!(empty.token_strategy("client_credentials"), None);
        empty.register(Strategy::ClientCredentials);
        assert_eq!(empty.token_strategy("client_credentials"), Some(Strategy::ClientCredentials));
        assert_eq!(empty.token_strategy("password"), None);
    }
}
