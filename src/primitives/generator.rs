//! Generators produce the raw values of access tokens, refresh tokens and authorization codes.
//!
//! The tokens are opaque: they carry no information and are only meaningful as keys into the
//! session store. Guessing a valid token must be infeasible, so the default generator draws from
//! the system entropy source and fails loudly instead of falling back to anything weaker.
use std::sync::Arc;

use base64::{encode_config, URL_SAFE};
use log::error;
use ring::rand::{SecureRandom, SystemRandom};
use thiserror::Error;

use super::secret::Secret;

/// Number of random bytes in a default token, 192 bits of entropy.
pub const DEFAULT_TOKEN_BYTES: usize = 24;

/// Produces fresh, unique token values.
pub trait TokenGenerator {
    /// Generate a new token.
    ///
    /// An error indicates that no value of sufficient quality could be produced. Implementations
    /// must never substitute a weaker token in that case.
    fn generate(&self) -> Result<Secret, GeneratorError>;
}

/// The entropy source could not produce a token.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
#[error("the entropy source failed to produce a token")]
pub struct GeneratorError;

/// Generates tokens from system randomness, encoded in the url safe base64 alphabet.
#[derive(Debug)]
pub struct RandomGenerator {
    random: SystemRandom,
    len: usize,
}

impl RandomGenerator {
    /// Generates tokens with a specific byte length.
    pub fn new(length: usize) -> RandomGenerator {
        RandomGenerator {
            random: SystemRandom::new(),
            len: length,
        }
    }
}

impl Default for RandomGenerator {
    fn default() -> Self {
        RandomGenerator::new(DEFAULT_TOKEN_BYTES)
    }
}

impl TokenGenerator for RandomGenerator {
    fn generate(&self) -> Result<Secret, GeneratorError> {
        let mut result = vec![0; self.len];
        self.random.fill(result.as_mut_slice()).map_err(|_| {
            error!("System randomness unavailable, refusing to generate a token");
            GeneratorError
        })?;
        Ok(Secret::new(encode_config(&result, URL_SAFE)))
    }
}

impl<'a, G: TokenGenerator + ?Sized> TokenGenerator for &'a G {
    fn generate(&self) -> Result<Secret, GeneratorError> {
        (**self).generate()
    }
}

impl<G: TokenGenerator + ?Sized> TokenGenerator for Box<G> {
    fn generate(&self) -> Result<Secret, GeneratorError> {
        (**self).generate()
    }
}

impl<G: TokenGenerator + ?Sized> TokenGenerator for Arc<G> {
    fn generate(&self) -> Result<Secret, GeneratorError> {
        (**self).generate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn random_tokens_are_url_safe() {
        let generator = RandomGenerator::default();
        let token = generator.generate().unwrap();

        // 24 bytes encode to 32 characters without padding.
        assert_eq!(token.raw().len(), 32);
        assert!(token
            .raw()
            .chars()
            .all(|ch| ch.is_ascii_alphanumeric() || ch == '-' || ch == '_'));
    }

    #[test]
    fn random_tokens_differ() {
        let generator = RandomGenerator::default();
        let first = generator.generate().unwrap();
        let second = generator.generate().unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn custom_length() {
        let generator = RandomGenerator::new(3);
        assert_eq!(generator.generate().unwrap().raw().len(), 4);
    }
}
