//! The volatile, single process back-end.
use std::collections::hash_map::{Entry, HashMap};
use std::sync::{Mutex, MutexGuard};

use crate::primitives::grant::{AuthorizationCode, Grant};

use super::backend::{Backend, BackendError};

/// Keeps all records in memory behind a single lock.
///
/// Every operation holds the lock for its whole duration, which makes each of them atomic.
#[derive(Debug, Default)]
pub struct MemoryBackend {
    inner: Mutex<Records>,
}

#[derive(Debug, Default)]
struct Records {
    grants: HashMap<String, Grant>,
    codes: HashMap<String, AuthorizationCode>,
}

impl MemoryBackend {
    /// An empty back-end.
    pub fn new() -> Self {
        MemoryBackend::default()
    }

    /// The number of stored grants, expired ones included.
    pub fn grant_count(&self) -> usize {
        self.records().grants.len()
    }

    /// The number of stored authorization codes, expired ones included.
    pub fn code_count(&self) -> usize {
        self.records().codes.len()
    }

    fn records(&self) -> MutexGuard<'_, Records> {
        // The maps stay consistent even if a holder panicked, every operation is a single step.
        self.inner
            .lock()
            .unwrap_or_else(|poison| poison.into_inner())
    }
}

fn insert<V>(map: &mut HashMap<String, V>, key: &str, value: V) -> Result<(), BackendError> {
    match map.entry(key.to_string()) {
        Entry::Occupied(_) => Err(BackendError::Occupied),
        Entry::Vacant(vacant) => {
            vacant.insert(value);
            Ok(())
        }
    }
}

impl Backend for MemoryBackend {
    fn put_grant(&self, grant: Grant) -> Result<(), BackendError> {
        let key = grant.access_token.raw().to_string();
        insert(&mut self.records().grants, &key, grant)
    }

    fn get_grant(&self, access_token: &str) -> Result<Grant, BackendError> {
        self.records()
            .grants
            .get(access_token)
            .cloned()
            .ok_or(BackendError::NotFound)
    }

    fn delete_grant(&self, access_token: &str) -> Result<(), BackendError> {
        self.records()
            .grants
            .remove(access_token)
            .map(drop)
            .ok_or(BackendError::NotFound)
    }

    fn put_authorization_code(&self, code: AuthorizationCode) -> Result<(), BackendError> {
        let key = code.code.raw().to_string();
        insert(&mut self.records().codes, &key, code)
    }

    fn get_authorization_code(&self, code: &str) -> Result<AuthorizationCode, BackendError> {
        self.records()
            .codes
            .get(code)
            .cloned()
            .ok_or(BackendError::NotFound)
    }

    fn delete_authorization_code(&self, code: &str) -> Result<(), BackendError> {
        self.records()
            .codes
            .remove(code)
            .map(drop)
            .ok_or(BackendError::NotFound)
    }
}
