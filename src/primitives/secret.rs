//! Opaque string values that must not leak into logs.
use std::fmt;

use ring::constant_time::verify_slices_are_equal;
use serde::{Serialize, Serializer};

/// The placeholder printed instead of the raw value.
const MASK: &str = "xxxxxxxx";

/// A token, code or client secret.
///
/// The raw value is only available through [`raw`]. Formatting with `Display` or `Debug` and
/// serializing always produce a fixed run of `x` characters whose length is independent of the
/// value, so that a `Secret` can be logged or embedded in diagnostics without care.
///
/// ```
/// # use oxide_auth_session::primitives::secret::Secret;
/// let secret = Secret::new("s3cr3t");
/// assert_eq!(secret.raw(), "s3cr3t");
/// assert_eq!(format!("{}", secret), "xxxxxxxx");
/// assert_eq!(secret, Secret::new("s3cr3t"));
/// ```
///
/// [`raw`]: #method.raw
#[derive(Clone, Default)]
pub struct Secret(String);

impl Secret {
    /// Wrap a raw value.
    pub fn new<S: Into<String>>(raw: S) -> Self {
        Secret(raw.into())
    }

    /// The raw value, for transmission and storage keys.
    pub fn raw(&self) -> &str {
        &self.0
    }

    /// The masked form used whenever the value could be observed by a third party.
    pub fn masked(&self) -> &'static str {
        MASK
    }

    /// Check if the raw value is the empty string.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Unwrap the raw value.
    pub fn into_raw(self) -> String {
        self.0
    }
}

/// Compares the raw bytes in constant time.
impl PartialEq for Secret {
    fn eq(&self, other: &Secret) -> bool {
        verify_slices_are_equal(self.0.as_bytes(), other.0.as_bytes()).is_ok()
    }
}

impl Eq for Secret {}

impl From<String> for Secret {
    fn from(raw: String) -> Self {
        Secret(raw)
    }
}

impl<'a> From<&'a str> for Secret {
    fn from(raw: &'a str) -> Self {
        Secret(raw.to_string())
    }
}

impl fmt::Display for Secret {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.write_str(MASK)
    }
}

impl fmt::Debug for Secret {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        fmt.debug_tuple("Secret").field(&MASK).finish()
    }
}

impl Serialize for Secret {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(MASK)
    }
}
