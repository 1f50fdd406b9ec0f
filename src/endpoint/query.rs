//! Parameters of a query string or form body.
//!
//! A key given more than once has no value at all. Otherwise a validating component and the flow
//! could each pick a different one of the values.
use std::borrow::{Borrow, Cow};
use std::collections::hash_map::{Entry, HashMap};

use url::form_urlencoded;

/// Read access to the parameters of a request.
pub trait QueryParameter {
    /// The value of a key that was given exactly once.
    fn unique_value(&self, key: &str) -> Option<Cow<str>>;

    /// An owned copy, keeping only the unique values.
    fn normalize(&self) -> NormalizedParameter;
}

/// Owned parameters, with keys that were repeated marked as poisoned.
#[derive(Clone, Debug, Default)]
pub struct NormalizedParameter {
    /// `None` for a key that appeared at least twice.
    values: HashMap<String, Option<String>>,
}

impl NormalizedParameter {
    /// No parameters.
    pub fn new() -> Self {
        NormalizedParameter::default()
    }

    /// Parse an `application/x-www-form-urlencoded` string, such as a query or a form body.
    pub fn from_urlencoded(encoded: &str) -> Self {
        let mut params = NormalizedParameter::new();
        for (key, value) in form_urlencoded::parse(encoded.as_bytes()) {
            match params.values.entry(key.into_owned()) {
                Entry::Vacant(vacant) => {
                    vacant.insert(Some(value.into_owned()));
                }
                Entry::Occupied(mut repeated) => {
                    repeated.insert(None);
                }
            }
        }
        params
    }
}

impl QueryParameter for NormalizedParameter {
    fn unique_value(&self, key: &str) -> Option<Cow<str>> {
        self.values
            .get(key)
            .and_then(Option::as_deref)
            .map(Cow::Borrowed)
    }

    fn normalize(&self) -> NormalizedParameter {
        self.clone()
    }
}

/// Parameters already split by a web library, with all values of each key.
impl QueryParameter for HashMap<String, Vec<String>> {
    fn unique_value(&self, key: &str) -> Option<Cow<str>> {
        match self.get(key).map(Vec::as_slice) {
            Some([value]) => Some(Cow::Borrowed(value.as_str())),
            _ => None,
        }
    }

    fn normalize(&self) -> NormalizedParameter {
        let values = self
            .iter()
            .map(|(key, values)| {
                let unique = match values.as_slice() {
                    [value] => Some(value.clone()),
                    _ => None,
                };
                (key.clone(), unique)
            })
            .collect();
        NormalizedParameter { values }
    }
}

impl Borrow<dyn QueryParameter> for NormalizedParameter {
    fn borrow(&self) -> &(dyn QueryParameter + 'static) {
        self
    }
}

impl ToOwned for dyn QueryParameter {
    type Owned = NormalizedParameter;

    fn to_owned(&self) -> Self::Owned {
        self.normalize()
    }
}
