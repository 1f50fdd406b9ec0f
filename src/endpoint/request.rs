//! Reads the flow parameters out of a web request.
use std::borrow::Cow;
use std::str::from_utf8;

use crate::code_grant::Request;
use crate::primitives::secret::Secret;

use super::{Method, NormalizedParameter, QueryParameter, WebRequest};

/// The parameters of a web request, parsed once and owned.
///
/// Authorization requests carry their parameters in the query and the credentials of the resource
/// owner in the form body. Token requests carry everything in the body and the client credentials
/// in a basic authorization header.
pub(crate) struct WrappedRequest {
    /// The protocol parameters.
    params: NormalizedParameter,

    /// Resource owner credentials of a submitted consent form.
    owner: NormalizedParameter,

    /// The client credentials of the authorization header.
    authorization: Option<(String, Secret)>,

    /// Set when some part of the request could not be parsed.
    invalid: bool,
}

struct Invalid;

impl WrappedRequest {
    /// Wrap a request to the authorization endpoint.
    pub fn authorization<R: WebRequest>(request: &mut R) -> Self {
        let params = match request.query() {
            Ok(query) => query.into_owned(),
            Err(_) => return Self::invalid(),
        };

        let owner = if request.method() == Method::Post {
            match request.urlbody() {
                Ok(body) => body.into_owned(),
                Err(_) => return Self::invalid(),
            }
        } else {
            NormalizedParameter::new()
        };

        WrappedRequest {
            params,
            owner,
            authorization: None,
            invalid: false,
        }
    }

    /// Wrap a request to the token endpoint.
    pub fn token<R: WebRequest>(request: &mut R) -> Self {
        if request.method() != Method::Post {
            return Self::invalid();
        }

        // If there is a header, it must parse correctly.
        let authorization = match request.authheader() {
            Err(_) => return Self::invalid(),
            Ok(Some(header)) => match parse_basic(&header) {
                Ok(authorization) => Some(authorization),
                Err(Invalid) => return Self::invalid(),
            },
            Ok(None) => None,
        };

        let params = match request.urlbody() {
            Ok(body) => body.into_owned(),
            Err(_) => return Self::invalid(),
        };

        WrappedRequest {
            params,
            owner: NormalizedParameter::new(),
            authorization,
            invalid: false,
        }
    }

    fn invalid() -> Self {
        WrappedRequest {
            params: NormalizedParameter::new(),
            owner: NormalizedParameter::new(),
            authorization: None,
            invalid: true,
        }
    }
}

fn parse_basic(header: &str) -> Result<(String, Secret), Invalid> {
    if !header.starts_with("Basic ") {
        return Err(Invalid);
    }

    let combined = base64::decode(&header[6..]).map_err(|_| Invalid)?;
    let mut split = combined.splitn(2, |&c| c == b':');
    let client_bin = split.next().ok_or(Invalid)?;
    let passwd_bin = split.next().ok_or(Invalid)?;

    let client = from_utf8(client_bin).map_err(|_| Invalid)?;
    let passwd = from_utf8(passwd_bin).map_err(|_| Invalid)?;

    Ok((client.to_string(), Secret::new(passwd)))
}

impl Request for WrappedRequest {
    fn valid(&self) -> bool {
        !self.invalid
    }

    fn response_type(&self) -> Option<Cow<str>> {
        self.params.unique_value("response_type")
    }

    fn grant_type(&self) -> Option<Cow<str>> {
        self.params.unique_value("grant_type")
    }

    fn client_id(&self) -> Option<Cow<str>> {
        self.params.unique_value("client_id")
    }

    fn redirect_uri(&self) -> Option<Cow<str>> {
        self.params.unique_value("redirect_uri")
    }

    fn scope(&self) -> Option<Cow<str>> {
        self.params.unique_value("scope")
    }

    fn state(&self) -> Option<Cow<str>> {
        self.params.unique_value("state")
    }

    fn code(&self) -> Option<Cow<str>> {
        self.params.unique_value("code")
    }

    fn username(&self) -> Option<Cow<str>> {
        self.owner
            .unique_value("username")
            .or_else(|| self.params.unique_value("username"))
    }

    fn password(&self) -> Option<Cow<str>> {
        self.owner
            .unique_value("password")
            .or_else(|| self.params.unique_value("password"))
    }

    fn authorization(&self) -> Option<(Cow<str>, Secret)> {
        self.authorization
            .as_ref()
            .map(|(client, secret)| (Cow::Borrowed(client.as_str()), secret.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_header() {
        let header = format!("Basic {}", base64::encode("client:pass:word"));
        let (client, secret) = parse_basic(&header).ok().unwrap();
        assert_eq!(client, "client");
        assert_eq!(secret.raw(), "pass:word");

        let empty = format!("Basic {}", base64::encode("client:"));
        let (_, secret) = parse_basic(&empty).ok().unwrap();
        assert!(secret.is_empty());

        let no_colon = format!("Basic {}", base64::encode("client"));
        assert!(parse_basic(&no_colon).is_err());
        assert!(parse_basic("Basic !!!").is_err());
        assert!(parse_basic(&format!("basic {}", base64::encode("a:b"))).is_err());
    }
}
