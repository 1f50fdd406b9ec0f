use crate::primitives::client::Authenticator;
use crate::primitives::grant::TokenType;
use crate::primitives::scope::Scope;
use crate::session::Backend;

use super::{error_response, Server, WebRequest};

/// A handler of requests to a protected resource.
pub trait Handler<R: WebRequest> {
    /// Produce the response of an authorized request.
    fn handle(&self, request: R) -> Result<R::Response, R::Error>;
}

impl<R, F> Handler<R> for F
where
    R: WebRequest,
    F: Fn(R) -> Result<R::Response, R::Error>,
{
    fn handle(&self, request: R) -> Result<R::Response, R::Error> {
        self(request)
    }
}

/// A handler behind the bearer gate.
///
/// Created by [`Server::secure`]. Rejected requests never reach the wrapped handler, accepted ones
/// are passed on unchanged and its response is returned as is.
///
/// [`Server::secure`]: struct.Server.html#method.secure
pub struct Protected<'s, A, B, H> {
    server: &'s Server<A, B>,
    token_type: TokenType,
    required: Scope,
    handler: H,
}

impl<'s, A, B, H> Protected<'s, A, B, H> {
    pub(crate) fn new(server: &'s Server<A, B>, token_type: TokenType, required: Scope, handler: H) -> Self {
        Protected {
            server,
            token_type,
            required,
            handler,
        }
    }

    /// The scope a token must cover.
    pub fn required(&self) -> &Scope {
        &self.required
    }
}

impl<'s, A, B, H> Protected<'s, A, B, H>
where
    A: Authenticator,
    B: Backend,
{
    /// Check the request and invoke the handler if it is authorized.
    pub fn handle<R>(&self, mut request: R) -> Result<R::Response, R::Error>
    where
        R: WebRequest,
        R::Response: Default,
        H: Handler<R>,
    {
        match self.server.verify_with(self.token_type, &mut request, &self.required)? {
            Ok(_) => self.handler.handle(request),
            Err(err) => error_response(err.error(), &err.www_authenticate()),
        }
    }
}
