//! A baseline implementation of request and response types.
//!
//! The types are owning and never fail. They are useful for tests and as an intermediate
//! representation when translating from the types of a web server.
pub mod request;

pub use self::request::{Body, NoError, Request, Response, Status};
