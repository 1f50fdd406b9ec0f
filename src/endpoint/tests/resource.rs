use std::cell::Cell;
use std::sync::Arc;

use chrono::{Duration, TimeZone, Utc};

use crate::code_grant::error::ErrorType;
use crate::endpoint::{Server, WebResponse};
use crate::primitives::clock::ManualClock;
use crate::primitives::grant::TokenType;
use crate::primitives::scope::Scope;
use crate::session::{MemoryBackend, SessionStore};

use super::defaults::*;
use super::{clients, server, Body, CraftedError, CraftedRequest, CraftedResponse, Status};

fn scope(scope: &str) -> Scope {
    scope.parse().unwrap()
}

fn resource() -> CraftedRequest {
    CraftedRequest::get(&[])
}

fn content(_: CraftedRequest) -> Result<CraftedResponse, CraftedError> {
    let mut response = CraftedResponse::default();
    response.ok()?;
    response.body_text("resource content")?;
    Ok(response)
}

#[test]
fn valid_token_reaches_handler() {
    let server = server();
    let grant = server
        .store()
        .new_client_grant(EXAMPLE_CLIENT_ID, scope("example default"))
        .unwrap();
    let calls = Cell::new(0);
    let handler = |request: CraftedRequest| {
        calls.set(calls.get() + 1);
        content(request)
    };
    let protected = server.secure(scope("example"), handler);

    let response = protected
        .handle(resource().with_auth(&format!("Bearer {}", grant.access_token.raw())))
        .expect("Expected non-error response");

    assert_eq!(calls.get(), 1);
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.body, Some(Body::Text("resource content".to_string())));
}

#[test]
fn rejected_requests_never_reach_handler() {
    let server = server();
    let grant = server
        .store()
        .new_client_grant(EXAMPLE_CLIENT_ID, scope("example"))
        .unwrap();
    let token = grant.access_token.raw();
    let calls = Cell::new(0);
    let handler = |request: CraftedRequest| {
        calls.set(calls.get() + 1);
        content(request)
    };
    let protected = server.secure(scope("default"), handler);

    let requests = vec![
        resource(),
        resource().with_auth(&format!("bearer {}", token)),
        resource().with_auth(&format!("Basic {}", token)),
        resource().with_auth("Bearer NotAToken"),
        // Out of scope.
        resource().with_auth(&format!("Bearer {}", token)),
    ];

    for request in requests {
        let response = protected.handle(request).unwrap();
        response.assert_error(Status::Unauthorized, ErrorType::AccessDenied);
        assert_eq!(
            response.www_authenticate.as_ref().map(String::as_str),
            Some("Bearer scope=\"default\", error=\"access_denied\"")
        );
    }

    assert_eq!(calls.get(), 0);
}

#[test]
fn empty_scope_only_needs_a_token() {
    let server = server();
    let unbound = server.store().new_grant(Scope::empty()).unwrap();
    let protected = server.secure(Scope::empty(), content);

    let response = protected
        .handle(resource().with_auth(&format!("Bearer {}", unbound.access_token.raw())))
        .unwrap();
    assert_eq!(response.status, Status::Ok);

    let missing = protected.handle(resource()).unwrap();
    missing.assert_error(Status::Unauthorized, ErrorType::AccessDenied);
    assert_eq!(
        missing.www_authenticate.as_ref().map(String::as_str),
        Some("Bearer error=\"access_denied\"")
    );
}

#[test]
fn expired_grant_is_removed() {
    let clock = Arc::new(ManualClock::at(Utc.ymd(2020, 1, 1).and_hms(0, 0, 0)));
    let store = SessionStore::new(MemoryBackend::new()).with_clock(clock.clone());
    let server = Server::new(clients(), store);
    let grant = server
        .store()
        .new_client_grant(EXAMPLE_CLIENT_ID, scope("example"))
        .unwrap();
    let protected = server.secure(scope("example"), content);
    let request = || resource().with_auth(&format!("Bearer {}", grant.access_token.raw()));

    clock.advance(Duration::seconds(3599));
    assert_eq!(protected.handle(request()).unwrap().status, Status::Ok);

    clock.advance(Duration::seconds(2));
    let response = protected.handle(request()).unwrap();
    response.assert_error(Status::Unauthorized, ErrorType::AccessDenied);
    assert_eq!(server.store().backend().grant_count(), 0);
}

#[test]
fn client_scope_is_current() {
    let server = server();
    // Issued to a client which is not allowed `admin` itself.
    let grant = server
        .store()
        .new_client_grant(EXAMPLE_CLIENT_ID, scope("example admin"))
        .unwrap();
    let header = format!("Bearer {}", grant.access_token.raw());

    let example = server.secure(scope("example"), content);
    assert_eq!(example.handle(resource().with_auth(&header)).unwrap().status, Status::Ok);

    let admin = server.secure(scope("admin"), content);
    admin
        .handle(resource().with_auth(&header))
        .unwrap()
        .assert_error(Status::Unauthorized, ErrorType::AccessDenied);
}

#[test]
fn mac_tokens_are_unsupported() {
    let server = server();
    let grant = server.store().new_grant(Scope::empty()).unwrap();
    let calls = Cell::new(0);
    let handler = |request: CraftedRequest| {
        calls.set(calls.get() + 1);
        content(request)
    };
    let protected = server.secure_with(TokenType::Mac, Scope::empty(), handler);

    let response = protected
        .handle(resource().with_auth(&format!("Bearer {}", grant.access_token.raw())))
        .unwrap();
    response.assert_error(Status::BadRequest, ErrorType::InvalidRequest);
    assert_eq!(calls.get(), 0);
}

#[test]
fn verify_returns_grant() {
    let server = server();
    let grant = server
        .store()
        .new_client_grant(EXAMPLE_CLIENT_ID, scope("example"))
        .unwrap();

    let mut request = resource().with_auth(&format!("Bearer {}", grant.access_token.raw()));
    let verified = server.verify(&mut request, &scope("example")).unwrap().unwrap();
    assert_eq!(verified, grant);

    let denied = server.verify(&mut request, &scope("default")).unwrap().unwrap_err();
    assert_eq!(denied.error().kind(), ErrorType::AccessDenied);
}
