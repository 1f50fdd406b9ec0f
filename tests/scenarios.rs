//! End to end scenarios through the simple frontend.
use std::sync::{Arc, Barrier};
use std::thread;

use chrono::Duration;
use serde_json::Value;

use oxide_auth_session::endpoint::{Consent, ConsentForm, Server, WebResponse};
use oxide_auth_session::frontends::simple::{Body, NoError, Request, Response, Status};
use oxide_auth_session::primitives::registrar::{ClientMap, RegisteredClient};
use oxide_auth_session::primitives::scope::Scope;
use oxide_auth_session::session::{MemoryBackend, SessionStore};

const REDIRECT_URI: &str = "https://cb.example";
const AUTHORIZE_QUERY: &str = "response_type=code&client_id=c1&redirect_uri=https%3A%2F%2Fcb.example";

fn setup_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

fn clients() -> ClientMap {
    let mut clients = ClientMap::new();
    clients.register_client(
        RegisteredClient::confidential("c1", "s1", "read".parse().unwrap()).with_redirect_uri(REDIRECT_URI),
    );
    clients.register_owner("alice", "wonderland");
    clients
}

fn server_with(store: SessionStore<MemoryBackend>) -> Server<ClientMap, MemoryBackend> {
    setup_logging();
    Server::new(clients(), store)
}

fn server() -> Server<ClientMap, MemoryBackend> {
    server_with(SessionStore::new(MemoryBackend::new()))
}

/// Shows the client and scope, and a login failure if there was one.
struct Prompt;

impl ConsentForm<Request> for Prompt {
    fn render(&mut self, _: &mut Request, consent: &Consent) -> Result<Response, NoError> {
        let mut response = Response::default();
        match consent.error() {
            None => response.ok()?,
            Some(_) => response.unauthorized("Login")?,
        }
        response.body_text(&format!("{} asks for {:?}", consent.client_id(), consent.scope().to_string()))?;
        Ok(response)
    }
}

fn json(response: &Response) -> Value {
    let body = response.json().expect("Response has a json body");
    serde_json::from_str(body).expect("Body is valid json")
}

fn obtain_code(server: &Server<ClientMap, MemoryBackend>) -> String {
    let request = Request::post("username=alice&password=wonderland").with_query(AUTHORIZE_QUERY);
    let response = server.authorize(request, &mut Prompt).unwrap_or_else(NoError::into);
    assert_eq!(response.status, Status::Redirect);

    let location = response.location.expect("Redirect has a location");
    let code = location
        .query_pairs()
        .find(|(key, _)| key == "code")
        .map(|(_, value)| value.into_owned());
    code.expect("Redirect carries a code")
}

fn exchange(code: &str) -> Request {
    Request::post(&format!(
        "grant_type=authorization_code&code={}&redirect_uri=https%3A%2F%2Fcb.example",
        code
    ))
    .with_basic_auth("c1", "s1")
}

#[test]
fn client_credentials_scenario() {
    let server = server();

    let request = Request::post("grant_type=client_credentials&scope=read").with_basic_auth("c1", "s1");
    let response = server.token(request).unwrap_or_else(NoError::into);

    assert_eq!(response.status, Status::Ok);
    let json = json(&response);
    assert!(json["access_token"].is_string());
    assert_eq!(json["scope"], "read");
    assert_eq!(json["token_type"], "bearer");
}

#[test]
fn authorization_code_scenario() {
    let server = server();

    let consent = server
        .authorize(Request::get(AUTHORIZE_QUERY), &mut Prompt)
        .unwrap_or_else(NoError::into);
    assert_eq!(consent.status, Status::Ok);
    assert_eq!(consent.body, Some(Body::Text("c1 asks for \"\"".to_string())));

    let code = obtain_code(&server);

    let response = server.token(exchange(&code)).unwrap_or_else(NoError::into);
    assert_eq!(response.status, Status::Ok);
    let json = json(&response);
    assert!(json["access_token"].is_string());
    assert!(json["refresh_token"].is_string());

    let repeated = server.token(exchange(&code)).unwrap_or_else(NoError::into);
    assert_eq!(repeated.status, Status::Unauthorized);
    assert_eq!(self::json(&repeated)["code"], "access_denied");
}

#[test]
fn failed_login_is_not_redirected() {
    let server = server();

    let request = Request::post("username=alice&password=queen").with_query(AUTHORIZE_QUERY);
    let response = server.authorize(request, &mut Prompt).unwrap_or_else(NoError::into);

    assert_eq!(response.status, Status::Unauthorized);
    assert!(response.location.is_none());
    assert_eq!(server.store().backend().code_count(), 0);
}

#[test]
fn code_expiry_scenario() {
    let store = SessionStore::new(MemoryBackend::new()).code_lifetime(Duration::milliseconds(1));
    let server = server_with(store);
    let code = obtain_code(&server);

    thread::sleep(std::time::Duration::from_millis(5));

    let response = server.token(exchange(&code)).unwrap_or_else(NoError::into);
    assert_eq!(response.status, Status::Unauthorized);
    assert_eq!(json(&response)["code"], "access_denied");
}

#[test]
fn bearer_gate_scenario() {
    let server = server();
    let token = {
        let request = Request::post("grant_type=client_credentials&scope=read").with_basic_auth("c1", "s1");
        let response = server.token(request).unwrap_or_else(NoError::into);
        json(&response)["access_token"].as_str().unwrap().to_string()
    };

    let calls = std::cell::Cell::new(0);
    let handler = |_: Request| -> Result<Response, NoError> {
        calls.set(calls.get() + 1);
        let mut response = Response::default();
        response.body_text("protected")?;
        Ok(response)
    };

    let read = server.secure("read".parse().unwrap(), &handler);
    let write = server.secure("write".parse().unwrap(), &handler);
    let any = server.secure(Scope::empty(), &handler);

    let rejected = vec![
        read.handle(Request::get("")),
        read.handle(Request::get("").with_auth(&format!("Token {}", token))),
        write.handle(Request::get("").with_bearer(&token)),
        any.handle(Request::get("").with_bearer("forged")),
    ];
    for response in rejected {
        let response = response.unwrap_or_else(NoError::into);
        assert_eq!(response.status, Status::Unauthorized);
        assert_eq!(json(&response)["code"], "access_denied");
        assert!(response.www_authenticate.unwrap().starts_with("Bearer "));
    }
    assert_eq!(calls.get(), 0);

    let response = read.handle(Request::get("").with_bearer(&token)).unwrap_or_else(NoError::into);
    assert_eq!(calls.get(), 1);
    assert_eq!(response.status, Status::Ok);
    assert_eq!(response.body, Some(Body::Text("protected".to_string())));
}

#[test]
fn concurrent_exchange_has_one_winner() {
    const RACERS: usize = 8;

    let server = Arc::new(server());
    let code = obtain_code(&server);
    let barrier = Arc::new(Barrier::new(RACERS));

    let racers: Vec<_> = (0..RACERS)
        .map(|_| {
            let server = Arc::clone(&server);
            let barrier = Arc::clone(&barrier);
            let request = exchange(&code);
            thread::spawn(move || {
                barrier.wait();
                server.token(request).unwrap_or_else(NoError::into).status
            })
        })
        .collect();

    let statuses: Vec<Status> = racers
        .into_iter()
        .map(|racer| racer.join().expect("Racer panicked"))
        .collect();

    assert_eq!(statuses.iter().filter(|&&status| status == Status::Ok).count(), 1);
    assert!(statuses
        .iter()
        .all(|&status| status == Status::Ok || status == Status::Unauthorized));
    assert_eq!(server.store().backend().grant_count(), 1);
}
