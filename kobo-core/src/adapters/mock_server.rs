//! Mock BaaS and Paystack server for testing
//!
//! One listener serves both systems under path prefixes:
//! - `/baas-auth/auth/{login,signup,me}` for the auth group
//! - `/baas/{resource}[/{id}]` for the data group
//! - `/paystack/...` for the payments provider
//!
//! State lives in memory so tests can assert on what was written and on
//! which endpoints were hit.

use std::collections::HashMap;
use std::io::{Read, Write};
use std::net::{TcpListener, TcpStream};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;

use serde_json::{json, Map, Value as JsonValue};

pub const MOCK_EMAIL: &str = "ada@example.com";
pub const MOCK_PASSWORD: &str = "correct-horse";
pub const MOCK_TOKEN: &str = "tok_mock_session";
pub const MOCK_SECRET_KEY: &str = "sk_test_mock";
pub const TAKEN_EMAIL: &str = "taken@example.com";
/// The only account number the resolve endpoint knows
pub const RESOLVABLE_ACCOUNT: &str = "0123456789";
pub const RESOLVED_NAME: &str = "JANE DOE";

/// Configuration for mock behavior
#[derive(Debug, Clone)]
pub struct MockConfig {
    /// Starting balance of the mock user, in Naira
    pub balance: f64,
    /// `POST /transfer` answers 400
    pub fail_transfer: bool,
    /// `PATCH /auth/me` answers 500 with no message
    pub fail_balance_update: bool,
    /// Status reported by `GET /transaction/verify/{ref}`
    pub payment_status: String,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            balance: 20000.0,
            fail_transfer: false,
            fail_balance_update: false,
            payment_status: "success".to_string(),
        }
    }
}

#[derive(Debug, Default)]
struct MockState {
    user: Map<String, JsonValue>,
    collections: HashMap<String, Vec<JsonValue>>,
    payments: Vec<JsonValue>,
    requests: Vec<String>,
    next_id: i64,
}

impl MockState {
    fn new(config: &MockConfig) -> Self {
        let mut user = Map::new();
        user.insert("id".into(), json!(1));
        user.insert("name".into(), json!("Ada Obi"));
        user.insert("email".into(), json!(MOCK_EMAIL));
        user.insert("phone".into(), json!("08012345678"));
        user.insert("accountNumber".into(), json!("1234000001"));
        user.insert("balance".into(), json!(config.balance));
        user.insert("created_at".into(), json!(1_700_000_000_000_i64));
        Self {
            user,
            next_id: 1,
            ..Self::default()
        }
    }

    fn next_id(&mut self) -> i64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }
}

struct Request {
    method: String,
    path: String,
    query: HashMap<String, String>,
    headers: HashMap<String, String>,
    body: JsonValue,
}

impl Request {
    fn bearer(&self) -> Option<&str> {
        self.headers
            .get("authorization")
            .and_then(|v| v.strip_prefix("Bearer ").or_else(|| v.strip_prefix("bearer ")))
    }
}

struct Reply {
    status: u16,
    body: JsonValue,
}

fn reply(status: u16, body: JsonValue) -> Reply {
    Reply { status, body }
}

/// Mock server for testing
pub struct MockKoboServer {
    port: u16,
    running: Arc<AtomicBool>,
    state: Arc<Mutex<MockState>>,
    thread_handle: Option<thread::JoinHandle<()>>,
}

impl MockKoboServer {
    /// Start a new mock server on a random available port
    pub fn start(config: MockConfig) -> std::io::Result<Self> {
        let listener = TcpListener::bind("127.0.0.1:0")?;
        let port = listener.local_addr()?.port();
        let running = Arc::new(AtomicBool::new(true));
        let state = Arc::new(Mutex::new(MockState::new(&config)));

        listener.set_nonblocking(true)?;

        let running_clone = running.clone();
        let state_clone = state.clone();
        let thread_handle = thread::spawn(move || {
            while running_clone.load(Ordering::SeqCst) {
                match listener.accept() {
                    Ok((stream, _)) => {
                        let cfg = config.clone();
                        let state = state_clone.clone();
                        thread::spawn(move || handle_connection(stream, &cfg, &state));
                    }
                    Err(ref e) if e.kind() == std::io::ErrorKind::WouldBlock => {
                        thread::sleep(std::time::Duration::from_millis(5));
                    }
                    Err(_) => break,
                }
            }
        });

        Ok(Self {
            port,
            running,
            state,
            thread_handle: Some(thread_handle),
        })
    }

    pub fn base_url(&self) -> String {
        format!("http://127.0.0.1:{}", self.port)
    }

    pub fn auth_base_url(&self) -> String {
        format!("{}/baas-auth", self.base_url())
    }

    pub fn api_base_url(&self) -> String {
        format!("{}/baas", self.base_url())
    }

    pub fn paystack_base_url(&self) -> String {
        format!("{}/paystack", self.base_url())
    }

    /// `"METHOD /path"` for every request received, in order
    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }

    pub fn request_count(&self, prefix: &str) -> usize {
        self.requests().iter().filter(|r| r.starts_with(prefix)).count()
    }

    /// Records currently held in a BaaS collection
    pub fn collection(&self, resource: &str) -> Vec<JsonValue> {
        self.state
            .lock()
            .unwrap()
            .collections
            .get(resource)
            .cloned()
            .unwrap_or_default()
    }

    /// Seed a BaaS collection record; returns its id
    pub fn insert(&self, resource: &str, mut record: JsonValue) -> i64 {
        let mut state = self.state.lock().unwrap();
        let id = state.next_id();
        if let Some(obj) = record.as_object_mut() {
            obj.insert("id".into(), json!(id));
            obj.entry("created_at").or_insert(json!(1_700_000_000_000_i64 + id));
        }
        state
            .collections
            .entry(resource.to_string())
            .or_default()
            .push(record);
        id
    }

    /// The user record as the BaaS currently holds it
    pub fn user(&self) -> JsonValue {
        JsonValue::Object(self.state.lock().unwrap().user.clone())
    }

    pub fn stop(&mut self) {
        self.running.store(false, Ordering::SeqCst);
        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for MockKoboServer {
    fn drop(&mut self) {
        self.stop();
    }
}

fn handle_connection(mut stream: TcpStream, config: &MockConfig, state: &Mutex<MockState>) {
    let _ = stream.set_nonblocking(false);
    let request = match read_request(&mut stream) {
        Some(request) => request,
        None => {
            send_response(&mut stream, 400, &json!({"message": "Invalid request"}));
            return;
        }
    };

    let mut state = match state.lock() {
        Ok(state) => state,
        Err(_) => return,
    };
    state
        .requests
        .push(format!("{} {}", request.method, request.path));

    let reply = if let Some(rest) = request.path.strip_prefix("/baas-auth") {
        route_auth(rest, &request, config, &mut state)
    } else if let Some(rest) = request.path.strip_prefix("/baas") {
        route_data(rest, &request, &mut state)
    } else if let Some(rest) = request.path.strip_prefix("/paystack") {
        route_paystack(rest, &request, config, &mut state)
    } else {
        reply(404, json!({"message": "Not Found"}))
    };
    drop(state);

    send_response(&mut stream, reply.status, &reply.body);
}

fn route_auth(path: &str, req: &Request, config: &MockConfig, state: &mut MockState) -> Reply {
    match (req.method.as_str(), path) {
        ("POST", "/auth/login") => {
            if req.body["email"] == MOCK_EMAIL && req.body["password"] == MOCK_PASSWORD {
                reply(200, json!({ "authToken": MOCK_TOKEN }))
            } else {
                reply(
                    403,
                    json!({"code": "ERROR_CODE_ACCESS_DENIED", "message": "Invalid Credentials."}),
                )
            }
        }
        ("POST", "/auth/signup") => {
            if req.body["email"] == TAKEN_EMAIL {
                return reply(403, json!({"message": "Duplicate record detected."}));
            }
            if let Some(body) = req.body.as_object() {
                for (key, value) in body {
                    if key != "password" {
                        state.user.insert(key.clone(), value.clone());
                    }
                }
            }
            reply(200, json!({ "authToken": MOCK_TOKEN }))
        }
        ("GET", "/auth/me") if req.bearer() == Some(MOCK_TOKEN) => {
            reply(200, JsonValue::Object(state.user.clone()))
        }
        ("PATCH", "/auth/me") if req.bearer() == Some(MOCK_TOKEN) => {
            if config.fail_balance_update {
                return reply(500, json!({}));
            }
            if let Some(balance) = req.body.get("balance") {
                state.user.insert("balance".into(), balance.clone());
            }
            reply(200, JsonValue::Object(state.user.clone()))
        }
        ("GET", "/auth/me") | ("PATCH", "/auth/me") => {
            reply(401, json!({"message": "Invalid token."}))
        }
        _ => reply(404, json!({"message": "Unable to locate request."})),
    }
}

fn route_data(path: &str, req: &Request, state: &mut MockState) -> Reply {
    if req.bearer() != Some(MOCK_TOKEN) {
        return reply(401, json!({"message": "Authentication required."}));
    }

    let segments: Vec<&str> = path.trim_matches('/').split('/').collect();
    let (resource, id) = match segments.as_slice() {
        [resource] if !resource.is_empty() => (resource.to_string(), None),
        [resource, id] => (resource.to_string(), Some(id.to_string())),
        _ => return reply(404, json!({"message": "Unable to locate request."})),
    };

    let matches_id = |record: &JsonValue, id: &str| {
        record.get("id").map(|v| match v {
            JsonValue::String(s) => s == id,
            other => other.to_string() == id,
        }) == Some(true)
    };

    match (req.method.as_str(), id) {
        ("GET", None) => reply(
            200,
            JsonValue::Array(state.collections.get(&resource).cloned().unwrap_or_default()),
        ),
        ("POST", None) => {
            let id = state.next_id();
            let mut record = req.body.as_object().cloned().unwrap_or_default();
            record.insert("id".into(), json!(id));
            record.insert("created_at".into(), json!(1_700_000_000_000_i64 + id));
            let record = JsonValue::Object(record);
            state
                .collections
                .entry(resource)
                .or_default()
                .push(record.clone());
            reply(200, record)
        }
        ("GET", Some(id)) => match state
            .collections
            .get(&resource)
            .and_then(|items| items.iter().find(|r| matches_id(r, id.as_str())))
        {
            Some(record) => reply(200, record.clone()),
            None => reply(404, json!({"message": "Not Found."})),
        },
        ("PATCH", Some(id)) => {
            let found = state
                .collections
                .get_mut(&resource)
                .and_then(|items| items.iter_mut().find(|r| matches_id(&**r, id.as_str())));
            match (found, req.body.as_object()) {
                (Some(JsonValue::Object(record)), Some(patch)) => {
                    for (key, value) in patch {
                        record.insert(key.clone(), value.clone());
                    }
                    reply(200, JsonValue::Object(record.clone()))
                }
                _ => reply(404, json!({"message": "Not Found."})),
            }
        }
        ("DELETE", Some(id)) => {
            let items = state.collections.entry(resource).or_default();
            let before = items.len();
            items.retain(|r| !matches_id(r, id.as_str()));
            if items.len() == before {
                reply(404, json!({"message": "Not Found."}))
            } else {
                reply(200, JsonValue::Null)
            }
        }
        _ => reply(405, json!({"message": "Method not allowed"})),
    }
}

fn route_paystack(
    path: &str,
    req: &Request,
    config: &MockConfig,
    state: &mut MockState,
) -> Reply {
    if req.bearer() != Some(MOCK_SECRET_KEY) {
        return reply(401, json!({"status": false, "message": "Invalid key"}));
    }

    let ok = |message: &str, data: JsonValue| {
        reply(200, json!({"status": true, "message": message, "data": data}))
    };

    match (req.method.as_str(), path) {
        ("GET", "/bank") => ok(
            "Banks retrieved",
            json!([
                {"id": 1, "name": "Access Bank", "slug": "access-bank", "code": "044",
                 "active": true, "country": "Nigeria", "currency": "NGN", "type": "nuban"},
                {"id": 9, "name": "Guaranty Trust Bank", "slug": "guaranty-trust-bank",
                 "code": "058", "active": true, "country": "Nigeria", "currency": "NGN",
                 "type": "nuban"},
                {"id": 21, "name": "Zenith Bank", "slug": "zenith-bank", "code": "057",
                 "active": true, "country": "Nigeria", "currency": "NGN", "type": "nuban"}
            ]),
        ),
        ("GET", "/bank/resolve") => {
            let account = req.query.get("account_number").cloned().unwrap_or_default();
            if account == RESOLVABLE_ACCOUNT {
                ok(
                    "Account number resolved",
                    json!({"account_number": account, "account_name": RESOLVED_NAME, "bank_id": 9}),
                )
            } else {
                reply(
                    422,
                    json!({"status": false,
                           "message": "Could not resolve account name. Check parameters or try again."}),
                )
            }
        }
        ("POST", "/transferrecipient") => {
            let id = state.next_id();
            ok(
                "Transfer recipient created successfully",
                json!({"recipient_code": format!("RCP_mock{}", id), "name": req.body["name"], "id": id}),
            )
        }
        ("POST", "/transfer") => {
            if config.fail_transfer {
                return reply(
                    400,
                    json!({"status": false,
                           "message": "Your balance is not enough to fulfil this request"}),
                );
            }
            ok(
                "Transfer has been queued",
                json!({"reference": req.body["reference"], "transfer_code": "TRF_mock",
                       "status": "pending", "amount": req.body["amount"]}),
            )
        }
        ("POST", "/transaction/initialize") => {
            let reference = req.body["reference"].clone();
            state.payments.push(json!({
                "id": state.next_id,
                "status": config.payment_status,
                "reference": reference,
                "amount": req.body["amount"],
                "currency": "NGN",
                "gateway_response": "Successful",
                "channel": "card",
                "paid_at": "2024-01-01T10:00:00.000Z"
            }));
            ok(
                "Authorization URL created",
                json!({"authorization_url": "https://checkout.paystack.com/mock",
                       "access_code": "ac_mock", "reference": reference}),
            )
        }
        ("GET", "/transaction") => ok("Transactions retrieved", JsonValue::Array(state.payments.clone())),
        ("GET", p) if p.starts_with("/transaction/verify/") => {
            let reference = &p["/transaction/verify/".len()..];
            match state.payments.iter().find(|p| p["reference"] == reference) {
                Some(payment) => ok("Verification successful", payment.clone()),
                None => reply(
                    400,
                    json!({"status": false, "message": "Transaction reference not found"}),
                ),
            }
        }
        _ => reply(404, json!({"status": false, "message": "Not found"})),
    }
}

/// Read headers, then exactly `Content-Length` bytes of body
fn read_request(stream: &mut TcpStream) -> Option<Request> {
    let mut buffer = Vec::new();
    let mut chunk = [0u8; 4096];
    let header_end = loop {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            return None;
        }
        buffer.extend_from_slice(&chunk[..n]);
        if let Some(pos) = find_subslice(&buffer, b"\r\n\r\n") {
            break pos + 4;
        }
    };

    let head = String::from_utf8_lossy(&buffer[..header_end]).to_string();
    let mut lines = head.lines();
    let mut parts = lines.next()?.split_whitespace();
    let method = parts.next()?.to_string();
    let target = parts.next()?.to_string();

    let headers: HashMap<String, String> = lines
        .filter_map(|line| line.split_once(':'))
        .map(|(k, v)| (k.trim().to_lowercase(), v.trim().to_string()))
        .collect();

    let content_length: usize = headers
        .get("content-length")
        .and_then(|v| v.parse().ok())
        .unwrap_or(0);
    while buffer.len() < header_end + content_length {
        let n = stream.read(&mut chunk).ok()?;
        if n == 0 {
            break;
        }
        buffer.extend_from_slice(&chunk[..n]);
    }
    let body_bytes = &buffer[header_end..buffer.len().min(header_end + content_length)];
    let body = if body_bytes.is_empty() {
        JsonValue::Null
    } else {
        serde_json::from_slice(body_bytes).unwrap_or(JsonValue::Null)
    };

    let (path, query) = match target.split_once('?') {
        Some((path, query)) => (
            path.to_string(),
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        ),
        None => (target, HashMap::new()),
    };

    Some(Request {
        method,
        path,
        query,
        headers,
        body,
    })
}

fn find_subslice(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn send_response(stream: &mut TcpStream, status: u16, body: &JsonValue) {
    let body = body.to_string();
    let status_text = match status {
        200 => "OK",
        400 => "Bad Request",
        401 => "Unauthorized",
        403 => "Forbidden",
        404 => "Not Found",
        405 => "Method Not Allowed",
        422 => "Unprocessable Entity",
        _ => "Internal Server Error",
    };
    let response = format!(
        "HTTP/1.1 {} {}\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
        status,
        status_text,
        body.len(),
        body
    );
    let _ = stream.write_all(response.as_bytes());
    let _ = stream.flush();
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use secrecy::SecretString;

    use super::*;
    use crate::adapters::{PaystackClient, XanoClient};
    use crate::domain::result::Error;
    use crate::domain::{Credentials, NewRecipient, PaymentRequest, Resource, TransferRequest};
    use crate::ports::{BankingBackend, PaymentsProvider};

    fn clients(server: &MockKoboServer) -> (XanoClient, PaystackClient) {
        let backend = XanoClient::new(&server.auth_base_url(), &server.api_base_url()).unwrap();
        let provider = PaystackClient::new(
            &server.paystack_base_url(),
            SecretString::from(MOCK_SECRET_KEY.to_string()),
        )
        .unwrap();
        (backend, provider)
    }

    #[test]
    fn test_login_success_and_failure() {
        let server = MockKoboServer::start(MockConfig::default()).unwrap();
        let (backend, _) = clients(&server);

        let ok = backend
            .login(&Credentials::new(MOCK_EMAIL, MOCK_PASSWORD))
            .unwrap();
        assert_eq!(ok.auth_token.as_deref(), Some(MOCK_TOKEN));

        let err = backend
            .login(&Credentials::new(MOCK_EMAIL, "wrong"))
            .unwrap_err();
        assert_eq!(err.to_string(), "Invalid credentials");
        assert_eq!(err.status(), Some(403));
    }

    #[test]
    fn test_me_and_balance_patch() {
        let server = MockKoboServer::start(MockConfig::default()).unwrap();
        let (backend, _) = clients(&server);

        let user = backend.me(MOCK_TOKEN).unwrap();
        assert_eq!(user.balance, Decimal::from(20000));

        let updated = backend
            .update_balance(MOCK_TOKEN, Decimal::new(185005, 1))
            .unwrap();
        assert_eq!(updated.balance, Decimal::new(185005, 1));
        assert!(server.user()["balance"].is_number());

        let err = backend.me("tok_expired").unwrap_err();
        assert_eq!(err.to_string(), "Invalid token.");
    }

    #[test]
    fn test_balance_patch_failure_without_message() {
        let server = MockKoboServer::start(MockConfig {
            fail_balance_update: true,
            ..Default::default()
        })
        .unwrap();
        let (backend, _) = clients(&server);

        let err = backend
            .update_balance(MOCK_TOKEN, Decimal::from(100))
            .unwrap_err();
        assert_eq!(err.to_string(), "HTTP error! status: 500");
    }

    #[test]
    fn test_resource_crud() {
        let server = MockKoboServer::start(MockConfig::default()).unwrap();
        let (backend, _) = clients(&server);

        let created = backend
            .create(
                MOCK_TOKEN,
                Resource::Notification,
                &json!({"title": "Welcome", "message": "Hi", "read": false}),
            )
            .unwrap();
        let id = created["id"].to_string();

        let patched = backend
            .update(MOCK_TOKEN, Resource::Notification, &id, &json!({"read": true}))
            .unwrap();
        assert_eq!(patched["read"], true);
        assert_eq!(patched["title"], "Welcome");

        assert_eq!(backend.list(MOCK_TOKEN, Resource::Notification).unwrap().len(), 1);
        backend.delete(MOCK_TOKEN, Resource::Notification, &id).unwrap();
        assert!(backend.list(MOCK_TOKEN, Resource::Notification).unwrap().is_empty());

        let missing = backend.get(MOCK_TOKEN, Resource::Notification, &id);
        assert!(matches!(missing, Err(Error::NotFound(_))));
    }

    #[test]
    fn test_data_requests_require_token() {
        let server = MockKoboServer::start(MockConfig::default()).unwrap();
        let (backend, _) = clients(&server);

        let err = backend.list("nope", Resource::Card).unwrap_err();
        assert_eq!(err.status(), Some(401));
        assert_eq!(err.to_string(), "Authentication required.");
    }

    #[test]
    fn test_paystack_banks_and_resolve() {
        let server = MockKoboServer::start(MockConfig::default()).unwrap();
        let (_, provider) = clients(&server);

        let banks = provider.list_banks("nigeria").unwrap();
        assert_eq!(banks.len(), 3);
        assert!(server
            .requests()
            .iter()
            .any(|r| r == "GET /paystack/bank"));

        let resolved = provider.resolve_account(RESOLVABLE_ACCOUNT, "058").unwrap();
        assert_eq!(resolved.account_name, RESOLVED_NAME);

        let err = provider.resolve_account("9999999999", "058").unwrap_err();
        assert!(err.to_string().starts_with("Could not resolve account name"));
    }

    #[test]
    fn test_paystack_transfer_and_payment() {
        let server = MockKoboServer::start(MockConfig::default()).unwrap();
        let (_, provider) = clients(&server);

        let recipient = provider
            .create_recipient(&NewRecipient::nuban(RESOLVED_NAME, RESOLVABLE_ACCOUNT, "058"))
            .unwrap();
        assert!(recipient.recipient_code.starts_with("RCP_"));

        let transfer = provider
            .initiate_transfer(&TransferRequest::from_balance(
                250000,
                recipient.recipient_code,
                "transfer_1",
            ))
            .unwrap();
        assert_eq!(transfer.amount, 250000);
        assert_eq!(transfer.reference.as_deref(), Some("transfer_1"));

        let init = provider
            .initialize_payment(&PaymentRequest {
                amount: 500000,
                email: MOCK_EMAIL.to_string(),
                reference: "payment_1".to_string(),
                callback_url: None,
            })
            .unwrap();
        assert_eq!(init.reference, "payment_1");

        let verified = provider.verify_payment("payment_1").unwrap();
        assert!(verified.is_successful());
        assert_eq!(verified.amount, 500000);
        assert_eq!(provider.list_payments(1, 50).unwrap().len(), 1);
    }

    #[test]
    fn test_paystack_rejects_bad_key() {
        let server = MockKoboServer::start(MockConfig::default()).unwrap();
        let provider = PaystackClient::new(
            &server.paystack_base_url(),
            SecretString::from("sk_test_wrong".to_string()),
        )
        .unwrap();

        let err = provider.list_banks("nigeria").unwrap_err();
        assert_eq!(err.to_string(), "Invalid key");
        assert_eq!(err.status(), Some(401));
    }
}
