// In-memory task service behind a wiremock server.
#![allow(clippy::unwrap_used, dead_code)]

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use serde_json::{Value, json};
use taskly_api::{TaskClient, TransportConfig};
use taskly_core::CollectionStore;
use wiremock::matchers::any;
use wiremock::{Mock, MockServer, Request, Respond, ResponseTemplate};

pub const COLLECTION_PATH: &str = "/api/tasks";

/// A stateful fake of the REST task service.
///
/// Handles list / create / update / delete on `COLLECTION_PATH` the way the
/// real service does, assigning ids `t1`, `t2`, ... Failures and latency
/// can be injected per HTTP method.
#[derive(Clone, Default)]
pub struct FakeBackend {
    state: Arc<Mutex<State>>,
}

#[derive(Default)]
struct State {
    tasks: Vec<Value>,
    next_id: u64,
    failures: HashMap<String, u16>,
    delay: Option<Duration>,
}

impl FakeBackend {
    pub async fn mount(&self, server: &MockServer) {
        Mock::given(any())
            .respond_with(self.clone())
            .mount(server)
            .await;
    }

    /// Insert a record directly, bypassing HTTP. Returns its id.
    pub fn seed(&self, title: &str, description: Option<&str>) -> String {
        self.state.lock().unwrap().insert(title, description.map(str::to_owned))
    }

    /// Change a record directly, as another client would.
    pub fn rename(&self, id: &str, title: &str) {
        let mut state = self.state.lock().unwrap();
        let task = state.find_mut(id).unwrap();
        task["title"] = json!(title);
        task["updatedAt"] = json!(Utc::now().to_rfc3339());
    }

    pub fn tasks(&self) -> Vec<Value> {
        self.state.lock().unwrap().tasks.clone()
    }

    /// Answer every request with `method` using `status` until `recover`.
    pub fn fail(&self, method: &str, status: u16) {
        self.state
            .lock()
            .unwrap()
            .failures
            .insert(method.to_owned(), status);
    }

    pub fn recover(&self) {
        self.state.lock().unwrap().failures.clear();
    }

    pub fn set_delay(&self, delay: Option<Duration>) {
        self.state.lock().unwrap().delay = delay;
    }
}

impl State {
    fn insert(&mut self, title: &str, description: Option<String>) -> String {
        self.next_id += 1;
        let id = format!("t{}", self.next_id);
        let now = Utc::now().to_rfc3339();
        self.tasks.push(json!({
            "id": id,
            "title": title,
            "description": description,
            "isCompleted": false,
            "createdAt": now,
            "updatedAt": now,
        }));
        id
    }

    fn find_mut(&mut self, id: &str) -> Option<&mut Value> {
        self.tasks.iter_mut().find(|t| t["id"] == id)
    }

    fn handle(&mut self, method: &str, path: &str, body: &[u8]) -> ResponseTemplate {
        let item = path
            .strip_prefix(COLLECTION_PATH)
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|id| !id.is_empty());

        match (method, item) {
            ("GET", None) => ResponseTemplate::new(200).set_body_json(&self.tasks),
            ("POST", None) => {
                let Ok(body) = serde_json::from_slice::<Value>(body) else {
                    return ResponseTemplate::new(400).set_body_string("bad json");
                };
                let title = body["title"].as_str().unwrap_or_default().to_owned();
                let description = body["description"].as_str().map(str::to_owned);
                let id = self.insert(&title, description);
                let created = self.find_mut(&id).unwrap().clone();
                ResponseTemplate::new(201).set_body_json(created)
            }
            ("PUT", Some(id)) => {
                let Ok(Value::Object(fields)) = serde_json::from_slice::<Value>(body) else {
                    return ResponseTemplate::new(400).set_body_string("bad json");
                };
                let Some(task) = self.find_mut(id) else {
                    return ResponseTemplate::new(404).set_body_json(json!({"error": "not found"}));
                };
                for key in ["title", "description", "isCompleted"] {
                    if let Some(value) = fields.get(key) {
                        task[key] = value.clone();
                    }
                }
                task["updatedAt"] = json!(Utc::now().to_rfc3339());
                ResponseTemplate::new(200).set_body_json(task.clone())
            }
            ("DELETE", Some(id)) => {
                let before = self.tasks.len();
                self.tasks.retain(|t| t["id"] != id);
                if self.tasks.len() == before {
                    ResponseTemplate::new(404).set_body_json(json!({"error": "not found"}))
                } else {
                    ResponseTemplate::new(204)
                }
            }
            _ => ResponseTemplate::new(405),
        }
    }
}

impl Respond for FakeBackend {
    fn respond(&self, request: &Request) -> ResponseTemplate {
        let mut state = self.state.lock().unwrap();
        let method = request.method.as_str();

        let template = match state.failures.get(method) {
            Some(&status) => ResponseTemplate::new(status).set_body_string("injected failure"),
            None => state.handle(method, request.url.path(), &request.body),
        };

        match state.delay {
            Some(delay) => template.set_delay(delay),
            None => template,
        }
    }
}

/// Fake service, and a store pointed at it. Nothing is loaded yet.
pub async fn setup() -> (MockServer, FakeBackend, CollectionStore) {
    let server = MockServer::start().await;
    let backend = FakeBackend::default();
    backend.mount(&server).await;
    let store = store_for(&server);
    (server, backend, store)
}

pub fn store_for(server: &MockServer) -> CollectionStore {
    let endpoint = format!("{}{COLLECTION_PATH}", server.uri());
    let client = TaskClient::new(&endpoint, &TransportConfig::default()).unwrap();
    CollectionStore::new(client)
}

/// Requests the server saw with `method`, bodies parsed as JSON.
pub async fn bodies(server: &MockServer, method: &str) -> Vec<Value> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .filter(|r| r.method.as_str() == method)
        .map(|r| serde_json::from_slice(&r.body).unwrap_or(Value::Null))
        .collect()
}

pub async fn request_methods(server: &MockServer) -> Vec<String> {
    server
        .received_requests()
        .await
        .unwrap()
        .into_iter()
        .map(|r| r.method.to_string())
        .collect()
}

/// Poll `check` every 10 ms until it holds or `limit` elapses.
pub async fn eventually(limit: Duration, mut check: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + limit;
    while tokio::time::Instant::now() < deadline {
        if check() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    check()
}
