//! Scripted in-memory transport for unit tests

use crate::error::{DeepintError, DeepintResult};
use crate::http::{ApiContext, ApiRequest, Method, PAGE_PARAMETER, Transport};
use async_trait::async_trait;
use parking_lot::Mutex;
use serde_json::{Value, json};
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

/// Serves list endpoints page by page and replays scripted responses for
/// everything else. The last scripted response of a route repeats forever.
pub(crate) struct FakeTransport {
    page_size: usize,
    lists: Mutex<HashMap<String, Vec<Value>>>,
    routes: Mutex<HashMap<(Method, String), VecDeque<DeepintResult<Value>>>>,
    log: Mutex<Vec<ApiRequest>>,
}

impl FakeTransport {
    pub fn new(page_size: usize) -> Arc<Self> {
        Arc::new(Self {
            page_size: page_size.max(1),
            lists: Mutex::new(HashMap::new()),
            routes: Mutex::new(HashMap::new()),
            log: Mutex::new(Vec::new()),
        })
    }

    pub fn context(self: &Arc<Self>) -> ApiContext {
        ApiContext::new(self.clone(), "org-test")
    }

    /// Register (or replace) the records behind a list endpoint
    pub fn list(&self, path: &str, records: Vec<Value>) {
        self.lists.lock().insert(path.to_string(), records);
    }

    pub fn respond(&self, method: Method, path: &str, body: Value) {
        self.script(method, path, vec![Ok(body)]);
    }

    pub fn script(&self, method: Method, path: &str, responses: Vec<DeepintResult<Value>>) {
        self.routes
            .lock()
            .insert((method, path.to_string()), responses.into());
    }

    pub fn requests(&self) -> Vec<ApiRequest> {
        self.log.lock().clone()
    }

    pub fn count(&self, method: Method, path: &str) -> usize {
        self.log
            .lock()
            .iter()
            .filter(|r| r.method == method && r.path == path)
            .count()
    }

    fn serve_page(&self, request: &ApiRequest) -> Option<Value> {
        let lists = self.lists.lock();
        let records = lists.get(&request.path)?;
        let page = request
            .parameter(PAGE_PARAMETER)
            .and_then(Value::as_u64)
            .unwrap_or(0) as usize;
        let pages_count = records.len().div_ceil(self.page_size).max(1);
        let items: Vec<Value> = records
            .iter()
            .skip(page * self.page_size)
            .take(self.page_size)
            .cloned()
            .collect();
        Some(json!({"page": page, "pages_count": pages_count, "items": items}))
    }
}

#[async_trait]
impl Transport for FakeTransport {
    async fn send(&self, request: ApiRequest) -> DeepintResult<Value> {
        self.log.lock().push(request.clone());

        if request.method == Method::Get {
            if let Some(page) = self.serve_page(&request) {
                return Ok(page);
            }
        }

        let mut routes = self.routes.lock();
        let Some(queue) = routes.get_mut(&(request.method, request.path.clone())) else {
            return Err(DeepintError::not_found(format!(
                "no route for {} {}",
                request.method, request.path
            )));
        };
        match queue.len() {
            0 => Err(DeepintError::not_found("script exhausted")),
            1 => queue[0].clone(),
            _ => queue.pop_front().unwrap_or(Ok(Value::Null)),
        }
    }
}

/// `n` records named `name-{i}` with ids `id-{i}`
pub(crate) fn records(n: usize) -> Vec<Value> {
    (0..n)
        .map(|i| json!({"id": format!("id-{i}"), "name": format!("name-{i}")}))
        .collect()
}
