#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::rc::Rc;

use serde_json::Value;
use shared::api::{HttpRequest, RawResponse};
use shared::config::ClientConfig;
use shared::error::{ClientError, Result};
use shared::poll::Timer;
use shared::{RemoteApi, Transport};

pub const BASE_URL: &str = "http://detector.test";

#[derive(Default)]
struct Script {
    responses: HashMap<String, VecDeque<Result<RawResponse>>>,
    sent: Vec<HttpRequest<String>>,
}

/// Transport answering from per-path queues and recording every request.
/// Uploaded "files" are their names.
#[derive(Clone, Default)]
pub struct ScriptedTransport {
    script: Rc<RefCell<Script>>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(&self, path: &str, response: Result<RawResponse>) -> &Self {
        self.script
            .borrow_mut()
            .responses
            .entry(path.to_string())
            .or_default()
            .push_back(response);
        self
    }

    pub fn json(&self, path: &str, status: u16, body: Value) -> &Self {
        self.respond(path, Ok(RawResponse::new(status, body.to_string())))
    }

    pub fn status(&self, path: &str, status: u16) -> &Self {
        self.respond(path, Ok(RawResponse::new(status, "")))
    }

    pub fn unreachable(&self, path: &str) -> &Self {
        self.respond(
            path,
            Err(ClientError::Connection("TypeError: Failed to fetch".into())),
        )
    }

    pub fn requests(&self) -> Vec<HttpRequest<String>> {
        self.script.borrow().sent.clone()
    }

    pub fn paths(&self) -> Vec<String> {
        self.requests()
            .iter()
            .map(|r| path_of(&r.url).to_string())
            .collect()
    }

    pub fn count(&self, path: &str) -> usize {
        self.paths().iter().filter(|p| p.as_str() == path).count()
    }

    pub fn api(&self) -> RemoteApi<ScriptedTransport> {
        RemoteApi::new(self.clone(), ClientConfig::with_base_url(BASE_URL))
    }
}

fn path_of(url: &str) -> &str {
    url.strip_prefix(BASE_URL).unwrap_or(url)
}

impl Transport for ScriptedTransport {
    type File = String;

    async fn send(&self, request: HttpRequest<String>) -> Result<RawResponse> {
        let path = path_of(&request.url).to_string();
        let mut script = self.script.borrow_mut();
        script.sent.push(request);
        script
            .responses
            .get_mut(&path)
            .and_then(VecDeque::pop_front)
            .unwrap_or_else(|| Err(ClientError::Connection(format!("nothing scripted for {}", path))))
    }
}

/// Timer that returns immediately, counting sleeps. An optional hook runs
/// before each sleep completes.
#[derive(Clone, Default)]
pub struct InstantTimer {
    sleeps: Rc<Cell<u32>>,
    last_interval: Rc<Cell<u32>>,
    hook: Rc<RefCell<Option<Box<dyn FnMut(u32)>>>>,
}

impl InstantTimer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on_sleep(&self, hook: impl FnMut(u32) + 'static) {
        *self.hook.borrow_mut() = Some(Box::new(hook));
    }

    pub fn sleeps(&self) -> u32 {
        self.sleeps.get()
    }

    pub fn last_interval(&self) -> u32 {
        self.last_interval.get()
    }
}

impl Timer for InstantTimer {
    async fn sleep(&self, millis: u32) {
        self.sleeps.set(self.sleeps.get() + 1);
        self.last_interval.set(millis);
        if let Some(hook) = self.hook.borrow_mut().as_mut() {
            hook(self.sleeps.get());
        }
    }
}
