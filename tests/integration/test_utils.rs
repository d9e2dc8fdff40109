//! Shared test utilities for integration tests
//!
//! Provides isolated XDG directories and a recording CMCI dispatcher so tests
//! exercise the full command pipeline without a CICS region.

use async_trait::async_trait;
use cicsctl::client::{CmciDispatcher, CmciSession};
use cicsctl::error::CmciError;
use cicsctl::request::RequestEnvelope;
use cicsctl::response::CmciResponse;
use std::sync::Mutex;
use tempfile::TempDir;

/// Global mutex to serialize XDG environment variable access across all tests
static XDG_ENV_MUTEX: Mutex<()> = Mutex::new(());

struct EnvState {
    home: Option<String>,
    xdg_config_home: Option<String>,
}

impl EnvState {
    fn capture() -> Self {
        Self {
            home: std::env::var("HOME").ok(),
            xdg_config_home: std::env::var("XDG_CONFIG_HOME").ok(),
        }
    }

    fn restore(self) {
        if let Some(orig) = self.home {
            std::env::set_var("HOME", orig);
        } else {
            std::env::remove_var("HOME");
        }

        if let Some(orig) = self.xdg_config_home {
            std::env::set_var("XDG_CONFIG_HOME", orig);
        } else {
            std::env::remove_var("XDG_CONFIG_HOME");
        }
    }
}

/// Run a test with XDG_CONFIG_HOME and HOME pointed at an isolated temp
/// directory, restoring the original environment afterwards.
pub fn with_xdg_env<F, R>(test_dir: &TempDir, f: F) -> R
where
    F: FnOnce() -> R,
{
    let _guard = XDG_ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
    let env_state = EnvState::capture();

    let test_config_home = test_dir.path().to_path_buf();
    let test_home = test_dir.path().join("home");
    std::fs::create_dir_all(&test_home).unwrap();

    std::env::set_var("HOME", test_home.to_str().unwrap());
    std::env::set_var("XDG_CONFIG_HOME", test_config_home.to_str().unwrap());

    let result = f();

    env_state.restore();

    result
}

pub const OK_RESPONSE: &str = r#"<response><resultsummary api_response1="1024" api_response1_alt="OK" recordcount="1"/></response>"#;

/// One recorded HTTP round trip.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub method: &'static str,
    pub base_url: String,
    pub path: String,
    pub query: Vec<(String, String)>,
    pub body: Option<String>,
}

/// Dispatcher that records calls and answers with a canned response body.
pub struct RecordingDispatcher {
    calls: Mutex<Vec<RecordedCall>>,
    response_xml: String,
}

impl RecordingDispatcher {
    pub fn ok() -> Self {
        Self::with_response(OK_RESPONSE)
    }

    pub fn with_response(xml: &str) -> Self {
        RecordingDispatcher {
            calls: Mutex::new(Vec::new()),
            response_xml: xml.to_string(),
        }
    }

    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(
        &self,
        method: &'static str,
        session: &CmciSession,
        path: &str,
        query: &[(String, String)],
        body: Option<String>,
    ) {
        self.calls.lock().unwrap().push(RecordedCall {
            method,
            base_url: session.base_url(),
            path: path.to_string(),
            query: query.to_vec(),
            body,
        });
    }

    fn respond(&self) -> Result<CmciResponse, CmciError> {
        CmciResponse::from_xml(&self.response_xml)?.into_result()
    }
}

#[async_trait]
impl CmciDispatcher for RecordingDispatcher {
    async fn get(
        &self,
        session: &CmciSession,
        path: &str,
        query: &[(String, String)],
    ) -> Result<CmciResponse, CmciError> {
        self.record("GET", session, path, query, None);
        self.respond()
    }

    async fn post(
        &self,
        session: &CmciSession,
        path: &str,
        query: &[(String, String)],
        envelope: &RequestEnvelope,
    ) -> Result<CmciResponse, CmciError> {
        self.record("POST", session, path, query, Some(envelope.to_xml()));
        self.respond()
    }

    async fn put(
        &self,
        session: &CmciSession,
        path: &str,
        query: &[(String, String)],
        envelope: &RequestEnvelope,
    ) -> Result<CmciResponse, CmciError> {
        self.record("PUT", session, path, query, Some(envelope.to_xml()));
        self.respond()
    }

    async fn delete(
        &self,
        session: &CmciSession,
        path: &str,
        query: &[(String, String)],
    ) -> Result<CmciResponse, CmciError> {
        self.record("DELETE", session, path, query, None);
        self.respond()
    }
}
