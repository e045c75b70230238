//! Scripted datastore driver shared by the integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use axum::Router;
use minicluster::cluster::{ManagedDriver, ResetHooks, StorageBootstrap};
use minicluster::common::{ClientAccessInfo, NodeConfig};
use minicluster::{Error, Result};
use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "debug".into()),
        )
        .with_test_writer()
        .try_init();
}

#[derive(Default)]
pub struct Calls {
    pub is_initialized: AtomicUsize,
    pub test: AtomicUsize,
    pub start: AtomicUsize,
    pub reset: AtomicUsize,
    pub register: AtomicUsize,
    pub members: AtomicUsize,
}

impl Calls {
    pub fn total(&self) -> usize {
        [
            &self.is_initialized,
            &self.test,
            &self.start,
            &self.reset,
            &self.register,
            &self.members,
        ]
        .iter()
        .map(|c| c.load(Ordering::SeqCst))
        .sum()
    }
}

pub struct StubDriver {
    name: String,
    initialized: std::result::Result<bool, String>,
    test_failures: AtomicUsize,
    members: Mutex<VecDeque<std::result::Result<Vec<String>, String>>>,
    reset_marker: Option<PathBuf>,
    start_error: Option<String>,
    register_error: Option<String>,
    members_delay: Option<Duration>,
    events: Option<mpsc::UnboundedSender<&'static str>>,
    pub calls: Calls,
}

impl StubDriver {
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            initialized: Ok(false),
            test_failures: AtomicUsize::new(0),
            members: Mutex::new(VecDeque::new()),
            reset_marker: None,
            start_error: None,
            register_error: None,
            members_delay: None,
            events: None,
            calls: Calls::default(),
        }
    }

    pub fn initialized(mut self, on_disk: bool) -> Self {
        self.initialized = Ok(on_disk);
        self
    }

    pub fn probe_error(mut self, msg: &str) -> Self {
        self.initialized = Err(msg.to_string());
        self
    }

    /// Fail the first `n` health checks
    pub fn failing_tests(self, n: usize) -> Self {
        self.test_failures.store(n, Ordering::SeqCst);
        self
    }

    /// Scripted member queries; the last entry repeats forever
    pub fn members(self, script: Vec<std::result::Result<Vec<String>, String>>) -> Self {
        *self.members.lock().unwrap() = script.into();
        self
    }

    /// Write a reset marker at `path` during reset, like real drivers do
    pub fn writes_marker(mut self, path: PathBuf) -> Self {
        self.reset_marker = Some(path);
        self
    }

    pub fn start_error(mut self, msg: &str) -> Self {
        self.start_error = Some(msg.to_string());
        self
    }

    pub fn register_error(mut self, msg: &str) -> Self {
        self.register_error = Some(msg.to_string());
        self
    }

    /// Hold each member query for `delay` before answering
    pub fn slow_members(mut self, delay: Duration) -> Self {
        self.members_delay = Some(delay);
        self
    }

    pub fn events(mut self, tx: mpsc::UnboundedSender<&'static str>) -> Self {
        self.events = Some(tx);
        self
    }

    fn emit(&self, event: &'static str) {
        if let Some(tx) = &self.events {
            let _ = tx.send(event);
        }
    }
}

#[async_trait]
impl ManagedDriver for StubDriver {
    fn endpoint_name(&self) -> &str {
        &self.name
    }

    async fn is_initialized(&self, _config: &NodeConfig) -> Result<bool> {
        self.calls.is_initialized.fetch_add(1, Ordering::SeqCst);
        self.initialized.clone().map_err(Error::Driver)
    }

    async fn test(&self) -> Result<()> {
        self.calls.test.fetch_add(1, Ordering::SeqCst);
        self.emit("test");
        let remaining = self.test_failures.load(Ordering::SeqCst);
        if remaining > 0 {
            self.test_failures.store(remaining - 1, Ordering::SeqCst);
            return Err(Error::Unavailable("connection refused".into()));
        }
        Ok(())
    }

    async fn start(&self, _access: &ClientAccessInfo) -> Result<()> {
        self.calls.start.fetch_add(1, Ordering::SeqCst);
        self.emit("start");
        match &self.start_error {
            Some(msg) => Err(Error::Driver(msg.clone())),
            None => Ok(()),
        }
    }

    async fn reset(&self, hooks: &dyn ResetHooks) -> Result<()> {
        self.calls.reset.fetch_add(1, Ordering::SeqCst);
        self.emit("reset");
        hooks.clean_certs();
        hooks.rebootstrap().await?;
        if let Some(marker) = &self.reset_marker {
            std::fs::create_dir_all(marker.parent().unwrap())?;
            std::fs::write(marker, b"")?;
        }
        Ok(())
    }

    async fn register(&self, config: &NodeConfig, router: Router) -> Result<Router> {
        self.calls.register.fetch_add(1, Ordering::SeqCst);
        if let Some(msg) = &self.register_error {
            return Err(Error::Driver(msg.clone()));
        }
        let body = format!("{{\"endpoint\":\"{}\"}}", config.datastore.endpoint);
        Ok(router.route("/db/info", axum::routing::get(move || async move { body })))
    }

    async fn members_client_urls(&self) -> Result<Vec<String>> {
        self.calls.members.fetch_add(1, Ordering::SeqCst);
        self.emit("members");
        if let Some(delay) = self.members_delay {
            tokio::time::sleep(delay).await;
        }
        let mut script = self.members.lock().unwrap();
        let next = if script.len() > 1 {
            script.pop_front()
        } else {
            script.front().cloned()
        };
        match next {
            Some(Ok(urls)) => Ok(urls),
            Some(Err(msg)) => Err(Error::Unavailable(msg)),
            None => Ok(Vec::new()),
        }
    }
}

/// Bootstrap that counts invocations, optionally failing each one
#[derive(Default)]
pub struct CountingBootstrap {
    pub calls: AtomicUsize,
    failure: Option<String>,
}

impl CountingBootstrap {
    pub fn failing(msg: &str) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            failure: Some(msg.to_string()),
        }
    }
}

#[async_trait]
impl StorageBootstrap for CountingBootstrap {
    async fn bootstrap(&self) -> Result<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.failure {
            Some(msg) => Err(Error::Bootstrap(msg.clone())),
            None => Ok(()),
        }
    }
}
