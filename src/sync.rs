//! Week persistence against a remote key-value service.
//!
//! Every operation is keyed by week-key only; a save is always a full-week
//! snapshot overwrite. Load failures degrade to an empty week and save
//! failures are logged, never surfaced and never retried.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::error::{BoardError, Result};
use crate::store::TaskStore;
use crate::task::{WeekPayload, WeekTasks};

/// Storage service the board syncs with.
pub trait Backend: Send + Sync {
    /// Saved tasks for a week, `None` if the service has nothing for it.
    fn fetch(&self, week_key: &str) -> Result<Option<WeekTasks>>;
    /// Overwrite the week on the service.
    fn put(&self, week_key: &str, days: &WeekTasks) -> Result<()>;
    /// Remove the week from the service.
    fn delete(&self, week_key: &str) -> Result<()>;
}

#[derive(Serialize)]
struct WeekBody<'a> {
    days: &'a WeekTasks,
}

/// REST backend: `GET|POST|DELETE {base}/api/tasks/{week_key}`.
pub struct HttpBackend {
    base_url: String,
    agent: ureq::Agent,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        HttpBackend {
            base_url: base_url.trim_end_matches('/').to_string(),
            agent,
        }
    }

    fn url(&self, week_key: &str) -> String {
        format!("{}/api/tasks/{}", self.base_url, week_key)
    }
}

impl Backend for HttpBackend {
    fn fetch(&self, week_key: &str) -> Result<Option<WeekTasks>> {
        match self.agent.get(&self.url(week_key)).call() {
            Ok(response) if response.status() == 200 => {
                let payload: WeekPayload = response
                    .into_json()
                    .map_err(|e| BoardError::Decode(e.to_string()))?;
                Ok(Some(payload.days))
            }
            Ok(response) => {
                debug!(week_key, status = response.status(), "no saved week");
                Ok(None)
            }
            Err(ureq::Error::Status(status, _)) => {
                debug!(week_key, status, "no saved week");
                Ok(None)
            }
            Err(e) => Err(e.into()),
        }
    }

    fn put(&self, week_key: &str, days: &WeekTasks) -> Result<()> {
        self.agent
            .post(&self.url(week_key))
            .send_json(WeekBody { days })?;
        Ok(())
    }

    fn delete(&self, week_key: &str) -> Result<()> {
        self.agent.delete(&self.url(week_key)).call()?;
        Ok(())
    }
}

/// Process-local backend for offline sessions and tests.
#[derive(Default)]
pub struct MemoryBackend {
    weeks: Mutex<HashMap<String, WeekTasks>>,
    failing: AtomicBool,
    puts: AtomicUsize,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every subsequent call fail (or succeed again).
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    /// Number of successful saves received.
    pub fn put_count(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    /// What the service currently holds for a week.
    pub fn stored(&self, week_key: &str) -> Option<WeekTasks> {
        self.lock().get(week_key).cloned()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, WeekTasks>> {
        // A panicked holder cannot leave the map half-written; keep using it.
        self.weeks.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            Err(BoardError::Unavailable("memory backend set to fail".into()))
        } else {
            Ok(())
        }
    }
}

impl Backend for MemoryBackend {
    fn fetch(&self, week_key: &str) -> Result<Option<WeekTasks>> {
        self.check()?;
        Ok(self.lock().get(week_key).cloned())
    }

    fn put(&self, week_key: &str, days: &WeekTasks) -> Result<()> {
        self.check()?;
        self.lock().insert(week_key.to_string(), days.clone());
        self.puts.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn delete(&self, week_key: &str) -> Result<()> {
        self.check()?;
        self.lock().remove(week_key);
        Ok(())
    }
}

struct SaveJob {
    week_key: String,
    days: WeekTasks,
}

/// Single worker thread that issues saves off the UI loop, in send order.
struct SaveWorker {
    sender: Option<Sender<SaveJob>>,
    handle: Option<JoinHandle<()>>,
}

impl SaveWorker {
    fn spawn(backend: Arc<dyn Backend>) -> Self {
        let (sender, receiver) = mpsc::channel::<SaveJob>();
        let handle = std::thread::spawn(move || {
            for job in receiver {
                put_logged(backend.as_ref(), &job.week_key, &job.days);
            }
        });
        SaveWorker {
            sender: Some(sender),
            handle: Some(handle),
        }
    }
}

impl Drop for SaveWorker {
    fn drop(&mut self) {
        // Closing the channel lets the worker drain pending saves and exit.
        self.sender.take();
        if let Some(handle) = self.handle.take() {
            if handle.join().is_err() {
                error!("save worker panicked");
            }
        }
    }
}

fn put_logged(backend: &dyn Backend, week_key: &str, days: &WeekTasks) {
    match backend.put(week_key, days) {
        Ok(()) => debug!(week_key, tasks = days.len(), "week saved"),
        Err(e) => error!(week_key, error = %e, "save failed"),
    }
}

/// Load/save/clear of whole weeks.
pub struct SyncClient {
    backend: Arc<dyn Backend>,
    worker: Option<SaveWorker>,
}

impl SyncClient {
    /// Saves run on the caller's thread.
    pub fn inline(backend: Arc<dyn Backend>) -> Self {
        SyncClient { backend, worker: None }
    }

    /// Saves are handed to a background worker; the caller never waits.
    pub fn background(backend: Arc<dyn Backend>) -> Self {
        let worker = SaveWorker::spawn(Arc::clone(&backend));
        SyncClient {
            backend,
            worker: Some(worker),
        }
    }

    /// Saved tasks for a week; any failure yields an empty week.
    pub fn load(&self, week_key: &str) -> WeekTasks {
        match self.backend.fetch(week_key) {
            Ok(Some(days)) => {
                info!(week_key, tasks = days.len(), "week loaded");
                days
            }
            Ok(None) => WeekTasks::new(),
            Err(e) => {
                warn!(week_key, error = %e, "load failed, showing empty week");
                WeekTasks::new()
            }
        }
    }

    /// Send the store's current snapshot of the week to the backend.
    pub fn save(&self, store: &TaskStore, week_key: &str) {
        let days = store.get(week_key);
        match &self.worker {
            Some(worker) => {
                let job = SaveJob {
                    week_key: week_key.to_string(),
                    days,
                };
                let sent = worker.sender.as_ref().map(|tx| tx.send(job));
                if !matches!(sent, Some(Ok(()))) {
                    error!(week_key, "save worker is gone, save dropped");
                }
            }
            None => put_logged(self.backend.as_ref(), week_key, &days),
        }
    }

    /// Delete the week on the backend.
    pub fn clear(&self, week_key: &str) -> Result<()> {
        self.backend.delete(week_key)?;
        info!(week_key, "week cleared");
        Ok(())
    }
}
