//! In-memory session registry
//!
//! Each session sits behind its own async mutex, so two requests for the same
//! visitor run one after the other while different visitors never contend.

use dashmap::DashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;

use intake_agent::IntakeSession;

pub type SharedSession = Arc<Mutex<IntakeSession>>;

#[derive(Clone, Default)]
pub struct SessionRegistry {
    sessions: Arc<DashMap<String, SharedSession>>,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a fresh session and return it
    pub fn create(&self) -> SharedSession {
        let session = IntakeSession::new();
        let id = session.id().to_string();
        let shared = Arc::new(Mutex::new(session));
        self.sessions.insert(id, shared.clone());
        shared
    }

    pub fn get(&self, id: &str) -> Option<SharedSession> {
        self.sessions.get(id).map(|entry| entry.value().clone())
    }

    pub fn remove(&self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// Drop sessions idle for longer than `idle`. Sessions mid-request are kept.
    pub fn sweep_idle(&self, idle: Duration) -> usize {
        let idle = match chrono::Duration::from_std(idle) {
            Ok(idle) => idle,
            Err(_) => return 0,
        };
        let now = chrono::Utc::now();
        let before = self.sessions.len();

        self.sessions.retain(|_, session| match session.try_lock() {
            Ok(guard) => !guard.is_idle(now, idle),
            Err(_) => true,
        });

        before.saturating_sub(self.sessions.len())
    }

    /// Sweep every `every` until the runtime shuts down
    pub fn spawn_sweeper(&self, idle: Duration, every: Duration) -> JoinHandle<()> {
        let registry = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                let removed = registry.sweep_idle(idle);
                if removed > 0 {
                    tracing::info!(removed, remaining = registry.len(), "expired idle sessions");
                }
            }
        })
    }
}
