use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};

use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use uuid::Uuid;

use crate::ai::chat::Relay;
use crate::core::AppConfig;
use crate::intake::{FormIntake, Intake};
use crate::openai::{Completion, OpenAiCompletion};

/// A relay shared between requests. The lock makes turns on the same
/// session run one after another.
pub type SharedRelay = Arc<Mutex<Relay>>;

struct Session {
    relay: SharedRelay,
    last_active: Instant,
}

pub struct AppState {
    pub config: AppConfig,
    completion: Arc<dyn Completion>,
    intake: Arc<dyn Intake>,
    // Open chat widgets by session ID, in memory only
    sessions: HashMap<String, Session>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let completion = Arc::new(OpenAiCompletion::new(
            &config.llm_api_hostname,
            &config.llm_api_key,
            config.completion_options(),
        ));
        let intake = Arc::new(FormIntake::new(&config.intake_url));
        Self::with_collaborators(config, completion, intake)
    }

    pub fn with_collaborators(
        config: AppConfig,
        completion: Arc<dyn Completion>,
        intake: Arc<dyn Intake>,
    ) -> Self {
        Self {
            config,
            completion,
            intake,
            sessions: HashMap::new(),
        }
    }

    pub fn intake(&self) -> Arc<dyn Intake> {
        Arc::clone(&self.intake)
    }

    /// Start a new chat session and return its ID.
    pub fn open_session(&mut self) -> String {
        let id = Uuid::new_v4().to_string();
        let relay = Relay::builder(
            Arc::clone(&self.completion),
            Arc::clone(&self.intake),
            &self.config.system_message,
            &self.config.fallback_message(),
        )
        .build();
        self.sessions.insert(
            id.clone(),
            Session {
                relay: Arc::new(Mutex::new(relay)),
                last_active: Instant::now(),
            },
        );
        id
    }

    /// Look up a session and mark it as active.
    pub fn session(&mut self, id: &str) -> Option<SharedRelay> {
        let session = self.sessions.get_mut(id)?;
        session.last_active = Instant::now();
        Some(Arc::clone(&session.relay))
    }

    /// Discard a session and its transcript. Returns false if there
    /// was no such session.
    pub fn close_session(&mut self, id: &str) -> bool {
        self.sessions.remove(id).is_some()
    }

    /// Discard every session untouched for at least `max_idle`.
    /// Sessions in the middle of a turn are kept. Returns how many
    /// were removed.
    pub fn evict_idle(&mut self, max_idle: Duration) -> usize {
        let before = self.sessions.len();
        self.sessions.retain(|_, session| {
            session.last_active.elapsed() < max_idle || session.relay.try_lock().is_err()
        });
        before - self.sessions.len()
    }

    pub fn session_count(&self) -> usize {
        self.sessions.len()
    }
}

fn sweep(state: &RwLock<AppState>, max_idle: Duration) {
    let evicted = match state.write() {
        Ok(mut state) => state.evict_idle(max_idle),
        Err(e) => {
            tracing::error!("Unable to write shared state: {}", e);
            return;
        }
    };
    if evicted > 0 {
        tracing::debug!("Evicted {} idle chat sessions", evicted);
    }
}

/// Periodically discard idle sessions for as long as the server runs.
pub fn spawn_session_sweeper(
    state: Arc<RwLock<AppState>>,
    every: Duration,
    max_idle: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(every);
        loop {
            interval.tick().await;
            sweep(&state, max_idle);
        }
    })
}
