//! In-memory store of running quiz sessions.
//!
//! Timed transitions are applied lazily: before every access the session's
//! pending timers are fired in order for each deadline that has passed.
//! A chained timer counts from the deadline of the one that scheduled it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use petit_adam_core::{QuizSession, QuizTiming, SentenceBank, TracingObserver};
use tokio::sync::Mutex;
use tokio::time::Instant;
use uuid::Uuid;

use crate::error::{ApiError, Result};
use crate::models::SessionView;

struct SessionEntry {
    session: QuizSession,
    armed_at: Instant,
    armed_token: Option<u64>,
    last_seen_at: DateTime<Utc>,
}

impl SessionEntry {
    fn new(session: QuizSession, now: Instant) -> Self {
        let mut entry = Self {
            session,
            armed_at: now,
            armed_token: None,
            last_seen_at: Utc::now(),
        };
        entry.rearm(now);
        entry
    }

    /// Fire every timer whose deadline is at or before `now`.
    fn catch_up(&mut self, now: Instant) {
        while let Some(timer) = self.session.pending_timer() {
            self.armed_token = Some(timer.token);
            let due = self.armed_at + timer.delay;
            if due > now {
                break;
            }
            self.session.fire(timer.token);
            self.armed_at = due;
        }
    }

    /// Start the clock for a timer scheduled by a player action.
    fn rearm(&mut self, now: Instant) {
        let token = self.session.pending_timer().map(|t| t.token);
        if token != self.armed_token {
            self.armed_token = token;
            self.armed_at = now;
        }
    }

    fn next_transition_ms(&self, now: Instant) -> Option<u64> {
        self.session.pending_timer().map(|timer| {
            let due = self.armed_at + timer.delay;
            due.saturating_duration_since(now).as_millis() as u64
        })
    }

    fn view(&self, id: Uuid, now: Instant) -> SessionView {
        SessionView::from_session(id, &self.session, self.next_transition_ms(now))
    }
}

/// Running sessions keyed by id.
pub struct SessionStore {
    sessions: Mutex<HashMap<Uuid, SessionEntry>>,
    timing: QuizTiming,
    ttl: chrono::Duration,
}

impl SessionStore {
    pub fn new(timing: QuizTiming, ttl: chrono::Duration) -> Self {
        Self {
            sessions: Mutex::new(HashMap::new()),
            timing,
            ttl,
        }
    }

    /// Start a session on the given bank, evicting idle ones.
    pub async fn create(&self, bank: &SentenceBank, seed: Option<u64>) -> SessionView {
        let id = Uuid::new_v4();
        let mut session = match seed {
            Some(seed) => QuizSession::with_seed(self.timing, seed),
            None => QuizSession::new(self.timing),
        };
        session.subscribe(Box::new(TracingObserver::new(id.to_string())));
        session.load_bank(Ok(bank.clone()));

        let now = Instant::now();
        let entry = SessionEntry::new(session, now);
        let view = entry.view(id, now);

        let mut sessions = self.sessions.lock().await;
        let cutoff = Utc::now() - self.ttl;
        let before = sessions.len();
        sessions.retain(|_, entry| entry.last_seen_at > cutoff);
        let evicted = before - sessions.len();
        if evicted > 0 {
            tracing::info!(evicted, "evicted idle sessions");
        }
        sessions.insert(id, entry);
        tracing::info!(session = %id, active = sessions.len(), "session created");

        view
    }

    /// Apply an action to a session after catching up on its timers.
    pub async fn update<T, F>(&self, id: Uuid, action: F) -> Result<(T, SessionView)>
    where
        F: FnOnce(&mut QuizSession) -> std::result::Result<T, petit_adam_core::QuizError>,
    {
        let mut sessions = self.sessions.lock().await;
        let entry = sessions
            .get_mut(&id)
            .ok_or_else(|| ApiError::NotFound(format!("Session {} not found", id)))?;

        let now = Instant::now();
        entry.catch_up(now);
        entry.last_seen_at = Utc::now();

        let output = action(&mut entry.session)?;
        entry.rearm(now);

        Ok((output, entry.view(id, now)))
    }

    /// Current view of a session.
    pub async fn view(&self, id: Uuid) -> Result<SessionView> {
        self.update(id, |_| Ok(())).await.map(|(_, view)| view)
    }

    pub async fn remove(&self, id: Uuid) -> Result<()> {
        self.sessions
            .lock()
            .await
            .remove(&id)
            .map(|_| tracing::info!(session = %id, "session ended"))
            .ok_or_else(|| ApiError::NotFound(format!("Session {} not found", id)))
    }

    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }
}
