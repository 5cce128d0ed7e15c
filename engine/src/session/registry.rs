//! Session Registry
//!
//! Maps a client identity to its interview status and live session. This is
//! the only owner of sessions; callers go through the registry for every
//! operation and never hold a session across calls.
//!
//! Status moves `NotStarted -> Active -> Completed`. With repeat sessions
//! enabled a Completed identity may start over with a fresh session; an
//! Active identity can never be started twice.
//!
//! The map lock is held only long enough to look up or swap an entry. Turns
//! are serialized per identity by a mutex around each session, so two
//! clients never wait on each other's provider calls.

use super::interview::{InterviewSession, SessionSettings, SessionSnapshot};
use crate::assessment::ReportStore;
use crate::config::Config;
use crate::llm::LLMProvider;
use sdk::{EngineError, SessionStatus, SubmitOutcome};
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};

type SharedSession = Arc<Mutex<InterviewSession>>;

#[derive(Default)]
struct Entry {
    status: SessionStatus,
    session: Option<SharedSession>,
}

pub struct SessionRegistry {
    entries: RwLock<HashMap<String, Entry>>,
    provider: Arc<dyn LLMProvider>,
    store: Arc<ReportStore>,
    settings: Arc<SessionSettings>,
    allow_repeat_sessions: bool,
}

impl SessionRegistry {
    pub fn new(
        provider: Arc<dyn LLMProvider>,
        store: Arc<ReportStore>,
        settings: SessionSettings,
        allow_repeat_sessions: bool,
    ) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            provider,
            store,
            settings: Arc::new(settings),
            allow_repeat_sessions,
        }
    }

    /// Registry wired from configuration
    pub fn from_config(
        config: &Config,
        provider: Arc<dyn LLMProvider>,
        conversation: crate::llm::GenerationParams,
    ) -> Self {
        let store = ReportStore::new(
            config.core.assessments_dir.clone(),
            config.interview.report_title.clone(),
        );
        Self::new(
            provider,
            Arc::new(store),
            SessionSettings::from_config(&config.interview, conversation),
            config.interview.allow_repeat_sessions,
        )
    }

    /// Begin an interview, returning the greeting
    pub async fn start_session(&self, identity: &str) -> Result<String, EngineError> {
        let mut entries = self.entries.write().await;
        let entry = entries.entry(identity.to_string()).or_default();

        match entry.status {
            SessionStatus::NotStarted => {}
            SessionStatus::Completed if self.allow_repeat_sessions => {
                info!(identity = %identity, "Starting repeat interview");
            }
            _ => return Err(EngineError::AlreadyActive(identity.to_string())),
        }

        let session = InterviewSession::new(
            identity,
            self.provider.clone(),
            self.store.clone(),
            self.settings.clone(),
        );
        let greeting = session.greeting().to_string();
        info!(identity = %identity, session_id = %session.session_id(), "Interview started");

        entry.status = SessionStatus::Active;
        entry.session = Some(Arc::new(Mutex::new(session)));
        Ok(greeting)
    }

    async fn active_session(&self, identity: &str) -> Result<SharedSession, EngineError> {
        let entries = self.entries.read().await;
        match entries.get(identity) {
            Some(Entry {
                status: SessionStatus::Active,
                session: Some(session),
            }) => Ok(session.clone()),
            _ => Err(EngineError::NotActive(identity.to_string())),
        }
    }

    /// Snapshot of the active session, duration refreshed from its timer
    pub async fn get_session(&self, identity: &str) -> Result<SessionSnapshot, EngineError> {
        let session = self.active_session(identity).await?;
        let mut session = session.lock().await;
        session.refresh_duration();
        Ok(session.snapshot())
    }

    /// Submit one candidate turn to the active session
    pub async fn submit(&self, identity: &str, text: &str) -> Result<SubmitOutcome, EngineError> {
        let session = self.active_session(identity).await?;
        let mut session = session.lock().await;
        session.submit_turn(text).await
    }

    /// End the active interview; a warning no-op otherwise
    pub async fn end_session(&self, identity: &str) {
        let mut entries = self.entries.write().await;
        match entries.get_mut(identity) {
            Some(entry) if entry.status == SessionStatus::Active => {
                entry.status = SessionStatus::Completed;
                entry.session = None;
                info!(identity = %identity, "Interview ended");
            }
            _ => warn!(identity = %identity, "No interview in progress to end"),
        }
    }

    pub async fn status(&self, identity: &str) -> SessionStatus {
        self.entries
            .read()
            .await
            .get(identity)
            .map(|e| e.status)
            .unwrap_or_default()
    }

    /// Number of identities with an interview in progress
    pub async fn active_count(&self) -> usize {
        self.entries
            .read()
            .await
            .values()
            .filter(|e| e.status == SessionStatus::Active)
            .count()
    }
}
