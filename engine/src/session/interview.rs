//! Interview Session
//!
//! One live conversation for one client identity. The session owns its
//! history, timer and profile, talks to the generation provider, and decides
//! when the interview is over.
//!
//! # Completion
//!
//! After each accepted candidate turn the session checks
//! `count >= hard_limit || (count >= soft_limit && !ready_for_report)`.
//! When it holds, the timer is stopped, a narrative assessment is requested,
//! the report document is written, and a fixed closing turn is returned
//! without another chat call. From then on every submission returns that
//! same closing text.
//!
//! # Failures
//!
//! Provider errors never escape: a failed chat turn becomes a visible
//! assistant turn describing the error, and the session stays usable. A
//! failed report write is reported inside the closing message.

use super::history::ConversationHistory;
use super::prompts;
use super::timer::{format_duration, DeltaTimer};
use crate::assessment::{extract_name, parse_narrative, ReportDraft, ReportStore};
use crate::config::InterviewConfig;
use crate::llm::{GenerationParams, LLMProvider, Message};
use crate::secrets::scrub_secrets;
use sdk::{CandidateProfile, EngineError, ProfileSummary, SubmitOutcome};
use serde::Serialize;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// Per-session behavior shared by every session of a registry
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub soft_exchange_limit: usize,
    pub hard_exchange_limit: usize,
    pub greeting: String,
    pub system_prompt: String,
    /// Sampling parameters for interviewer turns
    pub conversation: GenerationParams,
}

impl SessionSettings {
    pub fn from_config(interview: &InterviewConfig, conversation: GenerationParams) -> Self {
        Self {
            soft_exchange_limit: interview.soft_exchange_limit,
            hard_exchange_limit: interview.hard_exchange_limit,
            greeting: interview.greeting.clone(),
            system_prompt: prompts::interviewer_system_prompt(
                &interview.job_description,
                interview.soft_exchange_limit,
                interview.hard_exchange_limit,
            ),
            conversation,
        }
    }
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self::from_config(&InterviewConfig::default(), GenerationParams::new(0.7, 1000))
    }
}

/// Read-only view of a session
#[derive(Debug, Clone, Serialize)]
pub struct SessionSnapshot {
    pub identity: String,
    pub session_id: Uuid,
    pub exchange_count: usize,
    pub turns: usize,
    pub is_complete: bool,
    pub profile: CandidateProfile,
    pub report_path: Option<PathBuf>,
}

pub struct InterviewSession {
    identity: String,
    session_id: Uuid,
    history: ConversationHistory,
    timer: DeltaTimer,
    profile: CandidateProfile,
    ready_for_report: bool,
    closing: Option<String>,
    report_path: Option<PathBuf>,
    provider: Arc<dyn LLMProvider>,
    store: Arc<ReportStore>,
    settings: Arc<SessionSettings>,
}

impl InterviewSession {
    pub fn new(
        identity: impl Into<String>,
        provider: Arc<dyn LLMProvider>,
        store: Arc<ReportStore>,
        settings: Arc<SessionSettings>,
    ) -> Self {
        let identity = identity.into();
        let session_id = Uuid::new_v4();
        debug!(identity = %identity, session_id = %session_id, "Interview session created");

        Self {
            identity,
            session_id,
            history: ConversationHistory::new(),
            timer: DeltaTimer::new(),
            profile: CandidateProfile::default(),
            ready_for_report: false,
            closing: None,
            report_path: None,
            provider,
            store,
            settings,
        }
    }

    pub fn identity(&self) -> &str {
        &self.identity
    }

    pub fn session_id(&self) -> Uuid {
        self.session_id
    }

    /// Opening line for the candidate; not part of the history
    pub fn greeting(&self) -> &str {
        &self.settings.greeting
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn profile(&self) -> &CandidateProfile {
        &self.profile
    }

    pub fn exchange_count(&self) -> usize {
        self.profile.exchange_count
    }

    pub fn is_complete(&self) -> bool {
        self.closing.is_some()
    }

    pub fn report_path(&self) -> Option<&PathBuf> {
        self.report_path.as_ref()
    }

    /// Copy the timer reading into the profile's duration
    pub fn refresh_duration(&mut self) {
        self.profile.session_duration = format_duration(self.timer.elapsed());
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            identity: self.identity.clone(),
            session_id: self.session_id,
            exchange_count: self.exchange_count(),
            turns: self.history.len(),
            is_complete: self.is_complete(),
            profile: self.profile.clone(),
            report_path: self.report_path.clone(),
        }
    }

    fn should_complete(&self) -> bool {
        let count = self.exchange_count();
        count >= self.settings.hard_exchange_limit
            || (count >= self.settings.soft_exchange_limit && !self.ready_for_report)
    }

    fn outcome(&self, response: String) -> SubmitOutcome {
        let profile = self.is_complete().then(|| ProfileSummary {
            name: self.profile.name_or_default().to_string(),
            exchange_count: self.exchange_count(),
            duration: self.profile.session_duration.clone(),
            report_path: self
                .report_path
                .as_ref()
                .map(|p| p.display().to_string()),
        });

        SubmitOutcome {
            response,
            is_complete: self.is_complete(),
            exchange_count: self.exchange_count(),
            profile,
        }
    }

    /// Accept one candidate turn and produce the interviewer's reply
    pub async fn submit_turn(&mut self, text: &str) -> Result<SubmitOutcome, EngineError> {
        if let Some(closing) = &self.closing {
            return Ok(self.outcome(closing.clone()));
        }

        let text = text.trim();
        if text.is_empty() {
            return Err(EngineError::EmptyInput);
        }

        self.history.push(Message::user(text));
        self.profile.exchange_count += 1;
        let count = self.profile.exchange_count;
        debug!(identity = %self.identity, exchange = count, "Candidate turn accepted");

        if count == 1 && self.profile.display_name.is_none() {
            self.profile.display_name = extract_name(text, self.provider.as_ref()).await;
            if let Some(name) = &self.profile.display_name {
                info!(identity = %self.identity, candidate = %name, "Candidate identified");
            }
        }

        if self.should_complete() {
            let closing = self.complete().await;
            return Ok(self.outcome(closing));
        }

        let reply = match self
            .provider
            .complete_chat(
                &self.settings.system_prompt,
                self.history.turns(),
                self.settings.conversation,
            )
            .await
        {
            Ok(reply) => reply,
            Err(e) => {
                let detail = scrub_secrets(&e.to_string());
                warn!(identity = %self.identity, "Interviewer turn failed: {}", detail);
                prompts::generation_error_turn(&detail)
            }
        };

        self.history.push(Message::assistant(reply.clone()));
        Ok(self.outcome(reply))
    }

    /// Stop the clock, write the report and record the closing turn
    async fn complete(&mut self) -> String {
        self.timer.update();
        self.ready_for_report = true;
        self.refresh_duration();

        let narrative = match self
            .provider
            .complete_prompt(
                &prompts::narrative_prompt(&self.history.render_plain()),
                GenerationParams::narration(),
            )
            .await
        {
            Ok(text) => {
                let extracted = parse_narrative(&text);
                self.profile.scores = extracted.scores;
                self.profile.insights = extracted.insights;
                text
            }
            Err(e) => {
                let detail = scrub_secrets(&e.to_string());
                warn!(identity = %self.identity, "Assessment generation failed: {}", detail);
                prompts::narrative_error(&detail)
            }
        };

        let draft = ReportDraft {
            display_name: self.profile.display_name.as_deref(),
            exchange_count: self.profile.exchange_count,
            duration: &self.profile.session_duration,
            narrative: &narrative,
            transcript: &self.history,
        };

        let stored = match self.store.write(&draft) {
            Ok(path) => {
                let shown = path.display().to_string();
                self.report_path = Some(path);
                shown
            }
            Err(e) => {
                warn!(identity = %self.identity, "Assessment report not saved: {}", e);
                format!("(not saved: {})", e)
            }
        };

        let closing = prompts::closing_message(&stored);
        self.history.push(Message::assistant(closing.clone()));
        self.closing = Some(closing.clone());

        info!(
            identity = %self.identity,
            session_id = %self.session_id,
            exchanges = self.profile.exchange_count,
            duration = %self.profile.session_duration,
            "Interview completed"
        );
        closing
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LLMError, MessageRole};
    use async_trait::async_trait;
    use std::sync::Mutex;
    use tempfile::TempDir;

    const NARRATIVE: &str = "Technical Skills\n- Programming: 80\nBehavioral Traits\n- Teamwork: 70\nOverall\n- Final Score: 75";

    /// Answers chat turns with a counter and single prompts with fixed text
    #[derive(Default)]
    struct ScriptedProvider {
        fail_chat: bool,
        calls: Mutex<Vec<Vec<Message>>>,
    }

    #[async_trait]
    impl LLMProvider for ScriptedProvider {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate(
            &self,
            messages: &[Message],
            _params: GenerationParams,
        ) -> crate::llm::Result<String> {
            let mut calls = self.calls.lock().unwrap();
            calls.push(messages.to_vec());

            if messages[0].role == MessageRole::System {
                if self.fail_chat {
                    return Err(LLMError::NetworkError("connection reset".into()));
                }
                return Ok(format!("question {}", calls.len()));
            }
            if messages[0].content.contains("candidate's name") {
                return Ok("Unknown".into());
            }
            Ok(NARRATIVE.into())
        }
    }

    fn settings(soft: usize, hard: usize) -> Arc<SessionSettings> {
        let interview = InterviewConfig {
            soft_exchange_limit: soft,
            hard_exchange_limit: hard,
            ..InterviewConfig::default()
        };
        Arc::new(SessionSettings::from_config(
            &interview,
            GenerationParams::new(0.7, 100),
        ))
    }

    fn session(
        provider: Arc<ScriptedProvider>,
        dir: &TempDir,
        soft: usize,
        hard: usize,
    ) -> InterviewSession {
        let store = Arc::new(ReportStore::new(dir.path(), "TITLE"));
        InterviewSession::new("client-1", provider, store, settings(soft, hard))
    }

    #[tokio::test]
    async fn test_turn_appends_user_and_reply() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(ScriptedProvider::default());
        let mut s = session(provider.clone(), &dir, 10, 15);

        let outcome = s.submit_turn("My name is Jane Doe").await.unwrap();
        assert!(!outcome.is_complete);
        assert_eq!(outcome.exchange_count, 1);
        assert!(outcome.profile.is_none());
        assert_eq!(s.history().len(), 2);
        assert_eq!(s.profile().display_name.as_deref(), Some("Jane Doe"));

        // Local extraction succeeded, so only the chat call was made
        let calls = provider.calls.lock().unwrap();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0][0].role, MessageRole::System);
        assert_eq!(calls[0][1], Message::user("My name is Jane Doe"));
    }

    #[tokio::test]
    async fn test_empty_input_rejected() {
        let dir = TempDir::new().unwrap();
        let mut s = session(Arc::new(ScriptedProvider::default()), &dir, 10, 15);

        let err = s.submit_turn("   \n\t").await.unwrap_err();
        assert!(matches!(err, EngineError::EmptyInput));
        assert_eq!(s.exchange_count(), 0);
        assert!(s.history().is_empty());
    }

    #[tokio::test]
    async fn test_chat_failure_becomes_error_turn() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(ScriptedProvider {
            fail_chat: true,
            ..ScriptedProvider::default()
        });
        let mut s = session(provider, &dir, 10, 15);

        let outcome = s.submit_turn("I'm Sam").await.unwrap();
        assert!(outcome.response.contains("connection reset"));
        assert!(!outcome.is_complete);
        assert_eq!(s.history().last().unwrap().role, MessageRole::Assistant);

        // Still usable on the next turn
        s.submit_turn("hello again").await.unwrap();
        assert_eq!(s.exchange_count(), 2);
    }

    #[tokio::test]
    async fn test_completion_writes_report() {
        let dir = TempDir::new().unwrap();
        let mut s = session(Arc::new(ScriptedProvider::default()), &dir, 2, 3);

        s.submit_turn("My name is Jane Doe").await.unwrap();
        let outcome = s.submit_turn("I like puzzles").await.unwrap();

        assert!(outcome.is_complete);
        assert!(outcome.response.starts_with("Thank you for your time!"));
        let summary = outcome.profile.unwrap();
        assert_eq!(summary.name, "Jane Doe");
        assert_eq!(summary.exchange_count, 2);

        let path = PathBuf::from(summary.report_path.unwrap());
        assert!(path.starts_with(dir.path()));
        let name = path.file_name().unwrap().to_str().unwrap().to_string();
        assert!(name.starts_with("Jane_Doe_assessment_"));

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("Interview Length: 2 exchanges"));
        assert!(raw.contains(NARRATIVE));
        // Closing turn is not part of the stored transcript
        assert!(!raw.contains("Thank you for your time!"));

        assert_eq!(s.profile().scores.technical_skills.programming, 80);
        assert_eq!(s.profile().scores.behavioral_traits.teamwork, 70);
    }

    #[tokio::test]
    async fn test_completed_session_is_frozen() {
        let dir = TempDir::new().unwrap();
        let provider = Arc::new(ScriptedProvider::default());
        let mut s = session(provider.clone(), &dir, 1, 2);

        let first = s.submit_turn("I'm Sam").await.unwrap();
        assert!(first.is_complete);
        let turns = s.history().len();
        let calls = provider.calls.lock().unwrap().len();

        let again = s.submit_turn("one more thing").await.unwrap();
        assert_eq!(again.response, first.response);
        assert_eq!(s.history().len(), turns);
        assert_eq!(s.exchange_count(), 1);
        assert_eq!(provider.calls.lock().unwrap().len(), calls);

        // Empty input after completion also returns the closing text
        let empty = s.submit_turn("").await.unwrap();
        assert_eq!(empty.response, first.response);
    }

    #[tokio::test]
    async fn test_report_write_failure_in_closing_message() {
        let dir = TempDir::new().unwrap();
        let blocker = dir.path().join("file");
        std::fs::write(&blocker, "x").unwrap();
        let store = Arc::new(ReportStore::new(blocker.join("sub"), "TITLE"));
        let mut s = InterviewSession::new(
            "client-1",
            Arc::new(ScriptedProvider::default()),
            store,
            settings(1, 2),
        );

        let outcome = s.submit_turn("I'm Sam").await.unwrap();
        assert!(outcome.is_complete);
        assert!(outcome.response.contains("not saved"));
        assert!(outcome.profile.unwrap().report_path.is_none());
        assert!(s.is_complete());
    }

    #[tokio::test]
    async fn test_unnamed_candidate_uses_default_file_name() {
        let dir = TempDir::new().unwrap();
        let mut s = session(Arc::new(ScriptedProvider::default()), &dir, 1, 2);

        let outcome = s.submit_turn("42 !!!").await.unwrap();
        let summary = outcome.profile.unwrap();
        assert_eq!(summary.name, "Candidate");
        assert!(summary
            .report_path
            .unwrap()
            .contains("candidate_assessment_"));
    }
}
