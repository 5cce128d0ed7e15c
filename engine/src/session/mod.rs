//! Session Lifecycle
//!
//! Live interviews keyed by client identity: the registry, the session that
//! runs one conversation, and the pieces a session owns.

pub mod history;
pub mod interview;
pub mod prompts;
pub mod registry;
pub mod timer;

pub use history::ConversationHistory;
pub use interview::{InterviewSession, SessionSettings, SessionSnapshot};
pub use registry::SessionRegistry;
pub use timer::{format_duration, DeltaTimer};
