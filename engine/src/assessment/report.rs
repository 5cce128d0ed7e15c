//! Report Document Store
//!
//! Writes the persisted text artifact for a completed interview and reads it
//! back. Layout:
//!
//! ```text
//! <title>
//! Generated on: YYYY-MM-DD HH:MM:SS
//! Interview Length: N exchanges
//! Conversation Duration: Hh Mm Ss
//!
//! <narrative>
//!
//! ---
//! Full Interview Transcript:
//! 1. USER: ...
//! ```

use crate::session::history::ConversationHistory;
use chrono::{Local, NaiveDateTime};
use sdk::EngineError;
use std::fs;
use std::path::{Path, PathBuf};

/// Marker preceding the generation timestamp
pub const GENERATED_MARKER: &str = "Generated on:";

/// Marker preceding the numbered transcript
pub const TRANSCRIPT_MARKER: &str = "Full Interview Transcript:";

/// Infix shared by every report file name
pub const FILE_INFIX: &str = "_assessment_";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";
const FILE_TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// Everything needed to render one report
#[derive(Debug, Clone, Copy)]
pub struct ReportDraft<'a> {
    pub display_name: Option<&'a str>,
    pub exchange_count: usize,
    pub duration: &'a str,
    pub narrative: &'a str,
    pub transcript: &'a ConversationHistory,
}

/// Directory-backed report writer
#[derive(Debug, Clone)]
pub struct ReportStore {
    dir: PathBuf,
    title: String,
}

impl ReportStore {
    pub fn new(dir: impl Into<PathBuf>, title: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            title: title.into(),
        }
    }

    /// Render the document text for a draft
    pub fn render(&self, draft: &ReportDraft<'_>, generated_at: NaiveDateTime) -> String {
        format!(
            "{title}\n{GENERATED_MARKER} {at}\nInterview Length: {count} exchanges\nConversation Duration: {duration}\n\n{narrative}\n\n---\n{TRANSCRIPT_MARKER}\n{transcript}",
            title = self.title,
            at = generated_at.format(TIMESTAMP_FORMAT),
            count = draft.exchange_count,
            duration = draft.duration,
            narrative = draft.narrative.trim(),
            transcript = draft.transcript.render_numbered(),
        )
    }

    /// Write a report stamped with the current local time
    pub fn write(&self, draft: &ReportDraft<'_>) -> Result<PathBuf, EngineError> {
        self.write_at(draft, Local::now().naive_local())
    }

    /// Write a report with an explicit timestamp
    ///
    /// Creates the directory on demand. Two reports for the same name within
    /// the same second share a file name.
    pub fn write_at(
        &self,
        draft: &ReportDraft<'_>,
        generated_at: NaiveDateTime,
    ) -> Result<PathBuf, EngineError> {
        fs::create_dir_all(&self.dir).map_err(|e| {
            EngineError::Report(format!(
                "Cannot create assessments directory {}: {}",
                self.dir.display(),
                e
            ))
        })?;

        let path = self
            .dir
            .join(report_file_name(draft.display_name, generated_at));
        let content = self.render(draft, generated_at);

        fs::write(&path, content).map_err(|e| {
            EngineError::Report(format!("Cannot write {}: {}", path.display(), e))
        })?;

        tracing::info!(
            path = %path.display(),
            exchanges = draft.exchange_count,
            "Assessment report saved"
        );
        Ok(path)
    }

    /// Stored text of a report
    pub fn read_raw(path: &Path) -> Result<String, EngineError> {
        fs::read_to_string(path)
            .map_err(|e| EngineError::Report(format!("Cannot read {}: {}", path.display(), e)))
    }
}

/// Name token used in report file names
///
/// Spaces become underscores and anything outside `[A-Za-z0-9_-]` is dropped.
pub fn sanitize_name(name: Option<&str>) -> String {
    let cleaned: String = name
        .unwrap_or_default()
        .trim()
        .chars()
        .map(|c| if c.is_whitespace() { '_' } else { c })
        .filter(|c| c.is_ascii_alphanumeric() || *c == '_' || *c == '-')
        .collect();

    if cleaned.trim_matches('_').is_empty() {
        "candidate".to_string()
    } else {
        cleaned
    }
}

/// `<name>_assessment_<YYYYMMDD>_<HHMMSS>.txt`
pub fn report_file_name(name: Option<&str>, at: NaiveDateTime) -> String {
    format!(
        "{}{}{}.txt",
        sanitize_name(name),
        FILE_INFIX,
        at.format(FILE_TIMESTAMP_FORMAT)
    )
}
