//! Bonds SDK
//!
//! Shared types and errors for the Bonds interview engine.
//! This crate carries no runtime dependencies so front ends can link it cheaply.

/// Error types and handling
pub mod errors;

/// Candidate profile, score sheet and session types
pub mod types;

// Re-export commonly used types
pub use errors::{BondsErrorExt, EngineError};
pub use types::{
    BehavioralTraits, CandidateProfile, Category, CulturalFit, Insights, ProfileSummary,
    ScoreSheet, SessionStatus, SoftSkills, SubmitOutcome, TechnicalSkills, MAX_INSIGHT_ITEMS,
    MAX_METRIC_SCORE,
};
