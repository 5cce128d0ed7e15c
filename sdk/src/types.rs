//! Candidate profile and session types
//!
//! The score sheet is a fixed record of four categories. Adding a category
//! means adding a field here, so every consumer is forced to handle it.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Maximum number of items kept per insight list
pub const MAX_INSIGHT_ITEMS: usize = 5;

/// Highest value a single metric can hold
pub const MAX_METRIC_SCORE: u32 = 100;

/// The four assessed categories, in report order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    TechnicalSkills,
    BehavioralTraits,
    CulturalFit,
    SoftSkills,
}

impl Category {
    /// All categories in the order they appear in a narrative assessment
    pub const ALL: [Category; 4] = [
        Category::TechnicalSkills,
        Category::BehavioralTraits,
        Category::CulturalFit,
        Category::SoftSkills,
    ];

    /// Human readable label
    pub fn label(&self) -> &'static str {
        match self {
            Category::TechnicalSkills => "Technical Skills",
            Category::BehavioralTraits => "Behavioral Traits",
            Category::CulturalFit => "Cultural Fit",
            Category::SoftSkills => "Soft Skills",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Technical skills metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TechnicalSkills {
    pub quantitative_reasoning: u32,
    pub programming: u32,
    pub market_knowledge: u32,
    pub data_analysis: u32,
}

impl TechnicalSkills {
    pub fn metrics(&self) -> [(&'static str, u32); 4] {
        [
            ("Quantitative Reasoning", self.quantitative_reasoning),
            ("Programming", self.programming),
            ("Market Knowledge", self.market_knowledge),
            ("Data Analysis", self.data_analysis),
        ]
    }
}

/// Behavioral trait metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct BehavioralTraits {
    pub problem_solving: u32,
    pub teamwork: u32,
    pub initiative: u32,
    pub resilience: u32,
    pub adaptability: u32,
}

impl BehavioralTraits {
    pub fn metrics(&self) -> [(&'static str, u32); 5] {
        [
            ("Problem Solving", self.problem_solving),
            ("Teamwork", self.teamwork),
            ("Initiative", self.initiative),
            ("Resilience", self.resilience),
            ("Adaptability", self.adaptability),
        ]
    }
}

/// Cultural fit metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CulturalFit {
    pub collaborative_thinking: u32,
    pub continuous_learning: u32,
    pub challenge_seeking: u32,
    pub entrepreneurial_spirit: u32,
}

impl CulturalFit {
    pub fn metrics(&self) -> [(&'static str, u32); 4] {
        [
            ("Collaborative Thinking", self.collaborative_thinking),
            ("Continuous Learning", self.continuous_learning),
            ("Challenge Seeking", self.challenge_seeking),
            ("Entrepreneurial Spirit", self.entrepreneurial_spirit),
        ]
    }
}

/// Soft skill metrics
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoftSkills {
    pub communication: u32,
    pub decision_making: u32,
    pub time_management: u32,
    pub leadership: u32,
}

impl SoftSkills {
    pub fn metrics(&self) -> [(&'static str, u32); 4] {
        [
            ("Communication", self.communication),
            ("Decision Making", self.decision_making),
            ("Time Management", self.time_management),
            ("Leadership", self.leadership),
        ]
    }
}

/// Scores for all four categories
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreSheet {
    pub technical_skills: TechnicalSkills,
    pub behavioral_traits: BehavioralTraits,
    pub cultural_fit: CulturalFit,
    pub soft_skills: SoftSkills,
}

impl ScoreSheet {
    /// Name/value pairs for one category
    pub fn category_metrics(&self, category: Category) -> Vec<(&'static str, u32)> {
        match category {
            Category::TechnicalSkills => self.technical_skills.metrics().to_vec(),
            Category::BehavioralTraits => self.behavioral_traits.metrics().to_vec(),
            Category::CulturalFit => self.cultural_fit.metrics().to_vec(),
            Category::SoftSkills => self.soft_skills.metrics().to_vec(),
        }
    }

    /// Mean of one category's metrics
    pub fn category_average(&self, category: Category) -> f64 {
        let metrics = self.category_metrics(category);
        let total: u32 = metrics.iter().map(|(_, v)| *v).sum();
        f64::from(total) / metrics.len() as f64
    }

    /// Equal-weighted mean of the four category averages, rounded
    pub fn weighted_final(&self) -> u32 {
        let total: f64 = Category::ALL
            .iter()
            .map(|c| self.category_average(*c) * 0.25)
            .sum();
        total.round() as u32
    }

    /// True when no metric carries a score
    pub fn is_empty(&self) -> bool {
        *self == ScoreSheet::default()
    }
}

/// Narrative insights pulled from an assessment
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Insights {
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Structured view of one candidate
///
/// A live session owns one of these; the report parser reconstructs a
/// separate instance from a persisted report document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CandidateProfile {
    pub display_name: Option<String>,
    pub exchange_count: usize,
    pub session_duration: String,
    pub scores: ScoreSheet,
    pub insights: Insights,
}

impl CandidateProfile {
    /// Name for display, falling back to "Candidate"
    pub fn name_or_default(&self) -> &str {
        self.display_name.as_deref().unwrap_or("Candidate")
    }
}

/// Lifecycle status of one client identity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    NotStarted,
    Active,
    Completed,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SessionStatus::NotStarted => write!(f, "not_started"),
            SessionStatus::Active => write!(f, "active"),
            SessionStatus::Completed => write!(f, "completed"),
        }
    }
}

/// Summary handed back once an interview completes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProfileSummary {
    pub name: String,
    pub exchange_count: usize,
    pub duration: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report_path: Option<String>,
}

/// Result of submitting one candidate turn
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitOutcome {
    pub response: String,
    pub is_complete: bool,
    pub exchange_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profile: Option<ProfileSummary>,
}
