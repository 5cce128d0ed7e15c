//! Assessment Parser
//!
//! Reconstructs structured score data from a persisted report document.
//! Extraction is best effort: every field has a default, and a document that
//! lacks the narrative markers still yields its file-name derived fields.
//! The only hard failure is a file that cannot be read at all, which the
//! file-level entry point turns into `None`.

use super::report::{FILE_INFIX, GENERATED_MARKER, TRANSCRIPT_MARKER};
use super::score::extract_score;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use regex::{Regex, RegexBuilder};
use sdk::{
    BehavioralTraits, CandidateProfile, Category, CulturalFit, Insights, ScoreSheet, SoftSkills,
    TechnicalSkills, MAX_INSIGHT_ITEMS, MAX_METRIC_SCORE,
};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

/// Fallback display name when the file name carries none
pub const ANONYMOUS: &str = "Anonymous";

/// Fallback interview date when the file name carries none
pub const UNKNOWN_DATE: &str = "Unknown";

/// Shortest list line kept as an insight
const MIN_INSIGHT_CHARS: usize = 6;

/// Structured result for one report document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub file_name: String,
    pub name: String,
    /// `YYYY-MM-DD`, or "Unknown"
    pub interview_date: String,
    /// Full timestamp from the file name, used for ordering
    pub interviewed_at: Option<NaiveDateTime>,
    pub exchange_count: usize,
    pub session_duration: Option<String>,
    pub final_score: u32,
    pub scores: ScoreSheet,
    pub insights: Insights,
    pub narrative: String,
}

impl AssessmentRecord {
    /// Profile view of the record
    pub fn to_profile(&self) -> CandidateProfile {
        CandidateProfile {
            display_name: Some(self.name.clone()),
            exchange_count: self.exchange_count,
            session_duration: self.session_duration.clone().unwrap_or_default(),
            scores: self.scores,
            insights: self.insights.clone(),
        }
    }
}

struct Patterns {
    file_name: Regex,
    file_stamp: Regex,
    exchanges: Regex,
    duration: Regex,
    final_score: Regex,
    sections: Vec<(Category, Regex, Regex)>,
    strengths: (Regex, Regex),
    weaknesses: (Regex, Regex),
    recommendations: (Regex, Regex),
    bullet: Regex,
    numbering: Regex,
}

fn ci(pattern: &str) -> Regex {
    RegexBuilder::new(pattern)
        .case_insensitive(true)
        .build()
        .expect("Invalid assessment pattern")
}

fn patterns() -> &'static Patterns {
    static PATTERNS: OnceLock<Patterns> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let headers = [
            (Category::TechnicalSkills, "Technical Skills"),
            (Category::BehavioralTraits, "Behavioral"),
            (Category::CulturalFit, "Cultural"),
            (Category::SoftSkills, "Soft Skills"),
        ];
        let sections = headers
            .iter()
            .map(|(category, header)| {
                let others: Vec<&str> = headers
                    .iter()
                    .filter(|(c, _)| c != category)
                    .map(|(_, h)| *h)
                    .chain(["Overall"])
                    .collect();
                (*category, ci(header), ci(&others.join("|")))
            })
            .collect();

        Patterns {
            file_name: Regex::new(&format!("^(.+?){FILE_INFIX}")).expect("Invalid name pattern"),
            file_stamp: Regex::new(r"_(\d{8})_(\d{6})\.txt$").expect("Invalid stamp pattern"),
            exchanges: Regex::new(r"Interview Length: (\d+) exchanges")
                .expect("Invalid length pattern"),
            duration: Regex::new(r"(?m)^Conversation Duration:[ \t]*(.+?)[ \t]*$")
                .expect("Invalid duration pattern"),
            final_score: ci(r"Final Score[:\s]+(\d+)"),
            sections,
            strengths: (
                ci(r"(?:Key )?Strengths?[:\s]+"),
                ci("Areas|Weaknesses|Recommendations?|Cultural"),
            ),
            weaknesses: (
                ci(r"(?:Areas for Improvement|Weaknesses?)[:\s]+"),
                ci("Strengths|Recommendations?|Cultural"),
            ),
            recommendations: (
                ci(r"Recommendations?[:\s]+"),
                ci("Strengths|Weaknesses|Cultural"),
            ),
            bullet: Regex::new(r"^[-*•]\s*").expect("Invalid bullet pattern"),
            numbering: Regex::new(r"^\d+\.\s*").expect("Invalid numbering pattern"),
        }
    })
}

/// Offsets of a header match and the text that follows it
///
/// The body runs from the end of `start`'s first match up to the next
/// `boundary` match, or to the end of the text.
struct Span {
    head: usize,
    body: usize,
    end: usize,
}

fn find_span(text: &str, start: &Regex, boundary: &Regex) -> Option<Span> {
    let head = start.find(text)?;
    let end = boundary
        .find_at(text, head.end())
        .map_or(text.len(), |m| m.start());
    Some(Span {
        head: head.start(),
        body: head.end(),
        end,
    })
}

/// Python-style title case: upper after a non-letter, lower otherwise
pub fn title_case(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut prev_alpha = false;
    for c in text.chars() {
        if prev_alpha {
            out.extend(c.to_lowercase());
        } else {
            out.extend(c.to_uppercase());
        }
        prev_alpha = c.is_alphabetic();
    }
    out
}

/// Bulleted or numbered lines, markers stripped, short lines dropped
pub fn extract_list_items(text: &str) -> Vec<String> {
    let p = patterns();
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(|line| {
            let line = p.bullet.replace(line, "");
            p.numbering.replace(&line, "").trim().to_string()
        })
        .filter(|line| line.chars().count() >= MIN_INSIGHT_CHARS)
        .take(MAX_INSIGHT_ITEMS)
        .collect()
}

fn identity_from_file_name(file_name: &str) -> (String, String, Option<NaiveDateTime>) {
    let p = patterns();

    let name = p
        .file_name
        .captures(file_name)
        .and_then(|c| c.get(1))
        .map(|m| title_case(&m.as_str().replace('_', " ")))
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| ANONYMOUS.to_string());

    let stamp = p.file_stamp.captures(file_name);
    let date = stamp
        .as_ref()
        .and_then(|c| NaiveDate::parse_from_str(c.get(1)?.as_str(), "%Y%m%d").ok());
    let time = stamp
        .as_ref()
        .and_then(|c| NaiveTime::parse_from_str(c.get(2)?.as_str(), "%H%M%S").ok());

    let interview_date = date
        .map(|d| d.format("%Y-%m-%d").to_string())
        .unwrap_or_else(|| UNKNOWN_DATE.to_string());
    let interviewed_at = date.and_then(|d| match time {
        Some(t) => Some(d.and_time(t)),
        None => d.and_hms_opt(0, 0, 0),
    });

    (name, interview_date, interviewed_at)
}

fn section_scores(narrative: &str) -> ScoreSheet {
    let p = patterns();
    let mut sheet = ScoreSheet::default();

    for (category, start, boundary) in &p.sections {
        let Some(span) = find_span(narrative, start, boundary) else {
            continue;
        };
        // The header itself belongs to the section text
        let section = &narrative[span.head..span.end];
        let s = |kw: &str| extract_score(section, kw);

        match category {
            Category::TechnicalSkills => {
                sheet.technical_skills = TechnicalSkills {
                    quantitative_reasoning: s("quantitative"),
                    programming: s("programming"),
                    market_knowledge: s("market"),
                    data_analysis: s("data"),
                }
            }
            Category::BehavioralTraits => {
                sheet.behavioral_traits = BehavioralTraits {
                    problem_solving: s("problem"),
                    teamwork: s("teamwork"),
                    initiative: s("initiative"),
                    resilience: s("resilience"),
                    adaptability: s("adaptability"),
                }
            }
            Category::CulturalFit => {
                sheet.cultural_fit = CulturalFit {
                    collaborative_thinking: s("collaborative"),
                    continuous_learning: s("learning"),
                    challenge_seeking: s("challenge"),
                    entrepreneurial_spirit: s("entrepreneurial"),
                }
            }
            Category::SoftSkills => {
                sheet.soft_skills = SoftSkills {
                    communication: s("communication"),
                    decision_making: s("decision"),
                    time_management: s("time"),
                    leadership: s("leadership"),
                }
            }
        }
    }
    sheet
}

fn insights(narrative: &str) -> Insights {
    let p = patterns();
    let list = |(start, boundary): &(Regex, Regex)| {
        find_span(narrative, start, boundary)
            .map(|span| extract_list_items(&narrative[span.body..span.end]))
            .unwrap_or_default()
    };
    Insights {
        strengths: list(&p.strengths),
        weaknesses: list(&p.weaknesses),
        recommendations: list(&p.recommendations),
    }
}

/// Scores and insights found in a narrative assessment
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NarrativeScores {
    pub scores: ScoreSheet,
    pub insights: Insights,
    /// Explicit `Final Score`, else the equal-weighted category mean
    pub final_score: u32,
}

/// Extract structured data from narrative text alone
///
/// Markdown bold markers are ignored.
pub fn parse_narrative(narrative: &str) -> NarrativeScores {
    let plain = narrative.replace("**", "");
    let scores = section_scores(&plain);
    let final_score = patterns()
        .final_score
        .captures(&plain)
        .and_then(|c| c.get(1))
        .map(|m| {
            m.as_str()
                .parse::<u64>()
                .unwrap_or(u64::MAX)
                .min(u64::from(MAX_METRIC_SCORE)) as u32
        })
        .unwrap_or_else(|| scores.weighted_final());

    NarrativeScores {
        scores,
        insights: insights(&plain),
        final_score,
    }
}

/// Parse a report document's text
pub fn parse_report_text(file_name: &str, content: &str) -> AssessmentRecord {
    let p = patterns();
    let (name, interview_date, interviewed_at) = identity_from_file_name(file_name);

    let exchange_count = p
        .exchanges
        .captures(content)
        .and_then(|c| c.get(1)?.as_str().parse().ok())
        .unwrap_or(0);

    let session_duration = p
        .duration
        .captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().to_string());

    let mut record = AssessmentRecord {
        file_name: file_name.to_string(),
        name,
        interview_date,
        interviewed_at,
        exchange_count,
        session_duration,
        final_score: 0,
        scores: ScoreSheet::default(),
        insights: Insights::default(),
        narrative: String::new(),
    };

    let (Some(start), Some(end)) = (content.find(GENERATED_MARKER), content.find(TRANSCRIPT_MARKER))
    else {
        tracing::debug!(file = file_name, "Report has no narrative markers");
        return record;
    };
    if end < start {
        tracing::debug!(file = file_name, "Report markers out of order");
        return record;
    }

    let span = content[start..end].trim();
    let narrative = span.trim_end_matches('-').trim_end().to_string();
    let extracted = parse_narrative(&narrative);

    record.scores = extracted.scores;
    record.insights = extracted.insights;
    record.final_score = extracted.final_score;
    record.narrative = narrative;
    record
}

/// Parse one report file, `None` when it cannot be read
pub fn parse_report_file(path: &Path) -> Option<AssessmentRecord> {
    let file_name = path.file_name()?.to_string_lossy().into_owned();
    match std::fs::read_to_string(path) {
        Ok(content) => Some(parse_report_text(&file_name, &content)),
        Err(e) => {
            tracing::warn!(path = %path.display(), "Skipping unreadable report: {}", e);
            None
        }
    }
}
