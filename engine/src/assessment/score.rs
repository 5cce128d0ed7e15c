//! Metric score extraction from narrative sections.

use regex::{Regex, RegexBuilder};
use sdk::MAX_METRIC_SCORE;
use std::collections::HashMap;
use std::sync::OnceLock;

/// Keywords the parser looks up in every report, one per score sheet metric
pub const METRIC_KEYWORDS: [&str; 17] = [
    "quantitative",
    "programming",
    "market",
    "data",
    "problem",
    "teamwork",
    "initiative",
    "resilience",
    "adaptability",
    "collaborative",
    "learning",
    "challenge",
    "entrepreneurial",
    "communication",
    "decision",
    "time",
    "leadership",
];

/// `keyword...: N` and `- keyword...: N`, tried in that order
struct KeywordPatterns([Regex; 2]);

impl KeywordPatterns {
    fn compile(keyword: &str) -> Option<Self> {
        let kw = regex::escape(keyword);
        let build = |pattern: String| {
            RegexBuilder::new(&pattern)
                .case_insensitive(true)
                .build()
                .ok()
        };
        Some(Self([
            build(format!(r"{kw}[^:]*:\s*(\d+)"))?,
            build(format!(r"-\s*{kw}[^:]*:\s*(\d+)"))?,
        ]))
    }

    fn score_in(&self, section: &str) -> u32 {
        for pattern in &self.0 {
            if let Some(digits) = pattern.captures(section).and_then(|c| c.get(1)) {
                // Digit runs too long for u64 are out of range anyway
                let value = digits.as_str().parse::<u64>().unwrap_or(u64::MAX);
                return value.min(u64::from(MAX_METRIC_SCORE)) as u32;
            }
        }
        0
    }
}

fn metric_patterns() -> &'static HashMap<&'static str, KeywordPatterns> {
    static PATTERNS: OnceLock<HashMap<&'static str, KeywordPatterns>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        METRIC_KEYWORDS
            .iter()
            .filter_map(|kw| Some((*kw, KeywordPatterns::compile(kw)?)))
            .collect()
    })
}

/// Best-guess score for `keyword` inside `section`
///
/// Tries `keyword...: N` and then `- keyword...: N`. Returns 0 when nothing
/// matches, so an absent score reads the same as a real zero. Values above
/// the metric range are clamped. Patterns for [`METRIC_KEYWORDS`] are
/// compiled once; any other keyword is compiled per call.
pub fn extract_score(section: &str, keyword: &str) -> u32 {
    if keyword.is_empty() {
        return 0;
    }

    match metric_patterns().get(keyword) {
        Some(patterns) => patterns.score_in(section),
        None => KeywordPatterns::compile(keyword)
            .map(|patterns| patterns.score_in(section))
            .unwrap_or(0),
    }
}
