//! Candidate Name Extraction
//!
//! Layered heuristics that turn one message into a display name. The local
//! strategies are pure `text -> Option<String>` functions tried in order; the
//! generation provider is asked only when both come up empty. Every stage's
//! output passes the same acceptance filter, and a rejection at every stage
//! simply leaves the name unset.

use crate::llm::{GenerationParams, LLMProvider};
use crate::session::prompts::name_extraction_prompt;
use regex::{Regex, RegexBuilder};
use std::sync::OnceLock;

/// Longest name, in words, that is accepted
const MAX_NAME_WORDS: usize = 3;

/// A local, pure name strategy
pub type NameStrategy = fn(&str) -> Option<String>;

/// Local strategies in the order they are tried
pub const LOCAL_STRATEGIES: [(&str, NameStrategy); 2] = [
    ("intro_phrase", from_intro_phrase),
    ("leading_words", from_leading_words),
];

/// Words that end (or rule out) a name captured after an intro phrase
const STOPWORDS: &[&str] = &[
    "a", "an", "the", "and", "but", "or", "so", "from", "in", "at", "with", "to", "of", "for",
    "on", "here", "not", "also", "just", "really", "very", "currently", "interested", "applying",
    "studying", "working", "looking", "excited", "glad", "happy", "fine", "good", "great", "well",
    "ready", "sure", "doing", "new", "student", "graduate", "engineer", "developer", "trying",
    "hoping", "going", "called", "named", "is", "am", "was",
];

const WORD: &str = r"[A-Za-z][A-Za-z'\-]*";

/// Intro patterns paired with whether the capture must start with a capital
///
/// Only explicit naming phrases take a lowercase name; "I'm", "this is" and
/// "X here" are as likely to introduce a mood or a topic.
fn intro_patterns() -> &'static [(Regex, bool)] {
    static PATTERNS: OnceLock<Vec<(Regex, bool)>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        let words = format!(r"({WORD}(?:\s+{WORD}){{0,2}})");
        [
            (format!(r"\bmy\s+name\s+is\s+{words}"), false),
            (format!(r"\bname['’]s\s+{words}"), false),
            (format!(r"\bcall\s+me\s+{words}"), false),
            (format!(r"\bthis\s+is\s+{words}"), true),
            (format!(r"\bi\s+am\s+{words}"), true),
            (format!(r"\bi['’]m\s+{words}"), true),
            (format!(r"^\s*{words}\s+here\b"), true),
        ]
        .into_iter()
        .filter_map(|(p, capitalized)| {
            let regex = RegexBuilder::new(&p).case_insensitive(true).build().ok()?;
            Some((regex, capitalized))
        })
        .collect()
    })
}

fn is_stopword(word: &str) -> bool {
    STOPWORDS.contains(&word.to_lowercase().as_str())
}

fn starts_uppercase(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_uppercase())
}

/// Trim a raw capture down to the words that plausibly form the name
fn trim_capture(capture: &str) -> Option<String> {
    let words: Vec<&str> = capture.split_whitespace().collect();
    let first = words.first()?;
    if is_stopword(first) {
        return None;
    }

    let kept: Vec<&str> = if starts_uppercase(first) {
        words
            .iter()
            .take_while(|w| starts_uppercase(w) && !is_stopword(w))
            .copied()
            .collect()
    } else {
        words.iter().take_while(|w| !is_stopword(w)).copied().collect()
    };

    if kept.is_empty() {
        None
    } else {
        Some(kept.join(" "))
    }
}

/// "my name is X", "I'm X", "X here" and similar introductions
pub fn from_intro_phrase(text: &str) -> Option<String> {
    intro_patterns().iter().find_map(|(pattern, capitalized)| {
        let capture = pattern.captures(text)?.get(1)?.as_str();
        if *capitalized && !starts_uppercase(capture) {
            return None;
        }
        trim_capture(capture).and_then(|name| accept(&name))
    })
}

/// First one or two purely alphabetic words longer than one letter
pub fn from_leading_words(text: &str) -> Option<String> {
    let words: Vec<&str> = text
        .split_whitespace()
        .map(|t| t.trim_end_matches([',', '.', '!', '?', ';', ':']))
        .filter(|t| t.chars().count() > 1 && t.chars().all(|c| c.is_alphabetic()))
        .take(2)
        .collect();

    if words.is_empty() {
        None
    } else {
        Some(words.join(" "))
    }
}

/// Acceptance filter applied to every stage's output
pub fn accept(candidate: &str) -> Option<String> {
    let trimmed = candidate.trim();
    if trimmed.is_empty()
        || trimmed.eq_ignore_ascii_case("unknown")
        || !trimmed.chars().any(|c| c.is_alphabetic())
        || trimmed.split_whitespace().count() > MAX_NAME_WORDS
    {
        return None;
    }
    Some(trimmed.to_string())
}

/// Run only the local strategies
pub fn extract_name_locally(text: &str) -> Option<String> {
    LOCAL_STRATEGIES.iter().find_map(|(label, strategy)| {
        let name = strategy(text).and_then(|n| accept(&n))?;
        tracing::debug!(strategy = label, "Candidate name found");
        Some(name)
    })
}

/// Full pipeline, falling back to the generation provider
///
/// Provider failures are logged and treated as "no name".
pub async fn extract_name(text: &str, provider: &dyn LLMProvider) -> Option<String> {
    if let Some(name) = extract_name_locally(text) {
        return Some(name);
    }

    match provider
        .complete_prompt(&name_extraction_prompt(text), GenerationParams::extraction())
        .await
    {
        Ok(answer) => {
            let cleaned = answer.trim().trim_matches(|c| c == '"' || c == '\'' || c == '.');
            let name = accept(cleaned);
            if name.is_some() {
                tracing::debug!(strategy = "provider", "Candidate name found");
            }
            name
        }
        Err(e) => {
            tracing::warn!("Name extraction request failed: {}", e);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LLMError, Message};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct FixedAnswer {
        answer: Option<&'static str>,
        calls: AtomicUsize,
    }

    impl FixedAnswer {
        fn new(answer: Option<&'static str>) -> Self {
            Self {
                answer,
                calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl LLMProvider for FixedAnswer {
        fn name(&self) -> &str {
            "fixed"
        }

        async fn generate(
            &self,
            _messages: &[Message],
            _params: GenerationParams,
        ) -> crate::llm::Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.answer
                .map(str::to_string)
                .ok_or(LLMError::Timeout)
        }
    }

    #[test]
    fn test_my_name_is() {
        assert_eq!(
            from_intro_phrase("My name is Jane Doe, and I study physics").as_deref(),
            Some("Jane Doe")
        );
    }

    #[test]
    fn test_intro_variants() {
        assert_eq!(from_intro_phrase("Hi! I'm Priya Raman.").as_deref(), Some("Priya Raman"));
        assert_eq!(from_intro_phrase("hello, my name is tom and i code").as_deref(), Some("tom"));
        assert_eq!(from_intro_phrase("Hi, this is Dana Wu").as_deref(), Some("Dana Wu"));
        assert_eq!(from_intro_phrase("Call me Ishmael").as_deref(), Some("Ishmael"));
        assert_eq!(from_intro_phrase("Mary-Jane O'Neil here").as_deref(), Some("Mary-Jane O'Neil"));
    }

    #[test]
    fn test_intro_rejects_non_names() {
        assert_eq!(from_intro_phrase("I'm excited to be here"), None);
        assert_eq!(from_intro_phrase("I am a final year student"), None);
    }

    #[test]
    fn test_casual_phrases_need_a_capitalized_name() {
        assert_eq!(from_intro_phrase("This is my first interview"), None);
        assert_eq!(from_intro_phrase("I'm nervous about this"), None);
        assert_eq!(from_intro_phrase("i am tom"), None);
        assert_eq!(from_intro_phrase("call me tom").as_deref(), Some("tom"));
    }

    #[test]
    fn test_intro_stops_at_lowercase_word() {
        assert_eq!(
            from_intro_phrase("I'm Alex from London").as_deref(),
            Some("Alex")
        );
    }

    #[test]
    fn test_leading_words_takes_two() {
        assert_eq!(
            extract_name_locally("Alice Bob Carol Dave").as_deref(),
            Some("Alice Bob")
        );
        assert_eq!(from_leading_words("Sam."), Some("Sam".to_string()));
    }

    #[test]
    fn test_no_valid_words() {
        assert_eq!(extract_name_locally("asdf1234 !!!"), None);
        assert_eq!(extract_name_locally(""), None);
    }

    #[test]
    fn test_accept_filter() {
        assert_eq!(accept("  Jane Doe "), Some("Jane Doe".to_string()));
        assert_eq!(accept("Unknown"), None);
        assert_eq!(accept("UNKNOWN"), None);
        assert_eq!(accept("1234"), None);
        assert_eq!(accept("one two three four"), None);
        assert_eq!(accept(""), None);
    }

    #[tokio::test]
    async fn test_local_success_skips_provider() {
        let provider = FixedAnswer::new(Some("Someone Else"));
        let name = extract_name("My name is Jane Doe", &provider).await;
        assert_eq!(name.as_deref(), Some("Jane Doe"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provider_fallback() {
        let provider = FixedAnswer::new(Some("\"Lee Chen\"\n"));
        let name = extract_name("42 !!!", &provider).await;
        assert_eq!(name.as_deref(), Some("Lee Chen"));
        assert_eq!(provider.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_provider_unknown_leaves_unset() {
        let provider = FixedAnswer::new(Some("Unknown"));
        assert_eq!(extract_name("asdf1234 !!!", &provider).await, None);
    }

    #[tokio::test]
    async fn test_provider_failure_leaves_unset() {
        let provider = FixedAnswer::new(None);
        assert_eq!(extract_name("asdf1234 !!!", &provider).await, None);
    }
}
