//! Lexicon-based sentiment analysis
//!
//! Scores text by summing per-word lexicon hits, with fixed negation and
//! intensifier rules and a ±3-token aspect window. Pure and deterministic;
//! empty or unmatched text yields a neutral zero result.

use crate::lexicon::LexiconStore;
use crate::types::{AspectSentiment, Emotion, SentimentAnalysis};

/// Score above which a token counts as a sentiment keyword
const KEYWORD_THRESHOLD: f64 = 0.5;

/// Score thresholds for the positive/negative emotion labels
const EMOTION_THRESHOLD: f64 = 0.2;

/// Tokenize text for lexicon lookup
///
/// Lowercases, replaces everything except word characters and hyphens with
/// whitespace, and drops tokens of length <= 2. Negation and intensifier
/// words are kept regardless of length so the modifier rules can fire.
pub(crate) fn tokenize(store: &LexiconStore, text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '-' || c.is_whitespace() {
                c
            } else {
                ' '
            }
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|word| {
            word.chars().count() > 2 || store.is_negation(word) || store.is_intensifier(word)
        })
        .map(|word| word.to_string())
        .collect()
}

/// Analyze the sentiment of a text in the given language
pub fn analyze_sentiment(store: &LexiconStore, text: &str, language: &str) -> SentimentAnalysis {
    let words = tokenize(store, text);

    let mut total_score = 0.0;
    let mut word_count = 0usize;
    let mut keywords = Vec::new();

    // Word-level sentiment
    for word in &words {
        if let Some(score) = store.score(language, word) {
            total_score += score;
            word_count += 1;
            if score.abs() > KEYWORD_THRESHOLD {
                keywords.push(word.clone());
            }
        }
    }

    // Negation: invert and double the next two lexicon hits
    let mut has_negation = false;
    for (index, word) in words.iter().enumerate() {
        if store.is_negation(word) {
            has_negation = true;
            for offset in 1..=2 {
                if let Some(next) = words.get(index + offset) {
                    if let Some(score) = store.score(language, next) {
                        total_score -= score * 2.0;
                    }
                }
            }
        }
    }

    // Intensifiers: amplify the following lexicon hit by half
    for (index, word) in words.iter().enumerate() {
        if store.is_intensifier(word) {
            if let Some(next) = words.get(index + 1) {
                if let Some(score) = store.score(language, next) {
                    total_score += score * 0.5;
                }
            }
        }
    }

    // Aspect-based sentiment: average lexicon hits in a ±3-token window
    // around each aspect keyword's first occurrence
    let mut aspects = Vec::new();
    for (aspect, aspect_keywords) in store.aspects() {
        let mut aspect_score = 0.0;
        let mut aspect_count = 0usize;

        for keyword in *aspect_keywords {
            if let Some(index) = words.iter().position(|w| w == keyword) {
                let start = index.saturating_sub(3);
                let end = (index + 4).min(words.len());
                for word in &words[start..end] {
                    if let Some(score) = store.score(language, word) {
                        aspect_score += score;
                        aspect_count += 1;
                    }
                }
            }
        }

        if aspect_count > 0 {
            aspects.push(AspectSentiment {
                aspect: aspect.to_string(),
                sentiment: aspect_score / aspect_count as f64,
            });
        }
    }

    // Modifier rules add to the sum without raising the hit count, so the
    // mean can overshoot; clamp to keep the score in [-1, 1]
    let score = if word_count > 0 {
        (total_score / word_count as f64).clamp(-1.0, 1.0)
    } else {
        0.0
    };
    let magnitude = score.abs().min(1.0);

    let emotion = if score > EMOTION_THRESHOLD {
        Emotion::Positive
    } else if score < -EMOTION_THRESHOLD {
        Emotion::Negative
    } else if has_negation && word_count > 5 {
        Emotion::Mixed
    } else {
        Emotion::Neutral
    };

    SentimentAnalysis {
        score,
        magnitude,
        emotion,
        keywords,
        aspects,
    }
}
