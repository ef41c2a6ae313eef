//! Topic and named-entity extraction
//!
//! Matches text against the static topic models and the fixed entity regex
//! classes. Never errors; no matches yields empty collections.

use std::cmp::Ordering;

use crate::lexicon::LexiconStore;
use crate::sentiment::tokenize;
use crate::types::{Entity, TopicExtraction, TopicMatch};

/// Maximum number of topics returned
const MAX_TOPICS: usize = 5;

/// Maximum number of entities returned
const MAX_ENTITIES: usize = 10;

/// Extract topics, categories, and entities from a text
pub fn extract_topics(store: &LexiconStore, text: &str, language: &str) -> TopicExtraction {
    let lowered = text.to_lowercase();
    let words = tokenize(store, text);

    let mut topics = Vec::new();
    let mut categories: Vec<String> = Vec::new();

    for model in store.topics() {
        let mut matched = Vec::new();
        for keyword in model.keywords {
            // Whole-token or raw substring match
            if words.iter().any(|w| w == keyword) || lowered.contains(keyword) {
                matched.push(keyword.to_string());
            }
        }

        if !matched.is_empty() {
            let relevance = matched.len() as f64 / model.keywords.len() as f64;
            topics.push(TopicMatch {
                name: model.name.to_string(),
                relevance,
                keywords: matched,
            });

            for category in model.categories {
                if !categories.iter().any(|c| c == category) {
                    categories.push(category.to_string());
                }
            }
        }
    }

    let mut entities = Vec::new();
    let text_len = text.chars().count();
    if text_len > 0 {
        for (kind, pattern) in store.entity_patterns() {
            for found in pattern.find_iter(text) {
                entities.push(Entity {
                    name: found.as_str().to_string(),
                    kind: kind.to_string(),
                    salience: found.as_str().chars().count() as f64 / text_len as f64,
                });
            }
        }
    }

    topics.sort_by(|a, b| b.relevance.partial_cmp(&a.relevance).unwrap_or(Ordering::Equal));
    entities.sort_by(|a, b| b.salience.partial_cmp(&a.salience).unwrap_or(Ordering::Equal));

    topics.truncate(MAX_TOPICS);
    entities.truncate(MAX_ENTITIES);

    TopicExtraction {
        topics,
        categories,
        entities,
        language: language.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn store() -> LexiconStore {
        LexiconStore::new()
    }

    #[test]
    fn test_topic_matching() {
        let result = extract_topics(&store(), "La milonga tiene una tanda y una cortina", "es");
        let tango = result.topics.iter().find(|t| t.name == "tango").unwrap();
        assert_eq!(tango.keywords, vec!["milonga", "tanda", "cortina"]);
        assert!((tango.relevance - 3.0 / 7.0).abs() < 1e-9);
        assert!(result.categories.contains(&"dance".to_string()));
        assert!(result.categories.contains(&"community".to_string()));
    }

    #[test]
    fn test_topics_sorted_by_relevance() {
        // "event" matches event/evento/workshop (3/6), "tango" matches 1/7
        let result = extract_topics(&store(), "evento y workshop con milonga", "es");
        assert!(result.topics.len() >= 2);
        assert_eq!(result.topics[0].name, "event");
        for pair in result.topics.windows(2) {
            assert!(pair[0].relevance >= pair[1].relevance);
        }
    }

    #[test]
    fn test_entity_extraction() {
        let result = extract_topics(&store(), "Carlos Gardel canta en Buenos Aires a las 21:30", "es");
        assert!(result
            .entities
            .iter()
            .any(|e| e.kind == "PERSON" && e.name == "Carlos Gardel"));
        assert!(result
            .entities
            .iter()
            .any(|e| e.kind == "LOCATION" && e.name == "Buenos Aires"));
        assert!(result.entities.iter().any(|e| e.kind == "TIME"));
        for entity in &result.entities {
            assert!(entity.salience > 0.0 && entity.salience <= 1.0);
        }
        for pair in result.entities.windows(2) {
            assert!(pair[0].salience >= pair[1].salience);
        }
    }

    #[test]
    fn test_no_matches_yields_empty() {
        let result = extract_topics(&store(), "xyzzy", "es");
        assert!(result.topics.is_empty());
        assert!(result.categories.is_empty());
        assert_eq!(result.language, "es");
    }

    #[test]
    fn test_entity_cap() {
        let text = "Monday Tuesday Wednesday Thursday Friday Saturday Sunday \
                    Lunes Martes Jueves Viernes Sábado Domingo 10:00 11:00";
        let result = extract_topics(&store(), text, "en");
        assert!(result.entities.len() <= 10);
    }
}
