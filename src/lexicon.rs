//! Static lexicon and topic tables
//!
//! Read-only after construction; safe for unsynchronized concurrent reads.
//! Holds the per-language sentiment word tables, negation and intensifier
//! word sets, aspect keyword groups, topic models, and the compiled entity
//! regex patterns. Share a single instance via `Arc`.

use regex::Regex;
use std::collections::HashMap;

/// Negation words across supported languages
pub const NEGATION_WORDS: &[&str] = &["no", "not", "nunca", "never", "ningún", "none"];

/// Intensifier words across supported languages
pub const INTENSIFIER_WORDS: &[&str] = &["muy", "very", "mucho", "much", "demasiado", "too"];

/// One topic model: keywords to match and the categories they imply
#[derive(Debug, Clone)]
pub struct TopicModel {
    pub name: &'static str,
    pub keywords: &'static [&'static str],
    pub categories: &'static [&'static str],
}

const TOPIC_MODELS: &[TopicModel] = &[
    TopicModel {
        name: "tango",
        keywords: &["milonga", "tanda", "cortina", "cabeceo", "abrazo", "caminata", "ocho"],
        categories: &["dance", "music", "culture", "event", "community"],
    },
    TopicModel {
        name: "social",
        keywords: &["friend", "amigo", "connection", "community", "group", "meet"],
        categories: &["networking", "friendship", "collaboration", "social"],
    },
    TopicModel {
        name: "event",
        keywords: &["event", "evento", "workshop", "class", "performance", "festival"],
        categories: &["education", "entertainment", "practice", "competition"],
    },
];

const ASPECT_KEYWORDS: &[(&str, &[&str])] = &[
    ("music", &["música", "music", "orquesta", "tango", "vals", "milonga"]),
    ("venue", &["lugar", "venue", "salón", "pista", "floor", "space"]),
    ("people", &["gente", "people", "dancers", "bailarines", "community"]),
    ("organization", &["organización", "organization", "evento", "event"]),
];

/// Static lexicon and topic store
pub struct LexiconStore {
    lexicons: HashMap<&'static str, HashMap<&'static str, f64>>,
    entity_patterns: Vec<(&'static str, Regex)>,
}

impl Default for LexiconStore {
    fn default() -> Self {
        Self::new()
    }
}

impl LexiconStore {
    /// Build the store with all tables loaded
    pub fn new() -> Self {
        let mut lexicons = HashMap::new();

        let es: HashMap<&'static str, f64> = [
            ("excelente", 1.0),
            ("maravilloso", 0.9),
            ("genial", 0.8),
            ("bueno", 0.6),
            ("bien", 0.5),
            ("malo", -0.6),
            ("terrible", -0.9),
            ("horrible", -1.0),
            ("pésimo", -0.8),
            ("amor", 0.8),
            ("feliz", 0.7),
            ("alegría", 0.8),
            ("paz", 0.6),
            ("triste", -0.7),
            ("enojado", -0.6),
            ("frustrado", -0.5),
            ("decepcionado", -0.6),
            // Tango community vocabulary
            ("milonga", 0.7),
            ("abrazo", 0.8),
            ("conexión", 0.7),
            ("pasión", 0.8),
            ("elegante", 0.6),
            ("sensual", 0.5),
            ("nostálgico", 0.3),
        ]
        .into_iter()
        .collect();

        let en: HashMap<&'static str, f64> = [
            ("excellent", 1.0),
            ("wonderful", 0.9),
            ("great", 0.8),
            ("good", 0.6),
            ("nice", 0.5),
            ("bad", -0.6),
            ("terrible", -0.9),
            ("horrible", -1.0),
            ("awful", -0.8),
            ("love", 0.8),
            ("happy", 0.7),
            ("joy", 0.8),
            ("peace", 0.6),
            ("sad", -0.7),
            ("angry", -0.6),
            ("frustrated", -0.5),
            ("disappointed", -0.6),
        ]
        .into_iter()
        .collect();

        lexicons.insert("es", es);
        lexicons.insert("en", en);

        // Patterns are static and known-valid; compile failure is a bug
        let entity_patterns = vec![
            ("PERSON", Regex::new(r"[A-Z][a-z]+ [A-Z][a-z]+").expect("static regex")),
            (
                "LOCATION",
                Regex::new(r"(Buenos Aires|Montevideo|París|Barcelona|Roma|[A-Z][a-z]+)")
                    .expect("static regex"),
            ),
            (
                "DATE",
                Regex::new(
                    r"(?i)(\d{1,2}[/-]\d{1,2}[/-]\d{2,4}|\b(?:Monday|Tuesday|Wednesday|Thursday|Friday|Saturday|Sunday|Lunes|Martes|Miércoles|Jueves|Viernes|Sábado|Domingo)\b)",
                )
                .expect("static regex"),
            ),
            (
                "TIME",
                Regex::new(r"(\d{1,2}:\d{2}(?:\s?[AP]M)?|\d{1,2}\s?(?:am|pm|AM|PM))")
                    .expect("static regex"),
            ),
        ];

        Self {
            lexicons,
            entity_patterns,
        }
    }

    /// Sentiment table for a language, falling back to Spanish for
    /// unsupported codes
    pub fn table(&self, language: &str) -> &HashMap<&'static str, f64> {
        match self.lexicons.get(language) {
            Some(table) => table,
            None => {
                log::warn!("unsupported language '{}', falling back to 'es'", language);
                &self.lexicons["es"]
            }
        }
    }

    /// Sentiment score for a word in a language, if the lexicon knows it
    pub fn score(&self, language: &str, word: &str) -> Option<f64> {
        self.table(language).get(word).copied()
    }

    /// Whether a token is a negation word
    pub fn is_negation(&self, word: &str) -> bool {
        NEGATION_WORDS.contains(&word)
    }

    /// Whether a token is an intensifier word
    pub fn is_intensifier(&self, word: &str) -> bool {
        INTENSIFIER_WORDS.contains(&word)
    }

    /// Aspect name to keyword list
    pub fn aspects(&self) -> &'static [(&'static str, &'static [&'static str])] {
        ASPECT_KEYWORDS
    }

    /// All topic models
    pub fn topics(&self) -> &'static [TopicModel] {
        TOPIC_MODELS
    }

    /// Compiled entity regexes, keyed by entity class
    pub fn entity_patterns(&self) -> &[(&'static str, Regex)] {
        &self.entity_patterns
    }
}
