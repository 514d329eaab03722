//! Text tokenization and cleaning
//!
//! A small regex-based normalization pass (URLs, HTML, punctuation, digits)
//! followed by unicode word segmentation and stop-word filtering.

use regex::Regex;
use std::collections::HashSet;
use unicode_segmentation::UnicodeSegmentation;

/// Compiled cleaning patterns shared by every tokenizer instance.
#[derive(Debug, Clone)]
struct CleanPatterns {
    url: Regex,
    html: Regex,
    punctuation: Regex,
    digits: Regex,
    whitespace: Regex,
}

impl CleanPatterns {
    fn compile() -> Self {
        // Patterns are fixed literals, so construction cannot fail.
        Self {
            url: Regex::new(r"https?://\S+").unwrap(),
            html: Regex::new(r"<[^>]+>").unwrap(),
            punctuation: Regex::new(r"[^\w\s]").unwrap(),
            digits: Regex::new(r"\b\d+\b").unwrap(),
            whitespace: Regex::new(r"\s+").unwrap(),
        }
    }
}

/// Tokenizer configuration and functionality
#[derive(Debug, Clone)]
pub struct Tokenizer {
    /// Stop words to filter out
    stop_words: HashSet<String>,
    /// Minimum token length in bytes
    min_length: usize,
    /// Maximum token length in bytes
    max_length: usize,
    /// Strip standalone digit runs
    strip_digits: bool,
    /// Compiled cleaning patterns
    patterns: CleanPatterns,
}

impl Tokenizer {
    /// Create a tokenizer with the default English stop-word list
    pub fn new() -> Self {
        Self {
            stop_words: default_stop_words(),
            min_length: 2,
            max_length: 50,
            strip_digits: true,
            patterns: CleanPatterns::compile(),
        }
    }

    /// Create a tokenizer tuned for movie review text
    ///
    /// Review corpora are dominated by a handful of domain words that carry
    /// no topical signal; they are filtered along with the standard stops.
    pub fn for_reviews() -> Self {
        let mut tokenizer = Self::new();
        tokenizer.add_stop_words(&[
            "movie", "movies", "film", "films", "watch", "watched", "watching",
            "scene", "scenes", "one", "two", "get", "got", "make", "makes",
            "made", "see", "seen", "much", "many", "even", "really", "like",
            "way", "thing", "things", "first", "ever", "never", "back",
            "still", "going",
        ]);
        tokenizer
    }

    /// Add custom stop words
    pub fn add_stop_words(&mut self, words: &[&str]) {
        for word in words {
            self.stop_words.insert(word.to_lowercase());
        }
    }

    /// Set minimum token length
    pub fn min_length(mut self, len: usize) -> Self {
        self.min_length = len;
        self
    }

    /// Set maximum token length
    pub fn max_length(mut self, len: usize) -> Self {
        self.max_length = len;
        self
    }

    /// Enable/disable stripping of standalone digit runs
    pub fn strip_digits(mut self, enable: bool) -> Self {
        self.strip_digits = enable;
        self
    }

    /// Clean and normalize text
    ///
    /// Lowercases, removes URLs, HTML tags, punctuation, and (optionally)
    /// digit runs, then collapses whitespace.
    pub fn clean(&self, text: &str) -> String {
        let mut cleaned = self.patterns.url.replace_all(text, " ").to_string();
        cleaned = self.patterns.html.replace_all(&cleaned, " ").to_string();
        cleaned = self
            .patterns
            .punctuation
            .replace_all(&cleaned, " ")
            .to_string();

        if self.strip_digits {
            cleaned = self.patterns.digits.replace_all(&cleaned, " ").to_string();
        }

        cleaned = cleaned.to_lowercase();
        cleaned = self
            .patterns
            .whitespace
            .replace_all(&cleaned, " ")
            .to_string();

        cleaned.trim().to_string()
    }

    /// Tokenize text into words
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let cleaned = self.clean(text);

        cleaned
            .unicode_words()
            .filter(|word| {
                let len = word.len();
                len >= self.min_length
                    && len <= self.max_length
                    && !self.stop_words.contains(*word)
            })
            .map(|s| s.to_string())
            .collect()
    }

    /// Tokenize multiple documents
    pub fn tokenize_documents(&self, documents: &[String]) -> Vec<Vec<String>> {
        documents.iter().map(|doc| self.tokenize(doc)).collect()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new()
    }
}

/// Default English stop words
fn default_stop_words() -> HashSet<String> {
    let words = [
        // Articles
        "a", "an", "the",
        // Pronouns
        "i", "me", "my", "myself", "we", "our", "ours", "ourselves", "you", "your", "yours",
        "yourself", "yourselves", "he", "him", "his", "himself", "she", "her", "hers", "herself",
        "it", "its", "itself", "they", "them", "their", "theirs", "themselves", "what", "which",
        "who", "whom", "this", "that", "these", "those",
        // Verbs
        "am", "is", "are", "was", "were", "be", "been", "being", "have", "has", "had", "having",
        "do", "does", "did", "doing", "would", "should", "could", "ought", "might", "must",
        "shall", "will", "can", "may",
        // Prepositions
        "at", "by", "for", "from", "in", "into", "of", "on", "to", "with", "about", "against",
        "between", "during", "before", "after", "above", "below", "up", "down", "out", "off",
        "over", "under", "again", "further", "then", "once",
        // Conjunctions
        "and", "but", "or", "nor", "so", "yet", "both", "either", "neither", "not", "only",
        "than", "when", "where", "while", "if", "because", "as", "until", "although",
        // Other common words
        "here", "there", "all", "each", "few", "more", "most", "other", "some", "such", "no",
        "any", "own", "same", "too", "very", "just", "also", "now", "how", "why", "well",
    ];

    words.iter().map(|s| s.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tokenizer_basic() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("The plot twists kept me guessing until the end.");

        assert!(!tokens.contains(&"the".to_string())); // Stop word
        assert!(!tokens.contains(&"me".to_string())); // Stop word
        assert!(tokens.contains(&"plot".to_string()));
        assert!(tokens.contains(&"twists".to_string()));
        assert!(tokens.contains(&"guessing".to_string()));
    }

    #[test]
    fn test_tokenizer_reviews() {
        let tokenizer = Tokenizer::for_reviews();
        let tokens = tokenizer.tokenize("This movie had superb acting but the film dragged");

        // Domain stop words filtered
        assert!(!tokens.contains(&"movie".to_string()));
        assert!(!tokens.contains(&"film".to_string()));
        assert!(tokens.contains(&"superb".to_string()));
        assert!(tokens.contains(&"acting".to_string()));
        assert!(tokens.contains(&"dragged".to_string()));
    }

    #[test]
    fn test_clean_text() {
        let tokenizer = Tokenizer::new();
        let cleaned = tokenizer.clean("Read the <b>full</b> review at https://example.com now!");

        assert!(!cleaned.contains("https://"));
        assert!(!cleaned.contains("<b>"));
        assert!(!cleaned.contains("!"));
        assert_eq!(cleaned, cleaned.to_lowercase());
    }

    #[test]
    fn test_digit_stripping() {
        let tokenizer = Tokenizer::new();
        let tokens = tokenizer.tokenize("Rated 10 out of 10 stars");
        assert!(!tokens.contains(&"10".to_string()));
        assert!(tokens.contains(&"rated".to_string()));

        let keep_digits = Tokenizer::new().strip_digits(false);
        let tokens = keep_digits.tokenize("Rated 10 out of 10 stars");
        assert!(tokens.contains(&"10".to_string()));
    }

    #[test]
    fn test_length_filter() {
        let tokenizer = Tokenizer::new().min_length(5);
        let tokens = tokenizer.tokenize("epic long performances");
        assert!(!tokens.contains(&"epic".to_string()));
        assert!(tokens.contains(&"performances".to_string()));
    }
}
