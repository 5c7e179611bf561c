//! Query builder — turns a free-text claim into a compact boolean query.

/// Stop words removed from claims before query construction.
///
/// Articles, prepositions, conjunctions, plus the domain filler words that
/// show up in marketing copy but carry no search signal. The exact set is
/// a tuning constant; change it through `QueryConfig`, not here.
pub const STOP_WORDS: &[&str] = &[
    // articles / pronouns
    "the", "a", "an", "this", "that", "these", "those", "our", "your", "their",
    // prepositions
    "in", "on", "of", "to", "for", "with", "from", "by", "at", "into", "over",
    "under", "after", "before", "during", "through",
    // conjunctions / auxiliaries
    "and", "or", "but", "is", "are", "was", "were", "be", "been", "can",
    "could", "may", "might", "will", "would",
    // domain fillers
    "effect", "effects", "affect", "affects", "impact", "impacts", "helps",
    "help", "shows", "show", "study", "studies", "research",
];

/// Tuning knobs for query construction.
#[derive(Debug, Clone)]
pub struct QueryConfig {
    pub stop_words: &'static [&'static str],
    /// Tokens must be strictly longer than this to survive.
    pub min_token_len: usize,
    /// At most this many terms are joined into the final query.
    pub max_terms: usize,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            stop_words: STOP_WORDS,
            min_token_len: 3,
            max_terms: 5,
        }
    }
}

/// Build a boolean search query from a free-text claim using the default
/// configuration.
///
/// A claim that reduces to zero tokens yields an empty string; the
/// aggregator short-circuits on that rather than querying providers.
pub fn build_query(claim: &str) -> String {
    build_query_with(claim, &QueryConfig::default())
}

pub fn build_query_with(claim: &str, cfg: &QueryConfig) -> String {
    claim
        .to_lowercase()
        .split_whitespace()
        .filter(|t| t.len() > cfg.min_token_len)
        .filter(|t| !cfg.stop_words.contains(t))
        .take(cfg.max_terms)
        .collect::<Vec<_>>()
        .join(" AND ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_words_and_short_tokens_removed() {
        let q = build_query("Our magnesium supplement helps improve sleep quality");
        for term in q.split(" AND ") {
            assert!(term.len() > 3, "short token survived: {term}");
            assert!(!STOP_WORDS.contains(&term), "stop word survived: {term}");
        }
        assert!(q.contains("magnesium"));
        assert!(q.contains("sleep"));
        assert!(!q.contains("helps"));
        assert!(!q.contains("our"));
    }

    #[test]
    fn test_at_most_five_terms() {
        let q = build_query(
            "turmeric curcumin extract reduces chronic inflammation markers joints mobility seniors",
        );
        assert!(q.split(" AND ").count() <= 5);
    }

    #[test]
    fn test_order_preserved() {
        let q = build_query("ashwagandha extract lowers cortisol levels");
        let terms: Vec<&str> = q.split(" AND ").collect();
        assert_eq!(terms[0], "ashwagandha");
        assert_eq!(terms[1], "extract");
    }

    #[test]
    fn test_empty_claim_yields_empty_query() {
        assert_eq!(build_query(""), "");
        assert_eq!(build_query("the of an and"), "");
        assert_eq!(build_query("a big cat ran"), "");
    }

    #[test]
    fn test_custom_config() {
        let cfg = QueryConfig {
            max_terms: 2,
            ..QueryConfig::default()
        };
        let q = build_query_with("magnesium glycinate improves deep sleep duration", &cfg);
        assert_eq!(q.split(" AND ").count(), 2);
    }
}
