//! Keyword extraction and best-effort ranking for graph lookups.

use std::collections::HashSet;

/// Upper bound on keywords sent to the graph store per question.
pub const MAX_KEYWORDS: usize = 8;

const MIN_KEYWORD_LEN: usize = 3;

/// Interview questions are mostly function words; these never identify an entity.
const STOP_WORDS: &[&str] = &[
    "about", "all", "and", "any", "are", "been", "but", "can", "could", "describe", "did",
    "does", "doing", "for", "from", "had", "has", "have", "how", "into", "its", "know",
    "like", "me", "more", "most", "much", "not", "our", "please", "should", "some", "tell",
    "than", "that", "the", "their", "them", "then", "there", "these", "they", "this", "those",
    "was", "were", "what", "whats", "when", "where", "which", "who", "why", "will", "with",
    "would", "you", "your", "yours", "yourself",
];

/// Lowercased content words of the question, in order of first appearance.
pub fn extract_keywords(question: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    question
        .to_lowercase()
        .replace(['\'', '\u{2019}'], "")
        .split(|c: char| !c.is_alphanumeric())
        .filter(|t| t.chars().count() >= MIN_KEYWORD_LEN)
        .filter(|t| !STOP_WORDS.contains(t))
        .filter(|t| seen.insert(t.to_string()))
        .take(MAX_KEYWORDS)
        .map(str::to_string)
        .collect()
}

/// Number of distinct keywords that occur in `text` (case-insensitive).
pub fn keyword_hits(text: &str, keywords: &[String]) -> usize {
    let text = text.to_lowercase();
    keywords.iter().filter(|k| text.contains(k.as_str())).count()
}

/// Orders candidates by keyword hits, highest first, keeping store order on
/// ties, and keeps at most `limit`. Candidates with no hits are dropped.
pub fn rank_by_hits<T>(
    candidates: Vec<T>,
    keywords: &[String],
    limit: usize,
    text_of: impl Fn(&T) -> String,
) -> Vec<T> {
    let mut scored: Vec<(usize, T)> = candidates
        .into_iter()
        .map(|c| (keyword_hits(&text_of(&c), keywords), c))
        .filter(|(hits, _)| *hits > 0)
        .collect();
    // sort_by is stable
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().take(limit).map(|(_, c)| c).collect()
}
