//! Fuzzy system search using nucleo-matcher.

use nucleo_matcher::pattern::{AtomKind, CaseMatching, Normalization, Pattern};
use nucleo_matcher::{Config, Matcher, Utf32Str};
use specdeck_core::source::SystemSummary;

/// A system that matched the query.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchMatch {
    pub summary: SystemSummary,
    /// Fuzzy match score.
    pub score: u32,
}

/// Rank systems against `query`, matching on name and slug.
///
/// An empty query returns the first `limit` systems in catalog order.
pub fn fuzzy_find(systems: &[SystemSummary], query: &str, limit: usize) -> Vec<SearchMatch> {
    if query.trim().is_empty() {
        return systems
            .iter()
            .take(limit)
            .map(|s| SearchMatch {
                summary: s.clone(),
                score: 0,
            })
            .collect();
    }

    let pattern = Pattern::new(
        query,
        CaseMatching::Smart,
        Normalization::Smart,
        AtomKind::Fuzzy,
    );
    let mut matcher = Matcher::new(Config::DEFAULT);

    let mut scored: Vec<(u32, &SystemSummary)> = systems
        .iter()
        .filter_map(|system| {
            let mut buf = Vec::new();
            let name = Utf32Str::new(&system.name, &mut buf);
            let by_name = pattern.score(name, &mut matcher);
            let mut buf = Vec::new();
            let slug = Utf32Str::new(&system.slug, &mut buf);
            let by_slug = pattern.score(slug, &mut matcher);
            by_name.max(by_slug).map(|score| (score, system))
        })
        .collect();

    // Stable sort keeps catalog order among equal scores
    scored.sort_by(|a, b| b.0.cmp(&a.0));

    scored
        .into_iter()
        .take(limit)
        .map(|(score, summary)| SearchMatch {
            summary: summary.clone(),
            score,
        })
        .collect()
}
