use fuzzy_matcher::skim::SkimMatcherV2;
use fuzzy_matcher::FuzzyMatcher;

/// Incremental search over the submissions table.
#[derive(Debug, Clone, Default)]
pub struct SearchState {
    pub active: bool,
    query: String,
}

impl SearchState {
    pub fn query(&self) -> &str {
        &self.query
    }

    pub fn set_query(&mut self, query: &str) {
        self.query = query.to_string();
    }

    pub fn push(&mut self, c: char) {
        self.query.push(c);
    }

    pub fn pop(&mut self) {
        self.query.pop();
    }

    pub fn clear(&mut self) {
        self.active = false;
        self.query.clear();
    }
}

/// Indices of `items` whose haystack fuzzy-matches `query`, best score first.
/// An empty query keeps every item in its original order.
pub fn fuzzy_filter<T, F>(items: &[T], query: &str, haystack: F) -> Vec<usize>
where
    F: Fn(&T) -> String,
{
    let query = query.trim();
    if query.is_empty() {
        return (0..items.len()).collect();
    }

    let matcher = SkimMatcherV2::default().ignore_case();
    let mut scored: Vec<(i64, usize)> = items
        .iter()
        .enumerate()
        .filter_map(|(index, item)| {
            matcher
                .fuzzy_match(&haystack(item), query)
                .map(|score| (score, index))
        })
        .collect();
    // Stable on ties so equal scores keep list order.
    scored.sort_by(|a, b| b.0.cmp(&a.0));
    scored.into_iter().map(|(_, index)| index).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_query_keeps_everything() {
        let items = ["a", "b"];
        assert_eq!(fuzzy_filter(&items, "  ", |s| (*s).to_string()), vec![0, 1]);
    }

    #[test]
    fn query_filters_and_ranks() {
        let items = ["volunteer alex", "contact jane", "contact jo"];
        let hits = fuzzy_filter(&items, "jane", |s| (*s).to_string());
        assert_eq!(hits, vec![1]);
    }
}
