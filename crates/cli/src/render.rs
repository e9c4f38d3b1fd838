use serde::Serialize;
use taglens_core::search::{display_confidence, should_show_no_results, SearchOutcome};

/// One printable search result: file name plus the single confidence the
/// display rule selects for it.
#[derive(Debug, Serialize)]
pub struct SearchRow {
    pub file_name: String,
    pub confidence: String,
}

pub fn search_rows(outcome: &SearchOutcome) -> Vec<SearchRow> {
    outcome
        .results
        .iter()
        .map(|hit| SearchRow {
            file_name: hit.file_name.clone(),
            confidence: display_confidence(hit, &outcome.submitted_query),
        })
        .collect()
}

/// Text rendering of a search outcome: result rows, the "no results" notice,
/// or nothing at all when no search has been submitted for the current query.
pub fn render_search(query: &str, outcome: &SearchOutcome) -> String {
    if !outcome.results.is_empty() {
        search_rows(outcome)
            .iter()
            .map(|row| format!("file name: {} confidence: {}", row.file_name, row.confidence))
            .collect::<Vec<_>>()
            .join("\n")
    } else if should_show_no_results(query, outcome) {
        "No results found.".to_string()
    } else {
        String::new()
    }
}

pub fn render_tags(tags: &[String]) -> String {
    tags.join(", ")
}
