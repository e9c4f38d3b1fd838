use serde::Serialize;
use services::{SearchHit, SearchService, ServiceError};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, warn};

/// Result of the last *completed* search request. `initialized`
/// distinguishes "never searched" from "searched and got zero results".
#[derive(Debug, Clone, Default, Serialize)]
pub struct SearchOutcome {
    pub submitted_query: String,
    pub results: Vec<SearchHit>,
    pub initialized: bool,
}

#[derive(Default)]
struct SearchState {
    query: String,
    outcome: SearchOutcome,
    generation: u64,
    last_error: Option<ServiceError>,
}

/// Owns the query text and the outcome of the last completed search.
pub struct SearchController {
    service: Arc<dyn SearchService>,
    state: Mutex<SearchState>,
}

impl SearchController {
    pub fn new(service: Arc<dyn SearchService>) -> Self {
        Self {
            service,
            state: Mutex::new(SearchState::default()),
        }
    }

    /// Updates the query. Editing drops the "no results" notice until the
    /// next explicit search, and cancels a search still in flight.
    pub async fn set_query(&self, text: &str) {
        let mut st = self.state.lock().await;
        st.query = text.to_string();
        st.outcome.initialized = false;
        st.generation += 1;
    }

    /// Submits the current query. Empty or whitespace-only queries are a
    /// no-op: the outcome is untouched and no request is issued. The query
    /// value is captured at submission time, so the recorded
    /// `submitted_query` may differ from the live query once the user keeps
    /// typing. Failures clear the results and the submitted-query marker.
    pub async fn search(&self) {
        let (query, generation) = {
            let mut st = self.state.lock().await;
            if st.query.trim().is_empty() {
                debug!("search requested with an empty query");
                return;
            }
            st.outcome.initialized = true;
            st.generation += 1;
            (st.query.clone(), st.generation)
        };

        match self.service.search(&query).await {
            Ok(results) => {
                let mut st = self.state.lock().await;
                if st.generation != generation {
                    debug!(query, "discarding stale search response");
                    return;
                }
                st.outcome.results = results;
                st.outcome.submitted_query = query;
                st.last_error = None;
            }
            Err(err) => {
                warn!(query, %err, "image search failed");
                let mut st = self.state.lock().await;
                if st.generation != generation {
                    return;
                }
                st.outcome.results.clear();
                st.outcome.submitted_query.clear();
                st.last_error = Some(err);
            }
        }
    }

    pub async fn query(&self) -> String {
        self.state.lock().await.query.clone()
    }

    pub async fn outcome(&self) -> SearchOutcome {
        self.state.lock().await.outcome.clone()
    }

    pub async fn last_error(&self) -> Option<ServiceError> {
        self.state.lock().await.last_error.clone()
    }
}

/// Confidence shown for one search hit: the first tag entry (in service
/// order) whose tag the submitted query contains as a substring, `"0"` when
/// none matches. First match wins over highest confidence.
pub fn display_confidence(hit: &SearchHit, submitted_query: &str) -> String {
    hit.tags
        .iter()
        .flatten()
        .find(|entry| submitted_query.contains(&entry.tag))
        .map(|entry| entry.confidence.to_string())
        .unwrap_or_else(|| "0".to_string())
}

/// The "no results" notice renders only for a submitted search that came
/// back empty while the query box is still non-empty.
pub fn should_show_no_results(query: &str, outcome: &SearchOutcome) -> bool {
    outcome.results.is_empty() && !query.is_empty() && outcome.initialized
}

#[cfg(test)]
mod tests {
    use super::*;
    use services::TagScore;

    fn hit(name: &str, tags: Option<Vec<(&str, f32)>>) -> SearchHit {
        SearchHit {
            file_name: name.to_string(),
            tags: tags.map(|ts| {
                ts.into_iter()
                    .map(|(tag, confidence)| TagScore {
                        tag: tag.to_string(),
                        confidence,
                    })
                    .collect()
            }),
        }
    }

    #[test]
    fn first_contained_tag_wins_over_higher_confidence() {
        let hit = hit("x.jpg", Some(vec![("dog", 0.9), ("cat", 0.5)]));
        assert_eq!(display_confidence(&hit, "catdog"), "0.9");
    }

    #[test]
    fn containment_is_substring_not_equality() {
        let hit = hit("x.jpg", Some(vec![("cat", 0.5)]));
        assert_eq!(display_confidence(&hit, "cat dog"), "0.5");
    }

    #[test]
    fn no_matching_tag_displays_zero_string() {
        let hit = hit("x.jpg", Some(vec![("horse", 0.8)]));
        assert_eq!(display_confidence(&hit, "cat"), "0");
    }

    #[test]
    fn missing_tags_display_zero_string() {
        let hit = hit("x.jpg", None);
        assert_eq!(display_confidence(&hit, "cat"), "0");
    }

    #[test]
    fn zero_confidence_match_displays_zero() {
        let hit = hit("x.jpg", Some(vec![("cat", 0.0)]));
        assert_eq!(display_confidence(&hit, "cat"), "0");
    }

    #[test]
    fn notice_requires_empty_results_nonempty_query_and_initialized() {
        let empty = SearchOutcome {
            submitted_query: "cat".into(),
            results: vec![],
            initialized: true,
        };
        assert!(should_show_no_results("cat", &empty));
        assert!(!should_show_no_results("", &empty));

        let uninitialized = SearchOutcome {
            initialized: false,
            ..empty.clone()
        };
        assert!(!should_show_no_results("cat", &uninitialized));

        let with_results = SearchOutcome {
            results: vec![hit("x.jpg", None)],
            ..empty
        };
        assert!(!should_show_no_results("cat", &with_results));
    }
}
