use serde::Deserialize;

/// A player name returned by the lookup service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Candidate {
    pub name: String,
}

impl Candidate {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Query text, ranked candidates and the loading flag for one search input.
#[derive(Debug, Clone, Default)]
pub struct SuggestionStore {
    query: String,
    candidates: Vec<Candidate>,
    loading: bool,
    failure: Option<String>,
}

impl SuggestionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn query(&self) -> &str {
        self.query.as_str()
    }

    pub fn candidates(&self) -> &[Candidate] {
        self.candidates.as_slice()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }

    pub fn set_query(&mut self, query: impl Into<String>) {
        self.query = query.into();
    }

    pub fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        if loading {
            self.failure = None;
        }
    }

    /// Replaces the candidate list, ranked against the current query. Only
    /// called with outcomes the race guard accepted, so it also ends loading.
    pub fn set_candidates(&mut self, candidates: Vec<Candidate>) {
        self.candidates = rank_candidates(self.query.as_str(), candidates);
        self.loading = false;
        self.failure = None;
    }

    pub fn set_failure(&mut self, message: impl Into<String>) {
        self.candidates.clear();
        self.loading = false;
        self.failure = Some(message.into());
    }

    pub fn clear(&mut self) {
        self.candidates.clear();
        self.loading = false;
        self.failure = None;
    }
}

/// Stable partition: names starting with `query` (case-insensitive) first,
/// service order kept within each group.
pub fn rank_candidates(query: &str, mut candidates: Vec<Candidate>) -> Vec<Candidate> {
    let target = query.to_lowercase();
    candidates.sort_by_key(|candidate| !candidate.name.to_lowercase().starts_with(&target));
    candidates
}
