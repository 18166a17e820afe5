use crate::search::guard::GuardToken;
use crate::search::store::Candidate;
use indexmap::IndexMap;
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    #[error("request failed: {0}")]
    Transport(String),
    #[error("lookup service returned status {0}")]
    Status(u16),
    #[error("malformed lookup response: {0}")]
    Decode(String),
}

/// Remote player lookup. Calls block; the executor runs them off the UI loop.
pub trait LookupService: Send + Sync {
    fn search(&self, query: &str) -> Result<Vec<Candidate>, LookupError>;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupRequest {
    pub token: GuardToken,
    pub query: String,
}

#[derive(Debug, Clone)]
pub struct LookupCompletion {
    pub token: GuardToken,
    pub query: String,
    pub outcome: Result<Vec<Candidate>, LookupError>,
}

#[derive(Deserialize)]
struct PlayersResponse {
    data: Vec<Candidate>,
}

pub struct HttpLookup {
    agent: ureq::Agent,
    endpoint: String,
    headers: IndexMap<String, String>,
}

impl HttpLookup {
    pub fn new(api_url: &str, timeout: Duration) -> Self {
        Self {
            agent: ureq::AgentBuilder::new().timeout(timeout).build(),
            endpoint: format!("{}/players", api_url.trim_end_matches('/')),
            headers: IndexMap::new(),
        }
    }

    pub fn with_headers(mut self, headers: IndexMap<String, String>) -> Self {
        self.headers = headers;
        self
    }

    pub fn endpoint(&self) -> &str {
        self.endpoint.as_str()
    }
}

impl LookupService for HttpLookup {
    fn search(&self, query: &str) -> Result<Vec<Candidate>, LookupError> {
        let mut request = self.agent.get(self.endpoint.as_str()).query("query", query);
        for (name, value) in &self.headers {
            request = request.set(name, value);
        }

        let response = request.call().map_err(|err| match err {
            ureq::Error::Status(code, _) => LookupError::Status(code),
            ureq::Error::Transport(transport) => LookupError::Transport(transport.to_string()),
        })?;
        let body = response
            .into_string()
            .map_err(|err| LookupError::Transport(err.to_string()))?;
        decode_players(body.as_str())
    }
}

pub(crate) fn decode_players(body: &str) -> Result<Vec<Candidate>, LookupError> {
    serde_json::from_str::<PlayersResponse>(body)
        .map(|response| response.data)
        .map_err(|err| LookupError::Decode(err.to_string()))
}

/// Offline lookup over a fixed name list.
#[derive(Debug, Clone)]
pub struct StaticLookup {
    names: Vec<String>,
    limit: usize,
}

impl StaticLookup {
    const DEFAULT_LIMIT: usize = 50;

    pub fn new(names: Vec<String>) -> Self {
        Self {
            names,
            limit: Self::DEFAULT_LIMIT,
        }
    }

    /// One name per line; blank lines are skipped.
    pub fn from_lines(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(ToOwned::to_owned)
                .collect(),
        )
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit.max(1);
        self
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }
}

impl LookupService for StaticLookup {
    fn search(&self, query: &str) -> Result<Vec<Candidate>, LookupError> {
        let target = query.trim().to_lowercase();
        Ok(self
            .names
            .iter()
            .filter(|name| name.to_lowercase().contains(&target))
            .take(self.limit)
            .map(|name| Candidate::new(name.clone()))
            .collect())
    }
}
