use serde::Deserialize;
use tracing::error;

use crate::webhooks::github::events::{Repository, RepositoryKey};

#[derive(Debug, Deserialize)]
pub struct PushEvent {
    pub repository: Repository,
    #[serde(default)]
    pub commits: Vec<Commit>,
    pub pusher: Option<Pusher>,
    pub r#ref: String,
    pub base_ref: Option<String>,
    #[serde(default)]
    pub created: bool,
    #[serde(default)]
    pub deleted: bool,
}

#[derive(Debug, Deserialize)]
pub struct Commit {
    // kept as sent by GitHub, `Url` would normalize it
    pub url: String,
    pub author: Option<CommitAuthor>,
}

#[derive(Debug, Deserialize)]
pub struct CommitAuthor {
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct Pusher {
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum PayloadError {
    #[error("push event without a payload")]
    Missing,
    #[error("{0}")]
    Decode(#[from] serde_json::Error),
}

impl PushEvent {
    /// Decodes the JSON payload of a push webhook. Failures are logged here, callers only need to
    /// stop handling the request.
    pub fn parse(payload: Option<&str>) -> Result<Self, PayloadError> {
        let result: Result<Self, PayloadError> = match payload {
            Some(payload) => serde_json::from_str(payload).map_err(PayloadError::from),
            None => Err(PayloadError::Missing),
        };

        if let Err(e) = &result {
            error!("could not parse JSON payload from GitHub: {}", e);
        }

        result
    }

    pub fn repository_key(&self) -> RepositoryKey {
        self.repository.key()
    }
}
