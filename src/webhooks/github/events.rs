use std::fmt::Display;

use serde::Deserialize;

mod push;

pub use push::*;

#[derive(Debug, Deserialize)]
pub struct Repository {
    pub name: String,
    pub owner: Owner,
}

#[derive(Debug, Deserialize)]
pub struct Owner {
    pub name: String,
}

/// Canonical `owner/name` identifier of a GitHub repository, used as the key of the room mapping.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryKey(String);

impl RepositoryKey {
    pub fn new(owner: &str, name: &str) -> Self {
        Self(format!("{}/{}", owner, name))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RepositoryKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl Repository {
    pub fn key(&self) -> RepositoryKey {
        RepositoryKey::new(&self.owner.name, &self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_is_owner_then_name() {
        assert_eq!(RepositoryKey::new("acme", "widgets").as_str(), "acme/widgets");
    }

    #[test]
    fn key_keeps_case() {
        let repo = Repository {
            name: "Widgets".to_string(),
            owner: Owner {
                name: "ACME".to_string(),
            },
        };

        assert_eq!(repo.key().to_string(), "ACME/Widgets");
    }
}
