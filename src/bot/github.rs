use std::fmt::Write;

use crate::webhooks::PushEvent;

const TAG: &str = "[GitHub]";

#[derive(Debug, PartialEq, thiserror::Error)]
pub enum FormatError {
    #[error("push event is missing `{0}`")]
    MissingField(&'static str),
}

/// Builds the announcement for a push, one chat message per line.
///
/// Returns `Ok(None)` for pushes that don't need to be announced, e.g. a force-push that didn't
/// add any commit.
pub fn format_push(event: &PushEvent) -> Result<Option<String>, FormatError> {
    if let Some(first) = event.commits.first() {
        let author = first
            .author
            .as_ref()
            .ok_or(FormatError::MissingField("commits[0].author"))?;

        let mut message = format!(
            "{} Got {} new commits from {} on {}",
            TAG,
            event.commits.len(),
            author.name,
            event.repository_key()
        );
        for commit in &event.commits {
            write!(message, "\n{} {}", TAG, commit.url).unwrap();
        }

        Ok(Some(message))
    } else if event.created {
        Ok(Some(format!(
            "{} {} created: {}: {}",
            TAG,
            pusher(event)?,
            event.r#ref,
            event.base_ref.as_deref().unwrap_or_default()
        )))
    } else if event.deleted {
        Ok(Some(format!(
            "{} {} deleted: {}",
            TAG,
            pusher(event)?,
            event.r#ref
        )))
    } else {
        Ok(None)
    }
}

fn pusher(event: &PushEvent) -> Result<&str, FormatError> {
    event
        .pusher
        .as_ref()
        .map(|pusher| pusher.name.as_str())
        .ok_or(FormatError::MissingField("pusher"))
}
