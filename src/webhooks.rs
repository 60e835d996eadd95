use tokio::sync::mpsc::UnboundedSender;

pub mod github;
pub use github::{github_commits, PushEvent, RepositoryKey};

pub struct EventSender(pub UnboundedSender<Event>);

#[derive(Debug)]
pub enum Event {
    Push(PushNotification),
}

/// A decoded push event, waiting to be announced in the rooms of its repository.
#[derive(Debug)]
pub struct PushNotification {
    pub repo: RepositoryKey,
    pub event: PushEvent,
    /// Payload as received, only used when reporting formatting errors
    pub raw: String,
}
