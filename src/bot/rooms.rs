use std::collections::HashMap;

use matrix_sdk::ruma::RoomId;
use tracing::warn;

use crate::{config::RoomTarget, webhooks::RepositoryKey};

/// Read-only mapping from repositories to the rooms announcing their pushes.
#[derive(Debug, Default)]
pub struct RoomDirectory {
    rooms: HashMap<String, Vec<RoomId>>,
}

impl RoomDirectory {
    pub fn new(repos: HashMap<String, RoomTarget>) -> Self {
        let rooms = repos
            .into_iter()
            .map(|(repo, target)| (repo, target.into_rooms()))
            .collect();

        Self { rooms }
    }

    /// Rooms configured for `repo`, or `None` if nobody asked to hear about it.
    ///
    /// A repository configured with an empty list of rooms is known, it just has nowhere to post.
    pub fn rooms_for(&self, repo: &RepositoryKey) -> Option<&[RoomId]> {
        match self.rooms.get(repo.as_str()) {
            Some(rooms) => Some(rooms.as_slice()),
            None => {
                warn!("notification from GitHub for unconfigured project: {}", repo);
                None
            }
        }
    }

    /// Every configured room, each listed once.
    pub fn all_rooms(&self) -> Vec<RoomId> {
        let mut rooms: Vec<RoomId> = self.rooms.values().flatten().cloned().collect();
        rooms.sort();
        rooms.dedup();
        rooms
    }
}
