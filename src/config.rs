use std::{collections::HashMap, path::PathBuf};

use matrix_sdk::ruma::RoomId;
use serde::Deserialize;
use url::Url;

#[derive(Clone, Debug, Deserialize)]
pub struct PushbotConfig {
    /// The URL for the homeserver we should connect to
    pub matrix_homeserver: Url,
    /// The bot's account username
    pub matrix_username: String,
    /// The bot's account password
    pub matrix_password: String,
    /// Path to a directory where the bot will store Matrix state and current session information.
    pub matrix_state_dir: PathBuf,
    /// Rooms to notify for each repository, keyed by `owner/name`. The bot will only accept
    /// invitations to these rooms.
    #[serde(default)]
    pub repos: HashMap<String, RoomTarget>,
}

/// Either a single room or a list of rooms, so that the common case stays a one-liner in the
/// configuration file.
#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum RoomTarget {
    One(RoomId),
    Many(Vec<RoomId>),
}

impl RoomTarget {
    pub fn into_rooms(self) -> Vec<RoomId> {
        match self {
            Self::One(room) => vec![room],
            Self::Many(rooms) => rooms,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
matrix_homeserver: https://matrix.example.org
matrix_username: pushbot
matrix_password: hunter2
matrix_state_dir: /var/lib/pushbot
repos:
  acme/widgets: "!widgets:example.org"
  acme/gadgets:
    - "!gadgets:example.org"
    - "!ops:example.org"
"#;

    fn room(id: &str) -> RoomId {
        RoomId::try_from(id).expect("valid room id")
    }

    #[test]
    fn parse_config() {
        let config: PushbotConfig = serde_yaml::from_str(CONFIG).expect("config should parse");

        assert_eq!(config.matrix_username, "pushbot");
        assert_eq!(config.matrix_state_dir, PathBuf::from("/var/lib/pushbot"));
        assert_eq!(
            config.repos["acme/widgets"],
            RoomTarget::One(room("!widgets:example.org"))
        );
        assert_eq!(
            config.repos["acme/gadgets"].clone().into_rooms(),
            vec![room("!gadgets:example.org"), room("!ops:example.org")]
        );
    }

    #[test]
    fn repos_default_to_empty() {
        let config: PushbotConfig = serde_yaml::from_str(
            r#"
matrix_homeserver: https://matrix.example.org
matrix_username: pushbot
matrix_password: hunter2
matrix_state_dir: /var/lib/pushbot
"#,
        )
        .expect("config should parse");

        assert!(config.repos.is_empty());
    }

    #[test]
    fn invalid_room_id_is_rejected() {
        let config = serde_yaml::from_str::<PushbotConfig>(
            r#"
matrix_homeserver: https://matrix.example.org
matrix_username: pushbot
matrix_password: hunter2
matrix_state_dir: /var/lib/pushbot
repos:
  acme/widgets: room1
"#,
        );

        assert!(config.is_err());
    }
}
