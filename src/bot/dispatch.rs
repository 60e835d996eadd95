use async_trait::async_trait;
use matrix_sdk::ruma::RoomId;
use tracing::{trace, warn};

use crate::{
    bot::{github::format_push, rooms::RoomDirectory},
    webhooks::PushNotification,
};

/// Something able to post a line of text in a chat room.
#[async_trait]
pub trait RoomMessenger: Send + Sync {
    async fn send_line(&self, room: &RoomId, line: &str) -> anyhow::Result<()>;
}

/// Announces a push in every room configured for its repository, one message per line.
///
/// A message that fails to send is logged and skipped, the remaining lines and rooms are still
/// attempted.
pub async fn notify_rooms<M: RoomMessenger>(
    directory: &RoomDirectory,
    notification: &PushNotification,
    messenger: &M,
) {
    let rooms = match directory.rooms_for(&notification.repo) {
        Some(rooms) => rooms,
        None => return,
    };

    let message = match format_push(&notification.event) {
        Ok(Some(message)) => message,
        Ok(None) => {
            trace!("push on {} didn't need to be announced", notification.repo);
            return;
        }
        Err(e) => {
            warn!(
                "error formatting message for {} repo ({}). Payload: {}",
                notification.repo, e, notification.raw
            );
            return;
        }
    };

    for room in rooms {
        for line in message.split('\n') {
            trace!("sending message `{}` to room `{}`", line, room);
            if let Err(e) = messenger.send_line(room, line).await {
                warn!("couldn't send message to room `{}`: {}", room, e);
            }
        }
    }
}
