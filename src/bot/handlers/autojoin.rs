use std::time::Duration;

use matrix_sdk::{
    room::Room,
    ruma::{
        events::{room::member::MemberEventContent, StrippedStateEvent},
        RoomId,
    },
    Client,
};
use tokio::time::sleep;
use tracing::{debug, error, info, warn};

/// Accepts invitations to the rooms pushes are announced in, and declines every other one.
pub async fn autojoin_authorized_rooms(
    room_member: StrippedStateEvent<MemberEventContent>,
    client: Client,
    room: Room,
    authorized_rooms: Vec<RoomId>,
) {
    let user_id = match client.user_id().await {
        Some(user_id) => user_id,
        None => return,
    };
    if room_member.state_key != user_id.as_str() {
        return;
    }

    if let Room::Invited(room) = room {
        let room_id = room.room_id();
        info!("Received invitation for room `{}`", room_id);

        if !authorized_rooms.contains(room_id) {
            warn!(
                "Bot isn't authorized to join room `{}`, declining invitation",
                room_id
            );
            if let Err(err) = room.reject_invitation().await {
                warn!("Failed to decline invitation to {} ({:?})", room_id, err);
            }
            return;
        }

        debug!("Autojoining room {}", room_id);
        let mut delay = 2;

        while let Err(err) = room.accept_invitation().await {
            // retry autojoin due to synapse sending invites, before the
            // invited user can join for more information see
            // https://github.com/matrix-org/synapse/issues/4345
            warn!(
                "Failed to join room {} ({:?}), retrying in {}s",
                room_id, err, delay
            );

            sleep(Duration::from_secs(delay)).await;
            delay *= 2;

            if delay > 3600 {
                error!("Can't join room {} ({:?})", room_id, err);
                return;
            }
        }
        info!("Successfully joined room {}", room_id);
    }
}
