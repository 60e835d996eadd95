use std::{
    fs::{self, File},
    io::{BufReader, BufWriter},
    sync::Arc,
};

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use matrix_sdk::{
    room::Room,
    ruma::{
        events::{
            room::{member::MemberEventContent, message::MessageEventContent},
            AnyMessageEventContent, StrippedStateEvent,
        },
        RoomId,
    },
    Client, ClientConfig, Session, SyncSettings,
};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing::{debug, info};

use crate::{config::PushbotConfig, webhooks::Event};

mod dispatch;
use dispatch::{notify_rooms, RoomMessenger};

mod github;

mod handlers;
use handlers::autojoin::autojoin_authorized_rooms;

mod rooms;
use rooms::RoomDirectory;

pub struct Pushbot {
    client: Client,
    config: PushbotConfig,
    rooms: Arc<RoomDirectory>,
}

impl Pushbot {
    /// Creates a new [`Pushbot`] and builds a [`matrix_sdk::Client`] using the provided
    /// [`PushbotConfig`].
    ///
    /// The [`Client`] is only initialized, not ready to be used yet.
    pub fn new(config: PushbotConfig) -> anyhow::Result<Self> {
        fs::create_dir_all(&config.matrix_state_dir).with_context(|| {
            format!(
                "couldn't create state directory {}",
                config.matrix_state_dir.display()
            )
        })?;

        let client_config = ClientConfig::new().store_path(config.matrix_state_dir.join("store"));
        let client = Client::new_with_config(config.matrix_homeserver.clone(), client_config)?;
        let rooms = Arc::new(RoomDirectory::new(config.repos.clone()));

        Ok(Self {
            client,
            config,
            rooms,
        })
    }

    /// Loads session information from file, or creates it if no previous session is found.
    ///
    /// The bot is ready to run once this function has been called.
    pub async fn init(&self) -> anyhow::Result<()> {
        self.load_or_init_session()
            .await
            .context("couldn't init session for matrix bot")?;

        let authorized_rooms = self.rooms.all_rooms();

        self.client
            .register_event_handler({
                move |ev: StrippedStateEvent<MemberEventContent>, client: Client, room: Room| {
                    let authorized_rooms = authorized_rooms.clone();
                    async move { autojoin_authorized_rooms(ev, client, room, authorized_rooms).await }
                }
            })
            .await;

        Ok(())
    }

    /// Start listening to Matrix events, and announce pushes received on `events`.
    ///
    /// [`Pushbot::init`] **must** be called before this function, otherwise the [`Client`] isn't
    /// logged in.
    pub async fn run(&self, events: UnboundedReceiver<Event>) {
        debug!("running...");

        let client = self.client.clone();
        let rooms = Arc::clone(&self.rooms);
        tokio::task::spawn(async move { Self::receive_events(events, client, rooms).await });

        self.client.sync(SyncSettings::default()).await
    }

    async fn receive_events(
        mut events: UnboundedReceiver<Event>,
        client: Client,
        rooms: Arc<RoomDirectory>,
    ) {
        loop {
            let event = match events.recv().await {
                Some(event) => event,
                None => {
                    info!("all channel senders were dropped, exiting receive loop");
                    break;
                }
            };
            debug!("received event: {:?}", event);

            match event {
                Event::Push(notification) => notify_rooms(&rooms, &notification, &client).await,
            }
        }
    }

    /// This loads the session information from an existing file, and tries to login with it. If no such
    /// file is found, then login using username and password, and save the new session information on
    /// disk.
    async fn load_or_init_session(&self) -> anyhow::Result<()> {
        let session_file = self.config.matrix_state_dir.join("session.yaml");

        if session_file.is_file() {
            let reader = BufReader::new(File::open(session_file)?);
            let session: Session = serde_yaml::from_reader(reader)?;

            self.client.restore_login(session.clone()).await?;
            info!("Reused session: {}, {}", session.user_id, session.device_id);
        } else {
            let response = self
                .client
                .login(
                    &self.config.matrix_username,
                    &self.config.matrix_password,
                    None,
                    Some("pushbot"),
                )
                .await?;

            info!("logged in as {}", self.config.matrix_username);

            let session = Session {
                access_token: response.access_token,
                user_id: response.user_id,
                device_id: response.device_id,
            };

            let writer = BufWriter::new(File::create(session_file)?);
            serde_yaml::to_writer(writer, &session)?;
        }

        Ok(())
    }
}

#[async_trait]
impl RoomMessenger for Client {
    async fn send_line(&self, room_id: &RoomId, line: &str) -> anyhow::Result<()> {
        let room = self.get_joined_room(room_id).ok_or_else(|| {
            anyhow!(
                "room with id {} isn't joined yet, can't send message",
                room_id
            )
        })?;

        let content = AnyMessageEventContent::RoomMessage(MessageEventContent::text_plain(line));
        room.send(content, None).await?;

        Ok(())
    }
}
