use std::{convert::Infallible, io};

use rocket::{
    data::{ByteUnit, FromData, Outcome},
    http::Status,
    request::{self, FromRequest},
    Data, Request, State,
};
use tracing::{debug, error, info, trace};

pub mod events;
pub use events::{PushEvent, RepositoryKey};

use crate::webhooks::{Event, EventSender, PushNotification};

const X_GITHUB_EVENT: &str = "X-GitHub-Event";
const PAYLOAD_FIELD: &str = "payload";

#[rocket::post("/github-commits", data = "<payload>")]
pub fn github_commits(
    event: GitHubEventType,
    payload: GitHubPayload,
    sender: &State<EventSender>,
) -> (Status, &'static str) {
    match event {
        GitHubEventType::Ping => (Status::Ok, "Working!"),
        GitHubEventType::Push => (handle_push(payload, sender), ""),
        GitHubEventType::Unsupported(event) => {
            debug!("ignoring unsupported GitHub event `{}`", event);
            (Status::NotFound, "")
        }
    }
}

fn handle_push(payload: GitHubPayload, sender: &EventSender) -> Status {
    let raw = match payload.0 {
        Ok(raw) => raw,
        Err(e) => {
            error!("could not read GitHub payload: {}", e);
            return e.status();
        }
    };

    let event = match PushEvent::parse(raw.as_deref()) {
        Ok(event) => event,
        // already logged by the parser
        Err(_) => return Status::Ok,
    };

    let repo = event.repository_key();
    info!("received push event for {}", repo);

    let notification = PushNotification {
        repo,
        event,
        raw: raw.unwrap_or_default(),
    };

    if sender.0.send(Event::Push(notification)).is_err() {
        error!("event channel was closed, dropping push notification");
    }

    Status::Ok
}

#[derive(Debug, PartialEq, Eq)]
pub enum GitHubEventType {
    Ping,
    Push,
    Unsupported(String),
}

impl From<&str> for GitHubEventType {
    fn from(event: &str) -> Self {
        match event {
            "ping" => Self::Ping,
            "push" => Self::Push,
            other => Self::Unsupported(other.to_owned()),
        }
    }
}

#[rocket::async_trait]
impl<'r> FromRequest<'r> for GitHubEventType {
    type Error = Infallible;

    async fn from_request(request: &'r Request<'_>) -> request::Outcome<Self, Self::Error> {
        let event_type = request
            .headers()
            .get_one(X_GITHUB_EVENT)
            .unwrap_or("unknown");

        request::Outcome::Success(GitHubEventType::from(event_type))
    }
}

/// The JSON document GitHub attached to the webhook, if any.
///
/// GitHub sends it either as the whole body (`application/json`) or URL-encoded in the `payload`
/// field of a form (`application/x-www-form-urlencoded`). Reading the body never fails the request:
/// only push events carry a payload, so errors are left for the push handler to report.
pub struct GitHubPayload(pub Result<Option<String>, BodyError>);

#[derive(Debug, thiserror::Error)]
pub enum BodyError {
    #[error("data limit exceeded")]
    TooLarge,
    #[error("{0}")]
    Unreadable(#[from] io::Error),
}

impl BodyError {
    fn status(&self) -> Status {
        match self {
            Self::TooLarge => Status::PayloadTooLarge,
            Self::Unreadable(_) => Status::BadRequest,
        }
    }
}

const LIMIT: ByteUnit = ByteUnit::Mebibyte(1);

#[rocket::async_trait]
impl<'r> FromData<'r> for GitHubPayload {
    type Error = Infallible;

    async fn from_data(request: &'r Request<'_>, data: Data<'r>) -> Outcome<'r, Self> {
        trace!("received payload on GitHub webhook endpoint: {:?}", request);

        let is_json = request.content_type().map_or(false, |ct| ct.is_json());

        // push payloads easily outgrow Rocket's default form limit
        let size_limit = request.limits().get("github").unwrap_or(LIMIT);
        let content = match data.open(size_limit).into_string().await {
            Ok(s) if s.is_complete() => s.into_inner(),
            Ok(_) => {
                trace!("payload was too big");
                return Outcome::Success(GitHubPayload(Err(BodyError::TooLarge)));
            }
            Err(e) => return Outcome::Success(GitHubPayload(Err(e.into()))),
        };

        let payload = if is_json {
            Some(content).filter(|body| !body.is_empty())
        } else {
            form_field(&content, PAYLOAD_FIELD)
        };

        Outcome::Success(GitHubPayload(Ok(payload)))
    }
}

fn form_field(body: &str, name: &str) -> Option<String> {
    url::form_urlencoded::parse(body.as_bytes())
        .find(|(key, _)| key == name)
        .map(|(_, value)| value.into_owned())
}
