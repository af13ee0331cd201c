//! Discord rich presence over `discord-sdk`.

use std::sync::Arc;

use async_trait::async_trait;
use cmdr_common::ClientError;
use discord_sdk::{
    activity::{ActivityBuilder, Assets},
    registration::{Application, LaunchCommand},
    wheel::{UserSpoke, UserState, Wheel},
    Discord, Subscriptions,
};
use tokio::sync::Mutex;
use tracing::{debug, info};

use super::{Activity, ConnectParams, Connector, PresenceTransport};

/// Name registered with Discord for the launcher linkage.
const APP_NAME: &str = "Elite Dangerous";

#[derive(Debug, Clone, Copy, Default)]
pub struct DiscordConnector;

#[async_trait]
impl Connector for DiscordConnector {
    async fn connect(
        &self,
        params: &ConnectParams,
    ) -> Result<Arc<dyn PresenceTransport>, ClientError> {
        let (wheel, handler) = Wheel::new(Box::new(|err| {
            debug!("Discord error: {:?}", err);
        }));
        let mut user = wheel.user();

        let discord = Discord::new(
            params.client_id,
            Subscriptions::ACTIVITY,
            Box::new(handler),
        )
        .map_err(|e| ClientError::Connect(format!("{e:?}")))?;

        let handshake = tokio::time::timeout(params.handshake_timeout, async {
            if user.0.changed().await.is_err() {
                return Err(ClientError::Connect("Discord connection closed".into()));
            }
            match &*user.0.borrow() {
                UserState::Connected(u) => Ok(u.username.clone()),
                UserState::Disconnected(err) => Err(ClientError::Connect(format!("{err:?}"))),
            }
        })
        .await;

        let username = match handshake {
            Ok(Ok(name)) => name,
            Ok(Err(e)) => {
                discord.disconnect().await;
                return Err(e);
            }
            Err(_) => {
                discord.disconnect().await;
                return Err(ClientError::HandshakeTimeout(
                    params.handshake_timeout.as_secs(),
                ));
            }
        };

        info!(user = %username, "Discord rich presence connected");
        Ok(Arc::new(DiscordTransport {
            link: Mutex::new(Some(Link {
                discord,
                user,
                _wheel: wheel,
            })),
        }))
    }

    fn register_launcher(&self, params: &ConnectParams) -> Result<(), ClientError> {
        let Some(steam_id) = params.steam_app_id else {
            return Ok(());
        };
        discord_sdk::registration::register_app(Application {
            id: params.client_id,
            name: Some(APP_NAME.to_string()),
            command: LaunchCommand::Steam(steam_id),
        })
        .map_err(|e| ClientError::Registration(format!("{e:?}")))
    }
}

struct Link {
    discord: Discord,
    user: UserSpoke,
    _wheel: Wheel,
}

pub struct DiscordTransport {
    link: Mutex<Option<Link>>,
}

#[async_trait]
impl PresenceTransport for DiscordTransport {
    fn name(&self) -> &'static str {
        "discord"
    }

    async fn update_activity(&self, activity: &Activity) -> Result<(), ClientError> {
        let guard = self.link.lock().await;
        let link = guard.as_ref().ok_or(ClientError::NotConnected)?;
        link.discord
            .update_activity(build_activity(activity))
            .await
            .map(|_| ())
            .map_err(|e| ClientError::Request(format!("{e:?}")))
    }

    async fn clear_activity(&self) -> Result<(), ClientError> {
        let guard = self.link.lock().await;
        let link = guard.as_ref().ok_or(ClientError::NotConnected)?;
        link.discord
            .clear_activity()
            .await
            .map(|_| ())
            .map_err(|e| ClientError::Request(format!("{e:?}")))
    }

    fn check_alive(&self) -> Result<(), ClientError> {
        // A call holding the lock means the link is in use, so it is alive.
        let Ok(guard) = self.link.try_lock() else {
            return Ok(());
        };
        let link = guard.as_ref().ok_or(ClientError::NotConnected)?;
        if link.user.0.has_changed().is_err() {
            return Err(ClientError::Disconnected("Discord event loop stopped".into()));
        }
        let result = match &*link.user.0.borrow() {
            UserState::Connected(_) => Ok(()),
            UserState::Disconnected(err) => Err(ClientError::Disconnected(format!("{err:?}"))),
        };
        result
    }

    async fn disconnect(&self) {
        if let Some(link) = self.link.lock().await.take() {
            link.discord.disconnect().await;
            info!("Discord rich presence disconnected");
        }
    }
}

/// Discord rejects empty strings, so empty fields are left unset.
fn build_activity(activity: &Activity) -> ActivityBuilder {
    let mut builder = ActivityBuilder::new()
        .state(&activity.state)
        .start_timestamp(activity.start.timestamp());
    if !activity.details.is_empty() {
        builder = builder.details(&activity.details);
    }

    let mut assets = Assets::default().large(
        activity.large_image.as_str(),
        non_empty(&activity.large_text),
    );
    if let Some(key) = activity.small_image.as_deref() {
        assets = assets.small(key, non_empty(&activity.small_text));
    }
    builder.assets(assets)
}

fn non_empty(text: &str) -> Option<&str> {
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}
