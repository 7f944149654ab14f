//! Serenity client construction.

use std::sync::Arc;

use {
    serenity::{http::Http, Client},
    tracing::info,
};

use crate::handler::DiscordHandler;

/// Standalone REST handle, usable before the gateway client starts.
#[must_use]
pub fn http(token: &str) -> Arc<Http> {
    Arc::new(Http::new(token))
}

/// Build the gateway client with the relay's handler and intents.
pub async fn build_client(token: &str, handler: DiscordHandler) -> anyhow::Result<Client> {
    info!("building discord client");
    let client = Client::builder(token, DiscordHandler::intents())
        .event_handler(handler)
        .await?;
    Ok(client)
}
