//! Owner-only admin commands, delivered as direct messages to the bot.
//!
//! The command set is a fixed allow list; anything else is ignored, and
//! DMs from non-owners are dropped without a reply.

use {
    serenity::all::{Context, Message},
    strait_relay::Bridge,
    tracing::{debug, warn},
};

pub async fn handle_dm(ctx: &Context, msg: &Message, owner_id: Option<u64>, bridge: &Bridge) {
    if owner_id != Some(msg.author.id.get()) {
        debug!(author = msg.author.id.get(), "ignoring dm from non-owner");
        return;
    }

    let reply = match msg.content.trim() {
        "ping" => "pong".to_string(),
        "status" => status_line(bridge),
        "channels" => channel_listing(bridge),
        other => {
            debug!(command = %other, "unknown admin command");
            return;
        },
    };

    if let Err(e) = msg.reply(&ctx.http, reply).await {
        warn!(error = %e, "failed to reply to admin command");
    }
}

fn status_line(bridge: &Bridge) -> String {
    match bridge.bindings() {
        Some(map) => format!("relaying {} channel(s)", map.len()),
        None => "channel discovery has not completed".to_string(),
    }
}

fn channel_listing(bridge: &Bridge) -> String {
    let Some(map) = bridge.bindings() else {
        return "channel discovery has not completed".to_string();
    };
    if map.is_empty() {
        return "no channels bound".to_string();
    }
    let mut lines: Vec<String> = map
        .bindings()
        .map(|(irc, discord)| format!("{irc} <-> <#{discord}>"))
        .collect();
    lines.sort();
    lines.join("\n")
}
