#![allow(clippy::unwrap_used, clippy::expect_used)]
//! End-to-end relay scenarios over a full `Bridge` with mock outbounds.

use std::{
    sync::{Arc, Mutex},
    time::Duration,
};

use {async_trait::async_trait, tokio_util::sync::CancellationToken};

use strait_relay::{
    Bridge, ChannelMapBuilder, Outbound, RelayEvent, ReplaceTarget, REINSERT_DELAY,
};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Call {
    Send { to: String, text: String },
    Delete { channel: String, message_id: String },
}

#[derive(Default)]
struct MockSide {
    calls: Mutex<Vec<Call>>,
    /// Sends whose text contains this sleep before completing.
    slow_text: Option<String>,
}

impl MockSide {
    fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn slow_on(text: &str) -> Arc<Self> {
        Arc::new(Self {
            calls: Mutex::new(Vec::new()),
            slow_text: Some(text.to_string()),
        })
    }

    fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Outbound for MockSide {
    fn network(&self) -> &'static str {
        "mock"
    }

    async fn send_text(&self, to: &str, text: &str) -> anyhow::Result<()> {
        if let Some(slow) = &self.slow_text
            && text.contains(slow.as_str())
        {
            tokio::time::sleep(Duration::from_millis(25)).await;
        }
        self.calls.lock().unwrap().push(Call::Send {
            to: to.to_string(),
            text: text.to_string(),
        });
        Ok(())
    }
}

#[async_trait]
impl ReplaceTarget for MockSide {
    async fn delete_message(&self, channel: &str, message_id: &str) -> anyhow::Result<()> {
        self.calls.lock().unwrap().push(Call::Delete {
            channel: channel.to_string(),
            message_id: message_id.to_string(),
        });
        Ok(())
    }

    async fn send_text(&self, channel: &str, text: &str) -> anyhow::Result<()> {
        Outbound::send_text(self, channel, text).await
    }
}

struct Fixture {
    bridge: Arc<Bridge>,
    discord: Arc<MockSide>,
    irc: Arc<MockSide>,
}

/// A bridge with `#general ↔ 123` bound, nick `BOTNAME`, owner `<@42>`.
fn fixture() -> Fixture {
    let discord = MockSide::new();
    let irc = MockSide::new();

    let bridge = Bridge::new(
        Arc::clone(&discord) as Arc<dyn Outbound>,
        Arc::clone(&irc) as Arc<dyn Outbound>,
        "BOTNAME",
    )
    .with_owner_mention("<@42>")
    .with_notice_channel("777")
    .with_replace(
        Arc::clone(&discord) as Arc<dyn ReplaceTarget>,
        CancellationToken::new(),
    );

    let mut builder = ChannelMapBuilder::new();
    builder.bind("#general", "123").unwrap();
    bridge.install_bindings(builder.build());

    Fixture {
        bridge: Arc::new(bridge),
        discord,
        irc,
    }
}

/// Let background dispatch tasks run to completion under paused time.
async fn settle() {
    tokio::time::sleep(Duration::from_millis(1)).await;
}

#[tokio::test(start_paused = true)]
async fn join_relays_to_the_bound_channel() {
    let fx = fixture();

    fx.bridge.relay_from_irc(RelayEvent::Join {
        nick: "alice".into(),
        channel: "#general".into(),
    });
    settle().await;

    assert_eq!(fx.discord.calls(), vec![Call::Send {
        to: "123".into(),
        text: "**``alice``** has joined".into(),
    }]);
}

#[tokio::test(start_paused = true)]
async fn message_mentioning_the_bridge_pings_the_owner() {
    let fx = fixture();

    fx.bridge.relay_from_irc(RelayEvent::Message {
        nick: "bob".into(),
        channel: "#general".into(),
        text: "hi BOTNAME".into(),
    });
    settle().await;

    let calls = fx.discord.calls();
    assert_eq!(calls.len(), 1);
    let Call::Send { to, text } = &calls[0] else {
        panic!("expected a send");
    };
    assert_eq!(to, "123");
    assert!(text.contains("hi BOTNAME"));
    assert_eq!(text.matches("<@42>").count(), 1);
}

#[tokio::test(start_paused = true)]
async fn consecutive_messages_to_one_channel_stay_ordered() {
    let discord = MockSide::slow_on("one");
    let irc = MockSide::new();
    let bridge = Arc::new(Bridge::new(
        Arc::clone(&discord) as Arc<dyn Outbound>,
        irc as Arc<dyn Outbound>,
        "BOTNAME",
    ));
    let mut builder = ChannelMapBuilder::new();
    builder.bind("#general", "123").unwrap();
    bridge.install_bindings(builder.build());

    bridge.relay_from_irc(RelayEvent::Message {
        nick: "alice".into(),
        channel: "#general".into(),
        text: "one".into(),
    });
    bridge.relay_from_irc(RelayEvent::Message {
        nick: "alice".into(),
        channel: "#general".into(),
        text: "two".into(),
    });
    tokio::time::sleep(Duration::from_millis(50)).await;

    assert_eq!(discord.calls(), vec![
        Call::Send {
            to: "123".into(),
            text: "**``alice``**: one".into(),
        },
        Call::Send {
            to: "123".into(),
            text: "**``alice``**: two".into(),
        },
    ]);
}

#[tokio::test(start_paused = true)]
async fn unmapped_channel_produces_no_send() {
    let fx = fixture();

    fx.bridge.relay_from_irc(RelayEvent::Message {
        nick: "bob".into(),
        channel: "#unmapped".into(),
        text: "hello".into(),
    });
    settle().await;

    assert!(fx.discord.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn own_events_are_suppressed() {
    let fx = fixture();

    fx.bridge.relay_from_irc(RelayEvent::Message {
        nick: "botname".into(),
        channel: "#general".into(),
        text: "relayed copy".into(),
    });
    fx.bridge.relay_from_irc(RelayEvent::Join {
        nick: "BOTNAME".into(),
        channel: "#general".into(),
    });
    settle().await;

    assert!(fx.discord.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn quit_broadcasts_to_every_mapped_channel() {
    let discord = MockSide::new();
    let irc = MockSide::new();
    let bridge = Arc::new(Bridge::new(
        Arc::clone(&discord) as Arc<dyn Outbound>,
        irc as Arc<dyn Outbound>,
        "BOTNAME",
    ));
    let mut builder = ChannelMapBuilder::new();
    builder.bind("#general", "123").unwrap();
    builder.bind("#dev", "456").unwrap();
    bridge.install_bindings(builder.build());

    bridge.relay_from_irc(RelayEvent::Quit {
        nick: "alice".into(),
        reason: Some("bye".into()),
    });
    settle().await;

    let mut targets: Vec<String> = discord
        .calls()
        .into_iter()
        .map(|call| match call {
            Call::Send { to, .. } => to,
            Call::Delete { .. } => panic!("unexpected delete"),
        })
        .collect();
    targets.sort();
    assert_eq!(targets, vec!["123".to_string(), "456".to_string()]);
}

#[tokio::test(start_paused = true)]
async fn notices_go_to_the_notice_channel_only() {
    let fx = fixture();

    fx.bridge.relay_from_irc(RelayEvent::Notice {
        from_server: true,
        nick: None,
        text: "maintenance at noon".into(),
    });
    settle().await;

    assert_eq!(fx.discord.calls(), vec![Call::Send {
        to: "777".into(),
        text: "[notice][server] maintenance at noon".into(),
    }]);
}

#[tokio::test(start_paused = true)]
async fn events_before_discovery_are_dropped() {
    let discord = MockSide::new();
    let irc = MockSide::new();
    let bridge = Arc::new(Bridge::new(
        Arc::clone(&discord) as Arc<dyn Outbound>,
        irc as Arc<dyn Outbound>,
        "BOTNAME",
    ));

    bridge.relay_from_irc(RelayEvent::Join {
        nick: "alice".into(),
        channel: "#general".into(),
    });
    settle().await;

    assert!(discord.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn discord_message_relays_to_irc_with_attribution() {
    let fx = fixture();

    let relayed = fx
        .bridge
        .relay_discord_message("bob", "123", "hello irc")
        .await;

    assert_eq!(relayed.as_deref(), Some("#general"));
    assert_eq!(fx.irc.calls(), vec![Call::Send {
        to: "#general".into(),
        text: "bob: hello irc".into(),
    }]);
}

#[tokio::test(start_paused = true)]
async fn discord_message_from_unmapped_channel_is_dropped() {
    let fx = fixture();

    let relayed = fx.bridge.relay_discord_message("bob", "999", "hello").await;

    assert_eq!(relayed, None);
    assert!(fx.irc.calls().is_empty());
}

#[tokio::test(start_paused = true)]
async fn replace_deletes_then_reinserts_the_canonical_copy() {
    let fx = fixture();

    let relayed = fx.bridge.relay_discord_message("bob", "123", "hello").await;
    assert!(relayed.is_some());

    fx.bridge.schedule_replace("123", "9000", "hello");
    tokio::time::sleep(REINSERT_DELAY * 2).await;

    let discord_calls = fx.discord.calls();
    assert_eq!(discord_calls, vec![
        Call::Delete {
            channel: "123".into(),
            message_id: "9000".into(),
        },
        Call::Send {
            to: "123".into(),
            text: "**``BOTNAME``**: hello".into(),
        },
    ]);
}
