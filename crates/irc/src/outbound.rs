//! Outbound delivery of Discord traffic onto IRC.

use {async_trait::async_trait, irc::client::Sender, strait_relay::Outbound};

/// Sends relayed text to IRC channels through the client's sender handle.
///
/// The handle is cheap to clone and enqueues onto the connection's write
/// task, so sends never block on the network.
pub struct IrcOutbound {
    sender: Sender,
}

impl IrcOutbound {
    #[must_use]
    pub fn new(sender: Sender) -> Self {
        Self { sender }
    }
}

#[async_trait]
impl Outbound for IrcOutbound {
    fn network(&self) -> &'static str {
        "irc"
    }

    async fn send_text(&self, to: &str, text: &str) -> anyhow::Result<()> {
        // PRIVMSG bodies cannot contain line breaks; multi-line Discord
        // messages become one PRIVMSG per line.
        for line in text.lines().filter(|l| !l.is_empty()) {
            self.sender.send_privmsg(to, line)?;
        }
        Ok(())
    }
}
