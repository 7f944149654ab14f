//! Turn raw IRC protocol messages into relay events.

use {
    irc::proto::{Command, Message, Prefix},
    strait_relay::RelayEvent,
    tracing::debug,
};

/// CTCP delimiter byte, quoting ACTION and protocol replies.
const CTCP: char = '\u{1}';

/// Normalize a server message into a [`RelayEvent`].
///
/// Returns `None` for traffic the relay does not carry: numerics, CTCP
/// replies, direct messages to the bot, and events missing a source nick
/// where one is required.
#[must_use]
pub fn normalize(message: &Message) -> Option<RelayEvent> {
    let nick = message.source_nickname().map(str::to_owned);
    let from_server = matches!(message.prefix, Some(Prefix::ServerName(_)) | None);

    match &message.command {
        Command::PRIVMSG(target, text) => {
            if !is_channel(target) {
                // Direct messages to the bot are not relayed.
                return None;
            }
            let nick = require_nick(nick, "PRIVMSG")?;
            if let Some(action) = ctcp_action(text) {
                Some(RelayEvent::Action {
                    nick,
                    channel: target.clone(),
                    text: action.to_owned(),
                })
            } else if text.starts_with(CTCP) {
                None
            } else {
                Some(RelayEvent::Message {
                    nick,
                    channel: target.clone(),
                    text: text.clone(),
                })
            }
        },
        Command::NOTICE(_, text) => {
            if text.starts_with(CTCP) {
                // CTCP replies (VERSION, PING, ...) are protocol noise.
                return None;
            }
            Some(RelayEvent::Notice {
                from_server,
                nick,
                text: text.clone(),
            })
        },
        Command::WALLOPS(text) => Some(RelayEvent::Wallops {
            from_server,
            nick,
            text: text.clone(),
        }),
        Command::NICK(new_nick) => Some(RelayEvent::NickChange {
            old_nick: require_nick(nick, "NICK")?,
            new_nick: new_nick.clone(),
        }),
        Command::JOIN(channel, _, _) => Some(RelayEvent::Join {
            nick: require_nick(nick, "JOIN")?,
            channel: channel.clone(),
        }),
        Command::PART(channel, reason) => Some(RelayEvent::Part {
            nick: require_nick(nick, "PART")?,
            channel: channel.clone(),
            reason: reason.clone(),
        }),
        Command::QUIT(reason) => Some(RelayEvent::Quit {
            nick: require_nick(nick, "QUIT")?,
            reason: reason.clone(),
        }),
        Command::KICK(channel, kicked, reason) => Some(RelayEvent::Kick {
            kicked: kicked.clone(),
            by: require_nick(nick, "KICK")?,
            channel: channel.clone(),
            reason: reason.clone(),
        }),
        // Sent by servers with away-notify. An empty or absent reason
        // means the user came back.
        Command::AWAY(reason) => {
            let nick = require_nick(nick, "AWAY")?;
            match reason {
                Some(text) if !text.is_empty() => Some(RelayEvent::Away {
                    nick,
                    reason: Some(text.clone()),
                }),
                _ => Some(RelayEvent::Back { nick }),
            }
        },
        _ => None,
    }
}

fn is_channel(target: &str) -> bool {
    target.starts_with('#') || target.starts_with('&')
}

fn require_nick(nick: Option<String>, command: &str) -> Option<String> {
    if nick.is_none() {
        debug!(command, "dropping event without source nick");
    }
    nick
}

/// Extract the body of a CTCP ACTION ("/me") message.
fn ctcp_action(text: &str) -> Option<&str> {
    let inner = text.strip_prefix(CTCP)?;
    let inner = inner.strip_suffix(CTCP).unwrap_or(inner);
    inner.strip_prefix("ACTION ")
}

#[allow(clippy::unwrap_used, clippy::expect_used)]
#[cfg(test)]
mod tests {
    use super::*;

    fn parse(line: &str) -> Message {
        format!("{line}\r\n").parse().unwrap()
    }

    #[test]
    fn privmsg_to_channel() {
        let event = normalize(&parse(":alice!u@h PRIVMSG #general :hello there")).unwrap();
        assert_eq!(event, RelayEvent::Message {
            nick: "alice".into(),
            channel: "#general".into(),
            text: "hello there".into(),
        });
    }

    #[test]
    fn privmsg_to_user_dropped() {
        assert!(normalize(&parse(":alice!u@h PRIVMSG straitbot :psst")).is_none());
    }

    #[test]
    fn ctcp_action_becomes_action() {
        let event =
            normalize(&parse(":alice!u@h PRIVMSG #general :\u{1}ACTION waves\u{1}")).unwrap();
        assert_eq!(event, RelayEvent::Action {
            nick: "alice".into(),
            channel: "#general".into(),
            text: "waves".into(),
        });
    }

    #[test]
    fn other_ctcp_dropped() {
        assert!(normalize(&parse(":alice!u@h PRIVMSG #general :\u{1}VERSION\u{1}")).is_none());
    }

    #[test]
    fn server_notice() {
        let event = normalize(&parse(":irc.example.net NOTICE * :*** Looking up your hostname"))
            .unwrap();
        assert_eq!(event, RelayEvent::Notice {
            from_server: true,
            nick: None,
            text: "*** Looking up your hostname".into(),
        });
    }

    #[test]
    fn user_notice_keeps_nick() {
        let event = normalize(&parse(":oper!u@h NOTICE #general :maintenance soon")).unwrap();
        assert_eq!(event, RelayEvent::Notice {
            from_server: false,
            nick: Some("oper".into()),
            text: "maintenance soon".into(),
        });
    }

    #[test]
    fn wallops() {
        let event = normalize(&parse(":oper!u@h WALLOPS :restarting in 5")).unwrap();
        assert_eq!(event, RelayEvent::Wallops {
            from_server: false,
            nick: Some("oper".into()),
            text: "restarting in 5".into(),
        });
    }

    #[test]
    fn nick_change() {
        let event = normalize(&parse(":alice!u@h NICK :alice2")).unwrap();
        assert_eq!(event, RelayEvent::NickChange {
            old_nick: "alice".into(),
            new_nick: "alice2".into(),
        });
    }

    #[test]
    fn join_part_quit() {
        assert_eq!(
            normalize(&parse(":alice!u@h JOIN #general")).unwrap(),
            RelayEvent::Join {
                nick: "alice".into(),
                channel: "#general".into(),
            }
        );
        assert_eq!(
            normalize(&parse(":alice!u@h PART #general :bye")).unwrap(),
            RelayEvent::Part {
                nick: "alice".into(),
                channel: "#general".into(),
                reason: Some("bye".into()),
            }
        );
        assert_eq!(
            normalize(&parse(":alice!u@h QUIT :Ping timeout")).unwrap(),
            RelayEvent::Quit {
                nick: "alice".into(),
                reason: Some("Ping timeout".into()),
            }
        );
    }

    #[test]
    fn kick_attributes_the_kicker() {
        let event = normalize(&parse(":op!u@h KICK #general troll :spamming")).unwrap();
        assert_eq!(event, RelayEvent::Kick {
            kicked: "troll".into(),
            by: "op".into(),
            channel: "#general".into(),
            reason: Some("spamming".into()),
        });
    }

    #[test]
    fn away_and_back() {
        assert_eq!(
            normalize(&parse(":alice!u@h AWAY :lunch")).unwrap(),
            RelayEvent::Away {
                nick: "alice".into(),
                reason: Some("lunch".into()),
            }
        );
        assert_eq!(normalize(&parse(":alice!u@h AWAY")).unwrap(), RelayEvent::Back {
            nick: "alice".into(),
        });
    }

    #[test]
    fn numerics_dropped() {
        assert!(normalize(&parse(":irc.example.net 372 bot :- motd line")).is_none());
    }
}
