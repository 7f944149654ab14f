//! IRC connection lifecycle and the inbound event loop.

use std::sync::Arc;

use {
    futures::StreamExt,
    irc::{
        client::{prelude::Config, Client, Sender},
        proto::{Command, Response},
    },
    secrecy::{ExposeSecret, Secret},
    strait_config::{ChannelSpec, IrcConfig},
    strait_relay::Bridge,
    tokio_util::sync::CancellationToken,
    tracing::{debug, error, info},
};

/// Connect and register with the configured IRC server.
///
/// Registration completes asynchronously; channel joins wait for the
/// welcome numeric inside [`run`].
pub async fn connect(config: &IrcConfig) -> anyhow::Result<Client> {
    info!(host = %config.host, port = config.port, nick = %config.nick, "connecting to irc");
    let client = Client::from_config(Config {
        server: Some(config.host.clone()),
        port: Some(config.port),
        nickname: Some(config.nick.clone()),
        use_tls: Some(config.use_tls),
        ..Config::default()
    })
    .await?;
    client.identify()?;
    Ok(client)
}

/// Drive the IRC connection until shutdown or stream end.
///
/// On welcome: identify with NickServ (when configured) and join the
/// bridged channels. Every other message is normalized and handed to the
/// bridge. A broken stream cancels `shutdown` so the rest of the process
/// winds down with it.
pub async fn run(
    mut client: Client,
    channels: Vec<ChannelSpec>,
    nickserv_pass: Option<Secret<String>>,
    bridge: Arc<Bridge>,
    shutdown: CancellationToken,
) -> anyhow::Result<()> {
    let mut stream = client.stream()?;
    let sender = client.sender();

    loop {
        tokio::select! {
            () = shutdown.cancelled() => {
                let _ = sender.send_quit("shutting down");
                return Ok(());
            },
            message = stream.next() => {
                match message {
                    Some(Ok(message)) => {
                        if is_welcome(&message.command) {
                            on_welcome(&sender, &channels, nickserv_pass.as_ref())?;
                        } else if let Some(event) = crate::normalize::normalize(&message) {
                            debug!(?event, "irc event");
                            bridge.relay_from_irc(event);
                        }
                    },
                    Some(Err(e)) => {
                        error!(error = %e, "irc stream error");
                        shutdown.cancel();
                        return Err(e.into());
                    },
                    None => {
                        error!("irc stream ended");
                        shutdown.cancel();
                        anyhow::bail!("irc connection closed by server");
                    },
                }
            },
        }
    }
}

fn is_welcome(command: &Command) -> bool {
    matches!(command, Command::Response(Response::RPL_WELCOME, _))
}

fn on_welcome(
    sender: &Sender,
    channels: &[ChannelSpec],
    nickserv_pass: Option<&Secret<String>>,
) -> anyhow::Result<()> {
    info!("registered with irc server");
    if let Some(pass) = nickserv_pass {
        sender.send_privmsg("NickServ", format!("identify {}", pass.expose_secret()))?;
    }
    for spec in channels {
        info!(channel = %spec.name, "joining");
        match &spec.key {
            Some(key) => {
                sender.send(Command::JOIN(spec.name.clone(), Some(key.clone()), None))?;
            },
            None => sender.send_join(&spec.name)?,
        }
    }
    Ok(())
}
