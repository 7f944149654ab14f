use std::{path::PathBuf, sync::Arc};

use {
    clap::{Parser, Subcommand},
    secrecy::ExposeSecret,
    strait_config::{Severity, StraitConfig},
    strait_discord::{DiscordHandler, DiscordOutbound},
    strait_irc::IrcOutbound,
    strait_relay::Bridge,
    tokio_util::sync::CancellationToken,
    tracing::{error, info, warn},
    tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt},
};

#[derive(Parser)]
#[command(name = "strait", about = "Strait — IRC to Discord chat relay")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, global = true, default_value = "info")]
    log_level: String,

    /// Output logs as JSON instead of human-readable.
    #[arg(long, global = true, default_value_t = false)]
    json_logs: bool,

    /// Config file path (overrides discovery).
    #[arg(long, global = true, env = "STRAIT_CONFIG")]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the relay (default when no subcommand is provided).
    Run,
    /// Load and validate the config, then exit.
    CheckConfig,
}

fn init_telemetry(cli: &Cli) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));

    let registry = tracing_subscriber::registry().with(filter);

    if cli.json_logs {
        registry
            .with(fmt::layer().json().with_target(true).with_thread_ids(false))
            .init();
    } else {
        registry
            .with(
                fmt::layer()
                    .with_target(false)
                    .with_thread_ids(false)
                    .with_ansi(true),
            )
            .init();
    }
}

fn load_config(cli: &Cli) -> anyhow::Result<StraitConfig> {
    match &cli.config {
        Some(path) => strait_config::load_config(path),
        None => strait_config::discover_and_load(),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_telemetry(&cli);

    info!(version = env!("CARGO_PKG_VERSION"), "strait starting");

    match cli.command {
        None | Some(Commands::Run) => run(&cli).await,
        Some(Commands::CheckConfig) => check_config(&cli),
    }
}

fn check_config(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let diagnostics = strait_config::validate(&config);
    for d in &diagnostics {
        println!("{}: {}: {}", d.severity, d.path, d.message);
    }
    if strait_config::has_errors(&diagnostics) {
        anyhow::bail!("config has errors");
    }
    println!("config ok");
    println!(
        "irc: {}:{} as {} (tls: {}, nickserv: {})",
        config.irc.host,
        config.irc.port,
        config.irc.nick,
        config.irc.use_tls,
        if config.irc.nickserv_pass.is_some() { "yes" } else { "no" },
    );
    println!(
        "discord: guild {} (token: {}, owner: {}, replace: {}, notices: {})",
        config.discord.guild_id,
        if config.discord.token.is_some() { "set" } else { "missing" },
        config.discord.owner_id.map_or_else(|| "unset".into(), |id| id.to_string()),
        config.discord.replace_messages,
        config
            .discord
            .notice_channel
            .map_or_else(|| "unset".into(), |id| id.to_string()),
    );
    for spec in config.channel_specs() {
        println!(
            "channel: {}{}",
            spec.name,
            if spec.key.is_some() { " (keyed)" } else { "" }
        );
    }
    Ok(())
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let config = load_config(cli)?;
    let diagnostics = strait_config::validate(&config);
    for d in &diagnostics {
        match d.severity {
            Severity::Error => error!(path = %d.path, "{}", d.message),
            Severity::Warning => warn!(path = %d.path, "{}", d.message),
        }
    }
    if strait_config::has_errors(&diagnostics) {
        anyhow::bail!("config has errors; run `strait check-config` for details");
    }
    let token = config
        .discord
        .token
        .as_ref()
        .map(|t| t.expose_secret().clone())
        .ok_or_else(|| anyhow::anyhow!("discord token missing"))?;

    let shutdown = CancellationToken::new();

    // IRC connects first; its sender handle feeds the bridge's outbound.
    let irc_client = strait_irc::connect(&config.irc).await?;
    let irc_outbound = Arc::new(IrcOutbound::new(irc_client.sender()));

    // The REST handle works before the gateway client starts, so the
    // bridge can be wired up front.
    let discord_outbound = Arc::new(DiscordOutbound::new(strait_discord::http(&token)));

    let mut bridge = Bridge::new(discord_outbound.clone(), irc_outbound, &config.irc.nick);
    if let Some(owner) = config.discord.owner_id {
        bridge = bridge.with_owner_mention(format!("<@{owner}>"));
    }
    if let Some(channel) = config.discord.notice_channel {
        bridge = bridge.with_notice_channel(channel.to_string());
    }
    if config.discord.replace_messages {
        bridge = bridge.with_replace(discord_outbound.clone(), shutdown.child_token());
    }
    let bridge = Arc::new(bridge);

    let irc_task = tokio::spawn(strait_irc::run(
        irc_client,
        config.channel_specs(),
        config.irc.nickserv_pass.clone(),
        bridge.clone(),
        shutdown.clone(),
    ));

    let handler = DiscordHandler::new(
        config.discord.clone(),
        config.channel_specs(),
        bridge,
        shutdown.clone(),
    );
    let mut discord_client = strait_discord::build_client(&token, handler).await?;
    let shard_manager = discord_client.shard_manager.clone();
    let discord_shutdown = shutdown.clone();
    let discord_task = tokio::spawn(async move {
        if let Err(e) = discord_client.start().await {
            error!(error = %e, "discord client stopped");
            discord_shutdown.cancel();
        }
    });

    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, shutting down");
        },
        () = shutdown.cancelled() => {
            info!("shutting down");
        },
    }

    shutdown.cancel();
    shard_manager.shutdown_all().await;
    let _ = discord_task.await;
    match irc_task.await {
        Ok(Ok(())) | Err(_) => {},
        Ok(Err(e)) => warn!(error = %e, "irc task ended with error"),
    }

    info!("goodbye");
    Ok(())
}
