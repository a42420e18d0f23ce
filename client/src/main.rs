//! Terminal front end of the srtk mint client.
//!
//! Prints the page whenever the session state changes and reads one command
//! per line from stdin: `connect`, `start-presale`, `presale-mint`, `mint` or
//! `quit`.
use std::{str::FromStr, sync::Arc};

use eyre::Context;
use srtk_client::{Config, Notice, Session};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Connect,
    StartPresale,
    PresaleMint,
    Mint,
    Quit,
}

impl FromStr for Command {
    type Err = eyre::Report;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "connect" => Ok(Command::Connect),
            "start-presale" => Ok(Command::StartPresale),
            "presale-mint" => Ok(Command::PresaleMint),
            "mint" => Ok(Command::Mint),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(eyre::eyre!("unknown command {other:?}")),
        }
    }
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;
    info!(
        contract = %config.contract_address,
        rpc = %config.rpc_url,
        network = %config.network,
        "configuration loaded"
    );

    let session = Arc::new(Session::from_config(&config)?);
    report(session.load().await);
    println!("{}", session.page());

    let mut changes = session.subscribe();
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    loop {
        tokio::select! {
            changed = changes.changed() => {
                if changed.is_err() {
                    break;
                }
                println!("\n{}", session.page());
            }
            line = lines.next_line() => {
                let Some(line) = line.wrap_err("failed to read stdin")? else {
                    break;
                };
                if line.trim().is_empty() {
                    continue;
                }
                match line.parse::<Command>() {
                    Ok(Command::Quit) => break,
                    Ok(command) => dispatch(&session, command),
                    Err(error) => eprintln!("{error}"),
                }
            }
        }
    }

    session.teardown().await;
    Ok(())
}

/// Run `command` in the background so the page keeps updating meanwhile.
fn dispatch(session: &Arc<Session>, command: Command) {
    let session = Arc::clone(session);
    tokio::spawn(async move {
        let outcome = match command {
            Command::Connect => session.load().await,
            Command::StartPresale => session.start_presale().await,
            Command::PresaleMint => session.presale_mint().await,
            Command::Mint => session.public_mint().await,
            Command::Quit => return,
        };
        report(outcome);
    });
}

fn report(outcome: srtk_client::Result<Notice>) {
    match outcome {
        Ok(notice) => println!("{notice}"),
        Err(error) if error.is_wrong_network() => eprintln!("{error}"),
        Err(error) => warn!(%error, "operation failed"),
    }
}
