//! gesturewire CLI entry point.

mod agent;
mod args;

use std::io::Read;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use gesturewire_core::gesture::{ElementId, Gesture};
use tracing::error;

use crate::agent::compiler::MoveTo;
use crate::agent::{AgentAddress, AgentConnection, GestureDriver};
use crate::args::{Cli, Commands};

fn main() {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli) {
        error!("{:#}", e);
        std::process::exit(1);
    }
}

/// Read a gesture sequence from a file, or stdin for `-`.
fn read_gestures(path: &str) -> anyhow::Result<Vec<Gesture>> {
    let text = if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read gestures from stdin")?;
        buf
    } else {
        std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read gesture file {:?}", path))?
    };

    serde_json::from_str(&text).context("Gesture file must be a JSON array of actions")
}

fn run(cli: Cli) -> anyhow::Result<()> {
    let address = AgentAddress::resolve(cli.host.as_deref(), cli.port)?;

    // Parse input before connecting so bad files fail fast.
    let gestures = match &cli.command {
        Commands::Perform(args) => Some(read_gestures(&args.file)?),
        _ => None,
    };

    let runtime = tokio::runtime::Runtime::new()?;

    runtime.block_on(async {
        let connection = AgentConnection::connect(&address).await?;
        let driver = GestureDriver::new(Arc::new(connection));

        let value = match cli.command {
            Commands::Perform(args) => {
                let mode = if args.relative_move_to {
                    MoveTo::RelativeToStart
                } else {
                    MoveTo::Absolute
                };
                let driver = driver.with_move_to(mode);
                driver
                    .perform_touch(gestures.as_deref().unwrap_or_default())
                    .await?
            }
            Commands::Tap(args) => {
                let element = args.element.map(ElementId::from);
                driver.tap(element.as_ref(), args.x, args.y).await?
            }
            Commands::Click(args) => driver.click(&ElementId::from(args.element)).await?,
            Commands::Source => {
                println!("{}", driver.source().await?);
                return Ok(());
            }
        };

        println!("{}", serde_json::to_string_pretty(&value)?);
        Ok(())
    })
}
