//! `Newsletters` - terminal reader for newsletters collected in Firestore.
//!
//! Groups the day's newsletters by vendor, opens them as text and keeps
//! read state in sync with the store.

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![forbid(unsafe_code)]

mod cli;
mod commands;
mod notify;
mod render;
mod settings;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use cli::{Cli, Commands};
use newsletters_core::Context;

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "newsletters=info,newsletters_core=info,newsletters_firestore=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Configure {
            project_id,
            api_key,
            poll_interval,
        } => commands::configure(project_id, api_key, poll_interval).await,
        Commands::Login { email, password } => commands::login(email, password).await,
        Commands::Logout => commands::logout().await,
        Commands::Today { json } => commands::show(Context::Today, json).await,
        Commands::Historical { json } => commands::show(Context::Historical, json).await,
        Commands::Open { id, raw } => commands::open(id, raw).await,
        Commands::Toggle { id } => commands::toggle(id).await,
        Commands::Watch {
            historical,
            no_notify,
        } => {
            let context = if historical {
                Context::Historical
            } else {
                Context::Today
            };
            commands::watch(context, !no_notify).await
        }
    }
}
