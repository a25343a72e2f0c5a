// Copyright 2026, Jeroen van Erp <jeroen@geeko.me>
// SPDX-License-Identifier: Apache-2.0
use anyhow::Result;
use clap::error::ErrorKind;
use clap::Parser;
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use argocd_passwd::cli::Cli;
use argocd_passwd::config::Config;
use argocd_passwd::kubernetes::create_client;
use argocd_passwd::password::hasher_for;
use argocd_passwd::rotation::Rotation;
use argocd_passwd::types::{AccountCredential, Username};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    // Argument errors exit with 1 like every other fatal failure
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
            e.exit()
        }
        Err(e) => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
    };

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_cli(&cli);
    let username = Username::parse(&cli.username)?;
    let credential = AccountCredential::new(username, cli.password);

    info!(
        "Rotating password for account '{}' in namespace {}",
        credential.username, config.namespace
    );

    let client = create_client().await?;
    info!("Connected to Kubernetes cluster");

    let hasher = hasher_for(config.hasher);
    let report = Rotation::new(client, config, hasher).run(&credential).await?;

    match report.config_patch {
        Some(outcome) => info!("Done: config map {}, secret field {:?}", outcome, report.rewrite),
        None => info!("Dry run finished, cluster left unchanged"),
    }
    Ok(())
}
